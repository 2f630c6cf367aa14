// src/noyau/contexte.rs
//
// Contexte de calcul partagé par toutes les opérations :
// base d’affichage, nombre de décimales, unité d’angle, débogage,
// plus le contexte arithmétique (précision, piège de division).
//
// Couplage volontaire des modes :
// - choisir une base (bin/oct/dec/hex) repasse en radians
// - choisir une unité d’angle (deg/rad) repasse en base 10

use std::fmt;
use std::str::FromStr;

use super::decimal::{ContexteArith, PRECISION};

/// Décimales affichées par défaut.
pub const DECIMALES_DEFAUT: usize = 16;

/// Au-delà, les chiffres affichés ne sont plus significatifs.
pub const DECIMALES_MAX: usize = PRECISION;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Base {
    Binaire,
    Octale,
    Decimale,
    Hexadecimale,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Binaire => 2,
            Base::Octale => 8,
            Base::Decimale => 10,
            Base::Hexadecimale => 16,
        }
    }

    /// Préfixe des littéraux et de l’affichage.
    pub fn prefixe(self) -> &'static str {
        match self {
            Base::Binaire => "0b",
            Base::Octale => "0",
            Base::Decimale => "",
            Base::Hexadecimale => "0x",
        }
    }
}

impl FromStr for Base {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "bin" => Ok(Base::Binaire),
            "8" | "oct" => Ok(Base::Octale),
            "10" | "dec" => Ok(Base::Decimale),
            "16" | "hex" => Ok(Base::Hexadecimale),
            autre => Err(format!("base inconnue : {autre:?} (2, 8, 10 ou 16)")),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.radix())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Angle {
    #[default]
    Radians,
    Degres,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contexte {
    pub base: Base,
    pub decimales: usize,
    pub angle: Angle,
    pub debug: bool,
    /// Forme groupée « (1,234) » après les nombres en base 10.
    pub groupage: bool,
    pub arith: ContexteArith,
}

impl Default for Contexte {
    fn default() -> Self {
        Self {
            base: Base::Decimale,
            decimales: DECIMALES_DEFAUT,
            angle: Angle::Radians,
            debug: false,
            groupage: true,
            arith: ContexteArith::default(),
        }
    }
}

impl Contexte {
    pub fn choisir_base(&mut self, base: Base) {
        self.base = base;
        self.angle = Angle::Radians;
    }

    pub fn choisir_angle(&mut self, angle: Angle) {
        self.angle = angle;
        self.base = Base::Decimale;
    }

    /// Borne à [0, DECIMALES_MAX].
    pub fn choisir_decimales(&mut self, n: usize) {
        self.decimales = n.min(DECIMALES_MAX);
    }

    /// Inverse le mode débogage; renvoie le nouvel état.
    pub fn basculer_debug(&mut self) -> bool {
        self.debug = !self.debug;
        self.debug
    }

    /// Invite interactive : reflète le mode non standard.
    pub fn invite(&self) -> &'static str {
        match (self.base, self.angle) {
            (Base::Binaire, _) => "bin> ",
            (Base::Octale, _) => "oct> ",
            (Base::Hexadecimale, _) => "hex> ",
            (Base::Decimale, Angle::Degres) => "deg> ",
            (Base::Decimale, Angle::Radians) => "> ",
        }
    }
}
