// src/noyau/decimal.rs
//
// Décimal à précision fixe (34 chiffres significatifs), sans flottants.
// - Fini : coef × 10^exp, coef sans zéro final (forme canonique, 0 => exp = 0)
// - Infini / NaN : sentinelles, propagées sans erreur
// - chaque résultat est arrondi (demi-pair) à la précision du contexte
//
// Les fonctions transcendantes passent par lecture.rs (entiers scalés).

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::erreur::{Erreur, Resultat};
use super::lecture::{self, pow10, Constante};

/// Précision de travail : celle d’un décimal IEEE 754 sur 128 bits.
pub const PRECISION: usize = 34;
pub const EXP_MAX: i64 = 6144;
pub const EXP_MIN: i64 = -6143;

/// Chiffres de garde des fonctions transcendantes.
const GARDE: usize = 12;
/// Chiffres supplémentaires au plus, quand le résultat est proche de zéro.
const SUPPLEMENT_MAX: usize = 200;
/// Taille maximale (en chiffres) d’une puissance entière calculée exactement.
const PUISSANCE_EXACTE_MAX: usize = 60_000;
/// n! dépasse 10^6144 dès n ≈ 2100.
const FACTORIELLE_MAX: u64 = 3_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decimal {
    Fini { coef: BigInt, exp: i64 },
    Infini { negatif: bool },
    NaN,
}

/// Sens d’arrondi à l’entier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sens {
    Plancher,
    Plafond,
    VersZero,
}

pub(crate) fn nb_chiffres(n: &BigInt) -> usize {
    if n.is_zero() {
        1
    } else {
        n.magnitude().to_str_radix(10).len()
    }
}

/// Forme canonique, sans arrondi.
fn canonique(mut coef: BigInt, mut exp: i64) -> Decimal {
    if coef.is_zero() {
        return Decimal::zero();
    }
    while (&coef % 10u32).is_zero() {
        coef /= 10u32;
        exp += 1;
    }
    Decimal::Fini { coef, exp }
}

/// coef × 10^exp en notation fixe (jamais d’exposant).
fn texte_fixe(coef: &BigInt, exp: i64) -> String {
    let chiffres = coef.magnitude().to_str_radix(10);
    let signe = if coef.is_negative() { "-" } else { "" };

    if exp >= 0 {
        return format!("{signe}{chiffres}{}", "0".repeat(exp as usize));
    }
    let frac = (-exp) as usize;
    if chiffres.len() > frac {
        let (e, d) = chiffres.split_at(chiffres.len() - frac);
        format!("{signe}{e}.{d}")
    } else {
        format!("{signe}0.{}{chiffres}", "0".repeat(frac - chiffres.len()))
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal::zero()
    }
}

/* ------------------------ Construction / inspection ------------------------ */

impl Decimal {
    pub fn zero() -> Self {
        Decimal::Fini {
            coef: BigInt::zero(),
            exp: 0,
        }
    }

    pub fn un() -> Self {
        Decimal::Fini {
            coef: BigInt::one(),
            exp: 0,
        }
    }

    pub fn depuis_u64(n: u64) -> Self {
        canonique(BigInt::from(n), 0)
    }

    pub fn depuis_i64(n: i64) -> Self {
        canonique(BigInt::from(n), 0)
    }

    /// coef × 10^exp, pour les constantes (coef bien en deçà de la précision).
    pub fn depuis_parties(coef: i64, exp: i64) -> Self {
        canonique(BigInt::from(coef), exp)
    }

    pub fn est_nan(&self) -> bool {
        matches!(self, Decimal::NaN)
    }

    pub fn est_fini(&self) -> bool {
        matches!(self, Decimal::Fini { .. })
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Decimal::Fini { coef, .. } if coef.is_zero())
    }

    pub fn est_negatif(&self) -> bool {
        match self {
            Decimal::Fini { coef, .. } => coef.is_negative(),
            Decimal::Infini { negatif } => *negatif,
            Decimal::NaN => false,
        }
    }

    /// Forme canonique : entier <=> exposant positif ou nul.
    pub fn est_entier(&self) -> bool {
        matches!(self, Decimal::Fini { exp, .. } if *exp >= 0)
    }

    fn est_entier_impair(&self) -> bool {
        matches!(self, Decimal::Fini { coef, exp: 0 } if !(coef % 2u32).is_zero())
    }

    pub fn parties(&self) -> Option<(&BigInt, i64)> {
        match self {
            Decimal::Fini { coef, exp } => Some((coef, *exp)),
            _ => None,
        }
    }

    /// Exposant du chiffre de tête (10^a ≤ |x| < 10^(a+1)).
    pub fn exposant_ajuste(&self) -> Option<i64> {
        match self {
            Decimal::Fini { coef, exp } if !coef.is_zero() => {
                Some(exp + nb_chiffres(coef) as i64 - 1)
            }
            _ => None,
        }
    }

    pub fn oppose(&self) -> Decimal {
        match self {
            Decimal::Fini { coef, exp } => Decimal::Fini {
                coef: -coef,
                exp: *exp,
            },
            Decimal::Infini { negatif } => Decimal::Infini { negatif: !negatif },
            Decimal::NaN => Decimal::NaN,
        }
    }

    pub fn abs(&self) -> Decimal {
        if self.est_negatif() {
            self.oppose()
        } else {
            self.clone()
        }
    }

    /// Comparaison numérique; None si NaN.
    pub fn comparer(&self, autre: &Decimal) -> Option<Ordering> {
        use Decimal::*;
        match (self, autre) {
            (NaN, _) | (_, NaN) => None,
            (Infini { negatif: a }, Infini { negatif: b }) => Some(b.cmp(a)),
            (Infini { negatif }, _) => Some(if *negatif {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            (_, Infini { negatif }) => Some(if *negatif {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            (Fini { coef: ca, exp: ea }, Fini { coef: cb, exp: eb }) => {
                let e = (*ea).min(*eb);
                let a = ca * pow10((ea - e) as usize);
                let b = cb * pow10((eb - e) as usize);
                Some(a.cmp(&b))
            }
        }
    }

    pub fn vers_rationnel(&self) -> Option<BigRational> {
        let (coef, exp) = self.parties()?;
        Some(if exp >= 0 {
            BigRational::from_integer(coef * pow10(exp as usize))
        } else {
            BigRational::new(coef.clone(), pow10((-exp) as usize))
        })
    }

    /// Valeur entière exacte tenant dans un i64.
    pub fn vers_i64(&self) -> Option<i64> {
        match self {
            Decimal::Fini { coef, exp } if *exp >= 0 && *exp <= 18 => {
                (coef * pow10(*exp as usize)).to_i64()
            }
            _ => None,
        }
    }

    /// Entier non signé 64 bits, tronqué vers zéro; le booléen signale la troncature.
    pub fn vers_u64(&self) -> Resultat<(u64, bool)> {
        let entier = self.partie_entiere(Sens::VersZero);
        let (coef, exp) = match entier.parties() {
            Some(p) => p,
            None => {
                return Err(Erreur::intervalle(format!(
                    "{self} n’a pas de valeur entière"
                )))
            }
        };
        if coef.is_negative() {
            return Err(Erreur::intervalle(format!(
                "{self} est négatif (entier non signé 64 bits attendu)"
            )));
        }
        let n = if exp > 20 {
            None
        } else {
            (coef * pow10(exp as usize)).to_u64()
        };
        n.map(|n| (n, !self.est_entier()))
            .ok_or_else(|| Erreur::intervalle(format!("{self} dépasse 2^64 - 1")))
    }

    /// Partie entière (NaN et infinis inchangés).
    pub fn partie_entiere(&self, sens: Sens) -> Decimal {
        let Decimal::Fini { coef, exp } = self else {
            return self.clone();
        };
        if *exp >= 0 {
            return self.clone();
        }
        let diviseur = pow10((-exp) as usize);
        let mut q = coef / &diviseur;
        let r = coef % &diviseur;
        match sens {
            Sens::Plancher if r.is_negative() => q -= 1u32,
            Sens::Plafond if r.is_positive() => q += 1u32,
            _ => {}
        }
        canonique(q, 0)
    }

    /// Arrondi demi-pair à l’exposant `cible`, sans limite de précision.
    pub fn quantifier(&self, cible: i64) -> Decimal {
        let Decimal::Fini { coef, exp } = self else {
            return self.clone();
        };
        if *exp >= cible {
            return self.clone();
        }
        let diviseur = pow10((cible - exp) as usize);
        let q = coef / &diviseur;
        let r = (coef % &diviseur).abs();
        let moitie = &diviseur / 2u32;
        let monter = match r.cmp(&moitie) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !(&q % 2u32).is_zero(),
        };
        let q = match (monter, coef.is_negative()) {
            (false, _) => q,
            (true, false) => q + 1u32,
            (true, true) => q - 1u32,
        };
        canonique(q, cible)
    }

    /// log10 |x| approché, pour les estimations d’ordre de grandeur.
    fn log10_approx(&self) -> Option<f64> {
        let (coef, exp) = self.parties()?;
        if coef.is_zero() {
            return None;
        }
        let s = coef.magnitude().to_str_radix(10);
        let tete = &s[..s.len().min(17)];
        let m: f64 = tete.parse().ok()?;
        Some(m.log10() + (exp + (s.len() - tete.len()) as i64) as f64)
    }

    /// x × 10^w tronqué (entier scalé pour lecture.rs).
    pub(crate) fn vers_echelle(&self, w: usize) -> Option<BigInt> {
        let (coef, exp) = self.parties()?;
        let e = exp + w as i64;
        Some(if e >= 0 {
            coef * pow10(e as usize)
        } else {
            coef / pow10((-e) as usize)
        })
    }
}

impl fmt::Display for Decimal {
    /// Notation fixe complète; le formatage d’affichage est dans format.rs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimal::NaN => f.write_str("NaN"),
            Decimal::Infini { negatif: true } => f.write_str("-Infinity"),
            Decimal::Infini { .. } => f.write_str("Infinity"),
            Decimal::Fini { coef, exp } => f.write_str(&texte_fixe(coef, *exp)),
        }
    }
}

/* ------------------------ Contexte arithmétique ------------------------ */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContexteArith {
    pub precision: usize,
    pub exp_max: i64,
    pub exp_min: i64,
    /// Division par zéro : erreur au lieu de ±Infinity / NaN.
    pub pieger_division: bool,
}

impl Default for ContexteArith {
    fn default() -> Self {
        Self {
            precision: PRECISION,
            exp_max: EXP_MAX,
            exp_min: EXP_MIN,
            pieger_division: false,
        }
    }
}

impl ContexteArith {
    /// Plus petit exposant d’un coefficient (valeurs sous-normales comprises).
    fn etiny(&self) -> i64 {
        self.exp_min - (self.precision as i64 - 1)
    }

    /// Arrondi demi-pair de coef × 10^exp à `precision` chiffres.
    ///
    /// `inexact` signale des chiffres non nuls déjà perdus sous coef : il
    /// départage le cas « exactement la moitié ».
    pub fn arrondir(&self, coef: BigInt, exp: i64, inexact: bool) -> Decimal {
        if coef.is_zero() {
            return Decimal::zero();
        }
        let negatif = coef.is_negative();
        let mut mag = coef.abs();
        let mut exp = exp;

        let chiffres = nb_chiffres(&mag);
        let mut retirer = chiffres.saturating_sub(self.precision) as i64;
        if exp + retirer < self.etiny() {
            retirer = self.etiny() - exp;
        }
        // tous les chiffres passent sous la demi-unité du dernier rang
        if retirer > chiffres as i64 {
            return Decimal::zero();
        }

        if retirer > 0 {
            let diviseur = pow10(retirer as usize);
            let q = &mag / &diviseur;
            let r = &mag % &diviseur;
            let moitie = &diviseur / 2u32;
            let monter = match r.cmp(&moitie) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => inexact || !(&q % 2u32).is_zero(),
            };
            mag = if monter { q + 1u32 } else { q };
            exp += retirer;

            // retenue : 999…9 + 1
            if nb_chiffres(&mag) > self.precision {
                mag /= 10u32;
                exp += 1;
            }
        }

        if mag.is_zero() {
            return Decimal::zero();
        }
        if exp + nb_chiffres(&mag) as i64 - 1 > self.exp_max {
            return Decimal::Infini { negatif };
        }
        canonique(if negatif { -mag } else { mag }, exp)
    }

    /// n / d × 10^exp, arrondi correctement (d ≠ 0).
    pub(crate) fn quotient(&self, n: &BigInt, d: &BigInt, exp: i64) -> Decimal {
        let decalage = (self.precision + 2 + nb_chiffres(d)).saturating_sub(nb_chiffres(n));
        let num = n * pow10(decalage);
        let q = &num / d;
        let r = &num % d;
        self.arrondir(q, exp - decalage as i64, !r.is_zero())
    }

    pub fn depuis_rationnel(&self, r: &BigRational) -> Decimal {
        self.quotient(r.numer(), r.denom(), 0)
    }

    pub(crate) fn depuis_echelle(&self, s: BigInt, w: usize) -> Decimal {
        self.arrondir(s, -(w as i64), true)
    }

    /// Recalcule avec plus de chiffres tant que le résultat scalé manque de
    /// chiffres significatifs (annulation au voisinage de zéro).
    pub(crate) fn precision_croissante(&self, w0: usize, mut calcul: impl FnMut(usize) -> BigInt) -> Decimal {
        let mut w = w0;
        loop {
            let s = calcul(w);
            let voulu = self.precision + 3;
            let chiffres = if s.is_zero() { 0 } else { nb_chiffres(&s) };
            if chiffres >= voulu || w >= w0 + SUPPLEMENT_MAX {
                return self.depuis_echelle(s, w);
            }
            w += voulu - chiffres + 2;
        }
    }

    /// Littéral décimal : [+-]chiffres[.chiffres][e[+-]chiffres].
    pub fn lire(&self, s: &str) -> Option<Decimal> {
        let (negatif, corps) = match s.as_bytes().first().copied()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantisse, exposant) = match corps.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&corps[..i], corps[i + 1..].parse::<i128>().ok()?),
            None => (corps, 0),
        };
        let (entier, frac) = mantisse.split_once('.').unwrap_or((mantisse, ""));
        if entier.is_empty() && frac.is_empty() {
            return None;
        }
        if !entier.bytes().chain(frac.bytes()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let chiffres = format!("{entier}{frac}");
        let mut coef = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
        if negatif {
            coef = -coef;
        }

        if coef.is_zero() {
            return Some(Decimal::zero());
        }

        // exposant ajusté hors limites : on sature avant tout calcul
        let exp = exposant - frac.len() as i128;
        let ajuste = exp + nb_chiffres(&coef) as i128 - 1;
        if ajuste > i128::from(self.exp_max) {
            return Some(Decimal::Infini { negatif });
        }
        if ajuste < i128::from(self.etiny()) - 1 {
            return Some(Decimal::zero());
        }
        let exp = i64::try_from(exp).ok()?;
        Some(self.arrondir(coef, exp, false))
    }

    /* ------------------------ Arithmétique de base ------------------------ */

    pub fn additionner(&self, a: &Decimal, b: &Decimal) -> Decimal {
        use Decimal::*;
        match (a, b) {
            (NaN, _) | (_, NaN) => NaN,
            (Infini { negatif: na }, Infini { negatif: nb }) => {
                if na == nb {
                    a.clone()
                } else {
                    NaN
                }
            }
            (Infini { .. }, _) => a.clone(),
            (_, Infini { .. }) => b.clone(),
            (Fini { coef: ca, exp: ea }, Fini { coef: cb, exp: eb }) => {
                let e = (*ea).min(*eb);
                let somme = ca * pow10((ea - e) as usize) + cb * pow10((eb - e) as usize);
                self.arrondir(somme, e, false)
            }
        }
    }

    pub fn soustraire(&self, a: &Decimal, b: &Decimal) -> Decimal {
        self.additionner(a, &b.oppose())
    }

    pub fn multiplier(&self, a: &Decimal, b: &Decimal) -> Decimal {
        use Decimal::*;
        match (a, b) {
            (NaN, _) | (_, NaN) => NaN,
            (Infini { .. }, _) | (_, Infini { .. }) => {
                if a.est_zero() || b.est_zero() {
                    NaN
                } else {
                    Infini {
                        negatif: a.est_negatif() != b.est_negatif(),
                    }
                }
            }
            (Fini { coef: ca, exp: ea }, Fini { coef: cb, exp: eb }) => {
                self.arrondir(ca * cb, ea + eb, false)
            }
        }
    }

    /// y × x / 100, arrondi une seule fois.
    pub fn pourcentage(&self, y: &Decimal, x: &Decimal) -> Decimal {
        match (y, x) {
            (Decimal::Fini { coef: cy, exp: ey }, Decimal::Fini { coef: cx, exp: ex }) => {
                self.arrondir(cy * cx, ey + ex - 2, false)
            }
            _ => self.multiplier(y, x),
        }
    }

    pub fn diviser(&self, y: &Decimal, x: &Decimal) -> Resultat<Decimal> {
        use Decimal::*;
        Ok(match (y, x) {
            (NaN, _) | (_, NaN) => NaN,
            (Infini { .. }, Infini { .. }) => NaN,
            (Infini { negatif }, Fini { coef, .. }) => Infini {
                negatif: *negatif != coef.is_negative(),
            },
            (Fini { .. }, Infini { .. }) => Decimal::zero(),
            (Fini { .. }, Fini { coef, .. }) if coef.is_zero() => {
                return self.division_par_zero(y)
            }
            (Fini { coef: cy, exp: ey }, Fini { coef: cx, exp: ex }) => {
                self.quotient(cy, cx, ey - ex)
            }
        })
    }

    fn division_par_zero(&self, y: &Decimal) -> Resultat<Decimal> {
        if self.pieger_division {
            return Err(Erreur::arithmetique("division par zéro"));
        }
        Ok(if y.est_zero() {
            Decimal::NaN
        } else {
            Decimal::Infini {
                negatif: y.est_negatif(),
            }
        })
    }

    /// Reste tronqué : signe de y.
    pub fn reste(&self, y: &Decimal, x: &Decimal) -> Resultat<Decimal> {
        self.division_entiere(y, x, false)
    }

    /// Modulo plancher : signe de x.
    pub fn modulo(&self, y: &Decimal, x: &Decimal) -> Resultat<Decimal> {
        self.division_entiere(y, x, true)
    }

    fn division_entiere(&self, y: &Decimal, x: &Decimal, plancher: bool) -> Resultat<Decimal> {
        use Decimal::*;
        match (y, x) {
            (NaN, _) | (_, NaN) | (Infini { .. }, _) => Ok(NaN),
            (Fini { .. }, Infini { .. }) => Ok(y.clone()),
            (_, Fini { coef, .. }) if coef.is_zero() => {
                if self.pieger_division {
                    Err(Erreur::arithmetique("division par zéro"))
                } else {
                    Ok(NaN)
                }
            }
            (Fini { coef: cy, exp: ey }, Fini { coef: cx, exp: ex }) => {
                let e = (*ey).min(*ex);
                let a = cy * pow10((ey - e) as usize);
                let b = cx * pow10((ex - e) as usize);
                let mut r = &a % &b;
                if plancher && !r.is_zero() && r.is_negative() != b.is_negative() {
                    r += &b;
                }
                Ok(self.arrondir(r, e, false))
            }
        }
    }

    /* ------------------------ Puissances et racines ------------------------ */

    pub fn puissance(&self, y: &Decimal, x: &Decimal) -> Resultat<Decimal> {
        use Decimal::*;
        if y.est_nan() || x.est_nan() {
            return Ok(NaN);
        }
        if x.est_zero() {
            return Ok(Decimal::un());
        }
        let impair = x.est_entier_impair();

        match (y, x) {
            (_, Infini { negatif }) => {
                return Ok(match (y.abs().comparer(&Decimal::un()), *negatif) {
                    (Some(Ordering::Equal), _) => Decimal::un(),
                    (Some(Ordering::Greater), false) | (Some(Ordering::Less), true) => {
                        Infini { negatif: false }
                    }
                    _ => Decimal::zero(),
                });
            }
            (Infini { negatif }, _) => {
                return Ok(if x.est_negatif() {
                    Decimal::zero()
                } else {
                    Infini {
                        negatif: *negatif && impair,
                    }
                });
            }
            _ => {}
        }

        if y.est_zero() {
            return if x.est_negatif() {
                self.division_par_zero(&Decimal::un())
            } else {
                Ok(Decimal::zero())
            };
        }
        if let Some(r) = self.puissance_entiere(y, x) {
            return Ok(r);
        }
        if y.est_negatif() {
            if !x.est_entier() {
                return Ok(NaN);
            }
            let r = self.puissance_generale(&y.abs(), x);
            return Ok(if impair { r.oppose() } else { r });
        }
        Ok(self.puissance_generale(y, x))
    }

    /// Exposant entier de taille raisonnable : calcul exact, un seul arrondi.
    fn puissance_entiere(&self, y: &Decimal, x: &Decimal) -> Option<Decimal> {
        let (cy, ey) = y.parties()?;
        let n = x.vers_i64()?;
        let m = u32::try_from(n.unsigned_abs()).ok()?;

        let estime = y.log10_approx()? * n as f64;
        if estime > (self.exp_max + 2) as f64 {
            return Some(Decimal::Infini {
                negatif: cy.is_negative() && n % 2 != 0,
            });
        }
        if estime < (self.etiny() - 2) as f64 {
            return Some(Decimal::zero());
        }
        if nb_chiffres(cy).saturating_mul(m as usize) > PUISSANCE_EXACTE_MAX {
            return None;
        }

        let c = cy.pow(m);
        let e = ey.checked_mul(m as i64)?;
        Some(if n >= 0 {
            self.arrondir(c, e, false)
        } else {
            self.quotient(&BigInt::one(), &c, -e)
        })
    }

    /// y^x = exp(x·ln y), y > 0.
    fn puissance_generale(&self, y: &Decimal, x: &Decimal) -> Decimal {
        let ln_y = self.ln(y);
        if ln_y.est_zero() {
            return Decimal::un();
        }
        let (Some(lx), Some(lly)) = (x.log10_approx(), ln_y.log10_approx()) else {
            return Decimal::NaN;
        };
        // |x·ln y| > 10^4.2 : hors de [etiny, emax] à coup sûr
        if lx + lly > 4.2 {
            return if x.est_negatif() != ln_y.est_negatif() {
                Decimal::zero()
            } else {
                Decimal::Infini { negatif: false }
            };
        }

        let chiffres_x = x.exposant_ajuste().map_or(0, |a| (a + 1).max(0) as usize);
        let w = self.precision + GARDE;
        let wl = w + chiffres_x + 6;
        let (Some(lny), Some((cx, ex))) = (self.ln_echelle(y, wl), x.parties()) else {
            return Decimal::NaN;
        };

        let produit = cx * lny;
        let decal = ex - (wl - w) as i64;
        let t = if decal >= 0 {
            produit * pow10(decal as usize)
        } else {
            produit / pow10((-decal) as usize)
        };
        self.exp_echelle(t, w)
    }

    pub fn racine_carree(&self, x: &Decimal) -> Decimal {
        match x {
            Decimal::NaN | Decimal::Infini { negatif: true } => Decimal::NaN,
            Decimal::Infini { .. } => x.clone(),
            Decimal::Fini { coef, exp } => {
                if coef.is_zero() {
                    return Decimal::zero();
                }
                if coef.is_negative() {
                    return Decimal::NaN;
                }
                let mut decal = (2 * (self.precision + 2)).saturating_sub(nb_chiffres(coef));
                if (exp - decal as i64) % 2 != 0 {
                    decal += 1;
                }
                let n = coef * pow10(decal);
                let r = n.sqrt();
                let inexact = &r * &r != n;
                self.arrondir(r, (exp - decal as i64) / 2, inexact)
            }
        }
    }

    pub fn racine_cubique(&self, x: &Decimal) -> Decimal {
        match x {
            Decimal::NaN => Decimal::NaN,
            Decimal::Infini { .. } => x.clone(),
            Decimal::Fini { coef, exp } => {
                if coef.is_zero() {
                    return Decimal::zero();
                }
                let mut decal = (3 * (self.precision + 2)).saturating_sub(nb_chiffres(coef));
                while (exp - decal as i64).rem_euclid(3) != 0 {
                    decal += 1;
                }
                let n = coef.abs() * pow10(decal);
                let r = n.cbrt();
                let inexact = &r * &r * &r != n;
                let r = if coef.is_negative() { -r } else { r };
                self.arrondir(r, (exp - decal as i64) / 3, inexact)
            }
        }
    }

    pub fn factorielle(&self, x: &Decimal) -> Resultat<Decimal> {
        if x.est_negatif() {
            return Err(Erreur::arithmetique(format!(
                "factorielle d’un nombre négatif ({x})"
            )));
        }
        if !x.est_entier() {
            return Err(Erreur::arithmetique(format!(
                "factorielle : entier positif attendu ({x})"
            )));
        }
        let n = match x.vers_i64() {
            Some(n) if n as u64 <= FACTORIELLE_MAX => n as u64,
            _ => return Ok(Decimal::Infini { negatif: false }),
        };
        let produit = (2..=n).fold(BigInt::one(), |acc, k| acc * k);
        Ok(self.arrondir(produit, 0, false))
    }

    /* ------------------------ Transcendantes ------------------------ */

    pub fn pi(&self) -> Decimal {
        let w = self.precision + GARDE;
        self.depuis_echelle(lecture::constante_scaled(Constante::Pi, w), w)
    }

    /// Chiffres de travail pour un argument x (davantage si |x| est petit).
    pub(crate) fn chiffres_travail(&self, x: &Decimal) -> usize {
        let petit = x.exposant_ajuste().map_or(0, |a| (-a).max(0) as usize);
        self.precision + GARDE + petit
    }

    pub fn e(&self) -> Decimal {
        self.exp(&Decimal::un())
    }

    /// exp(t) pour t scalé ×10^w : t = k·ln 10 + r, r ∈ [0, ln 10).
    fn exp_echelle(&self, t: BigInt, w: usize) -> Decimal {
        let l10 = lecture::constante_scaled(Constante::Ln10, w + 6);
        let t6 = t * pow10(6);

        let mut k = &t6 / &l10;
        if (&t6 % &l10).is_negative() {
            k -= 1u32;
        }
        let Some(k) = k.to_i64() else {
            return if t6.is_negative() {
                Decimal::zero()
            } else {
                Decimal::Infini { negatif: false }
            };
        };
        if k > self.exp_max + 1 {
            return Decimal::Infini { negatif: false };
        }
        if k < self.etiny() - 2 {
            return Decimal::zero();
        }

        let r = (t6 - &l10 * k) / pow10(6);
        let e = lecture::exp_scaled(&r, w);
        self.arrondir(e, k - w as i64, true)
    }

    pub fn exp(&self, x: &Decimal) -> Decimal {
        match x {
            Decimal::NaN => Decimal::NaN,
            Decimal::Infini { negatif: true } => Decimal::zero(),
            Decimal::Infini { .. } => x.clone(),
            Decimal::Fini { coef, .. } if coef.is_zero() => Decimal::un(),
            Decimal::Fini { .. } => {
                // |x| ≥ 10^5 dépasse largement emax·ln 10
                if x.exposant_ajuste().unwrap_or(0) >= 5 {
                    return if x.est_negatif() {
                        Decimal::zero()
                    } else {
                        Decimal::Infini { negatif: false }
                    };
                }
                let w = self.precision + GARDE;
                match x.vers_echelle(w) {
                    Some(t) => self.exp_echelle(t, w),
                    None => Decimal::NaN,
                }
            }
        }
    }

    /// ln x scalé ×10^w, x fini > 0 : x = m·10^a, m ∈ [1, 10).
    fn ln_echelle(&self, x: &Decimal, w: usize) -> Option<BigInt> {
        let (coef, _) = x.parties()?;
        if !coef.is_positive() {
            return None;
        }
        let a = x.exposant_ajuste()?;
        let n = nb_chiffres(coef);
        let m = coef * pow10((w + 1).saturating_sub(n));
        let ln_m = lecture::ln_scaled(&m, w);
        let l10 = lecture::constante_scaled(Constante::Ln10, w + 6);
        Some(ln_m + l10 * a / pow10(6))
    }

    /// Domaine de ln/log : Some(résultat) hors des réels > 0.
    fn hors_domaine_log(&self, x: &Decimal) -> Option<Decimal> {
        match x {
            Decimal::NaN | Decimal::Infini { negatif: true } => Some(Decimal::NaN),
            Decimal::Infini { .. } => Some(x.clone()),
            Decimal::Fini { coef, .. } if coef.is_zero() => {
                Some(Decimal::Infini { negatif: true })
            }
            Decimal::Fini { coef, .. } if coef.is_negative() => Some(Decimal::NaN),
            _ if *x == Decimal::un() => Some(Decimal::zero()),
            _ => None,
        }
    }

    pub fn ln(&self, x: &Decimal) -> Decimal {
        if let Some(r) = self.hors_domaine_log(x) {
            return r;
        }
        self.precision_croissante(self.precision + GARDE, |w| {
            self.ln_echelle(x, w).unwrap_or_default()
        })
    }

    pub fn log10(&self, x: &Decimal) -> Decimal {
        if let Some(r) = self.hors_domaine_log(x) {
            return r;
        }
        // puissance exacte de 10
        if let Decimal::Fini { coef, exp } = x {
            if coef.is_one() {
                return Decimal::depuis_i64(*exp);
            }
        }
        self.precision_croissante(self.precision + GARDE, |w| {
            let l = self.ln_echelle(x, w + 2).unwrap_or_default();
            l * pow10(w) / lecture::constante_scaled(Constante::Ln10, w + 2)
        })
    }

    pub fn log2(&self, x: &Decimal) -> Decimal {
        if let Some(r) = self.hors_domaine_log(x) {
            return r;
        }
        // puissance exacte de 2
        if let Decimal::Fini { coef, exp: 0 } = x {
            let m = coef.magnitude();
            if m.trailing_zeros() == Some(m.bits() - 1) {
                return Decimal::depuis_u64(m.bits() - 1);
            }
        }
        self.precision_croissante(self.precision + GARDE, |w| {
            let l = self.ln_echelle(x, w + 2).unwrap_or_default();
            l * pow10(w) / lecture::constante_scaled(Constante::Ln2, w + 2)
        })
    }
}
