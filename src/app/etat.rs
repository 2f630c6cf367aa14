//! src/app/etat.rs
//!
//! État de session (sans terminal).
//!
//! Rôle : porter la calculatrice et traduire chaque ligne saisie en actions
//! d’affichage, que vue.rs exécute.
//!
//! Contrats :
//! - Aucune entrée/sortie ici.
//! - Ordre des actions d’une ligne : sorties des opérations, aide, puis fin
//!   ou « = x ». Une erreur remplace tout le reste.

use tracing::warn;

use crate::noyau::contexte::{Angle, DECIMALES_DEFAUT};
use crate::noyau::format::lignes_pile;
use crate::noyau::{Base, Calculatrice, Contexte, Entree};

/// Réglages de départ (ligne de commande + environnement).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub base: Base,
    pub decimales: usize,
    pub degres: bool,
    pub pieger_division: bool,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            base: Base::Decimale,
            decimales: DECIMALES_DEFAUT,
            degres: false,
            pieger_division: false,
        }
    }
}

impl Reglages {
    /// Contexte initial. Les degrés imposent la base 10 (modes exclusifs).
    pub fn contexte(&self) -> Contexte {
        let mut c = Contexte::default();
        c.choisir_base(self.base);
        if self.degres {
            if self.base != Base::Decimale {
                warn!(base = %self.base, "mode degrés demandé : retour en base 10");
            }
            c.choisir_angle(Angle::Degres);
        }
        c.choisir_decimales(self.decimales);
        c.arith.pieger_division = self.pieger_division;
        c
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Ligne brute (pile, notes, état du débogage).
    Texte(String),
    /// Nouveau sommet, déjà formaté.
    Resultat(String),
    Erreur(String),
    Aide,
    Fin,
}

pub struct Session {
    calc: Calculatrice,
}

impl Session {
    pub fn new(contexte: Contexte) -> Self {
        Self {
            calc: Calculatrice::new(contexte),
        }
    }

    pub fn invite(&self) -> &'static str {
        self.calc.invite()
    }

    pub fn registre(&self) -> &[Entree] {
        self.calc.registre()
    }

    /// Lignes à montrer avant l’invite : la pile entière en mode débogage.
    pub fn avant_saisie(&self) -> Vec<String> {
        if !self.calc.contexte().debug {
            return Vec::new();
        }
        let pile = self.calc.pile();
        let depuis_sommet = pile.sommets(pile.len()).unwrap_or_default();
        lignes_pile(&depuis_sommet, self.calc.contexte())
    }

    pub fn traiter(&mut self, ligne: &str) -> Vec<Action> {
        let ev = match self.calc.evaluer(ligne) {
            Ok(ev) => ev,
            Err(e) => return vec![Action::Erreur(e.to_string())],
        };

        let mut actions: Vec<Action> = ev.sorties.into_iter().map(Action::Texte).collect();
        if ev.aide {
            actions.push(Action::Aide);
        }
        if ev.quitter {
            actions.push(Action::Fin);
        } else if ev.afficher {
            actions.push(Action::Resultat(self.calc.afficher_sommet()));
        }
        actions
    }
}
