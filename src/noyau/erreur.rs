// src/noyau/erreur.rs
//
// Erreurs du noyau.
// - Une erreur arrête la ligne en cours (la pile est restaurée par eval.rs).
// - La troncature en base non décimale n’est PAS une erreur (simple note).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Erreur {
    /// Jeton qui n’est ni une opération, ni un littéral valide.
    #[error("opération ou nombre inconnu : {0:?} (« help » pour l’aide)")]
    Syntaxe(String),

    /// Division par zéro piégée, factorielle négative, précision `fmt` invalide, etc.
    #[error("erreur arithmétique : {0}")]
    Arithmetique(String),

    #[error("l’opération {op:?} exige au moins {requis} élément(s) sur la pile ({presents} présent(s))")]
    PileInsuffisante {
        op: String,
        requis: usize,
        presents: usize,
    },

    /// Valeur hors de l’intervalle des entiers non signés 64 bits.
    #[error("hors intervalle : {0}")]
    Intervalle(String),

    /// Un opérateur annonce consommer plus de cellules qu’il n’y en a.
    #[error("(interne) l’opération {op:?} veut retirer {demande} élément(s), la pile n’en a que {presents}")]
    Incoherence {
        op: String,
        demande: usize,
        presents: usize,
    },
}

pub type Resultat<T> = Result<T, Erreur>;

impl Erreur {
    pub fn arithmetique(msg: impl Into<String>) -> Self {
        Erreur::Arithmetique(msg.into())
    }

    pub fn intervalle(msg: impl Into<String>) -> Self {
        Erreur::Intervalle(msg.into())
    }
}
