//! Noyau de la calculatrice RPN
//!
//! Organisation interne :
//! - decimal.rs    : décimal 34 chiffres (arrondi demi-pair, ±Infinity, NaN)
//! - lecture.rs    : séries à virgule fixe (π, ln 2, ln 10, exp, ln, sin/cos, atan)
//! - trig.rs       : trigonométrie selon le mode d’angle, angles exacts en degrés
//! - pile.rs       : pile + sauvegarde d’une ligne
//! - contexte.rs   : base, décimales, mode d’angle, débogage
//! - operations.rs : registre ordonné (opérations + annotations d’aide)
//! - jetons.rs     : nettoyage, découpage, littéraux préfixés
//! - eval.rs       : répartiteur (une ligne -> effets sur la pile)
//! - format.rs     : affichage selon la base et les décimales
//! - erreur.rs     : erreurs du noyau

pub mod contexte;
pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod operations;
pub mod pile;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use contexte::{Base, Contexte};
pub use eval::Calculatrice;
pub use operations::{Annotation, Entree};
