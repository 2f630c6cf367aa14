// src/noyau/jetons.rs
//
// Découpage d’une ligne en jetons et lecture des littéraux.
// - Nettoyage : on ne garde que lettres, chiffres, espaces et SYMBOLES
//   (« $2,500.00 » devient « 2500.00 »)
// - Littéraux : 0b… (binaire), 0x… (hexa), 0… ou o… (octal), sinon décimal

use std::num::IntErrorKind;

use super::decimal::{ContexteArith, Decimal};
use super::erreur::{Erreur, Resultat};

/// Symboles conservés au nettoyage, en plus des lettres, chiffres et espaces :
/// ceux des opérations, le point décimal et le « ? » de l’aide.
///
/// La virgule n’y figure pas : c’est un séparateur de milliers.
pub const SYMBOLES: &[char] = &['+', '-', '*', '/', '%', '^', '=', '.', '?'];

/// Ligne de commentaire : ignorée entièrement.
pub fn est_commentaire(ligne: &str) -> bool {
    ligne.trim_start().starts_with('#')
}

/// Retire tout ce qui n’est ni lettre, ni chiffre, ni espace, ni SYMBOLES.
pub fn nettoyer(ligne: &str) -> String {
    ligne
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || SYMBOLES.contains(c))
        .collect()
}

pub fn decouper(ligne: &str) -> Vec<String> {
    nettoyer(ligne)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jetons séparés par « | », pour la journalisation.
pub fn format_jetons(jetons: &[String]) -> String {
    jetons.join(" | ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Litteral<'a> {
    Entier { chiffres: &'a str, radix: u32 },
    Decimal(&'a str),
}

fn classer(jeton: &str) -> Litteral<'_> {
    let octets = jeton.as_bytes();
    match octets {
        [b'0', b'b' | b'B', ..] => Litteral::Entier {
            chiffres: &jeton[2..],
            radix: 2,
        },
        [b'0', b'x' | b'X', ..] => Litteral::Entier {
            chiffres: &jeton[2..],
            radix: 16,
        },
        // « 0 » seul est l’octal 0; « 0.5 » reste décimal
        [b'0', suite @ ..] if suite.first() != Some(&b'.') => Litteral::Entier {
            chiffres: jeton,
            radix: 8,
        },
        [b'o', suite @ ..] if suite.first() != Some(&b'.') => Litteral::Entier {
            chiffres: &jeton[1..],
            radix: 8,
        },
        _ => Litteral::Decimal(jeton),
    }
}

/// Lit un littéral numérique.
///
/// Erreurs :
/// - Syntaxe : ni nombre, ni préfixe reconnu
/// - Intervalle : entier préfixé au-delà de 2^64 - 1
pub fn lire_nombre(jeton: &str, ctx: &ContexteArith) -> Resultat<Decimal> {
    match classer(jeton) {
        Litteral::Entier { chiffres, radix } => {
            if chiffres.is_empty() || !chiffres.chars().all(|c| c.is_digit(radix)) {
                return Err(Erreur::Syntaxe(jeton.to_string()));
            }
            match u64::from_str_radix(chiffres, radix) {
                Ok(n) => Ok(Decimal::depuis_u64(n)),
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(Erreur::intervalle(
                    format!("{jeton} dépasse 2^64 - 1"),
                )),
                Err(_) => Err(Erreur::Syntaxe(jeton.to_string())),
            }
        }
        Litteral::Decimal(texte) => ctx
            .lire(texte)
            .ok_or_else(|| Erreur::Syntaxe(jeton.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lire(j: &str) -> Resultat<String> {
        lire_nombre(j, &ContexteArith::default()).map(|d| d.to_string())
    }

    #[test]
    fn nettoyage_monnaie() {
        assert_eq!(decouper("$2,500.00 €3,500.00 +"), vec!["2500.00", "3500.00", "+"]);
        assert_eq!(decouper("  1   2\t+ "), vec!["1", "2", "+"]);
        assert_eq!(nettoyer("(3)!"), "3");
        assert_eq!(decouper("?"), vec!["?"]);
    }

    #[test]
    fn commentaires() {
        assert!(est_commentaire("# 1 2 +"));
        assert!(est_commentaire("   #rien"));
        assert!(!est_commentaire("1 # 2"));
    }

    #[test]
    fn prefixes() {
        assert_eq!(lire("0b00100010").unwrap(), "34");
        assert_eq!(lire("0B01000100").unwrap(), "68");
        assert_eq!(lire("015").unwrap(), "13");
        assert_eq!(lire("o20").unwrap(), "16");
        assert_eq!(lire("0x1000").unwrap(), "4096");
        assert_eq!(lire("0XfF").unwrap(), "255");
        assert_eq!(lire("0").unwrap(), "0");
    }

    #[test]
    fn decimaux() {
        assert_eq!(lire("0.5").unwrap(), "0.5");
        assert_eq!(lire("-12.25").unwrap(), "-12.25");
        assert_eq!(lire("6.02214076e23").unwrap(), "602214076000000000000000");
        assert_eq!(lire("o.5"), Err(Erreur::Syntaxe("o.5".into())));
    }

    #[test]
    fn erreurs() {
        assert!(matches!(lire("foobar"), Err(Erreur::Syntaxe(_))));
        assert!(matches!(lire("0b102"), Err(Erreur::Syntaxe(_))));
        assert!(matches!(lire("089"), Err(Erreur::Syntaxe(_))));
        assert!(matches!(lire("0x"), Err(Erreur::Syntaxe(_))));
        assert!(matches!(lire("0x+5"), Err(Erreur::Syntaxe(_))));
        assert!(matches!(
            lire("0x10000000000000000"),
            Err(Erreur::Intervalle(_))
        ));
    }

    #[test]
    fn jetons_formates() {
        let j = decouper("1 2 +");
        assert_eq!(format_jetons(&j), "1 | 2 | +");
    }
}
