//! Tests de propriétés (proptest) sur le répartiteur et l’affichage.

use proptest::prelude::*;

use super::contexte::Base;
use super::decimal::{ContexteArith, Decimal};
use super::eval::Calculatrice;
use super::format::formater;
use super::jetons::lire_nombre;

#[derive(Clone, Debug)]
enum Pas {
    Nombre(i64),
    Op(&'static str),
}

impl Pas {
    fn jeton(&self) -> String {
        match self {
            Pas::Nombre(n) => n.to_string(),
            Pas::Op(o) => (*o).to_string(),
        }
    }
}

fn pas() -> impl Strategy<Value = Pas> {
    prop_oneof![
        3 => (-99i64..100).prop_map(Pas::Nombre),
        1 => prop::sample::select(vec!["+", "-", "*"]).prop_map(Pas::Op),
    ]
}

/// Simulation à la main : une ligne par pas, une erreur n’annule que son pas.
fn simuler(pas: &[Pas]) -> Vec<String> {
    let mut pile: Vec<i128> = Vec::new();
    for p in pas {
        match p {
            Pas::Nombre(n) => pile.push(*n as i128),
            Pas::Op(o) => {
                if pile.len() < 2 {
                    continue;
                }
                let x = pile.pop().unwrap_or_default();
                let y = pile.pop().unwrap_or_default();
                pile.push(match *o {
                    "+" => y + x,
                    "-" => y - x,
                    _ => y * x,
                });
            }
        }
    }
    pile.iter().map(|v| v.to_string()).collect()
}

fn contenu(calc: &Calculatrice) -> Vec<String> {
    calc.pile().valeurs().iter().map(|v| v.to_string()).collect()
}

proptest! {
    /// Un entier 64 bits affiché en base 2, 8 ou 16 se relit à l’identique.
    #[test]
    fn prop_aller_retour_bases(n in any::<u64>()) {
        let ctx = ContexteArith::default();
        let v = Decimal::depuis_u64(n);
        for base in [Base::Binaire, Base::Octale, Base::Hexadecimale] {
            let texte = formater(&v, base, 16, true);
            let relu = lire_nombre(&texte, &ctx);
            prop_assert_eq!(relu, Ok(v.clone()), "base {} : {}", base, texte);
        }
    }

    /// Une ligne qui échoue laisse la pile exactement comme avant.
    #[test]
    fn prop_restauration_apres_erreur(
        depart in prop::collection::vec(pas(), 0..12),
        ligne in prop::collection::vec(pas(), 0..12),
    ) {
        let mut calc = Calculatrice::default();
        for p in &depart {
            let _ = calc.evaluer(&p.jeton());
        }
        let avant = contenu(&calc);

        let mut jetons: Vec<String> = ligne.iter().map(Pas::jeton).collect();
        jetons.push("foobar".to_string());
        prop_assert!(calc.evaluer(&jetons.join(" ")).is_err());
        prop_assert_eq!(contenu(&calc), avant);
    }

    /// Rejouer les mêmes pas donne la même pile que la simulation entière.
    #[test]
    fn prop_rejeu_deterministe(sequence in prop::collection::vec(pas(), 0..16)) {
        let mut calc = Calculatrice::default();
        for p in &sequence {
            let _ = calc.evaluer(&p.jeton());
        }
        prop_assert_eq!(contenu(&calc), simuler(&sequence));
    }

    /// Les opérateurs binaires s’appliquent à (y, x) dans cet ordre.
    #[test]
    fn prop_ordre_y_x(y in -10_000i64..10_000, x in 1i64..10_000) {
        let ctx = ContexteArith::default();
        let (dy, dx) = (Decimal::depuis_i64(y), Decimal::depuis_i64(x));
        let cas = [
            ("-", ctx.soustraire(&dy, &dx)),
            ("/", ctx.diviser(&dy, &dx).unwrap_or_default()),
            ("mod", Decimal::depuis_i64(y.rem_euclid(x))),
            ("rem", Decimal::depuis_i64(y % x)),
        ];
        for (op, attendu) in cas {
            let mut calc = Calculatrice::default();
            calc.evaluer(&format!("{y} {x} {op}")).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(calc.pile().sommet(), attendu, "{} {} {}", y, x, op);
        }
    }

    /// La forme groupée ne diffère de la forme simple que par les virgules.
    #[test]
    fn prop_groupage_sans_perte(n in any::<i64>(), decimales in 0usize..6) {
        let v = Decimal::depuis_parties(n, -3);
        let simple = formater(&v, Base::Decimale, decimales, false);
        let complet = formater(&v, Base::Decimale, decimales, true);
        if let Some((tete, groupe)) = complet.split_once(" (") {
            prop_assert_eq!(tete, simple.as_str());
            prop_assert_eq!(groupe.trim_end_matches(')').replace(',', ""), simple);
        } else {
            prop_assert_eq!(complet, simple);
        }
    }
}
