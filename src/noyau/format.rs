// src/noyau/format.rs
//
// Affichage des nombres.
// - Base 10 : arrondi demi-pair à `decimales`, zéros finals retirés,
//   puis forme groupée « (1,234.5) » si elle diffère
// - Bases 2/8/16 : partie entière de |x| sur 64 bits, signe à part,
//   « (truncated from …) » quand x n’est pas entier
// - NaN / ±Infinity : tels quels, quelle que soit la base

use super::contexte::{Base, Contexte};
use super::decimal::{Decimal, Sens};

/// Réponse en base non décimale quand |x| ne tient pas sur 64 bits.
pub const HORS_64_BITS: &str = "Invalid number: non decimal base only supports uint64 numbers.";

/* ------------------------ Formatage principal ------------------------ */

pub fn formater(v: &Decimal, base: Base, decimales: usize, groupage: bool) -> String {
    if !v.est_fini() {
        return v.to_string();
    }
    let propre = texte_decimal(v, decimales);

    if base == Base::Decimale {
        if !groupage {
            return propre;
        }
        let groupe = grouper(&propre);
        return if groupe != propre {
            format!("{propre} ({groupe})")
        } else {
            propre
        };
    }

    let entier = v.abs().partie_entiere(Sens::Plancher);
    let n = match entier.vers_u64() {
        Ok((n, _)) => n,
        Err(_) => return HORS_64_BITS.to_string(),
    };
    let chiffres = match base {
        Base::Binaire => format!("{n:b}"),
        Base::Octale => format!("{n:o}"),
        Base::Hexadecimale => format!("{n:x}"),
        Base::Decimale => n.to_string(),
    };
    let signe = if v.est_negatif() { "-" } else { "" };
    let mut sortie = format!("{signe}{}{chiffres}", base.prefixe());
    if !v.est_entier() {
        sortie.push_str(&format!(" (truncated from {propre})"));
    }
    sortie
}

/// Raccourci : formatage selon le contexte courant.
pub fn formater_ctx(v: &Decimal, ctx: &Contexte) -> String {
    formater(v, ctx.base, ctx.decimales, ctx.groupage)
}

/// Notation fixe, `decimales` au plus, sans zéro final.
fn texte_decimal(v: &Decimal, decimales: usize) -> String {
    v.quantifier(-(decimales as i64)).to_string()
}

/// Séparateur de milliers sur la partie entière seulement.
fn grouper(propre: &str) -> String {
    let (signe, corps) = match propre.strip_prefix('-') {
        Some(c) => ("-", c),
        None => ("", propre),
    };
    let (entier, frac) = match corps.split_once('.') {
        Some((e, f)) => (e, Some(f)),
        None => (corps, None),
    };

    let tete = entier.len() % 3;
    let mut groupes: Vec<&str> = Vec::new();
    if tete > 0 {
        groupes.push(&entier[..tete]);
    }
    for i in (tete..entier.len()).step_by(3) {
        groupes.push(&entier[i..i + 3]);
    }

    let mut sortie = format!("{signe}{}", groupes.join(","));
    if let Some(f) = frac {
        sortie.push('.');
        sortie.push_str(f);
    }
    sortie
}

/* ------------------------ Pile ------------------------ */

/// Lignes de la commande `p` : la pile du fond vers le sommet (x en dernier).
///
/// `depuis_sommet` est la pile vue depuis le sommet (x, y, z…).
pub fn lignes_pile(depuis_sommet: &[Decimal], ctx: &Contexte) -> Vec<String> {
    let mut lignes = vec!["===== Pile =====".to_string()];
    for (i, v) in depuis_sommet.iter().enumerate().rev() {
        let nom = match i {
            0 => " x".to_string(),
            1 => " y".to_string(),
            n => format!("{n:2}"),
        };
        lignes.push(format!("{nom}: {}", formater_ctx(v, ctx)));
    }
    lignes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::decimal::ContexteArith;
    use pretty_assertions::assert_eq;

    fn ctx() -> ContexteArith {
        ContexteArith::default()
    }

    fn d(s: &str) -> Decimal {
        ctx().lire(s).unwrap()
    }

    fn dec6(v: &Decimal) -> String {
        formater(v, Base::Decimale, 6, true)
    }

    #[test]
    fn base_dix() {
        assert_eq!(dec6(&d("0")), "0");
        assert_eq!(dec6(&d("999")), "999");
        assert_eq!(dec6(&d("1000")), "1000 (1,000)");
        assert_eq!(dec6(&d("10000.333333")), "10000.333333 (10,000.333333)");
        assert_eq!(dec6(&d("-1234567.5")), "-1234567.5 (-1,234,567.5)");
        let c = ctx();
        let q = c.diviser(&d("567"), &d("999")).unwrap();
        assert_eq!(dec6(&q), "0.567568");
    }

    #[test]
    fn grands_nombres() {
        let c = ctx();
        let v = c.puissance(&d("2"), &d("64")).unwrap();
        assert_eq!(
            dec6(&v),
            "18446744073709551616 (18,446,744,073,709,551,616)"
        );
        let inf = c.puissance(&d("2"), &d("1234567890")).unwrap();
        assert_eq!(dec6(&inf), "Infinity");
    }

    #[test]
    fn sentinelles() {
        let c = ctx();
        assert_eq!(dec6(&c.diviser(&d("0"), &d("0")).unwrap()), "NaN");
        assert_eq!(dec6(&c.diviser(&d("-1"), &d("0")).unwrap()), "-Infinity");
        assert_eq!(formater(&Decimal::NaN, Base::Hexadecimale, 6, true), "NaN");
    }

    #[test]
    fn sans_groupage() {
        assert_eq!(formater(&d("1000"), Base::Decimale, 6, false), "1000");
    }

    #[test]
    fn zero_decimale() {
        assert_eq!(formater(&d("2.5"), Base::Decimale, 0, true), "2");
        assert_eq!(formater(&d("1.25"), Base::Decimale, 1, true), "1.2");
    }

    #[test]
    fn autres_bases() {
        assert_eq!(formater(&d("255"), Base::Binaire, 6, true), "0b11111111");
        assert_eq!(
            formater(&d("255.5"), Base::Binaire, 6, true),
            "0b11111111 (truncated from 255.5)"
        );
        assert_eq!(
            formater(&d("-255.5"), Base::Binaire, 6, true),
            "-0b11111111 (truncated from -255.5)"
        );
        assert_eq!(formater(&d("255"), Base::Octale, 6, true), "0377");
        assert_eq!(formater(&d("255"), Base::Hexadecimale, 6, true), "0xff");
        assert_eq!(
            formater(&d("1e30"), Base::Hexadecimale, 6, true),
            HORS_64_BITS
        );
    }

    #[test]
    fn pile_affichee() {
        let c = Contexte::default();
        let lignes = lignes_pile(&[d("3"), d("2"), d("1")], &c);
        assert_eq!(lignes, vec!["===== Pile =====", " 2: 1", " y: 2", " x: 3"]);
    }
}
