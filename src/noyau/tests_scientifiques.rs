//! Tests scientifiques (campagne) : une seule calculatrice, pile continue d’une
//! ligne à l’autre, comme en session interactive.
//!
//! Chaque ligne est comparée au sommet attendu après arrondi à `chiffres`
//! chiffres significatifs (32 par défaut : deux de marge sur la précision, les
//! fonctions transcendantes pouvant différer d’une unité au dernier rang).
//! Une ligne en erreur doit laisser la pile exactement dans son état d’avant.

use super::contexte::{Angle, Base, Contexte};
use super::decimal::{ContexteArith, Decimal};
use super::erreur::Erreur;
use super::eval::Calculatrice;

const CHIFFRES_TEST: usize = 32;

struct Cas {
    entree: &'static str,
    /// None : la ligne doit échouer.
    attendu: Option<&'static str>,
    chiffres: usize,
}

fn ok(entree: &'static str, attendu: &'static str) -> Cas {
    Cas {
        entree,
        attendu: Some(attendu),
        chiffres: CHIFFRES_TEST,
    }
}

fn ok34(entree: &'static str, attendu: &'static str) -> Cas {
    Cas {
        chiffres: 34,
        ..ok(entree, attendu)
    }
}

fn echec(entree: &'static str) -> Cas {
    Cas {
        entree,
        attendu: None,
        chiffres: CHIFFRES_TEST,
    }
}

fn arrondi(v: &Decimal, chiffres: usize) -> Decimal {
    let ctx = ContexteArith {
        precision: chiffres,
        ..ContexteArith::default()
    };
    match v.parties() {
        Some((coef, exp)) => ctx.arrondir(coef.clone(), exp, false),
        None => v.clone(),
    }
}

fn derouler(calc: &mut Calculatrice, cas: &[Cas]) {
    let lecteur = ContexteArith::default();
    for c in cas {
        let avant = calc.pile().clone();
        let res = calc.evaluer(c.entree);
        let sommet = calc.pile().sommet();

        let Some(attendu) = c.attendu else {
            assert!(res.is_err(), "entrée {:?} : erreur attendue", c.entree);
            assert_eq!(calc.pile().valeurs(), avant.valeurs(), "entrée {:?}", c.entree);
            continue;
        };
        if let Err(e) = res {
            panic!("entrée {:?} : erreur inattendue {e}", c.entree);
        }

        match lecteur.lire(attendu) {
            Some(v) => assert_eq!(
                arrondi(&sommet, c.chiffres),
                arrondi(&v, c.chiffres),
                "entrée {:?} : attendu {attendu}, obtenu {sommet}",
                c.entree
            ),
            None => assert_eq!(sommet.to_string(), attendu, "entrée {:?}", c.entree),
        }
    }
}

/* ------------------------ Campagne principale ------------------------ */

#[test]
fn sci_pile_continue() {
    let cas = [
        // Opérations de base
        ok("1 2 +", "3"),
        ok("4 5 8 + + +", "20"),
        ok("5 -", "15"),
        ok("3 /", "5"),
        ok("3.5 *", "17.5"),
        ok("2 *", "35"),
        ok("chs", "-35"),
        ok34("inv", "-0.02857142857142857142857142857142857"),
        ok34("inv", "-35"),
        ok("chs", "35"),
        ok("3 ^", "42875"),
        ok("10 mod", "5"),
        ok("fac", "120"),
        ok("10 %", "12"),
        ok("2 ^", "144"),
        ok("sqr", "12"),
        ok("3 ^", "1728"),
        ok("cbr", "12"),
        ok("c 1 2 3 4 sum", "10"),
        ok("c 1 2 x", "1"),
        ok("x", "2"),
        ok("c", "0"),
        ok("0.25 4 *", "1"),
        ok(".2 5 *", "1"),
        ok("$2,500.00 €3,500.00 +", "6000"),
        ok34("2 12345 ^", "1.641710106882582163560207416639065e3716"),
        ok34("10 6144 ^", "1e6144"),
        ok("10 6145 ^", "Infinity"),
        ok34("10 34 ^ 1 -", "9999999999999999999999999999999999"),
        ok("c", "0"),
        // une ligne invalide ne touche pas la pile
        echec("foobar"),
        ok("", "0"),
        // Trigonométrie
        ok("deg 90 sin", "1"),
        ok("rad 90 PI * 180 / sin", "1"),
        ok("deg 0 cos", "1"),
        ok("rad 60 PI * 180 / cos", "0.5"),
        ok("deg 30 tan", "0.5773502691896257645091487805019575"),
        ok("rad 60 PI * 180 / tan", "1.732050807568877293527446341505872"),
        ok("deg -1 asin", "-90"),
        ok("rad -1 asin", "-1.570796326794896619231321691639751"),
        ok("rad 0 acos", "1.570796326794896619231321691639751"),
        ok("rad 1 acos", "0"),
        ok("deg 0.5 acos", "60"),
        ok("rad 3 sqr atan", "1.047197551196597746154214461093168"),
        ok("deg 1 atan", "45"),
        ok("deg 90 tan", "NaN"),
        ok("rad", "NaN"),
        // Logarithmes
        ok("c E ln", "1"),
        ok("c 1000 log", "3"),
        ok("1024 log2", "10"),
        ok("0 ln", "-Infinity"),
        ok("c", "0"),
        // Opérations binaires et littéraux préfixés
        ok("0x00ff 0xff00 or", "65535"),
        ok("0x0ff0 and", "4080"),
        ok("0x1ee1 xor", "4369"),
        ok("1 lshift", "8738"),
        ok("1 lshift", "17476"),
        ok("2 rshift", "4369"),
        ok("0b00100010 0B01000100 015 o20 0x1000 0x2000 + + + + +", "12419"),
        ok("d d", "0"),
        echec("-1 1 and"),
        echec("0x10000000000000000"),
        // Divers
        ok("212 f2c", "100"),
        ok("c2f", "212"),
        ok("-40 f2c", "-40"),
        ok("-10 c2f", "14"),
        ok("0 c2f", "32"),
        ok("c", "0"),
        ok("1 dup dup sum", "3"),
        ok("c", "0"),
        // Erreurs arithmétiques et pile insuffisante
        ok("5", "5"),
        echec("-1 fac"),
        ok("-1", "-1"),
        echec("fac"),
        ok("d", "5"),
        echec("2.5 fac"),
        echec("1 2 + 3 4 + + +"),
        echec("35 fmt"),
        ok("1 0 /", "Infinity"),
        ok("c 0 0 /", "NaN"),
        ok("c -1 0 /", "-Infinity"),
        ok("c 7 0 mod", "NaN"),
        ok("c", "0"),
    ];

    let mut calc = Calculatrice::default();
    derouler(&mut calc, &cas);
}

/* ------------------------ Division piégée ------------------------ */

#[test]
fn sci_division_piegee() {
    let mut ctx = Contexte::default();
    ctx.arith.pieger_division = true;
    let mut calc = Calculatrice::new(ctx);

    derouler(&mut calc, &[ok("10 4 /", "2.5"), echec("1 0 /"), echec("0 0 /"), echec("inv 0 inv")]);
    assert!(matches!(calc.evaluer("0 inv"), Err(Erreur::Arithmetique(_))));
    assert_eq!(calc.pile().len(), 1);
}

/* ------------------------ Affichage selon le mode ------------------------ */

#[test]
fn sci_affichage_des_modes() {
    let mut calc = Calculatrice::default();
    let lignes = [
        ("255", "255"),
        ("hex", "0xff"),
        ("0.5 +", "0xff (truncated from 255.5)"),
        ("oct", "0377 (truncated from 255.5)"),
        ("chs", "-0377 (truncated from -255.5)"),
        ("bin chs 0.5 -", "0b11111111"),
        ("dec 1000 *", "255000 (255,000)"),
        ("2 64 ^ hex", "Invalid number: non decimal base only supports uint64 numbers."),
        ("dec 4 fmt 2 3 /", "0.6667"),
        ("c 16 fmt 2 3 /", "0.6666666666666667"),
    ];
    for (entree, attendu) in lignes {
        calc.evaluer(entree)
            .unwrap_or_else(|e| panic!("entrée {entree:?} : {e}"));
        assert_eq!(calc.afficher_sommet(), attendu, "entrée {entree:?}");
    }
}

#[test]
fn sci_modes_exclusifs() {
    let mut calc = Calculatrice::default();
    calc.evaluer("hex deg").unwrap();
    assert_eq!(calc.contexte().base, Base::Decimale);
    assert_eq!(calc.contexte().angle, Angle::Degres);
    assert_eq!(calc.invite(), "deg> ");
    calc.evaluer("bin").unwrap();
    assert_eq!(calc.contexte().angle, Angle::Radians);
    assert_eq!(calc.invite(), "bin> ");
}

/* ------------------------ Limites contrôlées ------------------------ */

#[test]
fn sci_grandes_valeurs_sans_gel() {
    let mut calc = Calculatrice::default();
    derouler(
        &mut calc,
        &[
            ok("2 1234567890 ^", "Infinity"),
            ok("c 10 -6200 ^", "0"),
            ok("c 3001 fac", "Infinity"),
            ok34("c 1e-6100 sqr", "1e-3050"),
            ok("c 1e30 exp", "Infinity"),
            ok("c -1e30 exp", "0"),
            ok("c", "0"),
        ],
    );
}
