// src/noyau/operations.rs
//
// Registre des opérations : une seule liste ordonnée sert
// - à construire la table de dispatch (entrées Operation)
// - à rendre l’aide (entrées Operation + Annotation, dans l’ordre)
//
// Contrat d’un handler : il reçoit la pile entière vue depuis le sommet
// (a[0] = x, a[1] = y, …), au moins `arite` éléments garantis, et décrit
// son effet (valeurs à empiler, nombre de cellules consommées, messages).
// Il ne touche jamais la pile lui-même.

use std::collections::HashMap;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use super::contexte::{Angle, Base, Contexte, DECIMALES_MAX};
use super::decimal::{ContexteArith, Decimal, Sens};
use super::erreur::{Erreur, Resultat};
use super::format::{formater_ctx, lignes_pile};
use super::trig::{trig, trig_inverse, TrigFn, TrigInv};

pub type Fonction = fn(&mut Contexte, &[Decimal]) -> Resultat<Effet>;

#[derive(Clone, Copy)]
pub struct Operation {
    pub nom: &'static str,
    pub description: &'static str,
    pub arite: usize,
    /// Reçoit toute la pile (sum, c, p, =) au lieu de ses `arite` sommets.
    pub pile_entiere: bool,
    pub fonction: Fonction,
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("nom", &self.nom)
            .field("arite", &self.arite)
            .field("pile_entiere", &self.pile_entiere)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub texte: &'static str,
    pub gras: bool,
}

#[derive(Clone, Copy, Debug)]
pub enum Entree {
    Operation(Operation),
    Annotation(Annotation),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effet {
    /// Empilées dans l’ordre (la dernière devient x).
    pub valeurs: Vec<Decimal>,
    pub consommes: usize,
    /// Lignes à afficher (pile, débogage, notes de troncature).
    pub messages: Vec<String>,
}

impl Effet {
    pub fn remplace(consommes: usize, valeur: Decimal) -> Self {
        Self {
            valeurs: vec![valeur],
            consommes,
            messages: Vec::new(),
        }
    }

    pub fn empile(valeur: Decimal) -> Self {
        Self::remplace(0, valeur)
    }

    pub fn consomme(n: usize) -> Self {
        Self {
            consommes: n,
            ..Self::default()
        }
    }

    pub fn message(lignes: impl IntoIterator<Item = String>) -> Self {
        Self {
            messages: lignes.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Modifie l’état d’affichage sans toucher la pile.
    pub fn neutre() -> Self {
        Self::default()
    }
}

/* ------------------------ Constructeurs du registre ------------------------ */

fn op(nom: &'static str, description: &'static str, arite: usize, fonction: Fonction) -> Entree {
    Entree::Operation(Operation {
        nom,
        description,
        arite,
        pile_entiere: false,
        fonction,
    })
}

fn op_pile(nom: &'static str, description: &'static str, arite: usize, fonction: Fonction) -> Entree {
    Entree::Operation(Operation {
        nom,
        description,
        arite,
        pile_entiere: true,
        fonction,
    })
}

fn titre(texte: &'static str) -> Entree {
    Entree::Annotation(Annotation { texte, gras: true })
}

fn texte(texte: &'static str) -> Entree {
    Entree::Annotation(Annotation { texte, gras: false })
}

/* ------------------------ Registre ------------------------ */

pub fn registre() -> Vec<Entree> {
    vec![
        titre(concat!(
            "Aide en ligne de ",
            env!("CARGO_PKG_NAME"),
            " ",
            env!("CARGO_PKG_VERSION")
        )),
        texte("Notation polonaise inverse : les opérandes d’abord, puis l’opération."),
        texte("x désigne le sommet de la pile, y l’élément juste en dessous."),
        texte("Nombres : 0b… binaire, 0… ou o… octal, 0x… hexadécimal, sinon décimal."),
        texte(""),
        titre("Opérations de base"),
        op("+", "Additionne x et y", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.additionner(&a[1], &a[0])))
        }),
        op("-", "Soustrait x de y", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.soustraire(&a[1], &a[0])))
        }),
        op("*", "Multiplie x et y", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.multiplier(&a[1], &a[0])))
        }),
        op("/", "Divise y par x", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.diviser(&a[1], &a[0])?))
        }),
        op("chs", "Change le signe de x", 1, |_, a| {
            Ok(Effet::remplace(1, a[0].oppose()))
        }),
        op("inv", "Inverse de x (1/x)", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.diviser(&Decimal::un(), &a[0])?))
        }),
        op("^", "y puissance x", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.puissance(&a[1], &a[0])?))
        }),
        op("mod", "y modulo x (signe de x)", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.modulo(&a[1], &a[0])?))
        }),
        op("rem", "Reste de y / x (signe de y)", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.reste(&a[1], &a[0])?))
        }),
        op("%", "x pour cent de y", 2, |c, a| {
            Ok(Effet::remplace(2, c.arith.pourcentage(&a[1], &a[0])))
        }),
        op("sqr", "Racine carrée de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.racine_carree(&a[0])))
        }),
        op("cbr", "Racine cubique de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.racine_cubique(&a[0])))
        }),
        op_pile("sum", "Somme de toute la pile", 1, |c, a| {
            let somme = a
                .iter()
                .fold(Decimal::zero(), |acc, v| c.arith.additionner(&acc, v));
            Ok(Effet::remplace(a.len(), somme))
        }),
        op("fac", "Factorielle de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.factorielle(&a[0])?))
        }),
        op("floor", "Partie entière inférieure de x", 1, |_, a| {
            Ok(Effet::remplace(1, a[0].partie_entiere(Sens::Plancher)))
        }),
        op("ceil", "Partie entière supérieure de x", 1, |_, a| {
            Ok(Effet::remplace(1, a[0].partie_entiere(Sens::Plafond)))
        }),
        op("abs", "Valeur absolue de x", 1, |_, a| {
            Ok(Effet::remplace(1, a[0].abs()))
        }),
        texte(""),
        titre("Logarithmes"),
        op("ln", "Logarithme népérien de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.ln(&a[0])))
        }),
        op("log", "Logarithme décimal de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.log10(&a[0])))
        }),
        op("log2", "Logarithme en base 2 de x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.log2(&a[0])))
        }),
        op("exp", "e puissance x", 1, |c, a| {
            Ok(Effet::remplace(1, c.arith.exp(&a[0])))
        }),
        texte(""),
        titre("Opérations binaires (entiers non signés 64 bits)"),
        op("and", "y ET x", 2, |_, a| binaire(a, |y, x| y & x)),
        op("or", "y OU x", 2, |_, a| binaire(a, |y, x| y | x)),
        op("xor", "y OU EXCLUSIF x", 2, |_, a| binaire(a, |y, x| y ^ x)),
        op("lshift", "Décale y de x bits vers la gauche", 2, |_, a| {
            binaire(a, |y, x| if x >= 64 { 0 } else { y << x })
        }),
        op("rshift", "Décale y de x bits vers la droite", 2, |_, a| {
            binaire(a, |y, x| if x >= 64 { 0 } else { y >> x })
        }),
        op("not", "NON binaire de x", 1, |_, a| {
            let mut notes = Vec::new();
            let x = entier_64(&a[0], &mut notes)?;
            Ok(Effet {
                messages: notes,
                ..Effet::remplace(1, Decimal::depuis_u64(!x))
            })
        }),
        texte(""),
        titre("Trigonométrie (selon le mode deg / rad)"),
        op("sin", "Sinus de x", 1, |c, a| {
            Ok(Effet::remplace(1, trig(TrigFn::Sin, &a[0], c.angle, &c.arith)))
        }),
        op("cos", "Cosinus de x", 1, |c, a| {
            Ok(Effet::remplace(1, trig(TrigFn::Cos, &a[0], c.angle, &c.arith)))
        }),
        op("tan", "Tangente de x", 1, |c, a| {
            Ok(Effet::remplace(1, trig(TrigFn::Tan, &a[0], c.angle, &c.arith)))
        }),
        op("asin", "Arc sinus de x", 1, |c, a| {
            Ok(Effet::remplace(
                1,
                trig_inverse(TrigInv::Asin, &a[0], c.angle, &c.arith),
            ))
        }),
        op("acos", "Arc cosinus de x", 1, |c, a| {
            Ok(Effet::remplace(
                1,
                trig_inverse(TrigInv::Acos, &a[0], c.angle, &c.arith),
            ))
        }),
        op("atan", "Arc tangente de x", 1, |c, a| {
            Ok(Effet::remplace(
                1,
                trig_inverse(TrigInv::Atan, &a[0], c.angle, &c.arith),
            ))
        }),
        texte(""),
        titre("Divers"),
        op("f2c", "Fahrenheit vers Celsius", 1, |c, a| {
            Ok(Effet::remplace(1, fahrenheit_vers_celsius(&c.arith, &a[0])))
        }),
        op("c2f", "Celsius vers Fahrenheit", 1, |c, a| {
            Ok(Effet::remplace(1, celsius_vers_fahrenheit(&c.arith, &a[0])))
        }),
        texte(""),
        titre("Pile"),
        op_pile("p", "Affiche la pile", 0, |c, a| {
            Ok(Effet::message(lignes_pile(a, c)))
        }),
        op_pile("c", "Vide la pile", 0, |_, a| Ok(Effet::consomme(a.len()))),
        op_pile("=", "Affiche x", 0, |c, a| {
            let x = a.first().cloned().unwrap_or_default();
            Ok(Effet::message([format!("= {}", formater_ctx(&x, c))]))
        }),
        op("d", "Retire x de la pile", 1, |_, _| Ok(Effet::consomme(1))),
        op("x", "Échange x et y", 2, |_, a| {
            Ok(Effet {
                valeurs: vec![a[0].clone(), a[1].clone()],
                consommes: 2,
                messages: Vec::new(),
            })
        }),
        op("dup", "Duplique x", 1, |_, a| {
            Ok(Effet {
                valeurs: vec![a[0].clone(), a[0].clone()],
                consommes: 1,
                messages: Vec::new(),
            })
        }),
        texte(""),
        titre("Constantes"),
        op("PI", "π", 0, |c, _| Ok(Effet::empile(c.arith.pi()))),
        op("E", "Nombre d’Euler (e)", 0, |c, _| {
            Ok(Effet::empile(c.arith.e()))
        }),
        op("C", "Vitesse de la lumière (m/s)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_u64(299_792_458)))
        }),
        op("MOL", "Constante d’Avogadro", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_parties(602_214_076, 15)))
        }),
        op("KB", "Kilo (10^3)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_parties(1, 3)))
        }),
        op("MB", "Méga (10^6)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_parties(1, 6)))
        }),
        op("GB", "Giga (10^9)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_parties(1, 9)))
        }),
        op("TB", "Téra (10^12)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_parties(1, 12)))
        }),
        op("KIB", "Kibi (2^10)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_u64(1 << 10)))
        }),
        op("MIB", "Mébi (2^20)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_u64(1 << 20)))
        }),
        op("GIB", "Gibi (2^30)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_u64(1 << 30)))
        }),
        op("TIB", "Tébi (2^40)", 0, |_, _| {
            Ok(Effet::empile(Decimal::depuis_u64(1 << 40)))
        }),
        texte(""),
        titre("Affichage"),
        op("dec", "Affichage en base 10", 0, |c, _| {
            c.choisir_base(Base::Decimale);
            Ok(Effet::neutre())
        }),
        op("bin", "Affichage en base 2", 0, |c, _| {
            c.choisir_base(Base::Binaire);
            Ok(Effet::neutre())
        }),
        op("oct", "Affichage en base 8", 0, |c, _| {
            c.choisir_base(Base::Octale);
            Ok(Effet::neutre())
        }),
        op("hex", "Affichage en base 16", 0, |c, _| {
            c.choisir_base(Base::Hexadecimale);
            Ok(Effet::neutre())
        }),
        op("deg", "Angles en degrés", 0, |c, _| {
            c.choisir_angle(Angle::Degres);
            Ok(Effet::neutre())
        }),
        op("rad", "Angles en radians", 0, |c, _| {
            c.choisir_angle(Angle::Radians);
            Ok(Effet::neutre())
        }),
        op("fmt", "Nombre de décimales affichées (x)", 1, |c, a| {
            let n = a[0]
                .vers_i64()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n <= DECIMALES_MAX)
                .ok_or_else(|| {
                    Erreur::arithmetique(format!(
                        "fmt : entier entre 0 et {DECIMALES_MAX} attendu (reçu {})",
                        a[0]
                    ))
                })?;
            c.choisir_decimales(n);
            Ok(Effet::consomme(1))
        }),
        op("debug", "Bascule le mode débogage", 0, |c, _| {
            let etat = if c.basculer_debug() {
                "activé"
            } else {
                "désactivé"
            };
            Ok(Effet::message([format!("Débogage {etat}")]))
        }),
        texte(""),
        titre("Commandes"),
        texte("  - help, h, ?: cette aide"),
        texte("  - quit, exit, q: quitter"),
    ]
}

/// Table de dispatch : les entrées Operation, par nom.
pub fn table(registre: &[Entree]) -> HashMap<&'static str, Operation> {
    registre
        .iter()
        .filter_map(|e| match e {
            Entree::Operation(op) => Some((op.nom, *op)),
            Entree::Annotation(_) => None,
        })
        .collect()
}

/* ------------------------ Outils des handlers ------------------------ */

/// Entier 64 bits d’un opérande binaire; la troncature ajoute une note.
fn entier_64(v: &Decimal, notes: &mut Vec<String>) -> Resultat<u64> {
    let (n, tronque) = v.vers_u64()?;
    if tronque {
        notes.push(format!("note : {v} tronqué en {n}"));
    }
    Ok(n)
}

fn binaire(a: &[Decimal], f: fn(u64, u64) -> u64) -> Resultat<Effet> {
    let mut notes = Vec::new();
    let y = entier_64(&a[1], &mut notes)?;
    let x = entier_64(&a[0], &mut notes)?;
    Ok(Effet {
        messages: notes,
        ..Effet::remplace(2, Decimal::depuis_u64(f(y, x)))
    })
}

/// (F - 32) × 5/9, calculé exactement puis arrondi une fois.
fn fahrenheit_vers_celsius(ctx: &ContexteArith, f: &Decimal) -> Decimal {
    match f.vers_rationnel() {
        Some(r) => {
            let c = (r - BigRational::from_integer(BigInt::from(32)))
                * BigRational::new(BigInt::from(5), BigInt::from(9));
            ctx.depuis_rationnel(&c)
        }
        None => f.clone(),
    }
}

/// C × 9/5 + 32.
fn celsius_vers_fahrenheit(ctx: &ContexteArith, c: &Decimal) -> Decimal {
    match c.vers_rationnel() {
        Some(r) => {
            let f = r * BigRational::new(BigInt::from(9), BigInt::from(5))
                + BigRational::from_integer(BigInt::from(32));
            ctx.depuis_rationnel(&f)
        }
        None => c.clone(),
    }
}
