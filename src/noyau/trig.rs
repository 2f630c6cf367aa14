// src/noyau/trig.rs
//
// Trigonométrie sur Decimal
// -------------------------
// - Degrés : réduction exacte (rationnelle) modulo 360°, puis table des
//   angles spéciaux à valeur rationnelle (0, ±1/2, ±1, indéfini)
// - Radians : réduction modulo 2π avec π calculé au-delà des chiffres de x
// - Sinon : séries de lecture.rs, précision relevée près de zéro
// - Fonctions réciproques : résultat dans l’unité d’angle courante

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use tracing::trace;

use super::contexte::Angle;
use super::decimal::{nb_chiffres, ContexteArith, Decimal};
use super::lecture::{self, pow10, Constante};

/// Chiffres supplémentaires au plus pour tan (sin et cos près de zéro).
const SUPPLEMENT_TAN: usize = 200;

#[derive(Clone, Copy, Debug)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

#[derive(Clone, Copy, Debug)]
pub enum TrigInv {
    Asin,
    Acos,
    Atan,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrigOutcome {
    Valeur(Decimal),
    Indefini,
}

/// sin / cos / tan de x, x exprimé dans l’unité `angle`.
pub fn trig(f: TrigFn, x: &Decimal, angle: Angle, ctx: &ContexteArith) -> Decimal {
    if !x.est_fini() {
        return Decimal::NaN;
    }
    let w0 = ctx.chiffres_travail(x);

    match angle {
        Angle::Radians => {
            if x.est_zero() {
                return depuis_table(f, &BigRational::zero()).unwrap_or(Decimal::NaN);
            }
            numerique(f, ctx, w0, |w| reduire_radians(x, w))
        }
        Angle::Degres => {
            let Some(r) = x.vers_rationnel() else {
                return Decimal::NaN;
            };
            // x = coeff·π, coeff réduit dans [0, 2)
            let coeff = mod_rationnel(&(r / BigRational::from_integer(BigInt::from(180))), 2);
            if let Some(v) = depuis_table(f, &coeff) {
                return v;
            }
            let coeff = if coeff > BigRational::one() {
                coeff - BigRational::from_integer(BigInt::from(2))
            } else {
                coeff
            };
            numerique(f, ctx, w0, |w| {
                let pi = lecture::constante_scaled(Constante::Pi, w + 2);
                Some(coeff.numer() * pi / coeff.denom() / 100u32)
            })
        }
    }
}

/// asin / acos / atan de x, résultat dans l’unité `angle`.
pub fn trig_inverse(f: TrigInv, x: &Decimal, angle: Angle, ctx: &ContexteArith) -> Decimal {
    if x.est_nan() {
        return Decimal::NaN;
    }
    match f {
        TrigInv::Asin | TrigInv::Acos => {
            if x.abs().comparer(&Decimal::un()) == Some(Ordering::Greater) {
                return Decimal::NaN;
            }
        }
        TrigInv::Atan => {}
    }
    // zéros exacts
    match f {
        TrigInv::Asin | TrigInv::Atan if x.est_zero() => return Decimal::zero(),
        TrigInv::Acos if *x == Decimal::un() => return Decimal::zero(),
        _ => {}
    }

    let w0 = ctx.chiffres_travail(x);
    ctx.precision_croissante(w0, |w| {
        let r = radians_scaled(f, x, w + 2);
        match angle {
            Angle::Radians => r / 100u32,
            Angle::Degres => {
                let pi = lecture::constante_scaled(Constante::Pi, w + 2);
                r * 180u32 * pow10(w) / pi
            }
        }
    })
}

/* ------------------------ Calcul numérique ------------------------ */

fn numerique(
    f: TrigFn,
    ctx: &ContexteArith,
    w0: usize,
    angle: impl Fn(usize) -> Option<BigInt>,
) -> Decimal {
    let sin_cos = |w: usize| angle(w).map(|a| lecture::sin_cos_scaled(&a, w));

    match f {
        TrigFn::Sin => ctx.precision_croissante(w0, |w| {
            sin_cos(w).map(|(s, _)| s).unwrap_or_default()
        }),
        TrigFn::Cos => ctx.precision_croissante(w0, |w| {
            sin_cos(w).map(|(_, c)| c).unwrap_or_default()
        }),
        TrigFn::Tan => {
            // sin et cos doivent tous deux garder assez de chiffres
            let voulu = ctx.precision + 3;
            let mut w = w0;
            loop {
                let Some((s, c)) = sin_cos(w) else {
                    return Decimal::NaN;
                };
                let assez = nb_chiffres(&s) >= voulu && nb_chiffres(&c) >= voulu;
                if assez || w >= w0 + SUPPLEMENT_TAN {
                    if c.is_zero() {
                        return Decimal::NaN;
                    }
                    return ctx.quotient(&s, &c, 0);
                }
                w += voulu;
            }
        }
    }
}

/// x mod 2π ramené dans (-π, π], scalé ×10^w.
fn reduire_radians(x: &Decimal, w: usize) -> Option<BigInt> {
    let entiers = x.exposant_ajuste().map_or(0, |a| (a + 1).max(0) as usize);
    let wp = w + entiers + 3;

    let xs = x.vers_echelle(wp)?;
    let pi = lecture::constante_scaled(Constante::Pi, wp);
    let deux_pi = &pi * 2u32;

    let mut r = &xs % &deux_pi;
    if r.is_negative() {
        r += &deux_pi;
    }
    if r > pi {
        r -= &deux_pi;
    }
    Some(r / pow10(wp - w))
}

/// Angle (radians) scalé ×10^w pour les fonctions réciproques.
fn radians_scaled(f: TrigInv, x: &Decimal, w: usize) -> BigInt {
    let scale = pow10(w);
    let demi_pi = lecture::constante_scaled(Constante::Pi, w) / 2u32;

    if let (TrigInv::Atan, Decimal::Infini { negatif }) = (f, x) {
        return if *negatif { -demi_pi } else { demi_pi };
    }
    let xs = x.vers_echelle(w).unwrap_or_default();

    match f {
        TrigInv::Asin => asin_scaled(&xs, &scale, &demi_pi, w),
        TrigInv::Acos => &demi_pi - asin_scaled(&xs, &scale, &demi_pi, w),
        TrigInv::Atan => {
            if xs.abs() <= scale {
                return lecture::atan_scaled(&xs, w);
            }
            // atan(x) = π/2 - atan(1/x) pour x > 1
            let inverse = &scale * &scale / xs.abs();
            let a = &demi_pi - lecture::atan_scaled(&inverse, w);
            if xs.is_negative() {
                -a
            } else {
                a
            }
        }
    }
}

/// asin(x) = atan(x / √(1-x²)), |x| ≤ 1.
fn asin_scaled(xs: &BigInt, scale: &BigInt, demi_pi: &BigInt, w: usize) -> BigInt {
    let q = (scale * scale - xs * xs).sqrt();
    let a = xs.abs();

    let r = if q.is_zero() {
        demi_pi.clone()
    } else if a <= q {
        lecture::atan_scaled(&(&a * scale / &q), w)
    } else {
        demi_pi - lecture::atan_scaled(&(&q * scale / &a), w)
    };
    if xs.is_negative() {
        -r
    } else {
        r
    }
}

/* ------------------------ Angles spéciaux (degrés) ------------------------ */

/// Valeur exacte si coeff·π est un angle spécial à valeur rationnelle.
fn depuis_table(f: TrigFn, coeff: &BigRational) -> Option<Decimal> {
    let res = trig_special(coeff, f)?;
    trace!(?f, angle = %format_angle_degres(coeff), ?res, "angle spécial");
    Some(match res {
        TrigOutcome::Valeur(v) => v,
        TrigOutcome::Indefini => Decimal::NaN,
    })
}

/// Reconnaît coeff·π pour coeff = k/n, n ∈ {1,2,3,4,6}.
///
/// Retour:
/// - Some(Valeur(v)) si la valeur est rationnelle (0, ±1/2, ±1)
/// - Some(Indefini) pour tan(90°), tan(270°)
/// - None sinon (valeurs irrationnelles : calcul numérique)
pub fn trig_special(coeff: &BigRational, f: TrigFn) -> Option<TrigOutcome> {
    let (k, n) = rational_to_small_kn(coeff)?;
    let k_mod = k.rem_euclid(2 * n);

    let val = |v: Decimal| TrigOutcome::Valeur(v);
    let zero = || val(Decimal::zero());
    let un = || val(Decimal::un());
    let moins_un = || val(Decimal::depuis_i64(-1));
    let demi = || val(Decimal::depuis_parties(5, -1));
    let moins_demi = || val(Decimal::depuis_parties(-5, -1));

    let a = (k_mod, n);
    let out = match f {
        TrigFn::Sin => match a {
            (0, _) | (1, 1) => zero(),
            (1, 6) | (5, 6) => demi(),
            (7, 6) | (11, 6) => moins_demi(),
            (1, 2) => un(),
            (3, 2) => moins_un(),
            _ => return None,
        },

        TrigFn::Cos => match a {
            (0, _) => un(),
            (1, 1) => moins_un(),
            (1, 3) | (5, 3) => demi(),
            (2, 3) | (4, 3) => moins_demi(),
            (1, 2) | (3, 2) => zero(),
            _ => return None,
        },

        TrigFn::Tan => match a {
            (0, _) | (1, 1) => zero(),
            (1, 4) | (5, 4) => un(),
            (3, 4) | (7, 4) => moins_un(),
            (1, 2) | (3, 2) => TrigOutcome::Indefini,
            _ => return None,
        },
    };

    Some(out)
}

/* ------------------------ Outils ------------------------ */

/// r mod m, dans [0, m).
fn mod_rationnel(r: &BigRational, m: i64) -> BigRational {
    let m = BigRational::from_integer(BigInt::from(m));
    r - (r / &m).floor() * &m
}

fn format_angle_degres(coeff: &BigRational) -> String {
    let deg = coeff * BigRational::from_integer(BigInt::from(180));
    if deg.is_integer() {
        format!("{}°", deg.numer())
    } else {
        format!("{}/{}°", deg.numer(), deg.denom())
    }
}

/// Convertit un rationnel en (k,n) i64 réduit.
/// Accepte seulement n ∈ {1,2,3,4,6}.
fn rational_to_small_kn(r: &BigRational) -> Option<(i64, i64)> {
    // BigRational est toujours réduit : pas de pgcd à calculer
    let denom = r.denom().to_i64()?;
    let numer = r.numer().to_i64()?;

    if [1, 2, 3, 4, 6].contains(&denom) {
        Some((numer, denom))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> ContexteArith {
        ContexteArith::default()
    }

    fn d(s: &str) -> Decimal {
        ctx().lire(s).unwrap()
    }

    fn deg(f: TrigFn, x: &str) -> String {
        trig(f, &d(x), Angle::Degres, &ctx()).to_string()
    }

    fn rad(f: TrigFn, x: &Decimal) -> Decimal {
        trig(f, x, Angle::Radians, &ctx())
    }

    /// Arrondi à 32 décimales, comme une lecture humaine du résultat.
    fn a32(v: &Decimal) -> String {
        v.quantifier(-32).to_string()
    }

    #[test]
    fn degres_exacts() {
        assert_eq!(deg(TrigFn::Sin, "90"), "1");
        assert_eq!(deg(TrigFn::Sin, "30"), "0.5");
        assert_eq!(deg(TrigFn::Sin, "-30"), "-0.5");
        assert_eq!(deg(TrigFn::Sin, "540"), "0");
        assert_eq!(deg(TrigFn::Cos, "0"), "1");
        assert_eq!(deg(TrigFn::Cos, "60"), "0.5");
        assert_eq!(deg(TrigFn::Cos, "-120"), "-0.5");
        assert_eq!(deg(TrigFn::Cos, "270"), "0");
        assert_eq!(deg(TrigFn::Tan, "45"), "1");
        assert_eq!(deg(TrigFn::Tan, "135"), "-1");
        assert_eq!(deg(TrigFn::Tan, "90"), "NaN");
    }

    #[test]
    fn degres_irrationnels() {
        assert_eq!(deg(TrigFn::Sin, "45"), "0.707106781186547524400844362104849");
        assert_eq!(deg(TrigFn::Tan, "30"), "0.5773502691896257645091487805019575");
    }

    #[test]
    fn radians() {
        let c = ctx();
        let pi = c.pi();
        let demi_pi = c.diviser(&pi, &d("2")).unwrap();
        assert_eq!(a32(&rad(TrigFn::Sin, &demi_pi)), "1");

        let tiers = c.diviser(&pi, &d("3")).unwrap();
        assert_eq!(a32(&rad(TrigFn::Cos, &tiers)), "0.5");

        assert_eq!(rad(TrigFn::Sin, &Decimal::zero()), Decimal::zero());
        assert_eq!(rad(TrigFn::Cos, &Decimal::zero()), Decimal::un());
        assert_eq!(
            rad(TrigFn::Tan, &d("3")).to_string(),
            "-0.1425465430742778052956354105339135"
        );
    }

    #[test]
    fn grand_argument_en_radians() {
        // réduction exacte : sin(10^22) = -0.852200849767188801772705893753029…
        let v = rad(TrigFn::Sin, &d("1e22"));
        assert_eq!(a32(&v), "-0.85220084976718880177270589375303");
    }

    #[test]
    fn petit_argument() {
        assert_eq!(rad(TrigFn::Sin, &d("1e-30")).to_string(), d("1e-30").to_string());
    }

    #[test]
    fn non_finis() {
        assert!(rad(TrigFn::Sin, &Decimal::NaN).est_nan());
        assert!(rad(TrigFn::Cos, &Decimal::Infini { negatif: false }).est_nan());
    }

    #[test]
    fn reciproques_en_radians() {
        let c = ctx();
        let demi_pi = c.diviser(&c.pi(), &d("2")).unwrap();
        let asin = trig_inverse(TrigInv::Asin, &d("-1"), Angle::Radians, &c);
        assert_eq!(a32(&asin), a32(&demi_pi.oppose()));

        let acos = trig_inverse(TrigInv::Acos, &d("0"), Angle::Radians, &c);
        assert_eq!(a32(&acos), a32(&demi_pi));
        assert_eq!(trig_inverse(TrigInv::Acos, &d("1"), Angle::Radians, &c), Decimal::zero());

        let atan = trig_inverse(TrigInv::Atan, &c.racine_carree(&d("3")), Angle::Radians, &c);
        let tiers = c.diviser(&c.pi(), &d("3")).unwrap();
        assert_eq!(a32(&atan), a32(&tiers));

        assert!(trig_inverse(TrigInv::Asin, &d("1.5"), Angle::Radians, &c).est_nan());
    }

    #[test]
    fn reciproques_en_degres() {
        let c = ctx();
        let inv = |f, x: &str| trig_inverse(f, &d(x), Angle::Degres, &c).to_string();
        assert_eq!(inv(TrigInv::Asin, "0.5"), "30");
        assert_eq!(inv(TrigInv::Acos, "-1"), "180");
        assert_eq!(inv(TrigInv::Atan, "1"), "45");
        assert_eq!(inv(TrigInv::Atan, "-1"), "-45");
        assert_eq!(
            trig_inverse(TrigInv::Atan, &Decimal::Infini { negatif: true }, Angle::Degres, &c)
                .to_string(),
            "-90"
        );
        assert_eq!(
            a32(&trig_inverse(TrigInv::Asin, &d("0.3"), Angle::Degres, &c)),
            "17.45760312372209229024604579244494"
        );
    }

    #[test]
    fn table_speciale() {
        let tiers = BigRational::new(BigInt::from(1), BigInt::from(3));
        assert_eq!(
            trig_special(&tiers, TrigFn::Cos),
            Some(TrigOutcome::Valeur(Decimal::depuis_parties(5, -1)))
        );
        assert_eq!(trig_special(&tiers, TrigFn::Sin), None);
        let demi = BigRational::new(BigInt::from(1), BigInt::from(2));
        assert_eq!(trig_special(&demi, TrigFn::Tan), Some(TrigOutcome::Indefini));
    }
}
