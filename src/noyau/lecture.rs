// src/noyau/lecture.rs
//
// Séries en virgule fixe : entiers “scalés” (×10^w), sans flottants.
// - π (Machin), ln 2, ln 10 : calculés une fois par précision, puis cache
// - exp, ln, sin/cos, atan : l’argument est déjà réduit par l’appelant
//
// Chaque fonction travaille avec quelques chiffres de garde internes;
// l’erreur finale reste de quelques unités sur le dernier chiffre scalé.

use num_bigint::BigInt;
use num_traits::Zero;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Chiffres de garde internes aux séries.
const GARDE: usize = 6;

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/* ------------------------ Séries arctan / argth en 1/q ------------------------ */

/// Σ 1/((2k+1)·q^(2k+1)) en entier scalé (troncature).
/// - alternée : atan(1/q)
/// - non alternée : atanh(1/q)
fn serie_inv_q_scaled(q: i64, scale: &BigInt, alternee: bool) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let denom = BigInt::from((2 * k + 1) as i64);
        let d = &q_pow * &denom;

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        if alternee {
            sign_pos = !sign_pos;
        }
        k += 1;
    }

    sum
}

/* ------------------------ Constantes + cache ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constante {
    Pi,
    Ln2,
    Ln10,
}

fn pi_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = serie_inv_q_scaled(5, &scale, true);
    let b = serie_inv_q_scaled(239, &scale, true);

    (BigInt::from(16) * a - BigInt::from(4) * b) / pow10(extra)
}

fn ln2_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // ln 2 = 2*atanh(1/3)
    serie_inv_q_scaled(3, &scale, false) * 2u32 / pow10(extra)
}

fn ln10_scaled_compute(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    // ln 10 = 3*ln 2 + ln(5/4), ln(5/4) = 2*atanh(1/9)
    let ln2 = serie_inv_q_scaled(3, &scale, false) * 2u32;
    let ln54 = serie_inv_q_scaled(9, &scale, false) * 2u32;
    (ln2 * 3u32 + ln54) / pow10(extra)
}

static CACHE: OnceLock<Mutex<HashMap<(Constante, usize), BigInt>>> = OnceLock::new();

/// Constante scalée ×10^digits (troncature), mise en cache par précision.
pub fn constante_scaled(c: Constante, digits: usize) -> BigInt {
    let m = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    // un cache empoisonné reste utilisable : les valeurs déjà insérées sont complètes
    let mut guard = m.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(v) = guard.get(&(c, digits)) {
        return v.clone();
    }

    let v = match c {
        Constante::Pi => pi_scaled_compute(digits),
        Constante::Ln2 => ln2_scaled_compute(digits),
        Constante::Ln10 => ln10_scaled_compute(digits),
    };
    guard.insert((c, digits), v.clone());
    v
}

/* ------------------------ exp ------------------------ */

/// exp(x) scalé, pour |x| de l’ordre de quelques unités.
///
/// x / 2^10, série de Taylor, puis dix élévations au carré.
pub fn exp_scaled(x: &BigInt, w: usize) -> BigInt {
    const MOITIES: u32 = 10;

    let scale = pow10(w + GARDE);
    let r = (x * pow10(GARDE)) >> MOITIES;

    let mut somme = scale.clone();
    let mut terme = scale.clone();
    let mut k: u32 = 1;
    loop {
        terme = &terme * &r / (&scale * k);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
    }

    for _ in 0..MOITIES {
        somme = &somme * &somme / &scale;
    }
    somme / pow10(GARDE)
}

/* ------------------------ ln ------------------------ */

/// ln(x) scalé, pour x ∈ [1, 10).
///
/// Réduction dans [1, 2) par divisions par 2, puis ln(y) = 2*atanh((y-1)/(y+1)).
pub fn ln_scaled(x: &BigInt, w: usize) -> BigInt {
    let wi = w + GARDE;
    let scale = pow10(wi);
    let deux = &scale * 2u32;

    let mut y = x * pow10(GARDE);
    let mut j: u32 = 0;
    while y >= deux {
        y = y >> 1u32;
        j += 1;
    }

    // z ≤ 1/3
    let z = (&y - &scale) * &scale / (&y + &scale);
    let z2 = &z * &z / &scale;

    let mut puissance = z;
    let mut somme = BigInt::zero();
    let mut k: u32 = 0;
    loop {
        let terme = &puissance / (2 * k + 1);
        if terme.is_zero() {
            break;
        }
        somme += terme;
        puissance = &puissance * &z2 / &scale;
        k += 1;
    }

    let ln2 = constante_scaled(Constante::Ln2, wi);
    (somme * 2u32 + ln2 * j) / pow10(GARDE)
}

/* ------------------------ sin / cos ------------------------ */

/// (sin x, cos x) scalés, pour x ∈ [-π, π].
pub fn sin_cos_scaled(x: &BigInt, w: usize) -> (BigInt, BigInt) {
    let scale = pow10(w + GARDE);
    let xi = x * pow10(GARDE);
    let x2 = &xi * &xi / &scale;

    // sin : x - x^3/3! + x^5/5! - ...
    let mut sin = BigInt::zero();
    let mut terme = xi;
    let mut n: u32 = 1;
    while !terme.is_zero() {
        sin += &terme;
        terme = -(&terme * &x2 / &scale) / ((n + 1) * (n + 2));
        n += 2;
    }

    // cos : 1 - x^2/2! + x^4/4! - ...
    let mut cos = BigInt::zero();
    let mut terme = scale.clone();
    let mut n: u32 = 0;
    while !terme.is_zero() {
        cos += &terme;
        terme = -(&terme * &x2 / &scale) / ((n + 1) * (n + 2));
        n += 2;
    }

    let g = pow10(GARDE);
    (sin / &g, cos / &g)
}

/* ------------------------ atan ------------------------ */

/// atan(x) scalé, pour |x| ≤ 1.
///
/// Trois demi-angles : atan(t) = 2*atan(t / (1 + √(1+t²))), puis série.
pub fn atan_scaled(x: &BigInt, w: usize) -> BigInt {
    const DEMIS: u32 = 3;

    let scale = pow10(w + GARDE);
    let carre = &scale * &scale;

    let mut t = x * pow10(GARDE);
    for _ in 0..DEMIS {
        let rac = (&carre + &t * &t).sqrt();
        t = &t * &scale / (&scale + rac);
    }

    let t2 = &t * &t / &scale;
    let mut puissance = t;
    let mut somme = BigInt::zero();
    let mut k: u32 = 0;
    loop {
        let terme = &puissance / (2 * k + 1);
        if terme.is_zero() {
            break;
        }
        if k % 2 == 0 {
            somme += terme;
        } else {
            somme -= terme;
        }
        puissance = &puissance * &t2 / &scale;
        k += 1;
    }

    (somme << DEMIS) / pow10(GARDE)
}
