//! Closed-form special functions evaluated from truncated series.
//!
//! Bessel values are good to about 1e-8 absolute everywhere. Airy values are
//! good to about 1e-12 inside `[-5, 5]` and to about 4e-6 (relative on the
//! decaying side, absolute on the oscillating side) beyond it. Every function
//! is pure and finite for finite input.

use std::f64::consts::{FRAC_PI_4, PI};

/// Switch from power series to the large-argument expansion.
const BESSEL_ASYMPTOTIC_FROM: f64 = 12.0;

/// Airy series is used on `[-AIRY_SERIES_LIMIT, AIRY_SERIES_LIMIT]`.
const AIRY_SERIES_LIMIT: f64 = 5.0;

/// `Ai(0)`
const AIRY_C1: f64 = 0.355_028_053_887_817_2;
/// `−Ai'(0)`
const AIRY_C2: f64 = 0.258_819_403_792_806_8;

/// Coefficients `u_k` of the large-argument Airy expansions.
const AIRY_U: [f64; 5] = [
    1.0,
    0.069_444_444_444_444_45,
    0.037_133_487_654_320_99,
    0.037_993_059_127_800_64,
    0.057_649_190_412_669_72,
];

const SERIES_EPS: f64 = 1e-17;
const MAX_TERMS: usize = 200;

/// Bessel function of the first kind, order 0.
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < BESSEL_ASYMPTOTIC_FROM {
        bessel_series(ax, 0)
    } else {
        bessel_asymptotic(ax, 0)
    }
}

/// Bessel function of the first kind, order 1. Odd in `x`.
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    let v = if ax < BESSEL_ASYMPTOTIC_FROM {
        bessel_series(ax, 1)
    } else {
        bessel_asymptotic(ax, 1)
    };
    if x < 0.0 {
        -v
    } else {
        v
    }
}

/// `Σ (−1)^k (x/2)^(2k+n) / (k! (k+n)!)` for `n` in {0, 1}.
fn bessel_series(x: f64, order: u32) -> f64 {
    let half = 0.5 * x;
    let q = -half * half;
    let mut term = if order == 0 { 1.0 } else { half };
    let mut sum = term;
    for k in 1..MAX_TERMS {
        let k = k as f64;
        term *= q / (k * (k + f64::from(order)));
        sum += term;
        if term.abs() < SERIES_EPS * sum.abs().max(1e-300) {
            break;
        }
    }
    sum
}

/// Hankel expansion with three correction terms in each of `P` and `Q`.
fn bessel_asymptotic(x: f64, order: u32) -> f64 {
    let mu = 4.0 * f64::from(order * order);
    let z = 8.0 * x;
    // a[k] = Π_{j=1..k} (μ − (2j − 1)²) / (k! zᵏ)
    let mut a = [1.0; 7];
    for k in 1..a.len() {
        let odd = (2 * k - 1) as f64;
        a[k] = a[k - 1] * (mu - odd * odd) / (k as f64 * z);
    }
    let p = a[0] - a[2] + a[4] - a[6];
    let q = a[1] - a[3] + a[5];
    let chi = x - (0.5 * f64::from(order) + 0.25) * PI;
    (2.0 / (PI * x)).sqrt() * (p * chi.cos() - q * chi.sin())
}

/// Airy function `Ai(x)`.
///
/// Maclaurin series near the origin, asymptotic expansions in
/// `ζ = (2/3)|x|^(3/2)` beyond `±5` (exponential decay to the right,
/// decaying oscillation to the left).
pub fn airy_ai(x: f64) -> f64 {
    if x > AIRY_SERIES_LIMIT {
        let zeta = 2.0 / 3.0 * x.powf(1.5);
        let mut sum = 0.0;
        let mut power = 1.0;
        for (k, u) in AIRY_U.iter().enumerate() {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sum += sign * u * power;
            power /= zeta;
        }
        return (-zeta).exp() / (2.0 * PI.sqrt() * x.powf(0.25)) * sum;
    }
    if x < -AIRY_SERIES_LIMIT {
        let z = -x;
        let zeta = 2.0 / 3.0 * z.powf(1.5);
        let z2 = zeta * zeta;
        let even = AIRY_U[0] - AIRY_U[2] / z2 + AIRY_U[4] / (z2 * z2);
        let odd = AIRY_U[1] / zeta - AIRY_U[3] / (z2 * zeta);
        let theta = zeta + FRAC_PI_4;
        return (theta.sin() * even - theta.cos() * odd) / (PI.sqrt() * z.powf(0.25));
    }
    let x3 = x * x * x;
    let mut f_term = 1.0;
    let mut g_term = x;
    let mut f = f_term;
    let mut g = g_term;
    for k in 0..MAX_TERMS {
        let k = k as f64;
        f_term *= x3 / ((3.0 * k + 2.0) * (3.0 * k + 3.0));
        g_term *= x3 / ((3.0 * k + 3.0) * (3.0 * k + 4.0));
        f += f_term;
        g += g_term;
        if f_term.abs() < SERIES_EPS && g_term.abs() < SERIES_EPS {
            break;
        }
    }
    AIRY_C1 * f - AIRY_C2 * g
}

/// Jacobi theta function `θ₃(z, q) = 1 + 2 Σ q^(n²) cos(2nz)` for `|q| < 1`.
///
/// The nome is clamped into `(-1, 1)` so the series always converges.
pub fn jacobi_theta3(z: f64, q: f64) -> f64 {
    let q = q.clamp(-0.999, 0.999);
    let mut sum = 1.0;
    for n in 1..MAX_TERMS as i32 {
        let w = q.powi(n * n);
        if w.abs() < SERIES_EPS {
            break;
        }
        sum += 2.0 * w * (2.0 * f64::from(n) * z).cos();
    }
    sum
}

/// Single KdV soliton `(c/2) sech²(√c/2 · (x − c t − x0))`.
///
/// Solves `u_t + 6 u u_x + u_xxx = 0`; taller solitons travel faster.
/// Non-positive speeds give a flat wave.
pub fn kdv_soliton(x: f64, t: f64, speed: f64, x0: f64) -> f64 {
    if speed <= 0.0 {
        return 0.0;
    }
    let arg = 0.5 * speed.sqrt() * (x - speed * t - x0);
    let sech = 1.0 / arg.cosh();
    0.5 * speed * sech * sech
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn j0_at_origin_is_one() {
        assert_eq!(bessel_j0(0.0), 1.0);
    }

    #[test]
    fn j1_at_origin_is_zero() {
        assert_eq!(bessel_j1(0.0), 0.0);
    }

    #[test]
    fn j0_first_zero() {
        assert!(bessel_j0(2.404_825_557_695_773).abs() < 1e-12);
        assert!(bessel_j0(2.3) > 0.0 && bessel_j0(2.5) < 0.0);
    }

    #[test]
    fn j0_and_j1_reference_values() {
        assert!(close(bessel_j0(1.0), 0.765_197_686_557_966_6, 1e-13));
        assert!(close(bessel_j1(1.0), 0.440_050_585_744_933_5, 1e-13));
        assert!(close(bessel_j0(10.0), -0.245_935_764_451_348_3, 5e-6));
        assert!(close(bessel_j1(10.0), 0.043_472_746_168_861_44, 5e-6));
    }

    #[test]
    fn series_and_asymptotic_agree_at_switch_point() {
        for order in [0, 1] {
            let s = bessel_series(BESSEL_ASYMPTOTIC_FROM, order);
            let a = bessel_asymptotic(BESSEL_ASYMPTOTIC_FROM, order);
            assert!(close(s, a, 1e-7), "order {order}: {s} vs {a}");
        }
    }

    #[test]
    fn j0_is_even_and_j1_is_odd() {
        for x in [0.3, 2.0, 7.9, 12.5] {
            assert_eq!(bessel_j0(-x), bessel_j0(x));
            assert_eq!(bessel_j1(-x), -bessel_j1(x));
        }
    }

    #[test]
    fn airy_reference_values() {
        assert!(close(airy_ai(0.0), 0.35503, 1e-5));
        assert!(close(airy_ai(1.0), 0.135_292_416_312_881_4, 1e-12));
        assert!(close(airy_ai(-1.0), 0.535_560_883_292_352_1, 1e-12));
    }

    #[test]
    fn large_argument_reference_values() {
        assert!(close(bessel_j0(12.0), 0.047_689_310_796_833_5, 5e-8));
        assert!(close(bessel_j1(12.0), -0.223_447_104_490_628, 5e-8));
        let right = [(5.5, 3.368_531_190_859_98e-5), (6.0, 9.947_694_360_252_89e-6)];
        for (x, want) in right {
            assert!(close(airy_ai(x) / want, 1.0, 1e-5), "Ai({x}) = {}", airy_ai(x));
        }
        assert!(close(airy_ai(-5.5), 0.017_781_541_276_575, 5e-6));
        assert!(close(airy_ai(-7.0), 0.184_280_835_250_506, 5e-6));
    }

    #[test]
    fn airy_decays_right_and_oscillates_left() {
        assert!(airy_ai(8.0) > 0.0 && airy_ai(8.0) < 1e-6);
        let left: Vec<f64> = (0..40).map(|i| airy_ai(-6.0 - i as f64 * 0.25)).collect();
        assert!(left.iter().any(|v| *v > 0.0) && left.iter().any(|v| *v < 0.0));
        assert!(left.iter().all(|v| v.abs() < 0.5));
    }

    #[test]
    fn theta3_reference_values() {
        assert_eq!(jacobi_theta3(1.234, 0.0), 1.0);
        let q = (-PI).exp();
        assert!(close(jacobi_theta3(0.0, q), 1.086_434_811_213_308, 1e-13));
    }

    #[test]
    fn theta3_has_period_pi() {
        let q = 0.4;
        for z in [0.1, 0.7, 2.0] {
            assert!(close(jacobi_theta3(z, q), jacobi_theta3(z + PI, q), 1e-12));
        }
    }

    #[test]
    fn soliton_peak_moves_at_its_speed() {
        let c = 4.0;
        assert!(close(kdv_soliton(0.0, 0.0, c, 0.0), 2.0, 1e-15));
        assert!(close(kdv_soliton(8.0, 2.0, c, 0.0), 2.0, 1e-15));
        assert!(kdv_soliton(3.0, 0.0, c, 0.0) < 0.1);
        assert!(close(
            kdv_soliton(1.0, 0.0, c, 0.0),
            kdv_soliton(-1.0, 0.0, c, 0.0),
            1e-15
        ));
    }

    #[test]
    fn soliton_with_no_speed_is_flat() {
        assert_eq!(kdv_soliton(0.0, 1.0, 0.0, 0.0), 0.0);
        assert_eq!(kdv_soliton(0.0, 1.0, -2.0, 0.0), 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bessel_values_are_bounded(x in -200.0_f64..200.0) {
                prop_assert!(bessel_j0(x).abs() <= 1.0 + 1e-9);
                prop_assert!(bessel_j1(x).abs() <= 0.6);
            }

            #[test]
            fn airy_is_finite_and_bounded(x in -50.0_f64..50.0) {
                let v = airy_ai(x);
                prop_assert!(v.is_finite());
                prop_assert!(v.abs() < 0.6);
            }
        }
    }
}
