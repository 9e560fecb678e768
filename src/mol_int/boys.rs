//! Boys function F_n(x) = int_0^1 t^(2n) exp(-x t^2) dt, for real and for
//! complex argument.
//!
//! The nuclear-attraction and Coulomb recursions consume whole tables
//! F_0..F_n at a fixed argument, so tables are what this module produces.
//! Two branches cover the domain (see Helgaker, Jorgensen, Olsen, 2000,
//! ch. 9.8.3):
//!
//! - small argument: Kummer series at the highest order, then downward
//!   recursion F_(n-1) = (2x F_n + exp(-x)) / (2n - 1). All series terms
//!   are positive, downward is the stable direction.
//! - large argument: F_0 = 1/2 sqrt(pi/x) erf(sqrt(x)), then upward
//!   recursion F_(n+1) = ((2n+1) F_n - exp(-x)) / (2x). Upward is safe
//!   here since 2x stays well above 2n+1 for every order the integral
//!   recursions request.
//!
//! Complex arguments arise for London orbitals, where the Boys argument is
//! the bilinear square z = p * w.w of a complex-shifted center separation.
//! The same two branches apply verbatim in complex arithmetic; for
//! Re z >= the branch point, erf(sqrt(z)) = 1 to machine precision.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Branch point between the series and the erf evaluation.
const SERIES_CUTOFF: f64 = 35.0;

/// Series iteration cap; the term ratio 2x/(2n+2k+3) drops below one near
/// k = x, so at the branch point the series has long converged before this.
const MAX_SERIES_ITER: usize = 500;

/// Kummer form of the Boys series,
/// F_n(x) = exp(-x) sum_k (2x)^k / ((2n+1)(2n+3)..(2n+2k+1)).
fn boys_series(n: usize, x: f64) -> f64 {
    let mut term = 1.0 / (2 * n + 1) as f64;
    let mut sum = term;
    for k in 1..=MAX_SERIES_ITER {
        term *= 2.0 * x / (2 * n + 2 * k + 1) as f64;
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    (-x).exp() * sum
}

/// Table of F_0(x) .. F_n_max(x).
pub fn boys_table(n_max: usize, x: f64) -> Vec<f64> {
    let mut boys_values = vec![0.0; n_max + 1];
    if x < SERIES_CUTOFF {
        boys_values[n_max] = boys_series(n_max, x);
        let exp_min_x = (-x).exp();
        for n in (1..=n_max).rev() {
            boys_values[n - 1] = (2.0 * x * boys_values[n] + exp_min_x) / (2 * n - 1) as f64;
        }
    } else {
        // erf(sqrt(x)) = 1 within 1e-16 beyond the cutoff
        boys_values[0] = 0.5 * (PI / x).sqrt() * libm::erf(x.sqrt());
        let exp_min_x = (-x).exp();
        for n in 0..n_max {
            boys_values[n + 1] = ((2 * n + 1) as f64 * boys_values[n] - exp_min_x) / (2.0 * x);
        }
    }
    boys_values
}

fn boys_series_cplx(n: usize, z: Complex64) -> Complex64 {
    let mut term = Complex64::new(1.0 / (2 * n + 1) as f64, 0.0);
    let mut sum = term;
    for k in 1..=MAX_SERIES_ITER {
        term = term * 2.0 * z / (2 * n + 2 * k + 1) as f64;
        sum += term;
        if term.norm() < sum.norm() * 1e-17 {
            break;
        }
    }
    (-z).exp() * sum
}

/// Table of F_0(z) .. F_n_max(z) for complex argument, principal branch.
pub fn boys_table_cplx(n_max: usize, z: Complex64) -> Vec<Complex64> {
    let mut boys_values = vec![Complex64::new(0.0, 0.0); n_max + 1];
    if z.re < SERIES_CUTOFF {
        boys_values[n_max] = boys_series_cplx(n_max, z);
        let exp_min_z = (-z).exp();
        for n in (1..=n_max).rev() {
            boys_values[n - 1] = (2.0 * z * boys_values[n] + exp_min_z) / (2 * n - 1) as f64;
        }
    } else {
        boys_values[0] = 0.5 * (Complex64::new(PI, 0.0) / z).sqrt();
        let exp_min_z = (-z).exp();
        for n in 0..n_max {
            boys_values[n + 1] = ((2 * n + 1) as f64 * boys_values[n] - exp_min_z) / (2.0 * z);
        }
    }
    boys_values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_boys_at_zero() {
        let boys_values = boys_table(16, 0.0);
        for (n, boys_val) in boys_values.iter().enumerate() {
            assert_relative_eq!(boys_val, &(1.0 / (2 * n + 1) as f64), max_relative = 1e-15);
        }
    }

    #[test]
    fn test_boys_f0_closed_form() {
        // F_0(x) = 1/2 sqrt(pi/x) erf(sqrt(x)) everywhere
        for &x in &[1e-3, 0.5, 4.0, 20.0, 34.9, 80.0, 1e4] {
            let f0_ref = 0.5 * (PI / x).sqrt() * libm::erf(x.sqrt());
            assert_relative_eq!(boys_table(0, x)[0], f0_ref, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_boys_against_reference_impl() {
        for &x in &[1e-3, 0.1, 1.0, 5.0, 17.5, 30.0, 100.0, 1e4] {
            let boys_values = boys_table(16, x);
            for n in 0..=16 {
                assert_relative_eq!(
                    boys_values[n],
                    boys::micb25::boys(n as u64, x),
                    max_relative = 1e-11
                );
            }
        }
    }

    #[test]
    fn test_boys_branches_agree_at_cutoff() {
        // The series still converges at and beyond the cutoff, so both
        // branches can be compared at the same argument, seam included.
        // The table itself takes the erf branch at all three arguments.
        for &x in &[SERIES_CUTOFF, 36.0, 40.0] {
            let erf_branch = boys_table(12, x);
            for n in 0..=12 {
                assert_relative_eq!(boys_series(n, x), erf_branch[n], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_boys_downward_recursion_identity() {
        // F_(n-1)(x) = (2x F_n(x) + e^-x) / (2n - 1) ties all table entries
        // together in both branches.
        for &x in &[0.05, 0.8, 6.0, 25.0, 60.0, 500.0] {
            let boys_values = boys_table(10, x);
            for n in 1..=10 {
                let from_recursion =
                    (2.0 * x * boys_values[n] + (-x).exp()) / (2 * n - 1) as f64;
                assert_relative_eq!(boys_values[n - 1], from_recursion, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_boys_cplx_real_axis_matches_real() {
        for &x in &[0.3, 7.0, 34.0, 50.0] {
            let real_values = boys_table(10, x);
            let cplx_values = boys_table_cplx(10, Complex64::new(x, 0.0));
            for n in 0..=10 {
                assert_relative_eq!(cplx_values[n].re, real_values[n], max_relative = 1e-13);
                assert_abs_diff_eq!(cplx_values[n].im, 0.0, epsilon = 1e-16);
            }
        }
    }

    #[test]
    fn test_boys_cplx_derivative_relation() {
        // dF_n/dz = -F_(n+1); check with a central difference in the
        // imaginary direction.
        let z = Complex64::new(2.5, 0.4);
        let h = Complex64::new(0.0, 1e-6);
        let upper = boys_table_cplx(5, z + h);
        let lower = boys_table_cplx(5, z - h);
        let mid = boys_table_cplx(6, z);
        for n in 0..=5 {
            let deriv = (upper[n] - lower[n]) / (2.0 * h);
            assert_relative_eq!(deriv.re, -mid[n + 1].re, max_relative = 1e-7);
            assert_relative_eq!(deriv.im, -mid[n + 1].im, max_relative = 1e-7);
        }
    }
}
