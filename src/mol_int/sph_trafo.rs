//! Cartesian to pure (real solid harmonic) transformation of integral blocks.
//!
//! The transformation matrix for angular momentum l maps the (l+1)(l+2)/2
//! Cartesian components (lexicographic order) onto the 2l+1 pure components
//! (m = -l..=l ascending). Since the primitive normalization embedded in
//! the contraction coefficients is referred to the axis-aligned Cartesian
//! component only, the double-factorial normalization ratio of each
//! off-axis component is folded into the matrix here. The matrices depend
//! on l alone and are built once.
//!
//! - Source: Schlegel, Frisch -- Transformation between Cartesian and pure
//!   spherical harmonic Gaussians
//! - Link: https://doi.org/10.1002/qua.560540202
//! - Eq. 15

use crate::basisset::cart_exp::cartesian_exponents;
use crate::basisset::{double_fac, LMAX};
use factorial::Factorial;
use lazy_static::lazy_static;
use ndarray::{Array2, Array4, Ix4};
use ndarray_einsum_beta::einsum;
use std::f64::consts::SQRT_2;

#[inline(always)]
fn fact(n: i32) -> f64 {
    (n as u64).factorial() as f64
}

pub(crate) fn binom(n: i32, k: i32) -> f64 {
    if n < 0 || k < 0 || k > n {
        return 0.0;
    }
    ((n as u64).factorial() / ((k as u64).factorial() * ((n - k) as u64).factorial())) as f64
}

#[inline(always)]
fn neg_one_pow(n: i32) -> f64 {
    if n.rem_euclid(2) == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Coefficient of the monomial x^lx y^ly z^lz in the real solid harmonic
/// S_lm (Schlegel-Frisch eq. 15). Zero whenever the parity of lx does not
/// match the cos/sin character of m.
fn solid_harmonic_coeff(l: i32, m: i32, lx: i32, ly: i32, lz: i32) -> f64 {
    let m_abs = m.abs();
    let j2 = lx + ly - m_abs;
    if j2 < 0 || j2 % 2 != 0 {
        return 0.0;
    }
    let j = j2 / 2;
    if m >= 0 && (m_abs - lx).rem_euclid(2) != 0 {
        return 0.0;
    }
    if m < 0 && (m_abs - lx).rem_euclid(2) != 1 {
        return 0.0;
    }

    let pref_num = fact(2 * lx) * fact(2 * ly) * fact(2 * lz) * fact(l) * fact(l - m_abs);
    let pref_den = fact(2 * l) * fact(lx) * fact(ly) * fact(lz) * fact(l + m_abs);
    let pref = (pref_num / pref_den).sqrt() / (2.0_f64.powi(l) * fact(l));

    let mut i_sum = 0.0;
    for i in j..=((l - m_abs) / 2) {
        i_sum += binom(l, i) * binom(i, j) * neg_one_pow(i) * fact(2 * l - 2 * i)
            / fact(l - m_abs - 2 * i);
    }

    let mut k_sum = 0.0;
    for k in 0..=j {
        let sign = if m >= 0 {
            neg_one_pow((m_abs - lx + 2 * k) / 2)
        } else {
            neg_one_pow((m_abs - lx + 2 * k - 1) / 2)
        };
        k_sum += binom(j, k) * binom(m_abs, lx - 2 * k) * sign;
    }

    pref * i_sum * k_sum
}

fn build_pure_transformation(l: u32) -> Array2<f64> {
    let tuples = cartesian_exponents(l);
    let mut trafo_mat = Array2::zeros(((2 * l + 1) as usize, tuples.len()));
    let df_l = double_fac(2 * l as i32 - 1) as f64;
    for (row, m) in (-(l as i32)..=(l as i32)).enumerate() {
        // sqrt(2) folds the two complex harmonics +-|m| into the real pair
        let m_fac = if m == 0 { 1.0 } else { SQRT_2 };
        for (col, &[lx, ly, lz]) in tuples.iter().enumerate() {
            let norm_ratio = (df_l
                / (double_fac(2 * lx - 1) as f64
                    * double_fac(2 * ly - 1) as f64
                    * double_fac(2 * lz - 1) as f64))
                .sqrt();
            trafo_mat[(row, col)] =
                m_fac * norm_ratio * solid_harmonic_coeff(l as i32, m, lx, ly, lz);
        }
    }
    trafo_mat
}

lazy_static! {
    static ref PURE_TRAFO_MATS: Vec<Array2<f64>> =
        (0..=LMAX).map(build_pure_transformation).collect();
}

/// The (2l+1) x (l+1)(l+2)/2 transformation matrix for angular momentum l.
pub fn pure_transformation_matrix(l: u32) -> &'static Array2<f64> {
    &PURE_TRAFO_MATS[l as usize]
}

/// Transform a Cartesian one-electron block to the pure basis on each side
/// that asks for it.
pub(crate) fn transform_oe_block<T>(
    block: Array2<T>,
    l1: u32,
    pure1: bool,
    l2: u32,
    pure2: bool,
) -> Array2<T>
where
    T: ndarray::LinalgScalar + From<f64>,
{
    let mut block = block;
    if pure1 {
        let trafo1 = pure_transformation_matrix(l1).mapv(T::from);
        block = trafo1.dot(&block);
    }
    if pure2 {
        let trafo2 = pure_transformation_matrix(l2).mapv(T::from);
        block = block.dot(&trafo2.t());
    }
    block
}

/// Transform a Cartesian shell-quartet block to the pure basis, one tensor
/// axis at a time.
pub(crate) fn transform_te_block<T>(block: Array4<T>, shells_lp: [(u32, bool); 4]) -> Array4<T>
where
    T: ndarray::LinalgScalar + From<f64>,
{
    const AXIS_CONTRACTIONS: [&str; 4] = [
        "ap,pqrs->aqrs",
        "bq,aqrs->abrs",
        "cr,abrs->abcs",
        "ds,abcs->abcd",
    ];
    let mut block = block.into_dyn();
    for (axis, &(l, pure)) in shells_lp.iter().enumerate() {
        if pure {
            let trafo = pure_transformation_matrix(l).mapv(T::from);
            block = einsum(AXIS_CONTRACTIONS[axis], &[&trafo, &block]).unwrap();
        }
    }
    block.into_dimensionality::<Ix4>().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_s_and_p_shells_transform_trivially() {
        assert_eq!(pure_transformation_matrix(0), &array![[1.0]]);
        let p_mat = pure_transformation_matrix(1);
        // rows m = -1, 0, +1 pick y, z, x out of the lexicographic x, y, z
        let expected = array![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        for (entry, exp) in p_mat.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(entry, exp, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_d_shell_matrix() {
        let sqrt3 = 3.0_f64.sqrt();
        // columns: xx, xy, xz, yy, yz, zz
        let expected = array![
            [0.0, sqrt3, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, sqrt3, 0.0],
            [-0.5, 0.0, 0.0, -0.5, 0.0, 1.0],
            [0.0, 0.0, sqrt3, 0.0, 0.0, 0.0],
            [0.5 * sqrt3, 0.0, 0.0, -0.5 * sqrt3, 0.0, 0.0],
        ];
        let d_mat = pure_transformation_matrix(2);
        assert_eq!(d_mat.dim(), (5, 6));
        for (entry, exp) in d_mat.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(entry, exp, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_matrix_shapes_up_to_lmax() {
        for l in 0..=LMAX {
            let mat = pure_transformation_matrix(l);
            assert_eq!(
                mat.dim(),
                ((2 * l + 1) as usize, ((l + 1) * (l + 2) / 2) as usize)
            );
        }
    }

    #[test]
    fn test_oe_block_transform_shapes() {
        let block = Array2::<f64>::ones((6, 3));
        let transformed = transform_oe_block(block, 2, true, 1, true);
        assert_eq!(transformed.dim(), (5, 3));

        let block = Array2::<f64>::ones((6, 3));
        let cart_only = transform_oe_block(block.clone(), 2, false, 1, false);
        assert_eq!(cart_only, block);
    }

    #[test]
    fn test_te_block_transform_p_identity() {
        // the p transformation is a permutation; a quartet of pure p shells
        // must keep the multiset of values
        let mut block = Array4::<f64>::zeros((3, 3, 3, 3));
        for (idx, entry) in block.iter_mut().enumerate() {
            *entry = idx as f64;
        }
        let transformed = transform_te_block(block.clone(), [(1, true); 4]);
        assert_eq!(transformed.dim(), (3, 3, 3, 3));
        let mut orig: Vec<f64> = block.iter().copied().collect();
        let mut trans: Vec<f64> = transformed.iter().copied().collect();
        orig.sort_by(|a, b| a.partial_cmp(b).unwrap());
        trans.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (a, b) in orig.iter().zip(&trans) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-13);
        }
    }
}
