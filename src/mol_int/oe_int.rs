#![allow(non_snake_case)]
//! One-electron integrals over shell pairs.
//!
//! Every routine walks the same structure: loop over primitive pairs, build
//! the Hermite expansion coefficients once per pair, loop over the
//! Cartesian component tuples, accumulate into a dense block, and finally
//! transform to the pure basis where a shell asks for it. The operators
//! differ only in which 1d ingredients they take from the expansion
//! (Helgaker, Jorgensen, Olsen, 2000, ch. 9.3-9.5):
//!
//! - overlap: E_0 products
//! - kinetic: E_0 at shifted ket angular momentum (eq. 9.3.4)
//! - multipole: Hermite orders 1 and 2 paired with Hermite moments (eq. 9.5.43)
//! - momentum: first derivative of E_0 with respect to the center separation
//! - nuclear attraction: E products against the Hermite Coulomb integral R_tuv

use crate::basisset::Shell;
use crate::mol_int::recurrence_rel::{EHermCoeff3D, RHermAuxInt};
use crate::mol_int::sph_trafo::transform_oe_block;
use crate::molecule::cartesian_comp::{Cartesian, CC_X, CC_Y, CC_Z};
use crate::operator::PointCharge;
use lazy_static::lazy_static;
use ndarray::Array2;
use std::f64::consts::PI;
use strum::IntoEnumIterator;

#[inline(always)]
pub(crate) fn calc_vec_BA(center_A: [f64; 3], center_B: [f64; 3]) -> [f64; 3] {
    [
        center_A[CC_X] - center_B[CC_X],
        center_A[CC_Y] - center_B[CC_Y],
        center_A[CC_Z] - center_B[CC_Z],
    ]
}

/// Center of the product Gaussian, P = (alpha1 A + alpha2 B) / (alpha1 + alpha2).
#[inline(always)]
pub(crate) fn calc_vec_P(
    alpha1: f64,
    alpha2: f64,
    center_A: [f64; 3],
    center_B: [f64; 3],
) -> [f64; 3] {
    let one_over_p = 1.0 / (alpha1 + alpha2);
    [
        (alpha1 * center_A[CC_X] + alpha2 * center_B[CC_X]) * one_over_p,
        (alpha1 * center_A[CC_Y] + alpha2 * center_B[CC_Y]) * one_over_p,
        (alpha1 * center_A[CC_Z] + alpha2 * center_B[CC_Z]) * one_over_p,
    ]
}

pub fn calc_overlap_shblock(sh1: &Shell, sh2: &Shell) -> Array2<f64> {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<f64>::zeros((tuples1.len(), tuples2.len()));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    block[(idx1, idx2)] += coeff_prod * E_ab.calc_recurr_rel(l1, l2, &[0; 3]);
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

pub fn calc_kinetic_shblock(sh1: &Shell, sh2: &Shell) -> Array2<f64> {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<f64>::zeros((tuples1.len(), tuples2.len()));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    // second ket derivative per direction, Helgaker eq. 9.3.4
                    let mut ovlp_1d = [0.0; 3];
                    let mut ddx2_1d = [0.0; 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let l2_d = l2[d];
                        let (E_pl_2, E_0, E_min_2) =
                            E_ab.comp(d).calc_recurr_rel_for_kin(l1[d], l2_d);
                        ovlp_1d[d] = E_0;
                        ddx2_1d[d] = (l2_d * (l2_d - 1)) as f64 * E_min_2
                            - 2.0 * alpha2 * (2 * l2_d + 1) as f64 * E_0
                            + 4.0 * alpha2 * alpha2 * E_pl_2;
                    }
                    let kin = -0.5
                        * (ddx2_1d[CC_X] * ovlp_1d[CC_Y] * ovlp_1d[CC_Z]
                            + ovlp_1d[CC_X] * ddx2_1d[CC_Y] * ovlp_1d[CC_Z]
                            + ovlp_1d[CC_X] * ovlp_1d[CC_Y] * ddx2_1d[CC_Z]);
                    block[(idx1, idx2)] += coeff_prod * kin;
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

/// Attraction to a set of point charges,
/// V = -sum_A Z_A (2 pi / p) sum_tuv E_t E_u E_v R_tuv(P - C_A).
pub fn calc_nuc_attr_shblock(sh1: &Shell, sh2: &Shell, point_charges: &[PointCharge]) -> Array2<f64> {
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<f64>::zeros((tuples1.len(), tuples2.len()));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());
    let max_boys_order = (sh1.ang_mom() + sh2.ang_mom()) as usize;

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let alph_p = alpha1 + alpha2;
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
            // one Boys table per primitive pair and charge
            let R_tuv_per_charge: Vec<(f64, RHermAuxInt)> = point_charges
                .iter()
                .map(|charge| {
                    let vec_CP = calc_vec_BA(vec_P, charge.position());
                    (charge.charge(), RHermAuxInt::new(max_boys_order, vec_CP, alph_p))
                })
                .collect();
            let coeff_prod = coeff1 * coeff2 * 2.0 * PI / alph_p;

            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut nuc_attr = 0.0;
                    for t in 0..=(l1[CC_X] + l2[CC_X]) {
                        for u in 0..=(l1[CC_Y] + l2[CC_Y]) {
                            for v in 0..=(l1[CC_Z] + l2[CC_Z]) {
                                let E_prod = E_ab.calc_recurr_rel(l1, l2, &[t, u, v]);
                                if E_prod == 0.0 {
                                    continue;
                                }
                                let mut herm_sum = 0.0;
                                for (charge, R_tuv) in &R_tuv_per_charge {
                                    herm_sum += charge * R_tuv.calc_recurr_rel(t, u, v, 0);
                                }
                                nuc_attr += E_prod * herm_sum;
                            }
                        }
                    }
                    block[(idx1, idx2)] -= coeff_prod * nuc_attr;
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

/// Electronic dipole components (r - O), in the order x, y, z.
pub fn calc_dipole_shblock(sh1: &Shell, sh2: &Shell, origin: [f64; 3]) -> [Array2<f64>; 3] {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<f64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
            let vec_PO = calc_vec_BA(vec_P, origin);

            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [0.0; 3];
                    let mut moment_1d = [0.0; 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let E_0 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 0);
                        let E_1 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 1, 0);
                        ovlp_1d[d] = E_0;
                        // S^1_ij = E_1 + X_PC E_0, Helgaker eq. 9.5.43
                        moment_1d[d] = E_1 + vec_PO[d] * E_0;
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        blocks[d][(idx1, idx2)] +=
                            coeff_prod * moment_1d[d] * ovlp_1d[e] * ovlp_1d[f];
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

/// Second electronic moment components (r - O)(r - O), in the order
/// xx, xy, xz, yy, yz, zz.
pub fn calc_quadrupole_shblock(sh1: &Shell, sh2: &Shell, origin: [f64; 3]) -> [Array2<f64>; 6] {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    const QUAD_PAIRS: [(usize, usize); 6] = [
        (CC_X, CC_X),
        (CC_X, CC_Y),
        (CC_X, CC_Z),
        (CC_Y, CC_Y),
        (CC_Y, CC_Z),
        (CC_Z, CC_Z),
    ];
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<f64>; 6] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let one_over_2p = 0.5 / (alpha1 + alpha2);
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
            let vec_PO = calc_vec_BA(vec_P, origin);

            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [0.0; 3];
                    let mut moment_1d = [0.0; 3];
                    let mut moment2_1d = [0.0; 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let E_0 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 0);
                        let E_1 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 1, 0);
                        let E_2 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 2, 0);
                        ovlp_1d[d] = E_0;
                        moment_1d[d] = E_1 + vec_PO[d] * E_0;
                        // S^2_ij = 2 E_2 + 2 X_PC E_1 + (X_PC^2 + 1/2p) E_0
                        moment2_1d[d] = 2.0 * E_2
                            + 2.0 * vec_PO[d] * E_1
                            + (vec_PO[d] * vec_PO[d] + one_over_2p) * E_0;
                    }
                    for (comp, &(d1, d2)) in QUAD_PAIRS.iter().enumerate() {
                        let quad = if d1 == d2 {
                            moment2_1d[d1] * ovlp_1d[(d1 + 1) % 3] * ovlp_1d[(d1 + 2) % 3]
                        } else {
                            moment_1d[d1] * moment_1d[d2] * ovlp_1d[3 - d1 - d2]
                        };
                        blocks[comp][(idx1, idx2)] += coeff_prod * quad;
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

/// Real carrier of the linear momentum operator: the matrix of d/dx_d over
/// the ket, so that p_d = -i times this block. The carrier is computed as
/// the first derivative of the overlap with respect to the center
/// separation A - B, which the generalized Hermite recursion provides
/// directly.
pub fn calc_lin_mom_shblock(sh1: &Shell, sh2: &Shell) -> [Array2<f64>; 3] {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<f64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [0.0; 3];
                    let mut deriv_1d = [0.0; 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 0);
                        deriv_1d[d] = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 1);
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        blocks[d][(idx1, idx2)] +=
                            coeff_prod * deriv_1d[d] * ovlp_1d[e] * ovlp_1d[f];
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

/// Real carrier of the angular momentum operator about `origin`: the matrix
/// of ((r - O) x nabla)_d over the ket, so that l_d = -i times this block.
pub fn calc_ang_mom_shblock(sh1: &Shell, sh2: &Shell, origin: [f64; 3]) -> [Array2<f64>; 3] {
    lazy_static! {
        static ref PI_FAC: f64 = PI.powf(1.5);
    }
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<f64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let E_to_S_fac = *PI_FAC * (1.0 / (alpha1 + alpha2)).powf(1.5);
            let coeff_prod = coeff1 * coeff2 * E_to_S_fac;
            let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
            let vec_PO = calc_vec_BA(vec_P, origin);

            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [0.0; 3];
                    let mut moment_1d = [0.0; 3];
                    let mut deriv_1d = [0.0; 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let E_0 = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 0);
                        ovlp_1d[d] = E_0;
                        moment_1d[d] =
                            E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 1, 0) + vec_PO[d] * E_0;
                        deriv_1d[d] = E_ab.comp(d).calc_recurr_rel(l1[d], l2[d], 0, 1);
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        // ((r-O) x nabla)_d = (r-O)_e d_f - (r-O)_f d_e
                        blocks[d][(idx1, idx2)] += coeff_prod
                            * ovlp_1d[d]
                            * (moment_1d[e] * deriv_1d[f] - moment_1d[f] * deriv_1d[e]);
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}
