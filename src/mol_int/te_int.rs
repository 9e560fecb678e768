#![allow(non_snake_case)]
//! Two-electron Coulomb repulsion integrals over shell quartets.
//!
//! Each electron's primitive pair is combined into one Hermite expansion
//! first; the two expansions then meet in the Hermite Coulomb integral
//! R_tuv evaluated at P - Q with the reduced exponent pq/(p+q)
//! (Helgaker, Jorgensen, Olsen, 2000, eq. 9.9.33).

use crate::basisset::Shell;
use crate::mol_int::oe_int::{calc_vec_BA, calc_vec_P};
use crate::mol_int::recurrence_rel::{EHermCoeff3D, RHermAuxInt};
use crate::mol_int::sph_trafo::transform_te_block;
use crate::molecule::cartesian_comp::{CC_X, CC_Y, CC_Z};
use lazy_static::lazy_static;
use ndarray::Array4;
use std::f64::consts::PI;

/// Dense block of (sh1 sh2 | sh3 sh4) repulsion integrals in chemists'
/// ordering: electron 1 carries the first two indices, electron 2 the last
/// two.
pub fn calc_coulomb_shblock(shells: [&Shell; 4]) -> Array4<f64> {
    lazy_static! {
        static ref ERI_PI_FAC: f64 = 2.0 * PI * PI * PI.sqrt(); // 2 * pi^(5/2)
    }
    let [sh1, sh2, sh3, sh4] = shells;
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let tuples3 = sh3.cartesian_exponents();
    let tuples4 = sh4.cartesian_exponents();
    let mut block = Array4::<f64>::zeros((
        tuples1.len(),
        tuples2.len(),
        tuples3.len(),
        tuples4.len(),
    ));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());
    let vec_DC = calc_vec_BA(sh3.center(), sh4.center());
    let max_boys_order =
        (sh1.ang_mom() + sh2.ang_mom() + sh3.ang_mom() + sh4.ang_mom()) as usize;

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            for (&alpha3, &coeff3) in sh3.exponents().iter().zip(sh3.coefficients()) {
                for (&alpha4, &coeff4) in sh4.exponents().iter().zip(sh4.coefficients()) {
                    let p = alpha1 + alpha2;
                    let q = alpha3 + alpha4;
                    let new_alph = p * q / (p + q);
                    let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
                    let vec_Q = calc_vec_P(alpha3, alpha4, sh3.center(), sh4.center());
                    let vec_PQ = calc_vec_BA(vec_P, vec_Q);

                    let R_tuv = RHermAuxInt::new(max_boys_order, vec_PQ, new_alph);
                    let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
                    let E_cd = EHermCoeff3D::new(alpha3, alpha4, &vec_DC);

                    let ERI_fac = *ERI_PI_FAC / (p * q * (p + q).sqrt());
                    let coeff_prod = coeff1 * coeff2 * coeff3 * coeff4 * ERI_fac;

                    for (idx1, l1) in tuples1.iter().enumerate() {
                        for (idx2, l2) in tuples2.iter().enumerate() {
                            for (idx3, l3) in tuples3.iter().enumerate() {
                                for (idx4, l4) in tuples4.iter().enumerate() {
                                    let eri_val = calc_ERI_prim_sum(
                                        &E_ab, &E_cd, &R_tuv, l1, l2, l3, l4,
                                    );
                                    block[(idx1, idx2, idx3, idx4)] += coeff_prod * eri_val;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    transform_te_block(
        block,
        [
            (sh1.ang_mom(), sh1.is_pure()),
            (sh2.ang_mom(), sh2.is_pure()),
            (sh3.ang_mom(), sh3.is_pure()),
            (sh4.ang_mom(), sh4.is_pure()),
        ],
    )
}

/// The double Hermite sum for one component quadruple,
/// sum_tuv sum_tau,nu,phi (-1)^(tau+nu+phi) E^ab E^cd R_(t+tau, u+nu, v+phi).
#[inline(always)]
fn calc_ERI_prim_sum(
    E_ab: &EHermCoeff3D,
    E_cd: &EHermCoeff3D,
    R_tuv: &RHermAuxInt,
    l1: &[i32; 3],
    l2: &[i32; 3],
    l3: &[i32; 3],
    l4: &[i32; 3],
) -> f64 {
    let mut eri_val = 0.0_f64;
    for tau in 0..=(l3[CC_X] + l4[CC_X]) {
        let E_cd_ij = E_cd.E_ij.calc_recurr_rel(l3[CC_X], l4[CC_X], tau, 0);
        for nu in 0..=(l3[CC_Y] + l4[CC_Y]) {
            let E_cd_kl = E_cd.E_kl.calc_recurr_rel(l3[CC_Y], l4[CC_Y], nu, 0);
            for phi in 0..=(l3[CC_Z] + l4[CC_Z]) {
                let E_cd_mn = E_cd.E_mn.calc_recurr_rel(l3[CC_Z], l4[CC_Z], phi, 0);
                let E_cd_prod = E_cd_ij * E_cd_kl * E_cd_mn;
                if E_cd_prod == 0.0 {
                    continue;
                }
                let min_fac = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
                for t in 0..=(l1[CC_X] + l2[CC_X]) {
                    let E_ab_ij = E_ab.E_ij.calc_recurr_rel(l1[CC_X], l2[CC_X], t, 0);
                    for u in 0..=(l1[CC_Y] + l2[CC_Y]) {
                        let E_ab_kl = E_ab.E_kl.calc_recurr_rel(l1[CC_Y], l2[CC_Y], u, 0);
                        for v in 0..=(l1[CC_Z] + l2[CC_Z]) {
                            let E_ab_mn =
                                E_ab.E_mn.calc_recurr_rel(l1[CC_Z], l2[CC_Z], v, 0);
                            let E_ab_prod = E_ab_ij * E_ab_kl * E_ab_mn;
                            if E_ab_prod == 0.0 {
                                continue;
                            }
                            let R_recurr_val =
                                R_tuv.calc_recurr_rel(t + tau, u + nu, v + phi, 0);
                            eri_val += min_fac * E_ab_prod * E_cd_prod * R_recurr_val;
                        }
                    }
                }
            }
        }
    }
    eri_val
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol_int::boys::boys_table;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_eri_ssss_same_center_closed_form() {
        let shell = Shell::new(0, false, [0.0; 3], vec![1.0], vec![1.0]).unwrap();
        let block = calc_coulomb_shblock([&shell, &shell, &shell, &shell]);
        // 2 pi^(5/2) / (p q sqrt(p+q)) F_0(0) with p = q = 2
        let eri_ref = 2.0 * PI.powf(2.5) / 8.0;
        assert_abs_diff_eq!(block[(0, 0, 0, 0)], eri_ref, epsilon = 1e-13);
    }

    #[test]
    fn test_eri_ssss_two_center_closed_form() {
        let (alpha1, alpha2) = (0.8, 1.3);
        let dist = 1.7;
        let sh_A = Shell::new(0, false, [0.0; 3], vec![alpha1], vec![1.0]).unwrap();
        let sh_B = Shell::new(0, false, [0.0, 0.0, dist], vec![alpha2], vec![1.0]).unwrap();
        let p = 2.0 * alpha1;
        let q = 2.0 * alpha2;
        let new_alph = p * q / (p + q);
        let eri_ref = 2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt())
            * boys_table(0, new_alph * dist * dist)[0];
        let block = calc_coulomb_shblock([&sh_A, &sh_A, &sh_B, &sh_B]);
        assert_abs_diff_eq!(block[(0, 0, 0, 0)], eri_ref, epsilon = 1e-13);
    }

    #[test]
    fn test_eri_oxygen_1s_sto3g() {
        let mut shell = Shell::new(
            0,
            false,
            [0.0; 3],
            vec![130.7093214, 23.80886605, 6.443608313],
            vec![0.1543289673, 0.5353281423, 0.4446345422],
        )
        .unwrap();
        shell.embed_primitive_normalization();
        let block = calc_coulomb_shblock([&shell, &shell, &shell, &shell]);
        const ERI_REF_VAL1: f64 = 4.785065751815719;
        assert_relative_eq!(block[(0, 0, 0, 0)], ERI_REF_VAL1, epsilon = 1e-9);
    }

    #[test]
    fn test_eri_block_electron_exchange() {
        let sh1 = Shell::new(0, false, [0.0; 3], vec![0.9], vec![1.0]).unwrap();
        let sh2 = Shell::new(1, false, [0.0, 0.0, 1.2], vec![1.4], vec![1.0]).unwrap();
        let sh3 = Shell::new(0, false, [0.5, 0.0, 0.0], vec![0.6], vec![1.0]).unwrap();
        let sh4 = Shell::new(1, false, [0.0, -0.4, 0.0], vec![1.1], vec![1.0]).unwrap();
        let block_1234 = calc_coulomb_shblock([&sh1, &sh2, &sh3, &sh4]);
        let block_3412 = calc_coulomb_shblock([&sh3, &sh4, &sh1, &sh2]);
        for ((a, b, c, d), val) in block_1234.indexed_iter() {
            assert_abs_diff_eq!(*val, block_3412[(c, d, a, b)], epsilon = 1e-12);
        }
    }
}
