#![allow(non_snake_case)]
//! One- and two-electron integrals over London (field-dependent) orbitals.
//!
//! The plane-wave phase of a London pair only enters through
//! `kbar = k_ket - k_bra`, so every routine here reuses the field-free
//! Hermite expansion and folds the phase in afterwards. Two devices cover
//! all operators:
//!
//! - phase-modulated 1d overlaps,
//!   `S~(i,j) = sum_t E_t (-i kbar)^t sqrt(pi/p) e^(-kbar^2/4p) e^(-i kbar P)`,
//!   from which moments and ket derivatives follow by index shifts exactly
//!   as in the field-free case
//! - for Coulomb-type integrals, a binomial resummation of the modulated
//!   Hermite coefficients about the complex-shifted center
//!   `P - i kbar/(2p)`, after which the usual `R_tuv` downward recursion
//!   runs with a complex separation and the complex-argument Boys function
//!
//! Source: E. I. Tellgren, A. Soncini, T. Helgaker, J. Chem. Phys. 129,
//! 154114 (2008)

use crate::basisset::london::LondonShell;
use crate::mol_int::oe_int::{calc_vec_BA, calc_vec_P};
use crate::mol_int::recurrence_rel::{EHermCoeff1D, EHermCoeff3D, RHermAuxIntCplx};
use crate::mol_int::sph_trafo::{binom, transform_oe_block, transform_te_block};
use crate::molecule::cartesian_comp::{Cartesian, CC_X, CC_Y, CC_Z};
use crate::operator::PointCharge;
use lazy_static::lazy_static;
use ndarray::{Array2, Array4};
use num_complex::Complex64;
use std::f64::consts::PI;
use strum::IntoEnumIterator;

/// Phase-modulated 1d overlap machinery for one primitive pair along one
/// Cartesian direction. Prefactor and Hermite sum carry the full
/// `sqrt(pi/p) e^(-kbar^2/4p) e^(-i kbar P)` weight, so products over the
/// three directions are complete matrix elements.
pub(crate) struct LondonOvlp1D {
    E_1d: EHermCoeff1D,
    alpha2: f64,
    kbar_comp: f64,
    prefac: Complex64,
}

impl LondonOvlp1D {
    pub(crate) fn new(
        alpha1: f64,
        alpha2: f64,
        one_over_alph_p: f64,
        vec_BA_comp: f64,
        kbar_comp: f64,
        vec_P_comp: f64,
    ) -> Self {
        let E_1d = EHermCoeff1D::new(alpha1, alpha2, one_over_alph_p, vec_BA_comp);
        let modulus = (PI * one_over_alph_p).sqrt()
            * (-0.25 * kbar_comp * kbar_comp * one_over_alph_p).exp();
        let prefac = Complex64::from_polar(modulus, -kbar_comp * vec_P_comp);
        Self {
            E_1d,
            alpha2,
            kbar_comp,
            prefac,
        }
    }

    /// `S~(i,j)`, the modulated overlap of the bare Cartesian factors.
    pub(crate) fn calc_mod_ovlp(&self, l1: i32, l2: i32) -> Complex64 {
        if l1 < 0 || l2 < 0 {
            return Complex64::new(0.0, 0.0);
        }
        let min_i_kbar = Complex64::new(0.0, -self.kbar_comp);
        let mut phase_pow = Complex64::new(1.0, 0.0);
        let mut herm_sum = Complex64::new(0.0, 0.0);
        for no_nodes in 0..=(l1 + l2) {
            herm_sum += self.E_1d.calc_recurr_rel(l1, l2, no_nodes, 0) * phase_pow;
            phase_pow *= min_i_kbar;
        }
        herm_sum * self.prefac
    }

    /// d/dx over the bare ket Gaussian, `j S~(i,j-1) - 2 alpha2 S~(i,j+1)`.
    pub(crate) fn calc_mod_deriv(&self, l1: i32, l2: i32) -> Complex64 {
        l2 as f64 * self.calc_mod_ovlp(l1, l2 - 1)
            - 2.0 * self.alpha2 * self.calc_mod_ovlp(l1, l2 + 1)
    }

    /// d^2/dx^2 over the bare ket Gaussian.
    pub(crate) fn calc_mod_deriv2(&self, l1: i32, l2: i32) -> Complex64 {
        (l2 * (l2 - 1)) as f64 * self.calc_mod_ovlp(l1, l2 - 2)
            - 2.0 * self.alpha2 * (2 * l2 + 1) as f64 * self.calc_mod_ovlp(l1, l2)
            + 4.0 * self.alpha2 * self.alpha2 * self.calc_mod_ovlp(l1, l2 + 2)
    }

    /// `(x - O)` over the ket, `S~(i,j+1) + (B - O) S~(i,j)`.
    pub(crate) fn calc_mod_moment(&self, l1: i32, l2: i32, ket_min_origin: f64) -> Complex64 {
        self.calc_mod_ovlp(l1, l2 + 1) + ket_min_origin * self.calc_mod_ovlp(l1, l2)
    }

    /// `(x - O)^2` over the ket.
    pub(crate) fn calc_mod_moment2(&self, l1: i32, l2: i32, ket_min_origin: f64) -> Complex64 {
        self.calc_mod_ovlp(l1, l2 + 2)
            + 2.0 * ket_min_origin * self.calc_mod_ovlp(l1, l2 + 1)
            + ket_min_origin * ket_min_origin * self.calc_mod_ovlp(l1, l2)
    }
}

pub(crate) struct LondonOvlp3D {
    S_ij: LondonOvlp1D,
    S_kl: LondonOvlp1D,
    S_mn: LondonOvlp1D,
}

impl LondonOvlp3D {
    pub(crate) fn new(
        alpha1: f64,
        alpha2: f64,
        center_A: [f64; 3],
        center_B: [f64; 3],
        vec_kbar: [f64; 3],
    ) -> Self {
        let one_over_alph_p = 1.0 / (alpha1 + alpha2);
        let vec_BA = calc_vec_BA(center_A, center_B);
        let vec_P = calc_vec_P(alpha1, alpha2, center_A, center_B);
        let S_ij = LondonOvlp1D::new(
            alpha1,
            alpha2,
            one_over_alph_p,
            vec_BA[CC_X],
            vec_kbar[CC_X],
            vec_P[CC_X],
        );
        let S_kl = LondonOvlp1D::new(
            alpha1,
            alpha2,
            one_over_alph_p,
            vec_BA[CC_Y],
            vec_kbar[CC_Y],
            vec_P[CC_Y],
        );
        let S_mn = LondonOvlp1D::new(
            alpha1,
            alpha2,
            one_over_alph_p,
            vec_BA[CC_Z],
            vec_kbar[CC_Z],
            vec_P[CC_Z],
        );
        Self { S_ij, S_kl, S_mn }
    }

    pub(crate) fn comp(&self, cart: usize) -> &LondonOvlp1D {
        match cart {
            CC_X => &self.S_ij,
            CC_Y => &self.S_kl,
            _ => &self.S_mn,
        }
    }
}

/// Hermite coefficients of the phase-modulated overlap distribution about
/// the complex-shifted center `P - i kbar/(2p)`,
/// `E~_t' = sum_(t >= t') binom(t, t') (-i kbar)^(t - t') E_t`.
fn calc_mod_herm_coeffs(
    E_1d: &EHermCoeff1D,
    l1: i32,
    l2: i32,
    kbar_comp: f64,
) -> Vec<Complex64> {
    let no_nodes_max = l1 + l2;
    let min_i_kbar = Complex64::new(0.0, -kbar_comp);
    (0..=no_nodes_max)
        .map(|t_shift| {
            let mut coeff = Complex64::new(0.0, 0.0);
            let mut phase_pow = Complex64::new(1.0, 0.0);
            for no_nodes in t_shift..=no_nodes_max {
                coeff += binom(no_nodes, t_shift)
                    * E_1d.calc_recurr_rel(l1, l2, no_nodes, 0)
                    * phase_pow;
                phase_pow *= min_i_kbar;
            }
            coeff
        })
        .collect()
}

/// `kbar = k_ket - k_bra`, the only combination of the two phase vectors
/// the integrals depend on (the gauge origin cancels in it).
fn calc_vec_kbar(lsh_bra: &LondonShell, lsh_ket: &LondonShell) -> [f64; 3] {
    calc_vec_BA(lsh_ket.k_vector(), lsh_bra.k_vector())
}

pub fn calc_overlap_shblock_london(lsh1: &LondonShell, lsh2: &LondonShell) -> Array2<Complex64> {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<Complex64>::zeros((tuples1.len(), tuples2.len()));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut mod_ovlp = Complex64::new(1.0, 0.0);
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        mod_ovlp *= S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                    }
                    block[(idx1, idx2)] += coeff_prod * mod_ovlp;
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

/// Kinetic energy over London orbitals. The ket phase contributes first
/// derivative and `|k_ket|^2` terms on top of the bare second derivative,
/// `T = -1/2 sum_d D2~_d + i sum_d k_ket_d D~_d + 1/2 |k_ket|^2 S~`.
pub fn calc_kinetic_shblock_london(lsh1: &LondonShell, lsh2: &LondonShell) -> Array2<Complex64> {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<Complex64>::zeros((tuples1.len(), tuples2.len()));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let vec_k_ket = lsh2.k_vector();
    let k_ket_sq = vec_k_ket[CC_X] * vec_k_ket[CC_X]
        + vec_k_ket[CC_Y] * vec_k_ket[CC_Y]
        + vec_k_ket[CC_Z] * vec_k_ket[CC_Z];

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut deriv_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut deriv2_1d = [Complex64::new(0.0, 0.0); 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                        deriv_1d[d] = S_ab.comp(d).calc_mod_deriv(l1[d], l2[d]);
                        deriv2_1d[d] = S_ab.comp(d).calc_mod_deriv2(l1[d], l2[d]);
                    }
                    let mut kin =
                        0.5 * k_ket_sq * (ovlp_1d[CC_X] * ovlp_1d[CC_Y] * ovlp_1d[CC_Z]);
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        kin += (-0.5 * deriv2_1d[d]
                            + Complex64::i() * vec_k_ket[d] * deriv_1d[d])
                            * (ovlp_1d[e] * ovlp_1d[f]);
                    }
                    block[(idx1, idx2)] += coeff_prod * kin;
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

pub fn calc_nuc_attr_shblock_london(
    lsh1: &LondonShell,
    lsh2: &LondonShell,
    point_charges: &[PointCharge],
) -> Array2<Complex64> {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut block = Array2::<Complex64>::zeros((tuples1.len(), tuples2.len()));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let kbar_sq = vec_kbar[CC_X] * vec_kbar[CC_X]
        + vec_kbar[CC_Y] * vec_kbar[CC_Y]
        + vec_kbar[CC_Z] * vec_kbar[CC_Z];
    let max_boys_order = (sh1.ang_mom() + sh2.ang_mom()) as usize;

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let alph_p = alpha1 + alpha2;
            let one_over_p = 1.0 / alph_p;
            let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
            let vec_P = calc_vec_P(alpha1, alpha2, sh1.center(), sh2.center());
            let kbar_dot_P = vec_kbar[CC_X] * vec_P[CC_X]
                + vec_kbar[CC_Y] * vec_P[CC_Y]
                + vec_kbar[CC_Z] * vec_P[CC_Z];
            let phase_fac = Complex64::from_polar(
                (-0.25 * kbar_sq * one_over_p).exp(),
                -kbar_dot_P,
            );
            // Boys table per primitive pair and charge, with the center
            // separation shifted into the complex plane by the phase
            let R_tuv_per_charge: Vec<(f64, RHermAuxIntCplx)> = point_charges
                .iter()
                .map(|charge| {
                    let vec_CP = calc_vec_BA(vec_P, charge.position());
                    let vec_CP_shifted: [Complex64; 3] = std::array::from_fn(|d| {
                        Complex64::new(vec_CP[d], -0.5 * vec_kbar[d] * one_over_p)
                    });
                    (
                        charge.charge(),
                        RHermAuxIntCplx::new(max_boys_order, vec_CP_shifted, alph_p),
                    )
                })
                .collect();
            let coeff_prod = coeff1 * coeff2 * 2.0 * PI * one_over_p;

            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let E_mod_x =
                        calc_mod_herm_coeffs(E_ab.comp(CC_X), l1[CC_X], l2[CC_X], vec_kbar[CC_X]);
                    let E_mod_y =
                        calc_mod_herm_coeffs(E_ab.comp(CC_Y), l1[CC_Y], l2[CC_Y], vec_kbar[CC_Y]);
                    let E_mod_z =
                        calc_mod_herm_coeffs(E_ab.comp(CC_Z), l1[CC_Z], l2[CC_Z], vec_kbar[CC_Z]);
                    let mut nuc_attr = Complex64::new(0.0, 0.0);
                    for t in 0..=(l1[CC_X] + l2[CC_X]) {
                        for u in 0..=(l1[CC_Y] + l2[CC_Y]) {
                            for v in 0..=(l1[CC_Z] + l2[CC_Z]) {
                                let E_prod = E_mod_x[t as usize]
                                    * E_mod_y[u as usize]
                                    * E_mod_z[v as usize];
                                if E_prod == Complex64::new(0.0, 0.0) {
                                    continue;
                                }
                                let mut herm_sum = Complex64::new(0.0, 0.0);
                                for (charge, R_tuv) in &R_tuv_per_charge {
                                    herm_sum += *charge * R_tuv.calc_recurr_rel(t, u, v, 0);
                                }
                                nuc_attr += E_prod * herm_sum;
                            }
                        }
                    }
                    block[(idx1, idx2)] -= coeff_prod * (phase_fac * nuc_attr);
                }
            }
        }
    }

    transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
}

pub fn calc_dipole_shblock_london(
    lsh1: &LondonShell,
    lsh2: &LondonShell,
    origin: [f64; 3],
) -> [Array2<Complex64>; 3] {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<Complex64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let vec_BO = calc_vec_BA(sh2.center(), origin);

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut moment_1d = [Complex64::new(0.0, 0.0); 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                        moment_1d[d] = S_ab.comp(d).calc_mod_moment(l1[d], l2[d], vec_BO[d]);
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        blocks[d][(idx1, idx2)] +=
                            coeff_prod * (moment_1d[d] * ovlp_1d[e] * ovlp_1d[f]);
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

pub fn calc_quadrupole_shblock_london(
    lsh1: &LondonShell,
    lsh2: &LondonShell,
    origin: [f64; 3],
) -> [Array2<Complex64>; 6] {
    const QUAD_PAIRS: [(usize, usize); 6] = [
        (CC_X, CC_X),
        (CC_X, CC_Y),
        (CC_X, CC_Z),
        (CC_Y, CC_Y),
        (CC_Y, CC_Z),
        (CC_Z, CC_Z),
    ];
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<Complex64>; 6] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let vec_BO = calc_vec_BA(sh2.center(), origin);

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut moment_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut moment2_1d = [Complex64::new(0.0, 0.0); 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                        moment_1d[d] = S_ab.comp(d).calc_mod_moment(l1[d], l2[d], vec_BO[d]);
                        moment2_1d[d] = S_ab.comp(d).calc_mod_moment2(l1[d], l2[d], vec_BO[d]);
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

/// Linear momentum over London orbitals,
/// `p_d = -i D~_d prod S~ - k_ket_d prod S~`: the ket phase shifts the
/// canonical momentum by its own wave vector.
pub fn calc_lin_mom_shblock_london(
    lsh1: &LondonShell,
    lsh2: &LondonShell,
) -> [Array2<Complex64>; 3] {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<Complex64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let vec_k_ket = lsh2.k_vector();

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut deriv_1d = [Complex64::new(0.0, 0.0); 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                        deriv_1d[d] = S_ab.comp(d).calc_mod_deriv(l1[d], l2[d]);
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        let ovlp_prod_ef = ovlp_1d[e] * ovlp_1d[f];
                        let val = -Complex64::i() * deriv_1d[d] * ovlp_prod_ef
                            - vec_k_ket[d] * (ovlp_1d[d] * ovlp_prod_ef);
                        blocks[d][(idx1, idx2)] += coeff_prod * val;
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

/// Angular momentum about `origin` over London orbitals. The gradient over
/// the full ket is `D~_f - i k_ket_f S~_f` per direction, the rest is the
/// field-free cross product assembly.
pub fn calc_ang_mom_shblock_london(
    lsh1: &LondonShell,
    lsh2: &LondonShell,
    origin: [f64; 3],
) -> [Array2<Complex64>; 3] {
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let mut blocks: [Array2<Complex64>; 3] =
        std::array::from_fn(|_| Array2::zeros((tuples1.len(), tuples2.len())));
    let vec_kbar = calc_vec_kbar(lsh1, lsh2);
    let vec_k_ket = lsh2.k_vector();
    let vec_BO = calc_vec_BA(sh2.center(), origin);

    for (&alpha1, &coeff1) in sh1.exponents().iter().zip(sh1.coefficients()) {
        for (&alpha2, &coeff2) in sh2.exponents().iter().zip(sh2.coefficients()) {
            let S_ab = LondonOvlp3D::new(alpha1, alpha2, sh1.center(), sh2.center(), vec_kbar);
            let coeff_prod = coeff1 * coeff2;
            for (idx1, l1) in tuples1.iter().enumerate() {
                for (idx2, l2) in tuples2.iter().enumerate() {
                    let mut ovlp_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut moment_1d = [Complex64::new(0.0, 0.0); 3];
                    let mut grad_1d = [Complex64::new(0.0, 0.0); 3];
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        ovlp_1d[d] = S_ab.comp(d).calc_mod_ovlp(l1[d], l2[d]);
                        moment_1d[d] = S_ab.comp(d).calc_mod_moment(l1[d], l2[d], vec_BO[d]);
                        grad_1d[d] = S_ab.comp(d).calc_mod_deriv(l1[d], l2[d])
                            - Complex64::i() * vec_k_ket[d] * ovlp_1d[d];
                    }
                    for cart in Cartesian::iter() {
                        let d = cart as usize;
                        let (e, f) = cart.cyclic_followers();
                        let val = -Complex64::i()
                            * ovlp_1d[d]
                            * (moment_1d[e] * grad_1d[f] - moment_1d[f] * grad_1d[e]);
                        blocks[d][(idx1, idx2)] += coeff_prod * val;
                    }
                }
            }
        }
    }

    blocks.map(|block| {
        transform_oe_block(block, sh1.ang_mom(), sh1.is_pure(), sh2.ang_mom(), sh2.is_pure())
    })
}

/// Coulomb repulsion over a London shell quartet. Each electron's pair
/// phase is resummed into modulated Hermite coefficients; the Hermite
/// Coulomb recursion then runs over the complex-shifted separation
/// `(P - Q) - i (kbar_12/2p - kbar_34/2q)`.
pub fn calc_coulomb_shblock_london(lshells: [&LondonShell; 4]) -> Array4<Complex64> {
    lazy_static! {
        static ref ERI_PI_FAC: f64 = 2.0 * PI * PI * PI.sqrt(); // 2 * pi^(5/2)
    }
    let [lsh1, lsh2, lsh3, lsh4] = lshells;
    let (sh1, sh2) = (lsh1.shell(), lsh2.shell());
    let (sh3, sh4) = (lsh3.shell(), lsh4.shell());
    let tuples1 = sh1.cartesian_exponents();
    let tuples2 = sh2.cartesian_exponents();
    let tuples3 = sh3.cartesian_exponents();
    let tuples4 = sh4.cartesian_exponents();
    let mut block = Array4::<Complex64>::zeros((
        tuples1.len(),
        tuples2.len(),
        tuples3.len(),
        tuples4.len(),
    ));
    let vec_BA = calc_vec_BA(sh1.center(), sh2.center());
    let vec_DC = calc_vec_BA(sh3.center(), sh4.center());
    let vec_kbar_12 = calc_vec_kbar(lsh1, lsh2);
    let vec_kbar_34 = calc_vec_kbar(lsh3, lsh4);
    let kbar_12_sq = vec_kbar_12[CC_X] * vec_kbar_12[CC_X]
        + vec_kbar_12[CC_Y] * vec_kbar_12[CC_Y]
        + vec_kbar_12[CC_Z] * vec_kbar_12[CC_Z];
    let kbar_34_sq = vec_kbar_34[CC_X] * vec_kbar_34[CC_X]
        + vec_kbar_34[CC_Y] * vec_kbar_34[CC_Y]
        + vec_kbar_34[CC_Z] * vec_kbar_34[CC_Z];
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
                    let vec_PQ_shifted: [Complex64; 3] = std::array::from_fn(|d| {
                        Complex64::new(
                            vec_PQ[d],
                            -(0.5 * vec_kbar_12[d] / p - 0.5 * vec_kbar_34[d] / q),
                        )
                    });

                    let R_tuv = RHermAuxIntCplx::new(max_boys_order, vec_PQ_shifted, new_alph);
                    let E_ab = EHermCoeff3D::new(alpha1, alpha2, &vec_BA);
                    let E_cd = EHermCoeff3D::new(alpha3, alpha4, &vec_DC);

                    let kbar_12_dot_P = vec_kbar_12[CC_X] * vec_P[CC_X]
                        + vec_kbar_12[CC_Y] * vec_P[CC_Y]
                        + vec_kbar_12[CC_Z] * vec_P[CC_Z];
                    let kbar_34_dot_Q = vec_kbar_34[CC_X] * vec_Q[CC_X]
                        + vec_kbar_34[CC_Y] * vec_Q[CC_Y]
                        + vec_kbar_34[CC_Z] * vec_Q[CC_Z];
                    let phase_12 = Complex64::from_polar(
                        (-0.25 * kbar_12_sq / p).exp(),
                        -kbar_12_dot_P,
                    );
                    let phase_34 = Complex64::from_polar(
                        (-0.25 * kbar_34_sq / q).exp(),
                        -kbar_34_dot_Q,
                    );
                    let ERI_fac = *ERI_PI_FAC / (p * q * (p + q).sqrt());
                    let coeff_prod =
                        (coeff1 * coeff2 * coeff3 * coeff4 * ERI_fac) * (phase_12 * phase_34);

                    for (idx1, l1) in tuples1.iter().enumerate() {
                        for (idx2, l2) in tuples2.iter().enumerate() {
                            let E_mod_ab_x = calc_mod_herm_coeffs(
                                E_ab.comp(CC_X),
                                l1[CC_X],
                                l2[CC_X],
                                vec_kbar_12[CC_X],
                            );
                            let E_mod_ab_y = calc_mod_herm_coeffs(
                                E_ab.comp(CC_Y),
                                l1[CC_Y],
                                l2[CC_Y],
                                vec_kbar_12[CC_Y],
                            );
                            let E_mod_ab_z = calc_mod_herm_coeffs(
                                E_ab.comp(CC_Z),
                                l1[CC_Z],
                                l2[CC_Z],
                                vec_kbar_12[CC_Z],
                            );
                            for (idx3, l3) in tuples3.iter().enumerate() {
                                for (idx4, l4) in tuples4.iter().enumerate() {
                                    let E_mod_cd_x = calc_mod_herm_coeffs(
                                        E_cd.comp(CC_X),
                                        l3[CC_X],
                                        l4[CC_X],
                                        vec_kbar_34[CC_X],
                                    );
                                    let E_mod_cd_y = calc_mod_herm_coeffs(
                                        E_cd.comp(CC_Y),
                                        l3[CC_Y],
                                        l4[CC_Y],
                                        vec_kbar_34[CC_Y],
                                    );
                                    let E_mod_cd_z = calc_mod_herm_coeffs(
                                        E_cd.comp(CC_Z),
                                        l3[CC_Z],
                                        l4[CC_Z],
                                        vec_kbar_34[CC_Z],
                                    );
                                    let mut eri_val = Complex64::new(0.0, 0.0);
                                    for tau in 0..=(l3[CC_X] + l4[CC_X]) {
                                        for nu in 0..=(l3[CC_Y] + l4[CC_Y]) {
                                            for phi in 0..=(l3[CC_Z] + l4[CC_Z]) {
                                                let E_cd_prod = E_mod_cd_x[tau as usize]
                                                    * E_mod_cd_y[nu as usize]
                                                    * E_mod_cd_z[phi as usize];
                                                if E_cd_prod == Complex64::new(0.0, 0.0) {
                                                    continue;
                                                }
                                                let min_fac = if (tau + nu + phi) % 2 == 0 {
                                                    1.0
                                                } else {
                                                    -1.0
                                                };
                                                for t in 0..=(l1[CC_X] + l2[CC_X]) {
                                                    for u in 0..=(l1[CC_Y] + l2[CC_Y]) {
                                                        for v in 0..=(l1[CC_Z] + l2[CC_Z]) {
                                                            let E_ab_prod = E_mod_ab_x
                                                                [t as usize]
                                                                * E_mod_ab_y[u as usize]
                                                                * E_mod_ab_z[v as usize];
                                                            if E_ab_prod
                                                                == Complex64::new(0.0, 0.0)
                                                            {
                                                                continue;
                                                            }
                                                            let R_recurr_val = R_tuv
                                                                .calc_recurr_rel(
                                                                    t + tau,
                                                                    u + nu,
                                                                    v + phi,
                                                                    0,
                                                                );
                                                            eri_val += min_fac
                                                                * (E_ab_prod
                                                                    * E_cd_prod
                                                                    * R_recurr_val);
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
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
