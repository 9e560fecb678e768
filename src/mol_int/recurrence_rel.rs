#![allow(non_snake_case)]
use crate::mol_int::boys::{boys_table, boys_table_cplx};
use crate::molecule::cartesian_comp::{CC_X, CC_Y, CC_Z};
use num_complex::Complex64;

#[derive(Debug, Default)]
pub(crate) struct EHermCoeff3D {
    // Coefficients for the Hermite expansion of Cartesian Gaussian functions.
    // Generalized over the Hermite order and the derivative degree, so the
    // same recursion serves overlap, multipole, momentum and Coulomb work.
    // See: Molecular Electronic-Structure Theory, Helgaker, Jorgensen, Olsen, 2000
    pub(crate) E_ij: EHermCoeff1D, // x comp
    pub(crate) E_kl: EHermCoeff1D, // y comp
    pub(crate) E_mn: EHermCoeff1D, // z comp
}

#[derive(Debug, Default)]
pub(crate) struct EHermCoeff1D {
    // Coefficients for the Hermite expansion of Cartesian Gaussian functions (1d)
    // See: Molecular Electronic-Structure Theory, Helgaker, Jorgensen, Olsen, 2000
    alpha1: f64,
    alpha2: f64,
    one_over_alph_p: f64,
    vec_BA_comp: f64, // x, y, or z component of the vector from B to A (A_i - B_i)
    mu: f64,          // alpha1 * alpha2 * one_over_alph_p
}

impl EHermCoeff3D {
    /// ### Note:
    /// `vec_BA` is the vector from B to A, i.e. A - B (not B - A) => BA_x = A_x - B_x
    ///
    /// ### Arguments
    /// ----------
    /// - `alpha1` : Exponent of the first Gaussian function.
    /// - `alpha2` : Exponent of the second Gaussian function.
    /// - `vec_BA` : Vector from B to A, i.e. A - B (not B - A) => BA_x = A_x - B_x
    pub(crate) fn new(alpha1: f64, alpha2: f64, vec_BA: &[f64; 3]) -> Self {
        let one_over_alph_p = 1.0 / (alpha1 + alpha2);
        let E_ij = EHermCoeff1D::new(alpha1, alpha2, one_over_alph_p, vec_BA[CC_X]);
        let E_kl = EHermCoeff1D::new(alpha1, alpha2, one_over_alph_p, vec_BA[CC_Y]);
        let E_mn = EHermCoeff1D::new(alpha1, alpha2, one_over_alph_p, vec_BA[CC_Z]);

        Self { E_ij, E_kl, E_mn }
    }

    /// Product E_t^ij E_u^kl E_v^mn over the three Cartesian directions.
    pub(crate) fn calc_recurr_rel(&self, l1: &[i32; 3], l2: &[i32; 3], no_nodes: &[i32; 3]) -> f64 {
        let E_ij_val = self.E_ij.calc_recurr_rel(l1[CC_X], l2[CC_X], no_nodes[CC_X], 0);
        let E_kl_val = self.E_kl.calc_recurr_rel(l1[CC_Y], l2[CC_Y], no_nodes[CC_Y], 0);
        let E_mn_val = self.E_mn.calc_recurr_rel(l1[CC_Z], l2[CC_Z], no_nodes[CC_Z], 0);
        E_ij_val * E_kl_val * E_mn_val
    }

    #[inline(always)]
    pub(crate) fn comp(&self, cart: usize) -> &EHermCoeff1D {
        match cart {
            CC_X => &self.E_ij,
            CC_Y => &self.E_kl,
            _ => &self.E_mn,
        }
    }
}

impl EHermCoeff1D {
    pub(crate) fn new(alpha1: f64, alpha2: f64, one_over_alph_p: f64, vec_BA_comp: f64) -> Self {
        let mu = alpha1 * alpha2 * one_over_alph_p;
        Self {
            alpha1,
            alpha2,
            one_over_alph_p,
            vec_BA_comp,
            mu,
        }
    }

    /// E_0^(i,j+2), E_0^(i,j), E_0^(i,j-2) in one call, the ingredients of
    /// the kinetic-energy formula (Helgaker eq. 9.3.4).
    pub(crate) fn calc_recurr_rel_for_kin(&self, l1: i32, l2: i32) -> (f64, f64, f64) {
        let E_ij_pl_2 = self.calc_recurr_rel(l1, l2 + 2, 0, 0);
        let E_ij = self.calc_recurr_rel(l1, l2, 0, 0);
        let E_ij_min_2 = self.calc_recurr_rel(l1, l2 - 2, 0, 0);
        (E_ij_pl_2, E_ij, E_ij_min_2)
    }

    /// Calculate the Hermite expansion coefficient E_ij^t for a cartesian direction
    /// between two contracted Gaussian functions.
    ///
    /// ### Arguments
    /// ----------
    /// `l1` : Cartesian angular momentum of the first Gaussian function. (for x, y, or z)
    ///
    /// `l2` : Cartesian angular momentum of the second Gaussian function. (for x, y, or z)
    ///
    /// `no_nodes` : Number of nodes in Hermite (depends on type of int, e.g. always zero for overlap).
    ///
    /// `deriv_deg` : Degree of the derivative with respect to the center
    /// separation A_i - B_i (0 for plain integrals, 1 for momentum-type
    /// integrals differentiating the ket).
    #[inline]
    pub(crate) fn calc_recurr_rel(&self, l1: i32, l2: i32, no_nodes: i32, deriv_deg: i32) -> f64 {
        // E_t^ij vanishes outside 0 <= t <= i + j; this also cuts the
        // descent once an index has been decremented below zero.
        if l1 < 0 || l2 < 0 || no_nodes < 0 || deriv_deg < 0 || no_nodes > (l1 + l2) {
            return 0.0;
        }

        match (l1, l2, no_nodes, deriv_deg) {
            // Base cases; 0th order deriv and 1st order deriv
            (0, 0, 0, 0) => (-self.mu * self.vec_BA_comp * self.vec_BA_comp).exp(),
            (0, 0, 0, 1) => {
                // equiv to -2.0 * mu * R_x * E_0^00
                -2.0 * self.mu
                    * self.vec_BA_comp
                    * (-self.mu * self.vec_BA_comp * self.vec_BA_comp).exp()
            }
            (0, 0, 0, _) => {
                // d^e/dX^e E_0^00 = -2 mu (X d^(e-1) + (e-1) d^(e-2)) E_0^00
                -2.0 * self.mu
                    * (self.vec_BA_comp * self.calc_recurr_rel(0, 0, 0, deriv_deg - 1)
                        + (deriv_deg - 1) as f64 * self.calc_recurr_rel(0, 0, 0, deriv_deg - 2))
            }
            (_, 0, _, _) => {
                0.5 * self.one_over_alph_p
                    * self.calc_recurr_rel(l1 - 1, l2, no_nodes - 1, deriv_deg)
                    - self.alpha2
                        * self.one_over_alph_p
                        * (self.vec_BA_comp * self.calc_recurr_rel(l1 - 1, l2, no_nodes, deriv_deg)
                            + deriv_deg as f64
                                * self.calc_recurr_rel(l1 - 1, l2, no_nodes, deriv_deg - 1))
                    + (no_nodes + 1) as f64
                        * self.calc_recurr_rel(l1 - 1, l2, no_nodes + 1, deriv_deg)
            }
            (_, _, _, _) => {
                0.5 * self.one_over_alph_p
                    * self.calc_recurr_rel(l1, l2 - 1, no_nodes - 1, deriv_deg)
                    + self.alpha1
                        * self.one_over_alph_p
                        * (self.vec_BA_comp * self.calc_recurr_rel(l1, l2 - 1, no_nodes, deriv_deg)
                            + deriv_deg as f64
                                * self.calc_recurr_rel(l1, l2 - 1, no_nodes, deriv_deg - 1))
                    + (no_nodes + 1) as f64
                        * self.calc_recurr_rel(l1, l2 - 1, no_nodes + 1, deriv_deg)
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RHermAuxInt {
    // Hermite auxiliary integral R_tuv for the Coulomb-type recursions
    // See: Molecular Electronic-Structure Theory, Helgaker, Jorgensen, Olsen, 2000
    boys_values: Vec<f64>,
    vec_CP: [f64; 3], // Vector from C to P (P - C)
    alph_p: f64,
}

impl RHermAuxInt {
    /// `max_boys_order` must be at least the largest t+u+v that will be
    /// requested; the Boys table is filled once up to that order.
    pub(crate) fn new(max_boys_order: usize, vec_CP: [f64; 3], alph_p: f64) -> Self {
        let dist_CP_sq =
            vec_CP[CC_X] * vec_CP[CC_X] + vec_CP[CC_Y] * vec_CP[CC_Y] + vec_CP[CC_Z] * vec_CP[CC_Z];
        let boys_values = boys_table(max_boys_order, alph_p * dist_CP_sq);

        Self {
            boys_values,
            vec_CP,
            alph_p,
        }
    }

    pub(crate) fn calc_recurr_rel(&self, t: i32, u: i32, v: i32, boys_order: i32) -> f64 {
        // Early return -> error in calc
        if t < 0 || v < 0 || u < 0 {
            return 0.0;
        }

        match (t, u, v) {
            (0, 0, 0) => {
                let min_fac = if boys_order % 2 == 0 { 1.0 } else { -1.0 };
                min_fac
                    * (2.0 * self.alph_p).powi(boys_order)
                    * self.boys_values[boys_order as usize]
            }
            // early return for t
            (1, _, _) => self.vec_CP[CC_X] * self.calc_recurr_rel(0, u, v, boys_order + 1),
            (t, _, _) if t > 1 => {
                (t - 1) as f64 * self.calc_recurr_rel(t - 2, u, v, boys_order + 1)
                    + self.vec_CP[CC_X] * self.calc_recurr_rel(t - 1, u, v, boys_order + 1)
            }

            // early return for u
            (_, 1, _) => self.vec_CP[CC_Y] * self.calc_recurr_rel(t, 0, v, boys_order + 1),
            (_, u, _) if u > 1 => {
                (u - 1) as f64 * self.calc_recurr_rel(t, u - 2, v, boys_order + 1)
                    + self.vec_CP[CC_Y] * self.calc_recurr_rel(t, u - 1, v, boys_order + 1)
            }

            // early return for v
            (_, _, 1) => self.vec_CP[CC_Z] * self.calc_recurr_rel(t, u, 0, boys_order + 1),
            (_, _, v) if v > 1 => {
                (v - 1) as f64 * self.calc_recurr_rel(t, u, v - 2, boys_order + 1)
                    + self.vec_CP[CC_Z] * self.calc_recurr_rel(t, u, v - 1, boys_order + 1)
            }
            _ => 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RHermAuxIntCplx {
    // Complex twin of RHermAuxInt for London integrals: the center
    // separation picks up an imaginary shift from the field phase, the
    // Boys argument becomes the bilinear square of that shifted vector.
    boys_values: Vec<Complex64>,
    vec_CP: [Complex64; 3],
    alph_p: f64,
}

impl RHermAuxIntCplx {
    pub(crate) fn new(max_boys_order: usize, vec_CP: [Complex64; 3], alph_p: f64) -> Self {
        // bilinear, not Hermitian: sum w_d^2 of the shifted components
        let dist_sq = vec_CP[CC_X] * vec_CP[CC_X]
            + vec_CP[CC_Y] * vec_CP[CC_Y]
            + vec_CP[CC_Z] * vec_CP[CC_Z];
        let boys_values = boys_table_cplx(max_boys_order, alph_p * dist_sq);

        Self {
            boys_values,
            vec_CP,
            alph_p,
        }
    }

    pub(crate) fn calc_recurr_rel(&self, t: i32, u: i32, v: i32, boys_order: i32) -> Complex64 {
        if t < 0 || v < 0 || u < 0 {
            return Complex64::new(0.0, 0.0);
        }

        match (t, u, v) {
            (0, 0, 0) => {
                let min_fac = if boys_order % 2 == 0 { 1.0 } else { -1.0 };
                min_fac
                    * (2.0 * self.alph_p).powi(boys_order)
                    * self.boys_values[boys_order as usize]
            }
            (1, _, _) => self.vec_CP[CC_X] * self.calc_recurr_rel(0, u, v, boys_order + 1),
            (t, _, _) if t > 1 => {
                (t - 1) as f64 * self.calc_recurr_rel(t - 2, u, v, boys_order + 1)
                    + self.vec_CP[CC_X] * self.calc_recurr_rel(t - 1, u, v, boys_order + 1)
            }

            (_, 1, _) => self.vec_CP[CC_Y] * self.calc_recurr_rel(t, 0, v, boys_order + 1),
            (_, u, _) if u > 1 => {
                (u - 1) as f64 * self.calc_recurr_rel(t, u - 2, v, boys_order + 1)
                    + self.vec_CP[CC_Y] * self.calc_recurr_rel(t, u - 1, v, boys_order + 1)
            }

            (_, _, 1) => self.vec_CP[CC_Z] * self.calc_recurr_rel(t, u, 0, boys_order + 1),
            (_, _, v) if v > 1 => {
                (v - 1) as f64 * self.calc_recurr_rel(t, u, v - 2, boys_order + 1)
                    + self.vec_CP[CC_Z] * self.calc_recurr_rel(t, u, v - 1, boys_order + 1)
            }
            _ => Complex64::new(0.0, 0.0),
        }
    }
}
