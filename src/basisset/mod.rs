pub mod cart_exp;
pub mod london;

use crate::basisset::cart_exp::cartesian_exponents;
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use std::f64::consts::PI;
use std::fmt;

/// Largest angular momentum the shell model accepts (l = 8, "k" shells).
pub const LMAX: u32 = 8;

/// Rejected [`Shell`] construction.
///
/// All validation happens here; the integral routines assume validated
/// shells and do not re-check exponents or angular momenta per call.
#[derive(Clone, Debug, PartialEq)]
pub enum ShellError {
    /// Exponent and coefficient vectors differ in length.
    LengthMismatch {
        no_exponents: usize,
        no_coefficients: usize,
    },
    /// A contraction must hold at least one primitive.
    EmptyContraction,
    /// Gaussian exponents must be strictly positive (and finite).
    NonPositiveExponent { exponent: f64 },
    /// Angular momentum above [`LMAX`].
    InvalidAngularMomentum { ang_mom: u32 },
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::LengthMismatch {
                no_exponents,
                no_coefficients,
            } => write!(
                f,
                "number of exponents ({no_exponents}) does not match number of coefficients ({no_coefficients})"
            ),
            ShellError::EmptyContraction => write!(f, "contraction holds no primitives"),
            ShellError::NonPositiveExponent { exponent } => {
                write!(f, "Gaussian exponent must be positive, got {exponent}")
            }
            ShellError::InvalidAngularMomentum { ang_mom } => {
                write!(f, "angular momentum {ang_mom} exceeds the supported maximum {LMAX}")
            }
        }
    }
}

impl std::error::Error for ShellError {}

/// # Shell
/// One contracted Gaussian-type orbital: a fixed linear combination of
/// primitive Gaussians sharing a center and an angular momentum, expanded
/// into (l+1)(l+2)/2 Cartesian components or 2l+1 pure (spherical) ones.
///
/// ## Arguments
/// - `ang_mom` - total angular momentum l
/// - `center` - nucleus position (Bohr)
/// - `exponents` - primitive Gaussian exponents
/// - `coefficients` - contraction coefficients, parallel to `exponents`
/// - `is_pure` - pure (spherical harmonic) vs Cartesian components
///
/// ## Notes
/// - Normalization factors are embedded into the coefficient vector in
///   place; the two flags record which embeddings have been applied so that
///   re-embedding is a no-op.
/// - Equality is structural over all fields, incl. the normalization flags.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters)]
pub struct Shell {
    #[getset(get_copy = "pub")]
    ang_mom: u32,
    #[getset(get_copy = "pub")]
    center: [f64; 3],
    #[getset(get = "pub")]
    exponents: Vec<f64>,
    #[getset(get = "pub")]
    coefficients: Vec<f64>,
    #[getset(get_copy = "pub")]
    is_pure: bool,
    #[getset(get_copy = "pub")]
    primitives_normalized: bool,
    #[getset(get_copy = "pub")]
    shell_normalized: bool,
}

impl Shell {
    pub fn new(
        ang_mom: u32,
        is_pure: bool,
        center: [f64; 3],
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> Result<Self, ShellError> {
        if ang_mom > LMAX {
            return Err(ShellError::InvalidAngularMomentum { ang_mom });
        }
        if exponents.len() != coefficients.len() {
            return Err(ShellError::LengthMismatch {
                no_exponents: exponents.len(),
                no_coefficients: coefficients.len(),
            });
        }
        if exponents.is_empty() {
            return Err(ShellError::EmptyContraction);
        }
        for &exponent in &exponents {
            if !(exponent > 0.0 && exponent.is_finite()) {
                return Err(ShellError::NonPositiveExponent { exponent });
            }
        }
        Ok(Self {
            ang_mom,
            center,
            exponents,
            coefficients,
            is_pure,
            primitives_normalized: false,
            shell_normalized: false,
        })
    }

    #[inline(always)]
    pub fn contraction_size(&self) -> usize {
        self.exponents.len()
    }

    #[inline(always)]
    pub fn n_cartesian_functions(&self) -> usize {
        ((self.ang_mom + 1) * (self.ang_mom + 2) / 2) as usize
    }

    /// 2l+1 if pure, (l+1)(l+2)/2 if Cartesian.
    #[inline(always)]
    pub fn n_basis_functions(&self) -> usize {
        if self.is_pure {
            (2 * self.ang_mom + 1) as usize
        } else {
            self.n_cartesian_functions()
        }
    }

    /// Cartesian exponent tuples of this shell in lexicographic order.
    pub fn cartesian_exponents(&self) -> Vec<[i32; 3]> {
        cartesian_exponents(self.ang_mom)
    }

    /// Normalization constant of one primitive Gaussian, referred to the
    /// axis-aligned Cartesian component x^l exp(-alpha r^2). Using this
    /// constant for every component of the shell keeps the contraction
    /// coefficients component-independent; the missing double-factorial
    /// ratios for off-axis components are carried by the spherical
    /// transformation matrix instead.
    ///
    /// - Source: Valeev -- Fundamentals of Molecular Integrals Evaluation
    /// - Link: https://arxiv.org/pdf/2007.12057.pdf
    /// - Eq. 2.11 on page 8
    pub fn primitive_norm_const(alpha: f64, ang_mom: u32) -> f64 {
        lazy_static! {
            static ref PI_INV_POW_3_2: f64 = 1.0 / (PI * PI.sqrt());
        }
        let numerator =
            2.0_f64.powf(2.0 * ang_mom as f64 + 1.5) * alpha.powf(ang_mom as f64 + 1.5);
        (*PI_INV_POW_3_2 * numerator / double_fac(2 * ang_mom as i32 - 1) as f64).sqrt()
    }

    /// Multiply each contraction coefficient by its primitive's own
    /// normalization constant. No-op if already embedded.
    pub fn embed_primitive_normalization(&mut self) {
        if self.primitives_normalized {
            return;
        }
        let ang_mom = self.ang_mom;
        for (&alpha, coeff) in self.exponents.iter().zip(self.coefficients.iter_mut()) {
            *coeff *= Self::primitive_norm_const(alpha, ang_mom);
        }
        self.primitives_normalized = true;
    }

    /// Exact inverse of [`Shell::embed_primitive_normalization`].
    pub fn unembed_primitive_normalization(&mut self) {
        if !self.primitives_normalized {
            return;
        }
        let ang_mom = self.ang_mom;
        for (&alpha, coeff) in self.exponents.iter().zip(self.coefficients.iter_mut()) {
            *coeff /= Self::primitive_norm_const(alpha, ang_mom);
        }
        self.primitives_normalized = false;
    }

    /// Self-overlap of the axis-aligned Cartesian component of the
    /// contracted function, with the coefficients taken as-is (primitive
    /// normalization embedded or not).
    ///
    /// - Source: Valeev -- Fundamentals of Molecular Integrals Evaluation
    /// - Link: https://arxiv.org/pdf/2007.12057.pdf
    /// - Eq. 2.25 on page 10
    pub fn self_overlap(&self) -> f64 {
        lazy_static! {
            static ref PI_3_2: f64 = PI.powf(1.5);
        }
        let ang_mom = self.ang_mom as i32;
        let pi_factor = *PI_3_2 * double_fac(2 * ang_mom - 1) as f64 / 2_i32.pow(self.ang_mom) as f64;
        let mut self_ovlp = 0.0_f64;
        for (&alpha1, &coeff1) in self.exponents.iter().zip(&self.coefficients) {
            for (&alpha2, &coeff2) in self.exponents.iter().zip(&self.coefficients) {
                self_ovlp += coeff1 * coeff2 / (alpha1 + alpha2).powf(ang_mom as f64 + 1.5);
            }
        }
        pi_factor * self_ovlp
    }

    /// Scale all coefficients by one shell-level constant so that the
    /// contracted self-overlap becomes 1. No-op if already embedded.
    pub fn embed_shell_normalization(&mut self) {
        if self.shell_normalized {
            return;
        }
        let norm_const = 1.0 / self.self_overlap().sqrt();
        for coeff in self.coefficients.iter_mut() {
            *coeff *= norm_const;
        }
        self.shell_normalized = true;
    }
}

/// Capability every shell kind must offer for basis-function bookkeeping.
pub trait ShellBasis {
    /// Number of basis functions the shell contributes to the result arrays.
    fn n_basis_functions(&self) -> usize;
}

impl ShellBasis for Shell {
    #[inline(always)]
    fn n_basis_functions(&self) -> usize {
        Shell::n_basis_functions(self)
    }
}

/// # Shell set
/// An ordered collection of shells forming a basis. Basis-function offsets
/// are precomputed at construction; they depend only on each shell's
/// angular momentum and purity, which never change after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ShellSet<S: ShellBasis> {
    shells: Vec<S>,
    // offsets[i] is the first basis-function index of shell i; the final
    // entry is the total basis-function count.
    offsets: Vec<usize>,
}

impl<S: ShellBasis> ShellSet<S> {
    pub fn new(shells: Vec<S>) -> Self {
        let mut offsets = Vec::with_capacity(shells.len() + 1);
        offsets.push(0);
        let mut offset = 0;
        for shell in &shells {
            offset += shell.n_basis_functions();
            offsets.push(offset);
        }
        Self { shells, offsets }
    }

    #[inline(always)]
    pub fn n_shells(&self) -> usize {
        self.shells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    #[inline(always)]
    pub fn n_basis_functions(&self) -> usize {
        self.offsets[self.shells.len()]
    }

    /// First basis-function index of shell `sh_idx` in the assembled arrays.
    #[inline(always)]
    pub fn basis_function_offset(&self, sh_idx: usize) -> usize {
        self.offsets[sh_idx]
    }

    #[inline(always)]
    pub fn shell(&self, sh_idx: usize) -> &S {
        &self.shells[sh_idx]
    }

    pub fn shells(&self) -> &[S] {
        &self.shells
    }
}

impl ShellSet<Shell> {
    /// Embed primitive normalization constants in every shell.
    pub fn embed_primitive_normalization(&mut self) {
        for shell in self.shells.iter_mut() {
            shell.embed_primitive_normalization();
        }
    }

    /// Embed the shell-level normalization constant in every shell.
    pub fn embed_shell_normalization(&mut self) {
        for shell in self.shells.iter_mut() {
            shell.embed_shell_normalization();
        }
    }
}

#[inline(always)]
pub(crate) fn double_fac(mut n: i32) -> i32 {
    let mut res = 1;
    match n {
        -1..=1 => 1, // (-1)!! = 0!! = 1!! = 1
        _ => {
            if n % 2 == 1 {
                while n >= 2 {
                    res *= n;
                    n -= 2;
                }
            } else {
                while n >= 1 {
                    res *= n;
                    n -= 2;
                }
            }
            res
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sto3g_h(center: [f64; 3]) -> Shell {
        Shell::new(
            0,
            false,
            center,
            vec![3.425250914, 0.6239137298, 0.168855404],
            vec![0.1543289673, 0.5353281423, 0.4446345422],
        )
        .unwrap()
    }

    #[test]
    fn test_basis_function_counts() {
        for ang_mom in 0..=LMAX {
            let cart = Shell::new(ang_mom, false, [0.0; 3], vec![1.0], vec![1.0]).unwrap();
            let pure = Shell::new(ang_mom, true, [0.0; 3], vec![1.0], vec![1.0]).unwrap();
            assert_eq!(
                cart.n_basis_functions(),
                ((ang_mom + 1) * (ang_mom + 2) / 2) as usize
            );
            assert_eq!(pure.n_basis_functions(), (2 * ang_mom + 1) as usize);
            assert_eq!(cart.cartesian_exponents().len(), cart.n_cartesian_functions());
        }
    }

    #[test]
    fn test_construction_validation() {
        assert_eq!(
            Shell::new(0, false, [0.0; 3], vec![1.0, 2.0], vec![1.0]),
            Err(ShellError::LengthMismatch {
                no_exponents: 2,
                no_coefficients: 1
            })
        );
        assert_eq!(
            Shell::new(0, false, [0.0; 3], vec![], vec![]),
            Err(ShellError::EmptyContraction)
        );
        assert_eq!(
            Shell::new(0, false, [0.0; 3], vec![1.0, -0.5], vec![1.0, 1.0]),
            Err(ShellError::NonPositiveExponent { exponent: -0.5 })
        );
        assert_eq!(
            Shell::new(LMAX + 1, false, [0.0; 3], vec![1.0], vec![1.0]),
            Err(ShellError::InvalidAngularMomentum { ang_mom: LMAX + 1 })
        );
    }

    #[test]
    fn test_primitive_normalization_round_trip() {
        let orig = sto3g_h([0.0; 3]);
        let mut shell = orig.clone();
        shell.embed_primitive_normalization();
        assert!(shell.primitives_normalized());
        assert_ne!(shell.coefficients(), orig.coefficients());
        shell.unembed_primitive_normalization();
        for (coeff, coeff_orig) in shell.coefficients().iter().zip(orig.coefficients()) {
            assert_relative_eq!(coeff, coeff_orig, max_relative = 1e-14);
        }
        assert_eq!(shell, orig);
    }

    #[test]
    fn test_normalization_embedding_is_idempotent() {
        let mut shell = sto3g_h([0.0; 3]);
        shell.embed_primitive_normalization();
        let once = shell.clone();
        shell.embed_primitive_normalization();
        assert_eq!(shell, once);

        shell.embed_shell_normalization();
        let once = shell.clone();
        shell.embed_shell_normalization();
        assert_eq!(shell, once);
    }

    #[test]
    fn test_normalized_self_overlap_is_one() {
        for ang_mom in 0..=4u32 {
            let mut shell = Shell::new(
                ang_mom,
                true,
                [0.0; 3],
                vec![0.8, 2.5, 11.0],
                vec![0.3, 0.5, 0.2],
            )
            .unwrap();
            shell.embed_primitive_normalization();
            shell.embed_shell_normalization();
            assert_relative_eq!(shell.self_overlap(), 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_single_primitive_norm_const() {
        // With the primitive constant embedded a one-term contraction with
        // coefficient 1 is already normalized.
        for ang_mom in 0..=4u32 {
            let mut shell =
                Shell::new(ang_mom, false, [0.0; 3], vec![1.75], vec![1.0]).unwrap();
            shell.embed_primitive_normalization();
            assert_relative_eq!(shell.self_overlap(), 1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_shell_set_offsets() {
        let shells = vec![
            Shell::new(0, false, [0.0; 3], vec![1.0], vec![1.0]).unwrap(),
            Shell::new(1, false, [0.0; 3], vec![1.0], vec![1.0]).unwrap(),
            Shell::new(2, true, [0.0; 3], vec![1.0], vec![1.0]).unwrap(),
            Shell::new(2, false, [0.0; 3], vec![1.0], vec![1.0]).unwrap(),
        ];
        let shell_set = ShellSet::new(shells);
        assert_eq!(shell_set.n_shells(), 4);
        assert_eq!(shell_set.n_basis_functions(), 1 + 3 + 5 + 6);
        assert_eq!(shell_set.basis_function_offset(0), 0);
        assert_eq!(shell_set.basis_function_offset(1), 1);
        assert_eq!(shell_set.basis_function_offset(2), 4);
        assert_eq!(shell_set.basis_function_offset(3), 9);
    }

    #[test]
    fn test_double_fac() {
        assert_eq!(double_fac(-1), 1);
        assert_eq!(double_fac(0), 1);
        assert_eq!(double_fac(1), 1);
        assert_eq!(double_fac(5), 15);
        assert_eq!(double_fac(6), 48);
        assert_eq!(double_fac(7), 105);
    }
}
