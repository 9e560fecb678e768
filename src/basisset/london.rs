//! Field-dependent (London) orbitals.
//!
//! A London orbital attaches a field-dependent plane-wave phase to an
//! ordinary Gaussian shell,
//!
//! `omega(r) = exp(-i k . r) g(r)`,  `k = 1/2 B x (R - G)`,
//!
//! with `B` the homogeneous magnetic field, `R` the shell center and `G`
//! the gauge origin. Matrix elements between two London orbitals depend on
//! `k_ket - k_bra` only, in which the gauge origin cancels; this is what
//! makes the computed integrals gauge-origin invariant.

use crate::basisset::{Shell, ShellBasis, ShellSet};
use getset::{CopyGetters, Getters};

/// A homogeneous external magnetic field together with the gauge origin of
/// its vector potential `A(r) = 1/2 B x (r - G)`.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct HomogeneousMagneticField {
    strength: [f64; 3],
    gauge_origin: [f64; 3],
}

impl HomogeneousMagneticField {
    pub fn new(strength: [f64; 3], gauge_origin: [f64; 3]) -> Self {
        Self {
            strength,
            gauge_origin,
        }
    }
}

/// # London shell
/// An ordinary [`Shell`] dressed with the phase factor of a homogeneous
/// magnetic field. All contraction and normalization semantics live on the
/// wrapped shell; the wrapper only adds the per-shell phase vector `k`.
#[derive(Clone, Debug, PartialEq, Getters, CopyGetters)]
pub struct LondonShell {
    #[getset(get = "pub")]
    shell: Shell,
    #[getset(get_copy = "pub")]
    field: HomogeneousMagneticField,
}

impl LondonShell {
    pub fn new(shell: Shell, field: HomogeneousMagneticField) -> Self {
        Self { shell, field }
    }

    /// Phase vector `k = 1/2 B x (R - G)` of this shell's London factor
    /// `exp(-i k . r)`.
    pub fn k_vector(&self) -> [f64; 3] {
        let field_b = self.field.strength();
        let center = self.shell.center();
        let gauge_origin = self.field.gauge_origin();
        let disp = [
            center[0] - gauge_origin[0],
            center[1] - gauge_origin[1],
            center[2] - gauge_origin[2],
        ];
        [
            0.5 * (field_b[1] * disp[2] - field_b[2] * disp[1]),
            0.5 * (field_b[2] * disp[0] - field_b[0] * disp[2]),
            0.5 * (field_b[0] * disp[1] - field_b[1] * disp[0]),
        ]
    }
}

impl ShellBasis for LondonShell {
    #[inline(always)]
    fn n_basis_functions(&self) -> usize {
        self.shell.n_basis_functions()
    }
}

pub type LondonShellSet = ShellSet<LondonShell>;

impl ShellSet<LondonShell> {
    /// Dress every shell of a field-free basis with the same magnetic field.
    pub fn from_shell_set(shell_set: ShellSet<Shell>, field: HomogeneousMagneticField) -> Self {
        let shells = shell_set
            .shells
            .into_iter()
            .map(|shell| LondonShell::new(shell, field))
            .collect();
        Self::new(shells)
    }
}
