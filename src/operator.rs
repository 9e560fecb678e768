//! Descriptors for the physical operators that can be integrated.
//!
//! A descriptor is an immutable value object: the operator kind plus any
//! geometric parameters it needs (multipole origin, point charges). The
//! integral routines dispatch on it; it performs no computation itself.

use crate::molecule::Molecule;
use getset::CopyGetters;

/// A point charge, e.g. a bare nucleus, felt by the electrons.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PointCharge {
    charge: f64,
    position: [f64; 3],
}

impl PointCharge {
    pub fn new(charge: f64, position: [f64; 3]) -> Self {
        Self { charge, position }
    }
}

/// Symmetry of a one-electron matrix under exchange of bra and ket, for
/// identical real shell sets. For the momentum family this classifies the
/// real derivative carrier; the physical (imaginary) matrices obtained by
/// scaling with -i are then Hermitian.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixSymmetry {
    Symmetric,
    Antisymmetric,
}

/// The one-electron operators the integral engine evaluates.
#[derive(Clone, Debug, PartialEq)]
pub enum OneElectronOperator {
    Overlap,
    /// -1/2 nabla^2
    Kinetic,
    /// -sum_A Z_A / |r - R_A| over the given point charges.
    NuclearAttraction(Vec<PointCharge>),
    /// Components x, y, z of r - O.
    ElectronicDipole { origin: [f64; 3] },
    /// The six unique components of (r - O)(r - O), in the order
    /// xx, xy, xz, yy, yz, zz.
    ElectronicQuadrupole { origin: [f64; 3] },
    /// p = -i nabla; components x, y, z.
    LinearMomentum,
    /// l = -i (r - O) x nabla; components x, y, z.
    AngularMomentum { origin: [f64; 3] },
}

impl OneElectronOperator {
    /// Nuclear attraction generated by the nuclei of `molecule`.
    pub fn nuclear_attraction(molecule: &Molecule) -> Self {
        let charges = molecule
            .atoms_iter()
            .map(|atom| PointCharge::new(atom.z_val as f64, atom.coords()))
            .collect();
        Self::NuclearAttraction(charges)
    }

    /// Number of dense matrices this operator produces.
    pub fn n_components(&self) -> usize {
        match self {
            Self::Overlap | Self::Kinetic | Self::NuclearAttraction(_) => 1,
            Self::ElectronicDipole { .. } => 3,
            Self::ElectronicQuadrupole { .. } => 6,
            Self::LinearMomentum | Self::AngularMomentum { .. } => 3,
        }
    }

    pub fn symmetry(&self) -> MatrixSymmetry {
        match self {
            Self::Overlap
            | Self::Kinetic
            | Self::NuclearAttraction(_)
            | Self::ElectronicDipole { .. }
            | Self::ElectronicQuadrupole { .. } => MatrixSymmetry::Symmetric,
            Self::LinearMomentum | Self::AngularMomentum { .. } => MatrixSymmetry::Antisymmetric,
        }
    }

    /// Whether the matrix over real orbitals is imaginary-valued. Such
    /// operators go through the momentum entry point of the calculator.
    pub fn is_imaginary(&self) -> bool {
        matches!(self, Self::LinearMomentum | Self::AngularMomentum { .. })
    }
}

/// The two-electron Coulomb repulsion operator 1/|r1 - r2|. Its result is a
/// single rank-4 tensor, so the calculator exposes it separately from the
/// one-electron family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoulombRepulsion;
