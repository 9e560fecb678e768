pub mod atom;
pub(crate) mod cartesian_comp;

use atom::Atom;
use getset::Getters;

/// A molecular framework: the nuclei whose charges and positions enter the
/// nuclear-attraction operator and anchor the basis shells. Coordinates are
/// stored in bohr; geometry file parsing is left to the caller.
#[derive(Clone, Debug, Default, PartialEq, Getters)]
pub struct Molecule {
    #[getset(get = "pub")]
    atoms: Vec<Atom>,
}

impl Molecule {
    /// Build from nuclei given in bohr.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Build from nuclei given in angstrom; positions are converted to bohr.
    pub fn from_angstrom(mut atoms: Vec<Atom>) -> Self {
        const AA_TO_BOHR: f64 = 1.0e-10 / physical_constants::BOHR_RADIUS;
        for atom in atoms.iter_mut() {
            atom.scale_coords(AA_TO_BOHR);
        }
        Self { atoms }
    }

    #[inline(always)]
    pub fn no_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms_iter(&self) -> std::slice::Iter<Atom> {
        self.atoms.iter()
    }

    /// Classical Coulomb repulsion of the point nuclei, Σ_{i<j} Z_i Z_j / R_ij.
    pub fn core_potential(&self) -> f64 {
        let mut core_potential = 0.0;
        for (idx1, at1) in self.atoms.iter().enumerate() {
            for at2 in self.atoms.iter().skip(idx1 + 1) {
                core_potential += (at1.z_val * at2.z_val) as f64 / (at1 - at2);
            }
        }
        core_potential
    }
}
