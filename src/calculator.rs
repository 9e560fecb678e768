//! Assembly of whole-basis matrices and tensors from shell blocks.
//!
//! The drivers here walk canonical shell pairs (or quartets), evaluate the
//! blocks in parallel, and scatter each block to every position its
//! permutational symmetry grants:
//!
//! - real one-electron: when bra and ket are the same basis only the lower
//!   shell triangle is computed; the mirror triangle is the (signed)
//!   transpose
//! - real Coulomb repulsion: one block per canonical quartet
//!   (i >= j, k >= l, pair(i,j) >= pair(k,l)), scattered to the 8-fold
//!   orbit
//! - London (field-dependent) orbitals: every operator is Hermitian, so the
//!   mirror is the conjugate transpose; the Coulomb orbit shrinks to the
//!   4 permutations that survive complex orbitals

use crate::basisset::london::{LondonShell, LondonShellSet};
use crate::basisset::{Shell, ShellSet};
use crate::mol_int::london_int::{
    calc_ang_mom_shblock_london, calc_coulomb_shblock_london, calc_dipole_shblock_london,
    calc_kinetic_shblock_london, calc_lin_mom_shblock_london, calc_nuc_attr_shblock_london,
    calc_overlap_shblock_london, calc_quadrupole_shblock_london,
};
use crate::mol_int::oe_int::{
    calc_ang_mom_shblock, calc_dipole_shblock, calc_kinetic_shblock, calc_lin_mom_shblock,
    calc_nuc_attr_shblock, calc_overlap_shblock, calc_quadrupole_shblock,
};
use crate::mol_int::te_int::calc_coulomb_shblock;
use crate::operator::{CoulombRepulsion, MatrixSymmetry, OneElectronOperator};
use ndarray::{s, Array2, Array4};
use num_complex::Complex64;
use rayon::prelude::*;
use std::fmt;

/// Rejected calculation request.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcError {
    /// A shell set without shells has no matrix elements.
    EmptyShellSet,
    /// The operator is imaginary-valued over real shells and belongs to the
    /// momentum entry point.
    ComplexValuedOperator,
    /// The operator is real-valued over real shells and belongs to the
    /// one-electron entry point.
    RealValuedOperator,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::EmptyShellSet => write!(f, "shell set holds no shells"),
            CalcError::ComplexValuedOperator => write!(
                f,
                "operator is imaginary-valued over real shells; use calc_momentum_matrices"
            ),
            CalcError::RealValuedOperator => write!(
                f,
                "operator is real-valued over real shells; use calc_one_electron_matrices"
            ),
        }
    }
}

impl std::error::Error for CalcError {}

/// Shell index pairs to evaluate: the lower triangle when the mirror
/// triangle follows by symmetry, the full rectangle otherwise.
fn shell_pair_list(n_bra: usize, n_ket: usize, same_basis: bool) -> Vec<(usize, usize)> {
    if same_basis {
        (0..n_bra)
            .flat_map(|sh1| (0..=sh1).map(move |sh2| (sh1, sh2)))
            .collect()
    } else {
        (0..n_bra)
            .flat_map(|sh1| (0..n_ket).map(move |sh2| (sh1, sh2)))
            .collect()
    }
}

/// All components of `operator` for one shell pair. Momentum operators
/// yield their real carriers (the matrix to be scaled by -i).
fn calc_oe_shblocks(
    operator: &OneElectronOperator,
    sh1: &Shell,
    sh2: &Shell,
) -> Vec<Array2<f64>> {
    match operator {
        OneElectronOperator::Overlap => vec![calc_overlap_shblock(sh1, sh2)],
        OneElectronOperator::Kinetic => vec![calc_kinetic_shblock(sh1, sh2)],
        OneElectronOperator::NuclearAttraction(charges) => {
            vec![calc_nuc_attr_shblock(sh1, sh2, charges)]
        }
        OneElectronOperator::ElectronicDipole { origin } => {
            calc_dipole_shblock(sh1, sh2, *origin).into_iter().collect()
        }
        OneElectronOperator::ElectronicQuadrupole { origin } => {
            calc_quadrupole_shblock(sh1, sh2, *origin).into_iter().collect()
        }
        OneElectronOperator::LinearMomentum => calc_lin_mom_shblock(sh1, sh2).into_iter().collect(),
        OneElectronOperator::AngularMomentum { origin } => {
            calc_ang_mom_shblock(sh1, sh2, *origin).into_iter().collect()
        }
    }
}

fn calc_london_shblocks(
    operator: &OneElectronOperator,
    lsh1: &LondonShell,
    lsh2: &LondonShell,
) -> Vec<Array2<Complex64>> {
    match operator {
        OneElectronOperator::Overlap => vec![calc_overlap_shblock_london(lsh1, lsh2)],
        OneElectronOperator::Kinetic => vec![calc_kinetic_shblock_london(lsh1, lsh2)],
        OneElectronOperator::NuclearAttraction(charges) => {
            vec![calc_nuc_attr_shblock_london(lsh1, lsh2, charges)]
        }
        OneElectronOperator::ElectronicDipole { origin } => {
            calc_dipole_shblock_london(lsh1, lsh2, *origin)
                .into_iter()
                .collect()
        }
        OneElectronOperator::ElectronicQuadrupole { origin } => {
            calc_quadrupole_shblock_london(lsh1, lsh2, *origin)
                .into_iter()
                .collect()
        }
        OneElectronOperator::LinearMomentum => calc_lin_mom_shblock_london(lsh1, lsh2)
            .into_iter()
            .collect(),
        OneElectronOperator::AngularMomentum { origin } => {
            calc_ang_mom_shblock_london(lsh1, lsh2, *origin)
                .into_iter()
                .collect()
        }
    }
}

fn assemble_oe_matrices(
    operator: &OneElectronOperator,
    bra_set: &ShellSet<Shell>,
    ket_set: &ShellSet<Shell>,
) -> Vec<Array2<f64>> {
    let same_basis = bra_set == ket_set;
    let dim = (bra_set.n_basis_functions(), ket_set.n_basis_functions());
    let mut matrices: Vec<Array2<f64>> =
        (0..operator.n_components()).map(|_| Array2::zeros(dim)).collect();
    let mirror_sign = match operator.symmetry() {
        MatrixSymmetry::Symmetric => 1.0,
        MatrixSymmetry::Antisymmetric => -1.0,
    };

    let shell_pairs = shell_pair_list(bra_set.n_shells(), ket_set.n_shells(), same_basis);
    let pair_blocks: Vec<Vec<Array2<f64>>> = shell_pairs
        .par_iter()
        .map(|&(sh1_idx, sh2_idx)| {
            calc_oe_shblocks(operator, bra_set.shell(sh1_idx), ket_set.shell(sh2_idx))
        })
        .collect();

    for (&(sh1_idx, sh2_idx), comp_blocks) in shell_pairs.iter().zip(&pair_blocks) {
        let row0 = bra_set.basis_function_offset(sh1_idx);
        let col0 = ket_set.basis_function_offset(sh2_idx);
        for (matrix, block) in matrices.iter_mut().zip(comp_blocks) {
            let (n1, n2) = block.dim();
            matrix
                .slice_mut(s![row0..row0 + n1, col0..col0 + n2])
                .assign(block);
            if same_basis && sh1_idx != sh2_idx {
                matrix
                    .slice_mut(s![col0..col0 + n2, row0..row0 + n1])
                    .assign(&block.t().mapv(|val| mirror_sign * val));
            }
        }
    }
    matrices
}

/// Dense matrices of a real-valued one-electron operator between two shell
/// bases, one matrix per operator component, indexed
/// `[bra function, ket function]`.
pub fn calc_one_electron_matrices(
    operator: &OneElectronOperator,
    bra_set: &ShellSet<Shell>,
    ket_set: &ShellSet<Shell>,
) -> Result<Vec<Array2<f64>>, CalcError> {
    if operator.is_imaginary() {
        return Err(CalcError::ComplexValuedOperator);
    }
    if bra_set.is_empty() || ket_set.is_empty() {
        return Err(CalcError::EmptyShellSet);
    }
    log::debug!(
        "assembling {} component(s) of {:?} over {} bra x {} ket basis functions",
        operator.n_components(),
        operator,
        bra_set.n_basis_functions(),
        ket_set.n_basis_functions()
    );
    Ok(assemble_oe_matrices(operator, bra_set, ket_set))
}

/// Dense matrices of a momentum-family operator (`p` or `l`) between two
/// real shell bases. The antisymmetric real carrier is assembled first and
/// scaled by -i, which yields Hermitian matrices.
pub fn calc_momentum_matrices(
    operator: &OneElectronOperator,
    bra_set: &ShellSet<Shell>,
    ket_set: &ShellSet<Shell>,
) -> Result<Vec<Array2<Complex64>>, CalcError> {
    if !operator.is_imaginary() {
        return Err(CalcError::RealValuedOperator);
    }
    if bra_set.is_empty() || ket_set.is_empty() {
        return Err(CalcError::EmptyShellSet);
    }
    log::debug!(
        "assembling {} component(s) of {:?} over {} bra x {} ket basis functions",
        operator.n_components(),
        operator,
        bra_set.n_basis_functions(),
        ket_set.n_basis_functions()
    );
    let carriers = assemble_oe_matrices(operator, bra_set, ket_set);
    Ok(carriers
        .into_iter()
        .map(|carrier| carrier.mapv(|val| Complex64::new(0.0, -val)))
        .collect())
}

/// The full two-electron repulsion tensor `(ij|kl)` in chemists' ordering
/// over one real shell basis. Only canonical shell quartets are evaluated;
/// each block is scattered to its 8-fold permutational orbit.
pub fn calc_coulomb_tensor(
    _operator: CoulombRepulsion,
    shell_set: &ShellSet<Shell>,
) -> Result<Array4<f64>, CalcError> {
    if shell_set.is_empty() {
        return Err(CalcError::EmptyShellSet);
    }
    let n_ao = shell_set.n_basis_functions();
    let shell_pairs = shell_pair_list(shell_set.n_shells(), shell_set.n_shells(), true);
    let quads: Vec<[usize; 4]> = shell_pairs
        .iter()
        .enumerate()
        .flat_map(|(pair_idx, &(sh1, sh2))| {
            shell_pairs[..=pair_idx]
                .iter()
                .map(move |&(sh3, sh4)| [sh1, sh2, sh3, sh4])
        })
        .collect();
    log::debug!(
        "assembling coulomb tensor over {} basis functions ({} canonical shell quartets)",
        n_ao,
        quads.len()
    );

    let quad_blocks: Vec<Array4<f64>> = quads
        .par_iter()
        .map(|&[sh1, sh2, sh3, sh4]| {
            calc_coulomb_shblock([
                shell_set.shell(sh1),
                shell_set.shell(sh2),
                shell_set.shell(sh3),
                shell_set.shell(sh4),
            ])
        })
        .collect();

    let mut tensor = Array4::<f64>::zeros((n_ao, n_ao, n_ao, n_ao));
    for (quad, block) in quads.iter().zip(&quad_blocks) {
        let [off1, off2, off3, off4] = quad.map(|sh| shell_set.basis_function_offset(sh));
        for ((a, b, c, d), &val) in block.indexed_iter() {
            let (gi, gj, gk, gl) = (off1 + a, off2 + b, off3 + c, off4 + d);
            // coincident images of a quartet just rewrite the same value
            tensor[[gi, gj, gk, gl]] = val;
            tensor[[gj, gi, gk, gl]] = val;
            tensor[[gi, gj, gl, gk]] = val;
            tensor[[gj, gi, gl, gk]] = val;
            tensor[[gk, gl, gi, gj]] = val;
            tensor[[gl, gk, gi, gj]] = val;
            tensor[[gk, gl, gj, gi]] = val;
            tensor[[gl, gk, gj, gi]] = val;
        }
    }
    Ok(tensor)
}

/// Dense matrices of any one-electron operator between two London shell
/// bases. Every operator in the family is Hermitian over London orbitals,
/// so for a shared basis the mirror triangle is the conjugate transpose.
pub fn calc_london_one_electron_matrices(
    operator: &OneElectronOperator,
    bra_set: &LondonShellSet,
    ket_set: &LondonShellSet,
) -> Result<Vec<Array2<Complex64>>, CalcError> {
    if bra_set.is_empty() || ket_set.is_empty() {
        return Err(CalcError::EmptyShellSet);
    }
    log::debug!(
        "assembling {} London component(s) of {:?} over {} bra x {} ket basis functions",
        operator.n_components(),
        operator,
        bra_set.n_basis_functions(),
        ket_set.n_basis_functions()
    );
    let same_basis = bra_set == ket_set;
    let dim = (bra_set.n_basis_functions(), ket_set.n_basis_functions());
    let mut matrices: Vec<Array2<Complex64>> =
        (0..operator.n_components()).map(|_| Array2::zeros(dim)).collect();

    let shell_pairs = shell_pair_list(bra_set.n_shells(), ket_set.n_shells(), same_basis);
    let pair_blocks: Vec<Vec<Array2<Complex64>>> = shell_pairs
        .par_iter()
        .map(|&(sh1_idx, sh2_idx)| {
            calc_london_shblocks(operator, bra_set.shell(sh1_idx), ket_set.shell(sh2_idx))
        })
        .collect();

    for (&(sh1_idx, sh2_idx), comp_blocks) in shell_pairs.iter().zip(&pair_blocks) {
        let row0 = bra_set.basis_function_offset(sh1_idx);
        let col0 = ket_set.basis_function_offset(sh2_idx);
        for (matrix, block) in matrices.iter_mut().zip(comp_blocks) {
            let (n1, n2) = block.dim();
            matrix
                .slice_mut(s![row0..row0 + n1, col0..col0 + n2])
                .assign(block);
            if same_basis && sh1_idx != sh2_idx {
                matrix
                    .slice_mut(s![col0..col0 + n2, row0..row0 + n1])
                    .assign(&block.t().mapv(|val| val.conj()));
            }
        }
    }
    Ok(matrices)
}

/// The two-electron repulsion tensor over one London shell basis. Complex
/// orbitals break the in-pair swap symmetry; what survives is
/// `g[ijkl] = g[klij]` and `g[jilk] = g[lkji] = conj g[ijkl]`, a 4-fold
/// orbit.
pub fn calc_london_coulomb_tensor(
    _operator: CoulombRepulsion,
    shell_set: &LondonShellSet,
) -> Result<Array4<Complex64>, CalcError> {
    if shell_set.is_empty() {
        return Err(CalcError::EmptyShellSet);
    }
    let n_ao = shell_set.n_basis_functions();
    let n_shells = shell_set.n_shells();
    let mut quads: Vec<[usize; 4]> = Vec::new();
    for sh1 in 0..n_shells {
        for sh2 in 0..n_shells {
            for sh3 in 0..n_shells {
                for sh4 in 0..n_shells {
                    let quad = (sh1, sh2, sh3, sh4);
                    let images = [
                        (sh3, sh4, sh1, sh2),
                        (sh2, sh1, sh4, sh3),
                        (sh4, sh3, sh2, sh1),
                    ];
                    // lexicographic minimum of the orbit is the canonical
                    // representative
                    if images.iter().all(|image| quad <= *image) {
                        quads.push([sh1, sh2, sh3, sh4]);
                    }
                }
            }
        }
    }
    log::debug!(
        "assembling London coulomb tensor over {} basis functions ({} canonical shell quartets)",
        n_ao,
        quads.len()
    );

    let quad_blocks: Vec<Array4<Complex64>> = quads
        .par_iter()
        .map(|&[sh1, sh2, sh3, sh4]| {
            calc_coulomb_shblock_london([
                shell_set.shell(sh1),
                shell_set.shell(sh2),
                shell_set.shell(sh3),
                shell_set.shell(sh4),
            ])
        })
        .collect();

    let mut tensor = Array4::<Complex64>::zeros((n_ao, n_ao, n_ao, n_ao));
    for (quad, block) in quads.iter().zip(&quad_blocks) {
        let [off1, off2, off3, off4] = quad.map(|sh| shell_set.basis_function_offset(sh));
        for ((a, b, c, d), &val) in block.indexed_iter() {
            let (gi, gj, gk, gl) = (off1 + a, off2 + b, off3 + c, off4 + d);
            tensor[[gi, gj, gk, gl]] = val;
            tensor[[gk, gl, gi, gj]] = val;
            tensor[[gj, gi, gl, gk]] = val.conj();
            tensor[[gl, gk, gj, gi]] = val.conj();
        }
    }
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basisset::london::HomogeneousMagneticField;
    use crate::molecule::atom::Atom;
    use crate::molecule::Molecule;
    use approx::assert_abs_diff_eq;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn mixed_basis() -> ShellSet<Shell> {
        let mut basis = ShellSet::new(vec![
            Shell::new(0, false, [0.0, 0.0, 0.0], vec![1.2, 0.4], vec![0.6, 0.5]).unwrap(),
            Shell::new(1, false, [0.0, 0.0, 1.3], vec![0.8], vec![1.0]).unwrap(),
            Shell::new(2, true, [0.5, -0.3, 0.0], vec![1.1], vec![1.0]).unwrap(),
        ]);
        basis.embed_primitive_normalization();
        basis
    }

    fn sto3g_h_shell(center: [f64; 3]) -> Shell {
        let mut shell = Shell::new(
            0,
            false,
            center,
            vec![3.425250914, 0.6239137298, 0.168855404],
            vec![0.1543289673, 0.5353281423, 0.4446345422],
        )
        .unwrap();
        shell.embed_primitive_normalization();
        shell
    }

    fn h2_sto3g() -> (ShellSet<Shell>, Molecule) {
        let basis = ShellSet::new(vec![
            sto3g_h_shell([0.0, 0.0, 0.0]),
            sto3g_h_shell([0.0, 0.0, 1.4]),
        ]);
        let molecule = Molecule::new(vec![
            Atom::new(0.0, 0.0, 0.0, 1),
            Atom::new(0.0, 0.0, 1.4, 1),
        ]);
        (basis, molecule)
    }

    #[test]
    fn test_h2_sto3g_one_electron_matrices() {
        // Szabo-Ostlund, tables 3.5 and 3.6 (R = 1.4 bohr), 4 decimals
        init_logger();
        let (basis, molecule) = h2_sto3g();
        let ovlp =
            &calc_one_electron_matrices(&OneElectronOperator::Overlap, &basis, &basis).unwrap()[0];
        let kin =
            &calc_one_electron_matrices(&OneElectronOperator::Kinetic, &basis, &basis).unwrap()[0];
        let nuc = &calc_one_electron_matrices(
            &OneElectronOperator::nuclear_attraction(&molecule),
            &basis,
            &basis,
        )
        .unwrap()[0];
        assert_abs_diff_eq!(ovlp[(0, 0)], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ovlp[(0, 1)], 0.6593, epsilon = 1e-4);
        assert_abs_diff_eq!(kin[(0, 0)], 0.7600, epsilon = 1e-4);
        assert_abs_diff_eq!(kin[(0, 1)], 0.2365, epsilon = 1e-4);
        let h_core = kin + nuc;
        assert_abs_diff_eq!(h_core[(0, 0)], -1.1204, epsilon = 1e-4);
        assert_abs_diff_eq!(h_core[(0, 1)], -0.9584, epsilon = 1e-4);
    }

    #[test]
    fn test_h2_sto3g_coulomb_tensor() {
        let (basis, _) = h2_sto3g();
        let eri = calc_coulomb_tensor(CoulombRepulsion, &basis).unwrap();
        // Szabo-Ostlund eq. 3.235, chemists' notation
        assert_abs_diff_eq!(eri[(0, 0, 0, 0)], 0.7746, epsilon = 1e-4);
        assert_abs_diff_eq!(eri[(0, 0, 1, 1)], 0.5697, epsilon = 1e-4);
        assert_abs_diff_eq!(eri[(1, 0, 0, 0)], 0.4441, epsilon = 1e-4);
        assert_abs_diff_eq!(eri[(1, 0, 1, 0)], 0.2970, epsilon = 1e-4);
    }

    #[test]
    fn test_one_electron_matrices_match_unsymmetrized_assembly() {
        let basis = mixed_basis();
        let origin = [0.3, -0.1, 0.2];
        let operator = OneElectronOperator::ElectronicDipole { origin };
        let matrices = calc_one_electron_matrices(&operator, &basis, &basis).unwrap();

        let n_ao = basis.n_basis_functions();
        let mut references: Vec<Array2<f64>> = (0..3).map(|_| Array2::zeros((n_ao, n_ao))).collect();
        for sh1_idx in 0..basis.n_shells() {
            for sh2_idx in 0..basis.n_shells() {
                let blocks =
                    calc_dipole_shblock(basis.shell(sh1_idx), basis.shell(sh2_idx), origin);
                let row0 = basis.basis_function_offset(sh1_idx);
                let col0 = basis.basis_function_offset(sh2_idx);
                for (reference, block) in references.iter_mut().zip(&blocks) {
                    let (n1, n2) = block.dim();
                    reference
                        .slice_mut(s![row0..row0 + n1, col0..col0 + n2])
                        .assign(block);
                }
            }
        }
        for (matrix, reference) in matrices.iter().zip(&references) {
            for (idx, val) in matrix.indexed_iter() {
                assert_abs_diff_eq!(*val, reference[idx], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rectangular_bra_ket_assembly() {
        let bra_set = mixed_basis();
        let ket_set = ShellSet::new(vec![
            Shell::new(0, false, [0.2, 0.0, -0.5], vec![0.9], vec![1.0]).unwrap(),
            Shell::new(1, true, [0.0, 0.4, 0.3], vec![1.5], vec![1.0]).unwrap(),
        ]);
        let matrices =
            calc_one_electron_matrices(&OneElectronOperator::Overlap, &bra_set, &ket_set).unwrap();
        assert_eq!(matrices[0].dim(), (9, 4));
        for sh1_idx in 0..bra_set.n_shells() {
            for sh2_idx in 0..ket_set.n_shells() {
                let block = calc_overlap_shblock(bra_set.shell(sh1_idx), ket_set.shell(sh2_idx));
                let row0 = bra_set.basis_function_offset(sh1_idx);
                let col0 = ket_set.basis_function_offset(sh2_idx);
                for ((a, b), val) in block.indexed_iter() {
                    assert_abs_diff_eq!(matrices[0][(row0 + a, col0 + b)], *val, epsilon = 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_momentum_matrices_hermitian_and_match_carrier() {
        let basis = mixed_basis();
        let matrices =
            calc_momentum_matrices(&OneElectronOperator::LinearMomentum, &basis, &basis).unwrap();

        let n_ao = basis.n_basis_functions();
        let mut carriers: Vec<Array2<f64>> = (0..3).map(|_| Array2::zeros((n_ao, n_ao))).collect();
        for sh1_idx in 0..basis.n_shells() {
            for sh2_idx in 0..basis.n_shells() {
                let blocks = calc_lin_mom_shblock(basis.shell(sh1_idx), basis.shell(sh2_idx));
                let row0 = basis.basis_function_offset(sh1_idx);
                let col0 = basis.basis_function_offset(sh2_idx);
                for (carrier, block) in carriers.iter_mut().zip(&blocks) {
                    let (n1, n2) = block.dim();
                    carrier
                        .slice_mut(s![row0..row0 + n1, col0..col0 + n2])
                        .assign(block);
                }
            }
        }
        for (matrix, carrier) in matrices.iter().zip(&carriers) {
            for (idx, val) in matrix.indexed_iter() {
                assert_abs_diff_eq!(val.re, 0.0, epsilon = 1e-13);
                assert_abs_diff_eq!(val.im, -carrier[idx], epsilon = 1e-12);
                let mirrored = matrix[(idx.1, idx.0)].conj();
                assert_abs_diff_eq!(val.re, mirrored.re, epsilon = 1e-12);
                assert_abs_diff_eq!(val.im, mirrored.im, epsilon = 1e-12);
            }
        }
    }

    /// Tensor assembled from every shell quadruple directly, no symmetry
    /// exploitation.
    fn direct_coulomb_tensor(basis: &ShellSet<Shell>) -> Array4<f64> {
        let n_ao = basis.n_basis_functions();
        let mut tensor = Array4::<f64>::zeros((n_ao, n_ao, n_ao, n_ao));
        for sh1 in 0..basis.n_shells() {
            for sh2 in 0..basis.n_shells() {
                for sh3 in 0..basis.n_shells() {
                    for sh4 in 0..basis.n_shells() {
                        let block = calc_coulomb_shblock([
                            basis.shell(sh1),
                            basis.shell(sh2),
                            basis.shell(sh3),
                            basis.shell(sh4),
                        ]);
                        let off = [sh1, sh2, sh3, sh4]
                            .map(|sh| basis.basis_function_offset(sh));
                        for ((a, b, c, d), &val) in block.indexed_iter() {
                            tensor[[off[0] + a, off[1] + b, off[2] + c, off[3] + d]] = val;
                        }
                    }
                }
            }
        }
        tensor
    }

    fn sp_basis() -> ShellSet<Shell> {
        ShellSet::new(vec![
            Shell::new(0, false, [0.0; 3], vec![0.9, 2.2], vec![0.5, 0.5]).unwrap(),
            Shell::new(1, false, [0.0, 0.0, 1.1], vec![0.7], vec![1.0]).unwrap(),
        ])
    }

    #[test]
    fn test_coulomb_tensor_matches_unsymmetrized_assembly() {
        let basis = sp_basis();
        let tensor = calc_coulomb_tensor(CoulombRepulsion, &basis).unwrap();
        let reference = direct_coulomb_tensor(&basis);
        for (idx, val) in tensor.indexed_iter() {
            assert_abs_diff_eq!(*val, reference[idx], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_coulomb_tensor_eightfold_symmetry() {
        // the directly assembled tensor must obey the generators of the
        // real 8-fold permutational group
        let tensor = direct_coulomb_tensor(&sp_basis());
        for ((i, j, k, l), &val) in tensor.indexed_iter() {
            assert_abs_diff_eq!(val, tensor[[j, i, k, l]], epsilon = 1e-12);
            assert_abs_diff_eq!(val, tensor[[i, j, l, k]], epsilon = 1e-12);
            assert_abs_diff_eq!(val, tensor[[k, l, i, j]], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_operator_family_entry_points_reject_mismatches() {
        let basis = mixed_basis();
        assert_eq!(
            calc_one_electron_matrices(&OneElectronOperator::LinearMomentum, &basis, &basis),
            Err(CalcError::ComplexValuedOperator)
        );
        assert_eq!(
            calc_momentum_matrices(&OneElectronOperator::Overlap, &basis, &basis),
            Err(CalcError::RealValuedOperator)
        );
    }

    #[test]
    fn test_empty_shell_set_rejected() {
        let basis = mixed_basis();
        let empty = ShellSet::<Shell>::new(Vec::new());
        assert_eq!(
            calc_one_electron_matrices(&OneElectronOperator::Overlap, &empty, &basis),
            Err(CalcError::EmptyShellSet)
        );
        assert_eq!(
            calc_coulomb_tensor(CoulombRepulsion, &empty),
            Err(CalcError::EmptyShellSet)
        );
    }

    fn london_basis(gauge_origin: [f64; 3]) -> LondonShellSet {
        let field = HomogeneousMagneticField::new([0.1, -0.3, 0.5], gauge_origin);
        let shells = ShellSet::new(vec![
            Shell::new(0, false, [0.0; 3], vec![1.2, 0.5], vec![0.7, 0.4]).unwrap(),
            Shell::new(1, false, [0.0, 0.0, 1.2], vec![0.8], vec![1.0]).unwrap(),
        ]);
        LondonShellSet::from_shell_set(shells, field)
    }

    #[test]
    fn test_london_one_electron_matches_unsymmetrized_assembly() {
        let basis = london_basis([0.0; 3]);
        let matrices =
            calc_london_one_electron_matrices(&OneElectronOperator::Overlap, &basis, &basis)
                .unwrap();

        let n_ao = basis.n_basis_functions();
        let mut reference = Array2::<Complex64>::zeros((n_ao, n_ao));
        for sh1_idx in 0..basis.n_shells() {
            for sh2_idx in 0..basis.n_shells() {
                let block =
                    calc_overlap_shblock_london(basis.shell(sh1_idx), basis.shell(sh2_idx));
                let row0 = basis.basis_function_offset(sh1_idx);
                let col0 = basis.basis_function_offset(sh2_idx);
                for ((a, b), &val) in block.indexed_iter() {
                    reference[(row0 + a, col0 + b)] = val;
                }
            }
        }
        for (idx, val) in matrices[0].indexed_iter() {
            assert_abs_diff_eq!(val.re, reference[idx].re, epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, reference[idx].im, epsilon = 1e-12);
            let mirrored = matrices[0][(idx.1, idx.0)].conj();
            assert_abs_diff_eq!(val.re, mirrored.re, epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, mirrored.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_london_ang_mom_matrices_match_unsymmetrized_assembly() {
        let basis = london_basis([0.0; 3]);
        let origin = [0.3, -0.1, 0.2];
        let matrices = calc_london_one_electron_matrices(
            &OneElectronOperator::AngularMomentum { origin },
            &basis,
            &basis,
        )
        .unwrap();
        assert_eq!(matrices.len(), 3);

        let n_ao = basis.n_basis_functions();
        for d in 0..3 {
            let mut reference = Array2::<Complex64>::zeros((n_ao, n_ao));
            for sh1_idx in 0..basis.n_shells() {
                for sh2_idx in 0..basis.n_shells() {
                    let blocks = calc_ang_mom_shblock_london(
                        basis.shell(sh1_idx),
                        basis.shell(sh2_idx),
                        origin,
                    );
                    let row0 = basis.basis_function_offset(sh1_idx);
                    let col0 = basis.basis_function_offset(sh2_idx);
                    for ((a, b), &val) in blocks[d].indexed_iter() {
                        reference[(row0 + a, col0 + b)] = val;
                    }
                }
            }
            for (idx, val) in matrices[d].indexed_iter() {
                assert_abs_diff_eq!(val.re, reference[idx].re, epsilon = 1e-12);
                assert_abs_diff_eq!(val.im, reference[idx].im, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_london_one_electron_gauge_origin_invariant() {
        // Operators that see the field only through k_ket - k_bra must not
        // change when the gauge origin moves.
        let operators = [
            OneElectronOperator::Overlap,
            OneElectronOperator::NuclearAttraction(vec![
                crate::operator::PointCharge::new(1.0, [0.0; 3]),
                crate::operator::PointCharge::new(1.0, [0.0, 0.0, 1.2]),
            ]),
            OneElectronOperator::ElectronicDipole { origin: [0.2, 0.0, -0.4] },
        ];
        let basis1 = london_basis([0.0; 3]);
        let basis2 = london_basis([1.5, -0.7, 0.9]);
        for operator in &operators {
            let matrices1 =
                calc_london_one_electron_matrices(operator, &basis1, &basis1).unwrap();
            let matrices2 =
                calc_london_one_electron_matrices(operator, &basis2, &basis2).unwrap();
            for (matrix1, matrix2) in matrices1.iter().zip(&matrices2) {
                for (val1, val2) in matrix1.iter().zip(matrix2.iter()) {
                    assert_abs_diff_eq!(val1.re, val2.re, epsilon = 1e-12);
                    assert_abs_diff_eq!(val1.im, val2.im, epsilon = 1e-12);
                }
            }
        }
    }

    fn direct_london_coulomb_tensor(basis: &LondonShellSet) -> Array4<Complex64> {
        let n_ao = basis.n_basis_functions();
        let mut tensor = Array4::<Complex64>::zeros((n_ao, n_ao, n_ao, n_ao));
        for sh1 in 0..basis.n_shells() {
            for sh2 in 0..basis.n_shells() {
                for sh3 in 0..basis.n_shells() {
                    for sh4 in 0..basis.n_shells() {
                        let block = calc_coulomb_shblock_london([
                            basis.shell(sh1),
                            basis.shell(sh2),
                            basis.shell(sh3),
                            basis.shell(sh4),
                        ]);
                        let off = [sh1, sh2, sh3, sh4]
                            .map(|sh| basis.basis_function_offset(sh));
                        for ((a, b, c, d), &val) in block.indexed_iter() {
                            tensor[[off[0] + a, off[1] + b, off[2] + c, off[3] + d]] = val;
                        }
                    }
                }
            }
        }
        tensor
    }

    #[test]
    fn test_london_coulomb_matches_unsymmetrized_assembly() {
        let basis = london_basis([0.4, 0.2, -0.6]);
        let tensor = calc_london_coulomb_tensor(CoulombRepulsion, &basis).unwrap();
        let reference = direct_london_coulomb_tensor(&basis);
        for (idx, val) in tensor.indexed_iter() {
            assert_abs_diff_eq!(val.re, reference[idx].re, epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, reference[idx].im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_london_coulomb_fourfold_symmetry() {
        // over complex orbitals only electron exchange and full conjugate
        // reversal survive: g[ijkl] = g[klij], g[jilk] = conj g[ijkl]
        let tensor = direct_london_coulomb_tensor(&london_basis([0.0; 3]));
        for ((i, j, k, l), &val) in tensor.indexed_iter() {
            let exchanged = tensor[[k, l, i, j]];
            assert_abs_diff_eq!(val.re, exchanged.re, epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, exchanged.im, epsilon = 1e-12);
            let reversed = tensor[[j, i, l, k]].conj();
            assert_abs_diff_eq!(val.re, reversed.re, epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, reversed.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_london_kinetic_zero_field_matches_real() {
        let field_free = HomogeneousMagneticField::new([0.0; 3], [0.0; 3]);
        let shells = ShellSet::new(vec![
            Shell::new(0, false, [0.0; 3], vec![1.2, 0.5], vec![0.7, 0.4]).unwrap(),
            Shell::new(2, true, [0.0, 0.5, 1.2], vec![0.8], vec![1.0]).unwrap(),
        ]);
        let london_set = LondonShellSet::from_shell_set(shells.clone(), field_free);
        let real_mats =
            calc_one_electron_matrices(&OneElectronOperator::Kinetic, &shells, &shells).unwrap();
        let london_mats =
            calc_london_one_electron_matrices(&OneElectronOperator::Kinetic, &london_set, &london_set)
                .unwrap();
        for (idx, val) in london_mats[0].indexed_iter() {
            assert_abs_diff_eq!(val.re, real_mats[0][idx], epsilon = 1e-12);
            assert_abs_diff_eq!(val.im, 0.0, epsilon = 1e-13);
        }
    }
}
