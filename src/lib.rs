//! Molecular integrals over contracted Gaussian-type orbitals.
//!
//! The crate evaluates the standard one- and two-electron integrals of
//! quantum chemistry (overlap, kinetic energy, nuclear attraction,
//! multipole moments, linear and angular momentum, electron repulsion)
//! with the McMurchie-Davidson scheme, for real shells and for
//! field-dependent London (gauge-including) shells.
//!
//! - [`basisset`] holds shells, shell sets and London shells
//! - [`molecule`] holds atoms and molecular geometry
//! - [`operator`] enumerates the supported operators
//! - [`mol_int`] evaluates single shell blocks
//! - [`calculator`] assembles whole-basis matrices and tensors,
//!   exploiting permutational symmetry

pub mod basisset;
pub mod calculator;
pub mod mol_int;
pub mod molecule;
pub mod operator;
