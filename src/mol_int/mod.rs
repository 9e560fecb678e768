//! Molecular integral engine.
//!
//! `boys` and `recurrence_rel` hold the primitive machinery (Boys
//! function, McMurchie-Davidson expansion and Hermite Coulomb recursions);
//! `oe_int`, `te_int` and `london_int` evaluate shell blocks with it;
//! `sph_trafo` takes the blocks from the Cartesian to the pure (spherical)
//! basis.

pub mod boys;
pub mod london_int;
pub mod oe_int;
pub(crate) mod recurrence_rel;
pub mod sph_trafo;
pub mod te_int;
