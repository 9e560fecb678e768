//! Enumeration of the Cartesian components (nx, ny, nz) of a shell.

/// All Cartesian exponent tuples with `nx + ny + nz == l`, in lexicographic
/// order: nx descending, ties broken by ny descending. Every consumer of a
/// Cartesian integral block relies on this exact order, so it must never
/// change. For l = 2 this yields xx, xy, xz, yy, yz, zz.
pub fn cartesian_exponents(l: u32) -> Vec<[i32; 3]> {
    let l = l as i32;
    let mut tuples = Vec::with_capacity(((l + 1) * (l + 2) / 2) as usize);
    for nx in (0..=l).rev() {
        for ny in (0..=(l - nx)).rev() {
            tuples.push([nx, ny, l - nx - ny]);
        }
    }
    tuples
}
