use strum_macros::EnumIter;

#[repr(usize)]
#[derive(Clone, Copy, Debug, EnumIter, PartialEq)]
pub(crate) enum Cartesian {
    X = 0usize,
    Y = 1usize,
    Z = 2usize,
}

pub(crate) const CC_X: usize = Cartesian::X as usize;
pub(crate) const CC_Y: usize = Cartesian::Y as usize;
pub(crate) const CC_Z: usize = Cartesian::Z as usize;

impl Cartesian {
    /// The two directions completing the right-handed cyclic triple (self, next, prev).
    pub(crate) fn cyclic_followers(self) -> (usize, usize) {
        let d = self as usize;
        ((d + 1) % 3, (d + 2) % 3)
    }
}
