use std::ops::{Index, IndexMut, Sub};

/// A point nucleus: position in bohr and nuclear charge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Atom {
    x: f64,
    y: f64,
    z: f64,
    pub z_val: u32,
}

impl Index<usize> for Atom {
    type Output = f64; // necessary for Index trait
    fn index<'a>(&'a self, i: usize) -> &'a f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of bounds for Atom"),
        }
    }
}

impl IndexMut<usize> for Atom {
    fn index_mut<'a>(&'a mut self, i: usize) -> &'a mut f64 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Index out of bounds for Atom"),
        }
    }
}

impl Sub for Atom {
    type Output = f64;
    fn sub(self, other: Self) -> Self::Output {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl<'a> Sub for &'a Atom {
    type Output = f64;

    fn sub(self, other: Self) -> Self::Output {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Atom {
    pub fn new(x_inp: f64, y_inp: f64, z_inp: f64, z_val: u32) -> Self {
        Self {
            x: x_inp,
            y: y_inp,
            z: z_inp,
            z_val,
        }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub(crate) fn scale_coords(&mut self, fac: f64) {
        self.x *= fac;
        self.y *= fac;
        self.z *= fac;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_atom_dist() {
        let at1 = Atom::new(0.0, 0.0, 0.0, 1);
        let at2 = Atom::new(0.0, 3.0, 4.0, 1);
        assert_abs_diff_eq!(&at1 - &at2, 5.0, epsilon = 1e-14);
        assert_eq!(at2[1], 3.0);
        assert_eq!(at2.coords(), [0.0, 3.0, 4.0]);
    }
}
