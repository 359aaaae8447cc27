//! Module for voxel-related data and implementations

// crate modules
use crate::group::Group;

// meshops modules
use meshops_utils::ValueExt;

// standard library
use std::ops::{Add, Mul, Sub};

/// Representation of a single voxel in the mesh
///
/// The global `index` of the voxel is included to maintain consistency between
/// output [Format](crate::Format) variants, since parsing line-by-line leaves
/// the voxels of several formats out of order until the final sort.
///
/// Everything else (coordinates, energy and time groups) is derivable from the
/// [Mesh](crate::Mesh) given the index, keeping every voxel at 24 bytes.
///
/// The `error` is always relative, as written in meshtal files.
///
/// A few operators are implemented where the meaning is unambiguous:
///
/// - `voxel * k` scales the result, leaving the relative error unchanged
/// - `a + b` and `a - b` assume independent voxels and add absolute errors in
///   quadrature
///
/// In all cases the index of the LHS is kept. Correlated combinations are
/// available through [Voxel::combine].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Voxel {
    /// Global voxel index
    pub index: usize,
    /// Tallied voxel result
    pub result: f64,
    /// Relative error on result
    pub error: f64,
}

impl Voxel {
    /// Returns the absolute error for the voxel
    ///
    ///```rust
    /// # use meshops_mesh::Voxel;
    /// let voxel = Voxel {
    ///     result: 50.0,
    ///     error: 0.10,
    ///     ..Default::default()
    /// };
    ///
    /// // 10% relative error => 50.0 +/-5.0
    /// assert_eq!(voxel.absolute_error(), 5.0);
    /// ```
    pub fn absolute_error(&self) -> f64 {
        self.result * self.error
    }

    /// Linear combination `f1*a + f2*b` of two voxels
    ///
    /// When `correlated` the signed absolute errors are added linearly,
    /// otherwise they are added in quadrature. The relative error of a zero
    /// result is defined as zero.
    ///
    /// ```rust
    /// # use meshops_mesh::Voxel;
    /// let a = Voxel { index: 0, result: 4.0, error: 0.5 };
    ///
    /// // doubling through a correlated sum keeps the relative error
    /// let doubled = Voxel::combine(a, a, 1.0, 1.0, true);
    /// assert_eq!(doubled.result, 8.0);
    /// assert_eq!(doubled.error, 0.5);
    ///
    /// // a correlated difference with itself is exactly zero
    /// let zero = Voxel::combine(a, a, 1.0, -1.0, true);
    /// assert_eq!(zero.result, 0.0);
    /// assert_eq!(zero.error, 0.0);
    /// ```
    pub fn combine(a: Voxel, b: Voxel, f1: f64, f2: f64, correlated: bool) -> Voxel {
        let result = f1 * a.result + f2 * b.result;
        let da = f1 * a.absolute_error();
        let db = f2 * b.absolute_error();

        let absolute = if correlated {
            (da + db).abs()
        } else {
            da.hypot(db)
        };

        Voxel {
            index: a.index,
            result,
            error: relative_error(absolute, result),
        }
    }
}

/// Absolute to relative error, zero for a zero result
pub(crate) fn relative_error(absolute: f64, result: f64) -> f64 {
    if result == 0.0 {
        0.0
    } else {
        (absolute / result).abs()
    }
}

impl std::fmt::Display for Voxel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<5.0}{:>13}{:>13}",
            self.index,
            self.result.sci(5, 2),
            self.error.sci(5, 2)
        )
    }
}

impl Add<Self> for Voxel {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Voxel::combine(self, rhs, 1.0, 1.0, false)
    }
}

impl Sub<Self> for Voxel {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Voxel::combine(self, rhs, 1.0, -1.0, false)
    }
}

impl<T> Mul<T> for Voxel
where
    T: Into<f64>,
{
    type Output = Self;
    fn mul(self, rhs: T) -> Self {
        Self {
            index: self.index,
            result: self.result * rhs.into(),
            error: self.error,
        }
    }
}

/// Convenience structure for collecting voxel coordinate information
///
/// Coordinates are the centre of the voxel in the native system of the mesh,
/// i.e. (x, y, z) or (r, z, theta).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct VoxelCoordinate {
    /// Energy group (MeV)
    pub energy: Group,
    /// Time group (shakes)
    pub time: Group,
    /// i coordinate at the voxel centre
    pub i: f64,
    /// j coordinate at the voxel centre
    pub j: f64,
    /// k coordinate at the voxel centre
    pub k: f64,
}

impl Default for VoxelCoordinate {
    fn default() -> Self {
        Self {
            energy: Group::Total,
            time: Group::Total,
            i: 0.0,
            j: 0.0,
            k: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voxel(result: f64, error: f64) -> Voxel {
        Voxel {
            index: 3,
            result,
            error,
        }
    }

    #[test]
    fn independent_sum_in_quadrature() {
        let v = voxel(3.0, 1.0) + voxel(4.0, 1.0);
        assert_eq!(v.index, 3);
        assert_eq!(v.result, 7.0);
        assert!((v.error - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn independent_difference_to_zero() {
        let v = voxel(2.0, 0.1) - voxel(2.0, 0.1);
        assert_eq!(v.result, 0.0);
        assert_eq!(v.error, 0.0);
        assert!(!v.error.is_nan());
    }

    #[test]
    fn correlated_general_case() {
        // |2*10*0.1 + 1*5*0.2| = 3, result = 25
        let v = Voxel::combine(voxel(10.0, 0.1), voxel(5.0, 0.2), 2.0, 1.0, true);
        assert_eq!(v.result, 25.0);
        assert!((v.error - 3.0 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn scaling_keeps_relative_error() {
        let v = voxel(2.0, 0.3) * -4.0;
        assert_eq!(v.result, -8.0);
        assert_eq!(v.error, 0.3);
    }

    #[test]
    fn negative_results_give_positive_errors() {
        let v = Voxel::combine(voxel(1.0, 0.5), voxel(3.0, 0.5), 1.0, -1.0, false);
        assert_eq!(v.result, -2.0);
        assert!(v.error > 0.0);
    }
}
