//! Arithmetic and error propagation on whole meshes
//!
//! Every operation borrows its operands and returns a new [Mesh], so the
//! inputs are never modified. Results always carry the metadata of the left
//! hand operand.
//!
//! ```rust
//! # use meshops_mesh::{Mesh, Voxel};
//! # use meshops_mesh::operations::{diff, scale, sum, Correlation};
//! let mesh = Mesh {
//!     iints: 2,
//!     jints: 1,
//!     kints: 1,
//!     voxels: vec![
//!         Voxel { index: 0, result: 2.0, error: 0.1 },
//!         Voxel { index: 1, result: 4.0, error: 0.2 },
//!     ],
//!     ..Default::default()
//! };
//!
//! let doubled = sum(&mesh, &mesh, Correlation::Correlated).unwrap();
//! assert_eq!(doubled, scale(&mesh, 2.0_f64));
//!
//! let zero = diff(&mesh, &mesh, Correlation::Correlated).unwrap();
//! assert!(zero.voxels.iter().all(|v| v.result == 0.0 && v.error == 0.0));
//! ```

// crate modules
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::voxel::Voxel;

// external crates
use log::debug;

/// Statistical relationship between two operands
///
/// Meshes from the same simulation share random samples and should be treated
/// as [Correlation::Correlated]. Results of separate runs with different
/// seeds are [Correlation::Independent].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    /// Absolute errors add linearly
    Correlated,
    /// Absolute errors add in quadrature
    #[default]
    Independent,
}

impl Correlation {
    fn is_correlated(&self) -> bool {
        *self == Correlation::Correlated
    }
}

impl From<bool> for Correlation {
    fn from(correlated: bool) -> Self {
        match correlated {
            true => Correlation::Correlated,
            false => Correlation::Independent,
        }
    }
}

/// Outcome of comparing two meshes with [identical()]
///
/// Each property is reported separately so that callers can decide which
/// differences matter to them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeshComparison {
    /// Both tallies are for the same particle
    pub particle: bool,
    /// Same geometry type, bounds, orientation and number of voxels
    pub geometry: bool,
    /// Both standard meshes or both Cell-under-Voxel
    pub kind: bool,
}

impl MeshComparison {
    /// True only when every property matches
    pub fn all(&self) -> bool {
        self.particle && self.geometry && self.kind
    }
}

impl std::fmt::Display for MeshComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "particle : {}", self.particle)?;
        writeln!(f, "geometry : {}", self.geometry)?;
        write!(f, "kind     : {}", self.kind)
    }
}

/// Multiply every result by a constant factor
///
/// Relative errors are unchanged, including for zero and negative factors.
///
/// ```rust
/// # use meshops_mesh::{Mesh, Voxel};
/// # use meshops_mesh::operations::scale;
/// let mesh = Mesh {
///     voxels: vec![Voxel { index: 0, result: 2.0, error: 0.1 }],
///     ..Default::default()
/// };
/// let scaled = scale(&mesh, 5.0_f64);
/// assert_eq!(scaled.voxels[0].result, 10.0);
/// assert_eq!(scaled.voxels[0].error, 0.1);
/// ```
pub fn scale<T: Into<f64>>(mesh: &Mesh, factor: T) -> Mesh {
    let factor: f64 = factor.into();
    Mesh {
        voxels: mesh.voxels.iter().map(|v| *v * factor).collect(),
        ..mesh.clone()
    }
}

/// Linear combination `f1*a + f2*b` of two meshes, voxel by voxel
///
/// Fails with [Error::ShapeMismatch] unless `a.same_mesh(b)`. The relative
/// error of any voxel with a zero result is zero.
pub fn combine(a: &Mesh, b: &Mesh, f1: f64, f2: f64, correlation: Correlation) -> Result<Mesh> {
    if !a.same_mesh(b) {
        return Err(Error::ShapeMismatch {
            left: a.id,
            right: b.id,
        });
    }

    if a.particle != b.particle || a.kind() != b.kind() {
        debug!(
            "Combining mesh {} ({}, {}) with mesh {} ({}, {})",
            a.id,
            a.particle,
            a.kind(),
            b.id,
            b.particle,
            b.kind()
        );
    }

    let correlated = correlation.is_correlated();
    let voxels = a
        .voxels
        .iter()
        .zip(&b.voxels)
        .map(|(va, vb)| Voxel::combine(*va, *vb, f1, f2, correlated))
        .collect();

    Ok(Mesh {
        voxels,
        ..a.clone()
    })
}

/// Sum of two meshes, `a + b`
pub fn sum(a: &Mesh, b: &Mesh, correlation: Correlation) -> Result<Mesh> {
    combine(a, b, 1.0, 1.0, correlation)
}

/// Difference of two meshes, `a - b`
pub fn diff(a: &Mesh, b: &Mesh, correlation: Correlation) -> Result<Mesh> {
    combine(a, b, 1.0, -1.0, correlation)
}

/// Compare the particle, geometry, and kind of two meshes
///
/// ```rust
/// # use meshops_mesh::{Mesh, Particle};
/// # use meshops_mesh::operations::identical;
/// let a = Mesh::default();
/// let b = Mesh { particle: Particle::Photon, ..Default::default() };
///
/// let check = identical(&a, &b);
/// assert!(!check.particle);
/// assert!(check.geometry);
/// assert!(check.kind);
/// assert!(!check.all());
/// ```
pub fn identical(a: &Mesh, b: &Mesh) -> MeshComparison {
    MeshComparison {
        particle: a.particle == b.particle,
        geometry: a.same_mesh(b) && a.same_orientation(b),
        kind: a.kind() == b.kind(),
    }
}

/// Collapse a selection of energy groups into a single group
///
/// Indices refer to the energy bins on the EMESH card, never the 'Total'
/// group. The new mesh has a single energy bin spanning the lowest to the
/// highest selected boundary, with every time group kept.
///
/// ```rust
/// # use meshops_mesh::{Mesh, Voxel};
/// # use meshops_mesh::operations::{sum_energy_groups, Correlation};
/// let mesh = Mesh {
///     iints: 1,
///     jints: 1,
///     kints: 1,
///     eints: 2,
///     emesh: vec![0.0, 1.0, 20.0],
///     voxels: vec![
///         Voxel { index: 0, result: 1.0, error: 0.0 },
///         Voxel { index: 1, result: 3.0, error: 0.0 },
///         Voxel { index: 2, result: 4.0, error: 0.0 },
///     ],
///     ..Default::default()
/// };
///
/// let total = sum_energy_groups(&mesh, &[0, 1], Correlation::Independent).unwrap();
/// assert_eq!(total.emesh, vec![0.0, 20.0]);
/// assert_eq!(total.voxels[0].result, 4.0);
/// ```
pub fn sum_energy_groups(mesh: &Mesh, groups: &[usize], correlation: Correlation) -> Result<Mesh> {
    let mut groups = groups.to_vec();
    groups.sort();
    groups.dedup();

    let (Some(&first), Some(&last)) = (groups.first(), groups.last()) else {
        return Err(Error::EmptyCollection);
    };

    // only the EMESH bins are valid, a single bin mesh has just the one
    let n_groups = mesh.eints.max(1);
    if last >= n_groups {
        return Err(Error::IndexOutOfBounds {
            minimum: 0,
            maximum: n_groups,
            actual: last,
        });
    }

    let correlated = correlation.is_correlated();
    let mut voxels = Vec::with_capacity(mesh.tbins() * mesh.n_voxels_per_group());

    for t_idx in 0..mesh.tbins() {
        let mut combined = mesh.slice_voxels_by_idx(first, t_idx)?.to_vec();

        for &e_idx in &groups[1..] {
            let group = mesh.slice_voxels_by_idx(e_idx, t_idx)?;
            for (acc, voxel) in combined.iter_mut().zip(group) {
                *acc = Voxel::combine(*acc, *voxel, 1.0, 1.0, correlated);
            }
        }

        voxels.extend(combined);
    }

    for (index, voxel) in voxels.iter_mut().enumerate() {
        voxel.index = index;
    }

    let emesh = match (mesh.emesh.get(first), mesh.emesh.get(last + 1)) {
        (Some(lower), Some(upper)) => vec![*lower, *upper],
        _ => mesh.emesh.clone(),
    };

    Ok(Mesh {
        emesh,
        eints: 1,
        voxels,
        ..mesh.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::particle::Particle;

    /// 2x2x1 mesh of [[1, 9], [4, 16]] with 100% errors
    fn square() -> Mesh {
        Mesh {
            id: 124,
            particle: Particle::Neutron,
            imesh: vec![0.0, 1.0, 2.0],
            iints: 2,
            jmesh: vec![0.0, 1.0, 2.0],
            jints: 2,
            kmesh: vec![0.0, 1.0],
            kints: 1,
            emesh: vec![0.0, 1e36],
            eints: 1,
            voxels: [1.0, 9.0, 4.0, 16.0]
                .into_iter()
                .enumerate()
                .map(|(index, result)| Voxel {
                    index,
                    result,
                    error: 1.0,
                })
                .collect(),
            format: Format::COL,
            ..Default::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn independent_self_sum() {
        let m = square();
        let s = sum(&m, &m, Correlation::Independent).unwrap();
        for (v, original) in s.voxels.iter().zip(&m.voxels) {
            assert_eq!(v.result, 2.0 * original.result);
            assert!(close(v.error, 2.0_f64.sqrt() / 2.0));
        }
    }

    #[test]
    fn correlated_self_sum() {
        let m = square();
        let s = sum(&m, &m, Correlation::Correlated).unwrap();
        assert_eq!(s, scale(&m, 2.0_f64));
    }

    #[test]
    fn self_difference() {
        let m = square();
        for correlation in [Correlation::Correlated, Correlation::Independent] {
            let d = diff(&m, &m, correlation).unwrap();
            assert!(d.voxels.iter().all(|v| v.result == 0.0 && v.error == 0.0));
        }
    }

    #[test]
    fn operands_unchanged() {
        let m = square();
        let copy = m.clone();
        let _ = combine(&m, &m, 3.0, -2.0, Correlation::Independent).unwrap();
        let _ = scale(&m, 7.0_f64);
        assert_eq!(m, copy);
    }

    #[test]
    fn metadata_from_lhs() {
        let a = square();
        let mut b = square();
        b.id = 200;
        b.particle = Particle::Photon;
        let s = sum(&a, &b, Correlation::Independent).unwrap();
        assert_eq!(s.id, 124);
        assert_eq!(s.particle, Particle::Neutron);
    }

    #[test]
    fn repeated_scaling() {
        let m = square();
        let once = scale(&m, 6.0_f64);
        let twice = scale(&scale(&m, 2.0_f64), 3.0_f64);
        assert_eq!(once, twice);
    }

    #[test]
    fn scale_by_zero_keeps_errors() {
        let m = scale(&square(), 0.0_f64);
        assert!(m.voxels.iter().all(|v| v.result == 0.0 && v.error == 1.0));
    }

    #[test]
    fn shape_mismatch() {
        let a = square();
        let mut b = square();
        b.imesh[2] = 3.0;
        let err = sum(&a, &b, Correlation::Independent).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { left: 124, right: 124 }));
    }

    #[test]
    fn identical_three_ways() {
        let a = square();
        assert!(identical(&a, &a).all());

        let mut b = square();
        b.format = Format::CUV;
        let check = identical(&a, &b);
        assert!(check.particle && check.geometry && !check.kind);

        let mut c = square();
        c.origin = [5.0, 0.0, 0.0];
        let check = identical(&a, &c);
        assert!(check.particle && !check.geometry && check.kind);
    }

    #[test]
    fn energy_group_sum() {
        // two energy bins + total, one voxel each
        let mesh = Mesh {
            iints: 1,
            jints: 1,
            kints: 1,
            eints: 2,
            emesh: vec![0.0, 1.0, 20.0],
            voxels: vec![
                Voxel {
                    index: 0,
                    result: 3.0,
                    error: 1.0,
                },
                Voxel {
                    index: 1,
                    result: 4.0,
                    error: 1.0,
                },
                Voxel {
                    index: 2,
                    result: 7.0,
                    error: 5.0 / 7.0,
                },
            ],
            ..Default::default()
        };

        let total = sum_energy_groups(&mesh, &[1, 0], Correlation::Independent).unwrap();
        assert_eq!(total.ebins(), 1);
        assert_eq!(total.voxels.len(), 1);
        assert_eq!(total.voxels[0].result, 7.0);
        assert!(close(total.voxels[0].error, 5.0 / 7.0));

        let single = sum_energy_groups(&mesh, &[1], Correlation::Independent).unwrap();
        assert_eq!(single.emesh, vec![1.0, 20.0]);
        assert_eq!(single.voxels[0].result, 4.0);

        assert!(matches!(
            sum_energy_groups(&mesh, &[], Correlation::Independent),
            Err(Error::EmptyCollection)
        ));
        assert!(matches!(
            sum_energy_groups(&mesh, &[2], Correlation::Independent),
            Err(Error::IndexOutOfBounds { actual: 2, .. })
        ));
    }
}
