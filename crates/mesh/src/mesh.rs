//! The mesh tally data model

// crate modules
use crate::error::{Error, Result};
use crate::format::{Format, MeshKind};
use crate::geometry::Geometry;
use crate::group::Group;
use crate::particle::Particle;
use crate::voxel::{Voxel, VoxelCoordinate};

// meshops modules
use meshops_utils::{f, SliceExt, ValueExt};

// external crates
use itertools::Itertools;
use nalgebra::{Rotation, Vector3};

/// Relative tolerance used when comparing bin boundaries of two meshes
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// One mesh tally, in any output format
///
/// Fields follow the FMESH input cards, so `imesh`, `emesh`, `origin`, etc...
/// mean the same thing they do in an input deck, in the same units.
///
/// Every format the reader supports ends up as a [Mesh], which is what the
/// arithmetic, writers and VTK conversion all work on.
///
/// ## (I, J, K)
///
/// Rectangular meshes are (X, Y, Z) and cylindrical meshes are (R, Z, Theta).
/// The generic (I, J, K) is used for both.
///
/// ## Groups
///
/// The full set of (I, J, K) voxels is repeated for every energy and time
/// group. When a card defines more than one bin there is an extra `Total`
/// group on the end, so groups are described with [Group::Value] and
/// [Group::Total].
///
/// ## Voxel order
///
/// Voxels are stored in the order of column output, with k varying fastest:
///
/// ```text
/// index = e*(T*I*J*K) + t*(I*J*K) + i*(J*K) + j*K + k
/// ```
///
/// ```rust, no_run
/// # use meshops_mesh::{read_meshtal_target, Mesh};
/// let mesh = read_meshtal_target("/path/to/meshtal.msht", 104).unwrap();
/// mesh.print_info();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Tally number, e.g. FMESH104 => 104
    pub id: u32,
    pub geometry: Geometry,
    pub particle: Particle,
    /// i boundaries
    pub imesh: Vec<f64>,
    /// Number of i bins
    pub iints: usize,
    /// j boundaries
    pub jmesh: Vec<f64>,
    /// Number of j bins
    pub jints: usize,
    /// k boundaries
    pub kmesh: Vec<f64>,
    /// Number of k bins
    pub kints: usize,
    /// Energy boundaries \[MeV\]
    pub emesh: Vec<f64>,
    /// Number of energy bins, not counting the total
    pub eints: usize,
    /// Time boundaries \[shakes\]
    pub tmesh: Vec<f64>,
    /// Number of time bins, not counting the total
    pub tints: usize,
    /// ORIGIN card
    pub origin: [f64; 3],
    /// AXS card, cylinders only
    pub axs: [f64; 3],
    /// VEC card, cylinders only
    pub vec: [f64; 3],
    /// Every voxel, in voxel index order
    pub voxels: Vec<Voxel>,
    /// Format of the meshtal output the mesh was read from
    pub format: Format,
}

impl Mesh {
    /// Empty mesh for the tally number `id`
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Standard mesh or Cell-under-Voxel, derived from the format
    pub fn kind(&self) -> MeshKind {
        self.format.kind()
    }

    /// Number of energy groups, including any `Total` group
    ///
    /// | EMESH         | Groups                |
    /// | ------------- | --------------------- |
    /// | not given     | 1                     |
    /// | 0 100         | 1                     |
    /// | 0 20 100      | 3 (2 bins + `Total`)  |
    pub fn ebins(&self) -> usize {
        n_groups(self.eints)
    }

    /// Number of time groups, including any `Total` group
    pub fn tbins(&self) -> usize {
        n_groups(self.tints)
    }

    /// Every energy group in order, labelled by the upper bin edge
    ///
    /// ```rust
    /// # use meshops_mesh::{Mesh, Group};
    /// let mesh = Mesh {
    ///     eints: 2,
    ///     emesh: vec![0.0, 1.0, 2.0],
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     mesh.energy_groups(),
    ///     vec![Group::Value(1.0), Group::Value(2.0), Group::Total]
    /// );
    /// ```
    pub fn energy_groups(&self) -> Vec<Group> {
        groups(&self.emesh, self.eints)
    }

    /// Every time group in order, labelled by the upper bin edge
    pub fn time_groups(&self) -> Vec<Group> {
        groups(&self.tmesh, self.tints)
    }

    /// Index of an energy group, matched against the upper bin edges
    ///
    /// ```rust
    /// # use meshops_mesh::{Mesh, Group};
    /// let mesh = Mesh {
    ///     eints: 2,
    ///     emesh: vec![0.0, 1.0, 20.0],
    ///     ..Default::default()
    /// };
    /// assert_eq!(mesh.energy_group_index(Group::Value(20.0)).unwrap(), 1);
    /// assert_eq!(mesh.energy_group_index(Group::Total).unwrap(), 2);
    /// assert!(mesh.energy_group_index(Group::Value(5.0)).is_err());
    /// ```
    pub fn energy_group_index(&self, group: Group) -> Result<usize> {
        self.energy_groups()
            .iter()
            .position(|candidate| match (candidate, group) {
                (Group::Value(a), Group::Value(b)) => [*a].is_close(&[b], BOUNDARY_TOLERANCE),
                _ => candidate.is_total() && group.is_total(),
            })
            .ok_or_else(|| Error::FailedToInferGroup(f!("{group}")))
    }

    /// Two meshes share exactly the same grid
    ///
    /// Required for voxel-by-voxel arithmetic. Compares the geometry type,
    /// bins and boundaries of every dimension, and the number of voxels.
    /// Particle and kind are left to [identical()](crate::operations::identical).
    ///
    /// ```rust
    /// # use meshops_mesh::Mesh;
    /// let a = Mesh {
    ///     imesh: vec![0.0, 1.0, 2.0],
    ///     iints: 2,
    ///     ..Default::default()
    /// };
    /// let mut b = a.clone();
    /// assert!(a.same_mesh(&b));
    ///
    /// b.imesh[2] = 3.0;
    /// assert!(!a.same_mesh(&b));
    /// ```
    pub fn same_mesh(&self, other: &Mesh) -> bool {
        let counts = |m: &Mesh| [m.iints, m.jints, m.kints, m.eints, m.tints, m.voxels.len()];
        let bounds: for<'a> fn(&'a Mesh) -> [&'a Vec<f64>; 5] = |m| [&m.imesh, &m.jmesh, &m.kmesh, &m.emesh, &m.tmesh];

        self.geometry == other.geometry
            && counts(self) == counts(other)
            && bounds(self)
                .iter()
                .zip(bounds(other))
                .all(|(a, b)| a.is_close(b, BOUNDARY_TOLERANCE))
    }

    /// ORIGIN, AXS and VEC agree between two meshes
    pub fn same_orientation(&self, other: &Mesh) -> bool {
        [
            (&self.origin, &other.origin),
            (&self.axs, &other.axs),
            (&self.vec, &other.vec),
        ]
        .iter()
        .all(|(a, b)| a.is_close(b.as_slice(), BOUNDARY_TOLERANCE))
    }
}

impl Mesh {
    /// Voxels of one energy/time group
    ///
    /// Relies on the voxels being in index order, which the reader ensures.
    pub fn slice_voxels_by_idx(&self, e_idx: usize, t_idx: usize) -> Result<&[Voxel]> {
        check_index(e_idx, self.ebins())?;
        check_index(t_idx, self.tbins())?;

        let start = self.etijk_to_voxel_index(e_idx, t_idx, 0, 0, 0);
        self.voxels
            .get(start..start + self.n_voxels_per_group())
            .ok_or(Error::UnexpectedNumberOfVoxels {
                id: self.id,
                expected: self.n_voxels_expected(),
                found: self.voxels.len(),
            })
    }

    /// Groups and voxel centre in the native coordinate system of the mesh
    ///
    /// ```rust
    /// # use meshops_mesh::{Mesh, VoxelCoordinate, Group, Voxel};
    /// let mesh = Mesh {
    ///     imesh: vec![0.0, 1.0, 2.0],
    ///     iints: 2,
    ///     jmesh: vec![0.0, 1.0, 2.0],
    ///     jints: 2,
    ///     kmesh: vec![0.0, 1.0],
    ///     kints: 1,
    ///     voxels: vec![Voxel::default(); 4],
    ///     ..Default::default()
    /// };
    ///
    /// let coordinate = mesh.voxel_coordinates(1).unwrap();
    /// assert_eq!(coordinate.energy, Group::Total);
    /// assert_eq!([coordinate.i, coordinate.j, coordinate.k], [0.5, 1.5, 0.5]);
    /// ```
    pub fn voxel_coordinates(&self, index: usize) -> Result<VoxelCoordinate> {
        let (e, t, i, j, k) = self.checked_etijk(index)?;

        Ok(VoxelCoordinate {
            energy: group_or_total(&self.energy_groups(), e),
            time: group_or_total(&self.time_groups(), t),
            i: midpoint(&self.imesh, i)?,
            j: midpoint(&self.jmesh, j)?,
            k: midpoint(&self.kmesh, k)?,
        })
    }

    /// Cartesian (x, y, z) of a voxel centre
    ///
    /// Cylindrical (r, z, theta) centres are rotated onto AXS and VEC and then
    /// moved to the ORIGIN.
    pub fn voxel_centre(&self, index: usize) -> Result<[f64; 3]> {
        let c = self.voxel_coordinates(index)?;

        if self.geometry == Geometry::Rectangular {
            return Ok([c.i, c.j, c.k]);
        }

        // theta is in revolutions, measured from VEC
        let theta = std::f64::consts::TAU * c.k + self.vec[1].atan2(self.vec[0]);
        let mut point = Vector3::new(c.i * theta.cos(), c.i * theta.sin(), c.j);
        if let Some(rotation) = self.rotation() {
            point = rotation.transform_vector(&point);
        }

        Ok([
            point.x + self.origin[0],
            point.y + self.origin[1],
            point.z + self.origin[2],
        ])
    }

    /// Volume of a voxel in cm3
    ///
    /// Theta bins are in revolutions, so a whole ring from `r0` to `r1` with
    /// height `dz` is `pi * (r1^2 - r0^2) * dz`.
    ///
    /// ```rust
    /// # use meshops_mesh::{Mesh, Voxel};
    /// let mesh = Mesh {
    ///     imesh: vec![0.0, 2.0],
    ///     iints: 1,
    ///     jmesh: vec![-1.0, 2.0],
    ///     jints: 1,
    ///     kmesh: vec![0.0, 0.5],
    ///     kints: 1,
    ///     voxels: vec![Voxel::default()],
    ///     ..Default::default()
    /// };
    /// assert_eq!(mesh.voxel_volume(0).unwrap(), 3.0);
    /// ```
    pub fn voxel_volume(&self, index: usize) -> Result<f64> {
        let (_, _, i, j, k) = self.checked_etijk(index)?;
        let dj = width(&self.jmesh, j)?;
        let dk = width(&self.kmesh, k)?;

        match self.geometry {
            Geometry::Rectangular => Ok(width(&self.imesh, i)? * dj * dk),
            Geometry::Cylindrical => {
                let dr = width(&self.imesh, i)?;
                let (r0, r1) = (self.imesh[i], self.imesh[i] + dr);
                Ok(std::f64::consts::PI * (r1 * r1 - r0 * r0) * dj * dk)
            }
        }
    }

    /// Number of (i, j, k) voxels in one energy/time group
    pub fn n_voxels_per_group(&self) -> usize {
        self.iints * self.jints * self.kints
    }

    /// Number of voxels a complete mesh should have
    ///
    /// ```rust
    /// # use meshops_mesh::{Mesh};
    /// let mesh = Mesh {
    ///     eints: 1,   // total only
    ///     tints: 2,   // 2 bins and a total
    ///     iints: 2,
    ///     jints: 3,
    ///     kints: 4,
    ///     ..Default::default()
    /// };
    /// assert_eq!(mesh.n_voxels_expected(), 72);
    /// ```
    pub fn n_voxels_expected(&self) -> usize {
        self.ebins() * self.tbins() * self.n_voxels_per_group()
    }

    /// Names of every data array the mesh can be written with
    ///
    /// Each energy/time group set provides a `"Value - <group>"` and an
    /// `"Error - <group>"` array, in voxel order.
    ///
    /// ```rust
    /// # use meshops_mesh::Mesh;
    /// let mesh = Mesh {
    ///     eints: 1,
    ///     emesh: vec![0.0, 100.0],
    ///     ..Default::default()
    /// };
    /// assert_eq!(mesh.array_names(), vec!["Value - Total", "Error - Total"]);
    /// ```
    pub fn array_names(&self) -> Vec<String> {
        (0..self.ebins())
            .cartesian_product(0..self.tbins())
            .flat_map(|(e_idx, t_idx)| {
                let label = self.group_label(e_idx, t_idx);
                [f!("Value - {label}"), f!("Error - {label}")]
            })
            .collect()
    }

    /// Label used for a group set in array names
    pub(crate) fn group_label(&self, e_idx: usize, t_idx: usize) -> String {
        let energy = group_or_total(&self.energy_groups(), e_idx);

        if self.tbins() == 1 {
            return f!("{energy}");
        }

        let time = group_or_total(&self.time_groups(), t_idx);
        f!("{energy} - {time}")
    }

    /// Human readable summary of the mesh
    pub fn info(&self) -> String {
        let mut s = self.to_string();
        s += &f!("format: {} ({})\n", self.format, self.kind());
        s += &f!(
            "voxels: {} of {} expected\n",
            self.voxels.len(),
            self.n_voxels_expected()
        );

        if let Some((min, max)) = self
            .voxels
            .iter()
            .map(|v| v.result)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
        {
            s += &f!("values: {} - {}\n", min.sci(5, 2), max.sci(5, 2));
        }
        s
    }

    /// Print the [info()](Mesh::info) summary to stdout
    pub fn print_info(&self) {
        println!("{}", self.info());
    }
}

// Indexing
impl Mesh {
    /// Voxel index of an (e, t, i, j, k) position
    ///
    /// This is the order of COL output, where MCNP loops over k fastest and
    /// energy slowest. Every format is sorted into this order by the reader.
    pub fn etijk_to_voxel_index(&self, e: usize, t: usize, i: usize, j: usize, k: usize) -> usize {
        (e * self.tbins() + t) * self.n_voxels_per_group() + (i * self.jints + j) * self.kints + k
    }

    /// Cell index of an (e, t, i, j, k) position
    ///
    /// MCNP numbers cells internally with i varying fastest instead:
    ///
    /// ```text
    /// cell = i + (j - 1) * I + (k - 1) * I * J     (1-based)
    /// ```
    ///
    /// VTK grids use the same order.
    pub fn etijk_to_cell_index(&self, e: usize, t: usize, i: usize, j: usize, k: usize) -> usize {
        (e * self.tbins() + t) * self.n_voxels_per_group() + (k * self.jints + j) * self.iints + i
    }

    /// Inverse of [etijk_to_voxel_index()](Mesh::etijk_to_voxel_index)
    ///
    /// Meshes without any voxels map everything to zero.
    pub fn voxel_index_to_etijk(&self, idx: usize) -> (usize, usize, usize, usize, usize) {
        let per_group = self.n_voxels_per_group();
        if per_group == 0 {
            return (0, 0, 0, 0, 0);
        }

        let (group, position) = (idx / per_group, idx % per_group);
        let plane = self.jints * self.kints;
        let (i, row) = (position / plane, position % plane);

        (
            group / self.tbins(),
            group % self.tbins(),
            i,
            row / self.kints,
            row % self.kints,
        )
    }

    /// Cell index of the voxel at `idx`
    ///
    /// CuV material cells per voxel are listed by cell index, while the data
    /// are written by voxel index.
    pub fn voxel_index_to_cell_index(&self, idx: usize) -> usize {
        let (e, t, i, j, k) = self.voxel_index_to_etijk(idx);
        self.etijk_to_cell_index(e, t, i, j, k)
    }

    fn checked_etijk(&self, index: usize) -> Result<(usize, usize, usize, usize, usize)> {
        check_index(index, self.voxels.len().min(self.n_voxels_expected()))?;
        Ok(self.voxel_index_to_etijk(index))
    }

    /// Rotation from the default MCNP axis onto AXS, if required
    pub(crate) fn rotation(&self) -> Option<Rotation<f64, 3>> {
        let default_axis = Vector3::z();
        let axis = Vector3::from(self.axs);

        match axis == default_axis {
            true => None,
            false => Some(Rotation::face_towards(&axis, &default_axis)),
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            id: 0,
            geometry: Geometry::default(),
            particle: Particle::default(),
            imesh: Vec::new(),
            iints: 0,
            jmesh: Vec::new(),
            jints: 0,
            kmesh: Vec::new(),
            kints: 0,
            emesh: Vec::new(),
            eints: 0,
            tmesh: Vec::new(),
            tints: 0,
            origin: [0.0; 3],
            axs: [0.0, 0.0, 1.0],
            vec: [1.0, 0.0, 0.0],
            voxels: Vec::new(),
            format: Format::default(),
        }
    }
}

impl std::fmt::Display for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rule = "-".repeat(40);
        let [iunit, junit, kunit] = self.geometry.units();

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            " > Mesh {} [{}, {}]",
            self.id,
            self.particle,
            self.geometry.long_name()
        )?;
        writeln!(f, "{rule}")?;
        writeln!(f, "origin: {:?}", self.origin)?;
        writeln!(f, "axs   : {:?}", self.axs)?;
        writeln!(f, "vec   : {:?}", self.vec)?;
        writeln!(f, "imesh : {}", bounds_summary(&self.imesh, iunit, self.iints))?;
        writeln!(f, "jmesh : {}", bounds_summary(&self.jmesh, junit, self.jints))?;
        writeln!(f, "kmesh : {}", bounds_summary(&self.kmesh, kunit, self.kints))?;
        writeln!(f, "emesh : {}", bounds_summary(&self.emesh, "MeV", self.ebins()))?;
        if self.tints > 1 {
            writeln!(f, "tmesh : {}", bounds_summary(&self.tmesh, "shakes", self.tbins()))?;
        }
        Ok(())
    }
}

/// Groups for a card with `ints` bins, with a `Total` when there are several
fn n_groups(ints: usize) -> usize {
    match ints > 1 {
        true => ints + 1,
        false => 1,
    }
}

/// Upper bin edges as groups, then `Total`
fn groups(bounds: &[f64], ints: usize) -> Vec<Group> {
    let values = bounds.iter().skip(1).map(|b| Group::Value(*b));
    match ints > 1 {
        true => values.chain([Group::Total]).collect(),
        false => vec![Group::Total],
    }
}

/// Group at `idx`, falling back to `Total` for short bounds
fn group_or_total(groups: &[Group], idx: usize) -> Group {
    groups.get(idx).copied().unwrap_or(Group::Total)
}

fn check_index(index: usize, length: usize) -> Result<()> {
    match index < length {
        true => Ok(()),
        false => Err(Error::IndexOutOfBounds {
            minimum: 0,
            maximum: length,
            actual: index,
        }),
    }
}

fn width(bounds: &[f64], idx: usize) -> Result<f64> {
    match (bounds.get(idx), bounds.get(idx + 1)) {
        (Some(lower), Some(upper)) => Ok(upper - lower),
        _ => Err(Error::IndexOutOfBounds {
            minimum: 0,
            maximum: bounds.len().saturating_sub(1),
            actual: idx,
        }),
    }
}

fn midpoint(bounds: &[f64], idx: usize) -> Result<f64> {
    let half = width(bounds, idx)? / 2.0;
    Ok(bounds[idx] + half)
}

/// "lower - upper unit (n bins)" for a set of boundaries
fn bounds_summary(bounds: &[f64], unit: &str, bins: usize) -> String {
    match (bounds.first(), bounds.last()) {
        (Some(lower), Some(upper)) => f!(
            "{:>10} - {:>8} {unit} ({bins} bins)",
            lower.sci(2, 2),
            upper.sci(2, 2)
        ),
        _ => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder() -> Mesh {
        Mesh {
            geometry: Geometry::Cylindrical,
            imesh: vec![0.0, 1.0, 2.0],
            iints: 2,
            jmesh: vec![0.0, 10.0],
            jints: 1,
            kmesh: vec![0.0, 0.5, 1.0],
            kints: 2,
            emesh: vec![0.0, 100.0],
            eints: 1,
            origin: [0.0, 0.0, -5.0],
            voxels: vec![Voxel::default(); 4],
            ..Default::default()
        }
    }

    #[test]
    fn cylindrical_volumes_sum_to_cylinder() {
        let mesh = cylinder();
        let total: f64 = (0..4).map(|i| mesh.voxel_volume(i).unwrap()).sum();
        let expected = std::f64::consts::PI * 4.0 * 10.0;
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn cylindrical_centres() {
        let mesh = cylinder();

        // r = 1.5, z = 5, theta = 0.25 rev
        let [x, y, z] = mesh.voxel_centre(2).unwrap();
        assert!(x.abs() < 1e-12);
        assert!((y - 1.5).abs() < 1e-12);
        assert!(z.abs() < 1e-12);

        // r = 0.5, theta = 0.75 rev
        let [x, y, _] = mesh.voxel_centre(1).unwrap();
        assert!(x.abs() < 1e-12);
        assert!((y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn index_round_trip() {
        let mesh = Mesh {
            iints: 2,
            jints: 3,
            kints: 4,
            eints: 2,
            tints: 2,
            ..Default::default()
        };
        for idx in [0, 1, 23, 24, 71, 72, 150, mesh.n_voxels_expected() - 1] {
            let (e, t, i, j, k) = mesh.voxel_index_to_etijk(idx);
            assert_eq!(mesh.etijk_to_voxel_index(e, t, i, j, k), idx);
        }
    }

    #[test]
    fn cell_order_runs_i_fastest() {
        let mesh = Mesh {
            iints: 2,
            jints: 1,
            kints: 3,
            ..Default::default()
        };
        // voxel order is (0,0,0) (0,0,1) (0,0,2) (1,0,0) ...
        let cells: Vec<usize> = (0..6).map(|v| mesh.voxel_index_to_cell_index(v)).collect();
        assert_eq!(cells, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn group_slices_are_bounded() {
        let mesh = Mesh {
            iints: 1,
            jints: 1,
            kints: 2,
            eints: 2,
            emesh: vec![0.0, 1.0, 2.0],
            voxels: (0..6)
                .map(|index| Voxel {
                    index,
                    result: index as f64,
                    error: 0.0,
                })
                .collect(),
            ..Default::default()
        };

        let total = mesh.slice_voxels_by_idx(2, 0).unwrap();
        assert_eq!(total[0].result, 4.0);
        assert_eq!(total[1].result, 5.0);
        assert!(mesh.slice_voxels_by_idx(3, 0).is_err());
        assert!(mesh.slice_voxels_by_idx(0, 1).is_err());
    }

    #[test]
    fn short_group_bounds_do_not_panic() {
        let mesh = Mesh {
            eints: 3,
            emesh: vec![0.0, 1.0],
            imesh: vec![0.0, 1.0],
            iints: 1,
            jmesh: vec![0.0, 1.0],
            jints: 1,
            kmesh: vec![0.0, 1.0],
            kints: 1,
            voxels: vec![Voxel::default(); 4],
            ..Default::default()
        };
        assert_eq!(mesh.voxel_coordinates(0).unwrap().energy, Group::Value(1.0));
        assert_eq!(mesh.voxel_coordinates(3).unwrap().energy, Group::Total);
    }

    #[test]
    fn group_lookup_by_label() {
        let mesh = Mesh {
            eints: 2,
            emesh: vec![0.0, 1.0, 20.0],
            ..Default::default()
        };
        let index = |label: &str| mesh.energy_group_index(Group::try_from(label).unwrap());
        assert_eq!(index("1.0").unwrap(), 0);
        assert_eq!(index("2e1").unwrap(), 1);
        assert_eq!(index("total").unwrap(), 2);
        assert!(index("3").is_err());
    }

    #[test]
    fn display_without_bounds() {
        let text = Mesh::new(14).to_string();
        assert!(text.contains("Mesh 14"));
        assert!(text.contains("imesh : none"));
    }

    #[test]
    fn orientation_tolerance() {
        let a = cylinder();
        let mut b = cylinder();
        b.origin[2] += 1e-12;
        assert!(a.same_orientation(&b));

        b.axs = [0.0, 1.0, 0.0];
        assert!(!a.same_orientation(&b));
        assert!(a.same_mesh(&b));
    }

    #[test]
    fn array_names_with_time_bins() {
        let mesh = Mesh {
            eints: 1,
            emesh: vec![0.0, 100.0],
            tints: 2,
            tmesh: vec![0.0, 1.0, 2.0],
            ..Default::default()
        };
        let names = mesh.array_names();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "Value - Total - 1.00000e+00");
        assert_eq!(names[5], "Error - Total - Total");
    }
}
