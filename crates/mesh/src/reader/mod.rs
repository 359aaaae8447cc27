//! Reading meshtal files
//!
//! # Quickstart
//!
//! Most of the time one of the convenience functions is enough:
//!
//! ```rust, no_run
//! # use meshops_mesh::{read_meshtal, read_meshtal_target, Mesh};
//! // every mesh in the file
//! let mesh_list = read_meshtal("/path/to/meshtal.msht").unwrap();
//!
//! // only FMESH104
//! let mesh = read_meshtal_target("/path/to/meshtal.msht", 104).unwrap();
//! ```
//!
//! The [MeshtalReader] behind them is public for anything more involved, like
//! several targets or the Cell-under-Voxel options.
//!
//! ```rust, no_run
//! # use meshops_mesh::reader::{CuvNormalisation, MeshtalReader};
//! # use std::path::Path;
//! let mut reader = MeshtalReader::new();
//! reader.disable_progress();
//! reader.set_target_ids(&[104, 204]);
//! reader.set_normalisation(CuvNormalisation::CellVolume);
//! reader.set_cell_filters(&[76, 77]);
//!
//! let mesh_list = reader.parse(Path::new("/path/to/meshtal.msht")).unwrap();
//! ```
//!
//! # How files are read
//!
//! Files go through a buffered stream twice, one line at a time:
//! - a quick scan for the header, tally numbers and the format of each tally
//! - a full read of the targeted tallies into [Mesh] types
//!
//! A missing target fails after the scan without reading any data.
//!
//! # Formatting quirks
//!
//! Numbers that run into each other, like `1.00E+00-2.00E+00`, are split
//! correctly.
//!
//! Exponents that lost their `E`, like `1.00+002`, are repaired with a warning.
//!
//! Bounds are written to only a few significant figures, so close energy or
//! time bins can end up identical. A warning is logged when this happens and
//! groups should then be found by index.
//!
//! # Cell-under-Voxel (CuV)
//!
//! There are often several cells under one voxel. Every included cell adds its
//! result weighted by its volume:
//!
//! ```text
//! result = sum(r_c * V_c) / norm
//! error  = sqrt(sum((r_c * e_c * V_c)^2)) / sum(r_c * V_c)
//! ```
//!
//! `norm` is the voxel volume for [CuvNormalisation::VoxelVolume], or the
//! volume of the included cells for [CuvNormalisation::CellVolume]. Negative
//! cell results count as zero.
//!
//! Cell filters limit which cells are included, and an empty filter includes
//! them all. A voxel with none of the filtered cells is kept with a zero result.
//!
//! With `Void_Record=off` the voxels without material are left out of the
//! file. They are put back as zero results using the material cells per voxel
//! array, see [VoidRecord].

// reader modules
mod cuv;
mod matrix;
mod meshtal;
mod parsers;

// re-exports for clean API + documentation
#[doc(inline)]
pub use cuv::{CellData, CuvNormalisation, VoidRecord};

#[doc(inline)]
pub use meshtal::{FormatMap, MeshtalHeader, MeshtalReader};

// crate modules
use crate::error::{Error, Result};
use crate::mesh::Mesh;

// standard library
use std::path::Path;

/// Read every mesh in a meshtal file
///
/// `path` can be anything path-like, e.g. [&str], [String], [Path].
///
/// ```rust, no_run
/// # use meshops_mesh::{Mesh, read_meshtal};
/// let mesh_tallies: Vec<Mesh> = read_meshtal("path/to/meshtal.msht").unwrap();
/// ```
pub fn read_meshtal<P: AsRef<Path>>(path: P) -> Result<Vec<Mesh>> {
    let mut reader = MeshtalReader::new();
    reader.disable_progress();
    reader.parse(path.as_ref())
}

/// Read a single mesh from a meshtal file
///
/// Fails with [Error::TallyNotFound] if `target` is not in the file.
///
/// ```rust, no_run
/// # use meshops_mesh::{Mesh, read_meshtal_target};
/// let mesh: Mesh = read_meshtal_target("path/to/meshtal.msht", 104).unwrap();
/// ```
pub fn read_meshtal_target<P: AsRef<Path>>(path: P, target: u32) -> Result<Mesh> {
    let mut reader = MeshtalReader::new();
    reader.disable_progress();
    reader.set_target_id(target);
    reader
        .parse(path.as_ref())?
        .into_iter()
        .next()
        .ok_or(Error::TallyNotFound(target))
}

/// Header and tally formats of a file, without reading any data
///
/// ```rust, no_run
/// # use meshops_mesh::reader::inspect_meshtal;
/// let (header, formats) = inspect_meshtal("path/to/meshtal.msht").unwrap();
/// println!("{:?} has {} tallies", header.title, formats.len());
/// ```
pub fn inspect_meshtal<P: AsRef<Path>>(path: P) -> Result<(MeshtalHeader, FormatMap)> {
    MeshtalReader::new().inspect(path.as_ref())
}
