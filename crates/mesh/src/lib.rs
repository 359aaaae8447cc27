//! Mesh tally arithmetic, error propagation, and file conversion
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod format;
mod geometry;
mod group;
mod mesh;
mod particle;
mod voxel;

pub mod collection;
pub mod operations;
pub mod reader;
pub mod vtk;
pub mod writer;

// inline important the mesh-related modules for a nice public API
#[doc(inline)]
pub use collection::{Meshtal, ReadOptions};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use format::{Format, MeshKind};

#[doc(inline)]
pub use geometry::Geometry;

#[doc(inline)]
pub use group::Group;

#[doc(inline)]
pub use mesh::Mesh;

#[doc(inline)]
pub use operations::{Correlation, MeshComparison};

#[doc(inline)]
pub use particle::Particle;

#[doc(inline)]
pub use reader::{read_meshtal, read_meshtal_target, CuvNormalisation};

#[doc(inline)]
pub use voxel::{Voxel, VoxelCoordinate};

#[doc(inline)]
pub use vtk::{mesh_to_vtk, write_vtk, VtkFormat};

#[doc(inline)]
pub use writer::OutputFormat;
