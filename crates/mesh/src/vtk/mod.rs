//! Conversion of meshes to visual toolkit formats for plotting
//!
//! The quickest route is [mesh_to_vtk()] and [write_vtk()] with the default
//! configuration, which includes every energy and time group.
//!
//! ```rust, no_run
//! # use meshops_mesh::vtk::{mesh_to_vtk, write_vtk, VtkFormat};
//! # use meshops_mesh::Mesh;
//! # let mesh = Mesh::default();
//! let vtk = mesh_to_vtk(&mesh).unwrap();
//! write_vtk(vtk, "./fmesh_104.vtr", VtkFormat::Xml).unwrap();
//! ```
//!
//! The [MeshToVtk] converter is configurable through [MeshToVtkBuilder] for
//! group selection, error arrays, byte ordering, and the resolution of
//! cylindrical meshes.

// vtk modules
mod builder;
mod convert;

#[doc(inline)]
pub use builder::MeshToVtkBuilder;
#[doc(inline)]
pub use convert::MeshToVtk;

// crate modules
use crate::error::Result;
use crate::mesh::Mesh;

// external crates
use log::debug;
use nalgebra::{Rotation, Vector3};
use vtkio::Vtk;

// standard library
use std::path::Path;

/// Supported VTK file formats
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VtkFormat {
    /// Xml file format, `.vtr` for rectangular and `.vtu` for cylindrical
    #[default]
    Xml,
    /// Legacy ASCII text format, `.vtk`
    LegacyAscii,
    /// Legacy big endian binary format, `.vtk`
    LegacyBinary,
}

impl VtkFormat {
    /// File extension to use for a mesh written in this format
    pub fn extension<'a>(&'a self, mesh: &'a Mesh) -> &'a str {
        match self {
            VtkFormat::Xml => mesh.geometry.vtk_extension(),
            _ => "vtk",
        }
    }
}

/// Convert a mesh to a vtk object with the default configuration
pub fn mesh_to_vtk(mesh: &Mesh) -> Result<Vtk> {
    MeshToVtk::new().convert(mesh)
}

/// Write a vtk object to `path` in the chosen format
///
/// The extension is not checked, see [VtkFormat::extension()] for the one
/// most plotting tools expect.
pub fn write_vtk<P: AsRef<Path>>(vtk: Vtk, path: P, format: VtkFormat) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {format:?} vtk to {}", path.display());

    match format {
        VtkFormat::Xml => vtk.export(path)?,
        VtkFormat::LegacyAscii => vtk.export_ascii(path)?,
        VtkFormat::LegacyBinary => vtk.export_be(path)?,
    }

    Ok(())
}

/// Point in cartesian space, used for the unstructured cylinder cells
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    /// Rotate about the origin if a rotation is defined
    pub fn rotate(self, rotation: &Option<Rotation<f64, 3>>) -> Self {
        match rotation {
            Some(r) => {
                let v = r * Vector3::new(self.x, self.y, self.z);
                Self {
                    x: v[0],
                    y: v[1],
                    z: v[2],
                }
            }
            None => self,
        }
    }

    /// Shift by a translation vector
    pub fn translate(self, shift: &[f64; 3]) -> Self {
        Self {
            x: self.x + shift[0],
            y: self.y + shift[1],
            z: self.z + shift[2],
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
