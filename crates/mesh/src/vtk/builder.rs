// crate modules
use crate::vtk::MeshToVtk;

// external crates
use log::warn;
use vtkio::model::ByteOrder;

/// Chained setup of a [MeshToVtk] converter
///
/// Anything not set keeps the [MeshToVtk] default, and
/// [build()](MeshToVtkBuilder::build) hands back the finished converter.
///
/// ```rust, no_run
/// # use meshops_mesh::vtk::{write_vtk, MeshToVtk, VtkFormat};
/// # use meshops_mesh::Mesh;
/// # use vtkio::model::ByteOrder;
/// # let mesh = Mesh::default();
/// let converter = MeshToVtk::builder()
///     .include_errors(true)
///     .energy_groups(vec![0])
///     .time_groups(vec![1, 2])
///     .byte_order(ByteOrder::LittleEndian)
///     .resolution(3)
///     .build();
///
/// let vtk = converter.convert(&mesh).unwrap();
/// write_vtk(vtk, "./output.vtk", VtkFormat::LegacyAscii).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MeshToVtkBuilder {
    config: MeshToVtk,
}

impl MeshToVtkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished converter
    pub fn build(self) -> MeshToVtk {
        self.config
    }

    /// Energy group indices to convert, every group when empty
    pub fn energy_groups(mut self, groups: Vec<usize>) -> Self {
        self.config.energy_groups = groups;
        self
    }

    /// Time group indices to convert, every group when empty
    pub fn time_groups(mut self, groups: Vec<usize>) -> Self {
        self.config.time_groups = groups;
        self
    }

    /// Write an `"Error - <group>"` array next to each `"Value - <group>"`
    pub fn include_errors(mut self, include: bool) -> Self {
        self.config.include_errors = include;
        self
    }

    /// Restrict output to arrays with these names, e.g. `"Value - Total"`
    ///
    /// A non-empty list takes priority over
    /// [include_errors()](MeshToVtkBuilder::include_errors). Unknown names are
    /// skipped.
    pub fn arrays(mut self, names: Vec<String>) -> Self {
        self.config.arrays = names;
        self
    }

    /// Number of edge segments per theta bin of a cylindrical mesh
    ///
    /// Each segment adds explicit vertices to every cell, so file size grows
    /// quickly. Zero is treated as one.
    pub fn resolution(mut self, resolution: u8) -> Self {
        if resolution > 1 {
            warn!("Cylinder resolution of {resolution} will increase the output size");
        }
        self.config.resolution = resolution.max(1);
        self
    }

    /// Endianness of binary output, big endian by default for Visit
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.config.byte_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_options_keep_defaults() {
        assert_eq!(MeshToVtkBuilder::new().build(), MeshToVtk::default());
    }

    #[test]
    fn zero_resolution_is_one() {
        let converter = MeshToVtk::builder().resolution(0).arrays(vec!["Value - Total".into()]).build();
        assert_eq!(converter.resolution, 1);
        assert_eq!(converter.arrays, vec!["Value - Total".to_string()]);
        assert_eq!(converter.byte_order, ByteOrder::BigEndian);
    }
}
