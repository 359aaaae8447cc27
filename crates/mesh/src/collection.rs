//! Collection of the mesh tallies found in a meshtal file
//!
//! A [Meshtal] is opened with a quick scan of the file header and tally
//! formats. Voxel data are only loaded by [Meshtal::read()], for the tallies
//! of interest.
//!
//! ```rust, no_run
//! # use meshops_mesh::collection::{Meshtal, ReadOptions};
//! # use meshops_mesh::reader::CuvNormalisation;
//! # use meshops_mesh::writer::OutputFormat;
//! let mut meshtal = Meshtal::open("path/to/meshtal.msht").unwrap();
//! meshtal.print_info();
//!
//! let options = ReadOptions {
//!     ids: vec![104],
//!     normalisation: CuvNormalisation::CellVolume,
//!     ..Default::default()
//! };
//! meshtal.read(&options).unwrap();
//! meshtal.write(104, "./output", OutputFormat::Csv, &[]).unwrap();
//! ```

// crate modules
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::reader::{CuvNormalisation, FormatMap, MeshtalHeader, MeshtalReader};
use crate::writer::{write_mesh, OutputFormat};

// meshops modules
use meshops_utils::{f, OptionExt};

// external crates
use log::{debug, info};

// standard library
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Options for loading voxel data into a [Meshtal]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReadOptions {
    /// Tallies to read, every tally in the file if empty
    pub ids: Vec<u32>,
    /// Normalisation of combined Cell-under-Voxel results
    pub normalisation: CuvNormalisation,
    /// Cell-under-Voxel cells to include, every cell if empty
    pub cell_filters: Vec<u32>,
    /// Show the progress bar while reading
    pub progress: bool,
}

/// Mesh tallies of a single meshtal file, keyed by tally number
#[derive(Debug, Default, Clone)]
pub struct Meshtal {
    /// Path to the meshtal file
    pub path: PathBuf,
    /// Title, probid and histories from the top of the file
    pub header: MeshtalHeader,
    /// Format and geometry of every tally in the file
    pub formats: FormatMap,
    /// Loaded meshes
    meshes: BTreeMap<u32, Mesh>,
}

impl Meshtal {
    /// Scan the header and tally formats of a meshtal file
    ///
    /// No voxel data are read until [read()](Meshtal::read) is called.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Scanning {}", path.display());
        let (header, formats) = MeshtalReader::new().inspect(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            header,
            formats,
            meshes: BTreeMap::new(),
        })
    }

    /// Load the voxel data of the selected tallies
    ///
    /// Meshes already loaded with the same tally numbers are replaced.
    pub fn read(&mut self, options: &ReadOptions) -> Result<()> {
        let mut reader = MeshtalReader::new();
        reader.set_target_ids(&options.ids);
        reader.set_normalisation(options.normalisation);
        reader.set_cell_filters(&options.cell_filters);
        if !options.progress {
            reader.disable_progress();
        }

        for mesh in reader.parse(&self.path)? {
            self.insert(mesh);
        }

        info!("{} meshes loaded from {}", self.meshes.len(), self.path.display());
        Ok(())
    }

    /// Loaded mesh for a tally number
    pub fn mesh(&self, id: u32) -> Result<&Mesh> {
        self.meshes.get(&id).ok_or(Error::TallyNotFound(id))
    }

    /// Mutable reference to a loaded mesh
    pub fn mesh_mut(&mut self, id: u32) -> Result<&mut Mesh> {
        self.meshes.get_mut(&id).ok_or(Error::TallyNotFound(id))
    }

    /// Add a mesh, returning any mesh it replaced
    ///
    /// Useful for keeping the results of arithmetic alongside the originals.
    pub fn insert(&mut self, mesh: Mesh) -> Option<Mesh> {
        self.meshes.insert(mesh.id, mesh)
    }

    /// Take a loaded mesh out of the collection
    pub fn remove(&mut self, id: u32) -> Option<Mesh> {
        self.meshes.remove(&id)
    }

    /// Tally numbers of the loaded meshes, in ascending order
    pub fn ids(&self) -> Vec<u32> {
        self.meshes.keys().copied().collect()
    }

    /// Iterate over the loaded meshes, in ascending tally order
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.values()
    }

    /// Prefix used for output files, i.e. the meshtal file stem
    pub fn file_prefix(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(String::from("fmesh"))
    }

    /// Write a loaded mesh into `directory`
    ///
    /// All data arrays are written if `array_names` is empty. See
    /// [writer](crate::writer) for the file naming.
    pub fn write<P: AsRef<Path>>(
        &self,
        id: u32,
        directory: P,
        format: OutputFormat,
        array_names: &[String],
    ) -> Result<PathBuf> {
        let mesh = self.mesh(id)?;
        write_mesh(mesh, directory, &self.file_prefix(), format, array_names)
    }

    /// Write every loaded mesh into `directory` with all data arrays
    pub fn write_all<P: AsRef<Path>>(&self, directory: P, format: OutputFormat) -> Result<Vec<PathBuf>> {
        if self.meshes.is_empty() {
            return Err(Error::EmptyCollection);
        }

        let directory = directory.as_ref();
        let prefix = self.file_prefix();

        self.meshes
            .values()
            .map(|mesh| write_mesh(mesh, directory, &prefix, format, &[]))
            .collect()
    }

    /// Human readable summary of the file and loaded meshes
    pub fn info(&self) -> String {
        let mut s = f!("file      : {}\n", self.path.display());
        s += &f!("title     : {}\n", self.header.title.display());
        s += &f!("probid    : {}\n", self.header.probid.display());
        s += &f!("histories : {}\n", self.header.histories.display());
        s += "tallies   :\n";

        for (id, (format, geometry)) in &self.formats {
            let status = match self.meshes.contains_key(id) {
                true => "loaded",
                false => "not loaded",
            };
            s += &f!("  > Fmesh {id:<6} {geometry} {format:<4} ({status})\n");
        }

        // anything inserted by the user rather than read from the file
        for mesh in self.meshes.values() {
            if !self.formats.contains_key(&mesh.id) {
                s += &f!("  > Fmesh {:<6} {} {:<4} (in memory)\n", mesh.id, mesh.geometry, mesh.format);
            }
        }

        s
    }

    /// Print the [info()](Meshtal::info) summary to stdout
    pub fn print_info(&self) {
        println!("{}", self.info());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_collection() {
        let mut meshtal = Meshtal::default();
        assert!(matches!(meshtal.mesh(4), Err(Error::TallyNotFound(4))));
        assert!(matches!(
            meshtal.write_all("unused", OutputFormat::Csv),
            Err(Error::EmptyCollection)
        ));

        assert!(meshtal.insert(Mesh::new(14)).is_none());
        assert!(meshtal.insert(Mesh::new(4)).is_none());
        assert!(meshtal.insert(Mesh::new(4)).is_some());
        assert_eq!(meshtal.ids(), vec![4, 14]);

        meshtal.mesh_mut(14).unwrap().iints = 3;
        assert_eq!(meshtal.mesh(14).unwrap().iints, 3);

        assert_eq!(meshtal.remove(4).map(|m| m.id), Some(4));
        assert_eq!(meshtal.ids(), vec![14]);
        assert!(meshtal.info().contains("Fmesh 14"));
    }

    #[test]
    fn prefix_from_file_stem() {
        let meshtal = Meshtal {
            path: PathBuf::from("/some/dir/meshtal_cyl.msht"),
            ..Default::default()
        };
        assert_eq!(meshtal.file_prefix(), "meshtal_cyl");
        assert_eq!(Meshtal::default().file_prefix(), "fmesh");
    }
}
