//! Writers for plotting and tabular output formats
//!
//! Every mesh can be written as:
//!
//! | Format                   | File name                        |
//! | ------------------------ | -------------------------------- |
//! | [OutputFormat::Vtk]        | `<prefix>_<id>.<vtr/vtu>`        |
//! | [OutputFormat::Csv]        | `<prefix>_<id>_csv.csv`          |
//! | [OutputFormat::PointCloud] | `<prefix>_<id>_point_cloud.txt`  |
//! | [OutputFormat::IpFluent]   | `<prefix>_<id>_ip_fluent.txt`    |
//!
//! The tabular formats write one row per voxel centre in cartesian space,
//! followed by the chosen data arrays. Arrays are named as in
//! [Mesh::array_names()], e.g. `"Value - Total"` and `"Error - Total"`.
//!
//! ```rust, no_run
//! # use meshops_mesh::{read_meshtal_target, Mesh};
//! # use meshops_mesh::writer::{write_mesh, OutputFormat};
//! let mesh = read_meshtal_target("path/to/meshtal.msht", 104).unwrap();
//!
//! // only the results of the total energy group, as csv
//! let arrays = vec!["Value - Total".to_string()];
//! write_mesh(&mesh, "./output", "run0", OutputFormat::Csv, &arrays).unwrap();
//! ```

// crate modules
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::vtk::{write_vtk, MeshToVtk, VtkFormat};

// meshops modules
use meshops_utils::f;

// external crates
use itertools::Itertools;
use log::{debug, info};

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported output formats for a mesh
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Xml VTK, rectilinear or unstructured depending on geometry
    #[default]
    Vtk,
    /// Comma separated values with a header row
    Csv,
    /// Whitespace separated values with a header row
    PointCloud,
    /// Fluent interpolation file
    IpFluent,
}

impl OutputFormat {
    /// Name used to tag output files, e.g. `"point_cloud"`
    pub fn tag(&self) -> &str {
        match self {
            OutputFormat::Vtk => "vtk",
            OutputFormat::Csv => "csv",
            OutputFormat::PointCloud => "point_cloud",
            OutputFormat::IpFluent => "ip_fluent",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Parse from the file tag, ignoring case and `-`/`_` differences
///
/// ```rust
/// # use meshops_mesh::writer::OutputFormat;
/// assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
/// assert_eq!("point-cloud".parse::<OutputFormat>().unwrap(), OutputFormat::PointCloud);
/// assert_eq!("IP_FLUENT".parse::<OutputFormat>().unwrap(), OutputFormat::IpFluent);
/// assert!("xlsx".parse::<OutputFormat>().is_err());
/// ```
impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vtk" => Ok(OutputFormat::Vtk),
            "csv" => Ok(OutputFormat::Csv),
            "point_cloud" => Ok(OutputFormat::PointCloud),
            "ip_fluent" => Ok(OutputFormat::IpFluent),
            _ => Err(Error::UnknownOutputFormat(s.to_string())),
        }
    }
}

/// Path of the file a mesh is written to
///
/// ```rust
/// # use meshops_mesh::Mesh;
/// # use meshops_mesh::writer::{output_path, OutputFormat};
/// # use std::path::Path;
/// let mesh = Mesh::new(124);
/// assert_eq!(
///     output_path(&mesh, "out", "meshtal_cyl", OutputFormat::Csv),
///     Path::new("out/meshtal_cyl_124_csv.csv")
/// );
/// assert_eq!(
///     output_path(&mesh, "out", "meshtal_cyl", OutputFormat::Vtk),
///     Path::new("out/meshtal_cyl_124.vtr")
/// );
/// ```
pub fn output_path<P: AsRef<Path>>(
    mesh: &Mesh,
    directory: P,
    prefix: &str,
    format: OutputFormat,
) -> PathBuf {
    let name = match format {
        OutputFormat::Vtk => f!(
            "{prefix}_{}.{}",
            mesh.id,
            VtkFormat::Xml.extension(mesh)
        ),
        OutputFormat::Csv => f!("{prefix}_{}_csv.csv", mesh.id),
        OutputFormat::PointCloud | OutputFormat::IpFluent => {
            f!("{prefix}_{}_{}.txt", mesh.id, format.tag())
        }
    };
    directory.as_ref().join(name)
}

/// Write a mesh into `directory` with the chosen format
///
/// Every array is written when `array_names` is empty. Any name not found in
/// [Mesh::array_names()] is an [Error::UnknownArray]. Returns the path of the
/// file written.
pub fn write_mesh<P: AsRef<Path>>(
    mesh: &Mesh,
    directory: P,
    prefix: &str,
    format: OutputFormat,
    array_names: &[String],
) -> Result<PathBuf> {
    let names = select_arrays(mesh, array_names)?;
    let path = output_path(mesh, directory, prefix, format);
    info!("Writing mesh {} to {}", mesh.id, path.display());

    match format {
        OutputFormat::Vtk => {
            let vtk = MeshToVtk::builder().arrays(names).build().convert(mesh)?;
            write_vtk(vtk, &path, VtkFormat::Xml)?;
        }
        OutputFormat::Csv => write_csv(mesh, &path, &names)?,
        OutputFormat::PointCloud => write_point_cloud(mesh, &path, &names)?,
        OutputFormat::IpFluent => write_ip_fluent(mesh, &path, &names)?,
    }

    Ok(path)
}

/// Write `x,y,z,<arrays...>` rows using the csv crate
pub fn write_csv<P: AsRef<Path>>(mesh: &Mesh, path: P, array_names: &[String]) -> Result<()> {
    let table = DataTable::new(mesh, array_names)?;
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.header())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `x y z <arrays...>` rows separated by whitespace
pub fn write_point_cloud<P: AsRef<Path>>(
    mesh: &Mesh,
    path: P,
    array_names: &[String],
) -> Result<()> {
    let table = DataTable::new(mesh, array_names)?;
    let mut writer = BufWriter::new(File::create(path)?);

    // quote the array names as they contain whitespace
    let mut header = table.header().map(|h| match h.contains(' ') {
        true => f!("\"{h}\""),
        false => h.to_string(),
    });
    writeln!(writer, "{}", header.join(" "))?;

    for row in table.rows() {
        writeln!(writer, "{}", row.iter().map(|v| f!("{v:.6e}")).join(" "))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write a Fluent interpolation file
///
/// The layout is the version and dimension lines, the number of points and
/// fields, the field names, then one parenthesised block for each of x, y, z
/// and every field.
pub fn write_ip_fluent<P: AsRef<Path>>(
    mesh: &Mesh,
    path: P,
    array_names: &[String],
) -> Result<()> {
    let table = DataTable::new(mesh, array_names)?;
    let mut writer = BufWriter::new(File::create(path)?);

    writeln!(writer, "3")?;
    writeln!(writer, "3")?;
    writeln!(writer, "{}", table.centres.len())?;
    writeln!(writer, "{}", table.names.len())?;
    for name in &table.names {
        // fluent field names can not contain whitespace
        writeln!(writer, "{}", name.split_whitespace().join(""))?;
    }

    for axis in 0..3 {
        let values = table.centres.iter().map(|c| c[axis]);
        write_fluent_block(&mut writer, values)?;
    }

    for column in &table.columns {
        write_fluent_block(&mut writer, column.iter().copied())?;
    }

    writer.flush()?;
    Ok(())
}

fn write_fluent_block<W: Write>(writer: &mut W, values: impl Iterator<Item = f64>) -> Result<()> {
    writeln!(writer, "(")?;
    for value in values {
        writeln!(writer, "{value:.6e}")?;
    }
    writeln!(writer, ")")?;
    Ok(())
}

/// Check requested array names against the mesh, all if empty
fn select_arrays(mesh: &Mesh, array_names: &[String]) -> Result<Vec<String>> {
    let available = mesh.array_names();

    if array_names.is_empty() {
        return Ok(available);
    }

    match array_names.iter().find(|name| !available.contains(name)) {
        Some(unknown) => Err(Error::UnknownArray(unknown.clone())),
        None => Ok(array_names.to_vec()),
    }
}

/// Voxel centres and data arrays for one voxel group, as columns
#[derive(Debug)]
struct DataTable {
    names: Vec<String>,
    centres: Vec<[f64; 3]>,
    columns: Vec<Vec<f64>>,
}

impl DataTable {
    fn new(mesh: &Mesh, array_names: &[String]) -> Result<Self> {
        let names = select_arrays(mesh, array_names)?;
        let available = mesh.array_names();

        let centres = (0..mesh.n_voxels_per_group())
            .map(|idx| mesh.voxel_centre(idx))
            .collect::<Result<Vec<[f64; 3]>>>()?;

        let mut columns = Vec::with_capacity(names.len());
        for name in &names {
            let position = available
                .iter()
                .position(|a| a == name)
                .ok_or(Error::UnknownArray(name.clone()))?;

            // arrays alternate value/error for every (energy, time) pair
            let set = position / 2;
            let (e_idx, t_idx) = (set / mesh.tbins(), set % mesh.tbins());
            let voxels = mesh.slice_voxels_by_idx(e_idx, t_idx)?;

            let column = match position % 2 {
                0 => voxels.iter().map(|v| v.result).collect(),
                _ => voxels.iter().map(|v| v.error).collect(),
            };
            columns.push(column);
        }

        debug!("Collected {} arrays for mesh {}", columns.len(), mesh.id);

        Ok(Self {
            names,
            centres,
            columns,
        })
    }

    fn header(&self) -> impl Iterator<Item = &str> {
        ["x", "y", "z"]
            .into_iter()
            .chain(self.names.iter().map(|n| n.as_str()))
    }

    fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.centres.iter().enumerate().map(|(idx, centre)| {
            centre
                .iter()
                .copied()
                .chain(self.columns.iter().map(move |c| c[idx]))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::Voxel;

    /// 2x1x1 mesh with two energy bins and a total
    fn mesh() -> Mesh {
        Mesh {
            id: 4,
            imesh: vec![0.0, 1.0, 2.0],
            iints: 2,
            jmesh: vec![0.0, 2.0],
            jints: 1,
            kmesh: vec![0.0, 4.0],
            kints: 1,
            emesh: vec![0.0, 1.0, 2.0],
            eints: 2,
            voxels: (0..6)
                .map(|index| Voxel {
                    index,
                    result: index as f64,
                    error: 0.5,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn unknown_arrays() {
        let names = vec!["Value - Total".to_string(), "Value - 3".to_string()];
        let err = select_arrays(&mesh(), &names).unwrap_err();
        assert!(matches!(err, Error::UnknownArray(name) if name == "Value - 3"));
    }

    #[test]
    fn table_columns() {
        let mesh = mesh();
        let names = vec!["Value - Total".to_string(), "Error - 2.00000e+00".to_string()];
        let table = DataTable::new(&mesh, &names).unwrap();

        assert_eq!(table.centres, vec![[0.5, 1.0, 2.0], [1.5, 1.0, 2.0]]);
        assert_eq!(table.columns[0], vec![4.0, 5.0]);
        assert_eq!(table.columns[1], vec![0.5, 0.5]);
        assert_eq!(
            table.header().collect::<Vec<&str>>(),
            vec!["x", "y", "z", "Value - Total", "Error - 2.00000e+00"]
        );
        assert_eq!(
            table.rows().next().unwrap(),
            vec![0.5, 1.0, 2.0, 4.0, 0.5]
        );
    }

    #[test]
    fn every_array_by_default() {
        let table = DataTable::new(&mesh(), &[]).unwrap();
        assert_eq!(table.names.len(), 6);
        assert_eq!(table.columns[2], vec![2.0, 3.0]);
    }

    #[test]
    fn output_names() {
        let mesh = mesh();
        assert_eq!(
            output_path(&mesh, "dir", "run", OutputFormat::PointCloud),
            Path::new("dir/run_4_point_cloud.txt")
        );
        assert_eq!(
            output_path(&mesh, "dir", "run", OutputFormat::IpFluent),
            Path::new("dir/run_4_ip_fluent.txt")
        );
    }
}
