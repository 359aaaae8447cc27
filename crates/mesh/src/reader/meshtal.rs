// crate modules
use crate::error::{Error, Result};
use crate::format::Format;
use crate::geometry::Geometry;
use crate::mesh::Mesh;
use crate::particle::Particle;
use crate::reader::cuv::{CuvAccumulator, CuvNormalisation};
use crate::reader::matrix::MatrixCursor;
use crate::reader::parsers::{self, HeaderLine};

// meshops modules
use meshops_utils::f;

// standard library
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, warn};

/// Tally formats found in a file
///
/// Keyed by tally number (`FMESH204` => 204), with the output format and mesh
/// geometry of each, e.g. `(COL, Rectangular)`.
pub type FormatMap = BTreeMap<u32, (Format, Geometry)>;

/// Values from the top of a meshtal file
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshtalHeader {
    /// Problem title, the line following the mcnp version
    pub title: Option<String>,
    /// Problem id, usually the date and time of the run
    pub probid: Option<String>,
    /// Number of histories used for normalising tallies
    pub histories: Option<f64>,
}

impl MeshtalHeader {
    /// Pick up whatever a line before the first mesh has to offer
    ///
    /// The title has no tag of its own, it is just the first non-empty line
    /// after the version line.
    fn read_line(&mut self, line: &str, expect_title: &mut bool) {
        if parsers::is_mcnp_header(line) {
            self.probid = parsers::probid(line).ok().map(|(_, p)| p.to_string());
            *expect_title = true;
        } else if parsers::is_histories(line) {
            self.histories = parsers::value_after_equals(line).ok().map(|(_, h)| h);
            *expect_title = false;
        } else if *expect_title && !line.is_empty() {
            self.title = Some(line.to_string());
            *expect_title = false;
        }
    }
}

/// Reader for meshtal files of any output format
///
/// Handles COL, CF, UKAEA Cell-under-Voxel, IJ, IK, and JK output for both
/// rectangular and cylindrical meshes. See the [reader](crate::reader) module
/// for details of the formats and CuV options.
///
/// ```rust, no_run
/// # use meshops_mesh::reader::MeshtalReader;
/// # use std::path::Path;
/// let mut reader = MeshtalReader::new();
/// let mesh_list = reader.parse(Path::new("path/to/file.msht")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MeshtalReader {
    /// Meshes read so far
    mesh_list: Vec<Mesh>,
    /// Tally numbers to read, all if empty
    target_ids: Vec<u32>,
    /// The current mesh is not a target
    is_skipping: bool,
    disable_progress: bool,
    normalisation: CuvNormalisation,
    /// CuV cells to include, all if empty
    cell_filters: Vec<u32>,
    cursor: MatrixCursor,
    /// Sums for the current mesh, if it is a CuV mesh
    cuv: Option<CuvAccumulator>,
}

impl MeshtalReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every targeted mesh from a meshtal file
    pub fn parse(&mut self, path: &Path) -> Result<Vec<Mesh>> {
        let (_, formats) = self.scan(path)?;
        debug!("{}", describe_formats(&formats));

        if let Some(id) = self.target_ids.iter().find(|id| !formats.contains_key(id)) {
            return Err(Error::TallyNotFound(*id));
        }

        self.read_meshes(path, &formats)?;

        for mesh in &mut self.mesh_list {
            finalise(mesh)?;
        }

        Ok(std::mem::take(&mut self.mesh_list))
    }

    /// Header and tally formats without reading any voxel data
    pub fn inspect(&self, path: &Path) -> Result<(MeshtalHeader, FormatMap)> {
        self.scan(path)
    }

    /// Only read the given tally
    pub fn set_target_id(&mut self, target_id: u32) {
        self.target_ids = vec![target_id];
    }

    /// Only read the given tallies, or all of them if empty
    pub fn set_target_ids(&mut self, target_ids: &[u32]) {
        let mut target_ids = target_ids.to_vec();
        target_ids.sort();
        target_ids.dedup();
        self.target_ids = target_ids;
    }

    /// Normalisation used for combined CuV results
    pub fn set_normalisation(&mut self, normalisation: CuvNormalisation) {
        self.normalisation = normalisation;
    }

    /// CuV cells to include, or all of them if empty
    pub fn set_cell_filters(&mut self, cells: &[u32]) {
        self.cell_filters = cells.to_vec();
    }

    /// Do not print the kdam progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }
}

// First pass: header, tally numbers, formats
impl MeshtalReader {
    fn scan(&self, path: &Path) -> Result<(MeshtalHeader, FormatMap)> {
        let reader = BufReader::new(File::open(path)?);

        let mut header = MeshtalHeader::default();
        let mut formats = FormatMap::new();
        let mut expect_title = false;
        let mut id: Option<u32> = None;
        let mut geometry: Option<Geometry> = None;

        for line in lossy_lines(reader) {
            let line = line?;
            let line = line.trim();

            if parsers::is_new_mesh(line) {
                id = Some(parsers::parse_mesh_id(line).ok_or_else(|| {
                    Error::ParseError(f!("Could not find mesh id from \"{line}\""))
                })?);
                geometry = None;
                continue;
            }

            let Some(id) = id else {
                header.read_line(line, &mut expect_title);
                continue;
            };

            if geometry.is_none() {
                geometry = parsers::mesh_geometry(line);
            }

            if !formats.contains_key(&id) {
                let geometry = geometry.unwrap_or_default();
                if let Some(format) = parsers::detect_format(line, geometry) {
                    formats.insert(id, (format, geometry));
                }
            }

            // nothing left to learn once every target is found
            if !self.target_ids.is_empty()
                && self.target_ids.iter().all(|t| formats.contains_key(t))
            {
                break;
            }
        }

        Ok((header, formats))
    }
}

// Second pass: voxel data
impl MeshtalReader {
    fn read_meshes(&mut self, path: &Path, formats: &FormatMap) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        let mut progress = self.progress_bar()?;
        if !self.disable_progress {
            progress.refresh()?;
        }

        for line in lossy_lines(reader) {
            let line = line?;
            progress.update(1)?;
            let line = line.trim_start();

            if parsers::is_new_mesh(line) {
                self.start_mesh(line, formats)?;
                continue;
            }

            if self.is_skipping {
                if self.is_complete() {
                    break;
                }
                continue;
            }

            let Some(format) = self.mesh_list.last().map(|m| m.format) else {
                continue;
            };

            match format {
                Format::COL | Format::CF => self.read_column_line(line)?,
                Format::IJ | Format::IK | Format::JK => self.read_matrix_line(line)?,
                Format::CUV => self.read_cuv_line(line)?,
                Format::NONE => (),
            }
        }
        self.close_mesh()?;

        // keep the progress line separate from anything printed next
        if !self.disable_progress {
            eprintln!();
        }

        info!("Extracted {} mesh tallies", self.mesh_list.len());
        Ok(())
    }

    /// Every target has been read and the reader has moved past the last one
    fn is_complete(&self) -> bool {
        !self.target_ids.is_empty() && self.mesh_list.len() == self.target_ids.len()
    }

    /// Close off the previous mesh and set up for the next, if targeted
    fn start_mesh(&mut self, line: &str, formats: &FormatMap) -> Result<()> {
        self.close_mesh()?;

        let id = parsers::parse_mesh_id(line)
            .ok_or_else(|| Error::ParseError(f!("Could not find mesh id from \"{line}\"")))?;

        self.is_skipping = !self.target_ids.is_empty() && !self.target_ids.contains(&id);
        if self.is_skipping {
            return Ok(());
        }

        let (format, geometry) = *formats.get(&id).ok_or(Error::UnknownMeshFormat(id))?;
        debug!("Reading mesh {id} ({format:?})");

        self.mesh_list.push(Mesh {
            format,
            geometry,
            ..Mesh::new(id)
        });
        self.cursor = MatrixCursor::default();
        if format == Format::CUV {
            self.cuv = Some(CuvAccumulator::default());
        }

        Ok(())
    }

    /// Finish any CuV sums for the mesh just read
    fn close_mesh(&mut self) -> Result<()> {
        if let (Some(cuv), Some(mesh)) = (self.cuv.take(), self.mesh_list.last_mut()) {
            cuv.finish(mesh, self.normalisation)?;
        }
        Ok(())
    }

    fn read_column_line(&mut self, line: &str) -> Result<()> {
        let Some(mesh) = self.mesh_list.last_mut() else {
            return Ok(());
        };

        // data records are by far the most common line
        if let Ok((_, mut voxel)) = parsers::column_record(line) {
            voxel.index = mesh.voxels.len();
            mesh.voxels.push(voxel);
            return Ok(());
        }

        match parsers::classify(line, mesh.format) {
            Some(kind) => read_mesh_header(mesh, kind, line),
            None => Ok(()),
        }
    }

    fn read_matrix_line(&mut self, line: &str) -> Result<()> {
        let Some(mesh) = self.mesh_list.last_mut() else {
            return Ok(());
        };

        match parsers::classify(line, mesh.format) {
            Some(HeaderLine::GroupMarker) => self.cursor.next_group(line),
            Some(HeaderLine::TableMarker) => {
                self.cursor.next_table();
                Ok(())
            }
            Some(HeaderLine::Numbers) => self.cursor.read_row(mesh, line),
            Some(kind) => read_mesh_header(mesh, kind, line),
            None => Ok(()),
        }
    }

    fn read_cuv_line(&mut self, line: &str) -> Result<()> {
        let (Some(mesh), Some(cuv)) = (self.mesh_list.last_mut(), self.cuv.as_mut()) else {
            return Ok(());
        };

        if let Ok((_, (voxel, cell))) = parsers::cuv_record(line) {
            return cuv.add_cell(mesh, voxel, cell, &self.cell_filters);
        }

        match parsers::classify(line, mesh.format) {
            Some(HeaderLine::VoidRecord) => cuv.set_void_record(line),
            Some(HeaderLine::MaterialCells) => cuv.extend_material_cells(line),
            Some(kind) => read_mesh_header(mesh, kind, line),
            None => Ok(()),
        }
    }

    fn progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .unit(" lines")
            .unit_scale(true)
            .disable(self.disable_progress)
            .bar_format("{count} lines [{rate} lines/s]   ")
            .build()
            .map_err(Error::ProgressBarError)
    }
}

/// Lines of a file, with anything that is not UTF-8 replaced
///
/// Titles are copied straight from the input deck and can hold Latin-1
/// characters. Read failures are still returned.
fn lossy_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = Result<String>> {
    let mut buffer = Vec::new();
    std::iter::from_fn(move || {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer);
                Some(Ok(line.trim_end_matches(['\n', '\r']).to_string()))
            }
            Err(e) => Some(Err(e.into())),
        }
    })
}

/// Header lines common to every format
fn read_mesh_header(mesh: &mut Mesh, kind: HeaderLine, line: &str) -> Result<()> {
    match kind {
        HeaderLine::Orientation => read_orientation(mesh, line),
        HeaderLine::Particle => {
            let (_, name) = parsers::first_word(line)
                .map_err(|_| Error::FailedToInferParticle(preview(line)))?;
            mesh.particle = Particle::try_from(name)?;
            Ok(())
        }
        HeaderLine::SpatialBounds => read_spatial_bounds(mesh, line),
        HeaderLine::GroupBounds => read_group_bounds(mesh, line),
        _ => Ok(()),
    }
}

/// Origin, and for cylinders the axis and VEC which may be on the same line
fn read_orientation(mesh: &mut Mesh, line: &str) -> Result<()> {
    let (rest, origin) = parsers::labelled_triplet(line, "origin at")
        .map_err(|_| Error::ParseError(f!("Could not find origin in \"{}\"", preview(line))))?;
    mesh.origin = origin;

    if let Ok((rest, axs)) = parsers::labelled_triplet(rest, "axis in") {
        mesh.axs = axs;
        if let Ok((_, vec)) = parsers::labelled_triplet(rest, "VEC direction") {
            mesh.vec = vec;
        }
    }
    Ok(())
}

/// `X`/`R` bounds are always i, but `Z` is k for rectangular and j for
/// cylindrical meshes
fn read_spatial_bounds(mesh: &mut Mesh, line: &str) -> Result<()> {
    let (_, bounds) = parsers::values_after_colon(line)
        .map_err(|_| Error::ParseError(f!("Could not read bounds from \"{}\"", preview(line))))?;
    let n_bins = bounds.len().saturating_sub(1);

    let (edges, ints) = match (line.chars().next(), mesh.geometry) {
        (Some('X' | 'R'), _) => (&mut mesh.imesh, &mut mesh.iints),
        (Some('Y'), _) | (Some('Z'), Geometry::Cylindrical) => (&mut mesh.jmesh, &mut mesh.jints),
        (Some('T'), _) | (Some('Z'), Geometry::Rectangular) => (&mut mesh.kmesh, &mut mesh.kints),
        _ => return Err(Error::FailedToInferGeometry(preview(line))),
    };

    *edges = bounds;
    *ints = n_bins;
    Ok(())
}

fn read_group_bounds(mesh: &mut Mesh, line: &str) -> Result<()> {
    let (_, bounds) = parsers::values_after_colon(line)
        .map_err(|_| Error::ParseError(f!("Could not read bounds from \"{}\"", preview(line))))?;
    let n_bins = bounds.len().saturating_sub(1);

    if line.starts_with("Energy") {
        mesh.emesh = bounds;
        mesh.eints = n_bins;
    } else if line.starts_with("Time") {
        mesh.tmesh = bounds;
        mesh.tints = n_bins;
    } else {
        return Err(Error::FailedToInferGroup(preview(line)));
    }
    Ok(())
}

/// Checks and fixes once a mesh is fully read
fn finalise(mesh: &mut Mesh) -> Result<()> {
    if mesh.voxels.len() != mesh.n_voxels_expected() {
        return Err(Error::UnexpectedNumberOfVoxels {
            id: mesh.id,
            expected: mesh.n_voxels_expected(),
            found: mesh.voxels.len(),
        });
    }

    // rectangular origins are written at the centre, FMESH cards use the corner
    if mesh.geometry == Geometry::Rectangular {
        if let (Some(x), Some(y), Some(z)) =
            (mesh.imesh.first(), mesh.jmesh.first(), mesh.kmesh.first())
        {
            mesh.origin = [*x, *y, *z];
        }
    }

    // matrix tables are read in whatever order they are written
    if mesh.format.is_matrix() {
        mesh.voxels.sort_by_key(|v| v.index);
    }

    // bounds are only written to a few significant figures
    for (name, bounds) in [("EMESH", &mesh.emesh), ("TMESH", &mesh.tmesh)] {
        if bounds.windows(2).any(|pair| pair[0] == pair[1]) {
            warn!("Warning: Duplicate {name} values in fmesh {}", mesh.id);
        }
    }

    Ok(())
}

fn describe_formats(formats: &FormatMap) -> String {
    formats
        .iter()
        .fold("Formats found:".to_string(), |s, (id, (format, geometry))| {
            s + &f!("\n  > Fmesh {id:<4}: {geometry:?}, {format:?}")
        })
}

/// First few characters of a line for error messages
fn preview(line: &str) -> String {
    f!("{}...", line.chars().take(20).collect::<String>())
}
