//! Cell-under-Voxel accumulation
//!
//! A CuV voxel is written as one record per cell underneath it. Records are
//! summed as they are read, and the voxel is only turned into a result once
//! the mesh is complete.

// crate modules
use crate::error::{Error, Result};
use crate::group::Group;
use crate::mesh::Mesh;
use crate::reader::parsers;
use crate::voxel::{relative_error, Voxel};

// meshops modules
use meshops_utils::f;

/// Normalisation of the combined cell results under a CuV voxel
///
/// Every cell contribution is weighted by its volume, and the sum is divided
/// by either the full voxel volume or the volume of the included cells.
///
/// ```rust
/// # use meshops_mesh::reader::CuvNormalisation;
/// assert_eq!("vtot".parse::<CuvNormalisation>().unwrap(), CuvNormalisation::VoxelVolume);
/// assert_eq!("CELF".parse::<CuvNormalisation>().unwrap(), CuvNormalisation::CellVolume);
/// assert!("other".parse::<CuvNormalisation>().is_err());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CuvNormalisation {
    /// Divide by the total voxel volume ("vtot")
    #[default]
    VoxelVolume,
    /// Divide by the volume of the included cells ("celf")
    CellVolume,
}

impl std::str::FromStr for CuvNormalisation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vtot" => Ok(Self::VoxelVolume),
            "celf" => Ok(Self::CellVolume),
            _ => Err(Error::UnknownNormalisation(s.to_string())),
        }
    }
}

impl std::fmt::Display for CuvNormalisation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::VoxelVolume => write!(f, "vtot"),
            Self::CellVolume => write!(f, "celf"),
        }
    }
}

/// State of the `Void_Record=` card
///
/// With `Off`, voxels with no material are left out of the file entirely and
/// have to be put back using the material cells per voxel array. Files that
/// never mention it write every voxel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VoidRecord {
    /// Every voxel is written
    #[default]
    On,
    /// Void voxels are omitted
    Off,
}

/// One cell record of a CuV voxel
#[derive(Debug, Clone)]
pub struct CellData {
    pub energy: Group,
    pub time: Group,
    /// Voxel centre coordinates
    pub i_coord: f64,
    pub j_coord: f64,
    pub k_coord: f64,
    pub cell: u32,
    pub material: u32,
    pub density: f64,
    /// Volume of the cell inside the voxel
    pub volume: f64,
}

impl CellData {
    /// Both records sit in the same voxel of the same group
    fn shares_voxel(&self, other: &CellData) -> bool {
        self.energy == other.energy
            && self.time == other.time
            && self.i_coord == other.i_coord
            && self.j_coord == other.j_coord
            && self.k_coord == other.k_coord
    }
}

/// Running sums for the CuV mesh currently being read
///
/// While reading, each voxel result holds `sum(r*V)` and each error holds
/// `sum((r*e*V)^2)`. [finish()](CuvAccumulator::finish) turns these into the
/// normalised result and relative error.
#[derive(Debug, Default)]
pub(super) struct CuvAccumulator {
    void_record: VoidRecord,
    /// Material cells per voxel, reordered to voxel order on first use
    mcpv: Vec<u32>,
    previous: Option<CellData>,
    /// Included cell volume under each voxel
    volumes: Vec<f64>,
}

impl CuvAccumulator {
    pub fn set_void_record(&mut self, line: &str) -> Result<()> {
        let (_, status) = parsers::void_record_status(line)
            .map_err(|_| Error::FailedToInferVoidoff(line.to_string()))?;
        self.void_record = status;
        Ok(())
    }

    /// Append a row of the material cells per voxel array
    ///
    /// Only needed to recover omitted voxels, so ignored unless void records
    /// are off.
    pub fn extend_material_cells(&mut self, line: &str) -> Result<()> {
        if self.void_record == VoidRecord::On {
            return Ok(());
        }

        let (_, values) = parsers::integer_list(line)
            .map_err(|_| Error::ParseError(f!("Could not read material cells from \"{line}\"")))?;
        self.mcpv.extend(values);
        Ok(())
    }

    /// Add one cell record onto its voxel, starting a new voxel if needed
    pub fn add_cell(
        &mut self,
        mesh: &mut Mesh,
        voxel: Voxel,
        cell: CellData,
        filters: &[u32],
    ) -> Result<()> {
        if mesh.voxels.is_empty() {
            self.reorder_mcpv(mesh)?;
        }

        let is_new_voxel = match &self.previous {
            Some(previous) => mesh.voxels.is_empty() || !previous.shares_voxel(&cell),
            None => true,
        };

        if is_new_voxel {
            if self.void_record == VoidRecord::Off {
                let n_void = self.void_gap(mesh);
                push_empty_voxels(mesh, mesh.voxels.len() + n_void);
            }
            push_empty_voxels(mesh, mesh.voxels.len() + 1);
            self.volumes.resize(mesh.voxels.len(), 0.0);
        }

        if filters.is_empty() || filters.contains(&cell.cell) {
            // negative cell results count as nothing
            let (result, error) = match voxel.result < 0.0 {
                true => (0.0, 0.0),
                false => (voxel.result, voxel.error),
            };

            if let (Some(current), Some(volume)) = (mesh.voxels.last_mut(), self.volumes.last_mut())
            {
                current.result += result * cell.volume;
                current.error += (result * error * cell.volume).powi(2);
                *volume += cell.volume;
            }
        }

        self.previous = Some(cell);
        Ok(())
    }

    /// Normalise the sums and pad out any trailing void voxels
    pub fn finish(self, mesh: &mut Mesh, normalisation: CuvNormalisation) -> Result<()> {
        let norms = (0..mesh.voxels.len())
            .map(|idx| match normalisation {
                CuvNormalisation::CellVolume => Ok(self.volumes.get(idx).copied().unwrap_or(0.0)),
                CuvNormalisation::VoxelVolume => mesh.voxel_volume(idx),
            })
            .collect::<Result<Vec<f64>>>()?;

        for (voxel, norm) in mesh.voxels.iter_mut().zip(norms) {
            let weighted = voxel.result;
            voxel.error = relative_error(voxel.error.sqrt(), weighted);
            voxel.result = if norm > 0.0 { weighted / norm } else { 0.0 };
        }

        push_empty_voxels(mesh, mesh.n_voxels_expected());
        Ok(())
    }

    /// The array is written in cell order (x fastest), the records in voxel
    /// order (z fastest)
    fn reorder_mcpv(&mut self, mesh: &Mesh) -> Result<()> {
        if self.void_record == VoidRecord::On {
            return Ok(());
        }

        let expected = mesh.n_voxels_per_group();
        if self.mcpv.len() != expected {
            return Err(Error::UnexpectedMcpvLength {
                expected,
                found: self.mcpv.len(),
            });
        }

        self.mcpv = (0..expected)
            .map(|idx| self.mcpv[mesh.voxel_index_to_cell_index(idx)])
            .collect();
        Ok(())
    }

    /// Number of void voxels omitted before the next written voxel
    fn void_gap(&self, mesh: &Mesh) -> usize {
        if self.mcpv.is_empty() {
            return 0;
        }

        (mesh.voxels.len()..mesh.n_voxels_expected())
            .take_while(|idx| self.mcpv[idx % self.mcpv.len()] == 0)
            .count()
    }
}

/// Pad with zero voxels up to `n_total`
fn push_empty_voxels(mesh: &mut Mesh, n_total: usize) {
    while mesh.voxels.len() < n_total {
        mesh.voxels.push(Voxel {
            index: mesh.voxels.len(),
            ..Default::default()
        });
    }
}
