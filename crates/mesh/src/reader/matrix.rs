//! Position tracking for IJ, IK and JK tables

// crate modules
use crate::error::{Error, Result};
use crate::format::Format;
use crate::mesh::Mesh;
use crate::voxel::Voxel;

// meshops modules
use meshops_utils::f;

/// Where the reader is within the tables of a matrix mesh
///
/// Lines are read one at a time, so the energy bin, time bin, table and row
/// have to be carried from one line to the next. All counters are 1-based and
/// zero means "not seen yet".
#[derive(Debug, Default)]
pub(super) struct MatrixCursor {
    energy: usize,
    time: usize,
    table: usize,
    row: usize,
}

impl MatrixCursor {
    /// Move to the next energy or time group from an `Energy Bin` or
    /// `Time Bin` marker
    pub fn next_group(&mut self, line: &str) -> Result<()> {
        if line.starts_with("Energy") || line.starts_with("Total Energy") {
            *self = Self {
                energy: self.energy + 1,
                ..Default::default()
            };
        } else if line.starts_with("Time") || line.starts_with("Total Time") {
            self.time += 1;
            self.table = 0;
            self.row = 0;
        } else {
            return Err(Error::FailedToInferGroup(line.to_string()));
        }
        Ok(())
    }

    /// Move to the next result/error table pair
    pub fn next_table(&mut self) {
        self.table += 1;
        self.row = 0;
    }

    /// Read a row of a result or error table
    ///
    /// The first value of a row is the coordinate of the row, and the rows of
    /// column coordinates have one value fewer than there are columns.
    ///
    /// ```text
    ///              0.50         1.50          <- column coordinates
    ///       0.50  1.00000E+00  4.00000E+00    <- results, new voxels
    ///       0.50  0.10000      0.20000        <- errors, update voxels
    /// ```
    pub fn read_row(&mut self, mesh: &mut Mesh, line: &str) -> Result<()> {
        let values = line
            .split_whitespace()
            .skip(1)
            .map(|s| {
                s.parse::<f64>()
                    .map_err(|_| Error::ParseError(f!("Could not parse \"{s}\" as a number")))
            })
            .collect::<Result<Vec<f64>>>()?;

        if values.len() < Self::shape(mesh).0 {
            self.row = 0;
            return Ok(());
        }

        // meshes without a TMESH have one implied time bin and no marker
        if mesh.tmesh.is_empty() {
            self.time = 1;
        }
        self.row += 1;

        // results are always written in scientific notation
        if line.contains(['E', 'e']) {
            for (column, result) in values.into_iter().enumerate() {
                let index = self.voxel_index(mesh, column);
                mesh.voxels.push(Voxel {
                    index,
                    result,
                    error: 0.0,
                });
            }
        } else {
            let start = self.row_start(mesh);
            let n_voxels = mesh.voxels.len();
            for (column, error) in values.into_iter().enumerate() {
                let voxel = mesh
                    .voxels
                    .get_mut(start + column)
                    .ok_or(Error::IndexOutOfBounds {
                        minimum: 0,
                        maximum: n_voxels,
                        actual: start + column,
                    })?;
                voxel.error = error;
            }
        }

        Ok(())
    }

    /// Number of (columns, rows) in each table
    fn shape(mesh: &Mesh) -> (usize, usize) {
        match mesh.format {
            Format::JK => (mesh.jints, mesh.kints),
            Format::IK => (mesh.iints, mesh.kints),
            _ => (mesh.iints, mesh.jints),
        }
    }

    /// Position in `mesh.voxels` of the first voxel of the current error row
    ///
    /// The result table was the last thing pushed, so its rows sit at the end.
    fn row_start(&self, mesh: &Mesh) -> usize {
        let (columns, rows) = Self::shape(mesh);
        let table_start = mesh.voxels.len().saturating_sub(columns * rows);
        table_start + self.row.saturating_sub(1) * columns
    }

    /// Global voxel index of a column in the current row
    fn voxel_index(&self, mesh: &Mesh, column: usize) -> usize {
        let row = self.row.saturating_sub(1);
        let table = self.table.saturating_sub(1);

        let (i, j, k) = match mesh.format {
            Format::IK => (column, table, row),
            Format::JK => (table, column, row),
            _ => (column, row, table),
        };

        // a single energy bin may not have a marker at all
        mesh.etijk_to_voxel_index(
            self.energy.saturating_sub(1),
            self.time.saturating_sub(1),
            i,
            j,
            k,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(format: Format) -> Mesh {
        Mesh {
            format,
            iints: 2,
            jints: 2,
            kints: 1,
            ..Mesh::new(1)
        }
    }

    #[test]
    fn result_then_error_rows() {
        let mut mesh = square(Format::IJ);
        let mut cursor = MatrixCursor::default();
        cursor.next_table();

        cursor.read_row(&mut mesh, "0.50         1.50").unwrap();
        cursor.read_row(&mut mesh, "0.50  1.00000E+00  4.00000E+00").unwrap();
        cursor.read_row(&mut mesh, "1.50  9.00000E+00  1.60000E+01").unwrap();
        cursor.read_row(&mut mesh, "0.50         1.50").unwrap();
        cursor.read_row(&mut mesh, "0.50  0.10000      0.20000").unwrap();
        cursor.read_row(&mut mesh, "1.50  0.30000      0.40000").unwrap();

        // across is x, down is y
        let indices: Vec<usize> = mesh.voxels.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![0, 2, 1, 3]);

        let errors: Vec<f64> = mesh.voxels.iter().map(|v| v.error).collect();
        assert_eq!(errors, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn energy_markers_reset_position() {
        let mut cursor = MatrixCursor {
            energy: 1,
            time: 2,
            table: 3,
            row: 4,
        };
        cursor.next_group("Energy Bin:  1.00E+00 - 2.00E+01").unwrap();
        assert_eq!((cursor.energy, cursor.time, cursor.table, cursor.row), (2, 0, 0, 0));

        cursor.next_group("Total Time Bin").unwrap();
        assert_eq!((cursor.energy, cursor.time), (2, 1));

        assert!(cursor.next_group("Tally Results:").is_err());
    }

    #[test]
    fn errors_before_results() {
        let mut mesh = square(Format::IJ);
        let mut cursor = MatrixCursor::default();
        cursor.next_table();
        assert!(cursor.read_row(&mut mesh, "0.50  0.10000      0.20000").is_err());
    }
}
