// crate modules
use crate::error::Result;
use crate::geometry::Geometry;
use crate::mesh::Mesh;
use crate::vtk::{MeshToVtkBuilder, Vertex};

// meshops modules
use meshops_utils::f;

// external crates
use log::warn;
use nalgebra::Rotation;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, Coordinates, DataArray, DataSet,
    ElementType, Extent, IOBuffer, RangeExtent, RectilinearGridPiece, UnstructuredGridPiece,
    Version, VertexNumbers, Vtk,
};

// standard library
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

/// Convert mesh tallies to vtk formats for plotting
///
/// Rectangular meshes become a rectilinear grid. There is no VTK
/// representation of cylindrical meshes, so an unstructured grid is generated
/// from vertices of the RZT bounds instead.
///
/// Every selected energy/time group gives a cell data array named
/// `"Value - <group>"`, optionally followed by `"Error - <group>"` for the
/// relative errors. These are the same names used by the tabular writers.
///
/// ```rust
/// # use meshops_mesh::vtk::MeshToVtk;
/// // Include the errors, but only for the first energy group
/// let converter = MeshToVtk::builder()
///     .include_errors(true)
///     .energy_groups(vec![0])
///     .build();
/// ```
///
/// Group indices that do not exist on the mesh are ignored. If none of the
/// requested indices are valid then every group is converted.
///
/// # A note on cylindrical meshes
///
/// Cylinders are approximated by straight edges, which can look coarse for
/// meshes with few theta bins. The `resolution` subdivides every theta bin
/// into that many segments to round them off, at the cost of file size.
#[derive(Debug, PartialEq)]
pub struct MeshToVtk {
    /// Target energy group(s)
    pub energy_groups: Vec<usize>,
    /// Target time group(s)
    pub time_groups: Vec<usize>,
    /// Include error arrays in output files
    pub include_errors: bool,
    /// Byte ordering as big or little endian
    pub byte_order: ByteOrder,
    /// Cylindrical mesh resolution
    pub resolution: u8,
    /// Only write arrays with these names, all if empty
    pub arrays: Vec<String>,
}

// Public API
impl MeshToVtk {
    /// Start with the default configuration
    pub fn new() -> MeshToVtk {
        Default::default()
    }

    /// Get an instance of the [MeshToVtkBuilder]
    pub fn builder() -> MeshToVtkBuilder {
        MeshToVtkBuilder::default()
    }

    /// Convert a [Mesh] to a vtkio::Vtk object ready for writing
    pub fn convert(&self, mesh: &Mesh) -> Result<Vtk> {
        let piece = match mesh.geometry {
            Geometry::Rectangular => DataSet::inline(RectilinearGridPiece {
                extent: Self::extent(mesh),
                coords: Self::coordinates(mesh),
                data: self.collect_attributes(mesh, Self::rectilinear_order(mesh))?,
            }),
            Geometry::Cylindrical => {
                let cells = self.cylinder_cells(mesh);
                let data = self.collect_attributes(mesh, self.cylinder_order(mesh))?;
                DataSet::inline(UnstructuredGridPiece {
                    points: cells.points.into(),
                    cells: Cells {
                        cell_verts: VertexNumbers::XML {
                            connectivity: (0..cells.n_vertices).collect(),
                            offsets: cells.offsets,
                        },
                        types: cells.types,
                    },
                    data,
                })
            }
        };

        Ok(Vtk {
            version: Version::Auto,
            title: f!("Fmesh{} results", mesh.id),
            byte_order: self.byte_order,
            file_path: None,
            data: piece,
        })
    }
}

impl Default for MeshToVtk {
    fn default() -> Self {
        Self {
            energy_groups: Vec::new(),
            time_groups: Vec::new(),
            include_errors: false,
            byte_order: ByteOrder::BigEndian,
            resolution: 1,
            arrays: Vec::new(),
        }
    }
}

/// Common use implementations
impl MeshToVtk {
    /// Requested indices that exist, falling back to every group
    fn valid_indices(requested: &[usize], n_groups: usize, kind: &str) -> Vec<usize> {
        if requested.is_empty() {
            return (0..n_groups).collect();
        }

        let mut indices = requested
            .iter()
            .copied()
            .filter(|idx| *idx < n_groups)
            .collect::<Vec<usize>>();

        if indices.is_empty() {
            warn!("Warning: No valid {kind} index provided, defaulting to all");
            return (0..n_groups).collect();
        }

        indices.sort();
        indices.dedup();
        indices
    }

    /// Cell data arrays for every selected group
    ///
    /// `order` maps each vtk cell onto the index of a voxel within a group.
    fn collect_attributes(&self, mesh: &Mesh, order: Vec<usize>) -> Result<Attributes> {
        let mut attributes = Attributes::new();

        for e_idx in Self::valid_indices(&self.energy_groups, mesh.ebins(), "energy") {
            for t_idx in Self::valid_indices(&self.time_groups, mesh.tbins(), "time") {
                let voxels = mesh.slice_voxels_by_idx(e_idx, t_idx)?;
                let label = mesh.group_label(e_idx, t_idx);

                let (results, errors): (Vec<f64>, Vec<f64>) = order
                    .iter()
                    .filter_map(|i| voxels.get(*i))
                    .map(|v| (v.result, v.error))
                    .unzip();

                let value_name = f!("Value - {label}");
                if self.is_selected(&value_name, true) {
                    attributes.cell.push(Self::scalar_array(value_name, results));
                }

                let error_name = f!("Error - {label}");
                if self.is_selected(&error_name, self.include_errors) {
                    attributes.cell.push(Self::scalar_array(error_name, errors));
                }
            }
        }

        Ok(attributes)
    }

    /// Named arrays override the default choice
    fn is_selected(&self, name: &str, default: bool) -> bool {
        match self.arrays.is_empty() {
            true => default,
            false => self.arrays.iter().any(|a| a == name),
        }
    }

    fn scalar_array(name: String, values: Vec<f64>) -> Attribute {
        Attribute::DataArray(DataArray {
            name,
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data: IOBuffer::F64(values),
        })
    }
}

/// Rectangular mesh types
impl MeshToVtk {
    /// Defines number of mesh voxels in each extent for the rectilinear grid
    fn extent(mesh: &Mesh) -> Extent {
        let range_ext: RangeExtent = [
            RangeInclusive::new(0, mesh.iints as i32),
            RangeInclusive::new(0, mesh.jints as i32),
            RangeInclusive::new(0, mesh.kints as i32),
        ];
        Extent::Ranges(range_ext)
    }

    /// Defines coordinates for the rectilinear grid from mesh bounds
    fn coordinates(mesh: &Mesh) -> Coordinates {
        Coordinates {
            x: IOBuffer::F64(mesh.imesh.clone()),
            y: IOBuffer::F64(mesh.jmesh.clone()),
            z: IOBuffer::F64(mesh.kmesh.clone()),
        }
    }

    /// Voxel index for every rectilinear cell, which varies fastest in x
    fn rectilinear_order(mesh: &Mesh) -> Vec<usize> {
        let n_voxels = mesh.n_voxels_per_group();
        let mut order = vec![0; n_voxels];
        for idx in 0..n_voxels {
            let cell = mesh.voxel_index_to_cell_index(idx);
            if let Some(slot) = order.get_mut(cell) {
                *slot = idx;
            }
        }
        order
    }
}

/// Explicit vertices of the unstructured cylinder cells
#[derive(Debug, Default)]
struct CylinderCells {
    points: Vec<f64>,
    offsets: Vec<u64>,
    types: Vec<CellType>,
    n_vertices: u64,
    rotation: Option<Rotation<f64, 3>>,
    origin: [f64; 3],
}

impl CylinderCells {
    /// Add a cell with the same (x, y) vertices at two heights
    fn push(&mut self, cell_type: CellType, xy: &[(f64, f64)], z: [f64; 2]) {
        for z in z {
            for (x, y) in xy {
                let vertex = Vertex { x: *x, y: *y, z }
                    .rotate(&self.rotation)
                    .translate(&self.origin);
                self.points.extend(vertex.as_array());
            }
        }

        self.n_vertices += 2 * xy.len() as u64;
        self.offsets.push(self.n_vertices);
        self.types.push(cell_type);
    }
}

/// Cylindrical mesh types
impl MeshToVtk {
    /// Build every cell layer by layer up the axis, ring by ring outwards
    fn cylinder_cells(&self, mesh: &Mesh) -> CylinderCells {
        let mut cells = CylinderCells {
            rotation: mesh.rotation(),
            origin: mesh.origin,
            ..Default::default()
        };

        let resolution = self.effective_resolution(mesh.kints);
        let rotation_vec = mesh.vec[1].atan2(mesh.vec[0]);

        for z in mesh.jmesh.windows(2) {
            for r in mesh.imesh.windows(2) {
                for t in mesh.kmesh.windows(2) {
                    let step = TAU * (t[1] - t[0]) / resolution as f64;

                    for s in 0..resolution {
                        let t0 = TAU * t[0] + step * s as f64 + rotation_vec;
                        let t1 = t0 + step;
                        let z = [z[0], z[1]];

                        // innermost ring on the axis is made of wedges
                        if r[0] == 0.0 {
                            let xy = [(0.0, 0.0), polar(r[1], t0), polar(r[1], t1)];
                            cells.push(CellType::Wedge, &xy, z);
                        } else {
                            let xy = [
                                polar(r[0], t0),
                                polar(r[0], t1),
                                polar(r[1], t0),
                                polar(r[1], t1),
                            ];
                            cells.push(CellType::Voxel, &xy, z);
                        }
                    }
                }
            }
        }

        cells
    }

    /// Voxel index for every cylinder cell, including the subdivisions
    fn cylinder_order(&self, mesh: &Mesh) -> Vec<usize> {
        let resolution = self.effective_resolution(mesh.kints) as usize;
        let mut order = Vec::with_capacity(mesh.n_voxels_per_group() * resolution);

        for j in 0..mesh.jints {
            for i in 0..mesh.iints {
                for k in 0..mesh.kints {
                    let idx = mesh.etijk_to_voxel_index(0, 0, i, j, k);
                    order.extend(std::iter::repeat(idx).take(resolution));
                }
            }
        }

        order
    }

    /// One or two theta bins need subdividing to make a sensible shape
    fn effective_resolution(&self, n_theta_bins: usize) -> u8 {
        match n_theta_bins {
            1 => self.resolution.max(3),
            2 => self.resolution.max(2),
            _ => self.resolution.max(1),
        }
    }
}

fn polar(r: f64, theta: f64) -> (f64, f64) {
    (r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::Voxel;

    fn mesh(geometry: Geometry) -> Mesh {
        Mesh {
            geometry,
            imesh: vec![0.0, 1.0, 2.0],
            iints: 2,
            jmesh: vec![0.0, 5.0],
            jints: 1,
            kmesh: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            kints: 4,
            voxels: (0..8)
                .map(|index| Voxel {
                    index,
                    result: index as f64,
                    error: 0.1,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn array_names(attributes: &Attributes) -> Vec<String> {
        attributes
            .cell
            .iter()
            .filter_map(|a| match a {
                Attribute::DataArray(d) => Some(d.name.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rectilinear_cell_order() {
        let mesh = mesh(Geometry::Rectangular);
        // k varies fastest in the mesh, x fastest in vtk
        let order = MeshToVtk::rectilinear_order(&mesh);
        assert_eq!(order, vec![0, 4, 1, 5, 2, 6, 3, 7]);
    }

    #[test]
    fn array_naming() {
        let mesh = mesh(Geometry::Rectangular);
        let converter = MeshToVtk::builder().include_errors(true).build();
        let attributes = converter
            .collect_attributes(&mesh, MeshToVtk::rectilinear_order(&mesh))
            .unwrap();
        assert_eq!(
            array_names(&attributes),
            vec!["Value - Total", "Error - Total"]
        );

        let converter = MeshToVtk::new();
        let attributes = converter
            .collect_attributes(&mesh, MeshToVtk::rectilinear_order(&mesh))
            .unwrap();
        assert_eq!(array_names(&attributes), vec!["Value - Total"]);

        let converter = MeshToVtk::builder()
            .arrays(vec!["Error - Total".to_string()])
            .build();
        let attributes = converter
            .collect_attributes(&mesh, MeshToVtk::rectilinear_order(&mesh))
            .unwrap();
        assert_eq!(array_names(&attributes), vec!["Error - Total"]);
    }

    #[test]
    fn cylinder_cell_counts() {
        let mesh = mesh(Geometry::Cylindrical);
        let converter = MeshToVtk::builder().resolution(2).build();
        let cells = converter.cylinder_cells(&mesh);

        // 2 rings * 4 theta bins * 2 segments
        assert_eq!(cells.types.len(), 16);
        assert_eq!(
            cells.types.iter().filter(|t| **t == CellType::Wedge).count(),
            8
        );
        assert_eq!(cells.offsets.last(), Some(&(8 * 6 + 8 * 8)));
        assert_eq!(cells.points.len() as u64, 3 * cells.n_vertices);
        assert_eq!(converter.cylinder_order(&mesh).len(), 16);
    }

    #[test]
    fn minimum_resolution() {
        let converter = MeshToVtk::new();
        assert_eq!(converter.effective_resolution(1), 3);
        assert_eq!(converter.effective_resolution(2), 2);
        assert_eq!(converter.effective_resolution(8), 1);
    }

    #[test]
    fn invalid_groups_fall_back_to_all() {
        assert_eq!(MeshToVtk::valid_indices(&[5, 9], 3, "energy"), vec![0, 1, 2]);
        assert_eq!(MeshToVtk::valid_indices(&[2, 0, 2], 3, "energy"), vec![0, 2]);
    }
}
