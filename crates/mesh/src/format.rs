//! Meshtal output formats and the broader kind of mesh they produce

/// Meshtal output formats, e.g. `COL`, `JK`, `CUV`...
///
/// Every format is read into the same [Mesh](crate::Mesh) so that all of the
/// arithmetic works regardless of how the tally was written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Column data (MCNP default)
    ///
    /// ```text
    ///  Energy      X      Y      Z     Result     Rel Error
    /// 1.111E+00 -0.500 -0.733 -2.625 7.25325E-03 1.20187E-02
    /// ```
    COL,
    /// Column data including voxel volume
    ///
    /// The volume columns are derivable and discarded during parsing.
    ///
    /// ```text
    ///  Energy      X      Y      Z     Result     Rel Error     Volume    Rslt * Vol
    /// 1.111E+00 -0.500 -0.733 -2.625 7.25325E-03 1.20187E-02 1.28333E+00 9.30834E-03
    /// ```
    CF,
    /// UKAEA Cell-under-Voxel column data
    ///
    /// Several rows can share one voxel, one for each cell found under it.
    /// These are combined into a single voxel by the reader.
    ///
    /// ```text
    ///  Energy   Cell Mat  Density     Volume      X     Y       Z      Result   Rel Error
    /// 1.000E+35  76  6  8.00000E+00 4.47858E+02 0.697 9.000 -16.000 1.23957E-04 2.97900E-02
    /// ```
    CUV,
    /// 2D matrix of I (col) and J (row) data, grouped by K
    IJ,
    /// 2D matrix of I (col) and K (row) data, grouped by J
    IK,
    /// 2D matrix of J (col) and K (row) data, grouped by I
    JK,
    #[default]
    /// Unknown format, or a mesh built in memory
    NONE,
}

impl Format {
    /// The kind of mesh data this format represents
    ///
    /// ```rust
    /// # use meshops_mesh::{Format, MeshKind};
    /// assert_eq!(Format::CUV.kind(), MeshKind::CellUnderVoxel);
    /// assert_eq!(Format::JK.kind(), MeshKind::Standard);
    /// ```
    pub fn kind(&self) -> MeshKind {
        match self {
            Format::CUV => MeshKind::CellUnderVoxel,
            _ => MeshKind::Standard,
        }
    }

    /// True for any of the IJ, IK, JK table formats
    pub fn is_matrix(&self) -> bool {
        matches!(self, Format::IJ | Format::IK | Format::JK)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Standard mesh tally or Cell-under-Voxel
///
/// CuV results are volume weighted combinations of cell results, so they are
/// not directly comparable with a standard tally of the same grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    /// Regular FMESH output
    #[default]
    Standard,
    /// UKAEA Cell-under-Voxel output
    CellUnderVoxel,
}

impl std::fmt::Display for MeshKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MeshKind::Standard => write!(f, "Standard"),
            MeshKind::CellUnderVoxel => write!(f, "CuV"),
        }
    }
}
