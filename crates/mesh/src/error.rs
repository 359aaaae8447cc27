//! Errors for reading, combining and writing meshes

/// Result with the crate [Error]
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong in `meshops-mesh`
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io failure: {0}")]
    IOError(#[from] std::io::Error),

    #[error("could not write vtk: {0}")]
    VtkioError(#[from] vtkio::Error),

    #[error("could not write csv: {0}")]
    CsvError(#[from] csv::Error),

    #[error("no particle type in \"{0}\"")]
    FailedToInferParticle(String),

    #[error("could not parse meshtal: {0}")]
    ParseError(String),

    #[error("no output format found for mesh {0}")]
    UnknownMeshFormat(u32),

    #[error(
        "mesh {id} has {found} voxels, expected {expected}"
    )]
    UnexpectedNumberOfVoxels {
        id: u32,
        expected: usize,
        found: usize,
    },

    #[error(
        "material cells per voxel has {found} entries, expected {expected}"
    )]
    UnexpectedMcpvLength { expected: usize, found: usize },

    #[error("no mesh geometry in \"{0}\"")]
    FailedToInferGeometry(String),

    #[error("not an energy or time group: \"{0}\"")]
    FailedToInferGroup(String),

    #[error("mesh tally {0} is not in the file")]
    TallyNotFound(u32),

    #[error("unknown Void_Record status in \"{0}\"")]
    FailedToInferVoidoff(String),

    #[error("meshes {left} and {right} do not share the same grid")]
    ShapeMismatch { left: u32, right: u32 },

    #[error("index {actual} outside of range {minimum}..{maximum}")]
    IndexOutOfBounds {
        minimum: usize,
        maximum: usize,
        actual: usize,
    },

    #[error("collection is empty")]
    EmptyCollection,

    #[error("no data array named \"{0}\"")]
    UnknownArray(String),

    #[error("unknown output format \"{0}\"")]
    UnknownOutputFormat(String),

    #[error("unknown normalisation \"{0}\", expected \"vtot\" or \"celf\"")]
    UnknownNormalisation(String),

    #[error("failed to initialise progress bar: {0}")]
    ProgressBarError(String),
}
