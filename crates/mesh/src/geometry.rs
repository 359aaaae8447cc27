//! Coordinate systems of a mesh

/// Rectangular (xyz) or cylindrical (rzt) mesh
///
/// MCNP also writes spherical meshes, which are not read.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Geometry {
    #[default]
    Rectangular,
    Cylindrical,
}

impl Geometry {
    pub fn long_name(&self) -> &str {
        match self {
            Self::Rectangular => "Rectangular",
            Self::Cylindrical => "Cylindrical",
        }
    }

    /// Axis letters, "XYZ" or "RZT"
    pub fn geometry_name(&self) -> &str {
        match self {
            Self::Rectangular => "XYZ",
            Self::Cylindrical => "RZT",
        }
    }

    /// Units of the i, j and k boundaries, with theta in revolutions
    pub fn units(&self) -> [&str; 3] {
        match self {
            Self::Rectangular => ["cm"; 3],
            Self::Cylindrical => ["cm", "cm", "revs"],
        }
    }

    /// XML vtk extension, "vtr" grids for rectangular and "vtu" otherwise
    pub fn vtk_extension(&self) -> &str {
        match self {
            Self::Rectangular => "vtr",
            Self::Cylindrical => "vtu",
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.geometry_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Geometry::default().to_string(), "XYZ");
        assert_eq!(Geometry::Cylindrical.to_string(), "RZT");
        assert_eq!(Geometry::Cylindrical.units()[2], "revs");
    }
}
