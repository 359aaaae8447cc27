//! Energy and time group labels

// crate modules
use crate::error::Error;

// meshops modules
use meshops_utils::ValueExt;

/// Label of an energy or time group
///
/// A group is named after the upper edge of its bin. Cards with more than one
/// bin get an extra [Group::Total] on the end, and a card with a single bin
/// only has the [Group::Total].
///
/// | Bounds        | Groups                            |
/// | ------------- | --------------------------------- |
/// | 0.0 100       | Total                             |
/// | 0.0 20 100    | Value(20.0), Value(100.0), Total  |
///
/// EMESH bounds are always written, as `0.0 1e36` by default. TMESH bounds
/// are left out of the file when not used, which is also a single `Total`.
#[derive(Debug, PartialEq, Clone, Copy, PartialOrd)]
pub enum Group {
    Total,
    /// Upper bin edge
    Value(f64),
}

impl Group {
    /// Group is the `Total` bin
    ///
    /// ```rust
    /// # use meshops_mesh::Group;
    /// assert!(Group::Total.is_total());
    /// assert!(!Group::Value(2.0).is_total());
    /// ```
    pub const fn is_total(&self) -> bool {
        matches!(*self, Self::Total)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value.sci(5, 2)),
            Self::Total => write!(f, "Total"),
        }
    }
}

/// Parse user input such as "total" or "1e6" into a group
///
/// ```rust
/// # use meshops_mesh::Group;
/// assert_eq!(Group::try_from("TOTAL").unwrap(), Group::Total);
/// assert_eq!(Group::try_from("20").unwrap(), Group::Value(20.0));
/// assert!(Group::try_from("twenty").is_err());
/// ```
impl TryFrom<&str> for Group {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("total") {
            return Ok(Self::Total);
        }

        s.parse::<f64>()
            .map(Self::Value)
            .map_err(|_| Error::FailedToInferGroup(s.to_string()))
    }
}
