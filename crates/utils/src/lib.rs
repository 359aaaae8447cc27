//! Small extension traits shared by the meshops crates
//!
//! Covers tolerant comparison of bin boundaries and the scientific number
//! formatting used in meshtal style output.
#![doc = include_str!("../readme.md")]

/// Shorthand for `format!`
pub use std::format as f;

mod option_ext;
mod slice_ext;
mod value_ext;

pub use option_ext::OptionExt;
pub use slice_ext::SliceExt;
pub use value_ext::ValueExt;
