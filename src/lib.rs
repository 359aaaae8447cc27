//! `meshops` is a small toolkit for combining and converting MCNP mesh
//! tallies
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use meshops_mesh as mesh;

#[doc(inline)]
pub use meshops_utils as utils;
