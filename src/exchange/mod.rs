//! Catalog interchange formats.
//!
//! Two serialized forms of the same data: an opaque binary snapshot
//! (typed collections, bincode) and a `;`-delimited text table whose
//! headers are part of the historical wire format.

pub mod binary;
pub mod text;
