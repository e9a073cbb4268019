#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Error types for this crate.
mod error;
mod functional;
pub use error::*;

/// I/O utilities.
pub mod io;

/// base types for Matroska elements. ie. `VInt64`, `Header`, etc.
mod base;
/// A streaming demuxing facade: metaseek resolution, cluster indexing, chapter/tag
/// projection, lazy attachments, and per-track frame queues over a seekable source.
pub mod demux;
mod frame;
/// Lacing schemes used to pack multiple frames into a single Block.
mod lacer;
/// Leaf elements in Matroska.
mod leaf;
/// Master elements in Matroska.
mod master;
/// Supplementary elements in Matroska. Void elements, CRC-32, etc.
///
/// These elements are not from the Matroska specification, but Matroska specifications inherit them from EBML specifications.
mod supplement;
// Element body definitions and traits.
mod element;
/// A lightweight view of a Matroska file's header structure, without loading Cluster data.
pub mod view;

/// A prelude for common types and traits.
pub mod prelude {
    pub use crate::base::*;
    pub use crate::element::*;
    pub use crate::frame::*;
    pub use crate::leaf::*;
    pub use crate::master::*;
    pub use crate::supplement::*;
}
