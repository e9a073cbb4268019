//! Buffer and encode/decode abstractions shared across element implementations.

mod buf;
mod coding;

pub use buf::*;
pub use coding::*;
