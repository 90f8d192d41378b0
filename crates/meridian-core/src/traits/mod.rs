//! Core traits for meridian collaborators.

mod extractor;
mod store;

pub use extractor::*;
pub use store::*;
