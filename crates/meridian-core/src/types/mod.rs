//! Core types for noon report extraction.

mod content;
mod report;

pub use content::*;
pub use report::*;
