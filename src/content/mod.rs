//! Note content processing
//!
//! Pure text transformations applied to every note body:
//! - [`normalize`] rewrites HTML/LaTeX leftovers into clean markdown
//! - [`extract_references`] finds the asset filenames a note links to

mod normalize;
mod references;

pub use normalize::*;
pub use references::*;
