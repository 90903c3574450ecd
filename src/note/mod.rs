//! Note export parsing
//!
//! Parses exported note files into immutable [`Note`] values. A note file
//! carries a small metadata header (date, creation time, and a bulleted list
//! of category paths) followed by the markdown body.

mod parser;

pub use parser::*;
