//! Category hierarchy handling
//!
//! Builds a notebook folder tree from category metadata (or mirrors a
//! pre-existing one from disk) and resolves each note's category path to a
//! node in it, tolerating the punctuation drift between externally-authored
//! category names and actual folder names.

mod resolve;
mod tree;

pub use resolve::*;
pub use tree::*;
