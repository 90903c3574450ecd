//! notefold — converts flat note exports into a categorized notebook tree.
//!
//! The pipeline per input folder: parse each note's metadata header, build
//! a placement tree (mirroring a pre-existing notebook structure when one
//! exists, otherwise synthesized from the collected category paths),
//! resolve each note's most specific category path against that tree with
//! fuzzy matching, write the normalized content into the resolved folder,
//! then copy only the assets each output folder's notes actually reference.

pub mod assets;
pub mod content;
pub mod convert;
pub mod error;
pub mod hierarchy;
pub mod note;

pub use assets::copy_referenced_assets;
pub use content::{extract_references, normalize};
pub use convert::{
    convert_all, convert_folder, preview, ConvertOptions, ConvertPreview, FolderReport, RunReport,
};
pub use error::{ConvertError, Result};
pub use hierarchy::{resolve, resolve_chain, split_segments, TreeNode, CATEGORY_SEPARATOR};
pub use note::{parse_note, read_note, Note};
