//! Conversion driver.
//!
//! Orchestrates one input folder end to end (parse notes, build the
//! placement tree, resolve each note, write normalized content, copy
//! referenced assets) and whole input roots with per-folder isolation: one
//! folder's failure is recorded in the run report and does not abort its
//! siblings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::copy_referenced_assets;
use crate::content::normalize;
use crate::error::{ConvertError, Result};
use crate::hierarchy::{resolve_chain, TreeNode};
use crate::note::{read_note, Note};

/// Characters that cannot appear in output folder names.
const INVALID_SEGMENT_CHARS: &[char] = &['/', ':', '?', '*', '<', '>', '|', '"'];

/// Conventions of the export format's input folders.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Name of the asset pool folder inside each input folder
    pub assets_dir: String,
    /// Name of the optional pre-existing notebook-structure folder
    pub structure_dir: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            assets_dir: "Files".to_string(),
            structure_dir: "Notebook".to_string(),
        }
    }
}

/// Outcome of converting a single input folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderReport {
    /// Input folder name
    pub folder: String,
    /// Note files found at the folder's top level
    pub notes_total: usize,
    /// Notes successfully placed and written
    pub notes_placed: usize,
    /// Notes skipped (parse or resolution failure)
    pub notes_skipped: usize,
    /// Asset files copied into local assets folders
    pub assets_copied: usize,
    /// One warning per skipped note
    pub warnings: Vec<String>,
}

/// Aggregate outcome of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Per-folder results, in processing order
    pub folders: Vec<FolderReport>,
    /// One message per folder-level failure
    pub errors: Vec<String>,
}

impl RunReport {
    /// True when no folder-level failure occurred. Per-note warnings do
    /// not fail a run.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read-only scan of an input root: counts what a conversion would process
/// without writing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPreview {
    /// Top-level input folders found
    pub folder_count: usize,
    /// Note files found across all folders
    pub note_count: usize,
    /// Files in the asset pools
    pub asset_count: usize,
    /// Distinct category paths across all notes
    pub category_count: usize,
    /// Sample note names (first 10)
    pub notes: Vec<String>,
    /// Warnings during preview (unparseable notes)
    pub warnings: Vec<String>,
}

/// Convert every top-level folder under `input_root` into `output_root`.
///
/// A missing input root is fatal; anything below that is isolated per
/// folder and reported.
pub fn convert_all(input_root: &Path, output_root: &Path, opts: &ConvertOptions) -> Result<RunReport> {
    if !input_root.is_dir() {
        return Err(ConvertError::InputRootNotFound(input_root.to_path_buf()));
    }

    let mut report = RunReport {
        folders: Vec::new(),
        errors: Vec::new(),
    };

    for folder in sorted_subdirs(input_root)? {
        let name = folder_name(&folder);
        let output_dir = output_root.join(&name);
        match convert_folder(&folder, &output_dir, opts) {
            Ok(folder_report) => report.folders.push(folder_report),
            Err(e) => {
                log::warn!("Folder '{}' failed: {}", name, e);
                report.errors.push(format!("{}: {}", name, e));
            }
        }
    }

    Ok(report)
}

/// Convert one input folder: top-level note files only, placed against the
/// mirrored structure tree when one exists, otherwise against a tree
/// synthesized from the notes' own category metadata.
pub fn convert_folder(input_dir: &Path, output_dir: &Path, opts: &ConvertOptions) -> Result<FolderReport> {
    let name = folder_name(input_dir);
    let mut report = FolderReport {
        folder: name.clone(),
        notes_total: 0,
        notes_placed: 0,
        notes_skipped: 0,
        assets_copied: 0,
        warnings: Vec::new(),
    };

    // Parse all notes first; the synthesized tree needs every category
    // before any placement happens.
    let mut notes: Vec<Note> = Vec::new();
    for path in sorted_note_files(input_dir)? {
        report.notes_total += 1;
        match read_note(&path) {
            Ok(note) => notes.push(note),
            Err(e) => {
                log::warn!("Skipping note {:?}: {}", path, e);
                report.warnings.push(e.to_string());
                report.notes_skipped += 1;
            }
        }
    }

    let structure_dir = input_dir.join(&opts.structure_dir);
    let tree = if structure_dir.is_dir() {
        TreeNode::mirror(&structure_dir)
    } else {
        let categories: Vec<&str> = collect_categories(&notes);
        TreeNode::synthesize(categories)
    };

    fs::create_dir_all(output_dir)?;

    for note in &notes {
        match resolve_chain(&tree, note.placement_category()) {
            Ok(chain) => {
                let mut target = output_dir.to_path_buf();
                for node in &chain {
                    target.push(sanitize_segment(&node.label));
                }
                fs::create_dir_all(&target)?;

                let filename = note
                    .source
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(format!("{}.md", note.name)));
                fs::write(target.join(filename), normalize(&note.content))?;
                report.notes_placed += 1;
            }
            Err(e) => {
                log::warn!("Could not place note {:?}: {}", note.source, e);
                report.warnings.push(e.to_string());
                report.notes_skipped += 1;
            }
        }
    }

    report.assets_copied = copy_referenced_assets(output_dir, &input_dir.join(&opts.assets_dir))?;

    log::info!(
        "Folder '{}': placed {}/{} note(s), copied {} asset(s)",
        name,
        report.notes_placed,
        report.notes_total,
        report.assets_copied
    );
    Ok(report)
}

/// Scan an input root without writing anything.
pub fn preview(input_root: &Path, opts: &ConvertOptions) -> Result<ConvertPreview> {
    if !input_root.is_dir() {
        return Err(ConvertError::InputRootNotFound(input_root.to_path_buf()));
    }

    let mut preview = ConvertPreview {
        folder_count: 0,
        note_count: 0,
        asset_count: 0,
        category_count: 0,
        notes: Vec::new(),
        warnings: Vec::new(),
    };
    let mut categories: Vec<String> = Vec::new();

    for folder in sorted_subdirs(input_root)? {
        preview.folder_count += 1;

        for path in sorted_note_files(&folder)? {
            preview.note_count += 1;
            match read_note(&path) {
                Ok(note) => {
                    if preview.notes.len() < 10 {
                        preview.notes.push(note.name.clone());
                    }
                    for cat in &note.categories {
                        if !categories.contains(cat) {
                            categories.push(cat.clone());
                        }
                    }
                }
                Err(e) => preview.warnings.push(e.to_string()),
            }
        }

        let pool = folder.join(&opts.assets_dir);
        if pool.is_dir() {
            preview.asset_count += walkdir::WalkDir::new(&pool)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .count();
        }
    }

    preview.category_count = categories.len();
    Ok(preview)
}

/// Replace filesystem-invalid characters in a resolved segment.
///
/// Separator slashes never reach this point; paths are split into segments
/// first, so only a slash inside a segment label is rewritten.
fn sanitize_segment(label: &str) -> String {
    label
        .chars()
        .map(|c| if INVALID_SEGMENT_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

fn folder_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.to_string_lossy().to_string())
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Note files directly at the folder's top level; subfolders are the asset
/// pool and structure tree, never note sources.
fn sorted_note_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.to_string_lossy().eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Distinct category paths across all notes, insertion order preserved.
fn collect_categories(notes: &[Note]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for note in notes {
        for cat in &note.categories {
            if !categories.iter().any(|c| *c == cat.as_str()) {
                categories.push(cat.as_str());
            }
        }
    }
    categories
}
