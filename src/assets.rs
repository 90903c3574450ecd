//! Selective asset copying.
//!
//! After notes have been placed into the output tree, each directory gets a
//! local `assets/` folder holding exactly the files its own notes
//! reference, copied out of the export's asset pool. Sibling directories
//! referencing the same asset each receive their own copy.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::content::extract_references;
use crate::error::Result;

/// Name of the per-directory assets folder created in the output tree.
pub const OUTPUT_ASSETS_DIR: &str = "assets";

/// Copy every asset referenced by the notes in `output_dir` (recursing into
/// its subdirectories, each computed independently) from `pool_dir` into a
/// local assets folder. Returns the number of files copied.
///
/// A missing or unreadable pool is a no-op. An unreadable note file is
/// skipped with a warning rather than failing the run.
pub fn copy_referenced_assets(output_dir: &Path, pool_dir: &Path) -> Result<usize> {
    if !pool_dir.is_dir() {
        log::debug!("asset pool {:?} not present, nothing to copy", pool_dir);
        return Ok(0);
    }

    let pool = index_pool(pool_dir);

    // Collect directories up front; copying creates new assets folders
    // that must not feed back into the walk.
    let dirs: Vec<PathBuf> = WalkDir::new(output_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .collect();

    let mut copied = 0;
    for dir in dirs {
        copied += copy_for_directory(&dir, &pool)?;
    }
    Ok(copied)
}

/// Index the pool recursively: lowercased filename -> full path.
/// On duplicate filenames the first match in walk order wins.
fn index_pool(pool_dir: &Path) -> HashMap<String, PathBuf> {
    let mut pool = HashMap::new();
    for entry in WalkDir::new(pool_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        pool.entry(name).or_insert_with(|| entry.path().to_path_buf());
    }
    pool
}

/// Union the reference sets of the note files directly in `dir` and copy
/// the referenced pool assets into `dir`/assets.
fn copy_for_directory(dir: &Path, pool: &HashMap<String, PathBuf>) -> Result<usize> {
    let mut referenced: Vec<String> = Vec::new();

    for entry in fs::read_dir(dir)?.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !is_note_file(&path) {
            continue;
        }
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping unreadable note {:?} during asset scan: {}", path, e);
                continue;
            }
        };
        for name in extract_references(&text) {
            if !referenced.contains(&name) {
                referenced.push(name);
            }
        }
    }

    if referenced.is_empty() {
        return Ok(0);
    }
    referenced.sort();

    let assets_dir = dir.join(OUTPUT_ASSETS_DIR);
    fs::create_dir_all(&assets_dir)?;

    let mut copied = 0;
    for name in &referenced {
        let Some(source) = pool.get(name) else {
            continue;
        };
        // Preserve the pool file's own name (reference names are lowercased)
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());
        fs::copy(source, assets_dir.join(filename))?;
        copied += 1;
    }

    if copied > 0 {
        log::info!("Copied {} asset(s) into {:?}", copied, assets_dir);
    }
    Ok(copied)
}

fn is_note_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case("md"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_copies_only_referenced_assets() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let pool = tmp.path().join("Files");

        write(&out.join("one.md"), "![a](Files/a.png)");
        write(&out.join("two.md"), "![b](Files/b.png)");
        write(&pool.join("a.png"), "A");
        write(&pool.join("nested/b.png"), "B");
        write(&pool.join("c.png"), "C");

        let copied = copy_referenced_assets(&out, &pool).unwrap();
        assert_eq!(copied, 2);
        assert!(out.join("assets/a.png").is_file());
        assert!(out.join("assets/b.png").is_file());
        assert!(!out.join("assets/c.png").exists());
    }

    #[test]
    fn test_per_directory_independence() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let pool = tmp.path().join("Files");

        write(&out.join("left/x.md"), "![s](shared.png)");
        write(&out.join("right/y.md"), "![s](shared.png)");
        write(&pool.join("shared.png"), "S");

        let copied = copy_referenced_assets(&out, &pool).unwrap();
        assert_eq!(copied, 2);
        assert!(out.join("left/assets/shared.png").is_file());
        assert!(out.join("right/assets/shared.png").is_file());
    }

    #[test]
    fn test_case_insensitive_pool_match() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let pool = tmp.path().join("Files");

        write(&out.join("n.md"), "![f](Foto.JPG)");
        write(&pool.join("foto.jpg"), "F");

        let copied = copy_referenced_assets(&out, &pool).unwrap();
        assert_eq!(copied, 1);
        assert!(out.join("assets/foto.jpg").is_file());
    }

    #[test]
    fn test_no_notes_no_assets_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let pool = tmp.path().join("Files");
        fs::create_dir_all(&out).unwrap();
        write(&pool.join("a.png"), "A");

        let copied = copy_referenced_assets(&out, &pool).unwrap();
        assert_eq!(copied, 0);
        assert!(!out.join("assets").exists());
    }

    #[test]
    fn test_missing_pool_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        write(&out.join("n.md"), "![a](a.png)");

        let copied = copy_referenced_assets(&out, tmp.path().join("nope").as_path()).unwrap();
        assert_eq!(copied, 0);
    }
}
