//! Source discovery for mdpress
//!
//! Expands command-line paths into the Markdown files to render and maps
//! each one to its HTML output location.

use log::{trace, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as Markdown sources.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A Markdown file together with the root it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Directory given on the command line, or the file's parent
    pub root: PathBuf,
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expand files and directories into Markdown sources, in a stable order.
///
/// Directories are walked recursively; explicit files are taken as given.
/// Paths that do not exist are skipped with a warning.
pub fn collect_markdown_files(paths: &[PathBuf]) -> Vec<SourceFile> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.into_path())
                .filter(|entry| entry.is_file() && is_markdown(entry))
                .collect();
            found.sort();
            files.extend(found.into_iter().map(|file| SourceFile {
                path: file,
                root: path.clone(),
            }));
        } else if path.is_file() {
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            files.push(SourceFile {
                path: path.clone(),
                root,
            });
        } else {
            warn!("Skipping missing path: {}", path.display());
        }
    }

    trace!("Found {} markdown files to process", files.len());
    files
}

/// Where the rendered page for `source` is written.
///
/// Without an output directory the page sits next to its source. With one,
/// the source's position below its root is mirrored inside it.
pub fn output_path(source: &SourceFile, out_dir: Option<&Path>) -> PathBuf {
    let html = source.path.with_extension("html");
    match out_dir {
        Some(dir) => {
            let relative = html
                .strip_prefix(&source.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| html.file_name().map(PathBuf::from).unwrap_or_default());
            dir.join(relative)
        }
        None => html,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
