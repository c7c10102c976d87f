//! The host side of the pipeline
//!
//! [`Site`] is everything the pipeline needs from the static-site host:
//! the list of content files, reading a file as a page, and turning a page
//! path back into a file on disk. [`FsSite`] implements it over a plain
//! content directory.

use crate::error::{HoorError, Result};
use crate::handler::PageKind;
use crate::io::{absolutize, formatter, read_bytes};
use log::{debug, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A content file as discovered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
}

impl SourceFile {
    /// `path` is relative to the content root
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File extension without the dot, empty when there is none
    pub fn extension(&self) -> &str {
        self.path.extension().and_then(OsStr::to_str).unwrap_or("")
    }
}

/// A content file the host accepted as a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    path: PathBuf,
    kind: PageKind,
}

impl Page {
    pub fn new(path: impl Into<PathBuf>, kind: PageKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Path of the page's file, relative to the content root
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }
}

/// Capabilities the pipeline consumes from the static-site host
pub trait Site: Send + Sync {
    /// Every content file of the site
    fn files(&self) -> Result<Vec<SourceFile>>;

    /// Read and parse `file` as a page of the given kind
    fn read_page(&self, file: &SourceFile, kind: PageKind) -> Result<Page>;

    /// Absolute on-disk path of a page under `content_root`
    fn resolve(&self, content_root: &Path, page_path: &Path) -> Result<PathBuf> {
        absolutize(&content_root.join(page_path))
    }
}

/// A site backed by a content directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FsSite {
    content_dir: PathBuf,
}

impl FsSite {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }
}

// Dotfiles and editor backups are never content.
fn is_ignored(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name.ends_with('~')
}

impl Site for FsSite {
    fn files(&self) -> Result<Vec<SourceFile>> {
        if !self.content_dir.is_dir() {
            return Err(HoorError::discovery(&self.content_dir, "not a directory"));
        }

        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry.file_name()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(HoorError::discovery(&self.content_dir, e.to_string()));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.content_dir) {
                files.push(SourceFile::new(relative));
            }
        }

        debug!("Discovered {} files in {}", files.len(), self.content_dir.display());
        Ok(files)
    }

    fn read_page(&self, file: &SourceFile, kind: PageKind) -> Result<Page> {
        let path = self.content_dir.join(file.path());
        let bytes = read_bytes(&path)?;
        formatter::parse(&bytes).map_err(|e| e.at(&path))?;
        Ok(Page::new(file.path(), kind))
    }
}
