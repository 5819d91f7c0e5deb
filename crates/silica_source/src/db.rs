//! The source database: loaded HDL files and line/column resolution.

use crate::span::{FileId, Span};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A source file loaded into the database.
///
/// Stores the file's text along with precomputed line-start offsets so that
/// byte offsets can be resolved to line/column coordinates in O(log n).
pub struct SourceFile {
    /// The unique identifier for this file.
    pub id: FileId,
    /// The filesystem path (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start; the first entry is always 0.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-based (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

/// A span resolved to 1-based line/column coordinates for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The filesystem path of the source file.
    pub file_path: PathBuf,
    /// The starting line number (1-based).
    pub line: u32,
    /// The starting column number (1-based).
    pub col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path.display(), self.line, self.col)
    }
}

/// The source database, owning all loaded HDL text for one elaboration
/// session and resolving spans to human-readable coordinates.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Loads an HDL file from the filesystem and returns its [`FileId`].
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path.to_path_buf(), content))
    }

    /// Adds a source file from an in-memory string (useful for tests).
    ///
    /// The `name` is used as the file path in diagnostics.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` is invalid.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Resolves a [`Span`] to its starting line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (line, col) = file.line_col(span.start);
        ResolvedSpan {
            file_path: file.path.clone(),
            line,
            col,
        }
    }

    /// Returns the source text corresponding to a [`Span`].
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("And.hdl", "CHIP And {".to_string());
        assert_eq!(db.get_file(id).content, "CHIP And {");
    }

    #[test]
    fn line_col_resolution() {
        let mut db = SourceDb::new();
        let id = db.add_source("t.hdl", "CHIP X {\nIN a;\n}".to_string());
        let f = db.get_file(id);
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(9), (2, 1));
        assert_eq!(f.line_col(12), (2, 4));
        assert_eq!(f.line_col(15), (3, 1));
    }

    #[test]
    fn resolve_span_to_second_line() {
        let mut db = SourceDb::new();
        let id = db.add_source("t.hdl", "CHIP X {\nIN a;\n}".to_string());
        let resolved = db.resolve_span(Span::new(id, 9, 11));
        assert_eq!(resolved.line, 2);
        assert_eq!(resolved.col, 1);
        assert_eq!(format!("{resolved}"), "t.hdl:2:1");
    }

    #[test]
    fn snippet_matches_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("t.hdl", "CHIP Not {}".to_string());
        assert_eq!(db.snippet(Span::new(id, 5, 8)), "Not");
    }

    #[test]
    fn empty_file() {
        let mut db = SourceDb::new();
        let id = db.add_source("empty.hdl", String::new());
        assert_eq!(db.get_file(id).line_col(0), (1, 1));
    }

    #[test]
    fn load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Or.hdl");
        std::fs::write(&path, "CHIP Or {}").unwrap();

        let mut db = SourceDb::new();
        let id = db.load_file(&path).unwrap();
        assert_eq!(db.get_file(id).content, "CHIP Or {}");
        assert_eq!(db.get_file(id).path, path);
    }

    #[test]
    fn load_missing_file_errors() {
        let mut db = SourceDb::new();
        assert!(db.load_file(Path::new("/no/such/file.hdl")).is_err());
    }
}
