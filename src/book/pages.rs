//! Book content loading
//!
//! A book is a fixed, ordered set of pre-rendered pages. Two file formats are
//! accepted:
//! - plain text, pages separated by a line containing only `---`
//! - JSON, `{ "title": "...", "pages": ["...", "..."] }`

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Line that separates pages in the plain text format
pub const PAGE_SEPARATOR: &str = "---";

/// An ordered, non-empty collection of pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub pages: Vec<String>,
}

impl Book {
    /// Build a book from already split pages
    ///
    /// # Errors
    /// * `EmptyBook` - if there are no pages
    pub fn new(title: impl Into<String>, pages: Vec<String>) -> Result<Self> {
        let title = title.into();
        if pages.is_empty() {
            return Err(FolioError::EmptyBook { source_name: title });
        }
        Ok(Self { title, pages })
    }

    /// Parse the plain text format
    ///
    /// Blank pages (only whitespace between two separators) are dropped.
    pub fn from_text(title: impl Into<String>, text: &str) -> Result<Self> {
        let mut pages = Vec::new();
        let mut current = String::new();

        for line in text.lines() {
            if line.trim() == PAGE_SEPARATOR {
                push_page(&mut pages, &mut current);
            } else {
                current.push_str(line);
                current.push('\n');
            }
        }
        push_page(&mut pages, &mut current);

        Self::new(title, pages)
    }

    /// Parse the JSON format
    pub fn from_json(json: &str) -> Result<Self> {
        let book: Book = serde_json::from_str(json)?;
        Self::new(book.title, book.pages)
    }

    /// Load a book from disk, picking the format from the file extension
    ///
    /// # Errors
    /// * `BookNotFound` - if the file does not exist
    /// * `Io` - if the file exists but cannot be read as UTF-8 text
    /// * `Serialization` - if a `.json` file is malformed
    /// * `EmptyBook` - if the file contains no pages
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FolioError::BookNotFound {
                path: path.display().to_string(),
                source: Some(e),
            },
            _ => FolioError::Io(e),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let book = if is_json {
            Self::from_json(&contents)?
        } else {
            let title = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string();
            Self::from_text(title, &contents)?
        };

        log::info!(
            "Loaded \"{}\" ({} pages) from {}",
            book.title,
            book.len(),
            path.display()
        );
        Ok(book)
    }

    /// Number of pages, always at least one
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }
}

fn push_page(pages: &mut Vec<String>, current: &mut String) {
    let text = current.trim();
    if !text.is_empty() {
        pages.push(text.to_string());
    }
    current.clear();
}
