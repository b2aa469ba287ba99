//! Table-of-contents extraction from the plaintext rendition of a
//! certification document.
//!
//! The engine first looks for a cluster of dot-leader lines. When one is
//! found, entries are matched line by line inside that region and the
//! leftover text on each side of a match is re-matched as a separate
//! column. Documents without dot leaders fall back to matching
//! whitespace-gapped entries in the head and tail of the text. The
//! combined entries are then ordered by section identifier.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::text::{char_offset, squash_whitespace};

mod columns;
mod locator;
mod matcher;
mod sort;

pub use locator::find_dotted_region;
pub use sort::sort_entries;

use matcher::*;

/// Share of the document, by characters, scanned at each end in dot-less mode.
const EDGE_FRACTION: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub page: u64,
}

impl TocEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, page: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            page,
        }
    }
}

// Serialised as an `[id, title, page]` triple.
impl Serialize for TocEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.id, &self.title, self.page).serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocMode {
    Dotted,
    Dotless,
}

impl TocMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TocMode::Dotted => "dotted",
            TocMode::Dotless => "dotless",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TocExtraction {
    pub mode: TocMode,
    pub entries: Vec<TocEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryVariant {
    WithDots,
    WithoutDots,
}

/// Holds the compiled entry patterns; build once and share across documents.
#[derive(Debug)]
pub struct TocParser {
    with_dots: Regex,
    without_dots: Regex,
    column_gap: Regex,
}

impl TocParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            with_dots: Regex::new(&with_dots_pattern())
                .context("failed to compile dotted toc entry regex")?,
            without_dots: Regex::new(&without_dots_pattern())
                .context("failed to compile gapped toc entry regex")?,
            column_gap: Regex::new(r"\s{2,}").context("failed to compile column gap regex")?,
        })
    }

    pub fn parse(&self, text: &str) -> Vec<TocEntry> {
        self.extract(text).entries
    }

    pub fn extract(&self, text: &str) -> TocExtraction {
        let (mode, entries) = match find_dotted_region(text) {
            Some(region) => {
                debug!(
                    first_line = region.first_line,
                    last_line = region.last_line,
                    "located dotted toc region"
                );
                (TocMode::Dotted, self.split_columns(region.text))
            }
            None => {
                let (head, tail) = edge_slices(text);
                debug!(
                    head_bytes = head.len(),
                    tail_bytes = tail.len(),
                    "no dotted toc region, matching document edges"
                );
                let mut entries = self.entries(head, EntryVariant::WithoutDots);
                entries.extend(self.entries(tail, EntryVariant::WithoutDots));
                (TocMode::Dotless, entries)
            }
        };

        let entries = sort_entries(entries);
        debug!(mode = mode.as_str(), entries = entries.len(), "toc extracted");

        TocExtraction { mode, entries }
    }
}

fn edge_slices(text: &str) -> (&str, &str) {
    let char_count = text.chars().count();
    let edge_chars = (char_count as f64 * EDGE_FRACTION) as usize;

    let head_end = char_offset(text, edge_chars);
    let tail_start = char_offset(text, char_count - edge_chars);

    (&text[..head_end], &text[tail_start..])
}
