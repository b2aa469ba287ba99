use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Revision;
use crate::text::truncate_chars;

/// Upper bound on the history body when no four-newline gap ends it.
const HISTORY_BODY_MAX_CHARS: usize = 5000;

const VERSION: &str = r"v?([0-9.]+)";
const DATE: &str = r"([0-9A-Za-z.\-]+)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLayout {
    VersionFirst,
    DateFirst,
}

#[derive(Debug)]
pub struct RevisionParser {
    revision_date_header: Regex,
    date_version_header: Regex,
    version_description_header: Regex,
    history_heading: Regex,
    body_end: Regex,
    version_first_row: Regex,
    date_first_row: Regex,
}

impl RevisionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            revision_date_header: Regex::new(r"(?im)^\w*rev\w*\s+date\s+.*description")
                .context("failed to compile revision/date header regex")?,
            date_version_header: Regex::new(r"(?i)date\s+ver\w*\s+.*description")
                .context("failed to compile date/version header regex")?,
            version_description_header: Regex::new(r"(?i)version\s\s+description")
                .context("failed to compile version/description header regex")?,
            history_heading: Regex::new(
                r"REVISION HISTORY|Revision [Hh]istory|VERSION CONTROL|Version [Cc]ontrol",
            )
            .context("failed to compile revision history heading regex")?,
            body_end: Regex::new(r"\n{4}").context("failed to compile history end regex")?,
            version_first_row: Regex::new(&format!(r"\s+{VERSION}\s+{DATE}?[\s:]\s+(.*)"))
                .context("failed to compile version-first row regex")?,
            date_first_row: Regex::new(&format!(r"\s+{DATE}?\s+{VERSION}[\s:]\s+(.*)"))
                .context("failed to compile date-first row regex")?,
        })
    }

    pub fn parse(&self, text: &str) -> Vec<Revision> {
        let Some((body_start, layout)) = self.locate_history(text) else {
            return Vec::new();
        };

        self.parse_rows(&text[body_start..], layout)
    }

    fn locate_history(&self, text: &str) -> Option<(usize, RowLayout)> {
        if let Some(header) = self.revision_date_header.find(text) {
            return Some((header.end(), RowLayout::VersionFirst));
        }
        if let Some(header) = self.date_version_header.find(text) {
            return Some((header.end(), RowLayout::DateFirst));
        }
        if let Some(header) = self.version_description_header.find(text) {
            return Some((header.end(), RowLayout::VersionFirst));
        }

        // The first heading is usually the table-of-contents line.
        let headings = self.history_heading.find_iter(text).collect::<Vec<_>>();
        headings
            .get(1)
            .or_else(|| headings.first())
            .map(|heading| (heading.end(), RowLayout::VersionFirst))
    }

    fn parse_rows(&self, body: &str, layout: RowLayout) -> Vec<Revision> {
        let body = match self.body_end.find(body) {
            Some(end) => &body[..end.end()],
            None => truncate_chars(body, HISTORY_BODY_MAX_CHARS),
        };

        let (pattern, version_group, date_group) = match layout {
            RowLayout::VersionFirst => (&self.version_first_row, 1, 2),
            RowLayout::DateFirst => (&self.date_first_row, 2, 1),
        };

        pattern
            .captures_iter(body)
            .map(|captures| {
                let group = |index: usize| captures.get(index).map(|m| m.as_str()).unwrap_or("");
                Revision {
                    version: group(version_group).to_string(),
                    date: clean_date(group(date_group)),
                    // Author columns precede the description; keep the last cell.
                    description: group(3).rsplit("  ").next().unwrap_or("").to_string(),
                }
            })
            .collect()
    }
}

/// Rewrites `DD.MM.YYYY`-like dates as `YYYY-MM-DD`, leaving anything else
/// as written.
fn clean_date(date: &str) -> String {
    let mut parts = date.split(['.', '-']).collect::<Vec<&str>>();
    if parts.len() != 3 {
        return date.to_string();
    }

    let Ok(leading) = parts[0].parse::<u32>() else {
        return date.to_string();
    };
    if leading < 1000 {
        parts.reverse();
    }

    let month = month_number(parts[1]).unwrap_or(parts[1]);
    format!("{}-{}-{}", parts[0], month, parts[2])
}

fn month_number(value: &str) -> Option<&'static str> {
    let prefix = value.get(..3)?.to_ascii_lowercase();
    let number = match prefix.as_str() {
        "jan" => "01",
        "feb" => "02",
        "mar" => "03",
        "apr" => "04",
        "may" => "05",
        "jun" => "06",
        "jul" => "07",
        "aug" => "08",
        "sep" => "09",
        "oct" => "10",
        "nov" => "11",
        "dec" => "12",
        _ => return None,
    };
    Some(number)
}
