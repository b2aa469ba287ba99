use super::*;

use regex::Captures;

/// Raw titles longer than this are not accepted as entries.
const TITLE_MAX_CHARS: usize = 80;

// A caption keyword or any stray non-space, non-digit character directly
// before the identifier. Genuine entries start their line with the id.
const EXCLUSION_MARKER: &str = r"(?P<marker>Table |Figure |Fig\.|Fig |Tab\.|Tab |[^\s1-9])?";
const SECTION_ID: &str = r"(?P<id>[A-D1-9][0-9]?(?:\.[0-9]{1,2})*\.?)";
const ID_TITLE_GAP: &str = r" {1,20}";
// One title character after the first, with the spaces and lone dots before
// it. Titles may wrap onto the next line but never hold a dot leader (`..` or
// `. .`) or a gap of six or more spaces; either one means a different column.
const DOTTED_TITLE_UNIT: &str = r" {0,5}(?:\.(?: {2,5}\.)* {0,5})?[^. ]";
const DOT_LEADER: &str = r" {0,5}\.(?: ?\.)+ ?";
const GAPPED_TITLE: &str = r"(?P<title>.{0,80})";
const PAGE_GAP: &str = r" {5,}";
const PAGE: &str = r"(?P<page>[0-9]+)";

pub(super) fn with_dots_pattern() -> String {
    // Every unit consumes a character, which bounds how far a rejected
    // candidate is scanned.
    let title = format!(
        "(?P<title>[A-Z](?:{DOTTED_TITLE_UNIT}){{0,{}}})",
        TITLE_MAX_CHARS - 1
    );
    format!("{EXCLUSION_MARKER}{SECTION_ID}{ID_TITLE_GAP}{title}{DOT_LEADER}{PAGE}")
}

pub(super) fn without_dots_pattern() -> String {
    format!("{EXCLUSION_MARKER}{SECTION_ID}{ID_TITLE_GAP}{GAPPED_TITLE}{PAGE_GAP}{PAGE}")
}

/// One pattern hit, borrowed from the text it was found in.
#[derive(Debug, Clone, Copy)]
pub(super) struct RawMatch<'t> {
    pub(super) start: usize,
    pub(super) id_end: usize,
    pub(super) end: usize,
    pub(super) exclusion_marker: &'t str,
    pub(super) id: &'t str,
    pub(super) title: &'t str,
    pub(super) page: &'t str,
}

impl<'t> RawMatch<'t> {
    fn from_captures(captures: &Captures<'t>) -> Option<Self> {
        let whole = captures.get(0)?;
        let group = |name: &str| captures.name(name).map(|m| m.as_str()).unwrap_or("");

        let id = captures.name("id")?;

        Some(Self {
            start: whole.start(),
            id_end: id.end(),
            end: whole.end(),
            exclusion_marker: group("marker"),
            id: id.as_str(),
            title: group("title"),
            page: captures.name("page")?.as_str(),
        })
    }

    pub(super) fn is_excluded(&self) -> bool {
        !self.exclusion_marker.is_empty()
    }

    pub(super) fn to_entry(self) -> TocEntry {
        let id = self.id.trim();
        let id = id.strip_suffix('.').unwrap_or(id);

        // Digit runs too long for u64 still count as an entry.
        let page = self.page.parse::<u64>().unwrap_or(u64::MAX);

        TocEntry::new(id, squash_whitespace(self.title), page)
    }
}

impl TocParser {
    fn pattern(&self, variant: EntryVariant) -> &Regex {
        match variant {
            EntryVariant::WithDots => &self.with_dots,
            EntryVariant::WithoutDots => &self.without_dots,
        }
    }

    /// Leftmost acceptable match at or after byte offset `from`.
    fn next_match<'t>(
        &self,
        text: &'t str,
        mut from: usize,
        variant: EntryVariant,
    ) -> Option<RawMatch<'t>> {
        let pattern = self.pattern(variant);

        while from <= text.len() {
            let captures = pattern.captures_at(text, from)?;
            let raw = RawMatch::from_captures(&captures)?;
            if raw.title.chars().count() <= TITLE_MAX_CHARS {
                return Some(raw);
            }
            // Candidates starting inside the rejected id share its title.
            from = raw.id_end;
        }

        None
    }

    pub(super) fn first_match<'t>(
        &self,
        text: &'t str,
        variant: EntryVariant,
    ) -> Option<RawMatch<'t>> {
        self.next_match(text, 0, variant)
    }

    /// Every non-overlapping match, excluded ones included.
    pub(super) fn match_entries<'t>(
        &self,
        text: &'t str,
        variant: EntryVariant,
    ) -> Vec<RawMatch<'t>> {
        let mut matches = Vec::new();
        let mut from = 0usize;

        while let Some(raw) = self.next_match(text, from, variant) {
            from = raw.end;
            matches.push(raw);
        }

        matches
    }

    pub(super) fn entries(&self, text: &str, variant: EntryVariant) -> Vec<TocEntry> {
        self.match_entries(text, variant)
            .into_iter()
            .filter(|raw| !raw.is_excluded())
            .map(RawMatch::to_entry)
            .collect()
    }
}
