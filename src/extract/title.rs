use anyhow::{Context, Result};
use regex::Regex;

use crate::text::{squash_whitespace, truncate_chars};

/// Titles are only searched for in the document head.
const TITLE_SEARCH_CHARS: usize = 1000;

#[derive(Debug)]
pub struct TitleParser {
    for_from: Regex,
    version_block: Regex,
    leading_block: Regex,
    blank_enclosed: Regex,
    leading_lines: Regex,
}

impl TitleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            for_from: Regex::new(r"for\s\s+(.*?)\s\s+from")
                .context("failed to compile title for/from regex")?,
            version_block: Regex::new(r"Version [0-9]+-[0-9]+\s*((?:[^\n]+\n)*)")
                .context("failed to compile title version block regex")?,
            leading_block: Regex::new(r"(?:[^\n]+\n)+")
                .context("failed to compile title leading block regex")?,
            blank_enclosed: Regex::new(r"(?s)\n\n([^\n].+?\n)\n\n")
                .context("failed to compile title paragraph regex")?,
            leading_lines: Regex::new(r"^(?:[^\n]+\n)*")
                .context("failed to compile title leading lines regex")?,
        })
    }

    pub fn parse(&self, text: &str) -> String {
        let head = truncate_chars(text, TITLE_SEARCH_CHARS);

        // Cover pages of the form "... for   <title>   from <vendor>".
        let flattened = head.replace('\n', " ");
        if let Some(title) = self.for_from.captures(&flattened).and_then(|c| c.get(1)) {
            return squash_whitespace(title.as_str());
        }

        squash_whitespace(self.find_block(head))
    }

    fn find_block<'t>(&self, head: &'t str) -> &'t str {
        if let Some(title) = self.version_block.captures(head).and_then(|c| c.get(1)) {
            return title.as_str();
        }

        if head.contains("NXP ") {
            if let Some(block) = self.leading_block.find(head) {
                return block.as_str();
            }
        }

        if let Some(title) = self.blank_enclosed.captures(head).and_then(|c| c.get(1)) {
            return title.as_str();
        }

        self.leading_lines
            .find(head)
            .map(|block| block.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TitleParser {
        TitleParser::new().expect("title patterns should compile")
    }

    #[test]
    fn for_from_cover_page_wins() {
        let text = "Certification Report\nfor\n  SmartCard OS v2.1\n\n  from\nACME Corp\n";
        assert_eq!(parser().parse(text), "SmartCard OS v2.1");
    }

    #[test]
    fn version_block_is_used_for_numbered_reports() {
        let text = "Certification Report\nVersion 2018-2\nACME Secure Element\nwith Crypto Library\n\nSponsor: ACME\n";
        assert_eq!(parser().parse(text), "ACME Secure Element with Crypto Library");
    }

    #[test]
    fn paragraph_between_blank_lines_is_used() {
        let text = "Header line\n\nSecure Microcontroller Platform\n\n\nrest of the document\n";
        assert_eq!(parser().parse(text), "Secure Microcontroller Platform");
    }

    #[test]
    fn leading_lines_are_the_last_resort() {
        let text = "Single line title\nsecond line\n";
        assert_eq!(parser().parse(text), "Single line title second line");
        assert_eq!(parser().parse(""), "");
    }
}
