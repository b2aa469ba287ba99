use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use regex::Regex;

use crate::text::{squash_whitespace, truncate_chars};

/// Below this many numeric keys, any bracketed label is treated as a key.
const MIN_NUMERIC_KEYS: usize = 5;
const DEFINITION_MAX_CHARS: usize = 250;

#[derive(Debug)]
pub struct BibliographyParser {
    numeric_key: Regex,
    any_key: Regex,
}

impl BibliographyParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            numeric_key: Regex::new(r"\[[0-9]*-?[0-9]*?\]")
                .context("failed to compile numeric citation key regex")?,
            any_key: Regex::new(r"\[.*?\]").context("failed to compile citation key regex")?,
        })
    }

    pub fn parse(&self, text: &str) -> BTreeMap<String, String> {
        let mut keys = collect_keys(&self.numeric_key, text);
        if keys.len() < MIN_NUMERIC_KEYS {
            keys = collect_keys(&self.any_key, text);
        }

        keys.into_iter()
            .filter_map(|key| {
                let definition = last_definition(text, key)?;
                Some((key.to_string(), definition))
            })
            .collect()
    }
}

fn collect_keys<'t>(pattern: &Regex, text: &'t str) -> BTreeSet<&'t str> {
    pattern.find_iter(text).map(|found| found.as_str()).collect()
}

/// Text after the last `key` that is followed by a space, up to the next `[`.
fn last_definition(text: &str, key: &str) -> Option<String> {
    text.rmatch_indices(key).find_map(|(offset, _)| {
        let rest = &text[offset + key.len()..];
        let definition = rest.strip_prefix(' ')?.trim_start_matches(' ');
        let definition = definition
            .split_once('[')
            .map(|(before, _)| before)
            .unwrap_or(definition);
        Some(squash_whitespace(truncate_chars(
            definition,
            DEFINITION_MAX_CHARS,
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BibliographyParser {
        BibliographyParser::new().expect("bibliography patterns should compile")
    }

    #[test]
    fn numeric_keys_take_their_last_definition() {
        let text = "See [1] and [2]. Also [3], [4].\n\n\
            Bibliography\n\
            [1] Common Criteria Part 1,\n    version 3.1\n\
            [2] Common Criteria Part 2\n\
            [3] CEM\n\
            [4]\n\
            [5] AIS 31\n";

        let bibliography = parser().parse(text);
        assert_eq!(bibliography.len(), 4);
        assert_eq!(bibliography["[1]"], "Common Criteria Part 1, version 3.1");
        assert_eq!(bibliography["[2]"], "Common Criteria Part 2");
        assert_eq!(bibliography["[3]"], "CEM");
        assert_eq!(bibliography["[5]"], "AIS 31");
        assert!(!bibliography.contains_key("[4]"));
    }

    #[test]
    fn labelled_keys_are_used_when_numeric_keys_are_scarce() {
        let text = "As defined in [CC] and [AIS31].\n[CC] Common Criteria\n[AIS31] Functionality classes\n";

        let bibliography = parser().parse(text);
        assert_eq!(bibliography["[CC]"], "Common Criteria");
        assert_eq!(bibliography["[AIS31]"], "Functionality classes");
    }

    #[test]
    fn long_definitions_are_truncated() {
        let text = format!("[X] {}", "word ".repeat(100));
        let bibliography = parser().parse(&text);
        assert!(bibliography["[X]"].len() <= DEFINITION_MAX_CHARS);
    }
}
