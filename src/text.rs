/// Collapses whitespace runs to single spaces and rejoins words split by a
/// trailing hyphen at a line break.
pub fn squash_whitespace(input: &str) -> String {
    let lines = input.split('\n').collect::<Vec<&str>>();
    let mut joined = String::with_capacity(input.len());
    let mut glue_to_previous = false;

    for (index, raw_line) in lines.iter().enumerate() {
        let line = if glue_to_previous {
            raw_line.trim_start()
        } else {
            raw_line
        };

        glue_to_previous = lines
            .get(index + 1)
            .map(|next| continues_hyphenated_word(line, next))
            .unwrap_or(false);

        if glue_to_previous {
            let left = line.trim_end();
            joined.push_str(left.strip_suffix('-').unwrap_or(left));
        } else {
            joined.push_str(line);
            joined.push('\n');
        }
    }

    joined.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn continues_hyphenated_word(current: &str, next: &str) -> bool {
    let Some(left) = current.trim_end().strip_suffix('-') else {
        return false;
    };

    let starts_with_lowercase = next
        .trim_start()
        .chars()
        .next()
        .map(|character| character.is_lowercase())
        .unwrap_or(false);
    if !starts_with_lowercase {
        return false;
    }

    left.chars()
        .last()
        .map(|character| character.is_alphabetic())
        .unwrap_or(false)
}

/// Byte offset of the `count`-th character, or the text length past the end.
pub fn char_offset(text: &str, count: usize) -> usize {
    text.char_indices()
        .nth(count)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// The first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..char_offset(text, max_chars)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squash_whitespace_collapses_runs_and_trims() {
        assert_eq!(squash_whitespace("  hello \t\n  world  "), "hello world");
        assert_eq!(squash_whitespace(""), "");
        assert_eq!(squash_whitespace(" \n\n "), "");
    }

    #[test]
    fn squash_whitespace_rejoins_hyphenated_line_breaks() {
        assert_eq!(
            squash_whitespace("Security Target certifi-\n   cation report"),
            "Security Target certification report"
        );
        assert_eq!(squash_whitespace("exam-  \nple"), "example");
    }

    #[test]
    fn squash_whitespace_keeps_hyphens_that_are_not_continuations() {
        assert_eq!(squash_whitespace("ISO-\n26262 part"), "ISO- 26262 part");
        assert_eq!(squash_whitespace("Part A-\nAnnex"), "Part A- Annex");
        assert_eq!(squash_whitespace("self-test"), "self-test");
    }

    #[test]
    fn truncate_chars_respects_character_boundaries() {
        assert_eq!(truncate_chars("Prüfbericht", 3), "Prü");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(char_offset("äb", 1), 2);
    }
}
