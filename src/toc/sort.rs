use super::TocEntry;

/// Annex letters rank after every numeric chapter: `A` maps to 100.
const ANNEX_KEY_BASE: u64 = 100;
/// Tokens that are neither numbers nor a single annex letter sort last.
const MALFORMED_TOKEN_KEY: u64 = u64::MAX;

/// Orders entries by their hierarchical section identifier.
///
/// Without annexes the whole list is sorted. When any entry sits under an
/// annex letter, the list is cut into runs that each begin at a bare annex
/// heading (`A`, `B`, ...). Every run keeps its heading in front and sorts the
/// rest; runs stay in discovery order. The sort is stable and idempotent.
pub fn sort_entries(mut entries: Vec<TocEntry>) -> Vec<TocEntry> {
    if !entries.iter().any(has_annex_top_level) {
        entries.sort_by_cached_key(|entry| sort_key(&entry.id));
        return entries;
    }

    let mut sorted = Vec::with_capacity(entries.len());
    let mut run = Vec::new();

    for entry in entries {
        if is_annex_heading(&entry.id) && !run.is_empty() {
            sorted.extend(sort_run(std::mem::take(&mut run)));
        }
        run.push(entry);
    }
    sorted.extend(sort_run(run));

    sorted
}

fn sort_run(mut run: Vec<TocEntry>) -> Vec<TocEntry> {
    let body_start = match run.first() {
        Some(first) if is_annex_heading(&first.id) => 1,
        _ => 0,
    };
    run[body_start..].sort_by_cached_key(|entry| sort_key(&entry.id));
    run
}

pub(super) fn sort_key(id: &str) -> Vec<u64> {
    id.split('.').map(token_key).collect()
}

fn token_key(token: &str) -> u64 {
    if !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit()) {
        return token.parse::<u64>().unwrap_or(MALFORMED_TOKEN_KEY);
    }

    let mut characters = token.chars();
    match (characters.next(), characters.next()) {
        (Some(letter), None) if letter.is_ascii_uppercase() => {
            u64::from(letter as u8 - b'A') + ANNEX_KEY_BASE
        }
        _ => MALFORMED_TOKEN_KEY,
    }
}

fn has_annex_top_level(entry: &TocEntry) -> bool {
    entry
        .id
        .split('.')
        .next()
        .map(is_alphabetic)
        .unwrap_or(false)
}

fn is_annex_heading(id: &str) -> bool {
    is_alphabetic(id)
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|character| character.is_ascii_alphabetic())
}
