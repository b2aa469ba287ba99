use std::ops::Range;

const CANDIDATE_MIN_CHARS: usize = 20;
const DOT_DENSITY_THRESHOLD: f64 = 0.1;
/// Candidates further than this many times the candidate count from the
/// median line are outliers.
const OUTLIER_SPREAD_FACTOR: f64 = 1.5;
/// Lines kept on each side of the candidate cluster.
const REGION_MARGIN_LINES: usize = 30;

/// A run of whole lines borrowed from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DottedRegion<'a> {
    pub text: &'a str,
    pub first_line: usize,
    pub last_line: usize,
}

/// Finds the block of lines around the densest cluster of dot-leader lines.
///
/// Returns `None` when no line is long and dotted enough; callers then fall
/// back to dot-less matching.
pub fn find_dotted_region(text: &str) -> Option<DottedRegion<'_>> {
    let lines = line_spans(text);

    let candidates = lines
        .iter()
        .enumerate()
        .filter(|(_, span)| is_dot_leader_line(&text[span.start..span.end]))
        .map(|(index, _)| index)
        .collect::<Vec<usize>>();
    if candidates.is_empty() {
        return None;
    }

    let median = median_index(&candidates);
    let max_distance = OUTLIER_SPREAD_FACTOR * candidates.len() as f64;

    let (first, last) = candidates
        .iter()
        .copied()
        .filter(|&index| (index as f64 - median).abs() <= max_distance)
        .fold(None, |bounds: Option<(usize, usize)>, index| match bounds {
            Some((first, last)) => Some((first.min(index), last.max(index))),
            None => Some((index, index)),
        })?;

    let first_line = first.saturating_sub(REGION_MARGIN_LINES);
    let last_line = (last + REGION_MARGIN_LINES).min(lines.len() - 1);

    Some(DottedRegion {
        text: &text[lines[first_line].start..lines[last_line].end],
        first_line,
        last_line,
    })
}

fn is_dot_leader_line(line: &str) -> bool {
    let char_count = line.chars().count();
    if char_count < CANDIDATE_MIN_CHARS {
        return false;
    }

    let dot_count = line.chars().filter(|&character| character == '.').count();
    dot_count as f64 / char_count as f64 >= DOT_DENSITY_THRESHOLD
}

/// Byte ranges of each line without its terminator, as `str::lines` splits.
fn line_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0usize;

    for line in text.split_inclusive('\n') {
        let content = line.strip_suffix('\n').unwrap_or(line);
        let content = content.strip_suffix('\r').unwrap_or(content);
        spans.push(start..start + content.len());
        start += line.len();
    }

    spans
}

fn median_index(sorted: &[usize]) -> f64 {
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[middle] as f64
    } else {
        (sorted[middle - 1] + sorted[middle]) as f64 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_leader_line_requires_length_and_density() {
        assert!(is_dot_leader_line("1 Introduction ........ 3"));
        assert!(!is_dot_leader_line("1 Intro ...... 3"));
        assert!(!is_dot_leader_line(
            "This sentence is long enough but has one period."
        ));
    }

    #[test]
    fn line_spans_strip_terminators() {
        let text = "ab\r\ncd\n\nef";
        let spans = line_spans(text);
        let lines = spans
            .iter()
            .map(|span| &text[span.clone()])
            .collect::<Vec<&str>>();
        assert_eq!(lines, vec!["ab", "cd", "", "ef"]);
    }

    #[test]
    fn median_index_averages_even_counts() {
        assert_eq!(median_index(&[4, 7, 9]), 7.0);
        assert_eq!(median_index(&[2, 3, 10, 11]), 6.5);
    }
}
