use super::*;

use regex::Match;

impl TocParser {
    /// Extracts entries from a dotted region that may be typeset in two
    /// columns.
    ///
    /// Each line contributes its first dotted entry; whatever lies left and
    /// right of that entry is whitespace-normalised into two column streams
    /// which are matched again once all lines are consumed, so titles that
    /// wrap onto the next line still reach their leader. Lines without an entry are
    /// split at their widest whitespace gap instead, and lines without any
    /// gap are dropped.
    pub(super) fn split_columns(&self, region: &str) -> Vec<TocEntry> {
        let mut entries = Vec::new();
        let mut left_column = String::new();
        let mut right_column = String::new();

        for line in region.lines() {
            if let Some(raw) = self.first_match(line, EntryVariant::WithDots) {
                if !raw.is_excluded() {
                    entries.push(raw.to_entry());
                }
                push_column_line(&mut left_column, &line[..raw.start]);
                push_column_line(&mut right_column, &line[raw.end..]);
                continue;
            }

            if let Some(gap) = self.widest_gap(line) {
                push_column_line(&mut left_column, &line[..gap.start()]);
                push_column_line(&mut right_column, &line[gap.end()..]);
            }
        }

        let left_entries = self.entries(&left_column, EntryVariant::WithDots);
        let right_entries = self.entries(&right_column, EntryVariant::WithDots);
        debug!(
            line_entries = entries.len(),
            left_entries = left_entries.len(),
            right_entries = right_entries.len(),
            "split toc region into columns"
        );

        entries.extend(left_entries);
        entries.extend(right_entries);
        entries
    }

    /// The widest run of two or more whitespace characters; the first one
    /// wins a tie.
    pub(super) fn widest_gap<'t>(&self, line: &'t str) -> Option<Match<'t>> {
        self.column_gap
            .find_iter(line)
            .fold(None, |widest: Option<Match<'t>>, gap| match widest {
                Some(current) if gap_width(&current) >= gap_width(&gap) => Some(current),
                _ => Some(gap),
            })
    }
}

fn gap_width(gap: &Match<'_>) -> usize {
    gap.as_str().chars().count()
}

fn push_column_line(column: &mut String, text: &str) {
    column.push_str(&squash_whitespace(text));
    column.push('\n');
}
