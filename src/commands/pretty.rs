use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;

use crate::cli::RecordField;
use crate::model::{DocumentRecord, Revision, Versions};
use crate::toc::TocEntry;

const COLUMN_SEPARATOR: &str = "    ";

/// Prints the selected fields of one record, each under its own heading.
pub fn write_fields<W: Write>(
    output: &mut W,
    record: &DocumentRecord,
    fields: &[RecordField],
) -> Result<()> {
    for (index, field) in fields.iter().enumerate() {
        if index != 0 {
            writeln!(output)?;
        }
        writeln!(output, "{}:", field.heading())?;

        match field {
            RecordField::Title => writeln!(output, "{}", record.title)?,
            RecordField::Versions => write_versions(output, &record.versions)?,
            RecordField::TableOfContents => {
                write_table_of_contents(output, &record.table_of_contents)?
            }
            RecordField::Revisions => write_revisions(output, &record.revisions)?,
            RecordField::Bibliography => write_bibliography(output, &record.bibliography)?,
        }
    }

    Ok(())
}

fn write_versions<W: Write>(output: &mut W, versions: &Versions) -> Result<()> {
    let mut fields = versions.fields();
    fields.sort_by_key(|(name, _)| *name);
    let fields = fields
        .into_iter()
        .map(|(name, values)| (version_label(name), values))
        .collect::<Vec<(String, &[String])>>();

    let label_width = fields
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    for (label, values) in fields {
        writeln!(
            output,
            "{label:>label_width$}:{COLUMN_SEPARATOR}{}",
            values.join(", ")
        )?;
    }

    Ok(())
}

/// `eal` becomes `EAL`, `global_platform` becomes `GlobalPlatform`.
fn version_label(name: &str) -> String {
    if name.len() == 3 {
        return name.to_ascii_uppercase();
    }

    name.split('_')
        .map(|word| {
            let mut characters = word.chars();
            match characters.next() {
                Some(first) => first.to_uppercase().chain(characters).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn write_table_of_contents<W: Write>(output: &mut W, entries: &[TocEntry]) -> Result<()> {
    let id_width = entries.iter().map(|entry| entry.id.len()).max().unwrap_or(0);
    let title_width = entries
        .iter()
        .map(|entry| entry.title.chars().count())
        .max()
        .unwrap_or(0)
        + 4;
    let page_width = entries
        .iter()
        .map(|entry| entry.page.to_string().len())
        .max()
        .unwrap_or(0);

    for entry in entries {
        let page = entry.page.to_string();
        let leader_width = title_width + (page_width - page.len());
        let title = format!("{} ", entry.title);
        writeln!(
            output,
            "{:<id_width$}    {title:.<leader_width$} {page}",
            entry.id
        )?;
    }

    Ok(())
}

fn write_revisions<W: Write>(output: &mut W, revisions: &[Revision]) -> Result<()> {
    if revisions.is_empty() {
        return Ok(());
    }

    let version_width = column_width("version", revisions.iter().map(|r| r.version.as_str()));
    let date_width = column_width("date", revisions.iter().map(|r| r.date.as_str()));

    writeln!(
        output,
        "{:>version_width$}{COLUMN_SEPARATOR}{:<date_width$}{COLUMN_SEPARATOR}description",
        "version", "date"
    )?;
    for revision in revisions {
        writeln!(
            output,
            "{:>version_width$}{COLUMN_SEPARATOR}{:<date_width$}{COLUMN_SEPARATOR}{}",
            revision.version, revision.date, revision.description
        )?;
    }

    Ok(())
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

fn write_bibliography<W: Write>(
    output: &mut W,
    bibliography: &BTreeMap<String, String>,
) -> Result<()> {
    let mut items = bibliography.iter().collect::<Vec<(&String, &String)>>();
    let numeric_keys = items
        .iter()
        .map(|(key, _)| numeric_key(key))
        .collect::<Option<Vec<Vec<u64>>>>();
    if let Some(keys) = numeric_keys {
        let mut keyed = keys.into_iter().zip(items).collect::<Vec<_>>();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        items = keyed.into_iter().map(|(_, item)| item).collect();
    }

    let label_width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, text) in items {
        writeln!(output, "{key:<label_width$}{COLUMN_SEPARATOR}{text}")?;
    }

    Ok(())
}

/// `[12]` or `[3-5]` as numbers; `None` for any other label.
fn numeric_key(key: &str) -> Option<Vec<u64>> {
    let inner = key.strip_prefix('[')?.strip_suffix(']')?;
    inner
        .split(['-', '_'])
        .map(|part| part.parse::<u64>().ok())
        .collect()
}
