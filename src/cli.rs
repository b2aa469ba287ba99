use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Inputs larger than this are skipped unless overridden.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "certmeta",
    version,
    about = "Regex-based metadata extraction for security certification documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a JSON record for each plaintext document.
    Parse(ParseArgs),
    /// Print the table of contents of one plaintext document.
    Toc(TocArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Plaintext renditions of the documents.
    #[arg(required = true)]
    pub input_files: Vec<PathBuf>,

    /// Existing folder receiving `<file stem>.json` for every input.
    #[arg(short, long, default_value = ".")]
    pub output_folder: PathBuf,

    /// Comma-separated fields to print after each document is parsed.
    #[arg(
        short,
        long = "pretty-print",
        value_enum,
        value_delimiter = ',',
        value_name = "FIELD_LIST"
    )]
    pub pretty_print: Vec<FieldSelector>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub max_input_bytes: u64,
}

#[derive(Args, Debug, Clone)]
pub struct TocArgs {
    pub input_file: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub max_input_bytes: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FieldSelector {
    #[value(alias = "t")]
    Title,
    #[value(alias = "v")]
    Versions,
    #[value(name = "table_of_contents", alias = "toc")]
    TableOfContents,
    #[value(alias = "r")]
    Revisions,
    #[value(alias = "b")]
    Bibliography,
    All,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecordField {
    Title,
    Versions,
    TableOfContents,
    Revisions,
    Bibliography,
}

impl RecordField {
    pub const ALL: [RecordField; 5] = [
        RecordField::Title,
        RecordField::Versions,
        RecordField::TableOfContents,
        RecordField::Revisions,
        RecordField::Bibliography,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            RecordField::Title => "Title",
            RecordField::Versions => "Versions",
            RecordField::TableOfContents => "Table of Contents",
            RecordField::Revisions => "Revisions",
            RecordField::Bibliography => "Bibliography",
        }
    }
}

/// Expands `all`, keeping the first occurrence of every field.
pub fn resolve_fields(selectors: &[FieldSelector]) -> Vec<RecordField> {
    let mut fields = Vec::<RecordField>::new();

    for selector in selectors {
        let expanded = match selector {
            FieldSelector::Title => vec![RecordField::Title],
            FieldSelector::Versions => vec![RecordField::Versions],
            FieldSelector::TableOfContents => vec![RecordField::TableOfContents],
            FieldSelector::Revisions => vec![RecordField::Revisions],
            FieldSelector::Bibliography => vec![RecordField::Bibliography],
            FieldSelector::All => RecordField::ALL.to_vec(),
        };

        for field in expanded {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(argv: &[&str]) -> ParseArgs {
        match Cli::try_parse_from(argv.iter().copied()).expect("arguments should parse").command {
            Commands::Parse(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_defaults_apply() {
        let args = parse_args(&["certmeta", "parse", "a.txt", "b.txt"]);
        assert_eq!(args.input_files.len(), 2);
        assert_eq!(args.output_folder, PathBuf::from("."));
        assert!(args.pretty_print.is_empty());
        assert_eq!(args.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
    }

    #[test]
    fn pretty_print_accepts_short_and_long_names() {
        let args = parse_args(&["certmeta", "parse", "a.txt", "-p", "toc,title,v,toc"]);
        assert_eq!(
            resolve_fields(&args.pretty_print),
            vec![
                RecordField::TableOfContents,
                RecordField::Title,
                RecordField::Versions,
            ]
        );

        let args = parse_args(&["certmeta", "parse", "a.txt", "--pretty-print", "b,all"]);
        assert_eq!(
            resolve_fields(&args.pretty_print),
            vec![
                RecordField::Bibliography,
                RecordField::Title,
                RecordField::Versions,
                RecordField::TableOfContents,
                RecordField::Revisions,
            ]
        );
    }

    #[test]
    fn unknown_fields_and_missing_inputs_are_rejected() {
        assert!(Cli::try_parse_from(["certmeta", "parse", "a.txt", "-p", "summary"]).is_err());
        assert!(Cli::try_parse_from(["certmeta", "parse"]).is_err());
    }
}
