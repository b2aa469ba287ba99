use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::{ParseArgs, resolve_fields};
use crate::commands::pretty;
use crate::extract::{DocumentParser, ParsedDocument};
use crate::model::{ParseRunManifest, ProcessedDocument, SkippedInput};
use crate::util::{
    decode_utf8, ensure_directory, now_utc_string, read_bounded, sha256_hex, write_json_pretty,
};

pub fn run(args: ParseArgs) -> Result<()> {
    let fields = resolve_fields(&args.pretty_print);
    let parser = DocumentParser::new()?;
    ensure_directory(&args.output_folder)?;

    info!(
        inputs = args.input_files.len(),
        output_folder = %args.output_folder.display(),
        "starting parse"
    );

    let mut documents = Vec::<ProcessedDocument>::new();
    let mut skipped = Vec::<SkippedInput>::new();
    let mut stdout = io::stdout().lock();

    for (index, input_path) in args.input_files.iter().enumerate() {
        let processed = process_file(
            &parser,
            input_path,
            &args.output_folder,
            args.max_input_bytes,
        );

        match processed {
            Ok((parsed, summary)) => {
                if !fields.is_empty() {
                    if !documents.is_empty() {
                        write!(stdout, "\n\n")?;
                    }
                    writeln!(stdout, "{}. {}", index + 1, file_stem(input_path))?;
                    pretty::write_fields(&mut stdout, &parsed.record, &fields)?;
                }
                documents.push(summary);
            }
            Err(err) => {
                warn!(path = %input_path.display(), error = %err, "skipping input file");
                skipped.push(SkippedInput {
                    input_path: input_path.display().to_string(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    stdout.flush()?;

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ParseRunManifest {
            manifest_version: 1,
            generated_at: now_utc_string(),
            output_folder: args.output_folder.display().to_string(),
            input_count: args.input_files.len(),
            processed_count: documents.len(),
            documents,
            skipped,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote parse manifest");
        if manifest.processed_count == 0 {
            bail!("none of the {} input files could be parsed", manifest.input_count);
        }
    } else if documents.is_empty() {
        bail!("none of the {} input files could be parsed", args.input_files.len());
    }

    info!("parse completed");
    Ok(())
}

fn process_file(
    parser: &DocumentParser,
    input_path: &Path,
    output_folder: &Path,
    max_input_bytes: u64,
) -> Result<(ParsedDocument, ProcessedDocument)> {
    let bytes = read_bounded(input_path, max_input_bytes)?;
    let sha256 = sha256_hex(&bytes);
    let text = decode_utf8(input_path, bytes)?;

    let parsed = parser.parse(&text);
    let output_path = output_path_for(input_path, output_folder);
    write_json_pretty(&output_path, &parsed.record)
        .with_context(|| format!("failed to write record for {}", input_path.display()))?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        toc_mode = parsed.toc_mode.as_str(),
        toc_entries = parsed.record.table_of_contents.len(),
        revisions = parsed.record.revisions.len(),
        bibliography = parsed.record.bibliography.len(),
        "wrote document record"
    );

    let summary = ProcessedDocument {
        input_path: input_path.display().to_string(),
        output_path: output_path.display().to_string(),
        sha256,
        toc_entries: parsed.record.table_of_contents.len(),
        toc_mode: parsed.toc_mode.as_str().to_string(),
    };

    Ok((parsed, summary))
}

fn output_path_for(input_path: &Path, output_folder: &Path) -> PathBuf {
    output_folder.join(format!("{}.json", file_stem(input_path)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::cli::DEFAULT_MAX_INPUT_BYTES;

    const DOCUMENT: &str = "Certification Report\n\n\
        Contents\n\
        1 Introduction .................... 3\n\
        2 Evaluation ...................... 8\n\
        \n\
        The evaluation reached EAL4+ using SHA-256.\n";

    fn args(inputs: Vec<PathBuf>, output_folder: &Path) -> ParseArgs {
        ParseArgs {
            input_files: inputs,
            output_folder: output_folder.to_path_buf(),
            pretty_print: Vec::new(),
            manifest_path: Some(output_folder.join("manifest.json")),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    #[test]
    fn output_path_uses_input_stem() {
        assert_eq!(
            output_path_for(Path::new("in/report.v2.txt"), Path::new("out")),
            PathBuf::from("out/report.v2.json")
        );
    }

    #[test]
    fn run_writes_records_and_skips_unreadable_inputs() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let input = dir.path().join("report.txt");
        fs::write(&input, DOCUMENT).expect("input should be written");
        let missing = dir.path().join("missing.txt");
        let output_folder = dir.path().join("out");

        run(args(vec![input, missing], &output_folder)).expect("parse should succeed");

        let record: serde_json::Value = serde_json::from_slice(
            &fs::read(output_folder.join("report.json")).expect("record should exist"),
        )
        .expect("record should be json");
        assert_eq!(record["title"], "Certification Report");
        assert_eq!(record["versions"]["eal"][0], "EAL4+");
        assert_eq!(
            record["table_of_contents"],
            serde_json::json!([["1", "Introduction", 3], ["2", "Evaluation", 8]])
        );

        let manifest: serde_json::Value = serde_json::from_slice(
            &fs::read(output_folder.join("manifest.json")).expect("manifest should exist"),
        )
        .expect("manifest should be json");
        assert_eq!(manifest["processed_count"], 1);
        assert_eq!(manifest["documents"][0]["toc_mode"], "dotted");
        assert_eq!(manifest["skipped"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn run_fails_when_no_input_can_be_parsed() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let input = dir.path().join("large.txt");
        fs::write(&input, DOCUMENT).expect("input should be written");

        let mut args = args(vec![input], dir.path());
        args.max_input_bytes = 8;

        assert!(run(args).is_err());
        assert!(!dir.path().join("large.json").exists());
    }
}
