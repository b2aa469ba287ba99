use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::TocArgs;
use crate::commands::pretty;
use crate::toc::TocParser;
use crate::util::{decode_utf8, read_bounded};

pub fn run(args: TocArgs) -> Result<()> {
    let bytes = read_bounded(&args.input_file, args.max_input_bytes)?;
    let text = decode_utf8(&args.input_file, bytes)?;

    let parser = TocParser::new()?;
    let entries = parser.parse(&text);
    info!(
        path = %args.input_file.display(),
        entries = entries.len(),
        "table of contents extracted"
    );

    let mut output = io::BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut output, &entries)
            .context("failed to serialize table of contents json output")?;
        writeln!(output)?;
    } else {
        pretty::write_table_of_contents(&mut output, &entries)?;
    }
    output.flush()?;

    Ok(())
}
