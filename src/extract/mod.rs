//! Assembles the full metadata record of one document.

use anyhow::Result;

use crate::model::DocumentRecord;
use crate::toc::{TocMode, TocParser};

mod bibliography;
mod revisions;
mod title;
mod versions;

use bibliography::BibliographyParser;
use revisions::RevisionParser;
use title::TitleParser;
use versions::VersionParser;

#[derive(Debug)]
pub struct ParsedDocument {
    pub record: DocumentRecord,
    pub toc_mode: TocMode,
}

/// All field parsers with their patterns compiled once.
#[derive(Debug)]
pub struct DocumentParser {
    title: TitleParser,
    versions: VersionParser,
    toc: TocParser,
    revisions: RevisionParser,
    bibliography: BibliographyParser,
}

impl DocumentParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: TitleParser::new()?,
            versions: VersionParser::new()?,
            toc: TocParser::new()?,
            revisions: RevisionParser::new()?,
            bibliography: BibliographyParser::new()?,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedDocument {
        let toc = self.toc.extract(text);

        ParsedDocument {
            record: DocumentRecord {
                title: self.title.parse(text),
                versions: self.versions.parse(text),
                table_of_contents: toc.entries,
                revisions: self.revisions.parse(text),
                bibliography: self.bibliography.parse(text),
                other: Vec::new(),
            },
            toc_mode: toc.mode,
        }
    }
}
