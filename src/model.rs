use std::collections::BTreeMap;

use serde::Serialize;

use crate::toc::TocEntry;

/// Everything extracted from one document, in output field order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub title: String,
    pub versions: Versions,
    pub table_of_contents: Vec<TocEntry>,
    pub revisions: Vec<Revision>,
    pub bibliography: BTreeMap<String, String>,
    pub other: Vec<serde_json::Value>,
}

/// Cryptographic and certification markers; empty lists are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Versions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub eal: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sha: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub des: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rsa: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ecc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_platform: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub java_card: Vec<String>,
}

impl Versions {
    /// `(field name, values)` pairs for every non-empty marker list.
    pub fn fields(&self) -> Vec<(&'static str, &[String])> {
        [
            ("eal", self.eal.as_slice()),
            ("sha", self.sha.as_slice()),
            ("des", self.des.as_slice()),
            ("rsa", self.rsa.as_slice()),
            ("ecc", self.ecc.as_slice()),
            ("global_platform", self.global_platform.as_slice()),
            ("java_card", self.java_card.as_slice()),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub version: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub input_path: String,
    pub output_path: String,
    pub sha256: String,
    pub toc_entries: usize,
    pub toc_mode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedInput {
    pub input_path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseRunManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub output_folder: String,
    pub input_count: usize,
    pub processed_count: usize,
    pub documents: Vec<ProcessedDocument>,
    pub skipped: Vec<SkippedInput>,
}
