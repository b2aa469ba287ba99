use std::collections::BTreeSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Versions;

const SHA_VARIANTS: &str = "512|384|256|224|3|2|1";
const RSA_VARIANTS: &str = "4096|2048|1024";

#[derive(Debug)]
pub struct VersionParser {
    eal: Regex,
    sha: Regex,
    des: Vec<Regex>,
    rsa: Regex,
    ecc: Vec<Regex>,
    global_platform: Regex,
    java_card: Regex,
}

impl VersionParser {
    pub fn new() -> Result<Self> {
        let des = [r"(?i)3des", r"(?i)des3", r"(?i)triple[- ]des", r"(?i)tdes"]
            .into_iter()
            .map(|pattern| Regex::new(pattern).context("failed to compile des regex"))
            .collect::<Result<Vec<Regex>>>()?;
        let ecc = [r"ECC", r"ECC ?[0-9]+"]
            .into_iter()
            .map(|pattern| Regex::new(pattern).context("failed to compile ecc regex"))
            .collect::<Result<Vec<Regex>>>()?;

        Ok(Self {
            eal: Regex::new(r"[^\w](EAL ?[0-9]\+?)").context("failed to compile eal regex")?,
            sha: Regex::new(&format!(
                r"SHA[-_ ]?(?:{SHA_VARIANTS})(?:[-/_ ](?:{SHA_VARIANTS}))?"
            ))
            .context("failed to compile sha regex")?,
            des,
            rsa: Regex::new(&format!(
                r"RSA[-_ ]?(?:{RSA_VARIANTS})(?:[-/_](?:{RSA_VARIANTS}))?"
            ))
            .context("failed to compile rsa regex")?,
            ecc,
            global_platform: Regex::new(r"(?i)global ?platform (?:[0-9]\.)*[0-9]")
                .context("failed to compile global platform regex")?,
            java_card: Regex::new(r"(?i)java ?card (?:[0-9]\.)*[0-9]")
                .context("failed to compile java card regex")?,
        })
    }

    pub fn parse(&self, text: &str) -> Versions {
        // Hash names are often broken up by spaces in the text layer.
        let compact = text.replace(' ', "");

        Versions {
            eal: deduplicate(
                self.eal
                    .captures_iter(text)
                    .filter_map(|captures| captures.get(1))
                    .map(|found| found.as_str()),
            ),
            sha: deduplicate(find_all(&self.sha, &compact)),
            des: deduplicate(self.des.iter().flat_map(|pattern| find_all(pattern, text))),
            rsa: deduplicate(find_all(&self.rsa, text)),
            ecc: deduplicate(
                self.ecc
                    .iter()
                    .flat_map(|pattern| find_all(pattern, text))
                    .map(str::to_uppercase),
            ),
            global_platform: deduplicate(find_all(&self.global_platform, text)),
            java_card: deduplicate(find_all(&self.java_card, text)),
        }
    }
}

fn find_all<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern.find_iter(text).map(|found| found.as_str()).collect()
}

fn deduplicate<I, S>(found: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    found
        .into_iter()
        .map(|value| value.as_ref().to_string())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
