// JSON-lines reference roster import

use std::path::Path;

use serde::Deserialize;

use docmatch_recon::config::ReferencePolicy;
use docmatch_recon::model::{Address, Record};

use crate::error::IngestError;

/// One line of the reference feed.
#[derive(Debug, Deserialize)]
struct DoctorLine {
    doctor: DoctorIdentity,
    #[serde(default)]
    practices: Vec<Practice>,
}

#[derive(Debug, Deserialize)]
struct DoctorIdentity {
    first_name: String,
    last_name: String,
    #[serde(default)]
    npi: Option<String>,
}

/// Unknown keys (`lat`, `lon`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct Practice {
    street: String,
    #[serde(default)]
    street_2: String,
    zip: String,
    city: String,
    state: String,
}

impl From<Practice> for Address {
    fn from(p: Practice) -> Self {
        Address {
            street: p.street,
            street_2: p.street_2,
            postal_code: p.zip,
            city: p.city,
            region: p.state,
        }
    }
}

impl From<DoctorLine> for Record {
    fn from(line: DoctorLine) -> Self {
        Record::new(
            line.doctor.first_name,
            line.doctor.last_name,
            line.doctor.npi.unwrap_or_default(),
        )
        .with_addresses(line.practices.into_iter().map(Address::from).collect())
    }
}

pub fn import(path: &Path, policy: ReferencePolicy) -> Result<Vec<Record>, IngestError> {
    let content = crate::read_file_as_utf8(path)?;
    let records = import_from_string(&content, policy)?;
    log::info!("loaded {} reference record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse one JSON object per line, preserving order. Blank lines are ignored.
pub fn import_from_string(content: &str, policy: ReferencePolicy) -> Result<Vec<Record>, IngestError> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => records.push(record),
            Err(source) => match policy {
                ReferencePolicy::Fail => return Err(IngestError::Json { line: idx as u64 + 1, source }),
                ReferencePolicy::Skip => {
                    log::warn!("skipping reference line {}: {source}", idx + 1);
                }
            },
        }
    }

    Ok(records)
}

/// Decode a single reference line into a [`Record`].
pub fn parse_line(line: &str) -> Result<Record, serde_json::Error> {
    let parsed: DoctorLine = serde_json::from_str(line)?;
    Ok(parsed.into())
}
