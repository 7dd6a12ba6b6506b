// Delimited roster import
//
// Each line is one provider. Two shapes are accepted:
//
//   first,last,npi
//   first,last,npi,street,street_2,city,region,postal_code
//
// Note that postal_code is the last column, not adjacent to street.

use std::path::Path;

use docmatch_recon::config::CandidateConfig;
use docmatch_recon::model::{Address, Record};

use crate::error::IngestError;

const IDENTITY_ONLY: usize = 3;
const WITH_ADDRESS: usize = 8;

pub fn import(path: &Path, config: &CandidateConfig) -> Result<Vec<Record>, IngestError> {
    let content = crate::read_file_as_utf8(path)?;
    let records = import_from_string(&content, config)?;
    log::info!("loaded {} candidate record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a whole delimited roster, one record per physical line.
///
/// When `config.has_header` is set the first physical line is skipped,
/// whatever it contains. Every other line, blank ones included, must have
/// 3 or 8 fields; the first one that does not aborts the import. A final
/// line terminator does not count as an extra line.
pub fn import_from_string(content: &str, config: &CandidateConfig) -> Result<Vec<Record>, IngestError> {
    let delimiter = dialect_byte("delimiter", config.delimiter)?;
    let quote = dialect_byte("quote", config.quote)?;
    let skip = usize::from(config.has_header);

    content
        .lines()
        .enumerate()
        .skip(skip)
        .map(|(idx, line)| parse_numbered_line(line, idx as u64 + 1, delimiter, quote))
        .collect()
}

/// Parse a single roster line (no header handling).
pub fn parse_line(line: &str, delimiter: u8, quote: u8) -> Result<Record, IngestError> {
    parse_numbered_line(line, 1, delimiter, quote)
}

fn parse_numbered_line(line: &str, line_no: u64, delimiter: u8, quote: u8) -> Result<Record, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        // Field count is checked here so the error can name the line
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(row)) => record_from_fields(&row, line_no),
        Some(Err(e)) => Err(IngestError::Csv { line: line_no, source: e }),
        // The reader yields nothing for an empty line
        None => Err(IngestError::Format { line: line_no, fields: 0 }),
    }
}

/// Delimiter and quote must be single ASCII bytes.
fn dialect_byte(what: &'static str, value: char) -> Result<u8, IngestError> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(IngestError::Dialect { what, value })
    }
}

fn record_from_fields(row: &csv::StringRecord, line: u64) -> Result<Record, IngestError> {
    let field = |i: usize| row.get(i).unwrap_or("").to_string();

    match row.len() {
        IDENTITY_ONLY => Ok(Record::new(field(0), field(1), field(2))),
        WITH_ADDRESS => Ok(Record::new(field(0), field(1), field(2)).with_addresses(vec![
            Address {
                street: field(3),
                street_2: field(4),
                postal_code: field(7),
                city: field(5),
                region: field(6),
            },
        ])),
        fields => Err(IngestError::Format { line, fields }),
    }
}
