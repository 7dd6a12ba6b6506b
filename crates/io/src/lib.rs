// Roster ingestion: one parser per source format

pub mod csv;
pub mod error;
pub mod json;

pub use error::IngestError;

use std::io::Read;
use std::path::Path;

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IngestError> {
    let io_err = |source: std::io::Error| IngestError::Io { path: path.to_path_buf(), source };

    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported rosters)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_utf8_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "first,last,npi\nJosé,Núñez,1\n").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "first,last,npi\nJosé,Núñez,1\n");
    }

    #[test]
    fn falls_back_to_windows_1252() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        // "Jos\xe9" is "José" in Windows-1252 and invalid UTF-8
        fs::write(&path, b"Jos\xe9,Nunez,1\n").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "José,Nunez,1\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_file_as_utf8(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }
}
