
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::database::FaqRecord;

pub const DEFAULT_FAQ_FILE: &str = "faqs.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON array of `{question, answer}` objects, keeping file order.
///
/// Only the shape is checked; empty strings are valid questions and answers.
#[inline]
pub fn load_faqs<P: AsRef<Path>>(path: P) -> Result<Vec<FaqRecord>, LoadError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| LoadError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<FaqRecord> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Loaded {} FAQ records from {}", records.len(), path.display());
    Ok(records)
}
