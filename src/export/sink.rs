//! Delivery of serialized documents.

use std::fs;
use std::path::PathBuf;

/// Collaborator that persists a finished export document.
///
/// The driver hands over a file name and the complete document; where and
/// how it lands is the sink's business.
pub trait FileSink {
    /// Writes `contents` under `file_name`, returning the delivered path.
    fn save(&self, file_name: &str, contents: &str) -> std::io::Result<PathBuf>;
}

/// Sink writing documents into a fixed output directory, creating it on
/// first use.
pub struct DirectorySink {
    output_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl FileSink for DirectorySink {
    fn save(&self, file_name: &str, contents: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn save_creates_directory_and_writes_contents() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));

        let path = sink.save("Wallet - Transactions.csv", "Date\n").unwrap();

        assert_eq!(path, dir.path().join("exports/Wallet - Transactions.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "Date\n");
    }
}
