//! Persisted Artifacts: Per-Window Diagrams and the Norms Table
//!
//! Diagrams are stored one file per window (`h1_window_<k>.json`), so a
//! cancelled run leaves every already-computed window usable and a
//! resumed run can address diagrams by window index. The final norms
//! table is written as CSV with one row per successful window.
//!
//! Writes are retried a bounded number of times to ride out transient
//! failures such as file-lock contention; a write that keeps failing is
//! surfaced as a storage error for that window only. All file handles
//! are scoped and released on every exit path.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{TdaError, TdaResult};
use crate::pipeline::{NormRow, NormsTable};

/// Directory-backed store of per-window degree-1 diagrams.
#[derive(Debug, Clone)]
pub struct DiagramStore {
    root: PathBuf,
    retries: usize,
}

impl DiagramStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, retries: usize) -> TdaResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, retries })
    }

    fn diagram_path(&self, window_index: usize) -> PathBuf {
        self.root.join(format!("h1_window_{window_index}.json"))
    }

    /// True if a diagram has been persisted for this window.
    pub fn contains(&self, window_index: usize) -> bool {
        self.diagram_path(window_index).exists()
    }

    /// Persist the finite degree-1 pairs of one window, retrying
    /// transient failures before giving up.
    pub fn save_h1(
        &self,
        window_index: usize,
        pairs: &[(f64, f64)],
    ) -> TdaResult<()> {
        let path = self.diagram_path(window_index);
        let mut attempt = 0;
        loop {
            match write_json(&path, pairs) {
                Ok(()) => return Ok(()),
                Err(error) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        window = window_index,
                        attempt,
                        %error,
                        "diagram write failed, retrying"
                    );
                    thread::sleep(Duration::from_millis(
                        20 * attempt as u64,
                    ));
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Load one window's stored pairs. A missing file is reported as
    /// [`TdaError::DiagramNotFound`] so callers can skip and continue.
    pub fn load_h1(&self, window_index: usize) -> TdaResult<Vec<(f64, f64)>> {
        let path = self.diagram_path(window_index);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Err(TdaError::DiagramNotFound { window_index })
            }
            Err(error) => return Err(error.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn write_json(path: &Path, pairs: &[(f64, f64)]) -> TdaResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, pairs)?;
    writer.flush()?;
    Ok(())
}

/// Write the norms table as CSV, one row per window.
pub fn write_norms_csv(path: &Path, table: &NormsTable) -> TdaResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a norms table back from CSV.
pub fn read_norms_csv(path: &Path) -> TdaResult<NormsTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows: Vec<NormRow> = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(NormsTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_diagram_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagramStore::new(dir.path(), 2).unwrap();

        let pairs = vec![(0.5, 1.25), (0.75, 2.0)];
        store.save_h1(7, &pairs).unwrap();

        assert!(store.contains(7));
        assert_eq!(store.load_h1(7).unwrap(), pairs);
    }

    #[test]
    fn test_empty_diagram_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagramStore::new(dir.path(), 0).unwrap();

        store.save_h1(0, &[]).unwrap();
        assert_eq!(store.load_h1(0).unwrap(), Vec::<(f64, f64)>::new());
    }

    #[test]
    fn test_missing_diagram_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiagramStore::new(dir.path(), 0).unwrap();

        assert!(!store.contains(3));
        match store.load_h1(3) {
            Err(TdaError::DiagramNotFound { window_index }) => {
                assert_eq!(window_index, 3)
            }
            other => panic!("expected DiagramNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_norms_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("norms.csv");

        let date = |d| NaiveDate::from_ymd_opt(2022, 1, d).unwrap();
        let table = NormsTable {
            rows: vec![
                NormRow {
                    window_index: 0,
                    start_date: date(3),
                    end_date: date(10),
                    l1_norm: 0.25,
                    l2_norm: 0.2886751345948129,
                },
                NormRow {
                    window_index: 1,
                    start_date: date(4),
                    end_date: date(11),
                    l1_norm: 0.0,
                    l2_norm: 0.0,
                },
            ],
        };

        write_norms_csv(&path, &table).unwrap();
        let loaded = read_norms_csv(&path).unwrap();
        assert_eq!(loaded, table);
    }
}
