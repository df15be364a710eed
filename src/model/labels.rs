//! Class label table
//!
//! Fixed ordered mapping from class index to human-readable label, bundled
//! alongside the model artifact as a plain text file with one label per
//! line. Line order defines the index order and is calibrated against the
//! model's output head, so the file must not be reordered independently.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PerceptError, Result};

/// Ordered class-index → label mapping
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the table from a label file, one label per line, index order.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            PerceptError::LabelTable(format!("cannot open {}: {e}", path.display()))
        })?;
        let reader = BufReader::new(file);

        let labels = reader
            .lines()
            .map(|line| line.map(|l| l.trim().to_string()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| PerceptError::LabelTable(e.to_string()))?;

        if labels.is_empty() {
            return Err(PerceptError::LabelTable(format!(
                "label file {} is empty",
                path.display()
            )));
        }

        Ok(Self { labels })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
