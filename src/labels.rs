//! Ordered class label tables.
//!
//! Label `i` names class score channel `4 + i` of the model output. Tables are
//! usually read from a plain text file with one label per line.

use crate::util::{DetectError, DetectResult};
use std::io::BufRead;
use std::path::Path;

/// Ordered list of class names indexed by class id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Creates a table from labels already in class order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses newline-separated labels, skipping blank lines.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().filter_map(clean_line))
    }

    /// Reads newline-separated labels from `reader`, skipping blank lines.
    pub fn from_reader<R: BufRead>(reader: R) -> DetectResult<Self> {
        let mut labels = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|err| DetectError::LabelIo {
                reason: err.to_string(),
            })?;
            if let Some(label) = clean_line(&line) {
                labels.push(label.to_owned());
            }
        }
        Ok(Self { labels })
    }

    /// Loads a label file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> DetectResult<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|err| DetectError::LabelIo {
            reason: format!("{}: {err}", path.as_ref().display()),
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Returns the label for `class_index`.
    pub fn get(&self, class_index: usize) -> Option<&str> {
        self.labels.get(class_index).map(String::as_str)
    }

    /// Returns the class index of the first label equal to `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|label| label == name)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

fn clean_line(line: &str) -> Option<&str> {
    let label = line.trim_end();
    if label.trim_start().is_empty() {
        None
    } else {
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::LabelTable;

    #[test]
    fn from_text_skips_blank_lines() {
        let table = LabelTable::from_text("person\n\nbicycle\r\n   \ncar\n");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("person"));
        assert_eq!(table.get(1), Some("bicycle"));
        assert_eq!(table.get(2), Some("car"));
        assert_eq!(table.get(3), None);
        assert_eq!(table.index_of("car"), Some(2));
    }

    #[test]
    fn from_reader_matches_from_text() {
        let text = "cat\ndog\n\nbird";
        let table = LabelTable::from_reader(text.as_bytes()).unwrap();
        assert_eq!(table, LabelTable::from_text(text));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = LabelTable::load("/nonexistent/labels.txt").unwrap_err();
        assert!(err.to_string().starts_with("label io error"));
    }
}
