//! JSON output for question files and run reports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Serialization layout of a question file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One pretty-printed JSON array
    Json,
    /// One compact JSON object per line
    JsonLines,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }

    /// Pick the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
            .unwrap_or(Self::Json)
    }
}

/// Collects serializable items and writes them in one layout.
///
/// A JSON array has to be written in one go, so items are buffered until
/// [`OutputWriter::finish`]; JSON Lines items are written as they arrive.
pub struct OutputWriter<W: Write, T: Serialize> {
    writer: W,
    format: OutputFormat,
    pending: Vec<T>,
    items_written: usize,
}

impl<W: Write, T: Serialize> OutputWriter<W, T> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            pending: Vec::new(),
            items_written: 0,
        }
    }

    pub fn push(&mut self, item: T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.pending.push(item),
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush buffered items and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, &self.pending)
                .map_err(io::Error::other)?;
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<T: Serialize> OutputWriter<BufWriter<File>, T> {
    /// Create `path` and pick the layout from its extension.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), OutputFormat::from_path(path)))
    }
}

/// Write a pretty JSON document (used for `--report` summaries).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, item: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, item)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Question;

    fn question(id: usize) -> Question {
        Question {
            id,
            question: format!("q{id}"),
            choices: vec!["0".to_string(), "1".to_string()],
        }
    }

    #[test]
    fn json_is_a_single_array() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json);
        writer.push(question(1)).unwrap();
        writer.push(question(2)).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let parsed: Vec<Question> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec![question(1), question(2)]);
    }

    #[test]
    fn json_lines_writes_one_object_per_line() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines);
        writer.push(question(1)).unwrap();
        writer.push(question(2)).unwrap();

        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Question = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn empty_json_output_is_an_empty_array() {
        let writer: OutputWriter<Vec<u8>, Question> = OutputWriter::new(Vec::new(), OutputFormat::Json);
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(output.trim(), "[]");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("q.jsonl")), OutputFormat::JsonLines);
        assert_eq!(OutputFormat::from_path(Path::new("q.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("questions")), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("csv"), None);
    }

    #[test]
    fn report_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json(&path, &question(7)).unwrap();
        let parsed: Question = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, question(7));
    }
}
