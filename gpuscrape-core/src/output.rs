// CSV output for scraped records

use gpuscrape_scanner::RecordSink;
use gpuscrape_scanner::record::{CSV_HEADER, GpuRecord};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// How the output file is opened and kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Create or truncate once, write the header, keep the handle open and
    /// flush after every row.
    Truncate,
    /// Write the header only when the file is new (or empty), then reopen in
    /// append mode for every row.
    Append,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Truncate => "truncate",
            OutputMode::Append => "append",
        }
    }
}

/// Record sink writing one CSV row per record.
pub struct CsvSink {
    path: PathBuf,
    mode: OutputMode,
    writer: Option<csv::Writer<File>>,
    rows_written: usize,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> OutputError + '_ {
    move |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Headerless writer with CRLF row endings.
pub fn row_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(inner)
}

impl CsvSink {
    /// Prepares `path` for writing. Fails if the file cannot be created.
    pub fn open(path: impl AsRef<Path>, mode: OutputMode) -> Result<Self, OutputError> {
        let path = path.as_ref().to_path_buf();

        let writer = match mode {
            OutputMode::Truncate => {
                let file = File::create(&path).map_err(io_error(&path))?;
                let mut writer = row_writer(file);
                writer.write_record(CSV_HEADER)?;
                writer.flush().map_err(io_error(&path))?;
                Some(writer)
            }
            OutputMode::Append => {
                let is_new = std::fs::metadata(&path)
                    .map(|m| m.len() == 0)
                    .unwrap_or(true);
                if is_new {
                    debug!("Creating {} with header", path.display());
                    let file = File::create(&path).map_err(io_error(&path))?;
                    let mut writer = row_writer(file);
                    writer.write_record(CSV_HEADER)?;
                    writer.flush().map_err(io_error(&path))?;
                }
                None
            }
        };

        Ok(Self {
            path,
            mode,
            writer,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

fn append_row(path: &Path, record: &GpuRecord) -> Result<(), OutputError> {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(io_error(path))?;
    let mut writer = row_writer(file);
    writer.serialize(record)?;
    writer.flush().map_err(io_error(path))?;
    Ok(())
}

impl RecordSink for CsvSink {
    type Error = OutputError;

    fn write_record(&mut self, record: &GpuRecord) -> Result<(), OutputError> {
        match self.writer.as_mut() {
            Some(writer) => {
                writer.serialize(record)?;
                writer.flush().map_err(io_error(&self.path))?;
            }
            None => append_row(&self.path, record)?,
        }
        self.rows_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_truncate_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gpu_data.csv");

        let mut sink = CsvSink::open(&path, OutputMode::Truncate).unwrap();
        sink.write_record(&GpuRecord::new("A", "1", "2020")).unwrap();
        sink.write_record(&GpuRecord::new("B", "2", "2021")).unwrap();

        assert_eq!(
            read(&path),
            "GPU Name,Transistor Count,Release Date\r\nA,1,2020\r\nB,2,2021\r\n"
        );
        assert_eq!(sink.rows_written(), 2);
    }

    #[test]
    fn test_truncate_discards_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gpu_data.csv");
        std::fs::write(&path, "stale\n").unwrap();

        CsvSink::open(&path, OutputMode::Truncate).unwrap();
        assert_eq!(read(&path), "GPU Name,Transistor Count,Release Date\r\n");
    }

    #[test]
    fn test_append_keeps_existing_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gpu_data_all.csv");
        std::fs::write(&path, "GPU Name,Transistor Count,Release Date\r\nOld,1,2001\r\n").unwrap();

        let mut sink = CsvSink::open(&path, OutputMode::Append).unwrap();
        sink.write_record(&GpuRecord::new("New", "2", "2002")).unwrap();

        assert_eq!(
            read(&path),
            "GPU Name,Transistor Count,Release Date\r\nOld,1,2001\r\nNew,2,2002\r\n"
        );
    }

    #[test]
    fn test_append_creates_header_for_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();

        CsvSink::open(&path, OutputMode::Append).unwrap();
        assert_eq!(read(&path), "GPU Name,Transistor Count,Release Date\r\n");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quoted.csv");

        let mut sink = CsvSink::open(&path, OutputMode::Append).unwrap();
        sink.write_record(&GpuRecord::new("Example GPU", "1,000,000", "Jan 1st, 2020"))
            .unwrap();

        let content = read(&path);
        assert!(content.ends_with("Example GPU,\"1,000,000\",\"Jan 1st, 2020\"\r\n"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<GpuRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(
            rows,
            vec![GpuRecord::new("Example GPU", "1,000,000", "Jan 1st, 2020")]
        );
    }

    #[test]
    fn test_rows_use_crlf_line_endings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crlf.csv");

        let mut sink = CsvSink::open(&path, OutputMode::Append).unwrap();
        sink.write_record(&GpuRecord::missing()).unwrap();

        let content = read(&path);
        assert_eq!(content.matches("\r\n").count(), 2);
        assert_eq!(content.matches('\n').count(), 2);
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("dir.csv");
        let err = CsvSink::open(&path, OutputMode::Truncate).err().unwrap();
        assert!(matches!(err, OutputError::Io { .. }));
    }

    #[test]
    fn test_append_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gone.csv");
        let mut sink = CsvSink::open(&path, OutputMode::Append).unwrap();

        // a directory where the file used to be cannot be opened for append
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = sink.write_record(&GpuRecord::missing()).unwrap_err();
        assert!(err.to_string().contains("gone.csv"));
        assert_eq!(sink.rows_written(), 0);
    }
}
