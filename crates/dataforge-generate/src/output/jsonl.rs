use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::GenerationError;
use crate::generators::Record;

/// Lines and bytes produced by an emit call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub lines: u64,
    pub bytes: u64,
}

/// Write one record as a single JSON line.
pub fn write_record<W: Write>(writer: &mut W, record: &Record) -> Result<(), GenerationError> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    Ok(())
}

/// Write records as line-delimited JSON and flush the writer.
pub fn write_records<W, I>(writer: W, records: I) -> Result<EmitStats, GenerationError>
where
    W: Write,
    I: IntoIterator<Item = Record>,
{
    let mut counting = CountingWriter::new(writer);
    let mut lines = 0_u64;
    for record in records {
        write_record(&mut counting, &record)?;
        lines += 1;
    }
    counting.flush()?;
    Ok(EmitStats {
        lines,
        bytes: counting.bytes_written(),
    })
}

/// Create (or truncate) `path` and fill it with line-delimited JSON.
///
/// The file is flushed and synced before returning, so close-time errors
/// surface as `Write` errors.
pub fn write_jsonl_file<I>(path: &Path, records: I) -> Result<EmitStats, GenerationError>
where
    I: IntoIterator<Item = Record>,
{
    let with_path = |source: std::io::Error| GenerationError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(with_path)?;
    let mut writer = BufWriter::new(file);
    let stats = match write_records(&mut writer, records) {
        Err(GenerationError::Io(source)) => return Err(with_path(source)),
        result => result?,
    };
    let file = writer
        .into_inner()
        .map_err(|err| with_path(err.into_error()))?;
    file.sync_all().map_err(with_path)?;
    Ok(stats)
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
