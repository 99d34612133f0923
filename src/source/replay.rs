//! Recorded sessions as JSON lines, one `Frame` per line
//!
//! ```text
//! {"t_ms":0,"pose":{"landmarks":{"nose":{"x":0.5,"y":0.3,"visibility":0.99}}}}
//! {"t_ms":33,"pose":null}
//! ```

use super::{Frame, PoseSource, SourceError};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;
use tracing::warn;

/// Replays frames from a JSON-lines reader
pub struct ReplaySource<R: BufRead> {
    lines: Lines<R>,
    line_no: usize,
    skipped: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R) -> Self {
        ReplaySource {
            lines: reader.lines(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Malformed lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> PoseSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Frame>(&line) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    self.skipped += 1;
                    warn!(line = self.line_no, error = %e, "skipping malformed frame");
                }
            }
        }
        Ok(None)
    }
}

/// Writes frames as JSON lines for later replay
pub struct FrameRecorder<W: Write> {
    writer: W,
    written: usize,
}

impl FrameRecorder<BufWriter<File>> {
    /// Create (or truncate) a recording on disk
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FrameRecorder<W> {
    pub fn new(writer: W) -> Self {
        FrameRecorder { writer, written: 0 }
    }

    pub fn record(&mut self, frame: &Frame) -> Result<(), SourceError> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), SourceError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
