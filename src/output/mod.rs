//! CSV output for the CLI frontend.
//!
//! Rows are written to stdout as they are produced; logs go to stderr so the
//! two streams can be redirected independently.

use std::io::{self, Write};

use crate::engine::projection::{csv_header, csv_row, join_line};
use crate::engine::SweepPoint;
use crate::error::{LabSimError, Result};
use crate::scenario::{Sample, ScenarioEntry};

/// Line-oriented CSV writer.
pub struct CsvOutput<W: Write> {
    writer: W,
    rows: usize,
}

impl CsvOutput<io::BufWriter<io::Stdout>> {
    /// Writer over a buffered stdout.
    pub fn stdout() -> Self {
        Self::new(io::BufWriter::new(io::stdout()))
    }
}

impl<W: Write> CsvOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    /// Write the scenario's column header.
    pub fn write_header(&mut self, entry: &ScenarioEntry) -> Result<()> {
        self.write_line(&csv_header(entry))
    }

    /// Write one sample.
    pub fn write_sample(&mut self, entry: &ScenarioEntry, sample: &Sample) -> Result<()> {
        self.write_line(&csv_row(entry, sample))?;
        self.rows += 1;
        Ok(())
    }

    /// Write a sweep curve with its own `x,I,P` header.
    pub fn write_curve(&mut self, param: &str, curve: &[SweepPoint]) -> Result<()> {
        self.write_line(&[param.to_string(), "I".to_string(), "P".to_string()])?;
        for point in curve {
            self.write_line(&[point.x.to_string(), point.y.to_string(), point.p.to_string()])?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush the output stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(output_error)
    }

    /// Consume the writer, returning the inner sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, cells: &[String]) -> Result<()> {
        self.writer
            .write_all(join_line(cells).as_bytes())
            .map_err(output_error)
    }
}

fn output_error(e: io::Error) -> LabSimError {
    LabSimError::OutputError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Registry;

    #[test]
    fn test_writes_header_and_rows() {
        let registry = Registry::builtin();
        let entry = registry.resolve("ohms_law");
        let mut out = CsvOutput::new(Vec::new());
        out.write_header(entry).unwrap();
        out.write_sample(entry, &Sample::from_vi(2.0, 1.0).with("R", 2.0))
            .unwrap();
        assert_eq!(out.rows(), 1);
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "index,V,I,P,R\n0,2,1,2,2\n");
    }

    #[test]
    fn test_writes_curve() {
        let mut out = CsvOutput::new(Vec::new());
        out.write_curve("f", &[SweepPoint { x: 50.0, y: 0.5, p: 2.5 }])
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert_eq!(text, "f,I,P\n50,0.5,2.5\n");
    }
}
