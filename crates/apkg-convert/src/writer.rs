//! CSV row writer
//!
//! Every field is quoted and embedded quotes are doubled. Rows always end in
//! `\r\n` so output is byte-identical across platforms.

use apkg_core::CardPair;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{ExportError, ExportResult};

/// Row terminator written after every record
pub const LINE_TERMINATOR: &str = "\r\n";

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Writes fully quoted CSV records
pub struct CsvWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, rows: 0 }
    }

    /// Write one record
    pub fn write_row(&mut self, fields: &[&str]) -> io::Result<()> {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(DELIMITER);
            }
            line.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    line.push(QUOTE);
                }
                line.push(c);
            }
            line.push(QUOTE);
        }
        line.push_str(LINE_TERMINATOR);

        self.inner.write_all(line.as_bytes())?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_card(&mut self, card: &CardPair) -> io::Result<()> {
        self.write_row(&[card.front.as_str(), card.back.as_str()])
    }

    /// Number of records written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write `cards` to a new file at `path`, replacing any existing file
pub fn write_cards(path: &Path, cards: &[CardPair]) -> ExportResult<usize> {
    let io_err = |err| ExportError::io(path, err);

    let file = File::create(path).map_err(io_err)?;
    let mut writer = CsvWriter::new(BufWriter::new(file));
    for card in cards {
        writer.write_card(card).map_err(io_err)?;
    }

    let rows = writer.rows();
    writer.finish().map_err(io_err)?;

    tracing::debug!(path = %path.display(), rows, "wrote csv");
    Ok(rows)
}
