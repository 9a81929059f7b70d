//! Random-access reader for DAF containers.
//!
//! A DAF file is a sequence of 1024-byte records:
//!
//! ```text
//! record 1            file record (see DAFHeader)
//! records 2..FWARD-1  comment area, 1000 useful bytes per record
//! record FWARD        first summary record
//! record FWARD+1      its name record
//! ...                 array data, further summary/name record pairs
//! ```
//!
//! Each summary record starts with three doubles `next`, `prev`, `nsum`
//! followed by `nsum` packed summaries of `ND` doubles and `NI` integers.
//! The record right after a summary record holds one name per summary.
//! Array data is addressed in 1-based double-precision words: address `a`
//! lives at byte `(a - 1) * 8`.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, ErrorKind},
};

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::{
    constants::{DAF_COMMENT_BYTES, DAF_COMMENT_EOT, DAF_RECORD_SIZE},
    ephem_errors::EphemError,
    jpl_ephem::{EphemReader, SharedReader},
};

use super::daf_header::{parse_f64, parse_i32, DAFHeader};

/// Raw content of one array summary, before any SPK interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct DafSummary {
    pub doubles: Vec<f64>,
    pub ints: Vec<i32>,
}

/// An opened DAF container.
///
/// The underlying stream is shared between segments and threads; every read
/// seeks explicitly.
#[derive(Debug)]
pub struct DafFile {
    header: DAFHeader,
    reader: SharedReader,
}

impl DafFile {
    /// Open a DAF file from disk.
    pub fn open(path: &Utf8Path) -> Result<Self, EphemError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => EphemError::JPLFileNotFound(path.to_string()),
            _ => EphemError::IoError(err),
        })?;
        info!(path = %path, "opening DAF file");
        Self::from_reader(BufReader::new(file))
    }

    /// Wrap any seekable byte stream holding a DAF container.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: the stream, positioned anywhere.
    ///
    /// Return
    /// ----------
    /// * The opened container, or [`EphemError::InvalidFileFormat`] when the
    ///   stream does not start with a valid DAF file record.
    pub fn from_reader<R: EphemReader + 'static>(reader: R) -> Result<Self, EphemError> {
        let reader = SharedReader::new(reader)?;
        if reader.len() < DAF_RECORD_SIZE as u64 {
            return Err(EphemError::InvalidFileFormat(format!(
                "file is {} bytes long, shorter than one DAF record",
                reader.len()
            )));
        }

        let header = DAFHeader::from_record(&reader.read_at(0, DAF_RECORD_SIZE)?)?;
        debug!(
            idword = %header.idword,
            endian = %header.endian,
            nd = header.nd,
            ni = header.ni,
            "decoded DAF file record"
        );

        Ok(DafFile { header, reader })
    }

    pub fn header(&self) -> &DAFHeader {
        &self.header
    }

    /// Read the 1-based record `number` in full.
    pub fn read_record(&self, number: usize) -> Result<Vec<u8>, EphemError> {
        if number == 0 {
            return Err(EphemError::InvalidData("record numbers start at 1".into()));
        }
        let offset = (number - 1).checked_mul(DAF_RECORD_SIZE).ok_or_else(|| {
            EphemError::InvalidData(format!("record {number} lies past any addressable offset"))
        })?;
        self.reader.read_at(offset as u64, DAF_RECORD_SIZE)
    }

    /// Read the doubles stored at word addresses `start..=end` (1-based, inclusive).
    ///
    /// Arguments
    /// -----------------
    /// * `start`: address of the first word.
    /// * `end`: address of the last word, included.
    ///
    /// Return
    /// ----------
    /// * `end - start + 1` values decoded in the file's byte order.
    pub fn map_array(&self, start: usize, end: usize) -> Result<Vec<f64>, EphemError> {
        if start == 0 || end < start {
            return Err(EphemError::InvalidData(format!(
                "invalid word range {start}..={end}"
            )));
        }

        let offset = (start - 1).checked_mul(8);
        let len = (end - start + 1).checked_mul(8);
        let (Some(offset), Some(len)) = (offset, len) else {
            return Err(EphemError::InvalidData(format!(
                "word range {start}..={end} lies past any addressable offset"
            )));
        };
        let bytes = self.reader.read_at(offset as u64, len)?;
        let endian = self.header.endian;
        Ok(bytes
            .chunks_exact(8)
            .map(|word| {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(word);
                endian.read_f64(raw)
            })
            .collect())
    }

    /// Iterate over every summary of the file, in file order.
    ///
    /// Each call starts a fresh walk from the header's forward pointer.
    pub fn summaries(&self) -> SummaryIter<'_> {
        SummaryIter {
            daf: self,
            next_record: self.header.fward.max(0) as usize,
            visited: HashSet::new(),
            page: None,
            failed: false,
        }
    }

    /// Text of the comment area.
    ///
    /// The comment records sit between the file record and the first summary
    /// record. Only the first 1000 bytes of each are used, NUL bytes end a
    /// line and an EOT byte ends the text.
    pub fn comments(&self) -> Result<String, EphemError> {
        let fward = self.header.fward.max(0) as usize;
        if fward <= 2 {
            return Ok(String::new());
        }

        let records_in_file = (self.reader.len() / DAF_RECORD_SIZE as u64) as usize;
        let mut data = Vec::with_capacity((fward - 2).min(records_in_file) * DAF_COMMENT_BYTES);
        for number in 2..fward {
            let record = self.read_record(number)?;
            data.extend_from_slice(&record[..DAF_COMMENT_BYTES]);
        }

        let end = data
            .iter()
            .position(|&byte| byte == DAF_COMMENT_EOT)
            .unwrap_or_else(|| data.iter().rposition(|&byte| byte != 0).map_or(0, |i| i + 1));

        let text: Vec<u8> = data[..end]
            .iter()
            .map(|&byte| if byte == 0 { b'\n' } else { byte })
            .collect();
        Ok(String::from_utf8_lossy(&text).into_owned())
    }
}

/// One summary record together with its name record.
struct SummaryPage {
    record: Vec<u8>,
    names: Option<Vec<u8>>,
    count: usize,
    position: usize,
}

/// Lazy walk over the summary record chain.
///
/// Yields `(name, summary)` pairs. A corrupted chain produces one error item
/// and then ends the iteration.
pub struct SummaryIter<'a> {
    daf: &'a DafFile,
    next_record: usize,
    visited: HashSet<usize>,
    page: Option<SummaryPage>,
    failed: bool,
}

impl SummaryIter<'_> {
    fn load_page(&mut self, number: usize) -> Result<SummaryPage, EphemError> {
        if !self.visited.insert(number) {
            return Err(EphemError::InvalidData(format!(
                "summary record chain loops back to record {number}"
            )));
        }

        let daf = self.daf;
        let header = daf.header();
        let record = daf.read_record(number)?;

        let (input, next) = parse_f64(header.endian, &record)?;
        let (input, _prev) = parse_f64(header.endian, input)?;
        let (_, nsum) = parse_f64(header.endian, input)?;

        let summary_bytes = header.summary_doubles() * 8;
        let capacity = (DAF_RECORD_SIZE - 24)
            .checked_div(summary_bytes)
            .unwrap_or_default();
        let is_count = |v: f64| v >= 0.0 && v.fract() == 0.0;
        if !(is_count(nsum) && nsum <= capacity as f64 && is_count(next)) {
            return Err(EphemError::InvalidData(format!(
                "summary record {number} declares {nsum} summaries and next record {next}"
            )));
        }
        let count = nsum as usize;

        let names = match daf.read_record(number + 1) {
            Ok(names) => Some(names),
            Err(_) => {
                warn!(record = number + 1, "name record is missing, summaries left unnamed");
                None
            }
        };

        self.next_record = next as usize;
        Ok(SummaryPage {
            record,
            names,
            count,
            position: 0,
        })
    }

    fn decode(&self, page: &SummaryPage, index: usize) -> Result<(String, DafSummary), EphemError> {
        let header = self.daf.header();
        let step = header.summary_doubles() * 8;
        let start = 24 + index * step;

        let mut input = &page.record[start..start + step];
        let mut doubles = Vec::with_capacity(header.nd as usize);
        for _ in 0..header.nd {
            let (rest, value) = parse_f64(header.endian, input)?;
            doubles.push(value);
            input = rest;
        }
        let mut ints = Vec::with_capacity(header.ni as usize);
        for _ in 0..header.ni {
            let (rest, value) = parse_i32(header.endian, input)?;
            ints.push(value);
            input = rest;
        }

        let name = page
            .names
            .as_ref()
            .map(|names| {
                String::from_utf8_lossy(&names[index * step..(index + 1) * step])
                    .trim_matches(['\0', ' '])
                    .to_string()
            })
            .unwrap_or_default();

        Ok((name, DafSummary { doubles, ints }))
    }
}

impl Iterator for SummaryIter<'_> {
    type Item = Result<(String, DafSummary), EphemError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if let Some(page) = self.page.as_ref() {
                if page.position < page.count {
                    let entry = self.decode(page, page.position);
                    if let Some(page) = self.page.as_mut() {
                        page.position += 1;
                    }
                    return Some(entry);
                }
                self.page = None;
            }

            if self.next_record == 0 {
                return None;
            }

            match self.load_page(self.next_record) {
                Ok(page) => self.page = Some(page),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
