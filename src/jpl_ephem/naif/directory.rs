//! Trailing directory of a Chebyshev SPK segment (types 2 and 3).
//!
//! The last four words of the segment array describe the uniform grid the
//! coefficient records are laid on:
//!
//! * `init`: start of the first record (TDB seconds past J2000),
//! * `intlen`: length of each record's time span (seconds),
//! * `rsize`: record size in **double-precision words**, not bytes,
//! * `n_records`: number of records.
//!
//! # See also
//! ------------
//! * [`crate::jpl_ephem::naif::coefficient_block::CoefficientBlock`] – uses the
//!   directory to shape the coefficient array.

use hifitime::Duration;

use crate::{ephem_errors::EphemError, time::epoch_from_seconds};

use super::daf_file::DafFile;

/// Directory footer of a Chebyshev SPK segment.
#[derive(Debug, PartialEq, Clone)]
pub struct DirectoryData {
    pub init: f64,
    pub intlen: f64,
    pub rsize: usize,
    pub n_records: usize,
}

impl DirectoryData {
    /// Read the four directory words ending at `end_index`.
    ///
    /// Arguments
    /// -----------------
    /// * `daf`: the container holding the segment.
    /// * `end_index`: last word address of the segment array (1-based).
    ///
    /// Return
    /// ----------
    /// * The directory, or [`EphemError::InvalidData`] when the words do not
    ///   describe a usable grid (non-positive interval, fractional or
    ///   negative counts).
    pub fn read(daf: &DafFile, end_index: usize) -> Result<Self, EphemError> {
        if end_index < 4 {
            return Err(EphemError::InvalidData(format!(
                "segment ending at word {end_index} cannot hold a directory"
            )));
        }

        let words = daf.map_array(end_index - 3, end_index)?;
        let (init, intlen, rsize, n_records) = (words[0], words[1], words[2], words[3]);

        let is_count = |v: f64| v >= 0.0 && v.fract() == 0.0;
        if !(intlen > 0.0 && is_count(rsize) && is_count(n_records)) {
            return Err(EphemError::InvalidData(format!(
                "invalid segment directory: intlen={intlen} rsize={rsize} n={n_records}"
            )));
        }

        Ok(DirectoryData {
            init,
            intlen,
            rsize: rsize as usize,
            n_records: n_records as usize,
        })
    }
}

impl std::fmt::Display for DirectoryData {
    /// Pretty-print the directory as a small, fixed-width table.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let epoch = epoch_from_seconds(self.init);
        let record_length = Duration::from_seconds(self.intlen);

        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "Field", "Value")?;
        writeln!(f, "+----------------+----------------------------+")?;
        writeln!(f, "| {:<14} | {:<26} |", "init (epoch)", format!("{epoch}"))?;
        writeln!(
            f,
            "| {:<14} | {:<26} |",
            "intlen",
            format!("{record_length}")
        )?;
        writeln!(f, "| {:<14} | {:<26} |", "rsize", self.rsize)?;
        writeln!(f, "| {:<14} | {:<26} |", "n_records", self.n_records)?;
        writeln!(f, "+----------------+----------------------------+")
    }
}
