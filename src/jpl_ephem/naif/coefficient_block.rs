//! Coefficient blocks of Chebyshev segments and the time locator.
//!
//! A type 2/3 segment array is laid out as `n` records of `rsize` words
//! followed by the four-word [`DirectoryData`]. Each record holds the
//! sub-interval midpoint and radius (seconds), then `component_count`
//! series of `coefficient_count` coefficients:
//!
//! ```text
//! | mid | radius | x_0 .. x_k | y_0 .. y_k | z_0 .. z_k | (vx vy vz for type 3) |
//! ```
//!
//! The block keeps only the series, flattened as
//! `(record, component, coefficient)`.

use tracing::debug;

use crate::{
    constants::{END_BOUNDARY_TOLERANCE, JD, SECONDS_PER_DAY},
    ephem_errors::EphemError,
    time::jd,
};

use super::{daf_file::DafFile, directory::DirectoryData, summary_record::Summary};

/// Materialized coefficients of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientBlock {
    center: i32,
    target: i32,
    /// Start of the first sub-interval.
    pub initial_epoch: JD,
    /// Length of every sub-interval, in days.
    pub interval_length: f64,
    pub n_records: usize,
    pub component_count: usize,
    pub coefficient_count: usize,
    coefficients: Vec<f64>,
}

/// Where a requested time falls inside a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationContext<'a> {
    /// Sub-interval index, `0 <= index < n_records`.
    pub index: usize,
    /// Days elapsed since the start of the sub-interval.
    pub offset: f64,
    pub interval_length: f64,
    /// The `component_count × coefficient_count` series of the sub-interval.
    pub record: &'a [f64],
}

impl CoefficientBlock {
    /// Read and reshape the coefficients of a segment.
    ///
    /// Arguments
    /// -----------------
    /// * `daf`: the container holding the segment.
    /// * `summary`: the segment descriptor giving the array bounds.
    /// * `component_count`: 3 for type 2 segments, 6 for type 3.
    ///
    /// Return
    /// ----------
    /// * The block, or [`EphemError::InvalidData`] when the directory and the
    ///   array length disagree.
    pub fn load(
        daf: &DafFile,
        summary: &Summary,
        component_count: usize,
    ) -> Result<Self, EphemError> {
        let directory = DirectoryData::read(daf, summary.end_index)?;
        let context = || format!("segment {} -> {}", summary.center, summary.target);

        if directory.rsize <= 2 || (directory.rsize - 2) % component_count != 0 {
            return Err(EphemError::InvalidData(format!(
                "{}: record size {} does not hold {component_count} series",
                context(),
                directory.rsize
            )));
        }
        let coefficient_count = (directory.rsize - 2) / component_count;

        let available = (summary.end_index - 4 + 1).saturating_sub(summary.start_index);
        let expected = directory
            .n_records
            .checked_mul(directory.rsize)
            .filter(|&words| words > 0 && words == available)
            .ok_or_else(|| {
                EphemError::InvalidData(format!(
                    "{}: directory announces {} records of {} words \
                     but the array holds {available} words",
                    context(),
                    directory.n_records,
                    directory.rsize
                ))
            })?;

        let raw = daf.map_array(summary.start_index, summary.start_index + expected - 1)?;
        let coefficients: Vec<f64> = raw
            .chunks_exact(directory.rsize)
            .flat_map(|record| record[2..].iter().copied())
            .collect();

        debug!(
            center = summary.center,
            target = summary.target,
            n_records = directory.n_records,
            coefficient_count,
            "loaded coefficient block"
        );

        Ok(CoefficientBlock {
            center: summary.center,
            target: summary.target,
            initial_epoch: jd(directory.init),
            interval_length: directory.intlen / SECONDS_PER_DAY,
            n_records: directory.n_records,
            component_count,
            coefficient_count,
            coefficients,
        })
    }

    /// End of the last sub-interval.
    pub fn final_epoch(&self) -> JD {
        self.initial_epoch + self.n_records as f64 * self.interval_length
    }

    /// Series of the sub-interval `index`.
    pub fn record(&self, index: usize) -> &[f64] {
        let size = self.component_count * self.coefficient_count;
        &self.coefficients[index * size..(index + 1) * size]
    }

    /// Find the sub-interval holding the time `tdb + tdb2`.
    ///
    /// A time exactly on the final boundary belongs to the last sub-interval,
    /// evaluated at its end. Anything before the first boundary or after the
    /// last one is [`EphemError::OutOfRange`].
    pub fn locate(&self, tdb: JD, tdb2: f64) -> Result<EvaluationContext<'_>, EphemError> {
        let delta = (tdb - self.initial_epoch) + tdb2;
        let interval = self.interval_length;

        let mut index = delta.div_euclid(interval);
        let mut offset = delta.rem_euclid(interval);
        let n = self.n_records as f64;

        let on_final_boundary = index == n && offset <= END_BOUNDARY_TOLERANCE;
        if on_final_boundary {
            index -= 1.0;
            offset += interval;
        }

        if !(index >= 0.0 && index < n) {
            return Err(EphemError::OutOfRange {
                context: format!("segment {} -> {}", self.center, self.target),
                requested: tdb + tdb2,
                start: self.initial_epoch,
                end: self.final_epoch(),
            });
        }

        let index = index as usize;
        Ok(EvaluationContext {
            index,
            offset,
            interval_length: interval,
            record: self.record(index),
        })
    }
}
