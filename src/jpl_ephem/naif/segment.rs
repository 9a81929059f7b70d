//! One SPK segment and its evaluation surface.
//!
//! A segment gives the state of `target` relative to `center` over
//! `[start_jd, end_jd]`. Its coefficients are read from the kernel the first
//! time a computation needs them and kept for the lifetime of the segment.
//!
//! Times are Julian dates (TDB) split in two parts, `tdb + tdb2`. Passing the
//! J2000 anchor in `tdb` and the elapsed days in `tdb2` keeps the full
//! precision of the fractional day.
//!
//! Units are those of the kernel: kilometers for positions, kilometers per
//! second for the velocities stored by type 3 segments, and kilometers per
//! day for the rates produced by the derivative pass.

use std::{fmt, sync::Arc};

use hifitime::Epoch;
use nalgebra::{DMatrix, DVector, Matrix3xX, Vector3};
use once_cell::sync::OnceCell;

use crate::{ephem_errors::EphemError, time::epoch_to_jd_split};

use super::{
    chebyshev::evaluate_record,
    coefficient_block::CoefficientBlock,
    daf_file::DafFile,
    naif_ids::body_label,
    naif_type::Representation,
    summary_record::Summary,
};

/// Component values and optional rates, one column per requested time.
type Samples = (DMatrix<f64>, Option<DMatrix<f64>>);

#[derive(Debug)]
pub struct Segment {
    daf: Arc<DafFile>,
    source: String,
    summary: Summary,
    block: OnceCell<CoefficientBlock>,
}

impl Segment {
    pub fn new(daf: Arc<DafFile>, source: String, summary: Summary) -> Self {
        Segment {
            daf,
            source,
            summary,
            block: OnceCell::new(),
        }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Label stored in the name record next to the segment summary.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn center(&self) -> i32 {
        self.summary.center
    }

    pub fn target(&self) -> i32 {
        self.summary.target
    }

    pub fn start_jd(&self) -> f64 {
        self.summary.start_jd()
    }

    pub fn end_jd(&self) -> f64 {
        self.summary.end_jd()
    }

    pub fn representation(&self) -> Result<Representation, EphemError> {
        Representation::from_data_type(self.summary.data_type)
    }

    /// Coefficients of the segment, read on first use.
    pub fn coefficient_block(&self) -> Result<&CoefficientBlock, EphemError> {
        let representation = self.representation()?;
        self.block.get_or_try_init(|| {
            CoefficientBlock::load(&self.daf, &self.summary, representation.component_count())
        })
    }

    /// Evaluate every component series at each time of `tdb` shifted by `tdb2`.
    fn sample(&self, tdb: &[f64], tdb2: f64, with_rates: bool) -> Result<Samples, EphemError> {
        let block = self.coefficient_block()?;
        let component_count = block.component_count;

        let mut values = DMatrix::zeros(component_count, tdb.len());
        let mut rates = with_rates.then(|| DMatrix::zeros(component_count, tdb.len()));

        for (column, &time) in tdb.iter().enumerate() {
            let context = block.locate(time, tdb2)?;
            let (value, rate) = evaluate_record(
                context.record,
                component_count,
                context.offset,
                context.interval_length,
                with_rates,
            );

            values.set_column(column, &DVector::from_vec(value));
            if let (Some(rates), Some(rate)) = (rates.as_mut(), rate) {
                rates.set_column(column, &DVector::from_vec(rate));
            }
        }

        Ok((values, rates))
    }

    /// Position of the target relative to the center at `tdb + tdb2`.
    ///
    /// Arguments
    /// -----------------
    /// * `tdb`: Julian date (TDB), or its integer part.
    /// * `tdb2`: additional days added to `tdb`.
    ///
    /// Return
    /// ----------
    /// * The position in kilometers, [`EphemError::OutOfRange`] outside the
    ///   segment, [`EphemError::UnsupportedSpkDataType`] for non Chebyshev segments.
    pub fn compute(&self, tdb: f64, tdb2: f64) -> Result<Vector3<f64>, EphemError> {
        let positions = self.compute_array(&[tdb], tdb2)?;
        Ok(positions.column(0).into_owned())
    }

    /// Positions at several times, one column per time.
    pub fn compute_array(&self, tdb: &[f64], tdb2: f64) -> Result<Matrix3xX<f64>, EphemError> {
        let (values, _) = self.sample(tdb, tdb2, false)?;
        Ok(values.fixed_rows::<3>(0).into_owned())
    }

    /// Position and velocity of the target relative to the center.
    ///
    /// Only type 3 segments store a velocity; type 2 segments return
    /// [`EphemError::VelocityUnavailable`]. Use [`Segment::compute_with_rates`]
    /// to differentiate a position-only segment.
    pub fn compute_and_differentiate(
        &self,
        tdb: f64,
        tdb2: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), EphemError> {
        let (positions, velocities) = self.compute_and_differentiate_array(&[tdb], tdb2)?;
        Ok((
            positions.column(0).into_owned(),
            velocities.column(0).into_owned(),
        ))
    }

    /// Positions and velocities at several times, one column per time.
    pub fn compute_and_differentiate_array(
        &self,
        tdb: &[f64],
        tdb2: f64,
    ) -> Result<(Matrix3xX<f64>, Matrix3xX<f64>), EphemError> {
        match self.representation()? {
            Representation::PositionOnly => Err(EphemError::VelocityUnavailable {
                data_type: self.summary.data_type,
            }),
            Representation::PositionVelocity => {
                let (values, _) = self.sample(tdb, tdb2, false)?;
                Ok((
                    values.fixed_rows::<3>(0).into_owned(),
                    values.fixed_rows::<3>(3).into_owned(),
                ))
            }
        }
    }

    /// Every stored component and its time derivative (per day).
    ///
    /// Runs the coupled derivative recurrence for both Chebyshev types. For a
    /// type 2 segment the rates of the three position components are the
    /// velocity in kilometers per day.
    pub fn compute_with_rates(
        &self,
        tdb: f64,
        tdb2: f64,
    ) -> Result<(DVector<f64>, DVector<f64>), EphemError> {
        let (values, rates) = self.sample(&[tdb], tdb2, true)?;
        let rates = rates.unwrap_or_else(|| DMatrix::zeros(values.nrows(), 1));
        Ok((values.column(0).into_owned(), rates.column(0).into_owned()))
    }

    /// Position at a hifitime epoch.
    pub fn compute_at(&self, epoch: &Epoch) -> Result<Vector3<f64>, EphemError> {
        let (tdb, tdb2) = epoch_to_jd_split(epoch);
        self.compute(tdb, tdb2)
    }

    /// One-line description, with frame, type and source on a second line
    /// when `verbose` is set.
    pub fn describe(&self, verbose: bool) -> String {
        let summary = &self.summary;
        let mut text = format!(
            "{:.2}..{:.2}  {} ({}) -> {} ({})",
            self.start_jd(),
            self.end_jd(),
            body_label(summary.center),
            summary.center,
            body_label(summary.target),
            summary.target
        );
        if verbose {
            text.push_str(&format!(
                "\n  frame={} data_type={} source={}",
                summary.frame_id, summary.data_type, self.source
            ));
        }
        text
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(false))
    }
}
