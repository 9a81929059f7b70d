//! Chebyshev sets of one series of a DE file.
//!
//! Each data record of a DE file covers `record_span` days and splits it,
//! per series, into `n_subs` granules of equal length. Concatenating the
//! granules of every record gives a uniform grid of `set_count` polynomial
//! sets covering `[jalpha, jomega]`, which is how [`PolynomialSet`] keeps
//! them: `(set, component, coefficient)`, flattened.

use crate::{
    constants::END_BOUNDARY_TOLERANCE, ephem_errors::EphemError,
    jpl_ephem::naif::chebyshev::evaluate_record,
};

use super::horizon_ids::HorizonID;

#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialSet {
    pub body: HorizonID,
    pub dimension: usize,
    pub coefficient_count: usize,
    pub set_count: usize,
    coefficients: Vec<f64>,
}

impl PolynomialSet {
    pub fn new(
        body: HorizonID,
        dimension: usize,
        coefficient_count: usize,
        coefficients: Vec<f64>,
    ) -> Result<Self, EphemError> {
        let set_size = dimension * coefficient_count;
        if set_size == 0 || coefficients.is_empty() || coefficients.len() % set_size != 0 {
            return Err(EphemError::InvalidData(format!(
                "{} coefficients cannot be split in sets of {dimension} x {coefficient_count}",
                coefficients.len()
            )));
        }

        Ok(PolynomialSet {
            body,
            dimension,
            coefficient_count,
            set_count: coefficients.len() / set_size,
            coefficients,
        })
    }

    pub fn set(&self, index: usize) -> &[f64] {
        let size = self.dimension * self.coefficient_count;
        &self.coefficients[index * size..(index + 1) * size]
    }

    /// Evaluate the series at `jed`.
    ///
    /// Arguments
    /// -----------------
    /// * `jalpha`, `jomega`: first and last Julian date covered by the file.
    /// * `jed`: requested Julian date.
    ///
    /// Return
    /// ----------
    /// * `[values..., rates...]`, rates per day, or [`EphemError::OutOfRange`].
    pub fn evaluate(&self, jalpha: f64, jomega: f64, jed: f64) -> Result<Vec<f64>, EphemError> {
        let count = self.set_count as f64;
        let interval = (jomega - jalpha) / count;

        let delta = jed - jalpha;
        let mut index = delta.div_euclid(interval);
        let mut offset = delta.rem_euclid(interval);
        if index == count && offset <= END_BOUNDARY_TOLERANCE {
            index -= 1.0;
            offset += interval;
        }

        if !(index >= 0.0 && index < count) {
            return Err(EphemError::OutOfRange {
                context: format!("{} series", self.body),
                requested: jed,
                start: jalpha,
                end: jomega,
            });
        }

        let (mut values, rates) =
            evaluate_record(self.set(index as usize), self.dimension, offset, interval, true);
        values.extend(rates.unwrap_or_default());
        Ok(values)
    }
}
