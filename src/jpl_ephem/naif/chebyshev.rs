//! Chebyshev series evaluation.
//!
//! Both SPK segments and legacy DE files store every coordinate as a
//! truncated Chebyshev series over a sub-interval of length `L`. For a time
//! at `offset` days into the sub-interval the series is evaluated at the
//! normalized time `t = 2·offset/L − 1 ∈ [−1, 1]`:
//!
//! ```text
//! T_0 = 1, T_1 = t, T_i = 2t·T_{i−1} − T_{i−2}
//! value = Σ c_i · T_i
//! ```
//!
//! The time derivative uses the coupled recurrence
//!
//! ```text
//! U_0 = 0, U_1 = 1, U_i = 2t·U_{i−1} − U_{i−2} + 2·T_{i−1}
//! rate = Σ c_i · U_i · 2/L
//! ```
//!
//! which gives `U_2 = 4t` and matches `dT_i/dt` exactly.

/// Map an offset inside a sub-interval to the normalized Chebyshev time.
pub fn normalized_time(offset: f64, interval_length: f64) -> f64 {
    2.0 * offset / interval_length - 1.0
}

/// Chebyshev polynomials (and optionally their derivatives) at one time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChebyshevBasis {
    values: Vec<f64>,
    derivatives: Option<Vec<f64>>,
}

impl ChebyshevBasis {
    /// Build `T_0..T_{n-1}` at normalized time `t`.
    pub fn new(t: f64, n: usize) -> Self {
        let mut values = vec![0.0; n];
        if n > 0 {
            values[0] = 1.0;
        }
        if n > 1 {
            values[1] = t;
        }
        let twot = t + t;
        for i in 2..n {
            values[i] = twot * values[i - 1] - values[i - 2];
        }

        ChebyshevBasis {
            values,
            derivatives: None,
        }
    }

    /// Add the derivative pass `U_0..U_{n-1}` (with respect to `t`).
    pub fn with_derivatives(mut self) -> Self {
        let n = self.values.len();
        let t = if n > 1 { self.values[1] } else { 0.0 };
        let twot = t + t;

        let mut derivatives = vec![0.0; n];
        if n > 1 {
            derivatives[1] = 1.0;
        }
        for i in 2..n {
            derivatives[i] =
                twot * derivatives[i - 1] - derivatives[i - 2] + 2.0 * self.values[i - 1];
        }

        self.derivatives = Some(derivatives);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `Σ c_i T_i`.
    pub fn value(&self, coefficients: &[f64]) -> f64 {
        coefficients
            .iter()
            .zip(&self.values)
            .map(|(c, t)| c * t)
            .sum()
    }

    /// `Σ c_i U_i`, the derivative with respect to normalized time.
    ///
    /// Returns `None` when the basis was built without derivatives.
    pub fn derivative(&self, coefficients: &[f64]) -> Option<f64> {
        self.derivatives
            .as_ref()
            .map(|u| coefficients.iter().zip(u).map(|(c, u)| c * u).sum())
    }
}

/// Evaluate every component series of one coefficient record.
///
/// Arguments
/// -----------------
/// * `record`: `component_count` series of `record.len() / component_count`
///   coefficients each, stored one after the other.
/// * `component_count`: number of series in the record.
/// * `offset`: days elapsed since the start of the sub-interval.
/// * `interval_length`: length of the sub-interval in days.
/// * `with_rates`: also run the derivative pass.
///
/// Return
/// ----------
/// * `(values, rates)` where `rates` are per day and only present when requested.
pub fn evaluate_record(
    record: &[f64],
    component_count: usize,
    offset: f64,
    interval_length: f64,
    with_rates: bool,
) -> (Vec<f64>, Option<Vec<f64>>) {
    let coefficient_count = record.len() / component_count.max(1);
    let t = normalized_time(offset, interval_length);

    let mut basis = ChebyshevBasis::new(t, coefficient_count);
    if with_rates {
        basis = basis.with_derivatives();
    }

    let series = || record.chunks_exact(coefficient_count.max(1)).take(component_count);

    let values = series().map(|c| basis.value(c)).collect();
    let rates = with_rates.then(|| {
        let scale = 2.0 / interval_length;
        series()
            .map(|c| basis.derivative(c).unwrap_or(0.0) * scale)
            .collect()
    });

    (values, rates)
}
