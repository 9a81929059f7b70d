//! Legacy JPL DE binary ephemerides.
//!
//! - [`horizon_data`]: header, constants and lazy series of a DE binary,
//!   plus [`HorizonData::ephemeris`](horizon_data::HorizonData::ephemeris)
//!   for body-to-body states.
//! - [`horizon_ids`]: the fifteen stored series and the derived bodies.
//! - [`horizon_records`]: uniform grid of Chebyshev sets of one series.
//! - [`horizon_version`]: DE releases and their distribution file names.
//! - [`interpolation_result`]: state vectors and their arithmetic.

pub mod horizon_data;
pub mod horizon_ids;
pub mod horizon_records;
pub mod horizon_version;
pub mod interpolation_result;
