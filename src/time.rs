//! Conversions between the time representations used by the readers.
//!
//! SPK summaries and coefficient directories store TDB seconds past J2000,
//! the evaluators take Julian dates split in two parts `(tdb, tdb2)` so that
//! the caller can keep sub-millisecond resolution far from J2000.

use hifitime::Epoch;

use crate::constants::{EphemerisSeconds, JD, SECONDS_PER_DAY, T0};

/// Convert TDB seconds past J2000 into a Julian date.
pub fn jd(seconds: EphemerisSeconds) -> JD {
    T0 + seconds / SECONDS_PER_DAY
}

/// Convert a Julian date into TDB seconds past J2000.
pub fn seconds_past_j2000(jd: JD) -> EphemerisSeconds {
    (jd - T0) * SECONDS_PER_DAY
}

/// Split an epoch into the `(tdb, tdb2)` pair expected by the evaluators.
///
/// The first part is the J2000 anchor, the second carries the days elapsed
/// since it, which keeps the fractional day of recent epochs exact.
///
/// Arguments
/// -----------------
/// * `epoch`: the instant to convert, in any time scale known to hifitime.
///
/// Return
/// ----------
/// * `(T0, days past J2000 in ephemeris time)`
pub fn epoch_to_jd_split(epoch: &Epoch) -> (JD, f64) {
    (T0, epoch.to_et_seconds() / SECONDS_PER_DAY)
}

/// Build an epoch from TDB seconds past J2000.
pub fn epoch_from_seconds(seconds: EphemerisSeconds) -> Epoch {
    Epoch::from_et_seconds(seconds)
}
