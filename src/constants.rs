//! # Constants shared by the ephemeris readers
//!
//! Time-scale anchors, unit conversions and the fixed sizes of the binary
//! layouts read by [`crate::jpl_ephem`].

// -------------------------------------------------------------------------------------------------
// Time and units
// -------------------------------------------------------------------------------------------------

/// Julian date of the J2000.0 epoch (2000-01-01 12:00:00 TDB)
pub const T0: f64 = 2_451_545.0;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Tolerance (days) accepted past the final boundary of a coefficient grid.
///
/// A request landing exactly on the last boundary is folded into the last
/// sub-interval; anything further out is rejected.
pub const END_BOUNDARY_TOLERANCE: f64 = 1e-8;

// -------------------------------------------------------------------------------------------------
// DAF container layout
// -------------------------------------------------------------------------------------------------

/// Size in bytes of one DAF record
pub const DAF_RECORD_SIZE: usize = 1024;

/// Number of comment bytes stored in each comment record
pub const DAF_COMMENT_BYTES: usize = 1000;

/// Byte value terminating the comment area
pub const DAF_COMMENT_EOT: u8 = 0x04;

/// FTP validation string written in the file record of transfer-safe kernels
pub const DAF_FTPSTR: &[u8; 28] = b"FTPSTR:\r:\n:\r\n:\r\x00:\x81:\x10\xce:ENDFTP";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Julian date (days, TDB)
pub type JD = f64;

/// Seconds past J2000 (TDB)
pub type EphemerisSeconds = f64;

/// Distance in kilometers
pub type Kilometer = f64;
