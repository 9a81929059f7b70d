//! SPK data types.
//!
//! Every SPK segment declares how its array is laid out through an integer
//! data type. Only the two Chebyshev layouts are evaluated by this crate, the
//! other known types are recognized for display purposes.

use std::fmt;

use crate::ephem_errors::EphemError;

/// Chebyshev layouts that [`crate::jpl_ephem::naif::segment::Segment`] can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Type 2: x, y, z series, velocity obtained by differentiation.
    PositionOnly,
    /// Type 3: x, y, z, vx, vy, vz series.
    PositionVelocity,
}

impl Representation {
    /// Select the evaluator for an SPK data type.
    ///
    /// Return
    /// ----------
    /// * [`EphemError::UnsupportedSpkDataType`] for any type other than 2 and 3.
    pub fn from_data_type(data_type: i32) -> Result<Self, EphemError> {
        match data_type {
            2 => Ok(Representation::PositionOnly),
            3 => Ok(Representation::PositionVelocity),
            _ => Err(EphemError::UnsupportedSpkDataType(data_type)),
        }
    }

    pub fn data_type(self) -> i32 {
        match self {
            Representation::PositionOnly => 2,
            Representation::PositionVelocity => 3,
        }
    }

    /// Number of Chebyshev series stored per sub-interval.
    pub fn component_count(self) -> usize {
        match self {
            Representation::PositionOnly => 3,
            Representation::PositionVelocity => 6,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", data_type_name(self.data_type()))
    }
}

/// Human readable name of an SPK data type.
pub fn data_type_name(data_type: i32) -> &'static str {
    match data_type {
        1 => "Modified Difference Array",
        2 => "Chebyshev Position Only",
        3 => "Chebyshev Position Velocity",
        5 => "Two Body Discrete States",
        8 => "Equally Spaced Lagrange",
        9 => "Unequally Spaced Lagrange",
        10 => "Two Line Elements",
        12 => "Hermite Uniform",
        13 => "Hermite Non Uniform",
        14 => "Chebyshev Non Uniform",
        15 => "Precessing Conic",
        17 => "Equinoctial Elements",
        18 => "ESA Hermite Lagrange",
        19 => "ESA Piecewise Interpolation",
        20 => "Chebyshev Velocity Only",
        21 => "Extended Modified Difference Array",
        _ => "Unknown",
    }
}
