//! Bodies and series of the legacy JPL DE binary files.
//!
//! A DE file stores fifteen Chebyshev series, always in the same order. Two
//! more names are accepted by [`HorizonID`]: the Earth, derived from the
//! Earth-Moon barycenter and the geocentric Moon, and the Solar System
//! barycenter, the origin of every planetary series.

use std::{fmt, str::FromStr};

use crate::ephem_errors::EphemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizonID {
    Mercury,
    Venus,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// Geocentric Moon.
    Moon,
    Sun,
    Nutations,
    Librations,
    LunarMantle,
    TTMinusTDB,
    Earth,
    SolarSystemBarycenter,
}

/// Series stored in a DE file, in file order.
pub const SERIES: [HorizonID; 15] = [
    HorizonID::Mercury,
    HorizonID::Venus,
    HorizonID::EarthMoonBarycenter,
    HorizonID::Mars,
    HorizonID::Jupiter,
    HorizonID::Saturn,
    HorizonID::Uranus,
    HorizonID::Neptune,
    HorizonID::Pluto,
    HorizonID::Moon,
    HorizonID::Sun,
    HorizonID::Nutations,
    HorizonID::Librations,
    HorizonID::LunarMantle,
    HorizonID::TTMinusTDB,
];

impl HorizonID {
    /// Position of the series in the pointer table, `None` for derived bodies.
    pub fn series_index(self) -> Option<usize> {
        SERIES.iter().position(|&series| series == self)
    }

    /// Number of components of the series.
    pub fn dimension(self) -> usize {
        match self {
            HorizonID::Nutations => 2,
            HorizonID::TTMinusTDB => 1,
            _ => 3,
        }
    }

    /// Whether the series holds a Cartesian position.
    pub fn is_position(self) -> bool {
        !matches!(
            self,
            HorizonID::Nutations
                | HorizonID::Librations
                | HorizonID::LunarMantle
                | HorizonID::TTMinusTDB
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            HorizonID::Mercury => "mercury",
            HorizonID::Venus => "venus",
            HorizonID::EarthMoonBarycenter => "earthmoon",
            HorizonID::Mars => "mars",
            HorizonID::Jupiter => "jupiter",
            HorizonID::Saturn => "saturn",
            HorizonID::Uranus => "uranus",
            HorizonID::Neptune => "neptune",
            HorizonID::Pluto => "pluto",
            HorizonID::Moon => "moon",
            HorizonID::Sun => "sun",
            HorizonID::Nutations => "nutations",
            HorizonID::Librations => "librations",
            HorizonID::LunarMantle => "mantle",
            HorizonID::TTMinusTDB => "tt-tdb",
            HorizonID::Earth => "earth",
            HorizonID::SolarSystemBarycenter => "ssb",
        }
    }
}

impl fmt::Display for HorizonID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HorizonID {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let body = match lower.as_str() {
            "emb" | "earth-moon barycenter" => HorizonID::EarthMoonBarycenter,
            "solar system barycenter" => HorizonID::SolarSystemBarycenter,
            "nutation" => HorizonID::Nutations,
            "libration" => HorizonID::Librations,
            name => SERIES
                .iter()
                .chain(&[HorizonID::Earth, HorizonID::SolarSystemBarycenter])
                .copied()
                .find(|body| body.name() == name)
                .ok_or_else(|| EphemError::UnknownBody(s.to_string()))?,
        };
        Ok(body)
    }
}
