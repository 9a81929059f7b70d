//! Legacy DE binary releases and their distribution file names.
//!
//! JPL publishes the legacy binaries under `.../eph/planets/Linux/` as
//! `<version dir>/<file>`; only the last component is used for the local copy.

use std::{fmt, str::FromStr};

use crate::ephem_errors::EphemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JPLHorizonVersion {
    DE102,
    DE200,
    DE202,
    DE403,
    DE405,
    DE406,
    DE410,
    DE413,
    DE414,
    DE418,
    DE421,
    DE422,
    DE423,
    DE430,
    DE430t,
    DE431,
    DE440,
    DE440t,
    DE441,
}

const ALL: [JPLHorizonVersion; 19] = [
    JPLHorizonVersion::DE102,
    JPLHorizonVersion::DE200,
    JPLHorizonVersion::DE202,
    JPLHorizonVersion::DE403,
    JPLHorizonVersion::DE405,
    JPLHorizonVersion::DE406,
    JPLHorizonVersion::DE410,
    JPLHorizonVersion::DE413,
    JPLHorizonVersion::DE414,
    JPLHorizonVersion::DE418,
    JPLHorizonVersion::DE421,
    JPLHorizonVersion::DE422,
    JPLHorizonVersion::DE423,
    JPLHorizonVersion::DE430,
    JPLHorizonVersion::DE430t,
    JPLHorizonVersion::DE431,
    JPLHorizonVersion::DE440,
    JPLHorizonVersion::DE440t,
    JPLHorizonVersion::DE441,
];

impl JPLHorizonVersion {
    pub fn label(self) -> &'static str {
        match self {
            JPLHorizonVersion::DE102 => "DE102",
            JPLHorizonVersion::DE200 => "DE200",
            JPLHorizonVersion::DE202 => "DE202",
            JPLHorizonVersion::DE403 => "DE403",
            JPLHorizonVersion::DE405 => "DE405",
            JPLHorizonVersion::DE406 => "DE406",
            JPLHorizonVersion::DE410 => "DE410",
            JPLHorizonVersion::DE413 => "DE413",
            JPLHorizonVersion::DE414 => "DE414",
            JPLHorizonVersion::DE418 => "DE418",
            JPLHorizonVersion::DE421 => "DE421",
            JPLHorizonVersion::DE422 => "DE422",
            JPLHorizonVersion::DE423 => "DE423",
            JPLHorizonVersion::DE430 => "DE430",
            JPLHorizonVersion::DE430t => "DE430t",
            JPLHorizonVersion::DE431 => "DE431",
            JPLHorizonVersion::DE440 => "DE440",
            JPLHorizonVersion::DE440t => "DE440t",
            JPLHorizonVersion::DE441 => "DE441",
        }
    }

    /// Path of the binary relative to the JPL `Linux/` directory.
    pub fn get_filename(self) -> &'static str {
        match self {
            JPLHorizonVersion::DE102 => "de102/lnxm1410p3002.102",
            JPLHorizonVersion::DE200 => "de200/lnxm1600p2170.200",
            JPLHorizonVersion::DE202 => "de202/lnxp1900p2050.202",
            JPLHorizonVersion::DE403 => "de403/lnxp1600p2200.403",
            JPLHorizonVersion::DE405 => "de405/lnxp1600p2200.405",
            JPLHorizonVersion::DE406 => "de406/lnxm3000p3000.406",
            JPLHorizonVersion::DE410 => "de410/lnxp1960p2020.410",
            JPLHorizonVersion::DE413 => "de413/lnxp1900p2050.413",
            JPLHorizonVersion::DE414 => "de414/lnxp1600p2200.414",
            JPLHorizonVersion::DE418 => "de418/lnxp1900p2050.418",
            JPLHorizonVersion::DE421 => "de421/lnxp1900p2053.421",
            JPLHorizonVersion::DE422 => "de422/lnxm3000p3000.422",
            JPLHorizonVersion::DE423 => "de423/lnxp1800p2200.423",
            JPLHorizonVersion::DE430 => "de430/linux_p1550p2650.430",
            JPLHorizonVersion::DE430t => "de430t/linux_p1550p2650.430t",
            JPLHorizonVersion::DE431 => "de431/lnxm13000p17000.431",
            JPLHorizonVersion::DE440 => "de440/linux_p1550p2650.440",
            JPLHorizonVersion::DE440t => "de440t/linux_p1550p2650.440t",
            JPLHorizonVersion::DE441 => "de441/linux_m13000p17000.441",
        }
    }

    /// Name of the file once stored locally.
    pub fn local_filename(self) -> &'static str {
        let path = self.get_filename();
        path.rsplit('/').next().unwrap_or(path)
    }
}

impl fmt::Display for JPLHorizonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JPLHorizonVersion {
    type Err = EphemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.into_iter()
            .find(|version| version.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| EphemError::InvalidEphemFileSource(format!("unknown DE release {s}")))
    }
}
