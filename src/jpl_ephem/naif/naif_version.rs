//! Planetary SPK kernels distributed by NAIF under `generic_kernels/spk/planets/`.

use std::{fmt, str::FromStr};

use crate::ephem_errors::EphemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaifVersion {
    DE430,
    DE431p1,
    DE431p2,
    DE432,
    DE435,
    DE438,
    DE440,
    DE440s,
    DE441p1,
    DE441p2,
    DE442,
}

impl NaifVersion {
    /// Canonical kernel file name, e.g. `de440.bsp`.
    pub fn get_filename(self) -> &'static str {
        match self {
            NaifVersion::DE430 => "de430.bsp",
            NaifVersion::DE431p1 => "de431_part-1.bsp",
            NaifVersion::DE431p2 => "de431_part-2.bsp",
            NaifVersion::DE432 => "de432.bsp",
            NaifVersion::DE435 => "de435.bsp",
            NaifVersion::DE438 => "de438.bsp",
            NaifVersion::DE440 => "de440.bsp",
            NaifVersion::DE440s => "de440s.bsp",
            NaifVersion::DE441p1 => "de441_part-1.bsp",
            NaifVersion::DE441p2 => "de441_part-2.bsp",
            NaifVersion::DE442 => "de442.bsp",
        }
    }
}

impl fmt::Display for NaifVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stem = self.get_filename().trim_end_matches(".bsp");
        f.write_str(&stem.replacen("de", "DE", 1))
    }
}

impl FromStr for NaifVersion {
    type Err = EphemError;

    /// Accepts the release label (`DE440`, `DE441_part-1`) or the kernel
    /// file name (`de440.bsp`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_suffix(".bsp").unwrap_or(&wanted);

        [
            NaifVersion::DE430,
            NaifVersion::DE431p1,
            NaifVersion::DE431p2,
            NaifVersion::DE432,
            NaifVersion::DE435,
            NaifVersion::DE438,
            NaifVersion::DE440,
            NaifVersion::DE440s,
            NaifVersion::DE441p1,
            NaifVersion::DE441p2,
            NaifVersion::DE442,
        ]
        .into_iter()
        .find(|version| version.get_filename().trim_end_matches(".bsp") == wanted)
        .ok_or_else(|| EphemError::InvalidEphemFileSource(format!("unknown NAIF kernel {s}")))
    }
}
