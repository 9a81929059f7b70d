//! Readers for JPL planetary ephemerides.
//!
//! Two file families are supported:
//!
//! * NAIF SPK kernels (`de440.bsp`), read through [`naif::spk_kernel::SpkKernel`],
//! * legacy DE binaries (`linux_p1550p2650.440`), read through
//!   [`horizon::horizon_data::HorizonData`].
//!
//! [`JPLEphem`] picks the right reader from an [`EphemFileSource`] and exposes
//! the quantities both can produce.

use std::{
    fmt,
    io::{Read, Seek, SeekFrom},
    sync::{Mutex, PoisonError},
};

use hifitime::Epoch;

use crate::{ephem_errors::EphemError, time::epoch_to_jd_split};

use ephem_source::{EphemFilePath, EphemFileSource};
use horizon::{
    horizon_data::HorizonData, horizon_ids::HorizonID, interpolation_result::InterpResult,
};
use naif::spk_kernel::SpkKernel;

pub mod ephem_source;
pub mod horizon;
pub mod naif;

/// Byte stream an ephemeris can be read from.
pub trait EphemReader: Read + Seek + Send {}

impl<T: Read + Seek + Send> EphemReader for T {}

/// A byte stream shared between readers, every access seeks explicitly.
pub(crate) struct SharedReader {
    inner: Mutex<Box<dyn EphemReader>>,
    len: u64,
}

impl fmt::Debug for SharedReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedReader").field("len", &self.len).finish()
    }
}

impl SharedReader {
    pub(crate) fn new<R: EphemReader + 'static>(mut reader: R) -> Result<Self, EphemError> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(SharedReader {
            inner: Mutex::new(Box::new(reader)),
            len,
        })
    }

    pub(crate) fn len(&self) -> u64 {
        self.len
    }

    /// Read `len` bytes starting at byte `offset`.
    pub(crate) fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>, EphemError> {
        if offset.checked_add(len as u64).is_none_or(|end| end > self.len) {
            return Err(EphemError::InvalidData(format!(
                "read of {len} bytes at offset {offset} runs past the end of the file ({} bytes)",
                self.len
            )));
        }

        let mut reader = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        reader.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; len];
        reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }
}

#[derive(Debug)]
pub enum JPLEphem {
    HorizonFile(HorizonData),
    NaifFile(SpkKernel),
}

impl JPLEphem {
    /// Open the ephemeris described by `file_source` from the default cache directory.
    pub fn new(file_source: &EphemFileSource) -> Result<Self, EphemError> {
        Self::open(&EphemFilePath::resolve(file_source, None)?)
    }

    /// Open an already resolved ephemeris file.
    pub fn open(file_path: &EphemFilePath) -> Result<Self, EphemError> {
        match file_path {
            EphemFilePath::JPLHorizon(path, _) => {
                Ok(JPLEphem::HorizonFile(HorizonData::read_horizon_file(path)?))
            }
            EphemFilePath::Naif(path, _) => Ok(JPLEphem::NaifFile(SpkKernel::open(path)?)),
        }
    }

    /// Barycentric position and velocity of the Earth.
    ///
    /// Arguments
    /// -----------------
    /// * `ephem_time`: the requested instant.
    ///
    /// Return
    /// ----------
    /// * Position in kilometers and velocity in kilometers per day, relative
    ///   to the Solar System barycenter in the frame of the file.
    pub fn earth_barycentric(&self, ephem_time: &Epoch) -> Result<InterpResult, EphemError> {
        let (tdb, tdb2) = epoch_to_jd_split(ephem_time);
        match self {
            JPLEphem::HorizonFile(horizon_data) => horizon_data.ephemeris(
                HorizonID::Earth,
                HorizonID::SolarSystemBarycenter,
                tdb + tdb2,
                true,
            ),
            JPLEphem::NaifFile(kernel) => {
                // SSB -> Earth-Moon barycenter -> Earth
                let mut state = InterpResult::zero(true);
                for (center, target) in [(0, 3), (3, 399)] {
                    let segment = kernel.segments_for(center, target)?;
                    let (values, rates) = segment.compute_with_rates(tdb, tdb2)?;
                    state = state
                        + InterpResult::new(
                            values.fixed_rows::<3>(0).into_owned(),
                            Some(rates.fixed_rows::<3>(0).into_owned()),
                        );
                }
                Ok(state)
            }
        }
    }
}
