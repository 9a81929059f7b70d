//! Legacy DE binary reader.
//!
//! The file is a sequence of fixed-size little-endian records of `recsize`
//! bytes. The first holds the header, the second the values of the
//! ephemeris constants, and every following record the Chebyshev
//! coefficients of all series over `record_span` days:
//!
//! ```text
//! offset  content
//!      0  3 title lines, 84 bytes each
//!    252  400 constant names, 6 bytes each
//!   2652  jalpha, jomega, record_span          (f64 x 3)
//!   2676  NCON                                 (i32)
//!   2680  AU, EMRAT                            (f64 x 2)
//!   2696  pointer table for series 0..=11      (i32 x 36)
//!   2840  DE number                            (i32)
//!   2844  pointer for the librations           (i32 x 3)
//!   2856  names 401..=NCON, then the pointers of the lunar mantle and TT-TDB
//! ```
//!
//! A pointer `[offset, n_coeffs, n_subs]` locates a series inside a data
//! record: `offset` is the 1-based index of its first coefficient, counting
//! the two Julian dates that open every record. Series are read on first use
//! and kept for the lifetime of the reader.

use std::{
    collections::HashMap,
    fmt,
    fs::File,
    io::{BufReader, ErrorKind},
};

use camino::Utf8Path;
use nalgebra::DVector;
use nom::{
    bytes::complete::take,
    multi::count,
    number::complete::{le_f64, le_i32},
    IResult, Parser,
};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{
    ephem_errors::EphemError,
    jpl_ephem::{EphemReader, SharedReader},
};

use super::{
    horizon_ids::{HorizonID, SERIES},
    horizon_records::PolynomialSet,
    interpolation_result::InterpResult,
};

const TITLE_LINE_BYTES: usize = 84;
const OLD_MAX: usize = 400;
const FIXED_HEADER_BYTES: usize = 2856;

/// `[offset, n_coeffs, n_subs]` of every series, in [`SERIES`] order.
pub type IPT = [[u32; 3]; 15];

#[derive(Debug, PartialEq, Clone)]
pub struct HorizonHeader {
    pub titles: Vec<String>,
    pub constant_names: Vec<String>,
    pub jalpha: f64,
    pub jomega: f64,
    pub record_span: f64,
    pub au: f64,
    pub emrat: f64,
    pub ipt: IPT,
    pub numde: i32,
    /// Record size in bytes.
    pub recsize: usize,
}

fn char6(input: &[u8]) -> IResult<&[u8], String> {
    let (input, raw) = take(6usize)(input)?;
    Ok((input, String::from_utf8_lossy(raw).trim().to_string()))
}

fn title_line(input: &[u8]) -> IResult<&[u8], String> {
    let (input, raw) = take(TITLE_LINE_BYTES)(input)?;
    Ok((input, String::from_utf8_lossy(raw).trim().to_string()))
}

fn pointer(input: &[u8]) -> IResult<&[u8], [u32; 3]> {
    let (input, (offset, n_coeffs, n_subs)) = (le_i32, le_i32, le_i32).parse(input)?;
    // negative words only show up in files that are not DE binaries
    let field = |v: i32| u32::try_from(v).unwrap_or(0);
    Ok((input, [field(offset), field(n_coeffs), field(n_subs)]))
}

struct FixedHeader {
    titles: Vec<String>,
    names: Vec<String>,
    ss: (f64, f64, f64),
    ncon: usize,
    au: f64,
    emrat: f64,
    pointers: Vec<[u32; 3]>,
    numde: i32,
    librations: [u32; 3],
}

fn fixed_header(input: &[u8]) -> IResult<&[u8], FixedHeader> {
    let (input, titles) = count(title_line, 3).parse(input)?;
    let (input, names) = count(char6, OLD_MAX).parse(input)?;
    let (input, ss) = (le_f64, le_f64, le_f64).parse(input)?;
    let (input, ncon) = le_i32(input)?;
    let (input, (au, emrat)) = (le_f64, le_f64).parse(input)?;
    let (input, pointers) = count(pointer, 12).parse(input)?;
    let (input, numde) = le_i32(input)?;
    let (input, librations) = pointer(input)?;

    Ok((
        input,
        FixedHeader {
            titles,
            names,
            ss,
            ncon: ncon.max(0) as usize,
            au,
            emrat,
            pointers,
            numde,
            librations,
        },
    ))
}

fn extended_header(
    input: &[u8],
    extra_names: usize,
) -> IResult<&[u8], (Vec<String>, [[u32; 3]; 2])> {
    let (input, names) = count(char6, extra_names).parse(input)?;
    let (input, (mantle, tt_tdb)) = (pointer, pointer).parse(input)?;
    Ok((input, (names, [mantle, tt_tdb])))
}

/// Size in bytes of a data record implied by the pointer table.
fn compute_recsize(ipt: &IPT) -> usize {
    let words: usize = 2 + SERIES
        .iter()
        .zip(ipt)
        .map(|(series, [_, n_coeffs, n_subs])| {
            *n_coeffs as usize * *n_subs as usize * series.dimension()
        })
        .sum::<usize>();
    words * 8
}

impl HorizonHeader {
    fn read(reader: &SharedReader) -> Result<Self, EphemError> {
        if reader.len() < (FIXED_HEADER_BYTES as u64) {
            return Err(EphemError::InvalidFileFormat(format!(
                "file is {} bytes long, shorter than a DE header",
                reader.len()
            )));
        }

        let fixed_bytes = reader.read_at(0, FIXED_HEADER_BYTES)?;
        let (_, fixed) = fixed_header(&fixed_bytes)?;

        let (ss_start, ss_end, record_span) = fixed.ss;
        if !(record_span > 0.0 && ss_end > ss_start && fixed.emrat > 0.0) {
            return Err(EphemError::InvalidFileFormat(format!(
                "inconsistent DE header: span [{ss_start}, {ss_end}] by {record_span} days, EMRAT {}",
                fixed.emrat
            )));
        }

        let extra_names = fixed.ncon.saturating_sub(OLD_MAX);
        let extended_len = extra_names * 6 + 24;
        let (more_names, [mantle, tt_tdb]) =
            if reader.len() >= (FIXED_HEADER_BYTES + extended_len) as u64 {
                let bytes = reader.read_at(FIXED_HEADER_BYTES as u64, extended_len)?;
                extended_header(&bytes, extra_names)?.1
            } else {
                (Vec::new(), [[0; 3]; 2])
            };

        let mut ipt: IPT = [[0; 3]; 15];
        ipt[..12].copy_from_slice(&fixed.pointers);
        ipt[12] = fixed.librations;
        ipt[13] = mantle;
        ipt[14] = tt_tdb;

        let recsize = compute_recsize(&ipt);
        for (series, [offset, n_coeffs, n_subs]) in SERIES.iter().zip(&ipt) {
            let words = *n_coeffs as usize * *n_subs as usize * series.dimension();
            if words > 0 && (*offset < 3 || *offset as usize - 1 + words > recsize / 8) {
                return Err(EphemError::InvalidFileFormat(format!(
                    "pointer of the {series} series runs outside a {recsize} bytes record"
                )));
            }
        }

        let mut constant_names = fixed.names;
        constant_names.truncate(fixed.ncon.min(OLD_MAX));
        constant_names.extend(more_names);

        Ok(HorizonHeader {
            titles: fixed.titles,
            constant_names,
            jalpha: ss_start,
            jomega: ss_end,
            record_span,
            au: fixed.au,
            emrat: fixed.emrat,
            ipt,
            numde: fixed.numde,
            recsize,
        })
    }

    pub fn version(&self) -> String {
        format!("DE{}", self.numde)
    }
}

impl fmt::Display for HorizonHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Version", self.version()),
            ("Start JD", format!("{:.1}", self.jalpha)),
            ("End JD", format!("{:.1}", self.jomega)),
            ("Record span", format!("{} days", self.record_span)),
            ("Record size", format!("{} bytes", self.recsize)),
            ("Constants", self.constant_names.len().to_string()),
            ("AU", format!("{} km", self.au)),
            ("EMRAT", self.emrat.to_string()),
        ];

        writeln!(f, "+--------------+----------------------+")?;
        for (label, value) in rows {
            writeln!(f, "| {label:<12} | {value:<20} |")?;
        }
        writeln!(f, "+--------------+----------------------+")
    }
}

/// An opened legacy DE binary.
#[derive(Debug)]
pub struct HorizonData {
    header: HorizonHeader,
    constants: HashMap<String, f64>,
    record_count: usize,
    reader: SharedReader,
    sets: [OnceCell<PolynomialSet>; 15],
}

impl HorizonData {
    /// Open a DE binary stored on disk.
    pub fn read_horizon_file(path: &Utf8Path) -> Result<Self, EphemError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => EphemError::JPLFileNotFound(path.to_string()),
            _ => EphemError::IoError(err),
        })?;
        let data = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path,
            version = %data.header.version(),
            records = data.record_count,
            "loaded legacy DE ephemeris"
        );
        Ok(data)
    }

    /// Read the header and the constants of a DE binary held by any seekable stream.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: the stream, positioned anywhere.
    ///
    /// Return
    /// ----------
    /// * The reader, [`EphemError::InvalidFileFormat`] when the header is not
    ///   a DE header, [`EphemError::InvalidData`] when the file holds fewer
    ///   data records than the header announces.
    pub fn from_reader<R: EphemReader + 'static>(reader: R) -> Result<Self, EphemError> {
        let reader = SharedReader::new(reader)?;
        let header = HorizonHeader::read(&reader)?;
        let recsize = header.recsize;

        let ncon = header.constant_names.len();
        if ncon * 8 > recsize {
            return Err(EphemError::InvalidFileFormat(format!(
                "{ncon} constants do not fit in a {recsize} bytes record"
            )));
        }
        let values_bytes = reader.read_at(recsize as u64, ncon * 8)?;
        let (_, values) = count(le_f64::<_, nom::error::Error<&[u8]>>, ncon)
            .parse(values_bytes.as_slice())?;
        let constants = header
            .constant_names
            .iter()
            .cloned()
            .zip(values)
            .collect();

        let expected = ((header.jomega - header.jalpha) / header.record_span).round() as usize;
        let available = (reader.len() as usize / recsize).saturating_sub(2);
        if available < expected {
            return Err(EphemError::InvalidData(format!(
                "{} announces {expected} data records but the file holds {available}",
                header.version()
            )));
        }
        if available > expected {
            warn!(expected, available, "DE file carries trailing records, ignoring them");
        }

        debug!(
            version = %header.version(),
            recsize,
            constants = ncon,
            "decoded DE header"
        );

        Ok(HorizonData {
            header,
            constants,
            record_count: expected,
            reader,
            sets: std::array::from_fn(|_| OnceCell::new()),
        })
    }

    pub fn header(&self) -> &HorizonHeader {
        &self.header
    }

    pub fn constants(&self) -> &HashMap<String, f64> {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Fraction of the Earth-Moon barycenter offset carried by the Earth.
    pub fn earth_share(&self) -> f64 {
        1.0 / (1.0 + self.header.emrat)
    }

    pub fn moon_share(&self) -> f64 {
        self.header.emrat / (1.0 + self.header.emrat)
    }

    /// Series stored in the file.
    pub fn names(&self) -> Vec<HorizonID> {
        SERIES
            .iter()
            .zip(&self.header.ipt)
            .filter(|(_, [_, n_coeffs, n_subs])| *n_coeffs > 0 && *n_subs > 0)
            .map(|(series, _)| *series)
            .collect()
    }

    /// Polynomial sets of a series, read on first use.
    pub fn load_set(&self, body: HorizonID) -> Result<&PolynomialSet, EphemError> {
        let index = body
            .series_index()
            .ok_or_else(|| EphemError::UnknownBody(format!("{body} is not stored as a series")))?;

        self.sets[index].get_or_try_init(|| {
            let [offset, n_coeffs, n_subs] = self.header.ipt[index];
            let (n_coeffs, n_subs) = (n_coeffs as usize, n_subs as usize);
            if n_coeffs == 0 || n_subs == 0 {
                return Err(EphemError::UnknownBody(format!(
                    "{body} is not stored in {}",
                    self.header.version()
                )));
            }

            let words = n_coeffs * n_subs * body.dimension();
            let mut coefficients = Vec::with_capacity(words * self.record_count);
            for record in 0..self.record_count {
                let start = (2 + record) * self.header.recsize + (offset as usize - 1) * 8;
                let bytes = self.reader.read_at(start as u64, words * 8)?;
                let (_, values) =
                    count(le_f64::<_, nom::error::Error<&[u8]>>, words).parse(bytes.as_slice())?;
                coefficients.extend(values);
            }

            debug!(
                body = %body,
                sets = self.record_count * n_subs,
                n_coeffs,
                "loaded DE series"
            );
            PolynomialSet::new(body, body.dimension(), n_coeffs, coefficients)
        })
    }

    /// Values and rates of a series at `jed`.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: a series stored in the file.
    /// * `jed`: Julian date (TDB).
    ///
    /// Return
    /// ----------
    /// * `[values..., rates...]` (length `2 * dimension`), positions in
    ///   kilometers and rates per day, or [`EphemError::OutOfRange`].
    pub fn compute(&self, body: HorizonID, jed: f64) -> Result<DVector<f64>, EphemError> {
        let set = self.load_set(body)?;
        let values = set.evaluate(self.header.jalpha, self.header.jomega, jed)?;
        Ok(DVector::from_vec(values))
    }

    fn series_state(
        &self,
        body: HorizonID,
        jed: f64,
        compute_velocity: bool,
    ) -> Result<InterpResult, EphemError> {
        let state = self.compute(body, jed)?;
        Ok(InterpResult::new(
            state.fixed_rows::<3>(0).into_owned(),
            compute_velocity.then(|| state.fixed_rows::<3>(3).into_owned()),
        ))
    }

    /// State of `body` relative to the Solar System barycenter.
    fn barycentric(
        &self,
        body: HorizonID,
        jed: f64,
        compute_velocity: bool,
    ) -> Result<InterpResult, EphemError> {
        match body {
            HorizonID::SolarSystemBarycenter => Ok(InterpResult::zero(compute_velocity)),
            HorizonID::Earth | HorizonID::Moon => {
                let emb = self.series_state(HorizonID::EarthMoonBarycenter, jed, compute_velocity)?;
                let moon = self.series_state(HorizonID::Moon, jed, compute_velocity)?;
                Ok(if body == HorizonID::Earth {
                    &emb - &(&moon * self.earth_share())
                } else {
                    &emb + &(&moon * self.moon_share())
                })
            }
            _ if body.is_position() => self.series_state(body, jed, compute_velocity),
            _ => Err(EphemError::UnknownBody(format!("{body} is not a position series"))),
        }
    }

    /// State of `target` relative to `center` at `jed`.
    ///
    /// Arguments
    /// -----------------
    /// * `target`, `center`: bodies of the file or one of the derived bodies.
    /// * `jed`: Julian date (TDB).
    /// * `compute_velocity`: also return the velocity (km/day).
    ///
    /// Return
    /// ----------
    /// * The relative state in kilometers.
    pub fn ephemeris(
        &self,
        target: HorizonID,
        center: HorizonID,
        jed: f64,
        compute_velocity: bool,
    ) -> Result<InterpResult, EphemError> {
        let target_state = self.barycentric(target, jed, compute_velocity)?;
        let center_state = self.barycentric(center, jed, compute_velocity)?;
        Ok(target_state - center_state)
    }
}
