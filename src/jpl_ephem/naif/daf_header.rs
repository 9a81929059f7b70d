//! DAF (Double precision Array File) header parsing utilities.
//!
//! This module decodes the first 1024-byte record of a DAF container (the
//! "file record") and exposes its structural metadata through [`DAFHeader`].
//!
//! # What the header contains
//!
//! * **`idword`**: Format identifier (e.g. `"DAF/SPK"`), eight ASCII bytes.
//!   Files written before the `DAF/xxxx` convention carry `"NAIF/DAF"`.
//! * **`nd`** / **`ni`**: Number of double-precision / integer components
//!   in each array summary. SPK kernels use `nd = 2`, `ni = 6`.
//! * **`fward`** / **`bward`**: Record numbers (1-based) of the first and last
//!   summary record of the doubly-linked summary chain.
//! * **`free`**: First free address (1-based, in double-precision words).
//! * **`internal_filename`**: Human-readable kernel name (60 bytes, padded).
//! * **`locfmt`**: Binary format tag (`"BIG-IEEE"` or `"LTL-IEEE"`) telling
//!   how numeric data are encoded inside the file.
//! * **FTP string**: NAIF sentinel used to detect files damaged by an ASCII
//!   mode transfer.
//!
//! # Byte order
//!
//! The byte order is read from `locfmt` before any integer is decoded. Files
//! without a format tag get their byte order inferred from the `ND`/`NI`
//! words: only one of the two interpretations yields small positive counts.
//!
//! # See also
//! ------------
//! * [`DAFHeader::from_record`] – Validating decoder for the file record.
//! * [`crate::jpl_ephem::naif::daf_file::DafFile`] – Uses the header to walk the file.

use std::fmt;

use nom::{
    bytes::complete::take,
    number::complete::{be_f64, be_i32, le_f64, le_i32},
    IResult,
};

use crate::{
    constants::{DAF_FTPSTR, DAF_RECORD_SIZE},
    ephem_errors::EphemError,
};

/// Byte order of the numeric words stored in a DAF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Map a `LOCFMT` tag to a byte order, `None` when the tag is unknown or blank.
    fn from_locfmt(locfmt: &[u8]) -> Option<Self> {
        match locfmt {
            b"LTL-IEEE" => Some(Endian::Little),
            b"BIG-IEEE" => Some(Endian::Big),
            _ => None,
        }
    }

    /// Infer the byte order from the raw `ND` and `NI` words.
    fn detect(nd_ni: &[u8]) -> Option<Self> {
        let plausible = |nd: i32, ni: i32| (1..=124).contains(&nd) && (2..=250).contains(&ni);

        let le = |b: &[u8]| i32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        let be = |b: &[u8]| i32::from_be_bytes([b[0], b[1], b[2], b[3]]);

        if plausible(le(&nd_ni[0..4]), le(&nd_ni[4..8])) {
            Some(Endian::Little)
        } else if plausible(be(&nd_ni[0..4]), be(&nd_ni[4..8])) {
            Some(Endian::Big)
        } else {
            None
        }
    }

    /// Decode one double-precision word.
    pub fn read_f64(self, bytes: [u8; 8]) -> f64 {
        match self {
            Endian::Little => f64::from_le_bytes(bytes),
            Endian::Big => f64::from_be_bytes(bytes),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => write!(f, "LTL-IEEE"),
            Endian::Big => write!(f, "BIG-IEEE"),
        }
    }
}

/// nom parser for a 32-bit integer in the given byte order.
pub(crate) fn parse_i32(endian: Endian, input: &[u8]) -> IResult<&[u8], i32> {
    match endian {
        Endian::Little => le_i32(input),
        Endian::Big => be_i32(input),
    }
}

/// nom parser for a double in the given byte order.
pub(crate) fn parse_f64(endian: Endian, input: &[u8]) -> IResult<&[u8], f64> {
    match endian {
        Endian::Little => le_f64(input),
        Endian::Big => be_f64(input),
    }
}

fn padded_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\0', ' '])
        .to_string()
}

/// In-memory representation of the DAF file record (first 1024-byte record).
///
/// Text fields are already trimmed of their trailing padding.
#[derive(Debug, PartialEq, Clone)]
pub struct DAFHeader {
    /// 8-byte identifier, typically `"DAF/SPK"`.
    pub idword: String,
    /// 60-byte, padded internal kernel name.
    pub internal_filename: String,
    /// Number of double-precision components in each summary (ND).
    pub nd: i32,
    /// Number of integer components in each summary (NI).
    pub ni: i32,
    /// Record index of the first summary record (forward pointer).
    pub fward: i32,
    /// Record index of the last summary record (backward pointer).
    pub bward: i32,
    /// First free address (in double-precision words, 1-based).
    pub free: i32,
    /// Format tag as written in the file, empty for pre-tag kernels.
    pub locfmt: String,
    /// Byte order used for every numeric word of the file.
    pub endian: Endian,
    /// Whether the file record carried an intact FTP validation string.
    pub ftp_validated: bool,
}

impl DAFHeader {
    /// Decode and validate the DAF file record.
    ///
    /// Arguments
    /// -----------------
    /// * `record`: The first record of the file, at least 1024 bytes long.
    ///
    /// Return
    /// ----------
    /// * The decoded [`DAFHeader`], or [`EphemError::InvalidFileFormat`] when
    ///   the identification word is not a DAF one, the byte order cannot be
    ///   determined, or the FTP validation string is damaged.
    ///
    /// See also
    /// ------------
    /// * [`DAFHeader::summary_doubles`] – Size of one summary derived from ND/NI.
    pub fn from_record(record: &[u8]) -> Result<Self, EphemError> {
        if record.len() < DAF_RECORD_SIZE {
            return Err(EphemError::InvalidFileFormat(format!(
                "file record is {} bytes long, expected {DAF_RECORD_SIZE}",
                record.len()
            )));
        }

        let idword = &record[0..8];
        if !(idword.starts_with(b"DAF/") || idword == b"NAIF/DAF") {
            return Err(EphemError::InvalidFileFormat(format!(
                "unrecognized identification word {:?}",
                String::from_utf8_lossy(idword)
            )));
        }

        let endian = Endian::from_locfmt(&record[88..96])
            .or_else(|| Endian::detect(&record[8..16]))
            .ok_or_else(|| {
                EphemError::InvalidFileFormat("unable to determine the file byte order".into())
            })?;

        if ftp_string_damaged(&record[699..727]) {
            return Err(EphemError::InvalidFileFormat(
                "FTP validation string is damaged, the file went through an ASCII transfer".into(),
            ));
        }

        let (_, header) = Self::parse(record, endian)?;

        if header.nd < 0 || header.ni < 0 {
            return Err(EphemError::InvalidFileFormat(format!(
                "negative summary layout ND={} NI={}",
                header.nd, header.ni
            )));
        }

        Ok(header)
    }

    /// Field-by-field decoder once the byte order is known.
    fn parse(input: &[u8], endian: Endian) -> IResult<&[u8], Self> {
        let (input, id_word) = take(8usize)(input)?; // "DAF/SPK "
        let (input, nd) = parse_i32(endian, input)?; // ND
        let (input, ni) = parse_i32(endian, input)?; // NI
        let (input, ifname) = take(60usize)(input)?; // internal file name
        let (input, fward) = parse_i32(endian, input)?; // forward ptr
        let (input, bward) = parse_i32(endian, input)?; // backward ptr
        let (input, free) = parse_i32(endian, input)?; // first free address
        let (input, locfmt) = take(8usize)(input)?; // location format
        let (input, _) = take(603usize)(input)?; // reserved
        let (input, ftpstr) = take(28usize)(input)?; // ftp string

        Ok((
            input,
            DAFHeader {
                idword: padded_text(id_word),
                internal_filename: padded_text(ifname),
                nd,
                ni,
                fward,
                bward,
                free,
                locfmt: padded_text(locfmt),
                endian,
                ftp_validated: check_ftp_string(ftpstr),
            },
        ))
    }

    /// Number of double-precision words taken by one summary.
    pub fn summary_doubles(&self) -> usize {
        self.nd as usize + (self.ni as usize).div_ceil(2)
    }
}

/// The sentinel is present and intact.
fn check_ftp_string(ftpstr: &[u8]) -> bool {
    ftpstr == DAF_FTPSTR
}

/// The sentinel is present but some of its bytes were altered in transit.
fn ftp_string_damaged(ftpstr: &[u8]) -> bool {
    ftpstr.starts_with(b"FTPSTR") && ftpstr != DAF_FTPSTR
}

impl fmt::Display for DAFHeader {
    /// Render a fixed-width table summarizing the DAF header fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 18;
        const VALUE_WIDTH: usize = 50;

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = LABEL_WIDTH + 1,
            value = VALUE_WIDTH + 1
        );

        let rows = [
            ("ID Word", format!("{} (Format ID)", self.idword)),
            ("Internal Name", self.internal_filename.clone()),
            (
                "Summary Layout",
                format!("ND={} doubles, NI={} integers", self.nd, self.ni),
            ),
            (
                "Summary Chain",
                format!("first record {}, last record {}", self.fward, self.bward),
            ),
            ("Free Addr", format!("Next free address: {}", self.free)),
            ("Binary Format", format!("{}", self.endian)),
            (
                "FTP Check",
                if self.ftp_validated {
                    "validated".to_string()
                } else {
                    "absent".to_string()
                },
            ),
        ];

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label$}| {:<value$}|",
            "DAF File Header",
            "",
            label = LABEL_WIDTH,
            value = VALUE_WIDTH
        )?;
        writeln!(f, "{border}")?;
        for (label, value) in rows {
            writeln!(
                f,
                "| {:<label$}| {:<value$}|",
                label,
                value,
                label = LABEL_WIDTH,
                value = VALUE_WIDTH
            )?;
        }
        writeln!(f, "{border}")
    }
}

#[cfg(test)]
mod test_daf_header {
    use super::*;

    fn file_record(endian: Endian, locfmt: &[u8; 8], ftp: bool) -> Vec<u8> {
        let mut record = vec![0u8; DAF_RECORD_SIZE];
        let put_i32 = |record: &mut Vec<u8>, at: usize, v: i32| {
            let bytes = match endian {
                Endian::Little => v.to_le_bytes(),
                Endian::Big => v.to_be_bytes(),
            };
            record[at..at + 4].copy_from_slice(&bytes);
        };
        record[0..8].copy_from_slice(b"DAF/SPK ");
        put_i32(&mut record, 8, 2);
        put_i32(&mut record, 12, 6);
        record[16..76].fill(b' ');
        record[16..23].copy_from_slice(b"NIO2SPK");
        put_i32(&mut record, 76, 4);
        put_i32(&mut record, 80, 4);
        put_i32(&mut record, 84, 1201);
        record[88..96].copy_from_slice(locfmt);
        if ftp {
            record[699..727].copy_from_slice(DAF_FTPSTR);
        }
        record
    }

    #[test]
    fn test_parse_little_endian() {
        let header =
            DAFHeader::from_record(&file_record(Endian::Little, b"LTL-IEEE", true)).unwrap();
        assert_eq!(header.idword, "DAF/SPK");
        assert_eq!(header.internal_filename, "NIO2SPK");
        assert_eq!((header.nd, header.ni), (2, 6));
        assert_eq!((header.fward, header.bward, header.free), (4, 4, 1201));
        assert_eq!(header.endian, Endian::Little);
        assert!(header.ftp_validated);
        assert_eq!(header.summary_doubles(), 5);
    }

    #[test]
    fn test_parse_big_endian() {
        let header = DAFHeader::from_record(&file_record(Endian::Big, b"BIG-IEEE", true)).unwrap();
        assert_eq!(header.endian, Endian::Big);
        assert_eq!((header.nd, header.ni, header.fward), (2, 6, 4));
    }

    #[test]
    fn test_detect_endian_without_locfmt() {
        let mut record = file_record(Endian::Big, &[0u8; 8], false);
        record[0..8].copy_from_slice(b"NAIF/DAF");
        let header = DAFHeader::from_record(&record).unwrap();
        assert_eq!(header.endian, Endian::Big);
        assert_eq!(header.locfmt, "");
        assert!(!header.ftp_validated);
    }

    #[test]
    fn test_reject_unknown_idword() {
        let mut record = file_record(Endian::Little, b"LTL-IEEE", true);
        record[0..8].copy_from_slice(b"XYZ/SPK ");
        assert!(matches!(
            DAFHeader::from_record(&record),
            Err(EphemError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn test_reject_short_record() {
        assert!(matches!(
            DAFHeader::from_record(&[0u8; 100]),
            Err(EphemError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn test_reject_damaged_ftp_string() {
        let mut record = file_record(Endian::Little, b"LTL-IEEE", true);
        // ASCII-mode transfer rewrote the carriage return
        record[710] = b'\n';
        assert!(DAFHeader::from_record(&record).is_err());
    }

    #[test]
    fn test_display_daf_header() {
        let header =
            DAFHeader::from_record(&file_record(Endian::Little, b"LTL-IEEE", true)).unwrap();

        let expected = r#"+-------------------+---------------------------------------------------+
| DAF File Header   |                                                   |
+-------------------+---------------------------------------------------+
| ID Word           | DAF/SPK (Format ID)                               |
| Internal Name     | NIO2SPK                                           |
| Summary Layout    | ND=2 doubles, NI=6 integers                       |
| Summary Chain     | first record 4, last record 4                     |
| Free Addr         | Next free address: 1201                           |
| Binary Format     | LTL-IEEE                                          |
| FTP Check         | validated                                         |
+-------------------+---------------------------------------------------+
"#;
        assert_eq!(format!("{header}"), expected);
    }
}
