use thiserror::Error;

#[derive(Error, Debug)]
pub enum EphemError {
    #[error("Invalid ephemeris file format: {0}")]
    InvalidFileFormat(String),

    #[error("Corrupted ephemeris data: {0}")]
    InvalidData(String),

    #[error("No segment for center {center} and target {target}")]
    SegmentNotFound { center: i32, target: i32 },

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error(
        "{context}: requested time {requested} JD is outside the covered span [{start}, {end}] JD"
    )]
    OutOfRange {
        context: String,
        requested: f64,
        start: f64,
        end: f64,
    },

    #[error("Unsupported SPK data type: {0}")]
    UnsupportedSpkDataType(i32),

    #[error("SPK data type {data_type} stores positions only, velocity is unavailable")]
    VelocityUnavailable { data_type: i32 },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidEphemFileSource(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("JPL File not found at: {0}")]
    JPLFileNotFound(String),
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for EphemError {
    fn from(err: nom::Err<E>) -> Self {
        EphemError::NomParsingError(format!("{err:?}"))
    }
}

impl PartialEq for EphemError {
    fn eq(&self, other: &Self) -> bool {
        use EphemError::*;
        match (self, other) {
            (InvalidFileFormat(a), InvalidFileFormat(b)) => a == b,
            (InvalidData(a), InvalidData(b)) => a == b,
            (
                SegmentNotFound {
                    center: c1,
                    target: t1,
                },
                SegmentNotFound {
                    center: c2,
                    target: t2,
                },
            ) => c1 == c2 && t1 == t2,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (
                OutOfRange {
                    context: c1,
                    requested: r1,
                    start: s1,
                    end: e1,
                },
                OutOfRange {
                    context: c2,
                    requested: r2,
                    start: s2,
                    end: e2,
                },
            ) => c1 == c2 && r1 == r2 && s1 == s2 && e1 == e2,
            (UnsupportedSpkDataType(a), UnsupportedSpkDataType(b)) => a == b,
            (VelocityUnavailable { data_type: a }, VelocityUnavailable { data_type: b }) => a == b,

            // io errors carry no comparable payload
            (IoError(_), IoError(_)) => true,

            (NomParsingError(a), NomParsingError(b)) => a == b,
            (InvalidEphemFileSource(a), InvalidEphemFileSource(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (JPLFileNotFound(a), JPLFileNotFound(b)) => a == b,

            _ => false,
        }
    }
}
