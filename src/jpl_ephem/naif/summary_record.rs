use std::fmt;

use crate::{
    constants::{EphemerisSeconds, JD},
    ephem_errors::EphemError,
    time::{epoch_from_seconds, jd},
};

use super::{
    daf_file::DafSummary,
    naif_ids::body_label,
    naif_type::data_type_name,
};

/// Descriptor of one SPK segment, decoded from a DAF summary.
///
/// `start_index` and `end_index` are the 1-based word addresses bounding the
/// segment's array inside the file, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub start_second: EphemerisSeconds,
    pub end_second: EphemerisSeconds,
    pub target: i32,
    pub center: i32,
    pub frame_id: i32,
    pub data_type: i32,
    pub start_index: usize,
    pub end_index: usize,
}

impl Summary {
    /// Interpret a raw DAF summary with the SPK layout (ND = 2, NI = 6).
    ///
    /// Arguments
    /// -----------------
    /// * `raw`: doubles and integers of one summary, as yielded by
    ///   [`crate::jpl_ephem::naif::daf_file::DafFile::summaries`].
    ///
    /// Return
    /// ----------
    /// * The typed descriptor, or [`EphemError::InvalidData`] when the summary
    ///   is too short or its address range is not a valid word range.
    pub fn from_daf_summary(raw: &DafSummary) -> Result<Self, EphemError> {
        let (
            &[start_second, end_second, ..],
            &[target, center, frame_id, data_type, start, end, ..],
        ) = (raw.doubles.as_slice(), raw.ints.as_slice())
        else {
            return Err(EphemError::InvalidData(format!(
                "SPK summaries need 2 doubles and 6 integers, got {} and {}",
                raw.doubles.len(),
                raw.ints.len()
            )));
        };

        if start < 1 || end < start {
            return Err(EphemError::InvalidData(format!(
                "segment {center} -> {target} has an invalid address range {start}..={end}"
            )));
        }

        Ok(Summary {
            start_second,
            end_second,
            target,
            center,
            frame_id,
            data_type,
            start_index: start as usize,
            end_index: end as usize,
        })
    }

    pub fn start_jd(&self) -> JD {
        jd(self.start_second)
    }

    pub fn end_jd(&self) -> JD {
        jd(self.end_second)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = epoch_from_seconds(self.start_second);
        let end = epoch_from_seconds(self.end_second);

        let fields = [
            ("start_epoch", format!("{start}")),
            ("end_epoch", format!("{end}")),
            (
                "target",
                format!("{} ({})", body_label(self.target), self.target),
            ),
            (
                "center",
                format!("{} ({})", body_label(self.center), self.center),
            ),
            ("frame_id", self.frame_id.to_string()),
            (
                "data_type",
                format!("{} ({})", data_type_name(self.data_type), self.data_type),
            ),
            ("start_index", self.start_index.to_string()),
            ("end_index", self.end_index.to_string()),
        ];

        let label_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
        let value_width = fields.iter().map(|(_, v)| v.len()).max().unwrap_or(10);

        let border = format!(
            "+{:-<label$}+{:-<value$}+",
            "",
            "",
            label = label_width + 2,
            value = value_width + 2
        );

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {:<label_width$} | {:<value_width$} |",
            "Field", "Value",
        )?;
        writeln!(f, "{border}")?;

        for (label, value) in fields {
            writeln!(f, "| {label:<label_width$} | {value:<value_width$} |")?;
        }

        writeln!(f, "{border}")
    }
}
