//! Segment catalog of an SPK kernel.
//!
//! Opening a kernel walks the summary chain once and builds one [`Segment`]
//! per summary, in file order. Coefficients are not touched at this point:
//! each segment reads its own array the first time it is evaluated.
//!
//! When several segments cover the same `(center, target)` pair the one
//! appearing last in the file answers [`SpkKernel::segments_for`], which is
//! the precedence rule used by the SPICE toolkit.

use std::{collections::HashMap, fmt, sync::Arc};

use camino::Utf8Path;
use itertools::Itertools;
use tracing::{debug, info};

use crate::{ephem_errors::EphemError, jpl_ephem::EphemReader};

use super::{
    daf_file::DafFile, jpl_ephem_header::JPLEphemHeader, segment::Segment,
    summary_record::Summary,
};

/// An opened SPK kernel and its segments.
#[derive(Debug)]
pub struct SpkKernel {
    daf: Arc<DafFile>,
    segments: Vec<Segment>,
    // (center, target) -> index of the last matching segment
    pairs: HashMap<(i32, i32), usize>,
}

impl SpkKernel {
    /// Open an SPK kernel stored on disk.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: location of the `.bsp` file.
    ///
    /// Return
    /// ----------
    /// * The kernel with its segment catalog, [`EphemError::JPLFileNotFound`]
    ///   when the path does not exist.
    pub fn open(path: &Utf8Path) -> Result<Self, EphemError> {
        let kernel = Self::from_daf(DafFile::open(path)?)?;
        info!(
            path = %path,
            segments = kernel.segments.len(),
            "loaded SPK kernel"
        );
        Ok(kernel)
    }

    /// Build the catalog from any seekable stream holding an SPK kernel.
    pub fn from_reader<R: EphemReader + 'static>(reader: R) -> Result<Self, EphemError> {
        Self::from_daf(DafFile::from_reader(reader)?)
    }

    fn from_daf(daf: DafFile) -> Result<Self, EphemError> {
        let daf = Arc::new(daf);

        let segments = daf
            .summaries()
            .map(|entry| {
                let (name, raw) = entry?;
                let summary = Summary::from_daf_summary(&raw)?;
                Ok(Segment::new(Arc::clone(&daf), name, summary))
            })
            .collect::<Result<Vec<_>, EphemError>>()?;

        let pairs = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| ((segment.center(), segment.target()), index))
            .collect();

        debug!(segments = segments.len(), "built SPK segment catalog");

        Ok(SpkKernel {
            daf,
            segments,
            pairs,
        })
    }

    /// Every segment, in file order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The segment giving `target` relative to `center`.
    ///
    /// Arguments
    /// -----------------
    /// * `center`: NAIF id of the reference body.
    /// * `target`: NAIF id of the body whose state is wanted.
    ///
    /// Return
    /// ----------
    /// * The last segment of the file for that pair, or
    ///   [`EphemError::SegmentNotFound`].
    pub fn segments_for(&self, center: i32, target: i32) -> Result<&Segment, EphemError> {
        self.pairs
            .get(&(center, target))
            .map(|&index| &self.segments[index])
            .ok_or(EphemError::SegmentNotFound { center, target })
    }

    /// `(center, target)` pairs available in the kernel, sorted.
    pub fn pairs(&self) -> Vec<(i32, i32)> {
        self.pairs.keys().copied().sorted().collect()
    }

    /// Text of the kernel's comment area.
    pub fn comments(&self) -> Result<String, EphemError> {
        self.daf.comments()
    }

    /// Version and coverage announced in the comment area of JPL kernels.
    ///
    /// Return
    /// ----------
    /// * `None` when the comments do not carry the usual JPL header lines.
    pub fn ephemeris_header(&self) -> Result<Option<JPLEphemHeader>, EphemError> {
        let comments = self.comments()?;
        Ok(JPLEphemHeader::find(&comments))
    }

    pub fn daf(&self) -> &DafFile {
        &self.daf
    }
}

impl fmt::Display for SpkKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.daf.header();
        writeln!(
            f,
            "File type {} and format {} with {} segments:",
            header.idword.trim(),
            header.endian,
            self.segments.len()
        )?;
        write!(f, "{}", self.segments.iter().join("\n"))
    }
}
