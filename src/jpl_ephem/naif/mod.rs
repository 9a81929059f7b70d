//! NAIF SPK kernels stored in DAF containers.
//!
//! Bottom-up: [`daf_header`] and [`daf_file`] read the container,
//! [`summary_record`] and [`spk_kernel`] catalog its segments,
//! [`directory`] and [`coefficient_block`] locate the coefficients covering
//! a time, [`chebyshev`] evaluates them and [`segment`] ties it together.

pub mod chebyshev;
pub mod coefficient_block;
pub mod daf_file;
pub mod daf_header;
pub mod directory;
pub mod jpl_ephem_header;
pub mod naif_ids;
pub mod naif_type;
pub mod naif_version;
pub mod segment;
pub mod spk_kernel;
pub mod summary_record;
