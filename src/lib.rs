pub mod constants;
pub mod ephem_errors;
pub mod jpl_ephem;
pub mod time;
