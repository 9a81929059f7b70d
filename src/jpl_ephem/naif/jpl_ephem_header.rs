//! JPL text header carried in the comment area of planetary kernels.
//!
//! JPL writes the same few lines at the top of every DE kernel comment area:
//!
//! ```text
//! JPL planetary and lunar ephemeris DE440
//! Integrated 25 June 2020
//!
//! Time span covered by ephemeris:
//!
//! 31-DEC-1549 00:00 to   25-JAN-2650 00:00
//! JD   2287184.5   to   JD   2688976.5
//! ```
//!
//! Kernels produced elsewhere usually have free-form comments, so the header
//! is optional and its absence is not an error.

use std::fmt;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{line_ending, multispace0, not_line_ending, space0, space1},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use crate::constants::JD;

/// Version and coverage of a JPL development ephemeris.
#[derive(Debug, PartialEq, Clone)]
pub struct JPLEphemHeader {
    pub version: String,
    pub creation_date: String,
    pub start_calendar: String,
    pub end_calendar: String,
    pub start_jd: JD,
    pub end_jd: JD,
}

/// Skip everything up to `marker` and consume it.
fn after<'a>(
    marker: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    preceded(take_until(marker), tag(marker))
}

fn rest_of_line(input: &str) -> IResult<&str, &str> {
    let (input, line) = not_line_ending(input)?;
    Ok((input, line.trim()))
}

fn calendar_span(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = (after("Time span covered by ephemeris:"), multispace0).parse(input)?;
    let (input, start) = take_until(" to ")(input)?;
    let (input, _) = (tag(" to"), space1).parse(input)?;
    let (input, end) = rest_of_line(input)?;
    Ok((input, (start.trim(), end)))
}

fn julian_span(input: &str) -> IResult<&str, (f64, f64)> {
    preceded(
        multispace0,
        separated_pair(
            preceded((tag("JD"), space1), double),
            delimited(space1, tag("to"), space1),
            preceded((tag("JD"), space0), double),
        ),
    )
    .parse(input)
}

impl JPLEphemHeader {
    /// Parse the header lines, in order, from `input`.
    pub fn parse(input: &str) -> IResult<&str, Self> {
        let (input, version) =
            preceded(after("JPL planetary and lunar ephemeris"), rest_of_line).parse(input)?;
        let (input, _) = line_ending(input)?;
        let (input, creation_date) = preceded(after("Integrated"), rest_of_line).parse(input)?;
        let (input, (start_calendar, end_calendar)) = calendar_span(input)?;
        let (input, (start_jd, end_jd)) = julian_span(input)?;

        Ok((
            input,
            JPLEphemHeader {
                version: version.to_string(),
                creation_date: creation_date.to_string(),
                start_calendar: start_calendar.to_string(),
                end_calendar: end_calendar.to_string(),
                start_jd,
                end_jd,
            },
        ))
    }

    /// Look for the header anywhere in a comment text.
    pub fn find(comments: &str) -> Option<Self> {
        Self::parse(comments).ok().map(|(_, header)| header)
    }
}

impl fmt::Display for JPLEphemHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (integrated {})", self.version, self.creation_date)?;
        writeln!(f, "  from {:<20} JD {:.1}", self.start_calendar, self.start_jd)?;
        write!(f, "  to   {:<20} JD {:.1}", self.end_calendar, self.end_jd)
    }
}
