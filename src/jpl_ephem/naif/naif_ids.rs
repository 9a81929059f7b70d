//! NAIF integer codes of the bodies found in planetary kernels.
//!
//! The table is only used to label segments. Codes missing from it are
//! rendered as their number.

/// Official NAIF name of a body code, upper case as NAIF publishes it.
pub fn target_name(id: i32) -> Option<&'static str> {
    let name = match id {
        0 => "SOLAR SYSTEM BARYCENTER",
        1 => "MERCURY BARYCENTER",
        2 => "VENUS BARYCENTER",
        3 => "EARTH BARYCENTER",
        4 => "MARS BARYCENTER",
        5 => "JUPITER BARYCENTER",
        6 => "SATURN BARYCENTER",
        7 => "URANUS BARYCENTER",
        8 => "NEPTUNE BARYCENTER",
        9 => "PLUTO BARYCENTER",
        10 => "SUN",
        199 => "MERCURY",
        299 => "VENUS",
        301 => "MOON",
        399 => "EARTH",
        401 => "PHOBOS",
        402 => "DEIMOS",
        499 => "MARS",
        501 => "IO",
        502 => "EUROPA",
        503 => "GANYMEDE",
        504 => "CALLISTO",
        599 => "JUPITER",
        601 => "MIMAS",
        602 => "ENCELADUS",
        603 => "TETHYS",
        604 => "DIONE",
        605 => "RHEA",
        606 => "TITAN",
        607 => "HYPERION",
        608 => "IAPETUS",
        699 => "SATURN",
        701 => "ARIEL",
        702 => "UMBRIEL",
        703 => "TITANIA",
        704 => "OBERON",
        705 => "MIRANDA",
        799 => "URANUS",
        801 => "TRITON",
        899 => "NEPTUNE",
        901 => "CHARON",
        999 => "PLUTO",
        2000001 => "CERES",
        2000002 => "PALLAS",
        2000004 => "VESTA",
        _ => return None,
    };
    Some(name)
}

/// Title-case a NAIF name for display.
///
/// Designations that are not words (numbered comets and asteroids, `C/`
/// comets, deep space stations) keep their official spelling.
pub fn titlecase(name: &str) -> String {
    if name.starts_with('1') || name.starts_with("C/") || name.starts_with("DSS-") {
        return name.to_string();
    }

    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display label of a body code: `"Earth Barycenter"`, or the bare number.
pub fn body_label(id: i32) -> String {
    target_name(id)
        .map(titlecase)
        .unwrap_or_else(|| id.to_string())
}
