use std::io::Cursor;

use approx::assert_relative_eq;
use camino::Utf8Path;
use nalgebra::Vector3;
use spkread::{
    ephem_errors::EphemError,
    jpl_ephem::horizon::{horizon_data::HorizonData, horizon_ids::HorizonID},
};

mod common;
use common::{de_series, quadratic, quadratic_rate, DeBuilder, DE_EMRAT, DE_JALPHA, DE_SPAN};

fn series_position(series: usize, d: f64) -> Vector3<f64> {
    Vector3::from_fn(|c, _| quadratic(&de_series(series, c), d))
}

fn series_velocity(series: usize, d: f64) -> Vector3<f64> {
    Vector3::from_fn(|c, _| quadratic_rate(&de_series(series, c), d))
}

#[test]
fn test_header_and_constants() {
    let builder = DeBuilder::default();
    let data = builder.data();
    let header = data.header();

    assert_eq!(header.titles[0], "SYNTHETIC DE-TEST");
    assert_eq!(header.jalpha, DE_JALPHA);
    assert_eq!(header.jomega, builder.jomega());
    assert_eq!(header.record_span, DE_SPAN);
    assert_eq!(header.emrat, DE_EMRAT);
    assert_eq!(header.numde, 999);
    assert_eq!(header.version(), "DE999");
    assert_eq!(header.recsize, 4368);
    assert_eq!(header.ipt[0], [3, 14, 4]);
    assert_eq!(header.ipt[14], [544, 3, 1]);

    assert_eq!(data.constants().len(), 402);
    assert_eq!(data.constant("AU"), Some(149_597_870.7));
    assert_eq!(data.constant("EMRAT"), Some(DE_EMRAT));
    assert_eq!(data.constant("EXTRA2"), Some(401.0 * 0.5));
    assert_eq!(data.constant("NOPE"), None);
}

#[test]
fn test_stored_series() {
    let data = DeBuilder::default().data();
    assert_eq!(
        data.names(),
        vec![
            HorizonID::Mercury,
            HorizonID::EarthMoonBarycenter,
            HorizonID::Moon,
            HorizonID::Sun,
            HorizonID::Nutations,
            HorizonID::TTMinusTDB,
        ]
    );

    assert!(matches!(
        data.compute(HorizonID::Mars, DE_JALPHA),
        Err(EphemError::UnknownBody(_))
    ));
    assert!(matches!(
        data.compute(HorizonID::Earth, DE_JALPHA),
        Err(EphemError::UnknownBody(_))
    ));
}

#[test]
fn test_compute_recovers_series() {
    let data = DeBuilder::default().data();

    // granules of 8, 16, 4 and 32 days
    for d in [0.0, 3.7, 8.0, 31.9, 40.25, 95.5] {
        let mercury = data.compute(HorizonID::Mercury, DE_JALPHA + d).unwrap();
        assert_eq!(mercury.len(), 6);
        assert_relative_eq!(
            mercury.fixed_rows::<3>(0).into_owned(),
            series_position(0, d),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            mercury.fixed_rows::<3>(3).into_owned(),
            series_velocity(0, d),
            max_relative = 1e-9
        );

        let moon = data.compute(HorizonID::Moon, DE_JALPHA + d).unwrap();
        assert_relative_eq!(
            moon.fixed_rows::<3>(0).into_owned(),
            series_position(9, d),
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_non_cartesian_series() {
    let data = DeBuilder::default().data();
    let d = 50.5;

    let nutations = data.compute(HorizonID::Nutations, DE_JALPHA + d).unwrap();
    assert_eq!(nutations.len(), 4);
    assert_relative_eq!(nutations[1], quadratic(&de_series(11, 1), d), max_relative = 1e-12);

    let tt_tdb = data.compute(HorizonID::TTMinusTDB, DE_JALPHA + d).unwrap();
    assert_eq!(tt_tdb.len(), 2);
    assert_relative_eq!(tt_tdb[0], quadratic(&de_series(14, 0), d), max_relative = 1e-12);
    assert_relative_eq!(tt_tdb[1], quadratic_rate(&de_series(14, 0), d), max_relative = 1e-9);
}

#[test]
fn test_final_boundary_and_out_of_range() {
    let builder = DeBuilder::default();
    let data = builder.data();
    let jomega = builder.jomega();

    let at_end = data.compute(HorizonID::Sun, jomega).unwrap();
    assert_relative_eq!(
        at_end.fixed_rows::<3>(0).into_owned(),
        series_position(10, jomega - DE_JALPHA),
        max_relative = 1e-12
    );

    assert_eq!(
        data.compute(HorizonID::Sun, jomega + 0.5).unwrap_err(),
        EphemError::OutOfRange {
            context: "sun series".into(),
            requested: jomega + 0.5,
            start: DE_JALPHA,
            end: jomega,
        }
    );
    assert!(matches!(
        data.compute(HorizonID::Sun, DE_JALPHA - 0.5),
        Err(EphemError::OutOfRange { .. })
    ));
}

#[test]
fn test_earth_moon_split() {
    let data = DeBuilder::default().data();
    assert_relative_eq!(data.earth_share(), 1.0 / (1.0 + DE_EMRAT));
    assert_relative_eq!(data.earth_share() + data.moon_share(), 1.0);

    let d = 21.0;
    let jed = DE_JALPHA + d;
    let emb = series_position(2, d);
    let geocentric_moon = series_position(9, d);

    let earth = data
        .ephemeris(HorizonID::Earth, HorizonID::SolarSystemBarycenter, jed, true)
        .unwrap();
    assert_relative_eq!(
        earth.position,
        emb - geocentric_moon * data.earth_share(),
        max_relative = 1e-12
    );
    assert!(earth.velocity.is_some());

    let moon = data
        .ephemeris(HorizonID::Moon, HorizonID::Earth, jed, false)
        .unwrap();
    assert_relative_eq!(moon.position, geocentric_moon, max_relative = 1e-9);
    assert!(moon.velocity.is_none());

    let ssb = data
        .ephemeris(HorizonID::SolarSystemBarycenter, HorizonID::Sun, jed, true)
        .unwrap();
    assert_relative_eq!(ssb.position, -series_position(10, d), max_relative = 1e-12);
    assert_relative_eq!(
        ssb.velocity.unwrap(),
        -series_velocity(10, d),
        max_relative = 1e-9
    );
}

#[test]
fn test_non_position_series_in_ephemeris() {
    let data = DeBuilder::default().data();
    assert!(matches!(
        data.ephemeris(
            HorizonID::Nutations,
            HorizonID::SolarSystemBarycenter,
            DE_JALPHA,
            false
        ),
        Err(EphemError::UnknownBody(_))
    ));
}

#[test]
fn test_trailing_records_are_ignored() {
    let builder = DeBuilder {
        trailing_records: 2,
        ..DeBuilder::default()
    };
    let data = builder.data();
    assert!(matches!(
        data.compute(HorizonID::Sun, builder.jomega() + 1.0),
        Err(EphemError::OutOfRange { .. })
    ));
    assert!(data.compute(HorizonID::Sun, builder.jomega()).is_ok());
}

#[test]
fn test_truncated_file() {
    let mut bytes = DeBuilder::default().build();
    bytes.truncate(bytes.len() - 100);
    assert!(matches!(
        HorizonData::from_reader(Cursor::new(bytes)),
        Err(EphemError::InvalidData(_))
    ));
}

#[test]
fn test_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8Path::from_path(dir.path()).unwrap().join("lnxtest.999");
    std::fs::write(&path, DeBuilder::default().build()).unwrap();

    let data = HorizonData::read_horizon_file(&path).unwrap();
    assert_eq!(data.header().version(), "DE999");

    let missing = path.with_file_name("lnxmissing.999");
    assert_eq!(
        HorizonData::read_horizon_file(&missing).unwrap_err(),
        EphemError::JPLFileNotFound(missing.to_string())
    );
}
