#![allow(dead_code)]
//! In-memory SPK kernels and DE binaries whose content is known in closed form.
//!
//! Every stored series is a quadratic `p0 + p1·d + p2·d²` of the days `d`
//! elapsed since a reference date. A quadratic is reproduced exactly by a
//! three-term Chebyshev expansion on any sub-interval, so the evaluated
//! values can be compared against the polynomial itself.

use std::io::Cursor;

use nalgebra::Vector3;
use spkread::{
    constants::{DAF_COMMENT_BYTES, DAF_FTPSTR, DAF_RECORD_SIZE, SECONDS_PER_DAY},
    jpl_ephem::{horizon::horizon_data::HorizonData, naif::spk_kernel::SpkKernel},
};

// -------------------------------------------------------------------------------------------------
// Closed-form series
// -------------------------------------------------------------------------------------------------

pub type Quadratic = [f64; 3];

pub const X: Quadratic = [1.5e8, 2.0e3, -0.75];
pub const Y: Quadratic = [-4.0e7, -1.5e3, 0.5];
pub const Z: Quadratic = [2.5e6, 6.0e2, 0.125];

pub fn quadratic(p: &Quadratic, d: f64) -> f64 {
    p[0] + p[1] * d + p[2] * d * d
}

pub fn quadratic_rate(p: &Quadratic, d: f64) -> f64 {
    p[1] + 2.0 * p[2] * d
}

/// Chebyshev coefficients of `p` over `[start, start + length]` (days).
///
/// With `d = m + h·t`, `m` the midpoint and `h` the half length,
/// `p(d) = c0 + c1·T1(t) + c2·T2(t)` using `t² = (T0 + T2) / 2`.
pub fn chebyshev_of(p: &Quadratic, start: f64, length: f64, n_coeffs: usize) -> Vec<f64> {
    let h = length / 2.0;
    let m = start + h;
    let mut coefficients = vec![
        p[0] + p[1] * m + p[2] * (m * m + h * h / 2.0),
        p[1] * h + 2.0 * p[2] * m * h,
        p[2] * h * h / 2.0,
    ];
    coefficients.resize(n_coeffs.max(3), 0.0);
    coefficients
}

fn scaled(p: &Quadratic, scale: f64) -> Quadratic {
    [p[0] * scale, p[1] * scale, p[2] * scale]
}

/// Position of a segment built with `scale`, `d` days after J2000.
pub fn position(scale: f64, d: f64) -> Vector3<f64> {
    Vector3::new(
        quadratic(&scaled(&X, scale), d),
        quadratic(&scaled(&Y, scale), d),
        quadratic(&scaled(&Z, scale), d),
    )
}

/// Velocity (per day) of a segment built with `scale`, `d` days after J2000.
pub fn velocity(scale: f64, d: f64) -> Vector3<f64> {
    Vector3::new(
        quadratic_rate(&scaled(&X, scale), d),
        quadratic_rate(&scaled(&Y, scale), d),
        quadratic_rate(&scaled(&Z, scale), d),
    )
}

// -------------------------------------------------------------------------------------------------
// SPK kernels
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub name: String,
    pub center: i32,
    pub target: i32,
    pub frame: i32,
    pub data_type: i32,
    /// Start of the first record, in days past J2000.
    pub start_day: f64,
    pub interval_days: f64,
    pub n_records: usize,
    pub n_coeffs: usize,
    pub scale: f64,
}

impl SegmentSpec {
    pub fn new(center: i32, target: i32, data_type: i32) -> Self {
        SegmentSpec {
            name: format!("DE-TEST {center} -> {target}"),
            center,
            target,
            frame: 1,
            data_type,
            start_day: -32.0,
            interval_days: 16.0,
            n_records: 4,
            n_coeffs: 5,
            scale: 1.0,
        }
    }

    pub fn end_day(&self) -> f64 {
        self.start_day + self.interval_days * self.n_records as f64
    }

    fn component_count(&self) -> usize {
        if self.data_type == 3 {
            6
        } else {
            3
        }
    }

    /// Segment array: records, then the `init, intlen, rsize, n` directory.
    fn array(&self) -> Vec<f64> {
        let n = self.n_coeffs.max(3);
        let rsize = 2 + self.component_count() * n;
        let radius = self.interval_days * SECONDS_PER_DAY / 2.0;

        let mut array = Vec::with_capacity(self.n_records * rsize + 4);
        for record in 0..self.n_records {
            let start = self.start_day + record as f64 * self.interval_days;
            array.push((start + self.interval_days / 2.0) * SECONDS_PER_DAY);
            array.push(radius);

            for p in [&X, &Y, &Z] {
                array.extend(chebyshev_of(&scaled(p, self.scale), start, self.interval_days, n));
            }
            if self.data_type == 3 {
                for p in [&X, &Y, &Z] {
                    let p = scaled(p, self.scale);
                    let rate = [p[1], 2.0 * p[2], 0.0];
                    array.extend(chebyshev_of(&rate, start, self.interval_days, n));
                }
            }
        }

        array.extend([
            self.start_day * SECONDS_PER_DAY,
            self.interval_days * SECONDS_PER_DAY,
            rsize as f64,
            self.n_records as f64,
        ]);
        array
    }
}

/// DAF/SPK writer, ND = 2 and NI = 6, little endian unless asked otherwise.
#[derive(Debug, Clone, Default)]
pub struct SpkBuilder {
    pub comments: Vec<u8>,
    pub segments: Vec<SegmentSpec>,
    pub per_record: Option<usize>,
    pub big_endian: bool,
}

impl SpkBuilder {
    pub fn new() -> Self {
        SpkBuilder::default()
    }

    pub fn segment(mut self, segment: SegmentSpec) -> Self {
        self.segments.push(segment);
        self
    }

    /// Comment text, NUL separated lines closed by EOT as written by NAIF tools.
    pub fn comments(mut self, lines: &[&str]) -> Self {
        let mut bytes = lines.join("\0").into_bytes();
        bytes.push(0x04);
        self.comments = bytes;
        self
    }

    pub fn summaries_per_record(mut self, n: usize) -> Self {
        self.per_record = Some(n);
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    fn int(&self, value: i32) -> [u8; 4] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    fn double(&self, value: f64) -> [u8; 8] {
        if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let per_record = self.per_record.unwrap_or(25).max(1);
        let pages: Vec<&[SegmentSpec]> = self.segments.chunks(per_record).collect();
        let n_comment_records = self.comments.len().div_ceil(DAF_COMMENT_BYTES);
        let fward = 2 + n_comment_records;
        let first_data_record = fward + 2 * pages.len().max(1);

        let mut file = vec![0u8; (first_data_record - 1) * DAF_RECORD_SIZE];
        put(&mut file, 0, b"DAF/SPK ");
        put(&mut file, 8, &self.int(2));
        put(&mut file, 12, &self.int(6));
        put(&mut file, 16, format!("{:<60}", "SYNTHETIC TEST KERNEL").as_bytes());
        put(&mut file, 76, &self.int(fward as i32));
        let bward = fward + 2 * (pages.len().max(1) - 1);
        put(&mut file, 80, &self.int(bward as i32));
        put(
            &mut file,
            88,
            if self.big_endian { b"BIG-IEEE" } else { b"LTL-IEEE" },
        );
        put(&mut file, 699, DAF_FTPSTR);

        for (i, chunk) in self.comments.chunks(DAF_COMMENT_BYTES).enumerate() {
            put(&mut file, (1 + i) * DAF_RECORD_SIZE, chunk);
        }

        for (p, page) in pages.iter().enumerate() {
            let record = fward + 2 * p;
            let at = (record - 1) * DAF_RECORD_SIZE;
            let next = if p + 1 < pages.len() { record + 2 } else { 0 };
            let prev = if p == 0 { 0 } else { record - 2 };
            put(&mut file, at, &self.double(next as f64));
            put(&mut file, at + 8, &self.double(prev as f64));
            put(&mut file, at + 16, &self.double(page.len() as f64));

            let names_at = at + DAF_RECORD_SIZE;
            file[names_at..names_at + DAF_RECORD_SIZE].fill(b' ');

            for (s, segment) in page.iter().enumerate() {
                let start_word = file.len() / 8 + 1;
                let array = segment.array();
                for value in &array {
                    file.extend_from_slice(&self.double(*value));
                }
                let end_word = start_word + array.len() - 1;

                let s_at = at + 24 + s * 40;
                put(&mut file, s_at, &self.double(segment.start_day * SECONDS_PER_DAY));
                put(&mut file, s_at + 8, &self.double(segment.end_day() * SECONDS_PER_DAY));
                let ints = [
                    segment.target,
                    segment.center,
                    segment.frame,
                    segment.data_type,
                    start_word as i32,
                    end_word as i32,
                ];
                for (k, value) in ints.iter().enumerate() {
                    put(&mut file, s_at + 16 + 4 * k, &self.int(*value));
                }
                put(&mut file, names_at + s * 40, segment.name.as_bytes());
            }
        }

        let free = file.len() / 8 + 1;
        put(&mut file, 84, &self.int(free as i32));
        file
    }

    pub fn kernel(&self) -> SpkKernel {
        SpkKernel::from_reader(Cursor::new(self.build())).expect("synthetic kernel")
    }
}

/// Overwrite word `word` (0 = init .. 3 = n) of the directory closing the
/// `center -> target` segment of a little-endian kernel.
pub fn patch_directory(bytes: &mut [u8], center: i32, target: i32, word: usize, value: f64) {
    let kernel = SpkKernel::from_reader(Cursor::new(bytes.to_vec())).expect("synthetic kernel");
    let end_index = kernel
        .segments_for(center, target)
        .expect("segment to patch")
        .summary()
        .end_index;
    let at = (end_index - 4 + word) * 8;
    bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

fn put(file: &mut [u8], at: usize, bytes: &[u8]) {
    file[at..at + bytes.len()].copy_from_slice(bytes);
}

/// A kernel shaped like a planetary kernel: SSB -> EMB (type 2),
/// EMB -> Earth (type 3) and SSB -> Mars (type 2).
pub fn planetary_builder() -> SpkBuilder {
    let mut earth = SegmentSpec::new(3, 399, 3);
    earth.scale = 1e-3;
    SpkBuilder::new()
        .comments(&[
            "JPL planetary and lunar ephemeris DE-TEST",
            "Integrated 1 January 2024",
            "",
            "Time span covered by ephemeris:",
            "",
            "30-NOV-1999 12:00 to   02-MAR-2000 12:00",
            "JD   2451513.0   to   JD   2451577.0",
        ])
        .segment(SegmentSpec::new(0, 3, 2))
        .segment(earth)
        .segment(SegmentSpec {
            scale: 2.0,
            ..SegmentSpec::new(0, 4, 2)
        })
}

// -------------------------------------------------------------------------------------------------
// Legacy DE binaries
// -------------------------------------------------------------------------------------------------

/// `(series index, dimension, n_coeffs, n_subs)` of the synthetic DE file.
pub const DE_SERIES: [(usize, usize, usize, usize); 6] = [
    (0, 3, 14, 4),  // mercury
    (2, 3, 5, 2),   // earth-moon barycenter
    (9, 3, 13, 8),  // moon
    (10, 3, 5, 1),  // sun
    (11, 2, 4, 2),  // nutations
    (14, 1, 3, 1),  // tt-tdb
];

pub const DE_JALPHA: f64 = 2451536.5;
pub const DE_SPAN: f64 = 32.0;
pub const DE_EMRAT: f64 = 81.3;

/// Closed-form series `series`, component `component`, in days past `DE_JALPHA`.
pub fn de_series(series: usize, component: usize) -> Quadratic {
    let s = series as f64 + 1.0;
    let c = component as f64;
    [1.0e6 * s + 1.0e4 * c, 10.0 * s - c, 0.01 * (c + 1.0)]
}

pub struct DeBuilder {
    pub n_records: usize,
    pub trailing_records: usize,
    pub constant_names: Vec<String>,
}

impl Default for DeBuilder {
    fn default() -> Self {
        let mut constant_names: Vec<String> = ["DENUM", "AU", "EMRAT", "CLIGHT"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        constant_names.extend((4..400).map(|i| format!("C{i:03}")));
        constant_names.extend(["EXTRA1".to_string(), "EXTRA2".to_string()]);

        DeBuilder {
            n_records: 3,
            trailing_records: 0,
            constant_names,
        }
    }
}

impl DeBuilder {
    pub fn jomega(&self) -> f64 {
        DE_JALPHA + DE_SPAN * self.n_records as f64
    }

    pub fn constant_value(&self, index: usize) -> f64 {
        match self.constant_names[index].as_str() {
            "DENUM" => 999.0,
            "AU" => 149_597_870.7,
            "EMRAT" => DE_EMRAT,
            _ => index as f64 * 0.5,
        }
    }

    fn ipt(&self) -> [[i32; 3]; 15] {
        let mut ipt = [[0i32; 3]; 15];
        let mut offset = 3;
        for slot in ipt.iter_mut() {
            slot[0] = offset;
        }
        for (series, dim, n_coeffs, n_subs) in DE_SERIES {
            ipt[series] = [offset, n_coeffs as i32, n_subs as i32];
            offset += (dim * n_coeffs * n_subs) as i32;
        }
        ipt
    }

    fn recsize(&self) -> usize {
        let words: usize = 2 + DE_SERIES
            .iter()
            .map(|(_, dim, n_coeffs, n_subs)| dim * n_coeffs * n_subs)
            .sum::<usize>();
        words * 8
    }

    pub fn build(&self) -> Vec<u8> {
        let recsize = self.recsize();
        let ncon = self.constant_names.len();
        let ipt = self.ipt();

        let mut header = Vec::with_capacity(recsize);
        for title in ["SYNTHETIC DE-TEST", "Start Epoch: JED= 2451536.5", "Final Epoch"] {
            header.extend_from_slice(format!("{title:<84}").as_bytes());
        }
        for i in 0..400 {
            let name = self.constant_names.get(i).map_or("", |n| n.as_str());
            header.extend_from_slice(format!("{name:<6}").as_bytes());
        }
        for value in [DE_JALPHA, self.jomega(), DE_SPAN] {
            header.extend_from_slice(&value.to_le_bytes());
        }
        header.extend_from_slice(&(ncon as i32).to_le_bytes());
        header.extend_from_slice(&149_597_870.7f64.to_le_bytes());
        header.extend_from_slice(&DE_EMRAT.to_le_bytes());
        for pointer in &ipt[..12] {
            for word in pointer {
                header.extend_from_slice(&word.to_le_bytes());
            }
        }
        header.extend_from_slice(&999i32.to_le_bytes());
        for word in ipt[12] {
            header.extend_from_slice(&word.to_le_bytes());
        }
        for name in self.constant_names.iter().skip(400) {
            header.extend_from_slice(format!("{name:<6}").as_bytes());
        }
        for pointer in &ipt[13..] {
            for word in pointer {
                header.extend_from_slice(&word.to_le_bytes());
            }
        }
        assert!(header.len() <= recsize, "header does not fit in one record");
        header.resize(recsize, 0);

        let mut file = header;
        let mut constants: Vec<u8> = (0..ncon)
            .flat_map(|i| self.constant_value(i).to_le_bytes())
            .collect();
        constants.resize(recsize, 0);
        file.extend(constants);

        for record in 0..self.n_records + self.trailing_records {
            let start = record as f64 * DE_SPAN;
            let mut words = vec![DE_JALPHA + start, DE_JALPHA + start + DE_SPAN];
            for (series, dim, n_coeffs, n_subs) in DE_SERIES {
                let length = DE_SPAN / n_subs as f64;
                for sub in 0..n_subs {
                    for component in 0..dim {
                        words.extend(chebyshev_of(
                            &de_series(series, component),
                            start + sub as f64 * length,
                            length,
                            n_coeffs,
                        ));
                    }
                }
            }
            for word in words {
                file.extend_from_slice(&word.to_le_bytes());
            }
        }
        file
    }

    pub fn data(&self) -> HorizonData {
        HorizonData::from_reader(Cursor::new(self.build())).expect("synthetic DE file")
    }
}
