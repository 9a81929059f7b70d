//! State vector produced by the ephemeris readers.
//!
//! Positions are in kilometers. Velocities, when requested, are in
//! kilometers per day. States relative to different origins are combined
//! with the usual arithmetic operators:
//!
//! ```rust
//! use nalgebra::Vector3;
//! use spkread::jpl_ephem::horizon::interpolation_result::InterpResult;
//!
//! let emb = InterpResult::new(Vector3::new(1.0e8, 0.0, 0.0), Some(Vector3::zeros()));
//! let moon = InterpResult::new(Vector3::new(3.8e5, 0.0, 0.0), Some(Vector3::zeros()));
//! let earth = &emb - &(&moon * (1.0 / 82.3));
//! assert!(earth.position.x < emb.position.x);
//! ```

use std::ops::{Add, Div, Mul, Sub};

use nalgebra::Vector3;

use crate::constants::AU;

#[derive(Debug, PartialEq, Clone)]
pub struct InterpResult {
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
}

impl InterpResult {
    pub fn new(position: Vector3<f64>, velocity: Option<Vector3<f64>>) -> Self {
        InterpResult { position, velocity }
    }

    /// State of the origin itself, with a velocity when `with_velocity` is set.
    pub fn zero(with_velocity: bool) -> Self {
        InterpResult {
            position: Vector3::zeros(),
            velocity: with_velocity.then(Vector3::zeros),
        }
    }

    /// Same state expressed in astronomical units (and AU per day).
    #[must_use = "`.to_au()` returns a new InterpResult; assign or use it"]
    pub fn to_au(&self) -> Self {
        self / AU
    }
}

fn combine(
    lhs: &InterpResult,
    rhs: &InterpResult,
    op: impl Fn(Vector3<f64>, Vector3<f64>) -> Vector3<f64>,
) -> InterpResult {
    InterpResult {
        position: op(lhs.position, rhs.position),
        velocity: lhs.velocity.zip(rhs.velocity).map(|(a, b)| op(a, b)),
    }
}

fn scale(state: &InterpResult, factor: f64) -> InterpResult {
    InterpResult {
        position: state.position * factor,
        velocity: state.velocity.map(|v| v * factor),
    }
}

impl Add for &InterpResult {
    type Output = InterpResult;

    fn add(self, other: Self) -> InterpResult {
        combine(self, other, |a, b| a + b)
    }
}

impl Add for InterpResult {
    type Output = InterpResult;

    fn add(self, other: Self) -> InterpResult {
        &self + &other
    }
}

impl Sub for &InterpResult {
    type Output = InterpResult;

    fn sub(self, other: Self) -> InterpResult {
        combine(self, other, |a, b| a - b)
    }
}

impl Sub for InterpResult {
    type Output = InterpResult;

    fn sub(self, other: Self) -> InterpResult {
        &self - &other
    }
}

impl Mul<f64> for &InterpResult {
    type Output = InterpResult;

    fn mul(self, rhs: f64) -> InterpResult {
        scale(self, rhs)
    }
}

impl Mul<f64> for InterpResult {
    type Output = InterpResult;

    fn mul(self, rhs: f64) -> InterpResult {
        scale(&self, rhs)
    }
}

impl Div<f64> for &InterpResult {
    type Output = InterpResult;

    fn div(self, rhs: f64) -> InterpResult {
        scale(self, 1.0 / rhs)
    }
}

impl Div<f64> for InterpResult {
    type Output = InterpResult;

    fn div(self, rhs: f64) -> InterpResult {
        scale(&self, 1.0 / rhs)
    }
}
