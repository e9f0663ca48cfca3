//! Minimal 2D vector used as the steering accumulator.

use std::f64::consts::TAU;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vector2D { x: cos, y: sin }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector in `[0, 2π)`. The zero vector maps to 0.
    #[inline]
    pub fn heading(&self) -> f64 {
        normalize_heading(self.y.atan2(self.x))
    }
}

/// Fold an `atan2` result into `[0, 2π)`.
#[inline]
pub fn normalize_heading(angle: f64) -> f64 {
    let angle = if angle < 0.0 { angle + TAU } else { angle };
    // -1e-17 + 2π rounds up to 2π
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    #[inline]
    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    #[inline]
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    #[inline]
    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    #[inline]
    fn mul(self, scalar: f64) -> Vector2D {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Vector2D {
    type Output = Vector2D;

    #[inline]
    fn div(self, scalar: f64) -> Vector2D {
        Vector2D::new(self.x / scalar, self.y / scalar)
    }
}
