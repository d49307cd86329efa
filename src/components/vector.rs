//! Small 3-component vector with in-place arithmetic, plus the heading helpers.
//!
//! Headings are fractions of a full turn: `0.0` points up (negative y on
//! screen), `0.25` points right, and values grow clockwise. Rendering uses
//! the same convention for [`Thing::rotation`](crate::components::thing::Thing).

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::ops::{AddAssign, Mul, Neg, SubAssign};

/// `add`/`sub`/`mlt`/`div` mutate in place and chain. There is no binary
/// `+`/`-`: `std::ops::Add` would shadow the in-place `add` on values.
/// Use `+=`/`-=` instead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar vector with `z = 0`.
    pub const fn xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// All three components set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn add(&mut self, other: impl Into<Vector>) -> &mut Self {
        let o = other.into();
        self.x += o.x;
        self.y += o.y;
        self.z += o.z;
        self
    }

    pub fn sub(&mut self, other: impl Into<Vector>) -> &mut Self {
        let o = other.into();
        self.x -= o.x;
        self.y -= o.y;
        self.z -= o.z;
        self
    }

    /// Component-wise multiply.
    pub fn mlt(&mut self, other: impl Into<Vector>) -> &mut Self {
        let o = other.into();
        self.x *= o.x;
        self.y *= o.y;
        self.z *= o.z;
        self
    }

    /// Component-wise divide.
    pub fn div(&mut self, other: impl Into<Vector>) -> &mut Self {
        let o = other.into();
        self.x /= o.x;
        self.y /= o.y;
        self.z /= o.z;
        self
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

impl From<f32> for Vector {
    fn from(v: f32) -> Self {
        Vector::splat(v)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Vector::xy(x, y)
    }
}

impl From<(f32, f32, f32)> for Vector {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Vector::new(x, y, z)
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        Vector::add(self, rhs);
    }
}

impl SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Vector) {
        Vector::sub(self, rhs);
    }
}

/// Heading from `source` to `target` as a fraction of a turn in `[0, 1)`.
pub fn vector_to_rotation(source: Vector, target: Vector) -> f32 {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let turn = ((dy.atan2(dx) + FRAC_PI_2) / TAU).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if turn >= 1.0 { 0.0 } else { turn }
}

/// Unit vector pointing along a heading given as a fraction of a turn.
pub fn rotation_to_vector(rotation: f32) -> Vector {
    let r = rotation * TAU;
    Vector::xy(r.sin(), -r.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn in_place_ops_accept_vectors_and_scalars() {
        let mut v = Vector::xy(1.0, 2.0);
        v.add((1.0, 1.0)).mlt(2.0).sub(Vector::new(1.0, 1.0, 1.0));
        assert_eq!(v, Vector::new(3.0, 5.0, -1.0));
        v.div(Vector::new(3.0, 5.0, -1.0));
        assert_eq!(v, Vector::splat(1.0));
    }

    #[test]
    fn length_of_three_four() {
        assert!(approx_eq(Vector::xy(3.0, 4.0).length(), 5.0));
    }

    #[test]
    fn headings_follow_clockwise_turns() {
        let o = Vector::ZERO;
        assert!(approx_eq(vector_to_rotation(o, Vector::xy(0.0, -1.0)), 0.0));
        assert!(approx_eq(vector_to_rotation(o, Vector::xy(1.0, 0.0)), 0.25));
        assert!(approx_eq(vector_to_rotation(o, Vector::xy(0.0, 1.0)), 0.5));
        assert!(approx_eq(vector_to_rotation(o, Vector::xy(-1.0, 0.0)), 0.75));
    }

    #[test]
    fn heading_is_always_in_unit_range() {
        let o = Vector::xy(10.0, 10.0);
        for i in 0..360 {
            let a = (i as f32).to_radians();
            let mut t = o;
            t += Vector::xy(a.cos(), a.sin());
            let r = vector_to_rotation(o, t);
            assert!((0.0..1.0).contains(&r), "heading {} out of range", r);
        }
    }

    #[test]
    fn rotation_to_vector_points_along_heading() {
        let up = rotation_to_vector(0.0);
        assert!(approx_eq(up.x, 0.0) && approx_eq(up.y, -1.0));
        let right = rotation_to_vector(0.25);
        assert!(approx_eq(right.x, 1.0) && approx_eq(right.y, 0.0));
    }
}
