// This module mirrors the scalar rounding and modulo bodies of the catalog in Rust so the
// formulas can be checked against known values without a C compiler. Each function
// follows its C body step by step: the same exact-integer threshold, the same
// truncating cast through the same-width signed integer and the same corrections. The
// generator itself never calls it; unit and integration tests do.

//! Rust mirror of the scalar formulas.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// The float types the scalar bodies are generated for.
pub trait Float:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const HALF: Self;
    /// Magnitude from which every value is an integer.
    const EXACT: Self;

    /// `(T)(I)x`
    fn through_int(self) -> Self;
}

impl Float for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const EXACT: Self = 8388608.0;

    fn through_int(self) -> Self {
        self as i32 as f32
    }
}

impl Float for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HALF: Self = 0.5;
    const EXACT: Self = 4503599627370496.0;

    fn through_int(self) -> Self {
        self as i64 as f64
    }
}

pub fn abs<T: Float>(x: T) -> T {
    if x < T::ZERO { -x } else { x }
}

pub fn trunc<T: Float>(x: T) -> T {
    if abs(x) < T::EXACT { x.through_int() } else { x }
}

pub fn floor<T: Float>(x: T) -> T {
    let t = trunc(x);
    if t > x { t - T::ONE } else { t }
}

pub fn ceil<T: Float>(x: T) -> T {
    let t = trunc(x);
    if t < x { t + T::ONE } else { t }
}

pub fn round<T: Float>(x: T) -> T {
    let m = abs(x);
    let t = floor(m);
    let r = if m - t >= T::HALF { t + T::ONE } else { t };
    if x < T::ZERO { -r } else { r }
}

pub fn fract<T: Float>(x: T) -> T {
    x - floor(x)
}

pub fn fmod<T: Float>(a: T, b: T) -> T {
    a - trunc(a / b) * b
}

/// C `%` on integers, truncating toward zero.
pub fn imod(a: i64, b: i64) -> i64 {
    a % b
}

pub fn wrap<T: Float>(v: T, lo: T, hi: T) -> T {
    let span = hi - lo;
    lo + fmod(span + fmod(v - lo, span), span)
}

pub fn sign<T: Float>(x: T) -> T {
    let pos = if x > T::ZERO { T::ONE } else { T::ZERO };
    let neg = if x < T::ZERO { T::ONE } else { T::ZERO };
    pos - neg
}

pub fn copysign<T: Float>(x: T, s: T) -> T {
    if s < T::ZERO { -abs(x) } else { abs(x) }
}
