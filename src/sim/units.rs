//! Typed physical quantities
//!
//! Every vector kind wraps a `Vec3`, `Mass` and `Time` wrap an `f32`. Only the
//! dimensionally valid combinations have operators, so adding a position to a
//! position or dividing a speed by a mass does not compile:
//!
//! ```compile_fail
//! use flipper::sim::Position;
//! let _ = Position::new(1.0, 0.0, 0.0) + Position::new(0.0, 1.0, 0.0);
//! ```
//!
//! ```compile_fail
//! use flipper::sim::{Mass, Speed};
//! let _ = Speed::new(1.0, 0.0, 0.0) / Mass::new(2.0);
//! ```

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::Vec3;
use serde::{Deserialize, Serialize};

macro_rules! vector_quantity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name(Vec3);

        impl $name {
            pub const ZERO: Self = Self(Vec3::ZERO);

            #[inline]
            pub const fn new(x: f32, y: f32, z: f32) -> Self {
                Self(Vec3::new(x, y, z))
            }

            #[inline]
            pub const fn from_vec(v: Vec3) -> Self {
                Self(v)
            }

            /// Raw components, for geometry that has no unit of its own
            #[inline]
            pub fn vec(self) -> Vec3 {
                self.0
            }

            #[inline]
            pub fn magnitude(self) -> f32 {
                self.0.length()
            }
        }

        /// Comparing against a scalar compares magnitude
        impl PartialEq<f32> for $name {
            fn eq(&self, other: &f32) -> bool {
                self.magnitude() == *other
            }
        }

        impl PartialOrd<f32> for $name {
            fn partial_cmp(&self, other: &f32) -> Option<Ordering> {
                self.magnitude().partial_cmp(other)
            }
        }
    };
}

/// Same-kind arithmetic for quantities that behave like differences
macro_rules! linear_ops {
    ($name:ident) => {
        impl Add for $name {
            type Output = $name;
            #[inline]
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            #[inline]
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = $name;
            #[inline]
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: f32) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;
            #[inline]
            fn mul(self, rhs: $name) -> $name {
                $name(rhs.0 * self)
            }
        }

        impl Div<f32> for $name {
            type Output = $name;
            #[inline]
            fn div(self, rhs: f32) -> $name {
                $name(self.0 / rhs)
            }
        }
    };
}

/// Cross-kind operator with a scalar right-hand side
macro_rules! cross_op {
    ($lhs:ident * $rhs:ident => $out:ident) => {
        impl Mul<$rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn mul(self, rhs: $rhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }
    };
    ($lhs:ident / $rhs:ident => $out:ident) => {
        impl Div<$rhs> for $lhs {
            type Output = $out;
            #[inline]
            fn div(self, rhs: $rhs) -> $out {
                $out(self.0 / rhs.0)
            }
        }
    };
}

vector_quantity!(
    /// A point in world (or body-local) space, meters
    Position
);
vector_quantity!(
    /// Displacement between two positions, meters
    DeltaSpace
);
vector_quantity!(
    /// Linear velocity, m/s
    Speed
);
vector_quantity!(
    /// Linear acceleration, m/s²
    Acceleration
);
vector_quantity!(
    /// Force, newtons
    Force
);
vector_quantity!(
    /// Change of momentum, N·s
    Impulse
);

linear_ops!(DeltaSpace);
linear_ops!(Speed);
linear_ops!(Acceleration);
linear_ops!(Force);
linear_ops!(Impulse);

/// Mass in kilograms. Must be strictly positive for anything that moves.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Mass(f32);

impl Mass {
    #[inline]
    pub const fn new(kg: f32) -> Self {
        Self(kg)
    }

    #[inline]
    pub fn kg(self) -> f32 {
        self.0
    }

    /// Two-body reduced mass `m1*m2 / (m1+m2)`
    ///
    /// Divides before multiplying so an immovable partner (`f32::MAX / 10`)
    /// does not overflow.
    pub fn reduced(self, other: Mass) -> Mass {
        let total = self.0 + other.0;
        Mass(self.0 * (other.0 / total))
    }
}

impl Add for Mass {
    type Output = Mass;
    #[inline]
    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

/// Elapsed time in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Time(f32);

impl Time {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub const fn seconds(s: f32) -> Self {
        Self(s)
    }

    #[inline]
    pub fn as_secs(self) -> f32 {
        self.0
    }
}

impl Add for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl Sub for Time {
    type Output = Time;
    #[inline]
    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Sub for Position {
    type Output = DeltaSpace;
    #[inline]
    fn sub(self, rhs: Position) -> DeltaSpace {
        DeltaSpace(self.0 - rhs.0)
    }
}

impl Add<DeltaSpace> for Position {
    type Output = Position;
    #[inline]
    fn add(self, rhs: DeltaSpace) -> Position {
        Position(self.0 + rhs.0)
    }
}

impl Sub<DeltaSpace> for Position {
    type Output = Position;
    #[inline]
    fn sub(self, rhs: DeltaSpace) -> Position {
        Position(self.0 - rhs.0)
    }
}

impl AddAssign<DeltaSpace> for Position {
    #[inline]
    fn add_assign(&mut self, rhs: DeltaSpace) {
        self.0 += rhs.0;
    }
}

cross_op!(Speed * Time => DeltaSpace);
cross_op!(Acceleration * Time => Speed);
cross_op!(Force / Mass => Acceleration);
cross_op!(Speed * Mass => Impulse);
cross_op!(Impulse / Mass => Speed);
cross_op!(Impulse / Time => Force);
cross_op!(Force * Time => Impulse);
