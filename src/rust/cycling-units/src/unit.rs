// Copyright 2026 Cycling Protocol Developers
// SPDX-License-Identifier: Apache-2.0

pub(crate) fn round_to_significant_digits(x: f64, n: u32) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        let order = x.abs().log10().floor();
        let scale = 10f64.powf((n as f64) - 1.0 - order);
        (x * scale).round() / scale
    }
}

/// Bit pattern used for hashing, with `-0.0` folded onto `0.0` so that
/// hashing agrees with equality.
pub fn canonical_bits(x: f64) -> u64 {
    (x + 0.0).to_bits()
}

macro_rules! quantity {
    ($ident:ident) => {
        /// A quantity represented with unit type.
        ///
        /// # Type Parameter
        /// - `T`: The underlying value (typically a floating point number)
        /// - `U`: The unit of the value. Typically, it is a zero-sized type.
        #[derive(std::clone::Clone, std::marker::Copy, std::default::Default)]
        pub struct $ident<U, T = f64> {
            pub(crate) value: T,
            pub(crate) unit: U,
        }

        impl<U, T> $ident<U, T> {
            pub fn value(self) -> T {
                self.value
            }
        }

        impl<T: num_traits::Zero + std::cmp::PartialEq, U> PartialEq for $ident<U, T> {
            fn eq(&self, other: &Self) -> bool {
                let a = &self.value;
                let b = &other.value;
                if a.is_zero() && b.is_zero() {
                    true
                } else {
                    a == b
                }
            }
        }

        impl<U> Eq for $ident<U, f64> {}

        impl<U> std::hash::Hash for $ident<U, f64> {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                std::hash::Hash::hash(&$crate::unit::canonical_bits(self.value), state);
            }
        }

        impl<T: num_traits::Zero + std::cmp::PartialOrd, U> PartialOrd for $ident<U, T> {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                if self == other {
                    Some(std::cmp::Ordering::Equal)
                } else {
                    self.value.partial_cmp(&other.value)
                }
            }
        }

        impl<U, T> std::ops::Add for $ident<U, T>
        where
            T: std::ops::Add<Output = T> + std::marker::Copy,
            U: std::marker::Copy,
        {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                $ident {
                    value: self.value + rhs.value,
                    unit: self.unit,
                }
            }
        }

        impl<U, T> std::ops::Mul<T> for $ident<U, T>
        where
            T: std::ops::Mul<T, Output = T> + std::marker::Copy,
            U: std::marker::Copy,
        {
            type Output = Self;

            fn mul(self, rhs: T) -> Self::Output {
                $ident {
                    value: self.value * rhs,
                    unit: self.unit,
                }
            }
        }

        impl<U, T: std::fmt::Debug> std::fmt::Debug for $ident<U, T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ident))
                    .field("value", &self.value)
                    .field("unit", &std::any::type_name::<U>())
                    .finish()
            }
        }

        impl<U, T> std::fmt::Display for $ident<U, T>
        where
            T: std::fmt::Display
                + std::fmt::Debug
                + num_traits::AsPrimitive<f64>
                + num_traits::Float,
            U: std::fmt::Display,
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if f.alternate() {
                    std::fmt::Display::fmt(&self.value, f)?;
                } else {
                    // Round to a number of significand digits slightly below that of epsilon,
                    // so that accumulated rounding errors do not show up in protocol listings.
                    let significand_digits = (-T::epsilon().log10() - T::one()).as_() as u32;
                    let value = $crate::unit::round_to_significant_digits(
                        self.value.as_(),
                        significand_digits,
                    );
                    std::fmt::Display::fmt(&value, f)?;
                }
                write!(f, " ")?;
                std::fmt::Display::fmt(&self.unit, f)
            }
        }

        impl<U> From<f64> for $ident<U, f64>
        where
            U: std::default::Default,
        {
            fn from(value: f64) -> Self {
                $ident {
                    value,
                    unit: U::default(),
                }
            }
        }

        impl<U> From<$ident<U, f64>> for f64 {
            fn from(value: $ident<U, f64>) -> Self {
                value.value
            }
        }

        // Quantities travel as bare numbers in their canonical unit.
        impl<U> serde::Serialize for $ident<U, f64> {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_f64(self.value)
            }
        }

        impl<'de, U: std::default::Default> serde::Deserialize<'de> for $ident<U, f64> {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <f64 as serde::Deserialize>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}
