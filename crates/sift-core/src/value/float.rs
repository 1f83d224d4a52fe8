use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};
use thiserror::Error as ThisError;

///
/// Float64
///
/// Finite double usable as a map key and range bound. Zero has a single
/// representation, so bit equality and numeric equality agree.
///

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Serialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Float64(f64);

impl Float64 {
    pub fn new(value: f64) -> Result<Self, Float64Error> {
        if !value.is_finite() {
            return Err(Float64Error { value });
        }

        Ok(Self(value + 0.0))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_bits().to_be_bytes()
    }
}

///
/// Float64Error
///

#[derive(Debug, ThisError)]
#[error("double literal must be finite, got {value}")]
pub struct Float64Error {
    pub value: f64,
}

impl TryFrom<f64> for Float64 {
    type Error = Float64Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Float64> for f64 {
    fn from(value: Float64) -> Self {
        value.0
    }
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float64 {}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(Float64::new(value).is_err());
        }
    }

    #[test]
    fn zero_has_one_representation() {
        let negative = Float64::new(-0.0).unwrap();
        let positive = Float64::new(0.0).unwrap();

        assert_eq!(negative, positive);
        assert_eq!(negative.to_be_bytes(), positive.to_be_bytes());
        assert_eq!(negative.cmp(&positive), Ordering::Equal);
        assert!(Float64::new(-1.5).unwrap() < negative);
    }

    #[test]
    fn json_overflow_is_rejected() {
        assert!(serde_json::from_str::<Float64>("1e400").is_err());

        let value: Float64 = serde_json::from_str("2.5").unwrap();
        assert_eq!(value.get(), 2.5);
    }
}
