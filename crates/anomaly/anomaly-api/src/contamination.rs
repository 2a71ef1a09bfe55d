//! Expected share of anomalous rows.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use anomaly_spi::{AnomalyError, Result};

/// Expected proportion of anomalies, used by the ensemble and density
/// primitives for their own native thresholds.
///
/// Serialized as the string `"auto"` or as a number in `(0, 0.5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Contamination {
    /// Let the primitive pick its documented default offset.
    #[default]
    Auto,
    /// Explicit fraction in `(0, 0.5]`.
    Fraction(f64),
}

impl Contamination {
    /// Check that an explicit fraction lies in `(0, 0.5]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Auto => Ok(()),
            Self::Fraction(f) if f > 0.0 && f <= 0.5 => Ok(()),
            Self::Fraction(f) => Err(AnomalyError::invalid_parameter(
                "contamination",
                format!("must be \"auto\" or in (0, 0.5], got {}", f),
            )),
        }
    }

    /// The explicit fraction, if any.
    pub fn fraction(&self) -> Option<f64> {
        match *self {
            Self::Auto => None,
            Self::Fraction(f) => Some(f),
        }
    }
}

impl fmt::Display for Contamination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fraction(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for Contamination {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fraction(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Contamination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Fraction(f64),
            Keyword(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Fraction(f) => Ok(Self::Fraction(f)),
            Repr::Keyword(k) if k.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            Repr::Keyword(k) => Err(D::Error::custom(format!(
                "unknown contamination '{}', expected \"auto\" or a number",
                k
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        assert!(Contamination::Auto.validate().is_ok());
        assert!(Contamination::Fraction(0.5).validate().is_ok());
        assert!(Contamination::Fraction(0.01).validate().is_ok());
        assert!(Contamination::Fraction(0.0).validate().is_err());
        assert!(Contamination::Fraction(0.51).validate().is_err());
        assert!(Contamination::Fraction(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip_values() {
        assert_eq!(serde_json::to_string(&Contamination::Auto).unwrap(), "\"auto\"");
        assert_eq!(
            serde_json::from_str::<Contamination>("\"AUTO\"").unwrap(),
            Contamination::Auto
        );
        assert_eq!(
            serde_json::from_str::<Contamination>("0.1").unwrap(),
            Contamination::Fraction(0.1)
        );
        assert!(serde_json::from_str::<Contamination>("\"often\"").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Contamination::Auto.to_string(), "auto");
        assert_eq!(Contamination::Fraction(0.05).to_string(), "0.05");
    }
}
