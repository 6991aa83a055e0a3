//! The contract shared by every coordinate axis.
//!
//! A dimension is a closed enumeration: `Display` is total (every canonical
//! value has one external spelling) and `FromStr` is partial (unknown
//! spellings fail with [`UnknownTokenError`]). Several external spellings may
//! resolve to the same canonical value.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::UnknownTokenError;

/// A closed, string-mapped coordinate axis.
pub trait Dimension:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + FromStr<Err = UnknownTokenError> + 'static
{
    /// Axis name used in error messages.
    const KIND: &'static str;

    /// Every canonical value, in declaration order.
    fn variants() -> Vec<Self>;

    /// Resolve an external token to its canonical value.
    fn to_canonical(token: &str) -> Result<Self, UnknownTokenError> {
        token.parse()
    }

    /// Canonical display spelling.
    fn to_external(&self) -> String {
        self.to_string()
    }
}

/// Implements `Serialize`/`Deserialize` through the external token spelling.
macro_rules! token_serde {
    ($($ty:ty),+ $(,)?) => {$(
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    )+};
}

pub(crate) use token_serde;

/// Asserts `to_canonical(to_external(v)) == v` for every value of `D`.
#[cfg(test)]
pub(crate) fn assert_round_trip<D: Dimension>() {
    let variants = D::variants();
    assert!(!variants.is_empty(), "{} has no variants", D::KIND);
    for value in variants {
        let external = value.to_external();
        assert_eq!(
            D::to_canonical(&external),
            Ok(value),
            "{} did not round-trip through {:?}",
            D::KIND,
            external
        );
    }
}
