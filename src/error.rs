//! Errors reported when a generator is created.

use crate::generator::Family;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The family name doesn't match any generator in this crate.
    UnknownFamily,
    /// The parameter string isn't a variant of `family`.
    UnknownVariant { family: Family },
    /// The variant needs a backend this build doesn't have.
    Unsupported {
        family: Family,
        feature: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownFamily => write!(f, "Unknown generator family"),
            Error::UnknownVariant { family } => {
                write!(f, "Unknown variant for {}", family.name())
            }
            Error::Unsupported { family, feature } => {
                write!(
                    f,
                    "{} variant of {} is not supported by this build",
                    feature,
                    family.name()
                )
            }
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::format;

    #[test]
    fn test_display_unknown_family() {
        assert_eq!(format!("{}", Error::UnknownFamily), "Unknown generator family");
    }

    #[test]
    fn test_display_unknown_variant() {
        let err = Error::UnknownVariant {
            family: Family::ChaCha,
        };
        assert_eq!(format!("{}", err), "Unknown variant for chacha");
    }

    #[test]
    fn test_display_unsupported() {
        let err = Error::Unsupported {
            family: Family::Lea128,
            feature: "avx2",
        };
        assert_eq!(
            format!("{}", err),
            "avx2 variant of lea128 is not supported by this build"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::UnknownFamily, Error::UnknownFamily);
        assert_ne!(
            Error::UnknownVariant {
                family: Family::Xtea
            },
            Error::UnknownVariant {
                family: Family::Speck128
            }
        );
    }
}
