/*!
Parsing of the variant parameter a generator is created with.

A parameter names an implementation (`scalar`, `vector` or `avx2`), a family-specific
modifier (round count, cipher mode, ...) or both, joined by a `-` in either order. The
empty string is the family's default: scalar with the default modifier.
*/

use crate::backends;
use crate::error::Error;
use crate::generator::Family;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Implementation {
    #[default]
    Scalar,
    /// Lane engine on whatever backend this build has.
    Vector,
    /// Lane engine, and the build must have the avx2 backend.
    Avx2,
}

impl Implementation {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "scalar" | "c99" => Some(Implementation::Scalar),
            "vector" => Some(Implementation::Vector),
            "avx2" => Some(Implementation::Avx2),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Variant<'a> {
    pub implementation: Implementation,
    pub modifier: Option<&'a str>,
}

impl<'a> Variant<'a> {
    /// Never fails: anything that isn't an implementation is kept as the modifier, and
    /// it's up to the family to reject it.
    pub fn parse(param: &'a str) -> Self {
        if param.is_empty() {
            return Self::new(Implementation::Scalar, None);
        }
        if let Some(implementation) = Implementation::parse(param) {
            return Self::new(implementation, None);
        }
        if let Some((a, b)) = param.split_once('-') {
            if let Some(implementation) = Implementation::parse(a) {
                return Self::new(implementation, Some(b));
            }
            if let Some(implementation) = Implementation::parse(b) {
                return Self::new(implementation, Some(a));
            }
        }
        Self::new(Implementation::Scalar, Some(param))
    }

    const fn new(implementation: Implementation, modifier: Option<&'a str>) -> Self {
        Self {
            implementation,
            modifier,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.implementation == Implementation::Scalar
    }

    /// Accepts no modifier at all.
    pub fn plain(&self, family: Family) -> Result<(), Error> {
        match self.modifier {
            None => Ok(()),
            Some(_) => Err(Error::UnknownVariant { family }),
        }
    }

    /// Accepts only the scalar implementation and no modifier.
    pub fn scalar_only(&self, family: Family) -> Result<(), Error> {
        self.plain(family)?;
        if self.is_scalar() {
            Ok(())
        } else {
            Err(Error::UnknownVariant { family })
        }
    }

    /// Picks the modifier out of `allowed`. The first entry is the default.
    pub fn modifier(
        &self,
        family: Family,
        allowed: &[&'static str],
    ) -> Result<&'static str, Error> {
        match self.modifier {
            None => allowed.first().copied().ok_or(Error::UnknownVariant { family }),
            Some(m) => allowed
                .iter()
                .find(|&&a| a == m)
                .copied()
                .ok_or(Error::UnknownVariant { family }),
        }
    }

    /// Whether to build the lane engine. Fails for `avx2` on builds without it.
    pub fn lanes(&self, family: Family) -> Result<bool, Error> {
        match self.implementation {
            Implementation::Scalar => Ok(false),
            Implementation::Vector => Ok(true),
            Implementation::Avx2 if backends::AVX2 => Ok(true),
            Implementation::Avx2 => Err(Error::Unsupported {
                family,
                feature: "avx2",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forms() {
        use Implementation::*;
        let cases = [
            ("", Scalar, None),
            ("scalar", Scalar, None),
            ("c99", Scalar, None),
            ("vector", Vector, None),
            ("avx2", Avx2, None),
            ("20", Scalar, Some("20")),
            ("vector-20", Vector, Some("20")),
            ("20-vector", Vector, Some("20")),
            ("avx2-threefish", Avx2, Some("threefish")),
            ("cbc-avx2", Avx2, Some("cbc")),
            ("foo-bar", Scalar, Some("foo-bar")),
        ];
        for (param, implementation, modifier) in cases {
            assert_eq!(
                Variant::parse(param),
                Variant {
                    implementation,
                    modifier
                },
                "{param}"
            );
        }
    }

    #[test]
    fn modifier_defaults_to_first() {
        let allowed = ["12", "8", "20"];
        assert_eq!(Variant::parse("vector").modifier(Family::ChaCha, &allowed), Ok("12"));
        assert_eq!(Variant::parse("8").modifier(Family::ChaCha, &allowed), Ok("8"));
        assert_eq!(
            Variant::parse("9").modifier(Family::ChaCha, &allowed),
            Err(Error::UnknownVariant {
                family: Family::ChaCha
            })
        );
    }

    #[test]
    fn scalar_only_rejects_lanes() {
        assert!(Variant::parse("").scalar_only(Family::Philox2x32).is_ok());
        assert!(Variant::parse("scalar").scalar_only(Family::Philox2x32).is_ok());
        assert!(Variant::parse("vector").scalar_only(Family::Philox2x32).is_err());
        assert!(Variant::parse("x").scalar_only(Family::Philox2x32).is_err());
    }

    #[test]
    fn avx2_follows_build() {
        let lanes = Variant::parse("avx2").lanes(Family::Lea128);
        if backends::AVX2 {
            assert_eq!(lanes, Ok(true));
        } else {
            assert_eq!(
                lanes,
                Err(Error::Unsupported {
                    family: Family::Lea128,
                    feature: "avx2"
                })
            );
        }
        assert_eq!(Variant::parse("vector").lanes(Family::Lea128), Ok(true));
        assert_eq!(Variant::parse("").lanes(Family::Lea128), Ok(false));
    }
}
