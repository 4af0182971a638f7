/*!
The host-facing side of the crate: pick a family by name, hand over a source of seed
words and a variant parameter, and get back a [`Generator`] producing one word per call.

```
use ctrblock::{Family, Generator};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

let mut seed = ChaCha8Rng::seed_from_u64(42);
let mut rng = Generator::create(Family::ChaCha, &mut seed, "vector-20").unwrap();
assert_eq!(rng.word_bits(), 32);
let _ = rng.next_word();
assert!(rng.self_test());
```
*/

use crate::backends;
use crate::chacha::{ChaCha, ChaChaLanes};
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockEngine, BlockFunction};
use crate::error::Error;
use crate::lea::{Lea128, Lea128Lanes};
use crate::philox::{self, Philox2x32, Philox4x32, Philox4x32Lanes, Philox4x64};
use crate::rounds::*;
use crate::speck::{Speck128, Speck128Lanes};
use crate::threefry::{self, Threefry2x64, Threefry2x64Lanes, Threefry4x64, Threefry4x64Lanes};
use crate::util::{Word, split_u64};
use crate::variations::Variant;
use crate::xtea::{Xtea, XteaLanes, XteaMode};
use core::array;
use core::fmt;
use core::str::FromStr;
use log::{info, warn};
use rand_core::RngCore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Philox4x32,
    Philox2x32,
    Philox4x64,
    Threefry4x64,
    Threefry2x64,
    ChaCha,
    Speck128,
    Xtea,
    Lea128,
}

impl Family {
    pub const ALL: [Family; 9] = [
        Family::Philox4x32,
        Family::Philox2x32,
        Family::Philox4x64,
        Family::Threefry4x64,
        Family::Threefry2x64,
        Family::ChaCha,
        Family::Speck128,
        Family::Xtea,
        Family::Lea128,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Family::Philox4x32 => "philox4x32",
            Family::Philox2x32 => "philox2x32",
            Family::Philox4x64 => "philox4x64",
            Family::Threefry4x64 => "threefry4x64",
            Family::Threefry2x64 => "threefry2x64",
            Family::ChaCha => "chacha",
            Family::Speck128 => "speck128",
            Family::Xtea => "xtea",
            Family::Lea128 => "lea128",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Family::Philox4x32 => {
                "Philox4x32x10, 32-bit output. Params: scalar (default), vector, avx2"
            }
            Family::Philox2x32 => "Philox2x32x10, 32-bit output. Params: scalar (default)",
            Family::Philox4x64 => "Philox4x64x10, 64-bit output. Params: scalar (default)",
            Family::Threefry4x64 => {
                "Threefry4x64, 64-bit output. Modifiers: threefry (20 rounds, default), \
                 threefish (72 rounds); combine with scalar, vector or avx2"
            }
            Family::Threefry2x64 => {
                "Threefry2x64x20, 64-bit output. Params: scalar (default), vector, avx2"
            }
            Family::ChaCha => {
                "ChaCha, 32-bit output. Modifiers: 8, 12 (default), 20; \
                 combine with scalar, vector or avx2"
            }
            Family::Speck128 => {
                "Speck128/128, 64-bit output. Modifiers: full (32 rounds, default), \
                 r16 (16 rounds, vector and avx2 only)"
            }
            Family::Xtea => {
                "XTEA, 64-bit output. Modifiers: ctr (default), \
                 cbc (vector and avx2 only)"
            }
            Family::Lea128 => "LEA-128, 32-bit output. Params: scalar (default), vector, avx2",
        }
    }

    pub const fn word_bits(self) -> u32 {
        match self {
            Family::Philox4x32 | Family::Philox2x32 | Family::ChaCha | Family::Lea128 => 32,
            Family::Philox4x64
            | Family::Threefry4x64
            | Family::Threefry2x64
            | Family::Speck128
            | Family::Xtea => 64,
        }
    }

    /// Runs the family's known-answer tests, scalar and lanes. Doesn't need a seed.
    pub fn self_test(self) -> bool {
        info!("{}: self-test on the {} backend", self.name(), backends::name());
        match self {
            Family::Philox4x32 => philox::self_test_4x32(),
            Family::Philox2x32 => philox::self_test_2x32(),
            Family::Philox4x64 => philox::self_test_4x64(),
            Family::Threefry4x64 => threefry::self_test_4x64(),
            Family::Threefry2x64 => threefry::self_test_2x64(),
            Family::ChaCha => crate::chacha::self_test(),
            Family::Speck128 => crate::speck::self_test(),
            Family::Xtea => crate::xtea::self_test(),
            Family::Lea128 => crate::lea::self_test(),
        }
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or(Error::UnknownFamily)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! engines {
    ($($variant:ident($function:ty) => $name:literal,)*) => {
        #[derive(Clone)]
        enum Engine {
            $($variant(BlockEngine<$function>),)*
        }

        impl Engine {
            #[inline]
            fn next_word(&mut self) -> u64 {
                match self {
                    $(Engine::$variant(engine) => engine.next_word().widen(),)*
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Engine::$variant(_) => $name,)*
                }
            }
        }
    };
}

engines! {
    Philox4x32(Philox4x32<R10>) => "Philox4x32x10",
    Philox4x32Vector(Philox4x32Lanes<R10>) => "Philox4x32x10 vector",
    Philox2x32(Philox2x32<R10>) => "Philox2x32x10",
    Philox4x64(Philox4x64<R10>) => "Philox4x64x10",
    Threefry4x64(Threefry4x64<R20>) => "Threefry4x64x20",
    Threefry4x64Vector(Threefry4x64Lanes<R20>) => "Threefry4x64x20 vector",
    Threefish4x64(Threefry4x64<R72>) => "Threefish4x64x72",
    Threefish4x64Vector(Threefry4x64Lanes<R72>) => "Threefish4x64x72 vector",
    Threefry2x64(Threefry2x64<R20>) => "Threefry2x64x20",
    Threefry2x64Vector(Threefry2x64Lanes<R20>) => "Threefry2x64x20 vector",
    ChaCha8(ChaCha<R8>) => "ChaCha8",
    ChaCha8Vector(ChaChaLanes<R8>) => "ChaCha8 vector",
    ChaCha12(ChaCha<R12>) => "ChaCha12",
    ChaCha12Vector(ChaChaLanes<R12>) => "ChaCha12 vector",
    ChaCha20(ChaCha<R20>) => "ChaCha20",
    ChaCha20Vector(ChaChaLanes<R20>) => "ChaCha20 vector",
    Speck128(Speck128<R32>) => "Speck128/128",
    Speck128Vector(Speck128Lanes<R32>) => "Speck128/128 vector",
    Speck128VectorR16(Speck128Lanes<R16>) => "Speck128/128 vector, 16 rounds",
    Xtea(Xtea<R32>) => "XTEA",
    XteaVectorCtr(XteaLanes<R32>) => "XTEA vector ctr",
    XteaVectorCbc(XteaLanes<R32>) => "XTEA vector cbc",
    Lea128(Lea128<R24>) => "LEA-128",
    Lea128Vector(Lea128Lanes<R24>) => "LEA-128 vector",
}

fn scalar<F, T, const N: usize>(function: F) -> BlockEngine<F>
where
    F: BlockFunction<Counter = Counter<T, N>>,
    T: Word,
{
    BlockEngine::new(function, Counter::zero())
}

fn lanes<F, T, const N: usize, const L: usize>(function: F) -> BlockEngine<F>
where
    F: BlockFunction<Counter = LaneCounters<T, N, L>>,
    T: Word,
{
    BlockEngine::new(function, LaneCounters::new(Counter::zero()))
}

/// Each seed word fills two key words, low half first.
fn key_u32<const N: usize, S: RngCore + ?Sized>(seed: &mut S) -> [u32; N] {
    let mut key = [0; N];
    for pair in key.chunks_mut(2) {
        let halves = split_u64(seed.next_u64());
        pair.copy_from_slice(&halves[..pair.len()]);
    }
    key
}

fn key_u64<const N: usize, S: RngCore + ?Sized>(seed: &mut S) -> [u64; N] {
    array::from_fn(|_| seed.next_u64())
}

impl Engine {
    /// The parameter is fully validated before any seed word is drawn.
    fn build<S: RngCore + ?Sized>(
        family: Family,
        seed: &mut S,
        param: &str,
    ) -> Result<Self, Error> {
        let variant = Variant::parse(param);
        let engine = match family {
            Family::Philox4x32 => {
                variant.plain(family)?;
                if variant.lanes(family)? {
                    Engine::Philox4x32Vector(lanes(Philox4x32Lanes::new(key_u32(seed))))
                } else {
                    Engine::Philox4x32(scalar(Philox4x32::new(key_u32(seed))))
                }
            }
            Family::Philox2x32 => {
                variant.scalar_only(family)?;
                Engine::Philox2x32(scalar(Philox2x32::new(split_u64(seed.next_u64())[0])))
            }
            Family::Philox4x64 => {
                variant.scalar_only(family)?;
                Engine::Philox4x64(scalar(Philox4x64::new(key_u64(seed))))
            }
            Family::Threefry4x64 => {
                let rounds = variant.modifier(family, &["threefry", "threefish"])?;
                let vector = variant.lanes(family)?;
                let key = key_u64(seed);
                match (rounds, vector) {
                    ("threefish", false) => Engine::Threefish4x64(scalar(Threefry4x64::new(key))),
                    ("threefish", true) => {
                        Engine::Threefish4x64Vector(lanes(Threefry4x64Lanes::new(key)))
                    }
                    (_, false) => Engine::Threefry4x64(scalar(Threefry4x64::new(key))),
                    (_, true) => Engine::Threefry4x64Vector(lanes(Threefry4x64Lanes::new(key))),
                }
            }
            Family::Threefry2x64 => {
                variant.plain(family)?;
                if variant.lanes(family)? {
                    Engine::Threefry2x64Vector(lanes(Threefry2x64Lanes::new(key_u64(seed))))
                } else {
                    Engine::Threefry2x64(scalar(Threefry2x64::new(key_u64(seed))))
                }
            }
            Family::ChaCha => {
                let rounds = variant.modifier(family, &["12", "8", "20"])?;
                let vector = variant.lanes(family)?;
                let key = key_u32(seed);
                match (rounds, vector) {
                    ("8", false) => Engine::ChaCha8(scalar(ChaCha::new(key))),
                    ("8", true) => Engine::ChaCha8Vector(lanes(ChaChaLanes::new(key))),
                    ("20", false) => Engine::ChaCha20(scalar(ChaCha::new(key))),
                    ("20", true) => Engine::ChaCha20Vector(lanes(ChaChaLanes::new(key))),
                    (_, false) => Engine::ChaCha12(scalar(ChaCha::new(key))),
                    (_, true) => Engine::ChaCha12Vector(lanes(ChaChaLanes::new(key))),
                }
            }
            Family::Speck128 => {
                let rounds = variant.modifier(family, &["full", "r32", "r16"])?;
                if rounds == "r16" && variant.is_scalar() {
                    return Err(Error::UnknownVariant { family });
                }
                let vector = variant.lanes(family)?;
                let key = key_u64(seed);
                match (rounds, vector) {
                    ("r16", _) => Engine::Speck128VectorR16(lanes(Speck128Lanes::new(key))),
                    (_, true) => Engine::Speck128Vector(lanes(Speck128Lanes::new(key))),
                    (_, false) => Engine::Speck128(scalar(Speck128::new(key))),
                }
            }
            Family::Xtea => {
                let mode = variant.modifier(family, &["ctr", "cbc"])?;
                if mode == "cbc" && variant.is_scalar() {
                    return Err(Error::UnknownVariant { family });
                }
                let vector = variant.lanes(family)?;
                let key = key_u32(seed);
                match (mode, vector) {
                    ("cbc", _) => Engine::XteaVectorCbc(lanes(XteaLanes::new(key, XteaMode::Cbc))),
                    (_, true) => Engine::XteaVectorCtr(lanes(XteaLanes::new(key, XteaMode::Ctr))),
                    (_, false) => Engine::Xtea(scalar(Xtea::new(key))),
                }
            }
            Family::Lea128 => {
                variant.plain(family)?;
                if variant.lanes(family)? {
                    Engine::Lea128Vector(lanes(Lea128Lanes::new(key_u32(seed))))
                } else {
                    Engine::Lea128(scalar(Lea128::new(key_u32(seed))))
                }
            }
        };
        Ok(engine)
    }
}

/// A seeded generator of one family, in one variant.
#[derive(Clone)]
pub struct Generator {
    family: Family,
    engine: Engine,
}

impl Generator {
    /// Builds a generator, drawing its key from `seed`. The counter starts at zero.
    ///
    /// Fails with [`Error::UnknownVariant`] for a parameter the family doesn't accept,
    /// and with [`Error::Unsupported`] for `avx2` on a build without it. Nothing is
    /// drawn from `seed` when creation fails.
    pub fn create<S: RngCore + ?Sized>(
        family: Family,
        seed: &mut S,
        param: &str,
    ) -> Result<Self, Error> {
        let engine = Engine::build(family, seed, param).inspect_err(|err| {
            warn!("{family}: rejected parameter {param:?}: {err}");
        })?;
        info!(
            "{family}: created {} on the {} backend",
            engine.name(),
            backends::name()
        );
        Ok(Self { family, engine })
    }

    /// [`Generator::create`] with the family given by name.
    pub fn create_by_name<S: RngCore + ?Sized>(
        name: &str,
        seed: &mut S,
        param: &str,
    ) -> Result<Self, Error> {
        let family = name.parse::<Family>().inspect_err(|_| {
            warn!("unknown generator family {name:?}");
        })?;
        Self::create(family, seed, param)
    }

    /// The next output word, zero-extended when the family produces 32-bit words.
    #[inline]
    pub fn next_word(&mut self) -> u64 {
        self.engine.next_word()
    }

    pub fn word_bits(&self) -> u32 {
        self.family.word_bits()
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// The concrete engine, e.g. `"ChaCha20 vector"`.
    pub fn name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn self_test(&self) -> bool {
        self.family.self_test()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("family", &self.family)
            .field("engine", &self.engine.name())
            .finish_non_exhaustive()
    }
}

impl RngCore for Generator {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_word() as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        match self.word_bits() {
            32 => rand_core::impls::next_u64_via_u32(self),
            _ => self.next_word(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand_core::impls::fill_bytes_via_next(self, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn names_round_trip() {
        for family in Family::ALL {
            assert_eq!(family.name().parse::<Family>(), Ok(family));
        }
        assert_eq!("philox".parse::<Family>(), Err(Error::UnknownFamily));
    }

    #[test]
    fn rejected_param_draws_no_seed() {
        let mut seed = ChaCha8Rng::seed_from_u64(1);
        let before = seed.clone();
        let err = Generator::create(Family::Xtea, &mut seed, "scalar-cbc").unwrap_err();
        assert_eq!(err, Error::UnknownVariant { family: Family::Xtea });
        assert_eq!(seed, before);
    }

    #[test]
    fn variant_names() {
        let mut seed = ChaCha8Rng::seed_from_u64(2);
        let cases = [
            (Family::ChaCha, "", "ChaCha12"),
            (Family::ChaCha, "8", "ChaCha8"),
            (Family::ChaCha, "vector-20", "ChaCha20 vector"),
            (Family::Threefry4x64, "threefish", "Threefish4x64x72"),
            (Family::Threefry4x64, "vector", "Threefry4x64x20 vector"),
            (Family::Speck128, "vector-r16", "Speck128/128 vector, 16 rounds"),
            (Family::Speck128, "r32", "Speck128/128"),
            (Family::Xtea, "cbc-vector", "XTEA vector cbc"),
            (Family::Lea128, "c99", "LEA-128"),
        ];
        for (family, param, name) in cases {
            let rng = Generator::create(family, &mut seed, param).unwrap();
            assert_eq!(rng.name(), name, "{family} {param:?}");
        }
    }

    #[test]
    fn key_words_take_low_half_first() {
        let mut seed = ChaCha8Rng::seed_from_u64(3);
        let mut copy = seed.clone();
        let key: [u32; 3] = key_u32(&mut seed);
        let first = split_u64(copy.next_u64());
        let second = split_u64(copy.next_u64());
        assert_eq!(key, [first[0], first[1], second[0]]);
    }

    #[test]
    fn next_u64_joins_two_words() {
        let mut seed = ChaCha8Rng::seed_from_u64(4);
        let mut a = Generator::create(Family::Lea128, &mut seed, "").unwrap();
        let mut b = a.clone();
        let lo = b.next_word();
        let hi = b.next_word();
        assert_eq!(a.next_u64(), lo | (hi << 32));
    }
}
