/*!
Philox: a multiply-xor network keyed by a Weyl sequence.

Each round multiplies two of the words by a fixed odd constant, and the high halves of
the products are xored with the other words and the round key; the low halves move into
place unchanged. The key is "bumped" by a fixed Weyl increment before every round but the
first, so the key schedule is generated on demand and never stored.

Philox engines start `EMPTY`: the first block an engine emits is for its counter plus one.
*/

use crate::backends::U64x4;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

/// Weyl increments of the 32-bit key schedule: the golden ratio and sqrt(3) - 1.
pub const PHILOX_W32: [u32; 2] = [0x9E37_79B9, 0xBB67_AE85];
/// Weyl increments of the 64-bit key schedule.
pub const PHILOX_W64: [u64; 2] = [0x9E37_79B9_7F4A_7C15, 0xBB67_AE85_84CA_A73B];
pub const PHILOX_M4X32: [u32; 2] = [0xD251_1F53, 0xCD9E_8D57];
pub const PHILOX_M2X32: u32 = 0xD256_D193;
pub const PHILOX_M4X64: [u64; 2] = [0xD2E7_470E_E14C_6C93, 0xCA5A_8263_9512_1157];
pub const PHILOX_LANES: usize = 4;

#[inline(always)]
fn bump<T: Word, const K: usize>(key: &mut [T; K], weyl: &[T; K]) {
    for (k, w) in key.iter_mut().zip(weyl) {
        *k = k.wrapping_add(*w);
    }
}

/// Philox4x32 over 64-bit elements holding 32-bit values, so the 32x32 -> 64 products
/// come out whole and the same code runs on `u64` and on packed lanes.
#[inline(always)]
fn philox4x32<R: Rounds, V: MulWide>(x: &mut [V; 4], key: [u32; 2]) {
    let mask = V::splat(LOW_HALF);
    let m0 = V::splat(PHILOX_M4X32[0] as u64);
    let m1 = V::splat(PHILOX_M4X32[1] as u64);
    let mut key = key;
    for round in 0..R::COUNT {
        if round > 0 {
            bump(&mut key, &PHILOX_W32);
        }
        let p0 = x[0].mul_wide(m0);
        let p1 = x[2].mul_wide(m1);
        *x = [
            p1.shr(32).xor(x[1]).xor(V::splat(key[0] as u64)),
            p1.and(mask),
            p0.shr(32).xor(x[3]).xor(V::splat(key[1] as u64)),
            p0.and(mask),
        ];
    }
}

#[inline(always)]
fn mulhilo64(a: u64, b: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128);
    ((product >> 64) as u64, product as u64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Philox4x32<R = R10> {
    key: [u32; 2],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Philox4x32<R> {
    pub fn new(key: [u32; 2]) -> Self {
        Self {
            key,
            _rounds: PhantomData,
        }
    }

    /// The raw block function.
    pub fn transform(&self, ctr: [u32; 4]) -> [u32; 4] {
        let mut x = ctr.map(u64::from);
        philox4x32::<R, u64>(&mut x, self.key);
        x.map(|w| w as u32)
    }
}

impl<R: Rounds> BlockFunction for Philox4x32<R> {
    type Word = u32;
    type Counter = Counter<u32, 4>;
    type Block = [u32; 4];

    const EMPTY: [u32; 4] = [0; 4];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

/// Four Philox4x32 lanes, output word-major.
#[derive(Clone, Copy, Debug)]
pub struct Philox4x32Lanes<R = R10, V = U64x4> {
    scalar: Philox4x32<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> Philox4x32Lanes<R, V> {
    pub fn new(key: [u32; 2]) -> Self {
        Self {
            scalar: Philox4x32::new(key),
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: MulWide + Packed<PHILOX_LANES>> BlockFunction for Philox4x32Lanes<R, V> {
    type Word = u32;
    type Counter = LaneCounters<u32, 4, PHILOX_LANES>;
    type Block = [u32; 4 * PHILOX_LANES];

    const EMPTY: Self::Block = [0; 4 * PHILOX_LANES];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let mut x: [V; 4] = array::from_fn(|w| V::from_lanes(counter.word(w).map(u64::from)));
        philox4x32::<R, V>(&mut x, self.scalar.key);
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word as u32;
            }
        }
    }
}

impl<R: Rounds, V: MulWide + Packed<PHILOX_LANES>> LaneFunction for Philox4x32Lanes<R, V> {
    type Scalar = Philox4x32<R>;

    const LANES: usize = PHILOX_LANES;
    const LAYOUT: Layout = Layout::WordMajor {
        lanes: PHILOX_LANES,
    };

    fn scalar(&self) -> Philox4x32<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u32, 4> {
        counter.lane(lane)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Philox2x32<R = R10> {
    key: u32,
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Philox2x32<R> {
    pub fn new(key: u32) -> Self {
        Self {
            key,
            _rounds: PhantomData,
        }
    }

    pub fn transform(&self, ctr: [u32; 2]) -> [u32; 2] {
        let mut x = ctr;
        let mut key = [self.key];
        for round in 0..R::COUNT {
            if round > 0 {
                bump(&mut key, &[PHILOX_W32[0]]);
            }
            let product = (x[0] as u64) * (PHILOX_M2X32 as u64);
            x = [(product >> 32) as u32 ^ x[1] ^ key[0], product as u32];
        }
        x
    }
}

impl<R: Rounds> BlockFunction for Philox2x32<R> {
    type Word = u32;
    type Counter = Counter<u32, 2>;
    type Block = [u32; 2];

    const EMPTY: [u32; 2] = [0; 2];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Philox4x64<R = R10> {
    key: [u64; 2],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Philox4x64<R> {
    pub fn new(key: [u64; 2]) -> Self {
        Self {
            key,
            _rounds: PhantomData,
        }
    }

    pub fn transform(&self, ctr: [u64; 4]) -> [u64; 4] {
        let mut x = ctr;
        let mut key = self.key;
        for round in 0..R::COUNT {
            if round > 0 {
                bump(&mut key, &PHILOX_W64);
            }
            let (hi0, lo0) = mulhilo64(x[0], PHILOX_M4X64[0]);
            let (hi1, lo1) = mulhilo64(x[2], PHILOX_M4X64[1]);
            x = [hi1 ^ x[1] ^ key[0], lo1, hi0 ^ x[3] ^ key[1], lo0];
        }
        x
    }
}

impl<R: Rounds> BlockFunction for Philox4x64<R> {
    type Word = u64;
    type Counter = Counter<u64, 4>;
    type Block = [u64; 4];

    const EMPTY: [u64; 4] = [0; 4];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

// Random123 known-answer vectors: all ones, and digits of pi.
const KEY_4X32_PI: [u32; 2] = [0xa409_3822, 0x299f_31d0];
const CTR_4X32_PI: [u32; 4] = [0x243f_6a88, 0x85a3_08d3, 0x1319_8a2e, 0x0370_7344];
const OUT_4X32_ONES: [u32; 4] = [0x408f_276d, 0x41c8_3b0e, 0xa20b_c7c6, 0x6d54_51fd];
const OUT_4X32_PI: [u32; 4] = [0xd16c_fe09, 0x94fd_cceb, 0x5001_e420, 0x2412_6ea1];

const KEY_2X32_PI: u32 = 0x1319_8a2e;
const CTR_2X32_PI: [u32; 2] = [0x243f_6a88, 0x85a3_08d3];
const OUT_2X32_ONES: [u32; 2] = [0x2c3f_628b, 0xab4f_d7ad];
const OUT_2X32_PI: [u32; 2] = [0xdd7c_e038, 0xf62a_4c12];

const KEY_4X64_PI: [u64; 2] = [0x4528_21e6_38d0_1377, 0xbe54_66cf_34e9_0c6c];
const CTR_4X64_PI: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];
const OUT_4X64_ONES: [u64; 4] = [
    0x87b0_92c3_013f_e90b,
    0x438c_3c67_be8d_0224,
    0x9cc7_d7c6_9cd7_77b6,
    0xa09c_aebf_594f_0ba0,
];
const OUT_4X64_PI: [u64; 4] = [
    0xa528_f454_03e6_1d95,
    0x38c7_2dbd_566e_9788,
    0xa5a1_610e_72fd_18b5,
    0x57bd_43b5_e52b_7fe6,
];

pub fn self_test_4x32() -> bool {
    let scalar = run_kat([
        KnownAnswer {
            name: "Philox4x32x10 ones",
            function: Philox4x32::<R10>::new([u32::MAX; 2]),
            counter: Counter::new([u32::MAX; 4]),
            expected: &OUT_4X32_ONES,
            layout: Layout::Scalar,
        },
        KnownAnswer {
            name: "Philox4x32x10 pi",
            function: Philox4x32::<R10>::new(KEY_4X32_PI),
            counter: Counter::new(CTR_4X32_PI),
            expected: &OUT_4X32_PI,
            layout: Layout::Scalar,
        },
    ]);
    let lanes = run_kat([
        KnownAnswer {
            name: "Philox4x32x10 lanes ones",
            function: <Philox4x32Lanes<R10>>::new([u32::MAX; 2]),
            counter: LaneCounters::splat(Counter::new([u32::MAX; 4])),
            expected: &OUT_4X32_ONES,
            layout: <Philox4x32Lanes<R10>>::LAYOUT,
        },
        KnownAnswer {
            name: "Philox4x32x10 lanes pi",
            function: <Philox4x32Lanes<R10>>::new(KEY_4X32_PI),
            counter: LaneCounters::splat(Counter::new(CTR_4X32_PI)),
            expected: &OUT_4X32_PI,
            layout: <Philox4x32Lanes<R10>>::LAYOUT,
        },
    ]);
    let agree = check_lanes(
        "Philox4x32x10 lanes vs scalar",
        <Philox4x32Lanes<R10>>::new(KEY_4X32_PI),
        LaneCounters::new(Counter::new([0u32.wrapping_sub(PHILOX_LANES as u32), 0, 0, 0])),
        3,
    );
    scalar & lanes & agree
}

pub fn self_test_2x32() -> bool {
    run_kat([
        KnownAnswer {
            name: "Philox2x32x10 ones",
            function: Philox2x32::<R10>::new(u32::MAX),
            counter: Counter::new([u32::MAX; 2]),
            expected: &OUT_2X32_ONES,
            layout: Layout::Scalar,
        },
        KnownAnswer {
            name: "Philox2x32x10 pi",
            function: Philox2x32::<R10>::new(KEY_2X32_PI),
            counter: Counter::new(CTR_2X32_PI),
            expected: &OUT_2X32_PI,
            layout: Layout::Scalar,
        },
    ])
}

pub fn self_test_4x64() -> bool {
    run_kat([
        KnownAnswer {
            name: "Philox4x64x10 ones",
            function: Philox4x64::<R10>::new([u64::MAX; 2]),
            counter: Counter::new([u64::MAX; 4]),
            expected: &OUT_4X64_ONES,
            layout: Layout::Scalar,
        },
        KnownAnswer {
            name: "Philox4x64x10 pi",
            function: Philox4x64::<R10>::new(KEY_4X64_PI),
            counter: Counter::new(CTR_4X64_PI),
            expected: &OUT_4X64_PI,
            layout: Layout::Scalar,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BlockEngine;

    #[test]
    fn all_ones_scenario() {
        let philox = Philox4x32::<R10>::new([0xFFFF_FFFF; 2]);
        assert_eq!(philox.transform([u32::MAX; 4]), OUT_4X32_ONES);
    }

    #[test]
    fn known_answers() {
        assert!(self_test_4x32());
        assert!(self_test_2x32());
        assert!(self_test_4x64());
    }

    #[test]
    fn first_block_is_counter_plus_one() {
        let philox = Philox4x32::<R10>::new(KEY_4X32_PI);
        let mut start = Counter::new(CTR_4X32_PI);
        let mut engine = BlockEngine::new(philox, start);
        start.increment();
        for expected in philox.transform(*start.words()) {
            assert_eq!(engine.next_word(), expected);
        }
    }

    #[test]
    fn wrap_to_zero_feeds_zero_counter() {
        let philox = Philox4x64::<R10>::new(KEY_4X64_PI);
        let mut engine = BlockEngine::new(philox, Counter::new([u64::MAX; 4]));
        assert_eq!(engine.next_word(), philox.transform([0; 4])[0]);
        assert_eq!(engine.counter(), &Counter::zero());
    }
}
