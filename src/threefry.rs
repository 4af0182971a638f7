/*!
Threefry: the Threefish tweakable block cipher with the tweak dropped, run in counter mode.

Rounds are applied in groups of four. Before the first group and after every group the
key schedule is injected: word `i` gets key word `(s + i) mod (N + 1)` added, and the last
word also gets the injection index `s`. The extra key word is the parity word, the xor of
all key words with [`SKEIN_KS_PARITY`]. Rotation constants cycle with period eight, so
even groups use the first half of the table and odd groups the second.

`Threefry4x64<R20>` is the fast Random123 flavour, `Threefry4x64<R72>` runs the full
Threefish-256 round count. Engines start `EMPTY`, like Philox.
*/

use crate::backends::U64x4;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

pub const SKEIN_KS_PARITY: u64 = 0x1BD1_1BDA_A9FC_1A22;
/// Rotation pairs of Threefry4x64, by round mod 8.
pub const ROTATIONS_4X64: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5, 37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];
/// Rotations of Threefry2x64, by round mod 8.
pub const ROTATIONS_2X64: [u32; 8] = [16, 42, 12, 31, 16, 32, 24, 21];
pub const THREEFRY_LANES: usize = 4;

/// Appends the parity word to a key.
fn key_schedule<const N: usize, const K: usize>(key: [u64; N]) -> [u64; K] {
    array::from_fn(|i| match key.get(i) {
        Some(&k) => k,
        None => key.iter().fold(SKEIN_KS_PARITY, |parity, k| parity ^ k),
    })
}

#[inline(always)]
fn mix4<V: Arx<Elem = u64>>(x: &mut [V; 4], [r0, r1]: [u32; 2]) {
    let x0 = x[0].add(x[1]);
    let x2 = x[2].add(x[3]);
    *x = [x0, x[3].rotl(r1).xor(x2), x2, x[1].rotl(r0).xor(x0)];
}

#[inline(always)]
fn inject4<V: Arx<Elem = u64>>(x: &mut [V; 4], ks: &[u64; 5], s: usize) {
    for (i, word) in x.iter_mut().enumerate() {
        let mut k = ks[(s + i) % 5];
        if i == 3 {
            k = k.wrapping_add(s as u64);
        }
        *word = word.add(V::splat(k));
    }
}

#[inline(always)]
fn threefry4x64<R: Rounds, V: Arx<Elem = u64>>(x: &mut [V; 4], ks: &[u64; 5]) {
    inject4(x, ks, 0);
    for group in 0..R::COUNT / 4 {
        for round in 0..4 {
            mix4(x, ROTATIONS_4X64[(4 * group + round) % 8]);
        }
        inject4(x, ks, group + 1);
    }
}

#[inline(always)]
fn mix2<V: Arx<Elem = u64>>(x: &mut [V; 2], r: u32) {
    x[0] = x[0].add(x[1]);
    x[1] = x[1].rotl(r).xor(x[0]);
}

#[inline(always)]
fn inject2<V: Arx<Elem = u64>>(x: &mut [V; 2], ks: &[u64; 3], s: usize) {
    x[0] = x[0].add(V::splat(ks[s % 3]));
    x[1] = x[1].add(V::splat(ks[(s + 1) % 3].wrapping_add(s as u64)));
}

#[inline(always)]
fn threefry2x64<R: Rounds, V: Arx<Elem = u64>>(x: &mut [V; 2], ks: &[u64; 3]) {
    inject2(x, ks, 0);
    for group in 0..R::COUNT / 4 {
        for round in 0..4 {
            mix2(x, ROTATIONS_2X64[(4 * group + round) % 8]);
        }
        inject2(x, ks, group + 1);
    }
}

/// Threefry with four 64-bit words. `R` must be a multiple of four:
///
/// ```compile_fail
/// let _ = ctrblock::threefry::Threefry4x64::<ctrblock::rounds::R10>::new([0; 4]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threefry4x64<R = R20> {
    ks: [u64; 5],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Threefry4x64<R> {
    pub fn new(key: [u64; 4]) -> Self {
        const { assert!(R::COUNT % 4 == 0, "Threefry injects a key every 4 rounds") };
        Self {
            ks: key_schedule(key),
            _rounds: PhantomData,
        }
    }

    pub fn parity(&self) -> u64 {
        self.ks[4]
    }

    /// The raw block function.
    pub fn transform(&self, ctr: [u64; 4]) -> [u64; 4] {
        let mut x = ctr;
        threefry4x64::<R, u64>(&mut x, &self.ks);
        x
    }
}

impl<R: Rounds> BlockFunction for Threefry4x64<R> {
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

#[derive(Clone, Copy, Debug)]
pub struct Threefry4x64Lanes<R = R20, V = U64x4> {
    scalar: Threefry4x64<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> Threefry4x64Lanes<R, V> {
    pub fn new(key: [u64; 4]) -> Self {
        Self {
            scalar: Threefry4x64::new(key),
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: Packed<THREEFRY_LANES, Elem = u64>> BlockFunction for Threefry4x64Lanes<R, V> {
    type Word = u64;
    type Counter = LaneCounters<u64, 4, THREEFRY_LANES>;
    type Block = [u64; 4 * THREEFRY_LANES];

    const EMPTY: Self::Block = [0; 4 * THREEFRY_LANES];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let mut x: [V; 4] = array::from_fn(|w| V::from_lanes(*counter.word(w)));
        threefry4x64::<R, V>(&mut x, &self.scalar.ks);
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word;
            }
        }
    }
}

impl<R: Rounds, V: Packed<THREEFRY_LANES, Elem = u64>> LaneFunction for Threefry4x64Lanes<R, V> {
    type Scalar = Threefry4x64<R>;

    const LANES: usize = THREEFRY_LANES;
    const LAYOUT: Layout = Layout::WordMajor {
        lanes: THREEFRY_LANES,
    };

    fn scalar(&self) -> Threefry4x64<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u64, 4> {
        counter.lane(lane)
    }
}

/// Threefry with two 64-bit words. `R` must be a multiple of four.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threefry2x64<R = R20> {
    ks: [u64; 3],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Threefry2x64<R> {
    /// ```compile_fail
    /// let _ = ctrblock::threefry::Threefry2x64::<ctrblock::rounds::R10>::new([0; 2]);
    /// ```
    pub fn new(key: [u64; 2]) -> Self {
        const { assert!(R::COUNT % 4 == 0, "Threefry injects a key every 4 rounds") };
        Self {
            ks: key_schedule(key),
            _rounds: PhantomData,
        }
    }

    pub fn transform(&self, ctr: [u64; 2]) -> [u64; 2] {
        let mut x = ctr;
        threefry2x64::<R, u64>(&mut x, &self.ks);
        x
    }
}

impl<R: Rounds> BlockFunction for Threefry2x64<R> {
    type Word = u64;
    type Counter = Counter<u64, 2>;
    type Block = [u64; 2];

    const EMPTY: [u64; 2] = [0; 2];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Threefry2x64Lanes<R = R20, V = U64x4> {
    scalar: Threefry2x64<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> Threefry2x64Lanes<R, V> {
    pub fn new(key: [u64; 2]) -> Self {
        Self {
            scalar: Threefry2x64::new(key),
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: Packed<THREEFRY_LANES, Elem = u64>> BlockFunction for Threefry2x64Lanes<R, V> {
    type Word = u64;
    type Counter = LaneCounters<u64, 2, THREEFRY_LANES>;
    type Block = [u64; 2 * THREEFRY_LANES];

    const EMPTY: Self::Block = [0; 2 * THREEFRY_LANES];
    const PRIMED: bool = false;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let mut x: [V; 2] = array::from_fn(|w| V::from_lanes(*counter.word(w)));
        threefry2x64::<R, V>(&mut x, &self.scalar.ks);
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word;
            }
        }
    }
}

impl<R: Rounds, V: Packed<THREEFRY_LANES, Elem = u64>> LaneFunction for Threefry2x64Lanes<R, V> {
    type Scalar = Threefry2x64<R>;

    const LANES: usize = THREEFRY_LANES;
    const LAYOUT: Layout = Layout::WordMajor {
        lanes: THREEFRY_LANES,
    };

    fn scalar(&self) -> Threefry2x64<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u64, 2> {
        counter.lane(lane)
    }
}

// Random123 known-answer vectors. The pi key really does repeat its second word.
const KEY_4X64_PI: [u64; 4] = [
    0x4528_21e6_38d0_1377,
    0xbe54_66cf_34e9_0c6c,
    0xbe54_66cf_34e9_0c6c,
    0xc0ac_29b7_c97c_50dd,
];
const CTR_4X64_PI: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];
const OUT_4X64X72_ONES: [u64; 4] = [
    0x1151_8c03_4bc1_ff4c,
    0x193f_10b8_bcdc_c9f7,
    0xd024_229c_b58f_20d8,
    0x563e_d6e4_8e05_183f,
];
const OUT_4X64X72_PI: [u64; 4] = [
    0xacf4_12cc_aa3b_2270,
    0xc9e9_9bd5_3f2e_9173,
    0x43da_d469_dc82_5948,
    0xfbb1_9d06_c8a2_b4dc,
];
const OUT_4X64X20_ONES: [u64; 4] = [
    0x29c2_4097_942b_ba1b,
    0x0371_bbfb_0f6f_4e11,
    0x3c23_1ffa_33f8_3a1c,
    0xcd29_113f_de32_d168,
];
const OUT_4X64X20_PI: [u64; 4] = [
    0xa7e8_fde5_9165_1bd9,
    0xbaaf_d0c3_0138_319b,
    0x84a5_c1a7_29e6_85b9,
    0x901d_406c_cebc_1ba4,
];

const KEY_2X64_PI: [u64; 2] = [0xa409_3822_299f_31d0, 0x082e_fa98_ec4e_6c89];
const CTR_2X64_PI: [u64; 2] = [0x243f_6a88_85a3_08d3, 0x1319_8a2e_0370_7344];
const OUT_2X64X20_ONES: [u64; 2] = [0xe02c_b7c4_d95d_277a, 0xd066_33d0_893b_8b68];
const OUT_2X64X20_PI: [u64; 2] = [0x263c_7d30_bb0f_0af1, 0x56be_8361_d331_1526];

fn kats_4x64<R: Rounds>(ones: &[u64; 4], pi: &[u64; 4]) -> bool {
    let scalar = run_kat([
        KnownAnswer {
            name: "Threefry4x64 ones",
            function: Threefry4x64::<R>::new([u64::MAX; 4]),
            counter: Counter::new([u64::MAX; 4]),
            expected: ones,
            layout: Layout::Scalar,
        },
        KnownAnswer {
            name: "Threefry4x64 pi",
            function: Threefry4x64::<R>::new(KEY_4X64_PI),
            counter: Counter::new(CTR_4X64_PI),
            expected: pi,
            layout: Layout::Scalar,
        },
    ]);
    let lanes = run_kat([
        KnownAnswer {
            name: "Threefry4x64 lanes ones",
            function: <Threefry4x64Lanes<R>>::new([u64::MAX; 4]),
            counter: LaneCounters::splat(Counter::new([u64::MAX; 4])),
            expected: ones,
            layout: <Threefry4x64Lanes<R>>::LAYOUT,
        },
        KnownAnswer {
            name: "Threefry4x64 lanes pi",
            function: <Threefry4x64Lanes<R>>::new(KEY_4X64_PI),
            counter: LaneCounters::splat(Counter::new(CTR_4X64_PI)),
            expected: pi,
            layout: <Threefry4x64Lanes<R>>::LAYOUT,
        },
    ]);
    let agree = check_lanes(
        "Threefry4x64 lanes vs scalar",
        <Threefry4x64Lanes<R>>::new(KEY_4X64_PI),
        LaneCounters::new(Counter::new([
            0u64.wrapping_sub(THREEFRY_LANES as u64),
            u64::MAX,
            0,
            0,
        ])),
        3,
    );
    scalar & lanes & agree
}

pub fn self_test_4x64() -> bool {
    kats_4x64::<R20>(&OUT_4X64X20_ONES, &OUT_4X64X20_PI)
        & kats_4x64::<R72>(&OUT_4X64X72_ONES, &OUT_4X64X72_PI)
}

pub fn self_test_2x64() -> bool {
    let scalar = run_kat([
        KnownAnswer {
            name: "Threefry2x64x20 ones",
            function: Threefry2x64::<R20>::new([u64::MAX; 2]),
            counter: Counter::new([u64::MAX; 2]),
            expected: &OUT_2X64X20_ONES,
            layout: Layout::Scalar,
        },
        KnownAnswer {
            name: "Threefry2x64x20 pi",
            function: Threefry2x64::<R20>::new(KEY_2X64_PI),
            counter: Counter::new(CTR_2X64_PI),
            expected: &OUT_2X64X20_PI,
            layout: Layout::Scalar,
        },
    ]);
    let lanes = run_kat([KnownAnswer {
        name: "Threefry2x64x20 lanes pi",
        function: <Threefry2x64Lanes<R20>>::new(KEY_2X64_PI),
        counter: LaneCounters::splat(Counter::new(CTR_2X64_PI)),
        expected: &OUT_2X64X20_PI,
        layout: <Threefry2x64Lanes<R20>>::LAYOUT,
    }]);
    let agree = check_lanes(
        "Threefry2x64x20 lanes vs scalar",
        <Threefry2x64Lanes<R20>>::new(KEY_2X64_PI),
        LaneCounters::new(Counter::new([0u64.wrapping_sub(THREEFRY_LANES as u64), 7])),
        3,
    );
    scalar & lanes & agree
}
