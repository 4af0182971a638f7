/*!
Speck128/128 in counter mode.

One Speck round is `x = (x >>> 8) + y ^ k; y = (y <<< 3) ^ x`. The 32 round keys come
from running the same round over the two key words, with the round index as the round
key. Counter word 0 is `y` and word 1 is `x`.

The lane version can also run a reduced number of rounds: `Speck128<R16>` uses the first
16 round keys. Running it again on its own output with the key schedule shifted by 16
(see [`Speck128::skip_rounds`]) gives the full 32-round cipher, which is how the reduced
variant is checked against the published vector.

Speck engines start `READY`.
*/

use crate::backends::U64x4;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

pub const SPECK128_ROUND_KEYS: usize = 32;
pub const SPECK_LANES: usize = 4;

#[inline(always)]
fn speck_round<V: Arx<Elem = u64>>(x: &mut V, y: &mut V, k: V) {
    *x = x.rotr(8).add(*y).xor(k);
    *y = y.rotl(3).xor(*x);
}

pub fn key_schedule(key: [u64; 2]) -> [u64; SPECK128_ROUND_KEYS] {
    let mut keys = [0; SPECK128_ROUND_KEYS];
    let [mut a, mut b] = key;
    keys[0] = a;
    for i in 0..SPECK128_ROUND_KEYS - 1 {
        speck_round(&mut b, &mut a, i as u64);
        keys[i + 1] = a;
    }
    keys
}

#[inline(always)]
fn encrypt<V: Arx<Elem = u64>>(x: &mut [V; 2], keys: &[u64]) {
    let [mut y, mut hi] = *x;
    for &k in keys {
        speck_round(&mut hi, &mut y, V::splat(k));
    }
    *x = [y, hi];
}

/// `R` can't exceed the 32 round keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Speck128<R = R32> {
    keys: [u64; SPECK128_ROUND_KEYS],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Speck128<R> {
    /// Fails to compile for more rounds than there are round keys:
    ///
    /// ```compile_fail
    /// let _ = ctrblock::speck::Speck128::<ctrblock::rounds::R72>::new([0; 2]);
    /// ```
    pub fn new(key: [u64; 2]) -> Self {
        const { assert!(R::COUNT <= SPECK128_ROUND_KEYS, "Speck128/128 has 32 rounds") };
        Self {
            keys: key_schedule(key),
            _rounds: PhantomData,
        }
    }

    pub fn round_keys(&self) -> &[u64; SPECK128_ROUND_KEYS] {
        &self.keys
    }

    /// The same cipher with its first `n` round keys dropped.
    pub fn skip_rounds(&self, n: usize) -> Self {
        Self {
            keys: array::from_fn(|i| self.keys.get(i + n).copied().unwrap_or(0)),
            _rounds: PhantomData,
        }
    }

    #[inline(always)]
    fn active_keys(&self) -> &[u64] {
        &self.keys[..R::COUNT]
    }

    /// The raw block function.
    pub fn transform(&self, ctr: [u64; 2]) -> [u64; 2] {
        let mut x = ctr;
        encrypt(&mut x, self.active_keys());
        x
    }
}

impl<R: Rounds> BlockFunction for Speck128<R> {
    type Word = u64;
    type Counter = Counter<u64, 2>;
    type Block = [u64; 2];

    const EMPTY: [u64; 2] = [0; 2];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Speck128Lanes<R = R32, V = U64x4> {
    scalar: Speck128<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> Speck128Lanes<R, V> {
    pub fn new(key: [u64; 2]) -> Self {
        Self::from_scalar(Speck128::new(key))
    }

    pub fn from_scalar(scalar: Speck128<R>) -> Self {
        Self {
            scalar,
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: Packed<SPECK_LANES, Elem = u64>> BlockFunction for Speck128Lanes<R, V> {
    type Word = u64;
    type Counter = LaneCounters<u64, 2, SPECK_LANES>;
    type Block = [u64; 2 * SPECK_LANES];

    const EMPTY: Self::Block = [0; 2 * SPECK_LANES];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let mut x: [V; 2] = array::from_fn(|w| V::from_lanes(*counter.word(w)));
        encrypt(&mut x, self.scalar.active_keys());
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word;
            }
        }
    }
}

impl<R: Rounds, V: Packed<SPECK_LANES, Elem = u64>> LaneFunction for Speck128Lanes<R, V> {
    type Scalar = Speck128<R>;

    const LANES: usize = SPECK_LANES;
    const LAYOUT: Layout = Layout::WordMajor { lanes: SPECK_LANES };

    fn scalar(&self) -> Speck128<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u64, 2> {
        counter.lane(lane)
    }
}

// Speck paper, appendix C: the 128/128 test vector.
const KEY: [u64; 2] = [0x0706_0504_0302_0100, 0x0f0e_0d0c_0b0a_0908];
const PLAINTEXT: [u64; 2] = [0x7469_2065_6461_6d20, 0x6c61_7669_7571_6520];
const CIPHERTEXT: [u64; 2] = [0x7860_fedf_5c57_0d18, 0xa65d_9851_7978_3265];

/// Chains two 16-round halves on every lane and checks the result against the
/// full-round vector.
fn reduced_rounds_kat() -> bool {
    let first = <Speck128Lanes<R16>>::new(KEY);
    let mut halfway = <Speck128Lanes<R16>>::EMPTY;
    first.fill(&LaneCounters::splat(Counter::new(PLAINTEXT)), &mut halfway);
    let layout = <Speck128Lanes<R16>>::LAYOUT;
    let halfway = LaneCounters::from_lanes(array::from_fn(|lane| {
        Counter::new(array::from_fn(|w| halfway[layout.index(lane, w)]))
    }));
    run_kat([KnownAnswer {
        name: "Speck128/128 lanes 16+16 rounds",
        function: <Speck128Lanes<R16>>::from_scalar(first.scalar().skip_rounds(16)),
        counter: halfway,
        expected: &CIPHERTEXT,
        layout,
    }])
}

pub fn self_test() -> bool {
    let scalar = run_kat([KnownAnswer {
        name: "Speck128/128",
        function: Speck128::<R32>::new(KEY),
        counter: Counter::new(PLAINTEXT),
        expected: &CIPHERTEXT,
        layout: Layout::Scalar,
    }]);
    let lanes = run_kat([KnownAnswer {
        name: "Speck128/128 lanes",
        function: <Speck128Lanes<R32>>::new(KEY),
        counter: LaneCounters::splat(Counter::new(PLAINTEXT)),
        expected: &CIPHERTEXT,
        layout: <Speck128Lanes<R32>>::LAYOUT,
    }]);
    let agree = check_lanes(
        "Speck128/128 lanes vs scalar",
        <Speck128Lanes<R32>>::new(KEY),
        LaneCounters::new(Counter::new([0u64.wrapping_sub(SPECK_LANES as u64), 0])),
        3,
    ) & check_lanes(
        "Speck128/128 r16 lanes vs scalar",
        <Speck128Lanes<R16>>::new(KEY),
        LaneCounters::new(Counter::new([0u64.wrapping_sub(SPECK_LANES as u64), 0])),
        3,
    );
    scalar & lanes & reduced_rounds_kat() & agree
}
