/*!
ChaCha in the djb layout: a 64-bit block counter in words 12 and 13 and a
64-bit nonce in words 14 and 15.

```text
"expa"   "nd 3"  "2-by"  "te k"
Key      Key      Key    Key
Key      Key      Key    Key
Counter  Counter  Nonce  Nonce
```

The key is used directly as state, there's no key schedule. The lane version keeps the
16 state words in 16 packed registers, one ChaCha block per lane, so no shuffling is ever
needed for the diagonal rounds. Its output is lane-major with lanes on consecutive
counters, which makes the lane engine's stream identical to the scalar engine's.

ChaCha engines start `READY`, the first block emitted is for the initial counter.
*/

use crate::backends::U32x8;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockEngine, BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

/// "expand 32-byte k"
pub const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];
pub const CHACHA_WORDS: usize = 16;
pub const CHACHA_LANES: usize = 8;
const COUNTER_WORD: usize = 12;

#[inline(always)]
fn quarter_round<V: Arx>(x: &mut [V; CHACHA_WORDS], a: usize, b: usize, c: usize, d: usize) {
    x[a] = x[a].add(x[b]);
    x[d] = x[d].xor(x[a]).rotl(16);

    x[c] = x[c].add(x[d]);
    x[b] = x[b].xor(x[c]).rotl(12);

    x[a] = x[a].add(x[b]);
    x[d] = x[d].xor(x[a]).rotl(8);

    x[c] = x[c].add(x[d]);
    x[b] = x[b].xor(x[c]).rotl(7);
}

#[inline(always)]
fn double_round<V: Arx>(x: &mut [V; CHACHA_WORDS]) {
    // Column rounds
    quarter_round(x, 0, 4, 8, 12);
    quarter_round(x, 1, 5, 9, 13);
    quarter_round(x, 2, 6, 10, 14);
    quarter_round(x, 3, 7, 11, 15);
    // Diagonal rounds
    quarter_round(x, 0, 5, 10, 15);
    quarter_round(x, 1, 6, 11, 12);
    quarter_round(x, 2, 7, 8, 13);
    quarter_round(x, 3, 4, 9, 14);
}

#[inline(always)]
fn chacha<R: Rounds, V: Arx>(input: &[V; CHACHA_WORDS]) -> [V; CHACHA_WORDS] {
    let double_rounds = <R as DoubleRounds>::COUNT;
    let mut x = *input;
    for _ in 0..double_rounds {
        double_round(&mut x);
    }
    for (out, word) in x.iter_mut().zip(input) {
        *out = out.add(*word);
    }
    x
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChaCha<R = R12> {
    key: [u32; 8],
    nonce: [u32; 2],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> ChaCha<R> {
    pub fn new(key: [u32; 8]) -> Self {
        Self::with_nonce(key, [0; 2])
    }

    pub fn with_nonce(key: [u32; 8], nonce: [u32; 2]) -> Self {
        Self {
            key,
            nonce,
            _rounds: PhantomData,
        }
    }

    fn state(&self, counter: [u32; 2]) -> [u32; CHACHA_WORDS] {
        let mut state = [0; CHACHA_WORDS];
        state[..4].copy_from_slice(&SIGMA);
        state[4..COUNTER_WORD].copy_from_slice(&self.key);
        state[COUNTER_WORD..14].copy_from_slice(&counter);
        state[14..].copy_from_slice(&self.nonce);
        state
    }

    /// The raw block function.
    pub fn transform(&self, counter: [u32; 2]) -> [u32; CHACHA_WORDS] {
        chacha::<R, u32>(&self.state(counter))
    }
}

impl<R: Rounds> BlockFunction for ChaCha<R> {
    type Word = u32;
    type Counter = Counter<u32, 2>;
    type Block = [u32; CHACHA_WORDS];

    const EMPTY: Self::Block = [0; CHACHA_WORDS];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ChaChaLanes<R = R12, V = U32x8> {
    scalar: ChaCha<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> ChaChaLanes<R, V> {
    pub fn new(key: [u32; 8]) -> Self {
        Self::with_nonce(key, [0; 2])
    }

    pub fn with_nonce(key: [u32; 8], nonce: [u32; 2]) -> Self {
        Self {
            scalar: ChaCha::with_nonce(key, nonce),
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: Packed<CHACHA_LANES, Elem = u32>> BlockFunction for ChaChaLanes<R, V> {
    type Word = u32;
    type Counter = LaneCounters<u32, 2, CHACHA_LANES>;
    type Block = [u32; CHACHA_WORDS * CHACHA_LANES];

    const EMPTY: Self::Block = [0; CHACHA_WORDS * CHACHA_LANES];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let base = self.scalar.state([0; 2]);
        let input: [V; CHACHA_WORDS] = array::from_fn(|w| match w {
            COUNTER_WORD | 13 => V::from_lanes(*counter.word(w - COUNTER_WORD)),
            _ => V::splat(base[w]),
        });
        let x = chacha::<R, V>(&input);
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word;
            }
        }
    }
}

impl<R: Rounds, V: Packed<CHACHA_LANES, Elem = u32>> LaneFunction for ChaChaLanes<R, V> {
    type Scalar = ChaCha<R>;

    const LANES: usize = CHACHA_LANES;
    const LAYOUT: Layout = Layout::LaneMajor {
        words: CHACHA_WORDS,
    };

    fn scalar(&self) -> ChaCha<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u32, 2> {
        counter.lane(lane)
    }
}

// RFC 7539 section 2.3.2. Its 32-bit counter and first nonce word land in our two
// counter words, the rest of its nonce in our nonce.
const RFC7539_KEY: [u32; 8] = [
    0x0302_0100,
    0x0706_0504,
    0x0b0a_0908,
    0x0f0e_0d0c,
    0x1312_1110,
    0x1716_1514,
    0x1b1a_1918,
    0x1f1e_1d1c,
];
const RFC7539_COUNTER: [u32; 2] = [0x0000_0001, 0x0900_0000];
const RFC7539_NONCE: [u32; 2] = [0x4a00_0000, 0x0000_0000];
const RFC7539_BLOCK: [u32; CHACHA_WORDS] = [
    0xe4e7_f110, 0x1559_3bd1, 0x1fdd_0f50, 0xc471_20a3, 0xc7f4_d1c7, 0x0368_c033, 0x9aaa_2204,
    0x4e6c_d4c3, 0x4664_82d2, 0x09aa_9f07, 0x05d7_c214, 0xa202_8bd9, 0xd19c_12b5, 0xb94e_16de,
    0xe883_d0cb, 0x4e3c_50a2,
];

/// Words compared between the scalar and lane streams.
const STREAM_CHECK_WORDS: usize = 1024;

/// Scalar and lane engines from the same key must produce the same stream.
fn streams_agree<R: Rounds>() -> bool {
    let key = RFC7539_KEY;
    let mut scalar = BlockEngine::new(ChaCha::<R>::new(key), Counter::zero());
    let mut lanes = BlockEngine::new(
        <ChaChaLanes<R>>::new(key),
        LaneCounters::new(Counter::zero()),
    );
    let mut ok = true;
    for i in 0..STREAM_CHECK_WORDS {
        let (a, b) = (scalar.next_word(), lanes.next_word());
        if a != b {
            log::error!("ChaCha stream word {i}: scalar={a:#x} lanes={b:#x}");
            ok = false;
        }
    }
    if ok {
        log::info!("ChaCha: scalar and lane streams agree for {STREAM_CHECK_WORDS} words");
    }
    ok
}

pub fn self_test() -> bool {
    let scalar = run_kat([KnownAnswer {
        name: "ChaCha20 RFC 7539",
        function: ChaCha::<R20>::with_nonce(RFC7539_KEY, RFC7539_NONCE),
        counter: Counter::new(RFC7539_COUNTER),
        expected: &RFC7539_BLOCK,
        layout: Layout::Scalar,
    }]);
    let lanes = run_kat([KnownAnswer {
        name: "ChaCha20 lanes RFC 7539",
        function: <ChaChaLanes<R20>>::with_nonce(RFC7539_KEY, RFC7539_NONCE),
        counter: LaneCounters::splat(Counter::new(RFC7539_COUNTER)),
        expected: &RFC7539_BLOCK,
        layout: <ChaChaLanes<R20>>::LAYOUT,
    }]);
    let agree = check_lanes(
        "ChaCha12 lanes vs scalar",
        <ChaChaLanes<R12>>::new(RFC7539_KEY),
        LaneCounters::new(Counter::new([0u32.wrapping_sub(CHACHA_LANES as u32), 0])),
        3,
    );
    scalar & lanes & agree & streams_agree::<R8>() & streams_agree::<R12>() & streams_agree::<R20>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{ChaCha8Rng, ChaCha12Rng, ChaCha20Rng};
    use rand_core::{RngCore, SeedableRng};

    #[test]
    fn known_answers() {
        assert!(self_test());
    }

    fn matches_rand_chacha<R: Rounds, Ref: RngCore + SeedableRng<Seed = [u8; 32]>>() {
        let mut seed = [0u8; 32];
        getrandom::fill(&mut seed).unwrap();
        let key: [u32; 8] =
            array::from_fn(|i| u32::from_le_bytes(seed[4 * i..4 * i + 4].try_into().unwrap()));
        let mut reference = Ref::from_seed(seed);
        let mut engine = BlockEngine::new(ChaCha::<R>::new(key), Counter::zero());
        let mut lanes =
            BlockEngine::new(<ChaChaLanes<R>>::new(key), LaneCounters::new(Counter::zero()));
        for _ in 0..1000 {
            let expected = reference.next_u32();
            assert_eq!(engine.next_word(), expected);
            assert_eq!(lanes.next_word(), expected);
        }
    }

    #[test]
    fn chacha8_matches_rand_chacha() {
        matches_rand_chacha::<R8, ChaCha8Rng>();
    }

    #[test]
    fn chacha12_matches_rand_chacha() {
        matches_rand_chacha::<R12, ChaCha12Rng>();
    }

    #[test]
    fn chacha20_matches_rand_chacha() {
        matches_rand_chacha::<R20, ChaCha20Rng>();
    }

    #[test]
    fn counter_carries_into_second_word() {
        let chacha = ChaCha::<R12>::new(RFC7539_KEY);
        let mut engine = BlockEngine::new(chacha, Counter::new([u32::MAX, 0]));
        for _ in 0..CHACHA_WORDS {
            engine.next_word();
        }
        assert_eq!(engine.next_word(), chacha.transform([0, 1])[0]);
    }
}
