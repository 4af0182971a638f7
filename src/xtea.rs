/*!
XTEA in counter mode, on a 64-bit counter split into two 32-bit halves `y` (word 0) and
`z` (word 1). Each output word is `y | z << 32` after 32 cycles.

The key-dependent part of every half-cycle (`sum + key[..]`) doesn't depend on the data,
so it's computed once per key into a table of 64 round keys and splatted across lanes.

The lane version has two modes. [`XteaMode::Ctr`] is plain counter mode, every lane is
the scalar function at its own counter. [`XteaMode::Cbc`] XORs each lane's previous
output into its counter before encrypting, so lanes only match the scalar function on
the first block.

XTEA engines start `READY`.
*/

use crate::backends::U32x8;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

pub const XTEA_DELTA: u32 = 0x9E37_79B9;
pub const XTEA_LANES: usize = 8;
const XTEA_ROUND_KEYS: usize = 64;

#[inline(always)]
fn mix<V: Arx<Elem = u32>>(x: V, k: V) -> V {
    x.add(x.shl(4).xor(x.shr(5))).xor(k)
}

/// `sum + key[..]` for both halves of all 32 cycles.
pub fn key_schedule(key: [u32; 4]) -> [u32; XTEA_ROUND_KEYS] {
    let mut keys = [0; XTEA_ROUND_KEYS];
    let mut sum = 0u32;
    for cycle in keys.chunks_exact_mut(2) {
        cycle[0] = sum.wrapping_add(key[(sum & 3) as usize]);
        sum = sum.wrapping_add(XTEA_DELTA);
        cycle[1] = sum.wrapping_add(key[((sum >> 11) & 3) as usize]);
    }
    keys
}

#[inline(always)]
fn encrypt<R: Rounds, V: Arx<Elem = u32>>(y: &mut V, z: &mut V, keys: &[u32; XTEA_ROUND_KEYS]) {
    for cycle in keys.chunks_exact(2).take(R::COUNT) {
        *y = y.add(mix(*z, V::splat(cycle[0])));
        *z = z.add(mix(*y, V::splat(cycle[1])));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xtea<R = R32> {
    keys: [u32; XTEA_ROUND_KEYS],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Xtea<R> {
    /// `R` counts cycles, at most 32:
    ///
    /// ```compile_fail
    /// let _ = ctrblock::xtea::Xtea::<ctrblock::rounds::R72>::new([0; 4]);
    /// ```
    pub fn new(key: [u32; 4]) -> Self {
        const { assert!(2 * R::COUNT <= XTEA_ROUND_KEYS, "XTEA has 32 cycles") };
        Self {
            keys: key_schedule(key),
            _rounds: PhantomData,
        }
    }

    /// The raw block function.
    pub fn transform(&self, ctr: [u32; 2]) -> u64 {
        let [mut y, mut z] = ctr;
        encrypt::<R, u32>(&mut y, &mut z, &self.keys);
        join_u32(y, z)
    }
}

impl<R: Rounds> BlockFunction for Xtea<R> {
    type Word = u64;
    type Counter = Counter<u32, 2>;
    type Block = [u64; 1];

    const EMPTY: [u64; 1] = [0];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        out[0] = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum XteaMode {
    #[default]
    Ctr,
    Cbc,
}

#[derive(Clone, Copy, Debug)]
pub struct XteaLanes<R = R32, V = U32x8> {
    scalar: Xtea<R>,
    mode: XteaMode,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> XteaLanes<R, V> {
    pub fn new(key: [u32; 4], mode: XteaMode) -> Self {
        Self {
            scalar: Xtea::new(key),
            mode,
            _backend: PhantomData,
        }
    }

    pub fn mode(&self) -> XteaMode {
        self.mode
    }
}

impl<R: Rounds, V: Packed<XTEA_LANES, Elem = u32>> BlockFunction for XteaLanes<R, V> {
    type Word = u64;
    type Counter = LaneCounters<u32, 2, XTEA_LANES>;
    type Block = [u64; XTEA_LANES];

    const EMPTY: Self::Block = [0; XTEA_LANES];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let mut y = V::from_lanes(*counter.word(0));
        let mut z = V::from_lanes(*counter.word(1));
        if self.mode == XteaMode::Cbc {
            let prev = (*out).map(split_u64);
            y = y.xor(V::from_lanes(array::from_fn(|lane| prev[lane][0])));
            z = z.xor(V::from_lanes(array::from_fn(|lane| prev[lane][1])));
        }
        encrypt::<R, V>(&mut y, &mut z, &self.scalar.keys);
        let (y, z) = (y.to_lanes(), z.to_lanes());
        for lane in 0..XTEA_LANES {
            out[Self::LAYOUT.index(lane, 0)] = join_u32(y[lane], z[lane]);
        }
    }
}

impl<R: Rounds, V: Packed<XTEA_LANES, Elem = u32>> LaneFunction for XteaLanes<R, V> {
    type Scalar = Xtea<R>;

    const LANES: usize = XTEA_LANES;
    const LAYOUT: Layout = Layout::WordMajor { lanes: XTEA_LANES };

    fn scalar(&self) -> Xtea<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u32, 2> {
        counter.lane(lane)
    }
}

const KEY: [u32; 4] = [0x27F9_17B1, 0xC1DA_8993, 0x60E2_ACAA, 0xA6EB_923D];
const PLAINTEXT: [u32; 2] = [0xAF20_A390, 0x5475_71AA];
const CIPHERTEXT: [u64; 1] = [0x0A20_2283_D264_28AF];

pub fn self_test() -> bool {
    let scalar = run_kat([KnownAnswer {
        name: "XTEA",
        function: Xtea::<R32>::new(KEY),
        counter: Counter::new(PLAINTEXT),
        expected: &CIPHERTEXT,
        layout: Layout::Scalar,
    }]);
    // The first CBC block chains off zeros, so both modes share the vector.
    let lanes = run_kat([XteaMode::Ctr, XteaMode::Cbc].map(|mode| KnownAnswer {
        name: match mode {
            XteaMode::Ctr => "XTEA lanes ctr",
            XteaMode::Cbc => "XTEA lanes cbc",
        },
        function: <XteaLanes<R32>>::new(KEY, mode),
        counter: LaneCounters::splat(Counter::new(PLAINTEXT)),
        expected: &CIPHERTEXT,
        layout: <XteaLanes<R32>>::LAYOUT,
    }));
    let agree = check_lanes(
        "XTEA ctr lanes vs scalar",
        <XteaLanes<R32>>::new(KEY, XteaMode::Ctr),
        LaneCounters::new(Counter::new([0u32.wrapping_sub(XTEA_LANES as u32), 0])),
        3,
    );
    scalar & lanes & agree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BlockEngine;

    #[test]
    fn known_answers() {
        assert!(self_test());
    }

    #[test]
    fn output_packs_y_low() {
        let xtea = Xtea::<R32>::new(KEY);
        assert_eq!(split_u64(xtea.transform(PLAINTEXT)), [0xD264_28AF, 0x0A20_2283]);
    }

    #[test]
    fn cbc_chains_previous_output() {
        let key = [
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
        ];
        let scalar = Xtea::<R32>::new(key);
        let start = LaneCounters::new(Counter::new([getrandom::u32().unwrap() & !7, 0]));
        let mut engine = BlockEngine::new(<XteaLanes<R32>>::new(key, XteaMode::Cbc), start);
        let first = *engine.block();
        engine.refill();
        let second = *engine.block();
        for lane in 0..XTEA_LANES {
            assert_eq!(first[lane], scalar.transform(*start.lane(lane).words()));
            let [y, z] = split_u64(first[lane]);
            let next = engine.counter().lane(lane);
            let [lo, hi] = *next.words();
            assert_eq!(second[lane], scalar.transform([lo ^ y, hi ^ z]));
        }
    }

    #[test]
    fn ctr_lanes_stride() {
        let lanes = <XteaLanes<R32>>::new(KEY, XteaMode::Ctr);
        let mut engine = BlockEngine::new(lanes, LaneCounters::new(Counter::zero()));
        let scalar = Xtea::<R32>::new(KEY);
        for i in 0..24u32 {
            let lane = i % XTEA_LANES as u32;
            let block = i / XTEA_LANES as u32;
            assert_eq!(engine.next_word(), scalar.transform([block * 8 + lane, 0]));
        }
    }
}
