/*!
LEA-128 (24 rounds, 128-bit key) in counter mode on a 128-bit counter.

A round key is the four schedule words `t0..t3`; the round itself only ever reads `t1`
through the second operand of each addition:

```text
x0' = ((x0 ^ t0) + (x1 ^ t1)) <<< 9
x1' = ((x1 ^ t2) + (x2 ^ t1)) >>> 5
x2' = ((x2 ^ t3) + (x3 ^ t1)) >>> 3
x3' = x0
```

LEA engines start `READY`.
*/

use crate::backends::U32x8;
use crate::counter::{Counter, LaneCounters};
use crate::engine::{BlockFunction, LaneFunction, Layout};
use crate::kat::{KnownAnswer, check_lanes, run_kat};
use crate::rounds::*;
use crate::util::*;
use core::array;
use core::marker::PhantomData;

pub const LEA_DELTA: [u32; 8] = [
    0xc3ef_e9db, 0x4462_6b02, 0x79e2_7c8a, 0x78df_30ec, 0x715e_a49e, 0xc785_da0a, 0xe04e_f22a,
    0xe5c4_0957,
];
pub const LEA128_ROUNDS: usize = 24;
pub const LEA_LANES: usize = 8;

/// `[t0, t1, t2, t3]`
pub type RoundKey = [u32; 4];

pub fn key_schedule(key: [u32; 4]) -> [RoundKey; LEA128_ROUNDS] {
    let mut t = key;
    array::from_fn(|i| {
        // 128-bit keys only use the first four constants.
        let d = LEA_DELTA[i % 4];
        let i = i as u32;
        t[0] = t[0].wrapping_add(d.rotate_left(i)).rotate_left(1);
        t[1] = t[1].wrapping_add(d.rotate_left(i + 1)).rotate_left(3);
        t[2] = t[2].wrapping_add(d.rotate_left(i + 2)).rotate_left(6);
        t[3] = t[3].wrapping_add(d.rotate_left(i + 3)).rotate_left(11);
        t
    })
}

#[inline(always)]
fn lea_round<V: Arx<Elem = u32>>(x: [V; 4], rk: &RoundKey) -> [V; 4] {
    let [t0, t1, t2, t3] = rk.map(V::splat);
    [
        x[0].xor(t0).add(x[1].xor(t1)).rotl(9),
        x[1].xor(t2).add(x[2].xor(t1)).rotr(5),
        x[2].xor(t3).add(x[3].xor(t1)).rotr(3),
        x[0],
    ]
}

#[inline(always)]
fn encrypt<V: Arx<Elem = u32>>(mut x: [V; 4], keys: &[RoundKey]) -> [V; 4] {
    for rk in keys {
        x = lea_round(x, rk);
    }
    x
}

/// `R` can't exceed the 24 rounds of the key schedule:
///
/// ```compile_fail
/// let _ = ctrblock::lea::Lea128::<ctrblock::rounds::R32>::new([0; 4]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lea128<R = R24> {
    keys: [RoundKey; LEA128_ROUNDS],
    _rounds: PhantomData<R>,
}

impl<R: Rounds> Lea128<R> {
    pub fn new(key: [u32; 4]) -> Self {
        const { assert!(R::COUNT <= LEA128_ROUNDS, "LEA-128 has 24 round keys") };
        Self {
            keys: key_schedule(key),
            _rounds: PhantomData,
        }
    }

    pub fn round_key(&self, round: usize) -> Option<&RoundKey> {
        self.keys.get(round)
    }

    #[inline(always)]
    fn active_keys(&self) -> &[RoundKey] {
        &self.keys[..R::COUNT]
    }

    /// The raw block function.
    pub fn transform(&self, ctr: [u32; 4]) -> [u32; 4] {
        encrypt(ctr, self.active_keys())
    }
}

impl<R: Rounds> BlockFunction for Lea128<R> {
    type Word = u32;
    type Counter = Counter<u32, 4>;
    type Block = [u32; 4];

    const EMPTY: [u32; 4] = [0; 4];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        *out = self.transform(*counter.words());
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Lea128Lanes<R = R24, V = U32x8> {
    scalar: Lea128<R>,
    _backend: PhantomData<V>,
}

impl<R: Rounds, V> Lea128Lanes<R, V> {
    pub fn new(key: [u32; 4]) -> Self {
        Self {
            scalar: Lea128::new(key),
            _backend: PhantomData,
        }
    }
}

impl<R: Rounds, V: Packed<LEA_LANES, Elem = u32>> BlockFunction for Lea128Lanes<R, V> {
    type Word = u32;
    type Counter = LaneCounters<u32, 4, LEA_LANES>;
    type Block = [u32; 4 * LEA_LANES];

    const EMPTY: Self::Block = [0; 4 * LEA_LANES];
    const PRIMED: bool = true;

    #[inline]
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block) {
        let x: [V; 4] = array::from_fn(|w| V::from_lanes(*counter.word(w)));
        let x = encrypt(x, self.scalar.active_keys());
        for (w, v) in x.into_iter().enumerate() {
            for (lane, word) in v.to_lanes().into_iter().enumerate() {
                out[Self::LAYOUT.index(lane, w)] = word;
            }
        }
    }
}

impl<R: Rounds, V: Packed<LEA_LANES, Elem = u32>> LaneFunction for Lea128Lanes<R, V> {
    type Scalar = Lea128<R>;

    const LANES: usize = LEA_LANES;
    const LAYOUT: Layout = Layout::WordMajor { lanes: LEA_LANES };

    fn scalar(&self) -> Lea128<R> {
        self.scalar
    }

    fn lane_counter(counter: &Self::Counter, lane: usize) -> Counter<u32, 4> {
        counter.lane(lane)
    }
}

// ISO/IEC 29192-2, LEA-128.
const KEY: [u32; 4] = [0x3c2d_1e0f, 0x7869_5a4b, 0xb4a5_9687, 0xf0e1_d2c3];
const ROUND_KEY_0: RoundKey = [0x003a_0fd4, 0x0249_7010, 0x194f_7db1, 0x090d_0883];
const ROUND_KEY_23: RoundKey = [0x0bf6_adba, 0xdf69_029d, 0x5b72_305a, 0xcb47_c19f];
const PLAINTEXT: [u32; 4] = [0x1312_1110, 0x1716_1514, 0x1b1a_1918, 0x1f1e_1d1c];
const CIPHERTEXT: [u32; 4] = [0x354e_c89f, 0x18c6_c628, 0xa7c7_3255, 0xfd8b_6404];

// Three more blocks under one key, spread over the lanes so each lane is checked
// on its own input.
const LANE_KEY: [u32; 4] = [0xD28D_0654, 0x556B_A468, 0xD4FC_03CA, 0x1C2B_C6F4];
const LANE_PLAINTEXT: [[u32; 4]; 3] = [
    [0x9A06_2ED7, 0x1079_307A, 0x8C5C_CBE5, 0x9BB1_983D],
    [0xBA26_A330, 0x0DE2_7994, 0x547D_824A, 0x1A50_9169],
    [0x2FF0_BA98, 0x59F5_64BC, 0x4700_9ED4, 0xC6FC_B720],
];
const LANE_CIPHERTEXT: [[u32; 4]; 3] = [
    [0x2AD5_836C, 0x4641_9B76, 0x6FFB_7EF7, 0x9A3D_1964],
    [0x4031_76B4, 0x7405_56CB, 0xD888_2779, 0xF8A6_51D0],
    [0xA7C6_A342, 0x8AD8_A931, 0x59F9_AAD0, 0xC309_23F8],
];

fn key_schedule_kat() -> bool {
    let lea = Lea128::<R24>::new(KEY);
    let first = crate::kat::compare("LEA-128 round key 0", &lea.keys[0], |i| {
        ROUND_KEY_0.get(i).copied()
    });
    let last = crate::kat::compare("LEA-128 round key 23", &lea.keys[23], |i| {
        ROUND_KEY_23.get(i).copied()
    });
    first & last
}

fn per_lane_kat() -> bool {
    let layout = <Lea128Lanes<R24>>::LAYOUT;
    let mut expected = [0u32; 4 * LEA_LANES];
    for lane in 0..LEA_LANES {
        for (w, &word) in LANE_CIPHERTEXT[lane % 3].iter().enumerate() {
            expected[layout.index(lane, w)] = word;
        }
    }
    run_kat([KnownAnswer {
        name: "LEA-128 lanes, distinct inputs",
        function: <Lea128Lanes<R24>>::new(LANE_KEY),
        counter: LaneCounters::from_lanes(array::from_fn(|lane| {
            Counter::new(LANE_PLAINTEXT[lane % 3])
        })),
        expected: &expected,
        layout: Layout::Scalar,
    }])
}

pub fn self_test() -> bool {
    let scalar = run_kat([KnownAnswer {
        name: "LEA-128",
        function: Lea128::<R24>::new(KEY),
        counter: Counter::new(PLAINTEXT),
        expected: &CIPHERTEXT,
        layout: Layout::Scalar,
    }]);
    let lanes = run_kat([KnownAnswer {
        name: "LEA-128 lanes",
        function: <Lea128Lanes<R24>>::new(KEY),
        counter: LaneCounters::splat(Counter::new(PLAINTEXT)),
        expected: &CIPHERTEXT,
        layout: <Lea128Lanes<R24>>::LAYOUT,
    }]);
    let agree = check_lanes(
        "LEA-128 lanes vs scalar",
        <Lea128Lanes<R24>>::new(KEY),
        LaneCounters::new(Counter::new([0u32.wrapping_sub(LEA_LANES as u32), u32::MAX, 0, 0])),
        3,
    );
    key_schedule_kat() & scalar & lanes & per_lane_kat() & agree
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
    fn round_keys() {
        let lea = Lea128::<R24>::new(KEY);
        assert_eq!(lea.round_key(0), Some(&ROUND_KEY_0));
        assert_eq!(lea.round_key(23), Some(&ROUND_KEY_23));
        assert_eq!(lea.round_key(24), None);
    }

    #[test]
    fn scalar_lane_vectors() {
        for (input, output) in LANE_PLAINTEXT.iter().zip(&LANE_CIPHERTEXT) {
            assert_eq!(Lea128::<R24>::new(LANE_KEY).transform(*input), *output);
        }
    }

    #[test]
    fn lanes_carry_into_upper_words() {
        let key = [
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
            getrandom::u32().unwrap(),
        ];
        let scalar = Lea128::<R24>::new(key);
        let start = Counter::new([u32::MAX - 7, u32::MAX, u32::MAX, 3]);
        let mut engine = BlockEngine::new(<Lea128Lanes<R24>>::new(key), LaneCounters::new(start));
        engine.refill();
        let layout = <Lea128Lanes<R24>>::LAYOUT;
        for lane in 0..LEA_LANES {
            let expected = scalar.transform([lane as u32, 0, 0, 4]);
            for (w, &word) in expected.iter().enumerate() {
                assert_eq!(engine.block()[layout.index(lane, w)], word);
            }
        }
    }
}
