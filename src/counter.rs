use crate::engine::Step;
use crate::util::Word;
use core::array;

/// A little-endian multi-word counter: `words()[0]` is the least significant word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Counter<T, const N: usize> {
    words: [T; N],
}

impl<T: Word, const N: usize> Counter<T, N> {
    /// Takes the words verbatim.
    #[inline]
    pub const fn new(words: [T; N]) -> Self {
        Self { words }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { words: [T::ZERO; N] }
    }

    #[inline]
    pub const fn words(&self) -> &[T; N] {
        &self.words
    }

    /// Adds one, carrying into the next word only when the current one wraps to zero.
    /// Wrapping past the last word restarts the counter at zero.
    #[inline]
    pub fn increment(&mut self) {
        for word in self.words.iter_mut() {
            *word = word.wrapping_add(T::ONE);
            if *word != T::ZERO {
                break;
            }
        }
    }

    /// Adds `n` with full carry propagation.
    pub fn advance(&mut self, n: T) {
        let mut carry = n;
        for word in self.words.iter_mut() {
            let sum = word.wrapping_add(carry);
            let overflowed = sum < carry;
            *word = sum;
            if !overflowed {
                break;
            }
            carry = T::ONE;
        }
    }
}

impl<T: Word, const N: usize> Step for Counter<T, N> {
    #[inline(always)]
    fn step(&mut self) {
        self.increment();
    }
}

/// The counters of `L` lanes, stored word-major: `word(w)[lane]`.
///
/// Lanes built with [`LaneCounters::new`] sit at `base + lane`, and every
/// [`increment_lanes`](Self::increment_lanes) moves them all forward by `L`.
/// When word 0 of the base is a multiple of `L` every lane wraps word 0 on the same
/// step as lane 0. Otherwise the lanes wrap on different steps, and each one carries
/// on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaneCounters<T, const N: usize, const L: usize> {
    words: [[T; L]; N],
}

impl<T: Word, const N: usize, const L: usize> LaneCounters<T, N, L> {
    pub fn new(base: Counter<T, N>) -> Self {
        Self::from_lanes(array::from_fn(|lane| {
            let mut counter = base;
            counter.advance(T::from_usize(lane));
            counter
        }))
    }

    /// Every lane at the same counter. Only meaningful for a single refill,
    /// the known-answer tests use it to check that all lanes agree.
    pub fn splat(counter: Counter<T, N>) -> Self {
        Self::from_lanes([counter; L])
    }

    pub fn from_lanes(lanes: [Counter<T, N>; L]) -> Self {
        Self {
            words: array::from_fn(|word| array::from_fn(|lane| lanes[lane].words[word])),
        }
    }

    #[inline]
    pub fn lane(&self, lane: usize) -> Counter<T, N> {
        Counter::new(array::from_fn(|word| self.words[word][lane]))
    }

    #[inline(always)]
    pub fn word(&self, word: usize) -> &[T; L] {
        &self.words[word]
    }

    #[inline]
    pub fn increment_lanes(&mut self) {
        let step = T::from_usize(L);
        for lane in 0..L {
            let before = self.words[0][lane];
            self.words[0][lane] = before.wrapping_add(step);
            if self.words[0][lane] >= before {
                continue;
            }
            for row in self.words[1..].iter_mut() {
                row[lane] = row[lane].wrapping_add(T::ONE);
                if row[lane] != T::ZERO {
                    break;
                }
            }
        }
    }
}

impl<T: Word, const N: usize, const L: usize> Step for LaneCounters<T, N, L> {
    #[inline(always)]
    fn step(&mut self) {
        self.increment_lanes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_carries_once_per_wrap() {
        let mut counter = Counter::<u32, 2>::new([u32::MAX - 2, 7]);
        for _ in 0..3 {
            counter.increment();
        }
        assert_eq!(counter.words(), &[0, 8]);
        counter.increment();
        assert_eq!(counter.words(), &[1, 8]);
    }

    #[test]
    fn full_word_of_increments_carries_exactly_once() {
        // Start near the top so the wrap happens inside the loop.
        let mut counter = Counter::<u32, 4>::new([u32::MAX - 1000, 0, 0, 0]);
        let mut carries = 0;
        let mut high = counter.words()[1];
        for _ in 0..5000 {
            counter.increment();
            if counter.words()[1] != high {
                carries += 1;
                high = counter.words()[1];
            }
        }
        assert_eq!(carries, 1);
        assert_eq!(counter.words(), &[3999, 1, 0, 0]);
    }

    #[test]
    fn increment_ripples_through_every_word() {
        let mut counter = Counter::<u64, 4>::new([u64::MAX, u64::MAX, u64::MAX, 5]);
        counter.increment();
        assert_eq!(counter.words(), &[0, 0, 0, 6]);
    }

    #[test]
    fn increment_wraps_at_declared_width() {
        let mut counter = Counter::<u64, 2>::new([u64::MAX; 2]);
        counter.increment();
        assert_eq!(counter, Counter::zero());
    }

    #[test]
    fn advance_carries() {
        let mut counter = Counter::<u32, 2>::new([u32::MAX - 1, 0]);
        counter.advance(3);
        assert_eq!(counter.words(), &[1, 1]);
        counter.advance(0);
        assert_eq!(counter.words(), &[1, 1]);
    }

    #[test]
    fn lanes_start_at_offsets() {
        let lanes = LaneCounters::<u32, 2, 8>::new(Counter::new([16, 3]));
        for lane in 0..8 {
            assert_eq!(lanes.lane(lane).words(), &[16 + lane as u32, 3]);
        }
        assert_eq!(lanes.word(1), &[3; 8]);
    }

    #[test]
    fn lanes_share_lane_zero_carry() {
        let base = Counter::<u32, 4>::new([u32::MAX - 7, 9, 0, 0]);
        let mut lanes = LaneCounters::<u32, 4, 8>::new(base);
        lanes.increment_lanes();
        for lane in 0..8 {
            assert_eq!(lanes.lane(lane).words(), &[lane as u32, 10, 0, 0]);
        }
        lanes.increment_lanes();
        for lane in 0..8 {
            assert_eq!(lanes.lane(lane).words(), &[8 + lane as u32, 10, 0, 0]);
        }
    }

    #[test]
    fn lanes_track_scalar_counters() {
        let base = Counter::<u64, 2>::new([u64::MAX - 11, u64::MAX]);
        let mut lanes = LaneCounters::<u64, 2, 4>::new(base);
        let mut scalars: [Counter<u64, 2>; 4] = array::from_fn(|lane| {
            let mut counter = base;
            counter.advance(lane as u64);
            counter
        });
        for _ in 0..6 {
            for (lane, scalar) in scalars.iter_mut().enumerate() {
                assert_eq!(lanes.lane(lane), *scalar);
                scalar.advance(4);
            }
            lanes.increment_lanes();
        }
    }

    #[test]
    fn unaligned_lanes_carry_on_their_own_step() {
        let base = Counter::<u32, 2>::new([u32::MAX - 5, 9]);
        let mut lanes = LaneCounters::<u32, 2, 4>::new(base);
        // Lanes 0..4 sit at MAX-5..MAX-2, so after one step lanes 2 and 3 have wrapped
        // and lanes 0 and 1 haven't.
        lanes.increment_lanes();
        assert_eq!(lanes.lane(0).words(), &[u32::MAX - 1, 9]);
        assert_eq!(lanes.lane(1).words(), &[u32::MAX, 9]);
        assert_eq!(lanes.lane(2).words(), &[0, 10]);
        assert_eq!(lanes.lane(3).words(), &[1, 10]);
        lanes.increment_lanes();
        for lane in 0..4 {
            assert_eq!(lanes.lane(lane).words(), &[2 + lane as u32, 10]);
        }
    }

    #[test]
    fn lanes_that_carried_at_construction_carry_once() {
        // Lanes 2 and 3 already carried into word 1 inside `new`.
        let base = Counter::<u64, 3>::new([u64::MAX - 1, u64::MAX, 4]);
        let mut lanes = LaneCounters::<u64, 3, 4>::new(base);
        assert_eq!(lanes.lane(2).words(), &[0, 0, 5]);
        let mut scalars: [Counter<u64, 3>; 4] = array::from_fn(|lane| {
            let mut counter = base;
            counter.advance(lane as u64);
            counter
        });
        for _ in 0..5 {
            for (lane, scalar) in scalars.iter_mut().enumerate() {
                assert_eq!(lanes.lane(lane), *scalar, "lane {lane}");
                scalar.advance(4);
            }
            lanes.increment_lanes();
        }
    }
}
