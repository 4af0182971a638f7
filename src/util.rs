use core::fmt::{Debug, LowerHex};

/// A machine word a counter or an output block is made of.
pub trait Word: Copy + Ord + Default + Debug + LowerHex + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    const BITS: u32;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Truncating conversion, used for lane offsets.
    fn from_usize(n: usize) -> Self;

    fn widen(self) -> u64;
}

/// Add/rotate/xor arithmetic over either a single word or a packed vector of
/// words. Every round function is written once against this trait, so the
/// scalar engines instantiate it with `u32`/`u64` and the lane engines with
/// the packed types from [`crate::backends`].
pub trait Arx: Copy {
    type Elem: Word;

    fn splat(x: Self::Elem) -> Self;

    fn add(self, rhs: Self) -> Self;

    fn xor(self, rhs: Self) -> Self;

    fn and(self, rhs: Self) -> Self;

    fn shl(self, n: u32) -> Self;

    fn shr(self, n: u32) -> Self;

    fn rotl(self, n: u32) -> Self;

    fn rotr(self, n: u32) -> Self;
}

/// Conversion between a packed vector and its `L` lanes.
pub trait Packed<const L: usize>: Arx {
    fn from_lanes(lanes: [Self::Elem; L]) -> Self;

    fn to_lanes(self) -> [Self::Elem; L];
}

/// 32x32 -> 64 multiply of the low halves of 64-bit elements.
pub trait MulWide: Arx<Elem = u64> {
    fn mul_wide(self, rhs: Self) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {$(
        impl Word for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const BITS: u32 = <$t>::BITS;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$t>::wrapping_sub(self, rhs)
            }

            #[inline(always)]
            fn from_usize(n: usize) -> Self {
                n as $t
            }

            #[inline(always)]
            fn widen(self) -> u64 {
                self as u64
            }
        }

        impl Arx for $t {
            type Elem = $t;

            #[inline(always)]
            fn splat(x: Self) -> Self {
                x
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                self ^ rhs
            }

            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                self & rhs
            }

            #[inline(always)]
            fn shl(self, n: u32) -> Self {
                self << n
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                self >> n
            }

            #[inline(always)]
            fn rotl(self, n: u32) -> Self {
                self.rotate_left(n)
            }

            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                self.rotate_right(n)
            }
        }

        impl Packed<1> for $t {
            #[inline(always)]
            fn from_lanes(lanes: [Self; 1]) -> Self {
                lanes[0]
            }

            #[inline(always)]
            fn to_lanes(self) -> [Self; 1] {
                [self]
            }
        }
    )*};
}

impl_word!(u32, u64);

impl MulWide for u64 {
    #[inline(always)]
    fn mul_wide(self, rhs: Self) -> Self {
        (self & LOW_HALF) * (rhs & LOW_HALF)
    }
}

pub const LOW_HALF: u64 = 0xFFFF_FFFF;

/// Builds a 64-bit word from its low and high 32-bit halves.
#[inline(always)]
pub const fn join_u32(lo: u32, hi: u32) -> u64 {
    (lo as u64) | ((hi as u64) << 32)
}

/// Splits a 64-bit word into `[low, high]` 32-bit halves.
#[inline(always)]
pub const fn split_u64(x: u64) -> [u32; 2] {
    [x as u32, (x >> 32) as u32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves() {
        let x = 0x547571AA_AF20A390;
        assert_eq!(split_u64(x), [0xAF20A390, 0x547571AA]);
        assert_eq!(join_u32(0xAF20A390, 0x547571AA), x);
    }

    #[test]
    fn mul_wide_ignores_high_halves() {
        let a = 0xDEAD_BEEF_FFFF_FFFF_u64;
        let b = 0x1234_5678_D251_1F53_u64;
        assert_eq!(a.mul_wide(b), 0xFFFF_FFFF_u64 * 0xD251_1F53_u64);
    }
}
