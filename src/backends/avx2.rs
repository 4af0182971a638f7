use crate::util::*;
#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct U32x8(__m256i);

#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct U64x4(__m256i);

/// Shift count operand for the `sll`/`srl` family. Counts past the element width
/// produce zero, so rotating by 0 still works.
#[inline(always)]
fn count(n: u32) -> __m128i {
    unsafe { _mm_cvtsi32_si128(n as i32) }
}

impl Arx for U32x8 {
    type Elem = u32;

    #[inline(always)]
    fn splat(x: u32) -> Self {
        unsafe { Self(_mm256_set1_epi32(x as i32)) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_add_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_xor_si256(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_and_si256(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        unsafe { Self(_mm256_sll_epi32(self.0, count(n))) }
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        unsafe { Self(_mm256_srl_epi32(self.0, count(n))) }
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        unsafe {
            Self(_mm256_or_si256(
                _mm256_sll_epi32(self.0, count(n)),
                _mm256_srl_epi32(self.0, count(32 - n)),
            ))
        }
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        unsafe {
            Self(_mm256_or_si256(
                _mm256_srl_epi32(self.0, count(n)),
                _mm256_sll_epi32(self.0, count(32 - n)),
            ))
        }
    }
}

impl Packed<8> for U32x8 {
    #[inline(always)]
    fn from_lanes(lanes: [u32; 8]) -> Self {
        unsafe { Self(_mm256_loadu_si256(lanes.as_ptr().cast())) }
    }

    #[inline(always)]
    fn to_lanes(self) -> [u32; 8] {
        let mut lanes = [0; 8];
        unsafe { _mm256_storeu_si256(lanes.as_mut_ptr().cast(), self.0) };
        lanes
    }
}

impl Arx for U64x4 {
    type Elem = u64;

    #[inline(always)]
    fn splat(x: u64) -> Self {
        unsafe { Self(_mm256_set1_epi64x(x as i64)) }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_add_epi64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_xor_si256(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_and_si256(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn shl(self, n: u32) -> Self {
        unsafe { Self(_mm256_sll_epi64(self.0, count(n))) }
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        unsafe { Self(_mm256_srl_epi64(self.0, count(n))) }
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        unsafe {
            Self(_mm256_or_si256(
                _mm256_sll_epi64(self.0, count(n)),
                _mm256_srl_epi64(self.0, count(64 - n)),
            ))
        }
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        unsafe {
            Self(_mm256_or_si256(
                _mm256_srl_epi64(self.0, count(n)),
                _mm256_sll_epi64(self.0, count(64 - n)),
            ))
        }
    }
}

impl Packed<4> for U64x4 {
    #[inline(always)]
    fn from_lanes(lanes: [u64; 4]) -> Self {
        unsafe { Self(_mm256_loadu_si256(lanes.as_ptr().cast())) }
    }

    #[inline(always)]
    fn to_lanes(self) -> [u64; 4] {
        let mut lanes = [0; 4];
        unsafe { _mm256_storeu_si256(lanes.as_mut_ptr().cast(), self.0) };
        lanes
    }
}

impl MulWide for U64x4 {
    #[inline(always)]
    fn mul_wide(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_mul_epu32(self.0, rhs.0)) }
    }
}
