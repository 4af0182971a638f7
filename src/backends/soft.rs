use crate::util::*;

macro_rules! soft_vector {
    ($name:ident, $elem:ty, $lanes:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        #[repr(C, align(32))]
        pub struct $name([$elem; $lanes]);

        impl $name {
            #[inline(always)]
            fn zip(mut self, rhs: Self, f: impl Fn($elem, $elem) -> $elem) -> Self {
                for (a, b) in self.0.iter_mut().zip(rhs.0) {
                    *a = f(*a, b);
                }
                self
            }

            #[inline(always)]
            fn map(mut self, f: impl Fn($elem) -> $elem) -> Self {
                for a in self.0.iter_mut() {
                    *a = f(*a);
                }
                self
            }
        }

        impl Arx for $name {
            type Elem = $elem;

            #[inline(always)]
            fn splat(x: $elem) -> Self {
                Self([x; $lanes])
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.zip(rhs, <$elem>::wrapping_add)
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a ^ b)
            }

            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a & b)
            }

            #[inline(always)]
            fn shl(self, n: u32) -> Self {
                self.map(|a| a << n)
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                self.map(|a| a >> n)
            }

            #[inline(always)]
            fn rotl(self, n: u32) -> Self {
                self.map(|a| a.rotate_left(n))
            }

            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                self.map(|a| a.rotate_right(n))
            }
        }

        impl Packed<$lanes> for $name {
            #[inline(always)]
            fn from_lanes(lanes: [$elem; $lanes]) -> Self {
                Self(lanes)
            }

            #[inline(always)]
            fn to_lanes(self) -> [$elem; $lanes] {
                self.0
            }
        }
    };
}

soft_vector!(U32x8, u32, 8);
soft_vector!(U64x4, u64, 4);

impl MulWide for U64x4 {
    #[inline(always)]
    fn mul_wide(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| (a & LOW_HALF) * (b & LOW_HALF))
    }
}
