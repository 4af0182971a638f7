/*!
Module containing the packed vector types the lane engines are built on. Only the widest
implementation available is re-exported as the definitive `U32x8`/`U64x4` for the rest of
the crate, but whatever other modules are available on the target are still compiled.
This is done for testing purposes, so every backend can be checked against the soft one.

Both types are 256 bits wide: eight 32-bit lanes or four 64-bit lanes. The soft
implementation is plain arrays with per-element loops the compiler can auto-vectorize;
the avx2 one keeps a single `__m256i` per value. There's no runtime dispatch, the
backend is picked when the crate is compiled. Asking for the `avx2` variant of a
generator on a build without it is reported as an error when the generator is created,
see [`AVX2`].
*/

pub mod soft;

#[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), target_feature = "avx2"))]
pub mod avx2;

cfg_if::cfg_if! {
    if #[cfg(all(
        any(target_arch = "x86_64", target_arch = "x86"),
        target_feature = "avx2",
        not(feature = "force-soft")
    ))] {
        pub use avx2::{U32x8, U64x4};
        /// Whether the lane engines run on AVX2 registers in this build.
        pub const AVX2: bool = true;
    } else {
        pub use soft::{U32x8, U64x4};
        /// Whether the lane engines run on AVX2 registers in this build.
        pub const AVX2: bool = false;
    }
}

/// Name of the backend behind [`U32x8`] and [`U64x4`].
pub const fn name() -> &'static str {
    if AVX2 { "avx2" } else { "soft" }
}
