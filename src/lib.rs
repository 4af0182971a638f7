/*!
"So how does a block cipher end up being a random number generator?"
Take a seat, this is simpler than it sounds.

Every generator in this crate is a keyed function from a counter to a block of words.
Pick a key once, feed the function 0, 1, 2, ... and hand out the words of each block in
order. That's it. There's no state besides the key, the counter, and the block currently
being handed out, so the quality of the stream is exactly the quality of the block
function, and you can jump anywhere in the stream by setting the counter.

The block functions are Philox (a multiply-xor network), Threefry and Threefish (the
Skein block cipher, without the tweak), ChaCha, Speck128/128, XTEA and LEA-128. Each
has a scalar version, which is the reference, and a lane version that runs 4 or 8
copies of the same function on consecutive counters in one go. The lane versions are
written once against a small add/rotate/xor trait and compiled either for plain arrays
(which the compiler is pretty good at auto-vectorizing) or for AVX2 registers, depending
on the flags used to compile the final binary. This crate **does not** use runtime
dispatch.

Lane `i` of a lane engine starting at counter `c` computes exactly what the scalar
function computes for counter `c + i`, and every refill moves all lanes forward by the
number of lanes. Only the order the words come out in differs, see
[`engine::Layout`]. ChaCha interleaves whole blocks so its lane stream is identical to
its scalar stream; the others interleave word by word.

The process of generating a word is as follows:

1. If the current block still has words left, return the next one.

2. Otherwise increment the counter (with carry across all of its words, and wrapping to
zero after the last one), run the block function on it, and return the first word of the
new block.

Some families (Philox, Threefry) start with an empty buffer, so the first block they
emit is for the initial counter plus one. The others compute the block for the initial
counter when they're created.

Every family also carries published known-answer vectors, checked by
[`Family::self_test`] for both the scalar and the lane versions.

## Usage

Most users want [`Generator`], which picks a family by name, draws its key from any
[`rand_core::RngCore`], and also implements `RngCore` itself. The block functions and
[`BlockEngine`] are public too, for callers that want to drive counters themselves.
*/

#![no_std]

#[cfg(test)]
extern crate std;

pub mod backends;
pub mod chacha;
pub mod counter;
pub mod engine;
pub mod error;
pub mod generator;
pub mod kat;
pub mod lea;
pub mod philox;
pub mod rounds;
pub mod speck;
pub mod threefry;
pub mod util;
pub mod variations;
pub mod xtea;

pub use counter::{Counter, LaneCounters};
pub use engine::{BlockEngine, BlockFunction, LaneFunction};
pub use error::Error;
pub use generator::{Family, Generator};

use rounds::*;

pub type Philox4x32x10 = philox::Philox4x32<R10>;
pub type Philox2x32x10 = philox::Philox2x32<R10>;
pub type Philox4x64x10 = philox::Philox4x64<R10>;
pub type Threefry4x64x20 = threefry::Threefry4x64<R20>;
pub type Threefish4x64 = threefry::Threefry4x64<R72>;
pub type Threefry2x64x20 = threefry::Threefry2x64<R20>;
pub type ChaCha8 = chacha::ChaCha<R8>;
pub type ChaCha12 = chacha::ChaCha<R12>;
pub type ChaCha20 = chacha::ChaCha<R20>;
pub type Speck128x128 = speck::Speck128<R32>;
pub type Xtea = xtea::Xtea<R32>;
pub type Lea128 = lea::Lea128<R24>;

/// Runs the known-answer tests of every family. Returns `false` if any of them failed,
/// the log has the details.
pub fn self_test() -> bool {
    Family::ALL
        .into_iter()
        .fold(true, |ok, family| family.self_test() & ok)
}
