/*!
Module containing the round counts used by the block functions.

Every family is generic over one of these markers, so the round count is part of the
type (`ChaCha<R20>`, `Threefry4x64<R72>`, ...) and never a literal inside a round loop.
*/

pub trait Rounds: Copy + Default + core::fmt::Debug + Send + Sync + 'static {
    const COUNT: usize;
}

/// ChaCha counts its rounds in pairs (a column round plus a diagonal round).
pub trait DoubleRounds {
    const COUNT: usize;
}

impl<R: Rounds> DoubleRounds for R {
    const COUNT: usize = R::COUNT / 2;
}

macro_rules! rounds {
    ($($name:ident = $count:literal),* $(,)?) => {$(
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;
        impl Rounds for $name {
            const COUNT: usize = $count;
        }
    )*};
}

rounds! {
    R8 = 8,
    R10 = 10,
    R12 = 12,
    R16 = 16,
    R20 = 20,
    R24 = 24,
    R32 = 32,
    R72 = 72,
}
