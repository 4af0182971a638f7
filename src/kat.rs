/*!
Known-answer test harness.

Nothing in here panics on a mismatch: every comparison is logged (`debug!` for matching
words, `error!` for the rest) and the caller gets a `bool` back.
*/

use crate::engine::{BlockEngine, BlockFunction, LaneFunction, Layout, Step};
use log::{debug, error, info};

/// One published (key, counter) -> block pair. The key is already baked into `function`.
pub struct KnownAnswer<'a, F: BlockFunction> {
    pub name: &'static str,
    pub function: F,
    pub counter: F::Counter,
    /// A single block. For lane functions every lane is expected to produce it.
    pub expected: &'a [F::Word],
    pub layout: Layout,
}

/// Runs every vector, even after a failure, so the log shows all of them.
pub fn run_kat<'a, F, I>(vectors: I) -> bool
where
    F: BlockFunction,
    I: IntoIterator<Item = KnownAnswer<'a, F>>,
{
    let mut ok = true;
    for kat in vectors {
        let mut engine = BlockEngine::empty(kat.function, kat.counter);
        engine.generate();
        let actual = engine.block().as_ref();
        let layout = kat.layout;
        ok &= compare(kat.name, actual, |i| {
            kat.expected.get(layout.reference_word(i)).copied()
        });
    }
    ok
}

/// Compares `actual` word by word against `expected(i)`.
pub fn compare<W: crate::util::Word>(
    name: &str,
    actual: &[W],
    expected: impl Fn(usize) -> Option<W>,
) -> bool {
    let mut ok = true;
    for (i, &out) in actual.iter().enumerate() {
        match expected(i) {
            Some(reference) if reference == out => {
                debug!("{name} [{i:2}] out={out:#x} ref={reference:#x}");
            }
            Some(reference) => {
                error!("{name} [{i:2}] out={out:#x} ref={reference:#x} MISMATCH");
                ok = false;
            }
            None => {
                error!("{name} [{i:2}] out={out:#x} has no reference word");
                ok = false;
            }
        }
    }
    if ok {
        info!("{name}: ok");
    } else {
        error!("{name}: FAILED");
    }
    ok
}

/// Runs `blocks` refills of a lane function starting at `start`, and checks every lane
/// of every block against the scalar block function at that lane's counter. Lane `i`
/// of refill `k` has to sit at `start + i + k * LANES`.
pub fn check_lanes<F: LaneFunction>(
    name: &'static str,
    function: F,
    start: F::Counter,
    blocks: usize,
) -> bool {
    let scalar = function.scalar();
    let mut engine = BlockEngine::empty(function, start);
    let mut ok = true;
    for block in 0..blocks {
        if block == 0 {
            engine.generate();
        } else {
            engine.refill();
        }
        for lane in 0..F::LANES {
            let mut counter = F::lane_counter(&start, lane);
            for _ in 0..block * F::LANES {
                counter.step();
            }
            let actual = F::lane_counter(engine.counter(), lane);
            if actual != counter {
                error!("{name} block {block} lane {lane}: counter {actual:?} != {counter:?}");
                ok = false;
            }
            let mut reference = <F::Scalar as BlockFunction>::EMPTY;
            scalar.fill(&counter, &mut reference);
            let reference = reference.as_ref();
            let actual = engine.block().as_ref();
            for (word, &expected) in reference.iter().enumerate() {
                let out = actual[F::LAYOUT.index(lane, word)];
                if out != expected {
                    error!(
                        "{name} block {block} lane {lane} word {word}: {out:#x} != {expected:#x}"
                    );
                    ok = false;
                }
            }
        }
    }
    if ok {
        info!("{name}: {blocks} blocks agree on all {} lanes", F::LANES);
    }
    ok
}
