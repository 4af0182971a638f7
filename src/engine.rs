/*!
The buffered engine every generator in this crate is built from.

A [`BlockFunction`] knows how to turn one counter into one block of words. Scalar
block functions use a [`Counter`](crate::counter::Counter) and produce a single
block; lane functions use [`LaneCounters`](crate::counter::LaneCounters) and produce
`L` blocks at once, interleaved according to their [`Layout`]. [`BlockEngine`] doesn't
care which of the two it drives.

The engine is a small state machine:

```text
EMPTY --next_word--> FILLING --> READY --(cursor == len)--> EMPTY
```

Leaving `EMPTY` always increments the counter exactly once and then runs the block
function exactly once. Families that start `READY` (see [`BlockFunction::PRIMED`])
compute their first block at construction, from the initial counter.
*/

/// Advances a counter by one refill.
pub trait Step {
    fn step(&mut self);
}

pub trait BlockFunction {
    type Word: crate::util::Word;
    type Counter: Step + Copy + PartialEq + core::fmt::Debug;
    type Block: Copy + AsRef<[Self::Word]>;

    /// Placeholder block for an engine that hasn't generated anything yet.
    const EMPTY: Self::Block;
    /// Whether a new engine starts `READY` with the block for its initial counter.
    const PRIMED: bool;

    /// Writes the block for `counter` into `out`. `out` holds the previous block on
    /// entry, chaining modes read it before overwriting.
    fn fill(&self, counter: &Self::Counter, out: &mut Self::Block);
}

/// Where lane `lane`'s word `word` lives inside a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Scalar,
    /// `out[word * lanes + lane]`
    WordMajor { lanes: usize },
    /// `out[lane * words + word]`
    LaneMajor { words: usize },
}

impl Layout {
    #[inline(always)]
    pub const fn index(self, lane: usize, word: usize) -> usize {
        match self {
            Layout::Scalar => word,
            Layout::WordMajor { lanes } => word * lanes + lane,
            Layout::LaneMajor { words } => lane * words + word,
        }
    }

    /// Which word of a single-lane block ends up at position `i`, assuming every
    /// lane computed that same block.
    #[inline]
    pub const fn reference_word(self, i: usize) -> usize {
        match self {
            Layout::Scalar => i,
            Layout::WordMajor { lanes } => i / lanes,
            Layout::LaneMajor { words } => i % words,
        }
    }
}

/// A block function that runs several lanes of a scalar block function at once.
pub trait LaneFunction: BlockFunction {
    type Scalar: BlockFunction<Word = Self::Word>;

    const LANES: usize;
    const LAYOUT: Layout;

    /// The scalar block function every lane is equivalent to.
    fn scalar(&self) -> Self::Scalar;

    fn lane_counter(
        counter: &Self::Counter,
        lane: usize,
    ) -> <Self::Scalar as BlockFunction>::Counter;
}

#[derive(Clone)]
pub struct BlockEngine<F: BlockFunction> {
    function: F,
    counter: F::Counter,
    block: F::Block,
    cursor: usize,
}

impl<F: BlockFunction> BlockEngine<F> {
    /// Builds an engine in the initial state its family uses.
    pub fn new(function: F, counter: F::Counter) -> Self {
        let mut engine = Self::empty(function, counter);
        if F::PRIMED {
            engine.generate();
        }
        engine
    }

    /// Builds an engine in the `EMPTY` state regardless of the family.
    pub fn empty(function: F, counter: F::Counter) -> Self {
        let block = F::EMPTY;
        let cursor = block.as_ref().len();
        Self {
            function,
            counter,
            block,
            cursor,
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.block.as_ref().len()
    }

    /// Runs the block function on the current counter, without touching it.
    #[inline]
    pub fn generate(&mut self) {
        self.function.fill(&self.counter, &mut self.block);
        self.cursor = 0;
    }

    /// Moves to the next counter and generates its block.
    #[inline]
    pub fn refill(&mut self) {
        self.counter.step();
        self.generate();
    }

    #[inline]
    pub fn next_word(&mut self) -> F::Word {
        if self.cursor == self.len() {
            self.refill();
        }
        let word = self.block.as_ref()[self.cursor];
        self.cursor += 1;
        word
    }

    pub fn fill_words(&mut self, dest: &mut [F::Word]) {
        for word in dest.iter_mut() {
            *word = self.next_word();
        }
    }

    /// Replaces the counter and drops whatever is left of the current block.
    pub fn set_counter(&mut self, counter: F::Counter) {
        self.counter = counter;
        self.cursor = self.len();
    }

    #[inline]
    pub fn counter(&self) -> &F::Counter {
        &self.counter
    }

    #[inline]
    pub fn block(&self) -> &F::Block {
        &self.block
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn function(&self) -> &F {
        &self.function
    }
}
