//! The SM3 compression function and its interchangeable strategies.
//!
//! Every strategy runs the same 64 rounds over the registers `A..H` and feeds
//! the result forward into the entering state. They differ only in how the
//! message schedule is obtained:
//!
//! * [CompressionStrategy::Reference]: [Schedule::expand] then a round loop.
//! * [CompressionStrategy::RingBuffer]: words are produced on the fly by a
//!   [RingSchedule] while the rounds run.
//! * [CompressionStrategy::Lanes]: [Schedule::expand_lanes] then a round loop.
//! * [CompressionStrategy::Unrolled]: [Schedule::expand] then all 64 rounds
//!   expanded by a macro with the register rotation folded into renaming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Sm3Error;
use crate::schedule::{RingSchedule, Schedule, MIXING_WORDS};
use crate::state::HashState;
use crate::MessageBlock;

/// Round constant for rounds 0..16.
pub const T_EARLY: u32 = 0x79cc_4519;
/// Round constant for rounds 16..64.
pub const T_LATE: u32 = 0x7a87_9d8a;

const ROUNDS: usize = MIXING_WORDS;

/// Unrotated round constant `T(j)`.
#[inline(always)]
pub const fn t(j: usize) -> u32 {
    if j < 16 {
        T_EARLY
    } else {
        T_LATE
    }
}

const fn rotated_round_constants() -> [u32; ROUNDS] {
    let mut table = [0u32; ROUNDS];
    let mut j = 0;
    while j < ROUNDS {
        table[j] = t(j).rotate_left((j % 32) as u32);
        j += 1;
    }
    table
}

/// `rotl(T(j), j mod 32)` for every round.
pub const ROUND_CONSTANTS: [u32; ROUNDS] = rotated_round_constants();

#[inline(always)]
pub fn ff(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline(always)]
pub fn gg(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

/// Permutation applied to the new `E` register.
#[inline(always)]
pub fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

/// One round over registers `[A, B, C, D, E, F, G, H]`.
#[inline(always)]
fn round(r: &mut [u32; 8], j: usize, wj: u32, w1j: u32) {
    let [a, b, c, d, e, f, g, h] = *r;
    let a12 = a.rotate_left(12);
    let ss1 = a12
        .wrapping_add(e)
        .wrapping_add(ROUND_CONSTANTS[j])
        .rotate_left(7);
    let ss2 = ss1 ^ a12;
    let tt1 = ff(a, b, c, j)
        .wrapping_add(d)
        .wrapping_add(ss2)
        .wrapping_add(w1j);
    let tt2 = gg(e, f, g, j)
        .wrapping_add(h)
        .wrapping_add(ss1)
        .wrapping_add(wj);
    *r = [tt1, a, b.rotate_left(9), c, p0(tt2), e, f.rotate_left(19), g];
}

#[inline(always)]
fn feed_forward(words: &mut [u32; 8], registers: &[u32; 8]) {
    for (w, r) in words.iter_mut().zip(registers.iter()) {
        *w ^= r;
    }
}

fn compress_scheduled(words: &mut [u32; 8], schedule: &Schedule) {
    let mut registers = *words;
    for j in 0..ROUNDS {
        round(&mut registers, j, schedule.w[j], schedule.w1[j]);
    }
    feed_forward(words, &registers);
}

fn compress_reference(words: &mut [u32; 8], block: &MessageBlock) {
    compress_scheduled(words, &Schedule::expand(block));
}

fn compress_lanes(words: &mut [u32; 8], block: &MessageBlock) {
    compress_scheduled(words, &Schedule::expand_lanes(block));
}

fn compress_ring(words: &mut [u32; 8], block: &MessageBlock) {
    let mut ring = RingSchedule::new(block);
    let mut registers = *words;
    for j in 0..ROUNDS {
        let (wj, w1j) = ring.next_round();
        round(&mut registers, j, wj, w1j);
    }
    feed_forward(words, &registers);
}

/// A single round in place. Instead of shifting all eight registers, only
/// B, D, F and H are written and the caller renames the registers for the
/// next round.
macro_rules! unrolled_round {
    ($j:expr, $s:ident, $a:ident, $b:ident, $c:ident, $d:ident, $e:ident, $f:ident, $g:ident, $h:ident) => {{
        let a12 = $a.rotate_left(12);
        let ss1 = a12
            .wrapping_add($e)
            .wrapping_add(ROUND_CONSTANTS[$j])
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        let tt1 = ff($a, $b, $c, $j)
            .wrapping_add($d)
            .wrapping_add(ss2)
            .wrapping_add($s.w1[$j]);
        let tt2 = gg($e, $f, $g, $j)
            .wrapping_add($h)
            .wrapping_add(ss1)
            .wrapping_add($s.w[$j]);
        $b = $b.rotate_left(9);
        $f = $f.rotate_left(19);
        $d = tt1;
        $h = p0(tt2);
    }};
}

/// Four rounds, after which the register names are back in their original
/// positions.
macro_rules! four_rounds {
    ($j:expr, $s:ident, $a:ident, $b:ident, $c:ident, $d:ident, $e:ident, $f:ident, $g:ident, $h:ident) => {
        unrolled_round!($j, $s, $a, $b, $c, $d, $e, $f, $g, $h);
        unrolled_round!($j + 1, $s, $d, $a, $b, $c, $h, $e, $f, $g);
        unrolled_round!($j + 2, $s, $c, $d, $a, $b, $g, $h, $e, $f);
        unrolled_round!($j + 3, $s, $b, $c, $d, $a, $f, $g, $h, $e);
    };
}

fn compress_unrolled(words: &mut [u32; 8], block: &MessageBlock) {
    let s = Schedule::expand(block);
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *words;

    four_rounds!(0, s, a, b, c, d, e, f, g, h);
    four_rounds!(4, s, a, b, c, d, e, f, g, h);
    four_rounds!(8, s, a, b, c, d, e, f, g, h);
    four_rounds!(12, s, a, b, c, d, e, f, g, h);
    four_rounds!(16, s, a, b, c, d, e, f, g, h);
    four_rounds!(20, s, a, b, c, d, e, f, g, h);
    four_rounds!(24, s, a, b, c, d, e, f, g, h);
    four_rounds!(28, s, a, b, c, d, e, f, g, h);
    four_rounds!(32, s, a, b, c, d, e, f, g, h);
    four_rounds!(36, s, a, b, c, d, e, f, g, h);
    four_rounds!(40, s, a, b, c, d, e, f, g, h);
    four_rounds!(44, s, a, b, c, d, e, f, g, h);
    four_rounds!(48, s, a, b, c, d, e, f, g, h);
    four_rounds!(52, s, a, b, c, d, e, f, g, h);
    four_rounds!(56, s, a, b, c, d, e, f, g, h);
    four_rounds!(60, s, a, b, c, d, e, f, g, h);

    feed_forward(words, &[a, b, c, d, e, f, g, h]);
}

/// How the message schedule is computed during compression. All strategies
/// are observably identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionStrategy {
    /// Full array schedule, computed before the rounds.
    #[default]
    Reference,
    /// 16 word ring buffer, computed while the rounds run.
    RingBuffer,
    /// Full array schedule, computed four words at a time.
    Lanes,
    /// Full array schedule with the 64 rounds unrolled.
    Unrolled,
}

impl CompressionStrategy {
    pub const ALL: [CompressionStrategy; 4] = [
        CompressionStrategy::Reference,
        CompressionStrategy::RingBuffer,
        CompressionStrategy::Lanes,
        CompressionStrategy::Unrolled,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CompressionStrategy::Reference => "reference",
            CompressionStrategy::RingBuffer => "ring_buffer",
            CompressionStrategy::Lanes => "lanes",
            CompressionStrategy::Unrolled => "unrolled",
        }
    }

    /// Compresses one block into `state`.
    #[inline]
    pub fn compress_block(self, state: &mut HashState, block: &MessageBlock) {
        let words = state.words_mut();
        match self {
            CompressionStrategy::Reference => compress_reference(words, block),
            CompressionStrategy::RingBuffer => compress_ring(words, block),
            CompressionStrategy::Lanes => compress_lanes(words, block),
            CompressionStrategy::Unrolled => compress_unrolled(words, block),
        }
    }
}

impl fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CompressionStrategy {
    type Err = Sm3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CompressionStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized)
            .ok_or_else(|| Sm3Error::UnknownStrategy(s.to_owned()))
    }
}
