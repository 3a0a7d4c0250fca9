//! SM3 message expansion.
//!
//! Every block is expanded into 68 words `W` and 64 words `W1`:
//!
//! ```text
//! W[0..16]  = big-endian words of the block
//! W[j]      = P1(W[j-16] ^ W[j-9] ^ (W[j-3] <<< 15)) ^ (W[j-13] <<< 7) ^ W[j-6]
//! W1[j]     = W[j] ^ W[j+4]
//! ```
//!
//! [Schedule::expand] is the reference computation. [RingSchedule] produces
//! the same words one round at a time from a 16 word ring buffer, and
//! [Schedule::expand_lanes] computes four words per step. Both are checked
//! against the reference by the tests in this module.

use crate::bits::pack_block;
use crate::MessageBlock;

/// Number of expanded words `W`.
pub const EXPANDED_WORDS: usize = 68;

/// Number of mixing words `W1`.
pub const MIXING_WORDS: usize = 64;

const RING_SIZE: usize = 16;
const RING_MASK: usize = RING_SIZE - 1;

/// Permutation used by the message expansion.
#[inline(always)]
pub fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// One step of the expansion recurrence. The arguments are
/// `W[j-16], W[j-9], W[j-3], W[j-13], W[j-6]` in that order.
#[inline(always)]
fn expand_word(w16: u32, w9: u32, w3: u32, w13: u32, w6: u32) -> u32 {
    p1(w16 ^ w9 ^ w3.rotate_left(15)) ^ w13.rotate_left(7) ^ w6
}

/// The fully expanded schedule of one block. Lives only for the duration of
/// one compression.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Schedule {
    pub w: [u32; EXPANDED_WORDS],
    pub w1: [u32; MIXING_WORDS],
}

impl Schedule {
    /// Reference expansion over plain arrays.
    pub fn expand(block: &MessageBlock) -> Schedule {
        let mut w = [0u32; EXPANDED_WORDS];
        w[..16].copy_from_slice(&pack_block(block));
        for j in 16..EXPANDED_WORDS {
            w[j] = expand_word(w[j - 16], w[j - 9], w[j - 3], w[j - 13], w[j - 6]);
        }
        let mut w1 = [0u32; MIXING_WORDS];
        for j in 0..MIXING_WORDS {
            w1[j] = w[j] ^ w[j + 4];
        }
        Schedule { w, w1 }
    }

    /// Expansion computing four words per step.
    ///
    /// The last lane of each step needs `W[j]` from the first lane of the same
    /// step. It is computed with that term zeroed and then repaired: since P1
    /// is linear over XOR, `P1(x ^ r) = P1(x) ^ P1(r)`.
    pub fn expand_lanes(block: &MessageBlock) -> Schedule {
        let mut w = [0u32; EXPANDED_WORDS];
        w[..16].copy_from_slice(&pack_block(block));

        let mut j = 16;
        while j < EXPANDED_WORDS {
            let a = Lanes::load(&w, j - 16);
            let b = Lanes::load(&w, j - 9);
            let c = Lanes([w[j - 3], w[j - 2], w[j - 1], 0]);
            let d = Lanes::load(&w, j - 13);
            let e = Lanes::load(&w, j - 6);

            let x = a ^ b ^ c.rotl(15);
            let mut y = x.p1() ^ d.rotl(7) ^ e;
            y.0[3] ^= p1(y.0[0].rotate_left(15));

            y.store(&mut w, j);
            j += 4;
        }

        let mut w1 = [0u32; MIXING_WORDS];
        for j in (0..MIXING_WORDS).step_by(4) {
            (Lanes::load(&w, j) ^ Lanes::load(&w, j + 4)).store(&mut w1, j);
        }
        Schedule { w, w1 }
    }

    /// Runs a [RingSchedule] to completion and collects its words, so the
    /// ring buffer strategy can be compared word for word.
    pub fn expand_ring(block: &MessageBlock) -> Schedule {
        let mut ring = RingSchedule::new(block);
        let mut w = [0u32; EXPANDED_WORDS];
        let mut w1 = [0u32; MIXING_WORDS];
        for j in 0..MIXING_WORDS {
            let (wj, w1j) = ring.next_round();
            w[j] = wj;
            w1[j] = w1j;
            // W[64..68] are only ever visible through W1.
            if j >= MIXING_WORDS - 4 {
                w[j + 4] = wj ^ w1j;
            }
        }
        Schedule { w, w1 }
    }
}

/// Four 32-bit lanes processed together.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Lanes([u32; 4]);

impl Lanes {
    #[inline(always)]
    fn load(words: &[u32], offset: usize) -> Lanes {
        Lanes([
            words[offset],
            words[offset + 1],
            words[offset + 2],
            words[offset + 3],
        ])
    }

    #[inline(always)]
    fn store(self, words: &mut [u32], offset: usize) {
        words[offset..offset + 4].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Lanes {
        Lanes(self.0.map(|x| x.rotate_left(n)))
    }

    #[inline(always)]
    fn p1(self) -> Lanes {
        self ^ self.rotl(15) ^ self.rotl(23)
    }
}

impl std::ops::BitXor for Lanes {
    type Output = Lanes;

    #[inline(always)]
    fn bitxor(self, rhs: Lanes) -> Lanes {
        Lanes([
            self.0[0] ^ rhs.0[0],
            self.0[1] ^ rhs.0[1],
            self.0[2] ^ rhs.0[2],
            self.0[3] ^ rhs.0[3],
        ])
    }
}

/// On-the-fly schedule over a 16 slot ring buffer.
///
/// Slot `k & 15` holds `W[k]`. Before round `j` the buffer is advanced until
/// `W[j+4]` exists, so it holds `W[j-11..=j+4]`, which covers both words the
/// round consumes.
pub struct RingSchedule {
    ring: [u32; RING_SIZE],
    /// Index of the next W word to compute.
    produced: usize,
    /// Index of the next round.
    round: usize,
}

impl RingSchedule {
    pub fn new(block: &MessageBlock) -> RingSchedule {
        RingSchedule {
            ring: pack_block(block),
            produced: RING_SIZE,
            round: 0,
        }
    }

    #[inline(always)]
    fn advance(&mut self) {
        let k = self.produced;
        let r = &self.ring;
        let wk = expand_word(
            r[(k - 16) & RING_MASK],
            r[(k - 9) & RING_MASK],
            r[(k - 3) & RING_MASK],
            r[(k - 13) & RING_MASK],
            r[(k - 6) & RING_MASK],
        );
        self.ring[k & RING_MASK] = wk;
        self.produced += 1;
    }

    /// Returns `(W[j], W1[j])` for the next round `j`. Must be called at most
    /// 64 times per block.
    #[inline(always)]
    pub fn next_round(&mut self) -> (u32, u32) {
        let j = self.round;
        debug_assert!(j < MIXING_WORDS);
        while self.produced <= j + 4 {
            self.advance();
        }
        self.round += 1;
        let wj = self.ring[j & RING_MASK];
        (wj, wj ^ self.ring[(j + 4) & RING_MASK])
    }
}
