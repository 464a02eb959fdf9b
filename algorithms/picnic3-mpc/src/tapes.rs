//! Per-party random tapes and broadcast message buffers.
//!
//! Both sets hold sixteen independent byte buffers that advance in lockstep
//! under a single shared bit cursor. Buffers are caller-sized; the simulator
//! never grows them.

use crate::bitstream::{BitstreamReader, BitstreamWriter};

/// Number of virtual parties in every KKW execution.
pub const NUM_PARTIES: usize = 16;

// =============================================================================
// RANDOM TAPES
// =============================================================================

/// Sixteen per-party random tapes with a shared bit cursor.
///
/// The buffers are read-only during simulation; only the auxiliary pass
/// rewrites the last party's and-helper bits, before the cursor first moves.
pub struct RandomTapeSet {
    tape: [Vec<u8>; NUM_PARTIES],
    pos: usize,
}

impl RandomTapeSet {
    /// Wraps sixteen pre-sized tape buffers. The cursor starts at bit 0.
    #[must_use]
    pub fn new(tape: [Vec<u8>; NUM_PARTIES]) -> Self {
        Self { tape, pos: 0 }
    }

    /// All-zero tapes of `len` bytes each.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::new(std::array::from_fn(|_| vec![0u8; len]))
    }

    /// Shared bit cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Tape buffer of party `i`.
    ///
    /// # Panics
    /// Panics if `i >= NUM_PARTIES`.
    #[must_use]
    pub fn party(&self, i: usize) -> &[u8] {
        &self.tape[i]
    }

    pub(crate) fn reader(&self, i: usize) -> BitstreamReader<'_> {
        BitstreamReader::new(&self.tape[i], self.pos)
    }

    pub(crate) fn reader_at(&self, i: usize, pos: usize) -> BitstreamReader<'_> {
        BitstreamReader::new(&self.tape[i], pos)
    }

    pub(crate) fn writer_at(&mut self, i: usize, pos: usize) -> BitstreamWriter<'_> {
        BitstreamWriter::new(&mut self.tape[i], pos)
    }

    pub(crate) fn advance(&mut self, bits: usize) {
        self.pos += bits;
    }
}

// =============================================================================
// BROADCAST MESSAGES
// =============================================================================

/// Sixteen per-party broadcast buffers with a shared bit cursor.
///
/// During signing all sixteen buffers are written. During verification the
/// party indexed by `unopened` keeps the signer's committed broadcasts and is
/// only read; the other fifteen are recomputed.
pub struct MessageSet {
    msgs: [Vec<u8>; NUM_PARTIES],
    pos: usize,
    unopened: Option<usize>,
}

impl MessageSet {
    /// Wraps sixteen message buffers.
    ///
    /// # Panics
    /// Panics if `unopened` names a party index outside `0..NUM_PARTIES`.
    #[must_use]
    pub fn new(msgs: [Vec<u8>; NUM_PARTIES], unopened: Option<usize>) -> Self {
        if let Some(u) = unopened {
            assert!(u < NUM_PARTIES, "unopened party index out of range");
        }
        Self {
            msgs,
            pos: 0,
            unopened,
        }
    }

    /// All-zero signing-mode buffers of `len` bytes each (no unopened party).
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::new(std::array::from_fn(|_| vec![0u8; len]), None)
    }

    /// Shared bit cursor.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The hidden party during verification, if any.
    #[must_use]
    pub fn unopened(&self) -> Option<usize> {
        self.unopened
    }

    /// Message buffer of party `i`.
    ///
    /// # Panics
    /// Panics if `i >= NUM_PARTIES`.
    #[must_use]
    pub fn party(&self, i: usize) -> &[u8] {
        &self.msgs[i]
    }

    pub(crate) fn reader(&self, i: usize) -> BitstreamReader<'_> {
        BitstreamReader::new(&self.msgs[i], self.pos)
    }

    pub(crate) fn writer(&mut self, i: usize) -> BitstreamWriter<'_> {
        BitstreamWriter::new(&mut self.msgs[i], self.pos)
    }

    pub(crate) fn advance(&mut self, bits: usize) {
        self.pos += bits;
    }
}

// =============================================================================
// TESTS
// =============================================================================
