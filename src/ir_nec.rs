//! Edge-timing decoder for NEC infrared remote frames.
//!
//! The receiver module demodulates the 38 kHz carrier and drives its output low
//! during a mark. So a [`Edge::Rising`] ends a mark and a [`Edge::Falling`]
//! ends a space. The decoder is fed one edge at a time from the pin-change
//! context and never blocks.
//!
//! See [`NecDecoder`] for usage.

// ===== Public API ===========================================================

/// Direction of a level change on the demodulated receiver output.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high: a mark just ended.
    Rising,
    /// High to low: a space just ended.
    Falling,
}

impl Edge {
    /// The edge that produced the given post-edge pin level.
    #[must_use]
    pub const fn from_level(level_high: bool) -> Self {
        if level_high { Self::Rising } else { Self::Falling }
    }
}

/// Events produced by the decoder.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrNecEvent {
    /// A complete frame whose address and command both matched their complements.
    Press { addr: u8, cmd: u8 },
    /// A repeat code (lead mark plus short space). Never turned into a command.
    Repeat,
}

/// Where the decoder is within a frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Idle,
    /// Lead mark seen, waiting for the lead (or repeat) space to end.
    LeadMark,
    /// Waiting for a data mark to end.
    DataMark,
    /// Waiting for a data space to end; its length encodes the bit.
    DataSpace,
}

/// NEC frame decoder.
///
/// Feed it every edge with [`NecDecoder::edge`] (timestamped) or
/// [`NecDecoder::feed`] (interval already measured). Any interval outside the
/// window the current phase expects drops the frame and returns to
/// [`Phase::Idle`], so a corrupted transmission costs at most one inter-edge gap.
///
/// # Examples
/// ```
/// use fan_kit::ir_nec::{Edge, IrNecEvent, NecDecoder, Phase};
///
/// let mut decoder = NecDecoder::new();
/// assert_eq!(decoder.feed(Edge::Rising, 9_000), None);
/// assert_eq!(decoder.phase(), Phase::LeadMark);
/// // A 2.25 ms space after the lead mark is a repeat code.
/// assert_eq!(decoder.feed(Edge::Falling, 2_250), Some(IrNecEvent::Repeat));
/// assert_eq!(decoder.phase(), Phase::Idle);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NecDecoder {
    phase: Phase,
    last_edge_us: u32,
    bit_index: u8,
    bits: u32,
}

impl NecDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            last_edge_us: 0,
            bit_index: 0,
            bits: 0,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of data bits accumulated in the current frame.
    #[must_use]
    pub const fn bit_index(&self) -> u8 {
        self.bit_index
    }

    /// Record an edge at `now_us` (a wrapping microsecond timestamp) and decode
    /// the interval since the previous edge.
    pub fn edge(&mut self, edge: Edge, now_us: u32) -> Option<IrNecEvent> {
        let dt = now_us.wrapping_sub(self.last_edge_us);
        self.last_edge_us = now_us;
        self.feed(edge, dt)
    }

    /// Decode one edge given the interval `dt` (µs) that preceded it.
    pub fn feed(&mut self, edge: Edge, dt: u32) -> Option<IrNecEvent> {
        match (self.phase, edge) {
            (Phase::Idle, Edge::Rising) => {
                if inr(dt, LEAD_MARK) {
                    self.phase = Phase::LeadMark;
                }
                None
            }
            (Phase::LeadMark, Edge::Falling) => {
                if inr(dt, LEAD_SPACE) {
                    self.phase = Phase::DataMark;
                    self.bit_index = 0;
                    self.bits = 0;
                    None
                } else if inr(dt, REPEAT_SPACE) {
                    self.phase = Phase::Idle;
                    Some(IrNecEvent::Repeat)
                } else {
                    self.abort("lead space", dt);
                    None
                }
            }
            (Phase::DataMark, Edge::Rising) => {
                if inr(dt, BIT_MARK) {
                    self.phase = Phase::DataSpace;
                } else {
                    self.abort("data mark", dt);
                }
                None
            }
            (Phase::DataSpace, Edge::Falling) => {
                let bit = if inr(dt, BIT0_SPACE) {
                    0
                } else if inr(dt, BIT1_SPACE) {
                    1
                } else {
                    self.abort("data space", dt);
                    return None;
                };
                self.push_bit(bit)
            }
            // An edge of the wrong direction for the phase carries no timing
            // information the frame depends on.
            (Phase::Idle, Edge::Falling)
            | (Phase::LeadMark | Phase::DataSpace, Edge::Rising)
            | (Phase::DataMark, Edge::Falling) => None,
        }
    }

    fn push_bit(&mut self, bit: u32) -> Option<IrNecEvent> {
        self.bits |= bit.checked_shl(u32::from(self.bit_index)).unwrap_or(0);
        self.bit_index = self.bit_index.saturating_add(1);

        if self.bit_index < FRAME_BITS {
            self.phase = Phase::DataMark;
            return None;
        }

        // Frame complete: always back to Idle, valid or not.
        self.phase = Phase::Idle;
        let frame = self.bits;
        let event = nec_ok(frame).map(|(addr, cmd)| IrNecEvent::Press { addr, cmd });
        #[cfg(feature = "defmt")]
        if event.is_none() {
            defmt::debug!("IR: checksum rejected frame 0x{:08X}", frame);
        }
        event
    }

    fn abort(&mut self, what: &'static str, dt: u32) {
        #[cfg(feature = "defmt")]
        defmt::trace!("IR: bad {} timing ({}us), resetting", what, dt);
        #[cfg(not(feature = "defmt"))]
        let _ = (what, dt);
        self.phase = Phase::Idle;
    }
}

/// Split a 32-bit LSB-first payload into `(address, command)` if both bytes
/// match their complements.
#[must_use]
pub const fn nec_ok(frame: u32) -> Option<(u8, u8)> {
    let [addr, addr_inv, cmd, cmd_inv] = frame.to_le_bytes();
    if (addr ^ addr_inv) == 0xFF && (cmd ^ cmd_inv) == 0xFF {
        Some((addr, cmd))
    } else {
        None
    }
}

/// Build the 32-bit payload a remote sends for `addr`/`cmd`.
#[must_use]
pub const fn nec_frame(addr: u8, cmd: u8) -> u32 {
    u32::from_le_bytes([addr, !addr, cmd, !cmd])
}

// µs windows (inclusive)
pub const LEAD_MARK: (u32, u32) = (8_500, 9_500);
pub const LEAD_SPACE: (u32, u32) = (4_000, 5_000);
pub const REPEAT_SPACE: (u32, u32) = (2_000, 2_600);
pub const BIT_MARK: (u32, u32) = (400, 700);
pub const BIT0_SPACE: (u32, u32) = (400, 700);
pub const BIT1_SPACE: (u32, u32) = (1_400, 1_900);

const FRAME_BITS: u8 = 32;

#[inline]
const fn inr(x: u32, r: (u32, u32)) -> bool {
    x >= r.0 && x <= r.1
}
