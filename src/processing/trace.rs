//! # Codec Trace Hook
//!
//! The codec never prints or logs on its own. Callers that want to see what it
//! does attach a [`Trace`] implementation to `encode_traced` / `decode_traced`.

use log::{debug, trace};

use super::pixels::BitAddress;

/// A single observable step of an encode or decode run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// Emitted by encode once the capacity check has been evaluated.
    CapacityChecked { needed: u64, available: u64 },
    /// Length prefix written (encode) or recovered (decode).
    LengthPrefix { payload_bits: u64 },
    BitWritten {
        index: u64,
        address: BitAddress,
        bit: u8,
    },
    BitRead {
        index: u64,
        address: BitAddress,
        bit: u8,
    },
}

pub trait Trace {
    fn event(&mut self, event: &TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Trace for NoTrace {
    #[inline]
    fn event(&mut self, _event: &TraceEvent) {}
}

impl<F> Trace for F
where
    F: FnMut(&TraceEvent),
{
    fn event(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Forwards events to the `log` facade.
///
/// Per-bit events go to `trace`, prefix and capacity events to `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl Trace for LogTrace {
    fn event(&mut self, event: &TraceEvent) {
        match *event {
            TraceEvent::CapacityChecked { needed, available } => {
                debug!("capacity check: need {} bits, have {}", needed, available)
            }
            TraceEvent::LengthPrefix { payload_bits } => {
                debug!("length prefix: {} payload bits", payload_bits)
            }
            TraceEvent::BitWritten {
                index,
                address,
                bit,
            } => trace!(
                "write bit #{} = {} at ({}, {}, {})",
                index,
                bit,
                address.row,
                address.col,
                address.channel
            ),
            TraceEvent::BitRead {
                index,
                address,
                bit,
            } => trace!(
                "read bit #{} = {} at ({}, {}, {})",
                index,
                bit,
                address.row,
                address.col,
                address.channel
            ),
        }
    }
}

/// Collects events in memory. Mostly useful in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    pub events: Vec<TraceEvent>,
}

impl Trace for RecordingTrace {
    fn event(&mut self, event: &TraceEvent) {
        self.events.push(*event);
    }
}
