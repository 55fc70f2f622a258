//! Per-flow sequence counter tracking for the security headers.
//!
//! ESP and MACsec headers carry monotonically increasing counters; a hole
//! between successive observations of one flow is suspected loss. State is
//! keyed by flow so independent streams never disturb each other, and the
//! sharded map serializes concurrent observes on the same key while letting
//! distinct keys proceed in parallel.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fnv::FnvBuildHasher;
use serde::Serialize;

/// Identity of one sequence-counted stream
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum FlowKey {
    Esp { spi: u32 },
    /// MACsec secure channel, identified by association number in the
    /// simplified SecTAG
    Macsec { an: u8 },
}

/// Outcome of one counter observation.
///
/// Backward and repeated counters are deliberately distinct from `Loss`:
/// a replayed or reordered frame is a different event than genuine loss
/// and callers must be able to tell them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum GapReport {
    /// Counter is exactly last + 1, or this is the flow's first sighting
    InOrder,
    /// Forward jump; `missing` counters were never observed
    Loss { missing: u64 },
    /// Counter equals the previous observation
    Duplicate,
    /// Counter moved backwards by `distance`
    Reordered { distance: u64 },
}

/// How to interpret a counter that moves far backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Counters never wrap; any backward movement is reported as such
    Strict,
    /// 16-bit counter arithmetic for MACsec's truncated packet number:
    /// deltas are computed mod 2^16, so 0xffff -> 0x0000 is in order.
    /// Applies to MACsec flows only; ESP sequence numbers are 32-bit and
    /// stay strict under either policy.
    Modulo16,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        WrapPolicy::Strict
    }
}

struct SequenceState {
    last: u64,
}

/// FlowKey -> last observed counter, shared across decode passes
pub struct SequenceTracker {
    flows: DashMap<FlowKey, SequenceState, FnvBuildHasher>,
    wrap: WrapPolicy,
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new(WrapPolicy::default())
    }
}

impl SequenceTracker {
    pub fn new(wrap: WrapPolicy) -> Self {
        Self {
            flows: DashMap::with_hasher(FnvBuildHasher::default()),
            wrap,
        }
    }

    /// Record `counter` for `key` and compare it against the previous
    /// observation. The stored state always advances to the newest
    /// observation, gap or not; the tracker never waits to re-synchronize.
    pub fn observe(&self, key: FlowKey, counter: u64) -> GapReport {
        match self.flows.entry(key) {
            Entry::Vacant(slot) => {
                // nothing to compare against yet
                slot.insert(SequenceState { last: counter });
                GapReport::InOrder
            }
            Entry::Occupied(mut slot) => {
                let state = slot.get_mut();
                let report = compare(self.wrap, key, state.last, counter);
                state.last = counter;
                report
            }
        }
    }

    /// Number of flows seen so far
    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }
}

fn compare(wrap: WrapPolicy, key: FlowKey, last: u64, counter: u64) -> GapReport {
    match (wrap, key) {
        // the modular arithmetic is specific to MACsec's 16-bit packet
        // number; every other flow keeps full-width strict comparison
        (WrapPolicy::Modulo16, FlowKey::Macsec { .. }) => {
            let delta = (counter as u16).wrapping_sub(last as u16);
            match delta {
                0 => GapReport::Duplicate,
                1 => GapReport::InOrder,
                // the half-space convention of serial number arithmetic:
                // small forward deltas are loss, large ones reordering
                d if d < 0x8000 => GapReport::Loss {
                    missing: (d - 1) as u64,
                },
                d => GapReport::Reordered {
                    distance: d.wrapping_neg() as u64,
                },
            }
        }
        _ => {
            if counter == last {
                GapReport::Duplicate
            } else if counter == last + 1 {
                GapReport::InOrder
            } else if counter > last {
                GapReport::Loss {
                    missing: counter - last - 1,
                }
            } else {
                GapReport::Reordered {
                    distance: last - counter,
                }
            }
        }
    }
}
