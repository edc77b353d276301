use crate::data_objects::{Channel, PendingChannel};
use crate::store::ChannelState;
use std::sync::Arc;

/// A single row in the merged channel list: either an established channel or a
/// pending one, tagged with which lifecycle list it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEntry {
    Open(Channel),
    PendingOpen(PendingChannel),
    PendingClosing(PendingChannel),
    PendingForceClosing(PendingChannel),
}

/// Memoized derived views over committed [`ChannelState`] snapshots.
///
/// Each reader owns its own `ChannelViews`; the cache is keyed by the state's
/// version, so a view is recomputed exactly once per commit and otherwise
/// returned as a cheap `Arc` clone. The computations never mutate the snapshot
/// and run in time linear in the number of channels.
#[derive(Debug, Default)]
pub struct ChannelViews {
    all_channels: Option<(u64, Arc<[ChannelEntry]>)>,
    channel_ids: Option<(u64, Arc<[u64]>)>,
}

impl ChannelViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// The merged channel list in fixed order: established channels, then
    /// pending-open, pending-closing and pending-force-closing. The order is
    /// deterministic given the snapshot; no sorting is applied.
    pub fn all_channels(&mut self, state: &ChannelState) -> Arc<[ChannelEntry]> {
        if let Some((version, cached)) = &self.all_channels {
            if *version == state.version {
                return Arc::clone(cached);
            }
        }
        let pending = &state.pending_channels;
        let merged: Arc<[ChannelEntry]> = state
            .channels
            .iter()
            .cloned()
            .map(ChannelEntry::Open)
            .chain(pending.pending_open_channels.iter().cloned().map(ChannelEntry::PendingOpen))
            .chain(pending.pending_closing_channels.iter().cloned().map(ChannelEntry::PendingClosing))
            .chain(pending.pending_force_closing_channels.iter().cloned().map(ChannelEntry::PendingForceClosing))
            .collect();
        self.all_channels = Some((state.version, Arc::clone(&merged)));
        merged
    }

    /// Identifiers of established channels only; pending entries have no id
    /// yet and are excluded.
    pub fn channel_ids(&mut self, state: &ChannelState) -> Arc<[u64]> {
        if let Some((version, cached)) = &self.channel_ids {
            if *version == state.version {
                return Arc::clone(cached);
            }
        }
        let ids: Arc<[u64]> = state.channels.iter().map(|c| c.chan_id).collect();
        self.channel_ids = Some((state.version, Arc::clone(&ids)));
        ids
    }

    /// True iff a channel is selected for detail display.
    pub fn is_detail_open(state: &ChannelState) -> bool {
        state.selected.is_some()
    }
}
