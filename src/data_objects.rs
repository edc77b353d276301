use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An established payment channel, exactly as reported by the backend node.
///
/// Channels are only ever replaced wholesale by an incoming [`ChannelSnapshot`];
/// the core never patches individual fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub chan_id: u64,
    pub remote_pubkey: String,
    /// The funding outpoint in `txid:output_index` form, as delivered by the node.
    pub channel_point: String,
    pub capacity: u64,
    pub local_balance: u64,
    pub remote_balance: u64,
}

/// A channel that is mid-lifecycle: funding broadcast but unconfirmed, or a
/// close (cooperative or forced) still in flight. Which of the three it is, is
/// determined by the [`PendingChannels`] list it arrives in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChannel {
    pub remote_node_pub: String,
    pub channel_point: String,
    pub capacity: u64,
    pub local_balance: u64,
    pub remote_balance: u64,
    /// Funds in limbo while the lifecycle step completes.
    pub limbo_balance: u64,
}

/// The pending portion of a channel snapshot. Each pending channel belongs to
/// exactly one of the three lists; the backend does the categorization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChannels {
    pub total_limbo_balance: u64,
    pub pending_open_channels: Vec<PendingChannel>,
    pub pending_closing_channels: Vec<PendingChannel>,
    pub pending_force_closing_channels: Vec<PendingChannel>,
}

/// The aggregate returned by a `channels` list command. Applied to the store
/// atomically, replacing both lists; partial snapshots do not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    pub channels: Vec<Channel>,
    pub pending_channels: PendingChannels,
}

/// A parsed channel point: the on-chain funding output `funding_txid:output_index`.
///
/// The backend accepts close commands with the two components split out, so the
/// composite string is parsed (and validated) before dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPoint {
    pub funding_txid: String,
    pub output_index: u32,
}

impl FromStr for ChannelPoint {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((txid, index)) = s.split_once(':') else {
            return Err(DispatchError::invalid_channel_point(s, "Expected 'funding_txid:output_index'."));
        };
        if txid.is_empty() {
            return Err(DispatchError::invalid_channel_point(s, "The funding txid is empty."));
        }
        let output_index = index
            .parse::<u32>()
            .map_err(|e| DispatchError::invalid_channel_point(s, format!("Bad output index: {e}")))?;
        Ok(ChannelPoint { funding_txid: txid.to_string(), output_index })
    }
}

impl Display for ChannelPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.funding_txid, self.output_index)
    }
}

/// Staging area for a not-yet-submitted open request. The fields hold raw user
/// input as typed; nothing is validated until the request is dispatched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelForm {
    pub is_open: bool,
    pub node_key: String,
    pub local_amt: String,
    pub push_amt: String,
}

impl ChannelForm {
    /// Merge-patch semantics: only the fields present in the patch are
    /// overwritten, everything else is carried over unchanged.
    pub fn apply(&self, patch: FormPatch) -> ChannelForm {
        ChannelForm {
            is_open: patch.is_open.unwrap_or(self.is_open),
            node_key: patch.node_key.unwrap_or_else(|| self.node_key.clone()),
            local_amt: patch.local_amt.unwrap_or_else(|| self.local_amt.clone()),
            push_amt: patch.push_amt.unwrap_or_else(|| self.push_amt.clone()),
        }
    }
}

/// A partial update to a [`ChannelForm`]. `None` means "leave the field alone".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPatch {
    pub is_open: Option<bool>,
    pub node_key: Option<String>,
    pub local_amt: Option<String>,
    pub push_amt: Option<String>,
}
