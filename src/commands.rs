use crate::data_objects::ChannelPoint;
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Lifecycle commands that the core hands to the backend transport.
///
/// The wire form is a tagged message: `{"msg": <kind>, "data": <payload>}`.
/// Dispatch is fire-and-forget; the core's obligation ends once the command is
/// enqueued, and the outcome is only ever observed through a later snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", content = "data")]
pub enum Command {
    /// Request a full channel snapshot.
    #[serde(rename = "channels")]
    Channels,
    /// Open a new channel to `pubkey`, funding it with `localamt` and pushing
    /// `pushamt` to the counterparty.
    #[serde(rename = "openChannel")]
    OpenChannel { pubkey: String, localamt: u64, pushamt: u64 },
    /// Close the channel anchored at `channel_point`.
    #[serde(rename = "closeChannel")]
    CloseChannel { channel_point: ChannelPoint, force: bool },
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Channels => write!(f, "channels"),
            Command::OpenChannel { pubkey, localamt, pushamt } => {
                write!(f, "openChannel(to {pubkey}, local {localamt}, push {pushamt})")
            }
            Command::CloseChannel { channel_point, force } => {
                let kind = if *force { "force" } else { "cooperative" };
                write!(f, "closeChannel({channel_point}, {kind})")
            }
        }
    }
}

/// A validated request to open a channel. Field values travel to the backend
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenRequest {
    pub pubkey: String,
    pub localamt: u64,
    /// Amount pushed to the counterparty on open. May be zero.
    pub pushamt: u64,
}

impl OpenRequest {
    /// A counterparty key must be present and the local amount positive. A
    /// request that fails here is never dispatched and sets no flag.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.pubkey.trim().is_empty() {
            return Err(DispatchError::MissingNodeKey);
        }
        if self.localamt == 0 {
            return Err(DispatchError::InvalidAmount);
        }
        Ok(())
    }

    pub(crate) fn into_command(self) -> Command {
        Command::OpenChannel { pubkey: self.pubkey, localamt: self.localamt, pushamt: self.pushamt }
    }
}

/// A request to close the channel anchored at `channel_point` (the composite
/// `funding_txid:output_index` string).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseRequest {
    pub channel_point: String,
    pub force: bool,
}

impl CloseRequest {
    /// Closes default to force-close.
    pub fn new<S: Into<String>>(channel_point: S) -> Self {
        CloseRequest { channel_point: channel_point.into(), force: true }
    }

    pub fn cooperative(mut self) -> Self {
        self.force = false;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_wire_format() {
        let wire = serde_json::to_value(&Command::Channels).unwrap();
        assert_eq!(wire, json!({ "msg": "channels" }));
    }

    #[test]
    fn open_wire_format() {
        let cmd = OpenRequest { pubkey: "02abc".to_string(), localamt: 50_000, pushamt: 0 }.into_command();
        let wire = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            wire,
            json!({
                "msg": "openChannel",
                "data": { "pubkey": "02abc", "localamt": 50_000, "pushamt": 0 }
            })
        );
    }

    #[test]
    fn close_wire_format() {
        let request = CloseRequest::new("abcd1234:2");
        let channel_point = request.channel_point.parse::<ChannelPoint>().unwrap();
        let cmd = Command::CloseChannel { channel_point, force: request.force };
        let wire = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            wire,
            json!({
                "msg": "closeChannel",
                "data": {
                    "channel_point": { "funding_txid": "abcd1234", "output_index": 2 },
                    "force": true
                }
            })
        );
    }

    #[test]
    fn close_defaults_to_force() {
        assert!(CloseRequest::new("aa:0").force);
        assert!(!CloseRequest::new("aa:0").cooperative().force);
    }

    #[test]
    fn open_request_validation() {
        let valid = OpenRequest { pubkey: "02abc".to_string(), localamt: 1, pushamt: 0 };
        assert!(valid.validate().is_ok());
        let no_key = OpenRequest { pubkey: "  ".to_string(), localamt: 1, pushamt: 0 };
        assert_eq!(no_key.validate(), Err(DispatchError::MissingNodeKey));
        let no_funds = OpenRequest { pubkey: "02abc".to_string(), localamt: 0, pushamt: 0 };
        assert_eq!(no_funds.validate(), Err(DispatchError::InvalidAmount));
    }
}
