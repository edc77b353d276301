use crate::data_objects::ChannelSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Which lifecycle flow a push notification belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleFlow {
    Open,
    Close,
}

impl Display for LifecycleFlow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleFlow::Open => write!(f, "open"),
            LifecycleFlow::Close => write!(f, "close"),
        }
    }
}

/// Push notifications emitted by the backend node as lifecycle commands make
/// progress. They arrive at-least-once and in no particular order.
///
/// Apart from [`Notification::Channels`], every variant is routed identically:
/// it is a signal that backend truth has moved, answered with a fresh list
/// request. The payloads on update/status/error events are carried for
/// logging but never influence routing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// The response to a `channels` list command.
    Channels(ChannelSnapshot),
    /// The open command completed.
    OpenSuccess,
    /// A streamed progress update for an in-flight open.
    OpenUpdate(serde_json::Value),
    /// The open event stream ended.
    OpenEnd,
    /// The backend reported an open failure.
    OpenError(String),
    /// A generic status message for the open flow.
    OpenStatus(serde_json::Value),
    /// The close command completed.
    CloseSuccess,
    /// A streamed progress update for an in-flight close.
    CloseUpdate(serde_json::Value),
    /// The close event stream ended.
    CloseEnd,
    /// The backend reported a close failure.
    CloseError(String),
    /// A generic status message for the close flow.
    CloseStatus(serde_json::Value),
}

impl Notification {
    /// Total classification over the notification vocabulary. `None` exactly
    /// for list responses; every lifecycle event, errors included, maps to a
    /// flow and thus to the same reaction.
    pub fn flow(&self) -> Option<LifecycleFlow> {
        match self {
            Notification::Channels(_) => None,
            Notification::OpenSuccess
            | Notification::OpenUpdate(_)
            | Notification::OpenEnd
            | Notification::OpenError(_)
            | Notification::OpenStatus(_) => Some(LifecycleFlow::Open),
            Notification::CloseSuccess
            | Notification::CloseUpdate(_)
            | Notification::CloseEnd
            | Notification::CloseError(_)
            | Notification::CloseStatus(_) => Some(LifecycleFlow::Close),
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::Channels(snap) => {
                write!(f, "Channels({} open, {} pending-open)", snap.channels.len(), snap.pending_channels.pending_open_channels.len())
            }
            Notification::OpenSuccess => write!(f, "OpenSuccess"),
            Notification::OpenUpdate(_) => write!(f, "OpenUpdate"),
            Notification::OpenEnd => write!(f, "OpenEnd"),
            Notification::OpenError(err) => write!(f, "OpenError: {err}"),
            Notification::OpenStatus(_) => write!(f, "OpenStatus"),
            Notification::CloseSuccess => write!(f, "CloseSuccess"),
            Notification::CloseUpdate(_) => write!(f, "CloseUpdate"),
            Notification::CloseEnd => write!(f, "CloseEnd"),
            Notification::CloseError(err) => write!(f, "CloseError: {err}"),
            Notification::CloseStatus(_) => write!(f, "CloseStatus"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn lifecycle_events() -> Vec<(Notification, LifecycleFlow)> {
        vec![
            (Notification::OpenSuccess, LifecycleFlow::Open),
            (Notification::OpenUpdate(json!({"confirmations": 1})), LifecycleFlow::Open),
            (Notification::OpenEnd, LifecycleFlow::Open),
            (Notification::OpenError("insufficient funds".to_string()), LifecycleFlow::Open),
            (Notification::OpenStatus(json!("pending")), LifecycleFlow::Open),
            (Notification::CloseSuccess, LifecycleFlow::Close),
            (Notification::CloseUpdate(json!({"confirmations": 3})), LifecycleFlow::Close),
            (Notification::CloseEnd, LifecycleFlow::Close),
            (Notification::CloseError("peer offline".to_string()), LifecycleFlow::Close),
            (Notification::CloseStatus(json!(null)), LifecycleFlow::Close),
        ]
    }

    #[test]
    fn every_lifecycle_event_classifies() {
        let events = lifecycle_events();
        assert_eq!(events.len(), 10);
        for (event, expected) in events {
            assert_eq!(event.flow(), Some(expected), "{event}");
        }
    }

    #[test]
    fn list_responses_are_not_lifecycle_events() {
        assert_eq!(Notification::Channels(ChannelSnapshot::default()).flow(), None);
    }

    #[test]
    fn classification_ignores_payload_content() {
        let a = Notification::OpenUpdate(json!({"anything": [1, 2, 3]}));
        let b = Notification::OpenUpdate(json!(null));
        assert_eq!(a.flow(), b.flow());
        let a = Notification::CloseError("timeout".to_string());
        let b = Notification::CloseError(String::new());
        assert_eq!(a.flow(), b.flow());
    }
}
