use thiserror::Error;

/// Errors raised when a lifecycle request is rejected before dispatch.
///
/// Backend-side failures never surface here. The backend reports them as push
/// notifications, which the core absorbs into a refetch; the resulting snapshot
/// is the only place consumers can observe the outcome.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("A counterparty node key is required to open a channel.")]
    MissingNodeKey,
    #[error("The local funding amount must be greater than zero.")]
    InvalidAmount,
    #[error("Invalid channel point '{value}'. {reason}")]
    InvalidChannelPoint { value: String, reason: String },
    #[error("The reconciliation core has shut down and cannot accept requests.")]
    CoreShutDown,
}

impl DispatchError {
    pub fn invalid_channel_point<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        DispatchError::InvalidChannelPoint { value: value.into(), reason: reason.into() }
    }
}
