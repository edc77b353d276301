use crate::commands::{CloseRequest, Command, OpenRequest};
use crate::data_objects::{Channel, ChannelPoint, FormPatch};
use crate::error::DispatchError;
use crate::event_loop::{ClientRequest, EventLoop};
use crate::notifications::Notification;
use crate::store::ChannelState;
use futures::channel::{mpsc, oneshot};
use futures::SinkExt;
use log::*;
use tokio::sync::watch;

/// Buffer sizes for the reconciler's internal queues.
#[derive(Clone, Copy, Debug)]
pub struct ReconcilerConfig {
    /// Capacity of the client request queue.
    pub request_buffer: usize,
    /// Capacity of the inbound notification queue.
    pub notification_buffer: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        ReconcilerConfig { request_buffer: 16, notification_buffer: 32 }
    }
}

/// Creates the reconciliation components, namely:
///
/// - The [`ChannelClient`] for issuing lifecycle requests from anywhere within
///   your application.
/// - A sender for the transport layer to push backend [`Notification`]s into.
/// - A `watch` receiver of committed [`ChannelState`] snapshots for readers.
/// - The [`EventLoop`] driving reconciliation itself. Spawn `event_loop.run()`
///   on your runtime.
///
/// `commands` is the outbound sink: every lifecycle command the core issues is
/// enqueued there for the transport to deliver. The core never waits for a
/// backend acknowledgement.
pub fn new_reconciler(
    commands: mpsc::Sender<Command>,
    config: ReconcilerConfig,
) -> (ChannelClient, mpsc::Sender<Notification>, watch::Receiver<ChannelState>, EventLoop) {
    let (request_sender, request_receiver) = mpsc::channel(config.request_buffer);
    let (notification_sender, notification_receiver) = mpsc::channel(config.notification_buffer);
    let (state_sender, state_receiver) = watch::channel(ChannelState::default());
    let event_loop = EventLoop::new(request_receiver, notification_receiver, commands, state_sender);
    (ChannelClient { sender: request_sender }, notification_sender, state_receiver, event_loop)
}

/// A sender interface to the reconciliation event loop. It can be cheaply
/// cloned and shared among tasks.
///
/// **Importantly**, this struct does not do any work. It validates request
/// input and forwards the requests to the [`EventLoop`]; state
/// changes become visible on the `watch` channel once the loop commits them.
#[derive(Clone)]
pub struct ChannelClient {
    sender: mpsc::Sender<ClientRequest>,
}

impl ChannelClient {
    /// Merge-patch the staged open form. Only the supplied fields change.
    pub async fn set_channel_form(&mut self, patch: FormPatch) -> Result<(), DispatchError> {
        self.send(ClientRequest::PatchForm(patch)).await
    }

    /// Select (or clear, with `None`) the channel under inspection.
    pub async fn select_channel(&mut self, channel: Option<Channel>) -> Result<(), DispatchError> {
        self.send(ClientRequest::SelectChannel(channel)).await
    }

    /// Request a fresh channel snapshot. Idempotent: calling this while a
    /// request is already outstanding costs a redundant round-trip, nothing
    /// more.
    pub async fn get_channels(&mut self) -> Result<(), DispatchError> {
        self.send(ClientRequest::GetChannels).await
    }

    /// Validate and dispatch an open request. Fire-and-forget: a successful
    /// return means the request was handed to the event loop, not that the
    /// channel opened. Progress arrives as push notifications, which the core
    /// answers with refetches.
    pub async fn open_channel(&mut self, request: OpenRequest) -> Result<(), DispatchError> {
        request.validate()?;
        trace!("Submitting open request for counterparty {}", request.pubkey);
        self.send(ClientRequest::Open(request)).await
    }

    /// Validate and dispatch a close request. The composite channel point is
    /// split into its components here; a malformed one rejects the request
    /// before anything is dispatched or any flag is set.
    pub async fn close_channel(&mut self, request: CloseRequest) -> Result<(), DispatchError> {
        let force = request.force;
        let channel_point = request.channel_point.parse::<ChannelPoint>()?;
        trace!("Submitting close request for {channel_point}");
        self.send(ClientRequest::Close { channel_point, force }).await
    }

    /// Stop the event loop. Resolves once the loop has acknowledged.
    pub async fn shutdown(mut self) -> Result<(), DispatchError> {
        let (sender, receiver) = oneshot::channel();
        self.send(ClientRequest::Shutdown(sender)).await?;
        receiver.await.map_err(|_| DispatchError::CoreShutDown)
    }

    async fn send(&mut self, request: ClientRequest) -> Result<(), DispatchError> {
        self.sender.send(request).await.map_err(|_| DispatchError::CoreShutDown)
    }
}
