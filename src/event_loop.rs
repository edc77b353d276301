use crate::commands::{Command, OpenRequest};
use crate::data_objects::{Channel, ChannelPoint, FormPatch};
use crate::notifications::Notification;
use crate::store::{reduce, Action, ChannelState};
use futures::channel::{mpsc, oneshot};
use futures::{SinkExt, StreamExt};
use log::*;
use tokio::sync::watch;

/// Requests forwarded from [`ChannelClient`](crate::ChannelClient) handles to
/// the event loop. Open and close requests arrive pre-validated; anything
/// malformed was rejected on the client side and never reaches the loop.
#[derive(Debug)]
pub(crate) enum ClientRequest {
    PatchForm(FormPatch),
    SelectChannel(Option<Channel>),
    GetChannels,
    Open(OpenRequest),
    Close { channel_point: ChannelPoint, force: bool },
    Shutdown(oneshot::Sender<()>),
}

/// The single writer for channel state.
///
/// The loop owns the [`ChannelState`] aggregate and serializes every mutation:
/// client requests and transport notifications are processed strictly in
/// arrival order, and each transition runs to completion before the next is
/// applied. Committed snapshots are published on a `watch` channel, so readers
/// only ever observe whole transitions.
///
/// Lifecycle notifications are not merged into state. Whatever the event says
/// (progress, completion, or error), the reaction is the same: dispatch a
/// fresh list command and let the snapshot that answers it replace the channel
/// lists wholesale. When refetches overlap, the last snapshot received wins.
pub struct EventLoop {
    state: ChannelState,
    requests: mpsc::Receiver<ClientRequest>,
    notifications: mpsc::Receiver<Notification>,
    commands: mpsc::Sender<Command>,
    published: watch::Sender<ChannelState>,
}

impl EventLoop {
    pub(crate) fn new(
        requests: mpsc::Receiver<ClientRequest>,
        notifications: mpsc::Receiver<Notification>,
        commands: mpsc::Sender<Command>,
        published: watch::Sender<ChannelState>,
    ) -> Self {
        EventLoop { state: ChannelState::default(), requests, notifications, commands, published }
    }

    /// Drive the reconciliation loop until a shutdown request arrives or both
    /// input channels close.
    pub async fn run(mut self) {
        debug!("Channel reconciliation loop started.");
        loop {
            futures::select! {
                request = self.requests.next() => match request {
                    Some(request) => {
                        if !self.handle_request(request).await {
                            break;
                        }
                    }
                    None => break,
                },
                notification = self.notifications.next() => match notification {
                    Some(notification) => self.handle_notification(notification).await,
                    None => break,
                },
            }
        }
        debug!("Channel reconciliation loop stopped.");
    }

    /// Returns false when the loop should stop.
    async fn handle_request(&mut self, request: ClientRequest) -> bool {
        match request {
            ClientRequest::PatchForm(patch) => self.apply(Action::PatchForm(patch)),
            ClientRequest::SelectChannel(channel) => self.apply(Action::SelectChannel(channel)),
            ClientRequest::GetChannels => self.request_list().await,
            ClientRequest::Open(request) => {
                // The flag commits before the command reaches the transport, so
                // readers see the in-flight state as soon as dispatch returns.
                self.apply(Action::OpeningRequested);
                self.send_command(request.into_command()).await;
            }
            ClientRequest::Close { channel_point, force } => {
                self.apply(Action::ClosingRequested);
                self.send_command(Command::CloseChannel { channel_point, force }).await;
            }
            ClientRequest::Shutdown(ack) => {
                debug!("Shutdown requested.");
                let _ = ack.send(());
                return false;
            }
        }
        true
    }

    async fn handle_notification(&mut self, notification: Notification) {
        match notification {
            Notification::Channels(snapshot) => {
                debug!(
                    "Snapshot received: {} channels, {} pending-open, {} pending-closing, {} pending-force-closing",
                    snapshot.channels.len(),
                    snapshot.pending_channels.pending_open_channels.len(),
                    snapshot.pending_channels.pending_closing_channels.len(),
                    snapshot.pending_channels.pending_force_closing_channels.len(),
                );
                self.apply(Action::ListReceived(snapshot));
            }
            event => {
                match event.flow() {
                    Some(flow) => debug!("{flow}-flow event: {event}. Refreshing channel list."),
                    None => warn!("Unclassified notification: {event}. Refreshing channel list anyway."),
                }
                self.request_list().await;
            }
        }
    }

    async fn request_list(&mut self) {
        self.apply(Action::ListRequested);
        self.send_command(Command::Channels).await;
    }

    fn apply(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
        self.published.send_replace(self.state.clone());
    }

    async fn send_command(&mut self, command: Command) {
        trace!("Enqueueing command for transport: {command}");
        if let Err(err) = self.commands.send(command).await {
            // The transport is gone. The in-flight flag stays set; there is no
            // retry at this layer.
            warn!("Could not hand command to the transport: {err}");
        }
    }
}
