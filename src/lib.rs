//! Client-side reconciliation core for payment channel lifecycles.
//!
//! This crate sits between a user-facing application and a long-running ledger
//! node. It issues lifecycle commands (list, open, close) over an abstract
//! transport, ingests the out-of-order push notifications the node emits as
//! those commands progress, and maintains the one consistent, read-optimized
//! view of channel state the application observes.
//!
//! The reconciliation strategy is refetch-on-notify: rather than merging each
//! notification into local state, every lifecycle event is treated purely as a
//! signal to request a fresh snapshot. The snapshot replaces the channel lists
//! wholesale, so local state can never drift from backend truth under
//! reordered or redelivered notifications.
//!
//! The moving parts:
//!
//! - [`ChannelClient`]: validates and forwards lifecycle requests.
//! - [`EventLoop`]: the single writer, applying pure [`store`] transitions in
//!   arrival order and routing notifications to refetches.
//! - [`selectors::ChannelViews`]: memoized derived views over committed
//!   snapshots, keyed by store version.
//!
//! Wire the core up with [`new_reconciler`], handing it the transport's
//! command sink and spawning the returned event loop.

pub mod commands;
pub mod data_objects;
pub mod error;
mod event_loop;
pub mod notifications;
pub mod selectors;
pub mod store;

mod client;

pub use client::{new_reconciler, ChannelClient, ReconcilerConfig};
pub use event_loop::EventLoop;
