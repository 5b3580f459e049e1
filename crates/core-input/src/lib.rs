//! Async input service: terminal key events into the runtime channel.

mod async_service;
mod key_token;

pub use async_service::AsyncInputShutdown;
pub use key_token::map_key_event;

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
