use crate::key_token::map_key_event;
use core_events::{Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{debug, info, trace, warn};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Spawn a Tokio task forwarding `crossterm::EventStream` key and resize
/// events into `sender`.
pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    spawn_with_stream(sender, EventStream::new())
}

pub(crate) fn spawn_with_stream<S>(
    sender: Sender<Event>,
    stream: S,
) -> (task::JoinHandle<()>, AsyncInputShutdown)
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    let (shutdown, listener) = ShutdownListener::new_pair();
    let handle = task::spawn(async move {
        AsyncEventStreamTask::new(sender, stream, listener)
            .run()
            .await;
    });
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S> {
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        let reason = loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => break ExitReason::ShutdownSignal,
                result = self.stream.next() => result,
            };
            let Some(result) = maybe_result else {
                break ExitReason::StreamEnded;
            };
            let event = match result {
                Ok(CEvent::Key(key)) => match map_key_event(&key) {
                    Some(mapped) => Event::Input(InputEvent::Key(mapped)),
                    None => {
                        trace!(target: "input.event", code = ?key.code, "key_ignored");
                        continue;
                    }
                },
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    Event::Input(InputEvent::Resize(w, h))
                }
                Ok(_) => continue,
                Err(err) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    break ExitReason::StreamError;
                }
            };
            if self.sender.send(event).await.is_err() {
                debug!(target: "input.thread", "event_channel_closed");
                break ExitReason::ChannelClosed;
            }
        };
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}
