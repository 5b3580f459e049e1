//! vimterm entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::Editor;
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, TickEventSource};
use core_render::{Frame, Renderer, TerminalRenderer};
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_text::Buffer;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_NAME: &str = "vimterm.log";

const WELCOME_LINES: [&str; 5] = [
    "What am I doing here?",
    "I'm kinda getting more and more bored",
    "But I'm getting work done and that's also fulfilling",
    "Lorem Ipsum",
    "Ladidah",
];

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vimterm", version, about = "Modal cursor editor in the terminal")]
struct Args {
    /// Optional file whose lines seed the buffer (read only). If omitted the welcome buffer is used.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `vimterm.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn welcome_buffer() -> Buffer {
    Buffer::from_str("welcome", &WELCOME_LINES.join("\n"))
}

fn load_buffer(path: Option<&Path>) -> Buffer {
    let Some(path) = path else {
        return welcome_buffer();
    };
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("file");
            let buffer = Buffer::from_str(name, &content);
            debug!(
                target: "io",
                file = %path.display(),
                size_bytes = content.len(),
                line_count = buffer.line_count(),
                "file_read_ok"
            );
            buffer
        }
        Err(e) => {
            error!(target: "io", file = %path.display(), ?e, "file_open_error");
            welcome_buffer()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    QuitChord,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::QuitChord => "quit_chord",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Break(ShutdownReason),
}

/// Owns the editor and renderer; consumes events until a quit condition.
struct EditorRuntime<R: Renderer> {
    editor: Editor,
    renderer: R,
    dirty: bool,
}

impl<R: Renderer> EditorRuntime<R> {
    fn new(editor: Editor, renderer: R) -> Self {
        Self {
            editor,
            renderer,
            dirty: true,
        }
    }

    fn handle_event(&mut self, event: &Event) -> LoopControl {
        match event {
            Event::Input(InputEvent::Key(key)) => {
                if key.is_quit_chord() {
                    info!(target: "runtime", key = %key, "quit_requested");
                    return LoopControl::Break(ShutdownReason::QuitChord);
                }
                match self.editor.handle_key(key) {
                    Ok(result) => self.dirty |= result.dirty,
                    Err(e) => error!(target: "runtime", key = %key, error = %e, "key_dispatch_error"),
                }
                LoopControl::Continue
            }
            Event::Input(InputEvent::Resize(w, h)) => {
                debug!(target: "runtime", w, h, "resize");
                self.renderer.resize(*w, *h);
                self.dirty = true;
                LoopControl::Continue
            }
            Event::Tick => {
                self.render_if_dirty();
                LoopControl::Continue
            }
        }
    }

    fn render_if_dirty(&mut self) {
        if !self.dirty {
            return;
        }
        let frame = Frame::from_state(&self.editor.snapshot());
        match self.renderer.render(&frame) {
            Ok(()) => {
                trace!(target: "render", bottom_bar = frame.bottom_bar.as_str(), "frame_painted");
                self.dirty = false;
            }
            Err(e) => error!(target: "render", ?e, "render_error"),
        }
    }
}

fn event_channel() -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
    mpsc::channel::<Event>(EVENT_CHANNEL_CAP)
}

async fn run_loop<R: Renderer>(
    runtime: &mut EditorRuntime<R>,
    rx: &mut mpsc::Receiver<Event>,
) -> ShutdownReason {
    let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
    let _enter = loop_span.enter();

    runtime.render_if_dirty();
    while let Some(event) = rx.recv().await {
        if let LoopControl::Break(reason) = runtime.handle_event(&event) {
            return reason;
        }
    }
    ShutdownReason::ChannelClosed
}

async fn join_with_timeout(handle: tokio::task::JoinHandle<()>, what: &'static str) {
    match tokio::time::timeout(Duration::from_millis(200), handle).await {
        Ok(Ok(())) => trace!(target: "runtime.shutdown", task = what, "task_stopped"),
        Ok(Err(err)) if err.is_cancelled() => {
            trace!(target: "runtime.shutdown", task = what, "task_cancelled")
        }
        Ok(Err(err)) => error!(target: "runtime.shutdown", task = what, ?err, "task_error"),
        Err(_) => warn!(target: "runtime.shutdown", task = what, "task_timeout"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let buffer = load_buffer(args.path.as_deref());
    info!(
        target: "runtime.startup",
        buffer = buffer.name.as_str(),
        line_count = buffer.line_count(),
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );
    let editor = Editor::new(buffer, Arc::new(config.binding_table()));

    let mut backend = CrosstermBackend::new();
    backend.set_title("vimterm")?;
    let (cols, rows) = backend.size()?;
    let _guard = backend.enter_guard()?;

    let (tx, mut rx) = event_channel();
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(config.frame_interval()));
    let source_handles = registry.spawn_all(&tx);
    drop(tx);

    let mut runtime = EditorRuntime::new(editor, TerminalRenderer::new(cols, rows));
    let reason = run_loop(&mut runtime, &mut rx).await;
    info!(target: "runtime.shutdown", reason = reason.as_str(), "begin");

    rx.close();
    for handle in source_handles {
        join_with_timeout(handle, "event_source").await;
    }
    input_shutdown.signal();
    join_with_timeout(input_task, "input").await;
    info!(target: "runtime.shutdown", reason = reason.as_str(), "complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyEvent;
    use core_events::{KeyCode, KeyModifiers};
    use core_state::Mode;

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Frame>,
        sizes: Vec<(u16, u16)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &Frame) -> Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }

        fn resize(&mut self, cols: u16, rows: u16) {
            self.sizes.push((cols, rows));
        }
    }

    fn runtime() -> EditorRuntime<RecordingRenderer> {
        EditorRuntime::new(
            Editor::with_default_bindings(welcome_buffer()),
            RecordingRenderer::default(),
        )
    }

    fn key(c: char) -> Event {
        Event::Input(InputEvent::Key(KeyEvent::char(c)))
    }

    #[test]
    fn welcome_buffer_has_demo_lines() {
        let buf = welcome_buffer();
        assert_eq!(buf.line_count(), 5);
        assert_eq!(buf.line(4), Some("Ladidah"));
    }

    #[test]
    fn unreadable_path_falls_back_to_welcome() {
        let buf = load_buffer(Some(Path::new("/definitely/not/here.txt")));
        assert_eq!(buf.name, "welcome");
        assert_eq!(buf.line_count(), 5);
    }

    #[test]
    fn tick_paints_only_when_dirty() {
        let mut rt = runtime();
        rt.handle_event(&Event::Tick);
        rt.handle_event(&Event::Tick);
        assert_eq!(rt.renderer.frames.len(), 1);

        rt.handle_event(&key('j'));
        rt.handle_event(&Event::Tick);
        assert_eq!(rt.renderer.frames.len(), 2);
        let last = &rt.renderer.frames[1];
        assert_eq!(last.cursor_pos.line, 1);
        assert_eq!(last.cursor_pos.column, 0);
    }

    #[test]
    fn insert_entry_shows_insert_bar() {
        let mut rt = runtime();
        rt.handle_event(&key('A'));
        rt.handle_event(&Event::Tick);
        let frame = rt.renderer.frames.last().unwrap();
        assert_eq!(frame.bottom_bar, "--insert--");
        assert_eq!(rt.editor.state().mode, Mode::Insert);
        // "What am I doing here?" is 21 chars; A lands on column 22.
        assert_eq!(frame.cursor_pos.column, 21);
    }

    #[test]
    fn quit_chord_breaks_before_dispatch() {
        let mut rt = runtime();
        let ctrl_q = Event::Input(InputEvent::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CTRL,
        )));
        assert_eq!(
            rt.handle_event(&ctrl_q),
            LoopControl::Break(ShutdownReason::QuitChord)
        );
        assert_eq!(rt.editor.state().cursor.column, 1);
    }

    #[test]
    fn resize_reaches_renderer_and_repaints() {
        let mut rt = runtime();
        rt.handle_event(&Event::Tick);
        rt.handle_event(&Event::Input(InputEvent::Resize(40, 12)));
        assert_eq!(rt.renderer.sizes, vec![(40, 12)]);
        rt.handle_event(&Event::Tick);
        assert_eq!(rt.renderer.frames.len(), 2);
    }

    #[tokio::test]
    async fn run_loop_drains_channel_until_quit() {
        let (tx, mut rx) = event_channel();
        assert_eq!(tx.max_capacity(), EVENT_CHANNEL_CAP);
        tx.send(key('l')).await.unwrap();
        tx.send(Event::Input(InputEvent::Resize(30, 10))).await.unwrap();
        tx.send(Event::Input(InputEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CTRL,
        ))))
        .await
        .unwrap();
        tx.send(key('l')).await.unwrap();

        let mut rt = runtime();
        let reason = run_loop(&mut rt, &mut rx).await;
        assert_eq!(reason, ShutdownReason::QuitChord);
        assert_eq!(rt.renderer.sizes, vec![(30, 10)]);
        // Initial paint only; keys after the quit chord stay queued.
        assert_eq!(rt.renderer.frames.len(), 1);
        assert_eq!(rt.editor.state().cursor.column, 2);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn run_loop_stops_when_senders_drop() {
        let (tx, mut rx) = event_channel();
        tx.send(key('j')).await.unwrap();
        tx.send(Event::Tick).await.unwrap();
        drop(tx);

        let mut rt = runtime();
        let reason = run_loop(&mut rt, &mut rx).await;
        assert_eq!(reason, ShutdownReason::ChannelClosed);
        assert_eq!(rt.renderer.frames.len(), 2);
        assert_eq!(rt.renderer.frames[1].cursor_pos.line, 1);
    }
}
