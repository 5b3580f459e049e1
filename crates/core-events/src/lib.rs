//! Core event types and async event sources for vimterm.
//!
//! Key events here are host-neutral: the terminal input task translates
//! crossterm events into them, tests build them directly. The editor core
//! only ever sees `KeyEvent::key_identifier()`.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Bounded capacity for the runtime event channel. A single producer (input)
/// and single consumer (event loop) keep this far from full in practice.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Periodic frame tick; the loop repaints on it when the frame is dirty.
    Tick,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// A single key press as delivered by the host.
///
/// `prevent_default` records the host-side request to suppress any default
/// handling of the key; terminal hosts have none, so it is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
    pub prevent_default: bool,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self {
            code,
            mods,
            prevent_default: true,
        }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub fn esc() -> Self {
        Self::new(KeyCode::Esc, KeyModifiers::empty())
    }

    /// Logical key identifier: the character itself for printable keys, a
    /// DOM-style name (`"Escape"`, `"ArrowUp"`, ...) for named keys. Named
    /// identifiers are never a single char, so they cannot collide with
    /// single-character bindings.
    pub fn key_identifier(&self) -> Cow<'static, str> {
        match self.code {
            KeyCode::Char(c) => Cow::Owned(c.to_string()),
            KeyCode::Enter => Cow::Borrowed("Enter"),
            KeyCode::Esc => Cow::Borrowed("Escape"),
            KeyCode::Backspace => Cow::Borrowed("Backspace"),
            KeyCode::Tab => Cow::Borrowed("Tab"),
            KeyCode::Up => Cow::Borrowed("ArrowUp"),
            KeyCode::Down => Cow::Borrowed("ArrowDown"),
            KeyCode::Left => Cow::Borrowed("ArrowLeft"),
            KeyCode::Right => Cow::Borrowed("ArrowRight"),
        }
    }

    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Esc
    }

    /// Host-level quit chord (Ctrl-C / Ctrl-Q). Never forwarded to the editor.
    pub fn is_quit_chord(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
            && matches!(self.code, KeyCode::Char('c') | KeyCode::Char('q'))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
/// Trait implemented by any async event producer. Implementors spawn one
/// background task that pushes `Event`s into the shared channel and stop once
/// `tx.send(..)` fails (consumer dropped).
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used for logging.
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
#[derive(Default)]
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    /// Spawn every registered source with its own `Sender` clone. Draining the
    /// registry makes a second call a no-op.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            tracing::info!(target: "runtime.events", source = src.name(), "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Frame tick source: emits `Event::Tick` every `interval`.
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}
