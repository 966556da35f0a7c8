//! Star notifications, platform input and the document keyboard listener.
//!
//! Interactive stars turn platform input into three bubbling notifications
//! carrying the star's 1-based position. While a star holds focus it also owns
//! one document-level keydown listener, held as a [`KeyListenerGuard`] so that
//! every exit path (blur, disable, teardown) releases it.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::OrdinalError;
use crate::value::STAR_COUNT;

/// 1-based star position within a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct StarOrdinal(u8);

impl StarOrdinal {
    /// All five ordinals in child order.
    pub const ALL: [StarOrdinal; STAR_COUNT] = [
        StarOrdinal(1),
        StarOrdinal(2),
        StarOrdinal(3),
        StarOrdinal(4),
        StarOrdinal(5),
    ];

    pub fn new(ordinal: usize) -> Result<Self, OrdinalError> {
        if (1..=STAR_COUNT).contains(&ordinal) {
            Ok(Self(ordinal as u8))
        } else {
            Err(OrdinalError(ordinal))
        }
    }

    /// Ordinal of the star at a zero-based child index.
    pub fn from_index(index: usize) -> Result<Self, OrdinalError> {
        Self::new(index + 1)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn index(self) -> usize {
        self.get() - 1
    }

    pub fn all() -> impl Iterator<Item = StarOrdinal> {
        Self::ALL.into_iter()
    }
}

impl TryFrom<usize> for StarOrdinal {
    type Error = OrdinalError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarOrdinal> for usize {
    fn from(ordinal: StarOrdinal) -> Self {
        ordinal.get()
    }
}

impl fmt::Display for StarOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of notification an interactive star emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarEventKind {
    HoverEnter,
    HoverLeave,
    Activate,
}

impl StarEventKind {
    /// DOM event type.
    pub fn event_name(self) -> &'static str {
        match self {
            Self::HoverEnter => "star-hover-enter",
            Self::HoverLeave => "star-hover-leave",
            Self::Activate => "star-activate",
        }
    }
}

/// A notification emitted by an interactive star. Always bubbles; the
/// detail payload is the star's ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEvent {
    pub kind: StarEventKind,
    pub ordinal: StarOrdinal,
}

impl StarEvent {
    pub fn new(kind: StarEventKind, ordinal: StarOrdinal) -> Self {
        Self { kind, ordinal }
    }

    pub fn name(&self) -> &'static str {
        self.kind.event_name()
    }

    pub fn bubbles(&self) -> bool {
        true
    }

    pub fn detail(&self) -> usize {
        self.ordinal.get()
    }
}

/// Receiver for star notifications.
pub trait EventSink {
    fn emit(&mut self, event: StarEvent);
}

impl EventSink for Vec<StarEvent> {
    fn emit(&mut self, event: StarEvent) {
        self.push(event);
    }
}

/// Keyboard key as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            other => Self::Other(other.to_string()),
        }
    }

    /// Keys that activate a focused star.
    pub fn activates(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Platform input delivered to a star.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    Focus,
    Blur,
    PointerEnter,
    PointerLeave,
    Click,
    KeyDown { key: Key },
}

/// What the host should do with the platform event after the star handled it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Suppress the platform's default action.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: EventOutcome = EventOutcome {
        prevent_default: false,
    };

    pub fn prevent_default() -> Self {
        Self {
            prevent_default: true,
        }
    }
}

/// Handle of one attached document-level listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Platform capability for document-level keydown listeners.
pub trait KeyListenerHost {
    /// Attach a keydown listener on behalf of the star at `ordinal`.
    fn attach(&mut self, ordinal: StarOrdinal) -> ListenerId;

    /// Detach a listener previously returned by `attach`.
    fn detach(&mut self, id: ListenerId);
}

/// Shared handle to the document's keydown listener registry.
#[derive(Clone)]
pub struct DocumentListeners {
    host: Rc<RefCell<dyn KeyListenerHost>>,
}

impl DocumentListeners {
    pub fn new(host: impl KeyListenerHost + 'static) -> Self {
        Self {
            host: Rc::new(RefCell::new(host)),
        }
    }

    /// Wrap a registry the caller keeps its own handle to.
    pub fn from_shared<H: KeyListenerHost + 'static>(host: Rc<RefCell<H>>) -> Self {
        Self { host }
    }

    /// Attach a listener and tie its lifetime to the returned guard.
    pub fn acquire(&self, ordinal: StarOrdinal) -> KeyListenerGuard {
        let id = self.host.borrow_mut().attach(ordinal);
        log::debug!("Attached document key listener {} for star {}", id.0, ordinal);
        KeyListenerGuard {
            host: Rc::clone(&self.host),
            id,
        }
    }
}

impl fmt::Debug for DocumentListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentListeners").finish_non_exhaustive()
    }
}

/// An attached document keydown listener. Detaches on drop.
pub struct KeyListenerGuard {
    host: Rc<RefCell<dyn KeyListenerHost>>,
    id: ListenerId,
}

impl KeyListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for KeyListenerGuard {
    fn drop(&mut self) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => {
                host.detach(self.id);
                log::debug!("Detached document key listener {}", self.id.0);
            }
            Err(_) => log::warn!(
                "Key listener registry busy, listener {} not detached",
                self.id.0
            ),
        }
    }
}

impl fmt::Debug for KeyListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyListenerGuard")
            .field("id", &self.id)
            .finish()
    }
}

/// In-memory listener registry that tracks what is currently attached.
#[derive(Debug, Default)]
pub struct MemoryKeyListeners {
    next_id: u64,
    active: BTreeSet<ListenerId>,
    total_attached: usize,
}

impl MemoryKeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners currently attached.
    pub fn active(&self) -> usize {
        self.active.len()
    }

    /// Number of attach calls since creation.
    pub fn total_attached(&self) -> usize {
        self.total_attached
    }
}

impl KeyListenerHost for MemoryKeyListeners {
    fn attach(&mut self, _ordinal: StarOrdinal) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.insert(id);
        self.total_attached += 1;
        id
    }

    fn detach(&mut self, id: ListenerId) {
        self.active.remove(&id);
    }
}
