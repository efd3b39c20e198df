//! Placeable lifecycle events and their cross-thread ingress.
//!
//! Hosts running the engine on its own thread push events through a
//! cloneable [`EventSender`]; the engine drains them in arrival order on
//! its next [`pump`](crate::OverlayEngine::pump).

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use vantage_core::{Bounds, TokenId};

use crate::error::EngineError;

/// Something that happened to a placeable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaceableEvent {
    /// The placeable moved, resized, or changed elevation.
    Moved {
        /// Placeable that changed.
        id: TokenId,
        /// New pixel bounds.
        bounds: Bounds,
        /// New elevation in scene units.
        elevation: f64,
    },
    /// The placeable was deleted.
    Removed {
        /// Placeable that went away.
        id: TokenId,
    },
    /// The pointer entered or left the placeable.
    HoverChanged {
        /// Placeable under (or leaving) the pointer.
        id: TokenId,
        /// Whether it is now hovered.
        hovering: bool,
    },
    /// The local user took or released control of the placeable.
    ControlChanged {
        /// Placeable whose control changed.
        id: TokenId,
        /// Whether it is now controlled.
        controlled: bool,
    },
    /// A drag began; `preview` is a temporary copy of `original`.
    DragPreviewStarted {
        /// The temporary preview placeable.
        preview: TokenId,
        /// The placeable being dragged.
        original: TokenId,
    },
    /// A drag ended; the preview goes away.
    DragPreviewEnded {
        /// The temporary preview placeable.
        preview: TokenId,
        /// The placeable that was dragged.
        original: TokenId,
    },
}

impl PlaceableEvent {
    /// The placeable the event is primarily about.
    pub fn token(&self) -> TokenId {
        match *self {
            Self::Moved { id, .. }
            | Self::Removed { id }
            | Self::HoverChanged { id, .. }
            | Self::ControlChanged { id, .. } => id,
            Self::DragPreviewStarted { original, .. } | Self::DragPreviewEnded { original, .. } => {
                original
            }
        }
    }
}

/// Cloneable handle for submitting events from any thread.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: Sender<PlaceableEvent>,
}

impl EventSender {
    /// Queue an event for the next pump.
    pub fn send(&self, event: PlaceableEvent) -> Result<(), EngineError> {
        self.tx.send(event).map_err(|_| EngineError::IngressDisconnected)
    }
}

/// Receiving half owned by the engine.
#[derive(Debug)]
pub(crate) struct EventQueue {
    tx: Sender<PlaceableEvent>,
    rx: Receiver<PlaceableEvent>,
}

impl EventQueue {
    pub(crate) fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything queued so far, oldest first.
    pub(crate) fn drain(&self) -> Vec<PlaceableEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}
