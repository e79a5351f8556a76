//! # Layerkit Core
//!
//! Core types shared by every Layerkit crate:
//! the unified error type and the editor event bus through which the
//! document engine announces changes to the presentation layer.

pub mod error;
pub mod event_bus;

pub use error::{Error, Result, TransportError};

pub use event_bus::{
    DocumentEvent, EditorEvent, EventBus, EventCategory, EventFilter, HistoryEvent,
    PersistenceEvent, SelectionEvent, SessionEvent, SubscriptionId,
};
