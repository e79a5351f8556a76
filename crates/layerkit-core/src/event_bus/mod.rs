//! # Event Bus Module
//!
//! Publish/subscribe channel between the document engine and the
//! presentation layer:
//! - The editor session publishes typed events after each command
//! - Subscribers filter by category and receive events of interest
//! - Supports both synchronous handlers and async `broadcast` receivers
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use layerkit_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter, HistoryEvent};
//!
//! let bus = Arc::new(EventBus::new());
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::History]),
//!     |event| println!("{}", event.description()),
//! );
//!
//! bus.publish(EditorEvent::History(HistoryEvent::Cleared));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
