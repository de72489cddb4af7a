//! # Events Module
//!
//! Re-exports all event system components organized by category.

pub mod event_bus;
pub mod model_events;
pub mod types;

// Re-export all types for easy access
pub use event_bus::{AuthEventHandler, EventBus, SimpleEventBus};
pub use model_events::AuthEvent;
pub use types::{DeliveryChannel, FlowState};
