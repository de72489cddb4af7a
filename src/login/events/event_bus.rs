//! # Event Bus
//!
//! Central event distribution for decoupled communication between the
//! login flow and its observers using the observer pattern.

use super::model_events::AuthEvent;

/// Type alias for auth event handlers to reduce complexity
pub type AuthEventHandler = Box<dyn Fn(&AuthEvent) + Send + Sync>;

/// Event bus for decoupled communication between components
pub trait EventBus: Send + Sync {
    /// Publish an auth event
    fn publish(&mut self, event: AuthEvent);

    /// Subscribe to auth events
    fn subscribe(&mut self, handler: AuthEventHandler);
}

/// Simple in-memory event bus implementation
pub struct SimpleEventBus {
    handlers: Vec<AuthEventHandler>,
}

impl SimpleEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for SimpleEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for SimpleEventBus {
    fn publish(&mut self, event: AuthEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    fn subscribe(&mut self, handler: AuthEventHandler) {
        self.handlers.push(handler);
    }
}
