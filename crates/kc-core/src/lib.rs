//! # kc-core
//!
//! Core event types shared by the authentication crates.
//!
//! Authenticators report the outcome of each login attempt as a
//! security [`Event`] delivered to an [`EventListener`].
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - AU-3: Content of audit records

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod event;
pub mod listener;

pub use event::{errors, details, Event, EventBuilder, EventOutcome, EventType};
pub use listener::{EventListener, InMemoryEventListener, TracingEventListener};
