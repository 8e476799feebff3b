//! Core primitives for the course toolbox.
//!
//! This crate provides the small set of building blocks the editing engine is
//! assembled from:
//!
//! - **Signal/Slot System**: Type-safe notification with connection ids
//! - **Subscriptions**: Scoped connection guards and bundled subscription sets
//!   that detach together
//! - **Runtime**: Access to the tokio runtime the engine spawns onto, plus
//!   delayed (deferred) tasks
//! - **Logging**: Tracing targets and a performance span helper
//!
//! # Signal/Slot Example
//!
//! ```
//! use course_toolbox_core::Signal;
//!
//! let title_changed = Signal::<String>::new();
//!
//! let conn_id = title_changed.connect(|title| {
//!     println!("Title changed to: {}", title);
//! });
//!
//! title_changed.emit("Week 1".to_string());
//! title_changed.disconnect(conn_id);
//! ```
//!
//! # Subscription Set Example
//!
//! ```
//! use std::sync::Arc;
//! use course_toolbox_core::{Signal, SubscriptionSet};
//!
//! let blurred = Arc::new(Signal::<()>::new());
//! let submitted = Arc::new(Signal::<String>::new());
//!
//! let mut subscriptions = SubscriptionSet::new();
//! subscriptions.push(blurred.connect_guarded(|_| {}));
//! subscriptions.push(submitted.connect_guarded(|_| {}));
//! assert_eq!(subscriptions.active_count(), 2);
//!
//! // One call detaches everything that was acquired together.
//! subscriptions.release();
//! assert_eq!(blurred.connection_count(), 0);
//! assert_eq!(submitted.connection_count(), 0);
//! ```

mod error;
pub mod logging;
pub mod runtime;
pub mod signal;

pub use error::{CoreError, Result};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal, Subscription, SubscriptionSet};
