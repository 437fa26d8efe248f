//! # Result Bridge Core
//!
//! Transport-agnostic building blocks for rendering application results at
//! an HTTP boundary.
//!
//! Handlers report what happened through a [`ResultEnvelope`]: an output, a
//! list of [`Notification`]s, or both. The web layer turns that envelope into
//! a status, body and headers. This crate holds everything that does not
//! need to know about HTTP:
//!
//! - **Outcome taxonomy** ([`effect`]): notification effects and the explicit
//!   priority table used to pick a single winner among conflicting outcomes.
//! - **Data model** ([`notification`], [`envelope`], [`page`]).
//! - **Pagination** ([`pagination`]): range bounds and RFC 5988 style links.
//! - **Correlation** ([`correlation`]): request-scoped ambient correlation
//!   ids built on task-local storage.
//!
//! ## Example
//!
//! ```
//! use result_bridge_core::{effect::resolve_effect, Notification, NotificationEffect};
//!
//! let notes = [
//!     Notification::validation("email", "Email is required"),
//!     Notification::not_found("customer 7 not found"),
//! ];
//!
//! let winner = resolve_effect(notes.iter().map(Notification::effect));
//! assert_eq!(winner, Some(NotificationEffect::NotFound));
//! ```

pub mod correlation;
pub mod effect;
pub mod envelope;
pub mod notification;
pub mod page;
pub mod pagination;

// Re-export commonly used types
pub use correlation::CorrelationId;
pub use effect::NotificationEffect;
pub use envelope::{Output, ResultEnvelope};
pub use notification::Notification;
pub use page::{PageDescriptor, PageError};
