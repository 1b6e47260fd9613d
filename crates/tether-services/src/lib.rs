//! # Tether Services
//!
//! Services are ordinary dependencies: they are provided into a slice slot,
//! resolved with everything else, then started in provision order and
//! stopped in reverse.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`service`] | The [`Service`] trait |
//! | [`context`] | [`ServiceContext`]: cancellation plus values passed between starts |
//! | [`runner`] | Sequential start, reverse stop, panic capture |
//! | [`lifecycle`] | [`Lifecycle`]: declare, resolve, start, wait, stop, reset |
//! | [`error`] | [`ServiceError`] |

pub mod context;
pub mod error;
pub mod lifecycle;
pub mod runner;
pub mod service;

pub use context::ServiceContext;
pub use error::{Result, ServiceError};
pub use lifecycle::{Lifecycle, SERVICES, Terminator};
pub use runner::Startup;
pub use service::Service;

/// Re-exported for implementing [`Service`]
pub use async_trait::async_trait;
