//! Slimbar renders a slim, trickling "loading" bar (plus an optional spinner)
//! into a DOM container and drives it through a small progress state machine.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use slimbar::{MemoryDocument, Options, SlimBar};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() {
//! let document = Arc::new(MemoryDocument::new());
//! let bar = SlimBar::new(document.clone());
//! bar.configure(Options::new().speed(10).trickle_speed(20));
//!
//! // Route change begins: the bar appears and trickles forward on its own.
//! bar.start();
//! tokio::time::sleep(Duration::from_millis(45)).await;
//! assert!(bar.status().unwrap() > 0.08);
//!
//! // Route change ends: the bar completes, fades out and is removed.
//! bar.done();
//! tokio::time::sleep(Duration::from_millis(50)).await;
//! assert!(document.query_all(".slimbar").unwrap().is_empty());
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`bar`] - The [`SlimBar`] state machine, its builder and settings
//! - [`dom`] - The [`Document`] capability and the in-memory [`MemoryDocument`]
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`render`] - Mounting, positioning and unmounting of the bar subtree
//! - [`status`] - Pure clamp and increment rules

pub mod bar;
pub mod dom;
pub mod error;
pub mod render;
pub mod status;
pub(crate) mod timer;

use std::sync::{Arc, OnceLock};

pub use bar::{Options, Parent, PositionUsing, Settings, SlimBar, SlimBarBuilder};
pub use dom::{Document, MemoryDocument, NodeId, TransformSupport};
pub use error::{Error, Result};

/// A process-wide default bar rendering into its own [`MemoryDocument`].
///
/// Convenience for applications that only ever need one bar; the engine
/// itself holds no global state.
pub fn shared() -> &'static SlimBar {
    static SHARED: OnceLock<SlimBar> = OnceLock::new();
    SHARED.get_or_init(|| SlimBar::new(Arc::new(MemoryDocument::new())))
}
