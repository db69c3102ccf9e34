//! Builder pattern implementation for creating [`SlimBar`] instances.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use slimbar::{MemoryDocument, SlimBarBuilder};
//!
//! let document = Arc::new(MemoryDocument::with_body(r#"<nav id="top"></nav>"#).unwrap());
//! let bar = SlimBarBuilder::new(document)
//!     .parent("#top")
//!     .speed(100)
//!     .show_spinner(false)
//!     .build();
//!
//! assert_eq!(bar.settings().speed, 100);
//! assert!(!bar.is_started());
//! ```

use std::sync::Arc;

use super::bar::SlimBar;
use super::config::{Options, Parent, Settings};
use crate::dom::Document;

/// A builder used to create a [`SlimBar`].
pub struct SlimBarBuilder {
    document: Arc<dyn Document>,
    settings: Settings,
}

impl SlimBarBuilder {
    /// Creates a builder with the default settings, rendering into `document`.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            document,
            settings: Settings::default(),
        }
    }

    /// Applies a whole options patch.
    pub fn options(mut self, options: Options) -> Self {
        self.settings.apply(options);
        self
    }

    /// Sets the mount container.
    pub fn parent(self, parent: impl Into<Parent>) -> Self {
        self.options(Options::new().parent(parent))
    }

    /// Sets the minimum visible status.
    pub fn minimum(self, minimum: f64) -> Self {
        self.options(Options::new().minimum(minimum))
    }

    /// Sets the animation speed in milliseconds.
    pub fn speed(self, speed: u64) -> Self {
        self.options(Options::new().speed(speed))
    }

    /// Enables or disables automatic trickling.
    pub fn trickle(self, trickle: bool) -> Self {
        self.options(Options::new().trickle(trickle))
    }

    /// Sets the trickle interval in milliseconds.
    pub fn trickle_speed(self, trickle_speed: u64) -> Self {
        self.options(Options::new().trickle_speed(trickle_speed))
    }

    /// Shows or hides the spinner.
    pub fn show_spinner(self, show_spinner: bool) -> Self {
        self.options(Options::new().show_spinner(show_spinner))
    }

    /// Create the [`SlimBar`] with the specified options.
    pub fn build(self) -> SlimBar {
        SlimBar::from_parts(self.document, self.settings)
    }
}
