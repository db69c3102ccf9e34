//! Bar module containing the progress state machine, its builder and its
//! configuration.
//!
//! # Overview
//!
//! - `bar` - the [`SlimBar`] state machine (`start`, `set`, `inc`, `done`, `remove`)
//! - `builder` - [`SlimBarBuilder`] for constructing bars with initial settings
//! - `config` - [`Settings`], the [`Options`] patch type and [`Parent`]
//!
//! # Examples
//!
//! ## Several bars on one page
//!
//! ```rust
//! use std::sync::Arc;
//! use slimbar::{Document, MemoryDocument, Options, SlimBar};
//!
//! let document = Arc::new(
//!     MemoryDocument::with_body(r#"<div id="left"></div><div id="right"></div>"#).unwrap(),
//! );
//!
//! let left = SlimBar::new(document.clone());
//! let right = SlimBar::new(document.clone());
//! left.configure(Options::new().parent("#left").trickle(false));
//! right.configure(Options::new().parent("#right").trickle(false));
//!
//! left.set(0.3);
//! right.set(0.6);
//! left.remove();
//!
//! assert!(document.query("#left > .slimbar").unwrap().is_none());
//! assert!(document.query("#right > .slimbar").unwrap().is_some());
//! assert_eq!(right.status(), Some(0.6));
//! ```

#[allow(clippy::module_inception)]
pub mod bar;
pub mod builder;
pub mod config;

pub use crate::render::PositionUsing;
pub use bar::SlimBar;
pub use builder::SlimBarBuilder;
pub use config::{Options, Parent, Settings, DEFAULT_TEMPLATE};
