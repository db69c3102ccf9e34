//! Render engine: keeps the DOM in sync with a bar's status.
//!
//! A rendered bar looks like this (with the default template):
//!
//! ```text
//! <parent class="slimbar-custom-parent">      (marker only when parent is not <body>)
//!   <div class="slimbar">
//!     <div class="bar" role="bar"><div class="peg"></div></div>
//!     <div class="spinner" role="spinner"><div class="spinner-icon"></div></div>
//!   </div>
//! </parent>
//! ```
//!
//! The document element carries `slimbar-busy` while any bar is mounted.

pub(crate) mod mount;
pub mod position;

pub(crate) use mount::Mount;
pub use position::PositionUsing;

/// Class of every bar container.
pub const CONTAINER_CLASS: &str = "slimbar";

/// Marker class added to a parent other than `<body>`.
pub const CUSTOM_PARENT_CLASS: &str = "slimbar-custom-parent";

/// Marker class added to the document element while a bar is mounted.
pub const BUSY_CLASS: &str = "slimbar-busy";
