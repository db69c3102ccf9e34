//! Settings and configuration patches for a bar.
//!
//! [`Settings`] is the complete per-instance configuration with defaults.
//! [`Options`] is a partial patch: every field is optional and only the fields
//! that are present overwrite the current settings when passed to
//! [`SlimBar::configure`](crate::SlimBar::configure).
//!
//! # Examples
//!
//! ```rust
//! use slimbar::bar::{Options, Settings};
//!
//! let mut settings = Settings::default();
//! settings.apply(Options::new().minimum(0.2).show_spinner(false));
//!
//! assert_eq!(settings.minimum, 0.2);
//! assert!(!settings.show_spinner);
//! assert!(settings.trickle);
//! ```

use crate::dom::NodeId;
use crate::render::PositionUsing;
use crate::status::clamp;

/// Markup of the default bar: a bar with its peg, then the spinner.
pub const DEFAULT_TEMPLATE: &str = concat!(
    r#"<div class="bar" role="bar"><div class="peg"></div></div>"#,
    r#"<div class="spinner" role="spinner"><div class="spinner-icon"></div></div>"#,
);

/// Largest accepted `minimum`; higher values would leave no room to progress.
const MAX_MINIMUM: f64 = 0.99;

/// Where a bar is mounted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Parent {
    /// The document body.
    #[default]
    Body,
    /// The first element matching a selector; falls back to the body.
    Selector(String),
    /// A specific element.
    Node(NodeId),
}

impl From<&str> for Parent {
    fn from(selector: &str) -> Self {
        match selector.trim() {
            "body" => Parent::Body,
            other => Parent::Selector(other.to_string()),
        }
    }
}

impl From<String> for Parent {
    fn from(selector: String) -> Self {
        Parent::from(selector.as_str())
    }
}

impl From<NodeId> for Parent {
    fn from(node: NodeId) -> Self {
        Parent::Node(node)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Parent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <String as serde::Deserialize>::deserialize(deserializer).map(Parent::from)
    }
}

/// Complete configuration of one bar.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Floor for any visible status.
    pub minimum: f64,
    /// CSS easing curve of bar movements.
    pub easing: String,
    /// Duration of bar movements in milliseconds; also the delay before the
    /// finishing fade.
    pub speed: u64,
    /// Whether the bar advances on its own while started.
    pub trickle: bool,
    /// Interval between trickle steps in milliseconds; also how long the
    /// faded bar lingers before removal.
    pub trickle_speed: u64,
    /// Whether the spinner is rendered.
    pub show_spinner: bool,
    /// Mount container.
    pub parent: Parent,
    /// Markup of the bar subtree.
    pub template: String,
    /// Positioning strategy of the bar.
    pub position_using: PositionUsing,
    /// Locates the bar inside the template.
    pub bar_selector: String,
    /// Locates the spinner inside the template.
    pub spinner_selector: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            minimum: 0.08,
            easing: "ease".to_string(),
            speed: 200,
            trickle: true,
            trickle_speed: 200,
            show_spinner: true,
            parent: Parent::Body,
            template: DEFAULT_TEMPLATE.to_string(),
            position_using: PositionUsing::Auto,
            bar_selector: r#"[role="bar"]"#.to_string(),
            spinner_selector: r#"[role="spinner"]"#.to_string(),
        }
    }
}

impl Settings {
    /// Overwrites every field present in `options`.
    ///
    /// `minimum` is clamped into `[0, 0.99]`.
    pub fn apply(&mut self, options: Options) {
        let Options {
            minimum,
            easing,
            speed,
            trickle,
            trickle_speed,
            show_spinner,
            parent,
            template,
            position_using,
            bar_selector,
            spinner_selector,
        } = options;

        if let Some(minimum) = minimum {
            self.minimum = clamp(minimum, 0.0, MAX_MINIMUM);
        }
        if let Some(easing) = easing {
            self.easing = easing;
        }
        if let Some(speed) = speed {
            self.speed = speed;
        }
        if let Some(trickle) = trickle {
            self.trickle = trickle;
        }
        if let Some(trickle_speed) = trickle_speed {
            self.trickle_speed = trickle_speed;
        }
        if let Some(show_spinner) = show_spinner {
            self.show_spinner = show_spinner;
        }
        if let Some(parent) = parent {
            self.parent = parent;
        }
        if let Some(template) = template {
            self.template = template;
        }
        if let Some(position_using) = position_using {
            self.position_using = position_using;
        }
        if let Some(bar_selector) = bar_selector {
            self.bar_selector = bar_selector;
        }
        if let Some(spinner_selector) = spinner_selector {
            self.spinner_selector = spinner_selector;
        }
    }
}

/// A partial [`Settings`] update.
///
/// With the `serde` feature enabled, options deserialize from camelCase keys
/// (`trickleSpeed`, `showSpinner`, ...) and unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Options {
    pub minimum: Option<f64>,
    pub easing: Option<String>,
    pub speed: Option<u64>,
    pub trickle: Option<bool>,
    pub trickle_speed: Option<u64>,
    pub show_spinner: Option<bool>,
    pub parent: Option<Parent>,
    pub template: Option<String>,
    pub position_using: Option<PositionUsing>,
    pub bar_selector: Option<String>,
    pub spinner_selector: Option<String>,
}

impl Options {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn easing(mut self, easing: impl Into<String>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn speed(mut self, speed: u64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn trickle(mut self, trickle: bool) -> Self {
        self.trickle = Some(trickle);
        self
    }

    pub fn trickle_speed(mut self, trickle_speed: u64) -> Self {
        self.trickle_speed = Some(trickle_speed);
        self
    }

    pub fn show_spinner(mut self, show_spinner: bool) -> Self {
        self.show_spinner = Some(show_spinner);
        self
    }

    /// Sets the mount container from a selector (`"#app"`) or a [`NodeId`].
    pub fn parent(mut self, parent: impl Into<Parent>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn position_using(mut self, position_using: PositionUsing) -> Self {
        self.position_using = Some(position_using);
        self
    }

    pub fn bar_selector(mut self, selector: impl Into<String>) -> Self {
        self.bar_selector = Some(selector.into());
        self
    }

    pub fn spinner_selector(mut self, selector: impl Into<String>) -> Self {
        self.spinner_selector = Some(selector.into());
        self
    }
}
