//! Bar positioning strategies.

use crate::dom::TransformSupport;

/// How the bar's horizontal offset is written.
///
/// `Auto` is resolved once, when the bar is constructed, from the document's
/// [`TransformSupport`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum PositionUsing {
    /// Pick the best strategy the environment supports.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = ""))]
    Auto,
    /// `transform: translate3d(p%,0,0)`.
    Translate3d,
    /// `transform: translate(p%,0)`.
    Translate,
    /// `margin-left: p%`, for environments without transforms.
    #[cfg_attr(feature = "serde", serde(alias = "margin-left"))]
    Margin,
}

impl PositionUsing {
    /// The strategy `Auto` stands for under the given capability.
    pub fn detect(support: TransformSupport) -> Self {
        match support {
            TransformSupport::Transform3d => Self::Translate3d,
            TransformSupport::Transform => Self::Translate,
            TransformSupport::None => Self::Margin,
        }
    }

    /// Replaces `Auto` with the previously detected strategy.
    pub fn resolve(self, detected: Self) -> Self {
        match self {
            Self::Auto => detected,
            other => other,
        }
    }

    /// Inline style declarations placing the bar at `percent`.
    pub(crate) fn bar_style(self, percent: f64, transition: &str) -> [(&'static str, String); 2] {
        let offset = match self {
            Self::Auto | Self::Translate3d => {
                ("transform", format!("translate3d({}%,0,0)", percent))
            }
            Self::Translate => ("transform", format!("translate({}%,0)", percent)),
            Self::Margin => ("margin-left", format!("{}%", percent)),
        };
        [offset, ("transition", transition.to_string())]
    }
}
