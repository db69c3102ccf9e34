//! The mounted bar subtree.
//!
//! A [`Mount`] is acquired on first render and releases its subtree back to
//! the document when dropped, so every exit path (explicit remove, end of the
//! finishing delay, dropping the bar) frees the DOM exactly once.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{BUSY_CLASS, CONTAINER_CLASS, CUSTOM_PARENT_CLASS};
use crate::bar::config::{Parent, Settings, DEFAULT_TEMPLATE};
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::render::PositionUsing;

/// Owns one rendered bar subtree.
pub(crate) struct Mount {
    document: Arc<dyn Document>,
    container: NodeId,
    bar: Option<NodeId>,
    parent: NodeId,
    faded: bool,
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("container", &self.container)
            .field("bar", &self.bar)
            .field("parent", &self.parent)
            .field("faded", &self.faded)
            .finish()
    }
}

impl Mount {
    /// Builds the subtree from the template and attaches it to the configured
    /// parent, with the bar resting at `percent` and no transition.
    pub(crate) fn create(
        document: Arc<dyn Document>,
        settings: &Settings,
        position: PositionUsing,
        percent: f64,
    ) -> Self {
        let doc = document.as_ref();
        let container = doc.create_element("div");
        log_failure(doc.add_class(container, CONTAINER_CLASS), "tag container");

        if let Err(err) = doc.set_inner_html(container, &settings.template) {
            warn!(%err, "Invalid bar template, falling back to the default one");
            log_failure(
                doc.set_inner_html(container, DEFAULT_TEMPLATE),
                "render default template",
            );
        }

        let bar = find(doc, container, &settings.bar_selector);
        if let Some(bar) = bar {
            for (property, value) in position.bar_style(percent, "all 0ms linear") {
                log_failure(doc.set_style(bar, property, &value), "position bar");
            }
        }

        if !settings.show_spinner {
            if let Some(spinner) = find(doc, container, &settings.spinner_selector) {
                log_failure(doc.release(spinner), "drop spinner");
            }
        }

        let parent = attach(doc, container, &settings.parent);
        if parent != doc.body() {
            log_failure(
                doc.add_class(parent, CUSTOM_PARENT_CLASS),
                "mark custom parent",
            );
        }
        log_failure(
            doc.add_class(doc.document_element(), BUSY_CLASS),
            "mark document busy",
        );
        debug!(?container, ?parent, "Mounted progress bar");

        Self {
            document,
            container,
            bar,
            parent,
            faded: false,
        }
    }

    pub(crate) fn container(&self) -> NodeId {
        self.container
    }

    /// Whether the subtree still hangs under the node it was mounted on.
    ///
    /// That node need not be attached to the document itself.
    pub(crate) fn is_attached(&self) -> bool {
        self.document.parent(self.container) == Some(self.parent)
    }

    /// Moves the bar to `percent`, animated with the configured transition.
    ///
    /// `finishing` pins the container fully visible before the fade starts;
    /// otherwise a previous fade is undone.
    pub(crate) fn show(
        &mut self,
        percent: f64,
        settings: &Settings,
        position: PositionUsing,
        finishing: bool,
    ) {
        let doc = self.document.as_ref();
        if let Some(bar) = self.bar {
            let transition = format!("all {}ms {}", settings.speed, settings.easing);
            for (property, value) in position.bar_style(percent, &transition) {
                log_failure(doc.set_style(bar, property, &value), "position bar");
            }
        }

        if finishing {
            log_failure(doc.set_style(self.container, "transition", "none"), "reset fade");
            log_failure(doc.set_style(self.container, "opacity", "1"), "reset fade");
            self.faded = false;
        } else if self.faded {
            log_failure(doc.set_style(self.container, "opacity", "1"), "undo fade");
            self.faded = false;
        }
    }

    /// Starts fading the container out.
    pub(crate) fn fade_out(&mut self, speed: u64) {
        let doc = self.document.as_ref();
        let transition = format!("all {}ms linear", speed);
        log_failure(doc.set_style(self.container, "transition", &transition), "fade out");
        log_failure(doc.set_style(self.container, "opacity", "0"), "fade out");
        self.faded = true;
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        let doc = self.document.as_ref();
        log_failure(doc.release(self.container), "release container");

        // Marker classes are shared with sibling bars; clear them only once
        // the last container under them is gone.
        let sibling_remains = doc
            .children(self.parent)
            .into_iter()
            .any(|child| doc.has_class(child, CONTAINER_CLASS));
        if !sibling_remains && doc.has_class(self.parent, CUSTOM_PARENT_CLASS) {
            log_failure(
                doc.remove_class(self.parent, CUSTOM_PARENT_CLASS),
                "unmark custom parent",
            );
        }

        match doc.query(&format!(".{}", CONTAINER_CLASS)) {
            Ok(None) => log_failure(
                doc.remove_class(doc.document_element(), BUSY_CLASS),
                "unmark document busy",
            ),
            Ok(Some(_)) => {}
            Err(err) => warn!(%err, "Could not look up remaining bars"),
        }
        debug!(container = ?self.container, "Unmounted progress bar");
    }
}

/// Appends `container` to the configured parent, falling back to the body.
/// Returns the node it ended up under.
fn attach(doc: &dyn Document, container: NodeId, parent: &Parent) -> NodeId {
    let body = doc.body();
    let target = match parent {
        Parent::Body => body,
        Parent::Node(node) => *node,
        Parent::Selector(selector) => match doc.query(selector) {
            Ok(Some(node)) => node,
            Ok(None) => {
                warn!(%selector, "Parent selector matched nothing, mounting under body");
                body
            }
            Err(err) => {
                warn!(%err, "Invalid parent selector, mounting under body");
                body
            }
        },
    };

    match doc.append_child(target, container) {
        Ok(()) => target,
        Err(err) if target != body => {
            warn!(%err, "Could not mount under parent, mounting under body");
            log_failure(doc.append_child(body, container), "mount under body");
            body
        }
        Err(err) => {
            warn!(%err, "Could not mount progress bar");
            body
        }
    }
}

fn find(doc: &dyn Document, scope: NodeId, selector: &str) -> Option<NodeId> {
    match doc.query_within(scope, selector) {
        Ok(found) => found,
        Err(err) => {
            warn!(%err, "Could not look up template element");
            None
        }
    }
}

fn log_failure(result: Result<()>, action: &str) {
    if let Err(err) = result {
        warn!(%err, action, "DOM update failed");
    }
}
