//! The progress state machine.
//!
//! [`SlimBar`] owns one status value, its settings, its timers and its mounted
//! subtree. Every operation runs under the instance lock, so operations from
//! callers and from timer callbacks never interleave.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use slimbar::{MemoryDocument, SlimBar};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let document = Arc::new(MemoryDocument::new());
//! let bar = SlimBar::new(document.clone());
//!
//! bar.start();
//! assert_eq!(bar.status(), Some(0.08));
//! assert_eq!(document.query_all(".slimbar .bar .peg").unwrap().len(), 1);
//!
//! bar.inc_by(0.5);
//! assert!(bar.status().unwrap() > 0.5);
//!
//! bar.done();
//! assert!(!bar.is_started());
//! # }
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::builder::SlimBarBuilder;
use super::config::{Options, Settings};
use crate::dom::{Document, NodeId};
use crate::render::{Mount, PositionUsing};
use crate::status::{next_status, to_bar_percent, trickle_increment};
use crate::timer::{Timer, TimerId};

/// A slim progress bar bound to a document.
///
/// Cloning is cheap and yields another handle to the same bar. Independent
/// bars are obtained by constructing new instances.
#[derive(Clone)]
pub struct SlimBar {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    this: Weak<Mutex<Inner>>,
    document: Arc<dyn Document>,
    settings: Settings,
    /// What `PositionUsing::Auto` resolved to at construction.
    detected: PositionUsing,
    position: PositionUsing,
    status: Option<f64>,
    trickle: Option<Timer>,
    finishing: Option<Timer>,
    mount: Option<Mount>,
}

impl fmt::Debug for SlimBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SlimBar")
            .field("status", &inner.status)
            .field("settings", &inner.settings)
            .field("position", &inner.position)
            .field("mounted", &inner.mount.is_some())
            .finish()
    }
}

impl SlimBar {
    /// Creates a bar with default settings rendering into `document`.
    pub fn new(document: Arc<dyn Document>) -> Self {
        SlimBarBuilder::new(document).build()
    }

    /// Starts a [`SlimBarBuilder`].
    pub fn builder(document: Arc<dyn Document>) -> SlimBarBuilder {
        SlimBarBuilder::new(document)
    }

    pub(crate) fn from_parts(document: Arc<dyn Document>, settings: Settings) -> Self {
        let detected = PositionUsing::detect(document.transform_support());
        let position = settings.position_using.resolve(detected);
        debug!(?position, "Creating progress bar");

        let inner = Arc::new_cyclic(|this| {
            Mutex::new(Inner {
                this: this.clone(),
                document,
                settings,
                detected,
                position,
                status: None,
                trickle: None,
                finishing: None,
                mount: None,
            })
        });
        Self { inner }
    }

    /// Current status; `None` when idle or finishing.
    pub fn status(&self) -> Option<f64> {
        self.inner.lock().status
    }

    /// Whether the bar is in progress.
    pub fn is_started(&self) -> bool {
        self.inner.lock().status.is_some()
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> Settings {
        self.inner.lock().settings.clone()
    }

    /// The document this bar renders into.
    pub fn document(&self) -> Arc<dyn Document> {
        self.inner.lock().document.clone()
    }

    /// The mounted container element, if rendered.
    pub fn container(&self) -> Option<NodeId> {
        self.inner.lock().mount.as_ref().map(Mount::container)
    }

    /// Merges `options` into the settings. Does not touch the DOM.
    pub fn configure(&self, options: Options) -> &Self {
        self.inner.lock().configure(options);
        self
    }

    /// Moves the bar to `n`, clamped into `[minimum, 1]`.
    ///
    /// Reaching 1 finishes the bar: the status becomes `None` at once, and the
    /// element fades out after `speed` ms and is removed `trickle_speed` ms later.
    pub fn set(&self, n: f64) -> &Self {
        self.inner.lock().set(n);
        self
    }

    /// Shows the bar at `minimum` and starts trickling. No-op if started.
    pub fn start(&self) -> &Self {
        self.inner.lock().start();
        self
    }

    /// Advances by a status-dependent amount that never reaches 1.
    /// Starts the bar if it is idle.
    pub fn inc(&self) -> &Self {
        self.inner.lock().inc(None);
        self
    }

    /// Advances by `amount`. Starts the bar if it is idle.
    pub fn inc_by(&self, amount: f64) -> &Self {
        self.inner.lock().inc(Some(amount));
        self
    }

    /// Finishes the bar. No-op if it was not started.
    pub fn done(&self) -> &Self {
        self.inner.lock().done(false);
        self
    }

    /// Finishes the bar, rendering it first if needed.
    pub fn done_forced(&self) -> &Self {
        self.inner.lock().done(true);
        self
    }

    /// Removes the bar immediately and cancels every pending timer.
    pub fn remove(&self) {
        self.inner.lock().remove();
    }
}

impl Inner {
    fn configure(&mut self, options: Options) {
        let repositioned = options.position_using.is_some();
        self.settings.apply(options);
        if repositioned {
            self.position = self.settings.position_using.resolve(self.detected);
        }
        self.reconcile_trickle();
    }

    fn set(&mut self, n: f64) {
        let was_started = self.status.is_some();
        let status = next_status(n, self.settings.minimum);
        self.status = status;
        trace!(requested = n, ?status, "Setting progress");

        if let Some(timer) = self.finishing.take() {
            debug!("Cancelling pending removal");
            timer.cancel();
        }

        self.ensure_mounted(was_started);
        self.reconcile_trickle();

        if let Some(mount) = self.mount.as_mut() {
            let percent = to_bar_percent(status.unwrap_or(1.0));
            mount.show(percent, &self.settings, self.position, status.is_none());
        }

        if status.is_none() {
            self.schedule_finish();
        }
    }

    fn start(&mut self) {
        if self.status.is_none() {
            self.set(self.settings.minimum);
        }
    }

    fn inc(&mut self, amount: Option<f64>) {
        match self.status {
            None => self.start(),
            Some(status) => {
                let amount = amount.unwrap_or_else(|| trickle_increment(status));
                self.set(status + amount);
            }
        }
    }

    fn done(&mut self, force: bool) {
        if force || self.status.is_some() {
            self.set(1.0);
        }
    }

    fn remove(&mut self) {
        self.status = None;
        if let Some(timer) = self.trickle.take() {
            timer.cancel();
        }
        if let Some(timer) = self.finishing.take() {
            timer.cancel();
        }
        if let Some(mount) = self.mount.take() {
            drop(mount);
            debug!("Removed progress bar");
        }
    }

    /// Renders the subtree unless a live one exists. A bar that was not
    /// running enters from the far left; a running one is rebuilt resting at
    /// the status just assigned.
    fn ensure_mounted(&mut self, was_started: bool) {
        if self.mount.as_ref().is_some_and(Mount::is_attached) {
            return;
        }
        // A subtree moved or detached by someone else is released before
        // re-rendering.
        self.mount = None;

        let percent = if was_started {
            to_bar_percent(self.status.unwrap_or(0.0))
        } else {
            -100.0
        };
        self.mount = Some(Mount::create(
            self.document.clone(),
            &self.settings,
            self.position,
            percent,
        ));
    }

    /// Runs the trickle timer iff trickling is enabled and the bar is started.
    fn reconcile_trickle(&mut self) {
        if !self.settings.trickle || self.status.is_none() {
            if let Some(timer) = self.trickle.take() {
                debug!("Stopping trickle");
                timer.cancel();
            }
            return;
        }

        let period = Duration::from_millis(self.settings.trickle_speed.max(1));
        if self
            .trickle
            .as_ref()
            .is_some_and(|timer| timer.period() == Some(period))
        {
            return;
        }

        let id = Timer::next_id();
        let this = self.this.clone();
        match Timer::every(id, period, move || trickle_tick(&this, id)) {
            Ok(timer) => {
                debug!(?period, "Starting trickle");
                self.trickle = Some(timer);
            }
            Err(err) => {
                warn!(%err, "Trickle disabled");
                self.trickle = None;
            }
        }
    }

    /// Fades the finished bar out after `speed`, then removes it after
    /// `trickle_speed`.
    fn schedule_finish(&mut self) {
        let delay = Duration::from_millis(self.settings.speed);
        self.finish_after(delay, Inner::fade_out);
    }

    /// Puts `step` in the finishing slot, replacing whatever was there.
    fn finish_after(&mut self, delay: Duration, step: fn(&mut Inner)) {
        let id = Timer::next_id();
        let this = self.this.clone();
        match Timer::after(id, delay, move || run_finishing(&this, id, step)) {
            Ok(timer) => self.finishing = Some(timer),
            Err(err) => {
                warn!(%err, "Removing finished bar without delay");
                self.remove();
            }
        }
    }

    fn fade_out(&mut self) {
        if let Some(mount) = self.mount.as_mut() {
            trace!("Fading out finished bar");
            mount.fade_out(self.settings.speed);
        }
        let delay = Duration::from_millis(self.settings.trickle_speed);
        self.finish_after(delay, Inner::remove);
    }
}

fn trickle_tick(this: &Weak<Mutex<Inner>>, id: TimerId) -> bool {
    let Some(inner) = this.upgrade() else {
        return false;
    };
    let mut inner = inner.lock();
    if inner.trickle.as_ref().map(Timer::id) != Some(id) {
        return false;
    }
    inner.inc(None);
    true
}

/// Runs `step` if the finishing timer `id` is still the current one.
fn run_finishing(this: &Weak<Mutex<Inner>>, id: TimerId, step: fn(&mut Inner)) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let mut inner = inner.lock();
    if inner.finishing.as_ref().map(Timer::id) == Some(id) {
        step(&mut inner);
    }
}
