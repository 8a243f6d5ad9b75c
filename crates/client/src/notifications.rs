//! Timed success/error feedback.
//!
//! [`NotificationCenter`] holds one error slot and one success slot. With the
//! default options showing one clears the other, so at most one notice is
//! visible at a time. Success notices auto-hide through a single cancellable
//! timer task: showing another success before it fires replaces the timer,
//! and showing an error cancels it. Errors never auto-hide.

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Auto-hide delay used when none is given.
pub const DEFAULT_HIDE_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Unknown notification type: {0}")]
    UnsupportedKind(String),
}

impl FromStr for NotificationKind {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NotificationKind::Success),
            "error" => Ok(NotificationKind::Error),
            other => Err(NotificationError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Options for [`NotificationCenter::show_notification`].
#[derive(Debug, Clone, Copy)]
pub struct NotifyOptions {
    /// Clear the other slot first.
    pub clear_others: bool,
    /// Success auto-hide delay. Zero keeps the message until replaced or cleared.
    pub auto_hide: Duration,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            clear_others: true,
            auto_hide: DEFAULT_HIDE_DURATION,
        }
    }
}

/// Messages used by [`NotificationCenter::handle_api_response`].
#[derive(Debug, Clone)]
pub struct ApiMessages {
    pub success: String,
    pub error_prefix: String,
}

impl Default for ApiMessages {
    fn default() -> Self {
        Self {
            success: "Operation completed successfully".into(),
            error_prefix: "Operation failed: ".into(),
        }
    }
}

#[derive(Default)]
struct NoticeState {
    error: Option<String>,
    success: Option<String>,
    timer: Option<AutoHide>,
    generation: u64,
}

struct AutoHide {
    generation: u64,
    handle: JoinHandle<()>,
}

impl NoticeState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
        }
    }
}

/// Single-slot notification state. Clones share the same slots.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<Mutex<NoticeState>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn success(&self) -> Option<String> {
        self.lock().success.clone()
    }

    pub fn has_error(&self) -> bool {
        self.lock().error.is_some()
    }

    pub fn has_success(&self) -> bool {
        self.lock().success.is_some()
    }

    pub fn has_notifications(&self) -> bool {
        let state = self.lock();
        state.error.is_some() || state.success.is_some()
    }

    /// Whether a success auto-hide timer is scheduled.
    pub fn has_pending_timer(&self) -> bool {
        self.lock().timer.is_some()
    }

    // ---- mutations ----

    pub fn clear_all(&self) {
        let mut state = self.lock();
        state.error = None;
        state.success = None;
        state.cancel_timer();
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    pub fn clear_success(&self) {
        self.lock().success = None;
    }

    /// Show a success message with the default options.
    pub fn show_success(&self, message: impl Into<String>) {
        self.show_success_with(message, NotifyOptions::default());
    }

    /// Show a success message and (re)schedule its auto-hide timer.
    ///
    /// Any pending timer is cancelled first, so there is never more than one.
    /// Scheduling needs a Tokio runtime; without one the message stays up.
    pub fn show_success_with(&self, message: impl Into<String>, options: NotifyOptions) {
        let mut state = self.lock();
        if options.clear_others {
            state.error = None;
        }
        state.success = Some(message.into());
        state.cancel_timer();

        if options.auto_hide.is_zero() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No Tokio runtime, success notification will not auto-hide");
            return;
        };

        state.generation += 1;
        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        let delay = options.auto_hide;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
            // A replaced timer may already be past its sleep when aborted.
            if state.timer.as_ref().map(|t| t.generation) == Some(generation) {
                state.success = None;
                state.timer = None;
            }
        });
        state.timer = Some(AutoHide { generation, handle });
    }

    /// Show an error message, clearing any success message.
    pub fn show_error(&self, message: impl Into<String>) {
        self.show_error_with(message, true);
    }

    /// Show an error message. The auto-hide timer is always cancelled.
    pub fn show_error_with(&self, message: impl Into<String>, clear_others: bool) {
        let mut state = self.lock();
        if clear_others {
            state.success = None;
        }
        state.error = Some(message.into());
        state.cancel_timer();
    }

    /// Dispatch on a kind name (`"success"` or `"error"`).
    ///
    /// Unknown kinds are logged and rejected without touching any state.
    pub fn show_notification(
        &self,
        kind: &str,
        message: impl Into<String>,
        options: NotifyOptions,
    ) -> Result<(), NotificationError> {
        match kind.parse::<NotificationKind>() {
            Ok(NotificationKind::Success) => self.show_success_with(message, options),
            Ok(NotificationKind::Error) => self.show_error_with(message, options.clear_others),
            Err(err) => {
                tracing::warn!(kind, "Unknown notification type");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Clear everything, await `call`, then report its outcome.
    ///
    /// The error is handed back unchanged after it has been shown.
    pub async fn handle_api_response<T, E, F>(&self, call: F, messages: ApiMessages) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.clear_all();
        match call.await {
            Ok(value) => {
                self.show_success(messages.success);
                Ok(value)
            }
            Err(err) => {
                self.show_error(format!("{}{}", messages.error_prefix, describe(&err)));
                Err(err)
            }
        }
    }

    /// Success/error reporting for an operation verb such as `"create"`.
    pub fn operation(&self, verb: &'static str) -> OperationNotifier<'_> {
        OperationNotifier { center: self, verb }
    }

    /// Pre-worded notices for track operations.
    pub fn tracks(&self) -> TrackNotices<'_> {
        TrackNotices { center: self }
    }

    fn lock(&self) -> MutexGuard<'_, NoticeState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reports the outcome of one kind of operation on an item.
pub struct OperationNotifier<'a> {
    center: &'a NotificationCenter,
    verb: &'static str,
}

impl OperationNotifier<'_> {
    /// `"<Item> <verb>d successfully!"`
    pub fn success(&self, item: &str) {
        self.center
            .show_success(format!("{} {}d successfully!", capitalize(item), self.verb));
    }

    /// `"Failed to <verb> <item>: <err>"`
    pub fn error(&self, err: &dyn Display, item: &str) {
        self.center
            .show_error(format!("Failed to {} {item}: {}", self.verb, describe(err)));
    }
}

/// Track-specific wording on top of [`OperationNotifier`].
pub struct TrackNotices<'a> {
    center: &'a NotificationCenter,
}

impl TrackNotices<'_> {
    pub fn created(&self) {
        self.center.operation("create").success("track");
    }

    pub fn create_failed(&self, err: &dyn Display) {
        self.center.operation("create").error(err, "track");
    }

    pub fn updated(&self) {
        self.center.operation("update").success("track");
    }

    pub fn update_failed(&self, err: &dyn Display) {
        self.center.operation("update").error(err, "track");
    }

    pub fn deleted(&self) {
        self.center.operation("delete").success("track");
    }

    pub fn delete_failed(&self, err: &dyn Display) {
        self.center.operation("delete").error(err, "track");
    }

    pub fn loaded(&self) {
        self.center.show_success("Tracks loaded successfully!");
    }

    pub fn load_failed(&self, err: &dyn Display) {
        self.center
            .show_error(format!("Failed to load tracks: {}", describe(err)));
    }
}

fn describe(err: &dyn Display) -> String {
    let text = err.to_string();
    if text.is_empty() {
        "Unknown error".to_string()
    } else {
        text
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
