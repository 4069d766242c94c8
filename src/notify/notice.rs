use std::fmt;

/// Shown when the slip was accepted and the receipt was written.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Locator slip submitted successfully!";
/// Shown when the endpoint could not be reached or rejected the slip.
pub const SUBMIT_FAILURE_MESSAGE: &str = "There was a problem submitting your slip.";
/// Shown when the receipt image could not be produced.
pub const RECEIPT_FAILURE_MESSAGE: &str = "Error generating locator slip image. Please try again.";

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The slip went through.
    Success,
    /// Partial success the user should know about.
    Warning,
    /// Nothing the user wanted happened.
    Failure,
}

/// A blocking, user-facing notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// A [`NoticeLevel::Success`] notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// A [`NoticeLevel::Warning`] notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    /// A [`NoticeLevel::Failure`] notice.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for notices raised at the submit boundary.
pub trait Notifier {
    /// Show `notice` to the user.
    fn notify(&self, notice: &Notice);
}

/// Routes notices into the `tracing` log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Failure => tracing::error!(message = %notice.message, "notice"),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/notify/notice.rs"]
mod tests;
