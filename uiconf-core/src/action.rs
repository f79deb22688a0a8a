// uiconf-core/src/action.rs
//! Two-phase dispatch of mutating actions
//!
//! A widget emits the "-ing" event, awaits its cancel future and only then
//! performs the operation. The paired past-tense event is the widget's job.

use crate::{Cancel, Dispatcher, ErrorCode, OperationError, WidgetEvent};

/// A cancelable "-ing" event
pub trait ActionEvent: WidgetEvent {
    fn cancel_mut(&mut self) -> &mut Cancel;

    /// Error a handler attached while cancelling, if any
    fn error(&self) -> Option<OperationError> {
        None
    }
}

/// Mutable fields shared by the file manager's action events
#[derive(Debug, Default)]
pub struct ActionInfo {
    pub cancel: Cancel,
    pub error_code: Option<ErrorCode>,
    pub error_text: String,
}

impl ActionInfo {
    pub fn error(&self) -> Option<OperationError> {
        if self.error_code.is_none() && self.error_text.is_empty() {
            return None;
        }
        let code = self.error_code.unwrap_or(ErrorCode::Unspecified);
        let text = if self.error_text.is_empty() {
            code.default_text().to_string()
        } else {
            self.error_text.clone()
        };
        Some(OperationError::new(code, text))
    }
}

/// What the handlers of an "-ing" event decided
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Proceed,
    Cancelled,
    /// Cancelled with an error attached by a handler
    Failed(OperationError),
}

/// Result of a mutating action that was allowed to run its course
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> ActionOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionOutcome<U> {
        match self {
            Self::Completed(value) => ActionOutcome::Completed(f(value)),
            Self::Cancelled => ActionOutcome::Cancelled,
        }
    }
}

/// Emit `event` and await its cancellation decision
///
/// This is the only suspension point before the operation runs.
pub async fn confirm<E: ActionEvent>(dispatcher: &mut Dispatcher, event: &mut E) -> Decision {
    dispatcher.emit(event);
    let cancel = std::mem::take(event.cancel_mut());
    if !cancel.resolve().await {
        return Decision::Proceed;
    }

    match event.error() {
        Some(err) => {
            log::debug!("{} cancelled with error: {}", E::NAME, err);
            Decision::Failed(err)
        }
        None => {
            log::debug!("{} cancelled by handler", E::NAME);
            Decision::Cancelled
        }
    }
}
