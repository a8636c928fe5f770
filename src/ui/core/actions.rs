use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Identity of the module that published a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderRef {
    pub identifier: String,
    pub name: String,
}

/// A named message relayed by the notification bus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub name: String,
    pub payload: Value,
    /// `None` for notifications raised by the core itself
    pub sender: Option<SenderRef>,
}

impl Notification {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
            sender: None,
        }
    }
}

pub type Callback = Box<dyn FnOnce() + Send + 'static>;
pub type ErrorCallback = Box<dyn FnOnce(LockError) + Send + 'static>;

/// Raised when a show is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    #[error("LOCK_STRING_ACTIVE: {}", locks.join(","))]
    LockStringActive { locks: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct HideOptions {
    /// Named hold that must be released before the module shows again
    pub lock_string: Option<String>,
}

impl HideOptions {
    pub fn locked(lock_string: impl Into<String>) -> Self {
        Self {
            lock_string: Some(lock_string.into()),
        }
    }
}

#[derive(Default)]
pub struct ShowOptions {
    /// Lock released by this show
    pub lock_string: Option<String>,
    /// Show even while other locks are held, clearing them
    pub force: bool,
    pub on_error: Option<ErrorCallback>,
}

impl ShowOptions {
    pub fn unlocking(lock_string: impl Into<String>) -> Self {
        Self {
            lock_string: Some(lock_string.into()),
            ..Default::default()
        }
    }

    pub fn forced() -> Self {
        Self {
            force: true,
            ..Default::default()
        }
    }

    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: FnOnce(LockError) + Send + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }
}

impl fmt::Debug for ShowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowOptions")
            .field("lock_string", &self.lock_string)
            .field("force", &self.force)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Requests a module queues on its context while handling a hook. The
/// manager runs them once the hook has returned.
pub enum Command {
    SendNotification {
        name: String,
        payload: Value,
    },
    UpdateDom {
        speed_ms: u64,
    },
    Hide {
        speed_ms: u64,
        callback: Option<Callback>,
        options: HideOptions,
    },
    Show {
        speed_ms: u64,
        callback: Option<Callback>,
        options: ShowOptions,
    },
    SendSocketNotification {
        name: String,
        payload: Value,
    },
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SendNotification { name, .. } => write!(f, "SendNotification({})", name),
            Command::UpdateDom { speed_ms } => write!(f, "UpdateDom({}ms)", speed_ms),
            Command::Hide { speed_ms, options, .. } => write!(f, "Hide({}ms, {:?})", speed_ms, options),
            Command::Show { speed_ms, options, .. } => write!(f, "Show({}ms, {:?})", speed_ms, options),
            Command::SendSocketNotification { name, .. } => write!(f, "SendSocketNotification({})", name),
        }
    }
}
