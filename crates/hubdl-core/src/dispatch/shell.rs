//! Capabilities the dispatcher needs from its host (browser page, CLI, tests).

/// Error from a host capability (trigger, object URL create/revoke).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("download trigger failed: {0}")]
    Trigger(String),
    #[error("unknown object url: {0}")]
    UnknownObjectUrl(String),
    #[error("object url: {0}")]
    ObjectUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Shown when a material has no usable download link.
    pub fn file_not_found() -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "File not found".to_string(),
            message: "Please try again later.".to_string(),
        }
    }
}

/// Side effects of delivering a file to the user.
///
/// `trigger_browser_download` is the equivalent of clicking a temporary
/// anchor with a `download` hint; it reports only synchronous failures.
pub trait BrowserShell {
    fn trigger_browser_download(&self, url: &str, filename: &str) -> Result<(), ShellError>;

    /// Opens `url` in a new, unrelated browsing context. Best effort.
    fn open_in_new_tab(&self, url: &str);

    fn notify(&self, notice: &Notice);

    /// Registers `body` under a temporary local URL.
    fn create_object_url(&self, body: Vec<u8>) -> Result<String, ShellError>;

    fn revoke_object_url(&self, object_url: &str) -> Result<(), ShellError>;
}
