//! Driving-side port for the rendering collaborator.
//!
//! The core never builds markup. It asks the surface to show exactly one
//! page at a time, hands it render-ready view-models, toggles the session
//! flags the view layer consumes, and raises transient notifications and
//! confirmation prompts for destructive actions.

use crate::domain::router::Page;
use crate::domain::session::SessionFlags;
use crate::domain::view::PageView;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// Port for the view collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSurface {
    /// Show the named page, hiding whichever page was active before.
    fn show_page(&mut self, page: Page);

    /// Push the authenticated/admin flags consumed by the view layer.
    fn apply_session_flags(&mut self, flags: SessionFlags);

    /// Populate the active page's fields from a render-ready view-model.
    fn render(&mut self, view: PageView);

    /// Emit a transient notification.
    fn notify(&mut self, severity: Severity, message: &str);

    /// Ask a yes/no question before a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Ask for a line of text; `None` means the user cancelled.
    fn prompt_text(&mut self, prompt: &str) -> Option<String>;
}

/// Recording surface for tests and headless use.
///
/// Stores everything the core pushed at it and answers prompts from
/// preconfigured values. Confirmations default to "yes" so destructive
/// flows proceed unless a test opts out.
#[derive(Debug)]
pub struct RecordingRenderSurface {
    pub pages: Vec<Page>,
    pub flags: Vec<SessionFlags>,
    pub views: Vec<PageView>,
    pub notifications: Vec<(Severity, String)>,
    pub confirm_answer: bool,
    pub prompt_answer: Option<String>,
}

impl Default for RecordingRenderSurface {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            flags: Vec::new(),
            views: Vec::new(),
            notifications: Vec::new(),
            confirm_answer: true,
            prompt_answer: None,
        }
    }
}

impl RecordingRenderSurface {
    /// Fresh surface answering "yes" to confirmations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page currently shown, if any.
    pub fn current_page(&self) -> Option<Page> {
        self.pages.last().copied()
    }

    /// The most recent notification, if any.
    pub fn last_notification(&self) -> Option<&(Severity, String)> {
        self.notifications.last()
    }
}

impl RenderSurface for RecordingRenderSurface {
    fn show_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    fn apply_session_flags(&mut self, flags: SessionFlags) {
        self.flags.push(flags);
    }

    fn render(&mut self, view: PageView) {
        self.views.push(view);
    }

    fn notify(&mut self, severity: Severity, message: &str) {
        self.notifications.push((severity, message.to_owned()));
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirm_answer
    }

    fn prompt_text(&mut self, _prompt: &str) -> Option<String> {
        self.prompt_answer.clone()
    }
}
