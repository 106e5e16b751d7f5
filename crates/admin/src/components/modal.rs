//! `<dialog>`-based modal forms.
//!
//! Modals open client-side from a button. When a form post fails validation
//! the page is re-rendered with the modal open and the submitted values kept.

/// A modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    /// DOM id; buttons target it with `data-open-modal`.
    pub id: &'static str,
    pub title: String,
    /// Render with the `open` attribute.
    pub open: bool,
    /// Inline error shown above the form fields.
    pub error: Option<String>,
}

impl Modal {
    #[must_use]
    pub fn new(id: &'static str, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            open: false,
            error: None,
        }
    }

    /// Render already open.
    #[must_use]
    pub const fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    /// Open the modal with a validation error.
    #[must_use]
    pub fn reopen_with(mut self, error: impl Into<String>) -> Self {
        self.open = true;
        self.error = Some(error.into());
        self
    }
}
