//! Reporter interface
//!
//! Every user-facing message produced by the core flows through this trait,
//! keeping resolution and sequencing free of terminal concerns. The console
//! implementation lives in [`crate::cli::output`].

/// Sink for user-facing build output
pub trait Reporter {
    /// Open a new section of output
    fn section_heading(&mut self, title: &str);

    /// Plain message
    fn message(&mut self, text: &str);

    /// Progress/status message
    fn status(&mut self, text: &str);

    /// Status message followed by a contextual value such as a path
    fn status_with_context(&mut self, text: &str, context: &str);

    /// Non-fatal warning
    fn warning(&mut self, text: &str);

    /// Informational note
    fn info(&mut self, text: &str);
}
