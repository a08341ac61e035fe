//! Test utilities
//!
//! Shared helpers for unit tests: a recording reporter and plan fixtures.

use std::path::Path;

use crate::core::plan::PlanOptions;
use crate::core::report::Reporter;

/// Kinds of reporter output, recorded for assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SectionHeading,
    Message,
    Status,
    Warning,
    Info,
}

/// Reporter that records every message it receives
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<(ReportKind, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: ReportKind) -> usize {
        self.events.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.of_kind(ReportKind::Warning)
    }

    pub fn infos(&self) -> Vec<&str> {
        self.of_kind(ReportKind::Info)
    }

    fn of_kind(&self, kind: ReportKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn section_heading(&mut self, title: &str) {
        self.events.push((ReportKind::SectionHeading, title.to_string()));
    }

    fn message(&mut self, text: &str) {
        self.events.push((ReportKind::Message, text.to_string()));
    }

    fn status(&mut self, text: &str) {
        self.events.push((ReportKind::Status, text.to_string()));
    }

    fn status_with_context(&mut self, text: &str, context: &str) {
        self.events
            .push((ReportKind::Status, format!("{text} {context}")));
    }

    fn warning(&mut self, text: &str) {
        self.events.push((ReportKind::Warning, text.to_string()));
    }

    fn info(&mut self, text: &str) {
        self.events.push((ReportKind::Info, text.to_string()));
    }
}

/// Plan options rooted at `root`, with every token list empty
pub fn plan_options_at(root: &Path) -> PlanOptions {
    PlanOptions {
        plugin_list: Vec::new(),
        platform_list: Vec::new(),
        build_actions: Vec::new(),
        clean_actions: Vec::new(),
        debug: false,
        simulator_build: false,
        build_tests: false,
        force_clean: false,
        skip_codesign: false,
        codesign_identity: String::new(),
        unity_install_root: root.join("Unity"),
        plugin_root: root.join("plug-ins"),
        build_output_path: root.join("Build"),
        test_output_root: root.join("TestBuilds"),
    }
}
