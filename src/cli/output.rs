//! Output formatting and progress indicators
//!
//! Console implementation of the [`Reporter`] interface, spinner helpers,
//! and the machine-readable plan summary behind `--json`.

use std::collections::BTreeMap;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::core::plan::BuildPlan;
use crate::core::report::Reporter;

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Reporter writing to the terminal
///
/// Warnings go to stderr and survive `--quiet`; everything else is
/// suppressed in quiet mode.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn section_heading(&mut self, title: &str) {
        if !self.quiet {
            println!("\n=== {title} ===");
        }
    }

    fn message(&mut self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }

    fn status(&mut self, text: &str) {
        if !self.quiet {
            println!("{} {text}", status::SUCCESS);
        }
    }

    fn status_with_context(&mut self, text: &str, context: &str) {
        if !self.quiet {
            println!("{} {text} {context}", status::SUCCESS);
        }
    }

    fn warning(&mut self, text: &str) {
        eprintln!("{} {text}", status::WARNING);
    }

    fn info(&mut self, text: &str) {
        if !self.quiet {
            println!("{} {text}", status::INFO);
        }
    }
}

/// Display a top-level error with its cause chain
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Machine-readable view of a resolved plan
#[derive(Debug, Serialize)]
pub struct PlanSummary<'a> {
    pub version: &'static str,
    pub build_actions: BTreeMap<&'static str, bool>,
    pub platforms: BTreeMap<&'static str, bool>,
    pub plugins: BTreeMap<&'static str, bool>,
    pub clean_actions: BTreeMap<&'static str, bool>,
    pub config: &'static str,
    pub simulator_build: bool,
    pub build_tests: bool,
    pub force_clean: bool,
    pub skip_codesign: bool,
    pub unity_install_root: &'a Path,
    pub plugin_root: &'a Path,
    pub output_path: &'a Path,
    pub test_output_root: &'a Path,
}

impl<'a> PlanSummary<'a> {
    pub fn from_plan(plan: &'a BuildPlan) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_actions: plan.build_actions.to_token_map(),
            platforms: plan.platforms.to_token_map(),
            plugins: plan.plugins.to_token_map(),
            clean_actions: plan.clean_actions.to_token_map(),
            config: plan.config().name(),
            simulator_build: plan.simulator_build,
            build_tests: plan.build_tests,
            force_clean: plan.force_clean,
            skip_codesign: plan.skip_codesign,
            unity_install_root: &plan.unity_install_root,
            plugin_root: &plan.plugin_root,
            output_path: &plan.build_output_path,
            test_output_root: &plan.test_output_root,
        }
    }
}

/// Print the resolved plan as pretty JSON
pub fn print_plan_summary(plan: &BuildPlan) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&PlanSummary::from_plan(plan))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::core::plan::BuildPlan;
    use crate::test_utils::{plan_options_at, RecordingReporter};

    #[test]
    fn test_plan_summary_serializes_axes() {
        let mut options = plan_options_at(&PathBuf::from("project"));
        options.build_actions = vec!["pack".to_string()];
        let mut reporter = RecordingReporter::new();
        let plan = BuildPlan::finalize(options, &mut reporter);

        let summary = PlanSummary::from_plan(&plan);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["build_actions"]["pack"], true);
        assert_eq!(json["build_actions"]["build"], false);
        assert_eq!(json["plugins"]["core"], true);
        assert_eq!(json["config"], "Release");
    }
}
