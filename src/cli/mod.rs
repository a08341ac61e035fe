//! Command-line interface module
//!
//! This module handles argument parsing and the run entry point. It
//! contains no selection or sequencing logic - that belongs in the
//! [`crate::core`] module.

pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use crate::config::defaults;
use crate::core::plan::{BuildPlan, PlanOptions};
use crate::core::report::Reporter;
use crate::core::sequencer::PhaseSequencer;
use crate::infra::filesystem::{self, InteractiveRemover};
use crate::infra::paths::PathPreparer;
use crate::infra::plugins::XcodePluginManager;
use crate::infra::toolchain::XcodeToolchain;
use output::ConsoleReporter;

/// Builds all native libraries, packages plug-ins, and moves packages to the build folder.
#[derive(Parser, Debug)]
#[command(name = "plugbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Plug-ins to process: accessibility, core, corehaptics,
    /// gamecontroller, gamekit, phase, or all
    #[arg(short = 'p', long = "plugins", num_args = 0.., default_value = "all")]
    pub plugin_list: Vec<String>,

    /// Target platforms for native library builds: ios, macos, tvos, or all
    #[arg(short = 'm', long = "platforms", num_args = 0.., default_value = "all")]
    pub platform_list: Vec<String>,

    /// Build actions for the selected plug-ins: build, pack, all, or none
    #[arg(short = 'b', long = "build-actions", num_args = 0.., default_values = ["build", "pack"])]
    pub build_actions: Vec<String>,

    /// Build simulator-compatible libraries for supported platforms
    #[arg(short = 's', long)]
    pub simulator_build: bool,

    /// Codesign identity, typically a hash; only applied when build actions
    /// include build
    #[arg(short = 'c', long, default_value = "")]
    pub codesign_identity: String,

    /// Skip codesign and all related user prompts
    #[arg(long)]
    pub skip_codesign: bool,

    /// Root path to search (recursively) for Unity installations
    #[arg(short = 'u', long)]
    pub unity_installation_root: Option<PathBuf>,

    /// Compile debug native libraries for the selected plug-ins
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Output path for final packages
    #[arg(short = 'o', long)]
    pub output_path: Option<PathBuf>,

    /// Clean actions for the selected plug-ins: native, packages, tests,
    /// all, or none
    #[arg(short = 'k', long = "clean-actions", num_args = 0.., default_value = "none")]
    pub clean_actions: Vec<String>,

    /// Do not prompt before deleting files during clean operations
    #[arg(short = 'f', long = "force")]
    pub force_clean: bool,

    /// Build Unity tests for each selected plug-in
    #[arg(short = 't', long = "test")]
    pub build_tests: bool,

    /// Output path for test build results
    #[arg(long)]
    pub test_output_path: Option<PathBuf>,

    /// Enable verbose diagnostics (-v for info, -vv for debug)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Print the resolved plan as JSON and exit without executing
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute one build invocation
    pub fn run(self) -> Result<()> {
        let invocation_time = Local::now();
        let repo_root =
            std::env::current_dir().context("Failed to resolve the current directory")?;

        let plugin_root = repo_root.join(defaults::PLUGIN_ROOT_DIR);
        let build_output_path = self
            .output_path
            .clone()
            .unwrap_or_else(|| repo_root.join(defaults::BUILD_OUTPUT_DIR));
        let test_output_root = self
            .test_output_path
            .clone()
            .unwrap_or_else(|| repo_root.join(defaults::TEST_OUTPUT_DIR));
        let unity_install_root = resolve_unity_root(self.unity_installation_root.as_deref());

        // --json keeps stdout machine-readable; warnings still reach stderr.
        let mut reporter = ConsoleReporter::new(self.quiet || self.json);
        if !self.quiet && !self.json {
            print_banner();
            self.print_invocation_summary(&build_output_path, &unity_install_root, &test_output_root);
        }

        reporter.section_heading("Validate Input");
        let options = PlanOptions {
            plugin_list: self.plugin_list.clone(),
            platform_list: self.platform_list.clone(),
            build_actions: self.build_actions.clone(),
            clean_actions: self.clean_actions.clone(),
            debug: self.debug,
            simulator_build: self.simulator_build,
            build_tests: self.build_tests,
            force_clean: self.force_clean,
            skip_codesign: self.skip_codesign,
            codesign_identity: self.codesign_identity.clone(),
            unity_install_root,
            plugin_root,
            build_output_path,
            test_output_root,
        };
        let plan = BuildPlan::finalize(options, &mut reporter);

        if self.json {
            return output::print_plan_summary(&plan);
        }

        let mut remover = InteractiveRemover;
        let plan = PathPreparer::new(&mut remover)
            .prepare(plan, invocation_time, &mut reporter)
            .context("Failed to prepare build output paths")?;

        let toolchain = XcodeToolchain::new();
        let mut manager = XcodePluginManager::new();
        PhaseSequencer::new(&plan).run(
            &toolchain,
            &mut manager,
            &mut reporter,
            filesystem::list_subdirectories,
        )?;
        Ok(())
    }

    fn print_invocation_summary(
        &self,
        build_output_path: &Path,
        unity_install_root: &Path,
        test_output_root: &Path,
    ) {
        println!("\n       Build Actions (-b): {}", self.build_actions.join(" "));
        println!("  Selected Platforms (-m): {}", self.platform_list.join(" "));
        println!(
            "        Build Config (-d): {}",
            if self.debug { "Debug (-d set)" } else { "Release (-d not set)" }
        );
        println!(
            "     Simulator Build (-s): {}",
            if self.simulator_build {
                "Simulator Build (-s set)"
            } else {
                "Standard Build (-s not set)"
            }
        );
        println!(" Package Output Path (-o): {}", build_output_path.display());
        println!("   Selected Plug-Ins (-p): {}", self.plugin_list.join(" "));
        println!("       Clean Actions (-k): {}", self.clean_actions.join(" "));
        println!(
            "         Force Clean (-f): {}",
            if self.force_clean { "Yes (-f set)" } else { "No (-f not set)" }
        );
        println!(" Unity Install Root (-u): {}", unity_install_root.display());
        println!(
            "         Build Tests (-t): {}",
            if self.build_tests { "Yes (-t set)" } else { "No (-t not set)" }
        );
        println!(
            "            Skip Codesign: {}",
            if self.skip_codesign { "Yes (set)" } else { "No (not set)" }
        );
        if !self.skip_codesign {
            println!(
                "   Codesign Identity (-c): {}",
                if self.codesign_identity.is_empty() {
                    "None supplied; user will be prompted."
                } else {
                    self.codesign_identity.as_str()
                }
            );
        }
        if self.build_tests {
            println!("    Test Output Path: {}", test_output_root.display());
        }
    }
}

fn print_banner() {
    let rule = "*".repeat(80);
    println!("\n{rule}\n");
    println!("{:^80}", "Unity Plug-In Build");
    println!("{:^80}", env!("CARGO_PKG_VERSION"));
    println!("\n{rule}");
}

/// Adopt the requested Unity installation root only when it exists
fn resolve_unity_root(requested: Option<&Path>) -> PathBuf {
    if let Some(root) = requested {
        if root.is_dir() {
            return root.to_path_buf();
        }
        tracing::debug!(
            root = %root.display(),
            "requested Unity installation root is not a directory, using default"
        );
    }
    defaults::default_unity_install_root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["plugbuild"]);
        assert_eq!(cli.plugin_list, ["all"]);
        assert_eq!(cli.platform_list, ["all"]);
        assert_eq!(cli.build_actions, ["build", "pack"]);
        assert_eq!(cli.clean_actions, ["none"]);
        assert!(!cli.build_tests);
        assert!(!cli.force_clean);
    }

    #[test]
    fn test_cli_parses_token_lists() {
        let cli = Cli::parse_from([
            "plugbuild", "-p", "core", "gamekit", "-b", "build", "-k", "packages", "tests",
        ]);
        assert_eq!(cli.plugin_list, ["core", "gamekit"]);
        assert_eq!(cli.build_actions, ["build"]);
        assert_eq!(cli.clean_actions, ["packages", "tests"]);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["plugbuild", "-t", "-f", "-d", "-s", "--skip-codesign"]);
        assert!(cli.build_tests);
        assert!(cli.force_clean);
        assert!(cli.debug);
        assert!(cli.simulator_build);
        assert!(cli.skip_codesign);
    }

    #[test]
    fn test_missing_unity_root_falls_back_to_default() {
        let resolved = resolve_unity_root(Some(Path::new("/definitely/not/a/real/path")));
        assert_eq!(resolved, defaults::default_unity_install_root());
    }
}
