//! Output path preparation
//!
//! Applies the selected clean actions and creates the directories a run
//! needs, including the per-invocation timestamped test directory. Runs
//! before the phase sequencer so that every later phase sees settled
//! filesystem state.

use std::ffi::OsStr;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::config::defaults::{TEST_PLAYER_DIR, TEST_RUN_PREFIX, TEST_RUN_TIMESTAMP_FORMAT, UNITY_PROJECT_SUFFIX};
use crate::core::axes::{BuildAction, CleanAction};
use crate::core::plan::BuildPlan;
use crate::core::report::Reporter;
use crate::error::FilesystemError;
use crate::infra::filesystem::{self, DirectoryRemover, RemoveOutcome};

/// Prepares the output directories for one invocation
pub struct PathPreparer<'a> {
    remover: &'a mut dyn DirectoryRemover,
}

impl<'a> PathPreparer<'a> {
    pub fn new(remover: &'a mut dyn DirectoryRemover) -> Self {
        Self { remover }
    }

    /// Apply clean actions and create output directories
    ///
    /// Returns the plan updated with the timestamped test-run path when
    /// tests are requested. Creation failures and test-run collisions are
    /// fatal; a declined removal skips that cleanup step only.
    pub fn prepare(
        &mut self,
        plan: BuildPlan,
        invocation_time: DateTime<Local>,
        reporter: &mut dyn Reporter,
    ) -> Result<BuildPlan, FilesystemError> {
        reporter.section_heading("Configure Build Paths");

        self.clean_packages(&plan, reporter)?;
        self.create_build_output(&plan, reporter)?;
        self.clean_tests(&plan, reporter)?;
        self.create_test_run_dir(plan, invocation_time, reporter)
    }

    fn clean_packages(
        &mut self,
        plan: &BuildPlan,
        reporter: &mut dyn Reporter,
    ) -> Result<(), FilesystemError> {
        if !plan.clean_actions.is_selected(CleanAction::Packages)
            || !plan.build_output_path.exists()
        {
            return Ok(());
        }
        reporter.status("Cleaning packages.");
        reporter.status_with_context(
            "Removing folder at path:",
            &plan.build_output_path.display().to_string(),
        );
        self.remove(plan, &plan.build_output_path)
    }

    fn create_build_output(
        &mut self,
        plan: &BuildPlan,
        reporter: &mut dyn Reporter,
    ) -> Result<(), FilesystemError> {
        let building = plan.build_actions.is_selected(BuildAction::Build)
            || plan.build_actions.is_selected(BuildAction::Pack);
        if !building || plan.build_output_path.exists() {
            return Ok(());
        }
        reporter.message("Build output path not found.");
        reporter.status_with_context("Creating:", &plan.build_output_path.display().to_string());
        filesystem::create_dir(&plan.build_output_path)
    }

    fn clean_tests(
        &mut self,
        plan: &BuildPlan,
        reporter: &mut dyn Reporter,
    ) -> Result<(), FilesystemError> {
        if !plan.clean_actions.is_selected(CleanAction::Tests) || !plan.test_output_root.exists() {
            return Ok(());
        }
        reporter.status("Clean tests option 'tests' set.");
        self.remove(plan, &plan.test_output_root)?;

        // Test players also accumulate inside each plug-in's Unity project,
        // named `<PluginFolder>_Unity` by convention.
        for plugin_dir in filesystem::list_subdirectories(&plan.plugin_root)? {
            let Some(name) = plugin_dir.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            let test_players = plugin_dir
                .join(format!("{name}{UNITY_PROJECT_SUFFIX}"))
                .join(TEST_PLAYER_DIR);
            if test_players.is_dir() {
                reporter.status_with_context(
                    "Removing test players at:",
                    &test_players.display().to_string(),
                );
                self.remove(plan, &test_players)?;
            }
        }
        Ok(())
    }

    fn create_test_run_dir(
        &mut self,
        plan: BuildPlan,
        invocation_time: DateTime<Local>,
        reporter: &mut dyn Reporter,
    ) -> Result<BuildPlan, FilesystemError> {
        if !plan.build_tests {
            return Ok(plan);
        }

        if !plan.test_output_root.exists() {
            reporter.message("Test build output root not found.");
            reporter.status_with_context("Creating:", &plan.test_output_root.display().to_string());
            filesystem::create_dir(&plan.test_output_root)?;
        }

        // Each invocation gets its own timestamped folder; a collision
        // would silently merge two runs' artifacts, so it is fatal.
        let stamp = invocation_time.format(TEST_RUN_TIMESTAMP_FORMAT);
        let run_dir = plan
            .test_output_root
            .join(format!("{TEST_RUN_PREFIX}{stamp}"));
        if run_dir.exists() {
            return Err(FilesystemError::TestRunCollision { path: run_dir });
        }
        filesystem::create_dir(&run_dir)?;
        reporter.status_with_context("Test output directory:", &run_dir.display().to_string());
        Ok(plan.with_test_run_path(run_dir))
    }

    fn remove(&mut self, plan: &BuildPlan, path: &Path) -> Result<(), FilesystemError> {
        match self.remover.remove_dir(path, !plan.force_clean)? {
            RemoveOutcome::Removed => {}
            RemoveOutcome::Declined => {
                tracing::info!(path = %path.display(), "skipping declined cleanup step");
            }
        }
        Ok(())
    }
}
