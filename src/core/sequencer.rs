//! Phase sequencing
//!
//! Executes the fixed phase order over a finalized plan: clean, configure,
//! process plug-ins, validate versions, build tests, package. Phases whose
//! governing action is disabled are skipped entirely. Clean actions are
//! applied by path preparation before the sequencer runs, so the sequencer
//! starts from [`Phase::CleanDone`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::axes::BuildAction;
use crate::core::ordering;
use crate::core::plan::BuildPlan;
use crate::core::report::Reporter;
use crate::error::{FilesystemError, PluginError, PlugbuildError, ToolchainError};

/// Native toolchain version information
#[derive(Debug, Clone)]
pub struct ToolchainVersion {
    pub version: String,
    pub build_number: String,
}

/// Native toolchain collaborator
pub trait Toolchain {
    /// Query the toolchain's version and build number
    fn versions(&self) -> Result<ToolchainVersion, ToolchainError>;

    /// Interactively ask the user for a codesigning identity
    fn prompt_codesign_identity(
        &self,
        reporter: &mut dyn Reporter,
    ) -> Result<String, ToolchainError>;
}

/// Plug-in processing collaborator
///
/// Only [`PluginManager::process_plugin`] failures are isolated; an error
/// from any other operation aborts the run.
pub trait PluginManager {
    fn scan_unity_installations(&mut self, plan: &BuildPlan) -> Result<(), PluginError>;
    fn process_plugin(&mut self, plan: &BuildPlan, plugin_dir: &Path) -> Result<(), PluginError>;
    fn validate_project_versions(&mut self, plan: &BuildPlan) -> Result<(), PluginError>;
    fn build_tests(&mut self, plan: &BuildPlan) -> Result<(), PluginError>;
    fn generate_packages(&mut self, plan: &BuildPlan) -> Result<(), PluginError>;
}

/// Sequencer phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    CleanDone,
    BuildConfigured,
    PluginsProcessed,
    VersionsValidated,
    TestsBuilt,
    Packaged,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CleanDone => "clean-done",
            Self::BuildConfigured => "build-configured",
            Self::PluginsProcessed => "plugins-processed",
            Self::VersionsValidated => "versions-validated",
            Self::TestsBuilt => "tests-built",
            Self::Packaged => "packaged",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives the fixed phase sequence for one finalized plan
pub struct PhaseSequencer<'a> {
    plan: &'a BuildPlan,
    phase: Phase,
}

impl<'a> PhaseSequencer<'a> {
    pub fn new(plan: &'a BuildPlan) -> Self {
        Self {
            plan,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run every enabled phase in order, returning the terminal phase
    pub fn run<L>(
        &mut self,
        toolchain: &dyn Toolchain,
        manager: &mut dyn PluginManager,
        reporter: &mut dyn Reporter,
        list_plugin_dirs: L,
    ) -> Result<Phase, PlugbuildError>
    where
        L: Fn(&Path) -> Result<Vec<PathBuf>, FilesystemError>,
    {
        // Clean actions were applied during path preparation.
        self.advance(Phase::CleanDone);

        if self.plan.build_actions.is_selected(BuildAction::Build) {
            self.configure_build(toolchain, manager, reporter)?;
            self.process_plugins(manager, reporter, &list_plugin_dirs)?;
            self.validate_versions(manager, reporter)?;
        }

        if self.plan.build_tests {
            reporter.section_heading("Build Unity Tests");
            manager.build_tests(self.plan)?;
            self.advance(Phase::TestsBuilt);
        }

        if self.plan.build_actions.is_selected(BuildAction::Pack) {
            reporter.section_heading("Create Plug-In Packages");
            manager.generate_packages(self.plan)?;
            self.advance(Phase::Packaged);
        }

        self.advance(Phase::Done);
        reporter.message("Finished running the plug-in build.");
        Ok(self.phase)
    }

    fn configure_build(
        &mut self,
        toolchain: &dyn Toolchain,
        manager: &mut dyn PluginManager,
        reporter: &mut dyn Reporter,
    ) -> Result<(), PlugbuildError> {
        reporter.section_heading("Configure Native Library Build Options");

        let versions = toolchain.versions()?;
        reporter.status_with_context(
            "Native library build using:",
            &format!("Xcode {} ({})", versions.version, versions.build_number),
        );
        reporter.info(
            "If this is incorrect, update your environment with xcode-select. \
             (Call 'xcode-select -h' from the command line for more info.)",
        );
        tracing::debug!(config = %self.plan.config(), "native build configuration");

        let hash = if self.plan.skip_codesign {
            // Explicitly "no identity, signing skipped".
            String::new()
        } else if !self.plan.codesign_identity.is_empty() {
            self.plan.codesign_identity.clone()
        } else {
            toolchain.prompt_codesign_identity(reporter)?
        };
        self.plan.set_codesign_hash(hash);

        reporter.section_heading("Gather Unity Installation Info");
        manager.scan_unity_installations(self.plan)?;

        self.advance(Phase::BuildConfigured);
        Ok(())
    }

    fn process_plugins<L>(
        &mut self,
        manager: &mut dyn PluginManager,
        reporter: &mut dyn Reporter,
        list_plugin_dirs: &L,
    ) -> Result<(), PlugbuildError>
    where
        L: Fn(&Path) -> Result<Vec<PathBuf>, FilesystemError>,
    {
        reporter.section_heading("Process Plug-Ins");

        let dirs = list_plugin_dirs(&self.plan.plugin_root)?;
        for dir in ordering::core_first(dirs) {
            // One plug-in's failure must not block the others; each
            // plug-in's build is independent.
            if let Err(error) = manager.process_plugin(self.plan, &dir) {
                reporter.warning(&error.to_string());
                tracing::warn!(plugin_dir = %dir.display(), %error, "plug-in processing failed");
            }
        }

        self.advance(Phase::PluginsProcessed);
        Ok(())
    }

    fn validate_versions(
        &mut self,
        manager: &mut dyn PluginManager,
        reporter: &mut dyn Reporter,
    ) -> Result<(), PlugbuildError> {
        reporter.section_heading("Update and Create Unity .meta Files");
        manager.validate_project_versions(self.plan)?;
        self.advance(Phase::VersionsValidated);
        Ok(())
    }

    fn advance(&mut self, next: Phase) {
        tracing::debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::{BuildPlan, PlanOptions};
    use crate::test_utils::{plan_options_at, RecordingReporter};

    struct FakeToolchain {
        prompted_identity: &'static str,
    }

    impl Default for FakeToolchain {
        fn default() -> Self {
            Self {
                prompted_identity: "PROMPTED",
            }
        }
    }

    impl Toolchain for FakeToolchain {
        fn versions(&self) -> Result<ToolchainVersion, ToolchainError> {
            Ok(ToolchainVersion {
                version: "15.4".to_string(),
                build_number: "15F31d".to_string(),
            })
        }

        fn prompt_codesign_identity(
            &self,
            _reporter: &mut dyn Reporter,
        ) -> Result<String, ToolchainError> {
            Ok(self.prompted_identity.to_string())
        }
    }

    /// Records calls; optionally fails processing for one directory name
    #[derive(Default)]
    struct FakeManager {
        calls: Vec<String>,
        failing_dir: Option<&'static str>,
    }

    impl PluginManager for FakeManager {
        fn scan_unity_installations(&mut self, _plan: &BuildPlan) -> Result<(), PluginError> {
            self.calls.push("scan".to_string());
            Ok(())
        }

        fn process_plugin(
            &mut self,
            _plan: &BuildPlan,
            plugin_dir: &Path,
        ) -> Result<(), PluginError> {
            let name = plugin_dir.file_name().unwrap().to_str().unwrap().to_string();
            self.calls.push(format!("process:{name}"));
            if Some(name.as_str()) == self.failing_dir {
                return Err(PluginError::Process {
                    plugin: name,
                    error: "simulated failure".to_string(),
                });
            }
            Ok(())
        }

        fn validate_project_versions(&mut self, _plan: &BuildPlan) -> Result<(), PluginError> {
            self.calls.push("validate".to_string());
            Ok(())
        }

        fn build_tests(&mut self, _plan: &BuildPlan) -> Result<(), PluginError> {
            self.calls.push("tests".to_string());
            Ok(())
        }

        fn generate_packages(&mut self, _plan: &BuildPlan) -> Result<(), PluginError> {
            self.calls.push("pack".to_string());
            Ok(())
        }
    }

    fn finalize(mutate: impl FnOnce(&mut PlanOptions)) -> BuildPlan {
        let mut options = plan_options_at(Path::new("project"));
        mutate(&mut options);
        let mut reporter = RecordingReporter::new();
        BuildPlan::finalize(options, &mut reporter)
    }

    fn scan_dirs(names: &'static [&'static str]) -> impl Fn(&Path) -> Result<Vec<PathBuf>, FilesystemError> {
        move |root: &Path| Ok(names.iter().map(|n| root.join(n)).collect())
    }

    #[test]
    fn test_full_run_orders_phases() {
        let plan = finalize(|o| {
            o.build_tests = true;
            o.skip_codesign = true;
        });
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        let mut sequencer = PhaseSequencer::new(&plan);
        let terminal = sequencer
            .run(
                &toolchain,
                &mut manager,
                &mut reporter,
                scan_dirs(&["Apple.GameKit", "Apple.Core"]),
            )
            .unwrap();

        assert_eq!(terminal, Phase::Done);
        assert_eq!(
            manager.calls,
            [
                "scan",
                "process:Apple.Core",
                "process:Apple.GameKit",
                "validate",
                "tests",
                "pack"
            ]
        );
    }

    #[test]
    fn test_plugin_failure_does_not_block_later_phases() {
        let plan = finalize(|o| {
            o.build_tests = true;
            o.skip_codesign = true;
        });
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager {
            failing_dir: Some("Apple.Core"),
            ..FakeManager::default()
        };
        let mut reporter = RecordingReporter::new();

        let mut sequencer = PhaseSequencer::new(&plan);
        let terminal = sequencer
            .run(
                &toolchain,
                &mut manager,
                &mut reporter,
                scan_dirs(&["Apple.Core", "Apple.GameKit"]),
            )
            .unwrap();

        assert_eq!(terminal, Phase::Done);
        // the failing plug-in is reported, the rest still run
        assert!(reporter.warnings().iter().any(|w| w.contains("Apple.Core")));
        assert!(manager.calls.contains(&"process:Apple.GameKit".to_string()));
        assert!(manager.calls.contains(&"validate".to_string()));
        assert!(manager.calls.contains(&"tests".to_string()));
        assert!(manager.calls.contains(&"pack".to_string()));
    }

    #[test]
    fn test_disabled_build_skips_configure_and_processing() {
        let plan = finalize(|o| {
            o.build_actions = vec!["none".to_string()];
            o.build_tests = true;
        });
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        let mut sequencer = PhaseSequencer::new(&plan);
        sequencer
            .run(&toolchain, &mut manager, &mut reporter, scan_dirs(&[]))
            .unwrap();

        // tests run without a fresh native build
        assert_eq!(manager.calls, ["tests"]);
        assert_eq!(plan.codesign_hash(), None);
    }

    #[test]
    fn test_pack_only_runs_packaging_alone() {
        let plan = finalize(|o| o.build_actions = vec!["pack".to_string()]);
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        let mut sequencer = PhaseSequencer::new(&plan);
        sequencer
            .run(&toolchain, &mut manager, &mut reporter, scan_dirs(&[]))
            .unwrap();

        assert_eq!(manager.calls, ["pack"]);
    }

    #[test]
    fn test_skip_codesign_resolves_empty_hash() {
        let plan = finalize(|o| {
            o.build_actions = vec!["build".to_string()];
            o.skip_codesign = true;
        });
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        PhaseSequencer::new(&plan)
            .run(&toolchain, &mut manager, &mut reporter, scan_dirs(&[]))
            .unwrap();

        assert_eq!(plan.codesign_hash(), Some(""));
    }

    #[test]
    fn test_supplied_identity_is_used_without_prompting() {
        let plan = finalize(|o| {
            o.build_actions = vec!["build".to_string()];
            o.codesign_identity = "CAFEBABE".to_string();
        });
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        PhaseSequencer::new(&plan)
            .run(&toolchain, &mut manager, &mut reporter, scan_dirs(&[]))
            .unwrap();

        assert_eq!(plan.codesign_hash(), Some("CAFEBABE"));
    }

    #[test]
    fn test_missing_identity_prompts() {
        let plan = finalize(|o| o.build_actions = vec!["build".to_string()]);
        let toolchain = FakeToolchain::default();
        let mut manager = FakeManager::default();
        let mut reporter = RecordingReporter::new();

        PhaseSequencer::new(&plan)
            .run(&toolchain, &mut manager, &mut reporter, scan_dirs(&[]))
            .unwrap();

        assert_eq!(plan.codesign_hash(), Some("PROMPTED"));
    }
}
