//! Build plan assembly
//!
//! Resolves the raw command-line selections into an immutable [`BuildPlan`].
//! Resolution never aborts: malformed tokens warn and fall back to axis
//! defaults, and the cross-axis test dependency is auto-corrected.

use std::cell::OnceCell;
use std::path::PathBuf;

use crate::config::defaults::CORE_PLUGIN_DIR;
use crate::core::axes::{BuildAction, CleanAction, ConfigId, PlatformId, PluginId};
use crate::core::report::Reporter;
use crate::core::selection::{self, AxisDefault, SelectionSet, SentinelSupport};

/// Raw, unresolved options for one invocation
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub plugin_list: Vec<String>,
    pub platform_list: Vec<String>,
    pub build_actions: Vec<String>,
    pub clean_actions: Vec<String>,
    pub debug: bool,
    pub simulator_build: bool,
    pub build_tests: bool,
    pub force_clean: bool,
    pub skip_codesign: bool,
    pub codesign_identity: String,
    pub unity_install_root: PathBuf,
    pub plugin_root: PathBuf,
    pub build_output_path: PathBuf,
    pub test_output_root: PathBuf,
}

/// The resolved execution plan for one invocation
///
/// Immutable once finalized, with two exceptions: path preparation returns
/// an updated plan carrying the timestamped test-run path, and the codesign
/// hash is filled lazily during build configuration.
#[derive(Debug)]
pub struct BuildPlan {
    pub plugins: SelectionSet<PluginId>,
    pub platforms: SelectionSet<PlatformId>,
    pub build_actions: SelectionSet<BuildAction>,
    pub clean_actions: SelectionSet<CleanAction>,
    pub debug: bool,
    pub simulator_build: bool,
    pub build_tests: bool,
    pub force_clean: bool,
    pub skip_codesign: bool,
    pub codesign_identity: String,
    pub unity_install_root: PathBuf,
    pub plugin_root: PathBuf,
    pub build_output_path: PathBuf,
    pub test_output_root: PathBuf,
    /// Derived by path preparation, only when tests are requested
    pub test_output_run_path: Option<PathBuf>,
    codesign_hash: OnceCell<String>,
}

impl BuildPlan {
    /// Resolve raw options into a finalized plan
    pub fn finalize(options: PlanOptions, reporter: &mut dyn Reporter) -> Self {
        let build_actions = selection::resolve::<BuildAction>(
            &options.build_actions,
            SentinelSupport::AllAndNone,
            AxisDefault::AllOn,
            reporter,
        );

        let platforms = selection::resolve::<PlatformId>(
            &options.platform_list,
            SentinelSupport::AllOnly,
            AxisDefault::AllOn,
            reporter,
        );

        let mut plugins = selection::resolve::<PluginId>(
            &options.plugin_list,
            SentinelSupport::AllOnly,
            AxisDefault::AllOn,
            reporter,
        );

        let clean_actions = selection::resolve::<CleanAction>(
            &options.clean_actions,
            SentinelSupport::AllAndNone,
            AxisDefault::AllOff,
            reporter,
        );

        // Tests cannot build without the core plug-in: every other plug-in
        // links against it.
        if options.build_tests && !plugins.is_selected(PluginId::Core) {
            reporter.warning(&format!(
                "Build tests (-t) set, but {CORE_PLUGIN_DIR} has not been selected to process."
            ));
            reporter.info(&format!(
                "All plug-ins are dependent upon {CORE_PLUGIN_DIR}, so it must be built for tests to build successfully."
            ));
            reporter.status(&format!("Adding {CORE_PLUGIN_DIR} to selected plug-ins."));
            plugins.select(PluginId::Core);
        }

        Self {
            plugins,
            platforms,
            build_actions,
            clean_actions,
            debug: options.debug,
            simulator_build: options.simulator_build,
            build_tests: options.build_tests,
            force_clean: options.force_clean,
            skip_codesign: options.skip_codesign,
            codesign_identity: options.codesign_identity,
            unity_install_root: options.unity_install_root,
            plugin_root: options.plugin_root,
            build_output_path: options.build_output_path,
            test_output_root: options.test_output_root,
            test_output_run_path: None,
            codesign_hash: OnceCell::new(),
        }
    }

    /// Native build configuration derived from the debug flag
    pub fn config(&self) -> ConfigId {
        if self.debug {
            ConfigId::Debug
        } else {
            ConfigId::Release
        }
    }

    /// The resolved codesign hash, if build configuration has run
    ///
    /// The empty string means signing was explicitly skipped, which is
    /// distinct from `None` ("not yet resolved").
    pub fn codesign_hash(&self) -> Option<&str> {
        self.codesign_hash.get().map(String::as_str)
    }

    /// Record the resolved codesign hash. Later calls are no-ops.
    pub(crate) fn set_codesign_hash(&self, hash: String) {
        if self.codesign_hash.set(hash).is_err() {
            tracing::debug!("codesign hash already resolved");
        }
    }

    /// Attach the timestamped test-run directory derived during preparation
    pub(crate) fn with_test_run_path(mut self, path: PathBuf) -> Self {
        self.test_output_run_path = Some(path);
        self
    }
}
