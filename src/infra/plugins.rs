//! Native plug-in processing
//!
//! Drives xcodebuild for native libraries, Unity batch-mode invocations for
//! project validation and test players, and npm for package generation.
//! Each plug-in's directory layout follows the suite convention:
//! `<Folder>/Native/<Folder>.xcodeproj` for the native project and
//! `<Folder>/<Folder>_Unity` for the Unity project.

use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::cli::output::create_spinner;
use crate::config::defaults::UNITY_PROJECT_SUFFIX;
use crate::core::axes::{CleanAction, PlatformId, PluginId};
use crate::core::plan::BuildPlan;
use crate::core::selection::AxisMember;
use crate::core::sequencer::PluginManager;
use crate::error::PluginError;

/// A discovered Unity editor installation
#[derive(Debug, Clone)]
pub struct UnityInstallation {
    pub version: String,
    pub executable: PathBuf,
}

/// Processes plug-ins with the local Xcode and Unity toolchains
#[derive(Debug, Default)]
pub struct XcodePluginManager {
    unity_installations: Vec<UnityInstallation>,
}

impl XcodePluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn unity_project_dir(plan: &BuildPlan, plugin: PluginId) -> PathBuf {
        let folder = plugin.folder_name();
        plan.plugin_root
            .join(folder)
            .join(format!("{folder}{UNITY_PROJECT_SUFFIX}"))
    }
}

impl PluginManager for XcodePluginManager {
    fn scan_unity_installations(&mut self, plan: &BuildPlan) -> Result<(), PluginError> {
        let spinner = create_spinner("Scanning for Unity installations");
        self.unity_installations.clear();

        // Full recursive search: the Unity Hub nests editors several levels
        // below the install root.
        for entry in WalkDir::new(&plan.unity_install_root)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_dir() || entry.file_name() != "Unity.app" {
                continue;
            }
            let executable = entry.path().join("Contents").join("MacOS").join("Unity");
            if !executable.is_file() {
                continue;
            }
            // The Hub keeps each editor in a folder named after its version.
            let version = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .and_then(|name| name.to_str())
                .unwrap_or("unknown")
                .to_string();
            tracing::info!(%version, path = %executable.display(), "found Unity installation");
            self.unity_installations.push(UnityInstallation {
                version,
                executable,
            });
        }
        spinner.finish_and_clear();

        if self.unity_installations.is_empty() {
            return Err(PluginError::NoUnityInstallation {
                root: plan.unity_install_root.clone(),
            });
        }
        Ok(())
    }

    fn process_plugin(&mut self, plan: &BuildPlan, plugin_dir: &Path) -> Result<(), PluginError> {
        let Some(folder) = plugin_dir.file_name().and_then(|name| name.to_str()) else {
            return Ok(());
        };
        let Some(plugin) = PluginId::from_folder_name(folder) else {
            tracing::debug!(%folder, "skipping unrecognized directory in plug-in root");
            return Ok(());
        };
        if !plan.plugins.is_selected(plugin) {
            tracing::debug!(%folder, "plug-in not selected, skipping");
            return Ok(());
        }

        let project = plugin_dir.join("Native").join(format!("{folder}.xcodeproj"));
        if !project.is_dir() {
            return Err(PluginError::Process {
                plugin: folder.to_string(),
                error: format!("native Xcode project not found at '{}'", project.display()),
            });
        }

        if plan.clean_actions.is_selected(CleanAction::Native) {
            run_xcodebuild(&project, folder, plan, None, "clean").map_err(|error| {
                PluginError::Process {
                    plugin: folder.to_string(),
                    error,
                }
            })?;
        }

        for platform in plan.platforms.selected() {
            let spinner = create_spinner(&format!(
                "Building {folder} ({}, {})",
                platform_label(platform, plan.simulator_build),
                plan.config()
            ));
            let result = run_xcodebuild(&project, folder, plan, Some(platform), "build");
            spinner.finish_and_clear();
            result.map_err(|error| PluginError::Process {
                plugin: folder.to_string(),
                error,
            })?;
        }
        Ok(())
    }

    fn validate_project_versions(&mut self, plan: &BuildPlan) -> Result<(), PluginError> {
        let unity = self
            .unity_installations
            .first()
            .ok_or_else(|| PluginError::Validate {
                error: "no Unity installation discovered".to_string(),
            })?;

        for plugin in plan.plugins.selected() {
            let project = Self::unity_project_dir(plan, plugin);
            if !project.is_dir() {
                tracing::debug!(plugin = plugin.folder_name(), "no Unity project, skipping");
                continue;
            }
            // Opening the project in batch mode makes the editor reconcile
            // project metadata and regenerate missing .meta files.
            let spinner = create_spinner(&format!("Validating {}", plugin.folder_name()));
            let mut cmd = Command::new(&unity.executable);
            cmd.args(["-batchmode", "-quit"])
                .arg("-projectPath")
                .arg(&project)
                .args(["-logFile", "-"]);
            let result = run_logged(cmd);
            spinner.finish_and_clear();
            result.map_err(|error| PluginError::Validate {
                error: format!("{}: {error}", plugin.folder_name()),
            })?;
        }
        Ok(())
    }

    fn build_tests(&mut self, plan: &BuildPlan) -> Result<(), PluginError> {
        let output_root = plan
            .test_output_run_path
            .clone()
            .ok_or(PluginError::TestOutputMissing)?;

        for plugin in plan.plugins.selected() {
            let folder = plugin.folder_name();
            let project = Self::unity_project_dir(plan, plugin);
            if !project.is_dir() {
                tracing::debug!(%folder, "no Unity project, skipping test build");
                continue;
            }

            // Tests may run without a fresh native build, in which case no
            // installation scan has happened yet.
            if self.unity_installations.is_empty() {
                self.scan_unity_installations(plan)?;
            }
            let Some(unity) = self.unity_installations.first() else {
                return Err(PluginError::NoUnityInstallation {
                    root: plan.unity_install_root.clone(),
                });
            };

            let spinner = create_spinner(&format!("Building tests for {folder}"));
            let mut cmd = Command::new(&unity.executable);
            cmd.args(["-batchmode", "-quit"])
                .arg("-projectPath")
                .arg(&project)
                .args(["-executeMethod", "TestPlayerBuilder.BuildAll"])
                .arg("-testPlayerOutput")
                .arg(output_root.join(folder))
                .args(["-logFile", "-"]);
            let result = run_logged(cmd);
            spinner.finish_and_clear();
            result.map_err(|error| PluginError::Tests {
                plugin: folder.to_string(),
                error,
            })?;
        }
        Ok(())
    }

    fn generate_packages(&mut self, plan: &BuildPlan) -> Result<(), PluginError> {
        for plugin in plan.plugins.selected() {
            let folder = plugin.folder_name();
            let package_dir = Self::unity_project_dir(plan, plugin).join("Assets").join(folder);
            if !package_dir.join("package.json").is_file() {
                tracing::debug!(%folder, "no package.json, skipping packaging");
                continue;
            }

            let spinner = create_spinner(&format!("Packaging {folder}"));
            let mut cmd = Command::new("npm");
            cmd.arg("pack")
                .arg("--pack-destination")
                .arg(&plan.build_output_path)
                .current_dir(&package_dir);
            let result = run_logged(cmd);
            spinner.finish_and_clear();
            result.map_err(|error| PluginError::Packaging {
                plugin: folder.to_string(),
                error,
            })?;
            tracing::info!(%folder, output = %plan.build_output_path.display(), "package created");
        }
        Ok(())
    }
}

fn platform_label(platform: PlatformId, simulator: bool) -> String {
    if simulator && platform != PlatformId::Macos {
        format!("{} simulator", platform.token())
    } else {
        platform.token().to_string()
    }
}

fn run_xcodebuild(
    project: &Path,
    scheme: &str,
    plan: &BuildPlan,
    platform: Option<PlatformId>,
    action: &str,
) -> Result<(), String> {
    let mut cmd = Command::new("xcodebuild");
    cmd.arg("-project")
        .arg(project)
        .args(["-scheme", scheme])
        .args(["-configuration", plan.config().name()]);
    if let Some(platform) = platform {
        cmd.args(["-destination", platform.destination(plan.simulator_build)]);
    }
    match plan.codesign_hash() {
        // Signing explicitly skipped.
        Some("") => {
            cmd.arg("CODE_SIGNING_ALLOWED=NO");
        }
        Some(hash) => {
            cmd.arg(format!("CODE_SIGN_IDENTITY={hash}"));
        }
        None => {}
    }
    cmd.arg(action);
    run_logged(cmd)
}

fn run_logged(mut cmd: Command) -> Result<(), String> {
    tracing::debug!(?cmd, "running command");
    let output = cmd.output().map_err(|e| e.to_string())?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    let tail = lines[lines.len().saturating_sub(12)..].join("\n");
    if tail.is_empty() {
        Err(format!("exited with {}", output.status))
    } else {
        Err(tail)
    }
}
