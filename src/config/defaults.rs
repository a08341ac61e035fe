//! Default configuration values

use std::path::PathBuf;

/// Folder under the repository root that holds the plug-in sources
pub const PLUGIN_ROOT_DIR: &str = "plug-ins";

/// Default folder for finished packages
pub const BUILD_OUTPUT_DIR: &str = "Build";

/// Default root folder for test-player builds
pub const TEST_OUTPUT_DIR: &str = "TestBuilds";

/// Prefix for per-invocation test output directories
pub const TEST_RUN_PREFIX: &str = "TestBuild_";

/// Timestamp format for per-invocation test output directories
pub const TEST_RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Folder name of the plug-in every other plug-in depends on
pub const CORE_PLUGIN_DIR: &str = "Apple.Core";

/// Suffix appended to a plug-in folder name to locate its Unity project
pub const UNITY_PROJECT_SUFFIX: &str = "_Unity";

/// Folder inside a plug-in Unity project that receives test players
pub const TEST_PLAYER_DIR: &str = "TestPlayers";

/// Default root to search for Unity installations
///
/// The Unity Hub installs editors under /Applications/Unity on macOS;
/// per-user installs live under the home directory instead.
pub fn default_unity_install_root() -> PathBuf {
    let system_root = PathBuf::from("/Applications/Unity");
    if system_root.is_dir() {
        return system_root;
    }
    dirs::home_dir()
        .map(|home| home.join("Applications").join("Unity"))
        .unwrap_or(system_root)
}
