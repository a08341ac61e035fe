//! Error types for plugbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to list a directory's entries
    #[error("Failed to scan directory '{path}': {error}")]
    Scan { path: PathBuf, error: String },

    /// Failed to read a confirmation from the terminal
    #[error("Failed to read confirmation prompt: {error}")]
    Prompt { error: String },

    /// A timestamped test-run directory already exists
    #[error(
        "Test run directory already exists: '{path}'. \
         Refusing to mix artifacts from two test runs."
    )]
    TestRunCollision { path: PathBuf },
}

/// Native toolchain errors
#[derive(Error, Debug)]
pub enum ToolchainError {
    /// xcodebuild is not on PATH
    #[error("xcodebuild not found on PATH. Install Xcode and the Xcode Command Line Tools.")]
    XcodeNotFound,

    /// Version query failed
    #[error("Failed to query the Xcode version: {error}")]
    VersionQuery { error: String },

    /// Codesigning identity discovery failed
    #[error("Failed to list codesigning identities: {error}")]
    IdentityDiscovery { error: String },

    /// The keychain holds no codesigning identities
    #[error("No codesigning identities available in the keychain")]
    NoIdentities,

    /// Reading the identity selection failed
    #[error("Failed to read codesign identity selection: {error}")]
    Prompt { error: String },
}

/// Plug-in processing errors
#[derive(Error, Debug)]
pub enum PluginError {
    /// Native build failed for one plug-in
    #[error("Processing failed for plug-in '{plugin}': {error}")]
    Process { plugin: String, error: String },

    /// Unity installation scan failed
    #[error("Unity installation scan failed under '{root}': {error}")]
    UnityScan { root: PathBuf, error: String },

    /// No Unity installation was discovered
    #[error("No Unity installation found under '{root}'")]
    NoUnityInstallation { root: PathBuf },

    /// Project version validation failed
    #[error("Project version validation failed: {error}")]
    Validate { error: String },

    /// Unity test-player build failed
    #[error("Test build failed for plug-in '{plugin}': {error}")]
    Tests { plugin: String, error: String },

    /// Tests requested but the run directory was never prepared
    #[error("Test output directory was not prepared")]
    TestOutputMissing,

    /// Package generation failed
    #[error("Package generation failed for plug-in '{plugin}': {error}")]
    Packaging { plugin: String, error: String },
}

/// Top-level plugbuild error type
#[derive(Error, Debug)]
pub enum PlugbuildError {
    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Toolchain error
    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),

    /// Plug-in error
    #[error("Plug-in error: {0}")]
    Plugin(#[from] PluginError),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
