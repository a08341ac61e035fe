//! Closed selection vocabularies
//!
//! One enum per selection axis: plug-ins, target platforms, build actions,
//! and clean actions. Each implements [`AxisMember`] so that raw CLI tokens
//! can be resolved against it.

use crate::core::selection::AxisMember;

/// The plug-ins that make up the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginId {
    Accessibility,
    Core,
    CoreHaptics,
    GameController,
    GameKit,
    Phase,
}

impl PluginId {
    /// Folder name of this plug-in under the plug-in root
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Accessibility => "Apple.Accessibility",
            Self::Core => "Apple.Core",
            Self::CoreHaptics => "Apple.CoreHaptics",
            Self::GameController => "Apple.GameController",
            Self::GameKit => "Apple.GameKit",
            Self::Phase => "Apple.PHASE",
        }
    }

    /// Map a plug-in root folder name back to its identifier
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::MEMBERS.iter().copied().find(|p| p.folder_name() == name)
    }
}

impl AxisMember for PluginId {
    const AXIS: &'static str = "plug-in";
    const MEMBERS: &'static [Self] = &[
        Self::Accessibility,
        Self::Core,
        Self::CoreHaptics,
        Self::GameController,
        Self::GameKit,
        Self::Phase,
    ];

    fn token(self) -> &'static str {
        match self {
            Self::Accessibility => "accessibility",
            Self::Core => "core",
            Self::CoreHaptics => "corehaptics",
            Self::GameController => "gamecontroller",
            Self::GameKit => "gamekit",
            Self::Phase => "phase",
        }
    }
}

/// Target platforms for native library builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    Ios,
    Macos,
    Tvos,
}

impl PlatformId {
    /// xcodebuild destination specifier for this platform
    pub fn destination(self, simulator: bool) -> &'static str {
        match (self, simulator) {
            (Self::Ios, false) => "generic/platform=iOS",
            (Self::Ios, true) => "generic/platform=iOS Simulator",
            // macOS has no simulator variant
            (Self::Macos, _) => "generic/platform=macOS",
            (Self::Tvos, false) => "generic/platform=tvOS",
            (Self::Tvos, true) => "generic/platform=tvOS Simulator",
        }
    }
}

impl AxisMember for PlatformId {
    const AXIS: &'static str = "platform";
    const MEMBERS: &'static [Self] = &[Self::Ios, Self::Macos, Self::Tvos];

    fn token(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Tvos => "tvos",
        }
    }
}

/// Build phases that can be toggled per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildAction {
    Build,
    Pack,
}

impl AxisMember for BuildAction {
    const AXIS: &'static str = "build action";
    const MEMBERS: &'static [Self] = &[Self::Build, Self::Pack];

    fn token(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Pack => "pack",
        }
    }
}

/// Cleanup operations applied before building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanAction {
    Native,
    Packages,
    Tests,
}

impl AxisMember for CleanAction {
    const AXIS: &'static str = "clean action";
    const MEMBERS: &'static [Self] = &[Self::Native, Self::Packages, Self::Tests];

    fn token(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Packages => "packages",
            Self::Tests => "tests",
        }
    }
}

/// Native build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigId {
    Debug,
    Release,
}

impl ConfigId {
    /// Configuration name as passed to xcodebuild
    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl std::fmt::Display for ConfigId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_folder_round_trip() {
        for plugin in PluginId::MEMBERS {
            assert_eq!(PluginId::from_folder_name(plugin.folder_name()), Some(*plugin));
        }
    }

    #[test]
    fn test_unknown_folder_is_none() {
        assert_eq!(PluginId::from_folder_name("Apple.Unknown"), None);
        assert_eq!(PluginId::from_folder_name("core"), None);
    }

    #[test]
    fn test_macos_destination_ignores_simulator() {
        assert_eq!(
            PlatformId::Macos.destination(true),
            PlatformId::Macos.destination(false)
        );
    }

    #[test]
    fn test_simulator_destinations() {
        assert_eq!(PlatformId::Ios.destination(true), "generic/platform=iOS Simulator");
        assert_eq!(PlatformId::Tvos.destination(false), "generic/platform=tvOS");
    }
}
