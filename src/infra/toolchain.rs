//! Xcode toolchain integration
//!
//! Queries the active toolchain's version and discovers codesigning
//! identities from the keychain, prompting the user to pick one when no
//! identity was supplied on the command line.

use std::io::{self, Write};
use std::process::Command;

use crate::core::report::Reporter;
use crate::core::sequencer::{Toolchain, ToolchainVersion};
use crate::error::ToolchainError;

/// The locally installed Xcode toolchain
#[derive(Debug, Default)]
pub struct XcodeToolchain;

impl XcodeToolchain {
    pub fn new() -> Self {
        Self
    }
}

impl Toolchain for XcodeToolchain {
    fn versions(&self) -> Result<ToolchainVersion, ToolchainError> {
        which::which("xcodebuild").map_err(|_| ToolchainError::XcodeNotFound)?;

        let output = Command::new("xcodebuild")
            .arg("-version")
            .output()
            .map_err(|e| ToolchainError::VersionQuery {
                error: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(ToolchainError::VersionQuery {
                error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_version_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn prompt_codesign_identity(
        &self,
        reporter: &mut dyn Reporter,
    ) -> Result<String, ToolchainError> {
        let identities = list_codesign_identities()?;
        if identities.is_empty() {
            return Err(ToolchainError::NoIdentities);
        }

        reporter.message("Available codesigning identities:");
        for (index, identity) in identities.iter().enumerate() {
            reporter.message(&format!(
                "  [{}] {} \"{}\"",
                index + 1,
                identity.hash,
                identity.name
            ));
        }

        loop {
            print!("Select an identity by number (or paste a hash): ");
            io::stdout().flush().map_err(|e| ToolchainError::Prompt {
                error: e.to_string(),
            })?;

            let mut line = String::new();
            io::stdin()
                .read_line(&mut line)
                .map_err(|e| ToolchainError::Prompt {
                    error: e.to_string(),
                })?;
            let entry = line.trim();

            if let Ok(index) = entry.parse::<usize>() {
                if (1..=identities.len()).contains(&index) {
                    return Ok(identities[index - 1].hash.clone());
                }
            } else if !entry.is_empty() {
                // Treat any non-numeric entry as a pasted hash.
                return Ok(entry.to_string());
            }
            reporter.warning("Invalid selection.");
        }
    }
}

/// One codesigning identity from the keychain
#[derive(Debug, Clone, PartialEq, Eq)]
struct CodesignIdentity {
    hash: String,
    name: String,
}

fn list_codesign_identities() -> Result<Vec<CodesignIdentity>, ToolchainError> {
    let output = Command::new("security")
        .args(["find-identity", "-v", "-p", "codesigning"])
        .output()
        .map_err(|e| ToolchainError::IdentityDiscovery {
            error: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(ToolchainError::IdentityDiscovery {
            error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(parse_identity_output(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `xcodebuild -version` output
///
/// Typical output:
/// ```text
/// Xcode 15.4
/// Build version 15F31d
/// ```
fn parse_version_output(stdout: &str) -> Result<ToolchainVersion, ToolchainError> {
    let mut version = None;
    let mut build_number = None;
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Xcode ") {
            version = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Build version ") {
            build_number = Some(rest.trim().to_string());
        }
    }
    match (version, build_number) {
        (Some(version), Some(build_number)) => Ok(ToolchainVersion {
            version,
            build_number,
        }),
        _ => Err(ToolchainError::VersionQuery {
            error: format!("unexpected xcodebuild output: {stdout:?}"),
        }),
    }
}

/// Parse `security find-identity` output
///
/// Identity lines look like:
/// ```text
///   1) A1B2C3D4E5F6A7B8C9D0E1F2A3B4C5D6E7F8A9B0 "Apple Development: Jane Doe (TEAM1234)"
/// ```
fn parse_identity_output(stdout: &str) -> Vec<CodesignIdentity> {
    let mut identities = Vec::new();
    for line in stdout.lines() {
        let Some((_, rest)) = line.trim_start().split_once(") ") else {
            continue;
        };
        let Some((hash, quoted)) = rest.split_once(' ') else {
            continue;
        };
        let name = quoted.trim().trim_matches('"');
        if hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit()) {
            identities.push(CodesignIdentity {
                hash: hash.to_string(),
                name: name.to_string(),
            });
        }
    }
    identities
}
