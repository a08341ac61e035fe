//! Plug-in processing order
//!
//! Every plug-in depends on the core plug-in, so its directory always moves
//! to the front of the processing queue. All other entries keep the order
//! the directory scan produced.

use std::ffi::OsStr;
use std::path::PathBuf;

use crate::config::defaults::CORE_PLUGIN_DIR;

/// Reorder scanned plug-in directories so the core plug-in comes first
pub fn core_first(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut ordered = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let is_core = dir.file_name().and_then(OsStr::to_str) == Some(CORE_PLUGIN_DIR);
        if is_core {
            ordered.insert(0, dir);
        } else {
            ordered.push(dir);
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("plug-ins").join(n)).collect()
    }

    #[test]
    fn test_core_moves_to_front() {
        let ordered = core_first(paths(&["Apple.GameKit", "Apple.Core", "Apple.PHASE"]));
        let names: Vec<_> = ordered
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["Apple.Core", "Apple.GameKit", "Apple.PHASE"]);
    }

    #[test]
    fn test_non_core_keep_scan_order() {
        let ordered = core_first(paths(&["Apple.PHASE", "Apple.GameKit", "Apple.Core"]));
        let names: Vec<_> = ordered
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["Apple.Core", "Apple.PHASE", "Apple.GameKit"]);
    }

    #[test]
    fn test_without_core_order_is_unchanged() {
        let input = paths(&["Apple.GameKit", "Apple.Accessibility"]);
        assert_eq!(core_first(input.clone()), input);
    }

    #[test]
    fn test_empty_scan() {
        assert!(core_first(Vec::new()).is_empty());
    }
}
