//! Unit Tests for Package Manager Detection
//!
//! Every combination of lockfiles must resolve by the fixed priority
//! bun > pnpm > yarn > npm.

use shadcn_term::{PackageManager, PackageManagerDetector};
use std::fs;
use tempfile::TempDir;

fn project_with(lockfiles: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for lockfile in lockfiles {
        fs::write(dir.path().join(lockfile), "").unwrap();
    }
    dir
}

fn detect(lockfiles: &[&str]) -> PackageManager {
    let project = project_with(lockfiles);
    PackageManagerDetector::new(project.path()).detect()
}

#[test]
fn test_every_marker_combination() {
    let markers = ["bun.lockb", "pnpm-lock.yaml", "yarn.lock"];

    for mask in 0u8..8 {
        let present: Vec<&str> = markers
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, marker)| *marker)
            .collect();

        let expected = if mask & 0b001 != 0 {
            PackageManager::Bun
        } else if mask & 0b010 != 0 {
            PackageManager::Pnpm
        } else if mask & 0b100 != 0 {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        };

        assert_eq!(detect(&present), expected, "lockfiles: {:?}", present);
    }
}

#[test]
fn test_text_bun_lockfile() {
    assert_eq!(detect(&["bun.lock"]), PackageManager::Bun);
    assert_eq!(detect(&["bun.lock", "pnpm-lock.yaml"]), PackageManager::Bun);
}

#[test]
fn test_npm_lockfile_is_the_fallback() {
    assert_eq!(detect(&["package-lock.json"]), PackageManager::Npm);
    assert_eq!(detect(&["package-lock.json", "yarn.lock"]), PackageManager::Yarn);
}

#[test]
fn test_missing_project_root_falls_back_to_npm() {
    let detector = PackageManagerDetector::new("/definitely/not/a/project");
    assert_eq!(detector.detect(), PackageManager::Npm);
}

#[test]
fn test_marker_directory_counts_as_present() {
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join("pnpm-lock.yaml")).unwrap();
    assert_eq!(
        PackageManagerDetector::new(project.path()).detect(),
        PackageManager::Pnpm
    );
}

#[test]
fn test_detection_has_no_side_effects() {
    let project = project_with(&["yarn.lock"]);
    let detector = PackageManagerDetector::new(project.path());
    detector.detect();
    detector.detect();

    let entries: Vec<_> = fs::read_dir(project.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
