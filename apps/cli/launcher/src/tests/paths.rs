use crate::paths::{CONFIG_DIR_VAR, PathSource, detect_paths_with};

use std::path::PathBuf;

/// **VALUE**: Verifies the override variable wins and puts logs under it.
///
/// **BUG THIS CATCHES**: Would catch the override being ignored, which makes the
/// launcher read a developer's real config during tests and CI runs.
#[test]
fn given_config_dir_override_when_detecting_then_uses_it() {
    // GIVEN: The override set
    let lookup = |name: &str| (name == CONFIG_DIR_VAR).then(|| "/srv/bridge".to_string());

    // WHEN: Detecting
    let paths = detect_paths_with(lookup);

    // THEN
    assert_eq!(paths.source, PathSource::EnvVar);
    assert_eq!(paths.config_dir, PathBuf::from("/srv/bridge"));
    assert_eq!(paths.log_dir, PathBuf::from("/srv/bridge/logs"));
}

#[test]
fn given_blank_override_when_detecting_then_ignored() {
    let paths = detect_paths_with(|_| Some("   ".to_string()));

    assert_ne!(paths.source, PathSource::EnvVar);
    assert!(paths.config_dir.ends_with("content-bridge"));
    assert!(paths.log_dir.ends_with("logs"));
}
