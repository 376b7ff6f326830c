// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use baker_supervisor::config::{
    DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path,
};
use baker_supervisor::errors::SupervisorError;

#[test]
fn full_config_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[baker]
executable = "./octez-baker-alpha"
rpc_port = 18731
base_dir = "/tmp/client"
node_dir = "/tmp/node"
account = "bootstrap5"
params = ["--media-type", "json"]
run_params = ["--liquidity-baking-toggle-vote", "pass"]
log_file = "/tmp/baker.log"

[shutdown]
term_timeout = "2s"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.params.executable, PathBuf::from("./octez-baker-alpha"));
    assert_eq!(cfg.params.endpoint(), "http://127.0.0.1:18731");
    assert_eq!(cfg.params.account, "bootstrap5");
    assert_eq!(cfg.params.params, vec!["--media-type", "json"]);
    assert_eq!(
        cfg.params.run_params,
        vec!["--liquidity-baking-toggle-vote", "pass"]
    );
    assert_eq!(cfg.params.log_file, Some(PathBuf::from("/tmp/baker.log")));
    assert_eq!(cfg.term_timeout, Duration::from_secs(2));
}

#[test]
fn missing_baker_section_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[shutdown]\nterm_timeout = \"1s\"\n").unwrap();

    match load_from_path(file.path()) {
        Err(SupervisorError::TomlError(e)) => assert!(e.to_string().contains("baker")),
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_and_validate(dir.path().join("Baker.toml"));
    assert!(matches!(result, Err(SupervisorError::IoError(_))));
}

#[test]
fn default_path_is_baker_toml() {
    assert_eq!(DEFAULT_CONFIG_FILE, "Baker.toml");
    assert_eq!(default_config_path(), PathBuf::from(DEFAULT_CONFIG_FILE));
}
