//! End-to-end pipeline tests: config file -> credentials -> launcher

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use superglance_core::{
    resolver, runner, ClientExit, ConfigError, ConfigStore, KeystoneCredentials, LaunchError,
    LaunchRequest, Launcher,
};
use superglance_secrets::{MemoryStore, StoreKey};

/// Initialize tracing for tests
fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("superglance_core=debug")
        .with_test_writer()
        .try_init();
}

/// Launcher that records every request instead of starting glance
#[derive(Default)]
struct RecordingLauncher {
    requests: Mutex<Vec<(String, LaunchRequest)>>,
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(
        &self,
        environment: &str,
        request: LaunchRequest,
    ) -> Result<ClientExit, LaunchError> {
        self.requests
            .lock()
            .unwrap()
            .push((environment.to_string(), request));
        Ok(ClientExit::from_code(0))
    }
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_keyring_and_literal_credentials() {
    init_test();

    let file = config_file("[dev]\nos_username = USE_KEYRING\nos_password = \"secret\"\n");
    let config = ConfigStore::with_candidates(vec![file.path().to_path_buf()]);
    let document = config.load().unwrap();

    let store = MemoryStore::new().with(&StoreKey::new("dev", "OS_USERNAME"), "secret1");
    let entries = resolver::resolve(document, "dev", &store).unwrap();

    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.key.as_str(), e.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("OS_USERNAME", "secret1"), ("OS_PASSWORD", "secret")]
    );

    let keystone = KeystoneCredentials::from_entries(&entries);
    assert_eq!(keystone.fields().len(), 2);
    assert_eq!(keystone.get("username"), Some("secret1"));
    assert_eq!(keystone.get("password"), Some("secret"));
}

#[tokio::test]
async fn test_group_launches_each_member_in_order() {
    init_test();

    let file = config_file(
        "[prod]\ngroup = [east,west]\n\n\
         [east]\nos_region_name = east-1\nos_password = USE_KEYRING['shared']\n\n\
         [west]\nos_region_name = west-1\nos_password = USE_KEYRING['shared']\n",
    );
    let config = ConfigStore::with_candidates(vec![file.path().to_path_buf()]);
    let document = config.load().unwrap();
    let store = MemoryStore::new().with(&StoreKey::global("shared"), "pw");
    let launcher = RecordingLauncher::default();

    let plan = runner::plan(document, "prod", &["image-list".to_string()]).unwrap();
    let summary = runner::execute(document, &store, &launcher, &plan, false)
        .await
        .unwrap();

    assert_eq!(summary.exit_code(), 0);

    let requests = launcher.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);

    let (first_env, first) = &requests[0];
    let (second_env, second) = &requests[1];
    assert_eq!(first_env, "east");
    assert_eq!(second_env, "west");
    assert_eq!(first.args, vec!["-k", "image-list"]);
    assert_eq!(
        first.environment.get("OS_REGION_NAME"),
        Some(OsStr::new("east-1"))
    );
    assert_eq!(
        second.environment.get("OS_REGION_NAME"),
        Some(OsStr::new("west-1"))
    );
    assert_eq!(second.environment.get("OS_PASSWORD"), Some(OsStr::new("pw")));
}

#[tokio::test]
async fn test_environments_do_not_leak_into_each_other() {
    init_test();

    let file = config_file(
        "[all]\ngroup = a, b\n[a]\nos_tenant_name = only-a\n[b]\nos_username = bob\n",
    );
    let config = ConfigStore::with_candidates(vec![file.path().to_path_buf()]);
    let document = config.load().unwrap();
    let launcher = RecordingLauncher::default();

    let plan = runner::plan(document, "all", &["image-list".to_string()]).unwrap();
    runner::execute(document, &MemoryStore::new(), &launcher, &plan, false)
        .await
        .unwrap();

    let requests = launcher.requests.lock().unwrap();
    let (_, b) = &requests[1];
    assert_eq!(b.environment.get("OS_USERNAME"), Some(OsStr::new("bob")));
    if std::env::var_os("OS_TENANT_NAME").is_none() {
        assert_eq!(b.environment.get("OS_TENANT_NAME"), None);
    }
}

#[test]
fn test_missing_config_everywhere() {
    let config = ConfigStore::with_candidates(vec![
        PathBuf::from("/definitely/not/a/real/home/.superglance"),
        PathBuf::from("/definitely/not/a/real/cwd/.superglance"),
    ]);

    match config.load() {
        Err(ConfigError::NotFound { searched }) => assert_eq!(searched.len(), 2),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_local_config_overrides_home_config() {
    let home = config_file("[dev]\nos_username = home-user\nos_auth_url = https://id\n");
    let local = config_file("[dev]\nos_username = local-user\n");
    let config = ConfigStore::with_candidates(vec![
        home.path().to_path_buf(),
        local.path().to_path_buf(),
    ]);

    let entries = resolver::resolve(config.load().unwrap(), "dev", &MemoryStore::new()).unwrap();
    let username = entries.iter().find(|e| e.key == "OS_USERNAME").unwrap();
    assert_eq!(username.value, "local-user");
    assert!(entries.iter().any(|e| e.key == "OS_AUTH_URL"));
}
