use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_env_override() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("REKORDQUIZ_CONFIG_PATH", "/tmp/rekordquiz-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/rekordquiz-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("rekordquiz")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("rekordquiz")
            .join("config.toml")
    );
}

#[test]
fn log_path_defaults_to_xdg_state_home_unless_configured() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("rekordquiz")
            .join("rekordquiz.log")
    );

    let mut s = Settings::default();
    assert_eq!(s.log_path(), default_log_path());

    s.logging.file = Some("/tmp/custom.log".into());
    assert_eq!(s.log_path().unwrap(), std::path::PathBuf::from("/tmp/custom.log"));
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
source = "database"
path = "/music/rekordbox.json"
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[quiz]
sample_interval_ms = 250

[ui]
header_text = "hello"
reveal_fields = ["name", "artist", "bpm"]
reveal_separator = " | "

[logging]
level = "debug"
file = "/tmp/quiz.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("REKORDQUIZ_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("REKORDQUIZ__QUIZ__SAMPLE_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.source, SourceSetting::ReaderJson);
    assert_eq!(s.library.path.as_deref(), Some("/music/rekordbox.json"));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.quiz.sample_interval_ms, 250);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.reveal_fields,
        vec![RevealField::Title, RevealField::Artist, RevealField::Bpm]
    );
    assert_eq!(s.ui.reveal_separator, " | ");
    assert_eq!(s.logging.level, "debug");
    assert_eq!(s.logging.file.as_deref(), Some("/tmp/quiz.log"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[quiz]
sample_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("REKORDQUIZ_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("REKORDQUIZ__QUIZ__SAMPLE_INTERVAL_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.quiz.sample_interval_ms, 50);
}

#[test]
fn validate_rejects_tiny_sample_interval() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.quiz.sample_interval_ms = 5;
    assert!(s.validate().is_err());
}
