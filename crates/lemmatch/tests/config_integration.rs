//! Configuration integration tests.
//!
//! Each test runs the binary inside a sandbox with its own home and XDG
//! directories and no `LEMMATCH_*` variables inherited from the caller, then
//! asserts on matching and collaborator settings through `info --json` or on
//! the behavior of `find`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INHERITED_VARS: &[&str] = &[
    "LEMMATCH_MODE",
    "LEMMATCH_GENERATIVE__API_KEY",
    "LEMMATCH_GENERATIVE__MODEL",
    "LEMMATCH_GENERATIVE__ENDPOINT",
    "LEMMATCH_MATCHER__MAX_PUNCT_SKIPS",
    "LEMMATCH_MAX_INPUT_BYTES",
    "LEMMATCH_DISABLE_INPUT_LIMIT",
    "LEMMATCH_LEXICON__PATH",
    "LEMMATCH_LEXICON__URL",
    "LEMMATCH_LOG_PATH",
    "LEMMATCH_LOG_DIR",
    "RUST_LOG",
];

/// Isolated home plus a working directory for one test.
struct Sandbox {
    home: TempDir,
    work: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    fn work(&self) -> &Path {
        self.work.path()
    }

    fn xdg_config(&self) -> PathBuf {
        self.home.path().join(".config")
    }

    /// Write `name` under the working directory, creating parents.
    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write the per-user config file.
    fn write_user_config(&self, contents: &str) -> PathBuf {
        let dir = self.xdg_config().join("lemmatch");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    /// Binary invocation confined to the sandbox, started in `dir`.
    #[allow(deprecated)]
    fn cmd_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        for var in INHERITED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.xdg_config())
            .env("XDG_DATA_HOME", self.home.path().join(".local/share"))
            .args(["-C", dir.to_str().unwrap()]);
        cmd
    }

    /// Run `info --json` from `dir` and parse the `config` object.
    fn info_in(&self, dir: &Path, envs: &[(&str, &str)]) -> Value {
        let output = self
            .cmd_in(dir)
            .envs(envs.iter().copied())
            .args(["info", "--json"])
            .output()
            .expect("failed to run command");
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
        json["config"].clone()
    }

    fn info(&self) -> Value {
        self.info_in(self.work(), &[])
    }
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults_without_any_config() {
    let sandbox = Sandbox::new();
    let config = sandbox.info();

    assert!(config["config_file"].is_null());
    assert_eq!(config["mode"], "full");
    assert_eq!(config["max_punct_skips"], 1);
    assert_eq!(config["max_input_bytes"], 5 * 1024 * 1024);
    assert_eq!(config["generative"]["model"], "gpt-4");
    assert_eq!(config["generative"]["api_key"], "missing");
    assert!(config["lexicon_path"].is_null());
}

// =============================================================================
// Layering: user < project < explicit < environment
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn user_config_supplies_collaborator_settings() {
    let sandbox = Sandbox::new();
    let user = sandbox.write_user_config(
        "mode = \"offline\"\n\n[generative]\nmodel = \"gpt-4o-mini\"\ntimeout_secs = 30\n",
    );

    let config = sandbox.info();
    assert_eq!(config["mode"], "offline");
    assert_eq!(config["generative"]["model"], "gpt-4o-mini");
    assert_eq!(config["generative"]["timeout_secs"], 30);
    assert_eq!(config["config_file"], user.to_str().unwrap());
}

#[cfg(target_os = "linux")]
#[test]
fn project_config_overrides_user_config_key_by_key() {
    let sandbox = Sandbox::new();
    sandbox.write_user_config(
        "mode = \"offline\"\n\n[generative]\nmodel = \"user-model\"\ntemperature = 0.1\n",
    );
    sandbox.write(".lemmatch.toml", "[generative]\nmodel = \"project-model\"\n");

    let config = sandbox.info();
    assert_eq!(config["generative"]["model"], "project-model");
    // Keys the project file leaves alone keep the user value
    assert_eq!(config["mode"], "offline");
    assert_eq!(config["generative"]["temperature"], 0.1);
}

#[test]
fn explicit_config_overrides_project_matcher_settings() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "mode = \"offline\"\n\n[matcher]\nmax_punct_skips = 2\n");
    let explicit = sandbox.write("strict.toml", "[matcher]\nmax_punct_skips = 0\n");

    let output = sandbox
        .cmd_in(sandbox.work())
        .args(["--config", explicit.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["max_punct_skips"], 0);
    assert_eq!(json["config"]["mode"], "offline");
    assert!(
        json["config"]["config_file"]
            .as_str()
            .unwrap()
            .ends_with("strict.toml")
    );
}

#[test]
fn env_api_key_beats_blank_file_key() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "[generative]\napi_key = \"   \"\n");

    assert_eq!(sandbox.info()["generative"]["api_key"], "missing");

    let config = sandbox.info_in(
        sandbox.work(),
        &[("LEMMATCH_GENERATIVE__API_KEY", "sk-from-env")],
    );
    assert_eq!(config["generative"]["api_key"], "set");
    assert!(!config.to_string().contains("sk-from-env"));
}

#[test]
fn env_overrides_nested_file_values() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "mode = \"full\"\n\n[generative]\nmodel = \"file-model\"\n",
    );

    let config = sandbox.info_in(
        sandbox.work(),
        &[
            ("LEMMATCH_MODE", "offline"),
            ("LEMMATCH_GENERATIVE__MODEL", "env-model"),
            ("LEMMATCH_MATCHER__MAX_PUNCT_SKIPS", "4"),
        ],
    );
    assert_eq!(config["mode"], "offline");
    assert_eq!(config["generative"]["model"], "env-model");
    assert_eq!(config["max_punct_skips"], 4);
}

// =============================================================================
// Input limit
// =============================================================================

#[test]
fn custom_input_limit_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "max_input_bytes = 1024\n");
    assert_eq!(sandbox.info()["max_input_bytes"], 1024);
}

#[test]
fn disable_input_limit_removes_the_limit() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "max_input_bytes = 1024\ndisable_input_limit = true\n",
    );
    assert!(sandbox.info()["max_input_bytes"].is_null());
}

#[test]
fn disable_input_limit_from_env() {
    let sandbox = Sandbox::new();
    let config = sandbox.info_in(sandbox.work(), &[("LEMMATCH_DISABLE_INPUT_LIMIT", "true")]);
    assert!(config["max_input_bytes"].is_null());
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn regular_file_beats_dotfile_and_both_merge() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "mode = \"offline\"\n\n[matcher]\nmax_punct_skips = 2\n",
    );
    sandbox.write("lemmatch.toml", "[matcher]\nmax_punct_skips = 0\n");

    let config = sandbox.info();
    assert_eq!(config["max_punct_skips"], 0);
    assert_eq!(config["mode"], "offline");
    assert!(
        config["config_file"]
            .as_str()
            .unwrap()
            .ends_with("/lemmatch.toml")
    );
}

#[test]
fn nested_sections_parse_from_yaml_and_json() {
    let sandbox = Sandbox::new();
    sandbox.write(
        "yaml/.lemmatch.yaml",
        "mode: offline\nmatcher:\n  max_punct_skips: 3\nlexicon:\n  url: https://example.org/lex.tsv\n",
    );
    sandbox.write(
        "json/.lemmatch.json",
        r#"{"generative": {"temperature": 0.2, "endpoint": "http://127.0.0.1:8080/v1/chat/completions"}}"#,
    );

    let yaml = sandbox.info_in(&sandbox.work().join("yaml"), &[]);
    assert_eq!(yaml["mode"], "offline");
    assert_eq!(yaml["max_punct_skips"], 3);
    assert_eq!(yaml["lexicon_url"], "https://example.org/lex.tsv");

    let json = sandbox.info_in(&sandbox.work().join("json"), &[]);
    assert_eq!(json["generative"]["temperature"], 0.2);
    assert_eq!(
        json["generative"]["endpoint"],
        "http://127.0.0.1:8080/v1/chat/completions"
    );
}

#[test]
fn closest_project_directory_wins() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "mode = \"offline\"\n");
    sandbox.write("korpus/.lemmatch.toml", "[matcher]\nmax_punct_skips = 5\n");
    fs::create_dir_all(sandbox.work().join("korpus/rozdzialy")).unwrap();

    let config = sandbox.info_in(&sandbox.work().join("korpus/rozdzialy"), &[]);
    assert_eq!(config["max_punct_skips"], 5);
    // Only the closest directory with a config is loaded
    assert_eq!(config["mode"], "full");
}

#[test]
fn git_boundary_stops_search_for_matching_settings() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "mode = \"offline\"\n");
    fs::create_dir_all(sandbox.work().join("repo/.git")).unwrap();
    fs::create_dir_all(sandbox.work().join("repo/teksty")).unwrap();

    let config = sandbox.info_in(&sandbox.work().join("repo/teksty"), &[]);
    assert_eq!(config["mode"], "full");
    assert!(config["config_file"].is_null());

    sandbox.write("repo/.lemmatch.toml", "mode = \"offline\"\n");
    let config = sandbox.info_in(&sandbox.work().join("repo/teksty"), &[]);
    assert_eq!(config["mode"], "offline");
}

// =============================================================================
// Settings reach the find command
// =============================================================================

#[test]
fn project_config_drives_find() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "mode = \"offline\"\n\n[matcher]\nmax_punct_skips = 0\n",
    );
    let text = sandbox.write("tekst.txt", "Mówimy o sztucznej, inteligencji i sztucznej inteligencji.");

    let output = sandbox
        .cmd_in(sandbox.work())
        .args(["--json", "find", text.to_str().unwrap(), "-p", "sztuczna inteligencja"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    // Offline: no credential notice; zero skips: the comma breaks the first match
    assert!(json["notices"].as_array().unwrap().is_empty());
    assert_eq!(json["counts"]["total"], 1);
    assert_eq!(json["occurrences"][0]["fragment"], "sztucznej inteligencji");
}

#[test]
fn configured_lexicon_extends_lemmas() {
    let sandbox = Sandbox::new();
    sandbox.write("lex.tsv", "# form\tlemma\nkot\tkot\nkoty\tkot\nkotów\tkot\n");
    sandbox.write(
        ".lemmatch.toml",
        "mode = \"offline\"\n\n[lexicon]\npath = \"lex.tsv\"\n",
    );
    let text = sandbox.write("tekst.txt", "Koty śpią, a kotów przybywa.");

    let output = sandbox
        .cmd_in(sandbox.work())
        .args(["--json", "find", text.to_str().unwrap(), "-p", "kot"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["counts"]["lemma"], 2);
}

#[test]
fn missing_lexicon_without_url_fails_find() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "mode = \"offline\"\n\n[lexicon]\npath = \"brak.tsv\"\n",
    );
    let text = sandbox.write("tekst.txt", "Koty śpią.");

    sandbox
        .cmd_in(sandbox.work())
        .args(["find", text.to_str().unwrap(), "-p", "kot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lexicon"));
}

// =============================================================================
// Invalid settings
// =============================================================================

#[test]
fn unknown_mode_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.toml", "mode = \"telepathic\"\n");

    sandbox
        .cmd_in(sandbox.work())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn non_numeric_skip_bound_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.write(".lemmatch.yaml", "matcher:\n  max_punct_skips: many\n");

    sandbox.cmd_in(sandbox.work()).arg("info").assert().failure();
}

#[test]
fn unknown_keys_in_sections_are_ignored() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".lemmatch.toml",
        "[generative]\nmodel = \"gpt-4o\"\nretries = 3\n\n[highlight]\ncolor = \"yellow\"\n",
    );
    assert_eq!(sandbox.info()["generative"]["model"], "gpt-4o");
}
