#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Scratch working directory for one CLI test
pub struct TestDesk {
    dir: TempDir,
}

impl TestDesk {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_collection(&self, name: &str) -> Value {
        let path = self.data_dir().join(format!("{name}.json"));
        let contents = fs::read_to_string(path).expect("read collection");
        serde_json::from_str(&contents).expect("collection json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskdesk").expect("binary");
        cmd.current_dir(self.path());
        cmd.env_remove("TASKDESK_DATA_DIR");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run with `--json`, expect success, and return the envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Run with `--json`, expect failure with `code`, and return the envelope
    pub fn json_err(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json error envelope")
    }

    pub fn new_category(&self, name: &str, color: &str) -> String {
        let value = self.json(&["category", "new", name, "--color", color]);
        value["data"]["id"].as_str().expect("category id").to_string()
    }

    pub fn new_task(&self, title: &str, due: &str, category: &str) -> String {
        let value = self.json(&["task", "new", title, "--due", due, "--category", category]);
        value["data"]["id"].as_str().expect("task id").to_string()
    }
}
