//! Common test utilities for yaml-tmpl integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory with its own `$HOME`, so the user's real configuration never leaks in.
pub struct TestProject {
    _temp: TempDir,
    project_dir: PathBuf,
    home_dir: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let project_dir = temp.path().join("project");
        let home_dir = temp.path().join("home");
        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp: temp,
            project_dir,
            home_dir,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Write a file relative to the project directory
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read_file(&self, name: &str) -> Result<String> {
        let path = self.project_dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Write `~/.yaml-tmpl/config.toml` inside the isolated home directory
    pub fn write_home_config(&self, content: &str) -> Result<PathBuf> {
        let dir = self.home_dir.join(".yaml-tmpl");
        fs::create_dir_all(&dir)?;
        let path = dir.join("config.toml");
        fs::write(&path, content)?;
        Ok(path)
    }

    /// `yaml-tmpl` running in the project directory with an isolated environment
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("yaml-tmpl").expect("binary should be built");
        cmd.current_dir(&self.project_dir)
            .env("HOME", &self.home_dir)
            .env("NO_COLOR", "1")
            .env_remove("YAML_TMPL_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `yaml-tmpl render <args>` and decode stdout as YAML
    pub fn render_yaml(&self, args: &[&str]) -> Result<serde_yaml::Value> {
        let output = self.command().arg("render").args(args).output()?;
        anyhow::ensure!(
            output.status.success(),
            "render failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(serde_yaml::from_slice(&output.stdout)?)
    }
}
