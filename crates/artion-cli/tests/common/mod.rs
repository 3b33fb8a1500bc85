#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;
use url::Url;

/// An isolated HOME plus a file-backed store inside one temp dir.
pub struct Sandbox {
    _temp: TempDir,
    pub home: PathBuf,
    pub store_url: String,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let store_url = file_store_url(&temp.path().join("store"));
        Self {
            _temp: temp,
            home,
            store_url,
        }
    }

    /// Run the CLI with `--store` pointing at the sandbox store.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut full = vec!["--store", self.store_url.as_str()];
        full.extend_from_slice(args);
        self.run_bare(&full)
    }

    /// Run the CLI without adding `--store`.
    pub fn run_bare(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_artion"));
        cmd.args(args);
        cmd.env("HOME", &self.home);
        cmd.env("XDG_DATA_HOME", self.home.join("data"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ARTION_STORE");
        cmd.env_remove("ARTION_TOKEN");
        cmd.env_remove("RUST_LOG");
        cmd.output().expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success, returning stdout.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_success(&output, args);
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Create a document and return its id.
    pub fn create(&self, collection: &str, doc: &Value) -> String {
        let json = doc.to_string();
        let stdout = self.run_success(&["create", collection, &json]);
        let created: Value = serde_json::from_str(stdout.trim()).unwrap();
        created["id"].as_str().unwrap().to_string()
    }
}

pub fn assert_success(output: &Output, args: &[&str]) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
}

pub fn file_store_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}

/// Parse one JSON document per stdout line.
pub fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// The `next-cursor:` token printed on stderr, if any.
pub fn next_cursor(output: &Output) -> Option<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .find_map(|line| line.strip_prefix("next-cursor: "))
        .map(str::to_string)
}

pub fn exhibition(title: &str, view_count: i64, start_date: &str) -> Value {
    serde_json::json!({
        "title": title,
        "imageUrl": "",
        "startDate": start_date,
        "subUnit": ["Ministry of Culture"],
        "showUnit": "National Museum",
        "showInfo": [{
            "price": "free",
            "time": "09:00-17:00",
            "locationName": "臺北市立美術館",
            "location": "中山北路三段181號",
            "latitude": "25.0724",
            "longitude": "121.5247"
        }],
        "viewCount": view_count
    })
}

pub fn news(title: &str) -> Value {
    serde_json::json!({
        "title": title,
        "date": "2023-08-01",
        "author": "Editor",
        "image": "",
        "description": format!("About {}", title)
    })
}
