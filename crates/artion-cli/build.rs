//! Embeds the version shown by `artion --version`.

use std::env;
use std::process::Command;

const OVERRIDE: &str = "ARTION_VERSION_OVERRIDE";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed={OVERRIDE}");

    let version = env::var(OVERRIDE)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(describe)
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=ARTION_VERSION={version}");
}

/// `git describe` without the leading `v`, if this is a git checkout.
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let raw = String::from_utf8(output.stdout).ok()?;
    let tag = raw.trim();
    (!tag.is_empty()).then(|| tag.trim_start_matches('v').to_string())
}
