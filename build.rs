use std::env;
use std::process::Command;

const VERSION_VAR: &str = "OSSEC_LOG_VIEWER_VERSION";
const COMMIT_VAR: &str = "OSSEC_LOG_VIEWER_COMMIT";

/// First non-empty line of a git command, if git is there and succeeds.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!line.is_empty()).then_some(line)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn main() {
    // Packaged builds (MSI, deb) set both; source builds describe the checkout.
    let version = non_empty_env(VERSION_VAR)
        .or_else(|| non_empty_env("CARGO_PKG_VERSION"))
        .unwrap_or_else(|| "0.0.0".to_string());
    let commit = non_empty_env(COMMIT_VAR)
        .or_else(|| git(&["describe", "--always", "--dirty", "--abbrev=8"]))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={VERSION_VAR}={version}");
    println!("cargo:rustc-env={COMMIT_VAR}={commit}");

    for var in [VERSION_VAR, COMMIT_VAR] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    if let Some(head) = git(&["rev-parse", "--git-path", "HEAD"]) {
        println!("cargo:rerun-if-changed={head}");
    }
}
