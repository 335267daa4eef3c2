//! Stamps the binary with a one-line build description
//!
//! `POPRAKO_BUILD` reads like `3f2a9c1d release 20251026T143045Z`. Builds
//! from a source archive have no git checkout; set `POPRAKO_GIT_REV` there.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_revision() -> Option<String> {
    if let Ok(rev) = env::var("POPRAKO_GIT_REV") {
        return Some(rev);
    }

    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_owned())
}

fn main() {
    println!("cargo:rerun-if-env-changed=POPRAKO_GIT_REV");
    println!("cargo:rerun-if-changed=../.git/HEAD");

    let rev = git_revision().unwrap_or_else(|| UNKNOWN.to_owned());
    let profile = env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_owned());
    let built_at = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");

    println!("cargo:rustc-env=POPRAKO_BUILD={rev} {profile} {built_at}");
}
