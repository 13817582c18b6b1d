//! Stamps `journey --version` with the workspace's git revision.

use std::path::Path;
use std::process::Command;

/// Trimmed stdout of a successful, non-empty git command.
fn git(workspace: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(workspace).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
    let workspace = Path::new(&manifest_dir).join("..");

    let revision = match git(&workspace, &["rev-parse", "--short=10", "HEAD"]) {
        Some(sha) if git(&workspace, &["status", "--porcelain", "--untracked-files=no"]).is_some() => {
            format!("{sha}-dirty")
        }
        Some(sha) => sha,
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=JOURNEY_BUILD_SHA={revision}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
