use std::env;
use std::process::Command;

/// Stamps `docmatch --version` with where the binary came from.
fn main() {
    for watched in ["../../.git/HEAD", "../../.git/index"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let commit = match git(&["rev-parse", "--short=9", "HEAD"]) {
        Some(hash) if is_dirty() => format!("{hash}-dirty"),
        Some(hash) => hash,
        None => String::from("no git"),
    };
    println!("cargo:rustc-env=GIT_COMMIT_HASH={commit}");

    for key in ["TARGET", "PROFILE"] {
        let value = env::var(key).unwrap_or_default();
        println!("cargo:rustc-env=DOCMATCH_BUILD_{key}={value}");
    }
}

/// Run git in the package directory; `None` when git is missing or fails.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    Some(text.trim().to_owned())
}

fn is_dirty() -> bool {
    git(&["status", "--porcelain", "--untracked-files=no"]).is_some_and(|s| !s.is_empty())
}
