//! # Drupal Dockerizer Docker Invocations (`common::docker`)
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Builders for the two `docker` invocations the CLI issues directly. The
//! containers themselves are created by the playbooks.
//!
//! - **`drush_exec`**: `docker exec` into the project's PHP container and run drush.
//! - **`composer_run`**: an ephemeral `composer:<tag>` container with the
//!   working directory mounted at `/app`, running as the invoking user.
//!
//! `--tty` is only requested when stdin is a terminal; docker refuses it
//! otherwise (e.g. in CI or when piping input).
//!
use crate::common::process::Invocation;
use crate::common::system::host::UserIds;
use crate::core::project::ProjectConfiguration;
use std::ffi::OsString;
use std::path::Path;

pub const DEFAULT_COMPOSER_TAG: &str = "latest";

/// `docker exec --interactive [--tty] <project>-<php> drush <args...>`
pub fn drush_exec(config: &ProjectConfiguration, args: &[String], tty: bool) -> Invocation {
    let mut invocation = Invocation::new("docker").args(["exec", "--interactive"]);
    if tty {
        invocation = invocation.arg("--tty");
    }
    invocation
        .arg(config.php_container_name())
        .arg("drush")
        .args(args.iter().cloned())
}

/// `docker run --rm --interactive [--tty] --volume <dir>:/app --user <uid>:<gid> composer:<tag> --no-cache --ignore-platform-reqs <args...>`
pub fn composer_run(
    work_dir: &Path,
    ids: UserIds,
    tag: &str,
    args: &[String],
    tty: bool,
) -> Invocation {
    let mut volume = OsString::from(work_dir.as_os_str());
    volume.push(":/app");

    let mut invocation = Invocation::new("docker").args(["run", "--rm", "--interactive"]);
    if tty {
        invocation = invocation.arg("--tty");
    }
    invocation
        .arg("--volume")
        .arg(volume)
        .arg("--user")
        .arg(format!("{}:{}", ids.uid, ids.gid))
        .arg(format!("composer:{}", tag))
        .args(["--no-cache", "--ignore-platform-reqs"])
        .args(args.iter().cloned())
        .current_dir(work_dir)
}

/// Whether stdin is attached to a terminal.
pub fn stdin_is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal()
}
