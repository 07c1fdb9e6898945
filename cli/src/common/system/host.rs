//! Host facts: OS family and the invoking user's ids.

/// Operating system family, as far as networking decisions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl OsKind {
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "linux" => OsKind::Linux,
            "macos" => OsKind::MacOs,
            "windows" => OsKind::Windows,
            _ => OsKind::Other,
        }
    }

    /// Docker on Linux exposes container networks to the host directly, so
    /// projects there always get their own bridge network.
    pub fn forces_bridge_networking(self) -> bool {
        self == OsKind::Linux
    }
}

/// Numeric user and group id of the invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIds {
    pub uid: u32,
    pub gid: u32,
}

impl UserIds {
    #[cfg(unix)]
    pub fn current() -> Self {
        use nix::unistd::{getgid, getuid};
        Self {
            uid: u32::from(getuid()),
            gid: u32::from(getgid()),
        }
    }

    /// Docker Desktop maps ownership itself on non-unix hosts; use the
    /// conventional first user id.
    #[cfg(not(unix))]
    pub fn current() -> Self {
        Self { uid: 1000, gid: 1000 }
    }
}
