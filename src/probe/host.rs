//! Host operating system probes.

use std::process::Command;

use super::Capability;

/// Kernel identification, the uname(2) quartet the report uses.
#[derive(Clone, Debug)]
pub struct Uname {
    /// Kernel name, e.g. "Linux".
    pub sysname: String,
    /// Kernel release, e.g. "6.1.0-18-amd64".
    pub release: String,
    /// Hardware name, e.g. "x86_64".
    pub machine: String,
    /// Network node hostname.
    pub nodename: String,
}

/// Facts about the host operating system.
pub trait HostProbe: Send + Sync {
    /// Whether this environment supports the given capability at all.
    fn has_capability(&self, cap: Capability) -> bool;

    /// Kernel identification. `None` when the lookup fails.
    fn uname(&self) -> Option<Uname>;

    /// One line of `uptime(1)` output. `None` when the command fails or
    /// produces nothing.
    fn uptime(&self) -> Option<String>;
}

/// Probe backed by the real host: uname(2) and the uptime shell command.
pub struct LiveHost;

impl LiveHost {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LiveHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for LiveHost {
    fn has_capability(&self, cap: Capability) -> bool {
        match cap {
            Capability::Uname => cfg!(unix),
            Capability::Uptime => cfg!(unix),
            _ => false,
        }
    }

    fn uname(&self) -> Option<Uname> {
        uname_syscall()
    }

    fn uptime(&self) -> Option<String> {
        let output = Command::new("uptime").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let line = String::from_utf8_lossy(&output.stdout);
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}

#[cfg(unix)]
fn uname_syscall() -> Option<Uname> {
    use std::ffi::CStr;

    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        return None;
    }

    // utsname fields are NUL-terminated fixed-size arrays.
    fn field(raw: &[libc::c_char]) -> String {
        unsafe { CStr::from_ptr(raw.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    Some(Uname {
        sysname: field(&uts.sysname),
        release: field(&uts.release),
        machine: field(&uts.machine),
        nodename: field(&uts.nodename),
    })
}

#[cfg(not(unix))]
fn uname_syscall() -> Option<Uname> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_live_uname() {
        let host = LiveHost::new();
        assert!(host.has_capability(Capability::Uname));

        let uname = host.uname().expect("uname should work on unix");
        assert!(!uname.sysname.is_empty());
        assert!(!uname.machine.is_empty());
    }

    #[test]
    fn test_uptime_is_trimmed() {
        let host = LiveHost::new();
        if let Some(line) = host.uptime() {
            assert_eq!(line, line.trim());
            assert!(!line.is_empty());
        }
    }
}
