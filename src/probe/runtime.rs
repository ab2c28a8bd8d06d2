//! PHP interpreter probes.
//!
//! The runtime facts come from the configured `php` binary, queried with
//! one-liner scripts. Each query is a fresh invocation: the report is
//! request-scoped and never cached, and a hoster swapping the interpreter
//! under us should be reflected on the next view.

use std::process::Command;

use super::Capability;

/// Interpreter version together with its native integer width.
#[derive(Clone, Debug)]
pub struct RuntimeVersion {
    /// Version string, e.g. "8.3.6".
    pub version: String,
    /// PHP_INT_SIZE: native int width in bytes (8 on 64-bit builds).
    pub int_size_bytes: u32,
}

impl RuntimeVersion {
    /// Whether the interpreter supports 64-bit integer values.
    pub fn supports_64bit(&self) -> bool {
        self.int_size_bytes * 8 == 64
    }
}

/// Facts about the hosted interpreter.
pub trait RuntimeProbe: Send + Sync {
    /// Whether this environment supports the given capability at all.
    fn has_capability(&self, cap: Capability) -> bool;

    /// Interpreter version and integer width.
    fn version(&self) -> Option<RuntimeVersion>;

    /// The memory_limit ini value as configured.
    fn memory_limit(&self) -> Option<String>;
}

/// Probe backed by the php CLI binary.
pub struct PhpCli {
    bin: String,
}

impl PhpCli {
    pub fn new(bin: &str) -> Self {
        Self { bin: bin.to_string() }
    }

    /// Run a one-liner through `php -r` and return trimmed stdout.
    fn run(&self, code: &str) -> Option<String> {
        let output = Command::new(&self.bin).arg("-r").arg(code).output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RuntimeProbe for PhpCli {
    fn has_capability(&self, cap: Capability) -> bool {
        match cap {
            Capability::RuntimeVersion => self.run("echo PHP_VERSION;").is_some(),
            // Hosters sometimes disable ini_get; check before reading.
            Capability::RuntimeConfig => {
                self.run(r#"echo function_exists("ini_get") ? "1" : "0";"#)
                    .as_deref()
                    == Some("1")
            }
            _ => false,
        }
    }

    fn version(&self) -> Option<RuntimeVersion> {
        let raw = self.run(r#"echo PHP_VERSION, "\t", PHP_INT_SIZE;"#)?;
        let (version, int_size) = raw.split_once('\t')?;
        Some(RuntimeVersion {
            version: version.to_string(),
            int_size_bytes: int_size.trim().parse().ok()?,
        })
    }

    fn memory_limit(&self) -> Option<String> {
        self.run(r#"echo ini_get("memory_limit");"#)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_64bit() {
        let v = RuntimeVersion {
            version: "8.3.6".into(),
            int_size_bytes: 8,
        };
        assert!(v.supports_64bit());

        let v = RuntimeVersion {
            version: "5.6.40".into(),
            int_size_bytes: 4,
        };
        assert!(!v.supports_64bit());
    }

    #[test]
    fn test_missing_binary_has_no_capability() {
        let probe = PhpCli::new("/nonexistent/php-binary");
        assert!(!probe.has_capability(Capability::RuntimeVersion));
        assert!(!probe.has_capability(Capability::RuntimeConfig));
        assert!(probe.version().is_none());
        assert!(probe.memory_limit().is_none());
    }
}
