//! Application registry: modules, theme, tenants.
//!
//! The hosted application owns this state; hostinfo reads a deployment-owned
//! snapshot of it. The module registry is a directory scan
//! (`{modules_dir}/{module}/module.json`), the rest comes from a single site
//! state file. Both are loaded once at startup; a missing or unreadable file
//! logs a warning and falls back to an empty default so the report still
//! renders.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

/// The active theme: display name plus stable identifier.
#[derive(Clone, Debug)]
pub struct Theme {
    pub name: String,
    pub slug: String,
}

/// One installed module with its activation state.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
    pub name: String,
    /// Author metadata, empty when the manifest carries none.
    pub author: String,
    pub active: bool,
}

/// One page of a network enumeration.
#[derive(Clone, Debug)]
pub struct NetworkPage {
    /// Network ids on this page.
    pub ids: Vec<u64>,
    /// Total networks found, independent of the page limit.
    pub found: u64,
}

/// Application-level facts: tenancy, users, theme, module registry.
pub trait AppRegistry: Send + Sync {
    /// Whether this install manages multiple networks of sites.
    fn is_multisite(&self) -> bool;

    /// Total user count across the install.
    fn user_count(&self) -> u64;

    /// Enumerate networks, at most `limit` ids per page.
    fn networks(&self, limit: usize) -> NetworkPage;

    /// Number of sites in the given network; 0 for an unknown id.
    fn site_count(&self, network_id: u64) -> u64;

    /// The active theme. Always answers; an unknown theme reports a
    /// placeholder name.
    fn active_theme(&self) -> Theme;

    /// All installed modules with activation state, ordered by name.
    fn modules(&self) -> Vec<ModuleInfo>;
}

#[derive(Debug, Default, Deserialize)]
struct SiteState {
    #[serde(default)]
    multisite: bool,
    #[serde(default)]
    users: u64,
    #[serde(default)]
    networks: Vec<NetworkState>,
    #[serde(default)]
    active_theme: Option<ThemeState>,
    #[serde(default)]
    active_modules: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NetworkState {
    id: u64,
    #[serde(default)]
    sites: u64,
}

#[derive(Debug, Deserialize)]
struct ThemeState {
    name: String,
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
struct ModuleManifest {
    name: String,
    #[serde(default)]
    author: String,
}

/// Registry backed by the deployment's state file and modules directory.
pub struct FileRegistry {
    state: SiteState,
    modules: Vec<ModuleInfo>,
}

impl FileRegistry {
    /// Load the registry from disk. Never fails: missing or malformed inputs
    /// degrade to empty defaults with a warning.
    pub fn load(modules_dir: &Path, site_state: &Path) -> Self {
        let state = Self::load_state(site_state);
        let modules = Self::scan_modules(modules_dir, &state.active_modules);
        Self { state, modules }
    }

    fn load_state(path: &Path) -> SiteState {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Site state not readable at {}: {}", path.display(), e);
                return SiteState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!("Site state at {} is malformed: {}", path.display(), e);
                SiteState::default()
            }
        }
    }

    /// Scan `{dir}/*/module.json` manifests. Entries without a manifest are
    /// ignored; malformed manifests are skipped with a warning.
    fn scan_modules(dir: &Path, active: &[String]) -> Vec<ModuleInfo> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Modules directory not readable at {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut modules = Vec::new();

        for entry in entries.filter_map(|e| e.ok()) {
            let manifest_path = entry.path().join("module.json");
            if !manifest_path.is_file() {
                continue;
            }

            let raw = match fs::read_to_string(&manifest_path) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping {}: {}", manifest_path.display(), e);
                    continue;
                }
            };

            let manifest: ModuleManifest = match serde_json::from_str(&raw) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Skipping malformed {}: {}", manifest_path.display(), e);
                    continue;
                }
            };

            debug!("Found module: {}", manifest.name);

            let is_active = active.iter().any(|name| *name == manifest.name);
            modules.push(ModuleInfo {
                name: manifest.name,
                author: manifest.author,
                active: is_active,
            });
        }

        // read_dir order is filesystem-dependent; sort for stable display.
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }
}

impl AppRegistry for FileRegistry {
    fn is_multisite(&self) -> bool {
        self.state.multisite
    }

    fn user_count(&self) -> u64 {
        self.state.users
    }

    fn networks(&self, limit: usize) -> NetworkPage {
        NetworkPage {
            ids: self
                .state
                .networks
                .iter()
                .take(limit)
                .map(|n| n.id)
                .collect(),
            found: self.state.networks.len() as u64,
        }
    }

    fn site_count(&self, network_id: u64) -> u64 {
        self.state
            .networks
            .iter()
            .find(|n| n.id == network_id)
            .map(|n| n.sites)
            .unwrap_or(0)
    }

    fn active_theme(&self) -> Theme {
        match self.state.active_theme {
            Some(ref t) => Theme {
                name: t.name.clone(),
                slug: t.slug.clone(),
            },
            None => Theme {
                name: "Unknown".to_string(),
                slug: String::new(),
            },
        }
    }

    fn modules(&self) -> Vec<ModuleInfo> {
        self.modules.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_module(dir: &Path, slug: &str, manifest: &str) {
        let module_dir = dir.join(slug);
        fs::create_dir(&module_dir).unwrap();
        fs::write(module_dir.join("module.json"), manifest).unwrap();
    }

    #[test]
    fn test_missing_inputs_degrade_to_defaults() {
        let registry = FileRegistry::load(Path::new("/nonexistent"), Path::new("/nonexistent"));
        assert!(!registry.is_multisite());
        assert_eq!(registry.user_count(), 0);
        assert!(registry.modules().is_empty());
        assert_eq!(registry.active_theme().name, "Unknown");
    }

    #[test]
    fn test_module_scan_partitions_by_state_file() {
        let modules = tempfile::tempdir().unwrap();
        write_module(
            modules.path(),
            "seo",
            r#"{"name": "SEO Toolkit", "author": "Jane Doe"}"#,
        );
        write_module(modules.path(), "cache", r#"{"name": "Page Cache"}"#);
        // No manifest: ignored.
        fs::create_dir(modules.path().join("leftover")).unwrap();

        let state = tempfile::tempdir().unwrap();
        let state_path = state.path().join("site.json");
        fs::write(
            &state_path,
            r#"{"users": 3, "active_modules": ["SEO Toolkit"]}"#,
        )
        .unwrap();

        let registry = FileRegistry::load(modules.path(), &state_path);
        let found = registry.modules();
        assert_eq!(found.len(), 2);
        // Sorted by name.
        assert_eq!(found[0].name, "Page Cache");
        assert!(!found[0].active);
        assert_eq!(found[0].author, "");
        assert_eq!(found[1].name, "SEO Toolkit");
        assert!(found[1].active);
        assert_eq!(found[1].author, "Jane Doe");
    }

    #[test]
    fn test_malformed_manifest_is_skipped() {
        let modules = tempfile::tempdir().unwrap();
        write_module(modules.path(), "ok", r#"{"name": "Fine"}"#);
        write_module(modules.path(), "broken", "{not json");

        let registry = FileRegistry::load(modules.path(), Path::new("/nonexistent"));
        let found = registry.modules();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Fine");
    }

    #[test]
    fn test_multisite_state() {
        let state = tempfile::tempdir().unwrap();
        let state_path = state.path().join("site.json");
        fs::write(
            &state_path,
            r#"{
                "multisite": true,
                "users": 42,
                "networks": [
                    {"id": 1, "sites": 3},
                    {"id": 2, "sites": 5}
                ]
            }"#,
        )
        .unwrap();

        let registry = FileRegistry::load(Path::new("/nonexistent"), &state_path);
        assert!(registry.is_multisite());
        assert_eq!(registry.user_count(), 42);

        let page = registry.networks(100);
        assert_eq!(page.ids, vec![1, 2]);
        assert_eq!(page.found, 2);
        assert_eq!(registry.site_count(1), 3);
        assert_eq!(registry.site_count(2), 5);
        assert_eq!(registry.site_count(99), 0);

        // Page limit truncates ids but not the found count.
        let page = registry.networks(1);
        assert_eq!(page.ids, vec![1]);
        assert_eq!(page.found, 2);
    }
}
