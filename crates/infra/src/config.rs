//! Configuration for the authorization model.
//!
//! Defaults cover a fresh install; a JSON file named by `WARDEN_CONFIG`
//! replaces them, and `WARDEN_ADMIN_*` variables fill in the bootstrap admin.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use warden_auth::{PermissionName, SystemRole};

pub const CONFIG_PATH_VAR: &str = "WARDEN_CONFIG";
pub const ADMIN_NAME_VAR: &str = "WARDEN_ADMIN_NAME";
pub const ADMIN_EMAIL_VAR: &str = "WARDEN_ADMIN_EMAIL";
pub const ADMIN_PASSWORD_VAR: &str = "WARDEN_ADMIN_PASSWORD";

/// Account created by the bootstrap seeder and given the admin role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Permissions granted to each role when it is first seeded.
    pub default_permissions: BTreeMap<String, Vec<PermissionName>>,
    pub admin_user: Option<AdminUserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut default_permissions = BTreeMap::new();
        default_permissions.insert(
            SystemRole::Admin.as_str().to_string(),
            PermissionName::ALL.to_vec(),
        );
        default_permissions.insert(
            SystemRole::User.as_str().to_string(),
            vec![PermissionName::UserRead],
        );
        Self {
            default_permissions,
            admin_user: None,
        }
    }
}

impl AuthConfig {
    /// Parse a JSON document; unknown permission names are rejected.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid auth config")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Read `path` (or the file named by `WARDEN_CONFIG`), then apply the
    /// `WARDEN_ADMIN_*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_lookup(path, |key| std::env::var(key).ok())
    }

    fn from_lookup(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_VAR).map(PathBuf::from));
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => {
                tracing::warn!("{CONFIG_PATH_VAR} not set; using built-in role defaults");
                Self::default()
            }
        };
        config.apply_admin_overrides(&lookup);
        Ok(config)
    }

    fn apply_admin_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let current = self.admin_user.take();
        let name = lookup(ADMIN_NAME_VAR).or_else(|| current.as_ref().map(|a| a.name.clone()));
        let email = lookup(ADMIN_EMAIL_VAR).or_else(|| current.as_ref().map(|a| a.email.clone()));
        let password =
            lookup(ADMIN_PASSWORD_VAR).or_else(|| current.as_ref().map(|a| a.password.clone()));

        self.admin_user = match (name, email, password) {
            (Some(name), Some(email), Some(password)) => Some(AdminUserConfig {
                name,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!("incomplete admin user settings; skipping admin bootstrap");
                None
            }
        };
    }

    /// Configured permissions for `role`, empty when none are listed.
    pub fn permissions_for(&self, role: &str) -> &[PermissionName] {
        self.default_permissions
            .get(role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_grant_admin_everything_and_user_read() {
        let config = AuthConfig::default();
        assert_eq!(config.permissions_for("admin").len(), 12);
        assert_eq!(config.permissions_for("user"), &[PermissionName::UserRead]);
        assert!(config.permissions_for("editor").is_empty());
        assert!(config.admin_user.is_none());
    }

    #[test]
    fn json_overrides_defaults() {
        let config = AuthConfig::from_json_str(
            r#"{"default_permissions":{"user":["user.read","role.read"]}}"#,
        )
        .unwrap();
        assert_eq!(
            config.permissions_for("user"),
            &[PermissionName::UserRead, PermissionName::RoleRead]
        );
        assert!(config.permissions_for("admin").is_empty());
    }

    #[test]
    fn unknown_permission_in_json_is_an_error() {
        let err = AuthConfig::from_json_str(r#"{"default_permissions":{"user":["reports.export"]}}"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("reports.export"));
    }

    #[test]
    fn admin_user_comes_from_env() {
        let config = AuthConfig::from_lookup(None, lookup(&[
            (ADMIN_NAME_VAR, "Root"),
            (ADMIN_EMAIL_VAR, "root@example.com"),
            (ADMIN_PASSWORD_VAR, "changeme"),
        ]))
        .unwrap();
        let admin = config.admin_user.unwrap();
        assert_eq!(admin.name, "Root");
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.password, "changeme");
    }

    #[test]
    fn partial_admin_settings_are_ignored() {
        let config =
            AuthConfig::from_lookup(None, lookup(&[(ADMIN_EMAIL_VAR, "root@example.com")]))
                .unwrap();
        assert!(config.admin_user.is_none());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = AuthConfig::from_lookup(None, lookup(&[(CONFIG_PATH_VAR, "/nonexistent/warden.json")]))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/warden.json"));
    }

    #[test]
    fn explicit_path_wins_over_env_and_keeps_admin_overrides() {
        let path = std::env::temp_dir().join(format!("warden-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"default_permissions":{"user":[]},"admin_user":{"name":"File","email":"file@example.com","password":"pw"}}"#,
        )
        .unwrap();

        let config = AuthConfig::from_lookup(
            Some(path.as_path()),
            lookup(&[
                (CONFIG_PATH_VAR, "/nonexistent/warden.json"),
                (ADMIN_NAME_VAR, "Env"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.permissions_for("user").is_empty());
        let admin = config.admin_user.unwrap();
        assert_eq!(admin.name, "Env");
        assert_eq!(admin.email, "file@example.com");
    }
}
