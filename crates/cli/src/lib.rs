//! `warden`: inspect a seeded authorization model and evaluate snapshots.
//!
//! Every run seeds a fresh in-memory store from the configuration, so the
//! listing commands show exactly what a new installation would contain.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use warden_auth::{AuthSnapshot, Capabilities, CanRequest, OneOrMany, Policy};
use warden_infra::{
    Argon2Hasher, AuthConfig, AuthStore, InMemoryAuthStore, PermissionAdmin, RoleAdmin,
    SeedReport, UserAdmin, seed,
};

#[derive(Parser, Debug)]
#[command(name = "warden", about = "Role and permission administration")]
pub struct Cli {
    /// Path to a JSON auth config (default: $WARDEN_CONFIG or built-in roles).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show what seeding created.
    Seed,

    /// List roles with permission and user counts.
    Roles,

    /// List users with their roles.
    Users,

    /// List permissions with role counts.
    Permissions,

    /// Print the authorization snapshot of a seeded user.
    Snapshot {
        /// Email of the user.
        email: String,
    },

    /// Print the derived capability summary for a snapshot file.
    Explain {
        /// JSON snapshot (`{"user": {...}, "permissions": [...]}`).
        snapshot: PathBuf,
    },

    /// Evaluate a combined role/permission requirement against a snapshot file.
    Check {
        snapshot: PathBuf,
        /// Required role; repeat for a list.
        #[arg(long = "role")]
        roles: Vec<String>,
        /// Required permission; repeat for a list.
        #[arg(long = "permission")]
        permissions: Vec<String>,
        /// Require every listed role and permission instead of any.
        #[arg(long = "all")]
        require_all: bool,
    },
}

pub struct App {
    store: Arc<InMemoryAuthStore>,
    report: SeedReport,
}

impl App {
    pub fn bootstrap(config: &AuthConfig) -> Result<Self> {
        let store = Arc::new(InMemoryAuthStore::new());
        let report = seed(&store, config, &Argon2Hasher::new()).context("seeding failed")?;
        Ok(Self { store, report })
    }

    pub fn execute(&self, command: &Command) -> Result<Value> {
        let value = match command {
            Command::Seed => serde_json::to_value(&self.report)?,
            Command::Roles => serde_json::to_value(RoleAdmin::new(self.store.clone()).index()?)?,
            Command::Users => serde_json::to_value(self.users().index()?)?,
            Command::Permissions => {
                serde_json::to_value(PermissionAdmin::new(self.store.clone()).index()?)?
            }
            Command::Snapshot { email } => {
                let id = self
                    .store
                    .read(|t| t.user_by_email(email).map(|u| u.id))?
                    .ok_or_else(|| anyhow!("no user with email '{email}'"))?;
                serde_json::to_value(self.users().snapshot_for(id)?)?
            }
            Command::Explain { snapshot } => {
                let snapshot = load_snapshot(snapshot)?;
                serde_json::to_value(Policy::new(Capabilities::new(&snapshot)).permission_summary())?
            }
            Command::Check {
                snapshot,
                roles,
                permissions,
                require_all,
            } => {
                let snapshot = load_snapshot(snapshot)?;
                let request = CanRequest {
                    role: one_or_many(roles),
                    permission: one_or_many(permissions),
                    require_all: *require_all,
                };
                let allowed = Capabilities::new(&snapshot).can(&request);
                tracing::debug!(?request, allowed, "capability check");
                json!({ "allowed": allowed })
            }
        };
        Ok(value)
    }

    fn users(&self) -> UserAdmin<Arc<InMemoryAuthStore>, Argon2Hasher> {
        UserAdmin::new(self.store.clone(), Argon2Hasher::new())
    }
}

fn one_or_many(names: &[String]) -> Option<OneOrMany> {
    match names {
        [] => None,
        [name] => Some(OneOrMany::One(name.clone())),
        names => Some(OneOrMany::Many(names.to_vec())),
    }
}

fn load_snapshot(path: &Path) -> Result<AuthSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid snapshot in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use warden_infra::config::AdminUserConfig;

    use super::*;

    fn app() -> App {
        let config = AuthConfig {
            admin_user: Some(AdminUserConfig {
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                password: "password".to_string(),
            }),
            ..AuthConfig::default()
        };
        App::bootstrap(&config).unwrap()
    }

    fn write_snapshot(name: &str, snapshot: &Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!("warden-{}-{name}.json", std::process::id()));
        std::fs::write(&path, snapshot.to_string()).unwrap();
        path
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "warden", "check", "snap.json", "--role", "admin", "--permission", "user.read",
            "--permission", "user.update", "--all",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Check {
                snapshot: PathBuf::from("snap.json"),
                roles: vec!["admin".to_string()],
                permissions: vec!["user.read".to_string(), "user.update".to_string()],
                require_all: true,
            }
        );
    }

    #[test]
    fn listings_reflect_seeded_state() {
        let app = app();

        let roles = app.execute(&Command::Roles).unwrap();
        let names: Vec<&str> = roles
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"admin") && names.contains(&"user"));

        let permissions = app.execute(&Command::Permissions).unwrap();
        assert_eq!(permissions.as_array().unwrap().len(), 12);

        let users = app.execute(&Command::Users).unwrap();
        assert_eq!(users[0]["email"], "admin@example.com");
        assert!(users[0].get("password_hash").is_none());
    }

    #[test]
    fn snapshot_then_explain() {
        let app = app();
        let snapshot = app
            .execute(&Command::Snapshot {
                email: "ADMIN@example.com".to_string(),
            })
            .unwrap();
        assert_eq!(snapshot["permissions"].as_array().unwrap().len(), 12);

        let path = write_snapshot("explain", &snapshot);
        let summary = app.execute(&Command::Explain { snapshot: path.clone() }).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(summary["has_admin_access"], true);
        assert_eq!(summary["navigation"]["can_view_users"], true);
    }

    #[test]
    fn check_uses_coupled_all_flag() {
        let app = app();
        let path = write_snapshot(
            "check",
            &json!({ "user": { "id": warden_core::UserId::new(), "roles": [{ "name": "user" }] },
                     "permissions": ["user.read"] }),
        );

        let check = |roles: &[&str], require_all| {
            app.execute(&Command::Check {
                snapshot: path.clone(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
                permissions: vec!["user.read".to_string()],
                require_all,
            })
            .unwrap()["allowed"]
                .clone()
        };

        assert_eq!(check(&["admin"], false), true);
        assert_eq!(check(&["admin"], true), false);
        assert_eq!(check(&["admin", "user"], true), false);
        assert_eq!(check(&["user"], true), true);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unknown_email_is_an_error() {
        let err = app()
            .execute(&Command::Snapshot {
                email: "nobody@example.com".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("nobody@example.com"));
    }
}
