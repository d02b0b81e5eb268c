use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use simuvida_core::store::{AccountRegistry, DecisionJournal, DeviceRegistry};
use simuvida_schemas::{
    account::{Account, Role},
    catalog::DeviceClassSpec,
    device::DeviceKind,
    file_formats::CatalogFile,
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

const DEFAULT_ADMIN_CODE: &str = "ECO-ADMIN-2026";

/// Display name used when nobody is signed in.
pub const FALLBACK_USER_NAME: &str = "Usuario registrado";

/// A container for the device-class catalog and the three mutable registries.
/// This is the complete data store for one CLI invocation.
pub struct DataStore {
    pub root: PathBuf,
    pub catalog: HashMap<DeviceKind, DeviceClassSpec>,
    pub devices: DeviceRegistry,
    pub accounts: AccountRegistry,
    pub decisions: DecisionJournal,
}

impl DataStore {
    /// Opens the data directory, creating it on first use.
    pub fn open(root: &str) -> Result<Self> {
        let root = PathBuf::from(root);
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data directory: {}", root.display()))?;

        let catalog = load_catalog(&root)?;
        let devices = DeviceRegistry::open(&root.join("devices.yaml"))?;
        let accounts = AccountRegistry::open(&root.join("accounts.yaml"))?;
        let decisions = DecisionJournal::open(&root.join("decisions.yaml"))?;

        Ok(Self {
            root,
            catalog,
            devices,
            accounts,
            decisions,
        })
    }

    pub fn class_for(&self, kind: DeviceKind) -> Option<&DeviceClassSpec> {
        self.catalog.get(&kind)
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.root.join("runs")
    }
}

/// Loads `catalog.yaml` when present, otherwise the built-in classes.
fn load_catalog(root: &Path) -> Result<HashMap<DeviceKind, DeviceClassSpec>> {
    let path = root.join("catalog.yaml");
    let classes = if path.is_file() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: CatalogFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))?;
        file.device_classes
    } else {
        DeviceClassSpec::builtin_classes()
    };
    Ok(classes.into_iter().map(|c| (c.kind, c)).collect())
}

#[derive(Debug, Deserialize)]
struct AppConfigFile {
    admin_code: Option<String>,
}

/// The registration code that grants the admin role.
pub fn admin_code(root: &Path) -> String {
    let path = root.join("config.yaml");
    if let Ok(content) = fs::read_to_string(&path) {
        if let Ok(file) = serde_yaml::from_str::<AppConfigFile>(&content) {
            if let Some(code) = file.admin_code {
                return code;
            }
        }
    }
    DEFAULT_ADMIN_CODE.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    email: String,
}

/// The identity everything downstream renders. Resolved once here, at the
/// boundary; the estimator and the reports never re-derive it.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

pub fn resolve_current_user(root: &Path, accounts: &AccountRegistry) -> CurrentUser {
    let email = fs::read_to_string(root.join("session.yaml"))
        .ok()
        .and_then(|content| serde_yaml::from_str::<SessionFile>(&content).ok())
        .map(|session| session.email);

    match email.as_deref().and_then(|email| accounts.find(email)) {
        Some(account) => CurrentUser {
            name: account.name.clone(),
            email: Some(account.email.clone()),
            role: account.role,
        },
        None => CurrentUser {
            name: FALLBACK_USER_NAME.to_string(),
            email: None,
            role: Role::User,
        },
    }
}

pub fn save_session(root: &Path, account: &Account) -> Result<()> {
    let session = SessionFile {
        email: account.email.clone(),
    };
    let content = serde_yaml::to_string(&session)?;
    let path = root.join("session.yaml");
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn clear_session(root: &Path) -> Result<()> {
    let path = root.join("session.yaml");
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}
