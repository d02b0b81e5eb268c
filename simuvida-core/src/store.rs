use crate::error::SimuvidaError;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use simuvida_schemas::{
    account::{Account, Role},
    decision::DecisionRecord,
    device::{DeviceKind, DeviceProfile},
    file_formats::{AccountFile, DecisionFile, DeviceFile, CURRENT_SCHEMA_VERSION},
};
use std::fs;
use std::path::{Path, PathBuf};

fn read_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SimuvidaError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| SimuvidaError::FileIO(path.display().to_string(), e))?;
    let parsed = serde_yaml::from_str(&content)
        .map_err(|e| SimuvidaError::YamlParsing(path.display().to_string(), e))?;
    Ok(Some(parsed))
}

fn write_yaml_file<T: Serialize>(path: &Path, value: &T) -> Result<(), SimuvidaError> {
    let content = serde_yaml::to_string(value)
        .map_err(|e| SimuvidaError::YamlWriting(path.display().to_string(), e))?;
    fs::write(path, content).map_err(|e| SimuvidaError::FileIO(path.display().to_string(), e))
}

/// Hex digest stored in place of the password itself.
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// All registered devices, persisted as one YAML file. A missing file is an
/// empty registry.
pub struct DeviceRegistry {
    path: PathBuf,
    devices: Vec<DeviceProfile>,
}

impl DeviceRegistry {
    pub fn open(path: &Path) -> Result<Self, SimuvidaError> {
        let devices = match read_yaml_file::<DeviceFile>(path)? {
            Some(file) => file.devices,
            None => Vec::new(),
        };
        Ok(Self {
            path: path.to_path_buf(),
            devices,
        })
    }

    pub fn save(&self) -> Result<(), SimuvidaError> {
        let file = DeviceFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            devices: self.devices.clone(),
        };
        write_yaml_file(&self.path, &file)
    }

    pub fn register(
        &mut self,
        kind: DeviceKind,
        model: &str,
        year: Option<i32>,
        materials: Option<String>,
        owner_email: &str,
        registered_at: i64,
    ) -> Result<DeviceProfile, SimuvidaError> {
        let model = model.trim();
        if model.is_empty() {
            return Err(SimuvidaError::EmptyModelName);
        }
        if let Some(year) = year {
            if year <= 0 {
                return Err(SimuvidaError::InvalidYear(year));
            }
        }
        let device = DeviceProfile {
            device_id: self.next_device_id(),
            kind,
            model: model.to_string(),
            year,
            materials: materials.filter(|m| !m.trim().is_empty()),
            owner_email: owner_email.to_string(),
            reviewed: false,
            registered_at,
        };
        self.devices.push(device.clone());
        self.save()?;
        Ok(device)
    }

    fn next_device_id(&self) -> String {
        let max_seen = self
            .devices
            .iter()
            .filter_map(|d| {
                d.device_id
                    .strip_prefix("DEV-")
                    .and_then(|n| n.parse::<u32>().ok())
            })
            .max()
            .unwrap_or(0);
        format!("DEV-{:04}", max_seen + 1)
    }

    pub fn get(&self, device_id: &str) -> Result<&DeviceProfile, SimuvidaError> {
        self.devices
            .iter()
            .find(|d| d.device_id == device_id)
            .ok_or_else(|| SimuvidaError::DeviceNotFound(device_id.to_string()))
    }

    pub fn remove(&mut self, device_id: &str) -> Result<DeviceProfile, SimuvidaError> {
        let index = self
            .devices
            .iter()
            .position(|d| d.device_id == device_id)
            .ok_or_else(|| SimuvidaError::DeviceNotFound(device_id.to_string()))?;
        let removed = self.devices.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn devices(&self) -> &[DeviceProfile] {
        &self.devices
    }

    pub fn visible_to(
        &self,
        owner_email: Option<&str>,
        kind: Option<DeviceKind>,
    ) -> Vec<&DeviceProfile> {
        self.devices
            .iter()
            .filter(|d| owner_email.map_or(true, |email| d.owner_email == email))
            .filter(|d| kind.map_or(true, |k| d.kind == k))
            .collect()
    }
}

/// Registered accounts, persisted as one YAML file.
pub struct AccountRegistry {
    path: PathBuf,
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn open(path: &Path) -> Result<Self, SimuvidaError> {
        let accounts = match read_yaml_file::<AccountFile>(path)? {
            Some(file) => file.accounts,
            None => Vec::new(),
        };
        Ok(Self {
            path: path.to_path_buf(),
            accounts,
        })
    }

    pub fn save(&self) -> Result<(), SimuvidaError> {
        let file = AccountFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            accounts: self.accounts.clone(),
        };
        write_yaml_file(&self.path, &file)
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        registered_at: i64,
    ) -> Result<Account, SimuvidaError> {
        let email = email.trim().to_lowercase();
        if self.accounts.iter().any(|a| a.email == email) {
            return Err(SimuvidaError::AccountExists(email));
        }
        let account = Account {
            name: name.trim().to_string(),
            email,
            password_digest: password_digest(password),
            role,
            registered_at,
        };
        self.accounts.push(account.clone());
        self.save()?;
        Ok(account)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<&Account, SimuvidaError> {
        let email = email.trim().to_lowercase();
        let account = self
            .accounts
            .iter()
            .find(|a| a.email == email)
            .ok_or_else(|| SimuvidaError::AccountNotFound(email.clone()))?;
        if account.password_digest != password_digest(password) {
            return Err(SimuvidaError::InvalidCredentials(email));
        }
        Ok(account)
    }

    pub fn find(&self, email: &str) -> Option<&Account> {
        let email = email.trim().to_lowercase();
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }
}

/// Append-only journal of walkthrough decisions, persisted as one YAML file.
pub struct DecisionJournal {
    path: PathBuf,
    decisions: Vec<DecisionRecord>,
}

impl DecisionJournal {
    pub fn open(path: &Path) -> Result<Self, SimuvidaError> {
        let decisions = match read_yaml_file::<DecisionFile>(path)? {
            Some(file) => file.decisions,
            None => Vec::new(),
        };
        Ok(Self {
            path: path.to_path_buf(),
            decisions,
        })
    }

    pub fn save(&self) -> Result<(), SimuvidaError> {
        let file = DecisionFile {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            decisions: self.decisions.clone(),
        };
        write_yaml_file(&self.path, &file)
    }

    pub fn record(&mut self, record: DecisionRecord) -> Result<(), SimuvidaError> {
        self.decisions.push(record);
        self.save()
    }

    pub fn for_device(&self, device_id: &str) -> Vec<DecisionRecord> {
        self.decisions
            .iter()
            .filter(|r| r.device_id == device_id)
            .cloned()
            .collect()
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    /// Drops a deleted device's records from the journal.
    pub fn forget_device(&mut self, device_id: &str) -> Result<(), SimuvidaError> {
        self.decisions.retain(|r| r.device_id != device_id);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("simuvida-{}-{}.yaml", std::process::id(), name))
    }

    fn empty_devices(name: &str) -> DeviceRegistry {
        let path = temp_path(name);
        let _ = fs::remove_file(&path);
        DeviceRegistry {
            path,
            devices: Vec::new(),
        }
    }

    #[test]
    fn device_ids_are_sequential() {
        let mut registry = empty_devices("device-ids");
        let first = registry
            .register(DeviceKind::Phone, "Galaxy A14", Some(2024), None, "ana@example.com", 0)
            .unwrap();
        let second = registry
            .register(DeviceKind::Laptop, "MacBook Air M2", None, None, "ana@example.com", 0)
            .unwrap();
        assert_eq!(first.device_id, "DEV-0001");
        assert_eq!(second.device_id, "DEV-0002");
        registry.remove("DEV-0001").unwrap();
        let third = registry
            .register(DeviceKind::Phone, "Moto G", None, None, "ana@example.com", 0)
            .unwrap();
        assert_eq!(third.device_id, "DEV-0003");
        let _ = fs::remove_file(&registry.path);
    }

    #[test]
    fn register_rejects_blank_models_and_bad_years() {
        let mut registry = empty_devices("device-validation");
        assert!(matches!(
            registry.register(DeviceKind::Phone, "   ", None, None, "ana@example.com", 0),
            Err(SimuvidaError::EmptyModelName)
        ));
        assert!(matches!(
            registry.register(DeviceKind::Phone, "Galaxy A14", Some(-3), None, "ana@example.com", 0),
            Err(SimuvidaError::InvalidYear(-3))
        ));
        let _ = fs::remove_file(&registry.path);
    }

    #[test]
    fn visible_to_filters_by_owner_and_kind() {
        let mut registry = empty_devices("device-filters");
        registry
            .register(DeviceKind::Phone, "Galaxy A14", None, None, "ana@example.com", 0)
            .unwrap();
        registry
            .register(DeviceKind::Laptop, "ThinkPad X1", None, None, "ana@example.com", 0)
            .unwrap();
        registry
            .register(DeviceKind::Phone, "Moto G", None, None, "luis@example.com", 0)
            .unwrap();
        assert_eq!(registry.visible_to(None, None).len(), 3);
        assert_eq!(registry.visible_to(Some("ana@example.com"), None).len(), 2);
        assert_eq!(
            registry
                .visible_to(Some("ana@example.com"), Some(DeviceKind::Phone))
                .len(),
            1
        );
        let _ = fs::remove_file(&registry.path);
    }

    #[test]
    fn duplicate_emails_are_rejected() {
        let path = temp_path("accounts-dup");
        let _ = fs::remove_file(&path);
        let mut registry = AccountRegistry {
            path,
            accounts: Vec::new(),
        };
        registry
            .register("Ana", "Ana@Example.com", "secreto", Role::User, 0)
            .unwrap();
        assert!(matches!(
            registry.register("Ana dos", "ana@example.com", "otro", Role::User, 0),
            Err(SimuvidaError::AccountExists(_))
        ));
        let _ = fs::remove_file(&registry.path);
    }

    #[test]
    fn login_checks_the_stored_digest() {
        let path = temp_path("accounts-login");
        let _ = fs::remove_file(&path);
        let mut registry = AccountRegistry {
            path,
            accounts: Vec::new(),
        };
        registry
            .register("Ana", "ana@example.com", "secreto", Role::Admin, 0)
            .unwrap();
        let account = registry.login("ana@example.com", "secreto").unwrap();
        assert!(account.is_admin());
        assert_ne!(account.password_digest, "secreto");
        assert!(matches!(
            registry.login("ana@example.com", "equivocada"),
            Err(SimuvidaError::InvalidCredentials(_))
        ));
        assert!(matches!(
            registry.login("nadie@example.com", "secreto"),
            Err(SimuvidaError::AccountNotFound(_))
        ));
        let _ = fs::remove_file(&registry.path);
    }

    #[test]
    fn journal_filters_and_forgets_by_device() {
        use simuvida_schemas::decision::{LifecycleChoice, LifecycleStage, UsagePeriod};
        let path = temp_path("journal");
        let _ = fs::remove_file(&path);
        let mut journal = DecisionJournal {
            path,
            decisions: Vec::new(),
        };
        for device_id in ["DEV-0001", "DEV-0002", "DEV-0001"] {
            journal
                .record(DecisionRecord {
                    device_id: device_id.to_string(),
                    stage: LifecycleStage::Use,
                    choice: LifecycleChoice::Usage {
                        period: UsagePeriod::TwoYears,
                    },
                    recorded_at: 0,
                })
                .unwrap();
        }
        assert_eq!(journal.for_device("DEV-0001").len(), 2);
        journal.forget_device("DEV-0001").unwrap();
        assert_eq!(journal.for_device("DEV-0001").len(), 0);
        assert_eq!(journal.decisions().len(), 1);
        let _ = fs::remove_file(&journal.path);
    }
}
