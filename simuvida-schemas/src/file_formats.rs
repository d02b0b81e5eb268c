use crate::{
    account::Account, catalog::DeviceClassSpec, decision::DecisionRecord, device::DeviceProfile,
};
use serde::{Deserialize, Serialize};

pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogFile {
    pub schema_version: String,
    pub device_classes: Vec<DeviceClassSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceFile {
    pub schema_version: String,
    pub devices: Vec<DeviceProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountFile {
    pub schema_version: String,
    pub accounts: Vec<Account>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionFile {
    pub schema_version: String,
    pub decisions: Vec<DecisionRecord>,
}
