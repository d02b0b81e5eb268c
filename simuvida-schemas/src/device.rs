use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    #[serde(rename = "telefono")]
    Phone,
    #[serde(rename = "laptop")]
    Laptop,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Phone, DeviceKind::Laptop];

    /// Wire token used by the historical reports and the YAML stores.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Phone => "telefono",
            DeviceKind::Laptop => "laptop",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            DeviceKind::Phone => "teléfono",
            DeviceKind::Laptop => "laptop",
        }
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "telefono" | "teléfono" | "phone" => Ok(DeviceKind::Phone),
            "laptop" | "portatil" | "portátil" => Ok(DeviceKind::Laptop),
            other => Err(format!("unknown device kind '{}'", other)),
        }
    }
}

/// A user-registered device. Profiles are created and deleted, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub device_id: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    pub owner_email: String,
    #[serde(default)]
    pub reviewed: bool,
    pub registered_at: i64,
}
