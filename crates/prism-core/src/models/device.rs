//! Device identity and classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Meter classification. Cleaning rules are scoped per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Water,
    Elec,
    Gas,
    Heat,
}

impl DeviceType {
    /// Stable wire value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Water => "WATER",
            DeviceType::Elec => "ELEC",
            DeviceType::Gas => "GAS",
            DeviceType::Heat => "HEAT",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WATER" => Ok(DeviceType::Water),
            "ELEC" => Ok(DeviceType::Elec),
            "GAS" => Ok(DeviceType::Gas),
            "HEAT" => Ok(DeviceType::Heat),
            other => Err(format!("unknown device type: {other}")),
        }
    }
}

/// Static attributes of the emitting meter.
///
/// `device_type` is optional because some feeds omit it; untyped
/// readings still flow through the default rule chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "device_id")]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: String::new(),
            device_type: None,
        }
    }

    pub fn with_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type);
        self
    }
}
