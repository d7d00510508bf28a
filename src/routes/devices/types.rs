use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{devices, sensors};
use crate::error::AppError;
use crate::routes::sensors::SensorResponse;
use crate::store::DeviceDraft;

fn default_active() -> bool {
    true
}

/// Create/update payload. Updates replace every mutable field wholesale.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeviceRequest {
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl DeviceRequest {
    /// Field-presence checks, applied before the device manager runs.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name: must not be blank");
        }
        if self.serial_number.trim().is_empty() {
            errors.push("serial_number: must not be blank");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join(", ")))
        }
    }
}

impl From<DeviceRequest> for DeviceDraft {
    fn from(request: DeviceRequest) -> Self {
        Self {
            name: request.name,
            serial_number: request.serial_number,
            description: request.description,
            location: request.location,
            active: request.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceResponse {
    pub id: i64,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    /// Current sensors owned by this device. Populated on reads; empty on
    /// create and update responses.
    pub sensors: Vec<SensorResponse>,
}

impl DeviceResponse {
    pub fn from_parts(device: devices::Model, sensors: Vec<sensors::Model>) -> Self {
        Self {
            id: device.id,
            name: device.name,
            serial_number: device.serial_number,
            description: device.description,
            location: device.location,
            active: device.active,
            created_at: device.created_at,
            updated_at: device.updated_at,
            sensors: sensors.into_iter().map(SensorResponse::from).collect(),
        }
    }
}
