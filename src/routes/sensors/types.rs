use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::sensors;
use crate::error::AppError;
use crate::store::SensorDraft;

fn default_active() -> bool {
    true
}

/// Create/update payload. Updates replace every mutable field wholesale,
/// including the owning device.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SensorRequest {
    pub name: String,
    pub sensor_uid: String,
    pub device_id: i64,
    #[serde(default)]
    pub sensor_type: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl SensorRequest {
    /// Field-presence checks, applied before the sensor manager runs.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name: must not be blank");
        }
        if self.sensor_uid.trim().is_empty() {
            errors.push("sensor_uid: must not be blank");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join(", ")))
        }
    }
}

impl From<SensorRequest> for SensorDraft {
    fn from(request: SensorRequest) -> Self {
        Self {
            device_id: request.device_id,
            name: request.name,
            sensor_uid: request.sensor_uid,
            sensor_type: request.sensor_type,
            unit: request.unit,
            min_value: request.min_value,
            max_value: request.max_value,
            active: request.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorResponse {
    pub id: i64,
    /// Owning device, exposed by id only.
    pub device_id: i64,
    pub name: String,
    pub sensor_uid: String,
    pub sensor_type: Option<String>,
    pub unit: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<sensors::Model> for SensorResponse {
    fn from(sensor: sensors::Model) -> Self {
        Self {
            id: sensor.id,
            device_id: sensor.device_id,
            name: sensor.name,
            sensor_uid: sensor.sensor_uid,
            sensor_type: sensor.sensor_type,
            unit: sensor.unit,
            min_value: sensor.min_value,
            max_value: sensor.max_value,
            active: sensor.active,
            created_at: sensor.created_at,
            updated_at: sensor.updated_at,
        }
    }
}
