use std::sync::Arc;

use tracing::{debug, info};

use crate::entity::sensors;
use crate::error::{AppError, AppResult};
use crate::store::{DeviceStore, SensorDraft, SensorStore};

/// Sensor manager: owns sensor lifecycle, sensor-uid uniqueness, and the
/// parent-device precondition. Stateless; every call is an independent
/// unit of work against the store.
pub struct SensorService {
    sensors: Arc<dyn SensorStore>,
    devices: Arc<dyn DeviceStore>,
}

impl SensorService {
    pub fn new(sensors: Arc<dyn SensorStore>, devices: Arc<dyn DeviceStore>) -> Self {
        Self { sensors, devices }
    }

    pub async fn create(&self, draft: SensorDraft) -> AppResult<sensors::Model> {
        if !self.devices.exists_by_id(draft.device_id).await? {
            return Err(AppError::DeviceNotFound(draft.device_id));
        }

        if self.sensors.exists_by_sensor_uid(&draft.sensor_uid).await? {
            return Err(AppError::DuplicateSensorUid(draft.sensor_uid));
        }

        let sensor = self.sensors.insert(draft).await?;

        info!(sensor_id = sensor.id, device_id = sensor.device_id, "sensor created");
        Ok(sensor)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<sensors::Model> {
        self.sensors
            .find_by_id(id)
            .await?
            .ok_or(AppError::SensorNotFound(id))
    }

    /// Sensors owned by `device_id`, id ascending. Deliberately performs no
    /// existence check on the device: the device manager calls this on every
    /// device read, and a device with zero sensors is not an error.
    pub async fn list_by_device(&self, device_id: i64) -> AppResult<Vec<sensors::Model>> {
        self.sensors.find_by_device_id(device_id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<sensors::Model>> {
        self.sensors.find_all().await
    }

    /// Wholesale replacement of all mutable fields. A changed sensor uid is
    /// checked against other sensors (re-submitting the current uid never
    /// conflicts); a changed owning device must exist.
    pub async fn update(&self, id: i64, draft: SensorDraft) -> AppResult<sensors::Model> {
        let current = self
            .sensors
            .find_by_id(id)
            .await?
            .ok_or(AppError::SensorNotFound(id))?;

        if current.sensor_uid != draft.sensor_uid
            && self.sensors.exists_by_sensor_uid(&draft.sensor_uid).await?
        {
            return Err(AppError::DuplicateSensorUid(draft.sensor_uid));
        }

        // Re-parenting is only validated when the owner actually changes;
        // a same-owner update racing a device delete is still caught by
        // the foreign key when the row is written.
        if current.device_id != draft.device_id
            && !self.devices.exists_by_id(draft.device_id).await?
        {
            return Err(AppError::DeviceNotFound(draft.device_id));
        }

        debug!(sensor_id = id, "updating sensor");
        self.sensors.update(id, draft).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.sensors.exists_by_id(id).await? {
            return Err(AppError::SensorNotFound(id));
        }

        self.sensors.delete_by_id(id).await?;

        info!(sensor_id = id, "sensor deleted");
        Ok(())
    }
}
