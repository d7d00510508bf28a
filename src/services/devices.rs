use std::sync::Arc;

use tracing::{debug, info};

use crate::entity::{devices, sensors};
use crate::error::{AppError, AppResult};
use crate::services::SensorService;
use crate::store::{DeviceDraft, DeviceStore};

/// A device together with its current sensor list, as returned by the
/// single-device and list reads.
#[derive(Debug, Clone)]
pub struct DeviceWithSensors {
    pub device: devices::Model,
    pub sensors: Vec<sensors::Model>,
}

/// Device manager: owns device lifecycle and serial-number uniqueness,
/// and composes with the sensor manager to assemble sensor lists on reads.
pub struct DeviceService {
    devices: Arc<dyn DeviceStore>,
    sensors: Arc<SensorService>,
}

impl DeviceService {
    pub fn new(devices: Arc<dyn DeviceStore>, sensors: Arc<SensorService>) -> Self {
        Self { devices, sensors }
    }

    /// Create a device. The response carries no sensor list; enrichment
    /// happens on reads only.
    pub async fn create(&self, draft: DeviceDraft) -> AppResult<devices::Model> {
        if self
            .devices
            .exists_by_serial_number(&draft.serial_number)
            .await?
        {
            return Err(AppError::DuplicateSerialNumber(draft.serial_number));
        }

        let device = self.devices.insert(draft).await?;

        info!(device_id = device.id, "device created");
        Ok(device)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<DeviceWithSensors> {
        let device = self
            .devices
            .find_by_id(id)
            .await?
            .ok_or(AppError::DeviceNotFound(id))?;

        let sensors = self.sensors.list_by_device(device.id).await?;

        Ok(DeviceWithSensors { device, sensors })
    }

    /// All devices, id ascending, each with its current sensor list.
    pub async fn list_all(&self) -> AppResult<Vec<DeviceWithSensors>> {
        let devices = self.devices.find_all().await?;

        let mut result = Vec::with_capacity(devices.len());
        for device in devices {
            let sensors = self.sensors.list_by_device(device.id).await?;
            result.push(DeviceWithSensors { device, sensors });
        }

        Ok(result)
    }

    /// Wholesale replacement of all mutable fields. A changed serial number
    /// is checked against other devices; re-submitting the current serial
    /// never conflicts.
    pub async fn update(&self, id: i64, draft: DeviceDraft) -> AppResult<devices::Model> {
        let current = self
            .devices
            .find_by_id(id)
            .await?
            .ok_or(AppError::DeviceNotFound(id))?;

        if current.serial_number != draft.serial_number
            && self
                .devices
                .exists_by_serial_number(&draft.serial_number)
                .await?
        {
            return Err(AppError::DuplicateSerialNumber(draft.serial_number));
        }

        debug!(device_id = id, "updating device");
        self.devices.update(id, draft).await
    }

    /// Delete a device and, transitively, every sensor it owns.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.devices.exists_by_id(id).await? {
            return Err(AppError::DeviceNotFound(id));
        }

        self.devices.delete_by_id(id).await?;

        info!(device_id = id, "device deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockDeviceStore, MockSensorStore};

    fn ts() -> sea_orm::prelude::DateTimeWithTimeZone {
        chrono::DateTime::parse_from_rfc3339("2026-02-07T10:00:00+00:00").unwrap()
    }

    fn test_device(id: i64, serial_number: &str) -> devices::Model {
        devices::Model {
            id,
            name: "Test Device".to_string(),
            serial_number: serial_number.to_string(),
            description: Some("Test Description".to_string()),
            location: Some("Test Location".to_string()),
            active: true,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn test_sensor(id: i64, device_id: i64) -> sensors::Model {
        sensors::Model {
            id,
            device_id,
            name: "Test Sensor".to_string(),
            sensor_uid: format!("S-{id}"),
            sensor_type: None,
            unit: None,
            min_value: None,
            max_value: None,
            active: true,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn test_draft(serial_number: &str) -> DeviceDraft {
        DeviceDraft {
            name: "Test Device".to_string(),
            serial_number: serial_number.to_string(),
            description: Some("Test Description".to_string()),
            location: Some("Test Location".to_string()),
            active: true,
        }
    }

    fn service(devices: MockDeviceStore, sensors: MockSensorStore) -> DeviceService {
        let device_store: Arc<dyn DeviceStore> = Arc::new(devices);
        let sensor_service = Arc::new(SensorService::new(
            Arc::new(sensors),
            device_store.clone(),
        ));
        DeviceService::new(device_store, sensor_service)
    }

    #[tokio::test]
    async fn create_returns_persisted_device() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_exists_by_serial_number()
            .withf(|serial| serial == "TEST-123")
            .times(1)
            .return_once(|_| Ok(false));
        devices
            .expect_insert()
            .withf(|draft| draft.serial_number == "TEST-123")
            .times(1)
            .return_once(|_| Ok(test_device(1, "TEST-123")));

        let result = service(devices, MockSensorStore::new())
            .create(test_draft("TEST-123"))
            .await;

        let device = result.unwrap();
        assert_eq!(device.id, 1);
        assert_eq!(device.serial_number, "TEST-123");
    }

    #[tokio::test]
    async fn create_rejects_taken_serial_number() {
        let mut devices = MockDeviceStore::new();

        // Insert is not expected: a duplicate serial must never persist.
        devices
            .expect_exists_by_serial_number()
            .withf(|serial| serial == "TEST-123")
            .times(1)
            .return_once(|_| Ok(true));

        let result = service(devices, MockSensorStore::new())
            .create(test_draft("TEST-123"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::DuplicateSerialNumber(serial) if serial == "TEST-123"
        ));
    }

    #[tokio::test]
    async fn get_by_id_enriches_with_sensor_list() {
        let mut devices = MockDeviceStore::new();
        let mut sensors = MockSensorStore::new();

        devices
            .expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .return_once(|_| Ok(Some(test_device(1, "TEST-123"))));
        sensors
            .expect_find_by_device_id()
            .withf(|id| *id == 1)
            .times(1)
            .return_once(|_| Ok(vec![test_sensor(1, 1), test_sensor(2, 1)]));

        let result = service(devices, sensors).get_by_id(1).await;

        let detail = result.unwrap();
        assert_eq!(detail.device.id, 1);
        assert_eq!(detail.sensors.len(), 2);
    }

    #[tokio::test]
    async fn get_by_id_fails_when_absent() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let result = service(devices, MockSensorStore::new()).get_by_id(42).await;

        assert!(matches!(result.unwrap_err(), AppError::DeviceNotFound(42)));
    }

    #[tokio::test]
    async fn list_all_enriches_each_device() {
        let mut devices = MockDeviceStore::new();
        let mut sensors = MockSensorStore::new();

        devices.expect_find_all().times(1).return_once(|| {
            Ok(vec![test_device(1, "D-1"), test_device(2, "D-2")])
        });
        sensors
            .expect_find_by_device_id()
            .withf(|id| *id == 1)
            .times(1)
            .return_once(|_| Ok(vec![test_sensor(1, 1)]));
        sensors
            .expect_find_by_device_id()
            .withf(|id| *id == 2)
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let result = service(devices, sensors).list_all().await;

        let list = result.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].sensors.len(), 1);
        assert!(list[1].sensors.is_empty());
    }

    #[tokio::test]
    async fn update_with_own_serial_skips_uniqueness_check() {
        let mut devices = MockDeviceStore::new();

        // Unchanged serial: exists_by_serial_number is never consulted
        // (the mock would panic on an unexpected call).
        devices
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(test_device(1, "TEST-123"))));
        devices
            .expect_update()
            .withf(|id, draft| *id == 1 && draft.serial_number == "TEST-123")
            .times(1)
            .return_once(|_, _| Ok(test_device(1, "TEST-123")));

        let result = service(devices, MockSensorStore::new())
            .update(1, test_draft("TEST-123"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn update_rejects_serial_taken_by_other_device() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(test_device(1, "TEST-123"))));
        devices
            .expect_exists_by_serial_number()
            .withf(|serial| serial == "OTHER-9")
            .times(1)
            .return_once(|_| Ok(true));

        let result = service(devices, MockSensorStore::new())
            .update(1, test_draft("OTHER-9"))
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::DuplicateSerialNumber(serial) if serial == "OTHER-9"
        ));
    }

    #[tokio::test]
    async fn update_changes_serial_when_free() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(Some(test_device(1, "TEST-123"))));
        devices
            .expect_exists_by_serial_number()
            .withf(|serial| serial == "FRESH-1")
            .times(1)
            .return_once(|_| Ok(false));
        devices
            .expect_update()
            .withf(|id, draft| *id == 1 && draft.serial_number == "FRESH-1")
            .times(1)
            .return_once(|_, _| Ok(test_device(1, "FRESH-1")));

        let result = service(devices, MockSensorStore::new())
            .update(1, test_draft("FRESH-1"))
            .await;

        assert_eq!(result.unwrap().serial_number, "FRESH-1");
    }

    #[tokio::test]
    async fn update_fails_when_device_absent() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let result = service(devices, MockSensorStore::new())
            .update(42, test_draft("TEST-123"))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::DeviceNotFound(42)));
    }

    #[tokio::test]
    async fn delete_removes_existing_device() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_exists_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .return_once(|_| Ok(true));
        devices
            .expect_delete_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .return_once(|_| Ok(()));

        let result = service(devices, MockSensorStore::new()).delete(1).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_fails_when_device_absent() {
        let mut devices = MockDeviceStore::new();

        devices
            .expect_exists_by_id()
            .times(1)
            .return_once(|_| Ok(false));

        let result = service(devices, MockSensorStore::new()).delete(42).await;

        assert!(matches!(result.unwrap_err(), AppError::DeviceNotFound(42)));
    }
}
