//! Persistence gateway consumed by the device and sensor services.
//!
//! The services never touch the database directly; they hold `Arc<dyn …Store>`
//! handles so unit tests can substitute mocks. `orm` provides the sea-orm
//! implementations used in production.

mod orm;

pub use orm::{OrmDeviceStore, OrmSensorStore};

use async_trait::async_trait;

use crate::entity::{devices, sensors};
use crate::error::AppResult;

/// Caller-settable fields of a device. The store assigns id and timestamps.
///
/// Used for both insert and update: updates replace every mutable field
/// wholesale, there is no partial merge.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDraft {
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub active: bool,
}

/// Caller-settable fields of a sensor. See [`DeviceDraft`].
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDraft {
    pub device_id: i64,
    pub name: String,
    pub sensor_uid: String,
    pub sensor_type: Option<String>,
    pub unit: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub active: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Persist a new device, assigning id and timestamps.
    async fn insert(&self, draft: DeviceDraft) -> AppResult<devices::Model>;

    /// Replace all mutable fields of an existing device and refresh
    /// `updated_at`. Fails with `DeviceNotFound` if the id is gone.
    async fn update(&self, id: i64, draft: DeviceDraft) -> AppResult<devices::Model>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<devices::Model>>;

    /// All devices, id ascending.
    async fn find_all(&self) -> AppResult<Vec<devices::Model>>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    async fn exists_by_serial_number(&self, serial_number: &str) -> AppResult<bool>;

    /// Delete a device. Owned sensors are removed in the same statement
    /// through the schema's cascade rule.
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Persist a new sensor, assigning id and timestamps.
    async fn insert(&self, draft: SensorDraft) -> AppResult<sensors::Model>;

    /// Replace all mutable fields of an existing sensor (including the
    /// owning device) and refresh `updated_at`.
    async fn update(&self, id: i64, draft: SensorDraft) -> AppResult<sensors::Model>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<sensors::Model>>;

    /// All sensors, id ascending.
    async fn find_all(&self) -> AppResult<Vec<sensors::Model>>;

    /// Sensors owned by the given device, id ascending. Empty when the
    /// device has none or does not exist.
    async fn find_by_device_id(&self, device_id: i64) -> AppResult<Vec<sensors::Model>>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    async fn exists_by_sensor_uid(&self, sensor_uid: &str) -> AppResult<bool>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}
