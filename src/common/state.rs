use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::{DeviceService, SensorService};
use crate::store::{DeviceStore, OrmDeviceStore, OrmSensorStore, SensorStore};

/// Shared application state: the two managers wired over the sea-orm
/// stores, plus the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub devices: Arc<DeviceService>,
    pub sensors: Arc<SensorService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let device_store: Arc<dyn DeviceStore> = Arc::new(OrmDeviceStore::new(db.clone()));
        let sensor_store: Arc<dyn SensorStore> = Arc::new(OrmSensorStore::new(db));

        // Both managers sit over the shared store traits; the device
        // manager additionally composes with the sensor manager for
        // sensor-list enrichment on reads.
        let sensors = Arc::new(SensorService::new(sensor_store, device_store.clone()));
        let devices = Arc::new(DeviceService::new(device_store, sensors.clone()));

        Self {
            devices,
            sensors,
            config: Arc::new(config),
        }
    }
}
