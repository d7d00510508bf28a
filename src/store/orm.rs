use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};

use async_trait::async_trait;

use crate::entity::{devices, sensors};
use crate::error::{AppError, AppResult};

use super::{DeviceDraft, DeviceStore, SensorDraft, SensorStore};

/// Final uniqueness enforcement lives in the `idx_devices_serial_number`
/// index; a writer that loses a check-then-act race surfaces here.
fn map_device_write_err(err: DbErr, serial_number: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::DuplicateSerialNumber(serial_number.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Sensors carry one unique index (`idx_sensors_sensor_uid`) and one
/// foreign key (`fk_sensors_device`); a foreign-key violation means the
/// referenced device vanished between check and write.
fn map_sensor_write_err(err: DbErr, sensor_uid: &str, device_id: i64) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::DuplicateSensorUid(sensor_uid.to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::DeviceNotFound(device_id),
        _ => AppError::Database(err),
    }
}

pub struct OrmDeviceStore {
    db: DatabaseConnection,
}

impl OrmDeviceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceStore for OrmDeviceStore {
    async fn insert(&self, draft: DeviceDraft) -> AppResult<devices::Model> {
        let serial_number = draft.serial_number.clone();
        let now = Utc::now().into();

        let row = devices::ActiveModel {
            name: Set(draft.name),
            serial_number: Set(draft.serial_number),
            description: Set(draft.description),
            location: Set(draft.location),
            active: Set(draft.active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        row.insert(&self.db)
            .await
            .map_err(|e| map_device_write_err(e, &serial_number))
    }

    async fn update(&self, id: i64, draft: DeviceDraft) -> AppResult<devices::Model> {
        let current = devices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::DeviceNotFound(id))?;

        let serial_number = draft.serial_number.clone();

        let mut row: devices::ActiveModel = current.into();
        row.name = Set(draft.name);
        row.serial_number = Set(draft.serial_number);
        row.description = Set(draft.description);
        row.location = Set(draft.location);
        row.active = Set(draft.active);
        row.updated_at = Set(Utc::now().into());

        row.update(&self.db)
            .await
            .map_err(|e| map_device_write_err(e, &serial_number))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<devices::Model>> {
        Ok(devices::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_all(&self) -> AppResult<Vec<devices::Model>> {
        Ok(devices::Entity::find()
            .order_by_asc(devices::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let count = devices::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn exists_by_serial_number(&self, serial_number: &str) -> AppResult<bool> {
        let count = devices::Entity::find()
            .filter(devices::Column::SerialNumber.eq(serial_number))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        // Owned sensors go with the device via ON DELETE CASCADE, as one
        // atomic statement on the database side.
        devices::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

pub struct OrmSensorStore {
    db: DatabaseConnection,
}

impl OrmSensorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SensorStore for OrmSensorStore {
    async fn insert(&self, draft: SensorDraft) -> AppResult<sensors::Model> {
        let sensor_uid = draft.sensor_uid.clone();
        let device_id = draft.device_id;
        let now = Utc::now().into();

        let row = sensors::ActiveModel {
            device_id: Set(draft.device_id),
            name: Set(draft.name),
            sensor_uid: Set(draft.sensor_uid),
            sensor_type: Set(draft.sensor_type),
            unit: Set(draft.unit),
            min_value: Set(draft.min_value),
            max_value: Set(draft.max_value),
            active: Set(draft.active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        row.insert(&self.db)
            .await
            .map_err(|e| map_sensor_write_err(e, &sensor_uid, device_id))
    }

    async fn update(&self, id: i64, draft: SensorDraft) -> AppResult<sensors::Model> {
        let current = sensors::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::SensorNotFound(id))?;

        let sensor_uid = draft.sensor_uid.clone();
        let device_id = draft.device_id;

        let mut row: sensors::ActiveModel = current.into();
        row.device_id = Set(draft.device_id);
        row.name = Set(draft.name);
        row.sensor_uid = Set(draft.sensor_uid);
        row.sensor_type = Set(draft.sensor_type);
        row.unit = Set(draft.unit);
        row.min_value = Set(draft.min_value);
        row.max_value = Set(draft.max_value);
        row.active = Set(draft.active);
        row.updated_at = Set(Utc::now().into());

        row.update(&self.db)
            .await
            .map_err(|e| map_sensor_write_err(e, &sensor_uid, device_id))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<sensors::Model>> {
        Ok(sensors::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_all(&self) -> AppResult<Vec<sensors::Model>> {
        Ok(sensors::Entity::find()
            .order_by_asc(sensors::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_device_id(&self, device_id: i64) -> AppResult<Vec<sensors::Model>> {
        Ok(sensors::Entity::find()
            .filter(sensors::Column::DeviceId.eq(device_id))
            .order_by_asc(sensors::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let count = sensors::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn exists_by_sensor_uid(&self, sensor_uid: &str) -> AppResult<bool> {
        let count = sensors::Entity::find()
            .filter(sensors::Column::SensorUid.eq(sensor_uid))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sensors::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
