use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== DEVICES ==========
        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Devices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Devices::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Devices::SerialNumber)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Devices::Description).text())
                    .col(ColumnDef::new(Devices::Location).string_len(128))
                    .col(
                        ColumnDef::new(Devices::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Devices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Devices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness is enforced here, not in the service layer; a losing
        // concurrent writer gets the violation translated to a conflict.
        manager
            .create_index(
                Index::create()
                    .name("idx_devices_serial_number")
                    .table(Devices::Table)
                    .col(Devices::SerialNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========== SENSORS ==========
        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sensors::DeviceId).big_integer().not_null())
                    .col(ColumnDef::new(Sensors::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Sensors::SensorUid).string_len(64).not_null())
                    .col(ColumnDef::new(Sensors::SensorType).string_len(64))
                    .col(ColumnDef::new(Sensors::Unit).string_len(32))
                    .col(ColumnDef::new(Sensors::MinValue).double())
                    .col(ColumnDef::new(Sensors::MaxValue).double())
                    .col(
                        ColumnDef::new(Sensors::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sensors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Sensors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensors_device")
                            .from(Sensors::Table, Sensors::DeviceId)
                            .to(Devices::Table, Devices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensors_sensor_uid")
                    .table(Sensors::Table)
                    .col(Sensors::SensorUid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index for owner lookups (device detail enrichment, cascade)
        manager
            .create_index(
                Index::create()
                    .name("idx_sensors_device_id")
                    .table(Sensors::Table)
                    .col(Sensors::DeviceId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sensors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Devices {
    Table,
    Id,
    Name,
    SerialNumber,
    Description,
    Location,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sensors {
    Table,
    Id,
    DeviceId,
    Name,
    SensorUid,
    SensorType,
    Unit,
    MinValue,
    MaxValue,
    Active,
    CreatedAt,
    UpdatedAt,
}
