use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::common::AppState;
use crate::error::AppResult;
use crate::routes::sensors::SensorResponse;

use super::types::{DeviceRequest, DeviceResponse};

/// Create a device
#[utoipa::path(
    post,
    path = "/api/devices",
    request_body = DeviceRequest,
    responses(
        (status = 201, description = "Device created", body = DeviceResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Serial number already in use"),
    ),
    tag = "devices"
)]
pub async fn create_device(
    State(state): State<AppState>,
    Json(request): Json<DeviceRequest>,
) -> AppResult<(StatusCode, Json<DeviceResponse>)> {
    request.validate()?;

    let device = state.devices.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DeviceResponse::from_parts(device, Vec::new())),
    ))
}

/// List all devices with their sensors
#[utoipa::path(
    get,
    path = "/api/devices",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = Vec<DeviceResponse>),
    ),
    tag = "devices"
)]
pub async fn list_devices(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DeviceResponse>>> {
    let devices = state.devices.list_all().await?;

    let response: Vec<DeviceResponse> = devices
        .into_iter()
        .map(|d| DeviceResponse::from_parts(d.device, d.sensors))
        .collect();

    Ok(Json(response))
}

/// Get a device by id, enriched with its sensors
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device id"),
    ),
    responses(
        (status = 200, description = "Device retrieved successfully", body = DeviceResponse),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> AppResult<Json<DeviceResponse>> {
    let detail = state.devices.get_by_id(device_id).await?;

    Ok(Json(DeviceResponse::from_parts(detail.device, detail.sensors)))
}

/// Replace a device's mutable fields
#[utoipa::path(
    put,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device id"),
    ),
    request_body = DeviceRequest,
    responses(
        (status = 200, description = "Device updated", body = DeviceResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Device not found"),
        (status = 409, description = "Serial number already in use"),
    ),
    tag = "devices"
)]
pub async fn update_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
    Json(request): Json<DeviceRequest>,
) -> AppResult<Json<DeviceResponse>> {
    request.validate()?;

    let device = state.devices.update(device_id, request.into()).await?;

    Ok(Json(DeviceResponse::from_parts(device, Vec::new())))
}

/// Delete a device and all sensors it owns
#[utoipa::path(
    delete,
    path = "/api/devices/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device id"),
    ),
    responses(
        (status = 204, description = "Device and owned sensors deleted"),
        (status = 404, description = "Device not found"),
    ),
    tag = "devices"
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.devices.delete(device_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List sensors owned by a device
///
/// Performs no existence check on the device: an unknown device id yields
/// an empty list, not a 404.
#[utoipa::path(
    get,
    path = "/api/devices/{device_id}/sensors",
    params(
        ("device_id" = i64, Path, description = "Device id"),
    ),
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
    ),
    tag = "devices"
)]
pub async fn list_device_sensors(
    State(state): State<AppState>,
    Path(device_id): Path<i64>,
) -> AppResult<Json<Vec<SensorResponse>>> {
    let sensors = state.sensors.list_by_device(device_id).await?;

    Ok(Json(sensors.into_iter().map(SensorResponse::from).collect()))
}
