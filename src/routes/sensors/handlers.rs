use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::common::AppState;
use crate::error::AppResult;

use super::types::{SensorRequest, SensorResponse};

/// Create a sensor attached to an existing device
#[utoipa::path(
    post,
    path = "/api/sensors",
    request_body = SensorRequest,
    responses(
        (status = 201, description = "Sensor created", body = SensorResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Referenced device not found"),
        (status = 409, description = "Sensor uid already in use"),
    ),
    tag = "sensors"
)]
pub async fn create_sensor(
    State(state): State<AppState>,
    Json(request): Json<SensorRequest>,
) -> AppResult<(StatusCode, Json<SensorResponse>)> {
    request.validate()?;

    let sensor = state.sensors.create(request.into()).await?;

    Ok((StatusCode::CREATED, Json(SensorResponse::from(sensor))))
}

/// List all sensors
#[utoipa::path(
    get,
    path = "/api/sensors",
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SensorResponse>>> {
    let sensors = state.sensors.list_all().await?;

    Ok(Json(sensors.into_iter().map(SensorResponse::from).collect()))
}

/// Get a sensor by id
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = i64, Path, description = "Sensor id"),
    ),
    responses(
        (status = 200, description = "Sensor retrieved successfully", body = SensorResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i64>,
) -> AppResult<Json<SensorResponse>> {
    let sensor = state.sensors.get_by_id(sensor_id).await?;

    Ok(Json(SensorResponse::from(sensor)))
}

/// Replace a sensor's mutable fields, optionally re-parenting it
#[utoipa::path(
    put,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = i64, Path, description = "Sensor id"),
    ),
    request_body = SensorRequest,
    responses(
        (status = 200, description = "Sensor updated", body = SensorResponse),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Sensor or target device not found"),
        (status = 409, description = "Sensor uid already in use"),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i64>,
    Json(request): Json<SensorRequest>,
) -> AppResult<Json<SensorResponse>> {
    request.validate()?;

    let sensor = state.sensors.update(sensor_id, request.into()).await?;

    Ok(Json(SensorResponse::from(sensor)))
}

/// Delete a sensor
#[utoipa::path(
    delete,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = i64, Path, description = "Sensor id"),
    ),
    responses(
        (status = 204, description = "Sensor deleted"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.sensors.delete(sensor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
