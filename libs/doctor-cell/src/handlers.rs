use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Doctor, DoctorListQuery};
use crate::services::DoctorService;

pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let service = DoctorService::new(&config);

    let doctors = service.list_doctors(&query, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(doctors))
}

pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, AppError> {
    let service = DoctorService::new(&config);

    let doctor = service.get_doctor(&doctor_id, auth.token())
        .await
        .map_err(|e| {
            if e.to_string().contains("not found") {
                AppError::NotFound(e.to_string())
            } else {
                AppError::Database(e.to_string())
            }
        })?;

    Ok(Json(doctor))
}
