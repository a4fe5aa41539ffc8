use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::{auth::User, error::AppError};

use crate::models::{Patient, PrioritySummary};
use crate::services::patient::PatientService;

pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Patient>>, AppError> {
    debug!("Dashboard patient list requested by {}", user.id);
    let service = PatientService::new(&config);

    let patients = service.list_patients(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(patients))
}

pub async fn patient_summary(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<PrioritySummary>, AppError> {
    let service = PatientService::new(&config);

    let summary = service.priority_summary(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(summary))
}

pub async fn get_patient_by_phone(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(phone): Path<String>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&config);

    service.get_by_phone(&phone, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No patient registered for {}", phone)))
}
