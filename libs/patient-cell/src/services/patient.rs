use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::phone::normalize_phone;

use crate::models::{NewPatient, Patient, PrioritySummary, DEFAULT_LANGUAGE};

pub struct PatientService {
    supabase: SupabaseClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn supabase(&self) -> &SupabaseClient {
        &self.supabase
    }

    /// True iff a `patients` row has this (normalised) phone number.
    pub async fn phone_exists(&self, phone: &str, auth_token: &str) -> Result<bool> {
        let phone = normalize_phone(phone);
        let path = format!(
            "/rest/v1/patients?select=phone_number&phone_number=eq.{}&limit=1",
            urlencoding::encode(&phone)
        );

        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(!rows.is_empty())
    }

    pub async fn get_by_phone(&self, phone: &str, auth_token: &str) -> Result<Option<Patient>> {
        let phone = normalize_phone(phone);
        debug!("Fetching patient by phone: {}", phone);

        let path = format!(
            "/rest/v1/patients?select=*&phone_number=eq.{}&limit=1",
            urlencoding::encode(&phone)
        );
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        rows.into_iter()
            .next()
            .map(serde_json::from_value::<Patient>)
            .transpose()
            .map_err(Into::into)
    }

    pub async fn insert(&self, patient: NewPatient, auth_token: &str) -> Result<Patient> {
        let phone = normalize_phone(&patient.phone_number);
        let language = patient
            .language
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let row = json!({
            "name": patient.name,
            "age": patient.age,
            "gender": patient.gender,
            "disease": patient.disease,
            "phone_number": phone,
            "language": language,
            "priority": patient.priority,
        });

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/patients",
            Some(auth_token),
            Some(row),
            Some(SupabaseClient::return_representation()),
        ).await?;

        let created = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to insert patient data"))?;
        let patient: Patient = serde_json::from_value(created)?;

        info!("Registered patient {} with {} priority", patient.id, patient.priority);
        Ok(patient)
    }

    pub async fn update_language(&self, phone: &str, language: &str, auth_token: &str) -> Result<Patient> {
        let phone = normalize_phone(phone);
        let path = format!("/rest/v1/patients?phone_number=eq.{}", urlencoding::encode(&phone));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "language": language })),
            Some(SupabaseClient::return_representation()),
        ).await?;

        let updated = result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Patient not found"))?;
        Ok(serde_json::from_value(updated)?)
    }

    /// All patients, newest first.
    pub async fn list_patients(&self, auth_token: &str) -> Result<Vec<Patient>> {
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            "/rest/v1/patients?select=*&order=created_at.desc",
            Some(auth_token),
            None,
        ).await?;

        let patients = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Patient>, _>>()?;

        Ok(patients)
    }

    pub async fn priority_summary(&self, auth_token: &str) -> Result<PrioritySummary> {
        let patients = self.list_patients(auth_token).await?;
        Ok(PrioritySummary::from_patients(&patients))
    }
}
