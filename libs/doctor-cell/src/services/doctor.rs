use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, DoctorListQuery};

pub struct DoctorService {
    supabase: SupabaseClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Doctors ordered newest first, optionally narrowed by specialization or status.
    pub async fn list_doctors(&self, query: &DoctorListQuery, auth_token: &str) -> Result<Vec<Doctor>> {
        let mut path = String::from("/rest/v1/doctors?select=*&order=created_at.desc");

        if let Some(specialization) = query.specialization.as_deref().filter(|s| !s.is_empty()) {
            path.push_str(&format!("&specialization=ilike.*{}*", urlencoding::encode(specialization)));
        }
        if query.active_only.unwrap_or(false) {
            path.push_str("&status=eq.active");
        }

        debug!("Listing doctors: {}", path);
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let doctors = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: &str, auth_token: &str) -> Result<Doctor> {
        let path = format!("/rest/v1/doctors?id=eq.{}", urlencoding::encode(doctor_id));
        let rows: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let row = rows.into_iter().next().ok_or_else(|| anyhow!("Doctor not found"))?;
        Ok(serde_json::from_value(row)?)
    }
}
