use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: DoctorStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Active,
    #[serde(alias = "on_leave")]
    OnLeave,
    Inactive,
}

impl Doctor {
    pub fn is_active(&self) -> bool {
        self.status == DoctorStatus::Active
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorListQuery {
    pub specialization: Option<String>,
    pub active_only: Option<bool>,
}
