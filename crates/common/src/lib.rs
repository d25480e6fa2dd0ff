use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal roles. Anything we cannot recognize resolves to `Patient`,
/// the least privileged role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Patient
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    /// Resolves a stored or claimed role string, falling back to `Patient`.
    pub fn from_claim(s: &str) -> Role {
        match s {
            "doctor" => Role::Doctor,
            "admin" => Role::Admin,
            _ => Role::Patient,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Accepted => "accepted",
            AppointmentStatus::Rejected => "rejected",
        }
    }
}

/// A doctor's decision on a pending appointment. `pending` is not a
/// decision, so this is narrower than `AppointmentStatus`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClaimDecision {
    Accepted,
    Rejected,
}

impl ClaimDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimDecision::Accepted => "accepted",
            ClaimDecision::Rejected => "rejected",
        }
    }
}

/// Tabs a viewer can select over the appointment list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentTab {
    All,
    Pending,
    Accepted,
    Rejected,
}

impl Default for AppointmentTab {
    fn default() -> Self {
        AppointmentTab::All
    }
}

impl AppointmentTab {
    pub fn status_str(&self) -> Option<&'static str> {
        match self {
            AppointmentTab::All => None,
            AppointmentTab::Pending => Some("pending"),
            AppointmentTab::Accepted => Some("accepted"),
            AppointmentTab::Rejected => Some("rejected"),
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub contact: String,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An appointment enriched with display labels for the viewer. The labels
/// are best effort; a missing user record degrades to a placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub patient_name: String,
    pub patient_email: Option<String>,
    pub doctor_email: Option<String>,
    pub contact: String,
    pub preferred_time: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub total: i64,
    pub unassigned_count: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock_quantity: i32,
    pub prescription_required: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart row joined with the product it references.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub name: String,
    pub price: f64,
    pub prescription_required: bool,
    pub image_url: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Prescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_url: String,
    pub medicine_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("permission denied")]
    PermissionDenied,
    #[error("appointment already assigned to another doctor")]
    AlreadyAssigned,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("validation: {0}")]
    Validation(String),
    #[error("store unavailable")]
    Store,
    #[error("internal error")]
    Internal,
}

pub type AppResult<T> = Result<T, AppError>;
