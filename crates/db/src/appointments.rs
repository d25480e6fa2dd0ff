use chrono::{DateTime, Utc};
use common::{
    Appointment, AppointmentStatus, AppointmentTab, AppointmentView, ClaimDecision, Role,
    StatusCount,
};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Db, DbError};

const LIST_BASE: &str = "SELECT a.id, a.patient_id, a.doctor_id, a.contact, a.preferred_time, \
     a.notes, a.status, a.created_at, a.updated_at, \
     pu.email AS patient_email, du.email AS doctor_email \
     FROM appointments a \
     LEFT JOIN users pu ON pu.id = a.patient_id \
     LEFT JOIN users du ON du.id = a.doctor_id";

/// The slice of the appointment table a principal is allowed to see.
///
/// Doctors browsing `pending` see the shared unclaimed pool (any doctor may
/// claim any of those rows), while their `accepted`/`rejected`/`all` tabs
/// are scoped to their own cases. Patients only ever see their own rows;
/// admins see everything. This asymmetry is the intended shared-queue
/// behavior, not an oversight.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentScope {
    pub role: Role,
    pub user_id: Uuid,
    pub tab: AppointmentTab,
}

impl AppointmentScope {
    pub fn new(role: Role, user_id: Uuid, tab: AppointmentTab) -> Self {
        Self { role, user_id, tab }
    }

    fn push_filter(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match (self.role, self.tab) {
            (Role::Doctor, AppointmentTab::Pending) => {
                qb.push(" WHERE a.doctor_id IS NULL AND a.status = 'pending'");
            }
            (Role::Doctor, tab) => {
                qb.push(" WHERE a.doctor_id = ");
                qb.push_bind(self.user_id);
                if let Some(status) = tab.status_str() {
                    qb.push(" AND a.status = ");
                    qb.push_bind(status);
                }
            }
            (Role::Admin, tab) => {
                if let Some(status) = tab.status_str() {
                    qb.push(" WHERE a.status = ");
                    qb.push_bind(status);
                }
            }
            (Role::Patient, tab) => {
                qb.push(" WHERE a.patient_id = ");
                qb.push_bind(self.user_id);
                if let Some(status) = tab.status_str() {
                    qb.push(" AND a.status = ");
                    qb.push_bind(status);
                }
            }
        }
    }

    /// The rendered filter clause, for inspection.
    pub fn filter_sql(&self) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("");
        self.push_filter(&mut qb);
        qb.sql().to_string()
    }
}

#[derive(sqlx::FromRow, Debug, Clone)]
struct AppointmentJoinRow {
    id: Uuid,
    patient_id: Uuid,
    doctor_id: Option<Uuid>,
    contact: String,
    preferred_time: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    patient_email: Option<String>,
    doctor_email: Option<String>,
}

impl AppointmentJoinRow {
    fn into_view(self) -> AppointmentView {
        let patient_name = display_name(self.patient_email.as_deref(), self.patient_id);
        AppointmentView {
            id: self.id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            patient_name,
            patient_email: self.patient_email,
            doctor_email: self.doctor_email,
            contact: self.contact,
            preferred_time: self.preferred_time,
            notes: self.notes,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Display label for a patient: local part of the email when the user
/// record resolved, `Patient-<id prefix>` otherwise.
pub fn display_name(email: Option<&str>, id: Uuid) -> String {
    match email.and_then(|e| e.split('@').next()).filter(|s| !s.is_empty()) {
        Some(local) => local.to_string(),
        None => {
            let id = id.to_string();
            format!("Patient-{}", &id[..6])
        }
    }
}

pub async fn list_appointments(
    db: &Db,
    scope: AppointmentScope,
) -> Result<Vec<AppointmentView>, DbError> {
    let mut qb = QueryBuilder::<Postgres>::new(LIST_BASE);
    scope.push_filter(&mut qb);
    qb.push(" ORDER BY a.created_at DESC");
    let rows: Vec<AppointmentJoinRow> = qb.build_query_as().fetch_all(&db.0).await?;
    Ok(rows.into_iter().map(AppointmentJoinRow::into_view).collect())
}

pub async fn insert_appointment(
    db: &Db,
    patient_id: Uuid,
    contact: &str,
    preferred_time: Option<&str>,
    notes: Option<&str>,
) -> Result<Appointment, DbError> {
    let row = sqlx::query_as::<_, Appointment>(
        r#"INSERT INTO appointments (patient_id, contact, preferred_time, notes, status)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id, patient_id, doctor_id, contact, preferred_time, notes, status,
                     created_at, updated_at"#,
    )
    .bind(patient_id)
    .bind(contact)
    .bind(preferred_time)
    .bind(notes)
    .bind(AppointmentStatus::Pending.as_str())
    .fetch_one(&db.0)
    .await?;
    Ok(row)
}

pub async fn get_appointment(db: &Db, id: Uuid) -> Result<Option<Appointment>, DbError> {
    let row = sqlx::query_as::<_, Appointment>(
        "SELECT id, patient_id, doctor_id, contact, preferred_time, notes, status, \
         created_at, updated_at FROM appointments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&db.0)
    .await?;
    Ok(row)
}

#[derive(Debug)]
pub enum ClaimOutcome {
    /// The acting doctor won the row; status and doctor_id were written
    /// together.
    Claimed(Appointment),
    /// The row exists but another doctor acted first. Nothing was written.
    AlreadyAssigned,
    NotFound,
}

/// Claim-and-decide in one conditional statement. The WHERE guard and the
/// write execute atomically, so two doctors racing on the same row cannot
/// both succeed: the loser matches zero rows.
pub async fn claim_appointment(
    db: &Db,
    id: Uuid,
    doctor_id: Uuid,
    decision: ClaimDecision,
) -> Result<ClaimOutcome, DbError> {
    let row = sqlx::query_as::<_, Appointment>(
        r#"UPDATE appointments
           SET status = $2, doctor_id = $3
           WHERE id = $1 AND doctor_id IS NULL AND status = 'pending'
           RETURNING id, patient_id, doctor_id, contact, preferred_time, notes, status,
                     created_at, updated_at"#,
    )
    .bind(id)
    .bind(decision.as_str())
    .bind(doctor_id)
    .fetch_optional(&db.0)
    .await?;

    if let Some(appointment) = row {
        return Ok(ClaimOutcome::Claimed(appointment));
    }
    match get_appointment(db, id).await? {
        Some(_) => Ok(ClaimOutcome::AlreadyAssigned),
        None => Ok(ClaimOutcome::NotFound),
    }
}

pub async fn appointment_stats(db: &Db) -> Result<Vec<StatusCount>, DbError> {
    let rows = sqlx::query_as::<_, StatusCount>(
        "SELECT status, total, unassigned_count FROM appointment_stats ORDER BY status",
    )
    .fetch_all(&db.0)
    .await?;
    Ok(rows)
}
