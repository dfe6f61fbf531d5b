use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Insert payload for `clients`. Optional text fields are sent as `null` when absent.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct NewClient {
    pub full_name: String,
    /// `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub whatsapp_number: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub job_title: Option<String>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub soft_skills: Option<String>,
    pub important_notes: Option<String>,
    pub ad_whatsapp_channel: Option<String>,
    /// User id of the moderator/admin who submitted the intake form.
    pub inserted_by: String,
}

/// Stored `clients` row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientInfo {
    pub id: String,
    pub full_name: String,
    pub birth_date: Option<String>,
    pub whatsapp_number: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub job_title: Option<String>,
    pub education: Option<String>,
    pub work_experience: Option<String>,
    pub soft_skills: Option<String>,
    pub important_notes: Option<String>,
    pub ad_whatsapp_channel: Option<String>,
    pub inserted_by: String,
    pub assigned_moderator: Option<String>,
    pub assigned_designer: Option<String>,
    pub created_at: Option<String>,
}
