//! Member record and the request/response shapes around it.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Membership status. No API path mutates this; it defaults to active and only
/// changes through direct data edits by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "inactive" => MemberStatus::Inactive,
            _ => MemberStatus::Active,
        }
    }

    /// Capitalized label for public display.
    pub fn label(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Inactive => "Inactive",
        }
    }
}

/// A registered party member. Rows are immutable once inserted; the only
/// mutation the registry performs is physical deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub member_number: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub status: MemberStatus,
    /// RFC 3339 UTC timestamp assigned at registration.
    pub registered_at: String,
}

impl Member {
    /// Registration timestamp formatted for humans, e.g. "29 August 2026".
    pub fn registration_date(&self) -> String {
        DateTime::parse_from_rfc3339(&self.registered_at)
            .map(|dt| dt.format("%d %B %Y").to_string())
            .unwrap_or_else(|_| self.registered_at.clone())
    }
}

/// Request body for registration, shared by the public form and the admin
/// manual-entry path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub national_id: String,
}

/// What a successful registration returns to the applicant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub member_number: String,
}

/// Member data returned by the public status lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub member_number: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub registration_date: String,
    pub status: String,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        MemberView {
            member_number: member.member_number.clone(),
            full_name: member.full_name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            registration_date: member.registration_date(),
            status: member.status.label().to_string(),
        }
    }
}

/// One page of the admin member list plus the total matching count for
/// pagination controls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub items: Vec<Member>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Response for a single admin deletion; the name is used for confirmation
/// messaging.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMember {
    pub deleted_name: String,
}

/// Request body for bulk deletion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
    pub deleted_count: u64,
}

/// Privacy-reduced entry for the public member directory.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub member_number: String,
    pub full_name: String,
    pub registration_date: String,
}

impl From<&Member> for DirectoryEntry {
    fn from(member: &Member) -> Self {
        DirectoryEntry {
            member_number: member.member_number.clone(),
            full_name: member.full_name.clone(),
            registration_date: member.registration_date(),
        }
    }
}

/// Aggregate counts for the public statistics display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStats {
    pub total_members: i64,
    pub active_members: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_capitalized() {
        assert_eq!(MemberStatus::Active.label(), "Active");
        assert_eq!(MemberStatus::Inactive.label(), "Inactive");
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(MemberStatus::from_str("active"), MemberStatus::Active);
        assert_eq!(MemberStatus::from_str("inactive"), MemberStatus::Inactive);
    }

    #[test]
    fn test_registration_date_formatting() {
        let member = Member {
            id: 1,
            member_number: "NVP-000001".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1234567890".to_string(),
            national_id: "1234567".to_string(),
            status: MemberStatus::Active,
            registered_at: "2026-08-29T12:00:00+00:00".to_string(),
        };
        assert_eq!(member.registration_date(), "29 August 2026");
    }
}
