//! Database rows and HTTP request/response bodies.
//!
//! Request and response bodies use camelCase field names on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role. Fixed when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Admin,
    Invitee,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Admin => "ADMIN",
            AccountType::Invitee => "INVITEE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance answer of a single guest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "response_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "PENDING",
            ResponseStatus::Accepted => "ACCEPTED",
            ResponseStatus::Declined => "DECLINED",
        }
    }
}

/// Event configuration keys.
///
/// Every key has a seeded row in `event_configs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    AddressCeremony,
    AddressReception,
    Date,
    Description,
    DressCode,
    Email,
    Time,
    Title,
    Url,
}

impl ConfigKey {
    /// All keys, in key order.
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::AddressCeremony,
        ConfigKey::AddressReception,
        ConfigKey::Date,
        ConfigKey::Description,
        ConfigKey::DressCode,
        ConfigKey::Email,
        ConfigKey::Time,
        ConfigKey::Title,
        ConfigKey::Url,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::AddressCeremony => "event.address.ceremony",
            ConfigKey::AddressReception => "event.address.reception",
            ConfigKey::Date => "event.date",
            ConfigKey::Description => "event.description",
            ConfigKey::DressCode => "event.dress.code",
            ConfigKey::Email => "event.email",
            ConfigKey::Time => "event.time",
            ConfigKey::Title => "event.title",
            ConfigKey::Url => "event.url",
        }
    }

    /// Form input type used by the admin UI.
    pub fn display_type(&self) -> &'static str {
        match self {
            ConfigKey::AddressCeremony | ConfigKey::AddressReception | ConfigKey::Description => {
                "textarea"
            }
            ConfigKey::Date => "date",
            ConfigKey::DressCode | ConfigKey::Title => "text",
            ConfigKey::Email => "email",
            ConfigKey::Time => "time",
            ConfigKey::Url => "url",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown configuration key: {}", s))
    }
}

// ============================================================================
// Database rows
// ============================================================================

/// Account row (maps to accounts table)
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub account_type: AccountType,
    pub activated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Invitation row (maps to invitations table)
#[derive(Debug, Clone, FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub code: String,
    pub account_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invitation with the number of attendants on it.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithCount {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub code: String,
    pub account_id: Option<Uuid>,
    pub guest_count: i64,
}

/// Meal option row (maps to meal_options table)
#[derive(Debug, Clone, FromRow)]
pub struct MealOption {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendant row (maps to attendants table)
#[derive(Debug, Clone, FromRow)]
pub struct Attendant {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub response_status: ResponseStatus,
    pub meal_option_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Activation row (maps to activations table)
#[derive(Debug, Clone, FromRow)]
pub struct Activation {
    pub id: Uuid,
    pub token: String,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Event configuration row (maps to event_configs table)
#[derive(Debug, Clone, FromRow)]
pub struct EventConfig {
    pub id: Uuid,
    pub config_key: String,
    pub value: String,
    pub display_type: String,
    pub updated_at: DateTime<Utc>,
}

/// One row of the attendant report.
#[derive(Debug, Clone, FromRow)]
pub struct AttendantReportRow {
    pub party: String,
    pub name: String,
    pub response_status: ResponseStatus,
    pub meal: Option<String>,
}

/// Attendant count per meal option, zero counts included.
#[derive(Debug, Clone, FromRow)]
pub struct MealCountRow {
    pub name: String,
    pub count: i64,
}

/// Claimed invitation that still has unanswered attendants.
#[derive(Debug, Clone, FromRow)]
pub struct PendingInvitee {
    pub invitation_name: String,
    pub email: String,
    pub first_name: String,
    pub pending_count: i64,
}

// ============================================================================
// Authentication
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub principal: String,
    pub credentials: String,
}

// ============================================================================
// Accounts and administrators
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub activated: bool,
}

impl From<Account> for AdminSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            activated: account.activated,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

// ============================================================================
// Registration and activation
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInviteeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub invitation_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationLookupResponse {
    pub email: String,
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

// ============================================================================
// Event configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub key: String,
    pub display_name: String,
    pub display_type: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

// ============================================================================
// Meals
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MealRequest {
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<MealOption> for MealResponse {
    fn from(meal: MealOption) -> Self {
        Self {
            id: meal.id,
            name: meal.name,
            description: meal.description,
        }
    }
}

// ============================================================================
// Invitations and attendants
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct InvitationRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub guest_count: i64,
    pub code: String,
    pub claimed: bool,
}

impl From<InvitationWithCount> for InvitationResponse {
    fn from(row: InvitationWithCount) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            guest_count: row.guest_count,
            code: row.code,
            claimed: row.account_id.is_some(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantRequest {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub response_status: Option<ResponseStatus>,
    pub dining_option: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub response_status: ResponseStatus,
    pub dining_option: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendantResponse {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub response_status: ResponseStatus,
    pub dining_option: Option<Uuid>,
}

impl From<Attendant> for AttendantResponse {
    fn from(attendant: Attendant) -> Self {
        Self {
            id: attendant.id,
            invitation_id: attendant.invitation_id,
            name: attendant.name,
            response_status: attendant.response_status,
            dining_option: attendant.meal_option_id,
        }
    }
}

// ============================================================================
// Reporting
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealStat {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub pending_attendants: i64,
    pub accepted_attendants: i64,
    pub declined_attendants: i64,
    pub meal_stats: Vec<MealStat>,
}

/// Health check body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
}
