// --- File: crates/bienestar_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// --- Scheduling Config ---
/// Parameters shared by every availability flow (booking and rescheduling).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Spacing between generated slot start times, in minutes.
    #[serde(default = "default_slot_increment")]
    pub slot_increment_minutes: u32,
    /// IANA zone used to turn stored timestamps into calendar days.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Upper bound on the number of days a range query may span.
    #[serde(default = "default_max_range_days")]
    pub max_range_days: u32,
}

fn default_slot_increment() -> u32 {
    30
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_max_range_days() -> u32 {
    31
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            slot_increment_minutes: default_slot_increment(),
            time_zone: default_time_zone(),
            max_range_days: default_max_range_days(),
        }
    }
}

// --- Firestore Config ---
// Holds non-secret Firestore config. The service account key is read from key_path.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    pub project_id: Option<String>, // Mandatory when use_firestore is set
    pub key_path: Option<String>,   // Path to the service account JSON
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_schedules_collection")]
    pub schedules_collection: String,
    #[serde(default = "default_appointments_collection")]
    pub appointments_collection: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_schedules_collection() -> String {
    "schedules".to_string()
}

fn default_appointments_collection() -> String {
    "appointments".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            key_path: None,
            database_id: default_database_id(),
            schedules_collection: default_schedules_collection(),
            appointments_collection: default_appointments_collection(),
            base_url: default_base_url(),
        }
    }
}

// --- Seed Config ---
/// JSON file loaded into the in-memory store when Firestore is disabled.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SeedConfig {
    pub path: String,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_firestore: bool,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}
