//! BMI Tracker MCP Server Implementation
//!
//! Implements the MCP server with all BMI tracker tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::entries::{self, EntryForm};
use crate::tools::input::{HeightInput, WeightInput};
use crate::tools::profile::{self, ProfileForm};
use crate::tools::status::StatusTracker;

/// BMI Tracker MCP Service
#[derive(Clone)]
pub struct BmiTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<BmiTrackService>,
}

impl BmiTrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: impl std::fmt::Display) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": "{}"}}"#,
        what, id
    ))]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompleteOnboardingParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Measurement system: metric, us, or uk
    pub system: String,
    /// Reference height in cm (metric)
    pub height_cm: Option<f64>,
    /// Reference height feet, 0-8 (us/uk)
    pub height_feet: Option<f64>,
    /// Reference height inches, 0-11 (us/uk)
    pub height_inches: Option<f64>,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    /// male, female, or not specified
    pub sex: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// New display name (optional)
    pub name: Option<String>,
    /// New measurement system (optional): metric, us, or uk
    pub system: Option<String>,
    /// New reference height in cm (metric)
    pub height_cm: Option<f64>,
    /// New reference height feet (us/uk)
    pub height_feet: Option<f64>,
    /// New reference height inches (us/uk)
    pub height_inches: Option<f64>,
    /// New date of birth (YYYY-MM-DD). An empty string clears it.
    pub date_of_birth: Option<String>,
    /// New sex: male, female, or not specified
    pub sex: Option<String>,
}

// ============================================================================
// Entry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBmiEntryParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Entry date (YYYY-MM-DD or RFC 3339). Defaults to now.
    pub date: Option<String>,
    /// Height in cm (metric). Omit to use the profile height.
    pub height_cm: Option<f64>,
    /// Height feet (us/uk). Omit to use the profile height.
    pub height_feet: Option<f64>,
    /// Height inches (us/uk)
    pub height_inches: Option<f64>,
    /// Weight in kg (metric) or lbs (us)
    pub weight: Option<f64>,
    /// Weight stones, 0-50 (uk)
    pub weight_stones: Option<f64>,
    /// Weight pounds, 0-13 (uk)
    pub weight_pounds: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateBmiEntryParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Entry ID to update
    pub id: i64,
    /// New entry date (optional)
    pub date: Option<String>,
    /// New height in cm (metric)
    pub height_cm: Option<f64>,
    /// New height feet (us/uk)
    pub height_feet: Option<f64>,
    /// New height inches (us/uk)
    pub height_inches: Option<f64>,
    /// New weight in kg (metric) or lbs (us)
    pub weight: Option<f64>,
    /// New weight stones (uk)
    pub weight_stones: Option<f64>,
    /// New weight pounds (uk)
    pub weight_pounds: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EntryIdParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListBmiEntriesParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Maximum number of entries, at least 1 (default all)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetBmiTrendParams {
    /// Opaque id of the signed-in user
    pub user_id: String,
    /// Start date inclusive (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// End date inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBmiParams {
    /// Measurement system of the values: metric, us, or uk
    pub system: String,
    pub height_cm: Option<f64>,
    pub height_feet: Option<f64>,
    pub height_inches: Option<f64>,
    pub weight: Option<f64>,
    pub weight_stones: Option<f64>,
    pub weight_pounds: Option<f64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl BmiTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the BMI tracker service including build info, database status, and process information")]
    async fn bmi_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for onboarding users and logging BMI entries. Call this when starting a session or when unsure how to use the tools.")]
    fn bmi_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::BMI_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(BMI_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Create an empty profile for a user on first sign-in. Safe to call repeatedly.")]
    fn register_user(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profile::register_user(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Complete onboarding: set measurement system (metric/us/uk), reference height, date of birth and sex")]
    fn complete_onboarding(&self, Parameters(p): Parameters<CompleteOnboardingParams>) -> Result<CallToolResult, McpError> {
        let form = ProfileForm {
            name: Some(&p.name),
            system: Some(&p.system),
            height: HeightInput { height_cm: p.height_cm, feet: p.height_feet, inches: p.height_inches },
            date_of_birth: p.date_of_birth.as_deref(),
            sex: p.sex.as_deref(),
        };
        let result = profile::complete_onboarding(&self.database, &p.user_id, &form, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the profile summary: height, age, sex, measurement system and unit labels")]
    fn get_profile_summary(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile_summary(&self.database, &p.user_id, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(summary) => to_json(&summary),
            None => not_found("Profile", &p.user_id),
        }
    }

    #[tool(description = "Update profile fields. Height is read in the (new) measurement system.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let form = ProfileForm {
            name: p.name.as_deref(),
            system: p.system.as_deref(),
            height: HeightInput { height_cm: p.height_cm, feet: p.height_feet, inches: p.height_inches },
            date_of_birth: p.date_of_birth.as_deref(),
            sex: p.sex.as_deref(),
        };
        let result = profile::update_profile(&self.database, &p.user_id, &form, today())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(summary) => to_json(&summary),
            None => not_found("Profile", &p.user_id),
        }
    }

    // --- Entries ---

    #[tool(description = "Add a BMI entry with height and weight in the user's measurement system. BMI is calculated automatically.")]
    fn add_bmi_entry(&self, Parameters(p): Parameters<AddBmiEntryParams>) -> Result<CallToolResult, McpError> {
        let form = EntryForm {
            date: p.date.as_deref(),
            height: HeightInput { height_cm: p.height_cm, feet: p.height_feet, inches: p.height_inches },
            weight: WeightInput { weight: p.weight, stones: p.weight_stones, pounds: p.weight_pounds },
        };
        let result = entries::add_bmi_entry(&self.database, &p.user_id, &form)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a BMI entry by ID, shown in the user's measurement system")]
    fn get_bmi_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = entries::get_bmi_entry(&self.database, &p.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => to_json(&entry),
            None => not_found("BMI entry", p.id),
        }
    }

    #[tool(description = "List BMI entries newest first, with BMI category, in the user's measurement system")]
    fn list_bmi_entries(&self, Parameters(p): Parameters<ListBmiEntriesParams>) -> Result<CallToolResult, McpError> {
        let result = entries::list_bmi_entries(&self.database, &p.user_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a BMI entry's date, height or weight. Only given fields change; BMI is recalculated.")]
    fn update_bmi_entry(&self, Parameters(p): Parameters<UpdateBmiEntryParams>) -> Result<CallToolResult, McpError> {
        let form = EntryForm {
            date: p.date.as_deref(),
            height: HeightInput { height_cm: p.height_cm, feet: p.height_feet, inches: p.height_inches },
            weight: WeightInput { weight: p.weight, stones: p.weight_stones, pounds: p.weight_pounds },
        };
        let result = entries::update_bmi_entry(&self.database, &p.user_id, p.id, &form)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => to_json(&entry),
            None => not_found("BMI entry", p.id),
        }
    }

    #[tool(description = "Delete a BMI entry")]
    fn delete_bmi_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = entries::delete_bmi_entry(&self.database, &p.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Summarise BMI over time: first and latest BMI, change, min and max, optionally within a date range")]
    fn get_bmi_trend(&self, Parameters(p): Parameters<GetBmiTrendParams>) -> Result<CallToolResult, McpError> {
        let result = entries::get_bmi_trend(&self.database, &p.user_id, p.start_date.as_deref(), p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Calculate BMI and category for a height and weight in any measurement system without saving")]
    fn calculate_bmi(&self, Parameters(p): Parameters<CalculateBmiParams>) -> Result<CallToolResult, McpError> {
        let height = HeightInput { height_cm: p.height_cm, feet: p.height_feet, inches: p.height_inches };
        let weight = WeightInput { weight: p.weight, stones: p.weight_stones, pounds: p.weight_pounds };
        let result = entries::calculate_bmi(&p.system, &height, &weight)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BmiTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bmitrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("BMI Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "BMI Tracker - height, weight and BMI tracking in metric, US or UK units. \
                 IMPORTANT: Call bmi_instructions first. \
                 Profile: register_user, complete_onboarding, get_profile_summary, update_profile. \
                 Entries: add/get/update/delete_bmi_entry, list_bmi_entries, get_bmi_trend. \
                 Utilities: calculate_bmi, bmi_status."
                    .into(),
            ),
        }
    }
}
