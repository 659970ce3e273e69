use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    ActivityRecord, ActivitySummary, Ban, BanDetails, IdentifiedVisitor, Incident, LastVisit,
    Page, PageQuery, Role, SecurityPersonnel, Visit, Visitor, VisitorProfile,
};
use crate::domain::errors::ApiError;
use crate::use_cases::session::SessionError;

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// Map a backend error onto the reply the browser sees: missing auth is
// 401, upstream rejections keep their status, everything else is a
// gateway-side 502.
pub fn error_reply(err: &ApiError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        ApiError::MissingAuth => StatusCode::UNAUTHORIZED,
        ApiError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            message: err.to_string(),
        }),
    )
}

pub fn guard_reply(err: SessionError) -> (StatusCode, Json<ErrorBody>) {
    let (status, message) = match err {
        SessionError::NotAdmin | SessionError::NotSecurity => {
            (StatusCode::FORBIDDEN, "Unauthorized")
        }
    };
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

// Uniform mutation outcome. Backend rejections collapse into
// `success:false` with the resolved message; callers cannot branch on
// an error kind, only display it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<&ApiError> for Outcome {
    fn from(err: &ApiError) -> Self {
        Outcome::err(err.to_string())
    }
}

// One independently fetched slab of a composite page: either the data
// or that section's error string, never a failure of the whole view.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ok(T),
    Err { error: String },
}

impl<T> From<Result<T, ApiError>> for Section<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Section::Ok(value),
            Err(err) => Section::Err {
                error: err.to_string(),
            },
        }
    }
}

// --- Query parameters accepted by the gateway's list endpoints ---

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    // Switches the visitors/personnel lists into search mode.
    pub q: Option<String>,
    // Bans list only.
    pub active_only: Option<bool>,
}

impl ListParams {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailPayload {
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
}

// --- Session replies ---

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// --- Composite page replies ---

#[derive(Debug, Serialize)]
pub struct DeskHome {
    pub profile: SecurityPersonnel,
    pub activity: Section<ActivitySummary>,
}

#[derive(Debug, Serialize)]
pub struct DeskVisitorDetail {
    pub profile: VisitorProfile,
    pub visits: Section<Page<Visit>>,
    pub bans: Section<Page<Ban>>,
    pub incidents: Section<Page<Incident>>,
}

#[derive(Debug, Serialize)]
pub struct AdminVisitorDetail {
    pub visitor: Visitor,
    pub visits: Section<Page<Visit>>,
    pub bans: Section<Page<Ban>>,
    pub incidents: Section<Page<Incident>>,
}

#[derive(Debug, Serialize)]
pub struct PersonnelOverview {
    pub personnel: SecurityPersonnel,
    pub approved_visits: Section<Page<ActivityRecord>>,
    pub approved_leaves: Section<Page<ActivityRecord>>,
    pub incidents: Section<Page<ActivityRecord>>,
    pub issued_bans: Section<Page<ActivityRecord>>,
    pub lifted_bans: Section<Page<ActivityRecord>>,
}

#[derive(Debug, Serialize)]
pub struct CurrentBanReply {
    pub is_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ban: Option<BanDetails>,
}

#[derive(Debug, Serialize)]
pub struct BanHistoryReply {
    pub ban_history: Vec<BanDetails>,
}

// --- Mutation replies ---

#[derive(Debug, Serialize)]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct IdentifyOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<IdentifiedVisitor>,
    // Best-effort enrichment; absent when the lookup fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<LastVisit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_history: Option<Vec<Incident>>,
}

#[derive(Debug, Serialize)]
pub struct VisitOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit: Option<Visit>,
}

#[derive(Debug, Serialize)]
pub struct IncidentOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<i64>,
}
