use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Typed schemas for every payload crossing the backend boundary. The
// backend owns these records; the gateway keeps request-scoped copies
// only. Timestamps arrive as ISO 8601 strings without an offset, so
// they are carried as naive UTC datetimes.

// Opaque bearer credential, threaded explicitly through every
// authenticated call instead of being read ambiently from the request.
#[derive(Clone, Debug)]
pub struct Bearer(pub String);

// Account role as issued at login and stamped on personnel records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Security,
    Visitor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Security => "security",
            Role::Visitor => "visitor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "security" => Some(Role::Security),
            "visitor" => Some(Role::Visitor),
            _ => None,
        }
    }
}

// A visit is open ("visit") until the leave call closes it ("leave").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Visit,
    Leave,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

// Personnel records appear in two densities: the flat dictionary on
// list/detail endpoints and the nested form embedded in visit and ban
// rows. One tolerant schema covers both.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecurityPersonnel {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<i64>,
    pub reason: String,
    pub visit_time: NaiveDateTime,
    #[serde(default)]
    pub leave_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<i64>,
    #[serde(default)]
    pub left_approved_by_id: Option<i64>,
    pub status: VisitStatus,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<Visitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<SecurityPersonnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_approved_by: Option<SecurityPersonnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incidents: Option<Vec<Incident>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ban {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<i64>,
    pub reason: String,
    pub issued_at: NaiveDateTime,
    #[serde(default)]
    pub lifted_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by_id: Option<i64>,
    #[serde(default)]
    pub lifted_by_id: Option<i64>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<Visitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<Visit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<SecurityPersonnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifted_by: Option<SecurityPersonnel>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Incident {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<i64>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by_id: Option<i64>,
    pub recorded_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<SecurityPersonnel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<Visitor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<Visit>,
}

// Uniform list envelope every list wrapper normalizes into, regardless
// of the resource-specific key the backend used.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

// Pagination inputs. A parameter is appended to the query string only
// when the caller supplied it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", self.page.map(|page| page.to_string())),
            ("per_page", self.per_page.map(|per_page| per_page.to_string())),
        ]
    }
}

// The five per-personnel activity feeds served by one backend endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    ApprovedVisits,
    ApprovedLeaves,
    Incidents,
    IssuedBans,
    LiftedBans,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::ApprovedVisits,
        ActivityKind::ApprovedLeaves,
        ActivityKind::Incidents,
        ActivityKind::IssuedBans,
        ActivityKind::LiftedBans,
    ];

    pub fn as_segment(&self) -> &'static str {
        match self {
            ActivityKind::ApprovedVisits => "approved_visits",
            ActivityKind::ApprovedLeaves => "approved_leaves",
            ActivityKind::Incidents => "incidents",
            ActivityKind::IssuedBans => "issued_bans",
            ActivityKind::LiftedBans => "lifted_bans",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_segment() == value)
    }
}

// Activity feed rows are visits, bans, or incidents depending on the
// requested kind; the required fields of each shape disambiguate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityRecord {
    Visit(Visit),
    Ban(Ban),
    Incident(Incident),
}

// --- Desk-facing composites ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisitorProfile {
    #[serde(flatten)]
    pub visitor: Visitor,
    pub is_currently_banned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ban: Option<Ban>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BanStatus {
    pub is_banned: bool,
    #[serde(default)]
    pub ban_details: Option<Ban>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub visits_approved: u64,
    pub leaves_approved: u64,
    pub incidents_recorded: u64,
    pub bans_issued: u64,
    pub bans_lifted: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecentActivities {
    pub recent_visits: Vec<Visit>,
    pub recent_incidents: Vec<Incident>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub activity_counts: ActivityCounts,
    pub recent_activities: RecentActivities,
}

// --- Ban detail payloads ---
// These endpoints pre-format timestamps for display and embed slim
// references instead of full records, so they get their own shapes.

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfficerRef {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisitorRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default)]
    pub is_banned: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BanVisitRef {
    pub visit_id: i64,
    pub visit_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<i64>,
    #[serde(default)]
    pub left_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BanDetails {
    pub ban_id: i64,
    pub reason: String,
    pub issued_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<OfficerRef>,
    #[serde(default)]
    pub lifted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifted_by: Option<OfficerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<VisitorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit: Option<BanVisitRef>,
}

// Last-visit lookups embed slim approver/visitor references alongside
// the flat visit columns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LastVisit {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_id: Option<i64>,
    pub reason: String,
    pub visit_time: NaiveDateTime,
    #[serde(default)]
    pub leave_time: Option<NaiveDateTime>,
    pub status: VisitStatus,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor: Option<VisitorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<OfficerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_approved_by: Option<OfficerRef>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
}

// --- Dashboard ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecentVisit {
    pub id: i64,
    pub visitor_id: i64,
    pub visitor_name: String,
    pub reason: String,
    pub visit_time: NaiveDateTime,
    #[serde(default)]
    pub leave_time: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrequentVisitor {
    pub id: i64,
    pub full_name: String,
    pub visit_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_visitors: u64,
    pub active_visits: u64,
    pub visits_today: u64,
    pub incidents_today: u64,
    pub active_bans: u64,
    pub security_personnel_count: u64,
    pub total_visits: u64,
    pub total_incidents: u64,
    pub total_bans: u64,
    pub recent_visits: Vec<RecentVisit>,
    pub recent_incidents: Vec<Incident>,
    pub recent_bans: Vec<Ban>,
    pub frequent_visitors: Vec<FrequentVisitor>,
}

// --- Request payloads sent to the backend ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginGrant {
    pub access_token: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub national_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewSecurity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub national_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_code: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewVisitor {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub national_id: String,
    // Data-URL encoded image, when the registration form captured one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    pub secret_code: String,
}

// Keys are serialized only when present; the backend branches on which
// identification method was supplied.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IdentifyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BanRequest {
    pub visitor_id: String,
    pub reason: String,
    pub secret_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnbanRequest {
    pub visitor_id: String,
    pub secret_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncidentReport {
    pub visitor_id: String,
    pub incident_details: String,
    pub secret_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisitRequest {
    pub visitor_id: String,
    pub reason: String,
    pub secret_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub visit_id: i64,
    pub secret_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeUpdate {
    pub email: String,
    pub new_code: String,
}

// --- Backend acknowledgements ---

// Plain `{message}` (registration endpoints) or `{success, message}`
// (visitor mutations); both decode here.
#[derive(Clone, Debug, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisteredVisitor {
    pub message: String,
    pub visitor_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifiedVisitor {
    #[serde(flatten)]
    pub visitor: Visitor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banned_by: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VisitGrant {
    pub message: String,
    pub visit: Visit,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IncidentAck {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub incident_id: Option<i64>,
}
