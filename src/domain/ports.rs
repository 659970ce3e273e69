use async_trait::async_trait;

use crate::domain::entities::{
    Ack, ActivityKind, ActivityRecord, ActivitySummary, Ban, BanDetails, BanRequest, BanStatus,
    Bearer, CodeUpdate, DashboardSummary, IdentifiedVisitor, IdentifyRequest, Incident,
    IncidentAck, IncidentReport, LastVisit, LeaveRequest, LoginGrant, LoginRequest, NewAdmin,
    NewSecurity, NewVisitor, Page, PageQuery, RegisteredVisitor, SecurityPersonnel, UnbanRequest,
    Visit, VisitGrant, VisitRequest, Visitor, VisitorProfile,
};
use crate::domain::errors::ApiError;

// Handlers depend on these ports, not the concrete reqwest client.
// Dependencies point inwards to the domain layer.

// Account lifecycle and credential management endpoints.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginGrant, ApiError>;
    async fn register_admin(&self, bearer: &Bearer, req: &NewAdmin) -> Result<Ack, ApiError>;
    async fn register_security(&self, bearer: &Bearer, req: &NewSecurity) -> Result<Ack, ApiError>;
    async fn activate_security(&self, bearer: &Bearer, email: &str) -> Result<Ack, ApiError>;
    async fn deactivate_security(&self, bearer: &Bearer, email: &str) -> Result<Ack, ApiError>;
    async fn update_secret_code(&self, bearer: &Bearer, req: &CodeUpdate) -> Result<Ack, ApiError>;
}

// Read endpoints scoped to the signed-in guard's desk view.
#[async_trait]
pub trait DeskProvider: Send + Sync {
    async fn profile(&self, bearer: &Bearer) -> Result<SecurityPersonnel, ApiError>;
    async fn activity_summary(&self, bearer: &Bearer) -> Result<ActivitySummary, ApiError>;
    async fn visitors(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visitor>, ApiError>;
    async fn visitor_profile(&self, bearer: &Bearer, visitor: &str)
    -> Result<VisitorProfile, ApiError>;
    async fn visitor_visits(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Visit>, ApiError>;
    async fn visitor_bans(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Ban>, ApiError>;
    async fn visitor_incidents(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Incident>, ApiError>;
    async fn ban_status(&self, bearer: &Bearer, visitor: &str) -> Result<BanStatus, ApiError>;
}

// Visitor registration, identification and standing-restriction calls.
// These endpoints authenticate through the secret code carried in the
// payload rather than a bearer header.
#[async_trait]
pub trait VisitorProvider: Send + Sync {
    async fn register(&self, req: &NewVisitor) -> Result<RegisteredVisitor, ApiError>;
    async fn identify(&self, req: &IdentifyRequest) -> Result<IdentifiedVisitor, ApiError>;
    async fn ban(&self, req: &BanRequest) -> Result<Ack, ApiError>;
    async fn unban(&self, req: &UnbanRequest) -> Result<Ack, ApiError>;
    async fn report_incident(&self, req: &IncidentReport) -> Result<IncidentAck, ApiError>;
    // Resolves to None when the visitor has no standing ban.
    async fn current_ban(&self, visitor: &str) -> Result<Option<BanDetails>, ApiError>;
    async fn ban_history(&self, visitor: &str) -> Result<Vec<BanDetails>, ApiError>;
    async fn ban_details(&self, ban_id: i64) -> Result<BanDetails, ApiError>;
    // Resolves to None when the visitor has no recorded visits.
    async fn last_visit(&self, national_id: &str) -> Result<Option<LastVisit>, ApiError>;
    async fn incident_history(&self, national_id: &str) -> Result<Vec<Incident>, ApiError>;
}

// Entry/exit event recording.
#[async_trait]
pub trait VisitProvider: Send + Sync {
    async fn record_visit(&self, req: &VisitRequest) -> Result<VisitGrant, ApiError>;
    async fn record_leave(&self, req: &LeaveRequest) -> Result<VisitGrant, ApiError>;
    async fn visit_details(&self, visit_id: i64) -> Result<Visit, ApiError>;
}

// Administrator dashboards, rosters and records.
#[async_trait]
pub trait AdminProvider: Send + Sync {
    async fn dashboard(&self, bearer: &Bearer) -> Result<DashboardSummary, ApiError>;
    async fn visitors(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visitor>, ApiError>;
    async fn search_visitors(
        &self,
        bearer: &Bearer,
        query: &str,
        page: &PageQuery,
    ) -> Result<Page<Visitor>, ApiError>;
    async fn visitor(&self, bearer: &Bearer, visitor: &str) -> Result<Visitor, ApiError>;
    async fn visitor_visits(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Visit>, ApiError>;
    async fn visitor_bans(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Ban>, ApiError>;
    async fn visitor_incidents(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Incident>, ApiError>;
    async fn visits(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visit>, ApiError>;
    async fn bans(
        &self,
        bearer: &Bearer,
        page: &PageQuery,
        active_only: bool,
    ) -> Result<Page<Ban>, ApiError>;
    async fn incidents(&self, bearer: &Bearer, page: &PageQuery)
    -> Result<Page<Incident>, ApiError>;
    async fn personnel(
        &self,
        bearer: &Bearer,
        page: &PageQuery,
    ) -> Result<Page<SecurityPersonnel>, ApiError>;
    async fn search_personnel(
        &self,
        bearer: &Bearer,
        query: &str,
        page: &PageQuery,
    ) -> Result<Page<SecurityPersonnel>, ApiError>;
    async fn personnel_detail(
        &self,
        bearer: &Bearer,
        personnel: &str,
    ) -> Result<SecurityPersonnel, ApiError>;
    async fn personnel_activities(
        &self,
        bearer: &Bearer,
        personnel: &str,
        kind: ActivityKind,
        page: &PageQuery,
    ) -> Result<Page<ActivityRecord>, ApiError>;
}
