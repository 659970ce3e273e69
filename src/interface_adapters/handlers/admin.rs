use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::domain::entities::{
    ActivityKind, ActivityRecord, Ban, CodeUpdate, DashboardSummary, Incident, NewAdmin,
    NewSecurity, Page, PageQuery, SecurityPersonnel, Visit, Visitor,
};
use crate::interface_adapters::protocol::{
    AdminVisitorDetail, EmailPayload, ErrorBody, ListParams, Outcome, PersonnelOverview, Section,
    error_reply, guard_reply,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::session::Session;

type Reply<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

#[tracing::instrument(name = "admin_dashboard", skip_all)]
pub async fn dashboard(session: Session, State(state): State<AppState>) -> Reply<DashboardSummary> {
    session.require_admin().map_err(guard_reply)?;

    let summary = state
        .admin
        .dashboard(&session.bearer)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(summary))
}

// `q` switches the roster listing into search mode.
#[tracing::instrument(name = "admin_visitors", skip_all)]
pub async fn list_visitors(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<Visitor>> {
    session.require_admin().map_err(guard_reply)?;

    let page = params.page_query();
    let result = match params.q.as_deref() {
        Some(query) if !query.is_empty() => {
            state
                .admin
                .search_visitors(&session.bearer, query, &page)
                .await
        }
        _ => state.admin.visitors(&session.bearer, &page).await,
    };

    Ok(Json(result.map_err(|err| error_reply(&err))?))
}

// Admin visitor record: the visitor itself is the primary fetch; the
// three history lists degrade independently.
#[tracing::instrument(name = "admin_visitor_detail", skip_all, fields(visitor = %visitor_id))]
pub async fn visitor_detail(
    session: Session,
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Reply<AdminVisitorDetail> {
    session.require_admin().map_err(guard_reply)?;

    let bearer = &session.bearer;
    let page = params.page_query();
    let (visitor, visits, bans, incidents) = tokio::join!(
        state.admin.visitor(bearer, &visitor_id),
        state.admin.visitor_visits(bearer, &visitor_id, &page),
        state.admin.visitor_bans(bearer, &visitor_id, &page),
        state.admin.visitor_incidents(bearer, &visitor_id, &page),
    );

    let visitor = visitor.map_err(|err| error_reply(&err))?;
    Ok(Json(AdminVisitorDetail {
        visitor,
        visits: Section::from(visits),
        bans: Section::from(bans),
        incidents: Section::from(incidents),
    }))
}

#[tracing::instrument(name = "admin_visits", skip_all)]
pub async fn list_visits(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<Visit>> {
    session.require_admin().map_err(guard_reply)?;

    let page = state
        .admin
        .visits(&session.bearer, &params.page_query())
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(page))
}

#[tracing::instrument(name = "admin_bans", skip_all)]
pub async fn list_bans(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<Ban>> {
    session.require_admin().map_err(guard_reply)?;

    let page = state
        .admin
        .bans(
            &session.bearer,
            &params.page_query(),
            params.active_only.unwrap_or(false),
        )
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(page))
}

#[tracing::instrument(name = "admin_incidents", skip_all)]
pub async fn list_incidents(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<Incident>> {
    session.require_admin().map_err(guard_reply)?;

    let page = state
        .admin
        .incidents(&session.bearer, &params.page_query())
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(page))
}

#[tracing::instrument(name = "admin_personnel", skip_all)]
pub async fn list_personnel(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<SecurityPersonnel>> {
    session.require_admin().map_err(guard_reply)?;

    let page = params.page_query();
    let result = match params.q.as_deref() {
        Some(query) if !query.is_empty() => {
            state
                .admin
                .search_personnel(&session.bearer, query, &page)
                .await
        }
        _ => state.admin.personnel(&session.bearer, &page).await,
    };

    Ok(Json(result.map_err(|err| error_reply(&err))?))
}

// Personnel record page: one fan-out join over the five activity
// feeds. A failed feed shows its own error; the rest render normally.
#[tracing::instrument(name = "admin_personnel_overview", skip_all, fields(personnel = %personnel_id))]
pub async fn personnel_overview(
    session: Session,
    State(state): State<AppState>,
    Path(personnel_id): Path<String>,
) -> Reply<PersonnelOverview> {
    session.require_admin().map_err(guard_reply)?;

    let bearer = &session.bearer;
    let page = PageQuery::default();
    let feed = |kind: ActivityKind| {
        state
            .admin
            .personnel_activities(bearer, &personnel_id, kind, &page)
    };

    let (personnel, approved_visits, approved_leaves, incidents, issued_bans, lifted_bans) = tokio::join!(
        state.admin.personnel_detail(bearer, &personnel_id),
        feed(ActivityKind::ApprovedVisits),
        feed(ActivityKind::ApprovedLeaves),
        feed(ActivityKind::Incidents),
        feed(ActivityKind::IssuedBans),
        feed(ActivityKind::LiftedBans),
    );

    let personnel = personnel.map_err(|err| error_reply(&err))?;
    Ok(Json(PersonnelOverview {
        personnel,
        approved_visits: Section::from(approved_visits),
        approved_leaves: Section::from(approved_leaves),
        incidents: Section::from(incidents),
        issued_bans: Section::from(issued_bans),
        lifted_bans: Section::from(lifted_bans),
    }))
}

#[tracing::instrument(name = "admin_personnel_activities", skip_all, fields(personnel = %personnel_id, kind = %kind))]
pub async fn personnel_activities(
    session: Session,
    State(state): State<AppState>,
    Path((personnel_id, kind)): Path<(String, String)>,
    Query(params): Query<ListParams>,
) -> Reply<Page<ActivityRecord>> {
    session.require_admin().map_err(guard_reply)?;

    let Some(kind) = ActivityKind::parse(&kind) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: format!("unknown activity kind `{kind}`"),
            }),
        ));
    };

    let page = state
        .admin
        .personnel_activities(&session.bearer, &personnel_id, kind, &params.page_query())
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(page))
}

// --- Personnel management mutations ---

#[tracing::instrument(name = "register_security", skip_all, fields(email = %payload.email))]
pub async fn register_security(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<NewSecurity>,
) -> Reply<Outcome> {
    session.require_admin().map_err(guard_reply)?;

    match state.auth.register_security(&session.bearer, &payload).await {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => {
            tracing::warn!(error = %err, "security registration rejected.");
            Ok(Json(Outcome::from(&err)))
        }
    }
}

#[tracing::instrument(name = "register_admin", skip_all, fields(email = %payload.email))]
pub async fn register_admin(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<NewAdmin>,
) -> Reply<Outcome> {
    session.require_admin().map_err(guard_reply)?;

    match state.auth.register_admin(&session.bearer, &payload).await {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => {
            tracing::warn!(error = %err, "admin registration rejected.");
            Ok(Json(Outcome::from(&err)))
        }
    }
}

#[tracing::instrument(name = "activate_security", skip_all, fields(email = %payload.email))]
pub async fn activate_security(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Reply<Outcome> {
    session.require_admin().map_err(guard_reply)?;

    match state
        .auth
        .activate_security(&session.bearer, &payload.email)
        .await
    {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => Ok(Json(Outcome::from(&err))),
    }
}

#[tracing::instrument(name = "deactivate_security", skip_all, fields(email = %payload.email))]
pub async fn deactivate_security(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<EmailPayload>,
) -> Reply<Outcome> {
    session.require_admin().map_err(guard_reply)?;

    match state
        .auth
        .deactivate_security(&session.bearer, &payload.email)
        .await
    {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => Ok(Json(Outcome::from(&err))),
    }
}

#[tracing::instrument(name = "update_secret_code", skip_all, fields(email = %payload.email))]
pub async fn update_secret_code(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<CodeUpdate>,
) -> Reply<Outcome> {
    session.require_admin().map_err(guard_reply)?;

    match state
        .auth
        .update_secret_code(&session.bearer, &payload)
        .await
    {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => Ok(Json(Outcome::from(&err))),
    }
}
