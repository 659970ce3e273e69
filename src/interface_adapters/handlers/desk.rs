use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::entities::{
    BanDetails, BanRequest, BanStatus, IdentifyRequest, IncidentReport, LeaveRequest, NewVisitor,
    Page, UnbanRequest, Visit, VisitRequest, Visitor,
};
use crate::interface_adapters::protocol::{
    BanHistoryReply, CurrentBanReply, DeskHome, DeskVisitorDetail, ErrorBody, IdentifyOutcome,
    IncidentOutcome, ListParams, Outcome, RegisterOutcome, Section, VisitOutcome, error_reply,
    guard_reply,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::session::Session;

type Reply<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

// The guard's landing view: own profile plus the activity summary. The
// summary is a secondary fetch and degrades to an error section.
#[tracing::instrument(name = "desk_home", skip_all)]
pub async fn home(session: Session, State(state): State<AppState>) -> Reply<DeskHome> {
    session.require_security().map_err(guard_reply)?;
    tracing::debug!(
        email = session.email.as_deref().unwrap_or("unknown"),
        "loading desk profile."
    );

    let (profile, activity) = tokio::join!(
        state.desk.profile(&session.bearer),
        state.desk.activity_summary(&session.bearer),
    );

    let profile = profile.map_err(|err| error_reply(&err))?;
    Ok(Json(DeskHome {
        profile,
        activity: Section::from(activity),
    }))
}

#[tracing::instrument(name = "desk_visitors", skip_all)]
pub async fn list_visitors(
    session: Session,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Reply<Page<Visitor>> {
    session.require_security().map_err(guard_reply)?;

    let page = state
        .desk
        .visitors(&session.bearer, &params.page_query())
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(page))
}

// Visitor record page: the profile is the primary fetch; the visit,
// ban and incident lists each render or fail independently.
#[tracing::instrument(name = "desk_visitor_detail", skip_all, fields(visitor = %visitor_id))]
pub async fn visitor_detail(
    session: Session,
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Reply<DeskVisitorDetail> {
    session.require_security().map_err(guard_reply)?;

    let bearer = &session.bearer;
    let page = params.page_query();
    let (profile, visits, bans, incidents) = tokio::join!(
        state.desk.visitor_profile(bearer, &visitor_id),
        state.desk.visitor_visits(bearer, &visitor_id, &page),
        state.desk.visitor_bans(bearer, &visitor_id, &page),
        state.desk.visitor_incidents(bearer, &visitor_id, &page),
    );

    let profile = profile.map_err(|err| error_reply(&err))?;
    Ok(Json(DeskVisitorDetail {
        profile,
        visits: Section::from(visits),
        bans: Section::from(bans),
        incidents: Section::from(incidents),
    }))
}

#[tracing::instrument(name = "desk_ban_status", skip_all, fields(visitor = %visitor_id))]
pub async fn ban_status(
    session: Session,
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
) -> Reply<BanStatus> {
    session.require_security().map_err(guard_reply)?;

    let status = state
        .desk
        .ban_status(&session.bearer, &visitor_id)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(status))
}

#[tracing::instrument(name = "desk_current_ban", skip_all, fields(visitor = %visitor_id))]
pub async fn current_ban(
    session: Session,
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
) -> Reply<CurrentBanReply> {
    session.require_security().map_err(guard_reply)?;

    let current = state
        .visitors
        .current_ban(&visitor_id)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(CurrentBanReply {
        is_banned: current.is_some(),
        current_ban: current,
    }))
}

#[tracing::instrument(name = "desk_ban_history", skip_all, fields(visitor = %visitor_id))]
pub async fn ban_history(
    session: Session,
    State(state): State<AppState>,
    Path(visitor_id): Path<String>,
) -> Reply<BanHistoryReply> {
    session.require_security().map_err(guard_reply)?;

    let ban_history = state
        .visitors
        .ban_history(&visitor_id)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(BanHistoryReply { ban_history }))
}

#[tracing::instrument(name = "desk_ban_details", skip_all, fields(ban = ban_id))]
pub async fn ban_details(
    session: Session,
    State(state): State<AppState>,
    Path(ban_id): Path<i64>,
) -> Reply<BanDetails> {
    session.require_security().map_err(guard_reply)?;

    let details = state
        .visitors
        .ban_details(ban_id)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(details))
}

#[tracing::instrument(name = "desk_visit_details", skip_all, fields(visit = visit_id))]
pub async fn visit_details(
    session: Session,
    State(state): State<AppState>,
    Path(visit_id): Path<i64>,
) -> Reply<Visit> {
    session.require_security().map_err(guard_reply)?;

    let visit = state
        .visits
        .visit_details(visit_id)
        .await
        .map_err(|err| error_reply(&err))?;
    Ok(Json(visit))
}

// --- Mutations ---
// Every mutation replies with the uniform `{success, message}` shape;
// backend rejections are carried in the envelope, not the HTTP status.

async fn form_text(field: axum::extract::multipart::Field<'_>) -> Result<String, String> {
    field.text().await.map_err(|err| err.to_string())
}

struct RegistrationForm {
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    national_id: Option<String>,
    secret_code: Option<String>,
    image_data: Option<String>,
}

// Walk the browser's multipart payload, converting a captured image
// into the data-URL form the backend stores.
async fn read_form(mut multipart: Multipart) -> Result<RegistrationForm, String> {
    let mut form = RegistrationForm {
        first_name: None,
        last_name: None,
        phone_number: None,
        national_id: None,
        secret_code: None,
        image_data: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.to_string())?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "first_name" => form.first_name = Some(form_text(field).await?),
            "last_name" => form.last_name = Some(form_text(field).await?),
            "phone_number" => form.phone_number = Some(form_text(field).await?),
            "national_id" => form.national_id = Some(form_text(field).await?),
            "secret_code" => form.secret_code = Some(form_text(field).await?),
            "image" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(|err| err.to_string())?;
                if !bytes.is_empty() {
                    form.image_data =
                        Some(format!("data:{content_type};base64,{}", STANDARD.encode(&bytes)));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn require(value: Option<String>, label: &str) -> Result<String, String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| format!("{label} is required"))
}

fn build_registration(form: RegistrationForm) -> Result<NewVisitor, String> {
    Ok(NewVisitor {
        first_name: require(form.first_name, "first_name")?,
        last_name: require(form.last_name, "last_name")?,
        phone_number: require(form.phone_number, "phone_number")?,
        national_id: require(form.national_id, "national_id")?,
        image_data: form.image_data,
        secret_code: require(form.secret_code, "secret_code")?,
    })
}

#[tracing::instrument(name = "register_visitor", skip_all)]
pub async fn register_visitor(
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Reply<RegisterOutcome> {
    session.require_security().map_err(guard_reply)?;

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            return Ok(Json(RegisterOutcome {
                success: false,
                message,
                visitor_id: None,
            }));
        }
    };

    let request = match build_registration(form) {
        Ok(request) => request,
        Err(message) => {
            return Ok(Json(RegisterOutcome {
                success: false,
                message,
                visitor_id: None,
            }));
        }
    };

    match state.visitors.register(&request).await {
        Ok(done) => Ok(Json(RegisterOutcome {
            success: true,
            message: done.message,
            visitor_id: Some(done.visitor_id),
        })),
        Err(err) => {
            tracing::error!(error = %err, "failed to register visitor.");
            Ok(Json(RegisterOutcome {
                success: false,
                message: err.to_string(),
                visitor_id: None,
            }))
        }
    }
}

#[tracing::instrument(name = "identify_visitor", skip_all)]
pub async fn identify_visitor(
    session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Reply<IdentifyOutcome> {
    session.require_security().map_err(guard_reply)?;

    let failed = |message: String| IdentifyOutcome {
        success: false,
        message: Some(message),
        visitor: None,
        last_visit: None,
        incident_history: None,
    };

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return Ok(Json(failed(message))),
    };

    let request = IdentifyRequest {
        national_id: form.national_id.filter(|value| !value.trim().is_empty()),
        image_data: form.image_data,
    };
    if request.national_id.is_none() && request.image_data.is_none() {
        return Ok(Json(failed(
            "Please provide either a national ID or a face image for identification".to_string(),
        )));
    }

    let identified = match state.visitors.identify(&request).await {
        Ok(identified) => identified,
        Err(err) => return Ok(Json(failed(err.to_string()))),
    };

    // Enrich the match with the visit and incident trail. Both lookups
    // are best-effort; a failure just leaves the section out.
    let national_id = identified
        .visitor
        .national_id
        .clone()
        .or(request.national_id);
    let (last_visit, incident_history) = match national_id {
        Some(national_id) => {
            let (last_visit, incidents) = tokio::join!(
                state.visitors.last_visit(&national_id),
                state.visitors.incident_history(&national_id),
            );
            (last_visit.ok().flatten(), incidents.ok())
        }
        None => (None, None),
    };

    Ok(Json(IdentifyOutcome {
        success: true,
        message: None,
        visitor: Some(identified),
        last_visit,
        incident_history,
    }))
}

#[tracing::instrument(name = "ban_visitor", skip_all, fields(visitor = %payload.visitor_id))]
pub async fn ban_visitor(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<BanRequest>,
) -> Reply<Outcome> {
    session.require_security().map_err(guard_reply)?;

    match state.visitors.ban(&payload).await {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => {
            tracing::warn!(error = %err, "ban rejected.");
            Ok(Json(Outcome::from(&err)))
        }
    }
}

#[tracing::instrument(name = "unban_visitor", skip_all, fields(visitor = %payload.visitor_id))]
pub async fn unban_visitor(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<UnbanRequest>,
) -> Reply<Outcome> {
    session.require_security().map_err(guard_reply)?;

    match state.visitors.unban(&payload).await {
        Ok(ack) => Ok(Json(Outcome::ok(ack.message))),
        Err(err) => {
            tracing::warn!(error = %err, "unban rejected.");
            Ok(Json(Outcome::from(&err)))
        }
    }
}

#[tracing::instrument(name = "report_incident", skip_all, fields(visitor = %payload.visitor_id))]
pub async fn report_incident(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<IncidentReport>,
) -> Reply<IncidentOutcome> {
    session.require_security().map_err(guard_reply)?;

    match state.visitors.report_incident(&payload).await {
        Ok(ack) => Ok(Json(IncidentOutcome {
            success: true,
            message: ack
                .message
                .unwrap_or_else(|| "Incident reported successfully".to_string()),
            incident_id: ack.incident_id,
        })),
        Err(err) => {
            tracing::warn!(error = %err, "incident report rejected.");
            Ok(Json(IncidentOutcome {
                success: false,
                message: err.to_string(),
                incident_id: None,
            }))
        }
    }
}

#[tracing::instrument(name = "record_visit", skip_all, fields(visitor = %payload.visitor_id))]
pub async fn record_visit(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<VisitRequest>,
) -> Reply<VisitOutcome> {
    session.require_security().map_err(guard_reply)?;

    match state.visits.record_visit(&payload).await {
        Ok(grant) => Ok(Json(VisitOutcome {
            success: true,
            message: grant.message,
            visit: Some(grant.visit),
        })),
        Err(err) => {
            tracing::warn!(error = %err, "visit rejected.");
            Ok(Json(VisitOutcome {
                success: false,
                message: err.to_string(),
                visit: None,
            }))
        }
    }
}

#[tracing::instrument(name = "record_leave", skip_all, fields(visit = payload.visit_id))]
pub async fn record_leave(
    session: Session,
    State(state): State<AppState>,
    Json(payload): Json<LeaveRequest>,
) -> Reply<VisitOutcome> {
    session.require_security().map_err(guard_reply)?;

    match state.visits.record_leave(&payload).await {
        Ok(grant) => Ok(Json(VisitOutcome {
            success: true,
            message: grant.message,
            visit: Some(grant.visit),
        })),
        Err(err) => {
            tracing::warn!(error = %err, "leave rejected.");
            Ok(Json(VisitOutcome {
                success: false,
                message: err.to_string(),
                visit: None,
            }))
        }
    }
}
