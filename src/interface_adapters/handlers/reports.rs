use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::domain::entities::PageQuery;
use crate::interface_adapters::protocol::{ErrorBody, ReportParams, error_reply, guard_reply};
use crate::interface_adapters::state::AppState;
use crate::use_cases::report::{
    FETCH_LIMIT, ReportKind, ReportQuery, SortOrder, StatusFilter, assemble_bans,
    assemble_incidents, assemble_visits, render_html,
};
use crate::use_cases::session::Session;

fn parse_query(params: &ReportParams) -> ReportQuery {
    ReportQuery {
        status: params.status.as_deref().and_then(StatusFilter::parse),
        from: params.from.as_deref().and_then(|value| value.parse().ok()),
        to: params.to.as_deref().and_then(|value| value.parse().ok()),
        sort: params
            .sort
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default(),
    }
}

// Fetch one oversized page of the requested record kind, run the
// filter-sort-aggregate pass, and hand back the printable document.
#[tracing::instrument(name = "download_report", skip_all, fields(kind = %raw_kind))]
pub async fn download(
    session: Session,
    State(state): State<AppState>,
    Path(raw_kind): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Response, (StatusCode, Json<ErrorBody>)> {
    session.require_admin().map_err(guard_reply)?;

    let Some(kind) = ReportKind::parse(&raw_kind) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: format!("unknown report kind `{raw_kind}`"),
            }),
        ));
    };

    let query = parse_query(&params);
    let fetch = PageQuery {
        page: Some(1),
        per_page: Some(FETCH_LIMIT),
    };
    let bearer = &session.bearer;

    let document = match kind {
        ReportKind::Visits => {
            let page = state
                .admin
                .visits(bearer, &fetch)
                .await
                .map_err(|err| error_reply(&err))?;
            assemble_visits(page.items, &query)
        }
        ReportKind::Bans => {
            let page = state
                .admin
                .bans(bearer, &fetch, false)
                .await
                .map_err(|err| error_reply(&err))?;
            assemble_bans(page.items, &query)
        }
        ReportKind::Incidents => {
            let page = state
                .admin
                .incidents(bearer, &fetch)
                .await
                .map_err(|err| error_reply(&err))?;
            assemble_incidents(page.items, &query)
        }
    };

    let html = render_html(&document, Utc::now().naive_utc());
    let headers = [
        (
            header::CONTENT_TYPE,
            "text/html; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-report.html\"", kind.slug()),
        ),
    ];
    Ok((headers, html).into_response())
}
