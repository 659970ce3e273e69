use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::entities::{
    Ack, ActivityKind, ActivityRecord, ActivitySummary, Ban, BanDetails, BanRequest, BanStatus,
    Bearer, CodeUpdate, DashboardSummary, IdentifiedVisitor, IdentifyRequest, Incident,
    IncidentAck, IncidentReport, LastVisit, LeaveRequest, LoginGrant, LoginRequest, NewAdmin,
    NewSecurity, NewVisitor, Page, PageQuery, RegisteredVisitor, SecurityPersonnel, UnbanRequest,
    Visit, VisitGrant, VisitRequest, Visitor, VisitorProfile,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{
    AdminProvider, AuthProvider, DeskProvider, VisitProvider, VisitorProvider,
};

// Thin wrapper around reqwest for the visitor-management backend. One
// shared client, single-attempt calls, no retry and no client-side
// timeout beyond the transport defaults.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    pub base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Issue a request and resolve the response into a JSON value,
    // applying the shared error-envelope rules on non-2xx replies.
    async fn request_value<B>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&Bearer>,
        body: Option<&B>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.http.request(method, self.endpoint(path));
        if let Some(bearer) = bearer {
            request = request.bearer_auth(&bearer.0);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ApiError::Upstream {
                status,
                message: upstream_message(status, &text),
            });
        }

        if text.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get_value(&self, path: &str, bearer: Option<&Bearer>) -> Result<Value, ApiError> {
        self.request_value::<Value>(Method::GET, path, bearer, None)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&Bearer>,
    ) -> Result<T, ApiError> {
        decode(self.get_value(path, bearer).await?)
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&Bearer>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        decode(self.request_value(method, path, bearer, Some(body)).await?)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&Bearer>,
        key: &str,
    ) -> Result<Page<T>, ApiError> {
        page_from(self.get_value(path, bearer).await?, key)
    }
}

// Resolve the display message for a non-2xx reply: JSON `{error}` or
// `{message}` first, then the raw body text, then a generic string.
pub(crate) fn upstream_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    if !body.trim().is_empty() {
        return body.to_string();
    }
    format!("API error: {status}")
}

// Append only the parameters that were actually supplied.
pub(crate) fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (name, value) in params {
        if let Some(value) = value {
            serializer.append_pair(name, value);
            any = true;
        }
    }
    if any {
        format!("{path}?{}", serializer.finish())
    } else {
        path.to_string()
    }
}

fn paged(path: &str, page: &PageQuery) -> String {
    with_query(path, &page.params())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

// Pull one named key out of a `{success, <key>: ...}` envelope.
fn unwrap_key(mut value: Value, key: &str) -> Result<Value, ApiError> {
    value
        .as_object_mut()
        .and_then(|obj| obj.remove(key))
        .ok_or_else(|| ApiError::Decode(format!("response is missing `{key}`")))
}

// Normalize a resource-keyed list envelope into the uniform page shape.
pub(crate) fn page_from<T: DeserializeOwned>(value: Value, key: &str) -> Result<Page<T>, ApiError> {
    let Value::Object(mut envelope) = value else {
        return Err(ApiError::Decode(format!(
            "expected an object envelope carrying `{key}`"
        )));
    };

    let items = envelope
        .remove(key)
        .ok_or_else(|| ApiError::Decode(format!("envelope is missing the `{key}` list")))?;
    let items = serde_json::from_value(items).map_err(|err| ApiError::Decode(err.to_string()))?;

    let meta = |name: &str| {
        envelope
            .get(name)
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::Decode(format!("envelope is missing `{name}`")))
    };

    Ok(Page {
        items,
        total: meta("total")?,
        pages: meta("pages")?,
        current_page: meta("current_page")?,
    })
}

#[async_trait]
impl AuthProvider for BackendClient {
    async fn login(&self, req: &LoginRequest) -> Result<LoginGrant, ApiError> {
        self.send_json(Method::POST, "/auth/login", None, req).await
    }

    async fn register_admin(&self, bearer: &Bearer, req: &NewAdmin) -> Result<Ack, ApiError> {
        self.send_json(Method::POST, "/auth/register/admin", Some(bearer), req)
            .await
    }

    async fn register_security(&self, bearer: &Bearer, req: &NewSecurity) -> Result<Ack, ApiError> {
        self.send_json(Method::POST, "/auth/register/security", Some(bearer), req)
            .await
    }

    async fn activate_security(&self, bearer: &Bearer, email: &str) -> Result<Ack, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.send_json(Method::PUT, "/auth/security/activate", Some(bearer), &body)
            .await
    }

    async fn deactivate_security(&self, bearer: &Bearer, email: &str) -> Result<Ack, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.send_json(Method::PUT, "/auth/security/deactivate", Some(bearer), &body)
            .await
    }

    async fn update_secret_code(&self, bearer: &Bearer, req: &CodeUpdate) -> Result<Ack, ApiError> {
        self.send_json(Method::PUT, "/auth/security/update-code", Some(bearer), req)
            .await
    }
}

#[async_trait]
impl DeskProvider for BackendClient {
    async fn profile(&self, bearer: &Bearer) -> Result<SecurityPersonnel, ApiError> {
        self.get_json("/security/profile", Some(bearer)).await
    }

    async fn activity_summary(&self, bearer: &Bearer) -> Result<ActivitySummary, ApiError> {
        self.get_json("/security/activities", Some(bearer)).await
    }

    async fn visitors(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visitor>, ApiError> {
        self.get_page(&paged("/security/visitors", page), Some(bearer), "visitors")
            .await
    }

    async fn visitor_profile(
        &self,
        bearer: &Bearer,
        visitor: &str,
    ) -> Result<VisitorProfile, ApiError> {
        self.get_json(&format!("/security/visitors/{visitor}/profile"), Some(bearer))
            .await
    }

    async fn visitor_visits(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Visit>, ApiError> {
        let path = paged(&format!("/security/visitors/{visitor}/visits"), page);
        self.get_page(&path, Some(bearer), "visits").await
    }

    async fn visitor_bans(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Ban>, ApiError> {
        let path = paged(&format!("/security/visitors/{visitor}/bans"), page);
        self.get_page(&path, Some(bearer), "bans").await
    }

    async fn visitor_incidents(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Incident>, ApiError> {
        let path = paged(&format!("/security/visitors/{visitor}/incidents"), page);
        self.get_page(&path, Some(bearer), "incidents").await
    }

    async fn ban_status(&self, bearer: &Bearer, visitor: &str) -> Result<BanStatus, ApiError> {
        self.get_json(&format!("/security/visitors/{visitor}/ban-status"), Some(bearer))
            .await
    }
}

#[async_trait]
impl VisitorProvider for BackendClient {
    async fn register(&self, req: &NewVisitor) -> Result<RegisteredVisitor, ApiError> {
        self.send_json(Method::POST, "/visitors/register", None, req)
            .await
    }

    async fn identify(&self, req: &IdentifyRequest) -> Result<IdentifiedVisitor, ApiError> {
        let value = self
            .request_value(Method::POST, "/visitors/identify", None, Some(req))
            .await?;
        decode(unwrap_key(value, "visitor")?)
    }

    async fn ban(&self, req: &BanRequest) -> Result<Ack, ApiError> {
        self.send_json(Method::POST, "/visitors/ban", None, req).await
    }

    async fn unban(&self, req: &UnbanRequest) -> Result<Ack, ApiError> {
        self.send_json(Method::PUT, "/visitors/unban", None, req).await
    }

    async fn report_incident(&self, req: &IncidentReport) -> Result<IncidentAck, ApiError> {
        self.send_json(Method::POST, "/visitors/report-incident", None, req)
            .await
    }

    async fn current_ban(&self, visitor: &str) -> Result<Option<BanDetails>, ApiError> {
        let path = format!("/visitors/bans/current/{visitor}");
        match self.get_value(&path, None).await {
            Ok(value) => decode(unwrap_key(value, "current_ban")?).map(Some),
            // The backend answers 404 when no standing ban exists.
            Err(ApiError::Upstream { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn ban_history(&self, visitor: &str) -> Result<Vec<BanDetails>, ApiError> {
        let value = self
            .get_value(&format!("/visitors/bans/history/{visitor}"), None)
            .await?;
        decode(unwrap_key(value, "ban_history")?)
    }

    async fn ban_details(&self, ban_id: i64) -> Result<BanDetails, ApiError> {
        let value = self
            .get_value(&format!("/visitors/bans/{ban_id}"), None)
            .await?;
        decode(unwrap_key(value, "ban_details")?)
    }

    async fn last_visit(&self, national_id: &str) -> Result<Option<LastVisit>, ApiError> {
        let path = format!("/visitors/last-visit/{national_id}");
        match self.get_value(&path, None).await {
            Ok(value) => decode(unwrap_key(value, "visit")?).map(Some),
            // First-time visitors have no visit trail yet.
            Err(ApiError::Upstream { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn incident_history(&self, national_id: &str) -> Result<Vec<Incident>, ApiError> {
        let value = self
            .get_value(&format!("/visitors/incidents/{national_id}"), None)
            .await?;
        decode(unwrap_key(value, "incidents")?)
    }
}

#[async_trait]
impl VisitProvider for BackendClient {
    async fn record_visit(&self, req: &VisitRequest) -> Result<VisitGrant, ApiError> {
        self.send_json(Method::POST, "/visits/visit", None, req).await
    }

    async fn record_leave(&self, req: &LeaveRequest) -> Result<VisitGrant, ApiError> {
        self.send_json(Method::PUT, "/visits/leave", None, req).await
    }

    async fn visit_details(&self, visit_id: i64) -> Result<Visit, ApiError> {
        let value = self
            .get_value(&format!("/visits/visit/{visit_id}"), None)
            .await?;
        decode(unwrap_key(value, "visit")?)
    }
}

#[async_trait]
impl AdminProvider for BackendClient {
    async fn dashboard(&self, bearer: &Bearer) -> Result<DashboardSummary, ApiError> {
        self.get_json("/admin/dashboard/summary", Some(bearer)).await
    }

    async fn visitors(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visitor>, ApiError> {
        self.get_page(&paged("/admin/visitors", page), Some(bearer), "visitors")
            .await
    }

    async fn search_visitors(
        &self,
        bearer: &Bearer,
        query: &str,
        page: &PageQuery,
    ) -> Result<Page<Visitor>, ApiError> {
        let mut params = page.params();
        params.push(("query", Some(query.to_string())));
        self.get_page(
            &with_query("/admin/visitors/search", &params),
            Some(bearer),
            "visitors",
        )
        .await
    }

    async fn visitor(&self, bearer: &Bearer, visitor: &str) -> Result<Visitor, ApiError> {
        self.get_json(&format!("/admin/visitors/{visitor}"), Some(bearer))
            .await
    }

    async fn visitor_visits(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Visit>, ApiError> {
        let path = paged(&format!("/admin/visitors/{visitor}/visits"), page);
        self.get_page(&path, Some(bearer), "visits").await
    }

    async fn visitor_bans(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Ban>, ApiError> {
        let path = paged(&format!("/admin/visitors/{visitor}/bans"), page);
        self.get_page(&path, Some(bearer), "bans").await
    }

    async fn visitor_incidents(
        &self,
        bearer: &Bearer,
        visitor: &str,
        page: &PageQuery,
    ) -> Result<Page<Incident>, ApiError> {
        let path = paged(&format!("/admin/visitors/{visitor}/incidents"), page);
        self.get_page(&path, Some(bearer), "incidents").await
    }

    async fn visits(&self, bearer: &Bearer, page: &PageQuery) -> Result<Page<Visit>, ApiError> {
        self.get_page(&paged("/admin/visits", page), Some(bearer), "visits")
            .await
    }

    async fn bans(
        &self,
        bearer: &Bearer,
        page: &PageQuery,
        active_only: bool,
    ) -> Result<Page<Ban>, ApiError> {
        let mut params = page.params();
        if active_only {
            params.push(("active_only", Some("true".to_string())));
        }
        self.get_page(&with_query("/admin/bans", &params), Some(bearer), "bans")
            .await
    }

    async fn incidents(
        &self,
        bearer: &Bearer,
        page: &PageQuery,
    ) -> Result<Page<Incident>, ApiError> {
        self.get_page(&paged("/admin/incidents", page), Some(bearer), "incidents")
            .await
    }

    async fn personnel(
        &self,
        bearer: &Bearer,
        page: &PageQuery,
    ) -> Result<Page<SecurityPersonnel>, ApiError> {
        self.get_page(
            &paged("/admin/security-personnel", page),
            Some(bearer),
            "security_personnel",
        )
        .await
    }

    async fn search_personnel(
        &self,
        bearer: &Bearer,
        query: &str,
        page: &PageQuery,
    ) -> Result<Page<SecurityPersonnel>, ApiError> {
        let mut params = page.params();
        params.push(("query", Some(query.to_string())));
        self.get_page(
            &with_query("/admin/security-personnel/search", &params),
            Some(bearer),
            "security_personnel",
        )
        .await
    }

    async fn personnel_detail(
        &self,
        bearer: &Bearer,
        personnel: &str,
    ) -> Result<SecurityPersonnel, ApiError> {
        self.get_json(&format!("/admin/security-personnel/{personnel}"), Some(bearer))
            .await
    }

    async fn personnel_activities(
        &self,
        bearer: &Bearer,
        personnel: &str,
        kind: ActivityKind,
        page: &PageQuery,
    ) -> Result<Page<ActivityRecord>, ApiError> {
        let path = paged(
            &format!(
                "/admin/security-personnel/{personnel}/activities/{}",
                kind.as_segment()
            ),
            page,
        );
        self.get_page(&path, Some(bearer), "activities").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_page_and_per_page_are_supplied_then_the_query_string_is_exact() {
        let query = PageQuery {
            page: Some(2),
            per_page: Some(5),
        };

        assert_eq!(paged("/admin/visitors", &query), "/admin/visitors?page=2&per_page=5");
    }

    #[test]
    fn when_no_pagination_is_supplied_then_the_path_carries_no_query_string() {
        assert_eq!(paged("/admin/visitors", &PageQuery::default()), "/admin/visitors");
    }

    #[test]
    fn when_only_per_page_is_supplied_then_page_is_omitted() {
        let query = PageQuery {
            page: None,
            per_page: Some(50),
        };

        assert_eq!(paged("/admin/visits", &query), "/admin/visits?per_page=50");
    }

    #[test]
    fn when_a_search_term_needs_encoding_then_the_query_string_is_escaped() {
        let path = with_query(
            "/admin/visitors/search",
            &[("query", Some("Jane Doe&co".to_string()))],
        );

        assert_eq!(path, "/admin/visitors/search?query=Jane+Doe%26co");
    }

    #[test]
    fn when_the_envelope_uses_a_resource_key_then_it_is_renamed_to_items_exactly() {
        let value = json!({
            "visitors": [
                {"id": "v-1", "first_name": "Jane", "last_name": "Doe", "is_banned": false}
            ],
            "total": 42,
            "pages": 5,
            "current_page": 2
        });

        let page: Page<Visitor> = page_from(value, "visitors").expect("expected page to decode");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 42);
        assert_eq!(page.pages, 5);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn when_the_envelope_is_missing_the_resource_key_then_decode_fails() {
        let value = json!({"bans": [], "total": 0, "pages": 0, "current_page": 1});

        let result: Result<Page<Visitor>, ApiError> = page_from(value, "visitors");

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn when_the_body_carries_a_json_error_key_then_that_message_wins() {
        assert_eq!(
            upstream_message(403, r#"{"error":"Invalid secret code"}"#),
            "Invalid secret code"
        );
    }

    #[test]
    fn when_the_body_carries_a_json_message_key_then_it_is_used_as_fallback() {
        assert_eq!(
            upstream_message(400, r#"{"success":false,"message":"Visitor not found"}"#),
            "Visitor not found"
        );
    }

    #[test]
    fn when_the_body_is_unparseable_text_then_the_raw_body_is_surfaced() {
        assert_eq!(upstream_message(500, "gateway exploded"), "gateway exploded");
    }

    #[test]
    fn when_the_body_is_empty_then_a_generic_status_message_is_produced() {
        assert_eq!(upstream_message(503, ""), "API error: 503");
    }
}
