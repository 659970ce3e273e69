use axum::{
    Router,
    routing::{get, post, put},
};

use crate::interface_adapters::handlers::{admin, desk, reports, session};
use crate::interface_adapters::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .route("/desk/profile", get(desk::home))
        .route(
            "/desk/visitors",
            get(desk::list_visitors).post(desk::register_visitor),
        )
        .route("/desk/visitors/{visitor_id}", get(desk::visitor_detail))
        .route("/desk/visitors/{visitor_id}/ban-status", get(desk::ban_status))
        .route("/desk/visitors/{visitor_id}/bans/current", get(desk::current_ban))
        .route("/desk/visitors/{visitor_id}/bans/history", get(desk::ban_history))
        .route("/desk/identify", post(desk::identify_visitor))
        .route("/desk/bans", post(desk::ban_visitor))
        .route("/desk/bans/lift", put(desk::unban_visitor))
        .route("/desk/bans/{ban_id}", get(desk::ban_details))
        .route("/desk/incidents", post(desk::report_incident))
        .route("/desk/visits", post(desk::record_visit))
        .route("/desk/visits/leave", put(desk::record_leave))
        .route("/desk/visits/{visit_id}", get(desk::visit_details))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/visitors", get(admin::list_visitors))
        .route("/admin/visitors/{visitor_id}", get(admin::visitor_detail))
        .route("/admin/visits", get(admin::list_visits))
        .route("/admin/bans", get(admin::list_bans))
        .route("/admin/incidents", get(admin::list_incidents))
        .route(
            "/admin/personnel",
            get(admin::list_personnel).post(admin::register_security),
        )
        .route("/admin/personnel/activate", put(admin::activate_security))
        .route("/admin/personnel/deactivate", put(admin::deactivate_security))
        .route("/admin/personnel/secret-code", put(admin::update_secret_code))
        .route("/admin/personnel/{personnel_id}", get(admin::personnel_overview))
        .route(
            "/admin/personnel/{personnel_id}/activities/{kind}",
            get(admin::personnel_activities),
        )
        .route("/admin/admins", post(admin::register_admin))
        .route("/admin/reports/{kind}", get(reports::download))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Ack, ActivityKind, ActivityRecord, ActivitySummary, ActivityCounts, Ban, BanDetails,
        BanRequest, BanStatus, Bearer, CodeUpdate, DashboardSummary, IdentifiedVisitor,
        IdentifyRequest, Incident, IncidentAck, IncidentReport, LastVisit, LeaveRequest,
        LoginGrant, LoginRequest, NewAdmin, NewSecurity, NewVisitor, Page, PageQuery,
        RecentActivities, RegisteredVisitor, Role, SecurityPersonnel, UnbanRequest, Visit,
        VisitGrant, VisitRequest, VisitStatus, Visitor, VisitorProfile,
    };
    use crate::domain::errors::ApiError;
    use crate::domain::ports::{
        AdminProvider, AuthProvider, DeskProvider, VisitProvider, VisitorProvider,
    };
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::NaiveDate;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn when(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn sample_visitor() -> Visitor {
        Visitor {
            id: "visitor-uuid-1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            other_names: None,
            phone_number: Some("0700000001".to_string()),
            national_id: Some("ID001".to_string()),
            role: Some(Role::Visitor),
            created_at: Some(when(1, 8)),
            is_banned: false,
            image_path: None,
        }
    }

    fn sample_officer() -> SecurityPersonnel {
        SecurityPersonnel {
            id: "officer-uuid-1".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Guard".to_string(),
            other_names: None,
            phone_number: None,
            email: Some("guard@example.com".to_string()),
            role: Some(Role::Security),
            is_active: Some(true),
            created_at: Some(when(1, 7)),
        }
    }

    fn sample_visit(status: VisitStatus) -> Visit {
        Visit {
            id: 11,
            visitor_id: Some(1),
            reason: "Delivery".to_string(),
            visit_time: when(2, 9),
            leave_time: match status {
                VisitStatus::Leave => Some(when(2, 10)),
                VisitStatus::Visit => None,
            },
            approved_by_id: Some(1),
            left_approved_by_id: None,
            status,
            duration: None,
            visitor: None,
            approved_by: None,
            left_approved_by: None,
            incidents: None,
        }
    }

    fn sample_ban(active: bool) -> Ban {
        Ban {
            id: 21,
            visitor_id: Some(1),
            reason: "Trespassing".to_string(),
            issued_at: when(2, 11),
            lifted_at: if active { None } else { Some(when(3, 9)) },
            issued_by_id: Some(1),
            lifted_by_id: None,
            is_active: active,
            visitor: None,
            visit: None,
            issued_by: None,
            lifted_by: None,
        }
    }

    fn sample_incident() -> Incident {
        Incident {
            id: 31,
            visitor_id: Some(1),
            visit_id: Some(11),
            description: "Broken gate".to_string(),
            recorded_by_id: Some(1),
            recorded_at: when(2, 12),
            recorded_by: None,
            visitor: None,
            visit: None,
        }
    }

    fn canned_page<T>(items: Vec<T>) -> Page<T> {
        Page {
            items,
            total: 42,
            pages: 5,
            current_page: 2,
        }
    }

    // One fake behind all five ports, with just enough failure toggles
    // for the route contract tests.
    struct FakeBackend {
        grant_role: Role,
        reject_login: bool,
        reject_mutations: bool,
        fail_issued_bans_feed: bool,
    }

    impl FakeBackend {
        fn new(grant_role: Role) -> Self {
            Self {
                grant_role,
                reject_login: false,
                reject_mutations: false,
                fail_issued_bans_feed: false,
            }
        }

        fn rejection(&self) -> Result<(), ApiError> {
            if self.reject_mutations {
                Err(ApiError::Upstream {
                    status: 403,
                    message: "Invalid secret code".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeBackend {
        async fn login(&self, _req: &LoginRequest) -> Result<LoginGrant, ApiError> {
            if self.reject_login {
                return Err(ApiError::Upstream {
                    status: 401,
                    message: "Invalid credentials".to_string(),
                });
            }
            Ok(LoginGrant {
                access_token: "token-1".to_string(),
                role: self.grant_role,
            })
        }

        async fn register_admin(&self, _: &Bearer, _: &NewAdmin) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: None,
                message: "Admin registered successfully".to_string(),
            })
        }

        async fn register_security(&self, _: &Bearer, _: &NewSecurity) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: None,
                message: "Security personnel registered successfully".to_string(),
            })
        }

        async fn activate_security(&self, _: &Bearer, _: &str) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: None,
                message: "Security personnel activated successfully".to_string(),
            })
        }

        async fn deactivate_security(&self, _: &Bearer, _: &str) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: None,
                message: "Security personnel deactivated successfully".to_string(),
            })
        }

        async fn update_secret_code(&self, _: &Bearer, _: &CodeUpdate) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: None,
                message: "Security code updated successfully".to_string(),
            })
        }
    }

    #[async_trait]
    impl DeskProvider for FakeBackend {
        async fn profile(&self, _: &Bearer) -> Result<SecurityPersonnel, ApiError> {
            Ok(sample_officer())
        }

        async fn activity_summary(&self, _: &Bearer) -> Result<ActivitySummary, ApiError> {
            Ok(ActivitySummary {
                activity_counts: ActivityCounts {
                    visits_approved: 4,
                    leaves_approved: 3,
                    incidents_recorded: 1,
                    bans_issued: 1,
                    bans_lifted: 0,
                },
                recent_activities: RecentActivities {
                    recent_visits: vec![sample_visit(VisitStatus::Visit)],
                    recent_incidents: vec![sample_incident()],
                },
            })
        }

        async fn visitors(&self, _: &Bearer, _: &PageQuery) -> Result<Page<Visitor>, ApiError> {
            Ok(canned_page(vec![sample_visitor()]))
        }

        async fn visitor_profile(&self, _: &Bearer, _: &str) -> Result<VisitorProfile, ApiError> {
            Ok(VisitorProfile {
                visitor: sample_visitor(),
                is_currently_banned: false,
                active_ban: None,
            })
        }

        async fn visitor_visits(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Visit>, ApiError> {
            Ok(canned_page(vec![sample_visit(VisitStatus::Visit)]))
        }

        async fn visitor_bans(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Ban>, ApiError> {
            Ok(canned_page(vec![sample_ban(true)]))
        }

        async fn visitor_incidents(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Incident>, ApiError> {
            Ok(canned_page(vec![sample_incident()]))
        }

        async fn ban_status(&self, _: &Bearer, _: &str) -> Result<BanStatus, ApiError> {
            Ok(BanStatus {
                is_banned: false,
                ban_details: None,
            })
        }
    }

    #[async_trait]
    impl VisitorProvider for FakeBackend {
        async fn register(&self, _: &NewVisitor) -> Result<RegisteredVisitor, ApiError> {
            self.rejection()?;
            Ok(RegisteredVisitor {
                message: "Visitor registered successfully".to_string(),
                visitor_id: 7,
            })
        }

        async fn identify(&self, req: &IdentifyRequest) -> Result<IdentifiedVisitor, ApiError> {
            assert!(req.national_id.is_some() || req.image_data.is_some());
            Ok(IdentifiedVisitor {
                visitor: sample_visitor(),
                ban_reason: None,
                banned_by: None,
            })
        }

        async fn ban(&self, _: &BanRequest) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: Some(true),
                message: "Visitor banned successfully".to_string(),
            })
        }

        async fn unban(&self, _: &UnbanRequest) -> Result<Ack, ApiError> {
            self.rejection()?;
            Ok(Ack {
                success: Some(true),
                message: "Visitor unbanned successfully".to_string(),
            })
        }

        async fn report_incident(&self, _: &IncidentReport) -> Result<IncidentAck, ApiError> {
            self.rejection()?;
            Ok(IncidentAck {
                message: None,
                incident_id: Some(31),
            })
        }

        async fn current_ban(&self, _: &str) -> Result<Option<BanDetails>, ApiError> {
            Ok(None)
        }

        async fn ban_history(&self, _: &str) -> Result<Vec<BanDetails>, ApiError> {
            Ok(Vec::new())
        }

        async fn ban_details(&self, ban_id: i64) -> Result<BanDetails, ApiError> {
            Ok(BanDetails {
                ban_id,
                reason: "Trespassing".to_string(),
                issued_at: "2026-08-02 11:00:00".to_string(),
                issued_by: None,
                lifted_at: None,
                lifted_by: None,
                is_active: Some(true),
                visitor: None,
                visit: None,
            })
        }

        async fn last_visit(&self, _: &str) -> Result<Option<LastVisit>, ApiError> {
            Ok(Some(LastVisit {
                id: 11,
                visitor_id: Some(1),
                reason: "Delivery".to_string(),
                visit_time: when(2, 9),
                leave_time: None,
                status: VisitStatus::Visit,
                duration: None,
                visitor: None,
                approved_by: None,
                left_approved_by: None,
                incidents: Vec::new(),
            }))
        }

        async fn incident_history(&self, _: &str) -> Result<Vec<Incident>, ApiError> {
            Ok(vec![sample_incident()])
        }
    }

    #[async_trait]
    impl VisitProvider for FakeBackend {
        async fn record_visit(&self, _: &VisitRequest) -> Result<VisitGrant, ApiError> {
            self.rejection()?;
            Ok(VisitGrant {
                message: "Visit recorded".to_string(),
                visit: sample_visit(VisitStatus::Visit),
            })
        }

        async fn record_leave(&self, _: &LeaveRequest) -> Result<VisitGrant, ApiError> {
            self.rejection()?;
            Ok(VisitGrant {
                message: "Visitor marked as left".to_string(),
                visit: sample_visit(VisitStatus::Leave),
            })
        }

        async fn visit_details(&self, _: i64) -> Result<Visit, ApiError> {
            Ok(sample_visit(VisitStatus::Leave))
        }
    }

    #[async_trait]
    impl AdminProvider for FakeBackend {
        async fn dashboard(&self, _: &Bearer) -> Result<DashboardSummary, ApiError> {
            Ok(DashboardSummary {
                total_visitors: 10,
                active_visits: 2,
                visits_today: 3,
                incidents_today: 0,
                active_bans: 1,
                security_personnel_count: 4,
                total_visits: 50,
                total_incidents: 5,
                total_bans: 6,
                recent_visits: Vec::new(),
                recent_incidents: Vec::new(),
                recent_bans: Vec::new(),
                frequent_visitors: Vec::new(),
            })
        }

        async fn visitors(&self, _: &Bearer, _: &PageQuery) -> Result<Page<Visitor>, ApiError> {
            Ok(canned_page(vec![sample_visitor()]))
        }

        async fn search_visitors(
            &self,
            _: &Bearer,
            query: &str,
            _: &PageQuery,
        ) -> Result<Page<Visitor>, ApiError> {
            assert!(!query.is_empty());
            Ok(canned_page(Vec::new()))
        }

        async fn visitor(&self, _: &Bearer, _: &str) -> Result<Visitor, ApiError> {
            Ok(sample_visitor())
        }

        async fn visitor_visits(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Visit>, ApiError> {
            Ok(canned_page(vec![sample_visit(VisitStatus::Leave)]))
        }

        async fn visitor_bans(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Ban>, ApiError> {
            Ok(canned_page(vec![sample_ban(false)]))
        }

        async fn visitor_incidents(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<Incident>, ApiError> {
            Ok(canned_page(vec![sample_incident()]))
        }

        async fn visits(&self, _: &Bearer, _: &PageQuery) -> Result<Page<Visit>, ApiError> {
            Ok(canned_page(vec![
                sample_visit(VisitStatus::Visit),
                sample_visit(VisitStatus::Leave),
            ]))
        }

        async fn bans(
            &self,
            _: &Bearer,
            _: &PageQuery,
            active_only: bool,
        ) -> Result<Page<Ban>, ApiError> {
            let items = if active_only {
                vec![sample_ban(true)]
            } else {
                vec![sample_ban(true), sample_ban(false)]
            };
            Ok(canned_page(items))
        }

        async fn incidents(&self, _: &Bearer, _: &PageQuery) -> Result<Page<Incident>, ApiError> {
            Ok(canned_page(vec![sample_incident()]))
        }

        async fn personnel(
            &self,
            _: &Bearer,
            _: &PageQuery,
        ) -> Result<Page<SecurityPersonnel>, ApiError> {
            Ok(canned_page(vec![sample_officer()]))
        }

        async fn search_personnel(
            &self,
            _: &Bearer,
            _: &str,
            _: &PageQuery,
        ) -> Result<Page<SecurityPersonnel>, ApiError> {
            Ok(canned_page(Vec::new()))
        }

        async fn personnel_detail(
            &self,
            _: &Bearer,
            _: &str,
        ) -> Result<SecurityPersonnel, ApiError> {
            Ok(sample_officer())
        }

        async fn personnel_activities(
            &self,
            _: &Bearer,
            _: &str,
            kind: ActivityKind,
            _: &PageQuery,
        ) -> Result<Page<ActivityRecord>, ApiError> {
            if self.fail_issued_bans_feed && kind == ActivityKind::IssuedBans {
                return Err(ApiError::Upstream {
                    status: 500,
                    message: "feed unavailable".to_string(),
                });
            }
            let record = match kind {
                ActivityKind::ApprovedVisits | ActivityKind::ApprovedLeaves => {
                    ActivityRecord::Visit(sample_visit(VisitStatus::Visit))
                }
                ActivityKind::Incidents => ActivityRecord::Incident(sample_incident()),
                ActivityKind::IssuedBans | ActivityKind::LiftedBans => {
                    ActivityRecord::Ban(sample_ban(true))
                }
            };
            Ok(canned_page(vec![record]))
        }
    }

    fn build_app(fake: FakeBackend) -> Router {
        let backend = Arc::new(fake);
        app(AppState {
            auth: backend.clone(),
            desk: backend.clone(),
            visitors: backend.clone(),
            visits: backend.clone(),
            admin: backend,
        })
    }

    fn desk_app() -> Router {
        build_app(FakeBackend::new(Role::Security))
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).expect("expected request to build")
    }

    fn send_json(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("expected request to build")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        serde_json::from_slice(&bytes).expect("expected json body")
    }

    const SECURITY_COOKIE: &str = "auth_token=token-1; user_role=security";
    const ADMIN_COOKIE: &str = "auth_token=token-1; user_role=admin";

    #[tokio::test]
    async fn when_no_session_cookie_is_present_then_desk_routes_reply_401() {
        let response = desk_app()
            .oneshot(get_request("/desk/visitors", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let payload = json_body(response).await;
        assert_eq!(payload["message"], "Authentication required");
    }

    #[tokio::test]
    async fn when_the_role_cookie_is_security_then_admin_routes_reply_403() {
        let response = desk_app()
            .oneshot(get_request("/admin/dashboard", Some(SECURITY_COOKIE)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let payload = json_body(response).await;
        assert_eq!(payload["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn when_login_succeeds_then_three_session_cookies_are_set() {
        let request = send_json(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({"email": "guard@example.com", "password": "hunter2"}),
        );

        let response = desk_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().expect("ascii cookie").to_string())
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies[0].starts_with("auth_token=token-1;"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[1].starts_with("user_role=security;"));
        assert!(!cookies[1].contains("HttpOnly"));

        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["role"], "security");
    }

    #[tokio::test]
    async fn when_login_is_rejected_then_the_envelope_reports_the_upstream_message() {
        let mut fake = FakeBackend::new(Role::Security);
        fake.reject_login = true;

        let request = send_json(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({"email": "guard@example.com", "password": "wrong"}),
        );
        let response = build_app(fake).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let payload = json_body(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn when_logout_is_called_then_cookies_expire_and_the_browser_is_redirected() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .expect("expected request to build");

        let response = desk_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        for value in response.headers().get_all(header::SET_COOKIE).iter() {
            assert!(value.to_str().expect("ascii cookie").contains("Max-Age=0"));
        }
    }

    #[tokio::test]
    async fn when_the_visitor_list_is_fetched_then_the_uniform_page_shape_is_returned() {
        let response = desk_app()
            .oneshot(get_request(
                "/desk/visitors?page=2&per_page=5",
                Some(SECURITY_COOKIE),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["total"], 42);
        assert_eq!(payload["pages"], 5);
        assert_eq!(payload["current_page"], 2);
        assert_eq!(payload["items"][0]["first_name"], "Jane");
    }

    #[tokio::test]
    async fn when_a_mutation_is_rejected_upstream_then_the_envelope_carries_the_message() {
        let mut fake = FakeBackend::new(Role::Security);
        fake.reject_mutations = true;

        let request = send_json(
            "POST",
            "/desk/bans",
            Some(SECURITY_COOKIE),
            serde_json::json!({
                "visitor_id": "visitor-uuid-1",
                "reason": "Trespassing",
                "secret_code": "0000"
            }),
        );
        let response = build_app(fake).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["message"], "Invalid secret code");
    }

    #[tokio::test]
    async fn when_a_visit_is_recorded_then_the_fresh_record_rides_along() {
        let request = send_json(
            "POST",
            "/desk/visits",
            Some(SECURITY_COOKIE),
            serde_json::json!({
                "visitor_id": "visitor-uuid-1",
                "reason": "Delivery",
                "secret_code": "1234"
            }),
        );
        let response = desk_app().oneshot(request).await.unwrap();

        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["visit"]["status"], "visit");
        assert_eq!(payload["visit"]["leave_time"], Value::Null);
    }

    #[tokio::test]
    async fn when_identification_has_no_inputs_then_the_envelope_explains_what_is_needed() {
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"national_id\"\r\n\r\n\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/desk/identify")
            .header(header::COOKIE, SECURITY_COOKIE)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("expected request to build");

        let response = desk_app().oneshot(request).await.unwrap();

        let payload = json_body(response).await;
        assert_eq!(payload["success"], false);
        assert_eq!(
            payload["message"],
            "Please provide either a national ID or a face image for identification"
        );
    }

    #[tokio::test]
    async fn when_identification_matches_then_the_visit_trail_rides_along() {
        let boundary = "test-boundary";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"national_id\"\r\n\r\nID001\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/desk/identify")
            .header(header::COOKIE, SECURITY_COOKIE)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("expected request to build");

        let response = desk_app().oneshot(request).await.unwrap();

        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["visitor"]["national_id"], "ID001");
        assert_eq!(payload["last_visit"]["status"], "visit");
        assert_eq!(payload["incident_history"][0]["description"], "Broken gate");
    }

    #[tokio::test]
    async fn when_one_activity_feed_fails_then_the_other_sections_still_render() {
        let mut fake = FakeBackend::new(Role::Admin);
        fake.fail_issued_bans_feed = true;

        let response = build_app(fake)
            .oneshot(get_request(
                "/admin/personnel/officer-uuid-1",
                Some(ADMIN_COOKIE),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["personnel"]["first_name"], "Sam");
        assert_eq!(payload["issued_bans"]["error"], "feed unavailable");
        assert_eq!(payload["approved_visits"]["total"], 42);
        assert_eq!(payload["lifted_bans"]["total"], 42);
    }

    #[tokio::test]
    async fn when_the_activity_kind_is_unknown_then_the_route_replies_400() {
        let response = build_app(FakeBackend::new(Role::Admin))
            .oneshot(get_request(
                "/admin/personnel/officer-uuid-1/activities/naps",
                Some(ADMIN_COOKIE),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn when_a_visits_report_is_requested_then_a_printable_attachment_is_returned() {
        let response = build_app(FakeBackend::new(Role::Admin))
            .oneshot(get_request(
                "/admin/reports/visits?status=open&sort=date_desc",
                Some(ADMIN_COOKIE),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"visits-report.html\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        let html = String::from_utf8(bytes.to_vec()).expect("expected utf-8 body");
        assert!(html.contains("Visit Report"));
        assert!(html.contains("Status: open"));
    }

    #[tokio::test]
    async fn when_the_admin_asks_for_an_unknown_report_kind_then_the_route_replies_400() {
        let response = build_app(FakeBackend::new(Role::Admin))
            .oneshot(get_request("/admin/reports/naps", Some(ADMIN_COOKIE)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn when_the_desk_visitor_detail_is_fetched_then_all_sections_render() {
        let response = desk_app()
            .oneshot(get_request(
                "/desk/visitors/visitor-uuid-1",
                Some(SECURITY_COOKIE),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["profile"]["first_name"], "Jane");
        assert_eq!(payload["profile"]["is_currently_banned"], false);
        assert_eq!(payload["visits"]["items"][0]["reason"], "Delivery");
        assert_eq!(payload["bans"]["items"][0]["reason"], "Trespassing");
        assert_eq!(payload["incidents"]["items"][0]["description"], "Broken gate");
    }

    #[tokio::test]
    async fn when_an_admin_registers_security_personnel_then_the_ack_message_is_forwarded() {
        let request = send_json(
            "POST",
            "/admin/personnel",
            Some(ADMIN_COOKIE),
            serde_json::json!({
                "first_name": "New",
                "last_name": "Guard",
                "email": "new@example.com",
                "phone_number": "0700000002",
                "password": "changeme",
                "national_id": "ID900",
                "secret_code": "4321"
            }),
        );
        let response = build_app(FakeBackend::new(Role::Admin))
            .oneshot(request)
            .await
            .unwrap();

        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["message"], "Security personnel registered successfully");
    }
}
