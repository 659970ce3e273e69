use std::sync::Arc;

use crate::domain::ports::{
    AdminProvider, AuthProvider, DeskProvider, VisitProvider, VisitorProvider,
};

// Application state shared by every handler. The ports are trait
// objects so tests can swap the reqwest client for fakes.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub desk: Arc<dyn DeskProvider>,
    pub visitors: Arc<dyn VisitorProvider>,
    pub visits: Arc<dyn VisitProvider>,
    pub admin: Arc<dyn AdminProvider>,
}
