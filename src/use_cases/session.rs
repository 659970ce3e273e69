use std::fmt;

use crate::domain::entities::{Bearer, LoginRequest, Role};
use crate::domain::errors::ApiError;
use crate::domain::ports::AuthProvider;

// Cookie lifetime granted at login.
pub const SESSION_TTL_SECONDS: u64 = 60 * 60 * 24;

// The authenticated identity for one request, rebuilt from the session
// cookies and passed explicitly into every backend call. The role here
// only gates UI surface; the backend re-checks the bearer token on
// every privileged call regardless of what this value claims.
#[derive(Clone, Debug)]
pub struct Session {
    pub bearer: Bearer,
    pub role: Option<Role>,
    pub email: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    NotAdmin,
    NotSecurity,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    // Admins can work the desk too, mirroring the backend's role model.
    pub fn is_security(&self) -> bool {
        matches!(self.role, Some(Role::Security) | Some(Role::Admin))
    }

    pub fn require_admin(&self) -> Result<(), SessionError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(SessionError::NotAdmin)
        }
    }

    pub fn require_security(&self) -> Result<(), SessionError> {
        if self.is_security() {
            Ok(())
        } else {
            Err(SessionError::NotSecurity)
        }
    }
}

// Everything the cookie layer needs to persist a fresh session.
#[derive(Clone, Debug)]
pub struct SessionGrant {
    pub token: String,
    pub role: Role,
    pub email: String,
    pub max_age_seconds: u64,
}

#[derive(Debug)]
pub enum LoginError {
    MissingCredentials,
    Backend(ApiError),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::MissingCredentials => write!(f, "Email and password required"),
            LoginError::Backend(err) => write!(f, "{err}"),
        }
    }
}

// Login use case with the auth port injected.
pub struct LoginUseCase<'a> {
    pub auth: &'a dyn AuthProvider,
}

impl LoginUseCase<'_> {
    pub async fn execute(&self, payload: LoginRequest) -> Result<SessionGrant, LoginError> {
        // Presence is the only client-side validation; the backend owns
        // credential checking.
        if payload.email.trim().is_empty() || payload.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        let grant = self
            .auth
            .login(&payload)
            .await
            .map_err(LoginError::Backend)?;

        Ok(SessionGrant {
            token: grant.access_token,
            role: grant.role,
            email: payload.email,
            max_age_seconds: SESSION_TTL_SECONDS,
        })
    }
}
