//! Auth and health endpoints

use shared::{HealthResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role};

use crate::error::ClientResult;
use crate::http::HttpClient;

impl HttpClient {
    /// Exchanges username/password for an access token and role.
    ///
    /// Does not touch the session; the caller decides what to do with the
    /// returned credential.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        tracing::info!(username, "Login request");
        self.post("/api/login", &req).await
    }

    /// Creates a user account
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> ClientResult<RegisterResponse> {
        let req = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        let resp: RegisterResponse = self.post("/api/users", &req).await?;
        tracing::info!(username, %role, id = ?resp.id, "User registered");
        Ok(resp)
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/api/health").await
    }
}
