use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::utils::CareerLensResult;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body returned by both login and register. The server does not echo the
/// email back.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub name: String,
    pub token: String,
}

pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, payload: &LoginRequest<'_>) -> CareerLensResult<LoginResponse> {
        let request = self.client.request(Method::POST, "/auth/login").await;
        self.client.send_json(request.json(payload)).await
    }

    pub async fn register(&self, payload: &RegisterRequest<'_>) -> CareerLensResult<LoginResponse> {
        let request = self.client.request(Method::POST, "/auth/register").await;
        self.client.send_json(request.json(payload)).await
    }
}
