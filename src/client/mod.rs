// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! HTTP transport.
//!
//! A thin wrapper over reqwest that serializes bodies as JSON, treats
//! HTTP 204 as a null result, and normalizes every failure mode into the
//! single [`ApiError`] shape the backend uses. Callers never see a raw
//! transport error.

use std::fmt;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// The one error shape surfaced by the transport.
///
/// Sourced from the backend's error body when one is present; the
/// documented fallbacks fill in missing fields. Transport-level failures
/// (unreachable host, malformed JSON) collapse to [`ApiError::network`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl ApiError {
    pub fn network() -> Self {
        Self {
            status_code: 500,
            message: "Network error or server unavailable".to_owned(),
            error: "NetworkError".to_owned(),
        }
    }

    fn from_response(status: StatusCode, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("An error occurred")
            .to_owned();
        let error = body.get("error").and_then(Value::as_str).unwrap_or("Error").to_owned();
        Self { status_code: status.as_u16(), message, error }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {}): {}", self.error, self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: reqwest::Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|_| ApiError::network())?;
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(|_| ApiError::network())?;
        self.request(Method::PATCH, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        let _: Option<Value> = self.request(Method::DELETE, endpoint, None).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|_| ApiError::network())?;
        let status = response.status();

        // 204 No Content resolves to a null result without a body read.
        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|_| ApiError::network());
        }

        let data: Value = response.json().await.map_err(|_| ApiError::network())?;
        if !status.is_success() {
            return Err(ApiError::from_response(status, &data));
        }
        serde_json::from_value(data).map_err(|_| ApiError::network())
    }
}
