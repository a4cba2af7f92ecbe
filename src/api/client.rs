use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::*;
use super::{Backend, CALLER_HEADER};
use crate::error::ApiError;
use crate::utils::logging::log_backend_call;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `reqwest` implementation of [`Backend`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn as_caller(builder: RequestBuilder, caller: &str) -> RequestBuilder {
        builder.header(CALLER_HEADER, caller)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        log_backend_call(what);
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Backend call {} failed with {}: {}", what, status, body);
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, what: &str) -> Result<T, ApiError> {
        let response = self.send(builder, what).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn create_admin(&self, caller: &str, admin: &NewAdmin) -> Result<(), ApiError> {
        let req = Self::as_caller(self.http.post(self.url("/admin")), caller).json(admin);
        self.send(req, "POST /admin").await.map(|_| ())
    }

    async fn list_channels(&self, caller: &str) -> Result<Vec<Channel>, ApiError> {
        let req = Self::as_caller(self.http.get(self.url("/channel")), caller);
        self.send_json(req, "GET /channel").await
    }

    async fn add_channel(&self, caller: &str, channel: &Channel) -> Result<(), ApiError> {
        let req = Self::as_caller(self.http.post(self.url("/channel")), caller).json(channel);
        self.send(req, "POST /channel").await.map(|_| ())
    }

    async fn delete_channel(&self, caller: &str, channel_id: &str) -> Result<(), ApiError> {
        let req = Self::as_caller(self.http.delete(self.url(&format!("/channel/{channel_id}"))), caller);
        self.send(req, "DELETE /channel").await.map(|_| ())
    }

    async fn list_gifts(&self, caller: &str) -> Result<Vec<Gift>, ApiError> {
        let req = Self::as_caller(self.http.get(self.url("/gift")), caller);
        self.send_json(req, "GET /gift").await
    }

    async fn find_gift(&self, gift_id: &str) -> Result<Gift, ApiError> {
        let req = self.http.get(self.url(&format!("/gift/{gift_id}")));
        self.send_json(req, "GET /gift/{id}").await
    }

    async fn create_gift(&self, caller: &str, gift: &NewGift) -> Result<(), ApiError> {
        let req = Self::as_caller(self.http.post(self.url("/gift")), caller).json(gift);
        self.send(req, "POST /gift").await.map(|_| ())
    }

    async fn update_gift(&self, gift_id: &str, patch: &GiftPatch) -> Result<(), ApiError> {
        let req = self.http.patch(self.url(&format!("/gift/{gift_id}"))).json(patch);
        self.send(req, "PATCH /gift/{id}").await.map(|_| ())
    }

    async fn due_for_start(&self) -> Result<Vec<Gift>, ApiError> {
        let req = self.http.get(self.url("/gift/pooling/start"));
        self.send_json(req, "GET /gift/pooling/start").await
    }

    async fn due_for_end(&self) -> Result<Vec<Gift>, ApiError> {
        let req = self.http.get(self.url("/gift/pooling/end"));
        self.send_json(req, "GET /gift/pooling/end").await
    }

    async fn claim_post(&self, gift_id: &str, post: PostKind) -> Result<bool, ApiError> {
        let body = ClaimRequest {
            post,
            from: PostStatus::Awaiting,
            to: PostStatus::Publishing,
        };
        let req = self.http.post(self.url(&format!("/gift/{gift_id}/claim"))).json(&body);
        match self.send(req, "POST /gift/{id}/claim").await {
            Ok(_) => Ok(true),
            Err(ApiError::Status { status, .. }) if status == StatusCode::CONFLICT.as_u16() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn add_member(&self, caller: &str, member: &NewMember) -> Result<Registration, ApiError> {
        let req = Self::as_caller(self.http.post(self.url("/member")), caller).json(member);
        match self.send(req, "POST /member").await {
            Ok(_) => Ok(Registration::Registered),
            Err(e) if e.is_conflict() => Ok(Registration::AlreadyRegistered),
            Err(e) => Err(e),
        }
    }
}
