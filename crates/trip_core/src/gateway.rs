use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiException,
    protocol::{Destination, OfferGroup, Point, PointDraft},
};
use tracing::{debug, warn};
use url::Url;

/// Remote source of truth for points and their reference data.
///
/// Writes return the record as normalized by the server.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn points(&self) -> Result<Vec<Point>>;
    async fn offers(&self) -> Result<Vec<OfferGroup>>;
    async fn destinations(&self) -> Result<Vec<Destination>>;
    async fn add_point(&self, draft: &PointDraft) -> Result<Point>;
    async fn update_point(&self, point: &Point) -> Result<Point>;
    async fn delete_point(&self, point: &Point) -> Result<()>;
}

/// JSON-over-HTTP gateway.
///
/// Requests carry no timeout: a server that never answers stalls the caller.
pub struct HttpGateway {
    http: Client,
    base_url: Url,
    authorization: String,
}

impl HttpGateway {
    pub fn new(base_url: Url, authorization: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: with_trailing_slash(base_url),
            authorization: authorization.into(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid endpoint path `{path}`"))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.authorization)
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        debug!(operation, %status, "points api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiException::from_body(status.as_u16(), &body);
        warn!(operation, %status, message = %err.message, "points api rejected request");
        Err(err.into())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.send(self.http.get(url), path).await?;
        response
            .json()
            .await
            .with_context(|| format!("malformed `{path}` response"))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn points(&self) -> Result<Vec<Point>> {
        self.get_json("points").await
    }

    async fn offers(&self) -> Result<Vec<OfferGroup>> {
        self.get_json("offers").await
    }

    async fn destinations(&self) -> Result<Vec<Destination>> {
        self.get_json("destinations").await
    }

    async fn add_point(&self, draft: &PointDraft) -> Result<Point> {
        let url = self.endpoint("points")?;
        let response = self
            .send(self.http.post(url).json(draft), "add_point")
            .await?;
        response
            .json()
            .await
            .context("malformed add_point response")
    }

    async fn update_point(&self, point: &Point) -> Result<Point> {
        let url = self.endpoint(&format!("points/{}", point.id))?;
        let response = self
            .send(self.http.put(url).json(point), "update_point")
            .await?;
        response
            .json()
            .await
            .context("malformed update_point response")
    }

    async fn delete_point(&self, point: &Point) -> Result<()> {
        let url = self.endpoint(&format!("points/{}", point.id))?;
        self.send(self.http.delete(url), "delete_point").await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
