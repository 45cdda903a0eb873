//! REST client for the BuyLog service.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use buylog_core::{Invite, Product, Purchase, PurchaseId};

use crate::config::ClientConfig;

use super::{
    ApiError, CreatePurchaseRequest, DeletePurchaseRequest, GroupApi, GroupResponse, InviteApi,
    InvitesEnvelope, NewProduct, ProductApi, ProductsEnvelope, PurchaseApi, PurchasesEnvelope,
    SendInviteOutcome, SendInviteRequest,
};

/// Client for the BuyLog REST API.
///
/// Cheaply cloneable via `Arc`. Carries the bearer token in default
/// headers; all responses go through one status-handling path so a 401
/// always becomes [`ApiError::SessionExpired`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the
    /// configured token is not a valid header value.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        if let Some(token) = config.token_value() {
            let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::InvalidToken)?;
            auth.set_sensitive(true);
            headers.insert("Authorization", auth);
        }

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Interpret a response: 401 is session expiry, other non-success
    /// statuses carry the server text through unaltered. The body is
    /// read as text first so parse failures keep their diagnostics.
    async fn handle_response(
        response: reqwest::Response,
        method: &str,
        path: &str,
    ) -> Result<(u16, String), ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }

        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "BuyLog API returned non-success status"
            );
            let message = if text.trim().is_empty() {
                format!("{method} {path} failed")
            } else {
                text.trim().to_string()
            };
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok((status.as_u16(), text))
    }

    fn parse<T: DeserializeOwned>(text: &str, method: &str, path: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                %method,
                %path,
                "Failed to parse BuyLog API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        let (_, text) = Self::handle_response(response, "GET", path).await?;
        Self::parse(&text, "GET", path)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        let (_, text) = Self::handle_response(response, "POST", path).await?;
        Self::parse(&text, "POST", path)
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await?;
        let (_, text) = Self::handle_response(response, "PUT", path).await?;
        Self::parse(&text, "PUT", path)
    }

    async fn delete<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response, "DELETE", path).await?;
        Ok(())
    }
}

impl PurchaseApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_purchases(&self) -> Result<Vec<Purchase>, ApiError> {
        let envelope: PurchasesEnvelope = self.get("/purchases").await?;
        Ok(envelope.purchases)
    }

    #[instrument(skip(self, req), fields(product_id = %req.product_id, receipt_id = %req.receipt_id))]
    async fn create_purchase(&self, req: &CreatePurchaseRequest) -> Result<Purchase, ApiError> {
        self.post("/purchases", req).await
    }

    #[instrument(skip(self), fields(purchase_id = %id))]
    async fn delete_purchase(&self, id: PurchaseId) -> Result<(), ApiError> {
        self.delete("/purchases", &DeletePurchaseRequest { id }).await
    }
}

impl ProductApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let envelope: ProductsEnvelope = self.get("/products").await?;
        Ok(envelope.products)
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    async fn create_product(&self, req: &NewProduct) -> Result<Product, ApiError> {
        self.post("/products", req).await
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update_product(&self, product: &Product) -> Result<Product, ApiError> {
        self.put("/products", product).await
    }
}

impl GroupApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_group_members(&self) -> Result<GroupResponse, ApiError> {
        self.get("/group").await
    }

    #[instrument(skip(self))]
    async fn leave_group(&self) -> Result<(), ApiError> {
        self.delete("/group", &serde_json::json!({})).await
    }
}

impl InviteApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_invites(&self) -> Result<Vec<Invite>, ApiError> {
        let envelope: InvitesEnvelope = self.get("/invite").await?;
        Ok(envelope.invites)
    }

    #[instrument(skip(self), fields(login = %login))]
    async fn send_invite(&self, login: &str) -> Result<SendInviteOutcome, ApiError> {
        self.post("/invite", &SendInviteRequest { login }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::for_url("http://localhost:8080/").expect("valid url");
        let client = ApiClient::new(&config).expect("client");
        assert_eq!(client.url("/purchases"), "http://localhost:8080/purchases");
    }

    #[test]
    fn test_parse_surfaces_serde_error() {
        let result: Result<PurchasesEnvelope, _> =
            ApiClient::parse("not json", "GET", "/purchases");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
