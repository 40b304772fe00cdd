use api_types::transaction::{
    DeleteMany, NewTransaction, Transaction, TransactionFilters, TransactionPatch,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::{
    error::{ClientError, Result},
    session::Session,
};

/// Thin typed wrapper over the remote store's REST surface.
///
/// One method per endpoint; no retries and no timeouts, those belong to
/// the transport. Error bodies are expected to carry a `message` field; when
/// the body is missing or undecodable a generic message is used instead.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiClient {
    pub fn new(session: &Session) -> Self {
        Self::with_http(reqwest::Client::new(), session)
    }

    pub fn with_http(http: reqwest::Client, session: &Session) -> Self {
        Self {
            http,
            session: session.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.session.base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn expect_json<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        Err(Self::api_error(resp).await)
    }

    async fn expect_unit(resp: Response) -> Result<()> {
        if resp.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(resp).await)
    }

    async fn api_error(resp: Response) -> ClientError {
        let status = resp.status();
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => "server error".to_string(),
        };
        ClientError::Api { status, message }
    }

    pub async fn list_transactions(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>> {
        let resp = self
            .request(Method::GET, "/transactions")
            .query(filters)
            .send()
            .await?;
        Self::expect_json(resp).await
    }

    pub async fn get_transaction(&self, id: i64) -> Result<Transaction> {
        let resp = self
            .request(Method::GET, &format!("/transactions/{id}"))
            .send()
            .await?;
        Self::expect_json(resp).await
    }

    pub async fn create_transaction(&self, payload: &NewTransaction) -> Result<Transaction> {
        let resp = self
            .request(Method::POST, "/transactions")
            .json(payload)
            .send()
            .await?;
        Self::expect_json(resp).await
    }

    pub async fn create_transactions(
        &self,
        payload: &[NewTransaction],
    ) -> Result<Vec<Transaction>> {
        let resp = self
            .request(Method::POST, "/transactions/bulk")
            .json(payload)
            .send()
            .await?;
        Self::expect_json(resp).await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        payload: &TransactionPatch,
    ) -> Result<Transaction> {
        let resp = self
            .request(Method::PUT, &format!("/transactions/{id}"))
            .json(payload)
            .send()
            .await?;
        Self::expect_json(resp).await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("/transactions/{id}"))
            .send()
            .await?;
        Self::expect_unit(resp).await
    }

    pub async fn delete_transactions(&self, payload: &DeleteMany) -> Result<()> {
        let resp = self
            .request(Method::POST, "/transactions/delete-multiple")
            .json(payload)
            .send()
            .await?;
        Self::expect_unit(resp).await
    }
}
