use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::error;
use url::Url;

#[derive(Error, Debug)]
pub enum BackendApiError {
    #[error("Backend api path `{0}` could not be joined onto the base url")]
    InvalidPath(String),
    #[error("Network error calling the backend api: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Backend api responded with status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("Unable to decode backend api response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Thin JSON client for the shop inventory backend api
pub struct BackendRestApi {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl BackendRestApi {
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    fn url(&self, path: &str) -> Result<Url, BackendApiError> {
        self.base_url
            .join(path)
            .map_err(|_| BackendApiError::InvalidPath(path.to_string()))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("X-Api-Key", key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, BackendApiError> {
        let res = self.authorize(builder).send().await.map_err(|e| {
            error!(
                "[Network Error] Backend API {} {} error. Error message: {:?}",
                method, path, e
            );
            BackendApiError::Network(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(
                "[Unexpected Response] Backend API {} {} returned status: {}. Body: {}",
                method, path, status, body
            );
            return Err(BackendApiError::UnexpectedStatus { status, body });
        }

        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Backend API {} {} error. Error message: {:?}",
                method, path, e
            );
            BackendApiError::Decode(e)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendApiError> {
        let url = self.url(path)?;
        self.send("GET", path, self.client.get(url)).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        body: &impl Serialize,
        path: &str,
    ) -> Result<T, BackendApiError> {
        let url = self.url(path)?;
        self.send("POST", path, self.client.post(url).json(body)).await
    }

    /// Posts `body` and only cares about whether the backend accepted it
    pub async fn post_accepted(
        &self,
        body: &impl Serialize,
        path: &str,
    ) -> Result<(), BackendApiError> {
        let url = self.url(path)?;
        let res = self
            .authorize(self.client.post(url).json(body))
            .send()
            .await
            .map_err(BackendApiError::Network)?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            Err(BackendApiError::UnexpectedStatus { status, body })
        }
    }
}
