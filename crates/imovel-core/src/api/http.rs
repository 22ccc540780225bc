//! reqwest implementation of [`PropertyApi`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::{ApiEnvelope, PropertyApi};
use crate::{
    config::ApiConfig,
    error::{HttpResultExt, Result, WizardError},
    models::{
        CaracteristicaEscopo, Completeness, OptionItem, PropertyId, PropertyStatus, StepId,
        StepPayload,
    },
};

/// Request body of the activate call.
#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: PropertyStatus,
}

/// HTTP client for the property backend.
#[derive(Debug, Clone)]
pub struct HttpPropertyApi {
    base_url: String,
    http: Client,
    auth_token: Option<String>,
}

impl HttpPropertyApi {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url, auth_token)
    }

    /// Builds a client with the configured timeout and credential.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .http_context("Failed to create HTTP client")?;
        Ok(Self::with_client(
            http,
            config.base_url.clone(),
            config.token.clone(),
        ))
    }

    fn with_client(http: Client, base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            auth_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn step_path(id: PropertyId, step: StepId) -> String {
        format!("/imoveis/{id}/etapas/{}", step.api_name())
    }

    fn add_auth(&self, req: RequestBuilder) -> RequestBuilder {
        if let Some(ref token) = self.auth_token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    async fn send(&self, req: RequestBuilder, url: &str) -> Result<Response> {
        debug!("{url}");
        self.add_auth(req)
            .send()
            .await
            .http_context(&format!("Request to {url} failed"))
    }

    /// Reads the envelope of a successful response and returns its data.
    async fn read_data<T: DeserializeOwned>(response: Response, url: &str) -> Result<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }
        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .http_context(&format!("Invalid response body from {url}"))?;
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(WizardError::Api {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("{url} reported failure")),
            })
        }
    }

    async fn status_error(response: Response) -> WizardError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| status.to_string());
        WizardError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn get_list(&self, path: &str) -> Result<Vec<OptionItem>> {
        let url = self.url(path);
        let response = self.send(self.http.get(&url), &url).await?;
        Ok(Self::read_data(response, &url).await?.unwrap_or_default())
    }
}

#[async_trait]
impl PropertyApi for HttpPropertyApi {
    async fn get_step(&self, id: PropertyId, step: StepId) -> Result<Option<StepPayload>> {
        let url = self.url(&Self::step_path(id, step));
        let response = self.send(self.http.get(&url), &url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        match Self::read_data(response, &url).await {
            Ok(data) => Ok(data),
            // `success: false` on a read means "no record yet"
            Err(WizardError::Api { status, .. }) if (200..300).contains(&status) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_step(
        &self,
        id: PropertyId,
        step: StepId,
        body: &StepPayload,
    ) -> Result<StepPayload> {
        let url = self.url(&Self::step_path(id, step));
        let response = self.send(self.http.put(&url).json(body), &url).await?;
        Ok(Self::read_data(response, &url)
            .await?
            .unwrap_or_else(|| body.clone()))
    }

    async fn completeness(&self, id: PropertyId) -> Result<Completeness> {
        let url = self.url(&format!("/imoveis/{id}/etapas/completude"));
        let response = self.send(self.http.get(&url), &url).await?;
        Ok(Self::read_data(response, &url).await?.unwrap_or_default())
    }

    async fn activate(&self, id: PropertyId) -> Result<()> {
        let url = self.url(&format!("/imoveis/{id}"));
        let body = StatusUpdate {
            status: PropertyStatus::Ativo,
        };
        let response = self.send(self.http.put(&url).json(&body), &url).await?;
        Self::read_data::<serde_json::Value>(response, &url).await?;
        Ok(())
    }

    async fn caracteristicas(&self, escopo: CaracteristicaEscopo) -> Result<Vec<OptionItem>> {
        self.get_list(&format!("/imoveis/opcoes/caracteristicas/{escopo}"))
            .await
    }

    async fn proximidades(&self) -> Result<Vec<OptionItem>> {
        self.get_list("/imoveis/opcoes/proximidades").await
    }

    async fn usuarios(&self) -> Result<Vec<OptionItem>> {
        self.get_list("/usuarios/select").await
    }
}
