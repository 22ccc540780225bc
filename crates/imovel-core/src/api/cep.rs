//! ViaCEP-style address lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::AddressLookup;
use crate::{
    config::ApiConfig,
    error::{HttpResultExt, Result, WizardError},
    models::Address,
};

/// Wire shape of `GET {base}/{cep}/json/`.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    logradouro: String,
}

impl ViaCepResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

/// Address lookup backed by a ViaCEP-compatible service.
#[derive(Debug, Clone)]
pub struct ViaCepLookup {
    base_url: String,
    http: Client,
}

impl ViaCepLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .http_context("Failed to create HTTP client")?;
        Ok(Self {
            base_url: config.cep_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepLookup {
    async fn lookup(&self, cep: &str) -> Result<Address> {
        let url = format!("{}/{cep}/json/", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .http_context(&format!("CEP lookup {cep} failed"))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                return Err(WizardError::AddressNotFound {
                    cep: cep.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(WizardError::Api {
                    status: status.as_u16(),
                    message: format!("CEP lookup {cep} failed"),
                })
            }
            _ => {}
        }

        let body: ViaCepResponse = response
            .json()
            .await
            .http_context(&format!("Invalid CEP response for {cep}"))?;
        if body.is_not_found() {
            return Err(WizardError::AddressNotFound {
                cep: cep.to_string(),
            });
        }

        Ok(Address {
            uf: body.uf,
            cidade: body.localidade,
            bairro: body.bairro,
            logradouro: body.logradouro,
        })
    }
}
