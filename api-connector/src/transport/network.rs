// api-connector/src/transport/network.rs
// Network transport - real HTTP through reqwest

use super::{Transport, TransportBody, TransportRequest, TransportResponse};
use crate::config::ConnectorConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use shared::MultipartForm;
use std::time::Duration;

/// Network HTTP transport
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    client: Client,
}

impl NetworkTransport {
    pub fn new(config: &ConnectorConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn multipart(form: &MultipartForm) -> ClientResult<Form> {
        let mut multipart = Form::new();
        for part in form.parts() {
            let mut body = Part::bytes(part.data.to_vec());
            if let Some(file_name) = &part.file_name {
                body = body.file_name(file_name.clone());
            }
            if let Some(content_type) = &part.content_type {
                body = body.mime_str(content_type)?;
            }
            multipart = multipart.part(part.name.clone(), body);
        }
        Ok(multipart)
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let mut req = self
            .client
            .request(http::Method::from(request.method), &request.url);
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req = match &request.body {
            TransportBody::Empty => req,
            TransportBody::Text(text) => req.body(text.clone()),
            TransportBody::Multipart(form) => req.multipart(Self::multipart(form)?),
        };

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
