//! dispatch/transport.rs
//! Form-encoded request body and the transport seam.
//!
//! `Transport` is the external collaborator that moves a `FormRequest` to the
//! service and returns the raw response body. `HttpTransport` is the default
//! blocking HTTP implementation; proxies, credentials and pooling are left to
//! however the `reqwest` client is built.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use thiserror::Error;

use crate::constants::{APPLICATION_JSON, FORM_URLENCODED};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered name/value form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    fields: Vec<(String, String)>,
}

impl FormRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// `application/x-www-form-urlencoded` body, UTF-8.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter())
            .finish()
    }
}

pub trait Transport: Send + Sync {
    /// POST the form to `url` and return the response body.
    fn post_form(&self, url: &str, form: &FormRequest) -> Result<String, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap a caller-configured client (proxy, TLS, pooling).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, form: &FormRequest) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .body(form.encode())
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(TransportError::Status { status: status.as_u16(), body });
        }
        Ok(body)
    }
}
