//! dispatch/client.rs
//! Service dispatcher: BUILD -> TRANSMIT -> PARSE.
//!
//! - BUILD: common fields, type-specific fields, compressed JSON diff
//! - TRANSMIT: delegated to a `Transport`
//! - PARSE: envelope unwrap, then decode `data` by the request's type
//!
//! No retries at this layer.

use crate::compression::StreamCompressor;
use crate::config::ClientConfig;
use crate::constants::params;
use crate::dispatch::envelope::ResultEnvelope;
use crate::dispatch::request::{RequestKind, RequestType, ServiceRequest};
use crate::dispatch::result::{
    CheckPoliciesResult, CheckPolicyComplianceResult, GetDependencyDataResult, ServiceResponse,
    ServiceResult, UpdateInventoryResult,
};
use crate::dispatch::transport::{FormRequest, HttpTransport, Transport};
use crate::types::{AgentError, Result};

#[derive(Debug)]
pub struct ServiceDispatcher<T: Transport = HttpTransport> {
    service_url: String,
    transport: T,
    compressor: StreamCompressor,
}

impl ServiceDispatcher<HttpTransport> {
    /// Dispatcher over a blocking HTTP transport built from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.connection_timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ServiceDispatcher<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            service_url: config.service_url.clone(),
            transport,
            compressor: StreamCompressor::new(&config.codec),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ---- BUILD ----
    pub fn build_request(&self, request: &ServiceRequest) -> Result<FormRequest> {
        let mut form = FormRequest::new();
        form.push(params::REQUEST_TYPE, request.request_type().as_str());
        form.push(params::AGENT, request.agent.as_str());
        form.push(params::AGENT_VERSION, request.agent_version.as_str());
        form.push(params::TOKEN, request.org_token.as_str());
        form.push(params::REQUESTER_EMAIL, request.requester_email.clone().unwrap_or_default());
        form.push(params::PRODUCT, request.product.as_str());
        form.push(params::PRODUCT_VERSION, request.product_version.as_str());
        form.push(params::TIME_STAMP, request.time_stamp.to_string());
        form.push(params::PLUGIN_VERSION, request.plugin_version.as_str());

        match &request.kind {
            RequestKind::Update { update_type } => {
                form.push(params::UPDATE_TYPE, update_type.to_string());
            }
            RequestKind::CheckPolicyCompliance { force_check_all_dependencies } => {
                form.push(params::FORCE_CHECK_ALL_DEPENDENCIES, force_check_all_dependencies.to_string());
            }
            RequestKind::CheckPolicies | RequestKind::GetDependencyData => {}
        }

        let json_diff = serde_json::to_string(&request.projects)?;
        let (diff, telemetry) = self.compressor.compress_with_telemetry(&json_diff)?;
        tracing::debug!(
            request_type = %request.request_type(),
            projects = request.projects.len(),
            json_bytes = telemetry.bytes_plaintext,
            diff_bytes = diff.len(),
            "request built"
        );
        form.push(params::DIFF, diff);

        Ok(form)
    }

    // ---- PARSE ----
    pub fn parse_response(&self, request_type: RequestType, body: &str) -> Result<ServiceResult> {
        let envelope = ResultEnvelope::parse(body)?;
        let data = envelope.into_data()?;
        tracing::trace!(%request_type, data = %data, "result data");

        if data.trim().is_empty() {
            return Err(AgentError::protocol("empty result data", body));
        }

        ServiceResult::decode(request_type, &data)
            .map_err(|e| AgentError::protocol(format!("undecodable {request_type} result: {e}"), body))
    }

    /// Build, send and parse one request.
    pub fn service(&self, request: &ServiceRequest) -> Result<ServiceResult> {
        let request_type = request.request_type();
        let form = self.build_request(request)?;

        tracing::info!(%request_type, url = %self.service_url, "calling service");
        let body = self.transport.post_form(&self.service_url, &form)?;

        self.parse_response(request_type, &body)
    }

    /// `service` for a request whose kind must match `R`.
    pub fn service_typed<R: ServiceResponse>(&self, request: &ServiceRequest) -> Result<R> {
        let actual = request.request_type();
        if actual != R::REQUEST_TYPE {
            return Err(AgentError::RequestMismatch { expected: R::REQUEST_TYPE, actual });
        }

        let result = self.service(request)?;
        let got = result.request_type();
        R::from_result(result).ok_or(AgentError::RequestMismatch { expected: R::REQUEST_TYPE, actual: got })
    }

    pub fn update_inventory(&self, request: &ServiceRequest) -> Result<UpdateInventoryResult> {
        self.service_typed(request)
    }

    pub fn check_policies(&self, request: &ServiceRequest) -> Result<CheckPoliciesResult> {
        self.service_typed(request)
    }

    pub fn check_policy_compliance(&self, request: &ServiceRequest) -> Result<CheckPolicyComplianceResult> {
        self.service_typed(request)
    }

    pub fn get_dependency_data(&self, request: &ServiceRequest) -> Result<GetDependencyDataResult> {
        self.service_typed(request)
    }
}
