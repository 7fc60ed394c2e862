//! dispatch/service.rs
//! High-level entry points: build a request from parameters and dispatch it.

use crate::config::ClientConfig;
use crate::dispatch::client::ServiceDispatcher;
use crate::dispatch::model::AgentProjectInfo;
use crate::dispatch::request::{RequestFactory, ServiceRequest, UpdateType};
use crate::dispatch::result::{
    CheckPoliciesResult, CheckPolicyComplianceResult, GetDependencyDataResult, UpdateInventoryResult,
};
use crate::dispatch::transport::{HttpTransport, Transport};
use crate::types::Result;

#[derive(Debug)]
pub struct AgentService<T: Transport = HttpTransport> {
    factory: RequestFactory,
    dispatcher: ServiceDispatcher<T>,
}

impl AgentService<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_dispatcher(config, ServiceDispatcher::from_config(config)?))
    }
}

impl<T: Transport> AgentService<T> {
    pub fn with_dispatcher(config: &ClientConfig, dispatcher: ServiceDispatcher<T>) -> Self {
        Self {
            factory: RequestFactory::new(&config.agent, &config.agent_version, &config.plugin_version),
            dispatcher,
        }
    }

    pub fn factory(&self) -> &RequestFactory {
        &self.factory
    }

    pub fn dispatcher(&self) -> &ServiceDispatcher<T> {
        &self.dispatcher
    }

    pub fn update(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        update_type: UpdateType,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> Result<UpdateInventoryResult> {
        let request = self.offline_update(org_token, requester_email, update_type, product, product_version, projects);
        self.dispatcher.update_inventory(&request)
    }

    /// UPDATE request built but not sent.
    pub fn offline_update(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        update_type: UpdateType,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> ServiceRequest {
        let request = self
            .factory
            .new_update_inventory_request(org_token, product, product_version, projects, update_type);
        with_email(request, requester_email)
    }

    /// Offline UPDATE request as pretty JSON, for writing to disk.
    pub fn offline_update_json(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        update_type: UpdateType,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> Result<String> {
        let request = self.offline_update(org_token, requester_email, update_type, product, product_version, projects);
        Ok(serde_json::to_string_pretty(&request)?)
    }

    pub fn check_policies(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> Result<CheckPoliciesResult> {
        let request = self
            .factory
            .new_check_policies_request(org_token, product, product_version, projects);
        self.dispatcher.check_policies(&with_email(request, requester_email))
    }

    pub fn check_policy_compliance(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
        force_check_all_dependencies: bool,
    ) -> Result<CheckPolicyComplianceResult> {
        let request = self.factory.new_check_policy_compliance_request(
            org_token,
            product,
            product_version,
            projects,
            force_check_all_dependencies,
        );
        self.dispatcher.check_policy_compliance(&with_email(request, requester_email))
    }

    pub fn get_dependency_data(
        &self,
        org_token: &str,
        requester_email: Option<&str>,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> Result<GetDependencyDataResult> {
        let request = self
            .factory
            .new_dependency_data_request(org_token, product, product_version, projects);
        self.dispatcher.get_dependency_data(&with_email(request, requester_email))
    }
}

fn with_email(request: ServiceRequest, email: Option<&str>) -> ServiceRequest {
    match email {
        Some(e) => request.with_requester_email(e),
        None => request,
    }
}
