//! dispatch/request.rs
//! Typed service requests and the factory that stamps agent identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dispatch::model::AgentProjectInfo;

/// Closed set of request kinds understood by the service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Update,
    CheckPolicies,
    CheckPolicyCompliance,
    GetDependencyData,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Update                => "UPDATE",
            RequestType::CheckPolicies         => "CHECK_POLICIES",
            RequestType::CheckPolicyCompliance => "CHECK_POLICY_COMPLIANCE",
            RequestType::GetDependencyData     => "GET_DEPENDENCY_DATA",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateType {
    #[default]
    Override,
    Append,
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateType::Override => "OVERRIDE",
            UpdateType::Append   => "APPEND",
        })
    }
}

/// Request kind plus the wire fields only that kind carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Update {
        #[serde(rename = "updateType")]
        update_type: UpdateType,
    },
    CheckPolicies,
    CheckPolicyCompliance {
        #[serde(rename = "forceCheckAllDependencies")]
        force_check_all_dependencies: bool,
    },
    GetDependencyData,
}

impl RequestKind {
    pub fn request_type(&self) -> RequestType {
        match self {
            RequestKind::Update { .. }                => RequestType::Update,
            RequestKind::CheckPolicies                => RequestType::CheckPolicies,
            RequestKind::CheckPolicyCompliance { .. } => RequestType::CheckPolicyCompliance,
            RequestKind::GetDependencyData            => RequestType::GetDependencyData,
        }
    }
}

/// One call's worth of request data. Built once, then only read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    #[serde(flatten)]
    pub kind: RequestKind,
    pub org_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    pub product: String,
    pub product_version: String,
    /// Epoch millis at construction.
    pub time_stamp: i64,
    pub agent: String,
    pub agent_version: String,
    pub plugin_version: String,
    pub projects: Vec<AgentProjectInfo>,
}

impl ServiceRequest {
    pub fn request_type(&self) -> RequestType {
        self.kind.request_type()
    }

    pub fn with_requester_email(mut self, email: &str) -> Self {
        self.requester_email = Some(email.to_string()).filter(|e| !e.trim().is_empty());
        self
    }
}

/// Builds requests stamped with agent identity and the current time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestFactory {
    agent: String,
    agent_version: String,
    plugin_version: String,
}

impl RequestFactory {
    pub fn new(agent: &str, agent_version: &str, plugin_version: &str) -> Self {
        Self {
            agent: agent.to_string(),
            agent_version: agent_version.to_string(),
            plugin_version: plugin_version.to_string(),
        }
    }

    pub fn new_request(
        &self,
        kind: RequestKind,
        org_token: &str,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> ServiceRequest {
        ServiceRequest {
            kind,
            org_token: org_token.to_string(),
            requester_email: None,
            product: product.to_string(),
            product_version: product_version.to_string(),
            time_stamp: chrono::Utc::now().timestamp_millis(),
            agent: self.agent.clone(),
            agent_version: self.agent_version.clone(),
            plugin_version: self.plugin_version.clone(),
            projects,
        }
    }

    pub fn new_update_inventory_request(
        &self,
        org_token: &str,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
        update_type: UpdateType,
    ) -> ServiceRequest {
        self.new_request(RequestKind::Update { update_type }, org_token, product, product_version, projects)
    }

    pub fn new_check_policies_request(
        &self,
        org_token: &str,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> ServiceRequest {
        self.new_request(RequestKind::CheckPolicies, org_token, product, product_version, projects)
    }

    pub fn new_check_policy_compliance_request(
        &self,
        org_token: &str,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
        force_check_all_dependencies: bool,
    ) -> ServiceRequest {
        self.new_request(
            RequestKind::CheckPolicyCompliance { force_check_all_dependencies },
            org_token,
            product,
            product_version,
            projects,
        )
    }

    pub fn new_dependency_data_request(
        &self,
        org_token: &str,
        product: &str,
        product_version: &str,
        projects: Vec<AgentProjectInfo>,
    ) -> ServiceRequest {
        self.new_request(RequestKind::GetDependencyData, org_token, product, product_version, projects)
    }
}
