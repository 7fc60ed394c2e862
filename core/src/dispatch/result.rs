//! dispatch/result.rs
//! Result payloads decoded from the envelope's `data`, routed by request type.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::request::RequestType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInventoryResult {
    pub organization: String,
    pub created_projects: Vec<String>,
    pub updated_projects: Vec<String>,
    pub request_token: Option<String>,
}

/// Policy check tree per project, keyed by project name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckPoliciesResult {
    pub organization: String,
    pub existing_projects: BTreeMap<String, Value>,
    pub new_projects: BTreeMap<String, Value>,
    pub project_new_resources: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckPolicyComplianceResult {
    pub organization: String,
    pub existing_projects: BTreeMap<String, Value>,
    pub new_projects: BTreeMap<String, Value>,
    pub project_new_resources: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDependencyDataResult {
    pub organization: String,
    pub projects: Vec<Value>,
}

/// Decoded result, one variant per request type.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult {
    Update(UpdateInventoryResult),
    CheckPolicies(CheckPoliciesResult),
    CheckPolicyCompliance(CheckPolicyComplianceResult),
    GetDependencyData(GetDependencyDataResult),
}

impl ServiceResult {
    /// Decode `data` into the result type selected by `request_type`.
    pub fn decode(request_type: RequestType, data: &str) -> serde_json::Result<Self> {
        Ok(match request_type {
            RequestType::Update                => ServiceResult::Update(serde_json::from_str(data)?),
            RequestType::CheckPolicies         => ServiceResult::CheckPolicies(serde_json::from_str(data)?),
            RequestType::CheckPolicyCompliance => ServiceResult::CheckPolicyCompliance(serde_json::from_str(data)?),
            RequestType::GetDependencyData     => ServiceResult::GetDependencyData(serde_json::from_str(data)?),
        })
    }

    pub fn request_type(&self) -> RequestType {
        match self {
            ServiceResult::Update(_)                => RequestType::Update,
            ServiceResult::CheckPolicies(_)         => RequestType::CheckPolicies,
            ServiceResult::CheckPolicyCompliance(_) => RequestType::CheckPolicyCompliance,
            ServiceResult::GetDependencyData(_)     => RequestType::GetDependencyData,
        }
    }
}

/// Typed view of a `ServiceResult` variant.
pub trait ServiceResponse: DeserializeOwned + Sized {
    const REQUEST_TYPE: RequestType;

    fn from_result(result: ServiceResult) -> Option<Self>;
}

macro_rules! service_response {
    ($ty:ty, $variant:ident) => {
        impl ServiceResponse for $ty {
            const REQUEST_TYPE: RequestType = RequestType::$variant;

            fn from_result(result: ServiceResult) -> Option<Self> {
                match result {
                    ServiceResult::$variant(r) => Some(r),
                    _ => None,
                }
            }
        }
    };
}

service_response!(UpdateInventoryResult, Update);
service_response!(CheckPoliciesResult, CheckPolicies);
service_response!(CheckPolicyComplianceResult, CheckPolicyCompliance);
service_response!(GetDependencyDataResult, GetDependencyData);
