//! dispatch/mod.rs
//! Service dispatch: request model, envelope, typed results, transport.

pub mod model;
pub mod request;
pub mod envelope;
pub mod result;
pub mod transport;
pub mod client;
pub mod service;

pub use model::{AgentProjectInfo, Coordinates, DependencyInfo};
pub use request::{RequestFactory, RequestKind, RequestType, ServiceRequest, UpdateType};
pub use envelope::{EnvelopeStatus, ResultEnvelope};
pub use result::{
    CheckPoliciesResult, CheckPolicyComplianceResult, GetDependencyDataResult, ServiceResponse,
    ServiceResult, UpdateInventoryResult,
};
pub use transport::{FormRequest, HttpTransport, Transport, TransportError};
pub use client::ServiceDispatcher;
pub use service::AgentService;
