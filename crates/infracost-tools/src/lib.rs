//! infracost-tools: Tool schemas, validation and dispatch
//!
//! One declarative [`schema::ObjectSchema`] per tool feeds both the
//! advertised `inputSchema` and the runtime validator. Validated arguments
//! are reshaped by the pure functions in [`transform`] and handed to one of
//! two backends: the `infracost` executable ([`cli`]) or the Infracost Cloud
//! REST API ([`api`]).

pub mod api;
pub mod catalog;
pub mod cli;
pub mod dispatcher;
pub mod registry;
pub mod schema;
pub mod transform;
pub mod validate;

// Re-export main types
pub use api::{ApiBody, ApiCall, CloudApi, CloudApiClient, DEFAULT_API_URL};
pub use catalog::ToolKind;
pub use cli::{CommandBackend, Invocation, InfracostCli, DEFAULT_MAX_OUTPUT_BYTES};
pub use dispatcher::{DispatchError, ToolDispatcher, ToolResponse};
pub use registry::{ToolDescriptor, ToolInfo, ToolRegistry};
pub use schema::{Field, ObjectSchema, Schema};
pub use validate::{validate, FieldIssue, ValidationErrors};
