pub mod dispatch;
pub mod session;

pub use dispatch::{FunctionCallSpec, ToolDeclaration, ToolResponse, dispatch_calls, tool_declarations};
pub use session::{GatedQuery, QueryOutcome};
