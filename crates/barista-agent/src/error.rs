//! Errors raised before a tool gets to run.

/// A tool call that could not be dispatched.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool with this name is declared.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments did not match the tool's parameter schema.
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required text argument was empty or only whitespace.
    #[error("invalid arguments for {tool}: {field} must not be empty")]
    EmptyField {
        tool: &'static str,
        field: &'static str,
    },
}
