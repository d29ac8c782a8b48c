//! The barista persona and the tools its dialogue engine may call.
//!
//! The voice runtime drives the conversation; whenever its language model
//! decides a tool call is warranted, the call lands in
//! [`BaristaAgent::dispatch`]. Each tool runs to completion and returns a
//! sentence the runtime speaks back to the customer. Failures never escape
//! as errors past this boundary: they are logged and turned into text.
//!
//! | Tool | Effect |
//! |------|--------|
//! | `save_order` | prices and stores the order, then announces it on the session's event channel |
//! | `get_last_order` | reads back the most recent order ("the usual") |

mod error;
pub mod persona;
mod tools;

pub use error::ToolError;
pub use persona::{BARISTA_INSTRUCTIONS, COMPANY_NAME};
pub use tools::{BaristaAgent, ToolDefinition, ToolName};
