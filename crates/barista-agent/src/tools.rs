use std::fmt;
use std::str::FromStr;

use barista_orders::OrderStore;
use barista_types::{AgentEvent, OrderRecord, OrderRequest};
use barista_voice::{publish_event, EventChannel};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::ToolError;

/// Tools the barista exposes to the dialogue engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    SaveOrder,
    GetLastOrder,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::SaveOrder, ToolName::GetLastOrder];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaveOrder => "save_order",
            Self::GetLastOrder => "get_last_order",
        }
    }

    /// Returns the declaration the language model sees for this tool.
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::SaveOrder => ToolDefinition {
                name: self.as_str().to_string(),
                description: "Save the customer's order details. Use this tool ONLY when the \
                              customer has confirmed their order."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "drink_type": {
                            "type": "string",
                            "description": "The type of drink (e.g., Latte, Cappuccino)."
                        },
                        "size": {
                            "type": "string",
                            "description": "The size of the drink (Tall, Grande, Venti)."
                        },
                        "milk": {
                            "type": "string",
                            "description": "The type of milk (e.g., Whole, Oat, Almond)."
                        },
                        "extras": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "A list of extra customizations (e.g., extra shot, vanilla syrup)."
                        },
                        "name": {
                            "type": "string",
                            "description": "The customer's name (make sure to misspell it slightly for that authentic Starbucks experience!)."
                        }
                    },
                    "required": ["drink_type", "size", "milk", "extras", "name"],
                    "additionalProperties": false
                }),
            },
            Self::GetLastOrder => ToolDefinition {
                name: self.as_str().to_string(),
                description: "Retrieve the customer's last order (the 'usual'). Use this tool \
                              when the customer asks for 'the usual' or asks what they ordered \
                              last time."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }),
            },
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save_order" => Ok(Self::SaveOrder),
            "get_last_order" => Ok(Self::GetLastOrder),
            _ => Err(ToolError::UnknownTool(s.to_string())),
        }
    }
}

/// A tool declaration in the JSON-schema shape LLM providers accept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The barista's tool implementations, backed by one order store.
#[derive(Debug, Clone)]
pub struct BaristaAgent {
    store: OrderStore,
}

impl BaristaAgent {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn instructions(&self) -> &'static str {
        crate::persona::BARISTA_INSTRUCTIONS
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        ToolName::ALL.iter().map(|tool| tool.definition()).collect()
    }

    /// Runs the named tool with JSON `arguments`.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` only when the call cannot be dispatched at all;
    /// everything that happens inside a tool is reported in the returned
    /// text.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Value,
        channel: Option<&dyn EventChannel>,
    ) -> Result<String, ToolError> {
        let tool: ToolName = name.parse()?;
        match tool {
            ToolName::SaveOrder => {
                let request: OrderRequest = serde_json::from_value(arguments).map_err(|e| {
                    ToolError::InvalidArguments {
                        tool: tool.as_str(),
                        source: e,
                    }
                })?;
                if request.drink_type.trim().is_empty() {
                    return Err(ToolError::EmptyField {
                        tool: tool.as_str(),
                        field: "drink_type",
                    });
                }
                Ok(self.save_order(request, channel).await)
            }
            ToolName::GetLastOrder => Ok(self.get_last_order().await),
        }
    }

    /// Stores a confirmed order and announces it on `channel`.
    ///
    /// The announcement is best-effort and only happens after the order is
    /// on disk; the reply reflects persistence alone.
    pub async fn save_order(
        &self,
        request: OrderRequest,
        channel: Option<&dyn EventChannel>,
    ) -> String {
        info!(
            name = %request.name,
            size = %request.size,
            drink = %request.drink_type,
            "saving order"
        );

        let saved = match self.store.save(request).await {
            Ok(saved) => saved,
            Err(e) => {
                error!(error = ?e, store = %self.store.dir().display(), "failed to save order: {}", e);
                return format!("Error saving order: {e}");
            }
        };

        let price = saved.record.price;
        publish_event(channel, &AgentEvent::OrderSaved(saved.record)).await;

        format!("Order saved! Total is ₹{price}.")
    }

    /// Reads back the most recent order.
    pub async fn get_last_order(&self) -> String {
        info!("retrieving last order");
        match self.store.load_latest().await {
            Ok(Some(stored)) => summarize(&stored.record),
            Ok(None) => "I couldn't find any previous orders.".to_string(),
            Err(e) => {
                error!(store = %self.store.dir().display(), "error retrieving last order: {}", e);
                "Sorry, I had trouble finding the last order.".to_string()
            }
        }
    }
}

fn summarize(record: &OrderRecord) -> String {
    let extras = if record.extras.is_empty() {
        "none".to_string()
    } else {
        record.extras.join(", ")
    };
    format!(
        "Found the last order: {} {} with {} milk. Extras: {}.",
        record.size, record.drink_type, record.milk, extras
    )
}
