//! Shared types for the barista voice agent.
//!
//! This crate defines the order record that every other crate passes
//! around, the drink size enumeration with its pricing rule, and the agent
//! event envelope broadcast to connected clients after an order is saved.
//!
//! Orders arrive from a language model as free text, so parsing is
//! lenient: a size that is not one of the three menu sizes is kept as
//! [`DrinkSize::Unrecognized`] and priced at the base rate instead of
//! being rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

mod event;
pub use event::{AgentEvent, AGENT_EVENTS_TOPIC};

/// Price of a Tall drink, and of any drink whose size was not recognized.
pub const BASE_PRICE: u32 = 250;

/// Surcharge for a Grande over the base price.
pub const GRANDE_SURCHARGE: u32 = 50;

/// Surcharge for a Venti over the base price.
pub const VENTI_SURCHARGE: u32 = 100;

/// Cost of each entry in an order's extras list.
pub const EXTRA_PRICE: u32 = 30;

/// Drink sizes on the menu.
///
/// Serialises to the bare size label (`"Venti"`), and an unrecognized
/// label round-trips unchanged through [`DrinkSize::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrinkSize {
    Tall,
    Grande,
    Venti,
    /// Any label that is not one of the menu sizes. Priced as a Tall.
    Unrecognized(String),
}

impl DrinkSize {
    /// Parses a size label. Matching is exact, as the menu labels are
    /// proper nouns the persona is instructed to use verbatim.
    pub fn parse(label: &str) -> Self {
        Self::from(label.to_string())
    }

    /// Returns the label for this size.
    pub fn label(&self) -> &str {
        match self {
            Self::Tall => "Tall",
            Self::Grande => "Grande",
            Self::Venti => "Venti",
            Self::Unrecognized(label) => label,
        }
    }

    /// Returns the base price of a drink of this size, before extras.
    pub fn base_price(&self) -> u32 {
        match self {
            Self::Grande => BASE_PRICE + GRANDE_SURCHARGE,
            Self::Venti => BASE_PRICE + VENTI_SURCHARGE,
            Self::Tall | Self::Unrecognized(_) => BASE_PRICE,
        }
    }

    /// Returns `true` if the label was not one of the menu sizes.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for DrinkSize {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Tall" => Self::Tall,
            "Grande" => Self::Grande,
            "Venti" => Self::Venti,
            _ => Self::Unrecognized(label),
        }
    }
}

impl From<DrinkSize> for String {
    fn from(size: DrinkSize) -> Self {
        match size {
            DrinkSize::Unrecognized(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for DrinkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computes the total price of a drink: the size's base price plus a flat
/// charge per extra.
pub fn price_order(size: &DrinkSize, extras: &[String]) -> u32 {
    price_with_extra_count(size, extras.len())
}

/// Saturates at `u32::MAX` rather than wrapping.
fn price_with_extra_count(size: &DrinkSize, count: usize) -> u32 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    size.base_price().saturating_add(EXTRA_PRICE.saturating_mul(count))
}

/// The fields a customer supplies when confirming an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// The type of drink (e.g. Latte, Cappuccino).
    pub drink_type: String,
    /// The drink size.
    pub size: DrinkSize,
    /// The milk choice (e.g. Whole, Oat, Almond).
    pub milk: String,
    /// Extra customisations, in the order they were requested.
    #[serde(default)]
    pub extras: Vec<String>,
    /// The name called out when the drink is ready.
    pub name: String,
}

/// A priced order, exactly as written to disk and broadcast to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub drink_type: String,
    pub size: DrinkSize,
    pub milk: String,
    pub extras: Vec<String>,
    pub name: String,
    /// Total price in whole rupees.
    pub price: u32,
}

impl OrderRecord {
    /// Prices a request and builds the record that will be stored.
    pub fn from_request(request: OrderRequest) -> Self {
        if request.size.is_unrecognized() {
            tracing::warn!(
                size = request.size.label(),
                "unrecognized drink size, charging base price"
            );
        }
        let price = price_order(&request.size, &request.extras);
        Self {
            drink_type: request.drink_type,
            size: request.size,
            milk: request.milk,
            extras: request.extras,
            name: request.name,
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(size: &str, extras: &[&str]) -> OrderRequest {
        OrderRequest {
            drink_type: "Latte".to_string(),
            size: DrinkSize::parse(size),
            milk: "Oat".to_string(),
            extras: extras.iter().map(|e| e.to_string()).collect(),
            name: "Jon".to_string(),
        }
    }

    #[test]
    fn base_price_per_size() {
        assert_eq!(DrinkSize::Tall.base_price(), 250);
        assert_eq!(DrinkSize::Grande.base_price(), 300);
        assert_eq!(DrinkSize::Venti.base_price(), 350);
        assert_eq!(DrinkSize::parse("Trenta").base_price(), 250);
    }

    #[test]
    fn extras_add_thirty_each() {
        for size in ["Tall", "Grande", "Venti", "huge"] {
            let base = DrinkSize::parse(size).base_price();
            for k in 0..5 {
                let extras: Vec<String> = (0..k).map(|i| format!("extra {i}")).collect();
                assert_eq!(
                    price_order(&DrinkSize::parse(size), &extras),
                    base + 30 * k as u32
                );
            }
        }
    }

    #[test]
    fn venti_latte_with_two_extras_costs_410() {
        let record = OrderRecord::from_request(request("Venti", &["vanilla syrup", "extra shot"]));
        assert_eq!(record.price, 410);
    }

    #[test]
    fn price_saturates_instead_of_wrapping() {
        assert_eq!(price_with_extra_count(&DrinkSize::Venti, 2), 410);
        assert_eq!(
            price_with_extra_count(&DrinkSize::Venti, u32::MAX as usize / 30),
            u32::MAX
        );
        assert_eq!(price_with_extra_count(&DrinkSize::Tall, usize::MAX), u32::MAX);
    }

    #[test]
    fn size_parse_matches_deserialisation() {
        for label in ["Tall", "Grande", "Venti", "large"] {
            assert_eq!(DrinkSize::parse(label), DrinkSize::from(label.to_string()));
        }
    }

    #[test]
    fn size_parse_is_case_sensitive() {
        assert_eq!(
            DrinkSize::parse("venti"),
            DrinkSize::Unrecognized("venti".to_string())
        );
        assert!(DrinkSize::parse("venti").is_unrecognized());
        assert!(!DrinkSize::Grande.is_unrecognized());
    }

    #[test]
    fn record_serialises_with_camel_case_keys() {
        let record = OrderRecord::from_request(request("Grande", &["caramel drizzle"]));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["drinkType"], "Latte");
        assert_eq!(value["size"], "Grande");
        assert_eq!(value["milk"], "Oat");
        assert_eq!(value["extras"], serde_json::json!(["caramel drizzle"]));
        assert_eq!(value["name"], "Jon");
        assert_eq!(value["price"], 330);
    }

    #[test]
    fn unrecognized_size_keeps_its_label_on_disk() {
        let record = OrderRecord::from_request(request("Medium", &[]));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"size\":\"Medium\""));
        let back: OrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.size, DrinkSize::Unrecognized("Medium".to_string()));
        assert_eq!(back.price, 250);
    }

    #[test]
    fn request_extras_default_to_empty() {
        let req: OrderRequest = serde_json::from_str(
            r#"{"drink_type":"Mocha","size":"Tall","milk":"Whole","name":"Ana"}"#,
        )
        .unwrap();
        assert!(req.extras.is_empty());
        assert_eq!(req.size, DrinkSize::Tall);
    }
}
