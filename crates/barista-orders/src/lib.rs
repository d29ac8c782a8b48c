//! Durable order storage for the barista agent.
//!
//! Every confirmed order is written once, as its own pretty-printed JSON
//! file, into a single store directory. Files are never rewritten or
//! deleted; "the usual" is simply whichever order file was modified most
//! recently.
//!
//! # File naming
//!
//! | Order | File name |
//! |-------|-----------|
//! | first order created in second `S` | `order_S.json` |
//! | `n`-th further order in second `S` | `order_S_n.json` |
//!
//! Records are written to a hidden temporary file and then hard-linked under
//! their final name. Linking never replaces an existing file, so two writers
//! racing within the same second always end up with distinct names, and a
//! reader never sees a half-written order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use barista_orders::OrderStore;
//!
//! let store = OrderStore::new("orders");
//! let saved = store.save(request).await?;
//! println!("total: {}", saved.record.price);
//!
//! if let Some(latest) = store.load_latest().await? {
//!     println!("the usual is a {} {}", latest.record.size, latest.record.drink_type);
//! }
//! ```

mod error;
mod id;
mod store;

pub use error::OrderError;
pub use id::{OrderId, ParseOrderIdError};
pub use store::{OrderStore, StoredOrder};
