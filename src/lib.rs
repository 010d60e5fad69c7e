//! Context assembly core: an in-process event bus plus a budgeted,
//! multi-source context aggregator for an interactive AI coding assistant.
//!
//! The crate has two halves that only meet at the provider layer:
//!
//! - [`bus`] carries [`events::Event`]s from producers (the LLM layer, tool
//!   executors, the UI) to subscribed handlers, per-topic and in order.
//! - [`providers`] hold private state fed by bus events and expose a
//!   uniform [`providers::ContextProvider::get_part`] used by
//!   [`manager::ContextManager`] to assemble a budgeted, named-part map
//!   ready to splice into a prompt.
//!
//! Token budgeting ([`token`]) and trimming ([`trim`]) are deliberately
//! deterministic — no tokenizer, no model call — so that assembly is
//! reproducible in tests.

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod logging;
pub mod manager;
pub mod providers;
pub mod registry;
pub mod token;
pub mod trim;

pub use bus::Bus;
pub use error::ManagerError;
pub use events::Event;
pub use history::InputHistory;
pub use manager::ContextManager;
pub use providers::{AssemblyContext, ContextPart, ContextProvider, Message};
pub use registry::Registry;
