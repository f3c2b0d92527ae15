//! Service Kit - Agent Tools
//!
//! Assistant tools implementing `agent_core::Tool`. Each one turns outside
//! failures into text for the model instead of returning an error.

mod link_lookup;
mod send_email;
mod weather;
mod web_search;

pub use link_lookup::{LinkLookupTool, lookup_link};
pub use send_email::SendEmailTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;
