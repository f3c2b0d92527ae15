//! Link Lookup Tool
//!
//! Download and website links for a few well-known applications. No network.

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

/// (lookup key, display name, url)
const LINKS: &[(&str, &str, &str)] = &[
    ("capcut", "CapCut", "https://www.capcut.com/"),
    ("vs code", "VS Code", "https://code.visualstudio.com/download"),
    ("anaconda", "Anaconda", "https://www.anaconda.com/download"),
];

/// Resolve an application name to a markdown link message.
///
/// Keys are matched after trimming and lowercasing, so `"  CapCut "` and
/// `"capcut"` produce the same text.
pub fn lookup_link(app_name: &str) -> String {
    let name = app_name.trim();
    let key = name.to_lowercase();

    match LINKS.iter().find(|(k, _, _)| *k == key) {
        Some((_, display, url)) => format!("Here is the link for {display}: [{url}]({url})"),
        None => format!(
            "Sorry, I don't have a pre-defined link for {name}. You can ask me to search the web for it."
        ),
    }
}

pub struct LinkLookupTool;

#[async_trait]
impl Tool for LinkLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_link".into(),
            description: "Provides a download or website link for a specific, known application. \
                Use this tool when a user asks for a link to an app in the knowledge base."
                .into(),
            parameters: vec![ParameterSchema::string(
                "app_name",
                "Name of the application, e.g. 'CapCut', 'VS Code' or 'Anaconda'",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let app_name = call.str_arg("app_name").unwrap_or_default();
        Ok(ToolResult::success("get_link", lookup_link(&app_name)))
    }
}
