//! Todo provider (`key = "todo"`): renders the most recent `TodoWrite`
//! tool result as a checklist, sorted by completion then priority.

use std::any::Any;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bus::Bus;
use crate::error::ManagerError;
use crate::events::Event;

use super::{AssemblyContext, ContextPart, ContextProvider};

/// A decoded todo record. Status and priority are kept as loose strings
/// (not closed enums) — `GetPart`'s `[?] ...; other` render branch exists
/// precisely because validation only checks key presence, not that the
/// values fall within the documented `{pending,in_progress,completed}` /
/// `{high,medium,low}` sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTodoItem {
    id: String,
    content: String,
    status: String,
    priority: String,
}

fn status_rank(status: &str) -> u8 {
    if status == "completed" {
        0
    } else {
        1
    }
}

fn priority_rank(priority: &str) -> u8 {
    match priority {
        "high" => 0,
        "medium" => 1,
        "low" => 2,
        _ => 3,
    }
}

fn symbol_for(status: &str) -> &'static str {
    match status {
        "completed" => "[x]",
        "in_progress" => "[~]",
        "pending" => "[ ]",
        _ => "[?]",
    }
}

/// Caches the most recently validated `TodoWrite` result.
pub struct TodoProvider {
    stored: RwLock<String>,
    budget: AtomicI64,
}

impl TodoProvider {
    /// Construct the provider and subscribe it to `tool.executed`.
    #[must_use]
    pub fn new(bus: &Bus) -> Arc<Self> {
        let provider = Arc::new(Self {
            stored: RwLock::new(String::new()),
            budget: AtomicI64::new(0),
        });

        let handler_provider = Arc::clone(&provider);
        bus.subscribe(
            "tool.executed",
            Arc::new(move |event: &Event| {
                handler_provider.handle(event);
            }),
        );

        provider
    }

    fn handle(&self, event: &Event) {
        let Event::ToolExecuted(payload) = event else {
            return;
        };
        if payload.tool_name != "TodoWrite" {
            return;
        }
        let Some(todos) = payload.result.get("todos") else {
            return;
        };

        match serde_json::from_value::<Vec<RawTodoItem>>(todos.clone()) {
            Ok(items) => {
                let canonical = serde_json::to_string(&items)
                    .unwrap_or_else(|_| "[]".to_string());
                let mut stored = self
                    .stored
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                *stored = canonical;
            }
            Err(e) => {
                warn!(error = %e, "TodoWrite payload failed validation, keeping prior todos");
            }
        }
    }
}

fn render(stored: &str) -> String {
    if stored.is_empty() {
        return String::new();
    }
    let mut items: Vec<RawTodoItem> = serde_json::from_str(stored).unwrap_or_default();
    items.sort_by(|a, b| {
        match status_rank(&a.status).cmp(&status_rank(&b.status)) {
            CmpOrdering::Equal => priority_rank(&a.priority).cmp(&priority_rank(&b.priority)),
            other => other,
        }
    });

    items
        .iter()
        .map(|item| format!("{} {}\n", symbol_for(&item.status), item.content))
        .collect()
}

#[async_trait]
impl ContextProvider for TodoProvider {
    fn key(&self) -> &'static str {
        "todo"
    }

    fn set_token_budget(&self, budget: i64) {
        self.budget.store(budget, Ordering::Relaxed);
    }

    async fn get_part(&self, _ctx: &AssemblyContext) -> Result<ContextPart, ManagerError> {
        let stored = self
            .stored
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(ContextPart {
            key: "todo".to_string(),
            content: render(&stored),
        })
    }

    fn clear_part(&self) {
        let mut stored = self
            .stored
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        stored.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
