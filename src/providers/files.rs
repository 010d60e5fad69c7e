//! Files provider (`key = "files"`): LRU-ordered cache of file contents
//! read via `readFile` tool calls.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::bus::Bus;
use crate::error::ManagerError;
use crate::events::Event;
use crate::trim::Lru;

use super::{AssemblyContext, ContextPart, ContextProvider};

struct Inner {
    stored: HashMap<String, String>,
    ordered: Vec<String>,
}

/// Most-recent-first cache of file contents.
pub struct FilesProvider {
    inner: RwLock<Inner>,
    budget: AtomicI64,
    lru: Lru,
}

impl FilesProvider {
    /// Construct the provider and subscribe it to `tool.executed`.
    #[must_use]
    pub fn new(bus: &Bus) -> Arc<Self> {
        let provider = Arc::new(Self {
            inner: RwLock::new(Inner {
                stored: HashMap::new(),
                ordered: Vec::new(),
            }),
            budget: AtomicI64::new(0),
            lru: Lru::default(),
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
        if payload.tool_name != "readFile" {
            return;
        }
        let Some(path) = payload.parameters.get("file_path").and_then(|v| v.as_str()) else {
            return;
        };
        let Some(content) = payload.result.get("results").and_then(|v| v.as_str()) else {
            return;
        };

        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.stored.insert(path.to_string(), content.to_string());
        inner.ordered.retain(|p| p != path);
        inner.ordered.insert(0, path.to_string());
    }
}

fn render(inner: &Inner, kept: &[String]) -> String {
    kept.iter()
        .filter_map(|path| {
            inner
                .stored
                .get(path)
                .map(|content| format!("File: {path}\n```\n{content}\n```"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl ContextProvider for FilesProvider {
    fn key(&self) -> &'static str {
        "files"
    }

    fn set_token_budget(&self, budget: i64) {
        self.budget.store(budget, Ordering::Relaxed);
    }

    async fn get_part(&self, _ctx: &AssemblyContext) -> Result<ContextPart, ManagerError> {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let budget = self.budget.load(Ordering::Relaxed);
        let kept = self.lru.apply(&inner.ordered, budget, |path| {
            format!(
                "File: {path}\n```\n{}\n```",
                inner.stored.get(path).map(String::as_str).unwrap_or("")
            )
        });

        Ok(ContextPart {
            key: "files".to_string(),
            content: render(&inner, &kept),
        })
    }

    fn clear_part(&self) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.stored.clear();
        inner.ordered.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
