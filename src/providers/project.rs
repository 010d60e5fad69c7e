//! Project provider (`key = "project"`): discovers sidecar markdown docs
//! (`GENIE.md`, then `CLAUDE.md`) co-located with the working directory
//! and with any file touched via `readFile`.

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::bus::Bus;
use crate::error::ManagerError;
use crate::events::Event;

use super::{AssemblyContext, ContextPart, ContextProvider};

const SIDECAR_NAMES: [&str; 2] = ["GENIE.md", "CLAUDE.md"];

struct Inner {
    cwd_doc: Option<PathBuf>,
    order: Vec<PathBuf>,
    docs: HashMap<PathBuf, String>,
}

/// Caches sidecar project docs, populate-once per path.
pub struct ProjectProvider {
    inner: RwLock<Inner>,
    cwd_probed: AtomicBool,
    budget: AtomicI64,
}

impl ProjectProvider {
    /// Construct the provider and subscribe it to `tool.executed`.
    #[must_use]
    pub fn new(bus: &Bus) -> Arc<Self> {
        let provider = Arc::new(Self {
            inner: RwLock::new(Inner {
                cwd_doc: None,
                order: Vec::new(),
                docs: HashMap::new(),
            }),
            cwd_probed: AtomicBool::new(false),
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
        if payload.tool_name != "readFile" {
            return;
        }
        let Some(file_path) = payload.parameters.get("file_path").and_then(|v| v.as_str()) else {
            return;
        };
        let Some(dir) = Path::new(file_path).parent() else {
            return;
        };
        self.probe_and_cache(dir);
    }

    fn probe_and_cache(&self, dir: &Path) {
        let Some((path, content)) = probe_dir(dir) else {
            return;
        };
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        insert_doc(&mut inner, path, content);
    }

    fn ensure_cwd_probed(&self, cwd: &Path) {
        if self.cwd_probed.load(Ordering::Acquire) {
            return;
        }
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.cwd_probed.load(Ordering::Acquire) {
            return;
        }
        if let Some((path, content)) = probe_dir(cwd) {
            inner.cwd_doc = Some(path.clone());
            insert_doc(&mut inner, path, content);
        }
        self.cwd_probed.store(true, Ordering::Release);
    }
}

fn insert_doc(inner: &mut Inner, path: PathBuf, content: String) {
    if inner.docs.contains_key(&path) {
        return;
    }
    inner.order.push(path.clone());
    inner.docs.insert(path, content);
}

fn probe_dir(dir: &Path) -> Option<(PathBuf, String)> {
    for name in SIDECAR_NAMES {
        let candidate = dir.join(name);
        if let Ok(content) = std::fs::read_to_string(&candidate) {
            let absolute = std::fs::canonicalize(&candidate).unwrap_or(candidate);
            return Some((absolute, content));
        }
    }
    None
}

fn render(inner: &Inner) -> String {
    let mut parts = Vec::new();
    if let Some(cwd_doc) = &inner.cwd_doc {
        if let Some(content) = inner.docs.get(cwd_doc) {
            parts.push(content.clone());
        }
    }
    for path in &inner.order {
        if inner.cwd_doc.as_ref() == Some(path) {
            continue;
        }
        if let Some(content) = inner.docs.get(path) {
            parts.push(content.clone());
        }
    }
    parts.join("\n\n")
}

#[async_trait]
impl ContextProvider for ProjectProvider {
    fn key(&self) -> &'static str {
        "project"
    }

    fn set_token_budget(&self, budget: i64) {
        self.budget.store(budget, Ordering::Relaxed);
    }

    async fn get_part(&self, ctx: &AssemblyContext) -> Result<ContextPart, ManagerError> {
        if !ctx.is_expired() {
            self.ensure_cwd_probed(&ctx.cwd);
        }
        let inner = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(ContextPart {
            key: "project".to_string(),
            content: render(&inner),
        })
    }

    fn clear_part(&self) {
        // Project docs are read-only context; clearing is a no-op.
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ToolExecutedPayload;
    use std::collections::HashMap as StdHashMap;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn expired_deadline_skips_cwd_probe() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("GENIE.md"), "# Root").expect("write doc");

        let bus = Bus::new(16);
        let provider = ProjectProvider::new(&bus);
        let mut ctx = AssemblyContext::new(dir.path().to_path_buf());
        ctx.deadline = Some(Instant::now() - Duration::from_secs(1));

        let part = provider.get_part(&ctx).await.expect("get_part");
        assert_eq!(part.content, "");
    }

    #[tokio::test]
    async fn cwd_doc_appears_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("GENIE.md"), "# Root").expect("write doc");
        let sub = dir.path().join("sub");
        std::fs::create_dir_all(&sub).expect("mkdir sub");
        std::fs::write(sub.join("GENIE.md"), "# Sub").expect("write sub doc");
        std::fs::write(sub.join("a.txt"), "hi").expect("write file");

        let bus = Bus::new(16);
        let provider = ProjectProvider::new(&bus);

        let mut parameters = StdHashMap::new();
        parameters.insert(
            "file_path".to_string(),
            serde_json::Value::String(sub.join("a.txt").to_string_lossy().to_string()),
        );
        bus.publish(Event::ToolExecuted(ToolExecutedPayload {
            execution_id: "1".to_string(),
            tool_name: "readFile".to_string(),
            parameters,
            result: StdHashMap::new(),
            message: None,
        }));
        tokio::time::sleep(Duration::from_millis(30)).await;

        let ctx = AssemblyContext::new(dir.path().to_path_buf());
        let part = provider.get_part(&ctx).await.expect("get_part");
        assert_eq!(part.content, "# Root\n\n# Sub");
    }

    #[tokio::test]
    async fn discovers_doc_via_tool_event_when_cwd_has_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("sub");
        std::fs::create_dir_all(&sub).expect("mkdir sub");
        std::fs::write(sub.join("GENIE.md"), "# Sub").expect("write sub doc");

        let bus = Bus::new(16);
        let provider = ProjectProvider::new(&bus);

        let mut parameters = StdHashMap::new();
        parameters.insert(
            "file_path".to_string(),
            serde_json::Value::String(sub.join("a.txt").to_string_lossy().to_string()),
        );
        bus.publish(Event::ToolExecuted(ToolExecutedPayload {
            execution_id: "1".to_string(),
            tool_name: "readFile".to_string(),
            parameters,
            result: StdHashMap::new(),
            message: None,
        }));
        tokio::time::sleep(Duration::from_millis(30)).await;

        let ctx = AssemblyContext::new(dir.path().to_path_buf());
        let part = provider.get_part(&ctx).await.expect("get_part");
        assert_eq!(part.content, "# Sub");
    }

    #[tokio::test]
    async fn stale_disk_content_does_not_affect_cached_doc() {
        let dir = tempfile::tempdir().expect("tempdir");
        let doc_path = dir.path().join("GENIE.md");
        std::fs::write(&doc_path, "# Original").expect("write doc");

        let bus = Bus::new(16);
        let provider = ProjectProvider::new(&bus);
        let ctx = AssemblyContext::new(dir.path().to_path_buf());
        let first = provider.get_part(&ctx).await.expect("get_part");
        assert_eq!(first.content, "# Original");

        std::fs::write(&doc_path, "# Changed").expect("rewrite doc");
        let second = provider.get_part(&ctx).await.expect("get_part");
        assert_eq!(second.content, "# Original");
    }
}
