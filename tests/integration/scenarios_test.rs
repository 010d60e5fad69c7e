use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use geniecore::providers::{ChatProvider, FilesProvider, ProjectProvider, TodoProvider};
use geniecore::{AssemblyContext, Bus, ContextManager, ContextProvider, Event, Registry};
use serde_json::json;

use geniecore::events::{ChatResponsePayload, ToolExecutedPayload};

fn tool_executed(tool_name: &str, parameters: HashMap<String, serde_json::Value>, result: HashMap<String, serde_json::Value>) -> Event {
    Event::ToolExecuted(ToolExecutedPayload {
        execution_id: "1".to_string(),
        tool_name: tool_name.to_string(),
        parameters,
        result,
        message: None,
    })
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

#[tokio::test]
async fn chat_accumulates_in_order() {
    let bus = Bus::new(16);
    let mut registry = Registry::new();
    registry.register(ChatProvider::new(&bus), 1.0);
    let manager = ContextManager::new(registry);
    manager.set_context_budget(10_000);

    bus.publish(Event::ChatResponse(ChatResponsePayload {
        message: "Hi".to_string(),
        response: "Hello".to_string(),
        error: None,
    }));
    bus.publish(Event::ChatResponse(ChatResponsePayload {
        message: "Bye".to_string(),
        response: "Later".to_string(),
        error: None,
    }));
    settle().await;

    let ctx = AssemblyContext::new(std::env::temp_dir());
    let parts = manager.get_context_parts(&ctx).await.expect("assemble");
    assert_eq!(
        parts.get("chat"),
        Some(&"User: Hi\nGenie: Hello\nUser: Bye\nGenie: Later".to_string())
    );
}

#[tokio::test]
async fn project_doc_discovered_via_tool_event() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sub = dir.path().join("sub");
    std::fs::create_dir_all(&sub).expect("mkdir sub");
    std::fs::write(sub.join("GENIE.md"), "# Sub").expect("write doc");

    let bus = Bus::new(16);
    let mut registry = Registry::new();
    registry.register(ProjectProvider::new(&bus), 1.0);
    let manager = ContextManager::new(registry);
    manager.set_context_budget(10_000);

    let mut parameters = HashMap::new();
    parameters.insert(
        "file_path".to_string(),
        json!(sub.join("a.txt").to_string_lossy().to_string()),
    );
    bus.publish(tool_executed("readFile", parameters, HashMap::new()));
    settle().await;

    let ctx = AssemblyContext::new(dir.path().to_path_buf());
    let parts = manager.get_context_parts(&ctx).await.expect("assemble");
    assert_eq!(parts.get("project"), Some(&"# Sub".to_string()));
}

#[tokio::test]
async fn files_lru_ordering_and_fencing() {
    let bus = Bus::new(16);
    let mut registry = Registry::new();
    registry.register(FilesProvider::new(&bus), 1.0);
    let manager = ContextManager::new(registry);
    manager.set_context_budget(10_000);

    for (path, content) in [("/a.go", "pkg a"), ("/b.go", "pkg b"), ("/a.go", "pkg a")] {
        let mut parameters = HashMap::new();
        parameters.insert("file_path".to_string(), json!(path));
        let mut result = HashMap::new();
        result.insert("results".to_string(), json!(content));
        bus.publish(tool_executed("readFile", parameters, result));
        settle().await;
    }

    let ctx = AssemblyContext::new(std::env::temp_dir());
    let parts = manager.get_context_parts(&ctx).await.expect("assemble");
    let files = parts.get("files").expect("files part present");
    assert!(files.starts_with("File: /a.go\n```\npkg a\n```"));
    assert!(files.contains("File: /b.go\n```\npkg b\n```"));
}

#[tokio::test]
async fn todos_sorted_by_completion_then_priority() {
    let bus = Bus::new(16);
    let mut registry = Registry::new();
    registry.register(TodoProvider::new(&bus), 1.0);
    let manager = ContextManager::new(registry);
    manager.set_context_budget(10_000);

    let mut result = HashMap::new();
    result.insert(
        "todos".to_string(),
        json!([
            {"id": "1", "content": "high in_progress", "status": "in_progress", "priority": "high"},
            {"id": "2", "content": "high completed", "status": "completed", "priority": "high"},
            {"id": "3", "content": "low completed", "status": "completed", "priority": "low"},
            {"id": "4", "content": "medium pending", "status": "pending", "priority": "medium"},
        ]),
    );
    bus.publish(tool_executed("TodoWrite", HashMap::new(), result));
    settle().await;

    let ctx = AssemblyContext::new(std::env::temp_dir());
    let parts = manager.get_context_parts(&ctx).await.expect("assemble");
    let todo = parts.get("todo").expect("todo part present");
    let lines: Vec<&str> = todo.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[x] high completed",
            "[x] low completed",
            "[~] high in_progress",
            "[ ] medium pending",
        ]
    );
}

// Needs real OS-thread concurrency: see the matching note on
// `bus::tests::drops_on_queue_overflow`.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn drop_on_overflow_reports_exactly_one() {
    let bus = Bus::new(1);
    let seen: Arc<std::sync::Mutex<Vec<String>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen_handler = Arc::clone(&seen);
    let gate = Arc::new(tokio::sync::Notify::new());
    let gate_handler = Arc::clone(&gate);

    bus.subscribe(
        "chat.started",
        Arc::new(move |event: &Event| {
            if let Event::ChatStarted(payload) = event {
                if payload.message == "first" {
                    std::thread::sleep(Duration::from_millis(80));
                    gate_handler.notify_one();
                }
                seen_handler
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(payload.message.clone());
            }
        }),
    );

    let started = |m: &str| {
        Event::ChatStarted(geniecore::events::ChatStartedPayload {
            message: m.to_string(),
        })
    };
    bus.publish(started("first"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    bus.publish(started("second"));
    tokio::time::sleep(Duration::from_millis(5)).await;
    bus.publish(started("third"));

    gate.notified().await;
    settle().await;

    assert_eq!(bus.dropped_count(), 1);
    let seen = seen.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    assert_eq!(*seen, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn budget_distribution_across_two_shares() {
    let bus = Bus::new(16);
    let mut registry = Registry::new();
    let chat = ChatProvider::new(&bus);
    let files = FilesProvider::new(&bus);
    registry.register(Arc::clone(&chat) as Arc<dyn ContextProvider>, 1.0);
    registry.register(Arc::clone(&files) as Arc<dyn ContextProvider>, 3.0);
    let manager = ContextManager::new(registry);

    manager.set_context_budget(4_000);

    bus.publish(Event::ChatResponse(ChatResponsePayload {
        message: "x".repeat(1_000),
        response: "y".repeat(1_000),
        error: None,
    }));
    settle().await;

    let ctx = AssemblyContext::new(std::env::temp_dir());
    let parts = manager.get_context_parts(&ctx).await.expect("assemble");
    assert!(parts.contains_key("chat"));
}
