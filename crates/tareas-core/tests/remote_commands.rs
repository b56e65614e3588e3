use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use mockito::Matcher;
use serde_json::json;
use tareas_core::cli::{AddArgs, Command, ListArgs, StatusArg};
use tareas_core::commands::{Console, run_remote};
use tareas_core::render::Renderer;
use tareas_shared::view::RenderContext;
use tareas_shared::{EMPTY_PLACEHOLDER, RemoteClient, RemoteSession};

const LIST_BODY: &str = r#"[
  {"_id": "a1", "Nombre": "Pay rent", "Categoria": "Home", "Descripcion": "",
   "Prioridad": "Alta", "Estatus": "Pendiente",
   "Fecha": "2025-01-01T09:00:00", "Fin": "2024-12-31T00:00:00"},
  {"_id": "b2", "Nombre": "File taxes", "Categoria": "Admin", "Descripcion": "",
   "Prioridad": "Completada", "Fecha": "2025-01-01T09:00:00", "Fin": "2025-03-01T00:00:00"}
]"#;

const AFTER_DELETE_BODY: &str = r#"[
  {"_id": "b2", "Nombre": "File taxes", "Categoria": "Admin", "Descripcion": "",
   "Prioridad": "Completada", "Fecha": "2025-01-01T09:00:00", "Fin": "2025-03-01T00:00:00"}
]"#;

fn ctx() -> RenderContext {
    RenderContext {
        now: NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid now"),
        near_due_days: 7,
    }
}

async fn run(session: &RemoteSession, command: Command, answer: &str) -> String {
    let mut console = Console::new(answer.as_bytes(), Vec::new());
    run_remote(session, command, &ctx(), &Renderer::new(false), &mut console)
        .await
        .expect("run command");
    String::from_utf8(console.output).expect("utf8")
}

#[tokio::test]
async fn list_shows_legacy_completed_tasks_under_completed_filter() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/actividades")
        .with_status(200)
        .with_body(LIST_BODY)
        .create_async()
        .await;

    let session = RemoteSession::new(RemoteClient::new(&server.url()));
    let out = run(
        &session,
        Command::List(ListArgs {
            status: StatusArg::Completed,
            category: String::new(),
        }),
        "",
    )
    .await;

    assert!(out.contains("File taxes"));
    assert!(!out.contains("Pay rent"));
    assert!(!out.contains("Completada"));
}

#[tokio::test]
async fn add_posts_default_due_and_refetches() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/actividades")
        .match_body(Matcher::PartialJson(json!({
            "Nombre": "Call bank",
            "Estatus": "Pendiente",
            "Fin": "2025-01-01T00:00:00"
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;
    let list = server
        .mock("GET", "/actividades")
        .with_status(200)
        .with_body(LIST_BODY)
        .expect(2)
        .create_async()
        .await;

    let session = RemoteSession::new(RemoteClient::new(&server.url()));
    let out = run(
        &session,
        Command::Add(AddArgs {
            name: "  Call bank ".to_string(),
            category: String::new(),
            description: String::new(),
            priority: String::new(),
            due: None,
        }),
        "",
    )
    .await;

    create.assert_async().await;
    list.assert_async().await;
    assert!(out.starts_with("Task submitted."));
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/actividades")
        .with_status(200)
        .with_body(LIST_BODY)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/actividades/a1")
        .expect(0)
        .create_async()
        .await;

    let session = RemoteSession::new(RemoteClient::new(&server.url()));
    let out = run(
        &session,
        Command::Delete {
            id: "a1".to_string(),
            yes: false,
        },
        "\n",
    )
    .await;

    delete.assert_async().await;
    assert!(out.contains("Nothing deleted."));
}

#[tokio::test]
async fn rejected_delete_keeps_the_last_list() {
    let mut server = mockito::Server::new_async().await;
    let list = server
        .mock("GET", "/actividades")
        .with_status(200)
        .with_body(LIST_BODY)
        .expect(1)
        .create_async()
        .await;
    let _delete = server
        .mock("DELETE", "/actividades/a1")
        .with_status(500)
        .create_async()
        .await;

    let session = RemoteSession::new(RemoteClient::new(&server.url()));
    let out = run(
        &session,
        Command::Delete {
            id: "a1".to_string(),
            yes: true,
        },
        "",
    )
    .await;

    list.assert_async().await;
    assert!(out.contains("The service did not apply the change."));
    assert!(out.contains("Pay rent"));
    assert!(!out.contains(EMPTY_PLACEHOLDER));
}

#[tokio::test]
async fn applied_delete_renders_the_refetched_list() {
    let mut server = mockito::Server::new_async().await;
    let gets = Arc::new(AtomicUsize::new(0));
    let list = {
        let gets = Arc::clone(&gets);
        server
            .mock("GET", "/actividades")
            .with_status(200)
            .with_body_from_request(move |_| {
                if gets.fetch_add(1, Ordering::SeqCst) == 0 {
                    LIST_BODY.into()
                } else {
                    AFTER_DELETE_BODY.into()
                }
            })
            .expect(2)
            .create_async()
            .await
    };
    let delete = server
        .mock("DELETE", "/actividades/a1")
        .with_status(200)
        .create_async()
        .await;

    let session = RemoteSession::new(RemoteClient::new(&server.url()));
    let out = run(
        &session,
        Command::Delete {
            id: "a1".to_string(),
            yes: true,
        },
        "",
    )
    .await;

    delete.assert_async().await;
    list.assert_async().await;
    assert!(out.starts_with("Task deleted."));
    assert!(!out.contains("Pay rent"));
    assert!(out.contains("File taxes"));
}
