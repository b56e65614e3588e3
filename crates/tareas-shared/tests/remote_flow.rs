use std::cell::RefCell;

use mockito::Matcher;
use serde_json::json;
use tareas_shared::{
  ActividadPayload,
  FetchTickets,
  MutationOutcome,
  RemoteClient,
  RemoteSession,
  Submission,
  TaskStatus
};

const LIST_BODY: &str = r#"[
  {
    "_id": "a1",
    "Nombre": "Pay rent",
    "Categoria": "Home",
    "Descripcion": "",
    "Prioridad": "Alta",
    "Estatus": "Pendiente",
    "Fecha": "2025-01-01T09:00:00",
    "Fin": "2025-01-31T00:00:00"
  }
]"#;

fn payload(name: &str) -> ActividadPayload {
  ActividadPayload {
    name:        name.to_string(),
    category:    "Home".to_string(),
    description: String::new(),
    priority:    None,
    due:         None,
    status:      TaskStatus::Pending
  }
}

#[tokio::test]
async fn list_decodes_service_documents() {
  let mut server =
    mockito::Server::new_async().await;
  let list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_header(
      "content-type",
      "application/json"
    )
    .with_body(LIST_BODY)
    .create_async()
    .await;

  let client = RemoteClient::new(&format!(
    "{}/",
    server.url()
  ));
  let tasks =
    client.list().await.expect("list");

  list.assert_async().await;
  assert_eq!(tasks.len(), 1);
  assert_eq!(tasks[0].id, "a1");
  assert_eq!(tasks[0].name, "Pay rent");
  assert_eq!(
    tasks[0].status,
    TaskStatus::Pending
  );
}

#[tokio::test]
async fn applied_mutation_triggers_refetch() {
  let mut server =
    mockito::Server::new_async().await;
  let create = server
    .mock("POST", "/actividades")
    .match_body(Matcher::PartialJson(json!({
      "Nombre": "Pay rent",
      "Estatus": "Pendiente"
    })))
    .with_status(200)
    .with_body("{}")
    .create_async()
    .await;
  let list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_body(LIST_BODY)
    .expect(1)
    .create_async()
    .await;

  let session = RemoteSession::new(
    RemoteClient::new(&server.url())
  );
  let refreshed = session
    .create_and_refresh(&payload("Pay rent"))
    .await
    .expect("create");

  create.assert_async().await;
  list.assert_async().await;
  assert_eq!(
    refreshed.map(|tasks| tasks.len()),
    Some(1)
  );
}

#[tokio::test]
async fn rejected_mutation_is_swallowed_without_refetch(
) {
  let mut server =
    mockito::Server::new_async().await;
  let delete = server
    .mock("DELETE", "/actividades/a1")
    .with_status(500)
    .create_async()
    .await;
  let list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_body(LIST_BODY)
    .expect(0)
    .create_async()
    .await;

  let client = RemoteClient::new(&server.url());
  assert_eq!(
    client.delete("a1").await.expect("delete"),
    MutationOutcome::Rejected(
      reqwest::StatusCode::INTERNAL_SERVER_ERROR
    )
  );

  let session = RemoteSession::new(client);
  let refreshed = session
    .delete_and_refresh("a1")
    .await
    .expect("delete");

  delete.assert_async().await;
  list.assert_async().await;
  assert_eq!(refreshed, None);
}

#[tokio::test]
async fn toggle_sends_flipped_status() {
  let mut server =
    mockito::Server::new_async().await;
  let update = server
    .mock("PUT", "/actividades/a1")
    .match_body(Matcher::PartialJson(json!({
      "Estatus": "Completada",
      "Nombre": "Pay rent",
      "Prioridad": "Alta"
    })))
    .with_status(200)
    .create_async()
    .await;
  let _list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_body(LIST_BODY)
    .create_async()
    .await;

  let client = RemoteClient::new(&server.url());
  let tasks = client.list().await.expect("list");
  let session = RemoteSession::new(client);

  session
    .toggle_and_refresh(&tasks[0])
    .await
    .expect("toggle");
  update.assert_async().await;
}

#[tokio::test]
async fn submit_refetches_even_when_rejected() {
  let mut server =
    mockito::Server::new_async().await;
  let update = server
    .mock("PUT", "/actividades/a1")
    .with_status(422)
    .create_async()
    .await;
  let list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_body(LIST_BODY)
    .expect(1)
    .create_async()
    .await;

  let session = RemoteSession::new(
    RemoteClient::new(&server.url())
  );
  let tasks = session
    .submit(Submission::Update {
      key:   "a1".to_string(),
      draft: payload("renamed")
    })
    .await
    .expect("submit");

  update.assert_async().await;
  list.assert_async().await;
  assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn get_maps_not_found_to_none() {
  let mut server =
    mockito::Server::new_async().await;
  let _missing = server
    .mock("GET", "/actividades/zz")
    .with_status(404)
    .create_async()
    .await;

  let client = RemoteClient::new(&server.url());
  assert_eq!(
    client.get("zz").await.expect("get"),
    None
  );
}

#[tokio::test]
async fn list_ticket_is_issued_after_the_mutation_lands() {
  let mut server =
    mockito::Server::new_async().await;
  let update = server
    .mock("PUT", "/actividades/a1")
    .with_status(200)
    .create_async()
    .await;
  let _list = server
    .mock("GET", "/actividades")
    .with_status(200)
    .with_body(LIST_BODY)
    .create_async()
    .await;

  let client = RemoteClient::new(&server.url());
  let tasks = client.list().await.expect("list");
  let session = RemoteSession::new(client);
  let tickets =
    RefCell::new(FetchTickets::default());
  let order = RefCell::new(Vec::new());

  let landed = session
    .then_refresh(
      async {
        let outcome = session
          .toggle(&tasks[0])
          .await?;
        order.borrow_mut().push("mutation");
        Ok::<_, anyhow::Error>(outcome.report("toggle"))
      },
      || {
        order.borrow_mut().push("ticket");
        tickets.borrow_mut().issue()
      }
    )
    .await
    .expect("toggle");

  update.assert_async().await;
  assert_eq!(*order.borrow(), vec!["mutation", "ticket"]);
  let (ticket, listed) =
    landed.expect("applied toggle refetches");
  assert_eq!(listed.len(), 1);

  // A list requested after this one must win over it.
  let later = tickets.borrow_mut().issue();
  assert!(later > ticket);
}

#[tokio::test]
async fn rejected_mutation_takes_no_ticket() {
  let mut server =
    mockito::Server::new_async().await;
  let _delete = server
    .mock("DELETE", "/actividades/a1")
    .with_status(404)
    .create_async()
    .await;
  let list = server
    .mock("GET", "/actividades")
    .expect(0)
    .create_async()
    .await;

  let session = RemoteSession::new(
    RemoteClient::new(&server.url())
  );
  let tickets =
    RefCell::new(FetchTickets::default());

  let landed = session
    .then_refresh(
      async {
        let outcome = session
          .client()
          .delete("a1")
          .await?;
        Ok::<_, anyhow::Error>(outcome.report("delete"))
      },
      || tickets.borrow_mut().issue()
    )
    .await
    .expect("delete");

  assert!(landed.is_none());
  list.assert_async().await;
  assert_eq!(
    tickets.borrow_mut().issue(),
    FetchTickets::default().issue()
  );
}
