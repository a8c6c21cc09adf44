//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test binds the mock backend on a random port and drives the client
//! through `ReqwestTransport`, so request building, envelope unwrapping and
//! error normalization are checked against real HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use asistencia_core::hooks::keys;
use asistencia_core::logging::{self, Profile};
use asistencia_core::{
    AppContext, Attendance, AttendanceRepository, AttendanceStatus, ClientConfig, ReqwestTransport,
    Severity, User, UserRepository,
};
use chrono::NaiveDate;
use mock_server::{AppState, Usuario};

async fn start_server() -> (SocketAddr, AppState) {
    logging::init(Profile::Test);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::default();
    tokio::spawn(mock_server::run_with_state(listener, state.clone()));
    (addr, state)
}

fn transport(config: &ClientConfig) -> Arc<ReqwestTransport> {
    Arc::new(ReqwestTransport::new(config).unwrap())
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn new_user(email: &str) -> User {
    User {
        id: None,
        nombre: "Marta".to_string(),
        apellido: "Rios".to_string(),
        email: email.to_string(),
        rol: "ADMIN".to_string(),
        activo: false,
        dni: "27444555".to_string(),
        tipo_documento: "DNI".to_string(),
        telefono: "351-555-0123".to_string(),
        institucion: "Escuela 12".to_string(),
    }
}

#[tokio::test]
async fn attendance_crud_lifecycle() {
    let (addr, _) = start_server().await;
    let config = ClientConfig::new(&format!("http://{addr}"));
    let repo = AttendanceRepository::new(&config.base_url, transport(&config));

    // Empty range: the server sends no list at all.
    let list = repo
        .get_all_by_grado_and_fecha(4, "2024-05-01", "2024-05-31")
        .await
        .unwrap();
    assert!(list.is_empty());

    // Create.
    let mut input = Attendance::new(date(10), AttendanceStatus::Ausente, 21, 4);
    input.justificativos = Some(Some(String::new()));
    let created = repo.create(&input).await.unwrap();
    let id = created.id.unwrap();
    assert_eq!(created.estado, AttendanceStatus::Ausente);
    assert_eq!(created.justificativos, Some(None));

    // Range now contains it, inclusive bounds.
    let list = repo
        .get_all_by_grado_and_fecha(4, "2024-05-10", "2024-05-10")
        .await
        .unwrap();
    assert_eq!(list.len(), 1);

    // Update with PATCH.
    let mut changed = created.clone();
    changed.estado = AttendanceStatus::Justificado;
    changed.justificativos = Some(Some("Certificado medico".to_string()));
    let updated = repo.update(&changed).await.unwrap();
    assert_eq!(updated.estado, AttendanceStatus::Justificado);
    assert_eq!(updated.justificacion(), Some("Certificado medico"));

    // Get.
    let fetched = repo.get_by_id(id).await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(repo.get_all().await.unwrap().len(), 1);

    // Delete, then 404 with the server's message.
    repo.delete(id).await.unwrap();
    let err = repo.get_by_id(id).await.unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.message, "Asistencia no encontrada");
    assert!(err.data.is_some());
}

#[tokio::test]
async fn inverted_range_is_an_http_error() {
    let (addr, _) = start_server().await;
    let config = ClientConfig::new(&format!("http://{addr}"));
    let repo = AttendanceRepository::new(&config.base_url, transport(&config));

    let err = repo
        .get_all_by_grado_and_fecha(4, "2024-06-01", "2024-05-01")
        .await
        .unwrap_err();
    assert_eq!(err.status, 400);
    assert_eq!(err.message, "fechaInicio posterior a fechaFin");
}

#[tokio::test]
async fn user_update_cannot_change_role_or_activation() {
    let (addr, state) = start_server().await;
    let config = ClientConfig::new(&format!("http://{addr}"));
    let repo = UserRepository::new(&config.base_url, transport(&config));

    let created = repo.create(&new_user("marta@example.com")).await.unwrap();
    assert_eq!(created.rol, mock_server::DEFAULT_ROLE);
    assert!(created.activo);

    let mut edited = created.clone();
    edited.telefono = "351-555-0999".to_string();
    edited.rol = "ADMIN".to_string();
    edited.activo = false;
    let updated = repo.update(&edited).await.unwrap();
    assert_eq!(updated.telefono, "351-555-0999");
    assert_eq!(updated.rol, mock_server::DEFAULT_ROLE);
    assert!(updated.activo);

    let fetched = repo.get_by_id(created.id.unwrap()).await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(repo.get_all().await.unwrap().len(), 1);
    assert_eq!(state.hits(), 4);

    let err = repo.create(&new_user("marta@example.com")).await.unwrap_err();
    assert_eq!(err.status, 409);
    assert_eq!(err.message, "email duplicado");
}

#[tokio::test]
async fn hooks_cache_and_invalidate_against_server() {
    let (addr, state) = start_server().await;
    let mut config = ClientConfig::new(&format!("http://{addr}"));
    config.query_stale_time = Duration::from_secs(60);
    let context = AppContext::init(config).unwrap();
    let users = context.users();

    let (a, b) = tokio::join!(users.use_users(), users.use_users());
    assert!(a.data.unwrap().is_empty());
    assert!(b.is_success());
    assert_eq!(state.hits(), 1);

    users.use_users().await;
    assert_eq!(state.hits(), 1);

    let created = users.create_user(&new_user("eva@example.com")).await;
    assert!(created.is_success());
    assert!(context.queries().is_stale(&keys::users()));
    assert_eq!(state.hits(), 2);

    let refreshed = users.use_users().await;
    assert_eq!(refreshed.data.unwrap().len(), 1);
    assert_eq!(state.hits(), 3);

    let idle = context.attendance().use_attendances_by_grado_and_fecha(0, "2024-05-01", "2024-05-31").await;
    assert!(idle.is_idle());
    assert_eq!(state.hits(), 3);

    let notes = context.notifications().snapshot();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    context.shutdown();
}

#[tokio::test]
async fn later_reads_see_changes_made_by_other_clients() {
    let (addr, state) = start_server().await;
    let context = AppContext::init(ClientConfig::new(&format!("http://{addr}"))).unwrap();

    assert!(context.users().use_users().await.data.unwrap().is_empty());
    state
        .seed_user(Usuario {
            id: 0,
            nombre: "Lucia".to_string(),
            apellido: "Paz".to_string(),
            email: "lucia@example.com".to_string(),
            rol: "DOCENTE".to_string(),
            activo: true,
            dni: String::new(),
            tipo_documento: String::new(),
            telefono: String::new(),
            institucion: String::new(),
        })
        .await;

    let again = context.users().use_users().await;
    assert_eq!(again.data.unwrap().len(), 1);
    assert_eq!(state.hits(), 2);
}

#[tokio::test]
async fn unreachable_server_is_normalized_to_500() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let mut config = ClientConfig::new(&format!("http://{addr}"));
    config.query_retry = 0;
    let context = AppContext::init(config).unwrap();

    let state = context.users().use_user(1).await;
    assert!(state.is_error());
    let err = state.error.unwrap();
    assert_eq!(err.status, 500);
    assert!(err.data.is_none());
    assert!(!err.message.is_empty());
}
