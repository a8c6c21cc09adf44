//! In-memory backend speaking the asistencia REST contract.
//!
//! Attendance routes answer with `{estado, message, data | dataIterable}`,
//! user routes with `{dataIterable}` for both single users and lists. Every
//! request is counted so client tests can observe caching.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asistencia {
    pub id: i64,
    pub fecha: NaiveDate,
    pub estado: String,
    pub estudiante: i64,
    pub grado: i64,
    pub justificativos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porcentaje_asistencia: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_estudiante: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsistencia {
    pub fecha: NaiveDate,
    pub estado: String,
    pub estudiante: i64,
    pub grado: i64,
    pub justificativos: Option<String>,
}

/// Partial update: only the keys present in the JSON are applied.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsistenciaPatch {
    pub id: Option<i64>,
    pub fecha: Option<NaiveDate>,
    pub estado: Option<String>,
    pub estudiante: Option<i64>,
    pub grado: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub justificativos: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub rol: String,
    pub activo: bool,
    pub dni: String,
    pub tipo_documento: String,
    pub telefono: String,
    pub institucion: String,
}

/// Profile fields accepted on create and update. `rol` and `activo` are
/// not writable through these routes.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioInput {
    pub id: Option<i64>,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub tipo_documento: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub institucion: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
}

pub const DEFAULT_ROLE: &str = "USUARIO";

const ESTADOS: [&str; 5] = ["PRESENTE", "AUSENTE", "TARDE", "JUSTIFICADO", "SIN_REGISTRO"];

#[derive(Default)]
pub struct Db {
    next_id: i64,
    pub asistencias: BTreeMap<i64, Asistencia>,
    pub usuarios: BTreeMap<i64, Usuario>,
}

impl Db {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Arc<RwLock<Db>>,
    hits: Arc<AtomicUsize>,
}

impl AppState {
    /// Requests served since start.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Insert a user directly, bypassing the profile-only write routes.
    pub async fn seed_user(&self, mut usuario: Usuario) -> Usuario {
        let mut db = self.db.write().await;
        usuario.id = db.next_id();
        db.usuarios.insert(usuario.id, usuario.clone());
        usuario
    }
}

type Reply = (StatusCode, Json<Value>);

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "estado": false, "message": message })))
}

fn ok_data<T: Serialize>(status: StatusCode, message: &str, data: T) -> Reply {
    (status, Json(json!({ "estado": true, "message": message, "data": data })))
}

fn ok_list<T: Serialize>(message: &str, items: Vec<T>) -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "estado": true, "message": message, "dataIterable": items })),
    )
}

fn user_reply<T: Serialize>(status: StatusCode, payload: T) -> Reply {
    (status, Json(json!({ "dataIterable": payload })))
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/asistencia/getAll", get(list_asistencias))
        .route("/asistencia/fechaAndGrado/{grado_id}", get(list_by_grado_and_fecha))
        .route("/asistencia/add", post(create_asistencia))
        .route("/asistencia/update", patch(update_asistencia))
        .route("/asistencia/{id}", get(get_asistencia).delete(delete_asistencia))
        .route("/user/getAll", get(list_usuarios))
        .route("/user/add", post(create_usuario))
        .route("/user/update", put(update_usuario))
        .route("/user/{id}", get(get_usuario).delete(delete_usuario))
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(method = %request.method(), uri = %request.uri(), "request");
    next.run(request).await
}

async fn list_asistencias(State(state): State<AppState>) -> Reply {
    let db = state.db.read().await;
    ok_list("ok", db.asistencias.values().cloned().collect())
}

async fn list_by_grado_and_fecha(
    State(state): State<AppState>,
    Path(grado_id): Path<i64>,
    Query(range): Query<RangeParams>,
) -> Reply {
    if range.fecha_inicio > range.fecha_fin {
        return fail(StatusCode::BAD_REQUEST, "fechaInicio posterior a fechaFin");
    }
    let db = state.db.read().await;
    let items: Vec<Asistencia> = db
        .asistencias
        .values()
        .filter(|a| a.grado == grado_id && a.fecha >= range.fecha_inicio && a.fecha <= range.fecha_fin)
        .cloned()
        .collect();
    if items.is_empty() {
        // No list at all when nothing matches.
        return (
            StatusCode::OK,
            Json(json!({ "estado": true, "message": "sin registros" })),
        );
    }
    ok_list("ok", items)
}

async fn get_asistencia(State(state): State<AppState>, Path(id): Path<i64>) -> Reply {
    let db = state.db.read().await;
    match db.asistencias.get(&id) {
        Some(a) => ok_data(StatusCode::OK, "ok", a),
        None => fail(StatusCode::NOT_FOUND, "Asistencia no encontrada"),
    }
}

async fn create_asistencia(State(state): State<AppState>, Json(input): Json<NewAsistencia>) -> Reply {
    if !ESTADOS.contains(&input.estado.as_str()) {
        return fail(StatusCode::BAD_REQUEST, "estado invalido");
    }
    let mut db = state.db.write().await;
    let asistencia = Asistencia {
        id: db.next_id(),
        fecha: input.fecha,
        estado: input.estado,
        estudiante: input.estudiante,
        grado: input.grado,
        justificativos: input.justificativos,
        porcentaje_asistencia: None,
        nombre_estudiante: None,
    };
    db.asistencias.insert(asistencia.id, asistencia.clone());
    ok_data(StatusCode::CREATED, "Asistencia registrada", asistencia)
}

async fn update_asistencia(State(state): State<AppState>, Json(input): Json<AsistenciaPatch>) -> Reply {
    let Some(id) = input.id else {
        return fail(StatusCode::BAD_REQUEST, "id requerido");
    };
    if let Some(estado) = &input.estado {
        if !ESTADOS.contains(&estado.as_str()) {
            return fail(StatusCode::BAD_REQUEST, "estado invalido");
        }
    }
    let mut db = state.db.write().await;
    let Some(asistencia) = db.asistencias.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "Asistencia no encontrada");
    };
    if let Some(fecha) = input.fecha {
        asistencia.fecha = fecha;
    }
    if let Some(estado) = input.estado {
        asistencia.estado = estado;
    }
    if let Some(estudiante) = input.estudiante {
        asistencia.estudiante = estudiante;
    }
    if let Some(grado) = input.grado {
        asistencia.grado = grado;
    }
    if let Some(justificativos) = input.justificativos {
        asistencia.justificativos = justificativos;
    }
    ok_data(StatusCode::OK, "Asistencia actualizada", asistencia.clone())
}

async fn delete_asistencia(State(state): State<AppState>, Path(id): Path<i64>) -> Reply {
    let mut db = state.db.write().await;
    match db.asistencias.remove(&id) {
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "estado": true, "message": "Asistencia eliminada" })),
        ),
        None => fail(StatusCode::NOT_FOUND, "Asistencia no encontrada"),
    }
}

async fn list_usuarios(State(state): State<AppState>) -> Reply {
    let db = state.db.read().await;
    let items: Vec<Usuario> = db.usuarios.values().cloned().collect();
    user_reply(StatusCode::OK, items)
}

async fn get_usuario(State(state): State<AppState>, Path(id): Path<i64>) -> Reply {
    let db = state.db.read().await;
    match db.usuarios.get(&id) {
        Some(u) => user_reply(StatusCode::OK, u),
        None => fail(StatusCode::NOT_FOUND, "Usuario no encontrado"),
    }
}

async fn create_usuario(State(state): State<AppState>, Json(input): Json<UsuarioInput>) -> Reply {
    let mut db = state.db.write().await;
    if db.usuarios.values().any(|u| u.email == input.email) {
        return fail(StatusCode::CONFLICT, "email duplicado");
    }
    let usuario = Usuario {
        id: db.next_id(),
        nombre: input.nombre,
        apellido: input.apellido,
        email: input.email,
        rol: DEFAULT_ROLE.to_string(),
        activo: true,
        dni: input.dni,
        tipo_documento: input.tipo_documento,
        telefono: input.telefono,
        institucion: input.institucion,
    };
    db.usuarios.insert(usuario.id, usuario.clone());
    user_reply(StatusCode::CREATED, usuario)
}

async fn update_usuario(State(state): State<AppState>, Json(input): Json<UsuarioInput>) -> Reply {
    let Some(id) = input.id else {
        return fail(StatusCode::BAD_REQUEST, "id requerido");
    };
    let mut db = state.db.write().await;
    let Some(usuario) = db.usuarios.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "Usuario no encontrado");
    };
    usuario.nombre = input.nombre;
    usuario.apellido = input.apellido;
    usuario.email = input.email;
    usuario.dni = input.dni;
    usuario.tipo_documento = input.tipo_documento;
    usuario.telefono = input.telefono;
    usuario.institucion = input.institucion;
    user_reply(StatusCode::OK, usuario.clone())
}

async fn delete_usuario(State(state): State<AppState>, Path(id): Path<i64>) -> Reply {
    let mut db = state.db.write().await;
    match db.usuarios.remove(&id) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "Usuario eliminado" }))),
        None => fail(StatusCode::NOT_FOUND, "Usuario no encontrado"),
    }
}
