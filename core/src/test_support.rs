//! In-memory fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::model::User;
use crate::transport::Transport;

#[derive(Clone)]
enum Outcome {
    Respond(u16, String),
    Fail(String),
}

/// Transport answering from a script and recording every request.
///
/// Scripted outcomes are consumed in order; once the script runs out the
/// last `respond_always` outcome is repeated.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Mutex<Option<Outcome>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Outcome::Respond(status, body.to_string()));
    }

    pub(crate) fn respond_always(&self, status: u16, body: &str) {
        *self.fallback.lock().unwrap() = Some(Outcome::Respond(status, body.to_string()));
    }

    pub(crate) fn fail(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Outcome::Fail(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        // Let concurrent callers reach the cache before this one completes.
        tokio::task::yield_now().await;
        let next = self.script.lock().unwrap().pop_front();
        let outcome = next
            .or_else(|| self.fallback.lock().unwrap().clone())
            .unwrap_or_else(|| Outcome::Fail("no scripted response".to_string()));
        match outcome {
            Outcome::Respond(status, body) => Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            }),
            Outcome::Fail(message) => Err(TransportError::no_response(message)),
        }
    }
}

pub(crate) fn sample_user(id: i64) -> User {
    User {
        id: Some(id),
        nombre: "Eva".to_string(),
        apellido: "Sosa".to_string(),
        email: "eva@example.com".to_string(),
        rol: "ADMIN".to_string(),
        activo: true,
        dni: "31222333".to_string(),
        tipo_documento: "DNI".to_string(),
        telefono: "351-555-0199".to_string(),
        institucion: "Escuela 12".to_string(),
    }
}

pub(crate) const USER_BODY: &str = r#"{"dataIterable":{"id":8,"nombre":"Eva","apellido":"Sosa","email":"eva@example.com","rol":"ADMIN","activo":true}}"#;
pub(crate) const USERS_BODY: &str = r#"{"dataIterable":[{"id":8,"nombre":"Eva","apellido":"Sosa","email":"eva@example.com","rol":"ADMIN","activo":true}]}"#;
pub(crate) const ATTENDANCE_BODY: &str = r#"{"estado":true,"message":"ok","data":{"id":5,"fecha":"2024-05-10","estado":"PRESENTE","estudiante":21,"grado":4}}"#;
pub(crate) const ATTENDANCES_BODY: &str = r#"{"estado":true,"message":"ok","dataIterable":[{"id":5,"fecha":"2024-05-10","estado":"PRESENTE","estudiante":21,"grado":4}]}"#;
