//! Domain records handed to callers.
//!
//! These are plain values: every read produces a fresh record and nothing in
//! the crate keeps a shared mutable instance around.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attendance status codes accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Tarde,
    Justificado,
    SinRegistro,
}

/// One student's attendance record for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    /// Server-assigned; `None` only before creation.
    pub id: Option<i64>,
    pub fecha: NaiveDate,
    pub estado: AttendanceStatus,
    pub estudiante: i64,
    pub grado: i64,
    /// `None`: the endpoint did not send the field. `Some(None)`: it sent
    /// an explicit null.
    pub justificativos: Option<Option<String>>,
    pub porcentaje_asistencia: Option<f64>,
    pub nombre_estudiante: Option<String>,
}

impl Attendance {
    /// A record ready to be created; optional fields are left unsupplied.
    pub fn new(fecha: NaiveDate, estado: AttendanceStatus, estudiante: i64, grado: i64) -> Self {
        Self {
            id: None,
            fecha,
            estado,
            estudiante,
            grado,
            justificativos: None,
            porcentaje_asistencia: None,
            nombre_estudiante: None,
        }
    }

    /// The justification text, if any non-null value was supplied.
    pub fn justificacion(&self) -> Option<&str> {
        self.justificativos.as_ref().and_then(|j| j.as_deref())
    }
}

/// An application user.
///
/// `rol` and `activo` are read-only here: they are never written back
/// through the generic update path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
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

impl User {
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}
