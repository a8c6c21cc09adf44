//! Wire shapes of the backend payloads.
//!
//! # Design
//! DTOs mirror the JSON exactly (camelCase keys, optional fields as
//! `Option`) and are kept apart from the domain records in
//! [`crate::model`]; the mappers translate between the two. The mock-server
//! crate defines its own copies so integration tests catch schema drift.
//!
//! The two backends wrap payloads differently and the difference is kept
//! as-is: attendance endpoints answer with [`Envelope`] / [`ListEnvelope`],
//! user endpoints with [`UserEnvelope`] whose `dataIterable` key holds either
//! one user or a list.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::AttendanceStatus;

/// Attendance as sent and received on the wire.
///
/// List items and single-resource responses share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub fecha: NaiveDate,
    pub estado: AttendanceStatus,
    pub estudiante: i64,
    pub grado: i64,
    /// Outer `None` when the key is missing, `Some(None)` for explicit null.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub justificativos: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porcentaje_asistencia: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_estudiante: Option<String>,
}

/// Marks a key that was present in the payload, even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Single-resource envelope of the attendance endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub estado: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// List envelope of the attendance endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope<T> {
    #[serde(default)]
    pub estado: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<Vec<T>>,
    pub data_iterable: Option<Vec<T>>,
}

impl<T> ListEnvelope<T> {
    /// `dataIterable`, then `data`, then an empty list.
    pub fn into_items(self) -> Vec<T> {
        self.data_iterable.or(self.data).unwrap_or_default()
    }
}

/// Envelope of the user endpoints; `T` is a user or a list of users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEnvelope<T> {
    pub data_iterable: Option<T>,
}

/// User as received from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub rol: String,
    pub activo: bool,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub tipo_documento: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub institucion: String,
}

/// User payload for create and update. Carries no `rol` and no `activo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWriteDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub dni: String,
    pub tipo_documento: String,
    pub telefono: String,
    pub institucion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#""id":1,"fecha":"2024-03-05","estado":"PRESENTE","estudiante":7,"grado":3"#;

    #[test]
    fn missing_justificativos_is_absent() {
        let dto: AttendanceDto = serde_json::from_str(&format!("{{{BASE}}}")).unwrap();
        assert_eq!(dto.justificativos, None);
        assert_eq!(dto.porcentaje_asistencia, None);
        assert_eq!(dto.nombre_estudiante, None);
    }

    #[test]
    fn null_justificativos_is_present_but_empty() {
        let dto: AttendanceDto =
            serde_json::from_str(&format!("{{{BASE},\"justificativos\":null}}")).unwrap();
        assert_eq!(dto.justificativos, Some(None));
    }

    #[test]
    fn optional_fields_are_read_in_camel_case() {
        let dto: AttendanceDto = serde_json::from_str(&format!(
            "{{{BASE},\"justificativos\":\"Turno medico\",\"porcentajeAsistencia\":87.5,\"nombreEstudiante\":\"Ana Diaz\"}}"
        ))
        .unwrap();
        assert_eq!(dto.justificativos, Some(Some("Turno medico".to_string())));
        assert_eq!(dto.porcentaje_asistencia, Some(87.5));
        assert_eq!(dto.nombre_estudiante.as_deref(), Some("Ana Diaz"));
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let body = r#"{"id":1,"fecha":"2024-03-05","estado":"FERIADO","estudiante":7,"grado":3}"#;
        assert!(serde_json::from_str::<AttendanceDto>(body).is_err());
    }

    #[test]
    fn list_envelope_prefers_data_iterable_then_data() {
        let env: ListEnvelope<i64> =
            serde_json::from_str(r#"{"estado":true,"message":"ok","data":[1],"dataIterable":[2,3]}"#)
                .unwrap();
        assert_eq!(env.into_items(), vec![2, 3]);

        let env: ListEnvelope<i64> = serde_json::from_str(r#"{"estado":true,"data":[1]}"#).unwrap();
        assert_eq!(env.into_items(), vec![1]);

        let env: ListEnvelope<i64> =
            serde_json::from_str(r#"{"estado":true,"message":"sin datos","dataIterable":null}"#).unwrap();
        assert!(env.into_items().is_empty());
    }

    #[test]
    fn user_write_dto_has_no_role_or_active_keys() {
        let dto = UserWriteDto {
            id: Some(4),
            nombre: "Ana".to_string(),
            apellido: "Diaz".to_string(),
            email: "ana@example.com".to_string(),
            dni: "30111222".to_string(),
            tipo_documento: "DNI".to_string(),
            telefono: String::new(),
            institucion: "Escuela 12".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("rol").is_none());
        assert!(json.get("activo").is_none());
        assert_eq!(json["tipoDocumento"], "DNI");
    }
}
