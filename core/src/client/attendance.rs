use reqwest::Url;

use super::{check_status, decode, json_request, missing_payload, normalize_base};
use crate::dto::{AttendanceDto, Envelope, ListEnvelope};
use crate::error::{ApiError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::AttendanceMapper;
use crate::model::Attendance;

/// Builds and parses requests for the `/asistencia` endpoints.
#[derive(Debug, Clone)]
pub struct AttendanceClient {
    base_url: String,
}

impl AttendanceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base(base_url),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/asistencia/getAll", self.base_url))
    }

    /// Dates are passed through verbatim; the server decides how the range
    /// bounds are interpreted.
    pub fn build_list_by_grado_and_fecha(
        &self,
        grado_id: i64,
        fecha_inicio: &str,
        fecha_fin: &str,
    ) -> Result<HttpRequest, ApiError> {
        let url = Url::parse_with_params(
            &format!("{}/asistencia/fechaAndGrado/{grado_id}", self.base_url),
            &[("fechaInicio", fecha_inicio), ("fechaFin", fecha_fin)],
        )
        .map_err(Failure::local)?;
        Ok(HttpRequest::without_body(HttpMethod::Get, url.into()))
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/asistencia/{id}", self.base_url))
    }

    pub fn build_create(&self, attendance: &Attendance) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Post,
            format!("{}/asistencia/add", self.base_url),
            &AttendanceMapper::to_api(attendance),
        )
    }

    /// Partial update: the id travels in the body.
    pub fn build_update(&self, attendance: &Attendance) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Patch,
            format!("{}/asistencia/update", self.base_url),
            &AttendanceMapper::to_api(attendance),
        )
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Delete, format!("{}/asistencia/{id}", self.base_url))
    }

    /// A response without any list yields an empty list.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Attendance>, ApiError> {
        let envelope: ListEnvelope<AttendanceDto> = decode(response)?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(AttendanceMapper::from_api)
            .collect())
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<Attendance, ApiError> {
        parse_single(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Attendance, ApiError> {
        parse_single(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Attendance, ApiError> {
        parse_single(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(|_| ())
    }
}

fn parse_single(response: HttpResponse) -> Result<Attendance, ApiError> {
    let envelope: Envelope<AttendanceDto> = decode(response)?;
    envelope
        .data
        .map(AttendanceMapper::from_api)
        .ok_or_else(|| missing_payload("data"))
}
