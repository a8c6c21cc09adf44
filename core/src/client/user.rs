use super::{check_status, decode, json_request, missing_payload, normalize_base};
use crate::dto::{UserDto, UserEnvelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::UserMapper;
use crate::model::User;

/// Builds and parses requests for the `/user` endpoints.
///
/// Single and list responses both arrive under `dataIterable`.
#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base(base_url),
        }
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/user/getAll", self.base_url))
    }

    pub fn build_get(&self, id: i64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/user/{id}", self.base_url))
    }

    pub fn build_create(&self, user: &User) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Post,
            format!("{}/user/add", self.base_url),
            &UserMapper::to_api(user),
        )
    }

    /// Full replace of the profile fields.
    pub fn build_update(&self, user: &User) -> Result<HttpRequest, ApiError> {
        json_request(
            HttpMethod::Put,
            format!("{}/user/update", self.base_url),
            &UserMapper::to_api(user),
        )
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Delete, format!("{}/user/{id}", self.base_url))
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        let envelope: UserEnvelope<Vec<UserDto>> = decode(response)?;
        Ok(envelope
            .data_iterable
            .unwrap_or_default()
            .into_iter()
            .map(UserMapper::from_api)
            .collect())
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_single(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_single(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_single(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(|_| ())
    }
}

fn parse_single(response: HttpResponse) -> Result<User, ApiError> {
    let envelope: UserEnvelope<UserDto> = decode(response)?;
    envelope
        .data_iterable
        .map(UserMapper::from_api)
        .ok_or_else(|| missing_payload("dataIterable"))
}
