use std::sync::Arc;

use super::{logged, send};
use crate::client::UserClient;
use crate::error::ApiError;
use crate::model::User;
use crate::transport::Transport;

pub struct UserRepository {
    client: UserClient,
    transport: Arc<dyn Transport>,
}

impl UserRepository {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            client: UserClient::new(base_url),
            transport,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, ApiError> {
        logged("user.get_all", async {
            let response = send(self.transport.as_ref(), self.client.build_list()).await?;
            self.client.parse_list(response)
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, ApiError> {
        logged("user.get_by_id", async {
            let response = send(self.transport.as_ref(), self.client.build_get(id)).await?;
            self.client.parse_get(response)
        })
        .await
    }

    pub async fn create(&self, user: &User) -> Result<User, ApiError> {
        logged("user.create", async {
            let request = self.client.build_create(user)?;
            let response = send(self.transport.as_ref(), request).await?;
            self.client.parse_create(response)
        })
        .await
    }

    pub async fn update(&self, user: &User) -> Result<User, ApiError> {
        logged("user.update", async {
            let request = self.client.build_update(user)?;
            let response = send(self.transport.as_ref(), request).await?;
            self.client.parse_update(response)
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        logged("user.delete", async {
            let response = send(self.transport.as_ref(), self.client.build_delete(id)).await?;
            self.client.parse_delete(response)
        })
        .await
    }
}
