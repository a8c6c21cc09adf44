use std::sync::Arc;

use super::{logged, send};
use crate::client::AttendanceClient;
use crate::error::ApiError;
use crate::model::Attendance;
use crate::transport::Transport;

pub struct AttendanceRepository {
    client: AttendanceClient,
    transport: Arc<dyn Transport>,
}

impl AttendanceRepository {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            client: AttendanceClient::new(base_url),
            transport,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Attendance>, ApiError> {
        logged("attendance.get_all", async {
            let response = send(self.transport.as_ref(), self.client.build_list()).await?;
            self.client.parse_list(response)
        })
        .await
    }

    /// Records of one grade between two dates, both bounds passed as given.
    pub async fn get_all_by_grado_and_fecha(
        &self,
        grado_id: i64,
        fecha_inicio: &str,
        fecha_fin: &str,
    ) -> Result<Vec<Attendance>, ApiError> {
        logged("attendance.get_all_by_grado_and_fecha", async {
            let request = self
                .client
                .build_list_by_grado_and_fecha(grado_id, fecha_inicio, fecha_fin)?;
            let response = send(self.transport.as_ref(), request).await?;
            self.client.parse_list(response)
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Attendance, ApiError> {
        logged("attendance.get_by_id", async {
            let response = send(self.transport.as_ref(), self.client.build_get(id)).await?;
            self.client.parse_get(response)
        })
        .await
    }

    pub async fn create(&self, attendance: &Attendance) -> Result<Attendance, ApiError> {
        logged("attendance.create", async {
            let request = self.client.build_create(attendance)?;
            let response = send(self.transport.as_ref(), request).await?;
            self.client.parse_create(response)
        })
        .await
    }

    pub async fn update(&self, attendance: &Attendance) -> Result<Attendance, ApiError> {
        logged("attendance.update", async {
            let request = self.client.build_update(attendance)?;
            let response = send(self.transport.as_ref(), request).await?;
            self.client.parse_update(response)
        })
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        logged("attendance.delete", async {
            let response = send(self.transport.as_ref(), self.client.build_delete(id)).await?;
            self.client.parse_delete(response)
        })
        .await
    }
}
