use std::sync::Arc;

use super::{keys, report};
use crate::model::Attendance;
use crate::notification::Notifier;
use crate::query::{MutationState, QueryClient, QueryState};
use crate::repository::AttendanceRepository;

/// Attendance queries and mutations bound to one cache.
#[derive(Clone)]
pub struct AttendanceHooks {
    repository: Arc<AttendanceRepository>,
    queries: QueryClient,
    notifier: Option<Notifier>,
}

impl AttendanceHooks {
    pub fn new(repository: Arc<AttendanceRepository>, queries: QueryClient) -> Self {
        Self {
            repository,
            queries,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn use_attendances(&self) -> QueryState<Vec<Attendance>> {
        let repository = self.repository.clone();
        self.queries
            .query(keys::all_attendances(), true, move || {
                let repository = repository.clone();
                async move { repository.get_all().await }
            })
            .await
    }

    /// Idle until the grade and both dates are set.
    pub async fn use_attendances_by_grado_and_fecha(
        &self,
        grado_id: i64,
        fecha_inicio: &str,
        fecha_fin: &str,
    ) -> QueryState<Vec<Attendance>> {
        let enabled = grado_id != 0 && !fecha_inicio.is_empty() && !fecha_fin.is_empty();
        let key = keys::attendances_by_grado_and_fecha(grado_id, fecha_inicio, fecha_fin);
        let repository = self.repository.clone();
        let (inicio, fin) = (fecha_inicio.to_string(), fecha_fin.to_string());
        self.queries
            .query(key, enabled, move || {
                let repository = repository.clone();
                let (inicio, fin) = (inicio.clone(), fin.clone());
                async move {
                    repository
                        .get_all_by_grado_and_fecha(grado_id, &inicio, &fin)
                        .await
                }
            })
            .await
    }

    pub async fn use_attendance(&self, id: i64) -> QueryState<Attendance> {
        let repository = self.repository.clone();
        self.queries
            .query(keys::attendance(id), id != 0, move || {
                let repository = repository.clone();
                async move { repository.get_by_id(id).await }
            })
            .await
    }

    pub async fn create_attendance(&self, attendance: &Attendance) -> MutationState<Attendance> {
        let state = self
            .queries
            .mutate(self.repository.create(attendance), &[keys::attendances()])
            .await;
        report(self.notifier.as_ref(), &state, "Asistencia registrada");
        state
    }

    pub async fn update_attendance(&self, attendance: &Attendance) -> MutationState<Attendance> {
        let mut invalidates = vec![keys::attendances()];
        if let Some(id) = attendance.id {
            invalidates.push(keys::attendance(id));
        }
        let state = self
            .queries
            .mutate(self.repository.update(attendance), &invalidates)
            .await;
        report(self.notifier.as_ref(), &state, "Asistencia actualizada");
        state
    }

    pub async fn delete_attendance(&self, id: i64) -> MutationState<()> {
        let state = self
            .queries
            .mutate(
                self.repository.delete(id),
                &[keys::attendances(), keys::attendance(id)],
            )
            .await;
        report(self.notifier.as_ref(), &state, "Asistencia eliminada");
        state
    }
}
