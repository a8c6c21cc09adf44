use std::sync::Arc;

use super::{keys, report};
use crate::model::User;
use crate::notification::Notifier;
use crate::query::{MutationState, QueryClient, QueryState};
use crate::repository::UserRepository;

/// User queries and mutations bound to one cache.
#[derive(Clone)]
pub struct UserHooks {
    repository: Arc<UserRepository>,
    queries: QueryClient,
    notifier: Option<Notifier>,
}

impl UserHooks {
    pub fn new(repository: Arc<UserRepository>, queries: QueryClient) -> Self {
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

    pub async fn use_users(&self) -> QueryState<Vec<User>> {
        let repository = self.repository.clone();
        self.queries
            .query(keys::users(), true, move || {
                let repository = repository.clone();
                async move { repository.get_all().await }
            })
            .await
    }

    pub async fn use_user(&self, id: i64) -> QueryState<User> {
        let repository = self.repository.clone();
        self.queries
            .query(keys::user(id), id != 0, move || {
                let repository = repository.clone();
                async move { repository.get_by_id(id).await }
            })
            .await
    }

    pub async fn create_user(&self, user: &User) -> MutationState<User> {
        let state = self
            .queries
            .mutate(self.repository.create(user), &[keys::users()])
            .await;
        report(self.notifier.as_ref(), &state, "Usuario creado");
        state
    }

    pub async fn update_user(&self, user: &User) -> MutationState<User> {
        let mut invalidates = vec![keys::users()];
        if let Some(id) = user.id {
            invalidates.push(keys::user(id));
        }
        let state = self
            .queries
            .mutate(self.repository.update(user), &invalidates)
            .await;
        report(self.notifier.as_ref(), &state, "Usuario actualizado");
        state
    }

    pub async fn delete_user(&self, id: i64) -> MutationState<()> {
        let state = self
            .queries
            .mutate(self.repository.delete(id), &[keys::users(), keys::user(id)])
            .await;
        report(self.notifier.as_ref(), &state, "Usuario eliminado");
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryDefaults;
    use std::time::Duration;
    use crate::test_support::{sample_user, ScriptedTransport, USERS_BODY, USER_BODY};

    fn hooks(transport: &Arc<ScriptedTransport>) -> (UserHooks, QueryClient) {
        let queries = QueryClient::new(QueryDefaults {
            retry_delay: Duration::ZERO,
            stale_time: Duration::from_secs(60),
            ..QueryDefaults::default()
        });
        let repository = Arc::new(UserRepository::new("http://api.test", transport.clone()));
        (UserHooks::new(repository, queries.clone()), queries)
    }

    #[tokio::test]
    async fn zero_id_is_idle() {
        let transport = Arc::new(ScriptedTransport::new());
        let (hooks, _) = hooks(&transport);
        let state = hooks.use_user(0).await;
        assert!(state.is_idle());
        assert!(state.data.is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn update_invalidates_users_and_refetches() {
        let transport = Arc::new(ScriptedTransport::new());
        let (hooks, queries) = hooks(&transport);

        transport.respond(200, USERS_BODY);
        assert_eq!(hooks.use_users().await.data.unwrap().len(), 1);
        transport.respond(200, USER_BODY);
        assert!(hooks.use_user(8).await.is_success());

        transport.respond(200, USER_BODY);
        assert!(hooks.update_user(&sample_user(8)).await.is_success());
        assert!(queries.is_stale(&keys::users()));
        assert!(queries.is_stale(&keys::user(8)));

        transport.respond(200, USERS_BODY);
        hooks.use_users().await;
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn delete_only_touches_user_keys() {
        let transport = Arc::new(ScriptedTransport::new());
        let (hooks, queries) = hooks(&transport);
        queries.set_query_data(keys::all_attendances(), Vec::<crate::model::Attendance>::new());

        transport.respond(200, "");
        assert!(hooks.delete_user(8).await.is_success());
        assert!(!queries.is_stale(&keys::all_attendances()));
    }

    #[tokio::test]
    async fn create_error_surfaces_in_state() {
        let transport = Arc::new(ScriptedTransport::new());
        let (hooks, _) = hooks(&transport);
        transport.respond(409, r#"{"message":"email duplicado"}"#);
        let state = hooks.create_user(&sample_user(0)).await;
        assert!(state.is_error());
        let err = state.into_result().unwrap_err();
        assert_eq!(err.status, 409);
        assert_eq!(err.message, "email duplicado");
    }
}
