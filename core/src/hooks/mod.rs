//! Query and mutation adapters over the repositories.
//!
//! Query hooks read through the [`QueryClient`](crate::query::QueryClient)
//! under keys built here and only run when every input is set. Mutation hooks
//! never retry and invalidate the list-level prefix of their entity on
//! success.

mod attendance;
mod user;

pub use attendance::AttendanceHooks;
pub use user::UserHooks;

use crate::error::ApiError;
use crate::notification::Notifier;
use crate::query::MutationState;

/// Cache keys used by the hooks.
pub mod keys {
    use crate::query::QueryKey;

    pub const ATTENDANCES: &str = "attendances";
    pub const ATTENDANCE: &str = "attendance";
    pub const USERS: &str = "users";
    pub const USER: &str = "user";

    /// List-level prefix of every attendance list query.
    pub fn attendances() -> QueryKey {
        QueryKey::new(ATTENDANCES)
    }

    pub fn all_attendances() -> QueryKey {
        attendances().with("all")
    }

    pub fn attendances_by_grado_and_fecha(grado_id: i64, fecha_inicio: &str, fecha_fin: &str) -> QueryKey {
        attendances()
            .with("fechaAndGrado")
            .with(grado_id)
            .with(fecha_inicio)
            .with(fecha_fin)
    }

    pub fn attendance(id: i64) -> QueryKey {
        QueryKey::new(ATTENDANCE).with(id)
    }

    pub fn users() -> QueryKey {
        QueryKey::new(USERS)
    }

    pub fn user(id: i64) -> QueryKey {
        QueryKey::new(USER).with(id)
    }
}

/// Report a finished mutation through the notifier, when one is attached.
fn report<T>(notifier: Option<&Notifier>, state: &MutationState<T>, success: &str) {
    let Some(notifier) = notifier else {
        return;
    };
    match &state.error {
        None => {
            notifier.success(success);
        }
        Some(ApiError { message, .. }) => {
            notifier.error(message.clone());
        }
    }
}
