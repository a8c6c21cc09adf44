use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Disabled: a required input was missing, nothing was requested.
    Idle,
    /// A fetch is running and no data is cached yet.
    Loading,
    Success,
    Error,
}

/// What a query hook hands back to its caller.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    pub fn idle(data: Option<T>) -> Self {
        Self {
            status: QueryStatus::Idle,
            data,
            error: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: QueryStatus::Loading,
            data: None,
            error: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            status: QueryStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Failed fetch; previously cached data is kept alongside the error.
    pub fn error(error: ApiError, data: Option<T>) -> Self {
        Self {
            status: QueryStatus::Error,
            data,
            error: Some(error),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Success,
    Error,
}

/// Outcome of one mutation call.
#[derive(Debug, Clone)]
pub struct MutationState<T> {
    pub status: MutationStatus,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> MutationState<T> {
    pub fn is_success(&self) -> bool {
        self.status == MutationStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == MutationStatus::Error
    }

    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

impl<T> From<Result<T, ApiError>> for MutationState<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self {
                status: MutationStatus::Success,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                status: MutationStatus::Error,
                data: None,
                error: Some(err),
            },
        }
    }
}
