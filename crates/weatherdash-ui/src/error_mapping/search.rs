use crate::services::search_service::SearchError;
use weatherdash_core::{AppError, DataError};

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Failed(s) => AppError::Data(DataError::SearchFailed(s)),
        }
    }
}
