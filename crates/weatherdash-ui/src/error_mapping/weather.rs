use crate::services::weather_service::WeatherQueryError;
use weatherdash_core::{AppError, DataError};

impl From<WeatherQueryError> for AppError {
    fn from(e: WeatherQueryError) -> Self {
        match e {
            WeatherQueryError::Source(s) => AppError::Data(DataError::SourceUnavailable(s)),
            WeatherQueryError::InvalidData(s) => AppError::Data(DataError::InvalidData(s)),
            WeatherQueryError::Cancelled => AppError::Data(DataError::Cancelled),
        }
    }
}
