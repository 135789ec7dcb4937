pub mod search_service;
pub mod weather_service;

pub use search_service::{LocationSearch, SearchError, SearchPhase, SearchPolicy};
pub use weather_service::{QueryPolicy, WeatherQuery, WeatherQueryError};
