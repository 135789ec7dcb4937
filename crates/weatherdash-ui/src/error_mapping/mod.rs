//! Maps UI service errors to weatherdash_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod search;
mod weather;
