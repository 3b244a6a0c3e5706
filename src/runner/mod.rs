pub mod executor;
pub mod retry;
pub mod types;

pub use executor::Executor;
pub use retry::RetryPolicy;
pub use types::RequestOutcome;
