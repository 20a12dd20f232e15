//! spendlens-client: HTTP client for the categorization/savings backend and
//! the session that owns dashboard state and applies network completions.

pub mod analysis;
pub mod api;
pub mod backend;
pub mod session;

pub use analysis::SavingsAnalysis;
pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use backend::Backend;
pub use session::{Completion, Session};
