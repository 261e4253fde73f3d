// Thu Jan 22 2026 - Alex

pub mod cancel;
pub mod error;
pub mod session;

pub use cancel::CancellationToken;
pub use error::SessionError;
pub use session::AnalysisSession;
