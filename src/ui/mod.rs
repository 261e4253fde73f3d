// Wed Jan 15 2026 - Alex

pub mod cli;
pub mod spinner;

pub use cli::{Args, Command, CommandHandler};
pub use spinner::ProgressSpinner;
