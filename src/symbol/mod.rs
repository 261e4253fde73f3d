// Tue Jan 20 2026 - Alex

pub mod cache;
pub mod error;
pub mod metadata;
pub mod resolver;

pub use cache::ResolutionCache;
pub use error::SymbolError;
pub use metadata::{ModuleMetadata, TypeId, TypeMetadataSource};
pub use resolver::TypeFieldResolver;
