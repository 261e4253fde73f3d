// Fri Jan 23 2026 - Alex

pub mod heap_verifier;

pub use heap_verifier::{FailureReason, HeapVerifier, LastGoodObject, VerificationFailure, VerifyReport};
