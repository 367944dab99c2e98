use crate::error::AppError;

pub mod json_store;

/// Durable key-value persistence of exactly one logical value: the serialized
/// task collection. Implementations own the medium and treat the payload as
/// opaque. `Send + Sync` because write-throughs run on their own threads.
pub trait StoreAdapter: Send + Sync {
    /// The raw payload, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>, AppError>;

    /// Replace the prior value wholesale.
    fn write(&self, payload: &str) -> Result<(), AppError>;
}
