/// Game record storage and retrieval operations.
pub mod game;
/// Key-value backends holding the raw collections.
pub mod kv_store;
/// Persisted record definitions.
pub mod models;
/// Typed collection access with degrade-to-default semantics.
pub mod persistence;
/// Player registry storage.
pub mod player;
/// Storage error types shared by every backend.
pub mod storage;
