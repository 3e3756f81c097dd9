// --- File: crates/services/bienestar_backend/src/lib.rs ---
pub mod store_factory;
