/// Use Cases - Boot-time operations
///
/// ## Available Use Cases
/// - `RegisterDefaultsUseCase`: registers the built-in checks and metrics
///   whose collaborators the host provides

pub mod register_defaults;

// Re-export key types
pub use register_defaults::{Collaborators, DefaultRegistration, RegisterDefaultsUseCase};
