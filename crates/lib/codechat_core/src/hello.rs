//! Greeting used by the health endpoint.

/// Returns a greeting string with the crate version.
pub fn hello_world() -> String {
    format!("Hello from codechat_core v{}", super::version())
}
