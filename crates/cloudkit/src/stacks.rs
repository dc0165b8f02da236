//! Stack output lookups.
//!
//! A deployed stack exposes a read-only map of output keys to string
//! values; this client resolves single keys. The stack itself is opaque -
//! nothing here creates, mutates or deletes stack resources.

use crate::backend::http::HttpBackend;
use crate::backend::StackBackend;
use crate::error::Result;

/// Client for stack output queries.
pub struct StackClient {
    backend: Box<dyn StackBackend>,
}

impl StackClient {
    /// Create a client against the given control-plane endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            backend: Box::new(HttpBackend::new(endpoint)),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn StackBackend>) -> Self {
        Self { backend }
    }

    /// Look up one output value on a deployed stack.
    ///
    /// Returns `Ok(None)` when the stack exists but carries no output
    /// under `key`, or when the stack itself is unknown - callers decide
    /// whether that is fatal.
    pub fn output(&self, stack: &str, key: &str) -> Result<Option<String>> {
        log::debug!("querying output {} of stack {} ...", key, stack);
        let value = self.backend.stack_output(stack, key)?;
        match &value {
            Some(v) => log::debug!("stack {} output {} = {}", stack, key, v),
            None => log::debug!("stack {} has no output {}", stack, key),
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockControlPlane;

    #[test]
    fn test_output_present() {
        let mock = MockControlPlane::new();
        mock.add_stack_output("demo-stack", "devfilesbucketname", "dev-files-bucket");

        let client = StackClient::with_backend(Box::new(mock));
        let value = client.output("demo-stack", "devfilesbucketname").unwrap();
        assert_eq!(value.as_deref(), Some("dev-files-bucket"));
    }

    #[test]
    fn test_output_absent() {
        let client = StackClient::with_backend(Box::new(MockControlPlane::new()));
        let value = client.output("demo-stack", "certid").unwrap();
        assert!(value.is_none());
    }
}
