//! The `TextGenerator` trait.

use anyhow::Result;
use async_trait::async_trait;

/// Adapter interface for an opaque text-in/text-out generation service.
///
/// The trait is object-safe so flows can take `&dyn TextGenerator`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name for logs (e.g. the program being run).
    fn name(&self) -> &str;

    /// Send one request and wait for the answer.
    ///
    /// Returns `Ok(None)` when the service answered with no text. Transport
    /// failures (the service could not be reached or reported an error) are
    /// `Err`. No retry or timeout is applied.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<Option<String>> {
            Ok(Some(prompt.to_string()))
        }
    }

    #[tokio::test]
    async fn generator_is_object_safe() {
        let generator: Box<dyn TextGenerator> = Box::new(EchoGenerator);
        assert_eq!(generator.name(), "echo");
        assert_eq!(
            generator.generate("hello").await.unwrap(),
            Some("hello".to_string())
        );
    }
}
