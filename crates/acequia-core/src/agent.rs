use async_trait::async_trait;

/// Uniform contract shared by every pipeline stage.
///
/// An agent's `run` never returns `Err` and never panics: faults are
/// encoded in the output type (snapshot fault markers, fallback
/// commands, non-executed outcomes), so a cycle always completes.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Identity used for permission checks and logging.
    const NAME: &'static str;

    type Input: Send;
    type Output: Send;

    async fn run(&self, input: Self::Input) -> Self::Output;
}
