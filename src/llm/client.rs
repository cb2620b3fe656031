use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Echo the quoted title back so callers and tests can correlate
        // generated bodies with their posts.
        let title = prompt.split('"').nth(1).unwrap_or("a generated article");
        Ok(format!(
            "This is a mock article standing in for \"{}\".\n\n\
             It is produced without calling the completion API.",
            title
        ))
    }
}
