// Prompt template for article generation.

/// Prompt for rewriting a scraped page title into an original blog post.
/// The source site must never leak into the generated body.
pub fn blog_post(title: &str) -> String {
    format!(
        "Write a compelling, original blog post of 800-1000 words titled \"{}\". \
         The tone should be conversational and insightful, suitable for a tech-savvy audience. \
         Do NOT reference the original website or any copyrighted material.",
        title
    )
}
