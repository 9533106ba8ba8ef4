use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const ARTICLE_TEMPLATE: &str = r#"Transform the following YouTube transcript into an engaging educational blog article. Structure your article as follows:
1. Title: Create an attention-grabbing title that reflects the main topic of the video.
2. Introduction: Write a brief, engaging introduction that outlines the video's main topic and why it's important or interesting.
3. Main Body:
   - Divide the content into 3-5 main sections, each focusing on a key concept or idea from the video
   - Use subheadings for each section
   - Explain each concept in detail, using examples or analogies from the video
   - Include relevant quotes from the transcript to support your points
   - Incorporate any important data, research findings, or statistics mentioned
4. Practical Application (if applicable):
   - If the video includes a tutorial or practical demonstration, include a "How-To" section
   - Break down the process into clear, numbered steps
   - Add any tips, warnings, or best practices mentioned in the video
5. Conclusion:
   - Summarize the key takeaways from the video
   - Encourage readers to apply what they've learned or explore the topic further
Use a conversational yet informative tone throughout the article. Include relevant keywords for SEO purposes. Format the article using markdown for better readability."#;

const TAG_SYSTEM_PROMPT: &str =
    "You are a tagging assistant. Extract relevant tags from the blog content.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct Generator {
    client: Client,
    api_key: String,
    article_model: String,
    tag_model: String,
}

impl Generator {
    pub fn new(api_key: String, article_model: String, tag_model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            article_model,
            tag_model,
        }
    }

    /// One completion call: the fixed article template plus the concrete
    /// video data. The generated text comes back verbatim, no structural
    /// validation.
    pub async fn generate_article(
        &self,
        transcript_text: &str,
        title: &str,
        description: &str,
        comments: &[String],
    ) -> Result<String> {
        let comments_text = comments.join("\n");
        let user_message = format!(
            "Video Title: {title}\nVideo Description: {description}\nTranscript: {transcript_text}\nComments: {comments_text}"
        );

        let request = ChatRequest {
            model: self.article_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "user".to_string(),
                    content: ARTICLE_TEMPLATE.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_message,
                },
            ],
        };

        self.complete(request).await
    }

    /// A second, independent call that only sees the finished article.
    /// The response is split on commas; pieces are trimmed but otherwise
    /// untouched, so consecutive commas yield empty tags.
    pub async fn generate_tags(&self, article: &str) -> Result<Vec<String>> {
        let request = ChatRequest {
            model: self.tag_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: TAG_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Blog Content: {article}\n\nExtract relevant tags separated by commas."
                    ),
                },
            ],
        };

        let response = self.complete(request).await?;
        Ok(split_tags(&response))
    }

    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = extract_api_error(&body).unwrap_or(body);
            return Err(AppError::ExternalService(format!(
                "OpenAI API error (HTTP {status}): {detail}"
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalService("Empty completion response".to_string()))
    }
}

fn split_tags(response: &str) -> Vec<String> {
    response.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Pull the human-readable message out of an OpenAI error body, if there
/// is one.
fn extract_api_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_tags() {
        assert_eq!(
            split_tags("rust, systems programming ,tooling"),
            vec!["rust", "systems programming", "tooling"]
        );
    }

    #[test]
    fn consecutive_commas_yield_empty_tags() {
        // Preserved source behavior: empty pieces are not filtered out.
        assert_eq!(split_tags("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn single_tag_without_commas() {
        assert_eq!(split_tags("  rust  "), vec!["rust"]);
    }

    #[test]
    fn extracts_message_from_api_error_body() {
        let body = r#"{"error": {"message": "quota exceeded", "type": "insufficient_quota"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn malformed_error_body_is_ignored() {
        assert_eq!(extract_api_error("<html>gateway timeout</html>"), None);
    }
}
