/// OpenAI content generator
///
/// API Flow:
/// 1. Chat completion per show: /v1/chat/completions → "TV Series name / short description"
/// 2. Poster per show: /v1/images/generations → image URL
///
/// The first show is inspired by the favorites, the second by the recommended titles.
use crate::{
    error::{AppError, AppResult},
    models::{EnrichedContent, GeneratedShow, Recommendation},
    services::generators::{parse_generated_show, ContentGenerator},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

const TEMPERATURE: f32 = 0.8;
const MAX_TOKENS: u32 = 250;
const SEED: u64 = 1;
const IMAGE_SIZE: &str = "1024x1024";
const PROMPT_CANDIDATES: usize = 5;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    seed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    chat_model: String,
    image_model: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, api_url: String, chat_model: String, image_model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            chat_model,
            image_model,
        }
    }

    /// Builds the writer prompt for a list of show titles
    fn series_prompt(shows: &[String]) -> String {
        format!(
            "You are a creative TV Series Creator-Writer.\n\
             Based on this list of TV shows: {}\n\
             Create ONE new TV series.\n\
             \n\
             Return EXACTLY in this format (2 lines only):\n\
             TV Series name: <name>\n\
             TV Series short description: <description>\n",
            shows.join(", ")
        )
    }

    fn poster_prompt(description: &str) -> String {
        format!(
            "Create a TV-series poster or wall art, based on this description: {}",
            description
        )
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> AppResult<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenAI API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn create_show(&self, shows: &[String]) -> AppResult<GeneratedShow> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::series_prompt(shows),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            seed: SEED,
        };

        let response: ChatResponse = self.post_json("/v1/chat/completions", &request).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::ExternalApi("chat completion had no choices".to_string()))?;

        parse_generated_show(&text)
    }

    async fn create_poster(&self, description: &str) -> AppResult<String> {
        let request = ImageRequest {
            model: &self.image_model,
            prompt: Self::poster_prompt(description),
            n: 1,
            size: IMAGE_SIZE,
        };

        let response: ImageResponse = self.post_json("/v1/images/generations", &request).await?;
        response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| AppError::ExternalApi("image generation returned no URL".to_string()))
    }
}

#[async_trait::async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        favorites: &[String],
        candidates: &[Recommendation],
    ) -> AppResult<EnrichedContent> {
        let recommended: Vec<String> = candidates
            .iter()
            .take(PROMPT_CANDIDATES)
            .map(|rec| rec.title().to_string())
            .collect();

        let mut from_favorites = self.create_show(favorites).await?;
        let mut from_recommendations = self.create_show(&recommended).await?;

        from_favorites.image_url = Some(self.create_poster(&from_favorites.description).await?);
        from_recommendations.image_url =
            Some(self.create_poster(&from_recommendations.description).await?);

        Ok(EnrichedContent {
            from_favorites,
            from_recommendations,
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
