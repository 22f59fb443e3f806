/// Generative content abstraction
///
/// Invents fictional shows inspired by the user's taste. This is optional enrichment:
/// the ranked recommendations are complete without it, and `enrich` isolates every
/// generator failure from the caller.
use crate::{
    error::{AppError, AppResult},
    models::{EnrichedContent, GeneratedShow, Recommendation},
};

pub mod openai;

pub use openai::OpenAiGenerator;

const NAME_MARKER: &str = "TV Series name:";
const DESCRIPTION_MARKER: &str = "TV Series short description:";

/// Trait for generative content services
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Creates one show based on the favorites and one based on the recommendations
    async fn generate(
        &self,
        favorites: &[String],
        candidates: &[Recommendation],
    ) -> AppResult<EnrichedContent>;

    /// Generator name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Generator used when no service is configured; always fails
#[derive(Debug, Clone)]
pub struct DisabledGenerator {
    reason: String,
}

impl DisabledGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContentGenerator for DisabledGenerator {
    async fn generate(
        &self,
        _favorites: &[String],
        _candidates: &[Recommendation],
    ) -> AppResult<EnrichedContent> {
        Err(AppError::ExternalApi(format!(
            "content generation disabled: {}",
            self.reason
        )))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Runs the generator, turning any failure into `None`
pub async fn enrich(
    generator: &dyn ContentGenerator,
    favorites: &[String],
    candidates: &[Recommendation],
) -> Option<EnrichedContent> {
    match generator.generate(favorites, candidates).await {
        Ok(content) => {
            tracing::info!(
                generator = generator.name(),
                first = %content.from_favorites.title,
                second = %content.from_recommendations.title,
                "Generated shows"
            );
            Some(content)
        }
        Err(e) => {
            tracing::warn!(
                generator = generator.name(),
                error = %e,
                "Content generation failed; continuing without generated shows"
            );
            None
        }
    }
}

/// Parses a two-line `TV Series name:` / `TV Series short description:` answer
///
/// The description runs until the next name marker or the end of the text. Whitespace
/// and surrounding double quotes are stripped from both fields.
pub fn parse_generated_show(text: &str) -> AppResult<GeneratedShow> {
    let name_start = text
        .find(NAME_MARKER)
        .map(|i| i + NAME_MARKER.len())
        .ok_or_else(|| AppError::ExternalApi(format!("missing '{}' in reply", NAME_MARKER)))?;
    let name_end = text[name_start..]
        .find('\n')
        .map_or(text.len(), |i| name_start + i);

    let desc_start = text
        .find(DESCRIPTION_MARKER)
        .map(|i| i + DESCRIPTION_MARKER.len())
        .ok_or_else(|| {
            AppError::ExternalApi(format!("missing '{}' in reply", DESCRIPTION_MARKER))
        })?;
    let desc_end = text[desc_start..]
        .find(&format!("\n{}", NAME_MARKER))
        .map_or(text.len(), |i| desc_start + i);

    let title = clean_field(&text[name_start..name_end]);
    let description = clean_field(&text[desc_start..desc_end]);

    if title.is_empty() {
        return Err(AppError::ExternalApi("generated show has no name".to_string()));
    }

    Ok(GeneratedShow {
        title,
        description,
        image_url: None,
    })
}

fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
