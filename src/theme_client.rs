// Prompt construction and response parsing for theme generation

use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::{AiProvider, ImageOptions};
use crate::error::GenerationError;
use crate::models::{AssetCategory, ThemeTextData};

/// Builds theme requests against an [`AiProvider`] and parses what comes back.
///
/// Every call goes to the provider; nothing is cached, so "regenerate" always
/// produces a fresh result.
#[derive(Clone)]
pub struct ThemeRequestClient {
    provider: Arc<dyn AiProvider>,
}

impl ThemeRequestClient {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub async fn request_theme_text(&self, topic: &str) -> Result<ThemeTextData, GenerationError> {
        let result = self.fetch_theme_text(topic).await;
        match &result {
            Ok(theme) => {
                let off_shape = theme.off_shape_fields();
                if !off_shape.is_empty() {
                    tracing::warn!(?off_shape, "theme lists differ from the requested lengths");
                }
                tracing::info!(title = %theme.title, "theme text generated");
            }
            Err(err) => tracing::error!(%err, "error generating theme text"),
        }
        result
    }

    /// Returns the first inline image of the response as a `data:` URI.
    pub async fn request_asset_image(
        &self,
        topic: &str,
        category: AssetCategory,
    ) -> Result<String, GenerationError> {
        let result = self.fetch_asset_image(topic, category).await;
        if let Err(err) = &result {
            tracing::error!(%category, %err, "error generating asset image");
        }
        result
    }

    async fn fetch_theme_text(&self, topic: &str) -> Result<ThemeTextData, GenerationError> {
        let generated = self
            .provider
            .generate_text(&theme_prompt(topic), &theme_schema())
            .await
            .map_err(|err| GenerationError::provider(&err))?;

        let text = generated
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_asset_image(
        &self,
        topic: &str,
        category: AssetCategory,
    ) -> Result<String, GenerationError> {
        let response = self
            .provider
            .generate_image(&category.prompt(topic), &ImageOptions::square())
            .await
            .map_err(|err| GenerationError::provider(&err))?;

        response
            .parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .find(|inline| !inline.data.is_empty())
            .map(|inline| format!("data:{};base64,{}", inline.mime_type, inline.data))
            .ok_or(GenerationError::MissingImage)
    }
}

pub fn theme_prompt(topic: &str) -> String {
    format!(
        "You are an expert in event design and branding.\n\
         Create a complete, creative theme concept based on the following topic: \"{topic}\".\n\
         \n\
         Return ONLY a JSON object with the following structure:\n\
         - title: A catchy name for the theme.\n\
         - description: A short description of the vibe and aesthetic (max 2 sentences).\n\
         - colorPalette: Array with 5 matching hexadecimal color codes.\n\
         - musicPlaylist: Array with 5 song or music style suggestions.\n\
         - eventIdeas: Array with 4 activity ideas for the event.\n\
         - decorationTips: Array with 4 specific decoration tips.\n"
    )
}

/// Response schema handed to the text model; mirrors [`ThemeTextData`].
pub fn theme_schema() -> Value {
    let string_array = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "colorPalette": string_array,
            "musicPlaylist": string_array,
            "eventIdeas": string_array,
            "decorationTips": string_array,
        },
        "required": [
            "title",
            "description",
            "colorPalette",
            "musicPlaylist",
            "eventIdeas",
            "decorationTips"
        ],
    })
}
