use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured theme concept returned by the text model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTextData {
    pub title: String,
    pub description: String,
    pub color_palette: Vec<String>,
    pub music_playlist: Vec<String>,
    pub event_ideas: Vec<String>,
    pub decoration_tips: Vec<String>,
}

impl ThemeTextData {
    pub const PALETTE_LEN: usize = 5;
    pub const PLAYLIST_LEN: usize = 5;
    pub const IDEAS_LEN: usize = 4;
    pub const TIPS_LEN: usize = 4;

    /// Names of the lists whose length differs from what the prompt asks for.
    pub fn off_shape_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.color_palette.len() != Self::PALETTE_LEN {
            fields.push("colorPalette");
        }
        if self.music_playlist.len() != Self::PLAYLIST_LEN {
            fields.push("musicPlaylist");
        }
        if self.event_ideas.len() != Self::IDEAS_LEN {
            fields.push("eventIdeas");
        }
        if self.decoration_tips.len() != Self::TIPS_LEN {
            fields.push("decorationTips");
        }
        fields
    }
}

/// The four visual deliverables generated for every theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Invitation,
    Shirt,
    Flag,
    Decoration,
}

impl AssetCategory {
    /// Display order on the dashboard.
    pub const ALL: [Self; 4] = [Self::Invitation, Self::Shirt, Self::Flag, Self::Decoration];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Invitation => "Invitation",
            Self::Shirt => "Shirt",
            Self::Flag => "Flag",
            Self::Decoration => "Decoration",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Invitation => "✉",
            Self::Shirt => "👕",
            Self::Flag => "⚑",
            Self::Decoration => "✨",
        }
    }

    /// Image prompt for this category with `topic` interpolated verbatim.
    pub fn prompt(self, topic: &str) -> String {
        match self {
            Self::Invitation => format!(
                "An elegant, modern event invitation with the theme: {topic}. \
                 High-quality graphic design, legible typography, professional layout."
            ),
            Self::Shirt => format!(
                "A creative vector t-shirt print design with the theme: {topic}. \
                 White background, vibrant colors, modern merchandise style, isolated."
            ),
            Self::Flag => format!(
                "An official flag symbolizing the theme: {topic}. \
                 Vexillological design, no text, distinct colors, waving in the wind, high resolution."
            ),
            Self::Decoration => format!(
                "A party decoration scene with the theme: {topic}. \
                 Ambient lighting, immersive interior design, thematic details, photorealistic."
            ),
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    /// Where downloaded assets are written; falls back to the user's download dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// Used only when `GEMINI_API_KEY` is not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

const fn default_timeout() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            request_timeout: default_timeout(),
            export_dir: None,
            api_key: None,
        }
    }
}

#[cfg(test)]
pub fn sample_theme() -> ThemeTextData {
    ThemeTextData {
        title: "Cosmic Disco".to_string(),
        description: "Glitter meets the final frontier.".to_string(),
        color_palette: vec!["#1B1464".into(), "#F72585".into(), "#7209B7".into(), "#4CC9F0".into(), "#FFD60A".into()],
        music_playlist: vec!["Space Oddity".into(), "Starman".into(), "Daft Punk".into(), "Italo Disco".into(), "Synthwave".into()],
        event_ideas: vec!["Costume contest".into(), "Planetarium corner".into(), "Roller disco".into(), "Astronaut photo booth".into()],
        decoration_tips: vec!["Mirror balls".into(), "Star projectors".into(), "Foil curtains".into(), "Neon planets".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_deserializes_camel_case() {
        let json = r##"{
            "title": "Cosmic Disco",
            "description": "d",
            "colorPalette": ["#000000"],
            "musicPlaylist": ["a"],
            "eventIdeas": ["b"],
            "decorationTips": ["c"]
        }"##;
        let theme: ThemeTextData = serde_json::from_str(json).unwrap();
        assert_eq!(theme.title, "Cosmic Disco");
        assert_eq!(theme.color_palette, vec!["#000000"]);
        assert_eq!(theme.decoration_tips, vec!["c"]);
    }

    #[test]
    fn test_theme_missing_field_is_rejected() {
        let json = r#"{"title":"x","description":"y","colorPalette":[],"musicPlaylist":[],"eventIdeas":[]}"#;
        assert!(serde_json::from_str::<ThemeTextData>(json).is_err());
    }

    #[test]
    fn test_off_shape_fields() {
        let mut theme = sample_theme();
        assert!(theme.off_shape_fields().is_empty());

        theme.event_ideas.pop();
        theme.color_palette.push("#FFFFFF".into());
        assert_eq!(theme.off_shape_fields(), vec!["colorPalette", "eventIdeas"]);
    }

    #[test]
    fn test_category_prompts_share_topic_but_differ() {
        let prompts: Vec<String> = AssetCategory::ALL
            .iter()
            .map(|category| category.prompt("Beach Wedding"))
            .collect();

        for prompt in &prompts {
            assert!(prompt.contains("Beach Wedding"));
        }
        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AssetCategory::Invitation.to_string(), "Invitation");
        assert_eq!(AssetCategory::Decoration.label(), "Decoration");
        assert_eq!(AssetCategory::ALL.len(), 4);
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.request_timeout, 120);
        assert!(config.api_key.is_none());
    }
}
