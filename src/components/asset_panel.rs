use crate::error::GenerationError;
use crate::events::{Command, RequestId};
use crate::models::AssetCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPhase {
    Loading,
    Ready(String),
    Failed,
}

/// One generated image and the request that owns it.
#[derive(Debug)]
pub struct AssetPanel {
    category: AssetCategory,
    topic: String,
    phase: AssetPhase,
    in_flight: RequestId,
}

impl AssetPanel {
    /// A new panel starts loading right away; the returned command fetches its image.
    pub fn mount(category: AssetCategory, topic: &str, request: RequestId) -> (Self, Command) {
        let panel = Self {
            category,
            topic: topic.to_string(),
            phase: AssetPhase::Loading,
            in_flight: request,
        };
        let command = panel.fetch_command();
        (panel, command)
    }

    pub const fn category(&self) -> AssetCategory {
        self.category
    }

    pub const fn phase(&self) -> &AssetPhase {
        &self.phase
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, AssetPhase::Loading)
    }

    fn fetch_command(&self) -> Command {
        Command::FetchAsset {
            request: self.in_flight,
            category: self.category,
            topic: self.topic.clone(),
        }
    }

    /// Applies a result if it belongs to the request this panel is waiting on.
    pub fn resolve(&mut self, request: RequestId, result: Result<String, GenerationError>) -> bool {
        if request != self.in_flight || !self.is_loading() {
            tracing::debug!(category = %self.category, ?request, "dropping stale asset result");
            return false;
        }

        self.phase = match result {
            Ok(data_uri) => AssetPhase::Ready(data_uri),
            Err(_) => AssetPhase::Failed,
        };
        true
    }

    /// Regenerates the image from `Ready` or `Failed`. Ignored while loading.
    pub fn refetch(&mut self, request: RequestId) -> Option<Command> {
        if self.is_loading() {
            return None;
        }
        self.phase = AssetPhase::Loading;
        self.in_flight = request;
        Some(self.fetch_command())
    }

    pub fn download(&self) -> Option<Command> {
        match &self.phase {
            AssetPhase::Ready(data_uri) => Some(Command::ExportAsset {
                category: self.category,
                topic: self.topic.clone(),
                data_uri: data_uri.clone(),
            }),
            AssetPhase::Loading | AssetPhase::Failed => None,
        }
    }
}
