use super::asset_panel::AssetPanel;
use crate::error::GenerationError;
use crate::events::{Command, RequestId, RequestIds};
use crate::models::{AssetCategory, ThemeTextData};

/// The results dashboard: theme text plus one panel per asset category.
#[derive(Debug)]
pub struct ThemeView {
    theme: ThemeTextData,
    topic: String,
    panels: Vec<AssetPanel>,
    selected: usize,
    pub scroll_offset: usize,
}

impl ThemeView {
    /// Mounts the view; the returned commands start the four image requests.
    pub fn mount(theme: ThemeTextData, topic: String, ids: &mut RequestIds) -> (Self, Vec<Command>) {
        let (panels, commands) = AssetCategory::ALL
            .iter()
            .map(|&category| AssetPanel::mount(category, &topic, ids.next()))
            .unzip();

        let view = Self {
            theme,
            topic,
            panels,
            selected: 0,
            scroll_offset: 0,
        };
        (view, commands)
    }

    pub const fn theme(&self) -> &ThemeTextData {
        &self.theme
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn panels(&self) -> &[AssetPanel] {
        &self.panels
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.panels.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.panels.len() - 1) % self.panels.len();
    }

    pub fn resolve_asset(
        &mut self,
        request: RequestId,
        category: AssetCategory,
        result: Result<String, GenerationError>,
    ) -> bool {
        self.panels
            .iter_mut()
            .find(|panel| panel.category() == category)
            .is_some_and(|panel| panel.resolve(request, result))
    }

    pub fn refetch_selected(&mut self, ids: &mut RequestIds) -> Option<Command> {
        let panel = self.panels.get_mut(self.selected)?;
        if panel.is_loading() {
            return None;
        }
        panel.refetch(ids.next())
    }

    pub fn download_selected(&self) -> Option<Command> {
        self.panels.get(self.selected)?.download()
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }
}
