use std::path::PathBuf;

use crate::components::{ThemeView, TopicForm};
use crate::error::GenerationError;
use crate::events::{AppEvent, Command, RequestId, RequestIds};
use crate::models::{AssetCategory, ThemeTextData};

pub const GENERATION_FAILED: &str = "Could not generate the theme. Check your API key or try again.";

#[derive(Debug)]
pub struct PendingTheme {
    pub request: RequestId,
    pub topic: String,
}

#[derive(Debug)]
pub enum View {
    Input {
        form: TopicForm,
        pending: Option<PendingTheme>,
    },
    Results(ThemeView),
}

impl Default for View {
    fn default() -> Self {
        Self::Input {
            form: TopicForm::default(),
            pending: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub view: View,
    pub should_quit: bool,
    pub show_help: bool,
    pub exit_pending: bool,
    /// Global error notice; at most one, replaced by newer errors.
    pub notice: Option<String>,
    /// Last export outcome shown on the results screen.
    pub status: Option<String>,
    ids: RequestIds,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.view, View::Input { pending: Some(_), .. })
    }

    pub fn form_mut(&mut self) -> Option<&mut TopicForm> {
        match &mut self.view {
            View::Input { form, .. } => Some(form),
            View::Results(_) => None,
        }
    }

    pub const fn results_view(&self) -> Option<&ThemeView> {
        match &self.view {
            View::Results(view) => Some(view),
            View::Input { .. } => None,
        }
    }

    pub fn results_mut(&mut self) -> Option<&mut ThemeView> {
        match &mut self.view {
            View::Results(view) => Some(view),
            View::Input { .. } => None,
        }
    }

    /// Submits the form if it holds a topic and nothing is in flight.
    pub fn submit(&mut self) -> Option<Command> {
        let View::Input { form, pending } = &self.view else {
            return None;
        };
        let topic = form.submit(pending.is_some())?;
        self.generate(topic)
    }

    pub fn generate(&mut self, topic: String) -> Option<Command> {
        let View::Input { pending, .. } = &mut self.view else {
            return None;
        };
        if pending.is_some() {
            return None;
        }

        let request = self.ids.next();
        *pending = Some(PendingTheme {
            request,
            topic: topic.clone(),
        });
        self.notice = None;
        tracing::info!(?request, %topic, "generating theme");
        Some(Command::GenerateTheme { request, topic })
    }

    pub fn on_theme_generated(
        &mut self,
        request: RequestId,
        result: Result<ThemeTextData, GenerationError>,
    ) -> Vec<Command> {
        let View::Input { pending, .. } = &mut self.view else {
            return Vec::new();
        };
        if pending.as_ref().map(|p| p.request) != Some(request) {
            tracing::debug!(?request, "dropping stale theme result");
            return Vec::new();
        }
        let Some(PendingTheme { topic, .. }) = pending.take() else {
            return Vec::new();
        };

        match result {
            Ok(theme) => {
                let (view, commands) = ThemeView::mount(theme, topic, &mut self.ids);
                self.view = View::Results(view);
                self.status = None;
                commands
            }
            Err(err) => {
                tracing::warn!(%err, "theme generation failed");
                self.notice = Some(GENERATION_FAILED.to_string());
                Vec::new()
            }
        }
    }

    pub fn on_asset_generated(
        &mut self,
        request: RequestId,
        category: AssetCategory,
        result: Result<String, GenerationError>,
    ) {
        if let Some(view) = self.results_mut() {
            view.resolve_asset(request, category, result);
        }
    }

    pub fn on_export_finished(&mut self, result: Result<PathBuf, String>) {
        match result {
            Ok(path) => self.status = Some(format!("Saved {}", path.display())),
            Err(err) => self.notice = Some(format!("Could not save image: {err}")),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::ThemeGenerated { request, result } => self.on_theme_generated(request, result),
            AppEvent::AssetGenerated {
                request,
                category,
                result,
            } => {
                self.on_asset_generated(request, category, result);
                Vec::new()
            }
            AppEvent::AssetExported(result) => {
                self.on_export_finished(result);
                Vec::new()
            }
        }
    }

    /// Returns to an empty input screen, dropping the current theme.
    pub fn back(&mut self) {
        self.view = View::default();
        self.status = None;
    }

    pub fn refetch_selected(&mut self) -> Option<Command> {
        let View::Results(view) = &mut self.view else {
            return None;
        };
        view.refetch_selected(&mut self.ids)
    }

    pub fn download_selected(&self) -> Option<Command> {
        match &self.view {
            View::Results(view) => view.download_selected(),
            View::Input { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AssetPhase;
    use crate::models::sample_theme;

    fn submit_topic(app: &mut App, topic: &str) -> RequestId {
        app.form_mut().unwrap().input = topic.to_string();
        match app.submit() {
            Some(Command::GenerateTheme { request, topic: sent }) => {
                assert_eq!(sent, topic);
                request
            }
            other => panic!("expected GenerateTheme, got {other:?}"),
        }
    }

    fn app_with_results(topic: &str) -> (App, Vec<Command>) {
        let mut app = App::new();
        let request = submit_topic(&mut app, topic);
        let commands = app.on_theme_generated(request, Ok(sample_theme()));
        (app, commands)
    }

    #[test]
    fn test_app_new() {
        let app = App::new();
        assert!(matches!(app.view, View::Input { pending: None, .. }));
        assert!(!app.should_quit);
        assert!(!app.is_loading());
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.quit();
        assert!(app.should_quit);
    }

    #[test]
    fn test_toggle_help() {
        let mut app = App::new();
        app.toggle_help();
        assert!(app.show_help);
        app.toggle_help();
        assert!(!app.show_help);
    }

    #[test]
    fn test_submit_issues_single_generation() {
        let mut app = App::new();
        app.notice = Some("old".to_string());
        submit_topic(&mut app, "Retro Space Party");

        assert!(app.is_loading());
        assert!(app.notice.is_none());
        // Still in flight: a second submit does nothing.
        assert!(app.submit().is_none());
    }

    #[test]
    fn test_blank_topic_is_not_submitted() {
        let mut app = App::new();
        app.form_mut().unwrap().input = "   ".to_string();
        assert!(app.submit().is_none());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_success_transitions_to_results() {
        let (app, commands) = app_with_results("Retro Space Party");

        assert!(!app.is_loading());
        let View::Results(view) = &app.view else {
            panic!("expected results view");
        };
        assert_eq!(view.theme().title, "Cosmic Disco");
        assert_eq!(view.topic(), "Retro Space Party");
        assert_eq!(commands.len(), 4);
        assert!(view.panels().iter().all(|p| p.phase() == &AssetPhase::Loading));
    }

    #[test]
    fn test_failure_stays_on_input_with_notice() {
        let mut app = App::new();
        let request = submit_topic(&mut app, "Retro Space Party");
        let commands = app.on_theme_generated(request, Err(GenerationError::EmptyResponse));

        assert!(commands.is_empty());
        assert!(!app.is_loading());
        assert_eq!(app.notice.as_deref(), Some(GENERATION_FAILED));
        let View::Input { form, .. } = &app.view else {
            panic!("expected input view");
        };
        assert_eq!(form.input, "Retro Space Party");

        // The form is usable again right away.
        assert!(app.submit().is_some());
    }

    #[test]
    fn test_stale_theme_result_is_ignored() {
        let mut app = App::new();
        let request = submit_topic(&mut app, "x");
        let commands = app.on_theme_generated(request, Err(GenerationError::MissingImage));
        assert!(commands.is_empty());

        let newer = submit_topic(&mut app, "y");
        assert!(app.on_theme_generated(request, Ok(sample_theme())).is_empty());
        assert!(app.is_loading());

        assert_eq!(app.on_theme_generated(newer, Ok(sample_theme())).len(), 4);
    }

    #[test]
    fn test_back_resets_to_empty_input() {
        let (mut app, _) = app_with_results("Beach Wedding");
        app.notice = Some("boom".to_string());
        app.back();

        let View::Input { form, pending } = &app.view else {
            panic!("expected input view");
        };
        assert!(form.input.is_empty());
        assert!(pending.is_none());
        assert_eq!(app.notice.as_deref(), Some("boom"));
    }

    #[test]
    fn test_asset_results_after_back_are_discarded() {
        let (mut app, commands) = app_with_results("Beach Wedding");
        app.back();

        for command in commands {
            if let Command::FetchAsset { request, category, .. } = command {
                app.on_asset_generated(request, category, Ok("data:image/png;base64,AA==".into()));
            }
        }
        assert!(matches!(app.view, View::Input { .. }));
    }

    #[test]
    fn test_refetch_and_download_flow() {
        let (mut app, commands) = app_with_results("Beach Wedding");
        let Some(Command::FetchAsset { request, category, .. }) = commands.first().cloned() else {
            panic!("expected fetch command");
        };

        assert!(app.download_selected().is_none());
        app.handle_event(AppEvent::AssetGenerated {
            request,
            category,
            result: Ok("data:image/png;base64,AA==".to_string()),
        });

        assert!(matches!(
            app.download_selected(),
            Some(Command::ExportAsset { ref topic, .. }) if topic == "Beach Wedding"
        ));
        assert!(matches!(app.refetch_selected(), Some(Command::FetchAsset { .. })));
        assert!(app.download_selected().is_none());
    }

    #[test]
    fn test_export_outcome() {
        let mut app = App::new();
        app.on_export_finished(Ok(PathBuf::from("/tmp/Flag-x.png")));
        assert_eq!(app.status.as_deref(), Some("Saved /tmp/Flag-x.png"));

        app.on_export_finished(Err("disk full".to_string()));
        assert_eq!(app.notice.as_deref(), Some("Could not save image: disk full"));
        app.dismiss_notice();
        assert!(app.notice.is_none());
    }
}
