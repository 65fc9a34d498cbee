pub mod asset_panel;
pub mod theme_view;
pub mod topic_form;

pub use asset_panel::{AssetPanel, AssetPhase};
pub use theme_view::ThemeView;
pub use topic_form::TopicForm;
