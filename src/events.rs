use std::path::PathBuf;

use crate::error::GenerationError;
use crate::models::{AssetCategory, ThemeTextData};

/// Identifies one provider call. Results whose id is no longer awaited are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

#[derive(Debug, Default)]
pub struct RequestIds {
    last: u64,
}

impl RequestIds {
    pub const fn next(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }
}

/// Work the event loop performs on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GenerateTheme {
        request: RequestId,
        topic: String,
    },
    FetchAsset {
        request: RequestId,
        category: AssetCategory,
        topic: String,
    },
    ExportAsset {
        category: AssetCategory,
        topic: String,
        data_uri: String,
    },
}

#[derive(Debug)]
pub enum AppEvent {
    ThemeGenerated {
        request: RequestId,
        result: Result<ThemeTextData, GenerationError>,
    },
    AssetGenerated {
        request: RequestId,
        category: AssetCategory,
        result: Result<String, GenerationError>,
    },
    AssetExported(Result<PathBuf, String>),
}
