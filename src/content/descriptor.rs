//! Content descriptor model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type assumed for media that does not declare one.
pub const UNKNOWN_MIME_TYPE: &str = "unknown";

/// Media file shown with a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub mime_type: String,
    pub path: String,
}

impl Media {
    pub fn new(mime_type: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub text: String,
}

impl Hint {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Warning text with an optional icon path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Warning {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Content shown for a single step in one language.
///
/// `id` and `language` identify the descriptor and must not be blank in a
/// decoded document. Every other field is optional; hints and warnings
/// keep their order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub id: String,
    pub language: String,
    pub version: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub info: Option<String>,
    /// Routine steps may be presented in a condensed form.
    pub routine: bool,
    pub media: Option<Media>,
    pub hints: Vec<Hint>,
    pub warnings: Vec<Warning>,
}

impl ContentDescriptor {
    pub fn new(id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            language: language.into(),
            version: None,
            last_update: None,
            title: None,
            info: None,
            routine: false,
            media: None,
            hints: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_last_update(mut self, timestamp: DateTime<Utc>) -> Self {
        self.last_update = Some(timestamp);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn routine(mut self, routine: bool) -> Self {
        self.routine = routine;
        self
    }

    pub fn with_media(mut self, mime_type: impl Into<String>, path: impl Into<String>) -> Self {
        self.media = Some(Media::new(mime_type, path));
        self
    }

    pub fn with_hint(mut self, hint: Hint) -> Self {
        self.hints.push(hint);
        self
    }

    pub fn with_warning(mut self, warning: Warning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Touch the last update timestamp.
    pub fn touch(&mut self) {
        self.last_update = Some(Utc::now());
    }
}
