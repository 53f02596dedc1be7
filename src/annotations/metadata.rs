//! Reader-facing metadata: titles, descriptions, timestamps and VR scenes.

use super::Parameters;
use crate::core::LocalizedText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reader-facing information about a guide, node or decision.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataAnnotation {
    #[serde(default)]
    titles: LocalizedText,
    #[serde(default)]
    descriptions: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_update: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vr_scene: Option<VrScene>,
}

impl MetadataAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, language: impl Into<String>, title: impl Into<String>) -> Self {
        self.set_title(language, title);
        self
    }

    pub fn with_description(
        mut self,
        language: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.set_description(language, description);
        self
    }

    pub fn with_last_update(mut self, timestamp: DateTime<Utc>) -> Self {
        self.last_update = Some(timestamp);
        self
    }

    pub fn with_vr_scene(mut self, scene: VrScene) -> Self {
        self.vr_scene = Some(scene);
        self
    }

    pub fn titles(&self) -> &LocalizedText {
        &self.titles
    }

    pub fn title(&self, language: &str) -> Option<&str> {
        self.titles.get(language).map(String::as_str)
    }

    pub fn set_title(&mut self, language: impl Into<String>, title: impl Into<String>) {
        self.titles.set(language, title.into());
    }

    pub fn set_titles(&mut self, titles: LocalizedText) {
        self.titles = titles;
    }

    pub fn descriptions(&self) -> &LocalizedText {
        &self.descriptions
    }

    pub fn description(&self, language: &str) -> Option<&str> {
        self.descriptions.get(language).map(String::as_str)
    }

    pub fn set_description(
        &mut self,
        language: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.descriptions.set(language, description.into());
    }

    pub fn set_descriptions(&mut self, descriptions: LocalizedText) {
        self.descriptions = descriptions;
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn set_last_update(&mut self, timestamp: Option<DateTime<Utc>>) {
        self.last_update = timestamp;
    }

    /// Stamp the annotation with the current time.
    pub fn touch(&mut self) {
        self.last_update = Some(Utc::now());
    }

    pub fn vr_scene(&self) -> Option<&VrScene> {
        self.vr_scene.as_ref()
    }

    pub fn set_vr_scene(&mut self, scene: Option<VrScene>) {
        self.vr_scene = scene;
    }
}

/// Scene shown in a VR player while the annotated element is active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrScene {
    id: String,
    #[serde(default)]
    parameters: Parameters,
}

impl VrScene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.set(id, value);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}
