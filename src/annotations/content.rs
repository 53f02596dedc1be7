//! Player-facing content: packages, warnings, tools and engine scenes.

use super::Parameters;
use crate::core::{Localized, LocalizedText};
use serde::{Deserialize, Serialize};

/// Player-facing content bound to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAnnotation {
    #[serde(default)]
    packages: LocalizedText,
    #[serde(default)]
    warnings: Localized<Vec<String>>,
    #[serde(default)]
    tools: Vec<ToolAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene: Option<SceneAnnotation>,
}

impl ContentAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content package reference per language.
    pub fn packages(&self) -> &LocalizedText {
        &self.packages
    }

    pub fn package(&self, language: &str) -> Option<&str> {
        self.packages.get(language).map(String::as_str)
    }

    pub fn set_package(&mut self, language: impl Into<String>, package: impl Into<String>) {
        self.packages.set(language, package.into());
    }

    pub fn set_packages(&mut self, packages: LocalizedText) {
        self.packages = packages;
    }

    pub fn with_package(mut self, language: impl Into<String>, package: impl Into<String>) -> Self {
        self.set_package(language, package);
        self
    }

    /// Warnings per language, several per language allowed.
    pub fn warnings(&self) -> &Localized<Vec<String>> {
        &self.warnings
    }

    pub fn add_warning(&mut self, language: impl Into<String>, warning: impl Into<String>) {
        self.warnings.push(language, warning.into());
    }

    /// Replace all warnings. Languages without any warning are dropped.
    pub fn set_warnings(&mut self, mut warnings: Localized<Vec<String>>) {
        warnings.retain(|_, list| !list.is_empty());
        self.warnings = warnings;
    }

    pub fn with_warning(mut self, language: impl Into<String>, warning: impl Into<String>) -> Self {
        self.add_warning(language, warning);
        self
    }

    pub fn tools(&self) -> &[ToolAnnotation] {
        &self.tools
    }

    pub fn add_tool(&mut self, tool: ToolAnnotation) {
        self.tools.push(tool);
    }

    pub fn with_tool(mut self, tool: ToolAnnotation) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn scene(&self) -> Option<&SceneAnnotation> {
        self.scene.as_ref()
    }

    pub fn set_scene(&mut self, scene: Option<SceneAnnotation>) {
        self.scene = scene;
    }

    pub fn with_scene(mut self, scene: SceneAnnotation) -> Self {
        self.scene = Some(scene);
        self
    }
}

/// A tool the user needs for a step, with tool-specific parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolAnnotation {
    id: String,
    #[serde(default)]
    parameters: Parameters,
}

impl ToolAnnotation {
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

/// Engine scene node to activate, and optionally a method to invoke on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAnnotation {
    node_id: String,
    #[serde(default)]
    node_parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    method: Option<SceneMethod>,
}

impl SceneAnnotation {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            node_parameters: Parameters::new(),
            method: None,
        }
    }

    pub fn with_node_parameters(mut self, parameters: Parameters) -> Self {
        self.node_parameters = parameters;
        self
    }

    pub fn with_method(mut self, method: SceneMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn node_parameters(&self) -> &Parameters {
        &self.node_parameters
    }

    pub fn method(&self) -> Option<&SceneMethod> {
        self.method.as_ref()
    }
}

/// Method invoked on a scene node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneMethod {
    id: String,
    #[serde(default)]
    parameters: Parameters,
}

impl SceneMethod {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: Parameters::new(),
        }
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
