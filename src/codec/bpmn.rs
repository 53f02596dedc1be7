//! BPMN `process` encoding and two-pass decoding of guides.

use super::conditions::ConditionRegistry;
use super::error::{DecodeError, EncodeError};
use super::localized::{decode_localized, encode_localized};
use super::xml::{self, XmlElement};
use super::{
    format_timestamp, parse_timestamp, Format, BPMN_NS, CONDITION_NS, CONTENT_NS, METADATA_NS,
};
use crate::annotations::{
    ContentAnnotation, MetadataAnnotation, Parameters, SceneAnnotation, SceneMethod,
    ToolAnnotation, VrScene,
};
use crate::core::{Condition, Decision, Node, NodeKind, Transition};
use crate::guide::Guide;
use std::collections::HashMap;
use tracing::trace;

/// Encode a guide as a BPMN `process` document.
///
/// Nodes are written in insertion order, each followed by its outgoing
/// flows, so encoding the same guide twice yields identical output.
///
/// # Example
///
/// ```rust
/// use guidegraph::codec::{decode_guide, encode_guide, Format};
/// use guidegraph::core::Node;
/// use guidegraph::guide::Guide;
///
/// let mut guide = Guide::new("make-tea");
/// guide.set_title("en_US", "Make tea");
/// guide.insert(Node::step().named("Boil water"))?;
///
/// let xml = encode_guide(&guide, Format::Pretty)?;
/// let decoded = decode_guide(&xml)?;
///
/// assert_eq!(decoded.nodes(), guide.nodes());
/// assert_eq!(decoded.title("en_US"), Some("Make tea"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode_guide(guide: &Guide, format: Format) -> Result<String, EncodeError> {
    let mut process = XmlElement::new(BPMN_NS, "process")
        .attr("isExecutable", "true")
        .attr("id", guide.id());
    process.push(
        XmlElement::new(BPMN_NS, "extensionElements").child(metadata_element(guide.metadata())),
    );
    let mut flows = 0;
    for node in guide.nodes() {
        process.push(node_element(guide, node));
        for transition in node.outgoing() {
            process.push(flow_element(transition));
            flows += 1;
        }
    }
    trace!(guide = guide.id(), nodes = guide.nodes().len(), flows, "encoded guide");
    xml::write(&process, format)
}

/// Decode a BPMN `process` document with the default condition registry.
pub fn decode_guide(input: &str) -> Result<Guide, DecodeError> {
    GuideDecoder::default().decode(input)
}

/// Configurable decoder for BPMN `process` documents.
#[derive(Debug, Clone, Default)]
pub struct GuideDecoder {
    conditions: ConditionRegistry,
}

impl GuideDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode conditions through a custom registry.
    pub fn with_conditions(conditions: ConditionRegistry) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &ConditionRegistry {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionRegistry {
        &mut self.conditions
    }

    /// Decode a guide.
    ///
    /// Every node is instantiated first, then flows are resolved against
    /// the complete node set. The result is validated like any edit.
    pub fn decode(&self, input: &str) -> Result<Guide, DecodeError> {
        let root = xml::parse(input)?;
        if !root.is(BPMN_NS, "process") {
            return Err(DecodeError::UnexpectedRoot {
                expected: "process",
                found: root.name().to_string(),
            });
        }
        let id = root.required_attribute("id")?;

        let mut nodes = Vec::new();
        let mut incoming_echoes = Vec::new();
        let mut flow_elements = Vec::new();
        for child in root.children() {
            if child.namespace() != Some(BPMN_NS) {
                continue;
            }
            match child.name() {
                "extensionElements" => {}
                "sequenceFlow" => flow_elements.push(child),
                tag => {
                    let node = decode_node(tag, child)?;
                    let echoed: Vec<String> = child
                        .children_named(BPMN_NS, "incoming")
                        .map(|e| e.text_content().trim().to_string())
                        .collect();
                    incoming_echoes.push((node.id().to_string(), echoed));
                    nodes.push(node);
                }
            }
        }
        trace!(guide = id, nodes = nodes.len(), "decoded nodes");

        let transitions = flow_elements
            .into_iter()
            .map(|element| self.decode_flow(element, &nodes))
            .collect::<Result<Vec<_>, _>>()?;
        let sources: HashMap<String, String> = transitions
            .iter()
            .map(|t| (t.id().to_string(), t.source().to_string()))
            .collect();
        trace!(guide = id, flows = transitions.len(), "resolved flows");

        let metadata = decode_metadata(&root)?.unwrap_or_default();
        let mut guide = Guide::assemble(id, nodes, transitions, metadata)?;
        for (node_id, flow_ids) in incoming_echoes {
            let order: Vec<String> = flow_ids
                .iter()
                .filter_map(|flow| sources.get(flow).cloned())
                .collect();
            guide.order_incoming(&node_id, &order);
        }
        Ok(guide)
    }

    fn decode_flow(&self, element: &XmlElement, nodes: &[Node]) -> Result<Transition, DecodeError> {
        let id = element.required_attribute("id")?;
        let source = element.required_attribute("sourceRef")?;
        let target = element.required_attribute("targetRef")?;
        for reference in [source, target] {
            if !nodes.iter().any(|n| n.id() == reference) {
                return Err(DecodeError::UnknownReference {
                    flow: id.to_string(),
                    node: reference.to_string(),
                });
            }
        }

        let transition = Transition::with_id(id, source, target);
        let condition = element
            .first_child(BPMN_NS, "extensionElements")
            .and_then(|extensions| extensions.first_child(CONDITION_NS, "condition"));
        let Some(condition) = condition else {
            return Ok(transition);
        };
        let captions = decode_metadata(element)?
            .ok_or_else(|| DecodeError::MissingCaptions(id.to_string()))?
            .titles()
            .clone();
        let condition = self.conditions.decode(condition)?;
        Ok(transition.with_decision(Decision::new(captions, condition)))
    }
}

fn node_element(guide: &Guide, node: &Node) -> XmlElement {
    let mut element = XmlElement::new(BPMN_NS, node.kind().tag());
    for (key, value) in default_attributes(node.kind()) {
        element.set_attr(key, *value);
    }
    element.set_attr("id", node.id());
    if let Some(name) = node.name() {
        element.set_attr("name", name);
    }
    if let Some(called) = node.called_guide() {
        element.set_attr("calledElement", called);
    }

    if node.metadata().is_some() || node.content().is_some() {
        let mut extensions = XmlElement::new(BPMN_NS, "extensionElements");
        if let Some(metadata) = node.metadata() {
            extensions.push(metadata_element(metadata));
        }
        if let Some(content) = node.content() {
            extensions.push(content_element(content));
        }
        element.push(extensions);
    }

    for source in node.incoming() {
        if let Some(transition) = guide.node(source).and_then(|s| s.outgoing_to(node.id())) {
            element.push(XmlElement::new(BPMN_NS, "incoming").text(transition.id()));
        }
    }
    for transition in node.outgoing() {
        element.push(XmlElement::new(BPMN_NS, "outgoing").text(transition.id()));
    }
    element
}

/// Attributes BPMN modelling tools expect on each element.
fn default_attributes(kind: &NodeKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        NodeKind::Start => &[("isInterrupting", "true"), ("parallelMultiple", "false")],
        NodeKind::Step => &[
            ("completionQuantity", "1"),
            ("implementation", "##unspecified"),
            ("isForCompensation", "false"),
            ("startQuantity", "1"),
        ],
        NodeKind::Chapter { .. } => &[
            ("completionQuantity", "1"),
            ("isForCompensation", "false"),
            ("startQuantity", "1"),
        ],
        NodeKind::Branch => &[("gatewayDirection", "##Diverging")],
        NodeKind::End => &[],
    }
}

fn flow_element(transition: &Transition) -> XmlElement {
    let mut element = XmlElement::new(BPMN_NS, "sequenceFlow")
        .attr("id", transition.id())
        .attr("sourceRef", transition.source())
        .attr("targetRef", transition.target());
    if let Some(decision) = transition.decision() {
        let mut captions = XmlElement::new(METADATA_NS, "metadata");
        encode_localized(&mut captions, METADATA_NS, "title", decision.captions());
        element.push(
            XmlElement::new(BPMN_NS, "extensionElements")
                .child(captions)
                .child(condition_element(decision.condition())),
        );
    }
    element
}

fn condition_element(condition: &Condition) -> XmlElement {
    let mut element = XmlElement::new(CONDITION_NS, "condition")
        .attr("type", condition.type_name())
        .attr("key", condition.key());
    for (key, value) in condition.arguments() {
        element.set_attr(key, value);
    }
    element
}

fn decode_node(tag: &str, element: &XmlElement) -> Result<Node, DecodeError> {
    let id = element.required_attribute("id")?;
    let kind = match tag {
        "startEvent" => NodeKind::Start,
        "endEvent" => NodeKind::End,
        "userTask" => NodeKind::Step,
        "callActivity" => NodeKind::Chapter {
            guide_id: element.required_attribute("calledElement")?.to_string(),
        },
        "exclusiveGateway" => NodeKind::Branch,
        other => return Err(DecodeError::UnknownElement(other.to_string())),
    };
    let mut node = Node::with_id(kind, id);
    node.set_name(element.attribute("name").map(String::from));
    if let Some(metadata) = decode_metadata(element)? {
        node.set_metadata(metadata);
    }
    if let Some(content) = decode_content(element)? {
        node.set_content(content);
    }
    Ok(node)
}

fn metadata_element(metadata: &MetadataAnnotation) -> XmlElement {
    let mut block = XmlElement::new(METADATA_NS, "metadata");
    encode_localized(&mut block, METADATA_NS, "title", metadata.titles());
    encode_localized(&mut block, METADATA_NS, "description", metadata.descriptions());
    if let Some(timestamp) = metadata.last_update() {
        block.push(XmlElement::new(METADATA_NS, "lastUpdate").text(format_timestamp(&timestamp)));
    }
    if let Some(scene) = metadata.vr_scene() {
        let mut element = XmlElement::new(METADATA_NS, "vrScene").attr("id", scene.id());
        push_parameters(&mut element, METADATA_NS, scene.parameters());
        block.push(element);
    }
    block
}

fn decode_metadata(owner: &XmlElement) -> Result<Option<MetadataAnnotation>, DecodeError> {
    let Some(block) = owner
        .first_child(BPMN_NS, "extensionElements")
        .and_then(|extensions| extensions.first_child(METADATA_NS, "metadata"))
    else {
        return Ok(None);
    };

    let mut metadata = MetadataAnnotation::new();
    metadata.set_titles(decode_localized(block, METADATA_NS, "title")?);
    metadata.set_descriptions(decode_localized(block, METADATA_NS, "description")?);
    if let Some(text) = block.child_text(METADATA_NS, "lastUpdate") {
        metadata.set_last_update(Some(parse_timestamp(text)?));
    }
    if let Some(scene) = block.first_child(METADATA_NS, "vrScene") {
        let vr_scene = VrScene::new(scene.required_attribute("id")?)
            .with_parameters(decode_parameters(scene, METADATA_NS)?);
        metadata.set_vr_scene(Some(vr_scene));
    }
    Ok(Some(metadata))
}

fn content_element(content: &ContentAnnotation) -> XmlElement {
    let mut block = XmlElement::new(CONTENT_NS, "content");
    if !content.packages().is_empty() {
        let mut assistance = XmlElement::new(CONTENT_NS, "assistance");
        encode_localized(&mut assistance, CONTENT_NS, "package", content.packages());
        block.push(assistance);
    }
    if !content.warnings().is_empty() {
        let mut warnings = XmlElement::new(CONTENT_NS, "warnings");
        encode_localized(&mut warnings, CONTENT_NS, "warning", content.warnings());
        block.push(warnings);
    }
    if !content.tools().is_empty() {
        let mut tools = XmlElement::new(CONTENT_NS, "tools");
        for tool in content.tools() {
            let mut element = XmlElement::new(CONTENT_NS, "tool").attr("id", tool.id());
            push_parameters(&mut element, CONTENT_NS, tool.parameters());
            tools.push(element);
        }
        block.push(tools);
    }
    if let Some(scene) = content.scene() {
        let mut node = XmlElement::new(CONTENT_NS, "node").attr("id", scene.node_id());
        push_parameters(&mut node, CONTENT_NS, scene.node_parameters());
        let mut element = XmlElement::new(CONTENT_NS, "scene").child(node);
        if let Some(method) = scene.method() {
            let mut method_element = XmlElement::new(CONTENT_NS, "method").attr("id", method.id());
            push_parameters(&mut method_element, CONTENT_NS, method.parameters());
            element.push(method_element);
        }
        block.push(element);
    }
    block
}

fn decode_content(owner: &XmlElement) -> Result<Option<ContentAnnotation>, DecodeError> {
    let Some(block) = owner
        .first_child(BPMN_NS, "extensionElements")
        .and_then(|extensions| extensions.first_child(CONTENT_NS, "content"))
    else {
        return Ok(None);
    };

    let mut content = ContentAnnotation::new();
    if let Some(assistance) = block.first_child(CONTENT_NS, "assistance") {
        content.set_packages(decode_localized(assistance, CONTENT_NS, "package")?);
    }
    if let Some(warnings) = block.first_child(CONTENT_NS, "warnings") {
        content.set_warnings(decode_localized(warnings, CONTENT_NS, "warning")?);
    }
    if let Some(tools) = block.first_child(CONTENT_NS, "tools") {
        for tool in tools.children_named(CONTENT_NS, "tool") {
            content.add_tool(
                ToolAnnotation::new(tool.required_attribute("id")?)
                    .with_parameters(decode_parameters(tool, CONTENT_NS)?),
            );
        }
    }
    if let Some(scene) = block.first_child(CONTENT_NS, "scene") {
        let node = scene.required_child(CONTENT_NS, "node")?;
        let mut annotation = SceneAnnotation::new(node.required_attribute("id")?)
            .with_node_parameters(decode_parameters(node, CONTENT_NS)?);
        if let Some(method) = scene.first_child(CONTENT_NS, "method") {
            annotation = annotation.with_method(
                SceneMethod::new(method.required_attribute("id")?)
                    .with_parameters(decode_parameters(method, CONTENT_NS)?),
            );
        }
        content.set_scene(Some(annotation));
    }
    Ok(Some(content))
}

fn push_parameters(owner: &mut XmlElement, namespace: &str, parameters: &Parameters) {
    if parameters.is_empty() {
        return;
    }
    let mut params = XmlElement::new(namespace, "params");
    for (id, value) in parameters.iter() {
        params.push(
            XmlElement::new(namespace, "param")
                .attr("id", id)
                .attr("value", value),
        );
    }
    owner.push(params);
}

fn decode_parameters(owner: &XmlElement, namespace: &str) -> Result<Parameters, DecodeError> {
    let mut parameters = Parameters::new();
    if let Some(params) = owner.first_child(namespace, "params") {
        for param in params.children_named(namespace, "param") {
            parameters.set(
                param.required_attribute("id")?,
                param.required_attribute("value")?,
            );
        }
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LocalizedText;
    use crate::guide::GuideError;
    use chrono::{TimeZone, Utc};

    fn rich_guide() -> Guide {
        let mut guide = Guide::new("guide-1");
        guide.set_title("de_DE", "Erfolge feiern");
        guide.set_description("de_DE", "Wie man einen Erfolg angemessen feiert");
        let end = guide.end_nodes().next().unwrap().id().to_string();

        let step = Node::with_id(NodeKind::Step, "step-1")
            .named("Sekt öffnen")
            .with_metadata(
                MetadataAnnotation::new()
                    .with_title("de_DE", "Sekt öffnen")
                    .with_title("en_US", "Open the bubbly")
                    .with_last_update(Utc.with_ymd_and_hms(2016, 10, 14, 10, 0, 0).unwrap())
                    .with_vr_scene(VrScene::new("kitchen").with_parameter("light", "dim")),
            )
            .with_content(
                ContentAnnotation::new()
                    .with_package("de_DE", "pkg-de")
                    .with_warning("de_DE", "Korken fliegt")
                    .with_warning("de_DE", "Nicht schütteln")
                    .with_tool(ToolAnnotation::new("opener").with_parameter("size", "L"))
                    .with_scene(
                        SceneAnnotation::new("bottle")
                            .with_node_parameters(Parameters::new().with("x", "1"))
                            .with_method(
                                SceneMethod::new("pop")
                                    .with_parameters(Parameters::new().with("force", "3")),
                            ),
                    ),
            );
        guide.insert(step).unwrap();
        guide
            .insert(Node::with_id(NodeKind::Chapter { guide_id: "toast".to_string() }, "chapter-1"))
            .unwrap();
        let gate = Node::with_id(NodeKind::Branch, "gate").with_decision(
            end,
            LocalizedText::new().with("de_DE", "Fertig <&>".to_string()),
            Condition::equals("done", "true"),
        );
        guide.insert(gate).unwrap();
        guide
    }

    #[test]
    fn encode_decode_preserves_graph_and_annotations() {
        let guide = rich_guide();

        for format in [Format::Pretty, Format::Compact] {
            let xml = encode_guide(&guide, format).unwrap();
            let decoded = decode_guide(&xml).unwrap();

            assert_eq!(decoded.id(), guide.id());
            assert_eq!(decoded.metadata(), guide.metadata());
            assert_eq!(decoded.nodes(), guide.nodes());
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let guide = rich_guide();
        assert_eq!(
            encode_guide(&guide, Format::Compact).unwrap(),
            encode_guide(&guide, Format::Compact).unwrap()
        );
    }

    #[test]
    fn flows_follow_their_source_node() {
        let guide = rich_guide();
        let root = xml::parse(&encode_guide(&guide, Format::Compact).unwrap()).unwrap();

        let names: Vec<_> = root
            .children()
            .iter()
            .map(|c| c.attribute("id").unwrap_or(c.name()).to_string())
            .collect();
        let step_position = names.iter().position(|n| n == "step-1").unwrap();

        assert_eq!(names[step_position + 1], "flow-step-1_chapter-1");
        assert_eq!(names[0], "extensionElements");
    }

    #[test]
    fn default_attributes_are_written() {
        let guide = rich_guide();
        let root = xml::parse(&encode_guide(&guide, Format::Compact).unwrap()).unwrap();

        let task = root.first_child(BPMN_NS, "userTask").unwrap();
        assert_eq!(task.attribute("implementation"), Some("##unspecified"));
        let gateway = root.first_child(BPMN_NS, "exclusiveGateway").unwrap();
        assert_eq!(gateway.attribute("gatewayDirection"), Some("##Diverging"));
        let start = root.first_child(BPMN_NS, "startEvent").unwrap();
        assert_eq!(start.attribute("isInterrupting"), Some("true"));
    }

    #[test]
    fn decode_rejects_wrong_root() {
        let result = decode_guide(r#"<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL"/>"#);
        assert!(matches!(
            result,
            Err(DecodeError::UnexpectedRoot { found, .. }) if found == "definitions"
        ));

        let result = decode_guide(r#"<process id="p"/>"#);
        assert!(matches!(result, Err(DecodeError::UnexpectedRoot { .. })));
    }

    #[test]
    fn decode_rejects_unknown_node_tags() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p"><startEvent id="s"/><scriptTask id="x"/></process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::UnknownElement(tag)) if tag == "scriptTask"
        ));
    }

    #[test]
    fn decode_ignores_foreign_elements() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/>
                 <note xmlns="urn:other">ignored</note>
                 <endEvent id="e"/>
                 <sequenceFlow id="f" sourceRef="s" targetRef="e"/>
               </process>"#
        );

        let guide = decode_guide(&input).unwrap();

        assert_eq!(guide.nodes().len(), 2);
        assert_eq!(guide.active_id(), "s");
        assert_eq!(guide.node("s").unwrap().name(), None);
    }

    #[test]
    fn decode_requires_ids() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p"><startEvent/></process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::MissingAttribute { element, attribute })
                if element == "startEvent" && attribute == "id"
        ));

        let input = format!(r#"<process xmlns="{BPMN_NS}"/>"#);
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::MissingAttribute { attribute, .. }) if attribute == "id"
        ));
    }

    #[test]
    fn decode_requires_called_element() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p"><callActivity id="c"/></process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::MissingAttribute { attribute, .. }) if attribute == "calledElement"
        ));
    }

    #[test]
    fn decode_rejects_unknown_flow_references() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/><endEvent id="e"/>
                 <sequenceFlow id="f" sourceRef="s" targetRef="nowhere"/>
               </process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::UnknownReference { flow, node }) if flow == "f" && node == "nowhere"
        ));
    }

    #[test]
    fn decision_without_captions_is_rejected() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/><exclusiveGateway id="g"/><endEvent id="e"/>
                 <sequenceFlow id="f1" sourceRef="s" targetRef="g"/>
                 <sequenceFlow id="f2" sourceRef="g" targetRef="e">
                   <extensionElements>
                     <condition xmlns="{CONDITION_NS}" type="equals" key="k" value="v"/>
                   </extensionElements>
                 </sequenceFlow>
               </process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::MissingCaptions(flow)) if flow == "f2"
        ));
    }

    #[test]
    fn unsupported_condition_type_is_rejected() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/><exclusiveGateway id="g"/><endEvent id="e"/>
                 <sequenceFlow id="f1" sourceRef="s" targetRef="g"/>
                 <sequenceFlow id="f2" sourceRef="g" targetRef="e">
                   <extensionElements>
                     <metadata xmlns="{METADATA_NS}"><title lang="de_DE">Ja</title></metadata>
                     <condition xmlns="{CONDITION_NS}" type="matches" key="k" value="v"/>
                   </extensionElements>
                 </sequenceFlow>
               </process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::UnsupportedCondition(t)) if t == "matches"
        ));
    }

    #[test]
    fn structurally_invalid_documents_are_rejected() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/><exclusiveGateway id="g"/><endEvent id="e"/>
                 <sequenceFlow id="f1" sourceRef="s" targetRef="g"/>
                 <sequenceFlow id="f2" sourceRef="g" targetRef="e"/>
               </process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::Structure(GuideError::UnconditionalGatewayEdge { .. }))
        ));

        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p"><startEvent id="s"/><endEvent id="e"/></process>"#
        );
        assert!(matches!(
            decode_guide(&input),
            Err(DecodeError::Structure(GuideError::Invalid(_)))
        ));
    }

    #[test]
    fn empty_warning_list_round_trips() {
        let mut guide = Guide::new("g");
        let mut content = ContentAnnotation::new();
        content.set_warnings(
            crate::core::Localized::new()
                .with("de_DE", Vec::new())
                .with("en_US", vec!["Hot".to_string()]),
        );
        guide
            .insert(Node::with_id(NodeKind::Step, "s1").with_content(content))
            .unwrap();

        let decoded = decode_guide(&encode_guide(&guide, Format::Compact).unwrap()).unwrap();

        assert_eq!(decoded.nodes(), guide.nodes());
    }

    #[test]
    fn cursor_follows_last_end_with_predecessor() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/>
                 <exclusiveGateway id="g"/>
                 <userTask id="a"/>
                 <userTask id="b"/>
                 <endEvent id="e1"/>
                 <endEvent id="e2"/>
                 <sequenceFlow id="f1" sourceRef="s" targetRef="g"/>
                 <sequenceFlow id="f2" sourceRef="g" targetRef="a">
                   <extensionElements>
                     <metadata xmlns="{METADATA_NS}"><title lang="de_DE">A</title></metadata>
                     <condition xmlns="{CONDITION_NS}" type="equals" key="k" value="a"/>
                   </extensionElements>
                 </sequenceFlow>
                 <sequenceFlow id="f3" sourceRef="g" targetRef="b">
                   <extensionElements>
                     <metadata xmlns="{METADATA_NS}"><title lang="de_DE">B</title></metadata>
                     <condition xmlns="{CONDITION_NS}" type="equals" key="k" value="b"/>
                   </extensionElements>
                 </sequenceFlow>
                 <sequenceFlow id="f4" sourceRef="a" targetRef="e1"/>
                 <sequenceFlow id="f5" sourceRef="b" targetRef="e2"/>
               </process>"#
        );

        let guide = decode_guide(&input).unwrap();

        assert_eq!(guide.end_nodes().count(), 2);
        assert_eq!(guide.active_id(), "b");
    }

    #[test]
    fn incoming_order_follows_echo() {
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/>
                 <userTask id="a"/>
                 <userTask id="b"/>
                 <endEvent id="e">
                   <incoming>f-b</incoming>
                   <incoming>f-a</incoming>
                 </endEvent>
                 <sequenceFlow id="f-sa" sourceRef="s" targetRef="a"/>
                 <sequenceFlow id="f-ab" sourceRef="a" targetRef="b"/>
                 <sequenceFlow id="f-a" sourceRef="a" targetRef="e"/>
                 <sequenceFlow id="f-b" sourceRef="b" targetRef="e"/>
               </process>"#
        );

        let guide = decode_guide(&input).unwrap();

        assert_eq!(guide.node("e").unwrap().incoming(), &["b", "a"]);
        assert_eq!(guide.active_id(), "b");
    }

    #[test]
    fn custom_condition_registry_is_used() {
        fn fixed(key: &str, _: &XmlElement) -> Result<Condition, DecodeError> {
            Ok(Condition::equals(key, "fixed"))
        }
        let mut decoder = GuideDecoder::new();
        decoder.conditions_mut().register("legacy", fixed);
        let input = format!(
            r#"<process xmlns="{BPMN_NS}" id="p">
                 <startEvent id="s"/><exclusiveGateway id="g"/><endEvent id="e"/>
                 <sequenceFlow id="f1" sourceRef="s" targetRef="g"/>
                 <sequenceFlow id="f2" sourceRef="g" targetRef="e">
                   <extensionElements>
                     <metadata xmlns="{METADATA_NS}"><title lang="de_DE">Ja</title></metadata>
                     <condition xmlns="{CONDITION_NS}" type="legacy" key="k"/>
                   </extensionElements>
                 </sequenceFlow>
               </process>"#
        );

        let guide = decoder.decode(&input).unwrap();

        let decision = guide.node("g").unwrap().outgoing()[0].decision().unwrap();
        assert_eq!(decision.condition(), &Condition::equals("k", "fixed"));
        assert_eq!(decision.caption("de_DE"), Some("Ja"));
    }
}
