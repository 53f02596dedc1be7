//! Structural edits: insert, remove, move, connect and chapter extraction.

use super::{Guide, GuideError};
use crate::annotations::MetadataAnnotation;
use crate::core::{Condition, Decision, LocalizedText, Node, Transition};
use tracing::debug;

impl Guide {
    /// Splice a node behind the active node.
    ///
    /// The node takes over every successor of the active node, becomes the
    /// active node's only successor, and then becomes the active node
    /// itself. Transitions declared on the standalone node are linked
    /// first, so a branch can be inserted with its decisions in place.
    ///
    /// # Example
    ///
    /// ```rust
    /// use guidegraph::core::Node;
    /// use guidegraph::guide::Guide;
    ///
    /// let mut guide = Guide::new("g");
    /// let a = Node::step();
    /// let b = Node::step();
    /// let (a_id, b_id) = (a.id().to_string(), b.id().to_string());
    ///
    /// guide.insert(a)?;
    /// guide.insert(b)?;
    ///
    /// let path = &guide.all_paths()?[0];
    /// assert_eq!(&path[1..3], &[a_id, b_id]);
    /// # Ok::<(), guidegraph::guide::GuideError>(())
    /// ```
    pub fn insert(&mut self, node: Node) -> Result<(), GuideError> {
        let predecessor = self.active.clone();
        self.insert_after(node, &predecessor)
    }

    /// Repoint the cursor to `predecessor`, then splice like [`Guide::insert`].
    pub fn insert_after(&mut self, node: Node, predecessor: &str) -> Result<(), GuideError> {
        let node_id = node.id().to_string();
        self.transact(|guide| guide.splice(node, predecessor))?;
        debug!(guide = %self.id, node = %node_id, predecessor, "inserted node");
        Ok(())
    }

    /// Detach a node, connecting each of its predecessors to its successor.
    ///
    /// Returns the detached node with its edges cleared.
    pub fn remove(&mut self, node_id: &str) -> Result<Node, GuideError> {
        let removed = self.transact(|guide| guide.detach(node_id))?;
        debug!(guide = %self.id, node = node_id, "removed node");
        Ok(removed)
    }

    /// Move a node behind another one in a single transaction.
    pub fn move_node(&mut self, node_id: &str, new_predecessor: &str) -> Result<(), GuideError> {
        self.require(node_id)?;
        let predecessor = self.require(new_predecessor)?;
        if self.nodes[predecessor].is_end() {
            return Err(GuideError::MoveAfterEnd {
                node: node_id.to_string(),
                predecessor: new_predecessor.to_string(),
            });
        }
        if node_id == new_predecessor {
            return Err(GuideError::IllegalTopology(format!(
                "cannot move '{node_id}' behind itself"
            )));
        }
        self.transact(|guide| {
            let node = guide.detach(node_id)?;
            guide.splice(node, new_predecessor)
        })?;
        debug!(guide = %self.id, node = node_id, predecessor = new_predecessor, "moved node");
        Ok(())
    }

    /// Add a plain transition between two nodes of this guide.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), GuideError> {
        self.transact(|guide| guide.link(Transition::new(source, target)))?;
        debug!(guide = %self.id, source, target, "connected nodes");
        Ok(())
    }

    /// Add a decision between two nodes of this guide.
    pub fn add_decision(
        &mut self,
        source: &str,
        target: &str,
        captions: LocalizedText,
        condition: Condition,
    ) -> Result<(), GuideError> {
        let transition =
            Transition::new(source, target).with_decision(Decision::new(captions, condition));
        self.transact(|guide| guide.link(transition))?;
        debug!(guide = %self.id, source, target, "added decision");
        Ok(())
    }

    /// Remove the transition between two nodes, if there is one.
    ///
    /// Fails without mutation when no end node would stay reachable.
    pub fn disconnect(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Option<Transition>, GuideError> {
        let removed = self.transact(|guide| {
            guide.require(source)?;
            guide.require(target)?;
            Ok(guide.unlink(source, target))
        })?;
        debug!(guide = %self.id, source, target, removed = removed.is_some(), "disconnected nodes");
        Ok(removed)
    }

    /// Register an additional end node behind `predecessor`.
    ///
    /// A decision is required when the predecessor is a branch.
    pub fn add_end(
        &mut self,
        end: Node,
        predecessor: &str,
        decision: Option<Decision>,
    ) -> Result<(), GuideError> {
        if !end.is_end() {
            return Err(GuideError::IllegalTopology(format!(
                "'{}' is a {} node, expected an end node",
                end.id(),
                end.kind().label()
            )));
        }
        let end_id = end.id().to_string();
        self.transact(|guide| {
            guide.require(predecessor)?;
            guide.adopt(end)?;
            let mut transition = Transition::new(predecessor, &end_id);
            if let Some(decision) = decision {
                transition = transition.with_decision(decision);
            }
            guide.link(transition)
        })?;
        debug!(guide = %self.id, node = %end_id, predecessor, "added end node");
        Ok(())
    }

    /// Extract a closed run of nodes into a new guide.
    ///
    /// The run is replaced by a chapter node referencing the new guide,
    /// which gets fresh start and end nodes around the extracted ones.
    /// Every node but the last must only lead into the run, and every node
    /// but the first must only be reached from inside the run.
    pub fn combine_to_chapter(
        &mut self,
        guide_id: &str,
        node_ids: &[&str],
    ) -> Result<Guide, GuideError> {
        let chapter = self.transact(|guide| guide.extract(guide_id, node_ids))?;
        debug!(
            guide = %self.id,
            chapter = guide_id,
            nodes = node_ids.len(),
            "combined nodes into chapter"
        );
        Ok(chapter)
    }

    fn splice(&mut self, mut node: Node, predecessor: &str) -> Result<(), GuideError> {
        let predecessor_index = self.require(predecessor)?;
        if node.is_start() {
            return Err(GuideError::IllegalTopology(
                "a guide has exactly one start node".to_string(),
            ));
        }
        if self.nodes[predecessor_index].is_branch() {
            return Err(GuideError::InsertAfterGateway(predecessor.to_string()));
        }
        let node_id = node.id().to_string();
        let declared = node.take_outgoing();
        let successors: Vec<String> = self.nodes[predecessor_index]
            .successors()
            .map(String::from)
            .collect();

        self.adopt(node)?;
        self.active = node_id.clone();
        for transition in declared {
            self.link(transition)?;
        }
        for successor in successors {
            self.unlink(predecessor, &successor);
            self.link(Transition::new(&node_id, &successor))?;
        }
        self.link(Transition::new(predecessor, &node_id))
    }

    fn detach(&mut self, node_id: &str) -> Result<Node, GuideError> {
        let index = self.require(node_id)?;
        let node = &self.nodes[index];
        if node.outgoing().len() > 1 {
            return Err(GuideError::AmbiguousRemoval(node_id.to_string()));
        }
        if node.is_start() {
            return Err(GuideError::RemoveStart(node_id.to_string()));
        }
        if node.is_end() && self.end_nodes().count() < 2 {
            return Err(GuideError::RemoveSoleEnd(node_id.to_string()));
        }

        let predecessors: Vec<String> = node.incoming().to_vec();
        let successors: Vec<String> = node.successors().map(String::from).collect();

        for predecessor in predecessors.iter().filter(|p| *p != node_id) {
            let Some(inbound) = self.unlink(predecessor, node_id) else {
                continue;
            };
            for successor in successors.iter().filter(|s| *s != node_id) {
                self.link(inbound.rewired(predecessor, successor))?;
            }
        }
        for successor in &successors {
            self.unlink(node_id, successor);
        }

        if self.active == node_id {
            self.active = predecessors
                .iter()
                .find(|p| *p != node_id)
                .cloned()
                .or_else(|| self.start_id().map(String::from))
                .unwrap_or_default();
        }

        let index = self.require(node_id)?;
        let mut node = self.nodes.remove(index);
        node.clear_edges();
        Ok(node)
    }

    fn extract(&mut self, guide_id: &str, node_ids: &[&str]) -> Result<Guide, GuideError> {
        let (Some(&first), Some(&last)) = (node_ids.first(), node_ids.last()) else {
            return Err(GuideError::EmptySelection);
        };
        for &id in node_ids {
            let index = self.require(id)?;
            let node = &self.nodes[index];
            if node.is_start() || node.is_end() {
                return Err(GuideError::IllegalTopology(format!(
                    "{} node '{id}' cannot be moved into a chapter",
                    node.kind().label()
                )));
            }
        }
        self.check_closure(node_ids)?;
        let last_index = self.require(last)?;
        if self.nodes[last_index].is_branch() {
            return Err(GuideError::IllegalTopology(format!(
                "a chapter cannot end with gateway '{last}'"
            )));
        }

        let inside = |id: &str| node_ids.contains(&id);
        let external_predecessors: Vec<String> = self.nodes[self.require(first)?]
            .predecessors()
            .filter(|p| !inside(*p))
            .map(String::from)
            .collect();
        let external_successors: Vec<String> = self.nodes[last_index]
            .successors()
            .filter(|s| !inside(*s))
            .map(String::from)
            .collect();

        let chapter = Node::chapter(guide_id);
        let chapter_id = chapter.id().to_string();
        self.adopt(chapter)?;
        for predecessor in &external_predecessors {
            if let Some(inbound) = self.unlink(predecessor, first) {
                self.link(inbound.rewired(predecessor, &chapter_id))?;
            }
        }
        for successor in &external_successors {
            if let Some(outbound) = self.unlink(last, successor) {
                self.link(outbound.rewired(&chapter_id, successor))?;
            }
        }

        let start = Node::start();
        let end = Node::end();
        let mut transitions = vec![Transition::new(start.id(), first)];
        let mut extracted = vec![start];
        for &id in node_ids {
            let index = self.require(id)?;
            let mut node = self.nodes.remove(index);
            transitions.extend(node.outgoing().iter().cloned());
            node.clear_edges();
            extracted.push(node);
        }
        transitions.push(Transition::new(last, end.id()));
        extracted.push(end);

        if inside(self.active.as_str()) {
            self.active = chapter_id;
        }

        let mut sub_guide =
            Guide::assemble(guide_id, extracted, transitions, MetadataAnnotation::default())?;
        sub_guide.metadata.touch();
        Ok(sub_guide)
    }

    fn check_closure(&self, node_ids: &[&str]) -> Result<(), GuideError> {
        let Some(last_position) = node_ids.len().checked_sub(1) else {
            return Ok(());
        };
        for (position, &id) in node_ids.iter().enumerate() {
            let node = &self.nodes[self.require(id)?];
            if position < last_position {
                if let Some(outside) = node.successors().find(|s| !node_ids.contains(s)) {
                    return Err(GuideError::NotClosed {
                        from: id.to_string(),
                        to: outside.to_string(),
                    });
                }
            }
            if position > 0 {
                if let Some(outside) = node.predecessors().find(|p| !node_ids.contains(p)) {
                    return Err(GuideError::NotClosed {
                        from: outside.to_string(),
                        to: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeKind;

    fn ids(guide: &Guide) -> (String, String) {
        (
            guide.start_id().unwrap().to_string(),
            guide.end_nodes().next().unwrap().id().to_string(),
        )
    }

    fn step(id: &str) -> Node {
        Node::with_id(NodeKind::Step, id)
    }

    fn captions(text: &str) -> LocalizedText {
        LocalizedText::new().with("de_DE", text.to_string())
    }

    fn successors(guide: &Guide, id: &str) -> Vec<String> {
        guide
            .node(id)
            .unwrap()
            .successors()
            .map(String::from)
            .collect()
    }

    /// Start -> a -> b -> c -> End
    fn linear() -> Guide {
        let mut guide = Guide::new("g");
        for id in ["a", "b", "c"] {
            guide.insert(step(id)).unwrap();
        }
        guide
    }

    #[test]
    fn insert_splices_behind_active_node() {
        let mut guide = Guide::new("g");
        let (start, end) = ids(&guide);

        guide.insert(step("a")).unwrap();
        guide.insert_after(step("b"), "a").unwrap();

        assert_eq!(successors(&guide, &start), vec!["a"]);
        assert_eq!(successors(&guide, "a"), vec!["b"]);
        assert_eq!(successors(&guide, "b"), vec![end.clone()]);
        assert_eq!(guide.node(&end).unwrap().incoming(), &["b".to_string()]);
        assert_eq!(guide.active_id(), "b");
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut guide = linear();
        let before = guide.clone();

        let result = guide.insert(step("a"));

        assert!(matches!(result, Err(GuideError::DuplicateNode { .. })));
        assert_eq!(guide, before);
    }

    #[test]
    fn insert_behind_end_fails() {
        let mut guide = Guide::new("g");
        let (_, end) = ids(&guide);

        let result = guide.insert_after(step("a"), &end);

        assert_eq!(result, Err(GuideError::EndHasSuccessor(end)));
        assert_eq!(guide.nodes().len(), 2);
    }

    #[test]
    fn insert_behind_gateway_fails() {
        let mut guide = Guide::new("g");
        let (_, end) = ids(&guide);
        let gate = Node::with_id(NodeKind::Branch, "gate").with_decision(
            end.clone(),
            captions("weiter"),
            Condition::equals("go", "true"),
        );
        guide.insert(gate).unwrap();

        let result = guide.insert_after(step("a"), "gate");

        assert_eq!(result, Err(GuideError::InsertAfterGateway("gate".to_string())));
    }

    #[test]
    fn inserting_branch_requires_declared_decisions() {
        let mut guide = Guide::new("g");
        let (_, end) = ids(&guide);

        let result = guide.insert(Node::with_id(NodeKind::Branch, "gate"));

        assert_eq!(
            result,
            Err(GuideError::UnconditionalGatewayEdge {
                gateway: "gate".to_string(),
                target: end,
            })
        );
        assert!(!guide.contains("gate"));
    }

    #[test]
    fn inserting_branch_with_decisions_keeps_them() {
        let mut guide = Guide::new("g");
        let (start, end) = ids(&guide);
        guide
            .add_end(Node::with_id(NodeKind::End, "other"), &start, None)
            .unwrap();
        guide.set_active(&start).unwrap();

        let gate = Node::with_id(NodeKind::Branch, "gate")
            .with_decision(end.clone(), captions("ja"), Condition::equals("ok", "true"))
            .with_decision("other", captions("nein"), Condition::equals("ok", "false"));
        guide.insert(gate).unwrap();

        let gate = guide.node("gate").unwrap();
        assert_eq!(gate.outgoing().len(), 2);
        assert!(gate.outgoing().iter().all(|t| t.is_decision()));
        assert_eq!(successors(&guide, &start), vec!["gate"]);
    }

    #[test]
    fn remove_rewires_predecessor_to_successor() {
        let mut guide = linear();

        let removed = guide.remove("b").unwrap();

        assert_eq!(removed.id(), "b");
        assert!(removed.outgoing().is_empty());
        assert!(removed.incoming().is_empty());
        assert_eq!(successors(&guide, "a"), vec!["c"]);
        assert_eq!(guide.node("c").unwrap().incoming(), &["a".to_string()]);
        assert!(!guide.contains("b"));
    }

    #[test]
    fn remove_moves_cursor_to_predecessor() {
        let mut guide = linear();
        assert_eq!(guide.active_id(), "c");

        guide.remove("c").unwrap();

        assert_eq!(guide.active_id(), "b");
    }

    #[test]
    fn remove_keeps_decision_of_gateway_edge() {
        let mut guide = Guide::new("g");
        let (start, end) = ids(&guide);
        guide.insert(step("a")).unwrap();
        guide.set_active(&start).unwrap();
        let gate = Node::with_id(NodeKind::Branch, "gate").with_decision(
            "a",
            captions("weiter"),
            Condition::equals("go", "true"),
        );
        guide.insert(gate).unwrap();

        guide.remove("a").unwrap();

        let edge = guide.node("gate").unwrap().outgoing_to(&end).unwrap();
        assert_eq!(edge.decision().unwrap().condition(), &Condition::equals("go", "true"));
        assert_eq!(edge.id(), format!("flow-gate_{end}"));
    }

    #[test]
    fn remove_refuses_start_sole_end_and_forks() {
        let mut guide = Guide::new("g");
        let (start, end) = ids(&guide);
        guide.insert(step("a")).unwrap();
        guide
            .add_end(Node::with_id(NodeKind::End, "end2"), "a", None)
            .unwrap();
        let before = guide.clone();

        assert_eq!(guide.remove(&start), Err(GuideError::RemoveStart(start.clone())));
        assert_eq!(guide.remove("a"), Err(GuideError::AmbiguousRemoval("a".to_string())));
        assert_eq!(guide, before);

        guide.remove("end2").unwrap();
        assert_eq!(guide.remove(&end), Err(GuideError::RemoveSoleEnd(end.clone())));
        assert!(guide.validate().is_ok());
    }

    #[test]
    fn remove_unknown_node_fails() {
        let mut guide = linear();
        assert!(matches!(
            guide.remove("zzz"),
            Err(GuideError::UnknownNode { .. })
        ));
    }

    #[test]
    fn move_node_reorders_steps() {
        let mut guide = linear();
        let (start, _) = ids(&guide);

        guide.move_node("c", &start).unwrap();

        assert_eq!(successors(&guide, &start), vec!["c"]);
        assert_eq!(successors(&guide, "c"), vec!["a"]);
        assert_eq!(successors(&guide, "b").len(), 1);
        assert_eq!(guide.active_id(), "c");
    }

    #[test]
    fn move_behind_end_fails() {
        let mut guide = linear();
        let (_, end) = ids(&guide);

        let result = guide.move_node("a", &end);

        assert_eq!(
            result,
            Err(GuideError::MoveAfterEnd {
                node: "a".to_string(),
                predecessor: end,
            })
        );
    }

    #[test]
    fn failed_move_leaves_guide_unchanged() {
        let mut guide = Guide::new("g");
        let (_, end) = ids(&guide);
        guide.insert(step("a")).unwrap();
        let gate = Node::with_id(NodeKind::Branch, "gate").with_decision(
            end,
            captions("weiter"),
            Condition::equals("go", "true"),
        );
        guide.insert(gate).unwrap();
        let before = guide.clone();

        let result = guide.move_node("a", "gate");

        assert_eq!(result, Err(GuideError::InsertAfterGateway("gate".to_string())));
        assert_eq!(guide, before);
    }

    #[test]
    fn connect_and_disconnect() {
        let mut guide = linear();

        guide.connect("a", "c").unwrap();
        assert_eq!(successors(&guide, "a"), vec!["b", "c"]);

        let removed = guide.disconnect("a", "c").unwrap();
        assert_eq!(removed.map(|t| t.id().to_string()).as_deref(), Some("flow-a_c"));
        assert_eq!(guide.disconnect("a", "c"), Ok(None));
    }

    #[test]
    fn disconnect_that_strands_end_fails() {
        let mut guide = linear();
        let before = guide.clone();

        let result = guide.disconnect("a", "b");

        assert!(matches!(result, Err(GuideError::Invalid(_))));
        assert_eq!(guide, before);
    }

    #[test]
    fn connect_into_start_fails() {
        let mut guide = linear();
        let (start, _) = ids(&guide);

        assert_eq!(
            guide.connect("a", &start),
            Err(GuideError::StartHasPredecessor(start))
        );
    }

    #[test]
    fn add_end_requires_end_node() {
        let mut guide = linear();
        let result = guide.add_end(step("x"), "a", None);
        assert!(matches!(result, Err(GuideError::IllegalTopology(_))));
    }

    #[test]
    fn combine_extracts_closed_run() {
        let mut guide = linear();
        let (start, end) = ids(&guide);

        let chapter = guide.combine_to_chapter("sub", &["a", "b"]).unwrap();

        let chapter_node = guide
            .nodes()
            .iter()
            .find(|n| n.called_guide() == Some("sub"))
            .unwrap();
        let chapter_id = chapter_node.id().to_string();
        assert_eq!(successors(&guide, &start), vec![chapter_id.clone()]);
        assert_eq!(successors(&guide, &chapter_id), vec!["c"]);
        assert!(!guide.contains("a"));
        assert!(!guide.contains("b"));
        assert_eq!(successors(&guide, "c"), vec![end]);

        assert_eq!(chapter.id(), "sub");
        assert_eq!(chapter.nodes().len(), 4);
        let paths = chapter.all_paths().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(&paths[0][1..3], &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn combine_moves_cursor_to_chapter() {
        let mut guide = linear();
        guide.combine_to_chapter("sub", &["b", "c"]).unwrap();

        let active = guide.active().unwrap();
        assert_eq!(active.called_guide(), Some("sub"));
    }

    #[test]
    fn combine_rejects_open_run() {
        let mut guide = linear();
        guide.connect("a", "c").unwrap();
        let before = guide.clone();

        let result = guide.combine_to_chapter("sub", &["a", "b"]);

        assert_eq!(
            result.unwrap_err(),
            GuideError::NotClosed {
                from: "a".to_string(),
                to: "c".to_string(),
            }
        );
        assert_eq!(guide, before);
    }

    #[test]
    fn combine_rejects_bookends_and_empty_lists() {
        let mut guide = linear();
        let (start, _) = ids(&guide);

        assert_eq!(
            guide.combine_to_chapter("sub", &[]).unwrap_err(),
            GuideError::EmptySelection
        );
        assert!(matches!(
            guide.combine_to_chapter("sub", &[start.as_str(), "a"]),
            Err(GuideError::IllegalTopology(_))
        ));
        assert!(matches!(
            guide.combine_to_chapter("sub", &["a", "zzz"]),
            Err(GuideError::UnknownNode { .. })
        ));
    }
}
