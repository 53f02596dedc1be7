//! Enumeration of start-to-end routes.

use super::{Guide, GuideError, Violation, Violations};
use std::collections::HashSet;

impl Guide {
    /// Every route from the start node to an end node, as lists of node ids.
    ///
    /// Routes are found depth first, following outgoing transitions in
    /// insertion order. Reaching a node that is already on the current
    /// route fails with [`GuideError::CycleDetected`].
    pub fn all_paths(&self) -> Result<Vec<Vec<String>>, GuideError> {
        let start = self
            .start_id()
            .ok_or_else(|| GuideError::Invalid(Violations::from(vec![Violation::MissingStart])))?;
        let mut on_path = HashSet::new();
        self.paths_from(start, &mut on_path)
    }

    fn paths_from<'a>(
        &'a self,
        node_id: &'a str,
        on_path: &mut HashSet<&'a str>,
    ) -> Result<Vec<Vec<String>>, GuideError> {
        let node = &self.nodes[self.require(node_id)?];
        if node.is_end() {
            return Ok(vec![vec![node_id.to_string()]]);
        }

        on_path.insert(node_id);
        let mut paths = Vec::new();
        for next in node.successors() {
            if on_path.contains(next) {
                return Err(GuideError::CycleDetected {
                    from: node_id.to_string(),
                    to: next.to_string(),
                });
            }
            for tail in self.paths_from(next, on_path)? {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(node_id.to_string());
                path.extend(tail);
                paths.push(path);
            }
        }
        on_path.remove(node_id);
        Ok(paths)
    }
}
