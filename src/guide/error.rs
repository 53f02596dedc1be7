//! Errors raised by guide edits, path enumeration and the guide manager.

use super::validation::Violations;
use thiserror::Error;

/// Errors that can occur when editing or traversing guides.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuideError {
    #[error("Node '{node}' is not part of guide '{guide}'")]
    UnknownNode { guide: String, node: String },

    #[error("Node '{node}' already exists in guide '{guide}'")]
    DuplicateNode { guide: String, node: String },

    #[error("A guide with id '{0}' already exists")]
    DuplicateGuide(String),

    #[error("Guide '{0}' is not registered")]
    UnknownGuide(String),

    #[error("Start node '{0}' cannot have predecessors")]
    StartHasPredecessor(String),

    #[error("End node '{0}' cannot have successors")]
    EndHasSuccessor(String),

    #[error("Gateway '{gateway}' only accepts decisions, got a plain transition to '{target}'")]
    UnconditionalGatewayEdge { gateway: String, target: String },

    #[error("Cannot insert behind gateway '{0}'; add a decision instead")]
    InsertAfterGateway(String),

    #[error("Cannot remove node '{0}': it has more than one successor")]
    AmbiguousRemoval(String),

    #[error("Cannot remove start node '{0}'")]
    RemoveStart(String),

    #[error("Cannot remove end node '{0}': it is the only end node")]
    RemoveSoleEnd(String),

    #[error("Cannot move '{node}' behind end node '{predecessor}'")]
    MoveAfterEnd { node: String, predecessor: String },

    #[error("Detected cycle: {from} -> {to}")]
    CycleDetected { from: String, to: String },

    #[error("No nodes given to combine into a chapter")]
    EmptySelection,

    #[error("Nodes to combine are not closed: {from} -> {to} leaves the selection")]
    NotClosed { from: String, to: String },

    #[error("Illegal topology: {0}")]
    IllegalTopology(String),

    #[error("Chapter '{chapter}' references unregistered guide '{guide}'")]
    UnresolvedChapter { chapter: String, guide: String },

    #[error("Guide '{0}' contains itself through its chapters")]
    RecursiveChapter(String),

    #[error("Guide violates structural invariants: {0}")]
    Invalid(Violations),
}
