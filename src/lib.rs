//! Guidegraph: directed process graphs for step-by-step guides
//!
//! A guide is a small process graph: one start node, one or more end nodes,
//! and steps, chapters and branches in between. Guides are edited through
//! structural operations that keep the graph valid, and are exchanged as
//! BPMN-flavored XML documents.
//!
//! # Core Concepts
//!
//! - **Nodes**: a closed set of kinds (start, end, step, chapter, branch)
//! - **Decisions**: captioned, conditional transitions leaving a branch
//! - **Guides**: an arena of nodes with transactional structural edits
//! - **Manager**: a registry of guides that flattens chapters into steps
//! - **Codecs**: BPMN XML for guides, XML or JSON for content descriptors
//!
//! # Example
//!
//! ```rust
//! use guidegraph::codec::{decode_guide, encode_guide, Format};
//! use guidegraph::core::Node;
//! use guidegraph::manager::GuideManager;
//!
//! let mut manager = GuideManager::new();
//! let guide = manager.create_guide("celebrate")?;
//! guide.set_title("en_US", "Celebrate success");
//! guide.insert(Node::step().named("Open the bottle"))?;
//! guide.insert(Node::step().named("Pour"))?;
//!
//! let steps = manager.flatten("celebrate")?;
//! assert_eq!(steps.len(), 2);
//!
//! let xml = encode_guide(manager.guide("celebrate").unwrap(), Format::Pretty)?;
//! assert_eq!(decode_guide(&xml)?.nodes().len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotations;
pub mod builder;
pub mod codec;
pub mod content;
pub mod core;
pub mod guide;
pub mod manager;

// Re-export commonly used types
pub use annotations::{ContentAnnotation, MetadataAnnotation};
pub use codec::{decode_guide, encode_guide, DecodeError, EncodeError, Format};
pub use content::ContentDescriptor;
pub use core::{Condition, Decision, Localized, LocalizedText, Node, NodeKind, Transition};
pub use guide::{Guide, GuideError};
pub use manager::GuideManager;
