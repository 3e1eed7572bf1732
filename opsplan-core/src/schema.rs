//! Schema types describing the shape of resource values.
//!
//! A schema block describes one level of a value tree: which attributes it
//! carries and which nested blocks repeat beneath it, and how. Both the
//! recorded state and the proposed configuration for a resource conform to
//! the same block.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A configuration block containing attributes and nested blocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    /// Map of attribute names to their schemas
    pub attributes: HashMap<String, Attribute>,
    /// Map of nested block type names to their schemas
    pub block_types: HashMap<String, NestedBlock>,
    /// Human-readable description of this block
    pub description: Option<String>,
}

impl Block {
    /// Whether any block type nested beneath this block, at any depth,
    /// repeats with [`NestingMode::Set`].
    pub fn has_nested_set(&self) -> bool {
        self.block_types
            .values()
            .any(|bt| matches!(bt.nesting, NestingMode::Set) || bt.block.has_nested_set())
    }
}

/// Schema for a single configuration attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    /// Whether this attribute is required
    pub required: bool,
    /// Whether this attribute is optional
    pub optional: bool,
    /// Whether this attribute is computed (decided by the provider)
    pub computed: bool,
    /// Whether this attribute is sensitive (should be redacted)
    pub sensitive: bool,
    /// Human-readable description
    pub description: Option<String>,
}

/// Schema for a nested configuration block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedBlock {
    /// The schema of this nested block
    pub block: Block,
    /// How many instances of this block are allowed
    pub nesting: NestingMode,
}

/// How nested blocks can be structured
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    /// Invalid nesting
    Invalid,
    /// Single instance: block { }
    Single,
    /// Multiple instances: block { } block { }
    List,
    /// Multiple unordered instances, keyed by their own content
    Set,
    /// Map with string keys: block { key = value }
    Map,
    /// Group nesting (deprecated upstream)
    Group,
}
