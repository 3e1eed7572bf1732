//! Content-based correlation of set elements.
//!
//! Elements of a set-nested block carry no index or key; their value is
//! their identity. Once a proposal replaces computed attributes with unknown
//! placeholders, that identity is incomplete, so correlation masks out every
//! computed attribute whose proposed value is still unknown, on both sides,
//! and compares what remains. The non-computed attributes (plus any
//! optional+computed attributes the proposal sets explicitly) thereby act as
//! the element's key. Masking recurses through nested blocks, since those
//! may carry computed attributes of their own.
//!
//! The key is only as unique as those attributes make it. When several
//! elements collapse onto the same key, the caller picks one counterpart
//! arbitrarily and the rest keep their unknowns as proposed.

use opsplan_core::{Block, NestingMode, Value};

/// Decide whether a prior set element and a proposed set element describe
/// the same element, under the masking rule above.
///
/// Blocks with set-nested children must be rejected before correlation
/// starts; nested block types outside Single/List/Map fall back to plain
/// equality here.
pub(crate) fn elements_correspond(prior: &Value, proposed: &Value, block: &Block) -> bool {
    let (Some(prior_fields), Some(proposed_fields)) = (prior.as_object(), proposed.as_object())
    else {
        // Non-object elements (including a wholly unknown proposal) have no
        // attributes to mask; only an exact match counts.
        return prior == proposed;
    };

    for (name, attr) in &block.attributes {
        let prior_val = prior_fields.get(name).unwrap_or(&Value::Null);
        let proposed_val = proposed_fields.get(name).unwrap_or(&Value::Null);
        if attr.computed && proposed_val.is_unknown() {
            // Masked on both sides: still pending computation, so this
            // attribute cannot take part in the key.
            continue;
        }
        if prior_val != proposed_val {
            return false;
        }
    }

    for (name, block_type) in &block.block_types {
        let prior_val = prior_fields.get(name).unwrap_or(&Value::Null);
        let proposed_val = proposed_fields.get(name).unwrap_or(&Value::Null);
        let corresponds = match block_type.nesting {
            NestingMode::Single => elements_correspond(prior_val, proposed_val, &block_type.block),
            NestingMode::List => sequences_correspond(prior_val, proposed_val, &block_type.block),
            NestingMode::Map => mappings_correspond(prior_val, proposed_val, &block_type.block),
            _ => prior_val == proposed_val,
        };
        if !corresponds {
            return false;
        }
    }

    true
}

fn sequences_correspond(prior: &Value, proposed: &Value, block: &Block) -> bool {
    match (prior.as_list(), proposed.as_list()) {
        (Some(prior_elems), Some(proposed_elems)) => {
            prior_elems.len() == proposed_elems.len()
                && prior_elems
                    .iter()
                    .zip(proposed_elems)
                    .all(|(p, n)| elements_correspond(p, n, block))
        }
        _ => prior == proposed,
    }
}

fn mappings_correspond(prior: &Value, proposed: &Value, block: &Block) -> bool {
    match (prior.as_map(), proposed.as_map()) {
        (Some(prior_elems), Some(proposed_elems)) => {
            prior_elems.len() == proposed_elems.len()
                && prior_elems.iter().all(|(key, p)| {
                    proposed_elems
                        .get(key)
                        .is_some_and(|n| elements_correspond(p, n, block))
                })
        }
        _ => prior == proposed,
    }
}
