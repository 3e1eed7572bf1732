//! Preservation of computed attribute values across plan proposals.

use std::collections::BTreeMap;

use opsplan_core::{Block, NestingMode, Value};
use tracing::trace;

use crate::correlate::elements_correspond;
use crate::error::{PreserveError, Result};

/// Merge a prior value into a proposed value, replacing unknown placeholders
/// that stand in for computed attributes with the concrete values recorded
/// previously.
///
/// `prior` is the fully concrete value recorded by the last apply; `proposed`
/// comes from configuration evaluation and may contain unknowns. Both must
/// conform to `schema`. The result conforms to the same schema and differs
/// from `proposed` only where a computed attribute was still unknown and the
/// prior value had something concrete to offer.
///
/// Preservation applies to direct values of computed attributes only;
/// unknowns nested inside an attribute's own collection value are not merged.
/// Repeated nested blocks are correlated per nesting mode: lists by index,
/// maps by key, and sets by content (see the correlation module). Drastic
/// configuration changes such as reordering a list defeat the correlation,
/// so computed attributes are best kept rare inside such structures.
///
/// A prior value that is not schema-conformant or not fully concrete is a
/// bug in the caller and reported as [`PreserveError::ContractViolation`].
/// Set blocks nested inside set blocks are reported as
/// [`PreserveError::Unsupported`].
pub fn preserve_computed_attrs(prior: &Value, proposed: &Value, schema: &Block) -> Result<Value> {
    if prior.contains_unknown() {
        return Err(PreserveError::ContractViolation(
            "prior value contains unknowns; recorded state must be fully concrete".into(),
        ));
    }
    preserve(prior, proposed, schema)
}

fn preserve(prior: &Value, proposed: &Value, schema: &Block) -> Result<Value> {
    if prior.is_null() || proposed.is_null() {
        return Ok(proposed.clone());
    }
    if proposed.is_unknown() {
        // A wholly unknown proposal carries nothing to merge into; the prior
        // value is the only conformant answer.
        return Ok(prior.clone());
    }

    let prior_fields = object_of(prior, "prior")?;
    let proposed_fields = object_of(proposed, "proposed")?;

    let mut merged = BTreeMap::new();

    for (name, attr) in &schema.attributes {
        let prior_val = field(prior_fields, name, "prior")?;
        let proposed_val = field(proposed_fields, name, "proposed")?;

        let result = if !attr.computed {
            // Non-computed attributes always follow the proposal, unknown or
            // not: the unknown may be wired in from another resource's
            // pending output, and must stay pending.
            proposed_val.clone()
        } else if proposed_val.is_unknown() && !prior_val.is_null() {
            trace!(attribute = name.as_str(), "preserving prior value");
            prior_val.clone()
        } else {
            proposed_val.clone()
        };
        merged.insert(name.clone(), result);
    }

    for (name, block_type) in &schema.block_types {
        let prior_val = field(prior_fields, name, "prior")?;
        let proposed_val = field(proposed_fields, name, "proposed")?;

        let result = match block_type.nesting {
            NestingMode::Single => preserve(prior_val, proposed_val, &block_type.block)?,
            NestingMode::List => preserve_list(prior_val, proposed_val, &block_type.block)?,
            NestingMode::Map => preserve_map(prior_val, proposed_val, &block_type.block)?,
            NestingMode::Set => preserve_set(prior_val, proposed_val, &block_type.block)?,
            // No correlation story for these; keep the proposal so the
            // result still conforms to the schema.
            _ => proposed_val.clone(),
        };
        merged.insert(name.clone(), result);
    }

    Ok(Value::Object(merged))
}

fn preserve_list(prior: &Value, proposed: &Value, block: &Block) -> Result<Value> {
    if prior.is_null() || proposed.is_null() || proposed.is_unknown() {
        return Ok(proposed.clone());
    }
    let prior_elems = list_of(prior, "prior")?;
    let proposed_elems = list_of(proposed, "proposed")?;
    if proposed_elems.is_empty() {
        return Ok(proposed.clone());
    }

    let mut merged = Vec::with_capacity(proposed_elems.len());
    for (idx, proposed_elem) in proposed_elems.iter().enumerate() {
        match prior_elems.get(idx) {
            Some(prior_elem) => merged.push(preserve(prior_elem, proposed_elem, block)?),
            // The proposal grew beyond the recorded length.
            None => merged.push(proposed_elem.clone()),
        }
    }
    Ok(Value::List(merged))
}

fn preserve_map(prior: &Value, proposed: &Value, block: &Block) -> Result<Value> {
    if prior.is_null() || proposed.is_null() || proposed.is_unknown() {
        return Ok(proposed.clone());
    }
    let prior_elems = map_of(prior, "prior")?;
    let proposed_elems = map_of(proposed, "proposed")?;
    if proposed_elems.is_empty() {
        return Ok(proposed.clone());
    }

    let mut merged = BTreeMap::new();
    for (key, proposed_elem) in proposed_elems {
        let result = match prior_elems.get(key) {
            Some(prior_elem) => preserve(prior_elem, proposed_elem, block)?,
            None => proposed_elem.clone(),
        };
        merged.insert(key.clone(), result);
    }
    Ok(Value::Map(merged))
}

fn preserve_set(prior: &Value, proposed: &Value, block: &Block) -> Result<Value> {
    if block.has_nested_set() {
        // Correlating a set inside a set would need multiset correspondence
        // under masking; nothing requires it yet.
        return Err(PreserveError::Unsupported(
            "set block nested inside a set block".into(),
        ));
    }
    if prior.is_null() || proposed.is_null() || proposed.is_unknown() {
        return Ok(proposed.clone());
    }
    let prior_elems = set_of(prior, "prior")?;
    let proposed_elems = set_of(proposed, "proposed")?;
    if proposed_elems.is_empty() {
        return Ok(proposed.clone());
    }

    // Set elements have no key besides their own content, so correlate on
    // the parts of that content that are not pending computation. Each prior
    // element may be claimed once; the first correspondence in the prior's
    // order wins. Proposed elements with no counterpart pass through with
    // their unknowns intact.
    let mut claimed = vec![false; prior_elems.len()];
    let mut merged = Vec::with_capacity(proposed_elems.len());
    for proposed_elem in proposed_elems {
        let counterpart = prior_elems.iter().enumerate().find(|(idx, prior_elem)| {
            !claimed[*idx] && elements_correspond(prior_elem, proposed_elem, block)
        });
        match counterpart {
            Some((idx, prior_elem)) => {
                claimed[idx] = true;
                trace!(element = idx, "correlated proposed set element with prior");
                merged.push(preserve(prior_elem, proposed_elem, block)?);
            }
            None => merged.push(proposed_elem.clone()),
        }
    }
    Ok(Value::Set(merged))
}

fn object_of<'a>(value: &'a Value, role: &str) -> Result<&'a BTreeMap<String, Value>> {
    value.as_object().ok_or_else(|| {
        PreserveError::ContractViolation(format!("{} value is not an object block", role))
    })
}

fn field<'a>(fields: &'a BTreeMap<String, Value>, name: &str, role: &str) -> Result<&'a Value> {
    fields.get(name).ok_or_else(|| {
        PreserveError::ContractViolation(format!("{} value is missing attribute {:?}", role, name))
    })
}

fn list_of<'a>(value: &'a Value, role: &str) -> Result<&'a [Value]> {
    value
        .as_list()
        .ok_or_else(|| PreserveError::ContractViolation(format!("{} value is not a list", role)))
}

fn map_of<'a>(value: &'a Value, role: &str) -> Result<&'a BTreeMap<String, Value>> {
    value
        .as_map()
        .ok_or_else(|| PreserveError::ContractViolation(format!("{} value is not a map", role)))
}

fn set_of<'a>(value: &'a Value, role: &str) -> Result<&'a [Value]> {
    value
        .as_set()
        .ok_or_else(|| PreserveError::ContractViolation(format!("{} value is not a set", role)))
}
