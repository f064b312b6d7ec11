//! Normalization of flag names in duplicated blocks.
//!
//! A root block type embedded at several paths is documented once, so the
//! instance-specific part of its flag names is replaced with
//! [`PLACEHOLDER`]. Each instance records the prefix it stands for in
//! [`ConfigBlock::flags_prefix`], and every instance lists all sibling
//! prefixes in [`ConfigBlock::flags_prefixes`].

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::prefix::find_flags_prefix;
use crate::tree::{BlockId, ConfigBlock, ConfigDoc, ConfigEntry};
use crate::{FLAG_SEPARATOR, PLACEHOLDER};

/// Counters describing what a deduplication pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupSummary {
    /// Groups of top-level blocks sharing a name.
    pub duplicate_groups: usize,
    /// Blocks that were assigned a prefix and had flags rewritten.
    pub prefixed_blocks: usize,
    /// Flag names replaced with the placeholder form.
    pub rewritten_flags: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RewriteScope {
    Rewrite,
    Preserve,
}

/// Annotates duplicated top-level blocks with their prefixes and rewrites
/// their flag names.
///
/// Running the pass again over its own output changes nothing.
pub fn annotate_flag_prefix(doc: &mut ConfigDoc) -> DedupSummary {
    let mut summary = DedupSummary::default();
    let mut assigned: Vec<(BlockId, String)> = Vec::new();

    for (name, members) in group_by_name(doc) {
        if members.len() < 2 {
            continue;
        }
        summary.duplicate_groups += 1;

        let (owners, representatives): (Vec<BlockId>, Vec<String>) = members
            .iter()
            .filter_map(|&id| representative(doc, id).map(|flag| (id, flag.to_owned())))
            .unzip();
        let prefixed: Vec<(BlockId, String)> = owners
            .into_iter()
            .zip(find_flags_prefix(&representatives))
            .filter(|(_, prefix)| !prefix.is_empty())
            .collect();
        if prefixed.is_empty() {
            tracing::trace!(group = %name, "no distinguishing prefix found; group left unchanged");
            continue;
        }

        let all: Vec<String> = prefixed.iter().map(|(_, prefix)| prefix.clone()).collect();
        for &id in &members {
            if let Some(block) = doc.block_mut(id) {
                block.flags_prefixes.clone_from(&all);
            }
        }
        for (id, prefix) in &prefixed {
            if let Some(block) = doc.block_mut(*id) {
                block.flags_prefix.clone_from(prefix);
            }
        }
        tracing::debug!(
            group = %name,
            instances = members.len(),
            prefixes = ?all,
            "annotated duplicate blocks"
        );
        assigned.extend(prefixed);
    }

    for (id, prefix) in &assigned {
        let rewritten = rewrite(doc, *id, prefix, RewriteScope::Rewrite);
        if rewritten > 0 {
            summary.prefixed_blocks += 1;
        }
        summary.rewritten_flags += rewritten;
    }
    summary
}

/// Restores the original form of a flag rewritten for `prefix`.
///
/// Flags that do not carry the placeholder are returned unchanged.
///
/// # Examples
///
/// ```
/// use flagdoc::restore_flag;
///
/// assert_eq!(
///     restore_flag("<prefix>.ring.heartbeat-period", "ingester."),
///     "ingester.ring.heartbeat-period",
/// );
/// ```
#[must_use]
pub fn restore_flag(flag: &str, prefix: &str) -> String {
    flag.strip_prefix(PLACEHOLDER)
        .and_then(|rest| rest.strip_prefix(FLAG_SEPARATOR))
        .map_or_else(|| flag.to_owned(), |rest| format!("{prefix}{rest}"))
}

fn group_by_name(doc: &ConfigDoc) -> Vec<(String, Vec<BlockId>)> {
    let mut groups: Vec<(String, Vec<BlockId>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (id, block) in doc.top_level_blocks() {
        if let Some(members) = index
            .get(block.name.as_str())
            .and_then(|&position| groups.get_mut(position))
            .map(|(_, members)| members)
        {
            members.push(id);
        } else {
            index.insert(block.name.as_str(), groups.len());
            groups.push((block.name.clone(), vec![id]));
        }
    }
    groups
}

/// Flag of the first field of a block, unless it is unbound or already
/// rewritten.
fn representative(doc: &ConfigDoc, id: BlockId) -> Option<&str> {
    doc.block(id)
        .and_then(ConfigBlock::first_field)
        .map(|field| field.flag.as_str())
        .filter(|flag| !flag.is_empty() && !flag.starts_with(PLACEHOLDER))
}

fn rewrite(doc: &mut ConfigDoc, id: BlockId, prefix: &str, scope: RewriteScope) -> usize {
    let Some(block) = doc.block_mut(id) else {
        return 0;
    };
    let mut rewritten = 0;
    let mut nested = Vec::new();
    for entry in &mut block.entries {
        match entry {
            ConfigEntry::Field(field) if scope == RewriteScope::Rewrite => {
                if let Some(rest) = field.flag.strip_prefix(prefix) {
                    field.flag = format!("{PLACEHOLDER}{FLAG_SEPARATOR}{rest}");
                    rewritten += 1;
                } else if !field.flag.is_empty() {
                    tracing::trace!(
                        flag = %field.flag,
                        prefix,
                        "flag does not start with the block prefix; left unchanged"
                    );
                }
            }
            ConfigEntry::Field(_) => {}
            ConfigEntry::Block(child) => {
                let child_scope = if child.root {
                    RewriteScope::Preserve
                } else {
                    scope
                };
                nested.push((child.block, child_scope));
            }
        }
    }
    for (child, child_scope) in nested {
        rewritten += rewrite(doc, child, prefix, child_scope);
    }
    rewritten
}
