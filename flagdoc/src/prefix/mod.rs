//! Distinguishing prefixes of flag names belonging to duplicate blocks.


use std::collections::HashMap;

use crate::FLAG_SEPARATOR;

/// Computes one prefix per flag name, in input order.
///
/// Trailing segments shared by every name are stripped; what is left of a
/// name is its prefix, terminated by [`FLAG_SEPARATOR`]. A name that has
/// nothing left, or whose prefix equals a sibling's, gets the empty prefix.
/// Fewer than two names, or names sharing no trailing segment, yield only
/// empty prefixes.
///
/// # Examples
///
/// ```
/// use flagdoc::find_flags_prefix;
///
/// let prefixes = find_flags_prefix(&[
///     "distributor.ring.heartbeat-period",
///     "ingester.ring.heartbeat-period",
/// ]);
/// assert_eq!(prefixes, ["distributor.", "ingester."]);
/// ```
#[must_use]
pub fn find_flags_prefix<S: AsRef<str>>(flags: &[S]) -> Vec<String> {
    if flags.len() < 2 {
        return vec![String::new(); flags.len()];
    }

    let mut segments: Vec<Vec<&str>> = flags
        .iter()
        .map(|flag| flag.as_ref().split(FLAG_SEPARATOR).collect())
        .collect();
    let mut stripped = 0_usize;
    while shares_last_segment(&segments) {
        for parts in &mut segments {
            parts.pop();
        }
        stripped += 1;
    }
    if stripped == 0 {
        return vec![String::new(); flags.len()];
    }

    let prefixes: Vec<String> = segments
        .iter()
        .map(|parts| {
            if parts.is_empty() {
                String::new()
            } else {
                let mut prefix = parts.join(&FLAG_SEPARATOR.to_string());
                prefix.push(FLAG_SEPARATOR);
                prefix
            }
        })
        .collect();

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for prefix in &prefixes {
        *seen.entry(prefix.as_str()).or_default() += 1;
    }
    prefixes
        .iter()
        .map(|prefix| {
            if seen.get(prefix.as_str()).copied().unwrap_or_default() > 1 {
                String::new()
            } else {
                prefix.clone()
            }
        })
        .collect()
}

fn shares_last_segment(segments: &[Vec<&str>]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let Some(last) = first.last() else {
        return false;
    };
    rest.iter().all(|parts| parts.last() == Some(last))
}
