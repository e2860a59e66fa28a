use std::collections::HashSet;

use crate::storage::config::DEFAULT_MAX_RESOLVE_DEPTH;
use crate::storage::data::ProfileType;
use crate::storage::data::RenameRecord;


/// Follows rename chains to the name a preset carries now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_RESOLVE_DEPTH }
    }
}

impl Resolver {

    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current name for `name`, or `None` when it was never renamed, when the
    /// chain leads back to `name`, or when the input is invalid.
    ///
    /// Each hop takes the most recently inserted record for the current name.
    /// A name seen twice ends the walk, as does reaching `max_depth` hops.
    pub fn resolve(&self, records: &[RenameRecord], profile_type: ProfileType, name: &str) -> Option<String> {
        if !profile_type.is_valid() || name.is_empty() {
            return None;
        }

        let mut current = name;
        let mut changed = false;
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(current);

        let mut depth = 0;
        while depth < self.max_depth {
            let latest = records.iter()
                .rev()
                .find(|r| r.profile_type() == profile_type && r.old_name() == current);
            let Some(record) = latest else {
                break;
            };
            current = record.new_name();
            if !visited.insert(current) {
                tracing::debug!("rename cycle for {} {:?} at {:?}", profile_type, name, current);
                break;
            }
            changed = true;
            depth += 1;
        }
        if depth == self.max_depth && self.max_depth > 0 {
            tracing::debug!("rename chain for {} {:?} cut at {} hops", profile_type, name, depth);
        }

        if changed && current != name {
            Some(current.to_string())
        } else {
            None
        }
    }
}
