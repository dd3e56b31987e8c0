// dashkit-core/src/context.rs
use std::collections::HashMap;

/// Anything that can be ordered for display by priority (lower first)
pub trait Prioritized {
    fn priority(&self) -> i32;
}

/// Ordered assignment lists keyed by owner slug.
///
/// Used for context -> area slugs and area -> widget slugs. Members may be
/// assigned before they are registered, and repeated assignments are kept.
#[derive(Debug, Clone, Default)]
pub struct AssignmentTable {
    assignments: HashMap<String, Vec<String>>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `member` to the list for `owner`, creating the list if needed
    pub fn assign(&mut self, owner: &str, member: &str) {
        self.assignments
            .entry(owner.to_string())
            .or_default()
            .push(member.to_string());
    }

    /// Members assigned to `owner`, in assignment order
    pub fn members(&self, owner: &str) -> &[String] {
        self.assignments
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.assignments.keys().map(String::as_str)
    }
}

/// Look up each slug, drop the ones that don't resolve, and sort the rest by
/// ascending priority. The sort is stable so equal priorities keep
/// assignment order.
pub fn resolve_by_priority<'a, T, F>(slugs: &[String], lookup: F) -> Vec<&'a T>
where
    T: Prioritized,
    F: Fn(&str) -> Option<&'a T>,
{
    let mut resolved: Vec<&'a T> = slugs.iter().filter_map(|slug| lookup(slug)).collect();
    resolved.sort_by_key(|item| item.priority());
    resolved
}
