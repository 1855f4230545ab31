//! Case-insensitive title filter over the canonical task list.
//!
//! # Invariants
//! - Filtering never reorders: output is a subsequence of the input.
//! - An empty query returns the full list.
//! - Pure: identical inputs always yield identical output.

use crate::model::task::Task;

/// Returns every task whose title contains `query`, ignoring case.
///
/// The query is matched as typed; surrounding whitespace is significant.
pub fn project(tasks: &[Task], query: &str) -> Vec<Task> {
    if query.is_empty() {
        return tasks.to_vec();
    }

    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Why the visible list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// No tasks exist and no query is active.
    NoTasks,
    /// A query is active and matched nothing.
    NoMatches,
}

impl EmptyState {
    /// Placeholder text shown in place of the list.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoTasks => "No tasks yet. Add your first todo!",
            Self::NoMatches => "Hmm… nothing found. Try another keyword?",
        }
    }
}

/// Classifies an empty projection; `None` when something is visible.
pub fn empty_state(visible: &[Task], query: &str) -> Option<EmptyState> {
    if !visible.is_empty() {
        return None;
    }
    if query.is_empty() {
        Some(EmptyState::NoTasks)
    } else {
        Some(EmptyState::NoMatches)
    }
}

#[cfg(test)]
mod tests {
    use super::{empty_state, project, EmptyState};
    use crate::model::task::Task;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(3, "Walk dog").unwrap(),
            Task::new(2, "Buy MILK").unwrap(),
            Task::new(1, "Dogfood order").unwrap(),
        ]
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_full_list_in_order() {
        let list = tasks();
        assert_eq!(project(&list, ""), list);
    }

    #[test]
    fn match_ignores_case_and_keeps_order() {
        let list = tasks();
        assert_eq!(titles(&project(&list, "DOG")), ["Walk dog", "Dogfood order"]);
        assert_eq!(titles(&project(&list, "milk")), ["Buy MILK"]);
    }

    #[test]
    fn query_whitespace_is_significant() {
        let list = tasks();
        assert_eq!(titles(&project(&list, " dog")), ["Walk dog"]);
        assert!(project(&list, "dog ").is_empty());
    }

    #[test]
    fn projection_is_deterministic() {
        let list = tasks();
        assert_eq!(project(&list, "o"), project(&list, "o"));
    }

    #[test]
    fn result_is_subsequence_of_input() {
        let list = tasks();
        for query in ["", "o", "d", "x", "buy", "ORDER"] {
            let visible = project(&list, query);
            let mut cursor = list.iter();
            for task in &visible {
                assert!(cursor.any(|candidate| candidate == task), "query `{query}`");
            }
        }
    }

    #[test]
    fn empty_state_distinguishes_no_tasks_from_no_matches() {
        assert_eq!(empty_state(&[], ""), Some(EmptyState::NoTasks));
        assert_eq!(empty_state(&[], "zzz"), Some(EmptyState::NoMatches));
        assert_eq!(empty_state(&tasks(), "zzz"), None);
        assert_eq!(
            EmptyState::NoTasks.message(),
            "No tasks yet. Add your first todo!"
        );
    }
}
