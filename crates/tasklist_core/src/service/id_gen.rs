//! Task id generation.
//!
//! Ids follow creation time in milliseconds, but two tasks created in the
//! same millisecond (or after the clock stepped back) still get distinct,
//! increasing ids: every id is `max(now_ms, last_issued + 1)`. Once
//! `last_issued` reaches `TaskId::MAX` the sequence cannot grow, and the
//! highest id not taken by the live list is handed out instead.

use crate::model::task::TaskId;
use std::time::{SystemTime, UNIX_EPOCH};

type Clock = Box<dyn FnMut() -> TaskId + Send>;

/// Monotonic, collision-checked id source.
pub struct TaskIdGenerator {
    last_issued: Option<TaskId>,
    clock: Clock,
}

impl Default for TaskIdGenerator {
    fn default() -> Self {
        Self::with_clock(system_clock_ms)
    }
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `clock` as the millisecond time source.
    pub fn with_clock(clock: impl FnMut() -> TaskId + Send + 'static) -> Self {
        Self {
            last_issued: None,
            clock: Box::new(clock),
        }
    }

    /// Marks ids already present in a list as issued.
    pub fn observe(&mut self, existing: impl IntoIterator<Item = TaskId>) {
        if let Some(max) = existing.into_iter().max() {
            self.last_issued = Some(self.last_issued.map_or(max, |last| last.max(max)));
        }
    }

    /// Issues the next id. `is_taken` reports ids held by the live list and
    /// is only consulted once the increasing sequence is exhausted.
    pub fn next_id(&mut self, is_taken: impl Fn(TaskId) -> bool) -> TaskId {
        let now = (self.clock)();
        let next = match self.last_issued {
            Some(last) if now <= last => last.checked_add(1),
            _ => Some(now),
        };

        match next {
            Some(id) => {
                self.last_issued = Some(id);
                id
            }
            None => highest_free_id(is_taken),
        }
    }
}

fn highest_free_id(is_taken: impl Fn(TaskId) -> bool) -> TaskId {
    // A list never holds 2^64 tasks, so the scan always finds a gap.
    (TaskId::MIN..=TaskId::MAX)
        .rev()
        .find(|id| !is_taken(*id))
        .unwrap_or(TaskId::MIN)
}

fn system_clock_ms() -> TaskId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| TaskId::try_from(elapsed.as_millis()).unwrap_or(TaskId::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::TaskIdGenerator;

    #[test]
    fn uses_clock_when_it_advances() {
        let mut now = 1_000;
        let mut ids = TaskIdGenerator::with_clock(move || {
            now += 10;
            now
        });
        assert_eq!(ids.next_id(|_| false), 1_010);
        assert_eq!(ids.next_id(|_| false), 1_020);
    }

    #[test]
    fn same_millisecond_yields_distinct_ids() {
        let mut ids = TaskIdGenerator::with_clock(|| 5_000);
        assert_eq!(ids.next_id(|_| false), 5_000);
        assert_eq!(ids.next_id(|_| false), 5_001);
        assert_eq!(ids.next_id(|_| false), 5_002);
    }

    #[test]
    fn clock_going_backwards_never_reuses_ids() {
        let mut ticks = vec![100, 50, 101].into_iter();
        let mut ids = TaskIdGenerator::with_clock(move || ticks.next().unwrap_or(0));
        assert_eq!(ids.next_id(|_| false), 100);
        assert_eq!(ids.next_id(|_| false), 101);
        assert_eq!(ids.next_id(|_| false), 102);
    }

    #[test]
    fn observed_ids_are_never_reissued() {
        let mut ids = TaskIdGenerator::with_clock(|| 10);
        ids.observe([7, 42, 3]);
        assert_eq!(ids.next_id(|_| false), 43);
        ids.observe(std::iter::empty::<i64>());
        assert_eq!(ids.next_id(|_| false), 44);
    }

    #[test]
    fn exhausted_sequence_falls_back_to_free_ids() {
        let mut ids = TaskIdGenerator::with_clock(|| 1);
        ids.observe([i64::MAX]);
        let live = [i64::MAX, i64::MAX - 1];

        let first = ids.next_id(|id| live.contains(&id));
        assert_eq!(first, i64::MAX - 2);

        let live = [i64::MAX, i64::MAX - 1, first];
        assert_eq!(ids.next_id(|id| live.contains(&id)), i64::MAX - 3);
    }

    #[test]
    fn system_clock_is_after_2020() {
        let mut ids = TaskIdGenerator::new();
        assert!(ids.next_id(|_| false) > 1_577_836_800_000);
    }
}
