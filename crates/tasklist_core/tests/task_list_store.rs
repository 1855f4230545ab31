use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tasklist_core::{
    project, Confirmation, EmptyState, InMemoryKeyValueStore, ReorderError, StoreConfig, Task,
    TaskIdGenerator, TaskListStore,
};

fn empty_store() -> TaskListStore {
    TaskListStore::hydrate(Arc::new(InMemoryKeyValueStore::new()), &StoreConfig::default())
}

/// Store whose ids come from a clock frozen at one millisecond.
fn frozen_clock_store() -> TaskListStore {
    TaskListStore::hydrate_with_ids(
        Arc::new(InMemoryKeyValueStore::new()),
        &StoreConfig::default(),
        TaskIdGenerator::with_clock(|| 1_700_000_000_000),
    )
}

fn store_with(titles: &[&str]) -> TaskListStore {
    let mut store = empty_store();
    for title in titles.iter().rev() {
        store.add(title).unwrap();
    }
    store
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}

fn id_of(store: &TaskListStore, title: &str) -> i64 {
    store
        .tasks()
        .iter()
        .find(|task| task.title == title)
        .map(|task| task.id)
        .unwrap()
}

#[test]
fn add_prepends_open_trimmed_task() {
    let mut store = store_with(&["Buy milk"]);

    let added = store.add("  Walk dog ").unwrap().clone();
    assert_eq!(added.title, "Walk dog");
    assert!(!added.is_done);
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0], added);
}

#[test]
fn add_ignores_blank_titles() {
    let mut store = store_with(&["Buy milk"]);
    let before = store.tasks().to_vec();

    assert!(store.add("").is_none());
    assert!(store.add("   ").is_none());
    assert!(store.add("\t\n").is_none());
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn ids_stay_unique_when_created_in_same_millisecond() {
    let mut store = frozen_clock_store();
    for n in 0..20 {
        store.add(&format!("task {n}")).unwrap();
    }

    let mut ids = store.tasks().iter().map(|task| task.id).collect::<Vec<_>>();
    // Newest first, so ids decrease along the list.
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[test]
fn toggle_flips_only_the_target() {
    let mut store = store_with(&["a", "b", "c"]);
    let before = store.tasks().to_vec();
    let target = id_of(&store, "b");

    let after = store.toggle(target).to_vec();
    assert_eq!(titles(&after), ["a", "b", "c"]);
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.title, new.title);
        assert_eq!(old.is_done != new.is_done, new.id == target);
    }
}

#[test]
fn toggle_of_unknown_id_is_noop() {
    let mut store = store_with(&["a", "b"]);
    let before = store.tasks().to_vec();
    assert_eq!(store.toggle(-1), before.as_slice());
}

#[test]
fn delete_removes_one_and_keeps_order() {
    let mut store = store_with(&["a", "b", "c", "d"]);
    let target = id_of(&store, "c");

    assert_eq!(titles(store.delete(target)), ["a", "b", "d"]);
    assert!(store.find(target).is_none());
}

#[test]
fn delete_of_unknown_id_is_noop() {
    let mut store = store_with(&["a", "b"]);
    let before = store.tasks().to_vec();
    assert_eq!(store.delete(42), before.as_slice());
}

#[test]
fn delete_requires_confirmation_through_request() {
    let mut store = store_with(&["keep", "drop"]);
    let target = id_of(&store, "drop");

    let request = store.request_delete(target).unwrap();
    assert_eq!(
        request.prompt_message(),
        "Are you sure you want to delete \"drop\"?"
    );
    assert_eq!(
        titles(store.resolve_delete(request, Confirmation::Cancelled)),
        ["keep", "drop"]
    );

    let request = store.request_delete(target).unwrap();
    assert_eq!(
        titles(store.resolve_delete(request, Confirmation::Confirmed)),
        ["keep"]
    );
    assert!(store.request_delete(target).is_none());
}

#[test]
fn reorder_applies_permutation() {
    let mut store = store_with(&["a", "b", "c"]);
    let mut new_order = store.tasks().to_vec();
    new_order.reverse();

    let reordered = store.reorder(&new_order).unwrap().to_vec();
    assert_eq!(titles(&reordered), ["c", "b", "a"]);
    assert_eq!(project(store.tasks(), ""), reordered);
}

#[test]
fn reorder_ignores_field_values_from_caller() {
    let mut store = store_with(&["a", "b"]);
    let mut new_order = store.tasks().to_vec();
    new_order.swap(0, 1);
    new_order[0].title = "edited".to_string();
    new_order[0].is_done = true;

    store.reorder(&new_order).unwrap();
    assert_eq!(titles(store.tasks()), ["b", "a"]);
    assert!(store.tasks().iter().all(|task| !task.is_done));
}

#[test]
fn reorder_rejects_non_permutations_and_keeps_state() {
    let mut store = store_with(&["a", "b", "c"]);
    let before = store.tasks().to_vec();

    let missing = &before[..2];
    assert_eq!(
        store.reorder(missing).unwrap_err(),
        ReorderError::LengthMismatch {
            expected: 3,
            actual: 2
        }
    );

    let mut foreign = before.clone();
    foreign[2] = Task::new(-5, "ghost").unwrap();
    assert_eq!(
        store.reorder(&foreign).unwrap_err(),
        ReorderError::UnknownTask(-5)
    );

    let repeated = [before[0].id, before[0].id, before[1].id];
    assert_eq!(
        store.reorder_ids(&repeated).unwrap_err(),
        ReorderError::DuplicateTask(before[0].id)
    );

    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn reorder_visible_keeps_hidden_tasks_in_place() {
    let mut store = store_with(&["dog walk", "milk", "dog food", "bread", "dog toy"]);
    store.set_query("DOG");
    let visible = store.visible_tasks();
    assert_eq!(titles(&visible), ["dog walk", "dog food", "dog toy"]);

    let new_visible = [visible[2].id, visible[0].id, visible[1].id];
    store.reorder_visible_ids(&new_visible).unwrap();

    assert_eq!(
        titles(store.tasks()),
        ["dog toy", "milk", "dog walk", "bread", "dog food"]
    );
    assert_eq!(store.tasks().len(), 5);
}

#[test]
fn reorder_visible_rejects_hidden_tasks() {
    let mut store = store_with(&["dog walk", "milk"]);
    store.set_query("dog");
    let milk = id_of(&store, "milk");

    assert_eq!(
        store.reorder_visible_ids(&[milk]).unwrap_err(),
        ReorderError::UnknownTask(milk)
    );
}

#[test]
fn query_survives_mutations_and_never_reorders() {
    let mut store = store_with(&["Walk dog", "Buy milk"]);
    store.set_query("o");
    store.add("Dog bowl").unwrap();
    let milk = id_of(&store, "Buy milk");
    store.toggle(milk);

    assert_eq!(store.query(), "o");
    assert_eq!(titles(&store.visible_tasks()), ["Dog bowl", "Walk dog"]);
    assert_eq!(titles(store.tasks()), ["Dog bowl", "Walk dog", "Buy milk"]);
}

#[test]
fn empty_state_reflects_list_and_query() {
    let mut store = empty_store();
    assert_eq!(store.empty_state(), Some(EmptyState::NoTasks));

    store.add("Buy milk").unwrap();
    assert_eq!(store.empty_state(), None);

    store.set_query("zzz");
    assert_eq!(store.empty_state(), Some(EmptyState::NoMatches));
}

#[test]
fn walkthrough_add_toggle_search_delete() {
    let mut store = empty_store();

    store.add("Buy milk").unwrap();
    assert_eq!(titles(store.tasks()), ["Buy milk"]);
    assert!(!store.tasks()[0].is_done);

    store.add("Walk dog").unwrap();
    assert_eq!(titles(store.tasks()), ["Walk dog", "Buy milk"]);

    let milk = id_of(&store, "Buy milk");
    store.toggle(milk);
    assert_eq!(titles(store.tasks()), ["Walk dog", "Buy milk"]);
    assert!(store.find(milk).unwrap().is_done);

    store.set_query("dog");
    let visible = store.visible_tasks();
    assert_eq!(titles(&visible), ["Walk dog"]);
    assert!(!visible[0].is_done);

    let dog = id_of(&store, "Walk dog");
    store.delete(dog);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].title, "Buy milk");
    assert!(store.tasks()[0].is_done);
    assert!(store.visible_tasks().is_empty());
}

#[test]
fn id_clock_is_consulted_once_per_add() {
    let calls = Arc::new(AtomicI64::new(0));
    let counter = calls.clone();
    let mut store = TaskListStore::hydrate_with_ids(
        Arc::new(InMemoryKeyValueStore::new()),
        &StoreConfig::default(),
        TaskIdGenerator::with_clock(move || counter.fetch_add(1, Ordering::SeqCst) + 100),
    );

    store.add("one").unwrap();
    store.add("  ");
    store.add("two").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
