use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;
use std::fs;
use std::rc::Rc;
use todo_core::{
    open_db_in_memory, Clock, FilterMode, FixedClock, JsonTodoRepository, RepoError, StoreConfig,
    TodoId, TodoPatch, TodoRepository, TodoStore,
};

fn memory_store() -> TodoStore<JsonTodoRepository> {
    TodoStore::open(JsonTodoRepository::new(open_db_in_memory().unwrap())).unwrap()
}

fn memory_ids(store: &TodoStore<JsonTodoRepository>) -> Vec<TodoId> {
    store.todos().iter().map(|todo| todo.id.clone()).collect()
}

fn persisted_ids(store: &TodoStore<JsonTodoRepository>) -> Vec<TodoId> {
    store
        .repository()
        .list_todos()
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect()
}

#[test]
fn open_initializes_empty_collection() {
    let store = memory_store();
    assert_eq!(store.total(), 0);
    assert!(store.repository().has_todos());
    assert!(store.filtered_todos().is_empty());
}

#[test]
fn create_adds_one_open_item() {
    let mut store = memory_store();
    let created = store.create_todo("Buy milk").unwrap();

    assert_eq!(store.total(), 1);
    assert!(!created.done);
    assert_eq!(store.get(&created.id), Some(&created));
    assert_eq!(store.repository().list_todos().unwrap(), vec![created]);
}

#[test]
fn create_rejects_blank_title_without_writing() {
    let mut store = memory_store();
    let err = store.create_todo("   ").unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(store.total(), 0);
    assert!(persisted_ids(&store).is_empty());
}

#[test]
fn update_merges_into_both_sides() {
    let mut store = memory_store();
    let created = store.create_todo("draft").unwrap();

    let updated = store
        .update_todo(&created.id, TodoPatch::new().title("final").done(true))
        .unwrap()
        .clone();

    assert_eq!(updated.title, "final");
    assert!(updated.done);
    assert_eq!(store.repository().list_todos().unwrap(), vec![updated]);
}

#[test]
fn delete_removes_exactly_one_item() {
    let mut store = memory_store();
    let first = store.create_todo("first").unwrap();
    let second = store.create_todo("second").unwrap();
    let third = store.create_todo("third").unwrap();

    let removed = store.delete_todo(&second.id).unwrap();

    assert_eq!(removed.id, second.id);
    assert_eq!(store.total(), 2);
    assert_eq!(memory_ids(&store), vec![first.id, third.id]);
    assert_eq!(persisted_ids(&store), memory_ids(&store));
}

#[test]
fn complete_all_marks_every_item() {
    let clock = Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
    ));
    let repo = JsonTodoRepository::new(open_db_in_memory().unwrap());
    let mut store = TodoStore::open_with_clock(repo, Box::new(Rc::clone(&clock))).unwrap();
    for title in ["a", "b", "c"] {
        store.create_todo(title).unwrap();
    }
    let second = store.todos()[1].id.clone();
    store
        .update_todo(&second, TodoPatch::new().done(true))
        .unwrap();

    clock.advance(Duration::hours(1));
    store.complete_all(true).unwrap();

    assert_eq!(store.completed_count(), store.total());
    assert_eq!(store.active_count(), 0);
    assert!(store
        .todos()
        .iter()
        .all(|todo| todo.updated_at == clock.now()));
    assert_eq!(store.repository().list_todos().unwrap(), store.todos());

    store.complete_all(false).unwrap();
    assert_eq!(store.active_count(), 3);
    assert_eq!(store.completed_count(), 0);
}

#[test]
fn clear_completed_removes_only_done_items_and_keeps_order() {
    let mut store = memory_store();
    let ids: Vec<TodoId> = ["a", "b", "c", "d", "e"]
        .into_iter()
        .map(|title| store.create_todo(title).unwrap().id)
        .collect();
    for id in [&ids[0], &ids[2], &ids[3]] {
        store.update_todo(id, TodoPatch::new().done(true)).unwrap();
    }

    let removed = store.clear_completed().unwrap();

    assert_eq!(removed, 3);
    assert_eq!(memory_ids(&store), vec![ids[1].clone(), ids[4].clone()]);
    assert_eq!(persisted_ids(&store), memory_ids(&store));
    assert_eq!(store.clear_completed().unwrap(), 0);
}

#[test]
fn filtered_todos_follow_filter_mode() {
    let mut store = memory_store();
    let open = store.create_todo("open").unwrap();
    let closed = store.create_todo("closed").unwrap();
    store
        .update_todo(&closed.id, TodoPatch::new().done(true))
        .unwrap();

    store.set_filter(FilterMode::Active);
    let active: HashSet<_> = store.filtered_todos().iter().map(|t| t.id.clone()).collect();
    assert_eq!(active, HashSet::from([open.id.clone()]));

    store.set_filter(FilterMode::Completed);
    let completed: Vec<_> = store.filtered_todos().iter().map(|t| t.id.clone()).collect();
    assert_eq!(completed, vec![closed.id.clone()]);

    store.set_filter(FilterMode::All);
    assert_eq!(store.filtered_todos().len(), 2);
    assert_eq!(store.completed_count(), store.total() - store.active_count());
}

#[test]
fn reopening_from_disk_restores_the_same_list() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());

    let expected = {
        let mut store = TodoStore::open_json(&config).unwrap();
        let keep = store.create_todo("keep").unwrap();
        let toggled = store.create_todo("toggle").unwrap();
        store
            .update_todo(&toggled.id, TodoPatch::new().done(true))
            .unwrap();
        let gone = store.create_todo("gone").unwrap();
        store.delete_todo(&gone.id).unwrap();
        assert_ne!(keep.id, toggled.id);
        store.todos().to_vec()
    };

    let reopened = TodoStore::open_json(&config).unwrap();
    assert_eq!(reopened.todos(), expected.as_slice());
    assert_eq!(reopened.filter(), FilterMode::All);
}

#[test]
fn persisted_file_uses_todos_collection_layout() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    let mut store = TodoStore::open_json(&config).unwrap();
    let created = store.create_todo("Buy milk").unwrap();

    let raw = fs::read_to_string(config.db_path()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &document["todos"][0];
    assert_eq!(record["id"], created.id.as_str());
    assert_eq!(record["title"], "Buy milk");
    assert_eq!(record["done"], false);
    assert!(record["createdAt"].is_string());
    assert!(record["updatedAt"].is_string());
}

#[test]
fn failed_persistence_leaves_memory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("data"));
    let mut store = TodoStore::open_json(&config).unwrap();
    let kept = store.create_todo("kept").unwrap();
    let before = store.todos().to_vec();

    fs::remove_dir_all(config.data_dir()).unwrap();

    assert!(matches!(store.create_todo("lost"), Err(RepoError::Db(_))));
    assert!(store
        .update_todo(&kept.id, TodoPatch::new().done(true))
        .is_err());
    assert!(store.delete_todo(&kept.id).is_err());
    assert!(store.complete_all(true).is_err());

    assert_eq!(store.todos(), before.as_slice());
    assert_eq!(persisted_ids(&store), memory_ids(&store));
}
