use quotekeeper_core::{
    CategoryFilter, ImportMode, MemoryQuoteRepository, Quote, QuoteRepository, QuoteService,
    ServiceError, SqliteQuoteRepository, StoreEvent, StoreListener,
};
use std::sync::{Arc, Mutex};

fn quote(text: &str, category: &str) -> Quote {
    Quote::new(text, category).unwrap()
}

fn service_with(items: Vec<Quote>) -> QuoteService<MemoryQuoteRepository> {
    QuoteService::bootstrap(MemoryQuoteRepository::with_quotes(items)).unwrap()
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<StoreEvent>>>);

impl StoreListener for Recorder {
    fn on_event(&self, event: &StoreEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

#[test]
fn add_persists_immediately() {
    let mut service = service_with(Vec::new());
    service.add(" Be kind ", "A").unwrap();

    assert_eq!(
        service.repository().load_quotes().unwrap(),
        Some(vec![quote("Be kind", "A")])
    );
}

#[test]
fn add_validation_error_leaves_store_and_repo_untouched() {
    let mut service = service_with(vec![quote("Be kind", "A")]);
    let err = service.add("", "x").unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.list(), &[quote("Be kind", "A")]);
    assert_eq!(
        service.repository().load_quotes().unwrap(),
        Some(vec![quote("Be kind", "A")])
    );
}

#[test]
fn filter_selection_is_restored_on_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.sqlite3");

    {
        let mut service =
            QuoteService::bootstrap(SqliteQuoteRepository::open(&path).unwrap()).unwrap();
        service.add("Be kind", "A").unwrap();
        service
            .set_filter(CategoryFilter::Category("A".to_string()))
            .unwrap();
    }

    let service = QuoteService::bootstrap(SqliteQuoteRepository::open(&path).unwrap()).unwrap();
    assert_eq!(
        service.selected_filter(),
        &CategoryFilter::Category("A".to_string())
    );
    assert_eq!(service.list().len(), 5);
}

#[test]
fn stale_filter_yields_empty_featured_without_error() {
    let mut service = service_with(vec![quote("Be kind", "A")]);
    service
        .set_filter(CategoryFilter::Category("Gone".to_string()))
        .unwrap();

    assert_eq!(service.show_featured().unwrap(), None);
    assert_eq!(service.show_random().unwrap(), None);
    assert_eq!(service.last_shown().unwrap(), None);
}

#[test]
fn show_random_respects_filter_and_remembers_line() {
    let mut service = service_with(vec![quote("a", "X"), quote("b", "Y")]);
    service
        .set_filter(CategoryFilter::Category("Y".to_string()))
        .unwrap();

    let shown = service.show_random().unwrap();
    assert_eq!(shown, Some(quote("b", "Y")));
    assert_eq!(
        service.last_shown().unwrap().as_deref(),
        Some("\"b\" - (Y)")
    );
}

#[test]
fn show_featured_returns_first_match_in_category() {
    let mut service = service_with(vec![quote("a", "X"), quote("b", "Y"), quote("c", "Y")]);
    service
        .set_filter(CategoryFilter::Category("Y".to_string()))
        .unwrap();

    assert_eq!(service.show_featured().unwrap(), Some(quote("b", "Y")));
}

#[test]
fn import_merge_mode_dedups_and_reports_conflicts() {
    let mut service = service_with(vec![quote("Be kind", "A")]);
    let payload = r#"[
        {"text": "Be kind", "category": "B"},
        {"text": "Stay curious", "category": "C"}
    ]"#;

    let report = service.import_json(payload, ImportMode::Merge).unwrap();

    assert_eq!(report.added, vec![quote("Stay curious", "C")]);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(
        service.list(),
        &[quote("Be kind", "B"), quote("Stay curious", "C")]
    );
}

#[test]
fn import_append_mode_keeps_duplicates() {
    let mut service = service_with(vec![quote("Be kind", "A")]);
    let payload = r#"[{"text": "Be kind", "category": "A"}]"#;

    let report = service.import_json(payload, ImportMode::Append).unwrap();

    assert_eq!(report.added.len(), 1);
    assert!(report.conflicts.is_empty());
    assert_eq!(service.list().len(), 2);
}

#[test]
fn malformed_import_is_aborted_without_partial_append() {
    let mut service = service_with(vec![quote("Be kind", "A")]);
    let payload = r#"[{"text": "fine", "category": "A"}, {"text": "missing category"}]"#;

    let err = service.import_json(payload, ImportMode::Append).unwrap_err();

    assert!(matches!(err, ServiceError::Format(_)));
    assert_eq!(service.list(), &[quote("Be kind", "A")]);
}

#[test]
fn export_then_import_into_empty_store_reproduces_items() {
    let source = service_with(vec![quote("a", "X"), quote("b", "Y")]);
    let exported = source.export_json().unwrap();

    let mut target = service_with(Vec::new());
    target.import_json(&exported, ImportMode::Merge).unwrap();
    assert_eq!(target.list(), source.list());
}

#[test]
fn apply_remote_publishes_merge_report() {
    let recorder = Recorder::default();
    let mut service = service_with(vec![quote("Be kind", "A")]);
    service.subscribe(Box::new(recorder.clone()));

    let report = service
        .apply_remote(&[quote("Be kind", "B"), quote("Stay curious", "C")])
        .unwrap();

    let events = recorder.0.lock().unwrap().clone();
    assert_eq!(events, vec![StoreEvent::Merged(report)]);
    assert_eq!(
        service.repository().load_quotes().unwrap(),
        Some(vec![quote("Be kind", "B"), quote("Stay curious", "C")])
    );
}

#[test]
fn unchanged_merge_does_not_write_seeds() {
    let mut service = QuoteService::bootstrap(MemoryQuoteRepository::new()).unwrap();
    let report = service.apply_remote(&[]).unwrap();

    assert!(!report.changed);
    assert!(service.repository().load_quotes().unwrap().is_none());
}

#[test]
fn merge_keeps_quotes_added_by_another_service_on_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.sqlite3");

    let mut watcher =
        QuoteService::bootstrap(SqliteQuoteRepository::open(&path).unwrap()).unwrap();
    let mut editor =
        QuoteService::bootstrap(SqliteQuoteRepository::open(&path).unwrap()).unwrap();

    editor.add("User quote", "Mine").unwrap();
    watcher.apply_remote(&[quote("remote", "Server")]).unwrap();

    let reopened = SqliteQuoteRepository::open(&path).unwrap();
    let stored = reopened.load_quotes().unwrap().unwrap();
    assert_eq!(stored.len(), 6);
    assert!(stored.contains(&quote("User quote", "Mine")));
    assert_eq!(stored.last(), Some(&quote("remote", "Server")));
    assert_eq!(watcher.list(), stored.as_slice());
}

#[test]
fn merge_persists_collapsed_local_duplicates() {
    let mut service = service_with(vec![quote("x", "A")]);
    service
        .import_json(r#"[{"text": "x", "category": "A"}]"#, ImportMode::Append)
        .unwrap();
    assert_eq!(service.list().len(), 2);

    let report = service.apply_remote(&[]).unwrap();

    assert!(!report.changed);
    assert_eq!(service.list(), &[quote("x", "A")]);
    assert_eq!(
        service.repository().load_quotes().unwrap(),
        Some(vec![quote("x", "A")])
    );
}
