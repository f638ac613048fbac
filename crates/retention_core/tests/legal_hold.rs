use retention_core::db::open_db_in_memory;
use retention_core::{
    BatchError, Document, DocumentStore, Employee, EmployeeDirectory, LegalHoldService, RepoError,
    RepoResult, RetentionTarget, SqliteDocumentRepository, SqliteEmployeeRepository,
};
use rusqlite::Connection;
use std::cell::RefCell;

fn seed(conn: &Connection, employees: &[Employee], documents: &[Document]) {
    let employee_repo = SqliteEmployeeRepository::try_new(conn).unwrap();
    for employee in employees {
        employee_repo.upsert_employee(employee).unwrap();
    }
    let document_repo = SqliteDocumentRepository::try_new(conn).unwrap();
    for document in documents {
        document_repo.create_document(document).unwrap();
    }
}

fn held(document: Document) -> Document {
    Document {
        e_lhold: true,
        ..document
    }
}

#[test]
fn employee_hold_activation_propagates_to_unheld_documents() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[Employee::active("E1"), Employee::active("E2")],
        &[
            Document::new("D1").owned_by("E1"),
            Document::new("D2").owned_by("E1"),
            held(Document::new("D3").owned_by("E1")),
            Document::new("D4").owned_by("E2"),
        ],
    );
    SqliteEmployeeRepository::try_new(&conn)
        .unwrap()
        .set_employee_hold("E1", true)
        .unwrap();

    let service = LegalHoldService::new(
        SqliteEmployeeRepository::try_new(&conn).unwrap(),
        SqliteDocumentRepository::try_new(&conn).unwrap(),
    );
    let plan = service.plan().unwrap();
    assert_eq!(plan.activate, vec!["D1".to_string(), "D2".to_string()]);
    assert!(plan.remove.is_empty());

    let report = service.run().unwrap();
    assert_eq!(report.activated, 2);
    assert_eq!(report.removed, 0);
    assert_eq!(report.employees_on_hold, 1);
    assert_eq!(report.employees_not_on_hold, 1);
    assert_eq!(report.documents_on_hold, 3);
    assert_eq!(report.documents_not_on_hold, 1);

    let store = SqliteDocumentRepository::try_new(&conn).unwrap();
    assert!(store.get_document("D1").unwrap().unwrap().e_lhold);
    assert!(!store.get_document("D4").unwrap().unwrap().e_lhold);
}

#[test]
fn released_employee_hold_is_removed_from_documents() {
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[Employee::active("E1")],
        &[
            held(Document::new("D1").owned_by("E1")),
            Document::new("D2").owned_by("E1"),
        ],
    );

    let report = LegalHoldService::new(
        SqliteEmployeeRepository::try_new(&conn).unwrap(),
        SqliteDocumentRepository::try_new(&conn).unwrap(),
    )
    .run()
    .unwrap();

    assert_eq!(report.activated, 0);
    assert_eq!(report.removed, 1);
    assert_eq!(report.documents_on_hold, 0);
}

#[test]
fn documents_without_matching_employee_are_left_alone() {
    let mut on_hold = Employee::active("E1");
    on_hold.e_lhold = true;
    let conn = open_db_in_memory().unwrap();
    seed(
        &conn,
        &[on_hold],
        &[
            Document::new("D1").owned_by("ghost"),
            held(Document::new("D2").owned_by("ghost")),
            Document::new("D3"),
        ],
    );

    let report = LegalHoldService::new(
        SqliteEmployeeRepository::try_new(&conn).unwrap(),
        SqliteDocumentRepository::try_new(&conn).unwrap(),
    )
    .run()
    .unwrap();

    assert_eq!(report.activated, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(report.documents_on_hold, 1);
    assert_eq!(report.documents_not_on_hold, 2);
}

#[test]
fn second_run_finds_nothing_to_flip() {
    let mut on_hold = Employee::active("E1");
    on_hold.e_lhold = true;
    let conn = open_db_in_memory().unwrap();
    seed(&conn, &[on_hold], &[Document::new("D1").owned_by("E1")]);

    let service = LegalHoldService::new(
        SqliteEmployeeRepository::try_new(&conn).unwrap(),
        SqliteDocumentRepository::try_new(&conn).unwrap(),
    );
    assert_eq!(service.run().unwrap().activated, 1);
    assert!(service.plan().unwrap().is_empty());
    assert_eq!(service.run().unwrap().activated, 0);
}

/// In-memory store recording hold batches, optionally failing one call.
#[derive(Default)]
struct RecordingStore {
    documents: RefCell<Vec<Document>>,
    batches: RefCell<Vec<usize>>,
    fail_on_call: Option<usize>,
}

impl DocumentStore for RecordingStore {
    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        Ok(self.documents.borrow().clone())
    }

    fn update_document_hold(&self, ids: &[String], e_lhold: bool) -> RepoResult<usize> {
        let call = self.batches.borrow().len();
        if self.fail_on_call == Some(call) {
            return Err(RepoError::InvalidData("store unavailable".to_string()));
        }
        self.batches.borrow_mut().push(ids.len());
        let mut documents = self.documents.borrow_mut();
        for document in documents.iter_mut() {
            if ids.contains(&document.d_id) {
                document.e_lhold = e_lhold;
            }
        }
        Ok(ids.len())
    }

    fn update_document_retention(&self, _d_id: &str, _target: &RetentionTarget) -> RepoResult<()> {
        unreachable!("legal hold runs never write retention fields")
    }
}

struct StaticDirectory(Vec<Employee>);

impl EmployeeDirectory for StaticDirectory {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        Ok(self.0.clone())
    }
}

struct FailingDirectory;

impl EmployeeDirectory for FailingDirectory {
    fn list_employees(&self) -> RepoResult<Vec<Employee>> {
        Err(RepoError::InvalidData("directory offline".to_string()))
    }
}

fn held_employee(e_id: &str) -> Employee {
    Employee {
        e_lhold: true,
        ..Employee::active(e_id)
    }
}

fn documents_for(e_id: &str, count: usize) -> Vec<Document> {
    (0..count)
        .map(|n| Document::new(format!("D{n:04}")).owned_by(e_id))
        .collect()
}

#[test]
fn writes_are_chunked_to_the_batch_limit() {
    let store = RecordingStore {
        documents: RefCell::new(documents_for("E1", 1201)),
        ..RecordingStore::default()
    };
    let directory = StaticDirectory(vec![held_employee("E1")]);

    let report = LegalHoldService::new(&directory, &store).run().unwrap();

    assert_eq!(report.activated, 1201);
    assert_eq!(*store.batches.borrow(), vec![500, 500, 201]);
    assert_eq!(report.documents_on_hold, 1201);
}

#[test]
fn configured_batch_size_is_clamped() {
    let store = RecordingStore {
        documents: RefCell::new(documents_for("E1", 5)),
        ..RecordingStore::default()
    };
    let directory = StaticDirectory(vec![held_employee("E1")]);

    LegalHoldService::new(&directory, &store)
        .with_batch_size(2)
        .run()
        .unwrap();
    assert_eq!(*store.batches.borrow(), vec![2, 2, 1]);

    let single = RecordingStore {
        documents: RefCell::new(documents_for("E1", 3)),
        ..RecordingStore::default()
    };
    LegalHoldService::new(&directory, &single)
        .with_batch_size(0)
        .run()
        .unwrap();
    assert_eq!(*single.batches.borrow(), vec![1, 1, 1]);
}

#[test]
fn write_failure_keeps_completed_batches_and_returns_no_report() {
    let store = RecordingStore {
        documents: RefCell::new(documents_for("E1", 700)),
        fail_on_call: Some(1),
        ..RecordingStore::default()
    };
    let directory = StaticDirectory(vec![held_employee("E1")]);

    let err = LegalHoldService::new(&directory, &store).run().unwrap_err();

    assert!(matches!(err, BatchError::Write { completed: 500, .. }));
    let held_count = store
        .documents
        .borrow()
        .iter()
        .filter(|document| document.e_lhold)
        .count();
    assert_eq!(held_count, 500);
}

#[test]
fn read_failure_aborts_before_any_write() {
    let store = RecordingStore {
        documents: RefCell::new(documents_for("E1", 3)),
        ..RecordingStore::default()
    };

    let err = LegalHoldService::new(FailingDirectory, &store)
        .run()
        .unwrap_err();

    assert!(matches!(err, BatchError::Read(_)));
    assert!(store.batches.borrow().is_empty());
}

#[test]
fn plan_serializes_id_sets_and_counts() {
    let store = RecordingStore {
        documents: RefCell::new(documents_for("E1", 2)),
        ..RecordingStore::default()
    };
    let directory = StaticDirectory(vec![held_employee("E1")]);

    let plan = LegalHoldService::new(&directory, &store).plan().unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["activate"], serde_json::json!(["D0000", "D0001"]));
    assert_eq!(json["remove"], serde_json::json!([]));
    assert_eq!(json["employees_on_hold"], 1);
}
