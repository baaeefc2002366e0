use librarydb::executor::ExecutionEngine;
use librarydb::library::{self, Library, NewBook, NewIssue, Student};
use librarydb::storage::{Tuple, Value};
use librarydb::Error;

fn installed() -> ExecutionEngine {
    let mut engine = ExecutionEngine::in_memory();
    library::install(&mut engine).unwrap();
    engine
}

#[test]
fn test_duplicate_roll_no_is_rejected() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    library
        .add_student(&Student::new("S001", Some("Alice")))
        .unwrap();
    let result = library.add_student(&Student::new("S001", Some("Someone else")));

    assert!(matches!(result, Err(Error::PrimaryKeyViolation(t, k)) if t == "students" && k == "S001"));
    assert_eq!(
        library.student("S001").unwrap(),
        Some(Student::new("S001", Some("Alice")))
    );
}

#[test]
fn test_student_name_is_optional() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    library.add_student(&Student::new("S002", None)).unwrap();
    assert_eq!(library.student("S002").unwrap().unwrap().name, None);
}

#[test]
fn test_book_ids_strictly_increase() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    let ids: Vec<i64> = (0..5)
        .map(|i| {
            library
                .add_book(&NewBook::new(&format!("Book {}", i), "Author"))
                .unwrap()
                .id
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    library.remove_book(5).unwrap();
    let next = library.add_book(&NewBook::new("Book 5", "Author")).unwrap();
    assert_eq!(next.id, 6);
}

#[test]
fn test_issue_ids_are_independent_of_books() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    for i in 0..3 {
        library
            .add_book(&NewBook::new(&format!("Book {}", i), "Author"))
            .unwrap();
    }
    let first = library
        .record_issue(&NewIssue::new("S001", "Book 0"))
        .unwrap();
    let second = library
        .record_issue(&NewIssue::new("S001", "Book 1"))
        .unwrap();

    assert_eq!((first.id, second.id), (1, 2));
}

#[test]
fn test_issue_roll_no_is_not_checked() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    let issue = library
        .record_issue(&NewIssue::new("NOBODY", "Intro to Algorithms"))
        .unwrap();

    assert_eq!(library.student("NOBODY").unwrap(), None);
    assert_eq!(library.issue(issue.id).unwrap(), Some(issue));
}

#[test]
fn test_issue_book_title_is_free_text() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();
    library
        .add_book(&NewBook::new("Intro to Algorithms", "Cormen"))
        .unwrap();

    let issue = library
        .record_issue(&NewIssue::new("S001", "A Title No Book Has"))
        .unwrap();
    assert_eq!(issue.book_title.as_deref(), Some("A Title No Book Has"));
    assert!(library
        .books()
        .unwrap()
        .iter()
        .all(|b| b.title.as_deref() != Some("A Title No Book Has")));
}

#[test]
fn test_library_scenario() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    library
        .add_student(&Student::new("S001", Some("Alice")))
        .unwrap();
    let book = library
        .add_book(&NewBook::new("Intro to Algorithms", "Cormen"))
        .unwrap();
    let issue = library
        .record_issue(&NewIssue::new("S001", "Intro to Algorithms"))
        .unwrap();

    assert_eq!(book.id, 1);
    assert_eq!(issue.id, 1);

    // No foreign key: removing the student leaves the issue in place.
    let removed = library.remove_student("S001").unwrap();
    assert_eq!(removed.name.as_deref(), Some("Alice"));
    assert!(library.students().unwrap().is_empty());
    assert_eq!(library.issues().unwrap(), vec![issue]);
}

#[test]
fn test_schema_script_is_not_rerunnable() {
    let mut engine = installed();

    let result = engine.execute_script(library::LIBRARY_SCHEMA);
    assert!(matches!(result, Err(Error::DatabaseAlreadyExists(name)) if name == "library"));

    // Against the existing database the table statements fail too.
    let tables_only = library::LIBRARY_SCHEMA
        .split_once("USE library;")
        .map(|(_, rest)| format!("USE library;{}", rest))
        .unwrap();
    let result = engine.execute_script(&tables_only);
    assert!(matches!(result, Err(Error::TableAlreadyExists(name)) if name == "students"));
}

#[test]
fn test_raw_table_access_matches_schema() {
    let mut engine = installed();
    let db = engine.current_database_mut().unwrap();

    let books = db.table_mut(library::BOOKS).unwrap();
    let row = books
        .insert_named(&[("title", "Dune".into()), ("author", "Herbert".into())])
        .unwrap();
    assert_eq!(row.get(0), Some(&Value::Integer(1)));
    assert_eq!(books.last_insert_id(), Some(1));

    let students = db.table_mut(library::STUDENTS).unwrap();
    let result = students.insert(Tuple::new(vec![Value::Null, "Nameless".into()]));
    assert!(matches!(result, Err(Error::NullNotAllowed(c)) if c == "roll_no"));

    let too_long = "x".repeat(21);
    let result = students.insert(Tuple::new(vec![too_long.into(), Value::Null]));
    assert!(matches!(result, Err(Error::ValueTooLarge(c)) if c == "roll_no"));
}

#[test]
fn test_update_student_and_book() {
    let mut engine = installed();
    let mut library = Library::attach(&mut engine).unwrap();

    library
        .add_student(&Student::new("S001", Some("Alice")))
        .unwrap();
    library
        .update_student(&Student::new("S001", Some("Alice Smith")))
        .unwrap();
    assert_eq!(
        library.student("S001").unwrap().unwrap().name.as_deref(),
        Some("Alice Smith")
    );

    let mut book = library
        .add_book(&NewBook::new("Intro to Algorithms", "Cormen"))
        .unwrap();
    let issue = library
        .record_issue(&NewIssue::new("S001", "Intro to Algorithms"))
        .unwrap();

    book.title = Some("Introduction to Algorithms".to_string());
    book.author = None;
    library.update_book(&book).unwrap();
    assert_eq!(library.book(book.id).unwrap(), Some(book));

    // The issue keeps the title it was recorded with.
    assert_eq!(
        library.issue(issue.id).unwrap().unwrap().book_title.as_deref(),
        Some("Intro to Algorithms")
    );

    let result = library.update_student(&Student::new("S404", None));
    assert!(matches!(result, Err(Error::RowNotFound(t, k)) if t == "students" && k == "S404"));
    let next = library.add_book(&NewBook::new("Dune", "Herbert")).unwrap();
    assert_eq!(next.id, 2);
}
