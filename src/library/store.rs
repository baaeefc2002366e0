//! Row access to an installed library database

use super::records::{Book, Issue, NewBook, NewIssue, Student};
use super::schema::{BOOKS, ISSUES, LAYOUTS, LIBRARY_DATABASE, STUDENTS};
use crate::error::{Error, Result};
use crate::executor::ExecutionEngine;
use crate::storage::{Database, Value};

/// Typed access to the `students`, `books` and `issues` tables.
///
/// Every operation touches exactly one table. Roll numbers and titles
/// stored in `issues` are never checked against the other tables, and
/// removing a student or book leaves its issues untouched.
#[derive(Debug)]
pub struct Library<'a> {
    db: &'a mut Database,
}

impl<'a> Library<'a> {
    /// Borrow the `library` database of `engine`
    pub fn attach(engine: &'a mut ExecutionEngine) -> Result<Self> {
        Self::new(engine.database_mut(LIBRARY_DATABASE)?)
    }

    /// Wrap a database laid out by the library schema
    pub fn new(db: &'a mut Database) -> Result<Self> {
        for (table, expected) in LAYOUTS {
            let schema = db.table(table)?.schema();
            if schema.column_names() != expected {
                return Err(Error::InvalidSchema(
                    table.to_string(),
                    format!("expected columns ({})", expected.join(", ")),
                ));
            }
            if schema.primary_key_index() != Some(0) {
                return Err(Error::InvalidSchema(
                    table.to_string(),
                    format!("expected primary key on '{}'", expected[0]),
                ));
            }
            if table != STUDENTS && schema.auto_increment_index() != Some(0) {
                return Err(Error::InvalidSchema(
                    table.to_string(),
                    format!("expected AUTO_INCREMENT on '{}'", expected[0]),
                ));
            }
        }
        Ok(Self { db })
    }

    // ========== students ==========

    /// Enroll a student; fails if the roll number is taken
    pub fn add_student(&mut self, student: &Student) -> Result<()> {
        self.db.table_mut(STUDENTS)?.insert(student.to_tuple())?;
        Ok(())
    }

    pub fn student(&self, roll_no: &str) -> Result<Option<Student>> {
        self.db
            .table(STUDENTS)?
            .get(&Value::from(roll_no))?
            .map(Student::try_from)
            .transpose()
    }

    pub fn students(&self) -> Result<Vec<Student>> {
        self.db.table(STUDENTS)?.scan().map(Student::try_from).collect()
    }

    /// Rename a student; the roll number picks the row
    pub fn update_student(&mut self, student: &Student) -> Result<()> {
        self.db
            .table_mut(STUDENTS)?
            .update(&Value::from(student.roll_no.as_str()), student.to_tuple())
    }

    pub fn remove_student(&mut self, roll_no: &str) -> Result<Student> {
        let row = self.db.table_mut(STUDENTS)?.delete(&Value::from(roll_no))?;
        Student::try_from(&row)
    }

    // ========== books ==========

    /// Catalogue a book, returning it with its generated id
    pub fn add_book(&mut self, book: &NewBook) -> Result<Book> {
        let row = self.db.table_mut(BOOKS)?.insert(book.to_tuple())?;
        Book::try_from(&row)
    }

    pub fn book(&self, id: i64) -> Result<Option<Book>> {
        self.db
            .table(BOOKS)?
            .get(&Value::Integer(id))?
            .map(Book::try_from)
            .transpose()
    }

    pub fn books(&self) -> Result<Vec<Book>> {
        self.db.table(BOOKS)?.scan().map(Book::try_from).collect()
    }

    /// Replace the title and author of book `book.id`.
    ///
    /// Issues keep the title they were recorded with.
    pub fn update_book(&mut self, book: &Book) -> Result<()> {
        self.db
            .table_mut(BOOKS)?
            .update(&Value::Integer(book.id), book.to_tuple())
    }

    pub fn remove_book(&mut self, id: i64) -> Result<Book> {
        let row = self.db.table_mut(BOOKS)?.delete(&Value::Integer(id))?;
        Book::try_from(&row)
    }

    // ========== issues ==========

    /// Record that a book was issued, returning the row with its generated id
    pub fn record_issue(&mut self, issue: &NewIssue) -> Result<Issue> {
        let row = self.db.table_mut(ISSUES)?.insert(issue.to_tuple())?;
        Issue::try_from(&row)
    }

    pub fn issue(&self, id: i64) -> Result<Option<Issue>> {
        self.db
            .table(ISSUES)?
            .get(&Value::Integer(id))?
            .map(Issue::try_from)
            .transpose()
    }

    pub fn issues(&self) -> Result<Vec<Issue>> {
        self.db.table(ISSUES)?.scan().map(Issue::try_from).collect()
    }

    pub fn remove_issue(&mut self, id: i64) -> Result<Issue> {
        let row = self.db.table_mut(ISSUES)?.delete(&Value::Integer(id))?;
        Issue::try_from(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::install;

    #[test]
    fn test_attach_requires_installed_schema() {
        let mut engine = ExecutionEngine::in_memory();
        assert!(matches!(
            Library::attach(&mut engine),
            Err(Error::DatabaseNotFound(_))
        ));

        engine.execute_script("CREATE DATABASE library").unwrap();
        assert!(matches!(
            Library::attach(&mut engine),
            Err(Error::TableNotFound(_))
        ));
    }

    #[test]
    fn test_attach_rejects_foreign_layout() {
        let mut engine = ExecutionEngine::in_memory();
        engine
            .execute_script(
                "CREATE DATABASE library; USE library;
                 CREATE TABLE students (student_id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(100));
                 CREATE TABLE books (id INT AUTO_INCREMENT PRIMARY KEY, title TEXT, author TEXT);
                 CREATE TABLE issues (id INT AUTO_INCREMENT PRIMARY KEY, roll_no TEXT, book_title TEXT);",
            )
            .unwrap();
        assert!(matches!(
            Library::attach(&mut engine),
            Err(Error::InvalidSchema(t, _)) if t == "students"
        ));
    }

    #[test]
    fn test_attach_rejects_missing_keys() {
        let mut engine = ExecutionEngine::in_memory();
        engine
            .execute_script(
                "CREATE DATABASE library; USE library;
                 CREATE TABLE students (roll_no VARCHAR(20) PRIMARY KEY, name VARCHAR(100));
                 CREATE TABLE books (id INT, title VARCHAR(255), author VARCHAR(150));
                 CREATE TABLE issues (id INT AUTO_INCREMENT PRIMARY KEY, roll_no VARCHAR(20), book_title VARCHAR(255));",
            )
            .unwrap();
        assert!(matches!(
            Library::attach(&mut engine),
            Err(Error::InvalidSchema(t, _)) if t == "books"
        ));
        assert!(engine.database("library").unwrap().table(BOOKS).unwrap().is_empty());

        engine
            .execute_script(
                "DROP TABLE books;
                 CREATE TABLE books (id INT PRIMARY KEY, title VARCHAR(255), author VARCHAR(150));",
            )
            .unwrap();
        assert!(matches!(
            Library::attach(&mut engine),
            Err(Error::InvalidSchema(t, msg)) if t == "books" && msg.contains("AUTO_INCREMENT")
        ));

        engine
            .execute_script(
                "CREATE DATABASE other; USE other;
                 CREATE TABLE students (roll_no VARCHAR(20), name VARCHAR(100));",
            )
            .unwrap();
        let db = engine.database_mut("other").unwrap();
        assert!(matches!(
            Library::new(db),
            Err(Error::InvalidSchema(t, _)) if t == "students"
        ));
    }

    #[test]
    fn test_book_lifecycle() {
        let mut engine = ExecutionEngine::in_memory();
        install(&mut engine).unwrap();
        let mut library = Library::attach(&mut engine).unwrap();

        let dune = library.add_book(&NewBook::new("Dune", "Herbert")).unwrap();
        let emma = library.add_book(&NewBook::default()).unwrap();
        assert_eq!((dune.id, emma.id), (1, 2));
        assert_eq!(emma.title, None);

        assert_eq!(library.book(1).unwrap(), Some(dune.clone()));
        assert_eq!(library.remove_book(2).unwrap(), emma);
        assert_eq!(library.books().unwrap(), vec![dune]);
        assert!(matches!(
            library.remove_book(2),
            Err(Error::RowNotFound(_, _))
        ));
    }
}
