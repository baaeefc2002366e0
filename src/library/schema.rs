//! The library schema script

use crate::error::Result;
use crate::executor::ExecutionEngine;
use tracing::info;

/// Name of the database the schema creates
pub const LIBRARY_DATABASE: &str = "library";

/// Table holding enrolled students, keyed by their external roll number
pub const STUDENTS: &str = "students";
/// Table holding catalogued books
pub const BOOKS: &str = "books";
/// Table recording each time a book was issued to a student
pub const ISSUES: &str = "issues";

/// Data-definition script for the library.
///
/// There are no existence guards, so running it twice fails. `issues`
/// carries plain copies of a roll number and a book title: no foreign keys.
pub const LIBRARY_SCHEMA: &str = "\
-- Library management schema
CREATE DATABASE library;
USE library;

CREATE TABLE students (
    roll_no VARCHAR(20) PRIMARY KEY,
    name VARCHAR(100)
);

CREATE TABLE books (
    id INT AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(255),
    author VARCHAR(150)
);

CREATE TABLE issues (
    id INT AUTO_INCREMENT PRIMARY KEY,
    roll_no VARCHAR(20),
    book_title VARCHAR(255)
);
";

/// Column order of each library table, as created by [`LIBRARY_SCHEMA`]
pub(crate) const LAYOUTS: [(&str, &[&str]); 3] = [
    (STUDENTS, &["roll_no", "name"]),
    (BOOKS, &["id", "title", "author"]),
    (ISSUES, &["id", "roll_no", "book_title"]),
];

/// Run [`LIBRARY_SCHEMA`] against `engine`.
///
/// Leaves `library` as the current database.
pub fn install(engine: &mut ExecutionEngine) -> Result<()> {
    engine.execute_script(LIBRARY_SCHEMA)?;
    info!(database = LIBRARY_DATABASE, "library schema installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::error::Error;

    #[test]
    fn test_install_creates_three_tables() {
        let mut engine = ExecutionEngine::in_memory();
        install(&mut engine).unwrap();

        let db = engine.database(LIBRARY_DATABASE).unwrap();
        assert_eq!(db.list_tables(), vec![BOOKS, ISSUES, STUDENTS]);

        for (table, columns) in LAYOUTS {
            let schema = db.table(table).unwrap().schema();
            assert_eq!(schema.column_names(), columns.to_vec());
        }

        let students = db.table(STUDENTS).unwrap().schema();
        assert_eq!(students.primary_key_index(), Some(0));
        assert_eq!(students.auto_increment_index(), None);
        assert_eq!(students.columns()[0].data_type, DataType::Varchar(20));
        assert!(students.columns()[1].nullable);

        for table in [BOOKS, ISSUES] {
            let schema = db.table(table).unwrap().schema();
            assert_eq!(schema.auto_increment_index(), Some(0));
            assert!(schema.columns()[1..].iter().all(|c| c.nullable));
        }
    }

    #[test]
    fn test_install_twice_fails() {
        let mut engine = ExecutionEngine::in_memory();
        install(&mut engine).unwrap();

        let result = install(&mut engine);
        assert!(matches!(result, Err(Error::DatabaseAlreadyExists(_))));
    }
}
