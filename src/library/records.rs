//! Typed rows of the library tables

use crate::catalog::DataType;
use crate::error::{Error, Result};
use crate::storage::{Tuple, Value};
use serde::{Deserialize, Serialize};

/// A row of `students`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub roll_no: String,
    pub name: Option<String>,
}

impl Student {
    pub fn new(roll_no: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            roll_no: roll_no.into(),
            name: name.map(str::to_string),
        }
    }

    pub(crate) fn to_tuple(&self) -> Tuple {
        Tuple::new(vec![
            Value::from(self.roll_no.as_str()),
            Value::from(self.name.clone()),
        ])
    }
}

/// A row of `books`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Book {
    pub(crate) fn to_tuple(&self) -> Tuple {
        Tuple::new(vec![
            Value::Integer(self.id),
            Value::from(self.title.clone()),
            Value::from(self.author.clone()),
        ])
    }
}

/// A book to catalogue; the store assigns its id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl NewBook {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        }
    }

    pub(crate) fn to_tuple(&self) -> Tuple {
        Tuple::new(vec![
            Value::Null,
            Value::from(self.title.clone()),
            Value::from(self.author.clone()),
        ])
    }
}

/// A row of `issues`.
///
/// `roll_no` and `book_title` are copies taken when the book was issued;
/// nothing guarantees a matching student or book exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub roll_no: Option<String>,
    pub book_title: Option<String>,
}

/// An issue to record; the store assigns its id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub roll_no: Option<String>,
    pub book_title: Option<String>,
}

impl NewIssue {
    pub fn new(roll_no: &str, book_title: &str) -> Self {
        Self {
            roll_no: Some(roll_no.to_string()),
            book_title: Some(book_title.to_string()),
        }
    }

    pub(crate) fn to_tuple(&self) -> Tuple {
        Tuple::new(vec![
            Value::Null,
            Value::from(self.roll_no.clone()),
            Value::from(self.book_title.clone()),
        ])
    }
}

impl TryFrom<&Tuple> for Student {
    type Error = Error;

    fn try_from(tuple: &Tuple) -> Result<Self> {
        expect_width(tuple, 2)?;
        Ok(Self {
            roll_no: text(tuple, 0, "roll_no")?
                .ok_or_else(|| Error::NullNotAllowed("roll_no".to_string()))?,
            name: text(tuple, 1, "name")?,
        })
    }
}

impl TryFrom<&Tuple> for Book {
    type Error = Error;

    fn try_from(tuple: &Tuple) -> Result<Self> {
        expect_width(tuple, 3)?;
        Ok(Self {
            id: integer(tuple, 0, "id")?,
            title: text(tuple, 1, "title")?,
            author: text(tuple, 2, "author")?,
        })
    }
}

impl TryFrom<&Tuple> for Issue {
    type Error = Error;

    fn try_from(tuple: &Tuple) -> Result<Self> {
        expect_width(tuple, 3)?;
        Ok(Self {
            id: integer(tuple, 0, "id")?,
            roll_no: text(tuple, 1, "roll_no")?,
            book_title: text(tuple, 2, "book_title")?,
        })
    }
}

fn expect_width(tuple: &Tuple, expected: usize) -> Result<()> {
    if tuple.len() != expected {
        return Err(Error::ColumnCountMismatch {
            expected,
            found: tuple.len(),
        });
    }
    Ok(())
}

fn text(tuple: &Tuple, idx: usize, column: &str) -> Result<Option<String>> {
    match tuple.get(idx) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(Error::TypeMismatch {
            column: column.to_string(),
            from: other.type_name().to_string(),
            to: DataType::Text.to_string(),
        }),
    }
}

fn integer(tuple: &Tuple, idx: usize, column: &str) -> Result<i64> {
    match tuple.get(idx) {
        Some(Value::Integer(i)) => Ok(*i),
        Some(Value::Null) | None => Err(Error::NullNotAllowed(column.to_string())),
        Some(other) => Err(Error::TypeMismatch {
            column: column.to_string(),
            from: other.type_name().to_string(),
            to: DataType::Integer.to_string(),
        }),
    }
}
