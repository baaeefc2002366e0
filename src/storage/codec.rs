//! Binary table-file format
//!
//! Layout (little endian):
//!
//! ```text
//! magic "LTBL" | version u8 | has_sequence u8 | next_id i64 | row_count u32
//! row*: value_count u32 | value*
//! value: tag u8 (0 = NULL, 1 = INTEGER i64, 2 = STRING u32 len + utf8)
//! ```

use super::sequence::AutoIncrement;
use super::tuple::{Tuple, Value};
use crate::error::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

const MAGIC: &[u8; 4] = b"LTBL";
const VERSION: u8 = 1;

const TAG_NULL: u8 = 0;
const TAG_INTEGER: u8 = 1;
const TAG_STRING: u8 = 2;

/// Decoded contents of a table file
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub sequence: Option<AutoIncrement>,
    pub rows: Vec<Tuple>,
}

/// Encode a table's sequence state and rows
pub fn encode_table<'a>(
    sequence: Option<AutoIncrement>,
    rows: impl ExactSizeIterator<Item = &'a Tuple>,
) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_slice(MAGIC);
    buf.put_u8(VERSION);
    match sequence {
        Some(seq) => {
            buf.put_u8(1);
            buf.put_i64_le(seq.peek());
        }
        None => {
            buf.put_u8(0);
            buf.put_i64_le(0);
        }
    }
    buf.put_u32_le(rows.len() as u32);
    for tuple in rows {
        encode_tuple(&mut buf, tuple);
    }
    buf.freeze()
}

fn encode_tuple(buf: &mut BytesMut, tuple: &Tuple) {
    buf.put_u32_le(tuple.len() as u32);
    for value in tuple {
        match value {
            Value::Null => buf.put_u8(TAG_NULL),
            Value::Integer(i) => {
                buf.put_u8(TAG_INTEGER);
                buf.put_i64_le(*i);
            }
            Value::String(s) => {
                buf.put_u8(TAG_STRING);
                buf.put_u32_le(s.len() as u32);
                buf.put_slice(s.as_bytes());
            }
        }
    }
}

/// Decode a table file. `source` names the file in error messages.
pub fn decode_table(source: &str, mut data: &[u8]) -> Result<TableData> {
    let corrupt = |msg: &str| Error::CorruptedData(source.to_string(), msg.to_string());

    need(&data, 4 + 1 + 1 + 8 + 4).map_err(|_| corrupt("truncated header"))?;
    let mut magic = [0u8; 4];
    data.copy_to_slice(&mut magic);
    if &magic != MAGIC {
        return Err(corrupt("bad magic"));
    }
    let version = data.get_u8();
    if version != VERSION {
        return Err(corrupt(&format!("unsupported version {}", version)));
    }
    let has_sequence = data.get_u8() != 0;
    let next_id = data.get_i64_le();
    let row_count = data.get_u32_le() as usize;

    let mut rows = Vec::with_capacity(row_count.min(4096));
    for _ in 0..row_count {
        rows.push(decode_tuple(&mut data).map_err(|msg| corrupt(&msg))?);
    }
    if data.has_remaining() {
        return Err(corrupt("trailing bytes"));
    }

    Ok(TableData {
        sequence: has_sequence.then(|| AutoIncrement::starting_at(next_id)),
        rows,
    })
}

fn decode_tuple(data: &mut &[u8]) -> std::result::Result<Tuple, String> {
    need(data, 4)?;
    let count = data.get_u32_le() as usize;
    let mut values = Vec::with_capacity(count.min(64));

    for _ in 0..count {
        need(data, 1)?;
        let value = match data.get_u8() {
            TAG_NULL => Value::Null,
            TAG_INTEGER => {
                need(data, 8)?;
                Value::Integer(data.get_i64_le())
            }
            TAG_STRING => {
                need(data, 4)?;
                let len = data.get_u32_le() as usize;
                need(data, len)?;
                let s = std::str::from_utf8(&data[..len])
                    .map_err(|e| e.to_string())?
                    .to_string();
                data.advance(len);
                Value::String(s)
            }
            tag => return Err(format!("unknown type tag {}", tag)),
        };
        values.push(value);
    }

    Ok(Tuple::new(values))
}

fn need(data: &[u8], n: usize) -> std::result::Result<(), String> {
    if data.remaining() < n {
        Err("unexpected end of data".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<Tuple> {
        vec![
            Tuple::new(vec![Value::Integer(1), "Intro to Algorithms".into(), "Cormen".into()]),
            Tuple::new(vec![Value::Integer(3), "Café".into(), Value::Null]),
        ]
    }

    #[test]
    fn test_table_file_contents() {
        let rows = sample_rows();
        let bytes = encode_table(Some(AutoIncrement::starting_at(4)), rows.iter());
        assert_eq!(&bytes[..4], b"LTBL");

        let data = decode_table("books.tbl", &bytes).unwrap();
        assert_eq!(data.rows, rows);
        assert_eq!(data.sequence.map(|s| s.peek()), Some(4));
    }

    #[test]
    fn test_table_without_sequence() {
        let rows = vec![Tuple::new(vec!["S001".into(), Value::Null])];
        let bytes = encode_table(None, rows.iter());
        let data = decode_table("students.tbl", &bytes).unwrap();
        assert_eq!(data.sequence, None);
        assert_eq!(data.rows, rows);
    }

    #[test]
    fn test_corrupted_input() {
        let bytes = encode_table(None, sample_rows().iter());

        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            decode_table("books.tbl", truncated),
            Err(Error::CorruptedData(f, _)) if f == "books.tbl"
        ));

        let mut bad_magic = bytes.to_vec();
        bad_magic[0] = b'X';
        assert!(decode_table("books.tbl", &bad_magic).is_err());

        let mut trailing = bytes.to_vec();
        trailing.push(0);
        assert!(decode_table("books.tbl", &trailing).is_err());
    }
}
