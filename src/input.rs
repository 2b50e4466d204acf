//! Reads an input file into a stream of newline-delimited keys.
//!
//! Records are separated by ASCII line feed; the separator is stripped
//! before a record reaches the engine, which never sees a terminator
//! byte. This plays the same role the original dictionary reader plays
//! for word lists, just without the trailing frequency column.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Iterates the newline-delimited byte records of one input file.
pub struct KeyFile {
    reader: BufReader<File>,
}

impl KeyFile {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(KeyFile {
            reader: BufReader::new(File::open(path)?),
        })
    }
}

impl Iterator for KeyFile {
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();

        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Some(Ok(buf))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
