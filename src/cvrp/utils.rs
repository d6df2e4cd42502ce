use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use lazy_static::lazy_static;
use regex::Regex;

use super::error::{Error, Result};

lazy_static! {
    // Everything up to the first colon is the key, the remainder is the value
    static ref KEY_VALUE: Regex = Regex::new(r"^(?P<key>[^:]*):(?P<value>.*)$").unwrap();
}

/// Opens an input file, telling a missing path apart from other i/o failures.
pub fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })
}

/// Reads the whole file into memory, the handle is closed before returning.
pub fn read_to_string(path: &Path) -> Result<String> {
    let mut contents = String::new();
    open(path)?.read_to_string(&mut contents)?;

    Ok(contents)
}

pub trait ParseKeyValue {
    /// Splits a `KEY : value` line on its first colon, trimming both halves.
    fn split_key_value(&self) -> Option<(&str, &str)>;
}

impl ParseKeyValue for str {
    fn split_key_value(&self) -> Option<(&str, &str)> {
        let captures = KEY_VALUE.captures(self)?;
        let key = captures.name("key")?.as_str().trim();
        let value = captures.name("value")?.as_str().trim();
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_colon_only() {
        assert_eq!("DIMENSION : 32".split_key_value(), Some(("DIMENSION", "32")));
        assert_eq!(
            "COMMENT : (trucks: 5)".split_key_value(),
            Some(("COMMENT", "(trucks: 5)"))
        );
        assert_eq!("NODE_COORD_SECTION".split_key_value(), None);
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = read_to_string(Path::new("./definitely/not/here.vrp")).unwrap_err();
        assert!(err.is_file_not_found());
    }
}
