//! Parser for line-oriented source maps (`/etc/passwd` style files).

use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::error::EntryParseError;
use crate::{Error, Result};

/// Parse every entry line from `reader`.
///
/// Blank lines and lines starting with `#` are skipped. The first malformed
/// line aborts parsing with its 1-based line number.
pub fn parse_entries<E, R>(reader: R) -> Result<Vec<E>>
where
    E: FromStr<Err = EntryParseError>,
    R: Read,
{
    let buf_reader = BufReader::new(reader);
    let mut entries = Vec::new();

    for (i, line) in buf_reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let entry = line.parse::<E>().map_err(|e| Error::Parse {
            line: i + 1,
            reason: e.to_string(),
        })?;
        entries.push(entry);
    }

    log::debug!("Parsed {} entries", entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupEntry, PasswdEntry};

    #[test]
    fn test_parse_passwd_file() {
        let input = "\
# system accounts
root:x:0:0:root:/root:/bin/bash

daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
";
        let entries: Vec<PasswdEntry> = parse_entries(input.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "root");
        assert_eq!(entries[1].uid, 1);
    }

    #[test]
    fn test_parse_crlf() {
        let input = "wheel:x:10:alice\r\n";
        let entries: Vec<GroupEntry> = parse_entries(input.as_bytes()).unwrap();
        assert_eq!(entries[0].members, vec!["alice"]);
    }

    #[test]
    fn test_parse_error_line_number() {
        let input = "root:x:0:0:root:/root:/bin/bash\nbroken:x\n";
        let err = parse_entries::<PasswdEntry, _>(input.as_bytes()).unwrap_err();
        match err {
            Error::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 7 fields"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
