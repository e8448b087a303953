//! Output formatting and query logging for the Verst CLI.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::index::Index;
use crate::ranking::ResultWindow;

/// Print one page of ranked matches in human-readable form.
///
/// Each match renders as `rank: #docid name date` with an indented
/// population line, pulling `name`, `admitted`, and `population` from the
/// document payload. A zero-match window prints a notice instead; it is not
/// an error.
pub fn print_window<W: Write>(window: &ResultWindow, index: &Index, out: &mut W) -> Result<()> {
    if window.matches.is_empty() {
        writeln!(out, "No matches.")?;
        return Ok(());
    }

    for m in &window.matches {
        let data = index
            .doc(m.doc_id)
            .map(|doc| &doc.data)
            .unwrap_or(&serde_json::Value::Null);

        let name = data.get("name").and_then(|v| v.as_str()).unwrap_or("");
        let admitted = data.get("admitted").and_then(|v| v.as_str()).unwrap_or("");
        let population = data
            .get("population")
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        writeln!(
            out,
            "{}: #{:03} {} {}",
            m.rank,
            m.doc_id,
            name,
            format_date(admitted)
        )?;
        writeln!(out, "        Population {}", format_numeral(population))?;
    }

    Ok(())
}

/// Render a `YYYYMMDD` payload date as e.g. "December 14, 1819". Anything
/// that does not parse is passed through untouched.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Format an integer with thousands separators.
pub fn format_numeral(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Appends the per-query audit record to a log file.
///
/// The record is the minimal contract the formatter/logger collaborator
/// requires: query text, offset, pagesize, and the document ids in final
/// order.
#[derive(Debug)]
pub struct QueryLog {
    path: PathBuf,
}

impl QueryLog {
    /// Create a logger appending to the given file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        QueryLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one audit line:
    /// `<timestamp> 'QUERY'[offset:offset+pagesize] = id id ...`
    pub fn log_matches(
        &self,
        querystring: &str,
        offset: usize,
        pagesize: usize,
        doc_ids: &[u64],
    ) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let ids = doc_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        writeln!(
            file,
            "{} '{}'[{}:{}] = {}",
            Utc::now().to_rfc3339(),
            querystring,
            offset,
            offset + pagesize,
            ids
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ahash::AHashMap;
    use tempfile::TempDir;

    use super::*;
    use crate::index::StoredDocument;
    use crate::ranking::RankedMatch;
    use crate::sort_key::SortKey;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("18191214"), "December 14, 1819");
        assert_eq!(format_date("18890202"), "February 2, 1889");
        // Unparseable values pass through
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_numeral() {
        assert_eq!(format_numeral(0), "0");
        assert_eq!(format_numeral(999), "999");
        assert_eq!(format_numeral(1000), "1,000");
        assert_eq!(format_numeral(4_779_736), "4,779,736");
        assert_eq!(format_numeral(-65432), "-65,432");
    }

    #[test]
    fn test_print_window() {
        let doc = StoredDocument {
            id: 3,
            values: AHashMap::new(),
            data: serde_json::json!({
                "name": "Alabama",
                "admitted": "18191214",
                "population": 4779736,
            }),
        };
        let index = Index::from_documents(vec![doc]).unwrap();

        let window = ResultWindow {
            matches: vec![RankedMatch {
                rank: 1,
                doc_id: 3,
                score: 0.5,
                distance_key: SortKey::encode(10.0).unwrap(),
            }],
            total_matches: 1,
            offset: 0,
            pagesize: 10,
        };

        let mut out = Vec::new();
        print_window(&window, &index, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1: #003 Alabama December 14, 1819"));
        assert!(text.contains("        Population 4,779,736"));
    }

    #[test]
    fn test_print_empty_window() {
        let index = Index::from_documents(vec![]).unwrap();
        let window = ResultWindow {
            matches: vec![],
            total_matches: 0,
            offset: 0,
            pagesize: 10,
        };

        let mut out = Vec::new();
        print_window(&window, &index, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No matches.\n");
    }

    #[test]
    fn test_query_log_line() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("search.log");

        let log = QueryLog::new(&log_path);
        log.log_matches("sunflower state", 0, 10, &[16, 34, 27]).unwrap();
        log.log_matches("desert", 5, 10, &[]).unwrap();

        let contents = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("'sunflower state'[0:10] = 16 34 27"));
        assert!(lines[1].contains("'desert'[5:15] = "));
    }
}
