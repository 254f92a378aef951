//! Lenient parser for the `F10DataApi` lsjz payload.
//!
//! The endpoint returns a JavaScript assignment wrapping an HTML table:
//!
//! ```text
//! var apidata={ content:"<table>...</table>",records:123,pages:7,curpage:1};
//! ```
//!
//! Rows that fail to parse are skipped rather than failing the page; a page
//! with no table at all is a parse failure.

use std::fmt::{Display, Formatter};

use crate::domain::{CalendarDate, NavRecord};

/// Marker Eastmoney embeds when a window holds no published rows.
pub const NO_DATA_MARKER: &str = "暂无数据";

/// One parsed page of NAV history.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPage {
    pub records: Vec<NavRecord>,
    /// Pagination indicator from the apidata envelope, `None` when the body
    /// was a bare table without `curpage`/`pages` fields.
    pub has_next: Option<bool>,
}

/// Failure to locate any tabular payload in a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    message: String,
}

impl ParseFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ParseFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseFailure {}

/// Parse one lsjz response body into NAV records.
pub fn parse_history_page(body: &str) -> Result<NavPage, ParseFailure> {
    if body.contains(NO_DATA_MARKER) {
        return Ok(NavPage {
            records: Vec::new(),
            has_next: Some(false),
        });
    }

    let (html, has_next) = match extract_apidata_content(body) {
        Some((content, has_next)) => (content, has_next),
        None => (body.to_owned(), None),
    };

    let records = parse_table_rows(&html)?;
    Ok(NavPage { records, has_next })
}

/// Pull the `content:"..."` HTML out of the apidata envelope, along with the
/// `curpage < pages` continuation signal when both fields are present.
fn extract_apidata_content(body: &str) -> Option<(String, Option<bool>)> {
    let start = body.find("content:\"")? + "content:\"".len();
    let rest = &body[start..];
    let end = rest.find("\",")?;
    let html = rest[..end].replace("\\\"", "\"").replace("\\/", "/");

    let has_next = match (field_u32(body, "curpage:"), field_u32(body, "pages:")) {
        (Some(curpage), Some(pages)) => Some(curpage < pages),
        _ => None,
    };

    Some((html, has_next))
}

fn field_u32(body: &str, key: &str) -> Option<u32> {
    let start = body.find(key)? + key.len();
    let digits: String = body[start..]
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn parse_table_rows(html: &str) -> Result<Vec<NavRecord>, ParseFailure> {
    let table_start = html
        .find("<table")
        .ok_or_else(|| ParseFailure::new("response body contains no table"))?;
    let table = match html[table_start..].find("</table>") {
        Some(end) => &html[table_start..table_start + end],
        None => &html[table_start..],
    };

    let mut records = Vec::new();
    for row in table.split("<tr").skip(1) {
        let row = match row.find("</tr>") {
            Some(end) => &row[..end],
            None => row,
        };
        if row.contains("<th") {
            continue;
        }

        let cells = extract_cells(row);
        if cells.len() < 2 {
            continue;
        }

        let Ok(date) = CalendarDate::parse(&cells[0]) else {
            continue;
        };
        let Ok(nav) = cells[1].parse::<f64>() else {
            continue;
        };
        let acc_nav = cells.get(2).and_then(|cell| cell.parse::<f64>().ok());

        if let Ok(record) = NavRecord::new(date, nav, acc_nav) {
            records.push(record);
        }
    }

    Ok(records)
}

fn extract_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    for fragment in row.split("<td").skip(1) {
        let Some(content_start) = fragment.find('>') else {
            continue;
        };
        let content = &fragment[content_start + 1..];
        let content = match content.find("</td>") {
            Some(end) => &content[..end],
            None => content,
        };
        cells.push(strip_tags(content).replace("&nbsp;", " ").trim().to_owned());
    }
    cells
}

fn strip_tags(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => output.push(ch),
            _ => {}
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_apidata(table: &str, curpage: u32, pages: u32) -> String {
        let escaped = table.replace('"', "\\\"");
        format!(
            "var apidata={{ content:\"{escaped}\",records:40,pages:{pages},curpage:{curpage}}};"
        )
    }

    const TABLE: &str = concat!(
        "<table class=\"w782 comm lsjz\">",
        "<thead><tr><th>净值日期</th><th>单位净值</th><th>累计净值</th></tr></thead>",
        "<tbody>",
        "<tr><td>2024-01-03</td><td class=\"tor bold\">1.2340</td><td>2.1000</td></tr>",
        "<tr><td>2024-01-02</td><td class=\"tor bold\">1.2280</td><td>2.0940</td></tr>",
        "</tbody></table>"
    );

    #[test]
    fn parses_wrapped_page_with_continuation() {
        let body = wrap_apidata(TABLE, 1, 3);

        let page = parse_history_page(&body).expect("must parse");

        assert_eq!(page.records.len(), 2);
        assert_eq!(page.has_next, Some(true));
        assert_eq!(page.records[0].date.format_iso(), "2024-01-03");
        assert_eq!(page.records[0].nav, 1.234);
        assert_eq!(page.records[0].acc_nav, Some(2.1));
    }

    #[test]
    fn last_page_reports_no_continuation() {
        let body = wrap_apidata(TABLE, 3, 3);
        let page = parse_history_page(&body).expect("must parse");
        assert_eq!(page.has_next, Some(false));
    }

    #[test]
    fn bare_table_has_no_continuation_signal() {
        let page = parse_history_page(TABLE).expect("must parse");
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.has_next, None);
    }

    #[test]
    fn no_data_marker_yields_empty_terminal_page() {
        let body = "var apidata={ content:\"暂无数据!\",records:0,pages:0,curpage:1};";
        let page = parse_history_page(body).expect("must parse");
        assert!(page.records.is_empty());
        assert_eq!(page.has_next, Some(false));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let table = concat!(
            "<table><tbody>",
            "<tr><td>2024-01-03</td><td>1.2340</td><td>2.1000</td></tr>",
            "<tr><td>净值日期</td><td>---</td><td>---</td></tr>",
            "<tr><td>2024-01-02</td><td>not-a-number</td><td>2.0940</td></tr>",
            "</tbody></table>"
        );

        let page = parse_history_page(table).expect("must parse");

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].nav, 1.234);
    }

    #[test]
    fn missing_acc_nav_cell_parses_as_none() {
        let table = "<table><tr><td>2024-01-03</td><td>1.2340</td><td></td></tr></table>";
        let page = parse_history_page(table).expect("must parse");
        assert_eq!(page.records[0].acc_nav, None);
    }

    #[test]
    fn body_without_table_is_a_parse_failure() {
        let err = parse_history_page("<html><body>error page</body></html>").expect_err("no table");
        assert!(err.message().contains("no table"));
    }
}
