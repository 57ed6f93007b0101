//! Translation of compact filter expressions into device query parameters.
//!
//! A filter expression is a list of `&`-separated groups, each a list of
//! `,`-separated clauses of the form `<field><op><value>`:
//!
//! ```text
//! name=port1,name=port2&fosid>=10
//! ```
//!
//! becomes
//!
//! ```text
//! filter=name=port1,name=port2&filter=id>=10
//! ```
//!
//! The device ORs clauses within a `filter=` parameter and ANDs separate
//! parameters. Translation is permissive: a clause that does not split into
//! field, operator and value is emitted as an empty token, which the device
//! ignores. Callers must treat a filter with dropped clauses as having less
//! effect than written, never as an error.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

const CLAUSE_PATTERN: &str = r"([^=*!@><]+)([=*!@><]+)([^=*!@><]+)";

fn clause_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CLAUSE_PATTERN).expect("clause pattern is valid"))
}

/// A clause split into its three parts. The operator run is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause<'a> {
    pub field: &'a str,
    pub operator: &'a str,
    pub value: &'a str,
}

/// Split one clause, or `None` when it has no field/operator/value shape.
pub fn parse_clause(clause: &str) -> Option<FilterClause<'_>> {
    let caps = clause_regex().captures(clause)?;
    Some(FilterClause {
        field: caps.get(1)?.as_str(),
        operator: caps.get(2)?.as_str(),
        value: caps.get(3)?.as_str(),
    })
}

/// Map a state attribute name to the device's filter field syntax.
///
/// `_` becomes `-` and `fosid` becomes `id`. Backslashes already present in
/// the name are doubled, then `.` is escaped as `\.`; the backslash inserted
/// for a dot is not escaped a second time.
pub fn escape_field_name(field: &str) -> String {
    let renamed = field.replace('_', "-").replace("fosid", "id");
    let mut out = String::with_capacity(renamed.len());
    for ch in renamed.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '.' => out.push_str("\\."),
            other => out.push(other),
        }
    }
    out
}

/// Translate a filter expression into `filter=` query parameters.
pub fn escape_filter(filter: &str) -> String {
    filter
        .split('&')
        .map(|group| {
            let clauses = group
                .split(',')
                .map(translate_clause)
                .collect::<Vec<_>>()
                .join(",");
            format!("filter={clauses}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn translate_clause(clause: &str) -> String {
    let Some(parsed) = parse_clause(clause) else {
        debug!(clause, "dropping filter clause without field/operator/value");
        return String::new();
    };
    format!(
        "{}{}{}",
        escape_field_name(parsed.field),
        parsed.operator,
        urlencoding::encode(parsed.value)
    )
}

#[cfg(test)]
mod tests {
    use super::{escape_field_name, parse_clause, FilterClause};

    #[test]
    fn clause_keeps_operator_run_verbatim() {
        assert_eq!(
            parse_clause("name!@port"),
            Some(FilterClause {
                field: "name",
                operator: "!@",
                value: "port",
            })
        );
    }

    #[test]
    fn clause_without_value_does_not_parse() {
        assert_eq!(parse_clause("name="), None);
        assert_eq!(parse_clause("=value"), None);
        assert_eq!(parse_clause(""), None);
    }

    #[test]
    fn field_escape_runs_in_order() {
        assert_eq!(escape_field_name("collector_ip"), "collector-ip");
        assert_eq!(escape_field_name("fosid"), "id");
        assert_eq!(escape_field_name("a.b"), "a\\.b");
        assert_eq!(escape_field_name("a\\b"), "a\\\\b");
        assert_eq!(escape_field_name("a\\.b"), "a\\\\\\.b");
    }
}
