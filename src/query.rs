//! Literal SQL rendering from parameterized templates
//!
//! Substitutes positional `?` placeholders in a query template with literal
//! argument values, for database implementations that assemble plain query
//! strings: scalars are inlined verbatim, sequences expand to a parenthesized
//! comma list, and absent values become a permanently-false predicate so the
//! filter matches nothing. A companion helper rewrites a templated query into
//! a row-counting query.

/// Predicate fragment substituted for absent arguments: matches no rows.
const FALSE_PREDICATE: &str = " ( 1 != 1 ) ";

/// A literal argument for a query template.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    /// Signed integer, rendered in decimal.
    Int(i64),
    /// Unsigned integer, rendered in decimal.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// String, rendered verbatim without quoting.
    Str(String),
    /// Sequence, rendered as `(e1,e2,...)`; an empty sequence renders as the
    /// false predicate.
    List(Vec<QueryArg>),
    /// Absent value, rendered as the false predicate.
    Null,
}

impl QueryArg {
    fn render(&self) -> String {
        match self {
            QueryArg::Int(value) => value.to_string(),
            QueryArg::UInt(value) => value.to_string(),
            QueryArg::Float(value) => value.to_string(),
            QueryArg::Str(value) => value.clone(),
            QueryArg::List(items) if items.is_empty() => FALSE_PREDICATE.to_owned(),
            QueryArg::List(items) => {
                let parts: Vec<String> = items.iter().map(QueryArg::render).collect();
                format!("({})", parts.join(","))
            }
            QueryArg::Null => FALSE_PREDICATE.to_owned(),
        }
    }
}

impl From<i64> for QueryArg {
    fn from(value: i64) -> Self {
        QueryArg::Int(value)
    }
}

impl From<i32> for QueryArg {
    fn from(value: i32) -> Self {
        QueryArg::Int(value.into())
    }
}

impl From<u64> for QueryArg {
    fn from(value: u64) -> Self {
        QueryArg::UInt(value)
    }
}

impl From<f64> for QueryArg {
    fn from(value: f64) -> Self {
        QueryArg::Float(value)
    }
}

impl From<String> for QueryArg {
    fn from(value: String) -> Self {
        QueryArg::Str(value)
    }
}

impl From<&str> for QueryArg {
    fn from(value: &str) -> Self {
        QueryArg::Str(value.to_owned())
    }
}

impl<T: Into<QueryArg>> From<Vec<T>> for QueryArg {
    fn from(values: Vec<T>) -> Self {
        QueryArg::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryArg>> From<Option<T>> for QueryArg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => QueryArg::Null,
        }
    }
}

/// Replace each `?` in the template, in order, with the literal rendering of
/// the matching argument.
///
/// Surplus placeholders are left untouched; surplus arguments are ignored.
pub fn render_query(template: &str, args: &[QueryArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    for (i, part) in template.split('?').enumerate() {
        if i > 0 {
            match args.next() {
                Some(arg) => out.push_str(&arg.render()),
                None => out.push('?'),
            }
        }
        out.push_str(part);
    }
    out
}

/// Rewrite a templated query into a row-counting query.
///
/// Any trailing `LIMIT` clause is stripped (pagination would skew the count),
/// the remaining placeholders are substituted, and the result is wrapped in
/// `SELECT COUNT(*) FROM (...) t`.
pub fn render_count_query(template: &str, args: &[QueryArg]) -> String {
    let template = strip_trailing_limit(template);
    format!("SELECT COUNT(*) FROM ({}) t", render_query(template, args))
}

/// Truncate from the last word-boundary `LIMIT` onward, if any.
fn strip_trailing_limit(template: &str) -> &str {
    let lower = template.to_ascii_lowercase();
    match lower.rfind("limit") {
        Some(pos) if lower[..pos].ends_with(|c: char| c.is_ascii_whitespace()) => &template[..pos],
        _ => template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inlines_a_scalar() {
        assert_eq!(
            render_query("SELECT * FROM spu WHERE id = ?", &[1i64.into()]),
            "SELECT * FROM spu WHERE id = 1"
        );
    }

    #[test]
    fn expands_a_sequence() {
        assert_eq!(
            render_query(
                "SELECT * FROM spu WHERE id in ?",
                &[vec!["1", "2"].into()]
            ),
            "SELECT * FROM spu WHERE id in (1,2)"
        );
    }

    #[test]
    fn substitutes_in_order() {
        assert_eq!(
            render_query(
                "SELECT * FROM spu WHERE id =  ? and id = ? limit ?,?",
                &[1i64.into(), "2".into(), 0i64.into(), 10i64.into()]
            ),
            "SELECT * FROM spu WHERE id =  1 and id = 2 limit 0,10"
        );
    }

    #[test]
    fn absent_values_become_false_predicates() {
        assert_eq!(
            render_query(
                "SELECT * FROM spu WHERE id =  ? and id = ? limit ?,?",
                &[
                    QueryArg::Null,
                    None::<i64>.into(),
                    Some(2i64).into(),
                    Vec::<i64>::new().into(),
                ]
            ),
            "SELECT * FROM spu WHERE id =   ( 1 != 1 )  and id =  ( 1 != 1 )  limit 2, ( 1 != 1 ) "
        );
    }

    #[test]
    fn surplus_placeholders_stay() {
        assert_eq!(
            render_query("WHERE a = ? AND b = ?", &[7i64.into()]),
            "WHERE a = 7 AND b = ?"
        );
    }

    #[test]
    fn count_wraps_the_rendered_query() {
        assert_eq!(
            render_count_query("SELECT * FROM spu WHERE id =  ?", &["1".into()]),
            "SELECT COUNT(*) FROM (SELECT * FROM spu WHERE id =  1) t"
        );
    }

    #[test]
    fn count_strips_a_trailing_limit_clause() {
        assert_eq!(
            render_count_query(
                "SELECT * FROM spu WHERE id in (1,2,3) LIMIT ?,?",
                &[0i64.into(), 10i64.into()]
            ),
            "SELECT COUNT(*) FROM (SELECT * FROM spu WHERE id in (1,2,3) ) t"
        );
    }

    #[test]
    fn count_leaves_column_names_containing_limit_alone() {
        assert_eq!(
            render_count_query("SELECT rate_limit FROM spu", &[]),
            "SELECT COUNT(*) FROM (SELECT rate_limit FROM spu) t"
        );
    }
}
