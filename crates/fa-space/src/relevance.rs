//! Relevance expressions: regular expressions over relevance labels.
//!
//! Expressions are plain strings.  The empty string is ε.  Alternatives are
//! separated by a top-level `|` and kept sorted and deduplicated, so equal
//! alternative sets always print the same way.  In alternative lists ε is
//! spelled [`EPSILON`].

use std::collections::BTreeSet;

/// The spelling of ε inside an alternative list.
pub const EPSILON: &str = "ε";

/// `true` for the empty expression (however it is spelled).
#[inline]
pub fn is_epsilon(expr: &str) -> bool {
    expr.is_empty() || expr == EPSILON
}

/// Top-level alternatives of `expr`, sorted and deduplicated.
pub fn alternatives(expr: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    if is_epsilon(expr) {
        out.insert(EPSILON.to_owned());
        return out;
    }
    let mut depth = 0usize;
    let mut current = String::new();
    for c in expr.chars() {
        match c {
            '|' if depth == 0 => {
                out.insert(std::mem::take(&mut current));
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.insert(current);
    }
    out
}

fn from_alternatives(alts: BTreeSet<String>) -> String {
    if alts.len() == 1 {
        let only = alts.into_iter().next().unwrap_or_default();
        return if only == EPSILON { String::new() } else { only };
    }
    alts.into_iter().collect::<Vec<_>>().join("|")
}

/// Parenthesize `expr` if it has more than one top-level alternative.
fn group(expr: &str) -> String {
    if alternatives(expr).len() > 1 { format!("({expr})") } else { expr.to_owned() }
}

/// `a` followed by `b`.
pub fn concat(a: &str, b: &str) -> String {
    if is_epsilon(a) {
        return if is_epsilon(b) { String::new() } else { b.to_owned() };
    }
    if is_epsilon(b) {
        return a.to_owned();
    }
    format!("{}{}", group(a), group(b))
}

/// `a` or `b`.
pub fn alternative(a: &str, b: &str) -> String {
    let mut alts = alternatives(a);
    alts.extend(alternatives(b));
    from_alternatives(alts)
}

/// Zero or more repetitions of `expr`.
pub fn star(expr: &str) -> String {
    if is_epsilon(expr) {
        String::new()
    } else if expr.chars().count() == 1 {
        format!("{expr}*")
    } else {
        format!("({expr})*")
    }
}

/// Fold `exprs` with [`alternative`], starting from the first one.
/// `None` if `exprs` is empty.
pub fn any_of<I, S>(exprs: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = exprs.into_iter();
    let first = iter.next()?.as_ref().to_owned();
    Some(iter.fold(first, |acc, e| alternative(&acc, e.as_ref())))
}
