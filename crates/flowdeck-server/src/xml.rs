//! BPMN XML normalization
//!
//! The engine refuses to instantiate processes that are not explicitly
//! marked executable, and diagrams exported by editors frequently carry
//! `isExecutable="false"` or omit the attribute entirely.

use once_cell::sync::Lazy;
use regex::Regex;

static EXECUTABLE_FALSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)isExecutable\s*=\s*["']false["']"#).expect("pattern is valid")
});

static EXECUTABLE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)isExecutable\s*=").expect("pattern is valid"));

static PROCESS_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<bpmn:process\s+)(id\s*=)").expect("pattern is valid"));

/// Ensure every process in the document is marked executable.
///
/// A targeted text substitution, not an XML parse: deploys must send the
/// author's document byte-for-byte apart from the executable flag, and a
/// real parser would re-serialize unrelated markup. Two rules:
///
/// 1. Any `isExecutable` attribute reading false (either quote style, any
///    case) is rewritten to `"true"` in place.
/// 2. If the document has no `isExecutable` attribute at all, one is
///    inserted right after the `<bpmn:process` opening tag, ahead of its
///    `id` attribute.
///
/// Already-executable documents pass through untouched, so the function is
/// idempotent. Input matching neither pattern also passes through
/// unchanged; the engine rejects it at deploy time.
pub fn ensure_executable(xml: &str) -> String {
    let patched = EXECUTABLE_FALSE.replace_all(xml, r#"isExecutable="true""#);

    if EXECUTABLE_ATTR.is_match(&patched) {
        return patched.into_owned();
    }

    PROCESS_OPEN
        .replace_all(&patched, r#"${1}isExecutable="true" ${2}"#)
        .into_owned()
}
