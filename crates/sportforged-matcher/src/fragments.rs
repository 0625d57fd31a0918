//! Named regex fragments.
//!
//! Patterns may reference reusable sub-expressions as `<name>`. Group
//! syntax such as `(?P<name>...)`, `(?<name>...)`, and `\k<name>` is left
//! alone. Each fragment is resolved once; a fragment that reaches itself
//! through its own references is rejected.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Fragments available to every pattern. User fragments with the same name win.
pub const BUILTIN_FRAGMENTS: &[(&str, &str)] = &[
    ("sep", r"[ ._-]+"),
    ("year", r"(?P<year>(?:19|20)\d{2})"),
    ("month", r"(?P<month>1[0-2]|0?[1-9])"),
    ("day", r"(?P<day>3[01]|[12]\d|0?[1-9])"),
    (
        "date",
        r"(?P<date>\d{4}<sep>\d{1,2}<sep>\d{1,2}|\d{1,2}<sep>\d{1,2}<sep>\d{4})",
    ),
    ("round", r"(?:R|Round[ ._-]?)(?P<round>\d{1,2})"),
    ("week", r"(?:W|Wk|Week)[ ._-]?(?P<week>\d{1,2})"),
    (
        "quality",
        r"(?P<quality>2160p|1080p|1080i|720p|576p|480p|4k|uhd)",
    ),
    ("ext", r"\.(?:mkv|mp4|avi|m4v|ts|webm|mov)$"),
];

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\k|\(\?P|\(\?)?<([A-Za-z_][A-Za-z0-9_]*)>").expect("reference pattern is valid")
});

/// Fragment definitions with memoized resolution.
#[derive(Debug, Clone)]
pub struct FragmentTable {
    raw: BTreeMap<String, String>,
    resolved: HashMap<String, String>,
}

impl FragmentTable {
    /// Built-in fragments overlaid with user definitions.
    pub fn new(user: &BTreeMap<String, String>) -> Self {
        let mut raw: BTreeMap<String, String> = BUILTIN_FRAGMENTS
            .iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect();
        raw.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self {
            raw,
            resolved: HashMap::new(),
        }
    }

    /// Resolve every fragment, surfacing cycles and unknown references even
    /// in fragments no pattern uses.
    pub fn resolve_all(&mut self) -> Result<()> {
        let names: Vec<String> = self.raw.keys().cloned().collect();
        for name in names {
            self.resolve(&name, &mut Vec::new())?;
        }
        Ok(())
    }

    /// Expand every fragment reference in a pattern.
    pub fn expand(&mut self, pattern: &str) -> Result<String> {
        self.expand_with_stack(pattern, &mut Vec::new())
    }

    fn expand_with_stack(&mut self, text: &str, stack: &mut Vec<String>) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in REFERENCE.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            // Group names and backreferences are regex syntax.
            if caps.get(1).is_some() {
                continue;
            }
            let name = &caps[2];
            out.push_str(&text[last..whole.start()]);
            out.push_str(&self.resolve(name, stack)?);
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    fn resolve(&mut self, name: &str, stack: &mut Vec<String>) -> Result<String> {
        if let Some(done) = self.resolved.get(name) {
            return Ok(done.clone());
        }
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(Error::FragmentCycle {
                chain: chain.join(" -> "),
            });
        }
        let body = self
            .raw
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_fragment(name))?;

        stack.push(name.to_string());
        let expanded = self.expand_with_stack(&body, stack);
        stack.pop();

        let expanded = expanded?;
        self.resolved.insert(name.to_string(), expanded.clone());
        Ok(expanded)
    }
}

/// Expand a single pattern against the built-ins plus `user` fragments.
pub fn expand_fragments(pattern: &str, user: &BTreeMap<String, String>) -> Result<String> {
    FragmentTable::new(user).expand(pattern)
}
