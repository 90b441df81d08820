//! Recursive `#pragma include` expansion.
//!
//! A directive line is replaced by the referenced file's contents, expanded
//! in turn; every other line passes through unchanged with a `\n` terminator.
//! Each include expands at most once per top-level parse: the seen-set is
//! threaded through the whole recursion rather than reset per branch, so
//! diamond-shaped include graphs inline each file exactly once. The flip side
//! is that a header meant to be expanded repeatedly is also suppressed after
//! its first appearance.
//!
//! A missing or unresolvable include is reported and its directive line
//! dropped; expansion continues with the rest of the source. Recursion past
//! [`MAX_INCLUDE_DEPTH`] is reported and yields empty text for that branch,
//! which surfaces downstream as a compile failure rather than a crash.

use std::collections::HashSet;
use std::path::Path;

use crate::include_provider::{IncludeProvider, ResolvedIncludePath};

/// Deepest include chain expanded before a branch is abandoned.
pub const MAX_INCLUDE_DEPTH: usize = 32;

lazy_static::lazy_static! {
    static ref INCLUDE_DIRECTIVE_RE: regex::Regex =
        regex::Regex::new(r#"^\s*#\s*pragma\s+include\s+["<](.*)[">].*"#).unwrap();
}

/// Expand every `#pragma include "path"` / `<path>` directive in `source`.
///
/// `source_dir` is the directory the top-level source was read from; relative
/// include paths resolve against the directory of whichever file references
/// them. All file access goes through `provider`.
pub fn preprocess(
    source: &str,
    source_dir: &Path,
    provider: &mut dyn IncludeProvider,
) -> String {
    let mut expander = IncludeExpander {
        provider,
        seen: HashSet::new(),
    };
    expander.expand(source, source_dir, 0)
}

struct IncludeExpander<'a> {
    provider: &'a mut dyn IncludeProvider,
    seen: HashSet<ResolvedIncludePath>,
}

impl<'a> IncludeExpander<'a> {
    fn expand(&mut self, source: &str, source_dir: &Path, depth: usize) -> String {
        if depth > MAX_INCLUDE_DEPTH {
            log::error!(
                "header inclusion depth limit reached, might be caused by cyclic header inclusion"
            );
            return String::new();
        }

        let mut output = String::new();
        for line in source.lines() {
            let captures = match INCLUDE_DIRECTIVE_RE.captures(line) {
                Some(captures) => captures,
                None => {
                    output.push_str(line);
                    output.push('\n');
                    continue;
                }
            };

            let request = &captures[1];
            let resolved = match self.provider.resolve(request, source_dir) {
                Ok(resolved) => resolved,
                Err(err) => {
                    log::error!("could not resolve include {:?}: {}", request, err);
                    continue;
                }
            };

            if !self.seen.insert(resolved.clone()) {
                log::debug!("{:?} already included", resolved.0);
                continue;
            }

            let child_source = match self.provider.read(&resolved) {
                Ok(text) => text,
                Err(err) => {
                    log::error!("could not open include file {:?}: {}", resolved.0, err);
                    continue;
                }
            };

            let child_dir = resolved
                .0
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            output.push_str(&self.expand(&child_source, &child_dir, depth + 1));
        }

        output
    }
}
