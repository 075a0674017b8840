//! Custom query filter.
//!
//! Narrows a manifest down to the lines a custom query run should process,
//! optionally rewriting each kept line.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use regex::{Captures, Regex, RegexBuilder};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const REPLACE_PREFIX: &str = "$txt=";
const NO_BLOCKLIST: &str = "$^";

#[derive(Debug, Clone)]
pub struct CustomQuery {
    search: Regex,
    replace: Option<Vec<Token>>,
    blocklist: Option<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Group(usize),
    Literal(String),
}

impl CustomQuery {
    /// Compiles a query.
    ///
    /// - `search` is matched case-insensitively at the start of each line.
    /// - `replace` is either `$txt=` followed by `+`-separated tokens (`$N` for
    ///   a capture group, anything else literal), or anything else to keep the
    ///   whole match.
    /// - `blocklist` is empty or `$^` for none, `/pattern/flags` (`i` for
    ///   case-insensitive), or a bare pattern which is case-insensitive.
    pub fn new(search: &str, replace: &str, blocklist: &str) -> Result<Self> {
        let search = compile(&format!("^(?:{search})"), true)?;
        let replace = replace.strip_prefix(REPLACE_PREFIX).map(parse_replace);
        let blocklist = match blocklist {
            "" | NO_BLOCKLIST => None,
            pattern => Some(parse_blocklist(pattern)?),
        };
        Ok(Self { search, replace, blocklist })
    }

    /// The rewritten line, or `None` if the line is filtered out.
    pub fn apply(&self, line: &str) -> Option<String> {
        let captures = self.search.captures(line)?;
        if self.blocklist.as_ref().is_some_and(|b| b.is_match(line)) {
            return None;
        }
        Some(match &self.replace {
            Some(tokens) => render(tokens, &captures),
            None => captures[0].to_string(),
        })
    }

    /// Filters `input` into `output`, returning the number of lines written.
    pub fn filter_file(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let bytes = fs::read(input).or_raise(|| ErrorKind::Unreadable(input.to_path_buf()))?;
        let text = String::from_utf8_lossy(&bytes);
        let file = File::create(output).or_raise(|| ErrorKind::Unwritable(output.to_path_buf()))?;
        let mut writer = BufWriter::new(file);
        let mut written = 0;
        for line in text.lines() {
            if let Some(kept) = self.apply(line) {
                writeln!(writer, "{kept}").or_raise(|| ErrorKind::Unwritable(output.to_path_buf()))?;
                written += 1;
            }
        }
        writer.flush().or_raise(|| ErrorKind::Unwritable(output.to_path_buf()))?;
        tracing::info!(input = %input.display(), output = %output.display(), written, "Filtered manifest");
        Ok(written)
    }
}

fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .or_raise(|| ErrorKind::InvalidPattern(pattern.to_string()))
}

fn parse_blocklist(pattern: &str) -> Result<Regex> {
    if let Some(body) = pattern.strip_prefix('/')
        && let Some((inner, flags)) = body.rsplit_once('/')
    {
        return compile(inner, flags.to_lowercase().contains('i'));
    }
    compile(pattern, true)
}

fn parse_replace(expression: &str) -> Vec<Token> {
    expression
        .split('+')
        .map(str::trim)
        .map(|token| match token.strip_prefix('$').and_then(|n| n.parse::<usize>().ok()) {
            Some(group) if token[1..].bytes().all(|b| b.is_ascii_digit()) => Token::Group(group),
            _ => Token::Literal(token.to_string()),
        })
        .collect()
}

fn render(tokens: &[Token], captures: &Captures<'_>) -> String {
    tokens
        .iter()
        .map(|token| match token {
            Token::Group(n) => captures.get(*n).map(|m| m.as_str()).unwrap_or_default(),
            Token::Literal(text) => text.as_str(),
        })
        .collect()
}
