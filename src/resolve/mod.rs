//! Turns user text into a flat dice code: triggers fire, parenthesised groups
//! are rolled, defines are substituted, and numbers are folded together.

mod calc;
mod defines;
mod paren;
mod tree;

pub use calc::calc;
pub use defines::DefinesTable;
pub use paren::{fullparenthesis, matching_paren};

pub(crate) use paren::is_wrapped;

use crate::error::{proceed, Outcome, RResult, RollError};
use crate::roll::Roller;
use crate::session::Session;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tree::*;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").unwrap());

enum Raw {
    Text(Range<usize>),
    /// The inside of a parenthesis group.
    Group(Range<usize>),
}

/// Splits `code` into plain text and top-level parenthesis groups.
fn split_groups(code: &str) -> Result<Vec<Raw>, RollError> {
    let mut parts = Vec::new();
    let mut last = 0;
    while let Some(found) = code[last..].find(|c: char| c == '(' || c == ')') {
        let open = last + found;
        if code[open..].starts_with(')') {
            return Err(RollError::UnmatchedDelimiter {
                delimiter: ')',
                position: open,
            });
        }
        let close = matching_paren(code, open)?;
        if open > last {
            parts.push(Raw::Text(last..open));
        }
        parts.push(Raw::Group(open + 1..close));
        last = close + 1;
    }
    if last < code.len() {
        parts.push(Raw::Text(last..code.len()));
    }
    Ok(parts)
}

/// One resolution of one piece of text. Owns the tree it builds.
pub(crate) struct Resolver<'s, R> {
    session: &'s mut Session<R>,
    tree: ResolutionTree,
    expansions: usize,
}

impl<'s, R: Roller> Resolver<'s, R> {
    pub fn new(session: &'s mut Session<R>) -> Self {
        Self {
            session,
            tree: ResolutionTree::default(),
            expansions: 0,
        }
    }

    pub fn resolve(mut self, text: &str) -> RResult<String> {
        let root = proceed!(self.build(text, 0, &[]));
        log::trace!("{:?} resolved into {} nodes", text, self.tree.len());
        self.linearize(root)
    }

    fn count_expansion(&mut self) -> Result<(), RollError> {
        self.expansions += 1;
        let limit = self.session.config().max_expansions;
        if self.expansions > limit {
            Err(RollError::ExpansionLimit { limit })
        } else {
            Ok(())
        }
    }

    /// `used` holds the defines already being expanded above this node.
    fn build(&mut self, text: &str, depth: usize, used: &[String]) -> RResult<NodeId> {
        let limit = self.session.config().max_depth;
        if depth > limit {
            return Err(RollError::RecursionLimit { limit });
        }

        let mut code = text.to_string();
        let mut used = used.to_vec();
        loop {
            let pre = proceed!(self.session.preprocess(&code));
            if pre.changed {
                log::debug!("triggers turned {:?} into {:?}", code, pre.text);
            }
            code = pre.text;
            while code.contains("()") {
                code = code.replace("()", "");
            }

            let raw = split_groups(&code)?;
            if let Some((range, name, value)) = self.find_inline(&code, &raw, &used)? {
                log::debug!("splicing {} into {:?}", name, code);
                code.replace_range(range, &value);
                used.push(name);
                continue;
            }

            let mut pieces = Vec::new();
            for part in raw {
                match part {
                    Raw::Group(inner) => {
                        let child = proceed!(self.build(&code[inner], depth + 1, &used));
                        pieces.push(Piece::SubRoll(child));
                    }
                    Raw::Text(range) => {
                        proceed!(self.push_text(&code[range], depth, &used, &mut pieces))
                    }
                }
            }
            return Ok(Outcome::Done(self.tree.push(ResolutionNode { depth, pieces })));
        }
    }

    /// The first define in plain text whose value holds triggers. Those are
    /// spliced into the surrounding text instead of becoming a child node.
    fn find_inline(
        &mut self,
        code: &str,
        raw: &[Raw],
        used: &[String],
    ) -> Result<Option<(Range<usize>, String, String)>, RollError> {
        for part in raw {
            let range = match part {
                Raw::Text(range) => range,
                Raw::Group(_) => continue,
            };
            for m in WORD.find_iter(&code[range.clone()]) {
                if used.iter().any(|name| name == m.as_str()) {
                    continue;
                }
                let value = match self.session.defines().get(m.as_str()) {
                    Some(value) if value.contains('&') => value.to_string(),
                    _ => continue,
                };
                self.count_expansion()?;
                let start = range.start + m.start();
                return Ok(Some((start..start + m.len(), m.as_str().to_string(), value)));
            }
        }
        Ok(None)
    }

    fn push_text(
        &mut self,
        text: &str,
        depth: usize,
        used: &[String],
        pieces: &mut Vec<Piece>,
    ) -> RResult<()> {
        let mut last = 0;
        for m in WORD.find_iter(text) {
            let name = m.as_str();
            if used.iter().any(|u| u == name) {
                continue;
            }
            let value = match self.session.defines().get(name) {
                Some(value) => value.to_string(),
                None => continue,
            };
            self.count_expansion()?;
            log::debug!("expanding {} = {:?}", name, value);

            if m.start() > last {
                pieces.push(Piece::Text(text[last..m.start()].to_string()));
            }
            let mut inner_used = used.to_vec();
            inner_used.push(name.to_string());
            let node = proceed!(self.build(&value, depth, &inner_used));
            pieces.push(Piece::Define {
                name: name.to_string(),
                node,
            });
            last = m.end();
        }
        if last < text.len() {
            pieces.push(Piece::Text(text[last..].to_string()));
        }
        Ok(Outcome::Done(()))
    }

    /// Evaluates a node left to right and folds the resulting text.
    fn linearize(&mut self, id: NodeId) -> RResult<String> {
        let node = self.tree.node(id).clone();
        let mut out = String::new();
        for piece in node.pieces {
            match piece {
                Piece::Text(text) => out.push_str(&text),
                Piece::Define { name, node: child } => {
                    let value = proceed!(self.linearize(child));
                    log::trace!("{} at depth {} is {:?}", name, node.depth, value);
                    out.push_str(&value);
                }
                Piece::SubRoll(child) => {
                    let code = proceed!(self.linearize(child));
                    let interp = self.session.roll_code(&code)?;
                    let value = interp.result().unwrap_or(0);
                    log::debug!("subroll {:?} at depth {} = {}", code, node.depth + 1, value);
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(Outcome::Done(calc(&out)?))
    }
}
