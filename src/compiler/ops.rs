//! Lexes Brainfuck source into a folded, ordered list of operations.
//!
//! # Folding
//!
//! Adjacent arithmetic commands are folded into a single node as they
//! are read, rather than as a separate optimization pass:
//!
//! - Two commands of the *same* reducible kind accumulate: `+++` folds
//!   to one `AsciiAdd` node with `arg = 3`.
//! - Two commands of *antagonist* kinds cancel against each other:
//!   `+-` folds to an `AsciiAdd` node with `arg = 0`, and `-+` folds to
//!   an `AsciiAdd` node with `arg = 0` too (the winning kind is decided
//!   by whichever magnitude is larger; a tie keeps the first kind).
//!
//! `AsciiAdd`/`AsciiSub` magnitudes wrap at 256, matching the 8-bit
//! cell they eventually become. `CellAdd`/`CellSub` magnitudes are
//! otherwise unbounded (the code generator picks an 8- or 32-bit
//! immediate form based on the final value).
//!
//! A node that folds down to `arg == 0` is *kept in place* while
//! folding continues (so a later command can still fold against it,
//! e.g. `+-+` folds to a single `AsciiAdd` node with `arg = 1`). Once
//! the whole source has been read, these zero-arg nodes are pruned —
//! but pruning one can make its former neighbors directly adjacent,
//! and those neighbors may themselves now be foldable (e.g. `>+-<`
//! folds during the read to `[CellAdd(1), AsciiAdd(0), CellSub(1)]`;
//! removing the zero-arg middle node leaves two adjacent antagonist
//! `CellAdd`/`CellSub` nodes that must cancel in turn). Pruning and
//! re-folding therefore alternate until a pass of each leaves the list
//! unchanged, guaranteeing the finished list never has two adjacent
//! nodes of the same or antagonist kind.

use crate::compiler::error::{Error, Result};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OpKind {
    CellAdd,
    CellSub,
    AsciiAdd,
    AsciiSub,
    Out,
    In,
    LoopBegin,
    LoopEnd,
}

impl OpKind {
    fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'>' => Some(Self::CellAdd),
            b'<' => Some(Self::CellSub),
            b'+' => Some(Self::AsciiAdd),
            b'-' => Some(Self::AsciiSub),
            b'.' => Some(Self::Out),
            b',' => Some(Self::In),
            b'[' => Some(Self::LoopBegin),
            b']' => Some(Self::LoopEnd),
            _ => None,
        }
    }

    /// Whether this kind ever participates in folding.
    fn is_reducible(self) -> bool {
        matches!(
            self,
            Self::CellAdd | Self::CellSub | Self::AsciiAdd | Self::AsciiSub
        )
    }

    /// The kind whose effect cancels this one's, if any.
    fn antagonist(self) -> Option<Self> {
        match self {
            Self::CellAdd => Some(Self::CellSub),
            Self::CellSub => Some(Self::CellAdd),
            Self::AsciiAdd => Some(Self::AsciiSub),
            Self::AsciiSub => Some(Self::AsciiAdd),
            _ => None,
        }
    }

    fn wraps_at_byte(self) -> bool {
        matches!(self, Self::AsciiAdd | Self::AsciiSub)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OpNode {
    pub kind: OpKind,
    pub arg: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OpList {
    nodes: Vec<OpNode>,
}

impl OpList {
    #[must_use]
    pub fn nodes(&self) -> &[OpNode] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lex and fold `src` into an `OpList`.
    ///
    /// # Errors
    ///
    /// Errors if brackets are unbalanced: a `]` with no matching open
    /// `[` fails immediately at its byte offset, and a dangling open
    /// `[` at end of input fails at offset `src.len()`.
    pub fn parse(src: &[u8]) -> Result<Self> {
        let mut nodes: Vec<OpNode> = Vec::new();
        let mut depth: usize = 0;

        for (i, &c) in src.iter().enumerate() {
            match c {
                b'[' => depth += 1,
                b']' => {
                    if depth == 0 {
                        return Err(Error::UnmatchedClose(i));
                    }
                    depth -= 1;
                }
                _ => {}
            }

            let Some(kind) = OpKind::from_byte(c) else {
                continue;
            };

            if let Some(last) = nodes.last_mut() {
                if last.kind.is_reducible() && kind.is_reducible() && fold(last, kind) {
                    continue;
                }
            }

            nodes.push(OpNode { kind, arg: 1 });
        }

        if depth > 0 {
            return Err(Error::UnmatchedOpen(src.len()));
        }

        Ok(Self { nodes: collapse_zero_gaps(nodes) })
    }
}

/// Attempt to fold a new one-count occurrence of `kind` into `tail`.
///
/// Returns `true` if folding applied (the candidate should be
/// discarded), `false` if `tail` and `kind` don't interact (the
/// candidate must be appended as its own node).
fn fold(tail: &mut OpNode, kind: OpKind) -> bool {
    if tail.kind == kind {
        tail.arg += 1;
        if tail.kind.wraps_at_byte() {
            tail.arg %= 256;
        }
        return true;
    }

    if tail.kind.antagonist() == Some(kind) {
        if tail.arg > 1 {
            tail.arg -= 1;
        } else if tail.arg == 1 {
            tail.arg = 0;
        } else {
            // tail.arg == 0: the incoming command outweighs it.
            tail.kind = kind;
            tail.arg = 1;
        }
        return true;
    }

    false
}

/// Merge two adjacent reducible nodes if they interact: same kind
/// accumulates (wrapping at 256 for the ascii ops), antagonist kinds
/// cancel toward whichever has the larger magnitude. Returns `None` if
/// `a` and `b` don't interact at all and must stay separate nodes.
fn try_merge(a: OpNode, b: OpNode) -> Option<OpNode> {
    if a.kind == b.kind {
        let mut arg = a.arg + b.arg;
        if a.kind.wraps_at_byte() {
            arg %= 256;
        }
        return Some(OpNode { kind: a.kind, arg });
    }

    if a.kind.antagonist() == Some(b.kind) {
        return Some(match a.arg.cmp(&b.arg) {
            std::cmp::Ordering::Greater => OpNode { kind: a.kind, arg: a.arg - b.arg },
            std::cmp::Ordering::Less => OpNode { kind: b.kind, arg: b.arg - a.arg },
            std::cmp::Ordering::Equal => OpNode { kind: a.kind, arg: 0 },
        });
    }

    None
}

/// Repeatedly merge adjacent reducible nodes and prune the zero-arg
/// results until a full pass of each leaves the list unchanged.
///
/// Needed because pruning a zero-arg node can bring two previously
/// non-adjacent nodes together, and those may themselves now be
/// foldable (see the module-level doc comment for a worked example).
fn collapse_zero_gaps(mut nodes: Vec<OpNode>) -> Vec<OpNode> {
    loop {
        let merged_any = merge_adjacent_pass(&mut nodes);
        let pruned_any = prune_zero_pass(&mut nodes);
        if !merged_any && !pruned_any {
            return nodes;
        }
    }
}

fn merge_adjacent_pass(nodes: &mut Vec<OpNode>) -> bool {
    let mut result = Vec::with_capacity(nodes.len());
    let mut changed = false;

    for node in nodes.drain(..) {
        if let Some(&last) = result.last() {
            if last.kind.is_reducible() && node.kind.is_reducible() {
                if let Some(merged) = try_merge(last, node) {
                    *result.last_mut().expect("just checked non-empty") = merged;
                    changed = true;
                    continue;
                }
            }
        }
        result.push(node);
    }

    *nodes = result;
    changed
}

fn prune_zero_pass(nodes: &mut Vec<OpNode>) -> bool {
    let before = nodes.len();
    nodes.retain(|node| !(node.kind.is_reducible() && node.arg == 0));
    nodes.len() != before
}
