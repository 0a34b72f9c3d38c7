//! Section accumulator
//!
//! Callers emit flat content and declare section boundaries implicitly by
//! opening new scopes. The accumulator keeps a stack of open scopes
//! (section, subsection, subsubsection) and a pending buffer of content
//! that has not been attached yet. Crossing a scope boundary flushes the
//! buffer into the innermost open scope and folds every scope deeper than
//! the new one into its parent, so no explicit "end section" call is needed.

use crate::latex_model::{Node, Scope, ScopeLevel};
use thiserror::Error;

/// Errors raised by the section accumulator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorError {
    /// A scope was opened without its parent level being open
    #[error(
        "Cannot open a {requested} at depth {} while only {open} scope(s) are open",
        .requested.depth()
    )]
    InvalidScopeNesting {
        /// The level that was requested
        requested: ScopeLevel,
        /// Stack depth at the time of the request
        open: usize,
    },

    /// Content or scopes were never attached to the document root
    #[error(
        "{pending} content item(s) and {open_scopes} open scope(s) were never attached to the document; call flush(0) before output"
    )]
    UnattachedTrailingContent {
        /// Items still in the pending buffer
        pending: usize,
        /// Scopes still on the stack
        open_scopes: usize,
    },
}

/// Nested-scope buffer that re-parents flat content into a section tree
#[derive(Debug, Default)]
pub struct SectionAccumulator {
    /// Document root content (closed top-level scopes and loose content)
    root: Vec<Node>,
    /// Open scopes, outermost first
    stack: Vec<Scope>,
    /// Content not yet attached to any scope
    pending: Vec<Node>,
}

impl SectionAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a content item until the next scope boundary
    pub fn emit(&mut self, item: Node) {
        log::trace!("Buffering content item #{}", self.pending.len() + 1);
        self.pending.push(item);
    }

    /// Open a new scope at `level`
    ///
    /// Closes every open scope at the same or a deeper level first. Fails
    /// without touching any state when the parent level is not open (e.g. a
    /// subsubsection with no open subsection).
    pub fn begin_scope(
        &mut self,
        level: ScopeLevel,
        title: impl Into<String>,
        numbering: bool,
    ) -> Result<(), AccumulatorError> {
        let depth = level.depth();
        if depth > self.stack.len() {
            return Err(AccumulatorError::InvalidScopeNesting {
                requested: level,
                open: self.stack.len(),
            });
        }

        self.flush(depth);

        let scope = Scope::new(level, title, numbering);
        log::debug!("Opening {} '{}'", scope.level, scope.title);
        self.stack.push(scope);
        Ok(())
    }

    /// Attach pending content and fold scopes deeper than `level`
    ///
    /// Pending content goes to the innermost open scope, or to the root when
    /// no scope is open. With an empty buffer that step is a no-op. Then
    /// every scope at index `level` or above is closed, innermost first, and
    /// appended as the last child of its parent (or of the root).
    pub fn flush(&mut self, level: usize) {
        if !self.pending.is_empty() {
            let drained = std::mem::take(&mut self.pending);
            match self.stack.last_mut() {
                Some(top) => top.children.extend(drained),
                None => self.root.extend(drained),
            }
        }

        while self.stack.len() > level {
            let Some(closed) = self.stack.pop() else {
                break;
            };
            log::debug!(
                "Closing {} '{}' with {} child node(s)",
                closed.level,
                closed.title,
                closed.children.len()
            );
            match self.stack.last_mut() {
                Some(parent) => parent.push(Node::Scope(closed)),
                None => self.root.push(Node::Scope(closed)),
            }
        }
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of buffered content items
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Innermost open scope
    pub fn current_scope(&self) -> Option<&Scope> {
        self.stack.last()
    }

    /// Content attached to the root so far
    pub fn root(&self) -> &[Node] {
        &self.root
    }

    /// Consume the accumulator and return the root content
    ///
    /// Fails with `UnattachedTrailingContent` if anything was emitted or
    /// opened after the last `flush(0)`.
    pub fn into_root(self) -> Result<Vec<Node>, AccumulatorError> {
        if !self.pending.is_empty() || !self.stack.is_empty() {
            return Err(AccumulatorError::UnattachedTrailingContent {
                pending: self.pending.len(),
                open_scopes: self.stack.len(),
            });
        }
        Ok(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::raw(s)
    }

    fn scope(level: ScopeLevel, title: &str, children: Vec<Node>) -> Node {
        Node::Scope(Scope {
            level,
            title: title.to_string(),
            numbering: true,
            children,
        })
    }

    #[test]
    fn test_loose_content_goes_to_root_in_order() {
        let mut acc = SectionAccumulator::new();
        acc.emit(text("a"));
        acc.emit(text("b"));
        acc.emit(text("c"));
        acc.flush(0);

        assert_eq!(acc.pending_len(), 0);
        assert_eq!(acc.into_root().unwrap(), vec![text("a"), text("b"), text("c")]);
    }

    #[test]
    fn test_subsection_nests_after_section_content() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "A", true).unwrap();
        acc.emit(text("a"));
        acc.emit(text("b"));
        acc.begin_scope(ScopeLevel::Subsection, "B", true).unwrap();
        acc.emit(text("c"));
        acc.flush(0);

        let root = acc.into_root().unwrap();
        assert_eq!(
            root,
            vec![scope(
                ScopeLevel::Section,
                "A",
                vec![
                    text("a"),
                    text("b"),
                    scope(ScopeLevel::Subsection, "B", vec![text("c")]),
                ]
            )]
        );
    }

    #[test]
    fn test_new_section_folds_full_stack() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "A", true).unwrap();
        acc.begin_scope(ScopeLevel::Subsection, "B", true).unwrap();
        acc.begin_scope(ScopeLevel::Subsubsection, "C", true).unwrap();
        acc.emit(text("x"));
        acc.begin_scope(ScopeLevel::Section, "D", true).unwrap();

        assert_eq!(acc.depth(), 1);
        assert_eq!(acc.pending_len(), 0);
        assert_eq!(acc.current_scope().unwrap().title, "D");
        assert_eq!(
            acc.root(),
            &[scope(
                ScopeLevel::Section,
                "A",
                vec![scope(
                    ScopeLevel::Subsection,
                    "B",
                    vec![scope(ScopeLevel::Subsubsection, "C", vec![text("x")])]
                )]
            )]
        );
    }

    #[test]
    fn test_intro_sub_next_scenario() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "Intro", true).unwrap();
        acc.emit(text("p1"));
        acc.begin_scope(ScopeLevel::Subsection, "Sub", true).unwrap();
        acc.emit(text("p2"));
        acc.begin_scope(ScopeLevel::Section, "Next", true).unwrap();
        acc.emit(text("p3"));
        acc.flush(0);

        assert_eq!(
            acc.into_root().unwrap(),
            vec![
                scope(
                    ScopeLevel::Section,
                    "Intro",
                    vec![
                        text("p1"),
                        scope(ScopeLevel::Subsection, "Sub", vec![text("p2")])
                    ]
                ),
                scope(ScopeLevel::Section, "Next", vec![text("p3")]),
            ]
        );
    }

    #[test]
    fn test_sibling_subsections_keep_order() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "S", true).unwrap();
        acc.begin_scope(ScopeLevel::Subsection, "One", true).unwrap();
        acc.emit(text("1"));
        acc.begin_scope(ScopeLevel::Subsection, "Two", true).unwrap();
        acc.emit(text("2"));
        acc.flush(0);

        assert_eq!(
            acc.into_root().unwrap(),
            vec![scope(
                ScopeLevel::Section,
                "S",
                vec![
                    scope(ScopeLevel::Subsection, "One", vec![text("1")]),
                    scope(ScopeLevel::Subsection, "Two", vec![text("2")]),
                ]
            )]
        );
    }

    #[test]
    fn test_empty_sections_are_kept() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "Empty", true).unwrap();
        acc.begin_scope(ScopeLevel::Section, "Full", false).unwrap();
        acc.emit(text("x"));

        assert_eq!(acc.depth(), 1);
        acc.flush(0);

        let root = acc.into_root().unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root[0], scope(ScopeLevel::Section, "Empty", vec![]));
        match &root[1] {
            Node::Scope(s) => {
                assert_eq!(s.title, "Full");
                assert!(!s.numbering);
            }
            other => panic!("expected scope, got {:?}", other),
        }
    }

    #[test]
    fn test_flush_at_current_depth_with_empty_buffer_is_noop() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "A", true).unwrap();
        acc.begin_scope(ScopeLevel::Subsection, "B", true).unwrap();

        acc.flush(2);
        acc.flush(2);

        assert_eq!(acc.depth(), 2);
        assert!(acc.root().is_empty());
        assert_eq!(acc.current_scope().unwrap().title, "B");
    }

    #[test]
    fn test_invalid_nesting_is_rejected_without_mutation() {
        let mut acc = SectionAccumulator::new();
        acc.emit(text("loose"));

        let err = acc
            .begin_scope(ScopeLevel::Subsection, "Orphan", true)
            .unwrap_err();
        assert_eq!(
            err,
            AccumulatorError::InvalidScopeNesting {
                requested: ScopeLevel::Subsection,
                open: 0,
            }
        );
        assert_eq!(acc.pending_len(), 1);
        assert_eq!(acc.depth(), 0);

        acc.begin_scope(ScopeLevel::Section, "A", true).unwrap();
        let err = acc
            .begin_scope(ScopeLevel::Subsubsection, "Skip", true)
            .unwrap_err();
        assert!(err.to_string().contains("subsubsection at depth 2"));
    }

    #[test]
    fn test_unflushed_content_is_reported() {
        let mut acc = SectionAccumulator::new();
        acc.begin_scope(ScopeLevel::Section, "A", true).unwrap();
        acc.emit(text("late"));

        assert_eq!(
            acc.into_root().unwrap_err(),
            AccumulatorError::UnattachedTrailingContent {
                pending: 1,
                open_scopes: 1,
            }
        );
    }
}
