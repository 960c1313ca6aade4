//! Visitor contract over [`DependencyNode`]s and the stock visitors.

use std::io::{self, Write};

use crate::filter::DependencyNodeFilter;
use crate::tree::DependencyNode;

/// Callbacks for a depth-first walk started by [`DependencyNode::accept`].
pub trait DependencyNodeVisitor<'t> {
    /// Called before the children; `false` skips them.
    fn visit(&mut self, node: DependencyNode<'t>) -> bool;

    /// Called after the children; `false` stops the walk of the siblings.
    fn end_visit(&mut self, node: DependencyNode<'t>) -> bool;
}

/// Gathers every visited node in pre-order.
#[derive(Debug, Default)]
pub struct CollectingVisitor<'t> {
    nodes: Vec<DependencyNode<'t>>,
}

impl<'t> CollectingVisitor<'t> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn nodes(&self) -> &[DependencyNode<'t>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<DependencyNode<'t>> {
        self.nodes
    }
}

impl<'t> DependencyNodeVisitor<'t> for CollectingVisitor<'t> {
    fn visit(&mut self, node: DependencyNode<'t>) -> bool {
        self.nodes.push(node);
        true
    }

    fn end_visit(&mut self, _node: DependencyNode<'t>) -> bool {
        true
    }
}

/// Forwards callbacks to `delegate` only for nodes `filter` accepts.
/// Rejected nodes are walked through transparently.
pub struct FilteringVisitor<V, F> {
    delegate: V,
    filter: F,
}

impl<V, F> FilteringVisitor<V, F> {
    pub fn new(delegate: V, filter: F) -> Self {
        Self { delegate, filter }
    }

    pub fn delegate(&self) -> &V {
        &self.delegate
    }

    pub fn into_inner(self) -> V {
        self.delegate
    }
}

impl<'t, V, F> DependencyNodeVisitor<'t> for FilteringVisitor<V, F>
where
    V: DependencyNodeVisitor<'t>,
    F: DependencyNodeFilter,
{
    fn visit(&mut self, node: DependencyNode<'t>) -> bool {
        if self.filter.accept(node) {
            self.delegate.visit(node)
        } else {
            true
        }
    }

    fn end_visit(&mut self, node: DependencyNode<'t>) -> bool {
        if self.filter.accept(node) {
            self.delegate.end_visit(node)
        } else {
            true
        }
    }
}

/// Glyphs used to draw tree structure in text dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeTokens {
    pub node_indent: &'static str,
    pub last_node_indent: &'static str,
    pub fill_indent: &'static str,
    pub last_fill_indent: &'static str,
}

impl TreeTokens {
    pub const STANDARD: TreeTokens = TreeTokens {
        node_indent: "+- ",
        last_node_indent: "\\- ",
        fill_indent: "|  ",
        last_fill_indent: "   ",
    };

    pub const WHITESPACE: TreeTokens = TreeTokens {
        node_indent: "   ",
        last_node_indent: "   ",
        fill_indent: "   ",
        last_fill_indent: "   ",
    };

    pub const EXTENDED: TreeTokens = TreeTokens {
        node_indent: "├─ ",
        last_node_indent: "└─ ",
        fill_indent: "│  ",
        last_fill_indent: "   ",
    };

    /// Look up a glyph set by name: `standard`, `whitespace` or `extended`.
    pub fn by_name(name: &str) -> Option<TreeTokens> {
        match name {
            "standard" => Some(Self::STANDARD),
            "whitespace" => Some(Self::WHITESPACE),
            "extended" => Some(Self::EXTENDED),
            _ => None,
        }
    }
}

impl Default for TreeTokens {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Writes one line per node, indented with [`TreeTokens`].
///
/// With a filter set, rejected nodes are not written and are ignored when
/// deciding which sibling is drawn as the last one. Write failures stop the
/// walk; the first one is returned by [`SerializingVisitor::finish`].
pub struct SerializingVisitor<'f, W> {
    writer: W,
    tokens: TreeTokens,
    filter: Option<Box<dyn DependencyNodeFilter + 'f>>,
    error: Option<io::Error>,
}

impl<'f, W: Write> SerializingVisitor<'f, W> {
    pub fn new(writer: W, tokens: TreeTokens) -> Self {
        Self {
            writer,
            tokens,
            filter: None,
            error: None,
        }
    }

    pub fn with_filter(mut self, filter: impl DependencyNodeFilter + 'f) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn accepts(&self, node: DependencyNode<'_>) -> bool {
        self.filter.as_ref().map_or(true, |f| f.accept(node))
    }

    fn is_last(&self, node: DependencyNode<'_>) -> bool {
        let Some(parent) = node.parent() else {
            return true;
        };
        let last = parent.children().rev().find(|c| self.accepts(*c));
        last.map_or(true, |last| last == node)
    }

    fn indent(&self, node: DependencyNode<'_>) -> String {
        let mut parts = Vec::new();
        let mut current = node;
        while let Some(parent) = current.parent() {
            let last = self.is_last(current);
            let token = match (current == node, last) {
                (true, true) => self.tokens.last_node_indent,
                (true, false) => self.tokens.node_indent,
                (false, true) => self.tokens.last_fill_indent,
                (false, false) => self.tokens.fill_indent,
            };
            parts.push(token);
            current = parent;
        }
        parts.reverse();
        parts.concat()
    }
}

impl<'t, W: Write> DependencyNodeVisitor<'t> for SerializingVisitor<'_, W> {
    fn visit(&mut self, node: DependencyNode<'t>) -> bool {
        if self.error.is_some() {
            return false;
        }
        if !self.accepts(node) {
            return true;
        }
        let line = format!("{}{}", self.indent(node), node.to_node_string());
        if let Err(e) = writeln!(self.writer, "{line}") {
            self.error = Some(e);
            return false;
        }
        true
    }

    fn end_visit(&mut self, _node: DependencyNode<'t>) -> bool {
        self.error.is_none()
    }
}

/// Render a whole tree to a string.
pub fn render_tree(root: DependencyNode<'_>, tokens: TreeTokens) -> String {
    let mut visitor = SerializingVisitor::new(Vec::new(), tokens);
    root.accept(&mut visitor);
    match visitor.finish() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use mvtree_core::coordinate::Coordinate;
    use mvtree_core::scope::Scope;

    use super::*;
    use crate::tree::{DependencyTree, NodeAttributes, TreeAssembly};

    fn sample() -> DependencyTree {
        let node = |a: &str| {
            NodeAttributes::new(Coordinate::new("g", a, "1")).with_scope(Scope::Compile)
        };
        let mut asm = TreeAssembly::new(NodeAttributes::new(Coordinate::new("g", "root", "1")));
        let root = asm.root();
        let a = asm.add_child(root, node("a"));
        asm.add_child(a, node("a1"));
        asm.add_child(a, node("a2"));
        let b = asm.add_child(root, node("b"));
        asm.add_child(b, node("b1"));
        asm.freeze()
    }

    #[test]
    fn standard_tokens() {
        let tree = sample();
        let out = render_tree(tree.root(), TreeTokens::STANDARD);
        let expected = "\
g:root:jar:1
+- g:a:jar:1:compile
|  +- g:a1:jar:1:compile
|  \\- g:a2:jar:1:compile
\\- g:b:jar:1:compile
   \\- g:b1:jar:1:compile
";
        assert_eq!(out, expected);
    }

    #[test]
    fn extended_tokens() {
        let tree = sample();
        let out = render_tree(tree.root(), TreeTokens::EXTENDED);
        assert!(out.contains("├─ g:a:jar:1:compile"));
        assert!(out.contains("│  └─ g:a2:jar:1:compile"));
        assert!(out.contains("   └─ g:b1:jar:1:compile"));
    }

    #[test]
    fn collecting_is_pre_order() {
        let tree = sample();
        let mut visitor = CollectingVisitor::new();
        tree.accept(&mut visitor);
        let names: Vec<_> = visitor
            .nodes()
            .iter()
            .map(|n| n.coordinate().artifact_id.as_str())
            .collect();
        assert_eq!(names, ["root", "a", "a1", "a2", "b", "b1"]);
    }

    struct StopAfter<'t> {
        seen: Vec<DependencyNode<'t>>,
        stop_at: &'static str,
    }

    impl<'t> DependencyNodeVisitor<'t> for StopAfter<'t> {
        fn visit(&mut self, node: DependencyNode<'t>) -> bool {
            self.seen.push(node);
            node.coordinate().artifact_id != "b"
        }

        fn end_visit(&mut self, node: DependencyNode<'t>) -> bool {
            node.coordinate().artifact_id != self.stop_at
        }
    }

    #[test]
    fn end_visit_false_stops_siblings() {
        let tree = sample();
        let mut visitor = StopAfter {
            seen: Vec::new(),
            stop_at: "a1",
        };
        tree.accept(&mut visitor);
        let names: Vec<_> = visitor
            .seen
            .iter()
            .map(|n| n.coordinate().artifact_id.as_str())
            .collect();
        // a2 skipped after a1 stops, b visited but its children skipped.
        assert_eq!(names, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn filtering_visitor_hides_rejected() {
        let tree = sample();
        let filter = |n: DependencyNode<'_>| !n.coordinate().artifact_id.starts_with('a');
        let mut visitor = FilteringVisitor::new(CollectingVisitor::new(), filter);
        tree.accept(&mut visitor);
        let names: Vec<_> = visitor
            .into_inner()
            .into_nodes()
            .iter()
            .map(|n| n.coordinate().artifact_id.clone())
            .collect();
        assert_eq!(names, ["root", "b", "b1"]);
    }

    #[test]
    fn serializer_filter_adjusts_last_sibling() {
        let tree = sample();
        let filter = |n: DependencyNode<'_>| n.coordinate().artifact_id != "b" && n.coordinate().artifact_id != "b1";
        let mut visitor =
            SerializingVisitor::new(Vec::new(), TreeTokens::STANDARD).with_filter(filter);
        tree.accept(&mut visitor);
        let out = String::from_utf8(visitor.finish().unwrap()).unwrap();
        assert!(out.contains("\\- g:a:jar:1:compile"));
        assert!(out.contains("   \\- g:a2:jar:1:compile"));
        assert!(!out.contains("g:b"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface_in_finish() {
        let tree = sample();
        let mut visitor = SerializingVisitor::new(FailingWriter, TreeTokens::STANDARD);
        assert!(!tree.accept(&mut visitor));
        let err = visitor.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn tokens_by_name() {
        assert_eq!(TreeTokens::by_name("extended"), Some(TreeTokens::EXTENDED));
        assert_eq!(TreeTokens::by_name("whitespace"), Some(TreeTokens::WHITESPACE));
        assert!(TreeTokens::by_name("fancy").is_none());
    }
}
