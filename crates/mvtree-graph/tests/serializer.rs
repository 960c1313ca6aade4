use mvtree_core::coordinate::Coordinate;
use mvtree_core::scope::Scope;
use mvtree_graph::filter::{AncestorOrSelfFilter, ArtifactNodeFilter};
use mvtree_graph::traversal::{render_tree, SerializingVisitor, TreeTokens};
use mvtree_graph::{ConflictData, DependencyTree, NodeAttributes, TreeAssembly};
use mvtree_core::artifact_filter::PatternArtifactFilter;

fn verbose_tree() -> DependencyTree {
    let node = |g: &str, a: &str, v: &str, scope: Scope| {
        NodeAttributes::new(Coordinate::new(g, a, v)).with_scope(scope)
    };
    let mut root = NodeAttributes::new(Coordinate::new("com.example", "app", "1.0"));
    root.conflict_data = Some(ConflictData::winner());
    let mut asm = TreeAssembly::new(root);
    let app = asm.root();

    let a = asm.add_child(
        app,
        node("org.a", "a", "1.0", Scope::Compile).with_conflict_data(ConflictData::winner()),
    );
    asm.add_child(
        a,
        node("org.c", "c", "1.8", Scope::Compile).with_conflict_data(ConflictData::loser("1.2")),
    );
    let b = asm.add_child(
        app,
        node("org.b", "b", "2.0", Scope::Compile).with_conflict_data(ConflictData::winner()),
    );
    let mut c = node("org.c", "c", "1.2", Scope::Compile).with_conflict_data(ConflictData {
        ignored_scope: Some(Scope::Test),
        ..ConflictData::winner()
    });
    c.premanaged_version = Some("1.1".to_string());
    asm.add_child(b, c);
    asm.freeze()
}

#[test]
fn verbose_dump_matches_expected_layout() {
    let tree = verbose_tree();
    let out = render_tree(tree.root(), TreeTokens::STANDARD);
    let expected = "\
com.example:app:jar:1.0
+- org.a:a:jar:1.0:compile
|  \\- (org.c:c:jar:1.8:compile - omitted for conflict with 1.2)
\\- org.b:b:jar:2.0:compile
   \\- org.c:c:jar:1.2:compile (version managed from 1.1; scope not updated to test)
";
    assert_eq!(out, expected);
}

#[test]
fn whitespace_tokens_indent_by_three() {
    let tree = verbose_tree();
    let out = render_tree(tree.root(), TreeTokens::WHITESPACE);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], "   org.a:a:jar:1.0:compile");
    assert!(lines[2].starts_with("      (org.c"));
}

#[test]
fn why_style_output_shows_paths_to_matches() {
    let tree = verbose_tree();
    let matcher = ArtifactNodeFilter::new(PatternArtifactFilter::new(["org.b"]).unwrap());
    let targets: Vec<_> = tree
        .nodes()
        .filter(|n| mvtree_graph::filter::DependencyNodeFilter::accept(&matcher, *n))
        .collect();
    let filter = AncestorOrSelfFilter::new(targets);
    let mut visitor = SerializingVisitor::new(Vec::new(), TreeTokens::STANDARD).with_filter(filter);
    tree.accept(&mut visitor);
    let out = String::from_utf8(visitor.finish().unwrap()).unwrap();
    assert_eq!(out, "com.example:app:jar:1.0\n\\- org.b:b:jar:2.0:compile\n");
}
