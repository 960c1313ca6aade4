use mvtree_core::coordinate::{Coordinate, Exclusion};
use mvtree_core::dependency::Dependency;
use mvtree_core::request::ResolutionRequest;
use mvtree_core::scope::Scope;
use mvtree_graph::traversal::{render_tree, TreeTokens};
use mvtree_resolver::report::LossReason;
use mvtree_resolver::{resolve, CollectionCause, InMemoryProvider, ResolveError, Resolver};

fn coord(artifact: &str, version: &str) -> Coordinate {
    Coordinate::new("org.example", artifact, version)
}

fn dep(artifact: &str, version: &str) -> Dependency {
    Dependency::new("org.example", artifact, version)
}

fn request() -> ResolutionRequest {
    ResolutionRequest::new(Coordinate::new("com.example", "app", "1.0"))
}

async fn dump(request: &ResolutionRequest, provider: &InMemoryProvider) -> String {
    let resolution = resolve(request, provider).await.unwrap();
    render_tree(resolution.tree.root(), TreeTokens::STANDARD)
}

#[tokio::test]
async fn sibling_conflict_prefers_higher_version() {
    let mut provider = InMemoryProvider::new();
    provider.add_leaf(coord("lib", "1.0")).add_leaf(coord("lib", "2.0"));
    let req = request()
        .with_dependency(dep("lib", "1.0"))
        .with_dependency(dep("lib", "2.0"));

    let out = dump(&req, &provider).await;
    assert_eq!(
        out,
        "com.example:app:jar:1.0\n\\- org.example:lib:jar:2.0:compile\n"
    );
}

#[tokio::test]
async fn nearest_wins_over_higher_deeper_version() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("x", "1"), vec![dep("y", "1")])
        .add(coord("y", "1"), vec![dep("lib", "9.0")])
        .add_leaf(coord("lib", "9.0"))
        .add_leaf(coord("lib", "1.0"));
    let req = request()
        .with_dependency(dep("x", "1"))
        .with_dependency(dep("lib", "1.0"));

    let expected = "\
com.example:app:jar:1.0
+- org.example:x:jar:1:compile
|  \\- org.example:y:jar:1:compile
\\- org.example:lib:jar:1.0:compile
";
    assert_eq!(dump(&req, &provider).await, expected);

    let verbose = dump(&req.clone().with_verbose(true), &provider).await;
    let expected = "\
com.example:app:jar:1.0
+- org.example:x:jar:1:compile
|  \\- org.example:y:jar:1:compile
|     \\- (org.example:lib:jar:9.0:compile - omitted for conflict with 1.0)
\\- org.example:lib:jar:1.0:compile
";
    assert_eq!(verbose, expected);
}

fn backtracking_provider() -> InMemoryProvider {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("x", "1"), vec![dep("lib", "[1.0,1.5)")])
        .add(coord("y", "1"), vec![dep("z", "1")])
        .add(coord("z", "1"), vec![dep("lib", "1.2")])
        .add_leaf(coord("lib", "1.2"))
        .add_leaf(coord("lib", "1.8"));
    provider
}

#[tokio::test]
async fn range_forces_backtracking_away_from_nearest() {
    let provider = backtracking_provider();
    let req = request()
        .with_dependency(dep("lib", "1.8"))
        .with_dependency(dep("x", "1"))
        .with_dependency(dep("y", "1"))
        .with_verbose(true);

    let resolution = resolve(&req, &provider).await.unwrap();
    let out = render_tree(resolution.tree.root(), TreeTokens::STANDARD);
    let expected = "\
com.example:app:jar:1.0
+- (org.example:lib:jar:1.8:compile - omitted for conflict with 1.2)
+- org.example:x:jar:1:compile
|  \\- org.example:lib:jar:1.2:compile
\\- org.example:y:jar:1:compile
   \\- org.example:z:jar:1:compile
      \\- (org.example:lib:jar:1.2:compile - omitted for duplicate)
";
    assert_eq!(out, expected);

    let winner = resolution
        .tree
        .nodes()
        .find(|n| n.coordinate().artifact_id == "lib" && n.is_winner())
        .unwrap();
    assert_eq!(winner.version_constraint(), Some("[1.0,1.5)"));

    assert_eq!(resolution.conflicts.len(), 1);
    let conflict = resolution.conflicts.iter().next().unwrap();
    assert_eq!(conflict.requested, "1.8");
    assert_eq!(conflict.resolved, "1.2");
    assert_eq!(conflict.reason.to_string(), "excluded by version range [1.0,1.5)");
}

#[tokio::test]
async fn sibling_excluded_by_range_reports_the_range() {
    let mut provider = InMemoryProvider::new();
    provider.add_leaf(coord("lib", "1.0")).add_leaf(coord("lib", "2.0"));
    let req = request()
        .with_dependency(dep("lib", "2.0"))
        .with_dependency(dep("lib", "[1.0]"))
        .with_verbose(true);

    let resolution = resolve(&req, &provider).await.unwrap();
    let out = render_tree(resolution.tree.root(), TreeTokens::STANDARD);
    let expected = "\
com.example:app:jar:1.0
+- (org.example:lib:jar:2.0:compile - omitted for conflict with 1.0)
\\- org.example:lib:jar:1.0:compile
";
    assert_eq!(out, expected);

    let conflicts: Vec<_> = resolution.conflicts.iter().collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].requested, "2.0");
    assert!(matches!(&conflicts[0].reason, LossReason::Range(r) if r.to_string() == "[1.0]"));
    assert_eq!(resolution.conflicts.range_exclusions().count(), 1);
}

#[tokio::test]
async fn lower_sibling_and_deeper_losses_keep_their_reasons() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("lib", "3.0")])
        .add_leaf(coord("lib", "1.0"))
        .add_leaf(coord("lib", "2.0"))
        .add_leaf(coord("lib", "3.0"));
    let req = request()
        .with_dependency(dep("lib", "1.0"))
        .with_dependency(dep("lib", "2.0"))
        .with_dependency(dep("a", "1"));

    let resolution = resolve(&req, &provider).await.unwrap();
    let reasons: Vec<_> = resolution
        .conflicts
        .iter()
        .map(|c| (c.requested.as_str(), c.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("1.0", LossReason::Sibling),
            (
                "3.0",
                LossReason::Nearest {
                    winner_depth: 1,
                    depth: 2
                }
            ),
        ]
    );
    assert_eq!(resolution.conflicts.range_exclusions().count(), 0);
}

#[tokio::test]
async fn root_artifact_deeper_in_the_graph_loses_to_the_root() {
    let mut provider = InMemoryProvider::new();
    provider.add(
        coord("a", "1"),
        vec![Dependency::new("com.example", "app", "0.9")],
    );
    let req = request().with_dependency(dep("a", "1"));

    assert_eq!(
        dump(&req, &provider).await,
        "com.example:app:jar:1.0\n\\- org.example:a:jar:1:compile\n"
    );

    let verbose = req.clone().with_verbose(true);
    let resolution = resolve(&verbose, &provider).await.unwrap();
    let expected = "\
com.example:app:jar:1.0
\\- org.example:a:jar:1:compile
   \\- (com.example:app:jar:0.9:compile - omitted for conflict with 1.0)
";
    assert_eq!(
        render_tree(resolution.tree.root(), TreeTokens::STANDARD),
        expected
    );

    let conflicts: Vec<_> = resolution.conflicts.iter().collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_id.artifact_id, "app");
    assert_eq!(conflicts[0].requested, "0.9");
    assert_eq!(conflicts[0].resolved, "1.0");
    assert_eq!(
        conflicts[0].reason,
        LossReason::Nearest {
            winner_depth: 0,
            depth: 2
        }
    );
}

#[tokio::test]
async fn disjoint_ranges_are_unsolvable() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("x", "1"), vec![dep("lib", "[2.0,3.0)")])
        .add_leaf(coord("lib", "1.0"))
        .add_leaf(coord("lib", "2.0"));
    let req = request()
        .with_dependency(dep("lib", "[1.0]"))
        .with_dependency(dep("x", "1"));

    let err = resolve(&req, &provider).await.unwrap_err();
    match err {
        ResolveError::UnsolvableConflict { conflict_id, paths } => {
            assert_eq!(conflict_id.artifact_id, "lib");
            assert!(paths.len() >= 2);
            assert!(paths.iter().any(|p| p.contains("org.example:x:jar:1")));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn range_expands_to_sibling_versions() {
    let mut provider = InMemoryProvider::new();
    provider
        .add_leaf(coord("lib", "1.0"))
        .add_leaf(coord("lib", "1.5"))
        .add_leaf(coord("lib", "2.0"));
    let req = request()
        .with_dependency(dep("lib", "[1.0,2.0)"))
        .with_verbose(true);

    let expected = "\
com.example:app:jar:1.0
+- (org.example:lib:jar:1.0:compile - omitted for conflict with 1.5)
\\- org.example:lib:jar:1.5:compile
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn scopes_follow_the_lattice() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("t", "1"), vec![dep("tc", "1")])
        .add(coord("p", "1"), vec![dep("pc", "1")])
        .add(
            coord("r", "1"),
            vec![dep("rc", "1"), dep("rt", "1").with_scope(Scope::Test)],
        )
        .add_leaf(coord("tc", "1"))
        .add_leaf(coord("pc", "1"))
        .add_leaf(coord("rc", "1"))
        .add_leaf(coord("rt", "1"));
    let req = request()
        .with_dependency(dep("t", "1").with_scope(Scope::Test))
        .with_dependency(dep("p", "1").with_scope(Scope::Provided))
        .with_dependency(dep("r", "1").with_scope(Scope::Runtime));

    let expected = "\
com.example:app:jar:1.0
+- org.example:t:jar:1:test
|  \\- org.example:tc:jar:1:test
+- org.example:p:jar:1:provided
|  \\- org.example:pc:jar:1:provided
\\- org.example:r:jar:1:runtime
   \\- org.example:rc:jar:1:runtime
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn ignored_scope_is_reported_in_verbose_mode() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("lib", "1.0")])
        .add(coord("t", "1"), vec![dep("lib", "1.0")])
        .add_leaf(coord("lib", "1.0"));
    let req = request()
        .with_dependency(dep("a", "1"))
        .with_dependency(dep("t", "1").with_scope(Scope::Test))
        .with_verbose(true);

    let expected = "\
com.example:app:jar:1.0
+- org.example:a:jar:1:compile
|  \\- org.example:lib:jar:1.0:compile (scope not updated to test)
\\- org.example:t:jar:1:test
   \\- (org.example:lib:jar:1.0:test - omitted for duplicate)
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn optional_direct_dependency_marks_its_subtree() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("b", "1"), dep("c", "1")])
        .add_leaf(coord("b", "1"))
        .add_leaf(coord("c", "1"));
    let req = request()
        .with_dependency(dep("a", "1").with_optional(true))
        .with_dependency(dep("c", "1"));

    let expected = "\
com.example:app:jar:1.0
+- org.example:a:jar:1:compile (optional)
|  \\- org.example:b:jar:1:compile (optional)
\\- org.example:c:jar:1:compile
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn transitive_test_and_optional_edges_are_dropped() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(
            coord("a", "1"),
            vec![
                dep("junit", "4").with_scope(Scope::Test),
                dep("servlet", "3").with_scope(Scope::Provided),
                dep("opt", "1").with_optional(true),
                dep("kept", "1"),
            ],
        )
        .add_leaf(coord("kept", "1"))
        .add_leaf(coord("junit", "4"));
    let req = request()
        .with_dependency(dep("a", "1"))
        .with_dependency(dep("junit", "4").with_scope(Scope::Test));

    let expected = "\
com.example:app:jar:1.0
+- org.example:a:jar:1:compile
|  \\- org.example:kept:jar:1:compile
\\- org.example:junit:jar:4:test
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn exclusions_cut_whole_subtrees() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("b", "1")])
        .add(
            coord("b", "1"),
            vec![Dependency::new("commons-logging", "commons-logging", "1.2")],
        )
        .add(
            coord("d", "1"),
            vec![Dependency::new("commons-logging", "commons-logging", "1.1")],
        )
        .add_leaf(Coordinate::new("commons-logging", "commons-logging", "1.2"))
        .add_leaf(Coordinate::new("commons-logging", "commons-logging", "1.1"));
    let req = request()
        .with_dependency(dep("a", "1").with_exclusion(Exclusion::new("commons-logging", "*")))
        .with_dependency(dep("d", "1"));

    let expected = "\
com.example:app:jar:1.0
+- org.example:a:jar:1:compile
|  \\- org.example:b:jar:1:compile
\\- org.example:d:jar:1:compile
   \\- commons-logging:commons-logging:jar:1.1:compile
";
    assert_eq!(dump(&req, &provider).await, expected);
}

#[tokio::test]
async fn managed_versions_and_scopes_are_recorded() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("lib", "1.0")])
        .add_leaf(coord("lib", "2.0"));
    let req = request()
        .with_dependency(dep("a", "1"))
        .with_managed(dep("lib", "2.0").with_scope(Scope::Runtime))
        .with_verbose(true);

    let resolution = resolve(&req, &provider).await.unwrap();
    let lib = resolution
        .tree
        .nodes()
        .find(|n| n.coordinate().artifact_id == "lib")
        .unwrap();
    assert_eq!(lib.premanaged_version(), Some("1.0"));
    assert_eq!(lib.premanaged_scope(), Some(&Scope::Compile));
    assert_eq!(
        lib.to_node_string(),
        "org.example:lib:jar:2.0:runtime (version managed from 1.0; scope managed from compile)"
    );
}

#[tokio::test]
async fn direct_dependency_without_version_uses_management() {
    let mut provider = InMemoryProvider::new();
    provider.add_leaf(coord("lib", "3.1"));
    let req = request()
        .with_dependency(dep("lib", ""))
        .with_managed(dep("lib", "3.1"));

    let resolution = resolve(&req, &provider).await.unwrap();
    let lib = resolution.tree.root().children().next().unwrap();
    assert_eq!(lib.coordinate().version, "3.1");
    assert_eq!(lib.premanaged_version(), None);
}

#[tokio::test]
async fn cycles_are_cut_on_the_current_path() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("a", "1"), vec![dep("b", "1")])
        .add(coord("b", "1"), vec![dep("a", "1")]);
    let req = request().with_dependency(dep("a", "1"));

    let expected = "\
com.example:app:jar:1.0
\\- org.example:a:jar:1:compile
   \\- org.example:b:jar:1:compile
";
    assert_eq!(dump(&req, &provider).await, expected);

    let verbose = dump(&req.clone().with_verbose(true), &provider).await;
    assert!(verbose.ends_with("      \\- (org.example:a:jar:1:compile - omitted for duplicate)\n"));
}

#[tokio::test]
async fn repeated_resolution_is_identical() {
    let provider = backtracking_provider();
    let req = request()
        .with_dependency(dep("lib", "1.8"))
        .with_dependency(dep("x", "1"))
        .with_dependency(dep("y", "1"))
        .with_verbose(true);
    let first = dump(&req, &provider).await;
    let second = dump(&req, &provider).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn inclusion_filter_drops_subtrees() {
    let mut provider = InMemoryProvider::new();
    provider
        .add(coord("x", "1"), vec![dep("y", "1")])
        .add_leaf(coord("y", "1"))
        .add_leaf(coord("z", "1"));
    let req = request()
        .with_dependency(dep("x", "1"))
        .with_dependency(dep("z", "1"));

    let resolution = Resolver::new(&provider)
        .with_filter(|c: &Coordinate| c.artifact_id != "x")
        .resolve(&req)
        .await
        .unwrap();
    let out = render_tree(resolution.tree.root(), TreeTokens::STANDARD);
    assert_eq!(out, "com.example:app:jar:1.0\n\\- org.example:z:jar:1:compile\n");

    let mut patterned = req.clone();
    patterned.include = vec!["org.example:x".to_string(), "org.example:y".to_string()];
    let out = dump(&patterned, &provider).await;
    assert!(out.contains("org.example:y:jar:1:compile"));
    assert!(!out.contains("org.example:z"));
}

#[tokio::test]
async fn invalid_include_pattern_is_a_filter_error() {
    let provider = InMemoryProvider::new();
    let mut req = request();
    req.include = vec!["a:b:c:d:e".to_string()];
    let err = resolve(&req, &provider).await.unwrap_err();
    assert!(matches!(err, ResolveError::Filter(_)));
}

#[tokio::test]
async fn missing_descriptor_is_a_collection_error() {
    let provider = InMemoryProvider::new();
    let req = request().with_dependency(dep("ghost", "1.0"));
    let err = resolve(&req, &provider).await.unwrap_err();
    match err {
        ResolveError::Collection { coordinate, cause } => {
            assert_eq!(coordinate, coord("ghost", "1.0"));
            assert!(matches!(cause, CollectionCause::Provider(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_and_unmatched_versions_fail_collection() {
    let mut provider = InMemoryProvider::new();
    provider.add_leaf(coord("lib", "1.0"));

    let req = request().with_dependency(dep("lib", ""));
    let err = resolve(&req, &provider).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Collection {
            cause: CollectionCause::MissingVersion { .. },
            ..
        }
    ));

    let req = request().with_dependency(dep("lib", "[5.0,)"));
    let err = resolve(&req, &provider).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Collection {
            cause: CollectionCause::NoMatchingVersion { .. },
            ..
        }
    ));

    let req = request().with_dependency(dep("lib", "[1.0"));
    let err = resolve(&req, &provider).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Collection {
            cause: CollectionCause::Constraint(_),
            ..
        }
    ));
}
