use mvtree_core::coordinate::{Coordinate, Exclusion};
use mvtree_core::dependency::Dependency;
use mvtree_core::scope::Scope;

#[test]
fn coordinate_parse_three_parts() {
    let coord = Coordinate::parse("com.example:my-lib:1.0.0").unwrap();
    assert_eq!(coord.group_id, "com.example");
    assert_eq!(coord.artifact_id, "my-lib");
    assert_eq!(coord.version, "1.0.0");
    assert_eq!(coord.type_, "jar");
}

#[test]
fn coordinate_parse_with_type_and_classifier() {
    let coord = Coordinate::parse("g:a:pom:sources:2.0").unwrap();
    assert_eq!(coord.type_, "pom");
    assert_eq!(coord.classifier, "sources");
    assert_eq!(coord.to_string(), "g:a:pom:sources:2.0");
}

#[test]
fn coordinate_parse_rejects_bad_shapes() {
    assert!(Coordinate::parse("group:artifact").is_none());
    assert!(Coordinate::parse("").is_none());
    assert!(Coordinate::parse("g::1.0").is_none());
    assert!(Coordinate::parse("a:b:c:d:e:f").is_none());
}

#[test]
fn dependency_defaults() {
    let dep = Dependency::new("g", "a", "1.0");
    assert_eq!(dep.declared_scope(), Scope::Compile);
    assert!(!dep.optional);
    assert!(dep.exclusions.is_empty());
    assert_eq!(dep.type_, "jar");
}

#[test]
fn dependency_parse_shorthand() {
    let dep = Dependency::parse("org.example:lib:test-jar:tests:1.2").unwrap();
    assert_eq!(dep.type_, "test-jar");
    assert_eq!(dep.classifier, "tests");
    assert_eq!(dep.version, "1.2");
}

#[test]
fn dependency_conflict_id_matches_coordinate() {
    let dep = Dependency::new("g", "a", "[1.0,2.0)").with_classifier("native");
    let coord = dep.coordinate("1.5");
    assert_eq!(coord.version, "1.5");
    assert_eq!(dep.conflict_id(), coord.conflict_id());
}

#[test]
fn dependency_constraint_hard_and_soft() {
    let hard = Dependency::new("g", "a", "[1.0,2.0)");
    assert!(hard.constraint().unwrap().unwrap().is_hard());
    let soft = Dependency::new("g", "a", "1.0");
    assert!(!soft.constraint().unwrap().unwrap().is_hard());
    let absent = Dependency::new("g", "a", "");
    assert!(absent.constraint().unwrap().is_none());
    let broken = Dependency::new("g", "a", "[1.0");
    assert!(broken.constraint().is_err());
}

#[test]
fn dependency_display_shows_scope() {
    let dep = Dependency::new("g", "a", "1.0").with_scope(Scope::Test);
    assert_eq!(dep.to_string(), "g:a:jar:1.0 (test)");
}

#[test]
fn dependency_deserializes_from_toml() {
    let toml = r#"
group = "org.example"
artifact = "lib"
version = "1.0"
scope = "runtime"
optional = true
exclusions = [{ group = "commons-logging" }]
"#;
    let dep: Dependency = toml::from_str(toml).unwrap();
    assert_eq!(dep.scope, Some(Scope::Runtime));
    assert!(dep.optional);
    assert_eq!(dep.exclusions, vec![Exclusion::new("commons-logging", "*")]);
}
