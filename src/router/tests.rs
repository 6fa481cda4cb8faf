use super::{RouteError, RouteResolver, RouteSpec, RouteTable};
use std::sync::Arc;

fn resolver(yaml: &str) -> RouteResolver {
    RouteResolver::new(Arc::new(RouteTable::from_yaml_str(yaml).unwrap()))
}

const USER_TABLE: &str = r#"
home:
  regexp: "^/user/{id}$"
  vars: { id: "@userIdPattern" }
  controller: User::show
vars:
  userIdPattern: "[0-9]+"
"#;

#[test]
fn test_global_var_substitution() {
    let resolver = resolver(USER_TABLE);
    let matched = resolver.resolve("/user/42").unwrap();
    assert_eq!(matched.route_name(), "home");
    assert_eq!(matched.params.as_slice(), ["42".to_string()]);

    let err = resolver.resolve("/user/abc").unwrap_err();
    assert!(matches!(err, RouteError::NotFound { .. }));
}

#[test]
fn test_placeholders_are_captured_without_explicit_groups() {
    let resolver = resolver(
        r#"
feed:
  regexp: "^/animals/{id}/feeds/{id}/{kind}$"
  vars: { id: "@id", kind: "hay|grain" }
  controller: Feed::show
vars:
  id: "[0-9]+"
"#,
    );
    let matched = resolver.resolve("/animals/3/feeds/14/grain").unwrap();
    assert_eq!(
        matched.params.as_slice(),
        ["3".to_string(), "14".to_string(), "grain".to_string()]
    );
    assert!(resolver.resolve("/animals/3/feeds/14/hay/extra").is_err());
}

#[test]
fn test_explicit_groups_take_precedence_over_placeholders() {
    let resolver = resolver(
        r#"
post:
  regexp: "^/{section}/({slug})$"
  vars: { section: "blog", slug: "[a-z-]+" }
  controller: Post::show
"#,
    );
    let matched = resolver.resolve("/blog/hello-world").unwrap();
    assert_eq!(matched.params.as_slice(), ["hello-world".to_string()]);
}

#[test]
fn test_first_declared_route_wins() {
    let resolver = resolver(
        r#"
specific:
  regexp: "^/pets/(\\d+)$"
  controller: Pets::one
generic:
  regexp: "^/pets/(.+)$"
  controller: Pets::any
"#,
    );
    assert_eq!(resolver.resolve("/pets/7").unwrap().route_name(), "specific");
    assert_eq!(resolver.resolve("/pets/cat").unwrap().route_name(), "generic");
}

#[test]
fn test_declaration_order_is_kept_even_when_reversed() {
    let resolver = resolver(
        r#"
generic:
  regexp: "^/pets/(.+)$"
  controller: Pets::any
specific:
  regexp: "^/pets/(\\d+)$"
  controller: Pets::one
"#,
    );
    assert_eq!(resolver.resolve("/pets/7").unwrap().route_name(), "generic");
}

#[test]
fn test_literal_var_is_substituted_verbatim() {
    let resolver = resolver(
        r#"
article:
  regexp: "^/{section}/([a-z-]+)$"
  vars: { section: "blog" }
  controller: Blog::article
"#,
    );
    let matched = resolver.resolve("/blog/hello-world").unwrap();
    assert_eq!(matched.param(0), Some("hello-world"));
    assert!(resolver.resolve("/news/hello-world").is_err());
}

#[test]
fn test_unknown_global_var_fails() {
    let resolver = resolver(
        r#"
home:
  regexp: "^/user/{id}$"
  vars: { id: "@missing" }
  controller: User::show
"#,
    );
    let err = resolver.resolve("/user/1").unwrap_err();
    assert!(matches!(err, RouteError::GlobalVarNotFound { ref name, .. } if name == "missing"));
}

#[test]
fn test_route_without_regexp_fails_when_reached() {
    let resolver = resolver(
        r#"
first:
  regexp: "^/first$"
  controller: A::first
broken:
  controller: A::broken
"#,
    );
    assert_eq!(resolver.resolve("/first").unwrap().route_name(), "first");
    let err = resolver.resolve("/second").unwrap_err();
    assert!(matches!(err, RouteError::RegexpNotFound { ref route } if route == "broken"));
}

#[test]
fn test_falsy_regexp_counts_as_missing() {
    for regexp in ["0", "\"0\"", "false", "\"\""] {
        let resolver = resolver(&format!(
            "zero:\n  regexp: {regexp}\n  controller: A::zero\n"
        ));
        let err = resolver.resolve("/0").unwrap_err();
        assert!(
            matches!(err, RouteError::RegexpNotFound { ref route } if route == "zero"),
            "regexp {regexp} gave {err:?}"
        );
    }
}

#[test]
fn test_index_route_for_root_path() {
    let resolver = resolver(
        r#"
index:
  controller: Home::index
catch_all:
  regexp: "^/.*$"
  controller: Home::other
"#,
    );
    let matched = resolver.resolve("/").unwrap();
    assert_eq!(matched.route_name(), "index");
    assert!(matched.params.is_empty());
    assert_eq!(resolver.resolve("/x").unwrap().route_name(), "catch_all");
}

#[test]
fn test_root_without_index_uses_ordered_matching() {
    let resolver = resolver(
        r#"
root:
  regexp: "^/$"
  controller: Home::root
"#,
    );
    assert_eq!(resolver.resolve("/").unwrap().route_name(), "root");
}

#[test]
fn test_pattern_is_anchored() {
    let resolver = resolver(
        r#"
partial:
  regexp: "/user"
  controller: User::list
"#,
    );
    assert!(resolver.resolve("/user").is_ok());
    assert!(resolver.resolve("/user/42").is_err());
    assert!(resolver.resolve("/api/user").is_err());
}

#[test]
fn test_unicode_path_matching() {
    let resolver = resolver(
        r#"
tag:
  regexp: "^/tag/(\\w+)$"
  controller: Tag::show
"#,
    );
    let matched = resolver.resolve("/tag/привет").unwrap();
    assert_eq!(matched.param(0), Some("привет"));
}

#[test]
fn test_optional_group_yields_empty_param() {
    let resolver = resolver(
        r#"
page:
  regexp: "^/list(?:/(\\d+))?$"
  controller: List::page
"#,
    );
    let matched = resolver.resolve("/list").unwrap();
    assert_eq!(matched.params.as_slice(), [String::new()]);
}

#[test]
fn test_invalid_regexp_is_config_error() {
    let resolver = resolver(
        r#"
broken:
  regexp: "^/x(["
  controller: A::b
"#,
    );
    assert!(matches!(
        resolver.resolve("/x").unwrap_err(),
        RouteError::ConfigInvalid { .. }
    ));
}

#[test]
fn test_empty_document_is_invalid() {
    assert!(matches!(
        RouteTable::from_yaml_str("").unwrap_err(),
        RouteError::ConfigInvalid { .. }
    ));
    assert!(matches!(
        RouteTable::from_yaml_str("{}").unwrap_err(),
        RouteError::ConfigInvalid { .. }
    ));
}

#[test]
fn test_vars_and_index_are_not_matchable_routes() {
    let table = RouteTable::from_yaml_str(USER_TABLE).unwrap();
    let names: Vec<&str> = table.routes().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["home"]);
    assert_eq!(table.global("userIdPattern"), Some("[0-9]+"));
}

#[test]
fn test_reverse_path() {
    let table = RouteTable::from_yaml_str(USER_TABLE).unwrap();
    assert_eq!(table.path_for("home", &[("id", "42")], &[]).unwrap(), "/user/42");
    assert_eq!(
        table
            .path_for("home", &[("id", "42")], &[("tab", "posts"), ("q", "a b")])
            .unwrap(),
        "/user/42?tab=posts&q=a+b"
    );
    assert_eq!(table.path_for("home", &[], &[]).unwrap(), "/user/{id}");
}

#[test]
fn test_reverse_path_errors() {
    let table = RouteTable::from_yaml_str(USER_TABLE).unwrap();
    assert!(matches!(
        table.path_for("vars", &[], &[]).unwrap_err(),
        RouteError::NameIsReserved { .. }
    ));
    assert!(matches!(
        table.path_for("nope", &[], &[]).unwrap_err(),
        RouteError::RouteNotFound { .. }
    ));
}

#[test]
fn test_programmatic_table() {
    let mut table = RouteTable::default();
    table.set_global("slug", "[a-z]+");
    table.push(RouteSpec::new("post", "^/post/{slug}$", "Post::show").with_var("slug", "@slug"));
    let resolver = RouteResolver::new(Arc::new(table));
    assert_eq!(resolver.resolve("/post/abc").unwrap().param(0), Some("abc"));
}

#[test]
fn test_status_codes() {
    let not_found = RouteError::NotFound { path: "/x".into() };
    assert_eq!(not_found.status_code(), http::StatusCode::NOT_FOUND);
    assert!(not_found.is_client_error());
    let bad = RouteError::BadRequest { reason: "ajax".into() };
    assert_eq!(bad.status_code(), http::StatusCode::BAD_REQUEST);
    let cfg = RouteError::RouteNotFound { name: "x".into() };
    assert_eq!(cfg.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
}
