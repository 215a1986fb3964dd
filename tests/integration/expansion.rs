//! End-to-end document expansion through the library API

use yaml_tmpl::document::{self, OutputFormat};
use yaml_tmpl::test_utils::{context, init_test_logging, yaml};
use yaml_tmpl::{Node, ParseError, Parser, ScopedNamespace};

#[test]
fn test_cluster_definition() {
    init_test_logging(None);

    let template = yaml(
        r#"
defaults: &defaults
  image: "registry.local/{{ app }}:{{ version }}"
  memory: 512

services:
  - name: gateway
    <<: *defaults
  - _with_items: [api, worker]
    name: "{{ app }}-{{ item }}"
    ports:
      - 9000
      - _range: [8080, 8082]

replicas:
  _range: "{{ count }}"
"#,
    );

    let mut ctx = context(&[
        ("app", Node::from("shop")),
        ("version", Node::from("1.4")),
        ("count", Node::from(2)),
    ]);
    let rendered = Parser::new().parse_with(&template, &mut ctx).unwrap();

    let expected = yaml(
        r#"
defaults:
  image: registry.local/shop:1.4
  memory: 512
services:
  - name: gateway
    image: registry.local/shop:1.4
    memory: 512
  - name: shop-api
    ports: [9000, 8080, 8081]
  - name: shop-worker
    ports: [9000, 8080, 8081]
replicas: [0, 1]
"#,
    );
    assert_eq!(rendered, expected);
    assert_eq!(ctx.scope_level(), 0);
}

#[test]
fn test_nested_items_and_outer_item() {
    let template = yaml(
        r#"
matrix:
  _with_items: [linux, macos]
  os: "{{ item }}"
  jobs:
    _with_items: [build, test]
    id: "{{ item }}"
"#,
    );

    let rendered = Parser::new().parse(&template).unwrap();
    let jobs = &rendered["matrix"][1]["jobs"];
    assert_eq!(rendered["matrix"][1]["os"], yaml("macos"));
    assert_eq!(*jobs, yaml("[{id: build}, {id: test}]"));
}

#[test]
fn test_rendered_document_encodes_as_json() {
    let template = yaml("name: '{{ name | upper }}'\nsizes: {_range: [1, 4]}");
    let mut ctx = ScopedNamespace::new();
    ctx.set("name", "edge");

    let rendered = Parser::new().parse_with(&template, &mut ctx).unwrap();
    let json = document::to_string(&rendered, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, serde_json::json!({"name": "EDGE", "sizes": [1, 2, 3]}));
}

#[test]
fn test_failure_leaves_context_usable() {
    let mut ctx = context(&[("item", Node::from("outer"))]);
    let broken = yaml("k: {_with_items: [1], v: '{{ item.missing }}'}");
    assert!(matches!(
        Parser::new().parse_with(&broken, &mut ctx),
        Err(ParseError::Template(_))
    ));

    let ok = yaml("k: '{{ item }}'");
    let rendered = Parser::new().parse_with(&ok, &mut ctx).unwrap();
    assert_eq!(rendered, yaml("k: outer"));
}
