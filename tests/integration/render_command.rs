//! Integration tests for the `render` command

use anyhow::Result;
use predicates::prelude::*;
use serde_json::json;
use yaml_tmpl::test_utils::yaml;

use crate::common::TestProject;

const TEMPLATE: &str = r#"
service: "{{ name }}"
replicas:
  _range: 3
hosts:
  _with_items: [a, b]
  host: "{{ name }}-{{ item }}"
"#;

#[test]
fn test_render_to_stdout_as_yaml() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", TEMPLATE)?;

    let rendered = project.render_yaml(&["app.yaml", "--var", "name=web"])?;
    assert_eq!(
        rendered,
        yaml("service: web\nreplicas: [0, 1, 2]\nhosts: [{host: web-a}, {host: web-b}]")
    );
    Ok(())
}

#[test]
fn test_render_preserves_key_order() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("order.yaml", "zeta: 1\nalpha: 2\nmiddle: 3\n")?;

    let output = project.command().args(["render", "order.yaml"]).output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "zeta: 1\nalpha: 2\nmiddle: 3\n");
    Ok(())
}

#[test]
fn test_render_json() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", TEMPLATE)?;

    let output =
        project.command().args(["render", "app.yaml", "--var", "name=api", "--format", "json"]).output()?;
    assert!(output.status.success());

    let rendered: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        rendered,
        json!({
            "service": "api",
            "replicas": [0, 1, 2],
            "hosts": [{"host": "api-a"}, {"host": "api-b"}]
        })
    );
    Ok(())
}

#[test]
fn test_render_from_stdin() -> Result<()> {
    let project = TestProject::new()?;

    project
        .command()
        .args(["render", "-", "--format", "json"])
        .write_stdin("ports: [22, {_range: [80, 82]}]\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ports\""))
        .stdout(predicate::str::contains("81"));
    Ok(())
}

#[test]
fn test_render_to_output_file() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", TEMPLATE)?;

    project
        .command()
        .args(["render", "app.yaml", "--var", "name=db", "-o", "out.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = yaml(&project.read_file("out.yaml")?);
    assert_eq!(written["service"], yaml("db"));
    assert_eq!(written["hosts"][1]["host"], yaml("db-b"));
    Ok(())
}

#[test]
fn test_missing_variable_suggests_similar_name() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", "count: '{{ replcas }}'\n")?;

    project
        .command()
        .args(["render", "app.yaml", "--var", "replicas=3"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error: Failed to render app.yaml"))
        .stderr(predicate::str::contains("replcas"))
        .stderr(predicate::str::contains("Did you mean: replicas?"));
    Ok(())
}

#[test]
fn test_boolean_values_are_rejected() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("flags.yaml", "enabled: true\n")?;

    project
        .command()
        .args(["render", "flags.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("boolean true"))
        .stderr(predicate::str::contains("suggestion:"));
    Ok(())
}

#[test]
fn test_invalid_range_argument() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("range.yaml", "k: {_range: [0, 10, 0]}\n")?;

    project
        .command()
        .args(["render", "range.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step must not be zero"));
    Ok(())
}

#[test]
fn test_environment_access_is_forbidden() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("env.yaml", "home: \"{{ get_env(name='HOME') }}\"\n")?;

    project.command().args(["render", "env.yaml"]).assert().code(1).stderr(
        predicate::str::contains("forbidden").or(predicate::str::contains("Forbidden")),
    );
    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let project = TestProject::new()?;

    project
        .command()
        .args(["render", "nope.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read template"))
        .stderr(predicate::str::contains("nope.yaml"));
    Ok(())
}

#[test]
fn test_invalid_yaml_input() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("bad.yaml", "key: [unterminated\n")?;

    project
        .command()
        .args(["render", "bad.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid YAML document in bad.yaml"));
    Ok(())
}

#[test]
fn test_verbose_logs_to_stderr() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", "k: {_range: 2}\n")?;

    project
        .command()
        .args(["--verbose", "render", "app.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- 0"))
        .stderr(predicate::str::contains("_range"));
    Ok(())
}

#[test]
fn test_quiet_suppresses_logging() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", "k: {_range: 2}\n")?;

    project
        .command()
        .env("RUST_LOG", "debug")
        .args(["--quiet", "render", "app.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
    Ok(())
}
