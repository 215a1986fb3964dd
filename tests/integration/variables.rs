//! Integration tests for variable sources and configuration

use anyhow::Result;
use predicates::prelude::*;
use yaml_tmpl::test_utils::yaml;

use crate::common::TestProject;

const TEMPLATE: &str = r#"
env: "{{ env }}"
region: "{{ region }}"
dsn: "postgres://{{ db.host }}:{{ db.port }}"
"#;

#[test]
fn test_sources_are_layered() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("app.yaml", TEMPLATE)?;
    let config = project.write_file(
        "config.toml",
        r#"
[vars]
env = "dev"
region = "us-east"

[vars.db]
host = "localhost"
port = 5432
"#,
    )?;
    project.write_file("prod.yaml", "env: staging\ndb:\n  host: db.internal\n")?;

    let rendered = project.render_yaml(&[
        "app.yaml",
        "--vars-file",
        "prod.yaml",
        "--var",
        "env=prod",
        "--config",
        config.to_str().unwrap(),
    ])?;

    assert_eq!(
        rendered,
        yaml("env: prod\nregion: us-east\ndsn: 'postgres://db.internal:5432'")
    );
    Ok(())
}

#[test]
fn test_typed_var_drives_range() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("workers.yaml", "workers:\n  _range: '{{ count }}'\n")?;

    let rendered = project.render_yaml(&["workers.yaml", "--var", "count=3"])?;
    assert_eq!(rendered, yaml("workers: [0, 1, 2]"));
    Ok(())
}

#[test]
fn test_default_config_location() -> Result<()> {
    let project = TestProject::new()?;
    project.write_home_config("[vars]\ngreeting = \"hello\"\n\n[output]\nformat = \"json\"\n")?;
    project.write_file("hi.yaml", "message: '{{ greeting }}'\n")?;

    project
        .command()
        .args(["render", "hi.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"message\": \"hello\""));
    Ok(())
}

#[test]
fn test_format_flag_overrides_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write_home_config("[output]\nformat = \"json\"\n")?;
    project.write_file("hi.yaml", "message: hi\n")?;

    project
        .command()
        .args(["render", "hi.yaml", "--format", "yaml"])
        .assert()
        .success()
        .stdout("message: hi\n");
    Ok(())
}

#[test]
fn test_config_from_environment_variable() -> Result<()> {
    let project = TestProject::new()?;
    let config = project.write_file("custom.toml", "[vars]\nteam = \"platform\"\n")?;
    project.write_file("owner.yaml", "owner: '{{ team }}'\n")?;

    project
        .command()
        .env("YAML_TMPL_CONFIG", &config)
        .args(["render", "owner.yaml"])
        .assert()
        .success()
        .stdout("owner: platform\n");
    Ok(())
}

#[test]
fn test_missing_explicit_config_fails() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("hi.yaml", "message: hi\n")?;

    project
        .command()
        .args(["render", "hi.yaml", "--config", "missing.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read configuration"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let project = TestProject::new()?;
    project.write_home_config("[output]\nformat = \"xml\"\n")?;
    project.write_file("hi.yaml", "message: hi\n")?;

    project
        .command()
        .args(["render", "hi.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse configuration"));
    Ok(())
}

#[test]
fn test_invalid_var_assignment() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("hi.yaml", "message: hi\n")?;

    project
        .command()
        .args(["render", "hi.yaml", "--var", "no-equals-sign"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected KEY=VALUE"));
    Ok(())
}

#[test]
fn test_vars_file_must_be_mapping() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file("hi.yaml", "message: hi\n")?;
    project.write_file("list.yaml", "- a\n- b\n")?;

    project
        .command()
        .args(["render", "hi.yaml", "--vars-file", "list.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must contain a mapping"));
    Ok(())
}
