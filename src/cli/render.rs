//! Expand a template document.
//!
//! The `render` command loads a YAML template, binds variables from the configuration file,
//! an optional variables file and `--var` arguments (later sources win), expands it and
//! writes the result as YAML or JSON.
//!
//! # Examples
//!
//! ```bash
//! # Print the expanded document
//! yaml-tmpl render deploy.yaml
//!
//! # Override variables
//! yaml-tmpl render deploy.yaml --vars-file prod.yaml --var replicas=5
//!
//! # Write JSON to a file
//! yaml-tmpl render deploy.yaml --format json --output deploy.json
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::CliConfig;
use crate::config::{RenderConfig, Variables};
use crate::core::TmplError;
use crate::document::{self, Node, OutputFormat};
use crate::namespace::ScopedNamespace;
use crate::parser::Parser;

/// Arguments of the `render` command.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template document to expand, or `-` to read from stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Bind a variable, e.g. `--var replicas=3` or `--var db.host=localhost`
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,

    /// YAML file with a mapping of variables
    #[arg(long, value_name = "PATH")]
    vars_file: Option<PathBuf>,

    /// Output format [default: from config, else yaml]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl RenderCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = RenderConfig::load(config.config_path.as_deref())?;

        let mut context = ScopedNamespace::new();
        self.variables(&settings)?.seed(&mut context);

        let document = self.read_document()?;
        let rendered = Parser::new()
            .parse_with(&document, &mut context)
            .with_context(|| format!("Failed to render {}", self.source_name()))?;

        let format = self.format.unwrap_or(settings.output.format);
        let text = document::to_string(&rendered, format)?;
        self.write_output(&text)
    }

    /// Collect variables from every source in precedence order.
    fn variables(&self, settings: &RenderConfig) -> Result<Variables> {
        let mut variables = Variables::new();

        if let Node::Mapping(vars) = settings.vars_node()? {
            variables.add_mapping(&vars)?;
        }
        if let Some(path) = &self.vars_file {
            variables.add_file(path)?;
        }
        for assignment in &self.vars {
            variables.add_assignment(assignment)?;
        }

        Ok(variables)
    }

    fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    fn source_name(&self) -> String {
        if self.reads_stdin() {
            "<stdin>".to_string()
        } else {
            self.input.display().to_string()
        }
    }

    fn read_document(&self) -> Result<Node> {
        let node = if self.reads_stdin() {
            document::from_reader(std::io::stdin().lock())?
        } else {
            document::from_path(&self.input)?
        };
        tracing::debug!("Loaded template from {}", self.source_name());
        Ok(node)
    }

    fn write_output(&self, text: &str) -> Result<()> {
        match &self.output {
            Some(path) => write_file(path, text),
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes()).context("Failed to write to stdout")?;
                stdout.flush().context("Failed to write to stdout")
            }
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| TmplError::FileSystemError {
        operation: "write output".to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Wrote {} byte(s) to {}", text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser as _;
    use tempfile::TempDir;

    fn command(input: &Path) -> RenderCommand {
        RenderCommand {
            input: input.to_path_buf(),
            vars: Vec::new(),
            vars_file: None,
            format: None,
            output: None,
        }
    }

    fn isolated_config(temp: &TempDir) -> CliConfig {
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        CliConfig {
            log_level: None,
            config_path: Some(path),
        }
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from([
            "yaml-tmpl",
            "render",
            "-",
            "--var",
            "a=1",
            "--var",
            "b=two",
            "--format",
            "json",
            "-o",
            "out.json",
        ])
        .unwrap();

        let Commands::Render(cmd) = cli.command;
        assert!(cmd.reads_stdin());
        assert_eq!(cmd.source_name(), "<stdin>");
        assert_eq!(cmd.vars, ["a=1", "b=two"]);
        assert_eq!(cmd.format, Some(OutputFormat::Json));
        assert_eq!(cmd.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_variable_precedence() {
        let temp = TempDir::new().unwrap();
        let vars_file = temp.path().join("vars.yaml");
        std::fs::write(&vars_file, "env: staging\nregion: eu\n").unwrap();

        let settings: RenderConfig =
            toml::from_str("[vars]\nenv = \"dev\"\nregion = \"us\"\nowner = \"ops\"\n").unwrap();

        let mut cmd = command(Path::new("unused.yaml"));
        cmd.vars_file = Some(vars_file);
        cmd.vars = vec!["env=prod".to_string()];

        let mut context = ScopedNamespace::new();
        cmd.variables(&settings).unwrap().seed(&mut context);

        assert_eq!(context.get("env").value(), Some(&Node::from("prod")));
        assert_eq!(context.get("region").value(), Some(&Node::from("eu")));
        assert_eq!(context.get("owner").value(), Some(&Node::from("ops")));
    }

    #[test]
    fn test_execute_writes_output_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("template.yaml");
        let output = temp.path().join("out.json");
        std::fs::write(&input, "ports: {_range: [80, 83]}\nname: '{{ name }}'\n").unwrap();

        let mut cmd = command(&input);
        cmd.vars = vec!["name=web".to_string()];
        cmd.format = Some(OutputFormat::Json);
        cmd.output = Some(output.clone());
        cmd.execute(&isolated_config(&temp)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"ports": [80, 81, 82], "name": "web"}));
    }

    #[test]
    fn test_execute_reports_source_on_failure() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("broken.yaml");
        std::fs::write(&input, "value: '{{ missing }}'\n").unwrap();

        let err = command(&input).execute(&isolated_config(&temp)).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_execute_missing_input() {
        let temp = TempDir::new().unwrap();
        let err =
            command(&temp.path().join("nope.yaml")).execute(&isolated_config(&temp)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TmplError>(),
            Some(TmplError::FileSystemError { .. })
        ));
    }
}
