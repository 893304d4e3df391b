//! CLI configuration command handlers.

use metalctl_config::{Config, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

fn config_detail(cfg: &Config) -> String {
    format!(
        "base_url: {}\ntimeout:  {}s\noutput:   {}\ncolor:    {}",
        cfg.base_url, cfg.timeout, cfg.output, cfg.color,
    )
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            let out = match global.output {
                OutputFormat::Json => output::render_json_pretty(&cfg),
                _ => config_detail(&cfg),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = load_config_or_default();
            match key.as_str() {
                "base_url" => cfg.base_url = value,
                "timeout" => {
                    cfg.timeout = value.parse().map_err(|_| CliError::Validation {
                        field: "timeout".into(),
                        reason: format!("not a number of seconds: {value}"),
                    })?;
                }
                "output" => {
                    if !matches!(value.as_str(), "table" | "json" | "plain") {
                        return Err(CliError::Validation {
                            field: "output".into(),
                            reason: format!("expected table, json, or plain, got '{value}'"),
                        });
                    }
                    cfg.output = value;
                }
                "color" => {
                    if !matches!(value.as_str(), "auto" | "always" | "never") {
                        return Err(CliError::Validation {
                            field: "color".into(),
                            reason: format!("expected auto, always, or never, got '{value}'"),
                        });
                    }
                    cfg.color = value;
                }
                other => {
                    return Err(CliError::Validation {
                        field: "key".into(),
                        reason: format!(
                            "unknown key '{other}' (expected base_url, timeout, output, or color)"
                        ),
                    });
                }
            }
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Wrote {}", config_path().display());
            }
            Ok(())
        }
    }
}
