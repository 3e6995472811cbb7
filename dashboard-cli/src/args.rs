use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Drive the dashboard store and validation engine from a terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Message language: en or ar
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Keep config, preferences and logs under this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a value against a rule string
    #[command(alias = "v")]
    Validate {
        /// Rules, e.g. "required|minLength:8"
        #[arg(short, long)]
        rules: String,

        /// Field label used in messages
        #[arg(short, long)]
        label: Option<String>,

        /// Other field values for `confirm`, as id=value
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// The value to check
        value: String,
    },

    /// Log in and print the returned user
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Fetch and print the current user
    Whoami,

    /// Show the theme, or toggle it
    Theme {
        #[command(subcommand)]
        op: Option<Toggle>,
    },

    /// Show the text direction, or toggle it
    Direction {
        #[command(subcommand)]
        op: Option<Toggle>,
    },

    /// Print the initial state as JSON
    State,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum Toggle {
    /// Flip the current value and persist it
    Toggle,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(id, value)| (id.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected id=value, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "dashboard",
            "validate",
            "--rules",
            "required|confirm:password",
            "-f",
            "password=Secret1",
            "--locale",
            "ar",
            "Secret1",
        ])
        .unwrap();

        assert_eq!(cli.locale.as_deref(), Some("ar"));
        match cli.command {
            Commands::Validate { rules, fields, value, .. } => {
                assert_eq!(rules, "required|confirm:password");
                assert_eq!(fields, vec![("password".to_string(), "Secret1".to_string())]);
                assert_eq!(value, "Secret1");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_field_requires_equals() {
        assert!(parse_field("password").is_err());
        assert_eq!(
            parse_field("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }

    #[test]
    fn test_theme_toggle() {
        let cli = Cli::try_parse_from(["dashboard", "theme", "toggle"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { op: Some(Toggle::Toggle) }));
    }
}
