//! Subcommand implementations.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use dashboard_lib::Store;
use dashboard_lib::api::HttpUserApi;
use dashboard_lib::model::Credentials;
use dashboard_lib::model::User;
use dashboard_lib::prefs::FilePreferences;
use dashboard_lib::store::Action;
use dashboard_lib::validation::CustomRules;
use dashboard_lib::validation::RuleContext;
use dashboard_lib::validation::RuleSet;
use dashboard_lib::validation::validate_value;

use crate::args::Commands;
use crate::args::Toggle;
use crate::config::Config;
use crate::error::CliError;
use crate::paths::AppPaths;

pub async fn run(
    command: Commands,
    config: &Config,
    paths: Option<&AppPaths>,
) -> Result<(), CliError> {
    match command {
        Commands::Validate {
            rules,
            label,
            fields,
            value,
        } => validate(config, &rules, label.as_deref(), fields, &value),
        Commands::Login { email, password } => {
            let store = open_store(config, paths)?;
            let output = store
                .dispatch(Action::Login(Credentials::new(email, password)))
                .await?;
            if let Some(user) = output.user() {
                print_user(user);
            }
            Ok(())
        }
        Commands::Whoami => {
            let store = open_store(config, paths)?;
            let output = store.dispatch(Action::FetchUser).await?;
            if let Some(user) = output.user() {
                print_user(user);
            }
            Ok(())
        }
        Commands::Theme { op } => {
            let store = open_store(config, paths)?;
            if let Some(Toggle::Toggle) = op {
                store.dispatch(Action::SwitchTheme).await?;
            }
            println!("{}", store.state().theme);
            Ok(())
        }
        Commands::Direction { op } => {
            let store = open_store(config, paths)?;
            if let Some(Toggle::Toggle) = op {
                store.dispatch(Action::SwitchDirection).await?;
            }
            println!("{}", store.state().direction);
            Ok(())
        }
        Commands::State => {
            let store = open_store(config, paths)?;
            println!("{}", serde_json::to_string_pretty(&store.state())?);
            Ok(())
        }
    }
}

fn validate(
    config: &Config,
    rules: &str,
    label: Option<&str>,
    fields: Vec<(String, String)>,
    value: &str,
) -> Result<(), CliError> {
    let messages = config.messages()?;
    let rules = RuleSet::parse(rules);
    let fields: HashMap<String, String> = fields.into_iter().collect();
    let custom = CustomRules::new();
    let cx = RuleContext {
        messages,
        today: Local::now().date_naive(),
        fields: &fields,
        custom: &custom,
    };

    let label = label.unwrap_or(messages.default_label());
    validate_value(value, label, &rules, &cx).map_err(CliError::Invalid)?;
    println!("valid");
    Ok(())
}

fn open_store(config: &Config, paths: Option<&AppPaths>) -> Result<Store, CliError> {
    let prefs_path = paths.ok_or(CliError::NoConfigDir)?.preferences_file();
    let prefs = FilePreferences::open(&prefs_path)?;
    let api = HttpUserApi::builder()
        .base_url(config.api_base_url.clone())
        .timeout(config.timeout())
        .build()?;
    log::debug!("Using backend {} and preferences {}", api.base_url(), prefs_path.display());

    Ok(Store::create(Arc::new(prefs), Arc::new(api)))
}

fn print_user(user: &User) {
    match &user.role {
        Some(role) => println!("{} ({}) [{}]", user.name, user.id, role),
        None => println!("{} ({})", user.name, user.id),
    }
}
