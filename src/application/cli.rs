#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::Password;
use serde_json::Value;
use strum::IntoEnumIterator;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use super::app::AppContext;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AuthState;
use crate::domain::models::Event;
use crate::domain::models::GatewayError;
use crate::domain::models::PendingCall;
use crate::domain::models::SettingKey;
use crate::domain::services::file_to_data_url;

const LOGIN_HINT: &str = "Run `artspark login` to enter your API key.";

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn mask(value: &str) -> String {
    let visible = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<char>>()
        .into_iter()
        .rev()
        .collect::<String>();

    return format!("****{visible}");
}

fn format_setting(key: SettingKey, value: Option<String>) -> String {
    let value = match value {
        Some(val) if key == SettingKey::BailianApiKey => mask(&val),
        Some(val) => val,
        None => "(not set)".to_string(),
    };

    return format!("{key} = {value}");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

/// Prints the re-authentication prompt if one was signalled since the last
/// check. Returns whether it was shown.
fn report_events(ctx: &mut AppContext) -> bool {
    let mut reauth_message = None;
    for event in ctx.drain_events() {
        match event {
            Event::ReauthRequired(message) => reauth_message = Some(message),
            Event::Authenticated => tracing::debug!("Authenticated"),
        }
    }

    if let Some(message) = reauth_message {
        eprintln!("{}", Paint::yellow(message));
        eprintln!("{LOGIN_HINT}");
        return true;
    }

    return false;
}

async fn open_authenticated() -> Result<AppContext> {
    let mut ctx = AppContext::open().await?;
    let state = ctx.validation.run().await?;
    if state != AuthState::Authenticated {
        report_events(&mut ctx);
        bail!("Not logged in");
    }

    return Ok(ctx);
}

async fn finish<T>(
    ctx: &mut AppContext,
    pending: &PendingCall,
    res: Result<T, GatewayError>,
) -> Result<T> {
    let err = match res {
        Ok(val) => return Ok(val),
        Err(err) => err,
    };

    if err.is_unauthorized() {
        ctx.validation.force_unauthenticated();
    }
    report_events(ctx);

    let message = pending
        .error()
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return err.user_message());
    bail!(message);
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    return Ok(());
}

async fn read_image(matches: &ArgMatches, id: &str) -> Result<Option<String>> {
    return match matches.get_one::<String>(id) {
        Some(file_path) => Ok(Some(file_to_data_url(path::Path::new(file_path)).await?)),
        None => Ok(None),
    };
}

async fn required_image(matches: &ArgMatches, id: &str) -> Result<String> {
    return match read_image(matches, id).await? {
        Some(image) => Ok(image),
        None => bail!(format!("--{id} is required")),
    };
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    return match matches.get_one::<String>(id) {
        Some(val) => Ok(val.as_str()),
        None => bail!(format!("--{id} is required")),
    };
}

fn optional<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a str> {
    return matches.get_one::<String>(id).map(|e| return e.as_str());
}

async fn run_login(matches: &ArgMatches) -> Result<()> {
    let key = match matches.get_one::<String>("key") {
        Some(key) => key.to_string(),
        None => Password::new()
            .with_prompt("ArtSpark API key")
            .interact()?,
    };

    let mut ctx = AppContext::open().await?;
    ctx.validation.submit_key(&key).await?;
    println!("{}", Paint::green("API key accepted, you are logged in."));
    return Ok(());
}

async fn run_status() -> Result<()> {
    let mut ctx = AppContext::open().await?;
    ctx.validation.run().await?;

    println!("Backend: {}", Config::get(ConfigKey::BackendURL));
    println!("Session: {}", ctx.validation.state());
    if let Some(token) = ctx.session.snapshot().await.token() {
        println!("Token: {}", mask(token));
    } else {
        report_events(&mut ctx);
    }

    return Ok(());
}

async fn run_settings(matches: &ArgMatches) -> Result<()> {
    let ctx = AppContext::open().await?;

    let config = match matches.subcommand() {
        Some(("set", set_matches)) => {
            let key_str = required(set_matches, "setting")?;
            let key = match SettingKey::parse(key_str) {
                Some(key) => key,
                None => bail!(format!("Unknown setting '{key_str}'")),
            };
            let value = set_matches
                .get_one::<String>("value")
                .map(|e| return e.as_str())
                .unwrap_or_default();
            ctx.settings.set(key, value).await?
        }
        Some(("reset", _)) => ctx.settings.reset().await?,
        _ => ctx.settings.snapshot().await,
    };

    let lines = SettingKey::iter()
        .map(|key| return format_setting(key, config.get(key)))
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));

    return Ok(());
}

async fn run_tool(name: &str, matches: &ArgMatches) -> Result<()> {
    let mut ctx = open_authenticated().await?;
    let mut pending = PendingCall::default();

    match name {
        "ask" => {
            let question = required(matches, "question")?;
            let res = ctx.tools.ask_question(&mut pending, question).await;
            println!("{}", finish(&mut ctx, &pending, res).await?);
        }
        "ideas" => {
            let theme = required(matches, "theme")?;
            let res = ctx.tools.generate_ideas(&mut pending, theme).await;
            print_json(&finish(&mut ctx, &pending, res).await?)?;
        }
        "mood" => {
            let mood = required(matches, "mood")?;
            let theme = required(matches, "theme")?;
            let res = ctx.tools.mood_painting(&mut pending, mood, theme).await;
            print_json(&finish(&mut ctx, &pending, res).await?)?;
        }
        "colorize" => {
            let image = required_image(matches, "image").await?;
            let prompt = required(matches, "prompt")?;
            let res = ctx
                .tools
                .colorize_lineart(&mut pending, &image, prompt)
                .await;
            println!("{}", finish(&mut ctx, &pending, res).await?);
        }
        "creative" => {
            let content = required_image(matches, "content").await?;
            let style = read_image(matches, "style").await?;
            let prompt = optional(matches, "prompt");
            let res = ctx
                .tools
                .creative_workshop(&mut pending, &content, style.as_deref(), prompt)
                .await;
            println!("{}", finish(&mut ctx, &pending, res).await?);
        }
        "portrait" => {
            let image = required_image(matches, "image").await?;
            let style = read_image(matches, "style").await?;
            let preset = matches.get_one::<u32>("preset").copied();
            let res = ctx
                .tools
                .portrait_workshop(&mut pending, &image, style.as_deref(), preset)
                .await;
            println!("{}", finish(&mut ctx, &pending, res).await?);
        }
        "critique" => {
            let image = required_image(matches, "image").await?;
            let theme = optional(matches, "theme");
            let res = ctx
                .tools
                .critique_homework(&mut pending, &image, theme)
                .await;
            print_json(&finish(&mut ctx, &pending, res).await?)?;
        }
        "explain" => {
            let title = required(matches, "title")?;
            let res = ctx
                .tools
                .explain_artwork(
                    &mut pending,
                    title,
                    optional(matches, "artist"),
                    optional(matches, "medium"),
                    optional(matches, "date"),
                )
                .await;
            print_json(&finish(&mut ctx, &pending, res).await?)?;
        }
        _ => bail!(format!("Unknown tool command {name}")),
    }

    return Ok(());
}

fn arg_text(id: &'static str, help: &'static str) -> Arg {
    return Arg::new(id)
        .long(id)
        .num_args(1)
        .help(help)
        .required(true);
}

fn arg_optional(id: &'static str, help: &'static str) -> Arg {
    return Arg::new(id).long(id).num_args(1).help(help);
}

fn arg_image(id: &'static str, help: &'static str) -> Arg {
    return Arg::new(id)
        .long(id)
        .num_args(1)
        .value_name("FILE")
        .help(help);
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for ArtSpark")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running ArtSpark with environment variable RUST_LOG=artspark")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        )
        .subcommand(
            Command::new("enum-settings").about("List all request setting keys as strings.")
        );
}

fn subcommand_login() -> Command {
    return Command::new("login")
        .about("Exchanges an API key for a session token. Prompts for the key when it isn't passed.")
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .env("ARTSPARK_API_KEY")
                .hide_env_values(true)
                .num_args(1)
                .help("ModelScope API key."),
        );
}

fn subcommand_settings() -> Command {
    return Command::new("settings")
        .about("Model and teaching settings sent with every request.")
        .subcommand(Command::new("show").about("Print the current settings."))
        .subcommand(
            Command::new("set")
                .about("Change a setting. An empty value clears optional settings.")
                .arg(
                    Arg::new("setting")
                        .help("Setting name")
                        .required(true)
                        .value_parser(PossibleValuesParser::new(SettingKey::VARIANTS.iter().copied())),
                )
                .arg(Arg::new("value").help("New value").required(true)),
        )
        .subcommand(Command::new("reset").about("Restore the default settings."));
}

fn subcommand_tools() -> Vec<Command> {
    return vec![
        Command::new("ask")
            .about("Ask an art knowledge question.")
            .arg(arg_text("question", "The question to ask.")),
        Command::new("ideas")
            .about("Generate drawing ideas for a theme.")
            .arg(arg_text("theme", "Theme to find ideas for.")),
        Command::new("mood")
            .about("Turn a mood and a theme into a painting idea.")
            .arg(arg_text("mood", "How you feel."))
            .arg(arg_text("theme", "What to paint.")),
        Command::new("colorize")
            .about("Colorize a line art drawing.")
            .arg(arg_image("image", "Line art image.").required(true))
            .arg(arg_text("prompt", "Style to color the drawing in.")),
        Command::new("creative")
            .about("Restyle an image from a style image or a text instruction.")
            .arg(arg_image("content", "Content image.").required(true))
            .arg(arg_image("style", "Style image."))
            .arg(
                Arg::new("prompt")
                    .long("prompt")
                    .num_args(1)
                    .help("Text instruction describing the style."),
            )
            .group(
                ArgGroup::new("style-source")
                    .args(["style", "prompt"])
                    .multiple(true)
                    .required(true),
            ),
        Command::new("portrait")
            .about("Stylize a portrait with a custom style image or a preset.")
            .arg(arg_image("image", "Portrait image.").required(true))
            .arg(arg_image("style", "Custom style image."))
            .arg(
                Arg::new("preset")
                    .long("preset")
                    .num_args(1)
                    .value_parser(value_parser!(u32))
                    .help("Index of a preset style."),
            )
            .group(
                ArgGroup::new("portrait-style")
                    .args(["style", "preset"])
                    .required(true),
            ),
        Command::new("critique")
            .about("Get feedback on a student's artwork.")
            .arg(arg_image("image", "Artwork image.").required(true))
            .arg(
                Arg::new("theme")
                    .long("theme")
                    .num_args(1)
                    .help("Assignment theme."),
            ),
        Command::new("explain")
            .about("Get a guided explanation of a museum artwork.")
            .arg(arg_text("title", "Title of the artwork."))
            .arg(arg_optional("artist", "Artist name."))
            .arg(arg_optional("medium", "Medium, e.g. oil on canvas."))
            .arg(arg_optional("date", "When it was made.")),
    ];
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("artspark")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand(subcommand_login())
        .subcommand(Command::new("logout").about("Forget the stored session token."))
        .subcommand(Command::new("status").about("Check whether the stored session is still valid."))
        .subcommands(subcommand_tools())
        .subcommand(subcommand_settings())
        .subcommand(subcommand_config())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("ARTSPARK_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::BackendURL.to_string())
                .long(ConfigKey::BackendURL.to_string())
                .env("ARTSPARK_BACKEND_URL")
                .num_args(1)
                .help(format!("URL of the ArtSpark backend. [default: {}]", Config::default(ConfigKey::BackendURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DataDir.to_string())
                .long(ConfigKey::DataDir.to_string())
                .env("ARTSPARK_DATA_DIR")
                .num_args(1)
                .help(format!("Directory the session token and settings are stored in. [default: {}]", Config::default(ConfigKey::DataDir)))
                .global(true),
        );
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => match debug_matches.subcommand() {
            Some(("log-path", _)) => {
                let log_path = dirs::cache_dir()
                    .unwrap_or_else(|| return path::PathBuf::from("."))
                    .join("artspark/debug.log");
                println!("{}", log_path.to_string_lossy());
            }
            Some(("enum-config", _)) => {
                println!("{}", ConfigKey::VARIANTS.join("\n"));
            }
            Some(("enum-settings", _)) => {
                println!("{}", SettingKey::VARIANTS.join("\n"));
            }
            _ => {
                subcommand_debug().print_long_help()?;
            }
        },
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
            }
            _ => {
                subcommand_config().print_long_help()?;
            }
        },
        Some((name, subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;

            match name {
                "login" => run_login(subcmd_matches).await?,
                "logout" => {
                    AppContext::open().await?.session.logout().await?;
                    println!("Logged out.");
                }
                "status" => run_status().await?,
                "settings" => run_settings(subcmd_matches).await?,
                _ => run_tool(name, subcmd_matches).await?,
            }
        }
        None => {
            build().print_long_help()?;
        }
    }

    return Ok(());
}
