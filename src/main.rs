//! Antiprint - Main Entry Point
//!
//! Diagnostic front-end for the spoofing engine: derives the navigator
//! projection for a user-agent string, optionally emits the page-realm
//! apply script, and runs the one-shot WebRTC policy enforcement against a
//! file-backed policy store.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use antiprint::{
    config::AntiprintSettings,
    reform::{render_apply_script, ProjectionBridge},
    webrtc::{enforce_safe_policy, FilePolicyStore, PolicyEnforcement},
    NAME, VERSION,
};

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .about("Platform-identity spoofing engine with WebRTC local-IP leak protection")
        .long_about(
            "Antiprint derives a self-consistent set of spoofed navigator\n\
             properties from a user-agent string, renders the script that\n\
             applies them inside a page realm, and tightens the WebRTC\n\
             IP-handling policy when it would expose the real local IP.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("user-agent")
                .short('u')
                .long("user-agent")
                .value_name("STRING")
                .help("User-agent string to derive the projection from"),
        )
        .arg(
            Arg::new("emit-script")
                .long("emit-script")
                .help("Print the page-realm apply script instead of the projection JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("policy-store")
                .long("policy-store")
                .value_name("FILE")
                .help("JSON policy store backing the WebRTC enforcement")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-webrtc")
                .long("no-webrtc")
                .help("Skip the WebRTC policy enforcement pass")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Load settings with the full precedence chain: defaults, config file,
/// environment, CLI arguments.
fn load_settings(matches: &clap::ArgMatches) -> Result<AntiprintSettings> {
    let mut settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => AntiprintSettings::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AntiprintSettings::default(),
    };
    settings = settings.merge_with_env();

    if let Some(ua) = matches.get_one::<String>("user-agent") {
        settings = settings.with_user_agent(ua.clone());
    }
    if let Some(path) = matches.get_one::<PathBuf>("policy-store") {
        settings = settings.with_policy_store(path.clone());
    }
    if matches.get_flag("no-webrtc") {
        settings = settings.with_enforce_webrtc_policy(false);
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Run the startup WebRTC enforcement against the configured store.
async fn enforce_webrtc(settings: &AntiprintSettings) -> Result<()> {
    let path = settings
        .policy_store
        .as_ref()
        .context("WebRTC enforcement requires a policy store path")?;

    let store = FilePolicyStore::open(path)
        .await
        .context("WebRTC IP-handling policy is unavailable on this host")?;

    match enforce_safe_policy(&store).await? {
        PolicyEnforcement::Tightened { previous } => {
            info!(%previous, "WebRTC policy was leaking and has been tightened");
        }
        PolicyEnforcement::AlreadyRestrictive(policy) => {
            info!(%policy, "WebRTC policy already restrictive");
        }
    }
    Ok(())
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    init_tracing(verbosity, quiet);

    let settings = load_settings(&matches)?;

    let Some(user_agent) = settings.user_agent.clone() else {
        bail!("No user agent configured; pass --user-agent or set user_agent in the config file");
    };

    let bridge = ProjectionBridge::new(user_agent);
    let projection = bridge.projection();
    info!(platform = %projection.navigator.platform, "derived navigator projection");

    if matches.get_flag("emit-script") {
        println!("{}", render_apply_script(projection));
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(projection).context("Failed to encode projection")?
        );
    }

    if settings.enforce_webrtc_policy {
        enforce_webrtc(&settings)
            .await
            .context("WebRTC policy enforcement failed")?;
    }

    Ok(())
}
