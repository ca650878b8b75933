//! ACL provider command line
//!
//! Resolves ACLs from a TOML fixture and prints them as JSON.

use acl_provider::{
    AclProvider, MemoryStore, ObjectIdentity, SecurityIdentity, StoreFixture,
    config::{LogFormat, LoggingConfig, load_config},
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Resolve hierarchical ACLs
#[derive(Parser, Debug)]
#[command(name = "acl-provider")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ACL_PROVIDER_CONFIG")]
    config: Option<String>,

    /// Path to the store fixture (overrides store.fixture)
    #[arg(short, long, env = "ACL_PROVIDER_FIXTURE")]
    fixture: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ACL_PROVIDER_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the ACL of one object identity
    Resolve {
        /// Object type, e.g. Document
        #[arg(long = "type")]
        object_type: String,

        /// Object identifier
        #[arg(long)]
        id: String,

        /// Requesting security identity (user:<id> or role:<id>), repeatable
        #[arg(long = "sid")]
        sids: Vec<SecurityIdentity>,
    },

    /// Resolve the ACLs of several object identities at once
    ResolveMany {
        /// Object identity (type:identifier), repeatable
        #[arg(long = "object", required = true)]
        objects: Vec<ObjectIdentity>,

        /// Requesting security identity (user:<id> or role:<id>), repeatable
        #[arg(long = "sid")]
        sids: Vec<SecurityIdentity>,
    },

    /// List the object identities below a parent
    Children {
        /// Parent object type
        #[arg(long = "type")]
        object_type: String,

        /// Parent object identifier
        #[arg(long)]
        id: String,

        /// Only direct children instead of all descendants
        #[arg(long)]
        direct: bool,
    },
}

fn init_logging(logging: &LoggingConfig, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn load_store(path: &str) -> acl_provider::Result<MemoryStore> {
    let fixture = StoreFixture::from_path(shellexpand::tilde(path).into_owned())?;
    Ok(fixture.into_store().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Logging settings come from the configuration when it loads
    let loaded = load_config(args.config.as_deref());
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| logging.level.clone());
    init_logging(&logging, &level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting ACL provider");

    let config = loaded.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    let fixture = args
        .fixture
        .as_deref()
        .or(config.store.fixture.as_deref())
        .context("no store fixture configured (use --fixture or store.fixture)")
        .inspect_err(|e| error!(error = %e, "Missing fixture"))?;

    let store = Arc::new(
        load_store(fixture)
            .await
            .inspect_err(|e| error!(error = %e, fixture, "Failed to load store fixture"))
            .with_context(|| format!("reading fixture {}", fixture))?,
    );

    let provider = AclProvider::with_config(store, &config.provider);

    let output = match args.command {
        Command::Resolve {
            object_type,
            id,
            sids,
        } => {
            let acl = provider
                .resolve(&ObjectIdentity::new(id, object_type), &sids)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to resolve ACL"))?;
            serde_json::to_string_pretty(&acl)?
        }
        Command::ResolveMany { objects, sids } => {
            let acls = provider
                .resolve_many(&objects, &sids)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to resolve ACLs"))?;
            // JSON object keys must be strings
            let keyed: std::collections::BTreeMap<String, _> = acls
                .into_iter()
                .map(|(oid, acl)| (oid.to_string(), acl))
                .collect();
            serde_json::to_string_pretty(&keyed)?
        }
        Command::Children {
            object_type,
            id,
            direct,
        } => {
            let children = provider
                .children(&ObjectIdentity::new(id, object_type), direct)
                .await
                .inspect_err(|e| error!(error = %e, "Failed to list children"))?;
            serde_json::to_string_pretty(&children)?
        }
    };

    println!("{}", output);
    Ok(())
}
