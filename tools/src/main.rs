mod host;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use libcim::{BackendKind, PluginLoader, PluginSource};
use libcim_core::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::host::Host;

#[derive(Parser)]
#[command(name = "cim-probe", about = "Probe and drive libcim input-method backends")]
struct Args {
    /// Log loader activity at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show where libcim looks for its configuration and backend
    Path,
    /// Resolve the backend and report what was loaded
    Probe(SourceArgs),
    /// Type TEXT into a fresh input context and print every callback
    Type {
        text: String,

        /// Finish with a focus change, committing any pending preedit
        #[arg(long)]
        flush: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(ClapArgs)]
struct SourceArgs {
    /// Load this module instead of the configured one
    #[arg(long)]
    plugin: Option<PathBuf>,

    /// Use a compiled-in backend (e.g. "fullwidth")
    #[arg(long, conflicts_with = "plugin")]
    builtin: Option<String>,
}

impl SourceArgs {
    fn loader(&self) -> PluginLoader {
        if let Some(name) = &self.builtin {
            PluginLoader::with_builtin(name)
        } else if let Some(path) = &self.plugin {
            PluginLoader::with_path(path)
        } else {
            PluginLoader::from_config(&Config::load_default())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn show_path(label: &str, path: Option<&Path>) {
    match path {
        Some(p) => {
            let status = if p.exists() { "present" } else { "missing" };
            println!("{:<10} {} ({})", label, p.display(), status);
        }
        None => println!("{:<10} <unresolved>", label),
    }
}

fn describe_source(source: &PluginSource) -> String {
    match source {
        PluginSource::Dynamic(Some(path)) => format!("module {}", path.display()),
        PluginSource::Dynamic(None) => "module <no config directory>".to_string(),
        PluginSource::Builtin(name) => format!("builtin {}", name),
    }
}

fn run_path() {
    let config_dir = libcim_core::user_config_dir();
    show_path("config dir", config_dir.as_deref());
    show_path("config", libcim_core::default_config_path().as_deref());
    show_path("plugin", libcim_core::default_plugin_path().as_deref());

    let config = Config::load_default();
    println!("{:<10} {}", "source", describe_source(&config.plugin_source()));
    println!("{:<10} {}", "builtins", libcim::registered_backends().join(", "));
}

fn run_probe(source: &SourceArgs) -> bool {
    let loader = source.loader();
    let ctx = loader.acquire();

    println!("source:  {}", describe_source(loader.source()));
    println!("backend: {} ({:?})", ctx.backend_name(), ctx.backend_kind());
    if let Some(loaded) = loader.loaded_backend() {
        println!("loaded:  {}", loaded);
    }

    let ok = ctx.backend_kind() != BackendKind::Null;
    loader.release(ctx);
    ok
}

fn run_type(text: &str, flush: bool, source: &SourceArgs) -> Result<()> {
    let loader = source.loader();
    let mut ctx = loader.acquire();
    println!("# backend: {} ({:?})", ctx.backend_name(), ctx.backend_kind());

    let host = Host::new();
    host.attach(&mut ctx);
    ctx.focus_in();

    let typed = host.type_text(&mut ctx, text);
    if flush {
        ctx.focus_out();
    }

    for line in host.take_transcript() {
        println!("{}", line);
    }
    let consumed = typed?;

    let preedit = ctx.get_preedit();
    if !preedit.is_empty() {
        println!("# pending preedit: {:?}", preedit.text);
    }
    println!("# consumed {} of {} keys", consumed, text.chars().count());
    println!("# document: {:?}", host.document());

    loader.release(ctx);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    cim_fullwidth::register();

    match &args.command {
        Command::Path => run_path(),
        Command::Probe(source) => {
            if !run_probe(source) {
                std::process::exit(1);
            }
        }
        Command::Type { text, flush, source } => run_type(text, *flush, source)?,
    }
    Ok(())
}
