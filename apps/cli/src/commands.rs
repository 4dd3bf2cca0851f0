//! CLI command definitions, routing, and tracing setup.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tracing::info;

use itemsetcopier_catalog::{CatalogCache, ChampionResolver, ItemResolver};
use itemsetcopier_core::{NormalizeOptions, Translation, Translator};
use itemsetcopier_shared::{
    AppConfig, CatalogConfig, ChampionRef, ItemSetError, init_config, load_config,
};
use itemsetcopier_sources::{AdapterRegistry, SourceAdapter, SourceParams};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ItemSetCopier: turn community builds into League of Legends item sets.
#[derive(Parser)]
#[command(
    name = "itemsetcopier",
    version,
    about = "Translate community build pages into importable League of Legends item sets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the reference-data base URL.
    #[arg(long, env = "ITEMSETCOPIER_DDRAGON_URL", global = true)]
    pub ddragon_url: Option<String>,

    /// Override the reference-data locale (e.g. en_US).
    #[arg(long, env = "ITEMSETCOPIER_LOCALE", global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Translate a retrieved build page into an item set (JSON on stdout).
    Translate {
        /// Source adapter (see `sources`). Detected from --url when omitted.
        #[arg(short, long)]
        source: Option<String>,

        /// Retrieved page to read, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Item set title (1 to 75 characters).
        #[arg(short, long)]
        title: String,

        /// Address the page was retrieved from.
        #[arg(long)]
        url: Option<String>,

        /// Champion name or numeric key; overrides the page.
        #[arg(long)]
        champion: Option<String>,

        /// Role, for sites organized by role.
        #[arg(long)]
        role: Option<String>,

        /// Build to use in multi-build guides (out of range falls back to 0).
        #[arg(long, allow_negative_numbers = true)]
        build_index: Option<i64>,

        /// Named build to use.
        #[arg(long)]
        build_name: Option<String>,

        /// Skip the Quick Charge variants.
        #[arg(long)]
        no_quick_charge: bool,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Inspect the reference-data catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// List supported build sources.
    Sources,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// Print the current catalog version.
    Version,
    /// Resolve a champion name or key.
    Champion {
        /// Name (any case) or numeric key.
        query: String,
    },
    /// Resolve an item display name.
    Item {
        /// Display name as a source would print it.
        name: String,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "itemsetcopier=warn",
        1 => "itemsetcopier=info",
        2 => "itemsetcopier=debug",
        _ => "itemsetcopier=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let overrides = CatalogOverrides {
        base_url: cli.ddragon_url,
        locale: cli.locale,
    };

    match cli.command {
        Command::Translate {
            source,
            input,
            title,
            url,
            champion,
            role,
            build_index,
            build_name,
            no_quick_charge,
            pretty,
        } => {
            let params = SourceParams {
                title,
                url,
                champion: champion
                    .as_deref()
                    .map(str::parse::<ChampionRef>)
                    .transpose()?,
                role,
                build_index,
                build_name,
            };
            let options = TranslateOptions {
                source,
                input,
                no_quick_charge,
                pretty,
            };
            cmd_translate(&overrides, params, options).await
        }
        Command::Catalog { action } => match action {
            CatalogAction::Version => cmd_catalog_version(&overrides).await,
            CatalogAction::Champion { query } => cmd_catalog_champion(&overrides, &query).await,
            CatalogAction::Item { name } => cmd_catalog_item(&overrides, &name).await,
        },
        Command::Sources => cmd_sources(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Command-line overrides of the `[catalog]` config section.
struct CatalogOverrides {
    base_url: Option<String>,
    locale: Option<String>,
}

impl CatalogOverrides {
    fn apply(&self, config: &AppConfig) -> CatalogConfig {
        let mut catalog = CatalogConfig::from(config);
        if let Some(base_url) = &self.base_url {
            catalog.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(locale) = &self.locale {
            catalog.locale = locale.clone();
        }
        catalog
    }
}

struct TranslateOptions {
    source: Option<String>,
    input: String,
    no_quick_charge: bool,
    pretty: bool,
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_translate(
    overrides: &CatalogOverrides,
    params: SourceParams,
    options: TranslateOptions,
) -> Result<()> {
    let config = load_config()?;
    let registry = AdapterRegistry::new();
    let adapter = pick_adapter(&registry, options.source.as_deref(), params.url.as_deref())?;

    let document = read_input(&options.input).await?;

    let cache = CatalogCache::from_config(&overrides.apply(&config))?;
    let translator = Translator::new(Arc::new(cache)).with_options(NormalizeOptions {
        include_quick_charge: config.translate.include_quick_charge && !options.no_quick_charge,
    });

    info!(source = adapter.name(), input = %options.input, "translating build");

    let translation = with_spinner(
        "Resolving build against the catalog",
        translator.translate_source(adapter, &params, &document),
    )
    .await?;

    print_translation(&translation, options.pretty)
}

fn pick_adapter<'r>(
    registry: &'r AdapterRegistry,
    source: Option<&str>,
    url: Option<&str>,
) -> Result<&'r dyn SourceAdapter> {
    match (source, url) {
        (Some(name), _) => registry.by_name(name).ok_or_else(|| {
            eyre!("unknown source '{name}': run `itemsetcopier sources` for the list")
        }),
        (None, Some(url)) => registry
            .detect(url)
            .ok_or_else(|| eyre!("no source recognizes the URL '{url}'; pass --source")),
        (None, None) => Err(eyre!("pass --source or --url to pick a build source")),
    }
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .wrap_err("failed to read the build page from stdin")?;
        return Ok(buf);
    }

    let path = PathBuf::from(input);
    tokio::fs::read_to_string(&path)
        .await
        .wrap_err_with(|| format!("failed to read the build page at '{}'", path.display()))
}

fn print_translation(translation: &Translation, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(&translation.item_set)?
    } else {
        serde_json::to_string(&translation.item_set)?
    };
    println!("{json}");

    if !translation.outdated.is_empty() {
        eprintln!(
            "{} item(s) not found in catalog {}:",
            translation.outdated.len(),
            translation.catalog_version
        );
        for name in &translation.outdated {
            eprintln!("  - {name}");
        }
    }

    Ok(())
}

async fn cmd_catalog_version(overrides: &CatalogOverrides) -> Result<()> {
    let cache = load_cache(overrides)?;
    let catalog = with_spinner("Fetching catalog", cache.get_catalog()).await?;

    println!("{}", catalog.version());
    println!(
        "  {} items, {} champions",
        catalog.item_count(),
        catalog.champion_count()
    );
    Ok(())
}

async fn cmd_catalog_champion(overrides: &CatalogOverrides, query: &str) -> Result<()> {
    let champion: ChampionRef = query.parse()?;
    let cache = load_cache(overrides)?;
    let catalog = with_spinner("Fetching catalog", cache.get_catalog()).await?;

    let record = ChampionResolver::new(&catalog).resolve(&champion)?;

    println!(
        "{}  {} ({})",
        record.key, record.display_name, record.internal_name
    );
    Ok(())
}

async fn cmd_catalog_item(overrides: &CatalogOverrides, name: &str) -> Result<()> {
    let cache = load_cache(overrides)?;
    let catalog = with_spinner("Fetching catalog", cache.get_catalog()).await?;
    let resolver = ItemResolver::new(&catalog);

    let id = resolver
        .resolve_item_name(name)
        .map_err(ItemSetError::from)?;
    let canonical = catalog.item(id).map(|item| item.name.as_str()).unwrap_or(name);
    println!("{id}  {canonical}");

    if let Some(variant) = resolver.quick_charge_variant(name) {
        println!("{variant}  (Quick Charge variant)");
    }
    Ok(())
}

fn cmd_sources() -> Result<()> {
    let registry = AdapterRegistry::new();
    for adapter in registry.iter() {
        let roles = adapter.roles();
        if roles.is_empty() {
            println!("{:<12} {}", adapter.name(), adapter.site());
        } else {
            println!(
                "{:<12} {} (roles: {})",
                adapter.name(),
                adapter.site(),
                roles.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_cache(overrides: &CatalogOverrides) -> Result<CatalogCache> {
    let config = load_config()?;
    Ok(CatalogCache::from_config(&overrides.apply(&config))?)
}

/// Run `fut` behind a stderr spinner.
async fn with_spinner<T, F>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let out = fut.await;
    spinner.finish_and_clear();
    out
}
