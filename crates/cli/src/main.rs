use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tagrename_core::{
    app_paths, apply_plan, distinct_tags, extract_tags, generate_plan, load_config,
    parse_tag_group, save_config, AppConfig, CapturePolicy, PlanOptions, RenamePlan, TagKind,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tagrename")]
#[command(about = "Rename photos from a template of EXIF and file tags")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    /// Show how a template is tokenized
    Tags(TagsArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// Write a config file holding the defaults
    Init {
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(long, default_value = ".")]
    workdir: PathBuf,
    /// Regular expression matched against each file path
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    template: Option<String>,
    #[arg(long, default_value_t = false, overrides_with = "no_recursive")]
    recursive: bool,
    /// Stay in the working directory even if the config enables recursion
    #[arg(long, default_value_t = false, overrides_with = "recursive")]
    no_recursive: bool,
    #[arg(long, default_value_t = false)]
    apply: bool,
    /// Render files with no readable capture time instead of stopping
    #[arg(long, default_value_t = false)]
    continue_on_missing_capture: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct TagsArgs {
    #[arg(long)]
    template: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Tags(args) => cmd_tags(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init { force } => cmd_config_init(force),
        },
    }
}

impl RenameArgs {
    /// `None` leaves the config value in charge.
    fn recursive_override(&self) -> Option<bool> {
        if self.recursive {
            Some(true)
        } else if self.no_recursive {
            Some(false)
        } else {
            None
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;

    let recursive = args.recursive_override().unwrap_or(config.recursive);
    let mut render = config.render_config();
    if let Some(template) = args.template {
        render.template = template;
    }
    if args.continue_on_missing_capture {
        render.capture_policy = CapturePolicy::Continue;
    }

    let options = PlanOptions {
        workdir: args.workdir,
        filter: args.filter.unwrap_or(config.filter),
        recursive,
        render,
    };

    let plan = generate_plan(&options)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.apply {
        let result = apply_plan(&plan)?;
        eprintln!(
            "renamed {} file(s), {} unchanged",
            result.applied, result.unchanged
        );
    } else {
        eprintln!("dry run: no files were changed. Pass --apply to rename.");
    }

    Ok(())
}

fn cmd_tags(args: TagsArgs) -> Result<()> {
    let template = match args.template {
        Some(template) => template,
        None => load_config()?.template,
    };

    for tag in distinct_tags(extract_tags(&template)) {
        println!("{{{tag}}}");
        for alternative in parse_tag_group(&tag) {
            let resolved_by = match alternative.kind() {
                TagKind::File(file_tag) => format!("file {file_tag:?}"),
                TagKind::Metadata { field, property } => {
                    format!("metadata {field} ({property:?})")
                }
            };
            println!("  {} -> {}", alternative.name, resolved_by);
        }
    }
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init(force: bool) -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() && !force {
        anyhow::bail!(
            "config file already exists: {} (pass --force to overwrite)",
            paths.config_path.display()
        );
    }
    save_config(&AppConfig::default())?;
    println!("config directory: {}", paths.config_dir.display());
    println!("wrote {}", paths.config_path.display());
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    for entry in &plan.entries {
        println!("{} => {}", entry.from.display(), entry.to.display());
    }

    let changed = plan.entries.iter().filter(|e| e.changed()).count();
    println!(
        "\ntotal={} changed={} unchanged={}",
        plan.entries.len(),
        changed,
        plan.entries.len() - changed
    );
}
