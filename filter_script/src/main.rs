//! CLI entry point for filter_script.
//! Usage: cargo run -p filter_script -- format my.filter --out tidy.filter

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use filter_data::{BlockGroupTree, GroupId, Script};
use filter_script::{ScriptTranslator, SentinelPolicy, TranslatorSettings, contains_legacy_sentinels};
use log::info;

const DEFAULT_SETTINGS_FILE: &str = "filter_script.toml";

#[derive(Parser)]
#[command(author, version, about = "Parse, check and reformat loot filter scripts.")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Settings file (TOML). Defaults are used when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Remove sentinel lines left around disabled blocks by older tools.
    #[arg(long, global = true)]
    strip_legacy_sentinels: bool,
    /// Keep action-line comments as literal text instead of block group paths.
    #[arg(long, global = true)]
    no_block_groups: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and write it back in canonical form.
    Format {
        file: PathBuf,
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Parse a script and print a summary.
    Check { file: PathBuf },
    /// Print the block group tree with show/enabled states.
    Groups { file: PathBuf },
    /// Dump the parsed script as JSON.
    Inspect { file: PathBuf },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let translator = ScriptTranslator::new(load_settings(&cli.global)?);

    match cli.command {
        Commands::Format { file, out } => {
            let (_, script) = read_script(&translator, &file)?;
            let rendered = translator.render_script(&script);
            match out {
                Some(out) => {
                    fs::write(&out, rendered).with_context(|| format!("while writing '{}'", out.display()))?;
                    info!("wrote '{}'", out.display());
                },
                None => print!("{rendered}"),
            }
        },
        Commands::Check { file } => {
            let (text, script) = read_script(&translator, &file)?;
            print_summary(&file, &script);
            if contains_legacy_sentinels(&text) {
                eprintln!("warning: '{}' contains legacy disabled-block sentinels", file.display());
            }
        },
        Commands::Groups { file } => {
            let (_, script) = read_script(&translator, &file)?;
            print_group(&script.groups, script.groups.root(), 0);
        },
        Commands::Inspect { file } => {
            let (_, script) = read_script(&translator, &file)?;
            let json = serde_json::to_string_pretty(&script).context("while serializing script")?;
            println!("{json}");
        },
    }
    Ok(())
}

fn load_settings(global: &GlobalArgs) -> Result<TranslatorSettings> {
    let mut settings = TranslatorSettings::load(&global.config)
        .with_context(|| format!("while loading settings from '{}'", global.config.display()))?;
    if global.strip_legacy_sentinels {
        settings.legacy_sentinels = SentinelPolicy::Strip;
    }
    if global.no_block_groups {
        settings.block_groups_enabled = false;
    }
    Ok(settings)
}

fn read_script(translator: &ScriptTranslator, path: &Path) -> Result<(String, Script)> {
    let text = fs::read_to_string(path).with_context(|| format!("unable to read '{}'", path.display()))?;
    let script = translator
        .parse_script(&text)
        .with_context(|| format!("while parsing '{}'", path.display()))?;
    Ok((text, script))
}

fn print_summary(path: &Path, script: &Script) {
    let rules = script.rule_blocks().count();
    let disabled = script.rule_blocks().filter(|block| !block.enabled).count();
    let named_groups = script
        .groups
        .iter()
        .filter(|(id, group)| *id != script.groups.root() && !group.is_leaf_marker())
        .count();

    println!("{}", path.display());
    println!("  segments:         {}", script.segments.len());
    println!("  rule blocks:      {rules} ({disabled} disabled)");
    println!("  comment blocks:   {}", script.comment_blocks().count());
    println!("  block groups:     {named_groups}");
    println!("  theme components: {}", script.theme.len());
    for label in script.comment_blocks().filter_map(|comment| comment.section_label()) {
        println!("  section: {label}");
    }
}

/// One line per named group: `[show|enabled] name`, indented by depth.
fn print_group(tree: &BlockGroupTree, id: GroupId, depth: usize) {
    let group = &tree[id];
    let marker = if group.advanced { "~" } else { "" };
    println!("{}[{}|{}] {marker}{}", "  ".repeat(depth), group.show, group.enabled, group.name);
    for child in tree.named_children(id) {
        print_group(tree, child, depth + 1);
    }
}
