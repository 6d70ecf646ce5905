use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::error;

use mdsite::Config;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static site from Markdown content")]
struct Cli {
    /// Log every copied file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy static assets and render every Markdown page through the template
    Build {
        /// Site config file
        #[arg(short, long, default_value = "mdsite.toml")]
        config: PathBuf,

        /// Static asset directory
        #[arg(long = "static")]
        static_dir: Option<PathBuf>,

        /// Markdown content directory
        #[arg(long)]
        content: Option<PathBuf>,

        /// HTML template with {{ Title }} and {{ Content }} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep existing output instead of deleting it first
        #[arg(long)]
        no_clean: bool,

        /// Stop at the first page that fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Convert a single Markdown file to an HTML fragment
    Render {
        /// Input Markdown file
        input: PathBuf,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but some pages failed.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Build {
            config,
            static_dir,
            content,
            template,
            output,
            no_clean,
            fail_fast,
        } => {
            let mut config = Config::load(&config)?;
            if let Some(dir) = static_dir {
                config.paths.static_dir = dir;
            }
            if let Some(dir) = content {
                config.paths.content_dir = dir;
            }
            if let Some(path) = template {
                config.paths.template = path;
            }
            if let Some(dir) = output {
                config.paths.output_dir = dir;
            }
            if no_clean {
                config.build.clean = false;
            }
            if fail_fast {
                config.build.fail_fast = true;
            }
            build(&config)
        }
        Command::Render { input, output } => {
            render(&input, output.as_deref())?;
            Ok(true)
        }
    }
}

fn build(config: &Config) -> Result<bool> {
    let report = mdsite::build_site(config).context("Site build failed")?;

    for failure in &report.failures {
        error!("{}: {}", failure.source_path.display(), failure.error);
    }
    println!(
        "Generated {} pages and copied {} files into {}",
        report.pages.len(),
        report.copied,
        config.paths.output_dir.display()
    );
    if !report.is_success() {
        println!("{} pages failed", report.failures.len());
    }

    Ok(report.is_success())
}

fn render(input: &Path, output: Option<&Path>) -> Result<()> {
    let markdown = fs::read_to_string(input)
        .with_context(|| format!("Error reading {}", input.display()))?;

    let html = mdsite::markdown_to_html(&markdown)
        .with_context(|| format!("Error converting {}", input.display()))?;

    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Error writing {}", path.display()))?;
            println!("Created {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}
