//! mdpress - Main Entry Point
//!
//! Renders Markdown documents into restructured HTML pages.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use mdpress::config::{init_config, load_config};
use mdpress::error::{Error, Result};
use mdpress::export::{export_to_html_file, ExportOptions};
use mdpress::files::{collect_markdown_files, output_path};
use mdpress::headline::parse_headline;
use mdpress::Processor;

/// Application name constant.
const APP_NAME: &str = "mdpress";

#[derive(Parser)]
#[command(name = "mdpress")]
#[command(about = "Restructure Markdown into sectioned HTML pages", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render Markdown files or directories to HTML
    Render {
        /// Files or directories to render
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Directory to write pages into (default: next to each source)
        #[arg(long, short = 'o', value_name = "OUT")]
        out: Option<PathBuf>,

        /// Site configuration file (JSON, TOML or YAML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the `main` element only
        #[arg(long)]
        fragment: bool,
    },

    /// Print the declaration parsed from a headline as JSON
    Parse {
        /// Headline text, e.g. `mdp-image .wide src=cat.png`
        #[arg(value_name = "LINE", required = true, num_args = 1..)]
        line: Vec<String>,
    },

    /// Write a default site configuration file
    Init {
        /// Where to write it (default: the user configuration directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the section outline of a Markdown file
    Outline {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Site configuration file (JSON, TOML or YAML)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Render {
            paths,
            out,
            config,
            fragment,
        } => {
            info!("Starting {}", APP_NAME);
            let processor = Processor::new(load_config(config.as_deref()));
            let options = if fragment {
                ExportOptions::fragment()
            } else {
                ExportOptions::page()
            };

            let sources = collect_markdown_files(&paths);
            if sources.is_empty() {
                return Err(Error::Application("No Markdown files found".to_string()));
            }

            let mut failed = 0;
            for source in &sources {
                let target = output_path(source, out.as_deref());
                if let Err(e) = export_to_html_file(&source.path, &target, &processor, &options) {
                    error!("{}", e);
                    failed += 1;
                }
            }

            info!("Rendered {} of {} files", sources.len() - failed, sources.len());
            if failed > 0 {
                return Err(Error::Application(format!("{} files failed to render", failed)));
            }
            Ok(())
        }
        Command::Parse { line } => {
            let declaration = parse_headline(&line.join(" "));
            let json = serde_json::to_string_pretty(&declaration)?;
            println!("{}", json);
            Ok(())
        }
        Command::Init { path, force } => {
            let written = init_config(path.as_deref(), force)?;
            info!("Wrote default configuration to {}", written.display());
            Ok(())
        }
        Command::Outline { file, config } => {
            let processor = Processor::new(load_config(config.as_deref()));
            let doc = processor.process_file(&file)?;
            for entry in doc.outline() {
                let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                println!("{}{}  {}", indent, entry.data_id, entry.title);
            }
            Ok(())
        }
    }
}
