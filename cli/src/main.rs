mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "notedown", version, about = "Convert markdown documents into Notion pages")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a markdown file and print the resulting page as JSON
    Convert(ConvertArgs),

    /// Convert a markdown file and create it as a Notion page
    Publish(PublishArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Markdown source file
    file: String,

    /// Dump the parsed node tree instead of converting
    #[arg(long)]
    tree: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Args)]
struct PublishArgs {
    /// Markdown source file
    file: String,

    /// Notion integration token
    #[arg(long, env = "NOTION_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// ID of the page the new page is created under
    #[arg(long, env = "NOTION_PARENT_PAGE_ID")]
    parent_page: Option<String>,

    /// TOML file supplying token/parent_page when flags and env are unset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Convert and resolve credentials, but skip the upload
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => do_convert(args, cli.no_color),
        Command::Publish(args) => do_publish(args, cli.no_color).await,
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn do_convert(args: ConvertArgs, no_color: bool) {
    let source = read_source(&args.file);

    if args.tree {
        println!("{:#?}", notedown::parser::parse_document(&source));
        return;
    }

    let page = convert(&args.file, &source, no_color);
    print_page(&page, args.compact);
}

async fn do_publish(args: PublishArgs, no_color: bool) {
    let source = read_source(&args.file);
    let page = convert(&args.file, &source, no_color);
    tracing::debug!(title = %page.title, blocks = page.blocks.len(), "document converted");

    let file_config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("error: {error}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let Some(token) = args.token.or(file_config.token) else {
        eprintln!("error: no token given (use --token, NOTION_API_TOKEN, or a config file)");
        process::exit(2);
    };
    let Some(parent_page) = args.parent_page.or(file_config.parent_page) else {
        eprintln!(
            "error: no parent page given (use --parent-page, NOTION_PARENT_PAGE_ID, or a config file)"
        );
        process::exit(2);
    };

    if args.dry_run {
        eprintln!(
            "dry run: would create '{}' ({} blocks) under page {}",
            page.title,
            page.blocks.len(),
            parent_page
        );
        print_page(&page, false);
        return;
    }

    let title = vec![notion::RichText::text(page.title.clone())];
    let client = match notion::Client::new(token) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(1);
        }
    };
    match client.create_page(&parent_page, &title, &page.blocks).await {
        Ok(created) => println!("created '{}': {}", page.title, created.url),
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(1);
        }
    }
}

fn read_source(file: &str) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read '{file}': {error}");
            process::exit(1);
        }
    }
}

/// Convert, or render a labelled diagnostic and exit.
fn convert(file: &str, source: &str, no_color: bool) -> notedown::Page {
    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.to_string());

    match notedown::parse_page(source) {
        Ok(page) => page,
        Err(error) => {
            let color_choice = if no_color {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            };
            let writer = StandardStream::stderr(color_choice);
            let term_config = term::Config::default();
            let diagnostic = error.to_diagnostic(file_id);
            let _ =
                term::emit_to_write_style(&mut writer.lock(), &term_config, &files, &diagnostic);
            process::exit(1);
        }
    }
}

fn print_page(page: &notedown::Page, compact: bool) {
    let value = json!({
        "title": page.title,
        "children": page.blocks,
    });
    let rendered = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    };
    match rendered {
        Ok(text) => println!("{text}"),
        Err(error) => {
            eprintln!("error: cannot serialize page: {error}");
            process::exit(1);
        }
    }
}
