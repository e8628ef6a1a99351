//! Command-line front end for the Codepad execution core
//!
//! Runs a source file through the same router the browser playground uses
//! and renders the canonical output on the terminal with the shared
//! reconciliation rules, or lists the available starter templates.

use anyhow::Result;
use clap::{Parser, Subcommand};
use codepad_core::output::{RenderDirective, TerminalReconciler};
use codepad_core::router::RunOutcome;
use codepad_core::{EditorSession, LanguageId, PlaygroundConfig, TemplateId};
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "codepad", author, version, about = "Codepad - run playground code from the terminal")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        default_value = "codepad.yaml",
        help = "Configuration file path; missing files fall back to environment-only configuration"
    )]
    config: String,

    #[clap(long, short, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a source file and print the execution output
    Run {
        /// Source file to run
        file: PathBuf,

        #[clap(long, help = "Language override; inferred from the file extension otherwise")]
        language: Option<String>,

        #[clap(long, help = "Stream simulated output chunk by chunk")]
        stream: bool,
    },
    /// List the available starter templates
    Templates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Warn);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    match cli.command {
        Commands::Run {
            file,
            language,
            stream,
        } => run_file(&cli.config, file, language, stream).await,
        Commands::Templates => {
            list_templates();
            Ok(())
        }
    }
}

fn list_templates() {
    for descriptor in codepad_core::templates::describe_all() {
        println!(
            "{:<12} {:<12} {:?}",
            descriptor.id, descriptor.display_name, descriptor.kind
        );
    }
}

async fn run_file(
    config_path: &str,
    file: PathBuf,
    language: Option<String>,
    stream: bool,
) -> Result<()> {
    let source = std::fs::read_to_string(&file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;

    let language = match language {
        Some(language) => language.parse::<LanguageId>()?,
        None => file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageId::from_extension)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Could not infer a language from {}; pass --language",
                    file.display()
                )
            })?,
    };

    let mut config = PlaygroundConfig::resolve(Some(config_path))?;
    if stream {
        config.simulator.streaming = true;
    }

    let template = template_for_language(language);
    let mut session = EditorSession::new(template, config);
    session.set_source(source);

    // Render output updates as they arrive, the same way the browser
    // terminal reconciles against the generation key.
    let mut rx = session.router().subscribe();
    let printer = tokio::spawn(async move {
        let mut reconciler = TerminalReconciler::new();
        let mut rendered = String::new();
        while rx.changed().await.is_ok() {
            let update = rx.borrow_and_update().clone();
            match reconciler.reconcile(&update) {
                RenderDirective::ClearAndWrite(content) => {
                    print!("{}", content);
                    rendered = content;
                }
                RenderDirective::Rewrite(content) => {
                    match content.strip_prefix(rendered.as_str()) {
                        Some(suffix) => print!("{}", suffix),
                        None => print!("\n{}", content),
                    }
                    rendered = content;
                }
                RenderDirective::Skip => {}
            }
            let _ = std::io::stdout().flush();
        }
    });

    let outcome = session.run().await;
    let preview = session.preview();
    drop(session);
    let _ = printer.await;
    println!();

    match outcome {
        Ok(RunOutcome::Completed { .. }) => Ok(()),
        Ok(RunOutcome::PreviewRefreshed { .. }) => {
            if let Some(codepad_core::preview::PreviewDocument::Document { html }) = preview {
                println!("{}", html);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn template_for_language(language: LanguageId) -> TemplateId {
    match language {
        LanguageId::Javascript => TemplateId::Javascript,
        LanguageId::Python => TemplateId::Python,
        LanguageId::Java => TemplateId::Java,
        LanguageId::Go => TemplateId::Go,
        LanguageId::Csharp => TemplateId::Csharp,
        // Standalone documents preview as-is, like the vue template.
        LanguageId::Html => TemplateId::Vue,
    }
}
