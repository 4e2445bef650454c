use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};

mod args;
mod config;
mod console;
mod datetime;
mod duration;
mod error;
mod generate_command;
mod generator;
mod invoice;
mod logger;
mod preview_command;
mod time_entry;

use console::ConsoleMarkdownList;
use generate_command::{GenerateArgs, GenerateCommand, GenerateOutcome};
use generator::InvoiceGeneratorClient;
use preview_command::{preview_command, PreviewArgs};

/// 生成APIがinvoiceの生成を拒否したときの終了コード。
const EXIT_REJECTED: u8 = 2;

/// Clockifyのtime entryからinvoiceを生成するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- preview -c config.json
/// $ cargo run -- generate -c config.json -o invoice.pdf
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(short = 'v', long = "verbose", global = true, help = "Show debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Submit the invoice to the generator and write the document
    Generate(GenerateArgs),
    /// Print the line items without submitting anything
    Preview(PreviewArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // loggerが使えないのでstderrへ直接出力する
    if let Err(err) = logger::setup_logger(args.verbose) {
        eprintln!("{:?}", err);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{:?}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    match args.subcommand {
        SubCommands::Generate(generate) => {
            let config = generate.invoice.load_config()?;
            let client = InvoiceGeneratorClient::new(&config.generator_url, config.retries);
            let command = GenerateCommand::new(&client);
            match command.run(&config).await? {
                GenerateOutcome::Written { path, size } => {
                    info!(
                        "Invoice generated successfully: {} ({} bytes)",
                        path.display(),
                        size
                    );
                }
                GenerateOutcome::Rejected { .. } => return Ok(ExitCode::from(EXIT_REJECTED)),
            }
        }
        SubCommands::Preview(preview) => {
            let config = preview.invoice.load_config()?;
            let mut stdout = io::stdout();
            let mut presenter = ConsoleMarkdownList::new(&mut stdout);
            preview_command(&config, &mut presenter)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
