//! # slackpack CLI
//!
//! Command-line interface for the slackpack library.

use std::path::Path;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use slackpack::SlackpackError;
use slackpack::cli::Args;
use slackpack::format::{to_format, write_to_format};
use slackpack::reader::ExportReader;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), SlackpackError> {
    let reader = ExportReader::open(Path::new(&args.input))?;

    if args.list_channels {
        for channel in reader.channels() {
            let marker = if channel.is_archived { "  [archived]" } else { "" };
            println!("{}  ({}){}", channel.name, channel.id, marker);
        }
        return Ok(());
    }

    let Some(channel) = args.channel.as_deref() else {
        return Err(SlackpackError::invalid_format("arguments", "missing channel name"));
    };

    let config = args.render_config();
    config.validate()?;

    let messages = reader.read_channel(channel)?;
    let format = args.resolve_format();

    match &args.output {
        Some(path) => {
            write_to_format(&messages, reader.users(), path, format, &config)?;
            let replies: usize = messages.iter().map(|m| m.reply_count()).sum();
            println!(
                "✅ Wrote {} threads ({} replies) from #{} as {} to {}",
                messages.len(),
                replies,
                channel,
                format,
                path
            );
        }
        None => print!("{}", to_format(&messages, reader.users(), format, &config)?),
    }

    Ok(())
}
