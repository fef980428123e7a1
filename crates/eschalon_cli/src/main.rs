use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use eschalon_core::core_api::Engine;
use eschalon_core::fx::FxPreset;
use eschalon_render::{
    JsonStyle, TextRenderOptions, render_json_full_with_options, render_layout,
    render_summary_with_options,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVEFILE")]
    path: PathBuf,
    /// Print a summary of the character.
    #[arg(short, long)]
    list: bool,
    /// With --list, also dump the fields the editor does not interpret.
    /// Ignored otherwise.
    #[arg(short, long)]
    unknowns: bool,
    /// With --list, print JSON instead of text.
    #[arg(long, requires = "list")]
    json: bool,
    /// Print the byte range of every section of the file.
    #[arg(long)]
    layout: bool,
    /// Set a character field, e.g. --set gold=500. Repeatable.
    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        value_parser = parse_assignment,
        allow_hyphen_values = true
    )]
    set: Vec<(String, String)>,
    /// Replace the avatar effect block.
    #[arg(
        long = "fx-preset",
        value_name = "ordinary|torch|gravedigger|torch-gravedigger",
        value_parser = parse_fx_preset
    )]
    fx_preset: Option<FxPreset>,
    /// Write the (edited) save here.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Log more on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = match e.kind() {
            ErrorKind::DisplayVersion => 0,
            _ => 2,
        };
        let _ = e.print();
        process::exit(code);
    });
    init_logging(cli.verbose);

    let has_edits = !cli.set.is_empty() || cli.fx_preset.is_some();
    if has_edits && cli.output.is_none() {
        eprintln!("--set and --fx-preset require --output <PATH>");
        process::exit(2);
    }
    if !cli.list && !cli.layout && cli.output.is_none() {
        eprintln!(
            "no graphical editor in this build; use --list, --layout, or edits with --output"
        );
        process::exit(1);
    }

    let mut session = Engine::new().open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading save file: {}", cli.path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    for (key, value) in &cli.set {
        session.set_field_text(key, value).unwrap_or_else(|e| {
            eprintln!("Error applying {key}={value}: {e}");
            process::exit(1);
        });
    }
    if let Some(preset) = cli.fx_preset {
        session.set_fx_preset(preset);
    }

    if cli.layout {
        print!("{}", render_layout(session.layout()));
    }

    if cli.list {
        let options = TextRenderOptions {
            unknowns: cli.unknowns,
        };
        if cli.json {
            let json = render_json_full_with_options(&session, JsonStyle::CanonicalV1, options);
            let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
            println!("{rendered}");
        } else {
            print!("{}", render_summary_with_options(&session, options));
        }
    }

    if let Some(out_path) = &cli.output {
        session.save_atomic(out_path).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        eprintln!("Wrote save to {}", out_path.display());
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(format!("invalid edit '{value}', expected KEY=VALUE")),
    }
}

fn parse_fx_preset(value: &str) -> Result<FxPreset, String> {
    FxPreset::from_key(value).ok_or_else(|| {
        format!(
            "invalid fx preset '{value}', expected one of: ordinary, torch, gravedigger, torch-gravedigger"
        )
    })
}
