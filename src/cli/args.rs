//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use reloader_client::ReloadSignal;

/// Live-reload client for Server-sent events
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: nearest reloader.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render the client script for an event stream endpoint
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Print one reload signal as a text/event-stream frame
    #[command(visible_alias = "s")]
    Signal {
        #[command(flatten)]
        args: SignalArgs,
    },

    /// Feed a captured event stream to an in-memory page
    #[command(visible_alias = "r")]
    Replay {
        #[command(flatten)]
        args: ReplayArgs,
    },
}

/// Generate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Endpoint serving the event stream (absolute URL or path).
    /// Falls back to `[client] url` when omitted.
    #[arg(value_name = "URL", value_hint = clap::ValueHint::Url)]
    pub urls: Vec<String>,

    /// Emit the readable script instead of the minified one
    #[arg(short, long, conflicts_with = "minify")]
    pub readable: bool,

    /// Emit the minified script (default)
    #[arg(short, long)]
    pub minify: bool,

    /// Write the script to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Signal command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SignalArgs {
    /// Which signal to send
    #[arg(value_enum)]
    pub kind: SignalKind,

    /// Event id of the frame
    #[arg(short, long)]
    pub id: String,

    /// Reconnect delay in milliseconds (0 omits the field)
    #[arg(short, long)]
    pub retry: Option<u32>,
}

/// Replay command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Captured text/event-stream body. Use `-` or omit to read stdin.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Page location the stream is replayed against
    #[arg(short, long, default_value = "http://localhost/", value_hint = clap::ValueHint::Url)]
    pub page: String,

    /// Stylesheet `<link>` href on the page (repeatable)
    #[arg(short, long = "stylesheet", value_name = "HREF")]
    pub stylesheets: Vec<String>,

    /// Print one JSON object per message
    #[arg(short, long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Full document reload
    Reload,
    /// Stylesheet reload
    Css,
}

impl From<SignalKind> for ReloadSignal {
    fn from(kind: SignalKind) -> Self {
        match kind {
            SignalKind::Reload => Self::DocumentReload,
            SignalKind::Css => Self::StyleReload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_and_verbose_flags_coexist() {
        let err = Cli::try_parse_from(["reloader-client", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::try_parse_from(["reloader-client", "generate", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from(["reloader-client", "g", "/sse", "--readable"]).unwrap();
        let Commands::Generate { args } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.urls, ["/sse"]);
        assert!(args.readable);
        assert!(!args.minify);
    }

    #[test]
    fn test_readable_conflicts_with_minify() {
        let result = Cli::try_parse_from(["reloader-client", "generate", "--readable", "--minify"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_signal() {
        let cli =
            Cli::try_parse_from(["reloader-client", "-v", "signal", "css", "--id", "7"]).unwrap();
        assert!(cli.verbose);
        let Commands::Signal { args } = cli.command else {
            panic!("expected signal");
        };
        assert_eq!(ReloadSignal::from(args.kind), ReloadSignal::StyleReload);
        assert_eq!(args.id, "7");
        assert_eq!(args.retry, None);
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "reloader-client",
            "replay",
            "events.txt",
            "-s",
            "/style.css",
            "-s",
            "/theme.css",
            "--json",
        ])
        .unwrap();
        let Commands::Replay { args } = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.input, Some(PathBuf::from("events.txt")));
        assert_eq!(args.page, "http://localhost/");
        assert_eq!(args.stylesheets.len(), 2);
        assert!(args.json);
    }
}
