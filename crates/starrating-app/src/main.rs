//! Main application entry point (native).

#[cfg(feature = "native")]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use starrating_app::{ScriptError, Session, load_script, load_theme};

    /// Replay a star rating script and print the widget state after each step.
    #[derive(Debug, Parser)]
    #[command(name = "starrating", version, about)]
    pub struct Cli {
        /// JSON script of steps to replay.
        pub script: PathBuf,

        /// JSON theme file overriding the default colors.
        #[arg(long)]
        pub theme: Option<PathBuf>,

        /// Include per-star paint summaries in each report.
        #[arg(long)]
        pub paint: bool,

        /// Pretty-print the reports as one JSON array.
        #[arg(long)]
        pub pretty: bool,
    }

    pub fn run(cli: &Cli) -> Result<(), ScriptError> {
        let theme = load_theme(cli.theme.as_deref())?;
        let steps = load_script(&cli.script)?;
        log::info!("Replaying {} steps from {}", steps.len(), cli.script.display());

        let mut session = Session::new(theme).with_paint(cli.paint);
        let reports = session.run(&steps)?;

        if cli.pretty {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }

        if session.active_key_listeners() > 0 {
            log::warn!(
                "{} key listener(s) still attached at end of script",
                session.active_key_listeners()
            );
        }
        Ok(())
    }
}

#[cfg(feature = "native")]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Starting starrating");

    let cli = cli::Cli::parse();
    if let Err(e) = cli::run(&cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
    std::process::exit(1);
}
