//! tikstalk - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::Term;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use tikstalk::{
    cli::{Args, Command},
    config::{default_config_path, reload::POLL_INTERVAL, validate_config, watch_config, Config},
    dedup::SeenSetStore,
    download::{CycleRunner, DownloadSpec, EventSink, Worker, PROGRESS_TARGET},
    error::{exit_codes, DownloadError, Error, Result},
    output::{
        create_spinner, print_banner, print_config_summary, print_cycle_summary, print_error,
        print_info, print_monitor_stats, print_success, print_tool_check, print_warning,
        render_events,
    },
    tools::{Ffmpeg, Toolset, YtDlp},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging; progress lines are printed by the spinner instead
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}=off", log_level, PROGRESS_TARGET)));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.overrides.merge_into_config(&mut config);
    if let Command::Monitor {
        interval: Some(minutes),
    } = args.command
    {
        config.options.check_interval_minutes = minutes;
    }

    match args.command {
        Command::Check => check_tools(&config).await,
        Command::Reset { yes } => reset_history(&config, yes),
        Command::Download => {
            validate_config(&config)?;
            let session = start_session(&config)?;
            download_once(session).await
        }
        Command::Monitor { .. } => {
            validate_config(&config)?;
            let session = start_session(&config)?;
            let overrides = args.overrides.clone();
            let adjust = move |config: &mut Config| overrides.merge_into_config(config);
            monitor(session, &config, config_path, adjust).await
        }
    }
}

/// A worker plus the task rendering its progress events.
struct Session {
    worker: Worker,
    renderer: tokio::task::JoinHandle<()>,
}

fn start_session(config: &Config) -> Result<Session> {
    let store = SeenSetStore::new(config.state_path());
    let stored = store.load_state();

    let destination = config.download_directory(stored.download_folder.as_deref());
    let spec = DownloadSpec::from_config(config, destination)?;
    print_config_summary(
        &spec,
        &config.options.quality.to_string(),
        &config.options.conversion.to_string(),
    );

    let (events, rx) = EventSink::channel();
    let renderer = tokio::spawn(render_events(rx, create_spinner("Starting...")));
    events.count(stored.seen.len());

    let tools = Toolset::external(
        YtDlp::new(&config.tools.yt_dlp),
        Ffmpeg::new(&config.tools.ffmpeg),
    );
    let runner = CycleRunner::new(tools, store, stored.seen, events);

    Ok(Session {
        worker: Worker::new(runner, spec),
        renderer,
    })
}

async fn download_once(session: Session) -> Result<()> {
    let Session {
        mut worker,
        renderer,
    } = session;

    let result = worker.download_now().await;
    let seen_total = worker.seen_count().unwrap_or_default();
    worker.shutdown().await?;
    let _ = renderer.await;

    let summary = result?;
    print_cycle_summary(&summary, seen_total);

    if summary.attempted > 0 && summary.succeeded == 0 {
        return Err(Error::Download(DownloadError::tool_failure(format!(
            "all {} downloads failed",
            summary.attempted
        ))));
    }

    Ok(())
}

async fn monitor<F>(session: Session, config: &Config, config_path: PathBuf, adjust: F) -> Result<()>
where
    F: Fn(&mut Config) + Send + 'static,
{
    let Session {
        mut worker,
        renderer,
    } = session;

    let account = worker.spec().account;
    worker.start_monitoring(&account, config.options.check_interval_minutes)?;

    // Config edits are applied at the start of the next cycle
    let reload_cancel = CancellationToken::new();
    let reload = tokio::spawn(watch_config(
        config_path,
        worker.spec_sender(),
        reload_cancel.clone(),
        POLL_INTERVAL,
        adjust,
    ));

    let interrupted = tokio::signal::ctrl_c().await;

    reload_cancel.cancel();
    let _ = reload.await;

    let stats = worker.shutdown().await?;
    let _ = renderer.await;

    interrupted?;
    if let Some(stats) = stats {
        print_monitor_stats(&stats);
    }

    Ok(())
}

fn reset_history(config: &Config, confirmed: bool) -> Result<()> {
    let store = SeenSetStore::new(config.state_path());
    let stored = store.load_state();

    let confirmed = confirmed
        || confirm(&format!(
            "Forget {} downloaded videos? They will be downloaded again. [y/N] ",
            stored.seen.len()
        ))?;
    if !confirmed {
        return Err(Error::ResetNotConfirmed);
    }

    let folder = config.download_directory(stored.download_folder.as_deref());
    store.save(&store.reset(), &folder)?;
    print_success("Download history reset");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(prompt)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn check_tools(config: &Config) -> Result<()> {
    print_info("Checking external tools...");

    let yt_dlp = YtDlp::new(&config.tools.yt_dlp)
        .version()
        .await
        .map_err(|e| e.to_string());
    print_tool_check("yt-dlp", &yt_dlp);

    let ffmpeg = Ffmpeg::new(&config.tools.ffmpeg)
        .version()
        .await
        .map_err(|e| e.to_string());
    print_tool_check("ffmpeg", &ffmpeg);

    if yt_dlp.is_err() {
        return Err(Error::Config(format!(
            "yt-dlp is required; install it or set [tools] yt_dlp ({})",
            config.tools.yt_dlp.display()
        )));
    }

    if ffmpeg.is_err() {
        if config.options.conversion.profile().is_some() {
            return Err(Error::Config(format!(
                "ffmpeg is required for conversion preset '{}'",
                config.options.conversion
            )));
        }
        print_warning("ffmpeg not found; conversion presets will not work");
    }

    Ok(())
}
