use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use offsplit::{
    app_dirs::AppDirs,
    clock::Clock,
    command::Command,
    config::{Config, ConfigStore, FileConfigStore},
    leaderboard,
    route::Route,
    run::{RunDir, RunFile},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, SplitEvent, Ticker},
    util::format_time,
    App,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::PathBuf,
    process::ExitCode,
};

/// terminal split timer with personal-best and gold segment tracking
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Times an attempt segment by segment against your personal best, tracks the best time ever done for every segment, and ranks saved runs."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Cmd {
    /// time an attempt against the pb stored in RUN_DIR
    Run {
        /// directory holding pb.json and saved attempts
        run_dir: PathBuf,

        /// attempt to open or create, defaults to the current time
        run: Option<String>,

        /// route to create pb.json from, or to use instead of the pb's own
        #[clap(short, long)]
        route: Option<PathBuf>,

        /// clock granularity in milliseconds
        #[clap(long)]
        tick_ms: Option<u64>,
    },

    /// list the routes found under DIR
    Routes { dir: Option<PathBuf> },

    /// list the attempts saved in RUN_DIR, oldest update first
    Runs { run_dir: PathBuf },

    /// rank saved runs by total time, grouped by route
    Leaderboard {
        #[clap(default_value = "runs")]
        dir: PathBuf,

        /// print csv instead of a table
        #[clap(long)]
        csv: bool,
    },

    /// copy every gold from RUN into PB that beats the one PB has
    CopyGolds { pb: PathBuf, run: PathBuf },
}

fn init_logging(cfg: &Config, to_file: bool) {
    let env = env_logger::Env::default().default_filter_or(cfg.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    // the terminal belongs to the tui while it runs
    if to_file {
        let Some(path) = AppDirs::log_path() else {
            return;
        };
        if let Some(dir) = path.parent() {
            if std::fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
            return;
        };
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let store = FileConfigStore::new();
    let cfg = store.load();

    match run(cli, cfg, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("offsplit: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mut cfg: Config, store: &FileConfigStore) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Cmd::Run {
            run_dir,
            run,
            route,
            tick_ms,
        } => {
            init_logging(&cfg, true);
            log::debug!("config from {}: {cfg:?}", store.path().display());
            if let Some(ms) = tick_ms {
                cfg.tick_ms = ms;
            }
            let tick = cfg.tick();

            let mut app = App::open(
                &RunDir::new(run_dir),
                run.as_deref(),
                route.as_deref(),
                Clock::new(tick),
            )?;
            app.show_ids = cfg.show_ids;

            if !stdin().is_tty() {
                return Err(offsplit::Error::NotATty.into());
            }
            run_tui(&mut app, tick)
        }
        Cmd::Routes { dir } => {
            init_logging(&cfg, false);
            let dir = dir.unwrap_or(cfg.routes_dir);
            for route in Route::discover(&dir) {
                println!(
                    "{}\t{}\t{} segments",
                    route.path.display(),
                    route.title(),
                    route.len()
                );
            }
            Ok(())
        }
        Cmd::Runs { run_dir } => {
            init_logging(&cfg, false);
            for run in RunDir::new(run_dir).runs() {
                let updated = run
                    .updated
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let total = run.total().map(format_time).unwrap_or_else(|| "-".to_string());
                println!("{}\t{updated}\t{total}", run.name());
            }
            Ok(())
        }
        Cmd::Leaderboard { dir, csv } => {
            init_logging(&cfg, false);
            let boards = leaderboard::collect(&dir);
            if csv {
                leaderboard::write_csv(&boards, io::stdout().lock())?;
            } else {
                leaderboard::write_text(&boards, io::stdout().lock())?;
            }
            Ok(())
        }
        Cmd::CopyGolds { pb, run } => {
            init_logging(&cfg, false);
            let mut pb = RunFile::load(pb)?;
            let run = RunFile::load(run)?;
            let improved = pb.copy_golds(&run);
            pb.save()?;
            println!("{improved} golds improved in {}", pb.path.display());
            Ok(())
        }
    }
}

fn run_tui(app: &mut App, tick: std::time::Duration) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));
    let result = start_tui(&mut terminal, app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        let redraw = match runner.step() {
            SplitEvent::Tick => app.on_tick(),
            SplitEvent::Resize => true,
            SplitEvent::Key(key) => match Command::from_key(key) {
                Some(cmd) => {
                    app.handle(cmd);
                    true
                }
                None => false,
            },
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use offsplit::{engine::EngineState, runtime::TestEventSource, segment::SegmentDef};
    use ratatui::backend::TestBackend;
    use std::{sync::mpsc, time::Duration};

    #[test]
    fn test_cli_run_defaults() {
        let cli = Cli::parse_from(["offsplit", "run", "runs/me"]);
        assert_eq!(
            cli.command,
            Cmd::Run {
                run_dir: PathBuf::from("runs/me"),
                run: None,
                route: None,
                tick_ms: None,
            }
        );
    }

    #[test]
    fn test_cli_run_with_options() {
        let cli = Cli::parse_from([
            "offsplit",
            "run",
            "runs/me",
            "tuesday",
            "--route",
            "routes/any.json",
            "--tick-ms",
            "50",
        ]);
        assert_eq!(
            cli.command,
            Cmd::Run {
                run_dir: PathBuf::from("runs/me"),
                run: Some("tuesday".to_string()),
                route: Some(PathBuf::from("routes/any.json")),
                tick_ms: Some(50),
            }
        );

        let cli = Cli::parse_from(["offsplit", "run", "runs/me", "-r", "r.json"]);
        assert!(matches!(cli.command, Cmd::Run { route: Some(_), .. }));
    }

    #[test]
    fn test_cli_leaderboard_and_routes() {
        let cli = Cli::parse_from(["offsplit", "leaderboard"]);
        assert_eq!(
            cli.command,
            Cmd::Leaderboard {
                dir: PathBuf::from("runs"),
                csv: false
            }
        );

        let cli = Cli::parse_from(["offsplit", "leaderboard", "all", "--csv"]);
        assert!(matches!(cli.command, Cmd::Leaderboard { csv: true, .. }));

        let cli = Cli::parse_from(["offsplit", "routes"]);
        assert_eq!(cli.command, Cmd::Routes { dir: None });

        let cli = Cli::parse_from(["offsplit", "runs", "runs/me"]);
        assert_eq!(
            cli.command,
            Cmd::Runs {
                run_dir: PathBuf::from("runs/me")
            }
        );
    }

    #[test]
    fn test_cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["offsplit"]).is_err());
        assert!(Cli::try_parse_from(["offsplit", "run"]).is_err());
        assert!(Cli::try_parse_from(["offsplit", "run", "d", "--tick-ms", "x"]).is_err());
    }

    #[test]
    fn test_start_tui_drives_app_until_quit() {
        let route = Route::new("g", "n", vec![SegmentDef::new("a", "A"), SegmentDef::new("b", "B")]);
        let pb = RunFile::from_route("pb.json", &route);
        let run = RunFile::from_route("run.json", &route);
        let mut app = App::new(route, pb, run, Clock::new(Duration::from_millis(1)));

        let (tx, rx) = mpsc::channel();
        let key = |code| SplitEvent::Key(KeyEvent::new(code, KeyModifiers::NONE));
        tx.send(key(KeyCode::Enter)).unwrap();
        tx.send(key(KeyCode::Enter)).unwrap();
        tx.send(key(KeyCode::Char('x'))).unwrap();
        tx.send(key(KeyCode::Char('q'))).unwrap();

        let mut runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(50)),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &mut runner).unwrap();

        assert!(app.should_quit());
        assert_eq!(app.engine.current_index(), Some(1));
        assert_eq!(app.engine.state(), EngineState::Running);
    }
}
