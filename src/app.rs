use chrono::Local;
use std::path::{Path, PathBuf};

use crate::clock::Clock;
use crate::command::Command;
use crate::engine::Engine;
use crate::error::Result;
use crate::route::Route;
use crate::run::{RunDir, RunFile};
use crate::snapshot::Snapshot;

/// Ticks a footer message stays on screen.
const MESSAGE_TICKS: u32 = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
    ttl: u32,
}

/// One interactive session: the engine plus the files it reads and writes.
#[derive(Debug)]
pub struct App {
    pub engine: Engine,
    pub route: Route,
    pub run: RunFile,
    pub pb: RunFile,
    pub show_ids: bool,
    pub last_command: Option<Command>,
    message: Option<Message>,
    quit: bool,
}

impl App {
    pub fn new(route: Route, pb: RunFile, run: RunFile, clock: Clock) -> Self {
        let engine = Engine::load(&route, &run, clock);
        Self {
            engine,
            route,
            run,
            pb,
            show_ids: false,
            last_command: None,
            message: None,
            quit: false,
        }
    }

    /// Load the PB and the named run from `dir`. An explicit `route`
    /// replaces the one the PB points at.
    pub fn open(dir: &RunDir, run: Option<&str>, route: Option<&Path>, clock: Clock) -> Result<Self> {
        let pb = dir.open_pb(route)?;
        let run = dir.open_run(&pb, run)?;
        let route = match route {
            Some(path) => Route::load(path)?,
            None => run.load_route()?,
        };
        log::info!(
            "opened {} ({} segments) for {}",
            run.path.display(),
            route.len(),
            route.title()
        );
        Ok(Self::new(route, pb, run, clock))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Advance the clock. Returns whether anything on screen changed.
    pub fn on_tick(&mut self) -> bool {
        let mut dirty = self.engine.tick();
        if let Some(msg) = &mut self.message {
            msg.ttl = msg.ttl.saturating_sub(1);
            if msg.ttl == 0 {
                self.message = None;
                dirty = true;
            }
        }
        dirty
    }

    pub fn handle(&mut self, cmd: Command) {
        self.last_command = Some(cmd);
        match cmd {
            Command::Split => self.engine.split(),
            Command::Pause => self.engine.pause(),
            Command::Reset => self.engine.reset(),
            Command::Resume => self.engine.resume(),
            Command::ToggleIds => self.show_ids = !self.show_ids,
            Command::Quit => self.quit = true,
            Command::SaveRun => {
                let result = self.save_run();
                self.report(result, "run");
            }
            Command::SavePb => {
                let result = self.save_pb();
                self.report(result, "pb");
            }
            Command::SaveGolds => {
                let result = self.save_golds();
                self.report(result, "golds");
            }
        }
    }

    fn save_run(&mut self) -> Result<PathBuf> {
        self.run.segs = self.engine.save_run();
        touch(&mut self.run);
        self.run.save()?;
        Ok(self.run.path.clone())
    }

    fn save_pb(&mut self) -> Result<PathBuf> {
        self.pb.segs = self.engine.save_pb();
        // the pb date is when the reference was set, golds don't move it
        let now = Local::now();
        self.pb.created = Some(now);
        self.pb.updated = Some(now);
        self.pb.save()?;
        Ok(self.pb.path.clone())
    }

    fn save_golds(&mut self) -> Result<PathBuf> {
        self.engine.save_golds(&mut self.pb.segs);
        self.pb.updated = Some(Local::now());
        self.pb.save()?;
        Ok(self.pb.path.clone())
    }

    fn report(&mut self, result: Result<PathBuf>, what: &str) {
        let (text, is_error) = match result {
            Ok(path) => {
                log::info!("saved {what} to {}", path.display());
                (format!("saved {what} to {}", path.display()), false)
            }
            Err(e) => {
                log::error!("saving {what} failed: {e}");
                (format!("saving {what} failed: {e}"), true)
            }
        };
        self.message = Some(Message {
            text,
            is_error,
            ttl: MESSAGE_TICKS,
        });
    }
}

fn touch(run: &mut RunFile) {
    let now = Local::now();
    run.created.get_or_insert(now);
    run.updated = Some(now);
}
