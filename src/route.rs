use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::segment::SegmentDef;

/// An ordered list of segments, fixed for the length of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Route {
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub name: String,
    // older route files call the list `route`
    #[serde(alias = "route")]
    pub segments: Vec<SegmentDef>,
}

impl Route {
    pub fn new(game: impl Into<String>, name: impl Into<String>, segments: Vec<SegmentDef>) -> Self {
        Self {
            path: PathBuf::new(),
            game: game.into(),
            name: name.into(),
            segments,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let mut route: Route =
            serde_json::from_slice(&bytes).map_err(|e| Error::parse(path, e))?;
        route.path = path.to_path_buf();
        Ok(route)
    }

    pub fn save(&self) -> Result<()> {
        crate::run::write_json(&self.path, self)
    }

    pub fn title(&self) -> String {
        match (self.game.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} – {}", self.game, self.name),
            (false, true) => self.game.clone(),
            _ => self.name.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every loadable `*.json` route under `dir`, sorted by path.
    /// Unreadable files are logged and skipped.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Vec<Route> {
        let mut routes: Vec<Route> = crate::run::json_files(dir.as_ref())
            .into_iter()
            .filter_map(|path| match Route::load(&path) {
                Ok(route) => Some(route),
                Err(e) => {
                    log::warn!("skipping route: {e}");
                    None
                }
            })
            .collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path));
        routes
    }
}
