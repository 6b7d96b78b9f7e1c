use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::route::Route;

pub const PB_FILE: &str = "pb.json";

/// Persisted timing of one segment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SegmentRecord {
    #[serde(default, with = "crate::millis")]
    pub duration: Option<Duration>,
    #[serde(default, with = "crate::millis")]
    pub pb: Option<Duration>,
    #[serde(default, alias = "bpt", with = "crate::millis")]
    pub gold: Option<Duration>,
}

/// Segment records keyed by segment id.
pub type Splits = BTreeMap<String, SegmentRecord>;

/// A saved attempt, or the personal best when stored as `pb.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunFile {
    #[serde(skip)]
    pub path: PathBuf,
    pub route: PathBuf,
    #[serde(default)]
    pub created: Option<DateTime<Local>>,
    #[serde(default)]
    pub updated: Option<DateTime<Local>>,
    #[serde(default)]
    pub segs: Splits,
    // positional records written before segments had ids
    #[serde(default, skip_serializing)]
    run: Option<Vec<SegmentRecord>>,
}

impl RunFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let mut run: RunFile = serde_json::from_slice(&bytes).map_err(|e| Error::parse(path, e))?;
        run.path = path.to_path_buf();

        if let Some(positional) = run.run.take() {
            let route = run.load_route()?;
            for (def, record) in route.segments.iter().zip(positional) {
                run.segs.insert(def.id.clone(), record);
            }
            log::info!("normalised positional records in {}", path.display());
        }
        Ok(run)
    }

    /// A blank run seeded with the reference times the route carries.
    pub fn from_route(path: impl Into<PathBuf>, route: &Route) -> Self {
        let segs = route
            .segments
            .iter()
            .map(|def| {
                let record = SegmentRecord {
                    duration: None,
                    pb: def.pb,
                    gold: def.gold,
                };
                (def.id.clone(), record)
            })
            .collect();

        Self {
            path: path.into(),
            route: route.path.clone(),
            segs,
            ..Default::default()
        }
    }

    /// A new attempt using the durations of `pb` as its reference. A PB
    /// that was never run keeps the references it was seeded with.
    pub fn from_pb(path: impl Into<PathBuf>, pb: &RunFile) -> Self {
        let now = Local::now();
        let segs = pb
            .segs
            .iter()
            .map(|(id, seg)| {
                let record = SegmentRecord {
                    duration: None,
                    pb: seg.duration.or(seg.pb),
                    gold: seg.gold,
                };
                (id.clone(), record)
            })
            .collect();

        Self {
            path: path.into(),
            route: pb.route.clone(),
            created: Some(now),
            updated: Some(now),
            segs,
            run: None,
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolve the route as written, falling back to a path relative to
    /// this run's directory.
    pub fn route_path(&self) -> PathBuf {
        if self.route.is_relative() && !self.route.exists() {
            if let Some(dir) = self.path.parent() {
                let beside = dir.join(&self.route);
                if beside.exists() {
                    return beside;
                }
            }
        }
        self.route.clone()
    }

    pub fn load_route(&self) -> Result<Route> {
        Route::load(self.route_path())
    }

    /// Total time, or `None` unless every recorded segment has a duration.
    pub fn total(&self) -> Option<Duration> {
        if self.segs.is_empty() {
            return None;
        }
        self.segs.values().map(|s| s.duration).sum()
    }

    pub fn save(&self) -> Result<()> {
        write_json(&self.path, self)
    }

    /// Take every gold from `other` that beats ours. Returns how many
    /// segments improved.
    pub fn copy_golds(&mut self, other: &RunFile) -> usize {
        let mut improved = 0;
        for (id, theirs) in &other.segs {
            let (Some(record), Some(gold)) = (self.segs.get_mut(id), theirs.gold) else {
                continue;
            };
            if record.gold.map_or(true, |ours| gold < ours) {
                record.gold = Some(gold);
                improved += 1;
            }
        }
        improved
    }
}

/// A directory holding a `pb.json` and any number of attempts.
#[derive(Debug, Clone)]
pub struct RunDir {
    root: PathBuf,
}

impl RunDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn pb_path(&self) -> PathBuf {
        self.root.join(PB_FILE)
    }

    /// Load the PB, creating it from `route` when the directory has none.
    pub fn open_pb(&self, route: Option<&Path>) -> Result<RunFile> {
        let path = self.pb_path();
        if path.exists() {
            return RunFile::load(&path);
        }

        let Some(route_path) = route else {
            return Err(Error::MissingPb(self.root.clone()));
        };
        let route = Route::load(route_path)?;
        let pb = RunFile::from_route(path, &route);
        pb.save()?;
        log::info!("created {} for {}", pb.path.display(), route.title());
        Ok(pb)
    }

    /// Every loadable run directly in the directory, the PB included,
    /// oldest update first.
    pub fn runs(&self) -> Vec<RunFile> {
        let mut runs: Vec<RunFile> = json_files(&self.root)
            .into_iter()
            .filter(|path| path.parent() == Some(self.root.as_path()))
            .filter_map(|path| match RunFile::load(&path) {
                Ok(run) => Some(run),
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    None
                }
            })
            .collect();
        runs.sort_by_key(|run| run.updated);
        runs
    }

    /// Resolve `name` as a path, as `<root>/<name>.json`, or else start a
    /// new attempt there from `pb`. Without a name a timestamped one is used.
    pub fn open_run(&self, pb: &RunFile, name: Option<&str>) -> Result<RunFile> {
        let name = name
            .map(str::to_owned)
            .unwrap_or_else(|| Local::now().format("%Y%m%d-%H%M%S").to_string());

        let direct = PathBuf::from(&name);
        if direct.is_file() {
            return RunFile::load(direct);
        }
        let in_dir = self.root.join(&name).with_extension("json");
        if in_dir.is_file() {
            return RunFile::load(in_dir);
        }

        let path = if name.ends_with(".json") {
            direct
        } else {
            in_dir
        };
        Ok(RunFile::from_pb(path, pb))
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let data = serde_json::to_vec_pretty(value).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, data).map_err(|e| Error::io(path, e))
}

/// All `*.json` files below `dir`, depth first, sorted.
pub(crate) fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            found.extend(json_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "json") {
            found.push(path);
        }
    }
    found
}
