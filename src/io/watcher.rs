use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// One or more collection files changed on disk.
    Changed(Vec<PathBuf>),
}

/// A file system watcher for the `.uxdebt/` directory.
pub struct DataWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

/// Whether a changed path is a collection file worth reloading for
fn is_collection_file(data_dir: &Path, path: &Path) -> bool {
    if path.parent() != Some(data_dir) {
        return false;
    }
    // user.json is identity, not a collection
    if path.file_name().and_then(|n| n.to_str()) == Some("user.json") {
        return false;
    }
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

impl DataWatcher {
    /// Start watching the given data directory.
    /// `poll()` should be called each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let data_dir_owned = data_dir.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_collection_file(&data_dir_owned, p))
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(FileEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(DataWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_collection_files_are_relevant() {
        let dir = Path::new("/work/.uxdebt");
        assert!(is_collection_file(dir, &dir.join("debts.json")));
        assert!(is_collection_file(dir, &dir.join("projects.json")));
        assert!(!is_collection_file(dir, &dir.join("user.json")));
        assert!(!is_collection_file(dir, &dir.join("config.toml")));
        assert!(!is_collection_file(dir, &dir.join(".tmpAbC123")));
        assert!(!is_collection_file(dir, Path::new("/elsewhere/debts.json")));
    }
}
