//! Watch on the compile request side-channel file

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::{Event, RecursiveMode};
use tracing::{debug, warn};

use crate::application::SupervisorEvent;
use crate::error::HotrunResult;

use super::backend::{create_watcher, is_change, BoxedWatcher, WatchBackend};

/// Reports `CompileRequestFileChanged` whenever the request file is written
pub struct RequestFileWatch {
    path: PathBuf,
    _watcher: BoxedWatcher,
}

impl RequestFileWatch {
    pub fn start(
        path: &Path,
        backend: WatchBackend,
        events: Sender<SupervisorEvent>,
    ) -> HotrunResult<Self> {
        let target = path.to_path_buf();
        let name = path.file_name().map(|n| n.to_os_string());
        let handler = {
            let target = target.clone();
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_change(&event.kind) => {
                    if event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == name)
                    {
                        let _ = events.send(SupervisorEvent::CompileRequestFileChanged(
                            target.clone(),
                        ));
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Compile request watch error: {}", e),
            }
        };

        let mut watcher = create_watcher(backend, handler)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %target.display(), "Watching compile request file");

        Ok(Self {
            path: target,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
