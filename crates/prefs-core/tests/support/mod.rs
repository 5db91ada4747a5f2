#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Barrier;
use url::Url;

use prefs_core::commands::CommandService;
use prefs_core::defaults::StaticDefaults;
use prefs_core::environment::Environment;
use prefs_core::error::{PrefsError, PrefsResult};
use prefs_core::files::{FileOperationError, FileService, ReadOptions};
use prefs_core::preferences::{Collaborators, PreferencesService};
use prefs_core::remote::{RemoteAgent, RemoteEnvironment};
use prefs_core::text_model::ModelStore;
use prefs_core::workspace::StaticWorkspace;

pub const USER_SETTINGS: &str = "file:///home/me/.config/prefs/User/settings.json";
pub const USER_KEYBINDINGS: &str = "file:///home/me/.config/prefs/User/keybindings.json";

pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

/// In-memory files with read/write counters.
#[derive(Default)]
pub struct MemoryFiles {
    contents: Mutex<HashMap<Url, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    read_error: Mutex<Option<FileOperationError>>,
    write_error: Mutex<Option<FileOperationError>>,
    read_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, resource: &str, content: &str) -> Self {
        self.contents
            .lock()
            .unwrap()
            .insert(url(resource), content.to_string());
        self
    }

    pub fn fail_reads(self, error: FileOperationError) -> Self {
        *self.read_error.lock().unwrap() = Some(error);
        self
    }

    pub fn fail_writes(self, error: FileOperationError) -> Self {
        *self.write_error.lock().unwrap() = Some(error);
        self
    }

    /// Reads look up the file, then wait until `parties` readers arrived.
    pub fn race_reads(self, parties: usize) -> Self {
        *self.read_barrier.lock().unwrap() = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn contents(&self, resource: &Url) -> Option<String> {
        self.contents.lock().unwrap().get(resource).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileService for MemoryFiles {
    async fn read(&self, resource: &Url, _options: ReadOptions) -> Result<String, FileOperationError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let result = match self.read_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => self
                .contents
                .lock()
                .unwrap()
                .get(resource)
                .cloned()
                .ok_or_else(|| FileOperationError::not_found(resource)),
        };
        let barrier = self.read_barrier.lock().unwrap().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        result
    }

    async fn write(&self, resource: &Url, contents: &str) -> Result<(), FileOperationError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.write_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.contents
            .lock()
            .unwrap()
            .insert(resource.clone(), contents.to_string());
        Ok(())
    }
}

/// Remote agent that counts how often it is asked.
pub struct FakeRemote {
    environment: Option<RemoteEnvironment>,
    calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new(settings_path: Option<Url>) -> Self {
        Self {
            environment: settings_path.map(|settings_path| RemoteEnvironment { settings_path }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteAgent for FakeRemote {
    async fn environment(&self) -> Option<RemoteEnvironment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.environment.clone()
    }
}

#[derive(Default)]
pub struct RecordingCommands {
    calls: Mutex<Vec<(String, Url)>>,
    fail: bool,
}

impl RecordingCommands {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, Url)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandService for RecordingCommands {
    async fn execute_command(&self, command: &str, resource: &Url) -> PrefsResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), resource.clone()));
        if self.fail {
            return Err(PrefsError::command(command, "no file manager"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct Setup {
    pub workspace: StaticWorkspace,
    pub remote: Option<Url>,
    pub files: MemoryFiles,
    pub commands: RecordingCommands,
    pub json_editor: bool,
}

impl Setup {
    pub fn new(workspace: StaticWorkspace) -> Self {
        Self {
            workspace,
            ..Self::default()
        }
    }

    pub fn remote(mut self, settings_path: &str) -> Self {
        self.remote = Some(url(settings_path));
        self
    }

    pub fn files(mut self, files: MemoryFiles) -> Self {
        self.files = files;
        self
    }

    pub fn commands(mut self, commands: RecordingCommands) -> Self {
        self.commands = commands;
        self
    }

    pub fn json_editor(mut self) -> Self {
        self.json_editor = true;
        self
    }

    pub fn build(self) -> Harness {
        let files = Arc::new(self.files);
        let store = Arc::new(ModelStore::new(files.clone()));
        let remote = Arc::new(FakeRemote::new(self.remote));
        let commands = Arc::new(self.commands);
        let defaults = Arc::new(StaticDefaults::builtin());

        let service = PreferencesService::new(Collaborators {
            environment: Environment::new(url(USER_SETTINGS), url(USER_KEYBINDINGS)),
            workspace: Arc::new(self.workspace),
            remote: remote.clone(),
            text_models: store.clone(),
            models: store.clone(),
            files: files.clone(),
            commands: commands.clone(),
            defaults: defaults.clone(),
        })
        .with_json_editor(self.json_editor);

        Harness {
            service,
            files,
            store,
            remote,
            commands,
            defaults,
        }
    }
}

pub struct Harness {
    pub service: PreferencesService,
    pub files: Arc<MemoryFiles>,
    pub store: Arc<ModelStore>,
    pub remote: Arc<FakeRemote>,
    pub commands: Arc<RecordingCommands>,
    pub defaults: Arc<StaticDefaults>,
}

pub fn harness(workspace: StaticWorkspace) -> Harness {
    Setup::new(workspace).build()
}
