//! Persistent shell state: cached working directory and suspended-job count.

/// State that outlives individual input lines.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cwd: String,
    suspended_jobs: usize,
}

impl Session {
    /// Capture the process working directory once at startup.
    pub fn new() -> Self {
        let mut session = Self::default();
        session.refresh_cwd();
        session
    }

    /// Seed the suspended-job count. Nothing in the shell increments it.
    pub fn with_suspended_jobs(mut self, count: usize) -> Self {
        self.suspended_jobs = count;
        self
    }

    /// Re-read the working directory. Call after every successful `chdir`.
    pub fn refresh_cwd(&mut self) {
        match std::env::current_dir() {
            Ok(dir) => self.cwd = dir.to_string_lossy().into_owned(),
            Err(e) => {
                log::warn!("unable to determine current directory: {e}");
                self.cwd.clear();
            }
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn suspended_jobs(&self) -> usize {
        self.suspended_jobs
    }

    /// Last path segment of the cached directory, `/` at the root.
    pub fn dir_label(&self) -> &str {
        self.cwd
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("/")
    }

    /// `[<name> <dir>]$ `
    pub fn prompt(&self, shell_name: &str) -> String {
        format!("[{shell_name} {}]$ ", self.dir_label())
    }
}
