//! Supervisor configuration.

use std::time::Duration;

/// Options for dependency installation and the preview process.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Port the dev server is expected to listen on.
    pub preview_port: u16,
    /// Command run once per generation to install dependencies.
    pub install_command: Vec<String>,
    /// Command that starts the dev server.
    pub serve_command: Vec<String>,
    /// Hard deadline for the install command.
    pub install_timeout: Duration,
    /// How long to wait for the dev server to accept connections before
    /// returning optimistically.
    pub listen_timeout: Duration,
    /// Grace period between SIGTERM and a hard kill when replacing or
    /// stopping the preview process.
    pub stop_grace: Duration,
}

impl PreviewConfig {
    pub fn new(preview_port: u16) -> Self {
        Self {
            preview_port,
            install_command: vec!["npm".into(), "install".into()],
            serve_command: vec![
                "npx".into(),
                "vite".into(),
                "--host".into(),
                "0.0.0.0".into(),
                "--port".into(),
                preview_port.to_string(),
            ],
            install_timeout: Duration::from_secs(120),
            listen_timeout: Duration::from_secs(2),
            stop_grace: Duration::from_secs(3),
        }
    }

    pub fn with_install_command(mut self, command: Vec<String>) -> Self {
        self.install_command = command;
        self
    }

    pub fn with_serve_command(mut self, command: Vec<String>) -> Self {
        self.serve_command = command;
        self
    }

    pub fn with_install_timeout(mut self, timeout: Duration) -> Self {
        self.install_timeout = timeout;
        self
    }

    pub fn with_listen_timeout(mut self, timeout: Duration) -> Self {
        self.listen_timeout = timeout;
        self
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::new(5173)
    }
}
