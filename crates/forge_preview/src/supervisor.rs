//! Lifecycle supervision for the dependency install and dev-server process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::PreviewConfig;
use crate::error::{PreviewError, PreviewResult};
use crate::port;

/// Observable supervisor lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    Idle,
    Installing,
    Starting,
    Running,
    Stopping,
    Failed,
}

/// Result of a start attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A dev-server process was spawned. `listening` reports whether it
    /// accepted a connection within the listen window; a false value is
    /// not fatal, readiness polling decides what the client sees.
    Spawned { listening: bool },
    /// The preview port already has a listener this supervisor does not
    /// own. Nothing was spawned; the existing listener serves the preview.
    ForeignListener,
}

/// Owns at most one preview process for one workspace directory.
///
/// Install is a bounded foreground step; the dev server is a background
/// child in its own process group. Child output is forwarded to the log
/// stream and never parsed for control decisions.
pub struct PreviewSupervisor {
    workspace_dir: PathBuf,
    config: PreviewConfig,
    state: SupervisorState,
    child: Option<Child>,
}

impl PreviewSupervisor {
    pub fn new(workspace_dir: impl Into<PathBuf>, config: PreviewConfig) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            config,
            state: SupervisorState::Idle,
            child: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Run the install command in the workspace under a hard deadline.
    ///
    /// Failure or timeout is fatal for the current request and leaves the
    /// supervisor in `Failed`.
    pub async fn install(&mut self) -> PreviewResult<()> {
        self.state = SupervisorState::Installing;
        let (program, args) = split_command(&self.config.install_command);
        info!(command = %self.config.install_command.join(" "), "installing dependencies");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.workspace_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let outcome = timeout(self.config.install_timeout, cmd.output()).await;
        match outcome {
            Err(_) => {
                self.state = SupervisorState::Failed;
                Err(PreviewError::InstallTimeout {
                    seconds: self.config.install_timeout.as_secs(),
                })
            }
            Ok(Err(source)) => {
                self.state = SupervisorState::Failed;
                Err(PreviewError::Spawn {
                    command: program.to_string(),
                    source,
                })
            }
            Ok(Ok(output)) if !output.status.success() => {
                self.state = SupervisorState::Failed;
                Err(PreviewError::InstallFailed {
                    status: output.status.code(),
                    stderr_tail: tail(&output.stderr),
                })
            }
            Ok(Ok(_)) => {
                info!("dependency install succeeded");
                self.state = SupervisorState::Idle;
                Ok(())
            }
        }
    }

    /// Start (or adopt) the preview on the configured port.
    ///
    /// If a foreign listener holds the port nothing is spawned. Otherwise
    /// any previously owned process is terminated first, then the serve
    /// command is spawned in its own process group. Start is best-effort:
    /// after the listen window we proceed whether or not the port answers.
    pub async fn start(&mut self) -> PreviewResult<StartOutcome> {
        match port::is_port_bound(self.config.preview_port) {
            Ok(true) => {
                info!(
                    port = self.config.preview_port,
                    "preview port already has a listener, not spawning"
                );
                return Ok(StartOutcome::ForeignListener);
            }
            Ok(false) => {}
            Err(err) => {
                warn!(
                    port = self.config.preview_port,
                    error = %err,
                    "port probe failed, assuming a listener is present"
                );
                return Ok(StartOutcome::ForeignListener);
            }
        }

        if self.child.is_some() {
            self.state = SupervisorState::Stopping;
            self.terminate_child().await;
        }

        self.state = SupervisorState::Starting;
        let (program, args) = split_command(&self.config.serve_command);
        info!(command = %self.config.serve_command.join(" "), "starting preview server");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.workspace_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                self.state = SupervisorState::Idle;
                return Err(PreviewError::Spawn {
                    command: program.to_string(),
                    source,
                });
            }
        };

        forward_output(&mut child);
        self.child = Some(child);

        let listening = self.wait_until_listening().await;
        if !listening {
            warn!(
                port = self.config.preview_port,
                "preview not accepting connections yet, continuing optimistically"
            );
        }
        self.state = SupervisorState::Running;
        Ok(StartOutcome::Spawned { listening })
    }

    /// Terminate the owned preview process, if any.
    pub async fn stop(&mut self) {
        if self.child.is_some() {
            self.state = SupervisorState::Stopping;
            self.terminate_child().await;
        }
        self.state = SupervisorState::Idle;
    }

    async fn wait_until_listening(&self) -> bool {
        let deadline = Instant::now() + self.config.listen_timeout;
        loop {
            let connect = TcpStream::connect(("127.0.0.1", self.config.preview_port));
            if let Ok(Ok(_)) = timeout(Duration::from_millis(250), connect).await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn terminate_child(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        #[cfg(unix)]
        if let Some(pid) = child.id() {
            // Negative pid targets the whole process group, so npx
            // wrappers take their dev server down with them.
            unsafe {
                libc::kill(-(pid as i32), libc::SIGTERM);
            }
        }
        #[cfg(not(unix))]
        let _ = child.start_kill();

        match timeout(self.config.stop_grace, child.wait()).await {
            Ok(Ok(status)) => info!(%status, "preview process exited"),
            Ok(Err(err)) => warn!(error = %err, "failed to reap preview process"),
            Err(_) => {
                warn!("preview process ignored SIGTERM, killing");
                let _ = child.kill().await;
            }
        }
    }
}

fn split_command(command: &[String]) -> (&str, &[String]) {
    let (program, args) = command.split_first().expect("command is never empty");
    (program.as_str(), args)
}

fn forward_output(child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(target: "preview", "{line}");
            }
            debug!(target: "preview", "stdout stream closed");
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(target: "preview", "{line}");
            }
            debug!(target: "preview", "stderr stream closed");
        });
    }
}

fn tail(bytes: &[u8]) -> String {
    const TAIL_BYTES: usize = 2048;
    let start = bytes.len().saturating_sub(TAIL_BYTES);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with(port: u16) -> PreviewConfig {
        PreviewConfig::new(port)
            .with_listen_timeout(Duration::from_millis(100))
            .with_stop_grace(Duration::from_millis(500))
    }

    fn free_port() -> u16 {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[test]
    fn supervisor_starts_idle() {
        let dir = TempDir::new().unwrap();
        let supervisor = PreviewSupervisor::new(dir.path(), PreviewConfig::default());
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&SupervisorState::Installing).unwrap();
        assert_eq!(json, "\"installing\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn install_success_returns_to_idle() {
        let dir = TempDir::new().unwrap();
        let config = config_with(free_port()).with_install_command(vec!["true".into()]);
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        supervisor.install().await.unwrap();
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn install_failure_is_terminal() {
        let dir = TempDir::new().unwrap();
        let config = config_with(free_port()).with_install_command(vec!["false".into()]);
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        let result = supervisor.install().await;

        assert!(matches!(
            result,
            Err(PreviewError::InstallFailed { status: Some(1), .. })
        ));
        assert_eq!(supervisor.state(), SupervisorState::Failed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn install_overrun_times_out() {
        let dir = TempDir::new().unwrap();
        let config = config_with(free_port())
            .with_install_command(vec!["sleep".into(), "5".into()])
            .with_install_timeout(Duration::from_millis(200));
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        let result = supervisor.install().await;

        assert!(matches!(result, Err(PreviewError::InstallTimeout { .. })));
        assert_eq!(supervisor.state(), SupervisorState::Failed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn foreign_listener_makes_start_a_noop() {
        let dir = TempDir::new().unwrap();
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = config_with(port).with_serve_command(vec!["sleep".into(), "5".into()]);
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        let outcome = supervisor.start().await.unwrap();

        assert_eq!(outcome, StartOutcome::ForeignListener);
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn start_and_stop_cycle() {
        let dir = TempDir::new().unwrap();
        let config = config_with(free_port()).with_serve_command(vec!["sleep".into(), "5".into()]);
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        let outcome = supervisor.start().await.unwrap();
        assert_eq!(outcome, StartOutcome::Spawned { listening: false });
        assert_eq!(supervisor.state(), SupervisorState::Running);

        supervisor.stop().await;
        assert_eq!(supervisor.state(), SupervisorState::Idle);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn restart_replaces_the_previous_process() {
        let dir = TempDir::new().unwrap();
        let config = config_with(free_port()).with_serve_command(vec!["sleep".into(), "5".into()]);
        let mut supervisor = PreviewSupervisor::new(dir.path(), config);

        supervisor.start().await.unwrap();
        let outcome = supervisor.start().await.unwrap();

        assert!(matches!(outcome, StartOutcome::Spawned { .. }));
        assert_eq!(supervisor.state(), SupervisorState::Running);

        supervisor.stop().await;
    }
}
