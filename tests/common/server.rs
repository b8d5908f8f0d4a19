use assert_cmd::prelude::CommandCargoExt;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// A repository served over HTTP for the duration of a test
///
/// Spawns `orb serve` on an OS-assigned port and parses the listening
/// address from the first line the server prints. The process is killed
/// when the guard is dropped.
pub struct ServeGuard {
    child: Child,
    url: String,
}

impl ServeGuard {
    pub fn start(repository_dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with_args(repository_dir, &[])
    }

    pub fn start_with_auth(
        repository_dir: &Path,
        auth: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with_args(repository_dir, &["--auth", auth])
    }

    fn start_with_args(
        repository_dir: &Path,
        extra_args: &[&str],
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut command = Command::cargo_bin("orb")?;
        command
            .current_dir(repository_dir)
            .arg("serve")
            .args(["--addr", "127.0.0.1:0"])
            .args(extra_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = command.spawn()?;

        let stdout = child.stdout.take().ok_or("serve produced no stdout")?;
        let mut line = String::new();
        BufReader::new(stdout).read_line(&mut line)?;

        let url = line
            .trim()
            .strip_prefix("Listening on ")
            .ok_or_else(|| format!("unexpected serve output: {line:?}"))?
            .to_string();

        Ok(Self { child, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ServeGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
