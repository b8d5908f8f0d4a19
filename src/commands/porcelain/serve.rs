use crate::areas::repository::Repository;
use crate::artifacts::core::error::OrbError;
use crate::sync::server::{self, SyncServer};
use anyhow::Context;
use std::io::Write;
use tokio::net::TcpListener;

impl Repository {
    /// Expose this repository over HTTP for clone, push and pull
    ///
    /// Binding port 0 picks a free port; the chosen address is printed
    /// before the accept loop starts. Runs until the process is stopped.
    pub async fn serve(&self, addr: &str, auth: Option<&str>) -> anyhow::Result<()> {
        server::init_tracing();

        let credentials = match auth {
            Some(auth) => {
                let (user, password) = auth.split_once(':').ok_or_else(|| {
                    anyhow::anyhow!(OrbError::ValidationError(
                        "invalid auth format, expected user:pass".into()
                    ))
                })?;
                Some((user.to_string(), password.to_string()))
            }
            None => None,
        };

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        writeln!(
            self.writer(),
            "Listening on http://{}",
            listener.local_addr()?
        )?;
        self.writer().flush()?;

        SyncServer::new(&self.orb_path(), credentials)
            .serve(listener)
            .await
    }
}
