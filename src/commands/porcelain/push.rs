use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::closure::ObjectClosure;
use crate::sync::client::SyncClient;
use bytes::Bytes;
use std::io::Write;

impl Repository {
    /// Upload the branch to a remote and move its ref forward
    ///
    /// The remote ref is updated with a compare-and-swap against the tip
    /// observed during negotiation, so a concurrent push loses cleanly
    /// instead of overwriting.
    pub async fn push(&mut self, remote: Option<&str>, branch: Option<&str>) -> anyhow::Result<()> {
        let remote_name = remote.unwrap_or("origin");
        let branch_name = match branch {
            Some(branch) => BranchName::try_parse(branch.to_string())?,
            None => self.current_branch()?,
        };

        let local_tip = match self.refs().read_ref(branch_name.clone()) {
            Ok(Some(oid)) => oid,
            _ => anyhow::bail!("branch {} does not exist", branch_name),
        };

        let (url, credentials) = {
            let config = self.config();
            let remote = config.remote(remote_name).ok_or_else(|| {
                anyhow::anyhow!(
                    "remote '{}' not found, use 'orb remote add' to add it first",
                    remote_name
                )
            })?;
            (remote.url, config.credentials(remote_name))
        };

        writeln!(self.writer(), "Pushing to {} ({})", remote_name, url)?;

        let client = SyncClient::new(&url, credentials)?;
        let remote_refs = client.fetch_refs().await?;

        let target_ref = branch_name.to_sym_ref_name();
        let remote_tip = remote_refs
            .iter()
            .find(|(sym_ref, _)| *sym_ref == target_ref)
            .map(|(_, oid)| oid.clone());

        if remote_tip.as_ref() == Some(&local_tip) {
            writeln!(self.writer(), "Everything up-to-date")?;
            return Ok(());
        }

        let closure = ObjectClosure::new(self.database());

        if let Some(remote_tip) = &remote_tip
            && !closure.is_ancestor(remote_tip, &local_tip)?
        {
            anyhow::bail!(OrbError::NotFastForward(format!(
                "cannot push to {}/{}: the remote branch has commits not present locally\n\
                 hint: pull the remote changes first",
                remote_name, branch_name
            )));
        }

        writeln!(self.writer(), "Collecting objects to push...")?;

        let haves = remote_tip.clone().into_iter().collect::<Vec<_>>();
        let objects = closure.difference(&[local_tip.clone()], &haves)?;

        writeln!(self.writer(), "Found {} objects to push", objects.len())?;

        let frames = objects
            .iter()
            .map(|oid| self.database().load_raw(oid))
            .collect::<anyhow::Result<Vec<Bytes>>>()?;
        client.push_objects(&frames).await?;

        client
            .update_ref(&target_ref, remote_tip.as_ref(), &local_tip)
            .await?;

        writeln!(
            self.writer(),
            "\nSuccess! Pushed to {}/{}",
            remote_name,
            branch_name
        )?;

        Ok(())
    }
}
