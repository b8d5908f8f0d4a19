use crate::areas::refs::CasResult;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::closure::ObjectClosure;
use crate::sync::client::SyncClient;
use crate::sync::protocol::FetchRequest;
use std::io::Write;

impl Repository {
    /// Fetch a branch from a remote and fast-forward the local ref
    ///
    /// Pulling a branch other than the checked-out one fetches objects and
    /// stops. Diverged histories are refused, and a local change that the
    /// incoming tree would clobber aborts the pull before any ref moves.
    pub async fn pull(&mut self, remote: Option<&str>, branch: Option<&str>) -> anyhow::Result<()> {
        let remote_name = remote.unwrap_or("origin");
        let branch_name = match branch {
            Some(branch) => BranchName::try_parse(branch.to_string())?,
            None => self.current_branch()?,
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

        writeln!(self.writer(), "Pulling from {} ({})", remote_name, url)?;

        let client = SyncClient::new(&url, credentials)?;
        let remote_refs = client.fetch_refs().await?;

        let target_ref = branch_name.to_sym_ref_name();
        let remote_tip = remote_refs
            .iter()
            .find(|(sym_ref, _)| *sym_ref == target_ref)
            .map(|(_, oid)| oid.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "branch '{}' not found on remote '{}'",
                    branch_name,
                    remote_name
                )
            })?;

        writeln!(
            self.writer(),
            "Remote branch '{}' points to commit {}",
            branch_name,
            &remote_tip.as_ref()[..8]
        )?;

        let local_tip = self.refs().read_ref(branch_name.clone()).ok().flatten();
        let closure = ObjectClosure::new(self.database());

        if let Some(local_tip) = &local_tip {
            writeln!(
                self.writer(),
                "Local branch '{}' points to commit {}",
                branch_name,
                &local_tip.as_ref()[..8]
            )?;

            // Equal tips and local-ahead both leave nothing to merge
            if *local_tip == remote_tip || closure.is_ancestor(&remote_tip, local_tip)? {
                writeln!(self.writer(), "Already up to date!")?;
                return Ok(());
            }
        }

        writeln!(self.writer(), "Fetching objects...")?;

        let haves = self
            .refs()
            .list_refs_with_oids()?
            .into_iter()
            .map(|(_, oid)| oid)
            .collect::<Vec<_>>();
        let frames = client
            .fetch_objects(&FetchRequest {
                wants: vec![remote_tip.clone()],
                haves,
            })
            .await?;

        for frame in &frames {
            self.database().store_raw(frame.clone())?;
        }
        writeln!(self.writer(), "Received {} objects", frames.len())?;

        // A pull of a branch other than the checked-out one stops at the fetch
        let current_ref = self.refs().current_ref(None)?;
        if current_ref != target_ref {
            writeln!(
                self.writer(),
                "Warning: You're not on branch '{}'. Fetch completed but not merged.",
                branch_name
            )?;
            writeln!(
                self.writer(),
                "Use 'orb checkout {}' to switch to this branch.",
                branch_name
            )?;
            return Ok(());
        }

        if let Some(local_tip) = &local_tip
            && !closure.is_ancestor(local_tip, &remote_tip)?
        {
            anyhow::bail!(OrbError::NotFastForward(format!(
                "cannot fast-forward '{}' to {}: local and remote histories have diverged",
                branch_name,
                remote_tip.to_short_oid()
            )));
        }

        // Plan the checkout first, so a conflicting local change aborts
        // the pull without touching refs. Only then settle the ref with a
        // compare-and-swap, and write the working tree and index after the
        // ref is ours: a lost race must not leave migrated files behind.
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let tree_diff = self
            .database()
            .tree_diff(local_tip.as_ref(), Some(&remote_tip))?;
        let mut migration = Migration::new(self, &mut index, tree_diff);
        migration.plan()?;

        match self
            .refs()
            .compare_and_swap(&branch_name, local_tip.as_ref(), &remote_tip)?
        {
            CasResult::Updated => {}
            CasResult::Conflict { .. } => {
                anyhow::bail!(
                    "branch '{}' changed while pulling, run the pull again",
                    branch_name
                );
            }
        }

        migration.apply_planned()?;
        index.write_updates()?;

        writeln!(self.writer(), "Fast-forward merge successful!")?;
        writeln!(
            self.writer(),
            "Successfully pulled from {}/{}",
            remote_name,
            branch_name
        )?;

        Ok(())
    }
}
