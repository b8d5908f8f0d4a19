use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH};
use anyhow::Context;

/// A parsed revision expression naming a commit
///
/// Accepted spellings: a branch name or `HEAD` (and the `@` alias), a full
/// 40-hex object ID, a unique hex prefix of at least four characters, and
/// the `<rev>^` / `<rev>~<n>` ancestor suffixes on any of those.
///
/// Hex-looking strings parse as [`Revision::Ref`] and only fall back to
/// object ID lookup when no ref of that name exists, so a branch literally
/// named `cafe` still wins over an abbreviated OID.
#[derive(Debug, Clone)]
pub enum Revision {
    Ref(BranchName),
    /// `<rev>~<n>`, the nth first-parent ancestor
    Ancestor(Box<Revision>, usize),
    /// `<rev>^`, the first parent
    Parent(Box<Revision>),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_re = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        let ancestor_re = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;

        if let Some(caps) = parent_re.captures(revision) {
            let base = Self::try_parse(&caps[1])?;
            return Ok(Revision::Parent(Box::new(base)));
        }

        if let Some(caps) = ancestor_re.captures(revision) {
            let base = Self::try_parse(&caps[1])?;
            let generations: usize = caps[2]
                .parse()
                .with_context(|| format!("failed to parse generations in revision: {revision}"))?;
            return Ok(Revision::Ancestor(Box::new(base), generations));
        }

        let name = *REF_ALIASES.get(revision).unwrap_or(&revision);
        Ok(Revision::Ref(BranchName::try_parse(name.to_string())?))
    }

    /// Resolve to a commit ID, or None when the ref exists but is unborn
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        match self {
            Revision::Ref(name) => Self::resolve_ref(name, repository),
            Revision::Parent(base) => {
                Self::parent_of(base.resolve(repository)?, repository)
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::parent_of(oid, repository)?;
                }
                Ok(oid)
            }
        }
    }

    fn resolve_ref(name: &BranchName, repository: &Repository) -> anyhow::Result<Option<ObjectId>> {
        match repository.refs().read_ref(name.clone()) {
            Ok(found) => Ok(found),
            Err(ref_error) => {
                let text = name.as_ref();
                let is_hex = text.chars().all(|c| c.is_ascii_hexdigit());
                if is_hex && (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&text.len()) {
                    Self::lookup_oid(text, repository).map(Some)
                } else {
                    Err(ref_error)
                }
            }
        }
    }

    fn parent_of(
        oid: Option<ObjectId>,
        repository: &Repository,
    ) -> anyhow::Result<Option<ObjectId>> {
        let Some(oid) = oid else { return Ok(None) };

        let commit = repository
            .database()
            .parse_object_as_commit(&oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", oid))?;

        Ok(commit.parent().cloned())
    }

    /// Look up a full or abbreviated hex string as a commit ID
    fn lookup_oid(hex: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if hex.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(hex.to_string())?;
            Self::require_commit(&oid, repository)?;
            return Ok(oid);
        }

        let matches = repository.database().find_objects_by_prefix(hex)?;
        let mut commits = matches
            .iter()
            .filter(|oid| {
                repository
                    .database()
                    .get_object_type(oid)
                    .map(|object_type| object_type == ObjectType::Commit)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        match commits.len() {
            0 => anyhow::bail!(
                "ambiguous argument '{}': unknown revision or path not in the working tree",
                hex
            ),
            1 => Ok(commits.remove(0).clone()),
            _ => {
                let mut message = format!("short SHA1 {hex} is ambiguous\nhint: The candidates are:");
                for oid in &commits {
                    message.push_str(&format!("\nhint:   {} commit", oid.to_short_oid()));
                }
                anyhow::bail!(message)
            }
        }
    }

    fn require_commit(oid: &ObjectId, repository: &Repository) -> anyhow::Result<()> {
        let object_type = repository
            .database()
            .get_object_type(oid)
            .with_context(|| format!("object {} not found", oid))?;

        if object_type != ObjectType::Commit {
            anyhow::bail!(
                "object {} is a {}, not a commit",
                oid.to_short_oid(),
                object_type
            );
        }

        Ok(())
    }
}
