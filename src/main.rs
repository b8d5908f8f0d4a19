use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use orb::areas::repository::Repository;
use orb::artifacts::core::PagerWriter;
use orb::commands::porcelain::clone;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "orb",
    version = "0.1.0",
    about = "A distributed version control system",
    long_about = "orb is a small distributed version control system. \
    It tracks file history through content-addressed snapshots \
    and synchronizes repositories over a built-in HTTP protocol.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        The object can be named by a branch, HEAD, a full OID or a unique OID prefix."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object to print")]
        object: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command hashes a file as a blob and prints the resulting object ID. \
        With -w the blob is also written to the object database."
    )]
    HashObject {
        #[arg(
            short,
            long,
            required = false,
            help = "Write the object to the object database"
        )]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the entries of a tree object",
        long_about = "This command lists the entries of a tree object, one per line. \
        Commits are peeled to their root tree."
    )]
    LsTree {
        #[arg(index = 1, help = "The tree to list")]
        target: String,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stages the given files in the index. \
        Directories are expanded recursively."
    )]
    Add {
        #[arg(index = 1, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit from the staged files with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command shows staged changes, unstaged changes and untracked files."
    )]
    Status,
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "This command walks the commit history from the given start point, \
        or from HEAD, and prints each commit."
    )]
    Log {
        #[arg(index = 1, help = "The commit to start from, defaults to HEAD")]
        start: Option<String>,
        #[arg(
            short,
            long,
            required = false,
            help = "Suppress warnings about unfetched parent commits"
        )]
        quiet: bool,
    },
    #[command(
        name = "branch",
        about = "List branches or create a new one",
        long_about = "This command lists the branches of the repository, or creates a new branch \
        pointing at the given start point, defaulting to HEAD."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "The commit the new branch should point at")]
        source: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a commit's working tree",
        long_about = "This command updates the working tree and the index to match the given \
        branch or commit, and moves HEAD there."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch or commit to check out")]
        target: String,
        #[arg(
            short = 'b',
            long,
            required = false,
            help = "Create the branch before switching to it"
        )]
        branch: bool,
    },
    #[command(
        name = "config",
        about = "Read or write a configuration value",
        long_about = "This command prints the value of a configuration key, or sets it when a \
        value is given. Multi-word values need no quoting."
    )]
    Config {
        #[arg(index = 1, help = "The configuration key")]
        key: String,
        #[arg(index = 2, help = "The value to set, omit to read the key")]
        value: Vec<String>,
    },
    #[command(
        name = "remote",
        about = "Manage the set of remote repositories",
        long_about = "This command adds, removes or lists the remote repositories this \
        repository synchronizes with."
    )]
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
    #[command(
        name = "clone",
        about = "Clone a remote repository",
        long_about = "This command clones a remote repository into a new directory, checks out \
        its default branch and configures the remote as origin."
    )]
    Clone {
        #[arg(index = 1, help = "The URL of the repository to clone")]
        url: String,
        #[arg(index = 2, help = "The directory to clone into")]
        directory: Option<String>,
    },
    #[command(
        name = "push",
        about = "Upload local commits to a remote",
        long_about = "This command uploads the commits of a branch to a remote repository and \
        advances the remote branch, refusing non-fast-forward updates."
    )]
    Push {
        #[arg(index = 1, help = "The remote to push to, defaults to origin")]
        remote: Option<String>,
        #[arg(index = 2, help = "The branch to push, defaults to the current branch")]
        branch: Option<String>,
    },
    #[command(
        name = "pull",
        about = "Download commits from a remote and fast-forward",
        long_about = "This command downloads the commits of a remote branch and fast-forwards \
        the local branch and working tree to match."
    )]
    Pull {
        #[arg(index = 1, help = "The remote to pull from, defaults to origin")]
        remote: Option<String>,
        #[arg(index = 2, help = "The branch to pull, defaults to the current branch")]
        branch: Option<String>,
    },
    #[command(
        name = "serve",
        about = "Serve this repository over HTTP",
        long_about = "This command serves the repository over HTTP so that other repositories \
        can clone, push and pull. Runs until interrupted."
    )]
    Serve {
        #[arg(
            long,
            default_value = "127.0.0.1:8000",
            help = "The address to listen on"
        )]
        addr: String,
        #[arg(long, help = "Require HTTP basic auth, given as user:pass")]
        auth: Option<String>,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    #[command(name = "add", about = "Add a remote")]
    Add {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
        #[arg(index = 2, help = "The URL of the remote")]
        url: String,
    },
    #[command(name = "remove", about = "Remove a remote")]
    Remove {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
    },
    #[command(name = "list", about = "List configured remotes")]
    List,
}

/// Locate the enclosing repository and make its root the working directory
///
/// Commands resolve workspace paths relative to the repository root, so
/// running from a subdirectory still works.
fn open_repository(writer: Box<dyn std::io::Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    let repository = Repository::discover(&pwd, writer)?;
    std::env::set_current_dir(repository.path())?;

    Ok(repository)
}

/// Anchor user-supplied file paths to the invocation directory
///
/// Must run before `open_repository`, which moves the process to the
/// repository root and would silently change what a relative path means.
fn anchor_paths(paths: Vec<String>) -> Result<Vec<String>> {
    let base = std::env::current_dir()?;

    Ok(paths
        .into_iter()
        .map(|path| {
            if Path::new(&path).is_absolute() {
                path
            } else {
                base.join(path).to_string_lossy().into_owned()
            }
        })
        .collect())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.init().await?
        }
        Commands::CatFile { object } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.cat_file(&object)?
        }
        Commands::HashObject { write, file } => {
            let file = anchor_paths(vec![file])?.remove(0);
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.hash_object(&file, write)?
        }
        Commands::LsTree { target } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.ls_tree(&target)?
        }
        Commands::Add { paths } => {
            let paths = anchor_paths(paths)?;
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.add(&paths).await?
        }
        Commands::Commit { message } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.commit(message.as_str()).await?
        }
        Commands::Status => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.status().await?
        }
        Commands::Log { start, quiet } => {
            let use_pager =
                std::io::stdout().is_terminal() && std::env::var_os("NO_PAGER").is_none();

            if use_pager {
                let pager = Pager::new();
                let repository = open_repository(Box::new(PagerWriter::new(pager.clone())))?;

                repository.log(start.as_deref(), quiet)?;
                minus::page_all(pager)?
            } else {
                let repository = open_repository(Box::new(std::io::stdout()))?;

                repository.log(start.as_deref(), quiet)?
            }
        }
        Commands::Branch { name, source } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.branch(name.as_deref(), source.as_deref())?
        }
        Commands::Checkout { target, branch } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.checkout(&target, branch).await?
        }
        Commands::Config { key, value } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            if value.is_empty() {
                repository.config_get(&key)?
            } else {
                repository.config_set(&key, &value.join(" "))?
            }
        }
        Commands::Remote { command } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            match command {
                RemoteCommands::Add { name, url } => repository.remote_add(&name, &url)?,
                RemoteCommands::Remove { name } => repository.remote_remove(&name)?,
                RemoteCommands::List => repository.remote_list()?,
            }
        }
        Commands::Clone { url, directory } => {
            clone::clone(&url, directory.as_deref(), Box::new(std::io::stdout())).await?
        }
        Commands::Push { remote, branch } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.push(remote.as_deref(), branch.as_deref()).await?
        }
        Commands::Pull { remote, branch } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.pull(remote.as_deref(), branch.as_deref()).await?
        }
        Commands::Serve { addr, auth } => {
            let repository = open_repository(Box::new(std::io::stdout()))?;

            repository.serve(&addr, auth.as_deref()).await?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
