use crate::common::command::init_repository_dir;
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn serve_prints_listening_address(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    assert!(guard.url().starts_with("http://127.0.0.1:"));

    Ok(())
}
