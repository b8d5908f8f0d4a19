use crate::common::command::init_repository_dir;
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use orb::artifacts::objects::object_id::ObjectId;
use orb::sync::client::SyncClient;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn ref_update_requires_matching_expectation(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;
    let client = SyncClient::new(guard.url(), None)?;

    let refs = client.fetch_refs().await?;
    let (main_ref, tip) = refs
        .iter()
        .find(|(sym_ref, _)| sym_ref.to_short_name() == "main")
        .ok_or("no main branch advertised")?;

    // An expectation that no longer matches the served ref must be refused
    let stale = ObjectId::try_parse("1".repeat(40))?;
    let error = client
        .update_ref(main_ref, Some(&stale), tip)
        .await
        .unwrap_err();

    assert!(format!("{error:#}").contains("server rejected ref update"));

    Ok(())
}
