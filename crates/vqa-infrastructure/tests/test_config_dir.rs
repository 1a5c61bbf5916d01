use tempfile::TempDir;
use vqa_core::session::{ChatStateRepository, PersistedChatState};
use vqa_infrastructure::{ConfigService, TomlChatStateRepository, VqaPaths};

#[tokio::test]
async fn test_config_and_state_share_one_directory() {
    // Use temporary directory for test
    let temp_dir = TempDir::new().unwrap();
    let paths = VqaPaths::new(Some(temp_dir.path())).unwrap();

    let config = ConfigService::new(&paths).load().expect("Should create config");
    assert_eq!(config.channel.outbound_event, "stream_chat");

    let repo = TomlChatStateRepository::new(&paths);
    repo.save(&PersistedChatState {
        session_id: Some("S1".to_string()),
        current_group_id: None,
    })
    .await
    .expect("Should save chat state");

    assert!(paths.config_file().exists(), "config.toml should exist");
    assert!(paths.state_file().exists(), "chat_state.toml should exist");

    let mut entries: Vec<String> = std::fs::read_dir(paths.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["chat_state.toml", "config.toml"]);
}

#[tokio::test]
async fn test_corrupt_state_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let paths = VqaPaths::new(Some(temp_dir.path())).unwrap();
    std::fs::write(paths.state_file(), "session_id = [").unwrap();

    let err = TomlChatStateRepository::new(&paths).load().await.unwrap_err();
    assert!(err.is_serialization());
}
