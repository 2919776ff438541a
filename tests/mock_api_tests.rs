//! Mock API tests for the transcription client
//!
//! These tests point the Whisper client at a local wiremock server, so they
//! exercise the full request/response path without real credentials.

use podsplit::transcribe::{Transcriber, WhisperClient};

use std::path::PathBuf;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_fake_audio(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("episode_1.mp3");
    std::fs::write(&path, b"not really audio").unwrap();
    path
}

// ============================================================================
// Whisper API Mock Tests
// ============================================================================

mod whisper_tests {
    use super::*;

    #[tokio::test]
    async fn test_transcribe_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "  Добро пожаловать в подкаст.  ",
                "language": "russian"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = write_fake_audio(&dir);

        let client = WhisperClient::new("test-api-key".to_string())
            .with_language("ru".to_string())
            .with_api_url(format!("{}/v1/audio/transcriptions", server.uri()));

        let transcript = client.transcribe(&audio).await.unwrap();
        assert_eq!(transcript.text, "Добро пожаловать в подкаст.");
        assert_eq!(transcript.language.as_deref(), Some("russian"));
    }

    #[tokio::test]
    async fn test_transcribe_response_without_language() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "text": "hello" })),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = write_fake_audio(&dir);

        let client = WhisperClient::new("test-api-key".to_string())
            .with_api_url(format!("{}/v1/audio/transcriptions", server.uri()));

        let transcript = client.transcribe(&audio).await.unwrap();
        assert_eq!(transcript.text, "hello");
        assert!(transcript.language.is_none());
    }

    #[tokio::test]
    async fn test_transcribe_client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = write_fake_audio(&dir);

        let client = WhisperClient::new("test-api-key".to_string())
            .with_api_url(format!("{}/v1/audio/transcriptions", server.uri()));

        let result = client.transcribe(&audio).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transcribe_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.mp3");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(26 * 1024 * 1024).unwrap();

        let client = WhisperClient::new("test-api-key".to_string());
        let result = client.transcribe(&path).await;

        let message = result.unwrap_err().to_string();
        assert!(message.contains("too large"));
    }

    #[tokio::test]
    async fn test_transcribe_missing_file() {
        let client = WhisperClient::new("test-api-key".to_string());
        let result = client
            .transcribe(std::path::Path::new("/tmp/nonexistent_podsplit_test.mp3"))
            .await;
        assert!(result.is_err());
    }
}
