use httpmock::prelude::*;
use dog_house::{
    ApiClient, CliConfig, DogHouseError, DogHousePipeline, EtlEngine, LocalStorage, TomlConfig,
};
use tempfile::TempDir;

fn mock_collections(server: &MockServer) -> (httpmock::Mock<'_>, httpmock::Mock<'_>) {
    let breeds = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/breeds/")
            .header("authorization", "JWT secret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [
                    {"id": 1, "name": "Kiltro"},
                    {"id": 2, "name": "Beagle"},
                    {"id": 3, "name": "Poodle"}
                ]
            }));
    });

    let dogs = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/dogs/")
            .header("authorization", "JWT secret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [
                    {"id": 1, "name": "Rex", "breed": 2},
                    {"id": 2, "name": "Fido", "breed": 3},
                    {"id": 3, "name": "Rex", "breed": 2},
                    {"id": 4, "name": "Fido", "breed": 3},
                    {"id": 5, "name": "Rex", "breed": 1},
                    {"id": 6, "name": "Ghost", "breed": 42}
                ]
            }));
    });

    (breeds, dogs)
}

fn cli_config(server: &MockServer) -> CliConfig {
    CliConfig {
        base_url: Some(server.base_url()),
        token: Some("secret".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_end_to_end_run_submits_answer() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let (breeds_mock, dogs_mock) = mock_collections(&server);
    let answer_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/answer/")
            .header("authorization", "JWT secret")
            .json_body(serde_json::json!({
                "total_dogs": 6,
                "total_breeds": 3,
                "common_breed": "Beagle",
                "common_dog_name": "Rex"
            }));
        then.status(200).json_body(serde_json::json!({"status": "ok"}));
    });

    let config = CliConfig {
        output_path: Some(output_path.clone()),
        ..cli_config(&server)
    };
    let api = ApiClient::new(&server.base_url()).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = DogHousePipeline::new(api, Some(storage), config);

    let report = EtlEngine::new_with_monitoring(pipeline, true)
        .run()
        .await
        .unwrap();

    breeds_mock.assert();
    dogs_mock.assert();
    answer_mock.assert();

    assert_eq!(report.answer.common_breed, "Beagle");
    assert_eq!(report.response, Some(serde_json::json!({"status": "ok"})));

    let full_path = std::path::Path::new(&output_path).join("answer.json");
    assert!(full_path.exists());
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&full_path).unwrap()).unwrap();
    assert_eq!(written["answer"]["total_dogs"], 6);
    assert_eq!(written["orphan_dogs"], 1);
    assert!(written["generated_at"].is_string());
}

#[tokio::test]
async fn test_dry_run_skips_submission() {
    let server = MockServer::start();
    let (breeds_mock, dogs_mock) = mock_collections(&server);
    let answer_mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/answer/");
        then.status(200);
    });

    let config = CliConfig {
        dry_run: true,
        ..cli_config(&server)
    };
    let api = ApiClient::new(&server.base_url()).unwrap();
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, config);

    let report = EtlEngine::new(pipeline).run().await.unwrap();

    breeds_mock.assert();
    dogs_mock.assert();
    answer_mock.assert_hits(0);
    assert!(report.response.is_none());
    assert_eq!(report.answer.common_dog_name, "Rex");
}

#[tokio::test]
async fn test_run_authenticates_when_no_token() {
    let server = MockServer::start();
    let auth_mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/auth/");
        then.status(200).json_body(serde_json::json!({"token": "secret"}));
    });
    let (breeds_mock, dogs_mock) = mock_collections(&server);

    let config = CliConfig {
        base_url: Some(server.base_url()),
        email: Some("someone@magnet.cl".to_string()),
        password: Some("hunter2".to_string()),
        dry_run: true,
        ..Default::default()
    };
    let api = ApiClient::new(&server.base_url()).unwrap();
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, config);

    let report = EtlEngine::new(pipeline).run().await.unwrap();

    auth_mock.assert();
    breeds_mock.assert();
    dogs_mock.assert();
    assert_eq!(report.answer.total_breeds, 3);
}

#[tokio::test]
async fn test_missing_token_stops_before_any_request() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.path_contains("/api/v1/");
        then.status(200);
    });

    let config = CliConfig {
        base_url: Some(server.base_url()),
        ..Default::default()
    };
    let api = ApiClient::new(&server.base_url()).unwrap();
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, config);

    let result = EtlEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(DogHouseError::MissingToken)));
    any_mock.assert_hits(0);
}

#[tokio::test]
async fn test_api_failure_aborts_before_submission() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/breeds/");
        then.status(200).json_body(serde_json::json!({"results": [{"id": 1, "name": "Kiltro"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/dogs/");
        then.status(503);
    });
    let answer_mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/answer/");
        then.status(200);
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, cli_config(&server));

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, DogHouseError::Request { .. }));
    answer_mock.assert_hits(0);
}

#[tokio::test]
async fn test_empty_dogs_reports_empty_collection() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/breeds/");
        then.status(200).json_body(serde_json::json!({"results": [{"id": 1, "name": "Kiltro"}]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/dogs/");
        then.status(200).json_body(serde_json::json!({"results": []}));
    });

    let api = ApiClient::new(&server.base_url()).unwrap();
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, cli_config(&server));

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(
        err,
        DogHouseError::EmptyCollection { collection: "dogs" }
    ));
}

#[tokio::test]
async fn test_toml_config_drives_run() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let (breeds_mock, dogs_mock) = mock_collections(&server);

    let config_content = format!(
        r#"
[api]
base_url = "{}"
timeout_seconds = 5

[auth]
token = "secret"

[run]
dry_run = true
"#,
        server.base_url()
    );
    let config_path = temp_dir.path().join("dog-house.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    let api = ApiClient::with_timeout(
        &config.api.base_url,
        config.api.timeout_seconds.map(std::time::Duration::from_secs),
    )?;
    let pipeline = DogHousePipeline::<_, LocalStorage, _>::new(api, None, config);

    let report = EtlEngine::new(pipeline).run().await?;

    breeds_mock.assert();
    dogs_mock.assert();
    assert_eq!(report.answer.total_dogs, 6);
    Ok(())
}
