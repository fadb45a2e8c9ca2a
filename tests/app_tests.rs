use anyhow::Result;
use fabric_counter::core::app;
use fabric_counter::core::orchestrator::IdentityOutcome;
use fabric_counter::{FabricError, RunOverrides, Step, StepStatus};
use httpmock::prelude::*;
use tempfile::TempDir;

async fn write_profile(temp_dir: &TempDir, base_url: &str) -> Result<String> {
    let temp_path = temp_dir.path().to_str().unwrap();
    let normalized_path = temp_path.replace('\\', "/");

    let content = format!(
        r#"
name = "e2e-network"

[client]
organization = "Org1"
credential_store = "{path}/credentials"

[organizations.Org1]
msp_id = "Org1MSP"
certificate_authorities = ["ca.org1.example.com"]

[certificate_authorities."ca.org1.example.com"]
url = "{base}"

[gateway]
url = "{base}"

[channels.mychannel]
orderers = ["orderer.example.com"]

[run]
channel = "mychannel"
chaincode = "counter"
user = "appUser"
secret = "appUserpw"
"#,
        path = normalized_path,
        base = base_url
    );

    let profile_path = format!("{}/connection-profile.toml", temp_path);
    tokio::fs::write(&profile_path, content).await?;
    Ok(profile_path)
}

#[tokio::test]
async fn test_full_run_against_mock_network() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let enroll_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/enroll");
            then.status(201).json_body(serde_json::json!({
                "success": true,
                "result": {"Cert": "Q0VSVA=="},
                "errors": []
            }));
        })
        .await;

    let info_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/mychannel/ledger");
            then.status(200).json_body(serde_json::json!({
                "height": 3,
                "currentBlockHash": "aa",
                "previousBlockHash": "bb",
                "endorser": "peer0",
                "status": 200
            }));
        })
        .await;

    let config_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/mychannel/config");
            then.status(200).json_body(serde_json::json!({
                "id": "mychannel",
                "orderers": ["orderer.example.com:7050"],
                "versions": {}
            }));
        })
        .await;

    let initial_invoke = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/channels/mychannel/chaincodes/counter/invoke")
                .json_body(serde_json::json!({"fcn": "set", "args": ["john", "100"]}));
            then.status(200).json_body(serde_json::json!({"txId": "tx-100"}));
        })
        .await;

    let increment_invoke = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/channels/mychannel/chaincodes/counter/invoke")
                .json_body(serde_json::json!({"fcn": "set", "args": ["john", "42"]}));
            then.status(200).json_body(serde_json::json!({"txId": "tx-42"}));
        })
        .await;

    let query_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/channels/mychannel/chaincodes/counter/query")
                .json_body(serde_json::json!({"fcn": "query", "args": ["john"]}));
            then.status(200).json_body(serde_json::json!({
                "txId": "tx-q",
                "chaincodeStatus": 200,
                "payload": "41"
            }));
        })
        .await;

    let profile_path = write_profile(&temp_dir, &server.base_url()).await?;
    let report = app::execute(&profile_path, RunOverrides::default()).await?;

    assert!(report.succeeded(), "report: {:?}", report);
    assert_eq!(report.identity, Some(IdentityOutcome::Enrolled));
    assert_eq!(report.next_value.as_deref(), Some("42"));

    enroll_mock.assert_hits_async(1).await;
    info_mock.assert_hits_async(1).await;
    config_mock.assert_hits_async(1).await;
    initial_invoke.assert_hits_async(1).await;
    increment_invoke.assert_hits_async(1).await;
    query_mock.assert_hits_async(2).await;

    // 第二次執行時身份已存在，不再註冊
    let second = app::execute(&profile_path, RunOverrides::default()).await?;
    assert_eq!(second.identity, Some(IdentityOutcome::AlreadyEnrolled));
    enroll_mock.assert_hits_async(1).await;
    Ok(())
}

#[tokio::test]
async fn test_missing_profile_fails_before_any_call() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("connection-profile.toml");

    let result = app::execute(&missing, RunOverrides::default()).await;
    assert!(matches!(
        result,
        Err(FabricError::InitializationError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_invalid_profile_makes_no_network_calls() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let any_call = server
        .mock_async(|when, then| {
            when.path_matches(regex::Regex::new(".*").unwrap());
            then.status(200);
        })
        .await;

    let profile_path = write_profile(&temp_dir, &server.base_url()).await?;
    let content = tokio::fs::read_to_string(&profile_path).await?;
    tokio::fs::write(
        &profile_path,
        content.replace("organization = \"Org1\"", "organization = \"Missing\""),
    )
    .await?;

    let result = app::execute(&profile_path, RunOverrides::default()).await;
    assert!(matches!(
        result,
        Err(FabricError::InitializationError { .. })
    ));
    any_call.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_blank_run_settings_fail_fast() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let any_call = server
        .mock_async(|when, then| {
            when.path_matches(regex::Regex::new(".*").unwrap());
            then.status(200);
        })
        .await;

    let profile_path = write_profile(&temp_dir, &server.base_url()).await?;
    let overrides = RunOverrides {
        channel: Some("".to_string()),
        ..Default::default()
    };

    let result = app::execute(&profile_path, overrides).await;
    assert!(matches!(
        result,
        Err(FabricError::InvalidConfigValueError { ref field, .. }) if field == "channel"
    ));
    any_call.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_user_name_cannot_leave_credential_store() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    let any_call = server
        .mock_async(|when, then| {
            when.path_matches(regex::Regex::new(".*").unwrap());
            then.status(200);
        })
        .await;

    let profile_path = write_profile(&temp_dir, &server.base_url()).await?;
    let overrides = RunOverrides {
        user: Some("../escape".to_string()),
        ..Default::default()
    };

    let result = app::execute(&profile_path, overrides).await;
    assert!(matches!(
        result,
        Err(FabricError::InvalidConfigValueError { ref field, .. }) if field == "user"
    ));
    assert!(!temp_dir.path().join("credentials").exists());
    assert!(!temp_dir.path().join("escape@Org1MSP.json").exists());
    any_call.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_unreachable_ledger_does_not_block_chaincode() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/enroll");
            then.status(201).json_body(serde_json::json!({
                "success": true,
                "result": {"Cert": "Q0VSVA=="},
                "errors": []
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/channels/mychannel/");
            then.status(502).body("bad gateway");
        })
        .await;

    let invoke_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/channels/mychannel/chaincodes/counter/invoke");
            then.status(200).json_body(serde_json::json!({"txId": "tx"}));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/channels/mychannel/chaincodes/counter/query");
            then.status(200).json_body(serde_json::json!({"payload": "abc"}));
        })
        .await;

    let profile_path = write_profile(&temp_dir, &server.base_url()).await?;
    let report = app::execute(&profile_path, RunOverrides::default()).await?;

    assert!(matches!(
        report.status_of(Step::QueryChannelInfo),
        Some(StepStatus::Failed(_))
    ));
    assert_eq!(report.status_of(Step::QueryFinal), Some(&StepStatus::Succeeded));
    assert_eq!(report.next_value.as_deref(), Some("1"));
    assert_eq!(report.exit_code(), 2);
    invoke_mock.assert_hits_async(2).await;
    Ok(())
}
