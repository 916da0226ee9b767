//! # End-to-End Pipeline Flows
//!
//! Drive the real service (real file wallet, real file signature store,
//! real artifact layout) against the mock codec and mock ordering
//! service: the update pipeline end to end, including quorum rejection,
//! stale-base rejection, and signature re-validation.

use crate::support::{
    application_channel_group, enroll_org, organization_definition, MockCodec, MockOrderer,
    TestMachine, TestOrg,
};
use channel_update::ports::outbound::ConfigCodec;
use channel_update::{ChannelUpdateApi, UpdateError, UpdateIntent};
use serde_json::{json, Value};
use shared_types::{ChannelName, MessageType, OrganizationDefinition};

fn add_org_intent(msp_id: &str) -> UpdateIntent {
    let org: OrganizationDefinition =
        serde_json::from_value(organization_definition(msp_id)).unwrap();
    UpdateIntent::AddApplicationOrg {
        msp_id: msp_id.to_string(),
        org,
    }
}

fn bootstrap_channel(
    orderer: &MockOrderer,
    channel: &ChannelName,
    members: &[&TestOrg],
) {
    orderer.create_channel(channel, application_channel_group(members));
    for member in members {
        orderer.register_org(&member.org.msp_id, member.verifying_key);
    }
}

/// Test: the drafted delta contains only the new org, wrapped in the
/// fixed envelope shape, computed against the committed base
#[tokio::test]
async fn test_drafted_delta_is_minimal() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;
    let org2 = enroll_org(wallet.path(), "Org2")?;
    let org3 = enroll_org(wallet.path(), "Org3")?;

    let orderer = MockOrderer::new(3);
    let channel = ChannelName::parse("mychannel")?;
    bootstrap_channel(&orderer, &channel, &[&org1, &org2]);
    orderer.register_org(&org3.org.msp_id, org3.verifying_key);

    let machine = TestMachine::bootstrap(orderer, wallet.path())?;
    let request = machine
        .service
        .draft_update(&channel, &add_org_intent("Org3MSP"), &org1.org)
        .await?;

    let envelope: Value = serde_json::from_slice(&std::fs::read(&request.envelope_path)?)?;
    let header = &envelope["payload"]["header"]["channel_header"];
    assert_eq!(header["type"], json!(2));
    assert_eq!(header["channel_id"], json!("mychannel"));

    let config_update = &envelope["payload"]["data"]["config_update"];
    assert_eq!(config_update["channel_id"], json!("mychannel"));
    assert_eq!(config_update["base_sequence"], json!(0));

    // Only the Org3MSP addition, nothing else from the tree.
    let added: Vec<_> = config_update["write_set"]["groups"]["Application"]["groups"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(added, ["Org3MSP"]);
    assert!(config_update["write_set"]["groups"]
        .as_object()
        .unwrap()
        .get("Orderer")
        .is_none());
    Ok(())
}

/// Test: with a 3-of-3 policy, two deposited signatures are rejected and
/// nothing commits
#[tokio::test]
async fn test_insufficient_signatures_rejected() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;
    let org2 = enroll_org(wallet.path(), "Org2")?;
    let org3 = enroll_org(wallet.path(), "Org3")?;

    let orderer = MockOrderer::new(3);
    let channel = ChannelName::parse("mychannel")?;
    bootstrap_channel(&orderer, &channel, &[&org1, &org2, &org3]);

    let machine = TestMachine::bootstrap(orderer.clone(), wallet.path())?;
    let request = machine
        .service
        .draft_update(&channel, &add_org_intent("Org4MSP"), &org1.org)
        .await?;

    machine.service.sign_update(&request, &org1.org).await?;
    machine.service.sign_update(&request, &org2.org).await?;

    let err = machine
        .service
        .submit_update(request, &org1.org)
        .await
        .unwrap_err();
    match err {
        UpdateError::Policy(rejection) => {
            assert_eq!(rejection.status, "BAD_REQUEST");
            assert!(rejection.info.contains("2 of 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // the request is terminal, the remote config untouched
    assert_eq!(orderer.sequence(&channel), Some(0));
    let committed = orderer.channel_group(&channel).unwrap();
    assert!(committed["groups"]["Application"]["groups"]
        .as_object()
        .unwrap()
        .get("Org4MSP")
        .is_none());
    Ok(())
}

/// Test: full quorum commits, and applying the delta remotely reproduces
/// exactly the locally patched config
#[tokio::test]
async fn test_full_quorum_commits() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;
    let org2 = enroll_org(wallet.path(), "Org2")?;
    let org3 = enroll_org(wallet.path(), "Org3")?;

    let orderer = MockOrderer::new(3);
    let channel = ChannelName::parse("mychannel")?;
    bootstrap_channel(&orderer, &channel, &[&org1, &org2, &org3]);

    let machine = TestMachine::bootstrap(orderer.clone(), wallet.path())?;
    let request = machine
        .service
        .draft_update(&channel, &add_org_intent("Org4MSP"), &org1.org)
        .await?;

    for signer in [&org1, &org2, &org3] {
        machine.service.sign_update(&request, &signer.org).await?;
    }

    let receipt = machine.service.submit_update(request, &org1.org).await?;
    assert_eq!(receipt.channel, channel);
    assert_eq!(receipt.tx_id.len(), 64);
    assert!(receipt.tx_id.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(orderer.sequence(&channel), Some(1));
    let committed = orderer.channel_group(&channel).unwrap();
    let members = committed["groups"]["Application"]["groups"]
        .as_object()
        .unwrap();
    assert_eq!(members.len(), 4);
    assert_eq!(members["Org4MSP"], organization_definition("Org4MSP"));
    Ok(())
}

/// Test: two operators draft from the same snapshot; the second submission
/// is rejected as stale and succeeds only after regenerating from a fresh
/// fetch
#[tokio::test]
async fn test_stale_base_rejected_then_regenerated() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;
    let org2 = enroll_org(wallet.path(), "Org2")?;

    let orderer = MockOrderer::new(1);
    let channel = ChannelName::parse("mychannel")?;
    bootstrap_channel(&orderer, &channel, &[&org1, &org2]);

    // independent machines, shared ordering service
    let machine_a = TestMachine::bootstrap(orderer.clone(), wallet.path())?;
    let machine_b = TestMachine::bootstrap(orderer.clone(), wallet.path())?;

    // both draft against sequence 0
    let request_a = machine_a
        .service
        .draft_update(&channel, &add_org_intent("Org3MSP"), &org1.org)
        .await?;
    let request_b = machine_b
        .service
        .draft_update(&channel, &add_org_intent("Org4MSP"), &org2.org)
        .await?;

    machine_a.service.sign_update(&request_a, &org1.org).await?;
    machine_a.service.submit_update(request_a, &org1.org).await?;
    assert_eq!(orderer.sequence(&channel), Some(1));

    // whoever submits second must be rejected, never silently applied
    machine_b.service.sign_update(&request_b, &org2.org).await?;
    let err = machine_b
        .service
        .submit_update(request_b, &org2.org)
        .await
        .unwrap_err();
    match err {
        UpdateError::Policy(rejection) => {
            assert!(rejection.info.contains("sequence mismatch"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(orderer.sequence(&channel), Some(1));

    // regenerate from a fresh fetch; the new base sees Org3MSP already in
    let request_b = machine_b
        .service
        .draft_update(&channel, &add_org_intent("Org4MSP"), &org2.org)
        .await?;
    machine_b.service.sign_update(&request_b, &org2.org).await?;
    machine_b.service.submit_update(request_b, &org2.org).await?;

    assert_eq!(orderer.sequence(&channel), Some(2));
    let members = orderer.channel_group(&channel).unwrap()["groups"]["Application"]["groups"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(members, ["Org1MSP", "Org2MSP", "Org3MSP", "Org4MSP"]);
    Ok(())
}

/// Test: a tampered deposit fails the ordering service's signature
/// re-validation
#[tokio::test]
async fn test_tampered_signature_rejected() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;

    let orderer = MockOrderer::new(1);
    let channel = ChannelName::parse("mychannel")?;
    bootstrap_channel(&orderer, &channel, &[&org1]);

    let machine = TestMachine::bootstrap(orderer, wallet.path())?;
    let request = machine
        .service
        .draft_update(&channel, &add_org_intent("Org2MSP"), &org1.org)
        .await?;
    let deposit = machine.service.sign_update(&request, &org1.org).await?;

    // flip the signature bytes, keeping the file well-formed
    let mut signature: Value = serde_json::from_slice(&std::fs::read(&deposit)?)?;
    signature["signature"] = json!("Zm9yZ2Vk");
    std::fs::write(&deposit, serde_json::to_vec_pretty(&signature)?)?;

    let err = machine
        .service
        .submit_update(request, &org1.org)
        .await
        .unwrap_err();
    match err {
        UpdateError::Policy(rejection) => {
            assert_eq!(rejection.status, "FORBIDDEN");
            assert!(rejection.info.contains("Org1MSP"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

/// Test: drafting against a channel the ordering service does not know
#[tokio::test]
async fn test_unknown_channel() -> anyhow::Result<()> {
    let wallet = tempfile::tempdir()?;
    let org1 = enroll_org(wallet.path(), "Org1")?;

    let machine = TestMachine::bootstrap(MockOrderer::new(1), wallet.path())?;
    let channel = ChannelName::parse("nosuchchannel")?;

    let err = machine
        .service
        .draft_update(&channel, &add_org_intent("Org2MSP"), &org1.org)
        .await
        .unwrap_err();
    assert!(matches!(err, UpdateError::ChannelNotFound(name) if name == "nosuchchannel"));
    Ok(())
}

/// Test: decode(encode(T)) is structurally identical to T through the
/// codec port
#[tokio::test]
async fn test_codec_round_trip() -> anyhow::Result<()> {
    let codec = MockCodec;
    let tree = json!({
        "sequence": 3,
        "channel_group": application_channel_group(&[]),
    });

    for message_type in [
        MessageType::Config,
        MessageType::ConfigUpdate,
        MessageType::Envelope,
    ] {
        let encoded = codec.encode(&tree, message_type).await?;
        let decoded = codec.decode(&encoded, message_type).await?;
        assert_eq!(decoded, tree);
    }
    Ok(())
}
