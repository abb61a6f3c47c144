//! Integration tests for deploy transaction building
//!
//! This test validates:
//! - Local instruction sequence, amounts and fee transfer
//! - Upload failure aborting the build
//! - Fresh mint key pair per build
//! - External-trade strategy against a mock pinning and trade API
//! - Explicit failures for bad trade API responses

mod common;

use std::sync::Arc;

use common::{test_request, MockChain, MockUploader, MOCK_RENT, MOCK_URI};
use copymeme::tx_builder::config::LAUNCH_PROGRAM_ID;
use copymeme::tx_builder::{
    DeployConfig, DeployError, DeployStrategy, TokenDeployer, EXTERNAL_DEPLOY_SEQUENCE,
    LOCAL_DEPLOY_SEQUENCE,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::{v0::Message as MessageV0, VersionedMessage},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
#[allow(deprecated)]
use solana_sdk::system_instruction::SystemInstruction;
use spl_token::instruction::TokenInstruction;

fn deployer(chain: MockChain, uploader: MockUploader) -> TokenDeployer<MockChain, MockUploader> {
    TokenDeployer::new(Arc::new(chain), uploader, DeployConfig::new(Pubkey::new_unique()))
}

fn external_deployer(server: &Server) -> TokenDeployer<MockChain, MockUploader> {
    let mut config = DeployConfig::new(Pubkey::new_unique());
    config.trade_api.ipfs_url = format!("{}/api/ipfs", server.url());
    config.trade_api.trade_url = format!("{}/api/trade-local", server.url());
    TokenDeployer::new(Arc::new(MockChain::new()), MockUploader::new(), config)
}

fn trade_blob(create: Instruction) -> Vec<u8> {
    let payer = Keypair::new();
    let message = MessageV0::try_compile(
        &payer.pubkey(),
        &[ComputeBudgetInstruction::set_compute_unit_price(1), create],
        &[],
        Hash::default(),
    )
    .unwrap();
    let tx = VersionedTransaction {
        signatures: vec![Default::default(); message.header.num_required_signatures as usize],
        message: VersionedMessage::V0(message),
    };
    bincode::serialize(&tx).unwrap()
}

#[tokio::test]
async fn test_local_build_follows_deploy_sequence() {
    let chain = MockChain::new();
    let blockhash = chain.blockhash;
    let payer = Pubkey::new_unique();

    let built = deployer(chain, MockUploader::new())
        .build(DeployStrategy::Local, &test_request(), &payer)
        .await
        .unwrap();

    assert_eq!(built.steps(), &LOCAL_DEPLOY_SEQUENCE[..]);
    assert_eq!(built.instructions().len(), LOCAL_DEPLOY_SEQUENCE.len());
    assert_eq!(built.recent_blockhash(), blockhash);
    assert_eq!(built.transaction().message.account_keys[0], payer);
    // payer and mint
    assert_eq!(built.transaction().message.header.num_required_signatures, 2);
    assert_eq!(
        built.token_account(),
        spl_associated_token_account::get_associated_token_address(&payer, &built.mint())
    );
}

#[tokio::test]
async fn test_local_build_amounts() {
    let deployer = deployer(MockChain::new(), MockUploader::new());
    let payer = Pubkey::new_unique();
    let built = deployer
        .build(DeployStrategy::Local, &test_request(), &payer)
        .await
        .unwrap();
    let ixs = built.instructions();

    #[allow(deprecated)]
    match bincode::deserialize::<SystemInstruction>(&ixs[2].data).unwrap() {
        SystemInstruction::CreateAccount { lamports, space, owner } => {
            assert_eq!(lamports, MOCK_RENT);
            assert_eq!(space, 82);
            assert_eq!(owner, spl_token::id());
        }
        other => panic!("unexpected system instruction {:?}", other),
    }

    match TokenInstruction::unpack(&ixs[3].data).unwrap() {
        TokenInstruction::InitializeMint { decimals, mint_authority, freeze_authority } => {
            assert_eq!(decimals, 6);
            assert_eq!(mint_authority, payer);
            assert_eq!(freeze_authority, Some(payer).into());
        }
        other => panic!("unexpected token instruction {:?}", other),
    }

    match TokenInstruction::unpack(&ixs[5].data).unwrap() {
        TokenInstruction::MintTo { amount } => assert_eq!(amount, 1_000_000_000),
        other => panic!("unexpected token instruction {:?}", other),
    }

    let fee = ixs.last().unwrap();
    assert_eq!(fee.accounts[1].pubkey, deployer.config().platform_fee_account);
    #[allow(deprecated)]
    match bincode::deserialize::<SystemInstruction>(&fee.data).unwrap() {
        SystemInstruction::Transfer { lamports } => assert_eq!(lamports, 1_000_000),
        other => panic!("unexpected system instruction {:?}", other),
    }
}

#[tokio::test]
async fn test_local_build_uploads_metadata_document() {
    let uploader = MockUploader::new();
    let uploads = uploader.uploads.clone();
    let built = deployer(MockChain::new(), uploader)
        .build(DeployStrategy::Local, &test_request(), &Pubkey::new_unique())
        .await
        .unwrap();

    let uploads = uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].name, "Test");
    assert_eq!(uploads[0].symbol, "TST");
    assert_eq!(uploads[0].image.as_deref(), Some("https://img.example/test.png"));
    assert!(uploads[0].show_name);
    assert_eq!(uploads[0].tags, vec!["meme".to_string()]);

    let metadata_ix = &built.instructions()[6];
    let uri_bytes = MOCK_URI.as_bytes();
    assert!(metadata_ix
        .data
        .windows(uri_bytes.len())
        .any(|window| window == uri_bytes));
}

#[tokio::test]
async fn test_upload_failure_aborts_build() {
    let chain = MockChain::new();
    let blockhash_calls = chain.blockhash_calls.clone();

    let err = deployer(chain, MockUploader::new_failing())
        .build(DeployStrategy::Local, &test_request(), &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Upload { .. }));
    assert!(err.is_retryable());
    assert_eq!(*blockhash_calls.lock().await, 0);
}

#[tokio::test]
async fn test_empty_uri_aborts_build() {
    let err = deployer(MockChain::new(), MockUploader::new_empty())
        .build(DeployStrategy::Local, &test_request(), &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Upload { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_invalid_request_rejected_before_upload() {
    let uploader = MockUploader::new();
    let uploads = uploader.uploads.clone();
    let mut request = test_request();
    request.decimals = 18;
    request.total_supply = 1_000_000_000_000;

    let err = deployer(MockChain::new(), uploader)
        .build(DeployStrategy::Local, &request, &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidRequest(_)));
    assert!(uploads.lock().await.is_empty());
}

#[tokio::test]
async fn test_each_build_generates_fresh_mint() {
    let deployer = deployer(MockChain::new(), MockUploader::new());
    let payer = Pubkey::new_unique();
    let request = test_request();

    let first = deployer.build(DeployStrategy::Local, &request, &payer).await.unwrap();
    let second = deployer.build(DeployStrategy::Local, &request, &payer).await.unwrap();

    assert_ne!(first.mint(), second.mint());
    assert_ne!(first.token_account(), second.token_account());
}

#[tokio::test]
async fn test_external_build_merges_create_and_buy() {
    let mut server = Server::new_async().await;
    let create = Instruction::new_with_bytes(
        LAUNCH_PROGRAM_ID,
        &[24, 30, 200, 40, 5, 28, 7, 119],
        vec![
            AccountMeta::new(Pubkey::new_unique(), true),
            AccountMeta::new_readonly(Pubkey::new_unique(), false),
        ],
    );

    let image = server
        .mock("GET", "/test.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body("PNGDATA")
        .create_async()
        .await;
    let pin = server
        .mock("POST", "/api/ipfs")
        .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="showName""#.into()),
            Matcher::Regex("PNGDATA".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"metadataUri":"https://ipfs.io/ipfs/QmTest"}"#)
        .create_async()
        .await;
    let trade = server
        .mock("POST", "/api/trade-local")
        .match_body(Matcher::PartialJson(json!({
            "action": "create",
            "tokenMetadata": {"name": "Test", "symbol": "TST", "uri": "https://ipfs.io/ipfs/QmTest"},
            "denominatedInSol": "false",
            "amount": 100000,
            "slippage": 5,
            "pool": "pump"
        })))
        .with_status(200)
        .with_body(trade_blob(create.clone()))
        .create_async()
        .await;

    let mut request = test_request();
    request.image_url = Some(format!("{}/test.png", server.url()));
    let payer = Pubkey::new_unique();

    let built = external_deployer(&server)
        .build(DeployStrategy::ExternalTrade, &request, &payer)
        .await
        .unwrap();

    assert_eq!(built.steps(), &EXTERNAL_DEPLOY_SEQUENCE[..]);
    let ixs = built.instructions();
    assert_eq!(ixs[2], create);
    assert_eq!(ixs[3].program_id, spl_associated_token_account::id());
    assert_eq!(ixs[4].program_id, LAUNCH_PROGRAM_ID);
    assert_eq!(&ixs[4].data[8..16], &10_000_000_000u64.to_le_bytes());
    assert_eq!(&ixs[4].data[16..24], &10_000_000u64.to_le_bytes());
    assert_eq!(ixs[4].accounts[6].pubkey, payer);

    image.assert_async().await;
    pin.assert_async().await;
    trade.assert_async().await;
}

async fn pinned_server() -> ServerGuard {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/test.png")
        .with_status(200)
        .with_body("PNGDATA")
        .create_async()
        .await;
    server
        .mock("POST", "/api/ipfs")
        .with_status(200)
        .with_body(r#"{"metadataUri":"https://ipfs.io/ipfs/QmTest"}"#)
        .create_async()
        .await;
    server
}

#[tokio::test]
async fn test_external_status_error_is_explicit() {
    let mut server = pinned_server().await;
    let _trade = server
        .mock("POST", "/api/trade-local")
        .with_status(400)
        .with_body("bad request")
        .create_async()
        .await;

    let mut request = test_request();
    request.image_url = Some(format!("{}/test.png", server.url()));
    let err = external_deployer(&server)
        .build(DeployStrategy::ExternalTrade, &request, &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::ExternalTrade { status: 400 }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_external_missing_create_instruction() {
    let mut server = pinned_server().await;
    let unrelated = Instruction::new_with_bytes(Pubkey::new_unique(), &[1], vec![]);
    let _trade = server
        .mock("POST", "/api/trade-local")
        .with_status(200)
        .with_body(trade_blob(unrelated))
        .create_async()
        .await;

    let mut request = test_request();
    request.image_url = Some(format!("{}/test.png", server.url()));
    let err = external_deployer(&server)
        .build(DeployStrategy::ExternalTrade, &request, &Pubkey::new_unique())
        .await
        .unwrap_err();

    match err {
        DeployError::MissingCreateInstruction { program } => {
            assert_eq!(program, LAUNCH_PROGRAM_ID.to_string())
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_external_undecodable_blob() {
    let mut server = pinned_server().await;
    let _trade = server
        .mock("POST", "/api/trade-local")
        .with_status(200)
        .with_body("definitely not a transaction")
        .create_async()
        .await;

    let mut request = test_request();
    request.image_url = Some(format!("{}/test.png", server.url()));
    let err = external_deployer(&server)
        .build(DeployStrategy::ExternalTrade, &request, &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_external_pin_failure_is_upload_error() {
    let mut server = Server::new_async().await;
    let _image = server
        .mock("GET", "/test.png")
        .with_status(404)
        .create_async()
        .await;

    let mut request = test_request();
    request.image_url = Some(format!("{}/test.png", server.url()));
    let err = external_deployer(&server)
        .build(DeployStrategy::ExternalTrade, &request, &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Upload { .. }));
    assert!(!err.is_retryable());
}
