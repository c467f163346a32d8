use crate::error::{HolderError, HolderResult};
use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::ClientError,
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::RpcFilterType,
};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Extra time given to the HTTP transport so the per-call bound always expires first
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Read-only view of the ledger used by the holder pipeline.
///
/// Implementations must be safe to share between concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch one account; `Ok(None)` when it does not exist.
    async fn get_account(&self, pubkey: &Pubkey) -> HolderResult<Option<Account>>;

    /// Fetch every account owned by `program_id` that passes all `filters`.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<RpcFilterType>,
    ) -> HolderResult<Vec<(Pubkey, Account)>>;

    async fn get_latest_blockhash(&self) -> HolderResult<Hash>;
}

/// `LedgerClient` over the nonblocking JSON-RPC client.
///
/// Every call is bounded by `timeout`; expiry surfaces as `UpstreamUnavailable`.
pub struct RpcLedgerClient {
    rpc_client: Arc<RpcClient>,
    timeout: Duration,
}

impl RpcLedgerClient {
    pub fn new(url: String, commitment: CommitmentConfig, timeout: Duration) -> Self {
        let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
            url,
            timeout + TRANSPORT_GRACE,
            commitment,
        ));
        Self { rpc_client, timeout }
    }

    pub fn url(&self) -> String {
        self.rpc_client.url()
    }

    async fn bounded<T, F>(&self, operation: &str, call: F) -> HolderResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(HolderError::upstream(operation, e)),
            Err(_) => Err(HolderError::UpstreamUnavailable(format!(
                "{}: timed out after {}s",
                operation,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_account(&self, pubkey: &Pubkey) -> HolderResult<Option<Account>> {
        debug!("getAccountInfo {}", pubkey);
        let response = self
            .bounded(
                &format!("Failed to fetch account {}", pubkey),
                self.rpc_client
                    .get_account_with_commitment(pubkey, self.rpc_client.commitment()),
            )
            .await?;
        Ok(response.value)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: Vec<RpcFilterType>,
    ) -> HolderResult<Vec<(Pubkey, Account)>> {
        debug!("getProgramAccounts {} with {} filters", program_id, filters.len());
        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.rpc_client.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };

        self.bounded(
            "Failed to fetch token accounts",
            self.rpc_client
                .get_program_accounts_with_config(program_id, config),
        )
        .await
    }

    async fn get_latest_blockhash(&self) -> HolderResult<Hash> {
        self.bounded(
            "Failed to get recent blockhash",
            self.rpc_client.get_latest_blockhash(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rpc_ledger_client_creation() {
        let client = RpcLedgerClient::new(
            "https://api.mainnet-beta.solana.com".to_string(),
            CommitmentConfig::confirmed(),
            Duration::from_secs(5),
        );

        assert_eq!(client.url(), "https://api.mainnet-beta.solana.com");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_error() {
        let client = RpcLedgerClient::new(
            "http://127.0.0.1:1".to_string(),
            CommitmentConfig::confirmed(),
            Duration::from_secs(2),
        );

        let err = client.get_latest_blockhash().await.unwrap_err();
        assert!(matches!(err, HolderError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        // accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = RpcLedgerClient::new(
            format!("http://{}", addr),
            CommitmentConfig::confirmed(),
            Duration::from_secs(1),
        );

        let started = std::time::Instant::now();
        let err = client.get_account(&Pubkey::new_unique()).await.unwrap_err();
        server.abort();

        match err {
            HolderError::UpstreamUnavailable(msg) => {
                assert!(msg.contains("timed out after 1s"), "unexpected message: {}", msg)
            }
            other => panic!("expected UpstreamUnavailable, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
