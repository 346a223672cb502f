//! Node RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint
//! - Query chain state (chain id, block number, receipts)
//! - Bound every request with a timeout
//! - Provide health check for node connectivity

use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::receipt::{Receipt, ReceiptSource};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Node RPC client bound to a single endpoint.
#[derive(Clone)]
pub struct NodeClient {
    /// Name of the endpoint for logs and metrics (e.g. "mainnet").
    name: String,
    /// Endpoint URL as configured.
    rpc_url: String,
    provider: DynProvider,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl NodeClient {
    /// Create a client for an HTTP JSON-RPC endpoint.
    ///
    /// No request is made here; an unreachable node only shows up on first use.
    pub fn connect(name: &str, rpc_url: &str, timeout_secs: u64) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;

        Ok(Self::from_provider(
            name,
            rpc_url,
            ProviderBuilder::new().connect_http(url).erased(),
            timeout_secs,
        ))
    }

    /// Wrap an already-built provider (e.g. one with a wallet filler).
    pub fn from_provider(
        name: &str,
        rpc_url: &str,
        provider: DynProvider,
        timeout_secs: u64,
    ) -> Self {
        tracing::debug!(name = %name, rpc_url = %rpc_url, "Node client created");
        Self {
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
            provider,
            timeout_duration: Duration::from_secs(timeout_secs),
        }
    }

    /// Same endpoint, but transactions are signed locally by `wallet`.
    pub fn with_wallet(&self, wallet: &Wallet) -> BlockchainResult<Self> {
        let url: url::Url = self.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", self.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.network_wallet())
            .connect_http(url)
            .erased();

        Ok(Self {
            name: self.name.clone(),
            rpc_url: self.rpc_url.clone(),
            provider,
            timeout_duration: self.timeout_duration,
        })
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let chain_id = self.with_timeout(self.provider.get_chain_id()).await?;
        Ok(ChainId(chain_id))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.with_timeout(self.provider.get_block_number()).await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        let receipt = self
            .with_timeout(self.provider.get_transaction_receipt(tx_hash))
            .await?;
        Ok(receipt.map(Receipt::from))
    }

    /// Ask the endpoint to expose its accounts (`eth_requestAccounts`).
    ///
    /// Wallet extensions prompt the user here.
    pub async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.with_timeout(
            self.provider
                .raw_request::<[(); 0], Vec<Address>>("eth_requestAccounts".into(), []),
        )
        .await
    }

    /// Broadcast a transaction and return its hash.
    ///
    /// Without a wallet filler the endpoint signs (`eth_sendTransaction`).
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let pending = self.with_timeout(self.provider.send_transaction(tx)).await?;
        Ok(*pending.tx_hash())
    }

    /// Check if the node is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_node_health(&self.name, healthy);
        healthy
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn with_timeout<T, E, F>(&self, fut: F) -> BlockchainResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %self.name, error = %e, "RPC error");
                Err(BlockchainError::Rpc(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(endpoint = %self.name, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl ReceiptSource for NodeClient {
    async fn transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        self.get_transaction_receipt(tx_hash).await
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("name", &self.name)
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
