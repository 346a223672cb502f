//! Connection and signer selection per environment.
//!
//! # Responsibilities
//! - Build one client per configured endpoint at startup
//! - Pick the client and signer for the active `Environment`
//! - Link a wallet-extension account on request
//! - Broadcast transactions and hand them to the confirmation tracker

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use tokio::sync::broadcast;

use crate::blockchain::client::NodeClient;
use crate::blockchain::environment::Environment;
use crate::blockchain::receipt::ReceiptSource;
use crate::blockchain::transaction::{ConfirmationTracker, TransactionState};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::AppConfig;

/// Who signs transactions in the active environment.
#[derive(Debug, Clone)]
pub enum SignerHandle {
    /// Private key held by this process.
    Local(Wallet),
    /// Account linked through a wallet extension; the extension signs.
    Extension { address: Address },
}

impl SignerHandle {
    pub fn address(&self) -> Address {
        match self {
            SignerHandle::Local(wallet) => wallet.address(),
            SignerHandle::Extension { address } => *address,
        }
    }
}

/// All node connections for one process, built once from config.
#[derive(Debug)]
pub struct ProviderSet {
    env: Environment,
    mainnet: NodeClient,
    local: NodeClient,
    extension: Option<NodeClient>,
    wallet: Option<Wallet>,
    extension_address: Option<Address>,
}

impl ProviderSet {
    /// Create clients for every configured endpoint.
    ///
    /// Fails if an endpoint URL is invalid, or if the environment signs
    /// locally and no usable private key is configured. A missing wallet
    /// extension is not an error.
    pub fn new(config: &AppConfig) -> BlockchainResult<Self> {
        let timeout_secs = config.rpc.timeout_secs;
        let mainnet = NodeClient::connect("mainnet", &config.rpc.mainnet, timeout_secs)?;
        let local = NodeClient::connect("local", &config.rpc.local, timeout_secs)?;

        let extension = match config.rpc.wallet_extension.as_deref() {
            Some(url) => match NodeClient::connect("browser_extension", url, timeout_secs) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::info!(error = %e, "No wallet extension found");
                    None
                }
            },
            None => {
                tracing::info!("No wallet extension found");
                None
            }
        };

        let wallet = match Wallet::load(config.wallet.private_key.as_deref(), config.wallet.chain_id) {
            Ok(wallet) => Some(wallet),
            Err(e) if config.env.uses_local_wallet() => return Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "No local wallet loaded");
                None
            }
        };

        tracing::info!(
            env = %config.env,
            extension = extension.is_some(),
            "Provider set initialized"
        );

        Ok(Self {
            env: config.env,
            mainnet,
            local,
            extension,
            wallet,
            extension_address: None,
        })
    }

    pub fn environment(&self) -> Environment {
        self.env
    }

    /// Mainnet client, regardless of environment. Used for pricing reads.
    pub fn mainnet_provider(&self) -> &NodeClient {
        &self.mainnet
    }

    /// Client for the active environment.
    ///
    /// `None` only in `BrowserExtension` mode without an extension endpoint.
    pub fn provider(&self) -> Option<&NodeClient> {
        match self.env {
            Environment::BrowserExtension => self.extension.as_ref(),
            Environment::Production => Some(&self.mainnet),
            Environment::Local => Some(&self.local),
        }
    }

    /// Active client as a receipt source for the tracker.
    pub fn receipt_source(&self) -> Option<&dyn ReceiptSource> {
        self.provider().map(|client| client as &dyn ReceiptSource)
    }

    /// Signer for the active environment.
    pub fn signer(&self) -> BlockchainResult<SignerHandle> {
        if self.provider().is_none() {
            return Err(BlockchainError::NotAvailable(
                "Cannot get wallet without connected provider".to_string(),
            ));
        }

        match self.env {
            Environment::BrowserExtension => self
                .extension_address
                .map(|address| SignerHandle::Extension { address })
                .ok_or_else(|| {
                    BlockchainError::NotAvailable("Wallet extension account not connected".to_string())
                }),
            Environment::Production | Environment::Local => self
                .wallet
                .clone()
                .map(SignerHandle::Local)
                .ok_or_else(|| BlockchainError::Wallet("No local wallet loaded".to_string())),
        }
    }

    /// Address that will send transactions, if known yet.
    pub fn wallet_address(&self) -> Option<Address> {
        match self.env {
            Environment::BrowserExtension => self.extension_address,
            Environment::Production | Environment::Local => self.wallet.as_ref().map(Wallet::address),
        }
    }

    /// Request accounts from the wallet extension and link the first one.
    ///
    /// Returns `Ok(None)` when there is no extension, or when it does not
    /// expose exactly one account.
    pub async fn connect_browser_extension_wallet(&mut self) -> BlockchainResult<Option<Address>> {
        let Some(extension) = &self.extension else {
            return Ok(None);
        };

        let accounts = extension.request_accounts().await?;
        if accounts.len() != 1 {
            tracing::warn!(
                accounts = accounts.len(),
                "Wallet extension must expose exactly one account"
            );
            return Ok(None);
        }

        let address = accounts[0];
        self.extension_address = Some(address);
        tracing::info!(address = %address, "Wallet extension connected");
        Ok(Some(address))
    }

    /// Sign, broadcast, and wait for `tx`.
    ///
    /// A broadcast failure yields `Rejected`; everything after the broadcast
    /// is decided by `tracker`.
    pub async fn send_transaction(
        &self,
        tx: TransactionRequest,
        tracker: &ConfirmationTracker,
        shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> TransactionState {
        let Some(provider) = self.provider() else {
            tracing::warn!(env = %self.env, "No provider, transaction not sent");
            return TransactionState::Failed;
        };

        let signer = match self.signer() {
            Ok(signer) => signer,
            Err(e) => {
                tracing::error!(error = %e, "No signer, transaction not sent");
                return TransactionState::Failed;
            }
        };

        tracing::debug!(state = %TransactionState::Sending, from = %signer.address(), "Broadcasting transaction");
        let tx_hash = match sign_and_broadcast(provider, &signer, tx).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction rejected");
                return TransactionState::Rejected;
            }
        };

        tracker
            .await_confirmation_until(tx_hash, Some(provider as &dyn ReceiptSource), shutdown)
            .await
    }
}

async fn sign_and_broadcast(
    provider: &NodeClient,
    signer: &SignerHandle,
    tx: TransactionRequest,
) -> BlockchainResult<TxHash> {
    let tx = tx.with_from(signer.address());
    let tx_hash = match signer {
        SignerHandle::Local(wallet) => provider.with_wallet(wallet)?.send_transaction(tx).await,
        SignerHandle::Extension { .. } => provider.send_transaction(tx).await,
    }
    .map_err(|e| BlockchainError::Rejected(e.to_string()))?;

    tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
    Ok(tx_hash)
}
