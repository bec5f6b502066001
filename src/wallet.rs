use crate::errors::WalletError;
use crate::models::ConnectRequest;
use std::future::Future;

/// Anything that can answer a request-accounts call.
pub trait WalletProvider {
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<String>, WalletError>> + Send;
}

/// The result of `eth_requestAccounts` as the browser page observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedProvider {
    Missing,
    Declined(String),
    Accounts(Vec<String>),
}

impl From<ConnectRequest> for ReportedProvider {
    fn from(request: ConnectRequest) -> Self {
        match (request.error, request.accounts) {
            (Some(reason), _) => Self::Declined(reason),
            (None, Some(accounts)) => Self::Accounts(accounts),
            (None, None) => Self::Missing,
        }
    }
}

impl WalletProvider for ReportedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        match self {
            Self::Missing => Err(WalletError::MissingProvider),
            Self::Declined(reason) => Err(WalletError::Declined(reason.clone())),
            Self::Accounts(accounts) => Ok(accounts.clone()),
        }
    }
}

/// Asks the provider for access and returns the first account.
pub async fn connect<P: WalletProvider>(provider: &P) -> Result<String, WalletError> {
    let accounts = provider.request_accounts().await?;
    accounts.into_iter().next().ok_or(WalletError::NoAccounts)
}

/// `0x5290...9EE7` style display form.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}...{tail}")
}
