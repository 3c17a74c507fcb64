/// What the page knows about the wallet: whether one is connected and its name.
///
/// Supplied by the wallet adapter; the page only observes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub wallet_name: Option<String>,
}

impl WalletSession {
    pub fn connected(wallet_name: impl Into<String>) -> Self {
        Self {
            connected: true,
            wallet_name: Some(wallet_name.into()),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Status line shown in the connection prompt.
    pub fn status_line(&self) -> String {
        match (self.connected, self.wallet_name.as_deref()) {
            (true, Some(name)) => format!("Connected with {name}"),
            (true, None) => "Connected".to_string(),
            (false, _) => "Join the decentralized marketplace".to_string(),
        }
    }
}
