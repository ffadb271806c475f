use std::fmt;

/// Networks the game contracts are provisioned on.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub enum Network {
    Mainnet,
    Rinkeby,
    Local,
}

impl Network {
    pub fn id(self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Rinkeby => 4,
            Network::Local => 5777,
        }
    }

    /// Resolve a chain-reported network id. Unknown ids get the typed
    /// [`UnsupportedNetwork`] error so the caller can disable betting instead
    /// of silently showing zero data.
    pub fn from_id(id: u64) -> Result<Self, UnsupportedNetwork> {
        match id {
            1 => Ok(Network::Mainnet),
            4 => Ok(Network::Rinkeby),
            5777 => Ok(Network::Local),
            other => Err(UnsupportedNetwork(other)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Rinkeby => "rinkeby",
            Network::Local => "local",
        };
        write!(f, "{name}")
    }
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct UnsupportedNetwork(pub u64);

impl fmt::Display for UnsupportedNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no game contracts deployed on network {}", self.0)
    }
}

impl std::error::Error for UnsupportedNetwork {}

/// Deployed contracts the crate reads from, named the way the query port
/// resolves them.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub enum ContractName {
    Lottery,
    History,
    CurrentBooty,
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractName::Lottery => "lottery",
            ContractName::History => "history",
            ContractName::CurrentBooty => "currentBooty",
        };
        write!(f, "{name}")
    }
}
