//! Node-level values exchanged with the node client

/// Summary of the node, as returned by `get_info`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    /// Node identity public key (hex)
    pub identity_pubkey: String,

    /// Node alias
    pub alias: String,

    /// Number of currently active channels
    pub num_active_channels: u32,

    /// Best block height known to the node
    pub block_height: u32,

    /// Whether the node's chain backend is synced
    pub synced_to_chain: bool,
}

/// Parameters for a cooperative or forced close
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseOptions {
    /// Unilateral close instead of cooperative
    pub force: bool,

    /// Fee rate for the closing transaction; node default when `None`
    pub sat_per_vbyte: Option<u64>,
}
