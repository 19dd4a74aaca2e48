use crate::units::{format_amount, format_price_x64};
use chrono::{DateTime, Utc};
use gsp_gatekeeper::state::{GateState, WhitelistEntry, WhitelistSource};
use gsp_oracle_module::PriceFeed;
use gsp_token::state::AssetConfig;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// Reference units are quoted with six decimals, like USDC.
pub const REFERENCE_DECIMALS: u8 = 6;

fn binding(key: &Pubkey) -> Option<String> {
    (*key != Pubkey::default()).then(|| key.to_string())
}

fn timestamp(unix: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(unix, 0).map(|t| t.to_rfc3339())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GateStatus {
    pub gate: String,
    pub authority: String,
    pub asset_mint: String,
    pub gated_asset: Option<String>,
    pub pool: Option<String>,
    pub oracle: Option<String>,
    pub locked: bool,
    pub self_whitelist_disabled: bool,
    pub max_address_cap: String,
    pub allowed_whitelist_index: Option<u64>,
    pub whitelist_count: u64,
    pub native_received_lamports: u64,
}

impl GateStatus {
    pub fn new(gate: &Pubkey, state: &GateState) -> Self {
        Self {
            gate: gate.to_string(),
            authority: state.authority.to_string(),
            asset_mint: state.asset_mint.to_string(),
            gated_asset: binding(&state.gated_asset),
            pool: binding(&state.pool),
            oracle: binding(&state.oracle),
            locked: state.locked,
            self_whitelist_disabled: state.self_whitelist_disabled,
            max_address_cap: format_amount(state.max_address_cap, REFERENCE_DECIMALS),
            allowed_whitelist_index: state.allowed_whitelist_index,
            whitelist_count: state.whitelist_count,
            native_received_lamports: state.native_received,
        }
    }

    pub fn render(&self) -> String {
        let unset = || "unset".to_string();
        let tier = self
            .allowed_whitelist_index
            .map_or_else(|| "all".to_string(), |i| format!("<= {i}"));
        [
            format!("Gate:              {}", self.gate),
            format!("Authority:         {}", self.authority),
            format!("Asset mint:        {}", self.asset_mint),
            format!("Gated asset:       {}", self.gated_asset.clone().unwrap_or_else(unset)),
            format!("Pool:              {}", self.pool.clone().unwrap_or_else(unset)),
            format!("Oracle:            {}", self.oracle.clone().unwrap_or_else(unset)),
            format!("Locked:            {}", self.locked),
            format!("Self whitelist:    {}", if self.self_whitelist_disabled { "disabled" } else { "enabled" }),
            format!("Max address cap:   {}", self.max_address_cap),
            format!("Tier:              {tier}"),
            format!("Whitelisted:       {}", self.whitelist_count),
            format!("Native received:   {} lamports", self.native_received_lamports),
        ]
        .join("\n")
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EntryStatus {
    pub address: String,
    pub whitelisted: bool,
    pub index: Option<u64>,
    pub contributed: String,
    pub remaining: String,
    pub whitelisted_at: Option<String>,
    pub source: Option<String>,
}

impl EntryStatus {
    pub fn new(address: &Pubkey, entry: Option<&WhitelistEntry>, state: &GateState) -> Self {
        let admitted = entry.filter(|e| e.index != 0);
        let contributed = entry.map_or(0, |e| e.contributed);
        Self {
            address: address.to_string(),
            whitelisted: admitted.is_some(),
            index: admitted.map(|e| e.index),
            contributed: format_amount(contributed, REFERENCE_DECIMALS),
            remaining: format_amount(
                state.max_address_cap.saturating_sub(contributed),
                REFERENCE_DECIMALS,
            ),
            whitelisted_at: admitted.and_then(|e| timestamp(e.whitelisted_at)),
            source: admitted.map(|e| source_name(e.source).to_string()),
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Address:      {}", self.address),
            format!("Whitelisted:  {}", self.whitelisted),
        ];
        if let Some(index) = self.index {
            lines.push(format!("Index:        {index}"));
        }
        if let Some(at) = &self.whitelisted_at {
            lines.push(format!("Since:        {at}"));
        }
        if let Some(source) = &self.source {
            lines.push(format!("Source:       {source}"));
        }
        lines.push(format!("Contributed:  {}", self.contributed));
        lines.push(format!("Remaining:    {}", self.remaining));
        lines.join("\n")
    }
}

fn source_name(source: WhitelistSource) -> &'static str {
    match source {
        WhitelistSource::Owner => "owner",
        WhitelistSource::Batch => "batch",
        WhitelistSource::SelfPayment => "self-payment",
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FeedStatus {
    pub price_feed: String,
    pub pool: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub base_is_token0: bool,
    pub price: String,
    pub last_update: Option<String>,
    pub max_staleness_secs: i64,
    pub active: bool,
}

impl FeedStatus {
    pub fn new(address: &Pubkey, feed: &PriceFeed) -> Self {
        Self {
            price_feed: address.to_string(),
            pool: feed.pool.to_string(),
            base_mint: feed.base_mint.to_string(),
            quote_mint: feed.quote_mint.to_string(),
            base_is_token0: feed.base_is_token0,
            price: format_price_x64(feed.price_x64),
            last_update: (feed.last_update > 0)
                .then(|| timestamp(feed.last_update))
                .flatten(),
            max_staleness_secs: feed.max_staleness,
            active: feed.is_active,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AssetStatus {
    pub config: String,
    pub authority: String,
    pub asset_mint: String,
    pub gatekeeper: Option<String>,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
}

impl AssetStatus {
    /// `supply` is read from the mint itself.
    pub fn new(address: &Pubkey, config: &AssetConfig, supply: u64) -> Self {
        Self {
            config: address.to_string(),
            authority: config.authority.to_string(),
            asset_mint: config.asset_mint.to_string(),
            gatekeeper: config.gatekeeper.map(|g| g.to_string()),
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: format_amount(supply, config.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gate_state() -> GateState {
        GateState {
            authority: Pubkey::new_unique(),
            asset_mint: Pubkey::new_unique(),
            locked: true,
            max_address_cap: 10_000_000_000,
            ..GateState::default()
        }
    }

    #[test]
    fn test_gate_status_unbound() {
        let gate = Pubkey::new_unique();
        let state = gate_state();
        let status = GateStatus::new(&gate, &state);

        assert_eq!(status.gated_asset, None);
        assert_eq!(status.oracle, None);
        assert_eq!(status.max_address_cap, "10000");
        assert!(status.render().contains("Tier:              all"));
    }

    #[test]
    fn test_gate_status_json() {
        let gate = Pubkey::new_unique();
        let mut state = gate_state();
        state.allowed_whitelist_index = Some(50);
        let json = serde_json::to_value(GateStatus::new(&gate, &state)).unwrap();

        assert_eq!(json["locked"], serde_json::json!(true));
        assert_eq!(json["allowed_whitelist_index"], serde_json::json!(50));
        assert_eq!(json["gate"], serde_json::json!(gate.to_string()));
    }

    #[test]
    fn test_entry_status_missing() {
        let address = Pubkey::new_unique();
        let status = EntryStatus::new(&address, None, &gate_state());
        assert_eq!(
            status,
            EntryStatus {
                address: address.to_string(),
                whitelisted: false,
                index: None,
                contributed: "0".to_string(),
                remaining: "10000".to_string(),
                whitelisted_at: None,
                source: None,
            }
        );
    }

    #[test]
    fn test_entry_status_contributed() {
        let address = Pubkey::new_unique();
        let entry = WhitelistEntry {
            account: address,
            index: 4,
            contributed: 2_500_000_000,
            whitelisted_at: 0,
            source: WhitelistSource::SelfPayment,
            bump: 254,
        };
        let status = EntryStatus::new(&address, Some(&entry), &gate_state());

        assert!(status.whitelisted);
        assert_eq!(status.index, Some(4));
        assert_eq!(status.contributed, "2500");
        assert_eq!(status.remaining, "7500");
        assert_eq!(status.whitelisted_at.as_deref(), Some("1970-01-01T00:00:00+00:00"));
        assert_eq!(status.source.as_deref(), Some("self-payment"));
    }

    #[test]
    fn test_asset_status_reports_mint_supply() {
        let config = AssetConfig {
            asset_mint: Pubkey::new_unique(),
            name: "Gated Sale Token".to_string(),
            symbol: "GST".to_string(),
            decimals: 6,
            ..AssetConfig::default()
        };
        let status = AssetStatus::new(&Pubkey::new_unique(), &config, 1_250_000);

        assert_eq!(status.total_supply, "1.25");
        assert_eq!(status.gatekeeper, None);
    }
}
