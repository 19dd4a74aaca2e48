pub const GATE_SEED: &[u8] = b"gate";
pub const WHITELIST_SEED: &[u8] = b"whitelist";

/// 10,000 reference units at 6 decimals.
pub const DEFAULT_MAX_ADDRESS_CAP: u64 = 10_000 * 1_000_000;

/// Each address costs 32 bytes of instruction data plus a 32 byte entry
/// account, so a full batch must still fit in one 1232 byte packet.
pub const MAX_BATCH_WHITELIST: usize = 15;
