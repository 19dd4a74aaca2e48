pub mod asset;
pub mod gate;
pub mod oracle;
