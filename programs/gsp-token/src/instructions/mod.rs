pub mod admin;
pub mod burn;
pub mod extra_metas;
pub mod initialize;
pub mod mint;
pub mod transfer_hook;

pub use admin::*;
pub use burn::*;
pub use extra_metas::*;
pub use initialize::*;
pub use mint::*;
pub use transfer_hook::*;
