pub mod admin;
pub mod check;
pub mod initialize;
pub mod payment;
pub mod view;
pub mod whitelist;

pub use admin::*;
pub use check::*;
pub use initialize::*;
pub use payment::*;
pub use view::*;
pub use whitelist::*;
