pub mod admin;
pub mod deposit;
pub mod initialize;
pub mod price_feed;
pub mod register_asset;
pub mod view;
pub mod withdraw;

#[allow(ambiguous_glob_reexports)]
pub use admin::*;
#[allow(ambiguous_glob_reexports)]
pub use deposit::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use price_feed::*;
#[allow(ambiguous_glob_reexports)]
pub use register_asset::*;
#[allow(ambiguous_glob_reexports)]
pub use view::*;
#[allow(ambiguous_glob_reexports)]
pub use withdraw::*;
