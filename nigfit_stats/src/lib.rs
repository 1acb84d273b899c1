#![warn(unused_extern_crates)]
#![warn(
    clippy::all,
    clippy::imprecise_flops,
    clippy::suboptimal_flops,
    clippy::unseparated_literal_suffix,
    clippy::unreadable_literal,
    clippy::option_option,
    clippy::implicit_clone
)]
//! The normal-inverse-gamma distribution over (mean, variance) pairs
pub mod nig;

pub use nig::{NigError, NigMoments, NigParams};
pub use nigfit_consts::rv;
