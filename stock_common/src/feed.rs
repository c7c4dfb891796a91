//! Identifiers for the two upstream feeds.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Which upstream feed an event belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FeedKind {
    /// Stock quotes keyed by ticker.
    Stock,
    /// Exchange rates keyed by `BASE/QUOTE` pair.
    Forex,
}
