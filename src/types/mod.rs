mod currency;
#[cfg(test)]
mod tests;

pub use currency::{Euro, Percent};

/// Merchant identifier as it appears in the source; ordered lexically.
pub type MerchantId = String;
