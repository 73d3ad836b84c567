//! # Config Commands
//!
//! Read-only access to the loaded configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current application configuration.
///
/// ## When Used
/// - App startup (business header, paper width)
/// - Currency formatting in the UI
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_serializes_camel_case() {
        let json = serde_json::to_value(get_config(&ConfigState::default())).unwrap();

        assert_eq!(json["currencySymbol"], "L.");
        assert_eq!(json["isvRateBps"], 1500);
        assert_eq!(json["invoicePrefix"], "001-001-01");
        assert_eq!(json["paperWidth"], "58mm");
    }
}
