//! Config for the record codec.
use serde::{Deserialize, Serialize};

/// Codec configuration.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
	/// Let records that implement [`MarshalEntry`](crate::MarshalEntry) or
	/// [`UnmarshalEntry`](crate::UnmarshalEntry) convert themselves instead
	/// of being walked field by field
	pub use_record_codecs: bool,
	/// Leave fields annotated `ro` out of encoded entries. They are decoded
	/// either way
	pub skip_read_only: bool,
}

impl Config {
	/// The configuration of the default encoder and decoder
	pub const DEFAULT: Config = Config { use_record_codecs: true, skip_read_only: true };
}

impl Default for Config {
	fn default() -> Self {
		Self::DEFAULT
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use super::Config;

	#[test]
	fn deserialize() {
		let config: Config = serde_json::from_str(r#"{"skip_read_only": false}"#).unwrap();
		assert_eq!(config, Config { use_record_codecs: true, skip_read_only: false });

		let config: Config = serde_json::from_str("{}").unwrap();
		assert_eq!(config, Config::default(), "Missing keys fall back to the defaults");
	}

	#[test]
	fn serialize() {
		let text = serde_json::to_string(&Config::DEFAULT).unwrap();
		assert_eq!(text, r#"{"use_record_codecs":true,"skip_read_only":true}"#);
	}
}
