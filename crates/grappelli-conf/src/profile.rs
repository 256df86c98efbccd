//! Deployment profiles

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`Profile::from_env`].
pub const ENV_VAR: &str = "GRAPPELLI_ENV";

/// Deployment environment used to pick a section in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Profile {
	Development,
	Staging,
	#[default]
	Production,
	/// Any other section name, stored lowercase
	Custom(String),
}

impl Profile {
	/// Read the profile from `GRAPPELLI_ENV`, defaulting to production.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_conf::Profile;
	///
	/// // SAFETY: single-threaded doctest
	/// unsafe { std::env::set_var("GRAPPELLI_ENV", "dev") };
	/// assert_eq!(Profile::from_env(), Profile::Development);
	/// unsafe { std::env::remove_var("GRAPPELLI_ENV") };
	/// assert_eq!(Profile::from_env(), Profile::Production);
	/// ```
	pub fn from_env() -> Self {
		match std::env::var(ENV_VAR) {
			Ok(value) if !value.trim().is_empty() => value.parse().unwrap_or_default(),
			_ => Self::default(),
		}
	}

	/// Section name used in configuration files.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Development => "development",
			Self::Staging => "staging",
			Self::Production => "production",
			Self::Custom(name) => name,
		}
	}

	pub fn is_production(&self) -> bool {
		matches!(self, Self::Production)
	}
}

impl FromStr for Profile {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase();
		Ok(match normalized.as_str() {
			"development" | "dev" => Self::Development,
			"staging" | "stage" => Self::Staging,
			"production" | "prod" => Self::Production,
			_ => Self::Custom(normalized),
		})
	}
}

impl fmt::Display for Profile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[case("development", Profile::Development)]
	#[case("DEV", Profile::Development)]
	#[case(" staging ", Profile::Staging)]
	#[case("prod", Profile::Production)]
	#[case("Testing", Profile::Custom("testing".to_string()))]
	fn test_parse_profile(#[case] input: &str, #[case] expected: Profile) {
		// Act
		let profile: Profile = input.parse().unwrap_or_default();

		// Assert
		assert_eq!(profile, expected);
	}

	#[rstest]
	fn test_section_name_round_trips() {
		// Arrange
		let profile = Profile::Custom("qa".to_string());

		// Assert
		assert_eq!(profile.to_string(), "qa");
		assert_eq!(Profile::Staging.as_str(), "staging");
		assert!(Profile::default().is_production());
	}

	#[rstest]
	#[serial(grappelli_env)]
	fn test_from_env_reads_variable() {
		// Arrange
		// SAFETY: serialized with other tests touching the variable
		unsafe { std::env::set_var(ENV_VAR, "staging") };

		// Act
		let profile = Profile::from_env();

		// Assert
		assert_eq!(profile, Profile::Staging);
		unsafe { std::env::remove_var(ENV_VAR) };
	}

	#[rstest]
	#[serial(grappelli_env)]
	fn test_from_env_blank_is_production() {
		// Arrange
		// SAFETY: serialized with other tests touching the variable
		unsafe { std::env::set_var(ENV_VAR, "  ") };

		// Act
		let profile = Profile::from_env();

		// Assert
		assert_eq!(profile, Profile::Production);
		unsafe { std::env::remove_var(ENV_VAR) };
	}
}
