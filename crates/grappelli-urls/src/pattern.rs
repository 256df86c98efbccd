use crate::{RouterError, RouterResult};
use regex::Regex;

/// A compiled match pattern anchored to the whole slash-trimmed path.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	source: String,
	regex: Regex,
}

impl RoutePattern {
	/// Compile a path template.
	///
	/// Leading and trailing slashes are trimmed and the result is anchored on
	/// both ends, so the pattern must match the entire path.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::RoutePattern;
	///
	/// let pattern = RoutePattern::compile("/old/(\\d+)/").unwrap();
	/// assert!(pattern.matches("/old/42"));
	/// assert!(pattern.matches("old/42/"));
	/// assert!(!pattern.matches("/old/42/extra"));
	/// assert!(!pattern.matches("/very/old/42"));
	/// ```
	pub fn compile(template: &str) -> RouterResult<Self> {
		let source = template.trim_matches('/').to_string();
		let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|err| {
			RouterError::InvalidPattern {
				pattern: template.to_string(),
				source: err,
			}
		})?;
		Ok(Self { source, regex })
	}

	/// The trimmed template the pattern was compiled from.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	pub fn matches(&self, path: &str) -> bool {
		self.regex.is_match(path.trim_matches('/'))
	}

	/// Substitute the groups captured from `path` into `target` and prefix the
	/// result with `/`.
	///
	/// `target` must already be normalized with [`normalize_template`]. A path
	/// that does not match is returned unchanged (with the leading slash).
	pub(crate) fn rewrite(&self, path: &str, target: &str) -> String {
		let trimmed = path.trim_matches('/');
		format!("/{}", self.regex.replace(trimmed, target))
	}
}

/// Rewrite group references to the braced `${n}` form.
///
/// Accepts `\1` and `$1` style numeric references. Braced references
/// (`${1}`, `${name}`), bare named references and `$$` pass through as-is.
pub(crate) fn normalize_template(template: &str) -> String {
	let mut out = String::with_capacity(template.len() + 4);
	let mut chars = template.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'\\' | '$' if chars.peek().is_some_and(char::is_ascii_digit) => {
				let mut digits = String::new();
				while let Some(d) = chars.next_if(char::is_ascii_digit) {
					digits.push(d);
				}
				out.push_str("${");
				out.push_str(&digits);
				out.push('}');
			}
			'$' if chars.peek() == Some(&'$') => {
				chars.next();
				out.push_str("$$");
			}
			_ => out.push(c),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("new/$1", "new/${1}")]
	#[case("new/\\1", "new/${1}")]
	#[case("$1a", "${1}a")]
	#[case("${1}/${name}", "${1}/${name}")]
	#[case("price/$$5", "price/$$5")]
	#[case("x/$12/y", "x/${12}/y")]
	#[case("plain/path", "plain/path")]
	fn test_normalize_template(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize_template(input), expected);
	}

	#[rstest]
	#[case("blog/(\\d+)", "/blog/12/", "archive/$1", "/archive/12")]
	#[case("(\\w+)/(\\w+)", "a/b", "\\2/\\1", "/b/a")]
	#[case("p/(?P<slug>[a-z-]+)", "p/hello-world", "post/show/slug/${slug}", "/post/show/slug/hello-world")]
	#[case("login", "/login", "account/auth/login", "/account/auth/login")]
	fn test_rewrite(
		#[case] from: &str,
		#[case] path: &str,
		#[case] to: &str,
		#[case] expected: &str,
	) {
		// Arrange
		let pattern = RoutePattern::compile(from).expect("pattern should compile");

		// Act
		let rewritten = pattern.rewrite(path, &normalize_template(to));

		// Assert
		assert_eq!(rewritten, expected);
	}

	#[rstest]
	fn test_alternation_is_fully_anchored() {
		// Arrange
		let pattern = RoutePattern::compile("a|b").expect("pattern should compile");

		// Assert
		assert!(pattern.matches("a"));
		assert!(pattern.matches("/b/"));
		assert!(!pattern.matches("ab"));
		assert!(!pattern.matches("xb"));
	}

	#[rstest]
	fn test_invalid_pattern_is_rejected_eagerly() {
		// Act
		let result = RoutePattern::compile("/broken/(\\d+");

		// Assert
		assert!(matches!(
			result,
			Err(RouterError::InvalidPattern { ref pattern, .. }) if pattern == "/broken/(\\d+"
		));
	}
}
