use crate::pattern::{RoutePattern, normalize_template};
use crate::{RouterError, RouterResult};
use indexmap::IndexMap;
use serde_json::Value;

/// Target used when a route declares no `to`.
pub const DEFAULT_TARGET: &str = "home/index/index";

/// Status used when a redirect declares none.
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// What happens when a route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
	/// Rewrite the path and keep routing
	Reroute,
	/// Stop routing and answer with a redirect
	Redirect { status: u16 },
}

/// A named rewrite rule.
#[derive(Debug, Clone)]
pub struct Route {
	name: String,
	pattern: RoutePattern,
	target: String,
	kind: RouteKind,
	extras: IndexMap<String, Value>,
}

/// Properties recognized when hydrating a route from a property bag.
#[derive(Clone, Copy)]
enum Field {
	From,
	To,
	Status,
}

const FIELDS: &[(&str, Field)] = &[
	("from", Field::From),
	("to", Field::To),
	("status", Field::Status),
	("header", Field::Status),
	("code", Field::Status),
];

impl Route {
	/// Create a reroute entry.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::Route;
	///
	/// let route = Route::new("login", "/login", "account/auth/login").unwrap();
	/// assert!(route.matches("/login/"));
	/// assert_eq!(route.rewrite("/login"), "/account/auth/login");
	/// assert!(!route.is_redirect());
	/// ```
	pub fn new(name: impl Into<String>, from: &str, to: &str) -> RouterResult<Self> {
		Ok(Self {
			name: name.into(),
			pattern: RoutePattern::compile(from)?,
			target: normalize_template(to.trim_matches('/')),
			kind: RouteKind::Reroute,
			extras: IndexMap::new(),
		})
	}

	/// Create a redirect entry with the default `302` status.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::Route;
	///
	/// let redirect = Route::redirect("old", "/old/(\\d+)", "/new/$1")
	///     .unwrap()
	///     .with_status(301);
	/// assert_eq!(redirect.status(), Some(301));
	/// assert_eq!(redirect.rewrite("/old/42"), "/new/42");
	/// ```
	pub fn redirect(name: impl Into<String>, from: &str, to: &str) -> RouterResult<Self> {
		let mut route = Self::new(name, from, to)?;
		route.kind = RouteKind::Redirect {
			status: DEFAULT_REDIRECT_STATUS,
		};
		Ok(route)
	}

	/// Set the redirect status. Has no effect on reroute entries.
	pub fn with_status(mut self, status: u16) -> Self {
		if let RouteKind::Redirect { status: current } = &mut self.kind {
			*current = status;
		}
		self
	}

	/// Attach an extra property that has no routing meaning.
	pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extras.insert(key.into(), value.into());
		self
	}

	/// Build a route from a property bag, as read from a route config file.
	///
	/// `from` is required, `to` defaults to [`DEFAULT_TARGET`]. Redirects read
	/// their status from `status` (`header` and `code` are accepted aliases),
	/// given either as an integer or a numeric string. Every other property is
	/// kept in the extras bag.
	pub fn from_properties(
		name: &str,
		redirect: bool,
		properties: &toml::Table,
	) -> RouterResult<Self> {
		let mut from = None;
		let mut to = None;
		let mut status = None;
		let mut extras = IndexMap::new();

		for (key, value) in properties {
			let field = FIELDS
				.iter()
				.find(|(field_name, _)| *field_name == key.as_str())
				.map(|(_, field)| *field);
			match field {
				Some(Field::From) => from = Some(expect_str(name, key, value)?),
				Some(Field::To) => to = Some(expect_str(name, key, value)?),
				Some(Field::Status) if redirect => status = Some(coerce_status(name, value)?),
				_ => {
					let json = serde_json::to_value(value)
						.map_err(|err| RouterError::config(None, format!("route '{}': {}", name, err)))?;
					extras.insert(key.clone(), json);
				}
			}
		}

		let from = from.ok_or_else(|| {
			RouterError::config(None, format!("route '{}' has no 'from' pattern", name))
		})?;
		let to = to.unwrap_or(DEFAULT_TARGET);

		let mut route = if redirect {
			Self::redirect(name, from, to)?.with_status(status.unwrap_or(DEFAULT_REDIRECT_STATUS))
		} else {
			Self::new(name, from, to)?
		};
		route.extras = extras;
		Ok(route)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Rewrite target with group references in `${n}` form.
	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn kind(&self) -> RouteKind {
		self.kind
	}

	pub fn is_redirect(&self) -> bool {
		matches!(self.kind, RouteKind::Redirect { .. })
	}

	/// Redirect status, `None` for reroute entries.
	pub fn status(&self) -> Option<u16> {
		match self.kind {
			RouteKind::Redirect { status } => Some(status),
			RouteKind::Reroute => None,
		}
	}

	pub fn extras(&self) -> &IndexMap<String, Value> {
		&self.extras
	}

	pub fn extra(&self, key: &str) -> Option<&Value> {
		self.extras.get(key)
	}

	pub fn matches(&self, path: &str) -> bool {
		self.pattern.matches(path)
	}

	/// New path for `path`, always starting with `/`.
	pub fn rewrite(&self, path: &str) -> String {
		self.pattern.rewrite(path, &self.target)
	}
}

fn expect_str<'a>(route: &str, key: &str, value: &'a toml::Value) -> RouterResult<&'a str> {
	value.as_str().ok_or_else(|| {
		RouterError::config(None, format!("route '{}': '{}' must be a string", route, key))
	})
}

fn coerce_status(route: &str, value: &toml::Value) -> RouterResult<u16> {
	let parsed = match value {
		toml::Value::Integer(code) => u16::try_from(*code).ok(),
		toml::Value::String(code) => code.trim().parse::<u16>().ok(),
		_ => None,
	};
	parsed.ok_or_else(|| {
		RouterError::config(None, format!("route '{}': invalid redirect status {}", route, value))
	})
}
