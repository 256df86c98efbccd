use crate::{AppError, AppResult, ModuleDescriptor};
use grappelli_http::{Params, Request};
use grappelli_views::ViewModel;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// A request handler grouping related actions.
///
/// Controllers are resolved from the container on every request, so they
/// may keep per-request state in `self`.
///
/// # Examples
///
/// ```
/// use grappelli_apps::{ActionArgs, ActionSignature, AppResult, Controller};
/// use grappelli_http::Request;
/// use grappelli_views::ViewModel;
///
/// struct Post {
///     show: ActionSignature,
/// }
///
/// impl Controller for Post {
///     fn signature(&self, action: &str) -> Option<&ActionSignature> {
///         (action == "show").then_some(&self.show)
///     }
///
///     fn invoke(&mut self, _action: &str, args: &ActionArgs, _request: &Request) -> AppResult<ViewModel> {
///         let id: u32 = args.parse("id")?;
///         Ok(ViewModel::new().with_data("id", id))
///     }
/// }
///
/// let post = Post { show: ActionSignature::new().required("id") };
/// assert!(post.signature("show").is_some());
/// assert!(post.signature("delete").is_none());
/// ```
pub trait Controller: Send {
	/// Parameters of `action`, or `None` if the controller has no such action.
	fn signature(&self, action: &str) -> Option<&ActionSignature>;

	/// Run `action` with its bound arguments.
	fn invoke(&mut self, action: &str, args: &ActionArgs, request: &Request) -> AppResult<ViewModel>;

	/// Called once after construction with the module that owns the
	/// controller.
	fn set_module(&mut self, _module: &ModuleDescriptor) {}

	/// Subdirectory of the module views dir searched first. Defaults to the
	/// controller's short name.
	fn views_dir(&self) -> Option<&str> {
		None
	}

	fn pre_dispatch(&mut self, _request: &Request) -> AppResult<()> {
		Ok(())
	}

	fn post_dispatch(&mut self, _request: &Request, _view: &mut ViewModel) -> AppResult<()> {
		Ok(())
	}
}

/// A declared action parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionParam {
	pub name: String,
	/// `None` for required parameters
	pub default: Option<String>,
}

impl ActionParam {
	pub fn is_required(&self) -> bool {
		self.default.is_none()
	}
}

/// Ordered parameter list of an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSignature {
	params: Vec<ActionParam>,
}

impl ActionSignature {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn required(mut self, name: impl Into<String>) -> Self {
		self.params.push(ActionParam {
			name: name.into(),
			default: None,
		});
		self
	}

	pub fn optional(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
		self.params.push(ActionParam {
			name: name.into(),
			default: Some(default.into()),
		});
		self
	}

	pub fn params(&self) -> &[ActionParam] {
		&self.params
	}

	/// Bind declared parameters from the request params.
	///
	/// A present value wins, then the declared default. A required parameter
	/// with neither fails with [`AppError::MissingRequiredParameter`].
	/// Undeclared request params are not bound.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_apps::ActionSignature;
	/// use grappelli_http::Params;
	///
	/// let signature = ActionSignature::new().required("id").optional("page", "1");
	/// let args = signature.bind("show", &Params::from_query("id=7&extra=x")).unwrap();
	///
	/// assert_eq!(args.get("id"), Some("7"));
	/// assert_eq!(args.get("page"), Some("1"));
	/// assert_eq!(args.get("extra"), None);
	/// ```
	pub fn bind(&self, action: &str, params: &Params) -> AppResult<ActionArgs> {
		let mut values = IndexMap::with_capacity(self.params.len());
		for param in &self.params {
			let value = match (params.get(&param.name), &param.default) {
				(Some(value), _) => value.to_string(),
				(None, Some(default)) => default.clone(),
				(None, None) => {
					return Err(AppError::MissingRequiredParameter {
						action: action.to_string(),
						parameter: param.name.clone(),
					});
				}
			};
			values.insert(param.name.clone(), value);
		}
		Ok(ActionArgs { values })
	}
}

/// Arguments bound to an action invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs {
	values: IndexMap<String, String>,
}

impl ActionArgs {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.values.get(name).map(String::as_str)
	}

	pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
		self.get(name).unwrap_or(default)
	}

	/// Parse an argument. Missing or malformed values are reported as
	/// [`AppError::InvalidParameter`].
	pub fn parse<T>(&self, name: &str) -> AppResult<T>
	where
		T: FromStr,
		T::Err: fmt::Display,
	{
		let value = self.get(name).unwrap_or_default();
		value.parse().map_err(|err: T::Err| AppError::InvalidParameter {
			name: name.to_string(),
			value: value.to_string(),
			reason: err.to_string(),
		})
	}

	/// The argument if every character belongs to `class`, else `default`.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_apps::{ActionSignature, CharClass};
	/// use grappelli_http::Params;
	///
	/// let args = ActionSignature::new()
	///     .required("slug")
	///     .required("id")
	///     .bind("show", &Params::from_query("slug=hello-world&id=42"))
	///     .unwrap();
	///
	/// assert_eq!(args.filtered("id", CharClass::Digit, "0"), "42");
	/// assert_eq!(args.filtered("slug", CharClass::Alnum, "none"), "none");
	/// ```
	pub fn filtered<'a>(&'a self, name: &str, class: CharClass, default: &'a str) -> &'a str {
		match self.get(name) {
			Some(value) if class.matches(value) => value,
			_ => default,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

/// Character classes for parameter filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
	Alnum,
	Alpha,
	Digit,
	Cntrl,
	Graph,
	Lower,
	Print,
	Space,
	Upper,
	Xdigit,
}

impl CharClass {
	/// True if `value` is non-empty and every character is in the class.
	pub fn matches(self, value: &str) -> bool {
		!value.is_empty() && value.chars().all(|c| self.contains(c))
	}

	fn contains(self, c: char) -> bool {
		match self {
			Self::Alnum => c.is_ascii_alphanumeric(),
			Self::Alpha => c.is_ascii_alphabetic(),
			Self::Digit => c.is_ascii_digit(),
			Self::Cntrl => c.is_ascii_control(),
			Self::Graph => c.is_ascii_graphic(),
			Self::Lower => c.is_ascii_lowercase(),
			Self::Print => c.is_ascii_graphic() || c == ' ',
			Self::Space => matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'),
			Self::Upper => c.is_ascii_uppercase(),
			Self::Xdigit => c.is_ascii_hexdigit(),
		}
	}
}

impl FromStr for CharClass {
	type Err = AppError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"alnum" => Self::Alnum,
			"alpha" => Self::Alpha,
			"digit" => Self::Digit,
			"cntrl" => Self::Cntrl,
			"graph" => Self::Graph,
			"lower" => Self::Lower,
			"print" => Self::Print,
			"space" => Self::Space,
			"upper" => Self::Upper,
			"xdigit" => Self::Xdigit,
			other => {
				return Err(AppError::InvalidParameter {
					name: "filter".to_string(),
					value: other.to_string(),
					reason: "unknown character class".to_string(),
				});
			}
		})
	}
}
