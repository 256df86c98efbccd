use crate::DispatchError;
use grappelli_apps::AppContext;
use grappelli_http::{Request, Response, StatusCode};
use serde_json::json;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

const DEFAULT_ERROR_VIEW: &str = "default.html";

const BUILTIN_ERROR_PAGE: &str = "<!DOCTYPE html><html><head><title>{{ status }} {{ title }}</title></head>\
<body><h1>{{ status }} {{ title }}</h1></body></html>";

/// Renders error responses.
///
/// The page is the Tera template `{error_views_dir}/{code}.html`, else
/// `{error_views_dir}/default.html`, else a built-in page. Templates see
/// `status`, `title`, `path` and, with details enabled, `details`; the
/// details are also appended to the page. XHR requests get a JSON body.
#[derive(Debug, Clone)]
pub struct ErrorHandler {
	error_views_dir: PathBuf,
	show_details: bool,
}

impl ErrorHandler {
	pub fn new(error_views_dir: impl Into<PathBuf>) -> Self {
		Self {
			error_views_dir: error_views_dir.into(),
			show_details: false,
		}
	}

	/// Handler for an application: error views from the configured dir,
	/// details everywhere but production.
	pub fn for_app(app: &AppContext) -> Self {
		Self::new(app.project_path(&app.settings().error_views_dir))
			.with_details(!app.profile().is_production())
	}

	pub fn with_details(mut self, show_details: bool) -> Self {
		self.show_details = show_details;
		self
	}

	pub fn error_views_dir(&self) -> &Path {
		&self.error_views_dir
	}

	pub fn handle(&self, request: &Request, error: &DispatchError) -> Response {
		let status = error.status_code();
		if status.is_server_error() {
			tracing::error!(path = %request.path(), status = status.as_u16(), error = %error, "dispatch failed");
		} else {
			tracing::info!(path = %request.path(), status = status.as_u16(), error = %error, "dispatch failed");
		}

		let title = status.canonical_reason().unwrap_or("Error");
		let details = self.show_details.then(|| error.to_string());
		if request.is_xhr() {
			return self.json(status, title, details);
		}

		let mut context = Context::new();
		context.insert("status", &status.as_u16());
		context.insert("title", title);
		context.insert("path", request.path());
		context.insert("details", &details);

		let mut body = self.page(status, &context);
		if let Some(details) = &details {
			body.push_str(&format!("\n<pre>{}</pre>", tera::escape_html(details)));
		}
		Response::new(status)
			.with_header("content-type", "text/html; charset=utf-8")
			.with_body(body)
	}

	fn json(&self, status: StatusCode, title: &str, details: Option<String>) -> Response {
		let payload = json!({
			"status": status.as_u16(),
			"error": title,
			"details": details,
		});
		match Response::new(status).with_json(&payload) {
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(error = %err, "cannot serialize error payload");
				Response::new(status)
			}
		}
	}

	fn page(&self, status: StatusCode, context: &Context) -> String {
		let candidates = [format!("{}.html", status.as_u16()), DEFAULT_ERROR_VIEW.to_string()];
		for name in candidates {
			let file = self.error_views_dir.join(name);
			match fs::read_to_string(&file) {
				Ok(template) => match Tera::one_off(&template, context, true) {
					Ok(page) => return page,
					Err(err) => {
						tracing::warn!(path = %file.display(), error = %err, "broken error view");
					}
				},
				Err(err) if err.kind() == ErrorKind::NotFound => {}
				Err(err) => {
					tracing::warn!(path = %file.display(), error = %err, "unreadable error view");
				}
			}
		}
		Tera::one_off(BUILTIN_ERROR_PAGE, context, true).unwrap_or_else(|err| {
			tracing::warn!(error = %err, "built-in error page failed");
			status.to_string()
		})
	}
}
