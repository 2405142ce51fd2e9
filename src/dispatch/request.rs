//! Request descriptions handed to the dispatcher.

use reqwest::Method;
use reqwest::multipart;
use serde_json::{Map, Value};

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Multipart form payload, kept as plain data until the request is sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push((
            name.into(),
            FormValue::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        ));
        self
    }

    /// Value of the first text field with this name
    #[cfg(test)]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(n, v)| match v {
            FormValue::Text(text) if n == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// File name of the first file field with this name
    #[cfg(test)]
    pub fn file_name(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(n, v)| match v {
            FormValue::File { file_name, .. } if n == name => Some(file_name.as_str()),
            _ => None,
        })
    }

    /// Build the reqwest form. The client assigns the boundary and
    /// the `multipart/form-data` content type.
    pub(crate) fn to_multipart(&self) -> Result<multipart::Form, reqwest::Error> {
        let mut form = multipart::Form::new();
        for (name, value) in &self.fields {
            form = match value {
                FormValue::Text(text) => form.text(name.clone(), text.clone()),
                FormValue::File {
                    file_name,
                    mime,
                    bytes,
                } => form.part(
                    name.clone(),
                    multipart::Part::bytes(bytes.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)?,
                ),
            };
        }
        Ok(form)
    }
}

/// Request body, encoded according to its shape
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent as multipart form data
    Form(FormData),
    /// Serialized to JSON with `Content-Type: application/json`
    Json(Map<String, Value>),
    /// Sent verbatim without a content type override
    Raw(String),
}

/// A single request to perform
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: String,
    method: Method,
    params: Vec<(String, String)>,
    body: Option<RequestBody>,
    busy_indicator: bool,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            params: Vec::new(),
            body: None,
            busy_indicator: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn form(mut self, form: FormData) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    pub fn json(mut self, map: Map<String, Value>) -> Self {
        self.body = Some(RequestBody::Json(map));
        self
    }

    pub fn raw(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Raw(body.into()));
        self
    }

    /// Show the shared busy overlay while this request runs
    pub fn with_busy_indicator(mut self) -> Self {
        self.busy_indicator = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn busy_indicator(&self) -> bool {
        self.busy_indicator
    }

    /// Whether the anti-forgery token must accompany this request
    pub fn requires_csrf(&self) -> bool {
        !matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Target URL with the query parameters appended
    pub fn target(&self) -> String {
        append_query(&self.url, &self.params)
    }
}

/// Append URL-encoded parameters, joining with `&` when the URL already
/// has a query string and with `?` otherwise. A `#fragment` stays last.
pub fn append_query(url: &str, params: &[(String, String)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    if query.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let separator = match base.rfind('?') {
        Some(i) if i + 1 == base.len() || base.ends_with('&') => "",
        Some(_) => "&",
        None => "?",
    };
    match fragment {
        Some(fragment) => format!("{}{}{}#{}", base, separator, query, fragment),
        None => format!("{}{}{}", base, separator, query),
    }
}
