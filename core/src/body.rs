//! Request body encoding: raw strings, URL-encoded forms and multipart forms.
//!
//! # Design
//! A request carries at most one body. When multipart data is present it
//! absorbs the plain body: form fields (or a raw body parsed as a URL-encoded
//! string) become leading parts, followed by the explicit multipart parts.
//! The multipart path also reports the boundary content type the request
//! must be sent with.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use uuid::Uuid;

use crate::constants::{FORM_CONTENT_TYPE, MULTIPART_CONTENT_TYPE};
use crate::query::{decode_pairs, encode_pairs};

/// A non-multipart request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Sent verbatim.
    Raw(String),
    /// Sent as `application/x-www-form-urlencoded`, in insertion order.
    Form(Vec<(String, String)>),
}

impl Body {
    /// Key/value view of the body, parsing a raw body as URL-encoded text.
    fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            Body::Raw(raw) => decode_pairs(&raw),
            Body::Form(pairs) => pairs,
        }
    }
}

/// One named part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    data: Vec<u8>,
    file_name: Option<String>,
    content_type: Option<String>,
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: value.into().into_bytes(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            file_name: None,
            content_type: None,
        }
    }

    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Multipart form data. An empty `Multipart` still selects multipart
/// encoding for the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Multipart {
    parts: Vec<Part>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// Output of body encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    /// Content type implied by the encoding, if it dictates one.
    pub content_type: Option<String>,
}

/// Pick the encoding for a request body.
pub fn encode_body(body: Option<Body>, multipart: Option<Multipart>) -> Option<EncodedBody> {
    if let Some(multipart) = multipart {
        return Some(encode_multipart(body, multipart, &gen_boundary()));
    }

    match body? {
        Body::Form(pairs) => Some(EncodedBody {
            bytes: encode_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))).into_bytes(),
            content_type: Some(FORM_CONTENT_TYPE.to_owned()),
        }),
        Body::Raw(raw) => Some(EncodedBody {
            bytes: raw.into_bytes(),
            content_type: None,
        }),
    }
}

fn encode_multipart(body: Option<Body>, multipart: Multipart, boundary: &str) -> EncodedBody {
    let leading = body
        .map(Body::into_pairs)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| Part::text(name, value));

    let mut bytes = Vec::new();
    for part in leading.chain(multipart.parts) {
        bytes.extend_from_slice(b"--");
        bytes.extend_from_slice(boundary.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(encode_part_headers(&part).as_bytes());
        bytes.extend_from_slice(b"\r\n\r\n");
        bytes.extend_from_slice(&part.data);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(b"--");
    bytes.extend_from_slice(boundary.as_bytes());
    bytes.extend_from_slice(b"--\r\n");

    EncodedBody {
        bytes,
        content_type: Some(format!("{MULTIPART_CONTENT_TYPE}; boundary={boundary}")),
    }
}

fn gen_boundary() -> String {
    Uuid::new_v4().simple().to_string()
}

const PARAMETER_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

fn encode_part_headers(part: &Part) -> String {
    let mut headers = String::from("content-disposition: form-data; ");
    headers.push_str(&format_parameter("name", &part.name));
    if let Some(file_name) = &part.file_name {
        headers.push_str("; filename=\"");
        headers.push_str(&escape_quoted(file_name));
        headers.push('"');
    }
    if let Some(content_type) = &part.content_type {
        headers.push_str("\r\ncontent-type: ");
        headers.push_str(content_type);
    }
    headers
}

/// `name="value"` when the value is safe as-is, `name*=utf-8''...` otherwise.
fn format_parameter(name: &str, value: &str) -> String {
    let encoded = utf8_percent_encode(value, PARAMETER_ENCODE_SET).to_string();
    if encoded.len() == value.len() {
        format!("{name}=\"{value}\"")
    } else {
        format!("{name}*=utf-8''{encoded}")
    }
}

fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\r' => escaped.push_str("\\\r"),
            '\n' => escaped.push_str("\\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
