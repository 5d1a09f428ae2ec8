/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Route resolved and content found
/// - `BadRequest` (400): Malformed request line
/// - `NotFound` (404): No route, or no content behind it
/// - `MethodNotAllowed` (405): Anything but GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchyard::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use switchyard::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// A response ready to be serialized.
///
/// The only header ever sent is the fixed Content-Type, so no header map is
/// kept. Error responses carry a short body echoing their status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Version token echoed on the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// Response body; `None` serializes as an empty body
    pub payload: Option<String>,
}

/// Version used when the request line could not be read.
pub const DEFAULT_VERSION: &str = "HTTP/1.1";

impl Response {
    pub fn new(version: impl Into<String>, status: StatusCode, payload: Option<String>) -> Self {
        Self {
            version: version.into(),
            status,
            payload,
        }
    }

    /// Creates a 200 OK response carrying the given content.
    pub fn ok(version: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(version, StatusCode::Ok, Some(payload.into()))
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(version: impl Into<String>) -> Self {
        Self::status_page(version, StatusCode::NotFound)
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed(version: impl Into<String>) -> Self {
        Self::status_page(version, StatusCode::MethodNotAllowed)
    }

    /// Creates a 400 Bad Request response. The client's version is unknown.
    pub fn bad_request() -> Self {
        Self::status_page(DEFAULT_VERSION, StatusCode::BadRequest)
    }

    fn status_page(version: impl Into<String>, status: StatusCode) -> Self {
        let body = format!("{} {}", status.as_u16(), status.reason_phrase());
        Self::new(version, status, Some(body))
    }
}
