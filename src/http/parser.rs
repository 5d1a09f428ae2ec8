use crate::http::request::{Method, Request};

/// End of the header section. Requests carry no body, so this ends the message.
pub const TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("request is not valid UTF-8")]
    InvalidUtf8,
    #[error("malformed request line: {0:?}")]
    InvalidRequestLine(String),
}

/// Returns true once the buffer ends with the header terminator.
pub fn is_complete(buf: &[u8]) -> bool {
    buf.ends_with(TERMINATOR)
}

/// Parses the request line of a raw request.
///
/// The first CRLF-delimited line must split on single spaces into exactly
/// method, path and version. Anything after the first line is ignored.
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    let text = std::str::from_utf8(buf).map_err(|_| ParseError::InvalidUtf8)?;

    // split always yields at least one (possibly empty) line
    let request_line = text.split("\r\n").next().unwrap_or_default();

    let parts: Vec<&str> = request_line.split(' ').collect();
    let [method, path, version] = parts.as_slice() else {
        return Err(ParseError::InvalidRequestLine(request_line.to_string()));
    };

    Ok(Request {
        method: Method::from_token(method),
        path: path.to_string(),
        version: version.to_string(),
    })
}
