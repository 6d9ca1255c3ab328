//! Human-readable HTTP status text lookup.
//!
//! The table mirrors what the upstream API's callers already expect,
//! including the older spellings (302 "Moved Temporarily", 500 "Server
//! Error"). Unknown codes produce a descriptive fallback rather than an
//! error, so the lookup is total.

use std::borrow::Cow;

/// Map a status code to its human-readable text.
#[must_use]
pub fn status_text(code: u16) -> Cow<'static, str> {
    let text = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Moved Temporarily",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request-URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        419 => "Insufficient Space on Resource",
        420 => "Method Failure",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        500 => "Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        507 => "Insufficient Storage",
        511 => "Network Authentication Required",
        _ => return Cow::Owned(format!("Status code does not exist: {code}")),
    };
    Cow::Borrowed(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(status_text(200), "OK");
        assert_eq!(status_text(302), "Moved Temporarily");
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(418), "I'm a teapot");
        assert_eq!(status_text(500), "Server Error");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(status_text(999), "Status code does not exist: 999");
        // Gaps inside the table fall back too.
        assert_eq!(status_text(306), "Status code does not exist: 306");
        assert_eq!(status_text(421), "Status code does not exist: 421");
    }
}
