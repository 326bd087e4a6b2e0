//! OData `$batch` multipart codec.
//!
//! A batch request bundles sub-requests into one `multipart/mixed` POST;
//! each part wraps a full HTTP message. The response mirrors the structure
//! with one embedded HTTP response per part, each carrying its own status
//! code. This module only builds and parses the wire format — deciding what
//! a non-2xx sub-status means is the caller's business.

use b1sl_domain::{Result, ServiceLayerError};
use uuid::Uuid;

/// One parsed sub-response of a batch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPart {
    /// Embedded HTTP status code of the sub-response.
    pub status: u16,
    /// Raw body of the sub-response (typically JSON).
    pub body: String,
}

/// Generate a fresh batch boundary token.
pub fn new_boundary() -> String {
    format!("batch_{}", Uuid::new_v4())
}

/// Build a `multipart/mixed` body of GET sub-requests.
///
/// `paths` are service-relative (e.g. `Items('A00001')`); the server
/// resolves them against the service root of the batch endpoint.
pub fn build_get_batch(boundary: &str, paths: &[String]) -> String {
    let mut body = String::new();
    for path in paths {
        body.push_str(&format!("--{boundary}\r\n"));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str("Content-Transfer-Encoding: binary\r\n");
        body.push_str("\r\n");
        body.push_str(&format!("GET {path} HTTP/1.1\r\n"));
        body.push_str("Accept: application/json;odata=minimalmetadata\r\n");
        body.push_str("\r\n");
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    body
}

/// Extract the `boundary` parameter from a `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let start = content_type.find("boundary=")?;
    let value = &content_type[start + "boundary=".len()..];
    let end = value.find(';').unwrap_or(value.len());
    let token = value[..end].trim().trim_matches('"');
    (!token.is_empty()).then(|| token.to_string())
}

/// Parse a multipart batch response into its sub-responses.
///
/// `content_type` is the outer response's `Content-Type` header; the
/// boundary is taken from there. Parts are returned in wire order.
pub fn parse_batch_response(content_type: Option<&str>, body: &str) -> Result<Vec<BatchPart>> {
    let boundary = content_type
        .and_then(boundary_from_content_type)
        .ok_or_else(|| {
            ServiceLayerError::Internal(
                "batch response is missing a multipart boundary".to_string(),
            )
        })?;

    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();

    // First segment is the preamble, the last one the `--` terminator.
    for segment in body.split(delimiter.as_str()).skip(1) {
        let segment = segment.trim_start_matches(['\r', '\n']);
        if segment.starts_with("--") || segment.trim().is_empty() {
            break;
        }
        parts.push(parse_part(segment)?);
    }

    Ok(parts)
}

/// Parse one part: MIME part headers, then an embedded HTTP response.
fn parse_part(segment: &str) -> Result<BatchPart> {
    let embedded = skip_headers(segment).ok_or_else(malformed_part)?;

    let (status_line, rest) = split_line(embedded).ok_or_else(malformed_part)?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(malformed_part)?;

    let body = skip_headers(rest).unwrap_or("");
    Ok(BatchPart { status, body: body.trim_end_matches(['\r', '\n']).to_string() })
}

/// Advance past a header block, returning what follows the blank line.
fn skip_headers(input: &str) -> Option<&str> {
    let mut rest = input;
    loop {
        let (line, tail) = split_line(rest)?;
        rest = tail;
        if line.trim().is_empty() {
            return Some(rest);
        }
    }
}

fn split_line(input: &str) -> Option<(&str, &str)> {
    match input.find('\n') {
        Some(pos) => Some((input[..pos].trim_end_matches('\r'), &input[pos + 1..])),
        None => {
            if input.is_empty() {
                None
            } else {
                Some((input.trim_end_matches('\r'), ""))
            }
        }
    }
}

fn malformed_part() -> ServiceLayerError {
    ServiceLayerError::Internal("malformed batch sub-response".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_one_part_per_path() {
        let body = build_get_batch(
            "batch_x",
            &["Items('A00001')".to_string(), "Items('A00002')".to_string()],
        );

        assert_eq!(body.matches("--batch_x\r\n").count(), 2);
        assert!(body.contains("GET Items('A00001') HTTP/1.1"));
        assert!(body.contains("GET Items('A00002') HTTP/1.1"));
        assert!(body.ends_with("--batch_x--\r\n"));
    }

    #[test]
    fn extracts_boundary_with_and_without_quotes() {
        assert_eq!(
            boundary_from_content_type("multipart/mixed; boundary=batchresponse_ab12").as_deref(),
            Some("batchresponse_ab12")
        );
        assert_eq!(
            boundary_from_content_type(r#"multipart/mixed; boundary="quoted"; charset=utf-8"#)
                .as_deref(),
            Some("quoted")
        );
        assert_eq!(boundary_from_content_type("application/json"), None);
    }

    #[test]
    fn parses_successful_parts_in_order() {
        let body = concat!(
            "--rb\r\n",
            "Content-Type: application/http\r\n",
            "Content-Transfer-Encoding: binary\r\n",
            "\r\n",
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: application/json\r\n",
            "\r\n",
            "{\"ItemCode\":\"A00001\"}\r\n",
            "--rb\r\n",
            "Content-Type: application/http\r\n",
            "\r\n",
            "HTTP/1.1 204 No Content\r\n",
            "\r\n",
            "\r\n",
            "--rb--\r\n",
        );

        let parts =
            parse_batch_response(Some("multipart/mixed; boundary=rb"), body).expect("parts");

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].status, 200);
        assert_eq!(parts[0].body, "{\"ItemCode\":\"A00001\"}");
        assert_eq!(parts[1].status, 204);
        assert_eq!(parts[1].body, "");
    }

    #[test]
    fn keeps_error_parts_with_their_body() {
        let body = concat!(
            "--rb\r\n",
            "Content-Type: application/http\r\n",
            "\r\n",
            "HTTP/1.1 404 Not Found\r\n",
            "Content-Type: application/json\r\n",
            "\r\n",
            "{\"error\":{\"code\":-2028,\"message\":{\"value\":\"No matching records found\"}}}\r\n",
            "--rb--\r\n",
        );

        let parts =
            parse_batch_response(Some("multipart/mixed; boundary=rb"), body).expect("parts");

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].status, 404);
        assert!(parts[0].body.contains("No matching records found"));
    }

    #[test]
    fn rejects_responses_without_boundary() {
        let result = parse_batch_response(Some("application/json"), "{}");
        assert!(matches!(result, Err(ServiceLayerError::Internal(_))));
    }

    #[test]
    fn rejects_parts_without_status_line() {
        let body = "--rb\r\nContent-Type: application/http\r\n\r\nnot-http\r\n--rb--\r\n";
        let result = parse_batch_response(Some("multipart/mixed; boundary=rb"), body);
        assert!(matches!(result, Err(ServiceLayerError::Internal(_))));
    }
}
