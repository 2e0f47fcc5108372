//! Request framing: decide when a request has been fully received.
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::str::FromStr;

/// Read size used by both framing strategies.
pub const CHUNK_SIZE: usize = 8192;
/// Upper bound for the request line plus headers.
pub const MAX_HEAD_SIZE: usize = 8192;
/// Upper bound for a body we drain and discard.
pub const MAX_BODY_SIZE: usize = 1 << 20;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";
/// Lenient clients end lines with a bare LF.
const LF_HEAD_TERMINATOR: &[u8] = b"\n\n";

/// How the end of a request is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Read until the blank line ending the headers (CRLF or bare LF line
    /// endings), then `Content-Length` bytes of body (zero when the header
    /// is absent).
    Delimited,
    /// Legacy heuristic: a chunk shorter than [`CHUNK_SIZE`] ends the
    /// request. Truncates or blocks on requests whose last chunk is exactly
    /// `CHUNK_SIZE` bytes, and on most requests carrying a body.
    ShortRead,
}

impl Default for Framing {
    fn default() -> Self {
        Self::Delimited
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramingParseError(String);

impl fmt::Display for FramingParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown framing '{}', expected 'delimited' or 'short-read'",
            self.0
        )
    }
}

impl FromStr for Framing {
    type Err = FramingParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_lowercase()[..] {
            "delimited" => Ok(Self::Delimited),
            "short-read" => Ok(Self::ShortRead),
            _ => Err(FramingParseError(s.to_string())),
        }
    }
}

/// Read one request off the stream and return it as text. Invalid UTF-8
/// is replaced rather than rejected, the parser downstream is lenient.
pub fn read_request<R: Read>(stream: &mut R, framing: Framing) -> io::Result<String> {
    let bytes = match framing {
        Framing::Delimited => read_delimited(stream)?,
        Framing::ShortRead => read_short(stream)?,
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_short<R: Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut request = vec![];
    let mut chunk = [0; CHUNK_SIZE];
    loop {
        let read_size = stream.read(&mut chunk)?;
        request.extend_from_slice(&chunk[..read_size]);
        if read_size < CHUNK_SIZE {
            return Ok(request);
        }
    }
}

fn read_delimited<R: Read>(stream: &mut R) -> io::Result<Vec<u8>> {
    let mut request = vec![];
    let mut chunk = [0; CHUNK_SIZE];
    let body_start = loop {
        if let Some(end) = head_end(&request) {
            break end;
        }
        if request.len() > MAX_HEAD_SIZE {
            return Ok(request);
        }
        let read_size = stream.read(&mut chunk)?;
        if read_size == 0 {
            return Ok(request);
        }
        request.extend_from_slice(&chunk[..read_size]);
    };
    let head = String::from_utf8_lossy(&request[..body_start]);
    let expected = body_start + content_length(&head).min(MAX_BODY_SIZE);
    while request.len() < expected {
        let read_size = stream.read(&mut chunk)?;
        if read_size == 0 {
            break;
        }
        request.extend_from_slice(&chunk[..read_size]);
    }
    Ok(request)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Offset just past the blank line ending the headers, whichever line
/// ending comes first.
fn head_end(request: &[u8]) -> Option<usize> {
    let crlf = find(request, HEAD_TERMINATOR).map(|pos| pos + HEAD_TERMINATOR.len());
    let lf = find(request, LF_HEAD_TERMINATOR).map(|pos| pos + LF_HEAD_TERMINATOR.len());
    match (crlf, lf) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Value of the first `Content-Length` header, 0 if missing or invalid.
fn content_length(head: &str) -> usize {
    head.lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;

    /// Hands out data in fixed pieces, like a socket would.
    struct Trickle<'a> {
        data: &'a [u8],
        piece: usize,
    }

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.piece.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Fails the test if read past the given data.
    struct NoEof<'a>(&'a [u8]);

    impl<'a> Read for NoEof<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            assert!(!self.0.is_empty(), "read past end of request");
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_delimited_stops_at_blank_line() {
        let data = b"GET /say?text=hi HTTP/1.1\r\nHost: speaker\r\n\r\n";
        let text = read_request(&mut NoEof(&data[..]), Framing::Delimited).unwrap();
        assert_eq!(text.as_bytes(), &data[..]);
    }

    #[test]
    fn test_delimited_accepts_bare_lf() {
        let data = b"GET /say?text=hi HTTP/1.0\n\n";
        let text = read_request(&mut NoEof(&data[..]), Framing::Delimited).unwrap();
        assert_eq!(text, "GET /say?text=hi HTTP/1.0\n\n");
    }

    #[test]
    fn test_delimited_bare_lf_with_body() {
        let data = b"POST /say HTTP/1.0\nContent-Length: 2\n\nhi";
        let mut stream = Trickle {
            data: &data[..],
            piece: 4,
        };
        let text = read_request(&mut stream, Framing::Delimited).unwrap();
        assert!(text.ends_with("\n\nhi"));
    }

    #[test]
    fn test_head_end() {
        assert_eq!(head_end(b"GET / HTTP/1.1\r\n\r\n"), Some(18));
        assert_eq!(head_end(b"GET / HTTP/1.0\n\n"), Some(16));
        assert_eq!(head_end(b"GET / HTTP/1.1\r\nHost: x\r\n"), None);
    }

    #[test]
    fn test_delimited_reads_body() {
        let data = b"POST /say HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello";
        let mut stream = Trickle {
            data: &data[..],
            piece: 3,
        };
        let text = read_request(&mut stream, Framing::Delimited).unwrap();
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_delimited_peer_closes_early() {
        let data = b"GET /say HTTP/1.1\r\nHost: spea";
        let text = read_request(&mut &data[..], Framing::Delimited).unwrap();
        assert_eq!(text, "GET /say HTTP/1.1\r\nHost: spea");
    }

    #[test]
    fn test_delimited_exact_chunk_size() {
        let mut data = b"GET /say HTTP/1.1\r\nX-Pad: ".to_vec();
        data.resize(CHUNK_SIZE - 4, b'a');
        data.extend_from_slice(HEAD_TERMINATOR);
        assert_eq!(data.len(), CHUNK_SIZE);
        let text = read_request(&mut NoEof(&data[..]), Framing::Delimited).unwrap();
        assert_eq!(text.len(), CHUNK_SIZE);
    }

    #[test]
    fn test_short_read_stops_on_short_chunk() {
        let data = b"GET /say HTTP/1.1\r\n\r\n";
        let text = read_request(&mut NoEof(&data[..]), Framing::ShortRead).unwrap();
        assert_eq!(text.as_bytes(), &data[..]);
    }

    #[test]
    fn test_short_read_truncates_trickled_request() {
        let data = b"GET /say?text=hello HTTP/1.1\r\n\r\n";
        let mut stream = Trickle {
            data: &data[..],
            piece: 8,
        };
        let text = read_request(&mut stream, Framing::ShortRead).unwrap();
        assert_eq!(text, "GET /say");
    }

    #[test]
    fn test_content_length() {
        assert_eq!(content_length("GET / HTTP/1.1\r\nContent-Length: 12\r\n\r\n"), 12);
        assert_eq!(content_length("GET / HTTP/1.1\r\nContent-Length: x\r\n\r\n"), 0);
        assert_eq!(content_length("GET / HTTP/1.1\r\n\r\n"), 0);
    }

    #[test]
    fn test_framing_from_str() {
        assert_eq!("delimited".parse::<Framing>(), Ok(Framing::Delimited));
        assert_eq!("Short-Read".parse::<Framing>(), Ok(Framing::ShortRead));
        assert!("chunked".parse::<Framing>().is_err());
    }
}
