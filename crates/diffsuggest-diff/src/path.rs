use crate::DiffParseError;

/// The creation/deletion sentinel used in `---`/`+++` headers.
pub const DEV_NULL: &str = "/dev/null";

/// Remove `strip` leading `/`-separated components from `path`.
///
/// Mirrors `patch -pN`: `strip == 0` keeps the path verbatim, `strip == 1`
/// turns `b/src/lib.rs` into `src/lib.rs`. Stripping every component would
/// leave nothing to point at, so it is rejected like an oversized `strip`.
pub fn strip_path(path: &str, strip: usize) -> Result<String, DiffParseError> {
    if strip == 0 {
        return Ok(path.to_string());
    }

    let parts: Vec<&str> = path.split('/').collect();
    if strip >= parts.len() {
        return Err(DiffParseError::StripExceedsPath {
            path: path.to_string(),
            strip,
        });
    }

    Ok(parts[strip..].join("/"))
}

/// Path part of a `--- ` / `+++ ` header, without the trailing timestamp.
pub(crate) fn header_path(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    if rest.starts_with('"') {
        return unquote(rest).map(|(p, _)| p);
    }

    // Example: b/gofmt.go\t2020-07-26 08:01:09.260800318 +0000
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Old and new paths from the rest of a `diff --git ` line.
pub(crate) fn git_header_paths(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_end();

    if rest.starts_with('"') {
        let (a, tail) = unquote(rest)?;
        let tail = tail.strip_prefix(' ')?;
        let b = if tail.starts_with('"') {
            unquote(tail)?.0
        } else {
            tail.to_string()
        };
        return Some((a, b));
    }

    // Unquoted paths may contain spaces. Without a rename both halves
    // name the same file, so try splitting down the middle first.
    if rest.len() % 2 == 1 {
        let mid = rest.len() / 2;
        if rest.is_char_boundary(mid) && rest.is_char_boundary(mid + 1) {
            let (a, b) = (&rest[..mid], &rest[mid + 1..]);
            if rest.as_bytes()[mid] == b' ' && (a == b || a.get(2..) == b.get(2..)) {
                return Some((a.to_string(), b.to_string()));
            }
        }
    }

    if let Some((a, b)) = rest.split_once(" b/") {
        return Some((a.to_string(), format!("b/{b}")));
    }

    let mut it = rest.split_whitespace();
    let a = it.next()?;
    let b = it.next()?;
    if it.next().is_some() {
        return None;
    }
    Some((a.to_string(), b.to_string()))
}

/// Decode a git C-style quoted path. Returns the path and the remaining input.
pub(crate) fn unquote(s: &str) -> Option<(String, &str)> {
    let body = s.strip_prefix('"')?;
    let bytes = body.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let path = String::from_utf8_lossy(&out).into_owned();
                return Some((path, &body[i + 1..]));
            }
            b'\\' => {
                let esc = *bytes.get(i + 1)?;
                i += 2;
                let decoded = match esc {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    b'\\' => b'\\',
                    b'"' => b'"',
                    b'0'..=b'7' => {
                        let digits = bytes.get(i - 1..i + 2)?;
                        if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                            return None;
                        }
                        i += 2;
                        let value = digits
                            .iter()
                            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                        u8::try_from(value).ok()?
                    }
                    _ => return None,
                };
                out.push(decoded);
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    None
}
