use crate::errors::WireError;

pub const MAX_LABEL_LEN: usize = 63;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 128;

const POINTER_MASK: u8 = 0xC0;

/// Splits a dotted name into labels, ignoring one trailing dot.
///
/// The root name (`""` or `"."`) has no labels.
fn labels(name: &str) -> impl Iterator<Item = &str> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    trimmed.split('.').filter(move |_| !trimmed.is_empty())
}

/// Appends `name` as length-prefixed labels terminated by the root label.
pub fn encode_name(name: &str, out: &mut Vec<u8>) -> Result<(), WireError> {
    for label in labels(name) {
        if label.is_empty() {
            return Err(WireError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(WireError::NameTooLong {
                label: label.to_string(),
                len: label.len(),
            });
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    Ok(())
}

/// Decodes the (possibly compressed) name starting at `start`.
///
/// Returns the dotted name and the offset just past the name in the
/// original stream: after the terminating zero label, or after the first
/// pointer's two bytes when the name is compressed.
pub fn decode_name(buf: &[u8], start: usize) -> Result<(String, usize), WireError> {
    let mut parts: Vec<String> = Vec::new();
    let mut pos = start;
    let mut resume_at: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let len = *buf.get(pos).ok_or_else(|| WireError::truncated(pos, 1))?;

        match len & POINTER_MASK {
            0x00 if len == 0 => {
                pos += 1;
                break;
            }
            0x00 => {
                let begin = pos + 1;
                let end = begin + len as usize;
                let label = buf
                    .get(begin..end)
                    .ok_or_else(|| WireError::truncated(begin, len as usize))?;
                parts.push(String::from_utf8_lossy(label).into_owned());
                pos = end;
            }
            POINTER_MASK => {
                let low = *buf
                    .get(pos + 1)
                    .ok_or_else(|| WireError::truncated(pos + 1, 1))?;
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(WireError::PointerLoop { hops });
                }
                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                pos = (((len & !POINTER_MASK) as usize) << 8) | low as usize;
            }
            _ => return Err(WireError::UnsupportedLabel(len)),
        }
    }

    Ok((parts.join("."), resume_at.unwrap_or(pos)))
}

/// Compares two names ASCII case-insensitively, ignoring a trailing dot.
pub fn names_equal(a: &str, b: &str) -> bool {
    let a = a.strip_suffix('.').unwrap_or(a);
    let b = b.strip_suffix('.').unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}
