//! HTML escaping and Basic-Auth encoding helpers.

/// Escape text for HTML attribute and text-node contexts.
///
/// Escapes: `& < > " '`
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Encode bytes as standard base64.
///
/// Used to precompute the expected `Authorization: Basic` token at server
/// startup; clients send standard padded base64 per RFC 7617.
pub fn base64_encode(data: &[u8]) -> String {
    const CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    let mut i = 0;
    while i + 2 < data.len() {
        let n = ((data[i] as u32) << 16) | ((data[i + 1] as u32) << 8) | (data[i + 2] as u32);
        out.push(CHARS[(n >> 18 & 0x3f) as usize] as char);
        out.push(CHARS[(n >> 12 & 0x3f) as usize] as char);
        out.push(CHARS[(n >> 6 & 0x3f) as usize] as char);
        out.push(CHARS[(n & 0x3f) as usize] as char);
        i += 3;
    }
    match data.len() - i {
        1 => {
            let n = (data[i] as u32) << 16;
            out.push(CHARS[(n >> 18 & 0x3f) as usize] as char);
            out.push(CHARS[(n >> 12 & 0x3f) as usize] as char);
            out.push('=');
            out.push('=');
        }
        2 => {
            let n = ((data[i] as u32) << 16) | ((data[i + 1] as u32) << 8);
            out.push(CHARS[(n >> 18 & 0x3f) as usize] as char);
            out.push(CHARS[(n >> 12 & 0x3f) as usize] as char);
            out.push(CHARS[(n >> 6 & 0x3f) as usize] as char);
            out.push('=');
        }
        _ => {}
    }
    out
}
