/// Format a byte count as a human-readable size string (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Read a fixed-width, space-padded text field.
///
/// Only trailing spaces are removed; the field is otherwise kept as-is
/// (invalid UTF-8 is replaced rather than rejected).
pub fn read_padded(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).trim_end_matches(' ').to_string()
}

/// Canonical hex dump: offset, sixteen bytes in two groups of eight, and
/// the printable ASCII rendering.
pub fn hex_dump(buf: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in buf.chunks(16).enumerate() {
        out.push_str(&format!("{:08x} ", line * 16));
        for i in 0..16 {
            if i == 8 {
                out.push(' ');
            }
            match chunk.get(i) {
                Some(b) => out.push_str(&format!(" {:02x}", b)),
                None => out.push_str("   "),
            }
        }
        let ascii: String = chunk
            .iter()
            .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
            .collect();
        out.push_str(&format!("  |{}|\n", ascii));
    }
    out
}
