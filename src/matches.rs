//! Character classes of the header value grammars.
//!
//! Every class is a 256 entry lookup table over ASCII bytes. Text is scanned as `char`, so
//! [`ascii`] and [`ascii_or_obs`] lift a class to `char`, the latter treating any non-ASCII
//! character as `obs-text`.

macro_rules! byte_map {
    {
        $(#[$meta:meta])*
        $vis:vis const fn $fn_id:ident($byte:ident:$u8:ty) { $e:expr }
    } => {
        $(#[$meta])*
        $vis const fn $fn_id($byte: $u8) -> bool {
            static PAT: [bool; 256] = {
                let mut bytes = [false; 256];
                let mut $byte = 0u8;
                const fn filter($byte: $u8) -> bool {
                    $e
                }
                loop {
                    bytes[$byte as usize] = filter($byte);
                    if $byte == 255 {
                        break;
                    }
                    $byte += 1;
                }
                bytes
            };
            PAT[$byte as usize]
        }
    };
}

/// Returns `true` if `c` is ASCII and belongs to `class`.
#[inline]
pub fn ascii(c: char, class: fn(u8) -> bool) -> bool {
    c.is_ascii() && class(c as u8)
}

/// Returns `true` if `c` is `obs-text` or an ASCII member of `class`.
#[inline]
pub fn ascii_or_obs(c: char, class: fn(u8) -> bool) -> bool {
    !c.is_ascii() || class(c as u8)
}

byte_map! {
    /// OWS = *( SP / HTAB )
    #[inline(always)]
    pub const fn is_whitespace(byte: u8) {
        matches!(byte, b' ' | b'\t')
    }
}

byte_map! {
    /// token   = 1*tchar
    /// tchar   = "!" / "#" / "$" / "%" / "&" / "'" / "*"
    ///         / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
    ///         / DIGIT / ALPHA
    #[inline(always)]
    pub const fn is_token(byte: u8) {
        matches!(
            byte,
            | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*'
            | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
        || byte.is_ascii_alphanumeric()
    }
}

byte_map! {
    /// qdtext = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text
    #[inline(always)]
    pub const fn is_qdtext(byte: u8) {
        matches!(byte, b'\t' | b' ' | 0x21 | 0x23..=0x5B | 0x5D..=0x7E | 0x80..=0xFF)
    }
}

byte_map! {
    /// quoted-pair = "\" ( HTAB / SP / VCHAR / obs-text )
    #[inline(always)]
    pub const fn is_quoted_pair(byte: u8) {
        matches!(byte, b'\t' | b' ' | 0x21..=0x7E | 0x80..=0xFF)
    }
}

byte_map! {
    /// ctext = HTAB / SP / %x21-27 / %x2A-5B / %x5D-7E / obs-text
    #[inline(always)]
    pub const fn is_ctext(byte: u8) {
        matches!(byte, b'\t' | b' ' | 0x21..=0x27 | 0x2A..=0x5B | 0x5D..=0x7E | 0x80..=0xFF)
    }
}

byte_map! {
    /// etagc = %x21 / %x23-7E / obs-text
    #[inline(always)]
    pub const fn is_etagc(byte: u8) {
        matches!(byte, 0x21 | 0x23..=0x7E | 0x80..=0xFF)
    }
}

byte_map! {
    /// Historical cookie value octets: any visible character, space included, except `;`.
    ///
    /// The strict `cookie-octet` of RFC 6265 is a subset of this class.
    #[inline(always)]
    pub const fn is_cookie_value(byte: u8) {
        matches!(byte, 0x20..=0x3A | 0x3C..=0x7E | 0x80..=0xFF)
    }
}

byte_map! {
    /// attr-char = ALPHA / DIGIT
    ///           / "!" / "#" / "$" / "&" / "+" / "-" / "."
    ///           / "^" / "_" / "`" / "|" / "~"
    #[inline(always)]
    pub const fn is_attr_char(byte: u8) {
        matches!(
            byte,
            | b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.'
            | b'^' | b'_' | b'`' | b'|' | b'~'
        )
        || byte.is_ascii_alphanumeric()
    }
}

byte_map! {
    /// mime-charsetc = ALPHA / DIGIT
    ///               / "!" / "#" / "$" / "%" / "&"
    ///               / "+" / "-" / "^" / "_" / "`"
    ///               / "{" / "}" / "~"
    #[inline(always)]
    pub const fn is_charset(byte: u8) {
        matches!(
            byte,
            | b'!' | b'#' | b'$' | b'%' | b'&' | b'+' | b'-'
            | b'^' | b'_' | b'`' | b'{' | b'}' | b'~'
        )
        || byte.is_ascii_alphanumeric()
    }
}

byte_map! {
    /// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
    #[inline(always)]
    pub const fn is_scheme(byte: u8) {
        byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.')
    }
}

byte_map! {
    /// Characters of a link target or URI relation: visible ASCII except `<`, `>` and `"`.
    #[inline(always)]
    pub const fn is_uri(byte: u8) {
        matches!(byte, 0x21..=0x7E) && !matches!(byte, b'<' | b'>' | b'"')
    }
}

/// FNV-1a over ASCII lowercased bytes.
pub const fn hash_to_lowercase(bytes: &[u8]) -> u64 {
    const INITIAL_STATE: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = INITIAL_STATE;
    let mut i = 0;

    while i < bytes.len() {
        hash ^= bytes[i].to_ascii_lowercase() as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }

    hash
}
