use std::fmt::Write;

use super::Converter;
use crate::error::{GrammarError, Reason};
use crate::parser::Cursor;

/// `1*DIGIT` as `u64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerConverter;

impl Converter for IntegerConverter {
    type Value = u64;

    fn kind(&self) -> &'static str {
        "integer"
    }

    fn parse(&self, text: &str) -> Result<u64, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let start = cursor.mark();
        let digits = cursor.take_while(|ch| ch.is_ascii_digit());
        if digits.is_empty() {
            return Err(cursor.error(Reason::Unexpected));
        }
        cursor.expect_end()?;
        digits
            .parse()
            .map_err(|_| cursor.error_at(start, Reason::OutOfRange))
    }

    fn format(&self, value: &u64, out: &mut String) {
        out.push_str(itoa::Buffer::new().format(*value));
    }
}

/// `1*DIGIT [ "." 1*DIGIT ]` as `f64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatConverter;

impl Converter for FloatConverter {
    type Value = f64;

    fn kind(&self) -> &'static str {
        "float"
    }

    fn parse(&self, text: &str) -> Result<f64, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let start = cursor.mark();
        if cursor.take_while(|ch| ch.is_ascii_digit()).is_empty() {
            return Err(cursor.error(Reason::Unexpected));
        }
        if cursor.eat('.') && cursor.take_while(|ch| ch.is_ascii_digit()).is_empty() {
            return Err(cursor.error(Reason::Unexpected));
        }
        cursor.expect_end()?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(cursor.error_at(start, Reason::OutOfRange)),
        }
    }

    fn format(&self, value: &f64, out: &mut String) {
        // `Display` of `f64` never uses exponent notation
        let _ = write!(out, "{value}");
    }
}

/// Quality factor, a weight in `[0, 1]` with three decimal digits of precision.
///
/// ```not_rust
/// qvalue = ( "0" [ "." 0*3DIGIT ] )
///        / ( "1" [ "." 0*3("0") ] )
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quality(u16);

impl Quality {
    /// `q=1`, the default weight.
    pub const MAX: Self = Self(1000);

    /// `q=0`, "not acceptable".
    pub const MIN: Self = Self(0);

    /// Create quality from thousandths, `None` if above `1000`.
    #[inline]
    pub const fn from_millis(millis: u16) -> Option<Self> {
        if millis <= 1000 { Some(Self(millis)) } else { None }
    }

    /// Returns the weight in thousandths.
    #[inline]
    pub const fn as_millis(self) -> u16 {
        self.0
    }

    /// Returns the weight as a float in `[0, 1]`.
    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 1000.0
    }
}

impl Default for Quality {
    #[inline]
    fn default() -> Self {
        Self::MAX
    }
}

/// RFC 9110 `qvalue` as [`Quality`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QualityConverter;

impl Converter for QualityConverter {
    type Value = Quality;

    fn kind(&self) -> &'static str {
        "quality"
    }

    fn parse(&self, text: &str) -> Result<Quality, GrammarError> {
        let mut cursor = Cursor::new(self.kind(), text);
        let start = cursor.mark();

        let whole = cursor.take_while(|ch| ch.is_ascii_digit());
        let mut millis = match whole {
            "" => return Err(cursor.error(Reason::Unexpected)),
            "0" => 0u32,
            "1" => 1000,
            _ => return Err(cursor.error_at(start, Reason::OutOfRange)),
        };

        if cursor.eat('.') {
            let mut scale = 100;
            while let Some(digit) = cursor.peek().and_then(|ch| ch.to_digit(10)) {
                if scale == 0 {
                    return Err(cursor.error(Reason::Unexpected));
                }
                cursor.bump();
                millis += digit * scale;
                scale /= 10;
            }
        }
        cursor.expect_end()?;

        u16::try_from(millis)
            .ok()
            .and_then(Quality::from_millis)
            .ok_or_else(|| cursor.error_at(start, Reason::OutOfRange))
    }

    fn format(&self, value: &Quality, out: &mut String) {
        match value.0 {
            0 => out.push('0'),
            1000.. => out.push('1'),
            mut millis => {
                out.push_str("0.");
                let mut scale = 100;
                while millis != 0 {
                    let digit = millis / scale;
                    out.push(char::from(b'0' + digit as u8));
                    millis -= digit * scale;
                    scale /= 10;
                }
            }
        }
    }
}
