/// Persian digit glyphs, indexed by the ASCII digit they replace.
pub const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Replace every ASCII digit in `text` with its Persian counterpart.
///
/// Works on any text, not only rendered dates: numbers embedded in prose are
/// localized as well. Characters other than `0`-`9` are left as they are, so
/// the function is idempotent.
pub fn persianize_numbers(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                PERSIAN_DIGITS[(c as u8 - b'0') as usize]
            } else {
                c
            }
        })
        .collect()
}
