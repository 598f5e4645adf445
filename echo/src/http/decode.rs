/// Reverses `%XX` escapes and turns `+` into a space.
///
/// Escapes that are truncated or not made of two hex digits are kept
/// as a literal `%`, so this never fails.
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut idx = 0;

    while idx < input.len() {
        match input[idx] {
            b'%' => {
                if let Some(byte) = input.get(idx + 1..idx + 3).and_then(hex_pair) {
                    out.push(byte);
                    idx += 3;
                    continue;
                }
                out.push(b'%');
            }
            b'+' => out.push(b' '),
            byte => out.push(byte),
        }
        idx += 1;
    }

    out
}

#[inline]
fn hex_pair(pair: &[u8]) -> Option<u8> {
    Some((hex_digit(pair[0])? << 4) | hex_digit(pair[1])?)
}

#[inline]
fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|digit| digit as u8)
}
