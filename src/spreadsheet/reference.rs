//! A1-style reference codecs: column letters and (row, column) indexes.

/// Decodes column letters to a 1-based index: 'A' -> 1, 'Z' -> 26, 'AA' -> 27.
/// Returns None when the input is empty or contains a non-letter.
pub fn column_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0u32;
    for character in letters.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = character.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        index = index * 26 + digit;
    }
    Some(index)
}

/// Encodes a 1-based column index as letters; inverse of `column_to_index`.
/// Supports the full multi-letter range, not just A..Z.
pub fn index_to_column(index: u32) -> String {
    let mut column = index;
    let mut letters = String::new();
    while column > 0 {
        column -= 1;
        let digit = char::from_u32('A' as u32 + column % 26).expect("Hardcode letters");
        letters.insert(0, digit);
        column /= 26;
    }
    letters
}

/// Splits an A1-style reference like "AB12" into 1-based (row, column).
pub fn reference_to_index(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    let col = column_to_index(letters)?;
    let row = digits.parse::<u32>().ok().filter(|row| *row > 0)?;
    Some((row, col))
}

/// Formats 1-based (row, column) as an A1-style reference.
pub fn index_to_reference(row: u32, col: u32) -> String {
    format!("{}{}", index_to_column(col), row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_decode() {
        assert_eq!(column_to_index("A"), Some(1));
        assert_eq!(column_to_index("C"), Some(3));
        assert_eq!(column_to_index("Z"), Some(26));
        assert_eq!(column_to_index("AA"), Some(27));
        assert_eq!(column_to_index("AC"), Some(29));
        assert_eq!(column_to_index("ac"), Some(29));
        assert_eq!(column_to_index(""), None);
        assert_eq!(column_to_index("A1"), None);
    }

    #[test]
    fn column_letters_encode() {
        assert_eq!(index_to_column(1), "A");
        assert_eq!(index_to_column(26), "Z");
        assert_eq!(index_to_column(27), "AA");
        assert_eq!(index_to_column(29), "AC");
        assert_eq!(index_to_column(702), "ZZ");
        assert_eq!(index_to_column(703), "AAA");
    }

    #[test]
    fn column_letters_round_trip() {
        for index in 1..2048 {
            assert_eq!(column_to_index(&index_to_column(index)), Some(index));
        }
    }

    #[test]
    fn references() {
        assert_eq!(reference_to_index("C5"), Some((5, 3)));
        assert_eq!(reference_to_index("AB12"), Some((12, 28)));
        assert_eq!(reference_to_index("12"), None);
        assert_eq!(reference_to_index("AB"), None);
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(index_to_reference(5, 3), "C5");
        assert_eq!(index_to_reference(12, 28), "AB12");
    }
}
