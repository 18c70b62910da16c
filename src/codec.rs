//! Text codecs mapping strings to bit vectors, eight bits per character.

use crate::bit_vec::BitVec;
use std::error;
use std::fmt;
use std::result;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// The character has no single-byte representation in the codec.
    Unencodable(char),
    /// The byte has no character representation in the codec.
    Undecodable(u8),
    /// The bit-vector length is not a multiple of eight.
    InvalidLength(usize),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Unencodable(ch) => write!(f, "character {:?} cannot be encoded", ch),
            Error::Undecodable(byte) => write!(f, "byte {:#04x} cannot be decoded", byte),
            Error::InvalidLength(len) => {
                write!(f, "bit length must be a multiple of 8, got {}", len)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// A reversible mapping between text and bit vectors.
///
/// Every character is encoded as exactly eight bits, most significant bit first. The codec is the
/// single boundary where text exists; the trie itself only ever sees bit vectors.
pub trait BitCodec {
    /// Encodes text into a byte-aligned bit vector.
    fn encode(&self, text: &str) -> Result<BitVec>;

    /// Decodes a byte-aligned bit vector back into text.
    fn decode(&self, bits: &BitVec) -> Result<String>;
}

/// A codec for the 7-bit ASCII character set.
///
/// # Examples
///
/// ```
/// use critbit_trie::bit_vec::BitVec;
/// use critbit_trie::codec::{Ascii, BitCodec};
///
/// let bits = Ascii.encode("AB").unwrap();
/// assert_eq!(bits, BitVec::from_bytes(b"AB"));
/// assert_eq!(Ascii.decode(&bits).unwrap(), "AB");
///
/// assert!(Ascii.encode("строка").is_err());
/// ```
pub struct Ascii;

impl BitCodec for Ascii {
    fn encode(&self, text: &str) -> Result<BitVec> {
        let mut bytes = Vec::with_capacity(text.len());
        for ch in text.chars() {
            if (ch as u32) < 0x80 {
                bytes.push(ch as u8);
            } else {
                return Err(Error::Unencodable(ch));
            }
        }
        Ok(BitVec::from_bytes(&bytes))
    }

    fn decode(&self, bits: &BitVec) -> Result<String> {
        if bits.len() % 8 != 0 {
            return Err(Error::InvalidLength(bits.len()));
        }
        let mut text = String::with_capacity(bits.len() / 8);
        for byte in bits.to_bytes() {
            if byte < 0x80 {
                text.push(byte as char);
            } else {
                return Err(Error::Undecodable(byte));
            }
        }
        Ok(text)
    }
}

/// Characters for bytes `0x80..=0xFF` of code page 1251, following the Microsoft mapping.
const CP1251_HIGH_HALF: [char; 128] = [
    'Ђ', 'Ѓ', '‚', 'ѓ', '„', '…', '†', '‡', '€', '‰', 'Љ', '‹', 'Њ', 'Ќ', 'Ћ', 'Џ', 'ђ', '‘',
    '’', '“', '”', '•', '–', '—', '\u{98}', '™', 'љ', '›', 'њ', 'ќ', 'ћ', 'џ', '\u{a0}', 'Ў',
    'ў', 'Ј', '¤', 'Ґ', '¦', '§', 'Ё', '©', 'Є', '«', '¬', '\u{ad}', '®', 'Ї', '°', '±', 'І',
    'і', 'ґ', 'µ', '¶', '·', 'ё', '№', 'є', '»', 'ј', 'Ѕ', 'ѕ', 'ї', 'А', 'Б', 'В', 'Г', 'Д',
    'Е', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р', 'С', 'Т', 'У', 'Ф', 'Х', 'Ц',
    'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я', 'а', 'б', 'в', 'г', 'д', 'е', 'ж', 'з', 'и',
    'й', 'к', 'л', 'м', 'н', 'о', 'п', 'р', 'с', 'т', 'у', 'ф', 'х', 'ц', 'ч', 'ш', 'щ', 'ъ',
    'ы', 'ь', 'э', 'ю', 'я',
];

/// A codec for the Windows-1251 (Cyrillic) character set.
///
/// # Examples
///
/// ```
/// use critbit_trie::codec::{BitCodec, Windows1251};
///
/// let bits = Windows1251.encode("Река").unwrap();
/// assert_eq!(bits.len(), 32);
/// assert_eq!(Windows1251.decode(&bits).unwrap(), "Река");
/// ```
pub struct Windows1251;

impl BitCodec for Windows1251 {
    fn encode(&self, text: &str) -> Result<BitVec> {
        let mut bytes = Vec::with_capacity(text.len());
        for ch in text.chars() {
            if (ch as u32) < 0x80 {
                bytes.push(ch as u8);
            } else {
                match CP1251_HIGH_HALF.iter().position(|&mapped| mapped == ch) {
                    Some(index) => bytes.push(0x80 + index as u8),
                    None => return Err(Error::Unencodable(ch)),
                }
            }
        }
        Ok(BitVec::from_bytes(&bytes))
    }

    fn decode(&self, bits: &BitVec) -> Result<String> {
        if bits.len() % 8 != 0 {
            return Err(Error::InvalidLength(bits.len()));
        }
        let mut text = String::with_capacity(bits.len() / 8);
        for byte in bits.to_bytes() {
            if byte < 0x80 {
                text.push(byte as char);
            } else {
                text.push(CP1251_HIGH_HALF[(byte - 0x80) as usize]);
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{Ascii, BitCodec, Error, Windows1251};
    use crate::bit_vec::BitVec;

    #[test]
    fn test_ascii_round_trip() {
        let bits = Ascii.encode("ABCDE").unwrap();
        assert_eq!(bits, BitVec::from_bytes(b"ABCDE"));
        assert_eq!(Ascii.decode(&bits).unwrap(), "ABCDE");
    }

    #[test]
    fn test_ascii_empty() {
        let bits = Ascii.encode("").unwrap();
        assert!(bits.is_empty());
        assert_eq!(Ascii.decode(&bits).unwrap(), "");
    }

    #[test]
    fn test_ascii_unencodable() {
        assert_eq!(Ascii.encode("Река"), Err(Error::Unencodable('Р')));
    }

    #[test]
    fn test_ascii_undecodable() {
        let bits = BitVec::from_bytes(&[0x80]);
        assert_eq!(Ascii.decode(&bits), Err(Error::Undecodable(0x80)));
    }

    #[test]
    fn test_ascii_invalid_length() {
        let mut bits = BitVec::from_bytes(b"A");
        bits.push(true);
        assert_eq!(Ascii.decode(&bits), Err(Error::InvalidLength(9)));
    }

    #[test]
    fn test_windows_1251_round_trip() {
        let bits = Windows1251.encode("Река Лена").unwrap();
        assert_eq!(bits.len(), 9 * 8);
        assert_eq!(Windows1251.decode(&bits).unwrap(), "Река Лена");
    }

    #[test]
    fn test_windows_1251_bytes() {
        let bits = Windows1251.encode("Я").unwrap();
        assert_eq!(bits, BitVec::from_bytes(&[0xDF]));

        let bits = Windows1251.encode("ё").unwrap();
        assert_eq!(bits, BitVec::from_bytes(&[0xB8]));
    }

    #[test]
    fn test_windows_1251_unencodable() {
        assert_eq!(Windows1251.encode("漢"), Err(Error::Unencodable('漢')));
    }
}
