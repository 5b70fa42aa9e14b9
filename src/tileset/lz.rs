//! Decompression for LZ-compressed graphics (`*.2bpp.lz`).
//!
//! Each command byte holds a 3-bit command and a 5-bit length minus one.
//! Command 7 is the long form: the next three bits are the real command and
//! the length is ten bits split across this byte and the next. `0xFF` ends
//! the stream.
//!
//! Copy commands take an offset. With bit 7 set it is negative, counted back
//! from the end of the output; otherwise it is a 15-bit big-endian absolute
//! position.

use crate::error::GfxError;

const LZ_END: u8 = 0xFF;
const LZ_LITERAL: u8 = 0;
const LZ_ITERATE: u8 = 1;
const LZ_ALTERNATE: u8 = 2;
const LZ_BLANK: u8 = 3;
const LZ_REPEAT: u8 = 4;
const LZ_FLIP: u8 = 5;
const LZ_REVERSE: u8 = 6;
const LZ_LONG: u8 = 7;

/// Decompress a complete LZ stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, GfxError> {
    let mut reader = Reader { data, pos: 0 };
    let mut out = Vec::with_capacity(data.len() * 2);

    loop {
        let byte = reader.next()?;
        if byte == LZ_END {
            break;
        }

        let (command, len) = if byte >> 5 == LZ_LONG {
            let command = (byte >> 2) & 0x07;
            if command == LZ_LONG {
                return Err(bad(format!("nested long command at byte {}", reader.pos - 1)));
            }
            let low = reader.next()?;
            (command, ((byte as usize & 0x03) << 8 | low as usize) + 1)
        } else {
            (byte >> 5, (byte as usize & 0x1F) + 1)
        };

        match command {
            LZ_LITERAL => out.extend_from_slice(reader.take(len)?),
            LZ_ITERATE => {
                let value = reader.next()?;
                out.extend(std::iter::repeat(value).take(len));
            }
            LZ_ALTERNATE => {
                let pair = [reader.next()?, reader.next()?];
                out.extend((0..len).map(|i| pair[i % 2]));
            }
            LZ_BLANK => out.extend(std::iter::repeat(0).take(len)),
            LZ_REPEAT | LZ_FLIP => {
                let start = reader.offset(out.len())?;
                for i in 0..len {
                    let value = *out
                        .get(start + i)
                        .ok_or_else(|| bad(format!("copy past end of output at {}", start + i)))?;
                    out.push(if command == LZ_FLIP { value.reverse_bits() } else { value });
                }
            }
            LZ_REVERSE => {
                let start = reader.offset(out.len())?;
                for i in 0..len {
                    let value = start
                        .checked_sub(i)
                        .and_then(|j| out.get(j).copied())
                        .ok_or_else(|| bad("reverse copy before start of output".to_string()))?;
                    out.push(value);
                }
            }
            _ => unreachable!("command is three bits and long form is handled above"),
        }
    }

    Ok(out)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn next(&mut self) -> Result<u8, GfxError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| bad("unexpected end of data".to_string()))?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], GfxError> {
        let end = self.pos + len;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or_else(|| bad("literal runs past end of data".to_string()))?;
        self.pos = end;
        Ok(slice)
    }

    fn offset(&mut self, out_len: usize) -> Result<usize, GfxError> {
        let byte = self.next()?;
        if byte & 0x80 != 0 {
            let back = (byte & 0x7F) as usize + 1;
            out_len
                .checked_sub(back)
                .ok_or_else(|| bad(format!("offset -{} before start of output", back)))
        } else {
            let low = self.next()?;
            Ok((byte as usize) << 8 | low as usize)
        }
    }
}

fn bad(message: String) -> GfxError {
    GfxError::BadCompression(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert_eq!(decompress(&[0x02, 1, 2, 3, 0xFF]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iterate_alternate_blank() {
        assert_eq!(decompress(&[0x23, 0x55, 0xFF]).unwrap(), vec![0x55; 4]);
        assert_eq!(decompress(&[0x44, 1, 2, 0xFF]).unwrap(), vec![1, 2, 1, 2, 1]);
        assert_eq!(decompress(&[0x61, 0xFF]).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_repeat_negative_offset() {
        // literal 1 2 3, then repeat 3 bytes from 3 back
        let data = [0x02, 1, 2, 3, 0x82, 0x82, 0xFF];
        assert_eq!(decompress(&data).unwrap(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_repeat_absolute_overlapping() {
        // literal 7, then repeat 4 bytes from absolute 0 (overlaps its own output)
        let data = [0x00, 7, 0x83, 0x00, 0x00, 0xFF];
        assert_eq!(decompress(&data).unwrap(), vec![7; 5]);
    }

    #[test]
    fn test_flip_and_reverse() {
        let data = [0x01, 0b0000_0001, 0b1100_0000, 0xA0, 0x80, 0xC1, 0x81, 0xFF];
        assert_eq!(
            decompress(&data).unwrap(),
            vec![
                0b0000_0001,
                0b1100_0000,
                0b0000_0011, // flip of the previous byte
                0b1100_0000, // reverse copy from two back
                0b0000_0001,
            ]
        );
    }

    #[test]
    fn test_long_length() {
        // 111 001 00, low byte 9 -> iterate 10 times
        let out = decompress(&[0xE4, 0x09, 0x07, 0xFF]).unwrap();
        assert_eq!(out, vec![7; 10]);
    }

    #[test]
    fn test_errors() {
        assert!(decompress(&[]).is_err());
        assert!(decompress(&[0x02, 1]).is_err());
        assert!(decompress(&[0x80, 0x80, 0xFF]).is_err());
        assert!(decompress(&[0xFC, 0x00, 0xFF]).is_err());
    }
}
