//! EBML parsing back into an element tree

use crate::element::Element;
use crate::ids::{self, ElementKind};
use crate::varint::{decode_size, decode_unsigned};
use crate::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

/// Walks the sibling elements of one nesting level of a buffer.
///
/// Yields each element's id together with its raw payload; offsets in errors
/// are relative to the start of the outermost buffer.
pub struct ElementReader<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> ElementReader<'a> {
    /// Creates a reader over a top-level buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    fn at(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Reads the next element header and payload, or `None` at end of input
    pub fn next_element(&mut self) -> Option<Result<(u32, &'a [u8], usize)>> {
        if self.pos >= self.data.len() {
            return None;
        }
        Some(self.read_one())
    }

    fn read_one(&mut self) -> Result<(u32, &'a [u8], usize)> {
        let data: &'a [u8] = self.data;
        let start = self.pos;
        let abs = self.base + start;
        let rest = &data[start..];

        let id_len = ids::id_len(rest[0]).ok_or(Error::InvalidElementId(abs))?;
        let id_raw = rest.get(..id_len).ok_or(Error::UnexpectedEof(abs))?;
        let id = id_raw.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));

        let (size, size_len) = decode_size(&rest[id_len..]).map_err(|e| match e {
            Error::InvalidVarint(_) => Error::InvalidVarint(abs + id_len),
            _ => Error::UnexpectedEof(abs + id_len),
        })?;

        let header_len = id_len + size_len;
        let end = usize::try_from(size)
            .ok()
            .and_then(|s| header_len.checked_add(s))
            .filter(|&end| end <= rest.len())
            .ok_or(Error::UnexpectedEof(abs + header_len))?;

        self.pos = start + end;
        Ok((id, &rest[header_len..end], abs + header_len))
    }
}

/// Parses every element in `data`, descending into masters known to the schema
pub fn parse_elements(data: &[u8]) -> Result<Vec<Element>> {
    parse_level(data, 0)
}

fn parse_level(data: &[u8], base: usize) -> Result<Vec<Element>> {
    let mut reader = ElementReader::at(data, base);
    let mut elements = Vec::new();
    while let Some(next) = reader.next_element() {
        let (id, payload, offset) = next?;
        elements.push(parse_payload(id, payload, offset)?);
    }
    Ok(elements)
}

fn parse_payload(id: u32, payload: &[u8], offset: usize) -> Result<Element> {
    let invalid = |kind| Error::InvalidPayload {
        id,
        kind,
        len: payload.len(),
    };

    let element = match ids::kind_of(id) {
        ElementKind::Master => Element::master(id, parse_level(payload, offset)?),
        ElementKind::UInt => {
            Element::uint(id, decode_unsigned(payload).ok_or_else(|| invalid("uint"))?)
        }
        ElementKind::Float => match payload.len() {
            8 => Element::float(id, BigEndian::read_f64(payload)),
            4 => Element::float(id, f64::from(BigEndian::read_f32(payload))),
            0 => Element::float(id, 0.0),
            _ => return Err(invalid("float")),
        },
        ElementKind::Str => {
            let value = std::str::from_utf8(payload).map_err(|_| invalid("string"))?;
            Element::string(id, value.trim_end_matches('\0'))
        }
        ElementKind::Bytes => Element::bytes(id, payload.to_vec()),
    };
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::encode_document;

    #[test]
    fn test_parse_written_tree() {
        let tree = vec![
            Element::master(
                ids::EBML,
                vec![
                    Element::uint(ids::EBML_VERSION, 1),
                    Element::string(ids::DOC_TYPE, "webm"),
                ],
            ),
            Element::master(
                ids::SEGMENT,
                vec![Element::master(
                    ids::INFO,
                    vec![
                        Element::uint(ids::TIMECODE_SCALE, 1_000_000),
                        Element::float(ids::DURATION, 1234.5),
                    ],
                )],
            ),
        ];
        let bytes = encode_document(&tree).unwrap();
        assert_eq!(parse_elements(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_unknown_ids_are_binary() {
        // Void element (0xEC) holding two bytes
        let parsed = parse_elements(&[0xEC, 0x82, 0x01, 0x02]).unwrap();
        assert_eq!(parsed, vec![Element::bytes(0xEC, vec![0x01, 0x02])]);
    }

    #[test]
    fn test_truncated_payload() {
        // DocType claiming 4 bytes with only 2 present
        let err = parse_elements(&[0x42, 0x82, 0x84, b'w', b'e']).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof(3)));
    }

    #[test]
    fn test_invalid_id() {
        let err = parse_elements(&[0x00, 0x80]).unwrap_err();
        assert!(matches!(err, Error::InvalidElementId(0)));
    }

    #[test]
    fn test_float32_duration() {
        let mut data = vec![0x44, 0x89, 0x84];
        data.extend_from_slice(&2.5f32.to_be_bytes());
        let parsed = parse_elements(&data).unwrap();
        assert_eq!(parsed[0].as_float(), Some(2.5));
    }

    #[test]
    fn test_reader_yields_payload_offsets() {
        let data = [0xE7, 0x81, 0x00, 0xA3, 0x82, 0xAA, 0xBB];
        let mut reader = ElementReader::new(&data);
        let (id, payload, offset) = reader.next_element().unwrap().unwrap();
        assert_eq!((id, payload, offset), (ids::TIMECODE, &[0x00][..], 2));
        let (id, payload, offset) = reader.next_element().unwrap().unwrap();
        assert_eq!((id, payload, offset), (ids::SIMPLE_BLOCK, &[0xAA, 0xBB][..], 5));
        assert!(reader.next_element().is_none());
    }
}
