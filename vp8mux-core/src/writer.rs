//! EBML binary serialization

use crate::element::Element;
use crate::ids::id_bytes;
use crate::varint::{encode_size, encode_unsigned, size_len, unsigned_len};
use crate::Result;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

/// Streams elements to a writer as id, size descriptor and payload.
///
/// Master sizes are computed up front so nothing is buffered; every size is
/// written with its minimal descriptor width.
pub struct EbmlWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> EbmlWriter<W> {
    /// Creates a new writer over `inner`
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Writes one element and its whole subtree
    pub fn write_element(&mut self, element: &Element) -> Result<()> {
        self.put(&id_bytes(element.id()))?;
        self.put(&encode_size(payload_len(element)))?;

        match element {
            Element::Master { children, .. } => {
                for child in children {
                    self.write_element(child)?;
                }
            }
            Element::UInt { value, .. } => self.put(&encode_unsigned(*value))?,
            Element::Float64 { value, .. } => {
                self.inner.write_f64::<BigEndian>(*value)?;
                self.written += 8;
            }
            Element::Str { value, .. } => self.put(value.as_bytes())?,
            Element::Bytes { value, .. } => self.put(value)?,
        }
        Ok(())
    }

    /// Total number of bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Consumes the writer, returning the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// Length of an element's payload, excluding its own id and size descriptor
pub fn payload_len(element: &Element) -> u64 {
    match element {
        Element::Master { children, .. } => children.iter().map(encoded_len).sum(),
        Element::UInt { value, .. } => unsigned_len(*value) as u64,
        Element::Float64 { .. } => 8,
        Element::Str { value, .. } => value.len() as u64,
        Element::Bytes { value, .. } => value.len() as u64,
    }
}

/// Full serialized length of an element
pub fn encoded_len(element: &Element) -> u64 {
    let payload = payload_len(element);
    id_bytes(element.id()).len() as u64 + size_len(payload) as u64 + payload
}

/// Serializes a single element into a new buffer
pub fn encode(element: &Element) -> Result<Vec<u8>> {
    encode_document(std::slice::from_ref(element))
}

/// Serializes a sequence of top-level elements back to back
pub fn encode_document(elements: &[Element]) -> Result<Vec<u8>> {
    let capacity = elements.iter().map(encoded_len).sum::<u64>() as usize;
    let mut writer = EbmlWriter::new(Vec::with_capacity(capacity));
    for element in elements {
        writer.write_element(element)?;
    }
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;
    use std::io::Cursor;

    #[test]
    fn test_encode_uint() {
        let bytes = encode(&Element::uint(ids::TIMECODE_SCALE, 1_000_000)).unwrap();
        assert_eq!(bytes, vec![0x2A, 0xD7, 0xB1, 0x83, 0x0F, 0x42, 0x40]);

        let zero = encode(&Element::uint(ids::FLAG_LACING, 0)).unwrap();
        assert_eq!(zero, vec![0x9C, 0x81, 0x00]);
    }

    #[test]
    fn test_encode_float_is_big_endian() {
        let bytes = encode(&Element::float(ids::DURATION, 100.0)).unwrap();
        assert_eq!(&bytes[..3], &[0x44, 0x89, 0x88]);
        assert_eq!(&bytes[3..], &100.0f64.to_be_bytes());
        assert_eq!(&bytes[3..], &[0x40, 0x59, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_string_verbatim() {
        let bytes = encode(&Element::string(ids::DOC_TYPE, "webm")).unwrap();
        assert_eq!(bytes, vec![0x42, 0x82, 0x84, b'w', b'e', b'b', b'm']);
    }

    #[test]
    fn test_encode_master_nests_children() {
        let video = Element::master(
            ids::VIDEO,
            vec![
                Element::uint(ids::PIXEL_WIDTH, 200),
                Element::uint(ids::PIXEL_HEIGHT, 100),
            ],
        );
        let bytes = encode(&video).unwrap();
        assert_eq!(bytes, vec![0xE0, 0x86, 0xB0, 0x81, 200, 0xBA, 0x81, 100]);
        assert_eq!(encoded_len(&video), bytes.len() as u64);
    }

    #[test]
    fn test_encode_large_binary_uses_wider_size() {
        let block = Element::bytes(ids::SIMPLE_BLOCK, vec![0xAB; 300]);
        let bytes = encode(&block).unwrap();
        assert_eq!(&bytes[..3], &[0xA3, 0x41, 0x2C]);
        assert_eq!(bytes.len(), 3 + 300);
    }

    #[test]
    fn test_empty_master() {
        let bytes = encode(&Element::master(ids::SEGMENT, Vec::new())).unwrap();
        assert_eq!(bytes, vec![0x18, 0x53, 0x80, 0x67, 0x80]);
    }

    #[test]
    fn test_writer_counts_bytes() {
        let mut writer = EbmlWriter::new(Cursor::new(Vec::new()));
        writer
            .write_element(&Element::string(ids::CODEC_ID, "V_VP8"))
            .unwrap();
        assert_eq!(writer.bytes_written(), 7);
        assert_eq!(writer.into_inner().into_inner().len(), 7);
    }
}
