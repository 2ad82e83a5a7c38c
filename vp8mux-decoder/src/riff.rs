//! RIFF chunk parsing
//!
//! A chunk is a four character id, a little-endian `u32` length and the
//! payload, padded to an even length. `RIFF` and `LIST` chunks are containers:
//! their payload starts with a four character form type followed by more
//! chunks, which are parsed recursively and filed under that form type.

use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::collections::BTreeMap;
use tracing::trace;

/// Four character chunk identifier
pub type FourCc = [u8; 4];

const HEADER_LEN: usize = 8;

/// Payload of one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkValue {
    Bytes(Vec<u8>),
    List(ChunkMap),
}

impl ChunkValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ChunkValue::Bytes(bytes) => Some(bytes),
            ChunkValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&ChunkMap> {
        match self {
            ChunkValue::List(map) => Some(map),
            ChunkValue::Bytes(_) => None,
        }
    }
}

/// Chunks of one nesting level, keyed by id.
///
/// Sibling chunks sharing an id are kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkMap {
    chunks: BTreeMap<FourCc, Vec<ChunkValue>>,
}

impl ChunkMap {
    /// All chunks with the given id, in file order
    pub fn get(&self, id: &FourCc) -> &[ChunkValue] {
        self.chunks.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first chunk with the given id
    pub fn first(&self, id: &FourCc) -> Option<&ChunkValue> {
        self.get(id).first()
    }

    /// Ids present at this level
    pub fn ids(&self) -> impl Iterator<Item = &FourCc> {
        self.chunks.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn push(&mut self, id: FourCc, value: ChunkValue) {
        self.chunks.entry(id).or_default().push(value);
    }
}

fn is_container(id: &FourCc) -> bool {
    id == b"RIFF" || id == b"LIST"
}

/// Parses a buffer of consecutive chunks
pub fn parse_chunks(data: &[u8]) -> Result<ChunkMap> {
    parse_level(data, 0)
}

fn parse_level(data: &[u8], base: usize) -> Result<ChunkMap> {
    let mut map = ChunkMap::default();
    let mut offset = 0;

    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < HEADER_LEN {
            return Err(Error::MalformedContainer {
                id: fourcc_lossy(&data[offset..]),
                offset: base + offset,
                declared: HEADER_LEN as u64,
                remaining,
            });
        }

        let mut id = [0u8; 4];
        id.copy_from_slice(&data[offset..offset + 4]);
        let declared = LittleEndian::read_u32(&data[offset + 4..offset + HEADER_LEN]);
        let body_start = offset + HEADER_LEN;
        let body_len = declared as usize;

        if body_len > data.len() - body_start {
            return Err(Error::MalformedContainer {
                id: fourcc_lossy(&id),
                offset: base + offset,
                declared: u64::from(declared),
                remaining: data.len() - body_start,
            });
        }
        let body = &data[body_start..body_start + body_len];
        trace!(id = %fourcc_lossy(&id), offset = base + offset, len = body_len, "chunk");

        let value = if is_container(&id) {
            ChunkValue::List(parse_container(&id, body, base + body_start)?)
        } else {
            ChunkValue::Bytes(body.to_vec())
        };
        map.push(id, value);

        // Odd-sized chunks carry a pad byte, which may be missing at the very end
        offset = (body_start + body_len + (body_len & 1)).min(data.len());
    }

    Ok(map)
}

fn parse_container(id: &FourCc, body: &[u8], base: usize) -> Result<ChunkMap> {
    let Some(form) = body.get(..4) else {
        return Err(Error::MalformedContainer {
            id: fourcc_lossy(id),
            offset: base,
            declared: 4,
            remaining: body.len(),
        });
    };
    let mut form_type = [0u8; 4];
    form_type.copy_from_slice(form);

    let mut map = ChunkMap::default();
    map.push(form_type, ChunkValue::List(parse_level(&body[4..], base + 4)?));
    Ok(map)
}

fn fourcc_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
