//! Typed EBML element tree

use crate::ids;

/// A node of an EBML document.
///
/// Masters hold an ordered list of children; every other variant carries a
/// single scalar payload whose encoding is fixed by the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Master { id: u32, children: Vec<Element> },
    UInt { id: u32, value: u64 },
    Float64 { id: u32, value: f64 },
    Str { id: u32, value: String },
    Bytes { id: u32, value: Vec<u8> },
}

impl Element {
    pub fn master(id: u32, children: Vec<Element>) -> Self {
        Element::Master { id, children }
    }

    pub fn uint(id: u32, value: u64) -> Self {
        Element::UInt { id, value }
    }

    pub fn float(id: u32, value: f64) -> Self {
        Element::Float64 { id, value }
    }

    pub fn string(id: u32, value: impl Into<String>) -> Self {
        Element::Str {
            id,
            value: value.into(),
        }
    }

    pub fn bytes(id: u32, value: Vec<u8>) -> Self {
        Element::Bytes { id, value }
    }

    /// Returns the element id
    pub fn id(&self) -> u32 {
        match self {
            Element::Master { id, .. }
            | Element::UInt { id, .. }
            | Element::Float64 { id, .. }
            | Element::Str { id, .. }
            | Element::Bytes { id, .. } => *id,
        }
    }

    /// Returns the children of a master, or an empty slice for scalars
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Master { children, .. } => children,
            _ => &[],
        }
    }

    /// Appends a child to a master element.
    ///
    /// Returns the child back if `self` is a scalar.
    pub fn push(&mut self, child: Element) -> Result<(), Element> {
        match self {
            Element::Master { children, .. } => {
                children.push(child);
                Ok(())
            }
            _ => Err(child),
        }
    }

    /// Finds the first direct child with the given id
    pub fn find(&self, id: u32) -> Option<&Element> {
        self.children().iter().find(|c| c.id() == id)
    }

    /// Iterates over all direct children with the given id
    pub fn find_all(&self, id: u32) -> impl Iterator<Item = &Element> {
        self.children().iter().filter(move |c| c.id() == id)
    }

    /// Follows a path of ids through nested masters
    pub fn find_path(&self, path: &[u32]) -> Option<&Element> {
        path.iter().try_fold(self, |node, &id| node.find(id))
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Element::UInt { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Element::Float64 { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::Str { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Element::Bytes { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Builds a printable summary of this subtree, eliding binary payloads
    pub fn summary(&self) -> ElementSummary {
        let value = match self {
            Element::Master { children, .. } => {
                SummaryValue::Children(children.iter().map(Element::summary).collect())
            }
            Element::UInt { value, .. } => SummaryValue::UInt(*value),
            Element::Float64 { value, .. } => SummaryValue::Float(*value),
            Element::Str { value, .. } => SummaryValue::Str(value.clone()),
            Element::Bytes { value, .. } => SummaryValue::Bytes { len: value.len() },
        };
        ElementSummary {
            id: format!("0x{:X}", self.id()),
            name: ids::name_of(self.id()),
            value,
        }
    }
}

/// Inspection view of an element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementSummary {
    pub id: String,
    pub name: Option<&'static str>,
    pub value: SummaryValue,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SummaryValue {
    Children(Vec<ElementSummary>),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes { len: usize },
}

impl ElementSummary {
    /// Writes an indented tree, one element per line
    pub fn render(&self, depth: usize, out: &mut String) {
        let label = self.name.unwrap_or("Unknown");
        let indent = "  ".repeat(depth);
        let line = match &self.value {
            SummaryValue::Children(children) => {
                format!("{indent}{label} [{}] ({} children)\n", self.id, children.len())
            }
            SummaryValue::UInt(v) => format!("{indent}{label} [{}] = {v}\n", self.id),
            SummaryValue::Float(v) => format!("{indent}{label} [{}] = {v}\n", self.id),
            SummaryValue::Str(v) => format!("{indent}{label} [{}] = {v:?}\n", self.id),
            SummaryValue::Bytes { len } => format!("{indent}{label} [{}] <{len} bytes>\n", self.id),
        };
        out.push_str(&line);
        if let SummaryValue::Children(children) = &self.value {
            for child in children {
                child.render(depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::master(
            ids::TRACKS,
            vec![Element::master(
                ids::TRACK_ENTRY,
                vec![
                    Element::uint(ids::TRACK_NUMBER, 1),
                    Element::string(ids::CODEC_ID, "V_VP8"),
                    Element::master(ids::VIDEO, vec![Element::uint(ids::PIXEL_WIDTH, 200)]),
                ],
            )],
        )
    }

    #[test]
    fn test_find_path() {
        let tracks = sample();
        let width = tracks
            .find_path(&[ids::TRACK_ENTRY, ids::VIDEO, ids::PIXEL_WIDTH])
            .and_then(Element::as_uint);
        assert_eq!(width, Some(200));
        assert!(tracks.find_path(&[ids::TRACK_ENTRY, 0xE1]).is_none());
    }

    #[test]
    fn test_push_only_into_master() {
        let mut master = Element::master(ids::CLUSTER, Vec::new());
        assert!(master.push(Element::uint(ids::TIMECODE, 0)).is_ok());
        assert_eq!(master.children().len(), 1);

        let mut scalar = Element::uint(ids::TIMECODE, 0);
        assert!(scalar.push(Element::uint(ids::TIMECODE, 1)).is_err());
    }

    #[test]
    fn test_summary_render() {
        let mut out = String::new();
        sample().summary().render(0, &mut out);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Tracks [0x1654AE6B] (1 children)");
        assert_eq!(lines[2], "    TrackNumber [0xD7] = 1");
        assert_eq!(lines[3], "    CodecID [0x86] = \"V_VP8\"");
    }
}
