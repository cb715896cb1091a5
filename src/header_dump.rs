use crate::error::Converter;
use crate::Result;
use roxmltree::{Document, Node};

const INDENT: usize = 4;

/// Renders all header fields of the scan with the given index as indented text lines.
///
/// Each element produces one line with its name and E57 node type.
/// Leaf values are appended after a colon.
/// Structures and vectors are expanded recursively, compressed vectors and blobs are not.
pub fn dump_scan_header(xml: &str, index: usize) -> Result<Vec<String>> {
    let document = Document::parse(xml).extraction_err("Failed to parse XML section")?;
    let data3d = document
        .descendants()
        .find(|n| n.has_tag_name("data3D"))
        .extraction_err("Cannot find 'data3D' tag in XML section")?;
    let scan = data3d
        .children()
        .filter(|n| n.has_tag_name("vectorChild"))
        .nth(index)
        .extraction_err(format!("Cannot find scan header with index {index}"))?;

    let mut lines = Vec::new();
    dump_children(&scan, INDENT, &mut lines);
    Ok(lines)
}

fn dump_children(node: &Node, indent: usize, lines: &mut Vec<String>) {
    for (index, child) in node.children().filter(|n| n.is_element()).enumerate() {
        let name = if child.has_tag_name("vectorChild") {
            index.to_string()
        } else {
            element_name(&child)
        };
        let kind = child.attribute("type").unwrap_or("Unknown");
        let pad = " ".repeat(indent);
        match kind {
            "Structure" | "Vector" => {
                lines.push(format!("{pad}{name} <{kind}>"));
                dump_children(&child, indent + INDENT, lines);
            }
            "Integer" | "ScaledInteger" | "Float" | "String" => {
                let value = child.text().map(str::trim).unwrap_or_default();
                lines.push(format!("{pad}{name} <{kind}>: {value}"));
            }
            _ => lines.push(format!("{pad}{name} <{kind}>")),
        }
    }
}

fn element_name(node: &Node) -> String {
    let tag = node.tag_name();
    let prefix = tag.namespace().and_then(|ns| node.lookup_prefix(ns));
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<e57Root type="Structure" xmlns="http://www.astm.org/COMMIT/E57/2010-e57-v1.0" xmlns:ext="https://example.com/ext">
  <data3D type="Vector" allowHeterogeneousChildren="1">
    <vectorChild type="Structure">
      <guid type="String"><![CDATA[scan_a]]></guid>
      <temperature type="Float">21.5</temperature>
      <ext:station type="Integer">7</ext:station>
      <pose type="Structure">
        <translation type="Structure">
          <x type="Float">1</x>
        </translation>
      </pose>
      <originalGuids type="Vector" allowHeterogeneousChildren="0">
        <vectorChild type="String"><![CDATA[first]]></vectorChild>
        <vectorChild type="String"><![CDATA[second]]></vectorChild>
      </originalGuids>
      <points type="CompressedVector" fileOffset="48" recordCount="2">
        <prototype type="Structure">
          <cartesianX type="Float"/>
        </prototype>
      </points>
    </vectorChild>
    <vectorChild type="Structure">
      <guid type="String"><![CDATA[scan_b]]></guid>
    </vectorChild>
  </data3D>
</e57Root>"#;

    #[test]
    fn first_scan() {
        let lines = dump_scan_header(XML, 0).unwrap();
        assert_eq!(
            lines,
            vec![
                "    guid <String>: scan_a",
                "    temperature <Float>: 21.5",
                "    ext:station <Integer>: 7",
                "    pose <Structure>",
                "        translation <Structure>",
                "            x <Float>: 1",
                "    originalGuids <Vector>",
                "        0 <String>: first",
                "        1 <String>: second",
                "    points <CompressedVector>",
            ]
        );
    }

    #[test]
    fn second_scan() {
        let lines = dump_scan_header(XML, 1).unwrap();
        assert_eq!(lines, vec!["    guid <String>: scan_b"]);
    }

    #[test]
    fn missing_scan() {
        assert!(dump_scan_header(XML, 2).is_err());
        assert!(dump_scan_header("<e57Root/>", 0).is_err());
        assert!(dump_scan_header("not xml", 0).is_err());
    }
}
