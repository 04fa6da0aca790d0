//! SVG documents as a [`DocumentAdapter`].
//!
//! Reading goes through usvg, which resolves CSS, transforms and basic
//! shapes (rect, circle, polygon, ...) into plain paths with absolute
//! bounding boxes. Writing goes back through quick-xml: the original markup
//! is streamed out untouched and the generated strands are inserted just
//! before the root element closes, so nothing else in the file changes.
//!
//! ## Coordinate spaces
//!
//! usvg reports bounding boxes in canvas units (the root `width`/`height`),
//! while paths appended to the file live in the root's user space (its
//! `viewBox`). Region and selection boxes are mapped from canvas to user
//! space with a per-axis scale, which is exact unless the viewBox aspect
//! ratio differs from the canvas and letterboxing applies.

use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;

use log::debug;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::document::{Curve, DocumentAdapter};
use crate::error::{Result, SpaghettiError};
use crate::geometry::{BoundingBox, FilledRegion};

/// Class attribute set on every generated `<path>`.
pub const STRAND_CLASS: &str = "spaghetti-strand";

/// `(left, top, right, bottom)` in canvas units.
type Extent = (f64, f64, f64, f64);

/// A parsed SVG file plus the curves appended to it.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    source: String,
    /// The root's user-space rectangle (`viewBox`, or `0 0 width height`).
    page: BoundingBox,
    /// Canvas-to-user scale per axis.
    scale: (f64, f64),
    /// Visible filled paths.
    filled: Vec<Extent>,
    /// Every element that kept an id through usvg.
    by_id: HashMap<String, Extent>,
    selected: Vec<Extent>,
    curves: Vec<Curve>,
}

impl SvgDocument {
    /// Parse an SVG document.
    pub fn parse(svg_content: &str) -> Result<Self> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg_content, &options)
            .map_err(|e| SpaghettiError::SvgParse(e.to_string()))?;

        let size = tree.size();
        let (width, height) = (size.width() as f64, size.height() as f64);

        let page = match root_view_box(svg_content)? {
            Some(vb) => BoundingBox::new(vb.x, vb.y, vb.x + vb.w, vb.y + vb.h)?,
            None => BoundingBox::new(0.0, 0.0, width, height)?,
        };
        let scale = (page.width() / width, page.height() / height);

        let mut filled = Vec::new();
        let mut by_id = HashMap::new();
        collect_extents(tree.root(), &mut filled, &mut by_id);
        debug!("parsed SVG {width}x{height}, {} filled paths", filled.len());

        Ok(Self {
            source: svg_content.to_string(),
            page,
            scale,
            filled,
            by_id,
            selected: Vec::new(),
            curves: Vec::new(),
        })
    }

    /// An empty page of the given size.
    pub fn blank(width: f64, height: f64) -> Result<Self> {
        let svg = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
</svg>
"#
        );
        Self::parse(&svg)
    }

    /// Select elements by id; their combined extents become the selection
    /// bounding box. Returns the ids that were not found.
    pub fn select<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<String> {
        let mut missing = Vec::new();
        self.selected.clear();
        for id in ids {
            let id = id.as_ref();
            match self.by_id.get(id) {
                Some(extent) => self.selected.push(*extent),
                None => missing.push(id.to_string()),
            }
        }
        missing
    }

    fn to_user(&self, extent: &Extent) -> Extent {
        let (sx, sy) = self.scale;
        let (ox, oy) = (self.page.x_min(), self.page.y_min());
        let (left, top, right, bottom) = *extent;
        (ox + left * sx, oy + top * sy, ox + right * sx, oy + bottom * sy)
    }

    /// The original document with every appended curve inserted before the
    /// root element closes.
    pub fn to_svg_string(&self) -> Result<String> {
        let mut reader = Reader::from_str(&self.source);
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        let mut depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    depth += 1;
                    writer.write_event(Event::Start(e))?;
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.write_curves(&mut writer)?;
                    }
                    writer.write_event(Event::End(e))?;
                }
                Event::Empty(e) if depth == 0 => {
                    // A self-closing root: reopen it so curves have a parent.
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    writer.write_event(Event::Start(e))?;
                    self.write_curves(&mut writer)?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                }
                Event::Eof => break,
                e => writer.write_event(e)?,
            }
        }

        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_curves(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
        for curve in &self.curves {
            let width = format!("{}", curve.stroke_width);
            let style = format!(
                "fill:none;stroke:{};stroke-width:{};stroke-linecap:round;stroke-linejoin:round",
                curve.stroke_color, width
            );

            let mut path = BytesStart::new("path");
            path.push_attribute(("class", STRAND_CLASS));
            path.push_attribute(("d", curve.path_data.as_str()));
            path.push_attribute(("fill", "none"));
            path.push_attribute(("stroke", curve.stroke_color.as_str()));
            path.push_attribute(("stroke-width", width.as_str()));
            path.push_attribute(("stroke-linecap", "round"));
            path.push_attribute(("stroke-linejoin", "round"));
            path.push_attribute(("style", style.as_str()));

            writer.write_event(Event::Empty(path))?;
            writer.write_event(Event::Text(BytesText::new("\n")))?;
        }
        Ok(())
    }
}

impl DocumentAdapter for SvgDocument {
    fn bounding_box(&self, use_page: bool) -> Option<BoundingBox> {
        if use_page {
            return Some(self.page);
        }

        // Zero-area extents (a lone horizontal line, say) are skipped.
        self.selected
            .iter()
            .filter_map(|r| {
                let (left, top, right, bottom) = self.to_user(r);
                BoundingBox::new(left, top, right, bottom).ok()
            })
            .reduce(|acc, b| acc.union(&b))
    }

    fn filled_regions(&self) -> Vec<FilledRegion> {
        self.filled
            .iter()
            .map(|r| {
                let (left, top, right, bottom) = self.to_user(r);
                FilledRegion::new(left, top, right, bottom)
            })
            .collect()
    }

    fn append_curve(&mut self, path_data: &str, stroke_color: &str, stroke_width: f64) -> Result<()> {
        self.curves.push(Curve {
            path_data: path_data.to_string(),
            stroke_color: stroke_color.to_string(),
            stroke_width,
        });
        Ok(())
    }
}

/// The root element's `viewBox`, if it has a valid one.
fn root_view_box(svg_content: &str) -> Result<Option<svgtypes::ViewBox>> {
    let mut reader = Reader::from_str(svg_content);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                let attr = e
                    .try_get_attribute("viewBox")
                    .map_err(quick_xml::Error::from)?;
                let Some(attr) = attr else {
                    return Ok(None);
                };
                let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
                return Ok(svgtypes::ViewBox::from_str(&value)
                    .ok()
                    .filter(|vb| vb.w > 0.0 && vb.h > 0.0));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Recursively collect the extents of visible filled paths and of every
/// element with an id.
fn collect_extents(
    group: &usvg::Group,
    filled: &mut Vec<Extent>,
    by_id: &mut HashMap<String, Extent>,
) {
    for child in group.children() {
        if !child.id().is_empty() {
            let r = child.abs_bounding_box();
            let extent = (r.left() as f64, r.top() as f64, r.right() as f64, r.bottom() as f64);
            by_id.insert(child.id().to_string(), extent);
        }

        match child {
            usvg::Node::Group(group) => collect_extents(group, filled, by_id),
            usvg::Node::Path(path) => {
                if path.is_visible() && path.fill().is_some() {
                    let r = path.abs_bounding_box();
                    filled.push((r.left() as f64, r.top() as f64, r.right() as f64, r.bottom() as f64));
                }
            }
            // Ignore text, images, etc.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_WITH_SHAPES: &str = r##"
        <svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">
            <rect id="filled" x="100" y="50" width="100" height="80" fill="#ff0000"/>
            <rect id="hollow" x="10" y="10" width="50" height="50" fill="none" stroke="black"/>
            <circle id="dot" cx="300" cy="200" r="40"/>
        </svg>
    "##;

    #[test]
    fn page_box_from_view_box() {
        let doc = SvgDocument::parse(PAGE_WITH_SHAPES).unwrap();
        let page = doc.bounding_box(true).unwrap();
        assert_eq!(page.as_tuple(), (0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn page_box_without_view_box() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="80"></svg>"#;
        let doc = SvgDocument::parse(svg).unwrap();
        assert_eq!(doc.bounding_box(true).unwrap().as_tuple(), (0.0, 0.0, 120.0, 80.0));
    }

    #[test]
    fn only_filled_shapes_become_regions() {
        let doc = SvgDocument::parse(PAGE_WITH_SHAPES).unwrap();
        let regions = doc.filled_regions();
        // The rect with fill and the circle (default black fill); not the hollow rect.
        assert_eq!(regions.len(), 2);

        let rect = regions
            .iter()
            .find(|r| (r.left - 100.0).abs() < 1e-3)
            .unwrap();
        assert!((rect.top - 50.0).abs() < 1e-3);
        assert!((rect.right - 200.0).abs() < 1e-3);
        assert!((rect.bottom - 130.0).abs() < 1e-3);
    }

    #[test]
    fn regions_are_mapped_into_view_box_units() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 100 100">
                <rect x="10" y="20" width="30" height="40"/>
            </svg>
        "#;
        let doc = SvgDocument::parse(svg).unwrap();
        let r = doc.filled_regions()[0];
        assert!((r.left - 10.0).abs() < 1e-3 && (r.top - 20.0).abs() < 1e-3);
        assert!((r.right - 40.0).abs() < 1e-3 && (r.bottom - 60.0).abs() < 1e-3);
    }

    #[test]
    fn selection_box_is_union_of_selected_elements() {
        let mut doc = SvgDocument::parse(PAGE_WITH_SHAPES).unwrap();
        assert!(doc.bounding_box(false).is_none(), "nothing selected yet");

        let missing = doc.select(&["filled", "dot", "nope"]);
        assert_eq!(missing, vec!["nope".to_string()]);

        let (x_min, y_min, x_max, y_max) = doc.bounding_box(false).unwrap().as_tuple();
        assert!((x_min - 100.0).abs() < 1e-3);
        assert!((y_min - 50.0).abs() < 1e-3);
        assert!((x_max - 340.0).abs() < 1e-3);
        assert!((y_max - 240.0).abs() < 1e-3);
    }

    #[test]
    fn flat_selection_is_ignored_in_the_union() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="200" height="200">
                <rect id="box" x="20" y="30" width="40" height="50"/>
                <line id="rule" x1="0" y1="150" x2="180" y2="150" stroke="black"/>
            </svg>
        "#;
        let mut doc = SvgDocument::parse(svg).unwrap();

        doc.select(&["box", "rule"]);
        let (x_min, y_min, x_max, y_max) = doc.bounding_box(false).unwrap().as_tuple();
        assert!((x_min - 20.0).abs() < 1e-3 && (y_min - 30.0).abs() < 1e-3);
        assert!((x_max - 60.0).abs() < 1e-3 && (y_max - 80.0).abs() < 1e-3);

        doc.select(&["rule"]);
        assert!(doc.bounding_box(false).is_none());
    }

    #[test]
    fn curves_are_written_before_root_close() {
        let mut doc = SvgDocument::parse(PAGE_WITH_SHAPES).unwrap();
        doc.append_curve("M 1.00,2.00 C 3.00,4.00 5.00,6.00 7.00,8.00", "#123456", 1.5)
            .unwrap();

        let out = doc.to_svg_string().unwrap();
        let path_at = out.find("<path").unwrap();
        let close_at = out.rfind("</svg>").unwrap();
        assert!(path_at < close_at);
        assert!(out.contains(r#"d="M 1.00,2.00 C 3.00,4.00 5.00,6.00 7.00,8.00""#));
        assert!(out.contains(r##"stroke="#123456""##));
        assert!(out.contains(r#"stroke-width="1.5""#));
        assert!(out.contains(r#"id="hollow""#), "original content is preserved");

        // The result is still a valid document with one more filled=none path.
        let reparsed = SvgDocument::parse(&out).unwrap();
        assert_eq!(reparsed.filled_regions().len(), 2);
    }

    #[test]
    fn self_closing_root_is_reopened() {
        let mut doc = SvgDocument::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50"/>"#,
        )
        .unwrap();
        doc.append_curve("M 0.00,0.00 C 1.00,1.00 2.00,2.00 3.00,3.00", "black", 1.0)
            .unwrap();

        let out = doc.to_svg_string().unwrap();
        assert!(out.contains("<path"));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn blank_page() {
        let doc = SvgDocument::blank(297.0, 210.0).unwrap();
        assert_eq!(doc.bounding_box(true).unwrap().as_tuple(), (0.0, 0.0, 297.0, 210.0));
        assert!(doc.filled_regions().is_empty());
    }

    #[test]
    fn invalid_svg_is_a_parse_error() {
        let err = SvgDocument::parse("<not-svg").unwrap_err();
        assert!(matches!(err, SpaghettiError::SvgParse(_)));
    }
}
