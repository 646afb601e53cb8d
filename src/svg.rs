use itertools::Itertools;
use std::fmt::Write;
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};
use crate::render::{Stroke, TextStyle};
use crate::surface::{estimate_text_width, Surface};

const MARGIN: f64 = 20.0;
const ASCENT: f64 = 0.8;
const LINE_HEIGHT: f64 = 1.2;

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Clone, Debug)]
struct SvgText {
    contents: String,
    left: f64,
    top: f64,
    style: Option<TextStyle>,
}

impl SvgText {
    fn size(&self) -> f64 {
        self.style.as_ref().map_or(12.0, |style| style.size)
    }

    fn width(&self) -> f64 {
        estimate_text_width(&self.contents, self.size())
    }

    fn height(&self) -> f64 {
        self.contents.lines().count().max(1) as f64 * self.size() * LINE_HEIGHT
    }
}

#[derive(Clone, Debug)]
enum Item {
    Text(usize),
    Rect {
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        stroke: Stroke,
    },
}

#[derive(Clone, Debug)]
struct Layer {
    name: String,
    items: Vec<Item>,
}

/// Surface producing a standalone SVG file. Page coordinates grow upwards,
/// so y is negated on output and the view box is fitted around the content.
#[derive(Clone, Debug, Default)]
pub struct SvgDocument {
    layers: Vec<Layer>,
    texts: Vec<SvgText>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn include(self, left: f64, top: f64, width: f64, height: f64) -> Self {
        Bounds {
            min_x: self.min_x.min(left),
            min_y: self.min_y.min(top - height),
            max_x: self.max_x.max(left + width),
            max_y: self.max_y.max(top),
        }
    }
}

impl SvgDocument {
    pub fn new() -> Self {
        SvgDocument::default()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn current_layer(&mut self) -> Result<&mut Layer> {
        self.layers
            .last_mut()
            .ok_or_else(|| Error::new(ErrorKind::Render, "no layer to draw on"))
    }

    fn text_mut(&mut self, text: usize) -> Result<&mut SvgText> {
        self.texts
            .get_mut(text)
            .ok_or_else(|| Error::new(ErrorKind::Render, &format!("unknown text {}", text)))
    }

    fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut include = |left: f64, top: f64, width: f64, height: f64| {
            let seed = Bounds {
                min_x: left,
                min_y: top,
                max_x: left,
                max_y: top,
            };
            bounds = Some(bounds.unwrap_or(seed).include(left, top, width, height));
        };

        for item in self.layers.iter().flat_map(|layer| layer.items.iter()) {
            match item {
                Item::Text(idx) => {
                    let text = &self.texts[*idx];
                    include(text.left, text.top, text.width(), text.height());
                }
                Item::Rect {
                    top,
                    left,
                    width,
                    height,
                    ..
                } => include(*left, *top, *width, *height),
            }
        }

        bounds
    }

    fn write_text(out: &mut String, text: &SvgText) -> std::fmt::Result {
        let size = text.size();
        let (font, fill) = match &text.style {
            Some(style) => (escape(&style.font), style.color.to_hex()),
            None => ("sans-serif".to_owned(), "#000000".to_owned()),
        };
        let baseline = -text.top + size * ASCENT;

        write!(
            out,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
            text.left, baseline, font, size, fill
        )?;
        if text.contents.contains('\n') {
            let spans = text
                .contents
                .lines()
                .enumerate()
                .map(|(i, line)| {
                    let dy = if i == 0 { 0.0 } else { size * LINE_HEIGHT };
                    format!(
                        "<tspan x=\"{:.2}\" dy=\"{:.2}\">{}</tspan>",
                        text.left,
                        dy,
                        escape(line)
                    )
                })
                .join("");
            out.push_str(&spans);
        } else {
            out.push_str(&escape(&text.contents));
        }
        writeln!(out, "</text>")
    }

    pub fn to_svg(&self) -> String {
        let bounds = self.bounds().unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        let width = bounds.max_x - bounds.min_x + 2.0 * MARGIN;
        let height = bounds.max_y - bounds.min_y + 2.0 * MARGIN;

        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.2}\" height=\"{h:.2}\" viewBox=\"{x:.2} {y:.2} {w:.2} {h:.2}\">",
            x = bounds.min_x - MARGIN,
            y = -bounds.max_y - MARGIN,
            w = width,
            h = height
        );

        for layer in &self.layers {
            let _ = writeln!(out, "<g data-name=\"{}\">", escape(&layer.name));
            for item in &layer.items {
                match item {
                    Item::Text(idx) => {
                        let _ = Self::write_text(&mut out, &self.texts[*idx]);
                    }
                    Item::Rect {
                        top,
                        left,
                        width,
                        height,
                        stroke,
                    } => {
                        let _ = writeln!(
                            out,
                            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                            left,
                            -top,
                            width,
                            height,
                            stroke.color.to_hex(),
                            stroke.width
                        );
                    }
                }
            }
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_svg())?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

impl Surface for SvgDocument {
    type Text = usize;

    fn add_layer(&mut self, name: &str) -> Result<()> {
        self.layers.push(Layer {
            name: name.to_owned(),
            items: Vec::new(),
        });
        Ok(())
    }

    fn add_text(&mut self, contents: &str, left: f64, top: f64) -> Result<usize> {
        let idx = self.texts.len();
        self.current_layer()?.items.push(Item::Text(idx));
        self.texts.push(SvgText {
            contents: contents.to_owned(),
            left,
            top,
            style: None,
        });
        Ok(idx)
    }

    fn style_text(&mut self, text: &usize, style: &TextStyle) -> Result<()> {
        self.text_mut(*text)?.style = Some(style.clone());
        Ok(())
    }

    fn text_width(&self, text: &usize) -> Result<f64> {
        self.texts
            .get(*text)
            .map(SvgText::width)
            .ok_or_else(|| Error::new(ErrorKind::Render, &format!("unknown text {}", text)))
    }

    fn set_text_left(&mut self, text: &usize, left: f64) -> Result<()> {
        self.text_mut(*text)?.left = left;
        Ok(())
    }

    fn add_rect(
        &mut self,
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        stroke: &Stroke,
    ) -> Result<()> {
        self.current_layer()?.items.push(Item::Rect {
            top,
            left,
            width,
            height,
            stroke: *stroke,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::{HolidayIndex, HolidayRecord};
    use crate::render::render_year;
    use crate::settings::{RenderSettings, Rgb};
    use crate::surface::replay;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("Tom & Jerry <\"day\">"),
            "Tom &amp; Jerry &lt;&quot;day&quot;&gt;"
        );
    }

    #[test]
    fn rect_is_unfilled_and_flipped() {
        let mut doc = SvgDocument::new();
        doc.add_layer("grid").unwrap();
        let stroke = Stroke {
            color: Rgb::GRID,
            width: 1.0,
        };
        doc.add_rect(100.0, 10.0, 75.0, 55.0, &stroke).unwrap();
        let svg = doc.to_svg();

        assert!(svg.contains(
            "<rect x=\"10.00\" y=\"-100.00\" width=\"75.00\" height=\"55.00\" fill=\"none\" stroke=\"#464646\" stroke-width=\"1\"/>"
        ));
        assert!(svg.contains("viewBox=\"-10.00 -120.00 115.00 95.00\""));
    }

    #[test]
    fn multi_line_text_uses_tspans() {
        let mut doc = SvgDocument::new();
        doc.add_layer("legend").unwrap();
        doc.add_text("Jan 1 - A\nJan 2 - B & C", 0.0, 0.0).unwrap();
        let svg = doc.to_svg();
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains("Jan 2 - B &amp; C"));
    }

    #[test]
    fn full_year_renders_twelve_groups() {
        let settings = RenderSettings::default();
        let records = vec![HolidayRecord::new("2024-01-01", "Neujahr", "New Year's Day")];
        let cmds = render_year(2024, &HolidayIndex::build(&records), &settings);

        let mut doc = SvgDocument::new();
        replay(&cmds, &mut doc).unwrap();
        let svg = doc.to_svg();

        assert_eq!(doc.layer_count(), 12);
        assert_eq!(svg.matches("<g data-name=").count(), 12);
        assert_eq!(svg.matches("<rect").count(), 12 * 42);
        assert!(svg.contains("<g data-name=\"12 December 2024\">"));
        assert!(svg.contains("Jan 1 - Neujahr (New Year's Day)"));
        assert!(svg.contains("fill=\"#dc143c\""));
    }
}
