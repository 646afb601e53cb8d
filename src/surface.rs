use crate::error::{Error, ErrorKind, Result};
use crate::render::{DrawCmd, Stroke, TextStyle};

/// Average glyph advance as a fraction of the font size. Used by surfaces
/// that cannot measure real glyph metrics.
pub const AVERAGE_GLYPH_WIDTH: f64 = 0.5;

pub fn estimate_text_width(contents: &str, size: f64) -> f64 {
    contents
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as f64
        * size
        * AVERAGE_GLYPH_WIDTH
}

/// A document that draw commands can be replayed onto. New texts and
/// rectangles always go to the most recently added layer.
pub trait Surface {
    type Text: Clone;

    fn add_layer(&mut self, name: &str) -> Result<()>;
    fn add_text(&mut self, contents: &str, left: f64, top: f64) -> Result<Self::Text>;
    fn style_text(&mut self, text: &Self::Text, style: &TextStyle) -> Result<()>;
    fn text_width(&self, text: &Self::Text) -> Result<f64>;
    fn set_text_left(&mut self, text: &Self::Text, left: f64) -> Result<()>;
    fn add_rect(&mut self, top: f64, left: f64, width: f64, height: f64, stroke: &Stroke)
        -> Result<()>;
}

fn lookup<T>(texts: &[Option<T>], id: usize) -> Result<&T> {
    texts.get(id).and_then(Option::as_ref).ok_or_else(|| {
        Error::new(
            ErrorKind::Render,
            &format!("text {} referenced before it was added", id),
        )
    })
}

/// Replays `cmds` in order. Stops at the first failing command; whatever was
/// drawn before stays on the surface.
pub fn replay<S: Surface>(cmds: &[DrawCmd], surface: &mut S) -> Result<()> {
    let mut texts: Vec<Option<S::Text>> = Vec::new();

    for cmd in cmds {
        match cmd {
            DrawCmd::AddLayer { name } => surface.add_layer(name)?,
            DrawCmd::AddText {
                id,
                contents,
                left,
                top,
            } => {
                let text = surface.add_text(contents, *left, *top)?;
                if texts.len() <= *id {
                    texts.resize(*id + 1, None);
                }
                texts[*id] = Some(text);
            }
            DrawCmd::StyleText { id, style } => {
                let text = lookup(&texts, *id)?;
                surface.style_text(text, style)?;
            }
            DrawCmd::CenterText { id, center_x } => {
                let text = lookup(&texts, *id)?;
                let width = surface.text_width(text)?;
                surface.set_text_left(text, center_x - width / 2.0)?;
            }
            DrawCmd::AddRect {
                top,
                left,
                width,
                height,
                stroke,
            } => surface.add_rect(*top, *left, *width, *height, stroke)?,
        }
    }

    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedText {
    pub layer: usize,
    pub contents: String,
    pub left: f64,
    pub top: f64,
    pub style: Option<TextStyle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRect {
    pub layer: usize,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub stroke: Stroke,
}

/// In-memory surface that keeps everything drawn onto it.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub layers: Vec<String>,
    pub texts: Vec<RecordedText>,
    pub rects: Vec<RecordedRect>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    fn current_layer(&self) -> Result<usize> {
        self.layers
            .len()
            .checked_sub(1)
            .ok_or_else(|| Error::new(ErrorKind::Render, "no layer to draw on"))
    }

    pub fn texts_on_layer<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RecordedText> {
        let layer = self.layers.iter().position(|l| l == name);
        self.texts
            .iter()
            .filter(move |text| Some(text.layer) == layer)
    }
}

impl Surface for Recorder {
    type Text = usize;

    fn add_layer(&mut self, name: &str) -> Result<()> {
        self.layers.push(name.to_owned());
        Ok(())
    }

    fn add_text(&mut self, contents: &str, left: f64, top: f64) -> Result<usize> {
        let layer = self.current_layer()?;
        self.texts.push(RecordedText {
            layer,
            contents: contents.to_owned(),
            left,
            top,
            style: None,
        });
        Ok(self.texts.len() - 1)
    }

    fn style_text(&mut self, text: &usize, style: &TextStyle) -> Result<()> {
        let text = self
            .texts
            .get_mut(*text)
            .ok_or_else(|| Error::from(ErrorKind::Render))?;
        text.style = Some(style.clone());
        Ok(())
    }

    fn text_width(&self, text: &usize) -> Result<f64> {
        let text = self
            .texts
            .get(*text)
            .ok_or_else(|| Error::from(ErrorKind::Render))?;
        let size = text.style.as_ref().map_or(0.0, |style| style.size);
        Ok(estimate_text_width(&text.contents, size))
    }

    fn set_text_left(&mut self, text: &usize, left: f64) -> Result<()> {
        let text = self
            .texts
            .get_mut(*text)
            .ok_or_else(|| Error::from(ErrorKind::Render))?;
        text.left = left;
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
        let layer = self.current_layer()?;
        self.rects.push(RecordedRect {
            layer,
            top,
            left,
            width,
            height,
            stroke: *stroke,
        });
        Ok(())
    }
}
