use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[display(fmt = "grid")]
    Grid,
    #[display(fmt = "nogrid")]
    NoGrid,
}

impl FromStr for RenderStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(RenderStyle::Grid),
            "nogrid" => Ok(RenderStyle::NoGrid),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                &format!("unknown render style '{}'", other),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn sunday_column(self) -> u32 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 6,
        }
    }

    /// Re-bases a Sunday-based weekday (0 = Sunday) onto this week start.
    pub fn column_of(self, dow_from_sunday: u32) -> u32 {
        match self {
            WeekStart::Sunday => dow_from_sunday,
            WeekStart::Monday => (dow_from_sunday + 6) % 7,
        }
    }

    pub fn weekday_labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => crate::date::WEEKDAYS_FROM_SUNDAY,
            WeekStart::Monday => crate::date::WEEKDAYS_FROM_MONDAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Constructor, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const HOLIDAY: Rgb = Rgb {
        red: 220.0,
        green: 20.0,
        blue: 60.0,
    };
    pub const NORMAL: Rgb = Rgb {
        red: 20.0,
        green: 20.0,
        blue: 20.0,
    };
    pub const GRID: Rgb = Rgb {
        red: 70.0,
        green: 70.0,
        blue: 70.0,
    };

    /// `#rrggbb`, components rounded and clamped to 0..=255.
    pub fn to_hex(&self) -> String {
        let channel = |c: f64| c.round().max(0.0).min(255.0) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

/// Settings as they arrive over the wire or from the config file. Nothing
/// here is trusted; `normalize` turns it into `RenderSettings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub render_style: Option<Value>,
    pub week_starts_on: Option<Value>,
    pub start_x: Option<Value>,
    pub start_y: Option<Value>,
    pub cell_w: Option<Value>,
    pub cell_h: Option<Value>,
    pub header_h: Option<Value>,
    pub legend_h: Option<Value>,
    pub month_cols: Option<Value>,
    pub month_gap_x: Option<Value>,
    pub month_gap_y: Option<Value>,
    pub font_name: Option<Value>,
    pub font_size_header: Option<Value>,
    pub font_size_weekday: Option<Value>,
    pub font_size_day: Option<Value>,
    pub font_size_legend: Option<Value>,
    pub color_holiday: Option<Value>,
    pub color_normal: Option<Value>,
    pub color_grid: Option<Value>,
}

macro_rules! merge_fields {
    ($base:ident, $over:ident, $($field:ident),+) => {
        $(
            if $over.$field.is_some() {
                $base.$field = $over.$field;
            }
        )+
    };
}

/// Largest magnitude accepted for any numeric setting. Keeps every derived
/// block size and month origin finite.
pub const MAX_MAGNITUDE: f64 = 1.0e6;

fn num(value: &Option<Value>, fallback: f64) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match n.filter(|n| n.is_finite()) {
        Some(n) if n.abs() > MAX_MAGNITUDE => {
            log::warn!("{} is out of range, clamping to {}", n, MAX_MAGNITUDE);
            n.clamp(-MAX_MAGNITUDE, MAX_MAGNITUDE)
        }
        Some(n) => n,
        None => fallback,
    }
}

fn rgb(value: &Option<Value>, fallback: Rgb) -> Rgb {
    match value {
        Some(Value::Array(components)) => {
            let component = |i: usize, fb: f64| num(&components.get(i).cloned(), fb);
            Rgb::new(
                component(0, fallback.red),
                component(1, fallback.green),
                component(2, fallback.blue),
            )
        }
        _ => fallback,
    }
}

fn non_empty_str<'a>(value: &'a Option<Value>) -> Option<&'a str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

impl RawSettings {
    pub fn from_json(payload: &str) -> crate::error::Result<Self> {
        if payload.trim().is_empty() {
            return Ok(RawSettings::default());
        }
        Ok(serde_json::from_str(payload)?)
    }

    /// Layers `other` on top of `self`; every field set in `other` wins.
    pub fn merge(mut self, other: RawSettings) -> Self {
        merge_fields!(
            self,
            other,
            render_style,
            week_starts_on,
            start_x,
            start_y,
            cell_w,
            cell_h,
            header_h,
            legend_h,
            month_cols,
            month_gap_x,
            month_gap_y,
            font_name,
            font_size_header,
            font_size_weekday,
            font_size_day,
            font_size_legend,
            color_holiday,
            color_normal,
            color_grid
        );
        self
    }

    pub fn normalize(&self) -> RenderSettings {
        let d = RenderSettings::default();

        let render_style = match non_empty_str(&self.render_style) {
            None => d.render_style,
            Some(s) => s.parse().unwrap_or_else(|e| {
                log::warn!("{}, falling back to '{}'", e, d.render_style);
                d.render_style
            }),
        };

        let week_starts_on = if num(&self.week_starts_on, 0.0) == 1.0 {
            WeekStart::Monday
        } else {
            WeekStart::Sunday
        };

        let month_cols = num(&self.month_cols, d.month_cols as f64).trunc();
        let month_cols = if month_cols >= 1.0 {
            month_cols as u32
        } else {
            log::warn!("monthCols must be at least 1, using 1");
            1
        };

        RenderSettings::derive(RenderSettings {
            render_style,
            week_starts_on,
            start_x: num(&self.start_x, d.start_x),
            start_y: num(&self.start_y, d.start_y),
            cell_w: num(&self.cell_w, d.cell_w),
            cell_h: num(&self.cell_h, d.cell_h),
            header_h: num(&self.header_h, d.header_h),
            legend_h: num(&self.legend_h, d.legend_h),
            month_cols,
            month_gap_x: num(&self.month_gap_x, d.month_gap_x),
            month_gap_y: num(&self.month_gap_y, d.month_gap_y),
            font_name: non_empty_str(&self.font_name)
                .map(str::to_owned)
                .unwrap_or(d.font_name),
            font_size_header: num(&self.font_size_header, d.font_size_header),
            font_size_weekday: num(&self.font_size_weekday, d.font_size_weekday),
            font_size_day: num(&self.font_size_day, d.font_size_day),
            font_size_legend: num(&self.font_size_legend, d.font_size_legend),
            color_holiday: rgb(&self.color_holiday, d.color_holiday),
            color_normal: rgb(&self.color_normal, d.color_normal),
            color_grid: rgb(&self.color_grid, d.color_grid),
            block_w: 0.0,
            block_h: 0.0,
        })
    }
}

/// Fully defaulted, immutable render settings. Only constructed through
/// `Default` or `RawSettings::normalize`, so every number is finite.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub render_style: RenderStyle,
    pub week_starts_on: WeekStart,
    pub start_x: f64,
    pub start_y: f64,
    pub cell_w: f64,
    pub cell_h: f64,
    pub header_h: f64,
    pub legend_h: f64,
    pub month_cols: u32,
    pub month_gap_x: f64,
    pub month_gap_y: f64,
    pub font_name: String,
    pub font_size_header: f64,
    pub font_size_weekday: f64,
    pub font_size_day: f64,
    pub font_size_legend: f64,
    pub color_holiday: Rgb,
    pub color_normal: Rgb,
    pub color_grid: Rgb,
    pub block_w: f64,
    pub block_h: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings::derive(RenderSettings {
            render_style: RenderStyle::Grid,
            week_starts_on: WeekStart::Sunday,
            start_x: 60.0,
            start_y: 780.0,
            cell_w: 75.0,
            cell_h: 55.0,
            header_h: 40.0,
            legend_h: 60.0,
            month_cols: 2,
            month_gap_x: 50.0,
            month_gap_y: 70.0,
            font_name: "ArialMT".to_owned(),
            font_size_header: 28.0,
            font_size_weekday: 14.0,
            font_size_day: 16.0,
            font_size_legend: 12.0,
            color_holiday: Rgb::HOLIDAY,
            color_normal: Rgb::NORMAL,
            color_grid: Rgb::GRID,
            block_w: 0.0,
            block_h: 0.0,
        })
    }
}

impl RenderSettings {
    pub const WEEKDAY_GAP: f64 = 18.0;
    pub const LEGEND_GAP: f64 = 18.0;
    pub const BLOCK_PADDING: f64 = 10.0;

    fn derive(mut self) -> Self {
        self.block_w = self.cell_w * 7.0;
        self.block_h = (self.header_h + Self::WEEKDAY_GAP)
            + self.cell_h * 6.0
            + Self::LEGEND_GAP
            + self.legend_h
            + Self::BLOCK_PADDING;
        self
    }

    pub fn draws_grid(&self) -> bool {
        self.render_style == RenderStyle::Grid
    }

    /// Maximum characters per legend line.
    pub fn legend_max_chars(&self) -> usize {
        let by_width = (self.block_w / 8.0).floor();
        if by_width > 30.0 {
            by_width as usize
        } else {
            30
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_and_derived_block() {
        let s = RenderSettings::default();
        assert_eq!(s.block_w, 525.0);
        assert_eq!(s.block_h, 58.0 + 330.0 + 18.0 + 60.0 + 10.0);
        assert_eq!(s.legend_max_chars(), 65);
        assert!(s.draws_grid());
        assert_eq!(RawSettings::default().normalize(), s);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let raw: RawSettings = serde_json::from_value(json!({
            "renderStyle": "",
            "cellW": "wide",
            "cellH": null,
            "startX": "100",
            "headerH": true,
            "monthCols": 0,
            "fontName": 12,
            "colorHoliday": [255, "x", null],
            "colorGrid": "gray"
        }))
        .unwrap();
        let s = raw.normalize();
        let d = RenderSettings::default();

        assert_eq!(s.render_style, RenderStyle::Grid);
        assert_eq!(s.cell_w, d.cell_w);
        assert_eq!(s.cell_h, d.cell_h);
        assert_eq!(s.start_x, 100.0);
        assert_eq!(s.header_h, d.header_h);
        assert_eq!(s.month_cols, 1);
        assert_eq!(s.font_name, "ArialMT");
        assert_eq!(s.color_holiday, Rgb::new(255.0, 20.0, 60.0));
        assert_eq!(s.color_grid, Rgb::GRID);
        assert!(s.block_w.is_finite() && s.block_h.is_finite());
    }

    #[test]
    fn huge_values_keep_geometry_finite() {
        let raw = RawSettings::from_json(
            r#"{"cellW":1e308,"cellH":-1e308,"headerH":"1e300","startX":1e307,"monthGapY":1e308}"#,
        )
        .unwrap();
        let s = raw.normalize();

        assert_eq!(s.cell_w, MAX_MAGNITUDE);
        assert_eq!(s.cell_h, -MAX_MAGNITUDE);
        assert_eq!(s.header_h, MAX_MAGNITUDE);
        assert_eq!(s.block_w, 7.0 * MAX_MAGNITUDE);
        assert!(s.block_h.is_finite());
        assert!(s.start_x.is_finite() && s.month_gap_y.is_finite());
    }

    #[test]
    fn style_and_week_start() {
        let raw = RawSettings::from_json(r#"{"renderStyle":"nogrid","weekStartsOn":1}"#).unwrap();
        let s = raw.normalize();
        assert_eq!(s.render_style, RenderStyle::NoGrid);
        assert_eq!(s.week_starts_on, WeekStart::Monday);

        let raw = RawSettings::from_json(r#"{"renderStyle":"dots","weekStartsOn":2}"#).unwrap();
        let s = raw.normalize();
        assert_eq!(s.render_style, RenderStyle::Grid);
        assert_eq!(s.week_starts_on, WeekStart::Sunday);
    }

    #[test]
    fn merge_prefers_overriding_fields() {
        let base = RawSettings::from_json(r#"{"cellW":80,"cellH":60}"#).unwrap();
        let over = RawSettings::from_json(r#"{"cellW":90}"#).unwrap();
        let s = base.merge(over).normalize();
        assert_eq!(s.cell_w, 90.0);
        assert_eq!(s.cell_h, 60.0);
        assert_eq!(s.block_w, 630.0);
    }

    #[test]
    fn empty_payload_is_default() {
        assert_eq!(RawSettings::from_json("  ").unwrap(), RawSettings::default());
        assert!(RawSettings::from_json("{oops").is_err());
    }

    #[test]
    fn hex_colors_are_clamped() {
        assert_eq!(Rgb::HOLIDAY.to_hex(), "#dc143c");
        assert_eq!(Rgb::new(300.0, -4.0, 15.6).to_hex(), "#ff0010");
    }
}
