use itertools::Itertools;
use serde::Serialize;

use crate::date;
use crate::holiday::HolidayIndex;
use crate::layout::{MonthLayout, CELL_INSET};
use crate::settings::{RenderSettings, Rgb};

pub type TextId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Justification {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: String,
    pub size: f64,
    pub color: Rgb,
    pub justification: Justification,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
}

/// One drawing instruction. `TextId`s number the `AddText` commands of a
/// command list in emission order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum DrawCmd {
    AddLayer {
        name: String,
    },
    AddText {
        id: TextId,
        contents: String,
        left: f64,
        top: f64,
    },
    StyleText {
        id: TextId,
        style: TextStyle,
    },
    CenterText {
        id: TextId,
        center_x: f64,
    },
    AddRect {
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        stroke: Stroke,
    },
}

pub const LEGEND_SEPARATOR: &str = "; ";
pub const LABEL_SEPARATOR: &str = " / ";

/// Greedily packs entries into lines joined by `"; "`. A line only exceeds
/// `max_chars` when a single entry does.
pub fn wrap_legend<S: AsRef<str>>(entries: &[S], max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for entry in entries.iter().map(AsRef::as_ref) {
        if line.is_empty() {
            line.push_str(entry);
            continue;
        }

        let candidate_len =
            line.chars().count() + LEGEND_SEPARATOR.chars().count() + entry.chars().count();
        if candidate_len <= max_chars {
            line.push_str(LEGEND_SEPARATOR);
            line.push_str(entry);
        } else {
            lines.push(std::mem::replace(&mut line, entry.to_owned()));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

pub fn layer_name(year: i32, month0: u32) -> String {
    format!("{:02} {} {}", month0 + 1, date::month_name(month0), year)
}

struct Emitter<'a> {
    settings: &'a RenderSettings,
    cmds: Vec<DrawCmd>,
    next_id: TextId,
}

impl<'a> Emitter<'a> {
    fn new(settings: &'a RenderSettings) -> Self {
        Emitter {
            settings,
            cmds: Vec::new(),
            next_id: 0,
        }
    }

    fn style(&self, size: f64, color: Rgb, justification: Justification) -> TextStyle {
        TextStyle {
            font: self.settings.font_name.clone(),
            size,
            color,
            justification,
        }
    }

    fn text(&mut self, contents: String, left: f64, top: f64, style: TextStyle) -> TextId {
        let id = self.next_id;
        self.next_id += 1;

        self.cmds.push(DrawCmd::AddText {
            id,
            contents,
            left,
            top,
        });
        self.cmds.push(DrawCmd::StyleText { id, style });
        id
    }

    /// Text whose horizontal center ends up on `center_x` once its width is known.
    fn centered_text(&mut self, contents: String, center_x: f64, top: f64, style: TextStyle) {
        let id = self.text(contents, 0.0, top, style);
        self.cmds.push(DrawCmd::CenterText { id, center_x });
    }

    fn month(&mut self, layout: &MonthLayout, holidays: &HolidayIndex) {
        let s = self.settings;
        let (year, month0) = (layout.year(), layout.month0());
        let origin = layout.origin();

        self.cmds.push(DrawCmd::AddLayer {
            name: layer_name(year, month0),
        });

        let title = self.style(s.font_size_header, s.color_normal, Justification::Left);
        self.text(
            format!("{} {}", date::month_name(month0), year),
            origin.x,
            origin.y,
            title,
        );

        for (col, label) in (0u32..).zip(s.week_starts_on.weekday_labels().iter()) {
            let color = if layout.is_sunday_column(col) {
                s.color_holiday
            } else {
                s.color_normal
            };

            if s.draws_grid() {
                let style = self.style(s.font_size_weekday, color, Justification::Left);
                self.text(
                    label.to_string(),
                    layout.column_left(col) + CELL_INSET,
                    layout.week_top(),
                    style,
                );
            } else {
                let style = self.style(s.font_size_weekday, color, Justification::Center);
                self.centered_text(
                    label.to_string(),
                    layout.column_center(col),
                    layout.week_top(),
                    style,
                );
            }
        }

        if s.draws_grid() {
            let stroke = Stroke {
                color: s.color_grid,
                width: 1.0,
            };
            let rects = layout.cells().map(|cell| DrawCmd::AddRect {
                top: cell.top,
                left: cell.left,
                width: cell.width,
                height: cell.height,
                stroke,
            });
            self.cmds.extend(rects);
        }

        let mut legend_entries = Vec::new();

        for slot in layout.day_slots() {
            let labels = holidays.on_day(year, month0, slot.day);
            let color = if labels.is_some() || layout.is_sunday_column(slot.col) {
                s.color_holiday
            } else {
                s.color_normal
            };

            if s.draws_grid() {
                let style = self.style(s.font_size_day, color, Justification::Left);
                self.text(
                    slot.day.to_string(),
                    layout.column_left(slot.col) + CELL_INSET,
                    layout.row_top(slot.row) - CELL_INSET,
                    style,
                );
            } else {
                let style = self.style(s.font_size_day, color, Justification::Center);
                self.centered_text(
                    slot.day.to_string(),
                    layout.column_center(slot.col),
                    layout.row_center(slot.row) + s.font_size_day / 2.0,
                    style,
                );
            }

            if let Some(labels) = labels {
                let iso = date::format_date(year, month0 + 1, slot.day);
                legend_entries.push(date::format_legend_short(
                    &iso,
                    &labels.iter().join(LABEL_SEPARATOR),
                ));
            }
        }

        let lines = wrap_legend(&legend_entries, s.legend_max_chars());
        if !lines.is_empty() {
            let style = self.style(s.font_size_legend, s.color_holiday, Justification::Left);
            self.text(lines.join("\n"), origin.x, layout.legend_top(), style);
        }
    }
}

/// Draw commands for a single month, with text ids starting at 0.
pub fn render_month(
    year: i32,
    month0: u32,
    holidays: &HolidayIndex,
    settings: &RenderSettings,
) -> Vec<DrawCmd> {
    let mut emitter = Emitter::new(settings);
    emitter.month(&MonthLayout::new(settings, year, month0), holidays);
    emitter.cmds
}

/// Draw commands for all twelve months of `year`.
pub fn render_year(year: i32, holidays: &HolidayIndex, settings: &RenderSettings) -> Vec<DrawCmd> {
    let mut emitter = Emitter::new(settings);

    for month0 in 0..12 {
        emitter.month(&MonthLayout::new(settings, year, month0), holidays);
    }

    log::debug!(
        "Rendered {} commands for {} ({} styled texts)",
        emitter.cmds.len(),
        year,
        emitter.next_id
    );

    emitter.cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::HolidayRecord;
    use crate::settings::RawSettings;

    /// Color of the day-number text `day` in a month's command list.
    fn day_color(cmds: &[DrawCmd], day: u32) -> Rgb {
        let id = cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::AddText { id, contents, .. } if contents == &day.to_string() => Some(*id),
                _ => None,
            })
            .next()
            .unwrap();

        cmds.iter()
            .find_map(|cmd| match cmd {
                DrawCmd::StyleText { id: sid, style } if *sid == id => Some(style.color),
                _ => None,
            })
            .unwrap()
    }

    fn legend(cmds: &[DrawCmd], settings: &RenderSettings) -> Option<String> {
        let legend_id = cmds.iter().rev().find_map(|cmd| match cmd {
            DrawCmd::StyleText { id, style } if style.size == settings.font_size_legend => Some(*id),
            _ => None,
        })?;
        cmds.iter().find_map(|cmd| match cmd {
            DrawCmd::AddText { id, contents, .. } if *id == legend_id => Some(contents.clone()),
            _ => None,
        })
    }

    #[test]
    fn wrap_short_legend_stays_on_one_line() {
        let lines = wrap_legend(&["Jan 1 - New Year", "Jan 2 - Other"], 65);
        assert_eq!(lines, vec!["Jan 1 - New Year; Jan 2 - Other".to_owned()]);
        assert!(wrap_legend::<&str>(&[], 30).is_empty());
    }

    #[test]
    fn wrap_long_legend_splits_lines() {
        let entries = vec![
            "Apr 3 - Good Friday",
            "Apr 5 - Easter Sunday",
            "Apr 6 - Easter Monday",
            "Apr 27 - King's Day (a very long national holiday name)",
        ];
        let lines = wrap_legend(&entries, 30);

        assert!(lines.len() > 1);
        for line in &lines {
            let single_entry = entries.contains(&line.as_str());
            assert!(line.chars().count() <= 30 || single_entry, "{}", line);
        }
        assert_eq!(lines.join(LEGEND_SEPARATOR), entries.join(LEGEND_SEPARATOR));
    }

    #[test]
    fn new_year_2024_is_colored_and_listed() {
        let settings = RenderSettings::default();
        let records = vec![HolidayRecord::new(
            "2024-01-01",
            "New Year's Day",
            "New Year's Day",
        )];
        let index = HolidayIndex::build(&records);
        let cmds = render_month(2024, 0, &index, &settings);

        assert_eq!(
            cmds[0],
            DrawCmd::AddLayer {
                name: "01 January 2024".to_owned()
            }
        );
        assert_eq!(day_color(&cmds, 1), settings.color_holiday);
        assert_eq!(day_color(&cmds, 2), settings.color_normal);

        // Jan 1st 2024 is a Monday: column 1 of the first row
        let day_one = cmds
            .iter()
            .find_map(|cmd| match cmd {
                DrawCmd::AddText {
                    contents, left, top, ..
                } if contents == "1" => Some((*left, *top)),
                _ => None,
            })
            .unwrap();
        assert_eq!(day_one, (60.0 + 75.0 + 6.0, 722.0 - 6.0));

        let legend = legend(&cmds, &settings).unwrap();
        assert!(legend.contains("Jan 1 - New Year's Day"));
    }

    #[test]
    fn sundays_are_holiday_colored_but_not_listed() {
        let settings = RenderSettings::default();
        let cmds = render_month(2024, 0, &HolidayIndex::default(), &settings);

        // Sundays of January 2024: 7, 14, 21, 28
        for day in &[7, 14, 21, 28] {
            assert_eq!(day_color(&cmds, *day), settings.color_holiday);
        }
        assert_eq!(day_color(&cmds, 6), settings.color_normal);
        assert_eq!(legend(&cmds, &settings), None);
    }

    #[test]
    fn monday_week_start_moves_sunday_column() {
        let settings = RawSettings::from_json(r#"{"weekStartsOn":1}"#)
            .unwrap()
            .normalize();
        let cmds = render_month(2024, 0, &HolidayIndex::default(), &settings);

        assert_eq!(day_color(&cmds, 7), settings.color_holiday);
        assert_eq!(day_color(&cmds, 1), settings.color_normal);

        let sunday_header = cmds.iter().find_map(|cmd| match cmd {
            DrawCmd::AddText { id, contents, .. } if contents == "Sun" => Some(*id),
            _ => None,
        });
        let header_color = cmds.iter().find_map(|cmd| match cmd {
            DrawCmd::StyleText { id, style } if Some(*id) == sunday_header => Some(style.color),
            _ => None,
        });
        assert_eq!(header_color, Some(settings.color_holiday));
    }

    #[test]
    fn grid_style_draws_42_rectangles() {
        let settings = RenderSettings::default();
        let cmds = render_month(2024, 1, &HolidayIndex::default(), &settings);
        let rects = cmds
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::AddRect { .. }))
            .count();
        assert_eq!(rects, 42);
        assert!(!cmds
            .iter()
            .any(|cmd| matches!(cmd, DrawCmd::CenterText { .. })));
    }

    #[test]
    fn nogrid_style_centers_headers_and_days() {
        let settings = RawSettings::from_json(r#"{"renderStyle":"nogrid"}"#)
            .unwrap()
            .normalize();
        let cmds = render_month(2024, 1, &HolidayIndex::default(), &settings);

        assert!(!cmds.iter().any(|cmd| matches!(cmd, DrawCmd::AddRect { .. })));
        let centered = cmds
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::CenterText { .. }))
            .count();
        assert_eq!(centered, 7 + 29);

        // Feb 1st 2024 is a Thursday
        let first = cmds.iter().find_map(|cmd| match cmd {
            DrawCmd::AddText { id, contents, top, .. } if contents == "1" => Some((*id, *top)),
            _ => None,
        });
        let (id, top) = first.unwrap();
        assert_eq!(top, 722.0 - 27.5 + 8.0);
        assert!(cmds.contains(&DrawCmd::CenterText {
            id,
            // February sits in the second column of blocks
            center_x: 60.0 + 525.0 + 50.0 + 4.0 * 75.0 + 37.5
        }));
    }

    #[test]
    fn shared_dates_list_all_labels() {
        let settings = RenderSettings::default();
        let records = vec![
            HolidayRecord::new("2024-05-09", "Kenaikan Isa Almasih", "Ascension Day"),
            HolidayRecord::new("2024-05-09", "Hari Raya", ""),
        ];
        let cmds = render_month(2024, 4, &HolidayIndex::build(&records), &settings);
        assert_eq!(
            legend(&cmds, &settings).unwrap(),
            "May 9 - Kenaikan Isa Almasih (Ascension Day) / Hari Raya"
        );
    }

    #[test]
    fn year_has_twelve_layers_with_unique_text_ids() {
        let settings = RenderSettings::default();
        let cmds = render_year(2024, &HolidayIndex::default(), &settings);
        let layers: Vec<&DrawCmd> = cmds
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::AddLayer { .. }))
            .collect();
        assert_eq!(layers.len(), 12);

        let ids: Vec<TextId> = cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::AddText { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
    }
}
