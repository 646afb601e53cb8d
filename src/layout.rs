use serde::Serialize;

use crate::date;
use crate::settings::RenderSettings;

pub const COLUMNS: u32 = 7;
pub const ROWS: u32 = 6;

/// Offset of weekday labels and day numbers from a cell's left edge.
pub const CELL_INSET: f64 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Rectangle anchored at its top-left corner; `y` grows upwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DaySlot {
    pub day: u32,
    pub row: u32,
    pub col: u32,
}

/// Geometry of one month block. Cheap to build and only valid for the
/// settings it was built from.
#[derive(Clone, Debug)]
pub struct MonthLayout<'a> {
    settings: &'a RenderSettings,
    year: i32,
    month0: u32,
    origin: Point,
    first_offset: u32,
    days: u32,
}

pub fn block_origin(settings: &RenderSettings, month0: u32) -> Point {
    let col = month0 % settings.month_cols;
    let row = month0 / settings.month_cols;

    Point {
        x: settings.start_x + col as f64 * (settings.block_w + settings.month_gap_x),
        y: settings.start_y - row as f64 * (settings.block_h + settings.month_gap_y),
    }
}

/// Column of the first day of the month, re-based on the configured week start.
pub fn first_day_offset(year: i32, month0: u32, settings: &RenderSettings) -> u32 {
    settings
        .week_starts_on
        .column_of(date::day_of_week(year, month0, 1))
}

impl<'a> MonthLayout<'a> {
    pub fn new(settings: &'a RenderSettings, year: i32, month0: u32) -> Self {
        MonthLayout {
            settings,
            year,
            month0,
            origin: block_origin(settings, month0),
            first_offset: first_day_offset(year, month0, settings),
            days: date::days_in_month(year, month0),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn days_in_month(&self) -> u32 {
        self.days
    }

    pub fn week_top(&self) -> f64 {
        self.origin.y - self.settings.header_h
    }

    pub fn grid_top(&self) -> f64 {
        self.week_top() - RenderSettings::WEEKDAY_GAP
    }

    pub fn legend_top(&self) -> f64 {
        self.grid_top() - ROWS as f64 * self.settings.cell_h - RenderSettings::LEGEND_GAP
    }

    pub fn column_left(&self, col: u32) -> f64 {
        self.origin.x + col as f64 * self.settings.cell_w
    }

    pub fn column_center(&self, col: u32) -> f64 {
        self.column_left(col) + self.settings.cell_w / 2.0
    }

    pub fn row_top(&self, row: u32) -> f64 {
        self.grid_top() - row as f64 * self.settings.cell_h
    }

    pub fn row_center(&self, row: u32) -> f64 {
        self.row_top(row) - self.settings.cell_h / 2.0
    }

    pub fn cell_rect(&self, row: u32, col: u32) -> Rect {
        Rect {
            top: self.row_top(row),
            left: self.column_left(col),
            width: self.settings.cell_w,
            height: self.settings.cell_h,
        }
    }

    /// All 42 cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..ROWS).flat_map(move |row| (0..COLUMNS).map(move |col| self.cell_rect(row, col)))
    }

    pub fn day_slot(&self, day: u32) -> DaySlot {
        let pos = self.first_offset + (day - 1);
        DaySlot {
            day,
            row: pos / COLUMNS,
            col: pos % COLUMNS,
        }
    }

    pub fn day_slots(&self) -> impl Iterator<Item = DaySlot> + '_ {
        (1..=self.days).map(move |day| self.day_slot(day))
    }

    pub fn is_sunday_column(&self, col: u32) -> bool {
        col == self.settings.week_starts_on.sunday_column()
    }
}
