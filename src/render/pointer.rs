// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer-to-offset resolution for keyword placement.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Maps a pointer position over the rendered document to a caret offset in `text`.
///
/// Returns `None` when the pointer is too far from any caret slot to be a meaningful drop target.
pub trait PointerResolver {
    fn resolve(&self, text: &str, point: Point) -> Option<usize>;
}

/// Resolver for documents laid out on a monospace cell grid, one text line per row.
///
/// The caret slot before character `i` sits at the top-left corner of that character's cell; the
/// slot after the last character of a line sits just past it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridResolver {
    /// Top-left corner of the document.
    pub origin: Point,
    pub cell_width: f64,
    pub cell_height: f64,
    /// How far outside the document bounds a pointer may stray horizontally.
    pub margin_x: f64,
    pub margin_y: f64,
    /// Slots at or beyond this distance are not considered.
    pub radius: f64,
}

impl Default for GridResolver {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            cell_width: 1.0,
            cell_height: 1.0,
            margin_x: 50.0,
            margin_y: 20.0,
            radius: 100.0,
        }
    }
}

impl GridResolver {
    pub fn with_cell_size(mut self, width: f64, height: f64) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    fn slot(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.origin.x + col as f64 * self.cell_width,
            self.origin.y + row as f64 * self.cell_height,
        )
    }

    fn within_bounds(&self, text: &str, point: Point) -> bool {
        let rows = text.split('\n').count();
        let cols = text
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let right = self.origin.x + cols as f64 * self.cell_width;
        let bottom = self.origin.y + rows as f64 * self.cell_height;

        point.x >= self.origin.x - self.margin_x
            && point.x <= right + self.margin_x
            && point.y >= self.origin.y - self.margin_y
            && point.y <= bottom + self.margin_y
    }
}

impl PointerResolver for GridResolver {
    fn resolve(&self, text: &str, point: Point) -> Option<usize> {
        if !self.within_bounds(text, point) {
            return None;
        }

        let (mut row, mut col) = (0usize, 0usize);
        let mut nearest = 0usize;
        let mut best = self.slot(0, 0).distance(point);

        for (index, ch) in text.chars().enumerate() {
            if ch == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
            let distance = self.slot(row, col).distance(point);
            if distance < best {
                best = distance;
                nearest = index + 1;
            }
        }

        (best < self.radius).then_some(nearest)
    }
}
