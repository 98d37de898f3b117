//! Trend line through every task's progress point
//!
//! Drawn once, after the last row. Points are visited in task order. A
//! run of consecutive points on the same page becomes one polyline on that
//! page; the step from the last point of one page to the first point of the
//! next is not drawn, since the two ends sit on different sheets.

use prjchart_core::{Point, Surface};
use tracing::debug;

use crate::config::ChartConfig;
use crate::progress::ProgressPoints;

/// One page's share of the trend line
#[derive(Clone, Debug, PartialEq)]
pub struct TrendSegment {
    pub page: usize,
    pub points: Vec<Point>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TrendLineRenderer;

impl TrendLineRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Split the recorded points into per-page runs
    pub fn segments(&self, points: &ProgressPoints) -> Vec<TrendSegment> {
        let mut segments: Vec<TrendSegment> = Vec::new();
        for (_, recorded) in points.recorded() {
            match segments.last_mut() {
                Some(segment) if segment.page == recorded.page => segment.points.push(recorded.point),
                _ => segments.push(TrendSegment {
                    page: recorded.page,
                    points: vec![recorded.point],
                }),
            }
        }
        segments
    }

    /// Stroke every segment with two or more points on its own page, then
    /// return to the page that was current before.
    pub fn draw(&self, surface: &mut dyn Surface, points: &ProgressPoints, config: &ChartConfig) {
        let resume_page = surface.current_page();
        let segments = self.segments(points);
        let mut drawn = 0;

        for segment in segments.iter().filter(|s| s.points.len() >= 2) {
            surface.go_to_page(segment.page);
            surface.set_stroke_color(config.theme.trend);
            surface.set_dash(None);
            surface.stroke_polyline(&segment.points);
            drawn += 1;
        }

        surface.go_to_page(resume_page);
        debug!(segments = segments.len(), drawn, "trend line drawn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressPoint;
    use crate::recording::{DrawOp, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn at(page: usize, x: f64, y: f64) -> ProgressPoint {
        ProgressPoint {
            page,
            point: Point::new(x, y),
        }
    }

    #[test]
    fn splits_runs_at_page_changes() {
        let mut points = ProgressPoints::with_capacity(5);
        points.record(0, at(0, 10.0, 10.0));
        points.record(1, at(0, 20.0, 20.0));
        // task 2 never drew a row
        points.record(3, at(1, 30.0, 5.0));
        points.record(4, at(1, 40.0, 15.0));

        let segments = TrendLineRenderer::new().segments(&points);
        assert_eq!(
            segments,
            vec![
                TrendSegment {
                    page: 0,
                    points: vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)],
                },
                TrendSegment {
                    page: 1,
                    points: vec![Point::new(30.0, 5.0), Point::new(40.0, 15.0)],
                },
            ]
        );
    }

    #[test]
    fn draws_each_segment_on_its_page() {
        let config = ChartConfig::default();
        let mut surface = RecordingSurface::new(config.bounds());
        surface.start_new_page();
        surface.start_new_page();

        let mut points = ProgressPoints::with_capacity(4);
        points.record(0, at(0, 1.0, 1.0));
        points.record(1, at(0, 2.0, 2.0));
        points.record(2, at(1, 3.0, 3.0));
        points.record(3, at(2, 4.0, 4.0));

        TrendLineRenderer::new().draw(&mut surface, &points, &config);

        let polylines: Vec<_> = surface
            .ops()
            .iter()
            .filter_map(|r| match &r.op {
                DrawOp::Polyline(p) => Some((r.page, p.len())),
                _ => None,
            })
            .collect();
        // Single-point runs on pages 1 and 2 draw nothing
        assert_eq!(polylines, vec![(0, 2)]);
        assert_eq!(surface.current_page(), 2);
    }

    #[test]
    fn nothing_recorded_draws_nothing() {
        let config = ChartConfig::default();
        let mut surface = RecordingSurface::new(config.bounds());
        TrendLineRenderer::new().draw(&mut surface, &ProgressPoints::default(), &config);
        assert!(surface.ops().is_empty());
    }
}
