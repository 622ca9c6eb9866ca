//! Terminal rendering of a settled analysis.
//!
//! Three interchangeable views share one immutable [`SettledAnalysis`]; the
//! selected [`ViewMode`] is the presenter's only state.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::analysis::{SettledAnalysis, Skill};

const GAUGE_RADIUS: f64 = 80.0;
const RING_SEGMENTS: usize = 24;
const RING_ROWS: f64 = 4.0;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Number,
    Chart,
    Bars,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Number, ViewMode::Chart, ViewMode::Bars];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Number => "Number",
            ViewMode::Chart => "Circular",
            ViewMode::Bars => "Bars",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewMode::Number => "number",
            ViewMode::Chart => "chart",
            ViewMode::Bars => "bars",
        };
        f.write_str(name)
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" | "numeric" => Ok(ViewMode::Number),
            "chart" | "circular" | "circle" => Ok(ViewMode::Chart),
            "bars" | "bar" => Ok(ViewMode::Bars),
            other => Err(format!("unknown view mode '{other}' (expected number, chart or bars)")),
        }
    }
}

/// Stroke geometry of the circular gauge: a ring of radius 80 whose dash
/// offset hides the part of the circumference above the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl GaugeGeometry {
    pub fn for_score(score: u8) -> Self {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        Self {
            radius: GAUGE_RADIUS,
            circumference,
            dash_offset: circumference - circumference * f64::from(score) / 100.0,
        }
    }

    /// Fraction of the ring that is drawn, in [0, 1].
    pub fn filled_fraction(&self) -> f64 {
        1.0 - self.dash_offset / self.circumference
    }
}

pub struct Presenter {
    analysis: SettledAnalysis,
    mode: ViewMode,
}

impl Presenter {
    pub fn new(analysis: SettledAnalysis) -> Self {
        Self {
            analysis,
            mode: ViewMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn select(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn analysis(&self) -> &SettledAnalysis {
        &self.analysis
    }

    pub fn geometry(&self) -> GaugeGeometry {
        GaugeGeometry::for_score(self.analysis.score)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Analysis result\n");
        out.push_str(&self.render_toggle());
        out.push('\n');

        match self.mode {
            ViewMode::Number => out.push_str(&self.render_number()),
            ViewMode::Chart => out.push_str(&self.render_chart()),
            ViewMode::Bars => out.push_str(&self.render_bars()),
        }

        let result = &self.analysis.result;
        out.push_str(&render_skills("Matching skills", &result.matching_skills));
        out.push_str(&render_skills("Skills to improve", &result.missing_skills));
        if !result.extra_skills.is_empty() {
            out.push_str(&render_skills("Extra skills", &result.extra_skills));
        }
        out
    }

    fn render_toggle(&self) -> String {
        let labels: Vec<String> = ViewMode::ALL
            .iter()
            .map(|mode| {
                if *mode == self.mode {
                    format!("[{}]", mode.label())
                } else {
                    format!(" {} ", mode.label())
                }
            })
            .collect();
        format!("{}\n", labels.join(" "))
    }

    fn render_number(&self) -> String {
        format!("  {}%\n  Compatibility\n", self.analysis.score)
    }

    fn render_chart(&self) -> String {
        let filled = (self.geometry().filled_fraction() * RING_SEGMENTS as f64).round() as usize;
        let rows = (2.0 * RING_ROWS) as usize + 1;
        let cols = (4.0 * RING_ROWS) as usize + 1;
        let mut grid = vec![vec![' '; cols]; rows];

        // Clockwise from twelve o'clock; columns are doubled for terminal cell aspect.
        for segment in 0..RING_SEGMENTS {
            let angle = 2.0 * PI * segment as f64 / RING_SEGMENTS as f64;
            let x = (2.0 * RING_ROWS + 2.0 * RING_ROWS * angle.sin()).round() as usize;
            let y = (RING_ROWS - RING_ROWS * angle.cos()).round() as usize;
            grid[y][x] = if segment < filled { '●' } else { '○' };
        }

        let label: Vec<char> = format!("{}%", self.analysis.score).chars().collect();
        let start = (cols - label.len()) / 2;
        for (i, c) in label.into_iter().enumerate() {
            grid[RING_ROWS as usize][start + i] = c;
        }

        let mut out = String::new();
        for row in grid {
            let line: String = row.into_iter().collect();
            out.push_str("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    fn render_bars(&self) -> String {
        let result = &self.analysis.result;
        let score = self.analysis.score as usize;
        let entries = [
            ("Match", result.match_count(), ""),
            ("Gap", result.gap_count(), ""),
            ("Score", score, "%"),
        ];
        let max = entries.iter().map(|(_, v, _)| *v).max().unwrap_or(0);

        let mut out = String::new();
        for (label, value, unit) in entries {
            let len = bar_length(value, max);
            out.push_str(&format!(
                "  {:<6}{}{} {}{}\n",
                label,
                "█".repeat(len),
                "░".repeat(BAR_WIDTH - len),
                value,
                unit
            ));
        }
        out
    }
}

fn bar_length(value: usize, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    (value * BAR_WIDTH + max / 2) / max
}

fn render_skills(title: &str, skills: &[Skill]) -> String {
    let mut out = format!("\n{title}\n");
    if skills.is_empty() {
        out.push_str("  (none)\n");
    }
    for skill in skills {
        out.push_str(&format!("  • {}\n", skill.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisHandle, AnalysisResult};

    fn settled(matches: &[&str], gaps: &[&str], extra: &[&str]) -> SettledAnalysis {
        let skills = |names: &[&str]| -> Vec<Skill> { names.iter().map(|n| Skill::new(*n)).collect() };
        let result = AnalysisResult {
            matching_skills: skills(matches),
            missing_skills: skills(gaps),
            extra_skills: skills(extra),
        };
        SettledAnalysis::new(AnalysisHandle { id: 7 }, result, 3)
    }

    #[test]
    fn test_number_view_shows_percentage() {
        let presenter = Presenter::new(settled(&["Java"], &["SQL"], &[]));
        let out = presenter.render();

        assert!(out.lines().any(|l| l.trim() == "50%"));
        assert!(out.contains("[Number]"));
        assert!(out.contains("  • Java\n"));
        assert!(out.contains("Skills to improve\n  • SQL\n"));
        assert!(!out.contains("Extra skills"));
    }

    #[test]
    fn test_switching_modes_keeps_data() {
        let mut presenter = Presenter::new(settled(&["Java", "Git", "Spring"], &["SQL"], &["Docker"]));

        for mode in ViewMode::ALL {
            presenter.select(mode);
            let out = presenter.render();
            assert_eq!(presenter.mode(), mode);
            assert!(out.contains(&format!("[{}]", mode.label())));
            assert!(out.contains("75%"));
            assert!(out.contains("Extra skills\n  • Docker\n"));
        }
        assert_eq!(presenter.analysis().score, 75);
    }

    #[test]
    fn test_chart_fills_segments_by_score() {
        let count = |score_matches: &[&str], gaps: &[&str]| {
            let out = Presenter::new(settled(score_matches, gaps, &[]))
                .with_mode(ViewMode::Chart)
                .render();
            (out.matches('●').count(), out.matches('○').count())
        };

        assert_eq!(count(&["a"], &["b"]), (12, 12));
        assert_eq!(count(&["a", "b", "c"], &["d"]), (18, 6));
        assert_eq!(count(&[], &["d"]), (0, 24));
        assert_eq!(count(&["a"], &[]), (24, 0));
    }

    #[test]
    fn test_gauge_geometry() {
        let half = GaugeGeometry::for_score(50);
        assert!((half.circumference - 2.0 * PI * 80.0).abs() < 1e-9);
        assert!((half.dash_offset - half.circumference / 2.0).abs() < 1e-9);
        assert!((half.filled_fraction() - 0.5).abs() < 1e-9);

        assert!((GaugeGeometry::for_score(100).dash_offset).abs() < 1e-9);
        assert!((GaugeGeometry::for_score(0).dash_offset - half.circumference).abs() < 1e-9);
    }

    #[test]
    fn test_bars_scale_to_largest_value() {
        let out = Presenter::new(settled(&["Java"], &["SQL"], &[]))
            .with_mode(ViewMode::Bars)
            .render();

        // max(1, 1, 50) = 50: one skill is about a thirtieth of a bar wide.
        let score_line = out.lines().find(|l| l.trim_start().starts_with("Score")).unwrap();
        assert_eq!(score_line.matches('█').count(), BAR_WIDTH);
        let match_line = out.lines().find(|l| l.trim_start().starts_with("Match")).unwrap();
        assert_eq!(match_line.matches('█').count(), 1);
        assert!(match_line.ends_with(" 1"));
    }

    #[test]
    fn test_view_mode_parsing() {
        assert_eq!("chart".parse::<ViewMode>().unwrap(), ViewMode::Chart);
        assert_eq!("Circular".parse::<ViewMode>().unwrap(), ViewMode::Chart);
        assert_eq!("bars".parse::<ViewMode>().unwrap(), ViewMode::Bars);
        assert_eq!(ViewMode::Number.to_string(), "number");
        assert!("pie".parse::<ViewMode>().is_err());
    }
}
