use std::fmt;

/// One named line of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push((x, y));
    }

    /// Mean of the y values, 0 for an empty series
    pub fn mean(&self) -> f64 {
        if self.points.is_empty() {
            0f64
        } else {
            self.points.iter().map(|(_, y)| y).sum::<f64>() / self.points.len() as f64
        }
    }
}

/// Aggregated samples of one experiment, ready to be plotted
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: Vec<Series>,
    /// Time spent in the measured sections
    pub total_seconds: f64,
}

impl fmt::Display for ChartData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "x: {}, y: {}", self.x_axis, self.y_axis)?;
        for s in &self.series {
            write!(f, "{}:", s.name)?;
            for (x, y) in &s.points {
                write!(f, " ({x}, {y:.3})")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "total: {:.3}s", self.total_seconds)
    }
}
