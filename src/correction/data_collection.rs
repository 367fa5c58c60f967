use std::collections::BTreeMap;
use std::fmt;

/// Error source name that sums all registered sources in quadrature.
pub const TOTAL: &str = "total";

/// One measured point with any number of named, asymmetric y uncertainties.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Datapoint {
    x: f64,
    y: f64,
    dx: f64,
    lower_errors: BTreeMap<String, f64>,
    upper_errors: BTreeMap<String, f64>,
}

impl Datapoint {
    pub fn new(x: f64, y: f64, dx: f64) -> Self {
        Self {
            x,
            y,
            dx,
            lower_errors: BTreeMap::new(),
            upper_errors: BTreeMap::new(),
        }
    }

    pub fn add_error_source(&mut self, name: &str, lower: f64, upper: f64) {
        self.lower_errors.insert(name.to_owned(), lower);
        self.upper_errors.insert(name.to_owned(), upper);
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Unknown sources count as zero.
    pub fn lower_error(&self, source: &str) -> f64 {
        if source == TOTAL {
            return self.total_lower_error();
        }
        self.lower_errors.get(source).copied().unwrap_or(0.0)
    }

    pub fn upper_error(&self, source: &str) -> f64 {
        if source == TOTAL {
            return self.total_upper_error();
        }
        self.upper_errors.get(source).copied().unwrap_or(0.0)
    }

    pub fn lower_limit(&self, source: &str) -> f64 {
        self.y - self.lower_error(source)
    }

    pub fn upper_limit(&self, source: &str) -> f64 {
        self.y + self.upper_error(source)
    }

    pub fn relative_lower_error(&self, source: &str) -> f64 {
        self.lower_error(source) / self.y
    }

    pub fn relative_upper_error(&self, source: &str) -> f64 {
        self.upper_error(source) / self.y
    }

    pub fn total_lower_error(&self) -> f64 {
        self.lower_errors.values().map(|e| e * e).sum::<f64>().sqrt()
    }

    pub fn total_upper_error(&self) -> f64 {
        self.upper_errors.values().map(|e| e * e).sum::<f64>().sqrt()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.lower_errors.keys().map(String::as_str)
    }
}

impl fmt::Display for Datapoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} +- {:.6} GeV/c: {:e}", self.x, self.dx, self.y)?;
        for source in self.sources() {
            write!(
                f,
                " + {:e} - {:e} ({source})",
                self.upper_error(source),
                self.lower_error(source)
            )?;
        }
        if !self.lower_errors.is_empty() {
            write!(
                f,
                " [+ {:e} - {:e} (total)]",
                self.total_upper_error(),
                self.total_lower_error()
            )?;
        }
        Ok(())
    }
}

/// Graph point with the errors of one source.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ErrorPoint {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDirection {
    Upper,
    Lower,
    Central,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DataCollection {
    name: String,
    points: Vec<Datapoint>,
}

impl DataCollection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            points: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_point(&mut self, point: Datapoint) {
        self.points.push(point);
    }

    pub fn add_xy(&mut self, x: f64, y: f64) {
        self.points.push(Datapoint::new(x, y, 0.0));
    }

    /// Point with a symmetric uncertainty registered as source `error`.
    pub fn add_with_errors(&mut self, x: f64, y: f64, dx: f64, dy: f64) {
        let mut point = Datapoint::new(x, y, dx);
        point.add_error_source("error", dy, dy);
        self.points.push(point);
    }

    pub fn points(&self) -> &[Datapoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn sorted(&self) -> Vec<&Datapoint> {
        let mut sorted: Vec<&Datapoint> = self.points.iter().collect();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));
        sorted
    }

    /// Points sorted in x with the errors of `source`.
    pub fn error_graph(&self, source: &str) -> Vec<ErrorPoint> {
        self.sorted()
            .into_iter()
            .map(|p| ErrorPoint {
                x: p.x,
                y: p.y,
                dx: p.dx,
                lower: p.lower_error(source),
                upper: p.upper_error(source),
            })
            .collect()
    }

    pub fn limit_curve(&self, source: &str, direction: LimitDirection) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| match direction {
                LimitDirection::Upper => (p.x, p.upper_limit(source)),
                LimitDirection::Lower => (p.x, p.lower_limit(source)),
                LimitDirection::Central => (p.x, p.y),
            })
            .collect()
    }
}

impl fmt::Display for DataCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data collection {}", self.name)?;
        writeln!(f, "{}", "=".repeat(69))?;
        for point in self.sorted() {
            writeln!(f, "{point}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_error_in_quadrature() {
        let mut point = Datapoint::new(10.0, 2.0, 0.5);
        point.add_error_source("stat", 0.3, 0.3);
        point.add_error_source("sys", 0.4, 0.6);
        assert!((point.lower_error(TOTAL) - 0.5).abs() < 1e-12);
        assert!((point.upper_error(TOTAL) - 0.45_f64.sqrt()).abs() < 1e-12);
        assert_eq!(point.lower_error("missing"), 0.0);
        assert!((point.upper_limit("sys") - 2.6).abs() < 1e-12);
        assert!((point.relative_lower_error("stat") - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_graph_is_sorted() {
        let mut collection = DataCollection::new("turnon");
        collection.add_with_errors(20.0, 1.0, 1.0, 0.1);
        collection.add_xy(10.0, 2.0);
        let graph = collection.error_graph("error");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph[0].x, 10.0);
        assert_eq!(graph[0].upper, 0.0);
        assert_eq!(graph[1].lower, 0.1);

        let lower = collection.limit_curve("error", LimitDirection::Lower);
        assert!((lower[0].1 - 0.9).abs() < 1e-12);
        assert!(collection.to_string().starts_with("Data collection turnon"));
    }
}
