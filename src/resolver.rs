use std::collections::HashMap;

use crate::map::Shape;

/// Looks up a country's boundary by alpha-3 code.
///
/// Zero matches and several matches are both valid answers.
pub trait BoundaryResolver {
    fn resolve(&self, code: &str) -> Vec<Shape>;
}

/// Country boundaries loaded once and indexed by code.
pub struct CountryBoundaries {
    shapes: Vec<Shape>,
    by_code: HashMap<String, Vec<usize>>,
}

impl CountryBoundaries {
    /// Index `(code, shape)` features, keeping dataset order within a code.
    pub fn new(features: impl IntoIterator<Item = (String, Shape)>) -> Self {
        let mut shapes = Vec::new();
        let mut by_code: HashMap<String, Vec<usize>> = HashMap::new();
        for (code, shape) in features {
            by_code.entry(code).or_default().push(shapes.len());
            shapes.push(shape);
        }
        Self { shapes, by_code }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl BoundaryResolver for CountryBoundaries {
    fn resolve(&self, code: &str) -> Vec<Shape> {
        self.by_code
            .get(code)
            .map(|indices| indices.iter().map(|&i| self.shapes[i].clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f64) -> Shape {
        Shape::new(vec![vec![(offset, 0.0), (offset + 1.0, 0.0), (offset, 1.0)]]).unwrap()
    }

    #[test]
    fn test_resolve_exact_code() {
        let boundaries = CountryBoundaries::new([
            ("FRA".to_string(), triangle(2.0)),
            ("DEU".to_string(), triangle(10.0)),
        ]);
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries.resolve("FRA"), vec![triangle(2.0)]);
        // Exact match only
        assert!(boundaries.resolve("fra").is_empty());
    }

    #[test]
    fn test_resolve_unknown_code_is_empty() {
        let boundaries = CountryBoundaries::new([("FRA".to_string(), triangle(2.0))]);
        assert!(boundaries.resolve("XXX").is_empty());
    }

    #[test]
    fn test_resolve_returns_every_feature_for_a_code() {
        let boundaries = CountryBoundaries::new([
            ("NOR".to_string(), triangle(5.0)),
            ("SWE".to_string(), triangle(15.0)),
            ("NOR".to_string(), triangle(20.0)),
        ]);
        assert_eq!(boundaries.resolve("NOR"), vec![triangle(5.0), triangle(20.0)]);
    }
}
