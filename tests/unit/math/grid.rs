//! Tests for evenly spaced grid generation

#[cfg(test)]
mod tests {
    use thermofit::math::grid::linspace;

    // Tests endpoints are included and spacing is even
    // Verified by generating n - 1 points
    #[test]
    fn test_linspace_includes_endpoints() {
        let grid = linspace(300.0, 1200.0, 10);

        assert_eq!(grid.len(), 10);
        assert!((grid[0] - 300.0).abs() < f64::EPSILON);
        assert!((grid[9] - 1200.0).abs() < 1e-9);
        for pair in grid.windows(2) {
            assert!((pair[1] - pair[0] - 100.0).abs() < 1e-9);
        }
    }

    // Tests descending grids
    // Verified by taking the absolute step
    #[test]
    fn test_linspace_descending() {
        let grid = linspace(1.0, -1.0, 5);
        assert_eq!(grid.to_vec(), vec![1.0, 0.5, 0.0, -0.5, -1.0]);
    }

    // Tests degenerate lengths
    // Verified by dividing by n - 1 without a guard
    #[test]
    fn test_linspace_degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.5, 7.0, 1).to_vec(), vec![2.5]);
    }
}
