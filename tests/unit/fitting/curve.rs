//! Tests for Levenberg-Marquardt curve fitting

#[cfg(test)]
mod tests {
    use ndarray::Array1;
    use thermofit::FitError;
    use thermofit::fitting::curve::{
        FitOptions, FitReport, Termination, curve_fit, curve_fit_kind,
    };
    use thermofit::math::grid::linspace;
    use thermofit::math::models::{
        Gaussian, ModelKind, SroCorrection, gaussian_array, sro_model_array,
    };

    fn fit_gaussian(
        initial: &[f64],
        x: &Array1<f64>,
        y: &Array1<f64>,
    ) -> Result<FitReport, FitError> {
        curve_fit(&Gaussian, initial, x, y, &FitOptions::default())
    }

    fn assert_close(actual: &Array1<f64>, expected: &[f64], relative: f64) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() <= relative * e.abs().max(1.0),
                "fitted {actual}, expected {expected:?}"
            );
        }
    }

    // Tests noiseless Gaussian data is recovered from the default start
    // Verified by flipping the sign of the step
    #[test]
    fn test_recovers_gaussian_parameters() {
        let x = linspace(-5.0, 5.0, 41);
        let y = gaussian_array(&x, 2.0, 0.5, 1.5);

        let report = fit_gaussian(&[1.0, 0.0, 1.0], &x, &y).unwrap();

        assert!(report.termination.converged());
        assert_eq!(report.model, "gaussian");
        let fitted = Array1::from(vec![report.params[0], report.params[1], report.params[2].abs()]);
        assert_close(&fitted, &[2.0, 0.5, 1.5], 1e-6);
        assert!(report.residual_sum_of_squares < 1e-12);
    }

    // Tests noiseless short-range-order data is recovered
    // Verified by dropping the Marquardt diagonal scaling
    #[test]
    fn test_recovers_sro_parameters() {
        let t = linspace(300.0, 3000.0, 28);
        let y = sro_model_array(&t, 500.0, 1.0, 100.0);
        let options = FitOptions {
            gradient_tolerance: 0.0,
            ..FitOptions::default()
        };

        let report = curve_fit(&SroCorrection, &[400.0, 0.8, 50.0], &t, &y, &options).unwrap();

        assert!(report.termination.converged(), "{:?}", report.termination);
        assert_close(&report.params, &[500.0, 1.0, 100.0], 1e-6);
    }

    // Tests a noisy curve still lands near the generating parameters
    // Verified by accepting steps that increase the cost
    #[test]
    fn test_noisy_gaussian_fit() {
        let x = linspace(-4.0, 6.0, 60);
        let clean = gaussian_array(&x, 3.0, 1.0, 0.8);
        let y = &clean + &x.mapv(|xi| 0.01 * (7.0 * xi).sin());

        let report = fit_gaussian(&[1.0, 0.0, 1.0], &x, &y).unwrap();

        let fitted = Array1::from(vec![report.params[0], report.params[1], report.params[2].abs()]);
        assert_close(&fitted, &[3.0, 1.0, 0.8], 0.05);
        assert!(report.residual_sum_of_squares > 0.0);
    }

    // Tests an exact starting point stops immediately on the gradient test
    // Verified by checking the gradient after the first step
    #[test]
    fn test_exact_start_stops_on_gradient() {
        let x = linspace(0.0, 2.0, 5);
        let y = gaussian_array(&x, 1.0, 1.0, 0.5);

        let report = fit_gaussian(&[1.0, 1.0, 0.5], &x, &y).unwrap();

        assert_eq!(report.termination, Termination::GradientTolerance);
        assert_eq!(report.iterations, 0);
        assert!(report.residual_sum_of_squares.abs() < f64::EPSILON);
    }

    // Tests the iteration cap is honored and reported
    // Verified by looping one extra time
    #[test]
    fn test_iteration_cap() {
        let x = linspace(-5.0, 5.0, 21);
        let y = gaussian_array(&x, 2.0, 0.5, 1.5);
        let options = FitOptions {
            max_iterations: 0,
            ..FitOptions::default()
        };

        let report = curve_fit(&Gaussian, &[1.0, 0.0, 1.0], &x, &y, &options).unwrap();

        assert_eq!(report.termination, Termination::MaxIterations);
        assert!(!report.termination.converged());
        assert_eq!(report.params.to_vec(), vec![1.0, 0.0, 1.0]);
    }

    // Tests input validation errors
    // Verified by removing each validation branch in turn
    #[test]
    fn test_rejects_invalid_inputs() {
        let x = linspace(0.0, 1.0, 5);
        let y = x.clone();
        let short = linspace(0.0, 1.0, 2);
        let options = FitOptions::default();

        assert!(matches!(
            curve_fit(&Gaussian, &[1.0, 0.0, 1.0], &x, &linspace(0.0, 1.0, 4), &options),
            Err(FitError::DimensionMismatch { expected: 5, found: 4, .. })
        ));
        assert!(matches!(
            curve_fit(&Gaussian, &[1.0, 0.0], &x, &y, &options),
            Err(FitError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
        assert!(matches!(
            curve_fit(&Gaussian, &[1.0, 0.0, 1.0], &short, &short, &options),
            Err(FitError::InsufficientData { points: 2, required: 3 })
        ));

        let mut bad_y = y.clone();
        bad_y[2] = f64::NAN;
        assert!(matches!(
            curve_fit(&Gaussian, &[1.0, 0.0, 1.0], &x, &bad_y, &options),
            Err(FitError::InvalidParameter { parameter: "y", .. })
        ));

        let bad_options = FitOptions {
            initial_damping: 0.0,
            ..options
        };
        assert!(matches!(
            curve_fit(&Gaussian, &[1.0, 0.0, 1.0], &x, &y, &bad_options),
            Err(FitError::InvalidParameter { parameter: "initial_damping", .. })
        ));
    }

    // Tests a start where the model is undefined is reported, not iterated
    // Verified by removing the initial cost check
    #[test]
    fn test_non_finite_start() {
        let x = linspace(0.0, 1.0, 5);
        let y = x.clone();

        let err = fit_gaussian(&[1.0, 0.5, 0.0], &x, &y).unwrap_err();
        assert!(matches!(err, FitError::Computation { operation: "curve_fit", .. }));
    }

    // Tests runtime dispatch reaches the selected model
    // Verified by routing both kinds to the Gaussian
    #[test]
    fn test_curve_fit_kind_dispatch() {
        let t = linspace(300.0, 3000.0, 10);
        let y = sro_model_array(&t, 500.0, 1.0, 100.0);

        let report =
            curve_fit_kind(ModelKind::Sro, &[500.0, 1.0, 100.0], &t, &y, &FitOptions::default())
                .unwrap();

        assert_eq!(report.model, "sro");
        assert_eq!(report.iterations, 0);
    }

    // Tests termination labels used in reports
    // Verified by changing a label
    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::GradientTolerance.to_string(), "gradient-tolerance");
        assert_eq!(Termination::StepTolerance.to_string(), "step-tolerance");
        assert_eq!(Termination::MaxIterations.to_string(), "max-iterations");
    }
}
