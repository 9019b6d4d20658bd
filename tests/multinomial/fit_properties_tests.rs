//! Properties every fitted multinomial model must satisfy.

use approx::assert_relative_eq;
use multinom_rs::design::add_intercept_column;
use multinom_rs::softmax::class_logits;
use multinom_rs::{fit_multinomial, FitStatus, MultinomError, MultinomialConfig, MultinomialRegression};
use ndarray::{array, Array2};

use crate::test_helpers::{
    approx_eq, four_class_clusters, null_data, overlapping_clusters, separated_clusters,
};

#[test]
fn test_fitted_probabilities_sum_to_one() {
    for (x, y) in [
        overlapping_clusters(1),
        separated_clusters(2),
        four_class_clusters(3),
        null_data(4),
    ] {
        let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
        assert_eq!(fit.fitted_probabilities.dim(), (y.len(), fit.n_classes));
        for row in fit.fitted_probabilities.outer_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
            assert!(row.iter().all(|p| *p >= 0.0));
        }
    }
}

#[test]
fn test_reference_logit_is_exactly_zero() {
    let (x, y) = four_class_clusters(5);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    let design = add_intercept_column(x.view());

    assert_eq!(fit.coefficients.nrows(), fit.n_classes - 1);
    for row in design.outer_iter() {
        let logits = class_logits(fit.coefficients.view(), row);
        assert_eq!(logits.len(), 4);
        assert_eq!(logits[0], 0.0);
    }
}

#[test]
fn test_log_likelihood_is_non_decreasing() {
    for seed in [10, 11, 12] {
        let (x, y) = overlapping_clusters(seed);
        let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
        assert!(fit.converged());
        assert_eq!(fit.log_likelihood_trace.len(), fit.iterations + 1);
        for pair in fit.log_likelihood_trace.windows(2) {
            assert!(
                pair[1] >= pair[0] - 1e-8,
                "log-likelihood decreased from {} to {}",
                pair[0],
                pair[1]
            );
        }
        assert_relative_eq!(
            *fit.log_likelihood_trace.last().unwrap(),
            fit.log_likelihood(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_deviance_not_above_null_deviance() {
    for (x, y) in [overlapping_clusters(20), four_class_clusters(21)] {
        let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
        assert!(fit.converged());
        assert!(fit.deviance() <= fit.null_deviance());
        assert!(fit.pseudo_r_squared() >= 0.0);
        assert!(fit.pseudo_r_squared() > 0.1);
    }
}

#[test]
fn test_statistics_are_consistent() {
    let (x, y) = four_class_clusters(30);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    let s = &fit.statistics;
    let n_params = 3 * 4;

    assert_eq!(s.n_params, n_params);
    assert_relative_eq!(s.deviance, -2.0 * s.log_likelihood, epsilon = 1e-9);
    assert_relative_eq!(s.aic, s.deviance + 2.0 * n_params as f64, epsilon = 1e-9);
    assert_relative_eq!(
        s.bic,
        s.deviance + (fit.n_obs as f64).ln() * n_params as f64,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        s.pseudo_r_squared,
        1.0 - s.deviance / s.null_deviance,
        epsilon = 1e-12
    );
    assert_eq!(s.lr_df, 3 * 3);
    assert_relative_eq!(s.lr_statistic, s.null_deviance - s.deviance, epsilon = 1e-9);
    // Balanced classes: the null model assigns 1/4 to every observation
    assert_relative_eq!(
        s.null_deviance,
        -2.0 * fit.n_obs as f64 * 0.25_f64.ln(),
        epsilon = 1e-9
    );
}

#[test]
fn test_balanced_null_case_has_small_pseudo_r_squared() {
    for seed in [40, 41, 42] {
        let (x, y) = null_data(seed);
        let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
        assert!(fit.converged());
        assert!(
            fit.pseudo_r_squared().abs() < 0.05,
            "pseudo R² = {}",
            fit.pseudo_r_squared()
        );
        assert!(approx_eq(fit.deviance(), fit.null_deviance(), 0.05 * fit.null_deviance()));
    }
}

#[test]
fn test_two_classes_are_rejected() {
    let x = array![[0.5], [1.0], [-0.3], [2.0]];
    let err = MultinomialRegression::new()
        .fit(x.view(), &[0, 1, 0, 1])
        .unwrap_err();
    assert!(matches!(err, MultinomError::InvalidClassCount { classes: 2 }));

    let err = MultinomialRegression::new()
        .fit(x.view(), &[0, 0, 0, 0])
        .unwrap_err();
    assert!(matches!(err, MultinomError::InvalidClassCount { classes: 1 }));
}

#[test]
fn test_standard_errors_are_positive_and_match_covariance() {
    let (x, y) = overlapping_clusters(50);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    let covar = fit.covariance.as_ref().expect("covariance should be available");
    let p = fit.n_features;

    assert_eq!(covar.dim(), (2 * p, 2 * p));
    for ((k, j), se) in fit.standard_errors.indexed_iter() {
        assert!(se.is_finite() && *se > 0.0);
        assert_relative_eq!(se * se, covar[[k * p + j, k * p + j]], max_relative = 1e-10);
    }
    for r in 0..covar.nrows() {
        for c in 0..covar.ncols() {
            assert_relative_eq!(covar[[r, c]], covar[[c, r]], epsilon = 1e-8);
        }
    }
}

#[test]
fn test_parallel_fit_matches_serial_fit() {
    let (x, y) = four_class_clusters(60);
    let serial = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    let parallel = MultinomialRegression::new()
        .with_parallel(true)
        .fit(x.view(), &y)
        .unwrap();

    assert_eq!(serial.status, parallel.status);
    assert_relative_eq!(
        serial.log_likelihood(),
        parallel.log_likelihood(),
        max_relative = 1e-9
    );
    for (a, b) in serial.coefficients.iter().zip(parallel.coefficients.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn test_integer_weights_match_replicated_rows() {
    let (x, y) = overlapping_clusters(70);
    let weights: Vec<f64> = (0..y.len()).map(|i| (i % 3 + 1) as f64).collect();

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for (i, &w) in weights.iter().enumerate() {
        for _ in 0..w as usize {
            rows.extend(x.row(i).iter().copied());
            labels.push(y[i]);
        }
    }
    let replicated = Array2::from_shape_vec((labels.len(), x.ncols()), rows).unwrap();

    let weighted = MultinomialRegression::new()
        .with_weights(weights)
        .with_tol(1e-10)
        .fit(x.view(), &y)
        .unwrap();
    let expanded = MultinomialRegression::new()
        .with_tol(1e-10)
        .fit(replicated.view(), &labels)
        .unwrap();

    assert_relative_eq!(
        weighted.log_likelihood(),
        expanded.log_likelihood(),
        max_relative = 1e-8
    );
    assert_relative_eq!(
        weighted.null_deviance(),
        expanded.null_deviance(),
        max_relative = 1e-10
    );
    for (a, b) in weighted.coefficients.iter().zip(expanded.coefficients.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-5);
    }
}

#[test]
fn test_without_intercept() {
    let (x, y) = overlapping_clusters(80);
    let config = MultinomialConfig {
        intercept: false,
        ..Default::default()
    };
    let fit = fit_multinomial(x.view(), &y, &config).unwrap();

    assert!(!fit.intercept);
    assert_eq!(fit.n_features, 2);
    assert_eq!(fit.coefficients.dim(), (2, 2));
    assert_eq!(fit.statistics.lr_df, 4);
    assert_eq!(fit.status, FitStatus::Converged);
}

#[test]
fn test_functional_and_builder_forms_agree() {
    let (x, y) = overlapping_clusters(90);
    let config = MultinomialConfig {
        max_iterations: 50,
        tol: 1e-8,
        ..Default::default()
    };
    let a = fit_multinomial(x.view(), &y, &config).unwrap();
    let b = MultinomialRegression::new()
        .with_max_iterations(50)
        .with_tol(1e-8)
        .fit(x.view(), &y)
        .unwrap();
    assert_eq!(a.coefficients, b.coefficients);
    assert_eq!(a.iterations, b.iterations);
}
