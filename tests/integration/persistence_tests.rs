//! JSON persistence of fitted models.

use multinom_rs::{MultinomError, MultinomialFit, MultinomialRegression};
use ndarray::Array2;

use crate::test_helpers::{approx_eq, four_class_clusters, overlapping_clusters};

fn assert_matrix_close(a: &Array2<f64>, b: &Array2<f64>) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(approx_eq(*x, *y, 1e-12), "{} != {}", x, y);
    }
}

#[test]
fn test_json_round_trip_preserves_predictions() {
    let (x, y) = four_class_clusters(400);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();

    let json = fit.to_json().unwrap();
    let restored = MultinomialFit::from_json(&json).unwrap();

    assert_matrix_close(&restored.coefficients, &fit.coefficients);
    assert_matrix_close(&restored.standard_errors, &fit.standard_errors);
    assert_eq!(restored.status, fit.status);
    assert_eq!(restored.n_classes, 4);
    assert_eq!(restored.iterations, fit.iterations);
    assert!((restored.aic() - fit.aic()).abs() < 1e-9);
    assert_eq!(
        restored.predict_class(x.view()).unwrap(),
        fit.predict_class(x.view()).unwrap()
    );
}

#[test]
fn test_json_round_trip_with_unavailable_standard_errors() {
    let (x, y) = overlapping_clusters(401);
    let collinear = Array2::from_shape_fn((x.nrows(), 3), |(i, j)| x[[i, j.min(1)]]);
    let fit = MultinomialRegression::new()
        .with_max_iterations(3)
        .fit(collinear.view(), &y)
        .unwrap();
    assert!(fit.standard_errors.iter().all(|se| se.is_nan()));

    let restored = MultinomialFit::from_json(&fit.to_json().unwrap()).unwrap();
    assert_eq!(restored.standard_errors.dim(), fit.standard_errors.dim());
    assert!(restored.standard_errors.iter().all(|se| se.is_nan()));
    assert_eq!(restored.diagnostics, fit.diagnostics);
}

#[test]
fn test_save_and_load_file() {
    let (x, y) = overlapping_clusters(402);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();

    let path = std::env::temp_dir().join(format!("multinom_rs_model_{}.json", std::process::id()));
    fit.save_json(&path).unwrap();
    let loaded = MultinomialFit::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_matrix_close(&loaded.coefficients, &fit.coefficients);
    assert_eq!(loaded.log_likelihood_trace.len(), fit.log_likelihood_trace.len());
    assert!(loaded.covariance.is_some());
}

#[test]
fn test_load_errors() {
    let missing = std::env::temp_dir().join("multinom_rs_definitely_missing_model.json");
    assert!(matches!(
        MultinomialFit::load_json(&missing),
        Err(MultinomError::IoError(_))
    ));
    assert!(matches!(
        MultinomialFit::from_json("{\"coefficients\": 3}"),
        Err(MultinomError::JsonError(_))
    ));
}
