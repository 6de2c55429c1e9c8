//! ARIMA models estimated by conditional sum of squares
//!
//! The model is a regression on deterministic trend terms with ARIMA(p, d, q)
//! errors. Series and trend regressors are differenced `d` times, trend
//! coefficients and ARMA coefficients are estimated jointly by minimising the
//! sum of squared one-step residuals, and forecasts are integrated back to
//! the level of the input.

use crate::error::{ForecastError, Result};
use crate::models::{ModelFitter, ModelForecast, ModelSpec, TrendSpec};
use log::debug;
use price_math::autoregression::{psi_weights, yule_walker};
use price_math::descriptive::normal_quantile;
use price_math::differencing::{difference, integrate};
use price_math::optimize::NelderMead;
use price_math::regression::least_squares;

/// Conditional-sum-of-squares ARIMA fitter
#[derive(Debug, Clone, Default)]
pub struct CssArima {
    optimizer: NelderMead,
}

/// ARIMA model fitted to a series
#[derive(Debug, Clone)]
pub struct FittedArima {
    spec: ModelSpec,
    trend_coefficients: Vec<f64>,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    sigma2: f64,
    css: f64,
    history: Vec<f64>,
    errors: Vec<f64>,
    residuals: Vec<f64>,
}

impl CssArima {
    /// Fitter with a custom optimiser
    pub fn with_optimizer(optimizer: NelderMead) -> Self {
        Self { optimizer }
    }

    /// Fit `spec` to `values`
    pub fn fit(&self, values: &[f64], spec: &ModelSpec) -> Result<FittedArima> {
        let (p, d, q) = spec.order;
        let k = spec.trend.len();
        let n = values.len();
        // More residuals than free parameters after differencing and conditioning
        let required = d + p + k + p + q + 1;
        if n < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: n,
            });
        }

        let w = difference(values, d);
        let design = trend_design(spec.trend, n, d);
        check_trend_survives(spec.trend, &design, d)?;

        // Start values: OLS trend, Yule-Walker AR on the detrended series, zero MA
        let beta0 = least_squares(&design, &w)?;
        let u0 = detrend(&w, &design, &beta0);
        let ar0 = yule_walker(&u0, p)?;

        let mut start = beta0;
        start.extend(ar0);
        start.extend(std::iter::repeat(0.0).take(q));

        let objective = |params: &[f64]| {
            let (beta, ar, ma) = split_params(params, k, p);
            let u = detrend(&w, &design, beta);
            let e = css_residuals(&u, ar, ma);
            let sse: f64 = e[p..].iter().map(|r| r * r).sum();
            if sse.is_finite() {
                sse
            } else {
                f64::INFINITY
            }
        };

        let minimum = self.optimizer.minimize(objective, &start);
        if !minimum.value.is_finite() {
            return Err(ForecastError::ModelFit(format!(
                "{} did not produce a finite sum of squares",
                spec
            )));
        }

        let (beta, ar, ma) = split_params(&minimum.point, k, p);
        let errors = detrend(&w, &design, beta);
        let residuals = css_residuals(&errors, ar, ma);
        let effective = w.len() - p;
        let sigma2 = minimum.value / effective as f64;

        debug!(
            "Fitted {}: trend={:?} ar={:?} ma={:?} sigma2={:.6e} iterations={} converged={}",
            spec, beta, ar, ma, sigma2, minimum.iterations, minimum.converged
        );

        Ok(FittedArima {
            spec: *spec,
            trend_coefficients: beta.to_vec(),
            ar_coefficients: ar.to_vec(),
            ma_coefficients: ma.to_vec(),
            sigma2,
            css: minimum.value,
            history: values.to_vec(),
            errors,
            residuals,
        })
    }
}

impl ModelFitter for CssArima {
    fn fit_forecast(
        &self,
        values: &[f64],
        spec: &ModelSpec,
        steps: usize,
        alpha: f64,
    ) -> Result<ModelForecast> {
        self.fit(values, spec)?.forecast(steps, alpha)
    }

    fn name(&self) -> &str {
        "ARIMA (CSS)"
    }
}

impl FittedArima {
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn trend_coefficients(&self) -> &[f64] {
        &self.trend_coefficients
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Conditional sum of squares at the optimum
    pub fn css(&self) -> f64 {
        self.css
    }

    /// One-step residuals on the differenced scale (zero for the first `p`)
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Forecast `steps` values with a `1 - alpha` band
    pub fn forecast(&self, steps: usize, alpha: f64) -> Result<ModelForecast> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ForecastError::AlphaOutOfRange(alpha));
        }
        let (_, d, _) = self.spec.order;
        let n = self.history.len();
        let m = self.errors.len();

        // ARMA recursion on the detrended differenced scale, future shocks zero
        let mut u = self.errors.clone();
        let mut e = self.residuals.clone();
        for _ in 0..steps {
            let t = u.len();
            let mut next = 0.0;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                next += phi * u[t - 1 - i];
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if let Some(shock) = t.checked_sub(j + 1).and_then(|idx| e.get(idx)) {
                    next += theta * shock;
                }
            }
            u.push(next);
            e.push(0.0);
        }

        let design = trend_design(self.spec.trend, n + steps, d);
        let differenced: Vec<f64> = (0..steps)
            .map(|h| {
                let trend: f64 = design[m + h]
                    .iter()
                    .zip(&self.trend_coefficients)
                    .map(|(x, b)| x * b)
                    .sum();
                u[m + h] + trend
            })
            .collect();
        let mean = integrate(&self.history, &differenced, d)?;

        let psi = psi_weights(&self.ar_coefficients, &self.ma_coefficients, d, steps);
        let z = normal_quantile(1.0 - alpha / 2.0)?;
        let mut cumulative = 0.0;
        let mut lower = Vec::with_capacity(steps);
        let mut upper = Vec::with_capacity(steps);
        for (h, weight) in psi.iter().enumerate() {
            cumulative += weight * weight;
            let half_width = z * (self.sigma2 * cumulative).sqrt();
            lower.push(mean[h] - half_width);
            upper.push(mean[h] + half_width);
        }

        if mean
            .iter()
            .chain(&lower)
            .chain(&upper)
            .any(|v| !v.is_finite())
        {
            return Err(ForecastError::ModelFit(format!(
                "{} produced non-finite forecast values",
                self.spec
            )));
        }

        ModelForecast::new(mean, lower, upper)
    }
}

/// Trend regressors for times `1..=len`, differenced `d` times (one row per differenced point)
fn trend_design(trend: TrendSpec, len: usize, d: usize) -> Vec<Vec<f64>> {
    let k = trend.len();
    let rows = len.saturating_sub(d);
    let columns: Vec<Vec<f64>> = (0..k)
        .map(|c| {
            let raw: Vec<f64> = (1..=len).map(|t| trend.regressors(t as f64)[c]).collect();
            difference(&raw, d)
        })
        .collect();
    (0..rows)
        .map(|r| columns.iter().map(|col| col[r]).collect())
        .collect()
}

fn check_trend_survives(trend: TrendSpec, design: &[Vec<f64>], d: usize) -> Result<()> {
    for c in 0..trend.len() {
        if design.iter().all(|row| row[c].abs() < 1e-9) {
            return Err(ForecastError::InvalidParameter(format!(
                "trend '{}' has a term eliminated by differencing of order {}",
                trend, d
            )));
        }
    }
    Ok(())
}

fn detrend(w: &[f64], design: &[Vec<f64>], beta: &[f64]) -> Vec<f64> {
    w.iter()
        .zip(design)
        .map(|(value, row)| value - row.iter().zip(beta).map(|(x, b)| x * b).sum::<f64>())
        .collect()
}

fn split_params(params: &[f64], k: usize, p: usize) -> (&[f64], &[f64], &[f64]) {
    let (beta, rest) = params.split_at(k);
    let (ar, ma) = rest.split_at(p);
    (beta, ar, ma)
}

/// One-step residuals conditioned on the first `p` values; earlier shocks are zero
fn css_residuals(u: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut e = vec![0.0; u.len()];
    for t in p..u.len() {
        let mut value = u[t];
        for (i, phi) in ar.iter().enumerate() {
            value -= phi * u[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if let Some(idx) = t.checked_sub(j + 1) {
                value -= theta * e[idx];
            }
        }
        e[t] = value;
    }
    e
}
