//! Derivative-free minimisation (Nelder-Mead simplex)

use crate::{MathError, Result};

/// Outcome of a minimisation run
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance test was met before the iteration cap
    pub converged: bool,
}

/// Nelder-Mead simplex minimiser
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iterations: usize,
    x_tolerance: f64,
    f_tolerance: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 0,
            x_tolerance: 1e-6,
            f_tolerance: 1e-10,
        }
    }
}

impl NelderMead {
    /// Minimiser with an explicit iteration cap (0 means `500 * dimension`)
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Set the convergence tolerances on simplex size and objective spread
    pub fn with_tolerances(mut self, x_tolerance: f64, f_tolerance: f64) -> Result<Self> {
        if x_tolerance <= 0.0 || f_tolerance <= 0.0 {
            return Err(MathError::InvalidInput(
                "Tolerances must be greater than zero".to_string(),
            ));
        }
        self.x_tolerance = x_tolerance;
        self.f_tolerance = f_tolerance;
        Ok(self)
    }

    /// Minimise `objective` starting from `start`.
    ///
    /// `NaN` objective values are treated as `+inf`, so a region where the
    /// objective blows up is simply avoided.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let evaluate = |x: &[f64]| {
            let value = objective(x);
            if value.is_nan() {
                f64::INFINITY
            } else {
                value
            }
        };

        let dim = start.len();
        if dim == 0 {
            return Minimum {
                point: Vec::new(),
                value: evaluate(start),
                iterations: 0,
                converged: true,
            };
        }
        let max_iterations = if self.max_iterations == 0 {
            500 * dim
        } else {
            self.max_iterations
        };

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(start.to_vec());
        for i in 0..dim {
            let mut vertex = start.to_vec();
            vertex[i] = if vertex[i].abs() > 1e-8 {
                vertex[i] * 1.05
            } else {
                0.00025
            };
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| evaluate(v)).collect();

        let mut iterations = 0;
        let mut converged = false;
        while iterations < max_iterations {
            order_simplex(&mut simplex, &mut values);

            let f_spread = values
                .iter()
                .skip(1)
                .map(|v| (v - values[0]).abs())
                .fold(0.0, f64::max);
            let x_spread = simplex
                .iter()
                .skip(1)
                .flat_map(|v| v.iter().zip(simplex[0].iter()).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            if f_spread <= self.f_tolerance && x_spread <= self.x_tolerance {
                converged = true;
                break;
            }
            iterations += 1;

            let worst = dim;
            let centroid: Vec<f64> = (0..dim)
                .map(|j| simplex[..worst].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
                .collect();
            let along = |t: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(simplex[worst].iter())
                    .map(|(c, w)| c + t * (c - w))
                    .collect()
            };

            let reflected = along(1.0);
            let f_reflected = evaluate(&reflected);

            if f_reflected < values[0] {
                let expanded = along(2.0);
                let f_expanded = evaluate(&expanded);
                if f_expanded < f_reflected {
                    simplex[worst] = expanded;
                    values[worst] = f_expanded;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[worst - 1] {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < values[worst] {
                let outside = along(0.5);
                let f = evaluate(&outside);
                (outside, f)
            } else {
                let inside = along(-0.5);
                let f = evaluate(&inside);
                (inside, f)
            };
            if f_contracted < values[worst].min(f_reflected) {
                simplex[worst] = contracted;
                values[worst] = f_contracted;
                continue;
            }

            // Shrink towards the best vertex
            let best = simplex[0].clone();
            for i in 1..=dim {
                simplex[i] = simplex[i]
                    .iter()
                    .zip(best.iter())
                    .map(|(x, b)| b + 0.5 * (x - b))
                    .collect();
                values[i] = evaluate(&simplex[i]);
            }
        }

        order_simplex(&mut simplex, &mut values);
        Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            converged,
        }
    }
}

fn order_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}
