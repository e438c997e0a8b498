//! Interpolating cubic splines over a strictly increasing knot vector.
//!
//! Both variants pass exactly through every supplied value:
//! - not-a-knot: open curves, reproducing any single cubic exactly
//! - periodic: value, slope and curvature match across the wrap point

/// A scalar cubic spline `y(u)`, stored as knot values plus second derivatives
/// ("moments") at each knot.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    moments: Vec<f64>,
    periodic: bool,
}

impl CubicSpline {
    /// Not-a-knot spline through `(knots[i], values[i])`: the third
    /// derivative is continuous across the second and second-to-last knots.
    /// Three knots give the interpolating parabola, two the straight line.
    ///
    /// Callers guarantee at least two knots, strictly increasing.
    pub fn not_a_knot(knots: Vec<f64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(knots.len(), values.len());
        let n = knots.len() - 1;
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let curvature_rhs =
            |i: usize| 6.0 * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);

        let moments = match n {
            0 | 1 => vec![0.0; n + 1],
            2 => vec![curvature_rhs(1) / (3.0 * (h[0] + h[1])); 3],
            _ => {
                let size = n - 1;
                let mut sub = vec![0.0; size];
                let mut diag = vec![0.0; size];
                let mut sup = vec![0.0; size];
                let mut rhs = vec![0.0; size];
                for row in 0..size {
                    let i = row + 1;
                    sub[row] = h[i - 1];
                    diag[row] = 2.0 * (h[i - 1] + h[i]);
                    sup[row] = h[i];
                    rhs[row] = curvature_rhs(i);
                }

                // End moments eliminated through the not-a-knot conditions
                let (h0, h1) = (h[0], h[1]);
                diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
                sup[0] = (h1 * h1 - h0 * h0) / h1;
                let (ha, hb) = (h[n - 2], h[n - 1]);
                sub[size - 1] = (ha * ha - hb * hb) / ha;
                diag[size - 1] = (ha + hb) * (2.0 * ha + hb) / ha;

                let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);
                let mut moments = vec![0.0; n + 1];
                moments[1..n].copy_from_slice(&interior);
                moments[0] = ((h0 + h1) * moments[1] - h0 * moments[2]) / h1;
                moments[n] = ((ha + hb) * moments[n - 1] - hb * moments[n - 2]) / ha;
                moments
            }
        };

        CubicSpline { knots, values, moments, periodic: false }
    }

    /// Periodic spline through `(knots[i], values[i])`.
    ///
    /// `knots` has one more entry than `values`: the last knot is the period
    /// end, where the curve returns to `values[0]`. Callers guarantee at least
    /// three values.
    pub fn periodic(knots: Vec<f64>, mut values: Vec<f64>) -> Self {
        debug_assert_eq!(knots.len(), values.len() + 1);
        let m = values.len();
        let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let y = |i: usize| values[i % m];

        let mut sub = vec![0.0; m];
        let mut diag = vec![0.0; m];
        let mut sup = vec![0.0; m];
        let mut rhs = vec![0.0; m];
        for i in 0..m {
            let h_prev = h[(i + m - 1) % m];
            let h_next = h[i];
            let y_prev = y(i + m - 1);
            sub[i] = h_prev;
            diag[i] = 2.0 * (h_prev + h_next);
            sup[i] = h_next;
            rhs[i] = 6.0 * ((y(i + 1) - y(i)) / h_next - (y(i) - y_prev) / h_prev);
        }
        let corner = h[m - 1];
        let mut moments = solve_cyclic_tridiagonal(&sub, &diag, &sup, corner, corner, &rhs);

        // Close the loop so segment m-1 can be evaluated like any other.
        moments.push(moments[0]);
        values.push(values[0]);

        CubicSpline { knots, values, moments, periodic: true }
    }

    pub fn start(&self) -> f64 {
        self.knots[0]
    }

    pub fn end(&self) -> f64 {
        self.knots[self.knots.len() - 1]
    }

    pub fn value(&self, u: f64) -> f64 {
        let u = self.wrap(u);
        let k = self.segment(u);
        let (h, left, right) = self.local(k, u);
        self.moments[k] * right.powi(3) / (6.0 * h)
            + self.moments[k + 1] * left.powi(3) / (6.0 * h)
            + (self.values[k] / h - self.moments[k] * h / 6.0) * right
            + (self.values[k + 1] / h - self.moments[k + 1] * h / 6.0) * left
    }

    /// First derivative `dy/du`.
    pub fn derivative(&self, u: f64) -> f64 {
        let u = self.wrap(u);
        let k = self.segment(u);
        let (h, left, right) = self.local(k, u);
        -self.moments[k] * right.powi(2) / (2.0 * h) + self.moments[k + 1] * left.powi(2) / (2.0 * h)
            + (self.values[k + 1] - self.values[k]) / h
            - (self.moments[k + 1] - self.moments[k]) * h / 6.0
    }

    fn wrap(&self, u: f64) -> f64 {
        if self.periodic {
            self.start() + (u - self.start()).rem_euclid(self.end() - self.start())
        } else {
            u
        }
    }

    /// Index of the segment used for `u`. Values outside the knot range use
    /// the end segments, extrapolating their cubics.
    fn segment(&self, u: f64) -> usize {
        let last = self.knots.len() - 2;
        self.knots.partition_point(|&k| k <= u).saturating_sub(1).min(last)
    }

    fn local(&self, k: usize, u: f64) -> (f64, f64, f64) {
        let h = self.knots[k + 1] - self.knots[k];
        (h, u - self.knots[k], self.knots[k + 1] - u)
    }
}

/// Thomas algorithm. `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = sup[i] / denom;
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }
    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}

/// Tridiagonal system with extra corner entries: `bottom_left` at (n-1, 0) and
/// `top_right` at (0, n-1). Solved with the Sherman-Morrison correction.
fn solve_cyclic_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    bottom_left: f64,
    top_right: f64,
    rhs: &[f64],
) -> Vec<f64> {
    let n = diag.len();
    let gamma = -diag[0];
    let mut modified = diag.to_vec();
    modified[0] = diag[0] - gamma;
    modified[n - 1] = diag[n - 1] - bottom_left * top_right / gamma;

    let x = solve_tridiagonal(sub, &modified, sup, rhs);
    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = bottom_left;
    let z = solve_tridiagonal(sub, &modified, sup, &u);

    let fact = (x[0] + top_right * x[n - 1] / gamma) / (1.0 + z[0] + top_right * z[n - 1] / gamma);
    x.iter().zip(&z).map(|(xi, zi)| xi - fact * zi).collect()
}
