/// Gauss-Legendre quadrature with precomputed nodes and weights
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    nodes: Vec<f32>,
    weights: Vec<f32>,
}

impl GaussLegendre {
    /// Compute `order` nodes on [-1, 1] by Newton iteration on the Legendre polynomial
    pub fn new(order: usize) -> Self {
        let n = order.max(1);
        let mut nodes = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);

        for i in 1..=n {
            let mut x = (std::f64::consts::PI * (i as f64 - 0.25) / (n as f64 + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre(n, x);
                let step = p / dp;
                x -= step;
                if step.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre(n, x);
            nodes.push(x as f32);
            weights.push((2.0 / ((1.0 - x * x) * dp * dp)) as f32);
        }

        Self { nodes, weights }
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Integrate `f` over [a, b]
    pub fn integrate(&self, a: f32, b: f32, f: impl Fn(f32) -> f32) -> f32 {
        let half = (b - a) * 0.5;
        let mid = (a + b) * 0.5;
        let sum: f32 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(half * x + mid))
            .sum();
        sum * half
    }
}

impl Default for GaussLegendre {
    fn default() -> Self {
        Self::new(8)
    }
}

/// Legendre polynomial P_n(x) and its derivative
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=n {
        let k = k as f64;
        let p2 = ((2.0 * k - 1.0) * x * p1 - (k - 1.0) * p0) / k;
        p0 = p1;
        p1 = p2;
    }
    if n == 1 {
        return (x, 1.0);
    }
    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_interval_length() {
        for order in [1, 2, 5, 8, 16] {
            let gl = GaussLegendre::new(order);
            let total = gl.integrate(0.0, 3.0, |_| 1.0);
            assert!((total - 3.0).abs() < 1e-4, "order {order}: {total}");
        }
    }

    #[test]
    fn exact_for_low_degree_polynomials() {
        let gl = GaussLegendre::new(4);
        // Integral of x^3 + 2x over [0, 2] = 4 + 4
        let v = gl.integrate(0.0, 2.0, |x| x * x * x + 2.0 * x);
        assert!((v - 8.0).abs() < 1e-4);
    }

    #[test]
    fn integrates_smooth_function() {
        let gl = GaussLegendre::new(8);
        let v = gl.integrate(0.0, std::f32::consts::PI, f32::sin);
        assert!((v - 2.0).abs() < 1e-4);
    }
}
