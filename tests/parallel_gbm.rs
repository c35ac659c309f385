#[cfg(feature = "parallel")]
use approx::assert_relative_eq;
#[cfg(feature = "parallel")]
use marketgen::math::{FixedSequenceSource, NormalSource, RngNormalSource};
#[cfg(feature = "parallel")]
use marketgen::mc::{GbmParams, simulate_gbm};

#[cfg(feature = "parallel")]
fn params(n_paths: usize, n_steps: usize) -> GbmParams {
    GbmParams {
        s0: 100.0,
        mu: 0.03,
        sigma: 0.25,
        horizon: 1.5,
        n_steps,
        n_paths,
    }
}

/// Shock sequence whose length is coprime to the step count, so every path differs.
#[cfg(feature = "parallel")]
fn shocks() -> Vec<f64> {
    (0..11).map(|i| (i as f64 - 5.0) * 0.37).collect()
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_paths_match_sequential_recursion() {
    let p = params(513, 7);
    let paths = simulate_gbm(&p, &mut FixedSequenceSource::new(shocks()).unwrap()).unwrap();

    let z = FixedSequenceSource::new(shocks())
        .unwrap()
        .generate(p.n_paths, p.n_steps)
        .unwrap();
    let dt = p.dt();
    let drift = (p.mu - 0.5 * p.sigma * p.sigma) * dt;
    let vol = p.sigma * dt.sqrt();

    assert_eq!(paths.shape(), (513, 8));
    for i in 0..p.n_paths {
        assert_eq!(paths[(i, 0)], p.s0);
        let mut log_return = 0.0;
        for j in 0..p.n_steps {
            log_return += drift + vol * z[(i, j)];
            assert_relative_eq!(
                paths[(i, j + 1)],
                p.s0 * f64::exp(log_return),
                max_relative = 1e-10
            );
        }
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_seeded_runs_are_bit_identical() {
    let p = params(2_000, 64);
    let a = simulate_gbm(&p, &mut RngNormalSource::seeded(31)).unwrap();
    let b = simulate_gbm(&p, &mut RngNormalSource::seeded(31)).unwrap();
    assert_eq!(a, b);
}
