//! Additive white Gaussian noise (AWGN) channel for complex symbols

use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::Error;

/// AWGN channel with a fixed signal-to-noise ratio
///
/// The noise power is set relative to the average power of each signal passed through the
/// channel, so that the ratio of the two equals the configured SNR.
#[derive(Clone, PartialEq, Debug, Copy)]
pub struct AwgnChannel {
    /// Signal-to-noise ratio (dB)
    snr_db: f64,
}

impl AwgnChannel {
    /// Returns AWGN channel with given signal-to-noise ratio (dB).
    #[must_use]
    pub fn new(snr_db: f64) -> Self {
        Self { snr_db }
    }

    /// Returns signal-to-noise ratio (dB).
    #[must_use]
    pub fn snr_db(&self) -> f64 {
        self.snr_db
    }

    /// Returns noisy copy of given signal.
    ///
    /// # Parameters
    ///
    /// - `signal`: Symbols to be sent over the channel.
    ///
    /// - `rng`: Random number generator to be used.
    ///
    /// # Returns
    ///
    /// - `noisy_signal`: Symbols at the channel output. If `P` is the average power of `signal`,
    ///   then the real and imaginary parts of each symbol are perturbed by independent zero-mean
    ///   Gaussian noise of variance `0.5 * P / 10f64.powf(0.1 * snr_db)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `signal` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use num_complex::Complex64;
    /// use pucch_f2::AwgnChannel;
    ///
    /// let channel = AwgnChannel::new(10.0);
    /// let signal = vec![Complex64::new(1.0, 0.0); 100];
    /// let noisy_signal = channel.apply(&signal, &mut rand::rng())?;
    /// assert_eq!(noisy_signal.len(), signal.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn apply<R: Rng + ?Sized>(
        &self,
        signal: &[Complex64],
        rng: &mut R,
    ) -> Result<Vec<Complex64>, Error> {
        if signal.is_empty() {
            return Err(Error::InvalidInput(
                "Signal sent over AWGN channel cannot be empty".to_string(),
            ));
        }
        let sigma = self.noise_std_dev(average_power(signal));
        Ok(signal
            .iter()
            .map(|&s| {
                let re_noise: f64 = rng.sample(StandardNormal);
                let im_noise: f64 = rng.sample(StandardNormal);
                s + sigma * Complex64::new(re_noise, im_noise)
            })
            .collect())
    }

    /// Returns per-axis noise standard deviation for given average signal power.
    fn noise_std_dev(&self, signal_power: f64) -> f64 {
        let noise_power = signal_power / 10f64.powf(0.1 * self.snr_db);
        (0.5 * noise_power).sqrt()
    }
}

/// Returns average power of given nonempty signal.
#[allow(clippy::cast_precision_loss)]
fn average_power(signal: &[Complex64]) -> f64 {
    signal.iter().map(Complex64::norm_sqr).sum::<f64>() / signal.len() as f64
}

#[cfg(test)]
mod tests_of_awgn_channel {
    use float_eq::assert_float_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn noise(signal: &[Complex64], noisy_signal: &[Complex64]) -> Vec<Complex64> {
        noisy_signal.iter().zip(signal).map(|(y, x)| y - x).collect()
    }

    #[test]
    fn test_apply_invalid_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(AwgnChannel::new(10.0).apply(&[], &mut rng).is_err());
    }

    #[test]
    fn test_apply_output_length() {
        let mut rng = StdRng::seed_from_u64(2);
        let signal = vec![Complex64::new(0.5, -0.5); 50];
        let noisy_signal = AwgnChannel::new(10.0).apply(&signal, &mut rng).unwrap();
        assert_eq!(noisy_signal.len(), signal.len());
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_apply_noise_power() {
        let mut rng = StdRng::seed_from_u64(3);
        let signal = vec![Complex64::new(1.0, 0.0); 10000];
        let noisy_signal = AwgnChannel::new(0.0).apply(&signal, &mut rng).unwrap();
        let noise_power = noise(&signal, &noisy_signal)
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            / signal.len() as f64;
        assert!(noise_power > 0.9 && noise_power < 1.1);
    }

    #[test]
    fn test_apply_high_snr() {
        let mut rng = StdRng::seed_from_u64(4);
        let signal = vec![Complex64::new(1.0, 1.0); 100];
        let noisy_signal = AwgnChannel::new(30.0).apply(&signal, &mut rng).unwrap();
        let max_deviation = noise(&signal, &noisy_signal)
            .iter()
            .map(|n| n.re.abs() + n.im.abs())
            .fold(0.0, f64::max);
        assert!(max_deviation < 0.2);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_apply_low_snr() {
        let mut rng = StdRng::seed_from_u64(5);
        let signal = vec![Complex64::new(1.0, 0.0); 1000];
        let noisy_signal = AwgnChannel::new(-5.0).apply(&signal, &mut rng).unwrap();
        let avg_abs_noise = noise(&signal, &noisy_signal)
            .iter()
            .map(|n| n.re.abs() + n.im.abs())
            .sum::<f64>()
            / (2 * signal.len()) as f64;
        assert!(avg_abs_noise > 0.5);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let mut rng = StdRng::seed_from_u64(6);
        let signal = vec![Complex64::new(0.3, 0.4); 8];
        let copy = signal.clone();
        let _ = AwgnChannel::new(0.0).apply(&signal, &mut rng).unwrap();
        assert_eq!(signal, copy);
    }

    #[test]
    fn test_apply_reproducible_with_seed() {
        let signal = vec![Complex64::new(1.0, -1.0); 20];
        let channel = AwgnChannel::new(3.0);
        let first = channel
            .apply(&signal, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let second = channel
            .apply(&signal, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_noise_std_dev() {
        let channel = AwgnChannel::new(10.0);
        assert_float_eq!(channel.noise_std_dev(2.0), 0.1f64.sqrt(), abs <= 1e-12);
        assert_float_eq!(channel.snr_db(), 10.0, abs <= 1e-12);
        assert_float_eq!(AwgnChannel::new(0.0).noise_std_dev(0.0), 0.0, abs <= 1e-12);
    }

    #[test]
    fn test_average_power() {
        let signal = [Complex64::new(1.0, 0.0), Complex64::new(1.0, 1.0)];
        assert_float_eq!(average_power(&signal), 1.5, abs <= 1e-12);
    }
}
