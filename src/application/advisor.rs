use std::sync::Mutex;

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use crate::domain::advice::AdviceBook;
use crate::domain::scoring::Performance;

/// Shared random source for advice and quotes. Seeded for reproducible
/// output, otherwise seeded from the OS.
pub struct Advisor {
    book: AdviceBook,
    rng: Mutex<Mcg128Xsl64>,
}

impl Advisor {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { book: AdviceBook::default(), rng: Mutex::new(rng) }
    }

    /// Returns an advice line for `performance` and a quote.
    pub fn pick(&self, performance: Performance) -> (&'static str, &'static str) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let advice = self.book.advice_for(performance, &mut *rng);
        let quote = self.book.quote(&mut *rng);
        (advice, quote)
    }
}
