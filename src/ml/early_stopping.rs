// ============================================================
// Layer 5 - Early Stopping
// ============================================================
// Watches the validation loss once per epoch.
//
//   - a strictly lower loss is an improvement: remember the epoch
//     and reset the wait counter
//   - anything else (equal, higher, NaN) increments the counter
//   - once the counter reaches `patience`, training stops
//
// The trainer keeps a copy of the weights from the best epoch
// and restores them when the loop ends.

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:   usize,
    best_loss:  f64,
    best_epoch: Option<usize>,
    wait:       usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_loss:  f64::INFINITY,
            best_epoch: None,
            wait:       0,
        }
    }

    /// Record the loss of `epoch`. Returns true if it is the best so far.
    pub fn observe(&mut self, epoch: usize, loss: f64) -> bool {
        if loss < self.best_loss {
            self.best_loss  = loss;
            self.best_epoch = Some(epoch);
            self.wait       = 0;
            true
        } else {
            self.wait += 1;
            false
        }
    }

    pub fn should_stop(&self) -> bool {
        self.wait >= self.patience
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_patience_without_improvement() {
        let mut es = EarlyStopping::new(3);
        assert!(es.observe(1, 0.9));
        assert!(es.observe(2, 0.5));
        assert!(!es.observe(3, 0.6));
        assert!(!es.observe(4, 0.5)); // equal is not better
        assert!(!es.should_stop());
        assert!(!es.observe(5, 0.7));
        assert!(es.should_stop());
        assert_eq!(es.best_epoch(), Some(2));
        assert!((es.best_loss() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_resets_wait() {
        let mut es = EarlyStopping::new(2);
        es.observe(1, 1.0);
        es.observe(2, 1.1);
        assert!(es.observe(3, 0.8));
        es.observe(4, 0.9);
        assert!(!es.should_stop());
        assert_eq!(es.best_epoch(), Some(3));
    }

    #[test]
    fn test_nan_never_improves() {
        let mut es = EarlyStopping::new(1);
        assert!(!es.observe(1, f64::NAN));
        assert!(es.should_stop());
        assert_eq!(es.best_epoch(), None);
    }
}
