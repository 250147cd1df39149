//! Batch downloading.
//!
//! Runs an explicit list of panoramas through the assembler, strictly
//! one at a time. Sequential execution is a deliberate pacing policy
//! toward the provider, not a performance shortcut, so it is not
//! configurable.

use crate::assembler::{AssembleError, Assembler};
use crate::pano::{PanoId, ZoomLevel};
use image::RgbaImage;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one batch item.
pub struct BatchOutcome {
    /// The requested panorama
    pub pano: PanoId,
    /// Its assembled image, or the failure that was captured
    pub result: Result<RgbaImage, AssembleError>,
}

/// Sequential batch runner over a list of panorama identifiers.
///
/// Failures are captured per item; the batch always runs to the end of
/// the list. An optional delay spaces consecutive items.
pub struct BatchRunner<'a> {
    assembler: &'a dyn Assembler,
    delay: Duration,
}

impl<'a> BatchRunner<'a> {
    /// Creates a runner over the given assembler.
    ///
    /// # Arguments
    ///
    /// * `assembler` - Panorama assembly seam
    /// * `delay` - Pause between consecutive items (not after the last)
    pub fn new(assembler: &'a dyn Assembler, delay: Duration) -> Self {
        Self { assembler, delay }
    }

    /// Runs the batch, invoking `on_item` as each item completes.
    ///
    /// The callback receives each outcome before the inter-item delay,
    /// so completed panoramas are usable (saved, reported) immediately
    /// rather than at batch end.
    pub fn run<F>(&self, panos: &[PanoId], zoom: ZoomLevel, mut on_item: F) -> Vec<BatchOutcome>
    where
        F: FnMut(&BatchOutcome),
    {
        info!(items = panos.len(), zoom = %zoom, "starting batch");
        let mut outcomes = Vec::with_capacity(panos.len());

        for (index, pano) in panos.iter().enumerate() {
            let result = self.assembler.assemble(pano, zoom);
            match &result {
                Ok(_) => info!(
                    pano = %pano,
                    item = index + 1,
                    of = panos.len(),
                    "batch item complete"
                ),
                Err(e) => warn!(
                    pano = %pano,
                    item = index + 1,
                    of = panos.len(),
                    error = %e,
                    "batch item failed"
                ),
            }

            let outcome = BatchOutcome {
                pano: pano.clone(),
                result,
            };
            on_item(&outcome);
            outcomes.push(outcome);

            if index + 1 < panos.len() && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }

        let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            items = outcomes.len(),
            failures = failures,
            "batch complete"
        );
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock assembler that fails identifiers containing "bad".
    struct SelectiveAssembler {
        calls: Mutex<Vec<String>>,
    }

    impl SelectiveAssembler {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Assembler for SelectiveAssembler {
        fn assemble(&self, pano: &PanoId, _zoom: ZoomLevel) -> Result<RgbaImage, AssembleError> {
            self.calls.lock().unwrap().push(pano.as_str().to_string());
            if pano.as_str().contains("bad") {
                Err(AssembleError::PanoramaUnavailable(pano.clone()))
            } else {
                Ok(RgbaImage::new(4, 2))
            }
        }
    }

    fn ids(names: &[&str]) -> Vec<PanoId> {
        names.iter().map(|n| PanoId::new(*n).unwrap()).collect()
    }

    #[test]
    fn test_failure_does_not_stop_the_batch() {
        let assembler = SelectiveAssembler::new();
        let runner = BatchRunner::new(&assembler, Duration::ZERO);

        let outcomes = runner.run(&ids(&["pano_a", "bad_pano", "pano_c"]), ZoomLevel::Z1, |_| {});

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(AssembleError::PanoramaUnavailable(_))
        ));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_items_run_in_order() {
        let assembler = SelectiveAssembler::new();
        let runner = BatchRunner::new(&assembler, Duration::ZERO);

        runner.run(&ids(&["first", "second", "third"]), ZoomLevel::Z0, |_| {});
        assert_eq!(assembler.calls(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_callback_sees_each_outcome() {
        let assembler = SelectiveAssembler::new();
        let runner = BatchRunner::new(&assembler, Duration::ZERO);

        let mut seen = Vec::new();
        runner.run(&ids(&["pano_a", "bad_pano"]), ZoomLevel::Z1, |outcome| {
            seen.push((
                outcome.pano.as_str().to_string(),
                outcome.result.is_ok(),
            ));
        });

        assert_eq!(
            seen,
            vec![("pano_a".to_string(), true), ("bad_pano".to_string(), false)]
        );
    }

    #[test]
    fn test_empty_batch() {
        let assembler = SelectiveAssembler::new();
        let runner = BatchRunner::new(&assembler, Duration::ZERO);

        let outcomes = runner.run(&[], ZoomLevel::Z1, |_| {});
        assert!(outcomes.is_empty());
        assert!(assembler.calls().is_empty());
    }
}
