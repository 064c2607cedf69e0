use std::sync::{Arc, Mutex, PoisonError};
use anyhow::{Error, Result};
use image::RgbImage;

/// A device that hands out one frame per call.
pub trait FrameSource: Send {
    fn read_frame(&mut self) -> Result<RgbImage, Error>;
}

/// Process-wide capture device handle.
///
/// Every read holds the lock for the whole frame grab, so concurrent
/// requests are served one after the other and never see a torn frame.
#[derive(Clone)]
pub struct SharedCamera {
    source: Arc<Mutex<Box<dyn FrameSource>>>,
}

impl SharedCamera {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        SharedCamera {
            source: Arc::new(Mutex::new(source)),
        }
    }

    /// Grab a single frame. Blocks while another caller holds the device.
    ///
    /// A read that panicked does not take the device down with it: the next
    /// caller gets the lock back and simply tries again.
    pub fn capture(&self) -> Result<RgbImage, Error> {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        source.read_frame()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use anyhow::{Error, Result};
    use image::{Rgb, RgbImage};
    use crate::capture::camera::{FrameSource, SharedCamera};

    /// Fails the read if another caller is inside it at the same time.
    struct ExclusiveSource {
        busy: Arc<AtomicBool>,
        reads: Arc<AtomicUsize>,
    }

    impl FrameSource for ExclusiveSource {
        fn read_frame(&mut self) -> Result<RgbImage, Error> {
            if self.busy.swap(true, Ordering::SeqCst) {
                return Err(Error::msg("overlapping read"));
            }
            thread::sleep(Duration::from_millis(2));
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            self.busy.store(false, Ordering::SeqCst);
            Ok(RgbImage::from_pixel(8, 8, Rgb([n as u8, 0, 0])))
        }
    }

    struct DeadSource;

    impl FrameSource for DeadSource {
        fn read_frame(&mut self) -> Result<RgbImage, Error> {
            Err(Error::msg("no frame"))
        }
    }

    /// Panics on the first read, works afterwards.
    struct GlitchySource {
        glitched: bool,
    }

    impl FrameSource for GlitchySource {
        fn read_frame(&mut self) -> Result<RgbImage, Error> {
            if !self.glitched {
                self.glitched = true;
                panic!("driver crashed mid-read");
            }
            Ok(RgbImage::new(4, 4))
        }
    }

    #[test]
    fn test_reads_are_serialized() {
        let reads = Arc::new(AtomicUsize::new(0));
        let camera = SharedCamera::new(Box::new(ExclusiveSource {
            busy: Arc::new(AtomicBool::new(false)),
            reads: reads.clone(),
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let camera = camera.clone();
                thread::spawn(move || {
                    for _ in 0..5 {
                        camera.capture().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(reads.load(Ordering::SeqCst), 40);
    }

    #[test]
    fn test_read_failure_propagates() {
        let camera = SharedCamera::new(Box::new(DeadSource));
        assert!(camera.capture().is_err());
        // the device stays usable after a failed read
        assert!(camera.capture().is_err());
    }

    #[test]
    fn test_panicked_read_does_not_wedge_device() {
        let camera = SharedCamera::new(Box::new(GlitchySource { glitched: false }));

        let crashed = {
            let camera = camera.clone();
            thread::spawn(move || camera.capture()).join()
        };
        assert!(crashed.is_err());

        let frame = camera.capture().unwrap();
        assert_eq!(frame.dimensions(), (4, 4));
    }
}
