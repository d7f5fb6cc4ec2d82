use crate::coords::OutputTarget;
use crate::error::{Error, Result};

/// Creates backing textures for an [`OffscreenTarget`].
pub trait TextureAllocator {
    type Texture;

    fn allocate(&mut self, size: OutputTarget) -> Self::Texture;
}

/// Off-screen color target that tracks the size it was allocated at.
///
/// The texture is only handed out for the exact size it was created with, so
/// a pass can never sample a target left over from before a resize.
#[derive(Debug)]
pub struct OffscreenTarget<T> {
    texture: Option<T>,
    size: OutputTarget,
    generation: u64,
}

impl<T> Default for OffscreenTarget<T> {
    fn default() -> Self {
        Self { texture: None, size: OutputTarget::default(), generation: 0 }
    }
}

impl<T> OffscreenTarget<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the current allocation (zero when none).
    #[inline]
    pub fn size(&self) -> OutputTarget {
        self.size
    }

    /// Bumped on every reallocation; bind groups built against an older
    /// generation reference a released texture.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.texture.is_some()
    }

    /// Makes sure the texture matches `size`, reallocating if it does not.
    ///
    /// Returns `true` when a new texture was created. Zero-area sizes release
    /// the texture instead, since no pass will run.
    pub fn ensure<A>(&mut self, alloc: &mut A, size: OutputTarget) -> bool
    where
        A: TextureAllocator<Texture = T>,
    {
        if size.is_empty() {
            if self.texture.take().is_some() {
                log::debug!("offscreen target released (size {}x{})", size.width, size.height);
            }
            self.size = size;
            return false;
        }
        if self.texture.is_some() && self.size == size {
            return false;
        }

        log::debug!(
            "offscreen target {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            size.width,
            size.height
        );
        // Drop the old texture before creating the new one.
        self.texture = None;
        self.texture = Some(alloc.allocate(size));
        self.size = size;
        self.generation = self.generation.wrapping_add(1);
        true
    }

    /// Returns the texture if it was allocated at exactly `size`.
    pub fn texture_for(&self, size: OutputTarget) -> Result<&T> {
        match &self.texture {
            Some(t) if self.size == size => Ok(t),
            _ => Err(Error::StaleTarget {
                allocated: if self.texture.is_some() {
                    (self.size.width, self.size.height)
                } else {
                    (0, 0)
                },
                requested: (size.width, size.height),
            }),
        }
    }

    /// Drops the texture.
    pub fn release(&mut self) -> Option<T> {
        self.size = OutputTarget::default();
        self.texture.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out textures that remember their size.
    #[derive(Default)]
    struct FakeAllocator {
        allocations: Vec<OutputTarget>,
    }

    impl TextureAllocator for FakeAllocator {
        type Texture = OutputTarget;

        fn allocate(&mut self, size: OutputTarget) -> OutputTarget {
            self.allocations.push(size);
            size
        }
    }

    #[test]
    fn resize_reallocates_before_the_next_pass() {
        let mut alloc = FakeAllocator::default();
        let mut target = OffscreenTarget::new();
        let small = OutputTarget::new(800, 600);
        let large = OutputTarget::new(1920, 1080);

        assert!(target.ensure(&mut alloc, small));
        assert_eq!(*target.texture_for(small).unwrap(), small);

        // Sampling at the new size without reallocating is a stale read.
        assert_eq!(
            target.texture_for(large).unwrap_err(),
            Error::StaleTarget { allocated: (800, 600), requested: (1920, 1080) }
        );

        assert!(target.ensure(&mut alloc, large));
        assert_eq!(*target.texture_for(large).unwrap(), large);
        assert_eq!(alloc.allocations, vec![small, large]);
    }

    #[test]
    fn same_size_is_reused() {
        let mut alloc = FakeAllocator::default();
        let mut target = OffscreenTarget::new();
        let size = OutputTarget::new(64, 64);
        assert!(target.ensure(&mut alloc, size));
        let generation = target.generation();
        assert!(!target.ensure(&mut alloc, size));
        assert_eq!(target.generation(), generation);
        assert_eq!(alloc.allocations.len(), 1);
    }

    #[test]
    fn zero_area_releases_and_never_allocates() {
        let mut alloc = FakeAllocator::default();
        let mut target = OffscreenTarget::new();
        target.ensure(&mut alloc, OutputTarget::new(10, 10));
        assert!(!target.ensure(&mut alloc, OutputTarget::new(0, 10)));
        assert!(!target.is_allocated());
        assert_eq!(alloc.allocations.len(), 1);
        assert!(target.texture_for(OutputTarget::new(0, 10)).is_err());
    }

    #[test]
    fn unallocated_target_reports_zero_size() {
        let target: OffscreenTarget<OutputTarget> = OffscreenTarget::new();
        assert_eq!(
            target.texture_for(OutputTarget::new(2, 2)).unwrap_err(),
            Error::StaleTarget { allocated: (0, 0), requested: (2, 2) }
        );
    }
}
