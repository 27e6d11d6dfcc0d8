//! Video frame types

/// Decoded RGB video frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3), empty for pixel-less sources
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Frame without pixel data, for sources where only geometry matters
    pub fn blank(width: u32, height: u32, timestamp_ns: u64, sequence: u64) -> Self {
        Self::new(Vec::new(), width, height, timestamp_ns, sequence)
    }

    /// Native resolution as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame() {
        let frame = VideoFrame::blank(640, 480, 0, 7);
        assert_eq!(frame.dimensions(), (640, 480));
        assert!(frame.data.is_empty());
        assert_eq!(frame.sequence, 7);
    }
}
