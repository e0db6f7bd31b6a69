//! Motion sample types

/// Encoded size of a [`MotionSample`]
pub const MOTION_SAMPLE_BYTES: usize = 18;

/// One 3-axis reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Sum of absolute per-axis differences
    ///
    /// Computed in i32 so opposite-sign extremes cannot overflow, and
    /// without signs so axes moving in opposite directions cannot cancel.
    pub fn delta(&self, other: &Axes) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        let dz = (self.z as i32 - other.z as i32).unsigned_abs();
        dx + dy + dz
    }
}

/// Accelerometer, gyroscope and compass readings taken together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    pub accel: Axes,
    pub gyro: Axes,
    pub compass: Axes,
}

impl MotionSample {
    /// Encode as nine little-endian i16 values: accel, gyro, compass
    pub fn to_bytes(&self) -> [u8; MOTION_SAMPLE_BYTES] {
        let values = [
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
            self.compass.x,
            self.compass.y,
            self.compass.z,
        ];

        let mut out = [0u8; MOTION_SAMPLE_BYTES];
        for (chunk, value) in out.chunks_exact_mut(2).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_uses_absolute_values() {
        let a = Axes::new(0, 0, 0);
        let b = Axes::new(100, -100, 0);
        // A signed sum would be zero here
        assert_eq!(a.delta(&b), 200);
        assert_eq!(b.delta(&a), 200);
    }

    #[test]
    fn test_delta_extremes_do_not_overflow() {
        let a = Axes::new(i16::MIN, i16::MIN, i16::MIN);
        let b = Axes::new(i16::MAX, i16::MAX, i16::MAX);
        assert_eq!(a.delta(&b), 3 * 65_535);
    }

    #[test]
    fn test_to_bytes_layout() {
        let sample = MotionSample {
            accel: Axes::new(1, -1, 0x0203),
            gyro: Axes::new(0, 0, 0),
            compass: Axes::new(0, 0, -2),
        };
        let bytes = sample.to_bytes();
        assert_eq!(&bytes[0..6], &[0x01, 0x00, 0xFF, 0xFF, 0x03, 0x02]);
        assert_eq!(&bytes[16..18], &[0xFE, 0xFF]);
    }
}
