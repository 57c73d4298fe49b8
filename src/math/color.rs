/// RGB color with channels in `[0, 1]`, stored in sRGB space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_hex(0xffffff);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode a 24-bit `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Linear-light channels for shading
    pub fn to_linear(&self) -> [f32; 3] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        ]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_background() {
        let color = Color::from_hex(0xffeee3);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0xee as f32 / 255.0);
        assert_eq!(color.b, 0xe3 as f32 / 255.0);
    }

    #[test]
    fn test_from_hex_channel_order() {
        assert_eq!(Color::from_hex(0xff0000), Color::new(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex(0x00ff00), Color::new(0.0, 1.0, 0.0));
        assert_eq!(Color::from_hex(0x0000ff), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        assert_eq!(Color::from_hex(0).to_linear(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linear_midtone_darkens() {
        let linear = Color::new(0.5, 0.5, 0.5).to_linear();
        assert!((linear[0] - 0.214).abs() < 0.001);
    }
}
