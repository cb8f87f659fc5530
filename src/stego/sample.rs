use image::{Rgba, RgbaImage};

const SQUARE_SIZE: u32 = 20;
const LIGHT: u8 = 255;
const GRAY: u8 = 204;
const TINT: u8 = 25;

/// Tinted rectangles as (x, y, width, height, channel).
const TINTS: [(u32, u32, u32, u32, usize); 3] = [
    (50, 50, 100, 100, 0),
    (200, 100, 100, 100, 1),
    (100, 150, 100, 100, 2),
];

/// Build an opaque checkerboard test image with red, green and blue tinted patches.
///
/// Rectangles falling outside the requested size are clipped.
pub fn create_sample_image(width: u32, height: u32) -> RgbaImage {
    let mut image = RgbaImage::from_fn(width, height, |x, y| {
        let value = if (x / SQUARE_SIZE + y / SQUARE_SIZE) % 2 == 0 {
            LIGHT
        } else {
            GRAY
        };
        Rgba([value, value, value, 255])
    });

    for (x0, y0, w, h, channel) in TINTS {
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                let value = &mut image.get_pixel_mut(x, y).0[channel];
                *value = value.saturating_add(TINT);
            }
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_and_tints() {
        let img = create_sample_image(400, 300);
        assert_eq!(img.dimensions(), (400, 300));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(20, 0).0, [204, 204, 204, 255]);
        // red tint over a gray square
        assert_eq!(img.get_pixel(60, 80).0, [229, 204, 204, 255]);
        // red tint over a white square saturates
        assert_eq!(img.get_pixel(60, 60).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(200, 100).0, [204, 229, 204, 255]);
    }

    #[test]
    fn test_small_sizes_are_clipped() {
        let img = create_sample_image(30, 10);
        assert_eq!(img.dimensions(), (30, 10));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }
}
