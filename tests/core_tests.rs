// tests/core_tests.rs
use image::{Rgb, RgbImage};
use lightwatch_core::{Detection, Region, RegionStabilizer, SignalColor, StabilizerPhase};
use lightwatch_cv::{
    ColorSignalExtractor, DetectionConfig, FrameAnnotator, ImageOps, PixelBackend, Result,
};

const RED: [u8; 3] = [255, 0, 0];
const GREEN: [u8; 3] = [0, 255, 0];

fn frame(width: u32, height: u32, blocks: &[(Region, [u8; 3])]) -> RgbImage {
    let mut frame = RgbImage::new(width, height);
    for (region, color) in blocks {
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                frame.put_pixel(x as u32, y as u32, Rgb(*color));
            }
        }
    }
    frame
}

fn extractor() -> ColorSignalExtractor<PixelBackend> {
    ColorSignalExtractor::new(PixelBackend::new(), DetectionConfig::default())
}

#[test]
fn test_empty_region_clears_history() {
    let mut stabilizer = RegionStabilizer::new(4);
    stabilizer.update(Region::new(10, 10, 20, 20));
    stabilizer.update(Region::new(12, 10, 20, 20));

    for empty in [Region::empty(), Region::new(5, 5, 0, 9), Region::new(5, 5, 9, 0)] {
        assert!(stabilizer.update(empty).is_empty());
        assert_eq!(stabilizer.history_len(), 0);
    }
}

#[test]
fn test_cold_stabilizer_passes_through() {
    let mut stabilizer = RegionStabilizer::new(8);
    let region = Region::new(100, 50, 40, 60);
    for _ in 0..7 {
        assert_eq!(stabilizer.update(region), region);
        assert_eq!(stabilizer.phase(), StabilizerPhase::Cold);
    }
}

#[test]
fn test_uniform_input_is_fixed_point() {
    let mut stabilizer = RegionStabilizer::new(8);
    let region = Region::new(33, 47, 101, 59);
    for _ in 0..8 {
        assert_eq!(stabilizer.update(region), region);
    }
    assert_eq!(stabilizer.phase(), StabilizerPhase::Warm);
    assert_eq!(stabilizer.update(region), region);
}

#[test]
fn test_full_window_mean_shift() {
    let size = 4;
    let mut stabilizer = RegionStabilizer::new(size);
    let history = [
        Region::new(10, 20, 30, 40),
        Region::new(20, 24, 34, 40),
        Region::new(30, 28, 38, 40),
        Region::new(40, 32, 42, 40),
    ];
    let mut before = Region::empty();
    for region in history {
        before = stabilizer.update(region);
    }
    assert_eq!(before, Region::new(25, 26, 36, 40));

    let incoming = Region::new(61, 40, 50, 44);
    let evicted = history[0];
    let after = stabilizer.update(incoming);

    let expected = |new: i32, old: i32| (new - old) as f64 / size as f64;
    let deltas = [
        (after.x - before.x, expected(incoming.x, evicted.x)),
        (after.y - before.y, expected(incoming.y, evicted.y)),
        (after.width - before.width, expected(incoming.width, evicted.width)),
        (after.height - before.height, expected(incoming.height, evicted.height)),
    ];
    for (actual, exact) in deltas {
        assert!((actual as f64 - exact).abs() < 1.0, "{} vs {}", actual, exact);
    }
}

#[test]
fn test_regions_stay_inside_frame() -> Result<()> {
    let cases = [
        (640, 480, Region::new(64, 24, 30, 30), RED),
        (640, 480, Region::new(545, 185, 31, 31), RED),
        (640, 480, Region::new(64, 430, 40, 24), GREEN),
        (640, 480, Region::new(540, 420, 36, 36), GREEN),
        (320, 240, Region::new(40, 12, 30, 30), RED),
        (320, 240, Region::new(250, 205, 30, 30), GREEN),
    ];

    for (width, height, block, color) in cases {
        let detection = extractor().extract(&frame(width, height, &[(block, color)]))?;
        assert!(!detection.is_unknown(), "{} in {}x{} not found", block, width, height);
        assert!(
            detection.region.fits_within(width as i32, height as i32),
            "{} escapes {}x{}",
            detection.region,
            width,
            height
        );
    }
    Ok(())
}

#[test]
fn test_no_signal_pixels_is_unknown() -> Result<()> {
    // Blue and white never match any range
    let blocks = [
        (Region::new(200, 80, 60, 60), [0, 0, 255]),
        (Region::new(200, 360, 60, 60), [255, 255, 255]),
    ];
    let detection = extractor().extract(&frame(640, 480, &blocks))?;
    assert_eq!(detection, Detection::new(SignalColor::Unknown, Region::empty()));
    Ok(())
}

#[test]
fn test_single_red_contour() -> Result<()> {
    let block = Region::new(300, 100, 26, 21);
    let image = frame(640, 480, &[(block, RED)]);

    // The traced contour of this block has area 500
    let backend = PixelBackend::new();
    let config = DetectionConfig::default();
    let hsv = backend.to_hsv(&image)?;
    let mask = backend.threshold(&hsv, &config.red.ranges[0])?;
    let mask = backend.close(&mask, config.red.kernel_size)?;
    let contours = backend.find_external_contours(&mask)?;
    assert_eq!(contours.len(), 1);
    assert_eq!(backend.contour_area(&contours[0]), 500.0);
    assert_eq!(backend.bounding_box(&contours[0]), block);

    let detection = extractor().extract(&image)?;
    assert_eq!(detection.color, SignalColor::Red);
    assert_eq!(detection.region, Region::new(270, 70, 86, 81));
    Ok(())
}

#[test]
fn test_red_prefers_lowest_of_equal_lamps() -> Result<()> {
    // Two equal red blocks; contours come last-discovered first, so the lower one wins
    let blocks = [
        (Region::new(100, 40, 26, 21), RED),
        (Region::new(400, 150, 26, 21), RED),
    ];
    let detection = extractor().extract(&frame(640, 480, &blocks))?;
    assert_eq!(detection.color, SignalColor::Red);
    assert_eq!(detection.region, Region::new(370, 120, 86, 81));
    Ok(())
}

#[test]
fn test_area_exactly_at_floor_is_rejected() -> Result<()> {
    // Traced areas 300 (red floor) and 200 (green floor)
    let blocks = [
        (Region::new(300, 100, 16, 21), RED),
        (Region::new(300, 380, 21, 11), GREEN),
    ];
    assert!(extractor().extract(&frame(640, 480, &blocks))?.is_unknown());
    Ok(())
}

#[test]
fn test_green_prefers_larger_contour() -> Result<()> {
    // Areas 250 and 600
    let small = Region::new(100, 380, 26, 11);
    let large = Region::new(400, 370, 31, 21);

    for blocks in [[(small, GREEN), (large, GREEN)], [(large, GREEN), (small, GREEN)]] {
        let detection = extractor().extract(&frame(640, 480, &blocks))?;
        assert_eq!(detection.color, SignalColor::Green);
        assert_eq!(detection.region, Region::new(355, 325, 121, 111));
    }
    Ok(())
}

#[test]
fn test_unknown_frames_restart_green_history() -> Result<()> {
    let mut annotator: FrameAnnotator = FrameAnnotator::default();
    let first = frame(640, 480, &[(Region::new(400, 370, 31, 21), GREEN)]);
    for _ in 0..5 {
        annotator.annotate(&first)?;
    }
    assert_eq!(annotator.green_stabilizer().history_len(), 5);

    let blank = frame(640, 480, &[]);
    for _ in 0..3 {
        assert!(annotator.annotate(&blank)?.is_unknown());
        assert_eq!(annotator.green_stabilizer().history_len(), 0);
    }

    let moved = frame(640, 480, &[(Region::new(300, 380, 31, 21), GREEN)]);
    let detection = annotator.annotate(&moved)?;
    assert_eq!(detection.color, SignalColor::Green);
    // Cold again: raw region, no trace of the earlier position
    assert_eq!(detection.region, Region::new(255, 335, 121, 111));
    assert_eq!(annotator.green_stabilizer().history_len(), 1);
    assert_eq!(annotator.green_stabilizer().phase(), StabilizerPhase::Cold);
    Ok(())
}

#[test]
fn test_green_smoothed_once_warm() -> Result<()> {
    let mut config = DetectionConfig::default();
    config.history_size = 2;
    let mut annotator = FrameAnnotator::with_config(config);

    let a = frame(640, 480, &[(Region::new(400, 370, 31, 21), GREEN)]);
    let b = frame(640, 480, &[(Region::new(410, 370, 31, 21), GREEN)]);

    assert_eq!(annotator.annotate(&a)?.region, Region::new(355, 325, 121, 111));
    // Mean of x = 355 and x = 365
    assert_eq!(annotator.annotate(&b)?.region, Region::new(360, 325, 121, 111));
    Ok(())
}
