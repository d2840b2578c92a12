//! GradSnip regression test
//!
//! Runs the full pipeline and the two passes on synthetic images and
//! checks the properties every binarization must have: binary output, a
//! ratio in [0, 1], thresholds in range, bounds that only override the
//! adaptive test when narrowed, and the limiting cases of the blend
//! coefficient.

use gradsnip_core::{Image, ImageFormat};
use gradsnip_filter::gauss_blur;
use gradsnip_test::{RegParams, gradient_image, page_ink, unevenly_lit_page};
use gradsnip_threshold::{
    ApplyParams, Bounds, ChannelThresholds, GradSnipOptions, GradSnipReport, NullObserver,
    gradient_statistics, gradsnip_with_blur, gradsnip_with_observer, threshold_apply,
};

fn is_binary(image: &Image) -> bool {
    image.samples().iter().all(|&s| s == 0 || s == 255)
}

/// Fraction of pixels whose black/white state matches the page's ink.
fn ink_accuracy(out: &Image) -> f64 {
    let mut hits = 0usize;
    for y in 0..out.height() {
        for x in 0..out.width() {
            let black = out.get_sample(x, y, 0) == Some(0);
            if black == page_ink(x, y) {
                hits += 1;
            }
        }
    }
    hits as f64 / out.pixel_count() as f64
}

fn run(image: &Image, options: &GradSnipOptions) -> (Image, GradSnipReport) {
    let out = gradsnip_with_observer(image.clone(), options, &mut NullObserver).unwrap();
    (out.image, out.report)
}

#[test]
fn gradsnip_page_reg() {
    let mut rp = RegParams::new("gradsnip_page");
    let page = unevenly_lit_page(240, 160).unwrap();

    // Default options
    let (out, report) = run(&page, &GradSnipOptions::default());
    rp.check(is_binary(&out), "output is binary");
    rp.compare_values(124.0, f64::from(report.thresholds.as_slice()[0]), 1.0);
    rp.compare_values(24.54, f64::from(report.gradient), 0.5);
    rp.check(
        (0.0..=1.0).contains(&report.black_white_ratio),
        "ratio in [0, 1]",
    );
    rp.write_image(&out, ImageFormat::Png).unwrap();

    // A threshold that follows the background recovers the ink exactly
    let local = GradSnipOptions {
        coef: 1.0,
        delta: -10.0,
        ..Default::default()
    };
    let (out, report) = run(&page, &local);
    let accuracy = ink_accuracy(&out);
    eprintln!("local threshold: accuracy {accuracy:.4}");
    rp.compare_values(1.0, accuracy, 0.01);
    rp.compare_values(0.15625, f64::from(report.black_white_ratio), 0.01);
    rp.write_image(&out, ImageFormat::Png).unwrap();

    // A purely global threshold cannot: ink on the bright side is lighter
    // than paper on the dark side
    let global = GradSnipOptions {
        coef: 0.0,
        ..Default::default()
    };
    let (out, _) = run(&page, &global);
    let accuracy = ink_accuracy(&out);
    eprintln!("global threshold: accuracy {accuracy:.4}");
    rp.check(accuracy < 0.93, "global threshold misclassifies the page");

    assert!(rp.cleanup());
}

#[test]
fn gradsnip_bounds_reg() {
    let mut rp = RegParams::new("gradsnip_bounds");
    let page = unevenly_lit_page(120, 80).unwrap();
    let blur = gauss_blur(&page, 6.0).unwrap();

    // Reversed bounds are the same bounds
    let forward = GradSnipOptions {
        bounds: Bounds::new(40, 200),
        ..Default::default()
    };
    let reversed = GradSnipOptions {
        bounds: Bounds::new(200, 40),
        ..Default::default()
    };
    let a = gradsnip_with_blur(page.clone(), &blur, &forward, &mut NullObserver).unwrap();
    let b = gradsnip_with_blur(page.clone(), &blur, &reversed, &mut NullObserver).unwrap();
    rp.compare_images(&a.image, &b.image);
    rp.check(
        b.report.options.bounds == Bounds::new(40, 200),
        "report carries normalized bounds",
    );

    // Full bounds never override: identical to the bare adaptive rule
    let stats = gradient_statistics(&page, &blur).unwrap();
    let full = gradsnip_with_blur(
        page.clone(),
        &blur,
        &GradSnipOptions::default(),
        &mut NullObserver,
    )
    .unwrap();
    let mut expected = page.to_mut();
    let (coef, tg) = (0.75f32, f32::from(stats.thresholds.as_slice()[0]));
    for (s, &bl) in expected.samples_mut().iter_mut().zip(blur.samples()) {
        let t = f32::from(bl) * coef + tg * (1.0 - coef);
        *s = if f32::from(*s) < t { 0 } else { 255 };
    }
    rp.compare_images(&full.image, &expected.into());

    // Narrow bounds: everything below lower is black, above upper white
    let narrow = GradSnipOptions {
        bounds: Bounds::new(90, 110),
        ..Default::default()
    };
    let out = gradsnip_with_blur(page.clone(), &blur, &narrow, &mut NullObserver).unwrap();
    let mut ok = true;
    for (&s, &o) in page.samples().iter().zip(out.image.samples()) {
        if (s < 90 && o != 0) || (s > 110 && o != 255) {
            ok = false;
        }
    }
    rp.check(ok, "bounds override the adaptive test");

    assert!(rp.cleanup());
}

#[test]
fn gradsnip_coef_reg() {
    let mut rp = RegParams::new("gradsnip_coef");
    let image = gradient_image(40, 30, 3).unwrap();
    let blur = gauss_blur(&image, 10.0).unwrap();
    let stats = gradient_statistics(&image, &blur).unwrap();

    for t in stats.thresholds.raw() {
        rp.check((0.0..=255.0).contains(t), "threshold in sample range");
    }
    eprintln!("thresholds {:?}, gradient {}", stats.thresholds.as_slice(), stats.gradient);

    // coef = 0: a uniform threshold per channel, whatever the blur
    let params = ApplyParams {
        coef: 0.0,
        delta: 3.0,
        bounds: Bounds::FULL,
    };
    let flat = Image::from_samples(40, 30, 3, vec![128; 40 * 30 * 3]).unwrap();
    let mut a = image.to_mut();
    let mut b = image.to_mut();
    threshold_apply(&mut a, &blur, &params, &stats.thresholds).unwrap();
    threshold_apply(&mut b, &flat, &params, &stats.thresholds).unwrap();
    rp.compare_images(&a.into(), &b.into());

    // coef = 1: the global thresholds do not matter
    let params = ApplyParams {
        coef: 1.0,
        delta: -2.0,
        bounds: Bounds::FULL,
    };
    let mut a = image.to_mut();
    let mut b = image.to_mut();
    let ra = threshold_apply(&mut a, &blur, &params, &ChannelThresholds::new(vec![0, 0, 0]))
        .unwrap();
    let rb = threshold_apply(
        &mut b,
        &blur,
        &params,
        &ChannelThresholds::new(vec![255, 255, 255]),
    )
    .unwrap();
    rp.compare_images(&a.into(), &b.into());
    rp.compare_values(f64::from(ra), f64::from(rb), 0.0);

    assert!(rp.cleanup());
}

#[test]
fn gradsnip_degenerate_reg() {
    let mut rp = RegParams::new("gradsnip_degenerate");

    // Image equal to its blur: no gradient, midpoint threshold everywhere
    let flat = gradient_image(16, 16, 4).unwrap();
    let stats = gradient_statistics(&flat, &flat).unwrap();
    rp.check(stats.thresholds.as_slice() == [128, 128, 128, 128], "midpoint");
    rp.compare_values(0.0, f64::from(stats.gradient), 0.0);

    // Constant image through the whole pipeline
    let gray = Image::from_samples(8, 8, 1, vec![200; 64]).unwrap();
    let out = gradsnip_with_observer(gray, &GradSnipOptions::default(), &mut NullObserver).unwrap();
    rp.check(out.report.thresholds.as_slice() == [128], "flat image midpoint");
    // t = 200 * 0.75 + 128 * 0.25 = 182 < 200
    rp.check(out.image.samples().iter().all(|&s| s == 255), "flat image white");
    rp.compare_values(0.0, f64::from(out.report.black_white_ratio), 0.0);

    // The worked 2x2 example
    let image = Image::from_samples(2, 2, 1, vec![10, 200, 10, 200]).unwrap();
    let blur = Image::from_samples(2, 2, 1, vec![100; 4]).unwrap();
    let out =
        gradsnip_with_blur(image, &blur, &GradSnipOptions::default(), &mut NullObserver).unwrap();
    rp.check(out.image.samples() == [0, 255, 0, 255], "2x2 output");
    rp.compare_values(110.0, f64::from(out.report.thresholds.as_slice()[0]), 0.0);
    rp.compare_values(0.5, f64::from(out.report.black_white_ratio), 0.0);

    assert!(rp.cleanup());
}
