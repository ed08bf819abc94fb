use crate::preview::fit::{fit_rect, FitMode, Rect, Size};

#[test]
fn test_aspect_letterboxes_wide_frame() {
    let rect = fit_rect(
        Size::new(640.0, 480.0),
        Size::new(320.0, 320.0),
        FitMode::Aspect,
    );

    assert_eq!(
        rect,
        Rect {
            x: 0.0,
            y: 40.0,
            width: 320.0,
            height: 240.0,
        }
    );
}

#[test]
fn test_aspect_pillarboxes_tall_surface_for_portrait_frame() {
    let rect = fit_rect(
        Size::new(480.0, 640.0),
        Size::new(400.0, 400.0),
        FitMode::Aspect,
    );

    assert_eq!(rect.height, 400.0);
    assert_eq!(rect.width, 300.0);
    assert_eq!(rect.x, 50.0);
    assert_eq!(rect.y, 0.0);
}

#[test]
fn test_aspect_never_stretches() {
    let content = Size::new(1280.0, 720.0);
    for bounds in [
        Size::new(100.0, 900.0),
        Size::new(1920.0, 200.0),
        Size::new(333.0, 333.0),
    ] {
        let rect = fit_rect(content, bounds, FitMode::Aspect);
        let ratio = rect.width / rect.height;
        assert!((ratio - 16.0 / 9.0).abs() < 1e-3);
        assert!(rect.width <= bounds.width + 1e-3);
        assert!(rect.height <= bounds.height + 1e-3);
    }
}

#[test]
fn test_aspect_fill_covers_surface() {
    let rect = fit_rect(
        Size::new(640.0, 480.0),
        Size::new(320.0, 320.0),
        FitMode::AspectFill,
    );

    assert!(rect.width >= 320.0);
    assert!((rect.height - 320.0).abs() < 1e-3);
    assert!(rect.x < 0.0);
}

#[test]
fn test_empty_bounds_produce_empty_rect() {
    let rect = fit_rect(Size::new(640.0, 480.0), Size::default(), FitMode::Aspect);

    assert_eq!(rect.width, 0.0);
    assert_eq!(rect.height, 0.0);
}
