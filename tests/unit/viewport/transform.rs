use super::*;

fn approx(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

fn settings(fit: ObjectFit) -> ViewportSettings {
    ViewportSettings {
        object_fit: fit,
        padding: Padding::uniform(10.0),
        scales: vec![0.1, 1.0, 10.0],
        initial_scale: 1.0,
        auto_sizing_timeout_ms: None,
    }
}

fn rect(left: f64, top: f64, right: f64, bottom: f64) -> BoundingRect {
    BoundingRect::new(left, top, right, bottom)
}

#[test]
fn screen_and_world_round_trip() {
    let t = ViewportTransform {
        translate: Vec2::new(5.0, -3.0),
        scale: 2.0,
    };
    let w = Point::new(7.0, 11.0);
    assert_eq!(t.to_screen(w), Point::new(19.0, 19.0));
    assert!(approx(t.to_world(t.to_screen(w)), w));
}

#[test]
fn contain_fits_the_tighter_axis_and_centers() {
    let canvas = Size::new(220.0, 120.0);
    let r = rect(-100.0, -25.0, 100.0, 25.0);
    let t = ViewportTransform::fit(r, canvas, &settings(ObjectFit::Contain));
    // 200 wide into 200 available, 50 tall into 100 available.
    assert_eq!(t.scale, 1.0);
    assert!(approx(t.to_screen(r.center()), Point::new(110.0, 60.0)));

    let cover = ViewportTransform::fit(r, canvas, &settings(ObjectFit::Cover));
    assert_eq!(cover.scale, 2.0);
    assert!(approx(cover.to_screen(r.center()), Point::new(110.0, 60.0)));
}

#[test]
fn fit_scale_is_clamped_and_none_keeps_initial() {
    let canvas = Size::new(1020.0, 1020.0);
    let tiny = rect(0.0, 0.0, 1.0, 1.0);
    let t = ViewportTransform::fit(tiny, canvas, &settings(ObjectFit::Contain));
    assert_eq!(t.scale, 10.0);

    let t = ViewportTransform::fit(tiny, canvas, &settings(ObjectFit::None));
    assert_eq!(t.scale, 1.0);
}

#[test]
fn degenerate_rect_uses_initial_scale() {
    let t = ViewportTransform::fit(
        BoundingRect::degenerate(),
        Size::new(100.0, 100.0),
        &settings(ObjectFit::Contain),
    );
    assert_eq!(t.scale, 1.0);
    assert!(approx(t.to_screen(Point::ZERO), Point::new(50.0, 50.0)));
}

#[test]
fn pinch_keeps_focal_point_fixed() {
    let s = settings(ObjectFit::Contain);
    let t = ViewportTransform {
        translate: Vec2::new(30.0, 40.0),
        scale: 1.0,
    };
    let focal = Point::new(100.0, 80.0);
    let world = t.to_world(focal);
    let zoomed = t.pinch(2.5, focal, &s);
    assert_eq!(zoomed.scale, 2.5);
    assert!(approx(zoomed.to_screen(world), focal));

    let clamped = t.pinch(100.0, focal, &s);
    assert_eq!(clamped.scale, 10.0);
    assert!(approx(clamped.to_screen(world), focal));
    assert_eq!(t.pinch(f64::NAN, focal, &s), t);
}

#[test]
fn double_tap_cycles_scales() {
    let s = settings(ObjectFit::Contain);
    let focal = Point::new(10.0, 10.0);
    let t = ViewportTransform::IDENTITY.double_tap(focal, &s);
    assert_eq!(t.scale, 10.0);
    let t = t.double_tap(focal, &s);
    assert_eq!(t.scale, 0.1);
    assert!(approx(t.to_screen(Point::new(10.0, 10.0)), focal));
}

#[test]
fn pan_and_lerp() {
    let a = ViewportTransform::IDENTITY.pan(Vec2::new(10.0, 0.0));
    assert_eq!(a.translate, Vec2::new(10.0, 0.0));
    let b = ViewportTransform {
        translate: Vec2::new(30.0, 20.0),
        scale: 3.0,
    };
    let mid = ViewportTransform::lerp(&a, &b, 0.5);
    assert_eq!(mid.translate, Vec2::new(20.0, 10.0));
    assert_eq!(mid.scale, 2.0);
}

#[test]
fn converts_to_and_from_kurbo() {
    let t = ViewportTransform::anchored(Point::new(4.0, -2.0), 3.0, Point::new(100.0, 50.0));
    let ts = TranslateScale::from(t);
    assert_eq!(ts * Point::new(4.0, -2.0), Point::new(100.0, 50.0));
    assert_eq!(ViewportTransform::from(ts), t);
    let back = ViewportTransform::from(ts * ts.inverse());
    assert!(approx(back.to_screen(Point::new(7.0, 9.0)), Point::new(7.0, 9.0)));
}

#[test]
fn padding_larger_than_the_canvas_leaves_an_empty_area() {
    let area = padded_area(Size::new(10.0, 10.0), Padding::uniform(20.0));
    assert_eq!(area.width(), 0.0);
    assert_eq!(area.height(), 0.0);
    assert_eq!((area.x0, area.y0), (20.0, 20.0));
}
