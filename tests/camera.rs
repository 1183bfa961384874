use coin_knight::camera::Camera;
use coin_knight::geometry::Rect;
use glam::Vec2;

const VIEW: Vec2 = Vec2::new(800.0, 600.0);

#[test]
fn follow_centres_on_the_target_inside_bounds() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_bounds(Rect::new(0.0, 0.0, 3200.0, 1600.0));
    cam.follow(Vec2::new(1000.0, 800.0), VIEW);
    assert_eq!(cam.position.to_array(), [1000.0, 800.0]);
}

#[test]
fn follow_clamps_at_the_world_edges() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_bounds(Rect::new(0.0, 0.0, 3200.0, 1600.0));

    cam.follow(Vec2::new(10.0, 10.0), VIEW);
    assert_eq!(cam.position.to_array(), [400.0, 300.0]);

    cam.follow(Vec2::new(5000.0, 5000.0), VIEW);
    assert_eq!(cam.position.to_array(), [2800.0, 1300.0]);
}

#[test]
fn zoom_shrinks_the_visible_area_used_for_clamping() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_zoom(2.0);
    cam.set_bounds(Rect::new(0.0, 0.0, 3200.0, 1600.0));
    cam.follow(Vec2::ZERO, VIEW);
    assert_eq!(cam.position.to_array(), [200.0, 150.0]);
}

#[test]
fn small_maps_are_centred() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_bounds(Rect::new(0.0, 0.0, 480.0, 240.0));
    cam.follow(Vec2::new(10.0, 200.0), VIEW);
    assert_eq!(cam.position.to_array(), [240.0, 120.0]);
}

#[test]
fn without_bounds_the_camera_goes_anywhere() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.follow(Vec2::new(-500.0, 9000.0), VIEW);
    assert_eq!(cam.position.to_array(), [-500.0, 9000.0]);
}

#[test]
fn zoom_by_is_clamped() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_zoom(1.5);
    cam.zoom_by(0.5, 0.5, 2.5);
    assert_eq!(cam.target_zoom(), 2.0);
    cam.zoom_by(5.0, 0.5, 2.5);
    assert_eq!(cam.target_zoom(), 2.5);
    cam.zoom_by(-10.0, 0.5, 2.5);
    assert_eq!(cam.target_zoom(), 0.5);
    // Only the target moves until the camera ticks.
    assert_eq!(cam.zoom, 1.5);
}

#[test]
fn tick_eases_zoom_toward_the_target() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_target_zoom(2.0);

    cam.tick(1.0 / 60.0, VIEW);
    assert!(cam.zoom > 1.0 && cam.zoom < 2.0);

    for _ in 0..120 {
        cam.tick(1.0 / 60.0, VIEW);
    }
    assert!((cam.zoom - 2.0).abs() < 1e-3, "zoom = {}", cam.zoom);
}

#[test]
fn long_ticks_do_not_overshoot() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_target_zoom(2.0);
    cam.tick(1.0, VIEW);
    assert_eq!(cam.zoom, 2.0);
}

#[test]
fn tick_reapplies_bounds_after_zooming_out() {
    let mut cam = Camera::new(0.0, 0.0);
    cam.set_zoom(2.0);
    cam.set_bounds(Rect::new(0.0, 0.0, 3200.0, 1600.0));
    cam.follow(Vec2::ZERO, VIEW);

    cam.set_target_zoom(1.0);
    cam.tick(1.0, VIEW);
    assert_eq!(cam.position.to_array(), [400.0, 300.0]);
}

#[test]
fn visible_rect_accounts_for_zoom() {
    let mut cam = Camera::new(400.0, 300.0);
    assert_eq!(cam.visible_rect(VIEW), Rect::new(0.0, 0.0, 800.0, 600.0));

    cam.set_zoom(2.0);
    assert_eq!(cam.visible_rect(VIEW), Rect::new(200.0, 150.0, 400.0, 300.0));
}

#[test]
fn view_projection_maps_the_camera_centre_to_the_origin() {
    let mut cam = Camera::new(100.0, 50.0);
    cam.set_zoom(2.0);
    let m = cam.build_view_proj(800.0, 600.0).view_proj;
    let x = m[0][0] * 100.0 + m[3][0];
    let y = m[1][1] * 50.0 + m[3][1];
    assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    // y grows downward on screen.
    assert!(m[1][1] < 0.0);
}
