use super::*;

#[test]
fn transparent_layer_is_blank_with_bottom_center_anchor() {
    let l = Layer::transparent(10, 4).unwrap();
    assert!(l.is_blank());
    assert_eq!(l.anchor, Point::new(5.0, 4.0));
    assert_eq!(l.data.len(), 160);
    assert!(Layer::transparent(0, 4).is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(Layer::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Layer::from_premul_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn gradient_hits_both_stops() {
    let top = Rgba8Premul::from_straight_rgba(0, 0, 255, 255);
    let bottom = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    let l = Layer::vertical_gradient(3, 11, &[(1.0, bottom), (0.0, top)]).unwrap();
    assert_eq!(l.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(l.pixel(2, 10), Some([255, 0, 0, 255]));
    let mid = l.pixel(1, 5).unwrap();
    assert!((120..=135).contains(&mid[0]));
    assert_eq!(l.pixel(3, 0), None);
}

#[test]
fn empty_gradient_is_transparent() {
    assert!(Layer::vertical_gradient(4, 4, &[]).unwrap().is_blank());
}

#[test]
fn draw_over_requires_equal_sizes() {
    let mut a = Layer::transparent(2, 2).unwrap();
    let b = Layer::transparent(3, 2).unwrap();
    assert!(a.draw_over(&b, 1.0).is_err());
}

#[test]
fn painter_fills_rect_area_only() {
    let mut p = LayerPainter::new(16, 16).unwrap();
    p.fill_rect(Rect::new(0.0, 0.0, 8.0, 16.0), [255, 255, 255, 255]);
    let l = p.finish().unwrap();
    assert_eq!(l.pixel(2, 8).unwrap()[3], 255);
    assert_eq!(l.pixel(12, 8).unwrap()[3], 0);
}

#[test]
fn painter_over_base_keeps_base_pixels() {
    let base = Layer::solid(8, 8, Rgba8Premul::from_straight_rgba(0, 0, 255, 255)).unwrap();
    let mut p = LayerPainter::over(base).unwrap();
    p.fill_circle(Point::new(4.0, 4.0), 2.0, [255, 0, 0, 255]);
    let l = p.finish().unwrap();
    assert_eq!(l.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(l.pixel(4, 4).unwrap()[0], 255);
}
